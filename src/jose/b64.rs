//! Base64url codec for JOSE segments.
//!
//! JOSE uses the url-safe alphabet without padding ([`rfc7515`], appendix C).
//! Decoding additionally tolerates trailing `=` padding, since some producers
//! emit it; everything else is rejected.
//!
//! [`rfc7515`]: https://datatracker.ietf.org/doc/html/rfc7515

use base64::{Engine as _, prelude::BASE64_URL_SAFE_NO_PAD};

use crate::error::Error;

/// Encode bytes as unpadded url-safe base64.
///
/// The output never contains `+`, `/` or `=`.
pub fn encode(data: impl AsRef<[u8]>) -> String {
    BASE64_URL_SAFE_NO_PAD.encode(data)
}

/// Decode an unpadded url-safe base64 string, tolerating trailing padding.
pub fn decode(encoded: &str) -> Result<Vec<u8>, Error> {
    let trimmed = encoded.trim_end_matches('=');
    Ok(BASE64_URL_SAFE_NO_PAD.decode(trimmed)?)
}

/// [`decode`] into a UTF-8 string.
pub fn decode_to_utf8(encoded: &str) -> Result<String, Error> {
    Ok(String::from_utf8(decode(encoded)?)?)
}

#[cfg(test)]
mod tests {
    use tokio_test::assert_err;

    use super::*;

    #[test]
    fn round_trip() {
        for input in [
            &b""[..],
            &b"f"[..],
            &b"\x00\xff\x80"[..],
            &[0x42u8; 4096][..],
        ] {
            let encoded = encode(input);
            assert!(!encoded.contains(['+', '/', '=']));
            assert_eq!(decode(&encoded).unwrap(), input);
        }
    }

    #[test]
    fn url_safe_alphabet() {
        // 0xfb 0xff maps to chars outside the standard alphabet
        assert_eq!(encode([0xfb, 0xff]), "-_8");
        assert_eq!(decode("-_8").unwrap(), [0xfb, 0xff]);
        assert_err!(decode("+/8"));
    }

    #[test]
    fn padded_input_is_tolerated() {
        assert_eq!(decode("Zg==").unwrap(), b"f");
        assert_eq!(decode("Zm8=").unwrap(), b"fo");
    }

    #[test]
    fn truncated_and_foreign_input_is_rejected() {
        // length mod 4 == 1 can never be produced by an encoder
        assert_err!(decode("Z"));
        assert_err!(decode("Zm9vY"));
        assert_err!(decode("Zm9vYmFyIQ!"));
        assert!(matches!(decode("Z").unwrap_err(), Error::Base64(_)));
    }

    #[test]
    fn utf8_decoding() {
        assert_eq!(decode_to_utf8(&encode("héllo")).unwrap(), "héllo");
        let invalid = encode([0xff, 0xfe]);
        assert!(matches!(
            decode_to_utf8(&invalid).unwrap_err(),
            Error::Utf8(_)
        ));
    }
}

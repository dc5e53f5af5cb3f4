//! Minimal DER construction for handing JWK RSA integers to the crypto
//! provider: `RSAPublicKey` for verification and `RSAPrivateKey` for signing.
//!
//! Only the encoding subset those two structures need is implemented.
//! It should ***NOT*** be used for general ASN.1 encoded values.

use crate::jose::constants::{
    DER_LENGTH_SHORT_FORM_MAX, DER_TAG_INTEGER, DER_TAG_SEQUENCE, INTEGER_SIGN_BIT_MASK,
};

/// DER encoded RSA public key sequence in the format
///```rust,ignore
/// RSAPublicKey = SEQUENCE {
///     modulus INTEGER,
///     exponent INTEGER,
/// }
/// ```
/// defined in section 2.3.1 of [RFC 3279](https://datatracker.ietf.org/doc/rfc3279/).
///
/// This is the form `RSA_PKCS1_2048_8192_*` verification expects.
pub(crate) fn rsa_public_key(n: &[u8], e: &[u8]) -> Vec<u8> {
    let mut content = encode_integer(n);
    content.extend_from_slice(&encode_integer(e));
    encode_sequence(&content)
}

/// DER encoded two-prime RSA private key sequence in the format
///```rust,ignore
/// RSAPrivateKey = SEQUENCE {
///     version           INTEGER,  -- 0 = two-prime
///     modulus           INTEGER,  -- n
///     publicExponent    INTEGER,  -- e
///     privateExponent   INTEGER,  -- d
///     prime1            INTEGER,  -- p
///     prime2            INTEGER,  -- q
///     exponent1         INTEGER,  -- dP
///     exponent2         INTEGER,  -- dQ
///     coefficient       INTEGER,  -- qInv
/// }
/// ```
/// defined in appendix A.1.2 of [RFC 8017](https://datatracker.ietf.org/doc/rfc8017/).
#[allow(clippy::too_many_arguments)]
pub(crate) fn rsa_private_key(
    n: &[u8],
    e: &[u8],
    d: &[u8],
    p: &[u8],
    q: &[u8],
    dp: &[u8],
    dq: &[u8],
    qi: &[u8],
) -> Vec<u8> {
    let mut content = encode_integer(&[0]);
    for field in [n, e, d, p, q, dp, dq, qi] {
        content.extend_from_slice(&encode_integer(field));
    }
    encode_sequence(&content)
}

/// `SEQUENCE` framing as defined in section 8.9 of
/// [ITU X.690](https://www.itu.int/ITU-T/studygroups/com17/languages/X.690-0207.pdf).
fn encode_sequence(content: &[u8]) -> Vec<u8> {
    let len_bytes = encode_der_length(content.len());
    let mut result = Vec::with_capacity(1 + len_bytes.len() + content.len());
    result.push(DER_TAG_SEQUENCE);
    result.extend_from_slice(&len_bytes);
    result.extend_from_slice(content);
    result
}

/// Length encoding as defined in section 8.1.3 of
/// [ITU X.690](https://www.itu.int/ITU-T/studygroups/com17/languages/X.690-0207.pdf).
fn encode_der_length(len: usize) -> Vec<u8> {
    if len <= DER_LENGTH_SHORT_FORM_MAX {
        vec![len as u8]
    } else {
        let mut len_bytes = len.to_be_bytes().to_vec();
        while len_bytes[0] == 0 {
            len_bytes.remove(0);
        }
        let first_byte = INTEGER_SIGN_BIT_MASK | len_bytes.len() as u8;
        let mut result = vec![first_byte];
        result.extend_from_slice(&len_bytes);
        result
    }
}

/// `INTEGER` encoding as defined in section 8.3 of
/// [ITU X.690](https://www.itu.int/ITU-T/studygroups/com17/languages/X.690-0207.pdf),
/// restricted to non-negative big-endian input as decoded from JWK members.
///
/// Leading zero octets are stripped to minimal form first; one zero octet is
/// prepended again when the sign bit of the leading octet is set.
fn encode_integer(value: &[u8]) -> Vec<u8> {
    let mut value = value;
    while value.len() > 1 && value[0] == 0 {
        value = &value[1..];
    }
    if value.is_empty() {
        value = &[0];
    }
    let needs_leading_zero = value[0] & INTEGER_SIGN_BIT_MASK != 0;
    let value_len = value.len() + needs_leading_zero as usize;
    let len_bytes = encode_der_length(value_len);
    let mut result = Vec::with_capacity(1 + len_bytes.len() + value_len);
    result.push(DER_TAG_INTEGER);
    result.extend_from_slice(&len_bytes);
    if needs_leading_zero {
        result.push(0);
    }
    result.extend_from_slice(value);
    result
}

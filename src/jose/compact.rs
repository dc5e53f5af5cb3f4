//! Compact serialization framing: dot-joined base64url parts.
//!
//! The functions here only deal with the framing. Whether an individual
//! part may be empty depends on its position and is judged by the caller
//! ([`rfc7515`], section 7.1: the signature part of an unsecured JWS is
//! the empty string).
//!
//! [`rfc7515`]: https://datatracker.ietf.org/doc/html/rfc7515

use crate::error::{CompactIssue, Error};

/// Join already-encoded parts with `.`.
pub fn serialize(parts: &[&str]) -> String {
    parts.join(".")
}

/// Split a compact serialization into exactly `expected_parts` parts.
///
/// The returned slices borrow from the input and are still encoded.
pub fn deserialize(input: &str, expected_parts: usize) -> Result<Vec<&str>, Error> {
    let parts: Vec<&str> = input.split('.').collect();
    if parts.len() != expected_parts {
        return Err(Error::MalformedSerialization(CompactIssue::PartCount {
            expected: expected_parts,
            found: parts.len(),
        }));
    }
    Ok(parts)
}

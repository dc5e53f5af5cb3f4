//! Error kinds shared by the JOSE modules.

use std::{error, fmt, string::FromUtf8Error};

use crate::jose::{Jwa, KeyKind};

/// Reason a compact serialization was rejected before any
/// cryptographic work happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompactIssue {
    /// The dot-separated part count differs from what the format requires.
    PartCount {
        /// Number of parts the format requires.
        expected: usize,
        /// Number of parts found in the input.
        found: usize,
    },
    /// A part that must carry data is the empty string (zero-based index).
    EmptyPart(usize),
    /// The header part does not decode to a JSON object.
    HeaderNotAnObject,
}

/// Indicates the specific type/cause of a JOSE failure.
///
/// A signature that merely does not match is deliberately not represented
/// here: verification reports it as `Ok(false)`, so the outcome cannot be
/// lost inside an error branch.
#[derive(Debug)]
pub enum Error {
    /// Input is not unpadded url-safe base64.
    Base64(base64::DecodeError),
    /// Decoded bytes are not valid UTF-8.
    Utf8(FromUtf8Error),
    /// A compact serialization does not have the required shape.
    MalformedSerialization(CompactIssue),
    /// The JWK `kty` (or EC `crv`) names a key family that is not implemented.
    UnsupportedKeyType(String),
    /// A required JWK member is missing or failed to decode.
    MalformedKey(&'static str),
    /// The `alg` value is not in the algorithm registry.
    UnknownAlgorithm(String),
    /// The key's family does not match what the algorithm requires.
    KeyTypeMismatch {
        /// The algorithm that was requested.
        algorithm: Jwa,
        /// The family of the key that was provided.
        key: KeyKind,
    },
    /// Signing was requested with a key that carries no private material.
    MissingPrivateMaterial,
    /// The crypto provider rejected the key material or the primitive
    /// could not be instantiated.
    CryptoProvider(&'static str),
    /// A sign or verify operation was started before all inputs were set.
    IncompleteState(&'static str),
    /// The operation does not apply to the current state.
    InvalidStateForOperation {
        /// Name of the rejected operation.
        operation: &'static str,
        /// Human readable name of the state it was attempted in.
        state: &'static str,
    },
}

impl Error {
    /// Check if the error is an input error, meaning the caller's
    /// data or call sequence is at fault. When `false` the requested
    /// algorithm or key combination is not available in this runtime.
    ///
    /// Neither category is retryable.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::Base64(_)
            | Self::Utf8(_)
            | Self::MalformedSerialization(_)
            | Self::MalformedKey(_)
            | Self::IncompleteState(_)
            | Self::InvalidStateForOperation { .. } => true,
            Self::UnsupportedKeyType(_)
            | Self::UnknownAlgorithm(_)
            | Self::KeyTypeMismatch { .. }
            | Self::MissingPrivateMaterial
            | Self::CryptoProvider(_) => false,
        }
    }
}

impl From<base64::DecodeError> for Error {
    fn from(value: base64::DecodeError) -> Self {
        Self::Base64(value)
    }
}

impl From<FromUtf8Error> for Error {
    fn from(value: FromUtf8Error) -> Self {
        Self::Utf8(value)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64(err) => write!(f, "base64url decode error: {err}"),
            Self::Utf8(err) => write!(f, "UTF-8 error: {err}"),
            Self::MalformedSerialization(issue) => match issue {
                CompactIssue::PartCount { expected, found } => {
                    write!(f, "malformed compact serialization: {found} parts, expected {expected}")
                }
                CompactIssue::EmptyPart(index) => {
                    write!(f, "malformed compact serialization: part {index} is empty")
                }
                CompactIssue::HeaderNotAnObject => {
                    write!(f, "malformed compact serialization: header is not a JSON object")
                }
            },
            Self::UnsupportedKeyType(kty) => write!(f, "unsupported key type: {kty}"),
            Self::MalformedKey(member) => write!(f, "malformed key: bad or missing member `{member}`"),
            Self::UnknownAlgorithm(alg) => write!(f, "unknown or missing `alg` value: {alg}"),
            Self::KeyTypeMismatch { algorithm, key } => {
                write!(f, "algorithm {algorithm} cannot use the provided {key} key")
            }
            Self::MissingPrivateMaterial => {
                write!(f, "signing requires a key with private material")
            }
            Self::CryptoProvider(context) => write!(f, "crypto provider error: {context}"),
            Self::IncompleteState(missing) => {
                write!(f, "operation requires `{missing}` to be set first")
            }
            Self::InvalidStateForOperation { operation, state } => {
                write!(f, "`{operation}` is not valid in the {state} state")
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Base64(err) => Some(err),
            Self::Utf8(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_are_categorized() {
        assert!(Error::MalformedKey("n").is_input_error());
        assert!(
            Error::MalformedSerialization(CompactIssue::PartCount {
                expected: 3,
                found: 2
            })
            .is_input_error()
        );
        assert!(!Error::MissingPrivateMaterial.is_input_error());
        assert!(!Error::UnknownAlgorithm("EdDSA".to_owned()).is_input_error());
    }

    #[test]
    fn display_is_informative() {
        let err = Error::InvalidStateForOperation {
            operation: "payload",
            state: "signing",
        };
        assert!(err.to_string().contains("payload"));
        assert!(err.to_string().contains("signing"));
    }
}

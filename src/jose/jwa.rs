use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::jose::jwk::{EcCurve, KeyKind};

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq)]
/// [`Jwa`] or JSON Web Algorithms as defined in [`rfc7518`]
///
/// This is the closed set of digital signature and MAC algorithms this
/// crate implements. Anything else on the wire is rejected with
/// [`Error::UnknownAlgorithm`] rather than mapped to a nearest match.
///
/// [`rfc7518`]: https://datatracker.ietf.org/doc/html/rfc7518
pub enum Jwa {
    /// HMAC using SHA-256 (Required)
    HS256,
    /// HMAC using SHA-384 (Optional)
    HS384,
    /// HMAC using SHA-512 (Optional)
    HS512,
    /// RSASSA-PKCS1-v1_5 using SHA-256 (Recommended)
    RS256,
    /// RSASSA-PKCS1-v1_5 using SHA-384 (Optional)
    RS384,
    /// RSASSA-PKCS1-v1_5 using SHA-512 (Optional)
    RS512,
    /// ECDSA using P-256 and SHA-256 (Recommended+)
    ES256,
    /// ECDSA using P-384 and SHA-384 (Optional)
    ES384,
    /// ECDSA using P-521 and SHA-512 (Optional)
    ES512,
    /// No digital signature or MAC (Optional)
    ///
    /// Produces an unsecured JWS with an empty signature part.
    /// Verification only accepts it behind an explicit opt-in,
    /// see [`crate::jose::Jws::set_none_algorithm_allowed`].
    #[serde(rename = "none")]
    None,
}

impl Jwa {
    /// Look up the algorithm for an `alg` header value.
    pub fn resolve(value: &str) -> Result<Self, Error> {
        Ok(match value {
            "HS256" => Self::HS256,
            "HS384" => Self::HS384,
            "HS512" => Self::HS512,
            "RS256" => Self::RS256,
            "RS384" => Self::RS384,
            "RS512" => Self::RS512,
            "ES256" => Self::ES256,
            "ES384" => Self::ES384,
            "ES512" => Self::ES512,
            "none" => Self::None,
            other => return Err(Error::UnknownAlgorithm(other.to_owned())),
        })
    }

    /// The wire representation used in the `alg` header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
            Self::ES256 => "ES256",
            Self::ES384 => "ES384",
            Self::ES512 => "ES512",
            Self::None => "none",
        }
    }

    /// Key family this algorithm operates on, `None` for the
    /// unsecured algorithm which takes no key at all.
    pub fn required_key_kind(&self) -> Option<KeyKind> {
        match self {
            Self::HS256 | Self::HS384 | Self::HS512 => Some(KeyKind::Oct),
            Self::RS256 | Self::RS384 | Self::RS512 => Some(KeyKind::Rsa),
            Self::ES256 | Self::ES384 | Self::ES512 => Some(KeyKind::Ec),
            Self::None => None,
        }
    }

    /// Curve an ECDSA algorithm is bound to, `None` for everything else.
    pub fn curve(&self) -> Option<EcCurve> {
        match self {
            Self::ES256 => Some(EcCurve::P256),
            Self::ES384 => Some(EcCurve::P384),
            Self::ES512 => Some(EcCurve::P521),
            _ => None,
        }
    }
}

impl From<EcCurve> for Jwa {
    fn from(value: EcCurve) -> Self {
        match value {
            EcCurve::P256 => Self::ES256,
            EcCurve::P384 => Self::ES384,
            EcCurve::P521 => Self::ES512,
        }
    }
}

impl fmt::Display for Jwa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

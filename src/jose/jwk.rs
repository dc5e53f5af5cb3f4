use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::jose::b64;

#[derive(Default, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
/// [`Jwk`] or JSON Web Key as defined in [`rfc7517`]
///
/// This is the raw serde view of the JSON structure: every member is
/// carried as the base64url (or plain) string it arrives as, and members
/// not listed here are ignored as section 4 of the RFC requires. Use
/// [`Key::from_jwk`] to turn it into validated key material.
///
/// [`rfc7517`]: https://datatracker.ietf.org/doc/html/rfc7517
pub struct Jwk {
    /// Key type: `RSA`, `EC` or `oct`.
    pub kty: String,
    /// Key id, an opaque label used for key matching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Intended use of the key (`sig` or `enc`), carried uninterpreted.
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,
    /// Algorithm hint, carried uninterpreted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,

    // RSA members (rfc7518, section 6.3)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dq: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qi: Option<String>,

    // EC members (rfc7518, section 6.2); `d` above doubles as the EC
    // private scalar, exactly as it does on the wire
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,

    // Symmetric member (rfc7518, section 6.4)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq)]
/// Elliptic curves supported for ECDSA keys.
pub enum EcCurve {
    #[serde(rename = "P-256")]
    P256,
    #[serde(rename = "P-384")]
    P384,
    #[serde(rename = "P-521")]
    P521,
}

impl EcCurve {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name {
            "P-256" => Some(Self::P256),
            "P-384" => Some(Self::P384),
            "P-521" => Some(Self::P521),
            _ => None,
        }
    }

    /// The wire representation used in the `crv` member.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P256 => "P-256",
            Self::P384 => "P-384",
            Self::P521 => "P-521",
        }
    }

    /// Field width in bytes. Coordinates and private scalars are
    /// left-padded to this width when handed to the provider.
    pub fn coordinate_len(&self) -> usize {
        match self {
            Self::P256 => 32,
            Self::P384 => 48,
            Self::P521 => 66,
        }
    }

    /// Length of the fixed-width `r || s` signature this curve produces.
    ///
    /// Note this is 132 for P-521, never the DER form and never a
    /// minimal-integer form.
    pub fn signature_len(&self) -> usize {
        2 * self.coordinate_len()
    }
}

impl fmt::Display for EcCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// Discriminant of the key families a [`Key`] can carry.
pub enum KeyKind {
    /// RSA public (and optionally private) key
    Rsa,
    /// Elliptic curve public (and optionally private) key
    Ec,
    /// Symmetric secret
    Oct,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rsa => "RSA",
            Self::Ec => "EC",
            Self::Oct => "oct",
        })
    }
}

#[derive(Clone)]
/// Validated key material, decoded out of a [`Jwk`].
///
/// A [`Key`] is one identity whether it is used to sign or to verify:
/// private members are optional on top of the public ones, and
/// [`Key::is_private`] tells which side this instance carries. It is
/// immutable after construction and freely shareable across threads.
pub struct Key {
    kid: Option<String>,
    material: KeyMaterial,
}

#[derive(Clone)]
pub(crate) enum KeyMaterial {
    Rsa {
        n: Vec<u8>,
        e: Vec<u8>,
        private: Option<RsaPrivateParams>,
    },
    Ec {
        crv: EcCurve,
        x: Vec<u8>,
        y: Vec<u8>,
        d: Option<Vec<u8>>,
    },
    Oct {
        k: Vec<u8>,
    },
}

#[derive(Clone)]
/// RSA private material in CRT form, the form the provider consumes.
pub(crate) struct RsaPrivateParams {
    pub(crate) d: Vec<u8>,
    pub(crate) p: Vec<u8>,
    pub(crate) q: Vec<u8>,
    pub(crate) dp: Vec<u8>,
    pub(crate) dq: Vec<u8>,
    pub(crate) qi: Vec<u8>,
}

impl Key {
    /// Parse a JWK JSON document into key material.
    pub fn from_jwk_json(json: &str) -> Result<Self, Error> {
        let jwk: Jwk = serde_json::from_str(json).map_err(|_| Error::MalformedKey("JWK"))?;
        Self::from_jwk(&jwk)
    }

    /// Decode the members of a [`Jwk`] for its declared `kty`.
    ///
    /// For RSA keys the presence of `d` switches to private parsing, and
    /// then the full CRT set (`p`, `q`, `dp`, `dq`, `qi`) is required.
    pub fn from_jwk(jwk: &Jwk) -> Result<Self, Error> {
        let material = match jwk.kty.as_str() {
            "RSA" => {
                let private = match jwk.d {
                    Some(_) => Some(RsaPrivateParams {
                        d: required_member(&jwk.d, "d")?,
                        p: required_member(&jwk.p, "p")?,
                        q: required_member(&jwk.q, "q")?,
                        dp: required_member(&jwk.dp, "dp")?,
                        dq: required_member(&jwk.dq, "dq")?,
                        qi: required_member(&jwk.qi, "qi")?,
                    }),
                    None => None,
                };
                KeyMaterial::Rsa {
                    n: required_member(&jwk.n, "n")?,
                    e: required_member(&jwk.e, "e")?,
                    private,
                }
            }
            "EC" => {
                let crv_name = jwk.crv.as_deref().ok_or(Error::MalformedKey("crv"))?;
                let crv = EcCurve::from_name(crv_name)
                    .ok_or_else(|| Error::UnsupportedKeyType(format!("EC crv {crv_name}")))?;
                let d = match jwk.d {
                    Some(_) => Some(required_member(&jwk.d, "d")?),
                    None => None,
                };
                KeyMaterial::Ec {
                    crv,
                    x: required_member(&jwk.x, "x")?,
                    y: required_member(&jwk.y, "y")?,
                    d,
                }
            }
            "oct" => KeyMaterial::Oct {
                k: required_member(&jwk.k, "k")?,
            },
            other => return Err(Error::UnsupportedKeyType(other.to_owned())),
        };
        Ok(Self {
            kid: jwk.kid.clone(),
            material,
        })
    }

    /// Key id as carried by the source JWK, if any.
    pub fn kid(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    /// Family of this key.
    pub fn kind(&self) -> KeyKind {
        match self.material {
            KeyMaterial::Rsa { .. } => KeyKind::Rsa,
            KeyMaterial::Ec { .. } => KeyKind::Ec,
            KeyMaterial::Oct { .. } => KeyKind::Oct,
        }
    }

    /// Check if this key carries signing material.
    ///
    /// Symmetric secrets always do.
    pub fn is_private(&self) -> bool {
        match &self.material {
            KeyMaterial::Rsa { private, .. } => private.is_some(),
            KeyMaterial::Ec { d, .. } => d.is_some(),
            KeyMaterial::Oct { .. } => true,
        }
    }

    pub(crate) fn material(&self) -> &KeyMaterial {
        &self.material
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // secret bytes stay out of debug output
        f.debug_struct("Key")
            .field("kind", &self.kind())
            .field("kid", &self.kid)
            .field("private", &self.is_private())
            .finish()
    }
}

fn required_member(member: &Option<String>, name: &'static str) -> Result<Vec<u8>, Error> {
    let value = member.as_deref().ok_or(Error::MalformedKey(name))?;
    b64::decode(value).map_err(|_| Error::MalformedKey(name))
}

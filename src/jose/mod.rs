//! # JOSE: JSON Object Signing and Encryption
//!
//! JOSE is an IETF standard for securely transferring data between parties using JSON.
//! This crate implements the signing half of the framework, over the compact
//! serialization:
//!
//! * JWS (JSON Web Signature): a digital signature over any data, proving
//!   integrity and authenticity. It consists of a Header, a Payload (the data),
//!   and a Signature, all encoded in Base64Url and joined by dots.
//!   See [`rfc7515`] for more details.
//!
//! * JWK (JSON Web Key): a JSON format for representing cryptographic keys,
//!   making it simple to share the keys required to sign or verify.
//!   See [`rfc7517`] for more details.
//!
//! * JWA (JSON Web Algorithm): the list of specific cryptographic algorithms
//!   used for signing within the JOSE framework. The `alg` parameter in the
//!   JOSE header identifies which algorithm was used.
//!   See [`rfc7518`] for more details.
//!
//! [`rfc7515`]: https://datatracker.ietf.org/doc/html/rfc7515
//! [`rfc7517`]: https://datatracker.ietf.org/doc/html/rfc7517
//! [`rfc7518`]: https://datatracker.ietf.org/doc/html/rfc7518

pub mod b64;
pub mod compact;

mod constants;
mod der;
mod sign;

mod jwa;
pub use jwa::Jwa;

mod jwk;
pub use jwk::{EcCurve, Jwk, Key, KeyKind};

mod jws;
pub use jws::{Jws, JwsState};

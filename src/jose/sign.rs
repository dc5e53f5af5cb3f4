//! Signature engine: maps an algorithm and key material onto the
//! crypto provider's primitives.
//!
//! Everything here is stateless. Preconditions (key family matches the
//! algorithm, private material is present for signing) are reported as
//! errors; a signature that simply does not match is `Ok(false)` from
//! [`verify`], never an error.

use aws_lc_rs::hmac;
use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{
    ECDSA_P256_SHA256_FIXED, ECDSA_P256_SHA256_FIXED_SIGNING, ECDSA_P384_SHA384_FIXED,
    ECDSA_P384_SHA384_FIXED_SIGNING, ECDSA_P521_SHA512_FIXED, ECDSA_P521_SHA512_FIXED_SIGNING,
    EcdsaKeyPair, EcdsaSigningAlgorithm, EcdsaVerificationAlgorithm, RSA_PKCS1_2048_8192_SHA256,
    RSA_PKCS1_2048_8192_SHA384, RSA_PKCS1_2048_8192_SHA512, RSA_PKCS1_SHA256, RSA_PKCS1_SHA384,
    RSA_PKCS1_SHA512, RsaEncoding, RsaKeyPair, RsaParameters, UnparsedPublicKey,
};

use crate::error::Error;
use crate::jose::constants::SEC1_UNCOMPRESSED_POINT;
use crate::jose::der;
use crate::jose::jwa::Jwa;
use crate::jose::jwk::{EcCurve, Key, KeyMaterial, RsaPrivateParams};

/// Compute the signature over `signing_input` with the given algorithm
/// and key. [`Jwa::None`] yields an empty vector.
pub(crate) fn sign(alg: Jwa, key: &Key, signing_input: &[u8]) -> Result<Vec<u8>, Error> {
    match alg {
        Jwa::None => Ok(Vec::new()),
        Jwa::HS256 | Jwa::HS384 | Jwa::HS512 => {
            let secret = symmetric_secret(alg, key)?;
            let key = hmac::Key::new(hmac_algorithm(alg), secret);
            Ok(hmac::sign(&key, signing_input).as_ref().to_vec())
        }
        Jwa::RS256 | Jwa::RS384 | Jwa::RS512 => {
            let (n, e, private) = rsa_components(alg, key)?;
            let private = private.ok_or(Error::MissingPrivateMaterial)?;
            let der = der::rsa_private_key(
                n, e, &private.d, &private.p, &private.q, &private.dp, &private.dq, &private.qi,
            );
            let key_pair = RsaKeyPair::from_der(&der)
                .map_err(|_| Error::CryptoProvider("RSA private key rejected"))?;
            let mut signature = vec![0; key_pair.public_modulus_len()];
            key_pair
                .sign(
                    rsa_padding(alg),
                    &SystemRandom::new(),
                    signing_input,
                    &mut signature,
                )
                .map_err(|_| Error::CryptoProvider("RSA signing failed"))?;
            Ok(signature)
        }
        Jwa::ES256 | Jwa::ES384 | Jwa::ES512 => {
            let (crv, x, y, d) = ec_components(alg, key)?;
            let d = d.ok_or(Error::MissingPrivateMaterial)?;
            let key_pair = EcdsaKeyPair::from_private_key_and_public_key(
                ecdsa_signing(alg),
                &left_pad(d, crv.coordinate_len()),
                &sec1_point(crv, x, y),
            )
            .map_err(|_| Error::CryptoProvider("EC private key rejected"))?;
            let signature = key_pair
                .sign(&SystemRandom::new(), signing_input)
                .map_err(|_| Error::CryptoProvider("ECDSA signing failed"))?;
            Ok(signature.as_ref().to_vec())
        }
    }
}

/// Check `signature` over `signing_input`.
///
/// HMAC comparison is delegated to the provider's constant-time
/// [`hmac::verify`]. For [`Jwa::None`] the check is that the signature
/// is empty; policy around accepting unsecured input at all lives in
/// the caller.
pub(crate) fn verify(
    alg: Jwa,
    key: &Key,
    signing_input: &[u8],
    signature: &[u8],
) -> Result<bool, Error> {
    match alg {
        Jwa::None => Ok(signature.is_empty()),
        Jwa::HS256 | Jwa::HS384 | Jwa::HS512 => {
            let secret = symmetric_secret(alg, key)?;
            let key = hmac::Key::new(hmac_algorithm(alg), secret);
            Ok(hmac::verify(&key, signing_input, signature).is_ok())
        }
        Jwa::RS256 | Jwa::RS384 | Jwa::RS512 => {
            let (n, e, _) = rsa_components(alg, key)?;
            let public = UnparsedPublicKey::new(rsa_verification(alg), der::rsa_public_key(n, e));
            Ok(public.verify(signing_input, signature).is_ok())
        }
        Jwa::ES256 | Jwa::ES384 | Jwa::ES512 => {
            let (crv, x, y, _) = ec_components(alg, key)?;
            // only the fixed-width r || s form is valid on the wire
            if signature.len() != crv.signature_len() {
                return Ok(false);
            }
            let public = UnparsedPublicKey::new(ecdsa_verification(alg), sec1_point(crv, x, y));
            Ok(public.verify(signing_input, signature).is_ok())
        }
    }
}

fn symmetric_secret(alg: Jwa, key: &Key) -> Result<&[u8], Error> {
    match key.material() {
        KeyMaterial::Oct { k } => Ok(k),
        _ => Err(Error::KeyTypeMismatch {
            algorithm: alg,
            key: key.kind(),
        }),
    }
}

fn rsa_components(alg: Jwa, key: &Key) -> Result<(&[u8], &[u8], Option<&RsaPrivateParams>), Error> {
    match key.material() {
        KeyMaterial::Rsa { n, e, private } => Ok((n, e, private.as_ref())),
        _ => Err(Error::KeyTypeMismatch {
            algorithm: alg,
            key: key.kind(),
        }),
    }
}

fn ec_components(alg: Jwa, key: &Key) -> Result<(EcCurve, &[u8], &[u8], Option<&[u8]>), Error> {
    match key.material() {
        KeyMaterial::Ec { crv, x, y, d } if alg.curve() == Some(*crv) => {
            Ok((*crv, x, y, d.as_deref()))
        }
        _ => Err(Error::KeyTypeMismatch {
            algorithm: alg,
            key: key.kind(),
        }),
    }
}

fn hmac_algorithm(alg: Jwa) -> hmac::Algorithm {
    match alg {
        Jwa::HS384 => hmac::HMAC_SHA384,
        Jwa::HS512 => hmac::HMAC_SHA512,
        _ => hmac::HMAC_SHA256,
    }
}

fn rsa_padding(alg: Jwa) -> &'static dyn RsaEncoding {
    match alg {
        Jwa::RS384 => &RSA_PKCS1_SHA384,
        Jwa::RS512 => &RSA_PKCS1_SHA512,
        _ => &RSA_PKCS1_SHA256,
    }
}

// the 2048..8192 bound carries the provider's minimum key size policy
fn rsa_verification(alg: Jwa) -> &'static RsaParameters {
    match alg {
        Jwa::RS384 => &RSA_PKCS1_2048_8192_SHA384,
        Jwa::RS512 => &RSA_PKCS1_2048_8192_SHA512,
        _ => &RSA_PKCS1_2048_8192_SHA256,
    }
}

fn ecdsa_signing(alg: Jwa) -> &'static EcdsaSigningAlgorithm {
    match alg {
        Jwa::ES384 => &ECDSA_P384_SHA384_FIXED_SIGNING,
        Jwa::ES512 => &ECDSA_P521_SHA512_FIXED_SIGNING,
        _ => &ECDSA_P256_SHA256_FIXED_SIGNING,
    }
}

fn ecdsa_verification(alg: Jwa) -> &'static EcdsaVerificationAlgorithm {
    match alg {
        Jwa::ES384 => &ECDSA_P384_SHA384_FIXED,
        Jwa::ES512 => &ECDSA_P521_SHA512_FIXED,
        _ => &ECDSA_P256_SHA256_FIXED,
    }
}

/// Uncompressed SEC1 point: `0x04 || x || y`, both coordinates at
/// full field width.
fn sec1_point(crv: EcCurve, x: &[u8], y: &[u8]) -> Vec<u8> {
    let width = crv.coordinate_len();
    let mut point = Vec::with_capacity(1 + 2 * width);
    point.push(SEC1_UNCOMPRESSED_POINT);
    point.extend_from_slice(&left_pad(x, width));
    point.extend_from_slice(&left_pad(y, width));
    point
}

/// Pad (or minimally trim) a big-endian unsigned integer to `width` bytes.
fn left_pad(value: &[u8], width: usize) -> Vec<u8> {
    let mut value = value;
    while value.len() > width && value[0] == 0 {
        value = &value[1..];
    }
    let mut padded = vec![0u8; width.saturating_sub(value.len())];
    padded.extend_from_slice(value);
    padded
}

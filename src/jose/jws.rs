use serde_json::{Map, Value};

use crate::error::{CompactIssue, Error};
use crate::jose::jwa::Jwa;
use crate::jose::jwk::Key;
use crate::jose::{b64, compact, sign};

/// Number of parts in a compact JWS serialization.
const COMPACT_PART_COUNT: usize = 3;

/// `alg` header parameter name ([`rfc7515`], section 4.1.1)
///
/// [`rfc7515`]: https://datatracker.ietf.org/doc/html/rfc7515
pub(crate) const ALGORITHM: &str = "alg";
/// `kid` header parameter name ([`rfc7515`], section 4.1.4)
///
/// [`rfc7515`]: https://datatracker.ietf.org/doc/html/rfc7515
pub(crate) const KEY_ID: &str = "kid";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Lifecycle state of a [`Jws`].
///
/// A [`Jws`] walks exactly one path: the sign path
/// (`Empty -> Signing -> Signed`) or the verify path
/// (`Empty -> CompactSet -> Verified | VerificationFailed`).
pub enum JwsState {
    /// Nothing has been set yet, both paths are open.
    Empty,
    /// Sign path: payload and/or headers have been set.
    Signing,
    /// Sign path: a compact serialization has been produced.
    Signed,
    /// Verify path: a received compact serialization has been loaded.
    CompactSet,
    /// Verify path: the signature checked out.
    Verified,
    /// Verify path: the signature did not check out.
    VerificationFailed,
}

impl JwsState {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Signing => "signing",
            Self::Signed => "signed",
            Self::CompactSet => "compact set",
            Self::Verified => "verified",
            Self::VerificationFailed => "verification failed",
        }
    }
}

#[derive(Debug)]
struct Received {
    header_b64: String,
    payload_b64: String,
    header: Map<String, Value>,
    payload: Vec<u8>,
    signature: Vec<u8>,
}

#[derive(Debug)]
/// Single-use JWS orchestrator: produces or consumes one compact
/// serialization.
///
/// # Producing
///
/// ```
/// use jose_jws::jose::{Jwa, Jws, Key};
///
/// # fn main() -> Result<(), jose_jws::Error> {
/// let key = Key::from_jwk_json(r#"{"kty":"oct","k":"aSBoYXZlIGEgc2VjcmV0"}"#)?;
///
/// let mut jws = Jws::new();
/// jws.set_payload("meet me at the bridge")?;
/// jws.set_algorithm_header_value(Jwa::HS256)?;
/// jws.set_key(key);
/// let compact = jws.compact_serialization()?;
/// # assert_eq!(compact.split('.').count(), 3);
/// # Ok(())
/// # }
/// ```
///
/// # Consuming
///
/// ```
/// use jose_jws::jose::{Jws, Key};
///
/// # fn main() -> Result<(), jose_jws::Error> {
/// # let key = Key::from_jwk_json(r#"{"kty":"oct","k":"aSBoYXZlIGEgc2VjcmV0"}"#)?;
/// # let mut producer = Jws::new();
/// # producer.set_payload("meet me at the bridge")?;
/// # producer.set_algorithm_header_value(jose_jws::jose::Jwa::HS256)?;
/// # producer.set_key(key.clone());
/// # let compact = producer.compact_serialization()?;
/// let mut jws = Jws::new();
/// jws.set_compact_serialization(&compact)?;
/// jws.set_key(key);
/// if jws.verify_signature()? {
///     let payload = jws.payload()?;
///     # assert_eq!(payload, &b"meet me at the bridge"[..]);
/// }
/// # Ok(())
/// # }
/// ```
///
/// The algorithm used for verification always comes from the received
/// header. Callers with a fixed expectation should check
/// [`Self::algorithm_header_value`] against their own allow-list before
/// trusting the outcome, and a mismatching signature is reported as
/// `Ok(false)`, never as an error.
pub struct Jws {
    state: JwsState,
    header: Map<String, Value>,
    payload: Option<Vec<u8>>,
    key: Option<Key>,
    none_allowed: bool,
    received: Option<Received>,
    verified: Option<bool>,
}

impl Jws {
    /// Create an empty orchestrator, open to either path.
    pub fn new() -> Self {
        Self {
            state: JwsState::Empty,
            header: Map::new(),
            payload: None,
            key: None,
            none_allowed: false,
            received: None,
            verified: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> JwsState {
        self.state
    }

    /// Allow the `none` algorithm (unsecured JWS).
    ///
    /// Off by default: without this opt-in, verification of an
    /// unsecured JWS reports `Ok(false)`.
    pub fn set_none_algorithm_allowed(&mut self, allowed: bool) -> &mut Self {
        self.none_allowed = allowed;
        self
    }

    /// Set the key used for signing or verification.
    ///
    /// On the verify path a new key clears any cached outcome, so the
    /// same received serialization can be checked against another key.
    pub fn set_key(&mut self, key: Key) -> &mut Self {
        if matches!(
            self.state,
            JwsState::Verified | JwsState::VerificationFailed
        ) {
            self.state = JwsState::CompactSet;
        }
        self.verified = None;
        self.key = Some(key);
        self
    }

    fn sign_path_mutation(&mut self, operation: &'static str) -> Result<(), Error> {
        match self.state {
            JwsState::Empty | JwsState::Signing => {
                self.state = JwsState::Signing;
                Ok(())
            }
            state => Err(Error::InvalidStateForOperation {
                operation,
                state: state.as_str(),
            }),
        }
    }

    /// Set the payload to be signed.
    pub fn set_payload(&mut self, payload: impl Into<Vec<u8>>) -> Result<&mut Self, Error> {
        self.sign_path_mutation("set_payload")?;
        self.payload = Some(payload.into());
        Ok(self)
    }

    /// Set a protected header parameter.
    ///
    /// Replaces an already present parameter of the same name. Insertion
    /// order is preserved in the serialized header.
    pub fn set_header(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<&mut Self, Error> {
        self.sign_path_mutation("set_header")?;
        self.header.insert(name.into(), value.into());
        Ok(self)
    }

    /// Set the `alg` header parameter.
    pub fn set_algorithm_header_value(&mut self, alg: Jwa) -> Result<&mut Self, Error> {
        self.set_header(ALGORITHM, alg.as_str())
    }

    /// Set the `kid` header parameter.
    pub fn set_key_id_header_value(&mut self, kid: impl Into<String>) -> Result<&mut Self, Error> {
        self.set_header(KEY_ID, kid.into())
    }

    /// Produce the compact serialization, signing with the configured key.
    ///
    /// Deterministic algorithms (HMAC, RSASSA-PKCS1-v1_5) reproduce the
    /// same string on a repeated call. ECDSA draws a fresh nonce per call,
    /// so two calls produce different, equally valid serializations.
    pub fn compact_serialization(&mut self) -> Result<String, Error> {
        match self.state {
            JwsState::Signing | JwsState::Signed => {}
            state => {
                return Err(Error::InvalidStateForOperation {
                    operation: "compact_serialization",
                    state: state.as_str(),
                });
            }
        }
        let payload = self.payload.as_ref().ok_or(Error::IncompleteState("payload"))?;
        let alg_value = self
            .header
            .get(ALGORITHM)
            .and_then(Value::as_str)
            .ok_or(Error::IncompleteState("alg header"))?;
        let alg = Jwa::resolve(alg_value)?;

        let header_json = Value::Object(self.header.clone()).to_string();
        let signing_input =
            compact::serialize(&[&b64::encode(header_json), &b64::encode(payload)]);

        let signature = if alg == Jwa::None {
            Vec::new()
        } else {
            let key = self.key.as_ref().ok_or(Error::IncompleteState("key"))?;
            sign::sign(alg, key, signing_input.as_bytes())?
        };
        tracing::debug!("jws: produced {alg} compact serialization");

        self.state = JwsState::Signed;
        Ok(compact::serialize(&[&signing_input, &b64::encode(signature)]))
    }

    /// Load a received compact serialization.
    ///
    /// The three parts are split and decoded, and the header is parsed
    /// into an ordered map. The parts are also retained exactly as
    /// received: the signing input used by [`Self::verify_signature`] is
    /// never re-encoded, so a producer with different JSON serialization
    /// habits still verifies.
    pub fn set_compact_serialization(&mut self, input: &str) -> Result<&mut Self, Error> {
        match self.state {
            JwsState::Empty => {}
            state => {
                return Err(Error::InvalidStateForOperation {
                    operation: "set_compact_serialization",
                    state: state.as_str(),
                });
            }
        }
        let parts = compact::deserialize(input, COMPACT_PART_COUNT)?;
        let (header_b64, payload_b64, signature_b64) = (parts[0], parts[1], parts[2]);
        if header_b64.is_empty() {
            return Err(Error::MalformedSerialization(CompactIssue::EmptyPart(0)));
        }

        let header_bytes = b64::decode(header_b64)?;
        let header: Map<String, Value> = serde_json::from_slice(&header_bytes)
            .map_err(|_| Error::MalformedSerialization(CompactIssue::HeaderNotAnObject))?;

        // an empty signature part is only meaningful for an unsecured JWS
        let alg_value = header.get(ALGORITHM).and_then(Value::as_str);
        if signature_b64.is_empty() && alg_value != Some(Jwa::None.as_str()) {
            return Err(Error::MalformedSerialization(CompactIssue::EmptyPart(2)));
        }

        let payload = b64::decode(payload_b64)?;
        let signature = b64::decode(signature_b64)?;

        self.received = Some(Received {
            header_b64: header_b64.to_owned(),
            payload_b64: payload_b64.to_owned(),
            header,
            payload,
            signature,
        });
        self.state = JwsState::CompactSet;
        Ok(self)
    }

    /// Verify the signature of the loaded compact serialization against
    /// the configured key.
    ///
    /// The algorithm is resolved from the received header only. The
    /// outcome is cached together with the state
    /// ([`JwsState::Verified`] / [`JwsState::VerificationFailed`]);
    /// repeat calls return it without recomputing.
    pub fn verify_signature(&mut self) -> Result<bool, Error> {
        match self.state {
            JwsState::CompactSet | JwsState::Verified | JwsState::VerificationFailed => {}
            state => {
                return Err(Error::InvalidStateForOperation {
                    operation: "verify_signature",
                    state: state.as_str(),
                });
            }
        }
        if let Some(outcome) = self.verified {
            return Ok(outcome);
        }
        let received = self
            .received
            .as_ref()
            .ok_or(Error::IncompleteState("compact serialization"))?;
        let alg_value = received
            .header
            .get(ALGORITHM)
            .and_then(Value::as_str)
            .ok_or_else(|| Error::UnknownAlgorithm("<missing>".to_owned()))?;
        let alg = Jwa::resolve(alg_value)?;

        let outcome = if alg == Jwa::None {
            if !self.none_allowed {
                tracing::debug!("jws: unsecured jws rejected, `none` not allowed");
            }
            self.none_allowed && received.signature.is_empty()
        } else {
            let key = self.key.as_ref().ok_or(Error::IncompleteState("key"))?;
            let signing_input =
                compact::serialize(&[&received.header_b64, &received.payload_b64]);
            sign::verify(alg, key, signing_input.as_bytes(), &received.signature)?
        };
        tracing::trace!("jws: {alg} signature verification outcome: {outcome}");

        self.verified = Some(outcome);
        self.state = if outcome {
            JwsState::Verified
        } else {
            JwsState::VerificationFailed
        };
        Ok(outcome)
    }

    /// Payload of the loaded compact serialization, before any
    /// cryptographic check.
    ///
    /// Access is not proof of authenticity.
    pub fn unverified_payload(&self) -> Result<&[u8], Error> {
        match &self.received {
            Some(received) => Ok(&received.payload),
            None => Err(Error::InvalidStateForOperation {
                operation: "unverified_payload",
                state: self.state.as_str(),
            }),
        }
    }

    /// Payload of the loaded compact serialization, available only
    /// after [`Self::verify_signature`] returned `true`.
    pub fn payload(&self) -> Result<&[u8], Error> {
        match (self.state, &self.received) {
            (JwsState::Verified, Some(received)) => Ok(&received.payload),
            _ => Err(Error::InvalidStateForOperation {
                operation: "payload",
                state: self.state.as_str(),
            }),
        }
    }

    fn current_header(&self) -> &Map<String, Value> {
        match &self.received {
            Some(received) => &received.header,
            None => &self.header,
        }
    }

    /// A header parameter by name: the received header on the verify
    /// path, the headers set so far on the sign path.
    pub fn header_value(&self, name: &str) -> Option<&Value> {
        self.current_header().get(name)
    }

    /// The `alg` header parameter, if present and a string.
    pub fn algorithm_header_value(&self) -> Option<&str> {
        self.header_value(ALGORITHM).and_then(Value::as_str)
    }

    /// The `kid` header parameter, if present and a string.
    pub fn key_id_header_value(&self) -> Option<&str> {
        self.header_value(KEY_ID).and_then(Value::as_str)
    }
}

impl Default for Jws {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use tokio_test::assert_err;

    use super::*;
    use crate::jose::Jwk;

    // Fixtures from the JOSE cookbook (draft-ietf-jose-cookbook-01,
    // later RFC 7520): one shared payload, per-family key sets.
    const PAYLOAD_B64: &str = "SXTigJlzIGEgZGFuZ2Vyb3VzIGJ1c2luZXNzLCBGcm9kbywgZ29pbmcgb3V0IH\
                               lvdXIgZG9vci4gWW91IHN0ZXAgb250byB0aGUgcm9hZCwgYW5kIGlmIHlvdSBk\
                               b24ndCBrZWVwIHlvdXIgZmVldCwgdGhlcmXigJlzIG5vIGtub3dpbmcgd2hlcm\
                               UgeW91IG1pZ2h0IGJlIHN3ZXB0IG9mZiB0by4";

    const OCT_JWK: &str = r#"{
        "kty": "oct",
        "kid": "018c0ae5-4d9b-471b-bfd6-eef314bc7037",
        "use": "sig",
        "k": "hJtXIZ2uSN5kbQfbtTNWbpdmhkV8FJG-Onbc6mxCcYg"
    }"#;

    const HS256_HEADER_B64: &str =
        "eyJhbGciOiJIUzI1NiIsImtpZCI6IjAxOGMwYWU1LTRkOWItNDcxYi1iZmQ2LWVlZjMxNGJjNzAzNyJ9";
    const HS256_SIGNATURE_B64: &str = "s0h6KThzkfBBBkLspW1h84VsJZFTsPPqMDA7g1Md7p0";

    const RSA_JWK: &str = r#"{
        "kty": "RSA",
        "kid": "bilbo.baggins@hobbiton.example",
        "use": "sig",
        "n": "n4EPtAOCc9AlkeQHPzHStgAbgs7bTZLwUBZdR8_KuKPEHLd4rHVTeT-O-XV2jRojdNhxJWTDvNd7nqQ0VEiZQHz_AJmSCpMaJMRBSFKrKb2wqVwGU_NsYOYL-QtiWN2lbzcEe6XC0dApr5ydQLrHqkHHig3RBordaZ6Aj-oBHqFEHYpPe7Tpe-OfVfHd1E6cS6M1FZcD1NNLYD5lFHpPI9bTwJlsde3uhGqC0ZCuEHg8lhzwOHrtIQbS0FVbb9k3-tVTU4fg_3L_vniUFAKwuCLqKnS2BYwdq_mzSnbLY7h_qixoR7jig3__kRhuaxwUkRz5iaiQkqgc5gHdrNP5zw",
        "e": "AQAB",
        "d": "bWUC9B-EFRIo8kpGfh0ZuyGPvMNKvYWNtB_ikiH9k20eT-O1q_I78eiZkpXxXQ0UTEs2LsNRS-8uJbvQ-A1irkwMSMkK1J3XTGgdrhCku9gRldY7sNA_AKZGh-Q661_42rINLRCe8W-nZ34ui_qOfkLnK9QWDDqpaIsA-bMwWWSDFu2MUBYwkHTMEzLYGqOe04noqeq1hExBTHBOBdkMXiuFhUq1BU6l-DqEiWxqg82sXt2h-LMnT3046AOYJoRioz75tSUQfGCshWTBnP5uDjd18kKhyv07lhfSJdrPdM5Plyl21hsFf4L_mHCuoFau7gdsPfHPxxjVOcOpBrQzwQ",
        "p": "3Slxg_DwTXJcb6095RoXygQCAZ5RnAvZlno1yhHtnUex_fp7AZ_9nRaO7HX_-SFfGQeutao2TDjDAWU4Vupk8rw9JR0AzZ0N2fvuIAmr_WCsmGpeNqQnev1T7IyEsnh8UMt-n5CafhkikzhEsrmndH6LxOrvRJlsPp6Zv8bUq0k",
        "q": "uKE2dh-cTf6ERF4k4e_jy78GfPYUIaUyoSSJuBzp3Cubk3OCqs6grT8bR_cu0Dm1MZwWmtdqDyI95HrUeq3MP15vMMON8lHTeZu2lmKvwqW7anV5UzhM1iZ7z4yMkuUwFWoBvyY898EXvRD-hdqRxHlSqAZ192zB3pVFJ0s7pFc",
        "dp": "B8PVvXkvJrj2L-GYQ7v3y9r6Kw5g9SahXBwsWUzp19TVlgI-YV85q1NIb1rxQtD-IsXXR3-TanevuRPRt5OBOdiMGQp8pbt26gljYfKU_E9xn-RULHz0-ed9E9gXLKD4VGngpz-PfQ_q29pk5xWHoJp009Qf1HvChixRX59ehik",
        "dq": "CLDmDGduhylc9o7r84rEUVn7pzQ6PF83Y-iBZx5NT-TpnOZKF1pErAMVeKzFEl41DlHHqqBLSM0W1sOFbwTxYWZDm6sI6og5iTbwQGIC3gnJKbi_7k_vJgGHwHxgPaX2PnvP-zyEkDERuf-ry4c_Z11Cq9AqC2yeL6kdKT1cYF8",
        "qi": "3PiqvXQN0zwMeE-sBvZgi289XP9XCQF3VWqPzMKnIgQp7_Tugo6-NZBKCQsMf3HaEGBjTVJs_jcK8-TRXvaKe-7ZMaQj8VfBdYkssbu0NKDDhjJ-GtiseaDVWt7dcH0cfwxgFUHpQh7FoCrjFJ6h6ZEpMF6xmujs4qMpPz8aaI4"
    }"#;

    const RS256_HEADER_B64: &str =
        "eyJhbGciOiJSUzI1NiIsImtpZCI6ImJpbGJvLmJhZ2dpbnNAaG9iYml0b24uZXhhbXBsZSJ9";
    const RS256_SIGNATURE_B64: &str = "MRjdkly7_-oTPTS3AXP41iQIGKa80A0ZmTuV5MEaHoxnW2e5CZ5NlKtainoFmK\
                                       ZopdHM1O2U4mwzJdQx996ivp83xuglII7PNDi84wnB-BDkoBwA78185hX-Es4J\
                                       IwmDLJK3lfWRa-XtL0RnltuYv746iYTh_qHRD68BNt1uSNCrUCTJDt5aAE6x8w\
                                       W1Kt9eRo4QPocSadnHXFxnt8Is9UzpERV0ePPQdLuW3IS_de3xyIrDaLGdjluP\
                                       xUAhb6L2aXic1U12podGU0KLUQSE_oI-ZnmKJ3F4uOZDnd6QZWJushZ41Axf_f\
                                       cIe8u9ipH84ogoree7vjbU5y18kDquDg";

    const EC_JWK: &str = r#"{
        "kty": "EC",
        "kid": "bilbo.baggins@hobbiton.example",
        "use": "sig",
        "crv": "P-521",
        "x": "AHKZLLOsCOzz5cY97ewNUajB957y-C-U88c3v13nmGZx6sYl_oJXu9A5RkTKqjqvjyekWF-7ytDyRXYgCF5cj0Kt",
        "y": "AdymlHvOiLxXkEhayXQnNCvDX4h9htZaCJN34kfmC6pV5OhQHiraVySsUdaQkAgDPrwQrJmbnX9cwlGfP-HqHZR1",
        "d": "AAhRON2r9cqXX1hg-RoI6R1tX5p2rUAYdmpHZoC1XNM56KtscrX6zbKipQrCW9CGZH3T4ubpnoTKLDYJ_fF3_rJt"
    }"#;

    const EC_PUBLIC_JWK: &str = r#"{
        "kty": "EC",
        "kid": "bilbo.baggins@hobbiton.example",
        "use": "sig",
        "crv": "P-521",
        "x": "AHKZLLOsCOzz5cY97ewNUajB957y-C-U88c3v13nmGZx6sYl_oJXu9A5RkTKqjqvjyekWF-7ytDyRXYgCF5cj0Kt",
        "y": "AdymlHvOiLxXkEhayXQnNCvDX4h9htZaCJN34kfmC6pV5OhQHiraVySsUdaQkAgDPrwQrJmbnX9cwlGfP-HqHZR1"
    }"#;

    // the cookbook draft's alternate ES512 value: its signature part
    // decodes to 130 bytes instead of the 132 a P-521 r || s requires
    const ES512_SHORT_SIGNATURE_B64: &str =
        "ALTcqjGDa6yYwNuHJ2y02uyInEmWxlchpTdX8r-1lXZNZ2zMKZG14K4rOC0eCF\
         kDhguX3oM2Eg9Sa8gB4kl4TEQDI5WJ7c4g7A3cmnEdaFpOs7w7RigzIRV2DNwQ\
         57JxB2cy3ImRT3WkJ57SgVijptnNEpV2f2yHoJgpHxDcOOe10Q";
    const ES512_HEADER_B64: &str =
        "eyJhbGciOiJFUzUxMiIsImtpZCI6ImJpbGJvLmJhZ2dpbnNAaG9iYml0b24uZXhhbXBsZSJ9";

    fn payload() -> Vec<u8> {
        b64::decode(PAYLOAD_B64).unwrap()
    }

    fn hmac_compact() -> String {
        format!("{HS256_HEADER_B64}.{PAYLOAD_B64}.{HS256_SIGNATURE_B64}")
    }

    fn rsa_compact() -> String {
        format!("{RS256_HEADER_B64}.{PAYLOAD_B64}.{RS256_SIGNATURE_B64}")
    }

    #[test]
    fn hmac_sha256_reproduces_the_cookbook_value() {
        let key = Key::from_jwk_json(OCT_JWK).unwrap();
        let mut jws = Jws::new();
        jws.set_payload(payload()).unwrap();
        jws.set_algorithm_header_value(Jwa::HS256).unwrap();
        jws.set_key_id_header_value(key.kid().unwrap()).unwrap();
        jws.set_key(key);
        let compact = jws.compact_serialization().unwrap();
        assert_eq!(compact, hmac_compact());
        assert_eq!(jws.state(), JwsState::Signed);

        // deterministic: a second call is byte-identical
        assert_eq!(jws.compact_serialization().unwrap(), compact);
    }

    #[test]
    fn hmac_sha256_verifies_the_cookbook_value() {
        let key = Key::from_jwk_json(OCT_JWK).unwrap();
        let mut jws = Jws::new();
        jws.set_compact_serialization(&hmac_compact()).unwrap();
        assert_eq!(jws.unverified_payload().unwrap(), payload());
        assert_eq!(jws.algorithm_header_value(), Some("HS256"));
        assert_eq!(
            jws.key_id_header_value(),
            Some("018c0ae5-4d9b-471b-bfd6-eef314bc7037")
        );

        jws.set_key(key);
        assert!(jws.verify_signature().unwrap());
        assert_eq!(jws.state(), JwsState::Verified);
        assert_eq!(jws.payload().unwrap(), payload());

        // cached: a repeat call returns the same outcome
        assert!(jws.verify_signature().unwrap());
    }

    #[test]
    fn hmac_verification_with_the_wrong_key_fails() {
        let other = Key::from_jwk_json(
            r#"{"kty":"oct","k":"AyM1SysPpbyDfgZld3umj1qzKObwVMkoqQ-EstJQLr_T-1qS0gZH75aKtMN3Yj0iPS4hcgUuTwjAzZr1Z9CAow"}"#,
        )
        .unwrap();
        let mut jws = Jws::new();
        jws.set_compact_serialization(&hmac_compact()).unwrap();
        jws.set_key(other);
        assert!(!jws.verify_signature().unwrap());
        assert_eq!(jws.state(), JwsState::VerificationFailed);
        assert_err!(jws.payload());

        // a better key clears the cached failure
        jws.set_key(Key::from_jwk_json(OCT_JWK).unwrap());
        assert_eq!(jws.state(), JwsState::CompactSet);
        assert!(jws.verify_signature().unwrap());
    }

    #[test]
    fn rsa_v1_5_reproduces_the_cookbook_value() {
        let key = Key::from_jwk_json(RSA_JWK).unwrap();
        assert!(key.is_private());
        let mut jws = Jws::new();
        jws.set_payload(payload()).unwrap();
        jws.set_algorithm_header_value(Jwa::RS256).unwrap();
        jws.set_key_id_header_value("bilbo.baggins@hobbiton.example")
            .unwrap();
        jws.set_key(key);
        assert_eq!(jws.compact_serialization().unwrap(), rsa_compact());
    }

    #[test]
    fn rsa_v1_5_verifies_the_cookbook_value() {
        // the public half is enough to verify
        let mut jwk: Jwk = serde_json::from_str(RSA_JWK).unwrap();
        jwk.d = None;
        jwk.p = None;
        jwk.q = None;
        jwk.dp = None;
        jwk.dq = None;
        jwk.qi = None;
        let key = Key::from_jwk(&jwk).unwrap();
        assert!(!key.is_private());

        let mut jws = Jws::new();
        jws.set_compact_serialization(&rsa_compact()).unwrap();
        jws.set_key(key);
        assert!(jws.verify_signature().unwrap());
        assert_eq!(jws.payload().unwrap(), payload());
        assert_eq!(jws.algorithm_header_value(), Some("RS256"));
    }

    #[test]
    fn ecdsa_p521_signatures_differ_but_both_verify() {
        let private = Key::from_jwk_json(EC_JWK).unwrap();
        let public = Key::from_jwk_json(EC_PUBLIC_JWK).unwrap();

        let produce = |key: &Key| {
            let mut jws = Jws::new();
            jws.set_payload(payload()).unwrap();
            jws.set_algorithm_header_value(Jwa::ES512).unwrap();
            jws.set_key_id_header_value("bilbo.baggins@hobbiton.example")
                .unwrap();
            jws.set_key(key.clone());
            jws.compact_serialization().unwrap()
        };
        let first = produce(&private);
        let second = produce(&private);
        assert_ne!(first, second);

        for compact in [first, second] {
            let signature_b64 = compact.rsplit('.').next().unwrap();
            assert_eq!(b64::decode(signature_b64).unwrap().len(), 132);

            let mut jws = Jws::new();
            jws.set_compact_serialization(&compact).unwrap();
            jws.set_key(public.clone());
            assert!(jws.verify_signature().unwrap());
        }
    }

    #[test]
    fn ecdsa_p521_rejects_the_short_cookbook_signature() {
        let compact = format!("{ES512_HEADER_B64}.{PAYLOAD_B64}.{ES512_SHORT_SIGNATURE_B64}");
        assert_eq!(b64::decode(ES512_SHORT_SIGNATURE_B64).unwrap().len(), 130);

        let mut jws = Jws::new();
        jws.set_compact_serialization(&compact).unwrap();
        jws.set_key(Key::from_jwk_json(EC_PUBLIC_JWK).unwrap());
        assert!(!jws.verify_signature().unwrap());
    }

    #[test]
    fn tampering_is_detected() {
        let key = Key::from_jwk_json(OCT_JWK).unwrap();

        // flip one bit in the signature
        let mut signature = b64::decode(HS256_SIGNATURE_B64).unwrap();
        signature[0] ^= 0x01;
        let tampered = format!(
            "{HS256_HEADER_B64}.{PAYLOAD_B64}.{}",
            b64::encode(signature)
        );
        let mut jws = Jws::new();
        jws.set_compact_serialization(&tampered).unwrap();
        jws.set_key(key.clone());
        assert!(!jws.verify_signature().unwrap());

        // flip one bit in the payload
        let mut payload_bytes = payload();
        payload_bytes[0] ^= 0x01;
        let tampered = format!(
            "{HS256_HEADER_B64}.{}.{HS256_SIGNATURE_B64}",
            b64::encode(payload_bytes)
        );
        let mut jws = Jws::new();
        jws.set_compact_serialization(&tampered).unwrap();
        jws.set_key(key);
        assert!(!jws.verify_signature().unwrap());
    }

    #[test]
    fn malformed_serializations_are_rejected_up_front() {
        assert_err!(Jws::new().set_compact_serialization("a.b"));
        assert_err!(Jws::new().set_compact_serialization("a.b.c.d"));
        assert_err!(Jws::new().set_compact_serialization(&format!(".{PAYLOAD_B64}.")));

        // empty signature part with a real algorithm
        let err = Jws::new()
            .set_compact_serialization(&format!("{HS256_HEADER_B64}.{PAYLOAD_B64}."))
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedSerialization(CompactIssue::EmptyPart(2))
        ));

        // header that is not a JSON object
        let not_an_object = b64::encode("[1,2,3]");
        let err = Jws::new()
            .set_compact_serialization(&format!("{not_an_object}.{PAYLOAD_B64}.{HS256_SIGNATURE_B64}"))
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedSerialization(CompactIssue::HeaderNotAnObject)
        ));
    }

    #[test]
    fn unsecured_jws_is_gated_behind_policy() {
        let header_b64 = b64::encode(r#"{"alg":"none"}"#);
        let compact = format!("{header_b64}.{PAYLOAD_B64}.");

        let mut jws = Jws::new();
        jws.set_compact_serialization(&compact).unwrap();
        assert_eq!(jws.unverified_payload().unwrap(), payload());
        assert!(!jws.verify_signature().unwrap());

        let mut jws = Jws::new();
        jws.set_none_algorithm_allowed(true);
        jws.set_compact_serialization(&compact).unwrap();
        assert!(jws.verify_signature().unwrap());
        assert_eq!(jws.payload().unwrap(), payload());
    }

    #[test]
    fn unsecured_jws_can_be_produced() {
        let mut jws = Jws::new();
        jws.set_payload(payload()).unwrap();
        jws.set_algorithm_header_value(Jwa::None).unwrap();
        let compact = jws.compact_serialization().unwrap();
        assert!(compact.ends_with('.'));
    }

    #[test]
    fn unknown_received_algorithm_is_an_error_not_false() {
        let header_b64 = b64::encode(r#"{"alg":"PS256"}"#);
        let compact = format!("{header_b64}.{PAYLOAD_B64}.{HS256_SIGNATURE_B64}");
        let mut jws = Jws::new();
        jws.set_compact_serialization(&compact).unwrap();
        jws.set_key(Key::from_jwk_json(OCT_JWK).unwrap());
        let err = jws.verify_signature().unwrap_err();
        assert!(matches!(err, Error::UnknownAlgorithm(alg) if alg == "PS256"));
    }

    #[test]
    fn the_two_paths_do_not_mix() {
        // sign-path accessors after loading a compact serialization
        let mut jws = Jws::new();
        jws.set_compact_serialization(&hmac_compact()).unwrap();
        assert_err!(jws.set_payload(b"new".to_vec()));
        assert_err!(jws.set_algorithm_header_value(Jwa::HS256));
        assert_err!(jws.compact_serialization());

        // verify-path accessors on the sign path
        let mut jws = Jws::new();
        jws.set_payload(b"data".to_vec()).unwrap();
        assert_err!(jws.verify_signature());
        assert_err!(jws.unverified_payload());
        assert_err!(jws.payload());
        assert_err!(jws.set_compact_serialization(&hmac_compact()));
    }

    #[test]
    fn signing_without_inputs_is_incomplete() {
        let mut jws = Jws::new();
        assert_err!(jws.compact_serialization());

        jws.set_payload(b"data".to_vec()).unwrap();
        let err = jws.compact_serialization().unwrap_err();
        assert!(matches!(err, Error::IncompleteState("alg header")));

        jws.set_algorithm_header_value(Jwa::HS256).unwrap();
        let err = jws.compact_serialization().unwrap_err();
        assert!(matches!(err, Error::IncompleteState("key")));
    }

    #[test]
    fn custom_headers_round_trip() {
        let key = Key::from_jwk_json(OCT_JWK).unwrap();
        let mut jws = Jws::new();
        jws.set_payload(b"{}".to_vec()).unwrap();
        jws.set_algorithm_header_value(Jwa::HS256).unwrap();
        jws.set_header("typ", "JWT").unwrap();
        jws.set_header("cty", "json").unwrap();
        jws.set_key(key.clone());
        let compact = jws.compact_serialization().unwrap();

        let mut received = Jws::new();
        received.set_compact_serialization(&compact).unwrap();
        assert_eq!(
            received.header_value("typ"),
            Some(&Value::String("JWT".to_owned()))
        );
        assert_eq!(
            received.header_value("cty"),
            Some(&Value::String("json".to_owned()))
        );
        received.set_key(key);
        assert!(received.verify_signature().unwrap());
    }
}

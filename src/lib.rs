//! Compact JSON Web Signature (JWS) production and verification.
//!
//! This includes but is not limited to:
//! - Parsing JSON Web Keys (JWK) into usable key material
//! - Producing compact serializations with the registered signature algorithms
//! - Consuming and verifying received compact serializations
//!
//! The entry point for most users is [`jose::Jws`], a single-use
//! orchestrator that walks one signing or one verification operation
//! from input collection to outcome.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(test), warn(clippy::print_stdout, clippy::dbg_macro))]

pub mod error;
pub mod jose;

pub use error::Error;

pub mod dep {
    //! Dependencies of this crate.
    //!
    //! Exported for your convenience

    pub mod aws_lc_rs {
        //! Re-export of the [`aws-lc-rs`] crate.
        //!
        //! [`aws-lc-rs`]: https://docs.rs/aws-lc-rs

        #[doc(inline)]
        pub use aws_lc_rs::*;
    }
}

#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![doc = document_features::document_features!()]

extern crate alloc;

pub mod error;
pub mod fingerprint;
mod identifier;
pub mod keys;
pub(crate) mod serialization;
mod traits;

#[cfg(any(test, feature = "test-impl"))]
pub mod tests;

#[cfg(feature = "test-impl")]
pub mod benches;

pub use error::{Error, Mismatch};
pub use fingerprint::Fingerprint;
pub use identifier::TrusteeIndex;
pub use keys::{
    commitment::{Commitment, EncryptedShare},
    reconstruct,
    setup::{SetupSession, SetupState},
    CoefficientCommitment, PublicCoefficients, ThresholdConfig, ThresholdPrivateKeyShare,
    ThresholdPublicKey, VerifyingShare,
};
pub use traits::{Ciphertext, Cryptosystem, Element, PrivateKey, PublicKey, Scalar};

#[cfg(feature = "internals")]
pub use keys::{
    compute_lagrange_coefficient, evaluate_polynomial, evaluate_vss, sum_commitments,
    verify_share,
};

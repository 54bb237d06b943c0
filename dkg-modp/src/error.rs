//! MODP ElGamal errors

use thiserror::Error;

use dkg_core::Mismatch;

/// An error raised by the MODP ElGamal cryptosystem.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ModpError {
    /// The modulus is not of the form 2q + 1 with q odd.
    #[error("The modulus is not a safe prime candidate.")]
    InvalidModulus,
    /// The generator does not generate the order-q subgroup.
    #[error("The generator is not in the prime-order subgroup.")]
    InvalidGenerator,
    /// A value is not an element of the order-q subgroup.
    #[error("Not an element of the prime-order subgroup.")]
    MalformedElement,
    /// A key or ciphertext belongs to other group parameters.
    #[error("Group parameters differ.")]
    GroupMismatch,
    /// A ciphertext component is outside of `1..p`.
    #[error("Malformed ciphertext.")]
    MalformedCiphertext,
    /// A plaintext scalar is not smaller than q.
    #[error("Plaintext is out of range.")]
    PlaintextOutOfRange,
    /// Zero has no multiplicative inverse.
    #[error("Zero scalar cannot be inverted.")]
    InvalidZeroScalar,
}

impl From<ModpError> for dkg_core::Error {
    fn from(e: ModpError) -> Self {
        match e {
            ModpError::GroupMismatch => dkg_core::Error::ConfigMismatch(Mismatch::Parameters),
            ModpError::InvalidModulus
            | ModpError::InvalidGenerator
            | ModpError::MalformedElement
            | ModpError::MalformedCiphertext => dkg_core::Error::MalformedElement,
            ModpError::PlaintextOutOfRange => dkg_core::Error::Encryption,
            ModpError::InvalidZeroScalar => dkg_core::Error::MalformedScalar,
        }
    }
}

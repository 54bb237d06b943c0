//! DKG Error types

use thiserror::Error;

use crate::{keys::setup::SetupState, TrusteeIndex};

/// An error related to the threshold key generation.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum Error {
    /// threshold is invalid
    #[error("threshold must be at least 1 and not larger than num_trustees")]
    InvalidThreshold,
    /// num_trustees is invalid
    #[error("num_trustees must be at least 1")]
    InvalidNumTrustees,
    /// The scalar field is too small to give every trustee a distinct,
    /// nonzero evaluation point.
    #[error("The scalar field cannot hold {num_trustees} distinct nonzero trustee indices.")]
    TooManyTrustees {
        /// The requested number of trustees.
        num_trustees: u16,
    },
    /// A trustee index maps to the zero scalar.
    #[error("Trustee index {index} maps to the zero scalar.")]
    InvalidZeroScalar {
        /// The offending index.
        index: TrusteeIndex,
    },
    /// A trustee index is zero or larger than the number of trustees.
    #[error("Trustee index {index} is outside of 1..={num_trustees}.")]
    IndexOutOfRange {
        /// The rejected index.
        index: u16,
        /// The number of trustees in the session.
        num_trustees: u16,
    },
    /// A value was already registered for this trustee index.
    #[error("A value was already provided for trustee {index}.")]
    DuplicateIndex {
        /// The index that was registered twice.
        index: TrusteeIndex,
    },
    /// An incoming key or commitment is not compatible with the session.
    #[error("Incompatible input: {0}")]
    ConfigMismatch(Mismatch),
    /// The Feldman check on a commitment failed. The session can't be used
    /// anymore.
    #[error("The commitment of trustee {culprit} failed verification.")]
    CommitmentVerification {
        /// The trustee whose commitment is inconsistent.
        culprit: TrusteeIndex,
    },
    /// A private key share does not match the verifying share published for
    /// its index.
    #[error("The private key share of trustee {index} does not match its verifying share.")]
    IncorrectPrivateShare {
        /// The index the share claims.
        index: TrusteeIndex,
    },
    /// The operation is not allowed in the current session state.
    #[error("Operation not allowed in state {state:?}.")]
    InvalidState {
        /// The state the session was in when the call was made.
        state: SetupState,
    },
    /// The cryptosystem failed to encrypt a share.
    #[error("Share encryption failed.")]
    Encryption,
    /// The encoding of a group element was malformed.
    #[error("Malformed group element encoding.")]
    MalformedElement,
    /// The encoding of a scalar was malformed.
    #[error("Malformed scalar encoding.")]
    MalformedScalar,
    /// Incorrect number of private key shares.
    #[error("Incorrect number of private key shares.")]
    IncorrectNumberOfShares,
    /// The same trustee index appears in more than one share.
    #[error("Duplicated trustee index.")]
    DuplicatedIdentifier,
    /// Error serializing value.
    #[error("Error serializing value.")]
    SerializationError,
    /// Error deserializing value.
    #[error("Error deserializing value.")]
    DeserializationError,
}

/// What did not match in a [`Error::ConfigMismatch`].
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum Mismatch {
    /// Different cryptosystem parameters.
    #[error("cryptosystem parameters differ")]
    Parameters,
    /// Different number of trustees.
    #[error("expected {expected} trustees, found {found}")]
    NumTrustees {
        /// The session's value.
        expected: u16,
        /// The incoming value.
        found: u16,
    },
    /// Different threshold.
    #[error("expected threshold {expected}, found {found}")]
    Threshold {
        /// The session's value.
        expected: u16,
        /// The incoming value.
        found: u16,
    },
    /// Wrong number of public coefficients in a commitment.
    #[error("expected {expected} public coefficients, found {found}")]
    PublicCoefficients {
        /// The threshold.
        expected: usize,
        /// The commitment's length.
        found: usize,
    },
    /// Wrong number of encrypted shares in a commitment.
    #[error("expected {expected} encrypted shares, found {found}")]
    EncryptedShares {
        /// The number of trustees.
        expected: usize,
        /// The commitment's length.
        found: usize,
    },
    /// No personal public key for this trustee.
    #[error("no public key for trustee {0}")]
    MissingPublicKey(TrusteeIndex),
    /// The private key does not belong to the trustee it was given for.
    #[error("private key does not match the public key of trustee {0}")]
    PrivateKey(TrusteeIndex),
}

impl From<Mismatch> for Error {
    fn from(mismatch: Mismatch) -> Self {
        Error::ConfigMismatch(mismatch)
    }
}

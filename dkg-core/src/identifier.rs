//! Trustee identifiers

use core::fmt::{self, Debug, Display};

use crate::{Cryptosystem, Error, Scalar};

/// A trustee index.
///
/// The index is the x-coordinate at which every secret polynomial is
/// evaluated for this trustee. It MUST NOT be zero, as f(0) is the shared
/// secret. Within a session of `n` trustees the valid indices are `1..=n`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct TrusteeIndex(u16);

impl TrusteeIndex {
    /// Create a new index, failing if it is zero.
    pub fn new(index: u16) -> Result<Self, Error> {
        if index == 0 {
            Err(Error::IndexOutOfRange {
                index,
                num_trustees: 0,
            })
        } else {
            Ok(Self(index))
        }
    }

    /// Get the index as an integer.
    pub fn get(&self) -> u16 {
        self.0
    }

    /// Map the index into the scalar field of the cryptosystem, failing if
    /// it reduces to zero.
    #[cfg_attr(feature = "internals", visibility::make(pub))]
    pub(crate) fn to_scalar<C: Cryptosystem>(self, cryptosystem: &C) -> Result<Scalar<C>, Error> {
        let scalar = cryptosystem.scalar_from_u16(self.0);
        if scalar == cryptosystem.zero() {
            return Err(Error::InvalidZeroScalar { index: self });
        }
        Ok(scalar)
    }
}

impl TryFrom<u16> for TrusteeIndex {
    type Error = Error;

    fn try_from(index: u16) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl From<TrusteeIndex> for u16 {
    fn from(index: TrusteeIndex) -> Self {
        index.0
    }
}

impl Debug for TrusteeIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("TrusteeIndex").field(&self.0).finish()
    }
}

impl Display for TrusteeIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Return the indices of all trustees (1 to num_trustees, inclusive).
pub(crate) fn all_indices(num_trustees: u16) -> impl Iterator<Item = TrusteeIndex> {
    (1..=num_trustees).map(TrusteeIndex)
}

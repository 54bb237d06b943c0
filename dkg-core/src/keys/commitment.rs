//! Trustee commitments.
//!
//! Each trustee samples a secret polynomial P_i of degree `threshold - 1`,
//! publishes g raised to each of its coefficients and, for every trustee j
//! (itself included), the evaluation P_i(j) encrypted under j's personal
//! public key. This bundle is a [`Commitment`]. It holds nothing secret in
//! the clear and can be broadcast publicly.

use alloc::{collections::BTreeMap, vec::Vec};

use derive_getters::Getters;
use rand_core::{CryptoRng, RngCore};

use crate::{
    serialization::Header, Ciphertext, Cryptosystem, Error, Mismatch, PublicKey, TrusteeIndex,
};

#[cfg(feature = "serialization")]
use crate::serialization::{Deserialize, Serialize};

use super::{PublicCoefficients, SecretPolynomial, ThresholdConfig};

/// One evaluation P_i(j) of a trustee's polynomial, encrypted under the
/// personal public key of trustee j.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Cryptosystem")]
#[serde(transparent)]
pub struct EncryptedShare<C: Cryptosystem>(pub(crate) Ciphertext<C>);

impl<C> EncryptedShare<C>
where
    C: Cryptosystem,
{
    /// Create a new [`EncryptedShare`] from a ciphertext.
    pub fn new(ciphertext: Ciphertext<C>) -> Self {
        Self(ciphertext)
    }

    /// The underlying ciphertext.
    pub fn ciphertext(&self) -> &Ciphertext<C> {
        &self.0
    }
}

/// The publishable contribution of one trustee to the threshold setup.
///
/// Immutable once built. Every other participant ingests it with
/// [`crate::keys::setup::SetupSession::add_trustee_commitment`].
#[derive(Clone, Debug, PartialEq, Eq, Getters, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Cryptosystem")]
#[serde(deny_unknown_fields)]
pub struct Commitment<C: Cryptosystem> {
    /// Serialization header
    #[getter(skip)]
    pub(crate) header: Header,
    /// The cryptosystem used by this commitment. Only commitments over equal
    /// parameters can be combined.
    pub(crate) cryptosystem: C,
    /// Total number of trustees (the n in "k of n").
    pub(crate) num_trustees: u16,
    /// Minimum number of trustees required to decrypt (the k in "k of n").
    pub(crate) threshold: u16,
    /// g^{a_l} for every coefficient a_l of the secret polynomial.
    pub(crate) public_coefficients: PublicCoefficients<C>,
    /// P(j) encrypted to trustee j, at position j - 1.
    pub(crate) encrypted_shares: Vec<EncryptedShare<C>>,
}

impl<C> Commitment<C>
where
    C: Cryptosystem,
{
    /// Samples a fresh secret polynomial and builds the commitment to it.
    ///
    /// `public_keys` must contain the personal public key of every trustee,
    /// under exactly the indices `1..=num_trustees`, all over `cryptosystem`.
    ///
    /// The polynomial is wiped before this function returns, on success and
    /// on error alike; only the returned commitment survives.
    pub fn build<R: RngCore + CryptoRng>(
        cryptosystem: &C,
        config: ThresholdConfig,
        public_keys: &BTreeMap<TrusteeIndex, PublicKey<C>>,
        rng: &mut R,
    ) -> Result<Self, Error> {
        config.check_cryptosystem(cryptosystem)?;
        if public_keys.len() != config.num_trustees as usize {
            return Err(Mismatch::NumTrustees {
                expected: config.num_trustees,
                found: public_keys.len().try_into().unwrap_or(u16::MAX),
            }
            .into());
        }
        let recipients = config
            .indices()
            .map(|j| {
                let key = public_keys.get(&j).ok_or(Mismatch::MissingPublicKey(j))?;
                if C::public_key_parameters(key) != cryptosystem {
                    return Err(Mismatch::Parameters);
                }
                Ok((j, key))
            })
            .collect::<Result<Vec<_>, Mismatch>>()?;

        let polynomial = SecretPolynomial::generate(cryptosystem, config.threshold, rng);
        let public_coefficients = polynomial.commit();

        let mut encrypted_shares = Vec::with_capacity(recipients.len());
        for (j, key) in recipients {
            let share = polynomial.evaluate(j)?;
            encrypted_shares.push(EncryptedShare(cryptosystem.encrypt(key, &share, rng)?));
        }

        Ok(Self {
            header: Header::default(),
            cryptosystem: cryptosystem.clone(),
            num_trustees: config.num_trustees,
            threshold: config.threshold,
            public_coefficients,
            encrypted_shares,
        })
    }

    /// The share addressed to trustee `index`, if any.
    pub fn encrypted_share(&self, index: TrusteeIndex) -> Option<&EncryptedShare<C>> {
        self.encrypted_shares.get(index.get() as usize - 1)
    }

    /// Checks that this commitment was built for the given session
    /// parameters and that every public coefficient is a subgroup element.
    pub(crate) fn check_compatible(
        &self,
        cryptosystem: &C,
        config: &ThresholdConfig,
    ) -> Result<(), Error> {
        if self.cryptosystem != *cryptosystem {
            return Err(Mismatch::Parameters.into());
        }
        if self.num_trustees != config.num_trustees {
            return Err(Mismatch::NumTrustees {
                expected: config.num_trustees,
                found: self.num_trustees,
            }
            .into());
        }
        if self.threshold != config.threshold {
            return Err(Mismatch::Threshold {
                expected: config.threshold,
                found: self.threshold,
            }
            .into());
        }
        if self.public_coefficients.len() != config.threshold as usize {
            return Err(Mismatch::PublicCoefficients {
                expected: config.threshold as usize,
                found: self.public_coefficients.len(),
            }
            .into());
        }
        if self.encrypted_shares.len() != config.num_trustees as usize {
            return Err(Mismatch::EncryptedShares {
                expected: config.num_trustees as usize,
                found: self.encrypted_shares.len(),
            }
            .into());
        }
        if !self
            .public_coefficients
            .coefficients()
            .iter()
            .all(|c| cryptosystem.is_valid_element(c.value()))
        {
            return Err(Error::MalformedElement);
        }
        Ok(())
    }
}

#[cfg(feature = "serialization")]
impl<C> Commitment<C>
where
    C: Cryptosystem,
{
    /// Serialize the struct into a Vec.
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        Serialize::serialize(&self)
    }

    /// Deserialize the struct from a slice of bytes.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        Deserialize::deserialize(bytes)
    }
}

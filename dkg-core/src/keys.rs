//! Threshold keys, secret polynomials and Feldman commitments
#![allow(clippy::type_complexity)]

use core::iter;

use alloc::{
    collections::{BTreeMap, BTreeSet},
    fmt::{self, Debug},
    vec::Vec,
};

use derive_getters::Getters;
use rand_core::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::{
    fingerprint::{Fingerprint, Transcript},
    identifier::all_indices,
    serialization::Header,
    Cryptosystem, Element, Error, Mismatch, Scalar, TrusteeIndex,
};

#[cfg(feature = "serialization")]
use crate::serialization::{Deserialize, Serialize};

pub mod commitment;
pub mod setup;

/// The "k of n" parameters of a threshold scheme.
///
/// `num_trustees` (n) is the number of trustees taking part in the setup,
/// `threshold` (k) the number of them required to decrypt.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Getters)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct ThresholdConfig {
    num_trustees: u16,
    threshold: u16,
}

#[derive(serde::Deserialize)]
struct RawConfig {
    num_trustees: u16,
    threshold: u16,
}

impl TryFrom<RawConfig> for ThresholdConfig {
    type Error = Error;

    fn try_from(raw: RawConfig) -> Result<Self, Error> {
        Self::new(raw.num_trustees, raw.threshold)
    }
}

impl ThresholdConfig {
    /// Create a new [`ThresholdConfig`], checking that
    /// `1 <= threshold <= num_trustees`.
    pub fn new(num_trustees: u16, threshold: u16) -> Result<Self, Error> {
        if num_trustees < 1 {
            return Err(Error::InvalidNumTrustees);
        }
        if threshold < 1 || threshold > num_trustees {
            return Err(Error::InvalidThreshold);
        }
        Ok(Self {
            num_trustees,
            threshold,
        })
    }

    /// Checks that `index` is one of `1..=num_trustees`.
    pub fn check_index(&self, index: u16) -> Result<TrusteeIndex, Error> {
        if index == 0 || index > self.num_trustees {
            return Err(Error::IndexOutOfRange {
                index,
                num_trustees: self.num_trustees,
            });
        }
        TrusteeIndex::new(index)
    }

    /// Returns the indices `1..=num_trustees`.
    pub fn indices(&self) -> impl Iterator<Item = TrusteeIndex> {
        all_indices(self.num_trustees)
    }

    /// Checks that the scalar field of `cryptosystem` gives every index in
    /// `1..=num_trustees` a distinct, nonzero evaluation point.
    ///
    /// A trustee whose index reduces to zero would be dealt the joint secret.
    pub fn check_cryptosystem<C: Cryptosystem>(&self, cryptosystem: &C) -> Result<(), Error> {
        let too_many = Error::TooManyTrustees {
            num_trustees: self.num_trustees,
        };
        let mut points = BTreeSet::new();
        for index in self.indices() {
            let point = index
                .to_scalar(cryptosystem)
                .map_err(|_| too_many.clone())?;
            if !points.insert(cryptosystem.serialize_scalar(&point)) {
                return Err(too_many);
            }
        }
        Ok(())
    }
}

/// A trustee's secret polynomial of degree `threshold - 1`.
///
/// The constant term is the trustee's contribution to the joint private key.
///
/// # Security
///
/// This value MUST NOT leave the trustee's process. It is never serialized,
/// is redacted from `Debug` output, and its coefficients are overwritten
/// when it is dropped.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct SecretPolynomial<C: Cryptosystem> {
    cryptosystem: C,
    /// These are (a_0, ..., a_{k−1}) which define the polynomial P(x).
    pub(crate) coefficients: Vec<Scalar<C>>,
}

impl<C> SecretPolynomial<C>
where
    C: Cryptosystem,
{
    /// Samples `threshold` random coefficients.
    pub(crate) fn generate<R: RngCore + CryptoRng>(
        cryptosystem: &C,
        threshold: u16,
        rng: &mut R,
    ) -> Self {
        let coefficients = iter::repeat_with(|| cryptosystem.random_scalar(rng))
            .take(threshold as usize)
            .collect();
        Self {
            cryptosystem: cryptosystem.clone(),
            coefficients,
        }
    }

    /// Evaluates P(index).
    pub(crate) fn evaluate(&self, index: TrusteeIndex) -> Result<Zeroizing<Scalar<C>>, Error> {
        Ok(Zeroizing::new(evaluate_polynomial(
            &self.cryptosystem,
            index,
            &self.coefficients,
        )?))
    }

    /// Computes the Feldman commitment g^{a_l} to every coefficient.
    pub(crate) fn commit(&self) -> PublicCoefficients<C> {
        PublicCoefficients(
            self.coefficients
                .iter()
                .map(|c| CoefficientCommitment::new(self.cryptosystem.exponentiate_generator(c)))
                .collect(),
        )
    }
}

impl<C> Debug for SecretPolynomial<C>
where
    C: Cryptosystem,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretPolynomial")
            .field("degree", &self.coefficients.len().saturating_sub(1))
            .field("coefficients", &"<redacted>")
            .finish()
    }
}

impl<C> Zeroize for SecretPolynomial<C>
where
    C: Cryptosystem,
{
    fn zeroize(&mut self) {
        for c in self.coefficients.iter_mut() {
            c.zeroize();
        }
    }
}

impl<C> Drop for SecretPolynomial<C>
where
    C: Cryptosystem,
{
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<C> ZeroizeOnDrop for SecretPolynomial<C> where C: Cryptosystem {}

/// Evaluate the polynomial with the given coefficients (constant term first)
/// at the point x=index using Horner's method.
#[cfg_attr(feature = "internals", visibility::make(pub))]
pub(crate) fn evaluate_polynomial<C: Cryptosystem>(
    cryptosystem: &C,
    index: TrusteeIndex,
    coefficients: &[Scalar<C>],
) -> Result<Scalar<C>, Error> {
    let x = index.to_scalar(cryptosystem)?;
    let mut value = cryptosystem.zero();
    for coeff in coefficients.iter().rev() {
        value = cryptosystem.mul(&value, &x);
        value = cryptosystem.add(&value, coeff);
    }
    Ok(value)
}

/// A group element that is a commitment to one coefficient of a secret
/// polynomial.
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Cryptosystem")]
#[serde(transparent)]
pub struct CoefficientCommitment<C: Cryptosystem>(pub(crate) Element<C>);

impl<C> CoefficientCommitment<C>
where
    C: Cryptosystem,
{
    /// Create a new CoefficientCommitment.
    #[cfg_attr(feature = "internals", visibility::make(pub))]
    pub(crate) fn new(value: Element<C>) -> Self {
        Self(value)
    }

    /// Returns inner element value
    pub fn value(&self) -> &Element<C> {
        &self.0
    }
}

impl<C> Debug for CoefficientCommitment<C>
where
    C: Cryptosystem,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CoefficientCommitment").field(&self.0).finish()
    }
}

/// The public coefficients of a trustee's secret polynomial: g raised to each
/// coefficient, constant term first.
///
/// Recipients use these to check the share they received (Feldman's VSS);
/// the first entry is the trustee's partial public key, and the product of
/// all trustees' partial public keys is the joint public key.
///
/// Note that trustees MUST be assured that they have the *same* public
/// coefficients as every other trustee; comparing the setup
/// [`Fingerprint`] out of band is how this is done.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Cryptosystem")]
pub struct PublicCoefficients<C: Cryptosystem>(pub(crate) Vec<CoefficientCommitment<C>>);

impl<C> PublicCoefficients<C>
where
    C: Cryptosystem,
{
    /// Create a new PublicCoefficients.
    #[cfg_attr(feature = "internals", visibility::make(pub))]
    pub(crate) fn new(coefficients: Vec<CoefficientCommitment<C>>) -> Self {
        Self(coefficients)
    }

    /// Returns the coefficient commitments.
    pub fn coefficients(&self) -> &[CoefficientCommitment<C>] {
        &self.0
    }

    /// The commitment to the constant term, i.e. this trustee's contribution
    /// to the joint public key.
    pub fn partial_public_key(&self) -> Option<&Element<C>> {
        self.0.first().map(CoefficientCommitment::value)
    }

    /// Returns the number of committed coefficients (the threshold).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no coefficients at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Evaluates the right-hand side of the VSS verification equation, namely
/// ∏^{k−1}_{l=0} φ_l^{j^l mod q} using `index` as `j` and the public
/// coefficients as φ.
///
/// This is also used to derive verifying shares from the summed commitments.
#[cfg_attr(feature = "internals", visibility::make(pub))]
pub(crate) fn evaluate_vss<C: Cryptosystem>(
    cryptosystem: &C,
    index: TrusteeIndex,
    commitment: &PublicCoefficients<C>,
) -> Result<Element<C>, Error> {
    let j = index.to_scalar(cryptosystem)?;

    let (_, result) = commitment.0.iter().fold(
        (cryptosystem.scalar_from_u16(1), cryptosystem.identity()),
        |(j_to_the_l, product_so_far), comm_l| {
            let term = cryptosystem.exponentiate(comm_l.value(), &j_to_the_l);
            (
                cryptosystem.mul(&j, &j_to_the_l),
                cryptosystem.multiply(&product_so_far, &term),
            )
        },
    );
    Ok(result)
}

/// Checks a decrypted share P_dealer(recipient) against the dealer's public
/// coefficients: g^{P(j)} ≟ ∏^{k−1}_{l=0} φ_l^{j^l}.
#[cfg_attr(feature = "internals", visibility::make(pub))]
pub(crate) fn verify_share<C: Cryptosystem>(
    cryptosystem: &C,
    dealer: TrusteeIndex,
    recipient: TrusteeIndex,
    share: &Scalar<C>,
    commitment: &PublicCoefficients<C>,
) -> Result<(), Error> {
    let f_result = cryptosystem.exponentiate_generator(share);
    let result = evaluate_vss(cryptosystem, recipient, commitment)?;

    if f_result != result {
        return Err(Error::CommitmentVerification { culprit: dealer });
    }
    Ok(())
}

/// Multiply the public coefficients from all trustees, coefficient by
/// coefficient, into the commitment to the joint polynomial.
#[cfg_attr(feature = "internals", visibility::make(pub))]
pub(crate) fn sum_commitments<C: Cryptosystem>(
    cryptosystem: &C,
    commitments: &[&PublicCoefficients<C>],
) -> Result<PublicCoefficients<C>, Error> {
    let len = commitments
        .first()
        .ok_or(Error::IncorrectNumberOfShares)?
        .len();
    let mut group_commitment = alloc::vec![CoefficientCommitment::new(cryptosystem.identity()); len];
    for commitment in commitments {
        if commitment.len() != len {
            return Err(Mismatch::PublicCoefficients {
                expected: len,
                found: commitment.len(),
            }
            .into());
        }
        for (c, other) in group_commitment.iter_mut().zip(commitment.0.iter()) {
            *c = CoefficientCommitment::new(cryptosystem.multiply(c.value(), other.value()));
        }
    }
    Ok(PublicCoefficients(group_commitment))
}

/// A public group element g^{s_j} matching trustee j's private key share.
///
/// Anyone holding the commitment set can compute the verifying share of any
/// trustee; a threshold decryption protocol uses it to check that trustee's
/// partial decryptions.
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Cryptosystem")]
#[serde(transparent)]
pub struct VerifyingShare<C: Cryptosystem>(pub(crate) Element<C>);

impl<C> VerifyingShare<C>
where
    C: Cryptosystem,
{
    /// Get the inner element.
    pub fn to_element(&self) -> &Element<C> {
        &self.0
    }

    /// Computes the verifying share of `index` given the joint commitment
    /// (the coefficient-wise product of every trustee's public coefficients).
    #[cfg_attr(feature = "internals", visibility::make(pub))]
    pub(crate) fn from_commitment(
        cryptosystem: &C,
        index: TrusteeIndex,
        commitment: &PublicCoefficients<C>,
    ) -> Result<Self, Error> {
        // Y_j = ∏_{i=1}^n ∏_{l=0}^{k−1} φ_{il}^{j^l}
        //     = ∏_{l=0}^{k−1} (∏_{i=1}^n φ_{il})^{j^l}
        Ok(Self(evaluate_vss(cryptosystem, index, commitment)?))
    }
}

impl<C> Debug for VerifyingShare<C>
where
    C: Cryptosystem,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("VerifyingShare").field(&self.0).finish()
    }
}

/// The joint threshold ElGamal public key.
///
/// Anyone can encrypt to this key; decrypting requires `threshold` of the
/// trustees. It also carries the verifying share of every trustee.
#[derive(Clone, Debug, PartialEq, Eq, Getters, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Cryptosystem")]
#[serde(deny_unknown_fields)]
pub struct ThresholdPublicKey<C: Cryptosystem> {
    /// Serialization header
    #[getter(skip)]
    pub(crate) header: Header,
    /// The cryptosystem parameters the key belongs to.
    pub(crate) cryptosystem: C,
    /// The (n, k) parameters of the scheme.
    pub(crate) config: ThresholdConfig,
    /// The joint key, ∏ g^{a_{i0}}.
    pub(crate) element: Element<C>,
    /// The verifying shares g^{s_j} of all trustees.
    pub(crate) verifying_shares: BTreeMap<TrusteeIndex, VerifyingShare<C>>,
}

impl<C> ThresholdPublicKey<C>
where
    C: Cryptosystem,
{
    /// Combines a complete commitment set (indexed `1..=num_trustees`) into
    /// the joint public key.
    ///
    /// This is useful in scenarios where the commitments are published
    /// somewhere and it's desirable to recreate the public key from them.
    pub fn from_commitments(
        cryptosystem: &C,
        config: ThresholdConfig,
        commitments: &BTreeMap<TrusteeIndex, commitment::Commitment<C>>,
    ) -> Result<Self, Error> {
        if commitments.len() != config.num_trustees as usize
            || commitments.keys().copied().ne(config.indices())
        {
            return Err(Error::IncorrectNumberOfShares);
        }
        let public_coefficients: Vec<_> = commitments
            .values()
            .map(|c| c.public_coefficients())
            .collect();
        let group_commitment = sum_commitments(cryptosystem, &public_coefficients)?;

        // The product of the constant-term commitments is the constant term
        // of the summed commitment.
        let element = group_commitment
            .partial_public_key()
            .ok_or(Error::IncorrectNumberOfShares)?
            .clone();
        let verifying_shares = config
            .indices()
            .map(|j| {
                let share = VerifyingShare::from_commitment(cryptosystem, j, &group_commitment)?;
                Ok::<_, Error>((j, share))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(Self {
            header: Header::default(),
            cryptosystem: cryptosystem.clone(),
            config,
            element,
            verifying_shares,
        })
    }

    /// Checks a private key share against this key's verifying shares.
    pub fn verify_private_share(&self, share: &ThresholdPrivateKeyShare<C>) -> Result<(), Error> {
        let expected = self
            .verifying_shares
            .get(&share.index)
            .ok_or(Error::IndexOutOfRange {
                index: share.index.get(),
                num_trustees: self.config.num_trustees,
            })?;
        if share.verifying_share(&self.cryptosystem) != *expected {
            return Err(Error::IncorrectPrivateShare { index: share.index });
        }
        Ok(())
    }

    /// A SHA-256 digest of the key, for comparing it out of band.
    pub fn fingerprint(&self) -> Fingerprint {
        let cs = &self.cryptosystem;
        let mut transcript = Transcript::new(b"dkg-core/public-key-fingerprint/v1");
        transcript.append_u16(self.config.num_trustees);
        transcript.append_u16(self.config.threshold);
        transcript.append_bytes(&cs.serialize_parameters());
        transcript.append_bytes(&cs.serialize_element(&self.element));
        for (index, share) in &self.verifying_shares {
            transcript.append_u16(index.get());
            transcript.append_bytes(&cs.serialize_element(share.to_element()));
        }
        transcript.finalize()
    }
}

#[cfg(feature = "serialization")]
impl<C> ThresholdPublicKey<C>
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

/// A trustee's share of the joint private key: s_j = Σ_i P_i(j).
///
/// # Security
///
/// This is secret; it is redacted from `Debug` output and wiped on drop.
#[derive(Clone, PartialEq, Eq, Getters, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Cryptosystem")]
#[serde(deny_unknown_fields)]
pub struct ThresholdPrivateKeyShare<C: Cryptosystem> {
    /// Serialization header
    #[getter(skip)]
    pub(crate) header: Header,
    /// The trustee this share belongs to.
    pub(crate) index: TrusteeIndex,
    /// The (n, k) parameters of the scheme.
    pub(crate) config: ThresholdConfig,
    /// The share of the joint secret. This is secret.
    pub(crate) share: Scalar<C>,
}

impl<C> ThresholdPrivateKeyShare<C>
where
    C: Cryptosystem,
{
    #[cfg_attr(feature = "internals", visibility::make(pub))]
    pub(crate) fn new(index: TrusteeIndex, config: ThresholdConfig, share: Scalar<C>) -> Self {
        Self {
            header: Header::default(),
            index,
            config,
            share,
        }
    }

    /// g^{s_j}
    pub fn verifying_share(&self, cryptosystem: &C) -> VerifyingShare<C> {
        VerifyingShare(cryptosystem.exponentiate_generator(&self.share))
    }
}

#[cfg(feature = "serialization")]
impl<C> ThresholdPrivateKeyShare<C>
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

impl<C> Debug for ThresholdPrivateKeyShare<C>
where
    C: Cryptosystem,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThresholdPrivateKeyShare")
            .field("index", &self.index)
            .field("config", &self.config)
            .field("share", &"<redacted>")
            .finish()
    }
}

impl<C> Zeroize for ThresholdPrivateKeyShare<C>
where
    C: Cryptosystem,
{
    fn zeroize(&mut self) {
        self.share.zeroize();
    }
}

impl<C> Drop for ThresholdPrivateKeyShare<C>
where
    C: Cryptosystem,
{
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<C> ZeroizeOnDrop for ThresholdPrivateKeyShare<C> where C: Cryptosystem {}

/// Generates the Lagrange coefficient for `index`, interpolating at x = 0
/// over the points in `indices`.
#[cfg_attr(feature = "internals", visibility::make(pub))]
pub(crate) fn compute_lagrange_coefficient<C: Cryptosystem>(
    cryptosystem: &C,
    indices: &BTreeSet<TrusteeIndex>,
    index: TrusteeIndex,
) -> Result<Scalar<C>, Error> {
    let mut num = cryptosystem.scalar_from_u16(1);
    let mut den = cryptosystem.scalar_from_u16(1);

    let x_i = index.to_scalar(cryptosystem)?;
    for other in indices.iter().filter(|j| **j != index) {
        let x_j = other.to_scalar(cryptosystem)?;
        num = cryptosystem.mul(&num, &x_j);
        den = cryptosystem.mul(&den, &cryptosystem.sub(&x_j, &x_i));
    }

    Ok(cryptosystem.mul(&num, &cryptosystem.invert(&den)?))
}

/// Recompute the joint secret from at least `threshold` private key shares
/// using Lagrange interpolation.
///
/// This is NOT part of the key generation; the point of a threshold key is
/// that decryption works without ever reassembling the secret. It is useful
/// for recovery scenarios and for checking that a setup produced consistent
/// shares.
///
/// All shares must come from the same (n, k) setup.
pub fn reconstruct<C: Cryptosystem>(
    cryptosystem: &C,
    shares: &[ThresholdPrivateKeyShare<C>],
) -> Result<Zeroizing<Scalar<C>>, Error> {
    let config = shares
        .first()
        .map(|s| s.config)
        .ok_or(Error::IncorrectNumberOfShares)?;
    for share in shares {
        if share.config.num_trustees != config.num_trustees {
            return Err(Mismatch::NumTrustees {
                expected: config.num_trustees,
                found: share.config.num_trustees,
            }
            .into());
        }
        if share.config.threshold != config.threshold {
            return Err(Mismatch::Threshold {
                expected: config.threshold,
                found: share.config.threshold,
            }
            .into());
        }
    }
    if shares.len() < config.threshold as usize {
        return Err(Error::IncorrectNumberOfShares);
    }

    let indices: BTreeSet<_> = shares.iter().map(|s| s.index).collect();
    if indices.len() != shares.len() {
        return Err(Error::DuplicatedIdentifier);
    }

    let mut secret = Zeroizing::new(cryptosystem.zero());
    for share in shares {
        let lagrange_coefficient = compute_lagrange_coefficient(cryptosystem, &indices, share.index)?;
        let term = Zeroizing::new(cryptosystem.mul(&lagrange_coefficient, &share.share));
        *secret = cryptosystem.add(&secret, &term);
    }

    Ok(secret)
}

#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![doc = document_features::document_features!()]

use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};

mod ciphertext;
mod error;
mod group;
mod keys;
mod scalar;


pub use ciphertext::Ciphertext;
pub use error::ModpError;
pub use group::ModpGroup;
pub use keys::{PrivateKey, PublicKey};
pub use scalar::{ModpElement, ModpScalar};

// Re-exports in our public API
pub use dkg_core::{
    Cryptosystem, Error, Fingerprint, Mismatch, SetupState, ThresholdConfig, TrusteeIndex,
};
pub use num_bigint;
pub use rand_core;

impl Cryptosystem for ModpGroup {
    type Scalar = ModpScalar;
    type Element = ModpElement;
    type PublicKey = PublicKey;
    type PrivateKey = PrivateKey;
    type Ciphertext = Ciphertext;

    /// `u32 len || p || g`, p and g big-endian and `len` bytes wide.
    fn serialize_parameters(&self) -> Vec<u8> {
        let len = self.byte_len();
        let mut out = Vec::with_capacity(4 + 2 * len);
        out.extend_from_slice(&(len as u32).to_be_bytes());
        out.extend_from_slice(&self.to_fixed_bytes(self.prime()));
        out.extend_from_slice(&self.to_fixed_bytes(self.generator()));
        out
    }

    fn zero(&self) -> ModpScalar {
        ModpScalar(BigUint::zero())
    }

    fn scalar_from_u16(&self, n: u16) -> ModpScalar {
        ModpScalar(BigUint::from(n) % self.order())
    }

    fn add(&self, a: &ModpScalar, b: &ModpScalar) -> ModpScalar {
        ModpScalar((&a.0 + &b.0) % self.order())
    }

    fn sub(&self, a: &ModpScalar, b: &ModpScalar) -> ModpScalar {
        let q = self.order();
        ModpScalar((&a.0 % q + q - &b.0 % q) % q)
    }

    fn mul(&self, a: &ModpScalar, b: &ModpScalar) -> ModpScalar {
        ModpScalar((&a.0 * &b.0) % self.order())
    }

    fn invert(&self, scalar: &ModpScalar) -> Result<ModpScalar, Error> {
        scalar
            .0
            .modinv(self.order())
            .map(ModpScalar)
            .ok_or_else(|| ModpError::InvalidZeroScalar.into())
    }

    fn random_scalar<R: RngCore + CryptoRng>(&self, rng: &mut R) -> ModpScalar {
        ModpScalar(rng.gen_biguint_below(self.order()))
    }

    fn serialize_scalar(&self, scalar: &ModpScalar) -> Vec<u8> {
        self.to_fixed_bytes(&scalar.0)
    }

    fn identity(&self) -> ModpElement {
        ModpElement(BigUint::from(1u32))
    }

    fn generator(&self) -> ModpElement {
        ModpElement(ModpGroup::generator(self).clone())
    }

    fn is_valid_element(&self, element: &ModpElement) -> bool {
        self.is_element(&element.0)
    }

    fn multiply(&self, a: &ModpElement, b: &ModpElement) -> ModpElement {
        ModpElement((&a.0 * &b.0) % self.prime())
    }

    fn exponentiate(&self, base: &ModpElement, exponent: &ModpScalar) -> ModpElement {
        ModpElement(base.0.modpow(&exponent.0, self.prime()))
    }

    fn exponentiate_generator(&self, exponent: &ModpScalar) -> ModpElement {
        ModpElement(ModpGroup::generator(self).modpow(&exponent.0, self.prime()))
    }

    fn serialize_element(&self, element: &ModpElement) -> Vec<u8> {
        self.to_fixed_bytes(&element.0)
    }

    fn serialize_ciphertext(&self, ciphertext: &Ciphertext) -> Vec<u8> {
        let mut out = self.to_fixed_bytes(ciphertext.c1());
        out.extend_from_slice(&self.to_fixed_bytes(ciphertext.c2()));
        out
    }

    fn generate_key_pair<R: RngCore + CryptoRng>(&self, rng: &mut R) -> (PrivateKey, PublicKey) {
        let private_key = PrivateKey::generate(self, rng);
        let public_key = private_key.public_key();
        (private_key, public_key)
    }

    fn public_key_parameters(key: &PublicKey) -> &Self {
        key.group()
    }

    fn private_key_parameters(key: &PrivateKey) -> &Self {
        key.group()
    }

    fn is_key_pair(&self, private_key: &PrivateKey, public_key: &PublicKey) -> bool {
        private_key.group() == self
            && public_key.group() == self
            && private_key.public_key() == *public_key
    }

    fn encrypt<R: RngCore + CryptoRng>(
        &self,
        public_key: &PublicKey,
        scalar: &ModpScalar,
        rng: &mut R,
    ) -> Result<Ciphertext, Error> {
        Ciphertext::encrypt(self, public_key, scalar, rng).map_err(Error::from)
    }

    fn decrypt(
        &self,
        private_key: &PrivateKey,
        ciphertext: &Ciphertext,
    ) -> Result<ModpScalar, Error> {
        ciphertext.decrypt(self, private_key).map_err(Error::from)
    }
}

/// A threshold setup session over a MODP group.
pub type SetupSession = dkg_core::SetupSession<ModpGroup>;

/// A trustee's commitment.
pub type Commitment = dkg_core::Commitment<ModpGroup>;

/// A share encrypted to one trustee.
pub type EncryptedShare = dkg_core::EncryptedShare<ModpGroup>;

/// The public coefficients of a trustee's polynomial.
pub type PublicCoefficients = dkg_core::PublicCoefficients<ModpGroup>;

/// The joint threshold public key.
pub type ThresholdPublicKey = dkg_core::ThresholdPublicKey<ModpGroup>;

/// A trustee's share of the joint private key.
pub type ThresholdPrivateKeyShare = dkg_core::ThresholdPrivateKeyShare<ModpGroup>;

/// g^{s_j} for trustee j.
pub type VerifyingShare = dkg_core::VerifyingShare<ModpGroup>;

/// Recompute the joint secret from at least `threshold` private key shares.
///
/// See [`dkg_core::reconstruct`].
pub fn reconstruct(
    group: &ModpGroup,
    shares: &[ThresholdPrivateKeyShare],
) -> Result<zeroize::Zeroizing<ModpScalar>, Error> {
    dkg_core::reconstruct(group, shares)
}

//! Traits used to abstract the underlying ElGamal cryptosystem.

use core::fmt::Debug;

use alloc::vec::Vec;
use rand_core::{CryptoRng, RngCore};
use serde::{de::DeserializeOwned, Serialize};
use zeroize::Zeroize;

use crate::Error;

/// An ElGamal cryptosystem over a prime-order (sub)group, as consumed by the
/// distributed key generation.
///
/// Unlike a fixed ciphersuite, the group parameters (prime modulus, generator,
/// subgroup order) are runtime values, so every operation takes `&self` and
/// an implementation of this trait *is* the parameter set. Two parameter sets
/// are compatible if and only if they compare equal.
///
/// Scalars live in the field of integers modulo the subgroup order `q`;
/// elements live in the order-`q` subgroup of the multiplicative group
/// modulo the field prime `p`. The group is written multiplicatively.
pub trait Cryptosystem: Clone + Debug + Eq + Serialize + DeserializeOwned + 'static {
    /// An element of the scalar field GF(q).
    /// The Eq/PartialEq implementation MUST be constant-time.
    type Scalar: Clone + Debug + Eq + Zeroize + Serialize + DeserializeOwned;

    /// An element of the order-q subgroup.
    type Element: Clone + Debug + Eq + Serialize + DeserializeOwned;

    /// A personal (1-to-1, non-threshold) public key, usable as an
    /// encryption target.
    type PublicKey: Clone + Debug + Eq;

    /// A personal private key, usable as a decryption capability.
    type PrivateKey;

    /// An encryption of a scalar under a personal public key.
    type Ciphertext: Clone + Debug + Eq + Serialize + DeserializeOwned;

    /// A unique, canonical byte encoding of the parameters (p, g, q).
    fn serialize_parameters(&self) -> Vec<u8>;

    /// Returns the zero element of the field, the additive identity.
    fn zero(&self) -> Self::Scalar;

    /// Maps a small integer into the field.
    fn scalar_from_u16(&self, n: u16) -> Self::Scalar;

    /// `a + b mod q`
    fn add(&self, a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    /// `a - b mod q`
    fn sub(&self, a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    /// `a * b mod q`
    fn mul(&self, a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    /// Computes the multiplicative inverse of a scalar, failing if the
    /// scalar is zero.
    fn invert(&self, scalar: &Self::Scalar) -> Result<Self::Scalar, Error>;

    /// Generate a random scalar from the entire space [0, q-1].
    fn random_scalar<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Self::Scalar;

    /// Maps a scalar to a unique byte array.
    fn serialize_scalar(&self, scalar: &Self::Scalar) -> Vec<u8>;

    /// The neutral element of the group.
    fn identity(&self) -> Self::Element;

    /// The fixed generator of the order-q subgroup.
    fn generator(&self) -> Self::Element;

    /// Whether `element` is a member of the order-q subgroup.
    ///
    /// Elements received from other participants are checked with this
    /// before they are combined.
    fn is_valid_element(&self, element: &Self::Element) -> bool;

    /// The group operation: `a * b mod p`.
    fn multiply(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// `base ^ exponent mod p`.
    fn exponentiate(&self, base: &Self::Element, exponent: &Self::Scalar) -> Self::Element;

    /// `generator ^ exponent mod p`.
    fn exponentiate_generator(&self, exponent: &Self::Scalar) -> Self::Element {
        self.exponentiate(&self.generator(), exponent)
    }

    /// Maps an element to a unique byte array.
    fn serialize_element(&self, element: &Self::Element) -> Vec<u8>;

    /// Maps a ciphertext to a unique byte array.
    fn serialize_ciphertext(&self, ciphertext: &Self::Ciphertext) -> Vec<u8>;

    /// The parameters a personal public key belongs to.
    fn public_key_parameters(key: &Self::PublicKey) -> &Self;

    /// The parameters a personal private key belongs to.
    fn private_key_parameters(key: &Self::PrivateKey) -> &Self;

    /// Generates a fresh personal key pair over these parameters.
    fn generate_key_pair<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> (Self::PrivateKey, Self::PublicKey);

    /// Whether `private_key` is the decryption key for `public_key`.
    fn is_key_pair(&self, private_key: &Self::PrivateKey, public_key: &Self::PublicKey) -> bool;

    /// Encrypts `scalar` under the personal `public_key`.
    fn encrypt<R: RngCore + CryptoRng>(
        &self,
        public_key: &Self::PublicKey,
        scalar: &Self::Scalar,
        rng: &mut R,
    ) -> Result<Self::Ciphertext, Error>;

    /// Decrypts a ciphertext produced by [`Cryptosystem::encrypt`].
    fn decrypt(
        &self,
        private_key: &Self::PrivateKey,
        ciphertext: &Self::Ciphertext,
    ) -> Result<Self::Scalar, Error>;
}

/// A scalar of the [`Cryptosystem`] `C`.
pub type Scalar<C> = <C as Cryptosystem>::Scalar;

/// An element of the [`Cryptosystem`] `C`'s group.
pub type Element<C> = <C as Cryptosystem>::Element;

/// A ciphertext of the [`Cryptosystem`] `C`.
pub type Ciphertext<C> = <C as Cryptosystem>::Ciphertext;

/// A personal public key of the [`Cryptosystem`] `C`.
pub type PublicKey<C> = <C as Cryptosystem>::PublicKey;

/// A personal private key of the [`Cryptosystem`] `C`.
pub type PrivateKey<C> = <C as Cryptosystem>::PrivateKey;

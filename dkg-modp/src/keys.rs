//! Personal ElGamal key pairs.
//!
//! Each trustee holds one personal key pair. Its public half is the target
//! the other trustees encrypt their polynomial evaluations to; its private
//! half lets the trustee recover them.

use core::fmt::{self, Debug};

use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand_core::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{ModpError, ModpGroup, ModpScalar};

/// A personal public key h = g^x.
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawPublicKey")]
pub struct PublicKey {
    group: ModpGroup,
    element: BigUint,
}

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPublicKey {
    group: ModpGroup,
    element: BigUint,
}

impl TryFrom<RawPublicKey> for PublicKey {
    type Error = ModpError;

    fn try_from(raw: RawPublicKey) -> Result<Self, ModpError> {
        Self::new(raw.group, raw.element)
    }
}

impl PublicKey {
    /// Create a public key, checking that `element` is in the order-q
    /// subgroup of `group`.
    pub fn new(group: ModpGroup, element: BigUint) -> Result<Self, ModpError> {
        if !group.is_element(&element) || element.is_one() {
            return Err(ModpError::MalformedElement);
        }
        Ok(Self { group, element })
    }

    /// The group this key belongs to.
    pub fn group(&self) -> &ModpGroup {
        &self.group
    }

    /// h = g^x
    pub fn element(&self) -> &BigUint {
        &self.element
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("group", &self.group)
            .field("element", &format_args!("{:x}", self.element))
            .finish()
    }
}

/// A personal private key x in `1..q`.
///
/// # Security
///
/// Redacted from `Debug` output and wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    group: ModpGroup,
    exponent: ModpScalar,
}

impl PrivateKey {
    /// Samples a new private key.
    pub fn generate<R: RngCore + CryptoRng>(group: &ModpGroup, rng: &mut R) -> Self {
        let exponent = rng.gen_biguint_range(&BigUint::one(), group.order());
        Self {
            group: group.clone(),
            exponent: ModpScalar(exponent),
        }
    }

    /// The group this key belongs to.
    pub fn group(&self) -> &ModpGroup {
        &self.group
    }

    /// The matching public key g^x.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            group: self.group.clone(),
            element: self
                .group
                .generator()
                .modpow(&self.exponent.0, self.group.prime()),
        }
    }

    pub(crate) fn exponent(&self) -> &BigUint {
        &self.exponent.0
    }
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("group", &self.group)
            .field("exponent", &"<redacted>")
            .finish()
    }
}

impl Zeroize for PrivateKey {
    fn zeroize(&mut self) {
        self.exponent.zeroize();
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for PrivateKey {}

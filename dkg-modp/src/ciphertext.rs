//! ElGamal ciphertexts of scalars.

use core::fmt::{self, Debug};

use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::{ModpError, ModpGroup, ModpScalar, PrivateKey, PublicKey};

/// An ElGamal ciphertext (c1, c2) = (g^r, M · h^r), where M is the
/// subgroup encoding of the plaintext scalar.
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ciphertext {
    c1: BigUint,
    c2: BigUint,
}

impl Ciphertext {
    /// g^r
    pub fn c1(&self) -> &BigUint {
        &self.c1
    }

    /// M · h^r
    pub fn c2(&self) -> &BigUint {
        &self.c2
    }

    /// Encrypts `plaintext` under `public_key`.
    pub fn encrypt<R: RngCore + CryptoRng>(
        group: &ModpGroup,
        public_key: &PublicKey,
        plaintext: &ModpScalar,
        rng: &mut R,
    ) -> Result<Self, ModpError> {
        if public_key.group() != group {
            return Err(ModpError::GroupMismatch);
        }
        let p = group.prime();
        let message = Zeroizing::new(ModpScalar(group.encode(&plaintext.0)?));
        let r = Zeroizing::new(ModpScalar(
            rng.gen_biguint_range(&BigUint::one(), group.order()),
        ));

        let c1 = group.generator().modpow(&r.0, p);
        let c2 = (&message.0 * public_key.element().modpow(&r.0, p)) % p;
        Ok(Self { c1, c2 })
    }

    /// Decrypts with `private_key`: M = c2 · c1^(-x).
    pub fn decrypt(
        &self,
        group: &ModpGroup,
        private_key: &PrivateKey,
    ) -> Result<ModpScalar, ModpError> {
        if private_key.group() != group {
            return Err(ModpError::GroupMismatch);
        }
        if !group.is_unit(&self.c1) || !group.is_unit(&self.c2) {
            return Err(ModpError::MalformedCiphertext);
        }
        let p = group.prime();
        // c1^(p - 1 - x) = c1^(-x) for every unit c1.
        let exponent = Zeroizing::new(ModpScalar(p - 1u32 - private_key.exponent()));
        let message = Zeroizing::new(ModpScalar(
            (&self.c2 * self.c1.modpow(&exponent.0, p)) % p,
        ));
        Ok(ModpScalar(group.decode(&message.0)?))
    }
}

impl Debug for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ciphertext")
            .field("c1", &format_args!("{:x}", self.c1))
            .field("c2", &format_args!("{:x}", self.c2))
            .finish()
    }
}

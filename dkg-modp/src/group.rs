//! Safe-prime MODP groups.

use core::fmt::{self, Debug};

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use tracing::warn;

use crate::ModpError;

/// The 2048-bit MODP group of RFC 3526, section 3, as little-endian `u32`
/// digits.
const RFC3526_2048_PRIME: [u32; 64] = [
    0xffffffff, 0xffffffff, 0x8aacaa68, 0x15728e5a, 0x98fa0510, 0x15d22618, 0xea956ae5, 0x3995497c,
    0x95581718, 0xde2bcbf6, 0x6f4c52c9, 0xb5c55df0, 0xec07a28f, 0x9b2783a2, 0x180e8603, 0xe39e772c,
    0x2e36ce3b, 0x32905e46, 0xca18217c, 0xf1746c08, 0x4abc9804, 0x670c354e, 0x7096966d, 0x9ed52907,
    0x208552bb, 0x1c62f356, 0xdca3ad96, 0x83655d23, 0xfd24cf5f, 0x69163fa8, 0x1c55d39a, 0x98da4836,
    0xa163bf05, 0xc2007cb8, 0xece45b3d, 0x49286651, 0x7c4b1fe6, 0xae9f2411, 0x5a899fa5, 0xee386bfb,
    0xf406b7ed, 0x0bff5cb6, 0xa637ed6b, 0xf44c42e9, 0x625e7ec6, 0xe485b576, 0x6d51c245, 0x4fe1356d,
    0xf25f1437, 0x302b0a6d, 0xcd3a431b, 0xef9519b3, 0x8e3404dd, 0x514a0879, 0x3b139b22, 0x020bbea6,
    0x8a67cc74, 0x29024e08, 0x80dc1cd1, 0xc4c6628b, 0x2168c234, 0xc90fdaa2, 0xffffffff, 0xffffffff,
];
const RFC3526_2048_GENERATOR: u32 = 2;

/// A 256-bit safe prime, little-endian `u32` digits.
const TEST_256_PRIME: [u32; 8] = [
    0x3f54d3c3, 0x0e79d3a6, 0x69bc5a79, 0x60fe9c33, 0x76b10f25, 0xd1e0e3c7, 0x1d60d095, 0xd244264e,
];
const TEST_256_GENERATOR: u32 = 4;

/// The order-q subgroup of the integers modulo a safe prime p = 2q + 1.
///
/// Two groups are compatible if and only if they compare equal.
#[derive(Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawGroup")]
pub struct ModpGroup {
    prime: BigUint,
    generator: BigUint,
    #[serde(skip_serializing)]
    order: BigUint,
}

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGroup {
    prime: BigUint,
    generator: BigUint,
}

impl TryFrom<RawGroup> for ModpGroup {
    type Error = ModpError;

    fn try_from(raw: RawGroup) -> Result<Self, ModpError> {
        Self::new(raw.prime, raw.generator)
    }
}

impl ModpGroup {
    /// Create a group from a safe prime and a generator of its order-q
    /// subgroup.
    ///
    /// The parameters are checked structurally: p must be 3 mod 4 (so that
    /// q is odd) and `generator^q` must be 1. The primality of p and q is
    /// NOT checked; use well-known parameters such as
    /// [`ModpGroup::rfc3526_2048`].
    pub fn new(prime: BigUint, generator: BigUint) -> Result<Self, ModpError> {
        if prime < BigUint::from(7u32) || prime.is_even() {
            warn!(bits = prime.bits(), "rejected group modulus");
            return Err(ModpError::InvalidModulus);
        }
        let order: BigUint = (&prime - 1u32) >> 1;
        if order.is_even() {
            warn!(bits = prime.bits(), "rejected group modulus");
            return Err(ModpError::InvalidModulus);
        }

        if generator <= BigUint::one()
            || generator >= &prime - 1u32
            || !generator.modpow(&order, &prime).is_one()
        {
            warn!(bits = prime.bits(), "rejected group generator");
            return Err(ModpError::InvalidGenerator);
        }

        Ok(Self {
            prime,
            generator,
            order,
        })
    }

    /// The 2048-bit MODP group from RFC 3526 with generator 2.
    pub fn rfc3526_2048() -> Self {
        Self::from_trusted(&RFC3526_2048_PRIME, RFC3526_2048_GENERATOR)
    }

    /// A 256-bit group with generator 4.
    ///
    /// Far too small for real keys; it exists to keep tests fast.
    pub fn test_256() -> Self {
        Self::from_trusted(&TEST_256_PRIME, TEST_256_GENERATOR)
    }

    fn from_trusted(prime: &[u32], generator: u32) -> Self {
        let prime = BigUint::from_slice(prime);
        let order = (&prime - 1u32) >> 1;
        Self {
            prime,
            generator: BigUint::from(generator),
            order,
        }
    }

    /// The modulus p.
    pub fn prime(&self) -> &BigUint {
        &self.prime
    }

    /// The generator g of the order-q subgroup.
    pub fn generator(&self) -> &BigUint {
        &self.generator
    }

    /// The subgroup order q = (p - 1) / 2.
    pub fn order(&self) -> &BigUint {
        &self.order
    }

    /// Length in bytes of the fixed-width encoding of elements.
    pub fn byte_len(&self) -> usize {
        ((self.prime.bits() + 7) / 8) as usize
    }

    /// Whether `value` is in `1..p`.
    pub(crate) fn is_unit(&self, value: &BigUint) -> bool {
        !value.is_zero() && *value < self.prime
    }

    /// Whether `value` is in the order-q subgroup.
    pub(crate) fn is_element(&self, value: &BigUint) -> bool {
        self.is_unit(value) && value.modpow(&self.order, &self.prime).is_one()
    }

    /// `value` as a big-endian byte string of exactly `byte_len()` bytes.
    pub(crate) fn to_fixed_bytes(&self, value: &BigUint) -> Vec<u8> {
        let bytes = value.to_bytes_be();
        let mut out = vec![0u8; self.byte_len().saturating_sub(bytes.len())];
        out.extend_from_slice(&bytes);
        out
    }

    /// Maps a scalar m in `0..q` into the subgroup.
    ///
    /// x = m + 1 is in `1..=q`; exactly one of x and p - x is a quadratic
    /// residue, i.e. a member of the order-q subgroup.
    pub(crate) fn encode(&self, m: &BigUint) -> Result<BigUint, ModpError> {
        if *m >= self.order {
            return Err(ModpError::PlaintextOutOfRange);
        }
        let x = m + 1u32;
        if x.modpow(&self.order, &self.prime).is_one() {
            Ok(x)
        } else {
            Ok(&self.prime - x)
        }
    }

    /// Inverse of [`ModpGroup::encode`].
    pub(crate) fn decode(&self, y: &BigUint) -> Result<BigUint, ModpError> {
        if !self.is_unit(y) {
            return Err(ModpError::MalformedCiphertext);
        }
        let x = if *y <= self.order {
            y.clone()
        } else {
            &self.prime - y
        };
        Ok(x - 1u32)
    }
}

impl Debug for ModpGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModpGroup")
            .field("bits", &self.prime.bits())
            .field("generator", &self.generator)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_groups_are_valid() {
        for group in [ModpGroup::rfc3526_2048(), ModpGroup::test_256()] {
            let checked = ModpGroup::new(group.prime.clone(), group.generator.clone()).unwrap();
            assert_eq!(checked, group);
            assert_eq!(&group.order * 2u32 + 1u32, group.prime);
        }
        assert_eq!(ModpGroup::rfc3526_2048().byte_len(), 256);
        assert_eq!(ModpGroup::test_256().byte_len(), 32);
    }

    #[test]
    fn rejects_bad_parameters() {
        // 13 is 1 mod 4.
        assert_eq!(
            ModpGroup::new(BigUint::from(13u32), BigUint::from(4u32)),
            Err(ModpError::InvalidModulus)
        );
        // 23 = 2 * 11 + 1; 5 generates the full group, not the subgroup.
        assert_eq!(
            ModpGroup::new(BigUint::from(23u32), BigUint::from(5u32)),
            Err(ModpError::InvalidGenerator)
        );
        assert_eq!(
            ModpGroup::new(BigUint::from(23u32), BigUint::one()),
            Err(ModpError::InvalidGenerator)
        );
        assert!(ModpGroup::new(BigUint::from(23u32), BigUint::from(4u32)).is_ok());
    }

    #[test]
    fn encoding_covers_the_whole_field() {
        let group = ModpGroup::new(BigUint::from(23u32), BigUint::from(4u32)).unwrap();
        for m in 0u32..11 {
            let m = BigUint::from(m);
            let y = group.encode(&m).unwrap();
            assert!(group.is_element(&y));
            assert_eq!(group.decode(&y).unwrap(), m);
        }
        assert_eq!(
            group.encode(&BigUint::from(11u32)),
            Err(ModpError::PlaintextOutOfRange)
        );
        assert_eq!(
            group.decode(&BigUint::zero()),
            Err(ModpError::MalformedCiphertext)
        );
    }

    #[test]
    fn fixed_width_encoding() {
        let group = ModpGroup::test_256();
        assert_eq!(group.to_fixed_bytes(&BigUint::one()).len(), 32);
        assert_eq!(group.to_fixed_bytes(&BigUint::one())[31], 1);
        assert_eq!(group.to_fixed_bytes(&BigUint::zero()), vec![0u8; 32]);
    }

    #[test]
    fn deserialization_is_validated() {
        let json = serde_json::to_string(&ModpGroup::test_256()).unwrap();
        let group: ModpGroup = serde_json::from_str(&json).unwrap();
        assert_eq!(group, ModpGroup::test_256());

        assert!(serde_json::from_str::<ModpGroup>(r#"{"prime":[13],"generator":[4]}"#).is_err());
    }
}

//! Scalars and group elements.

use core::fmt::{self, Debug};

use num_bigint::BigUint;
use zeroize::Zeroize;

/// An integer modulo the subgroup order q.
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ModpScalar(pub(crate) BigUint);

impl ModpScalar {
    /// The scalar as an integer in `0..q`.
    pub fn to_biguint(&self) -> &BigUint {
        &self.0
    }
}

impl Debug for ModpScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModpScalar").field(&"<redacted>").finish()
    }
}

impl Zeroize for ModpScalar {
    /// Overwrites the digits in place, then truncates. Temporaries created
    /// by big integer arithmetic are not covered.
    fn zeroize(&mut self) {
        let words = ((self.0.bits() + 63) / 64 * 2) as usize;
        self.0.assign_from_slice(&vec![0u32; words]);
    }
}

/// An element of the order-q subgroup modulo p.
#[derive(Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ModpElement(pub(crate) BigUint);

impl ModpElement {
    /// The element as an integer in `1..p`.
    pub fn to_biguint(&self) -> &BigUint {
        &self.0
    }
}

impl Debug for ModpElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModpElement({:x})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use num_traits::Zero;

    use super::*;

    #[test]
    fn zeroize_clears_value() {
        let mut scalar = ModpScalar(BigUint::from_slice(&[0xdead_beef; 9]));
        scalar.zeroize();
        assert!(scalar.0.is_zero());
    }

    #[test]
    fn scalar_debug_is_redacted() {
        let scalar = ModpScalar(BigUint::from(42u32));
        assert!(!format!("{scalar:?}").contains("42"));
    }
}

//! Cryptosystem-generic checks of the polynomial arithmetic, meant to be
//! driven by proptest from the cryptosystem crates.

use alloc::{collections::BTreeSet, vec::Vec};

use rand_core::{CryptoRng, RngCore};

use crate::{
    keys::{
        compute_lagrange_coefficient, evaluate_polynomial, evaluate_vss, SecretPolynomial,
    },
    Cryptosystem, TrusteeIndex,
};

/// Check that Horner evaluation agrees with the naive sum Σ a_l x^l, and
/// that the public coefficients commit to the evaluation.
pub fn check_polynomial_evaluation<C: Cryptosystem, R: RngCore + CryptoRng>(
    cryptosystem: &C,
    degree: u16,
    index: u16,
    mut rng: R,
) {
    let index = TrusteeIndex::new(index).unwrap();
    let polynomial = SecretPolynomial::generate(cryptosystem, degree + 1, &mut rng);

    let x = index.to_scalar(cryptosystem).unwrap();
    let mut power = cryptosystem.scalar_from_u16(1);
    let mut naive = cryptosystem.zero();
    for coefficient in &polynomial.coefficients {
        naive = cryptosystem.add(&naive, &cryptosystem.mul(coefficient, &power));
        power = cryptosystem.mul(&power, &x);
    }

    let share = polynomial.evaluate(index).unwrap();
    assert_eq!(*share, naive);
    assert_eq!(
        evaluate_polynomial(cryptosystem, index, &polynomial.coefficients).unwrap(),
        naive
    );

    // Feldman: g^{P(j)} == Π φ_l^{j^l}
    assert_eq!(
        cryptosystem.exponentiate_generator(&share),
        evaluate_vss(cryptosystem, index, &polynomial.commit()).unwrap()
    );
}

/// Check that Lagrange interpolation at zero over any `threshold` distinct
/// points of a polynomial of degree `threshold - 1` recovers its constant
/// term.
pub fn check_lagrange_interpolation<C: Cryptosystem, R: RngCore + CryptoRng>(
    cryptosystem: &C,
    threshold: u16,
    indices: &[u16],
    mut rng: R,
) {
    let points: BTreeSet<TrusteeIndex> = indices
        .iter()
        .map(|i| TrusteeIndex::new(*i).unwrap())
        .collect();
    assert!(points.len() >= threshold as usize);
    let points: BTreeSet<_> = points.into_iter().take(threshold as usize).collect();

    let polynomial = SecretPolynomial::generate(cryptosystem, threshold, &mut rng);
    let shares: Vec<_> = points
        .iter()
        .map(|j| (*j, polynomial.evaluate(*j).unwrap()))
        .collect();

    let mut secret = cryptosystem.zero();
    for (j, share) in &shares {
        let lambda = compute_lagrange_coefficient(cryptosystem, &points, *j).unwrap();
        secret = cryptosystem.add(&secret, &cryptosystem.mul(&lambda, share));
    }
    assert_eq!(secret, polynomial.coefficients[0]);
}

use dkg_modp::*;
use proptest::prelude::*;
use rand_chacha::ChaChaRng;
use rand_core::SeedableRng;

proptest! {

    #[test]
    fn polynomial_evaluation(degree in 0u16..8, index in 1u16..1000, seed in any::<u64>()) {
        let group = ModpGroup::test_256();
        let rng = ChaChaRng::seed_from_u64(seed);
        dkg_core::tests::polynomial::check_polynomial_evaluation(&group, degree, index, rng);
    }

    #[test]
    fn lagrange_interpolation(
        threshold in 1u16..6,
        indices in proptest::collection::btree_set(1u16..100, 6),
        seed in any::<u64>(),
    ) {
        let group = ModpGroup::test_256();
        let rng = ChaChaRng::seed_from_u64(seed);
        let indices: Vec<u16> = indices.into_iter().collect();
        dkg_core::tests::polynomial::check_lagrange_interpolation(&group, threshold, &indices, rng);
    }

    #[test]
    fn encryption_roundtrip(seed in any::<u64>()) {
        let mut rng = ChaChaRng::seed_from_u64(seed);
        let group = ModpGroup::test_256();
        let (private_key, public_key) = group.generate_key_pair(&mut rng);
        let scalar = group.random_scalar(&mut rng);

        let ciphertext = group.encrypt(&public_key, &scalar, &mut rng).unwrap();
        prop_assert_eq!(group.decrypt(&private_key, &ciphertext).unwrap(), scalar);
    }
}

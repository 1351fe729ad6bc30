#[generic_tests::define(attrs(test))]
mod generic {
    use bise::{
        generic_ec::{Point, Scalar},
        key_agg::KeyAggCache,
        Ciphersuite,
    };
    use rand::RngCore;

    #[test]
    fn aggregated_key_is_weighted_sum<C: Ciphersuite>() {
        let mut rng = rand_dev::DevRng::new();

        let key_pairs = bise_tests::generate_key_pairs::<C::Curve>(&mut rng, 4);
        let public_keys = bise_tests::public_keys::<C>(&key_pairs);
        let key_agg_cache = KeyAggCache::<C>::new(&public_keys).unwrap();

        let expected = public_keys
            .iter()
            .fold(Point::<C::Curve>::zero(), |acc, pk| {
                acc + **pk * key_agg_cache.coefficient(pk)
            });
        assert_eq!(*key_agg_cache.agg_public_key_point(), expected);
        assert!(key_agg_cache.tweak().is_zero());
        assert!(!key_agg_cache.internal_key_parity());
    }

    #[test]
    fn second_distinct_key_has_unit_coefficient<C: Ciphersuite>() {
        let mut rng = rand_dev::DevRng::new();

        let key_pairs = bise_tests::generate_key_pairs::<C::Curve>(&mut rng, 2);
        let public_keys = bise_tests::public_keys::<C>(&key_pairs);
        let (a, b) = (public_keys[0], public_keys[1]);

        let key_agg_cache = KeyAggCache::<C>::new(&[a, a, b]).unwrap();
        assert_ne!(key_agg_cache.coefficient(&a), Scalar::one());
        assert_eq!(key_agg_cache.coefficient(&b), Scalar::one());

        let key_agg_cache = KeyAggCache::<C>::new(&[a, b, a]).unwrap();
        assert_ne!(key_agg_cache.coefficient(&a), Scalar::one());
        assert_eq!(key_agg_cache.coefficient(&b), Scalar::one());
    }

    #[test]
    fn identical_keys<C: Ciphersuite>() {
        let mut rng = rand_dev::DevRng::new();

        let key_pairs = bise_tests::generate_key_pairs::<C::Curve>(&mut rng, 1);
        let a = key_pairs[0].x_only_public_key::<C>();

        let key_agg_cache = KeyAggCache::<C>::new(&[a, a]).unwrap();
        let mu = key_agg_cache.coefficient(&a);
        assert_ne!(mu, Scalar::one());
        assert_eq!(*key_agg_cache.agg_public_key_point(), **a * (mu + mu));
    }

    #[test]
    fn aggregation_depends_on_order<C: Ciphersuite>() {
        let mut rng = rand_dev::DevRng::new();

        let key_pairs = bise_tests::generate_key_pairs::<C::Curve>(&mut rng, 3);
        let public_keys = bise_tests::public_keys::<C>(&key_pairs);
        let mut reversed = public_keys.clone();
        reversed.reverse();

        let pk1 = KeyAggCache::<C>::new(&public_keys)
            .unwrap()
            .agg_public_key();
        let pk2 = KeyAggCache::<C>::new(&reversed).unwrap().agg_public_key();
        assert_ne!(pk1, pk2);

        let pk3 = KeyAggCache::<C>::new(&public_keys)
            .unwrap()
            .agg_public_key();
        assert_eq!(pk1, pk3);
    }

    #[test]
    fn empty_list_of_keys<C: Ciphersuite>() {
        assert!(KeyAggCache::<C>::new(&[]).is_err());
    }

    #[test]
    fn sign_with_duplicate_keys<C: Ciphersuite>() {
        let mut rng = rand_dev::DevRng::new();

        let mut key_pairs = bise_tests::generate_key_pairs::<C::Curve>(&mut rng, 2);
        key_pairs.push(key_pairs[0].clone());
        let key_agg_cache =
            KeyAggCache::<C>::new(&bise_tests::public_keys::<C>(&key_pairs)).unwrap();

        let mut msg = [0u8; 32];
        rng.fill_bytes(&mut msg);
        let output = bise_tests::run_signing(&mut rng, &key_pairs, &key_agg_cache, &msg, None);
        output
            .signature
            .verify(&key_agg_cache.agg_public_key(), &msg)
            .unwrap();
    }

    #[instantiate_tests(<bise::ciphersuite::Secp256k1>)]
    mod secp256k1 {}
}

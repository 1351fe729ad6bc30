mod key_agg;
mod parsing;

#[generic_tests::define(attrs(test, test_case::case))]
mod generic {
    use bise::{
        ciphersuite::has_odd_y,
        generic_ec::{Point, Scalar},
        key_agg::KeyAggCache,
        signing::aggregate::Signature,
        Ciphersuite,
    };
    use bise_tests::ExternalVerifier;
    use rand::RngCore;

    #[test_case::case(1; "n1")]
    #[test_case::case(2; "n2")]
    #[test_case::case(3; "n3")]
    #[test_case::case(5; "n5")]
    fn sign<C: Ciphersuite + ExternalVerifier>(n: usize) {
        let mut rng = rand_dev::DevRng::new();

        let key_pairs = bise_tests::generate_key_pairs::<C::Curve>(&mut rng, n);
        let key_agg_cache =
            KeyAggCache::<C>::new(&bise_tests::public_keys::<C>(&key_pairs)).unwrap();
        let pk = key_agg_cache.agg_public_key();

        let mut msg = [0u8; 32];
        rng.fill_bytes(&mut msg);

        let output = bise_tests::run_signing(&mut rng, &key_pairs, &key_agg_cache, &msg, None);
        assert_eq!(output.partial_sigs.len(), n);

        output.signature.verify(&pk, &msg).expect("invalid signature");
        C::verify_sig(&pk, &output.signature, &msg)
            .expect("external verifier: invalid signature");

        let sig_bytes = output.signature.to_bytes();
        assert_eq!(sig_bytes.len(), Signature::<C>::serialized_len());
        assert_eq!(
            Signature::<C>::from_bytes(&sig_bytes).unwrap(),
            output.signature
        );
        assert_eq!(output.signature.r, output.session.fin_nonce());

        let mut other_msg = msg;
        other_msg[0] ^= 1;
        assert!(output.signature.verify(&pk, &other_msg).is_err());
    }

    #[test]
    fn single_signer_signature_is_schnorr<C: Ciphersuite>() {
        let mut rng = rand_dev::DevRng::new();

        let key_pairs = bise_tests::generate_key_pairs::<C::Curve>(&mut rng, 1);
        let key_pair = &key_pairs[0];
        let pk_i = key_pair.x_only_public_key::<C>();
        let key_agg_cache = KeyAggCache::<C>::new(&[pk_i]).unwrap();
        let mut msg = [0u8; 32];
        rng.fill_bytes(&mut msg);

        let output = bise_tests::run_signing(&mut rng, &key_pairs, &key_agg_cache, &msg, None);
        let session = &output.session;
        let sign = |negate: bool| {
            if negate {
                -Scalar::<C::Curve>::one()
            } else {
                Scalar::<C::Curve>::one()
            }
        };

        // Untweaked: signature consists of the only partial signature
        assert_eq!(output.signature.s, output.partial_sigs[0].0);

        // k G = (R0 + b R1), negated if the final nonce has odd Y
        let nonce = &output.public_nonces[0];
        let k_point = (*nonce.r0 + *nonce.r1 * session.nonce_coef())
            * sign(session.fin_nonce_parity());
        assert_eq!(k_point, **session.fin_nonce());

        // x is negated if the signer's key and the aggregated key have different parity
        let negate_sk = has_odd_y::<C>(&key_pair.public_key())
            != has_odd_y::<C>(&key_agg_cache.agg_public_key_point());
        let e_mu_x = sign(negate_sk)
            * session.challenge()
            * key_agg_cache.coefficient(&pk_i)
            * key_pair.secret_key();

        // s G = (k0 + b k1 + e mu x) G
        assert_eq!(
            Point::<C::Curve>::generator() * output.signature.s,
            k_point + Point::<C::Curve>::generator() * e_mu_x
        );
    }

    #[test]
    fn altered_partial_sig_is_rejected<C: Ciphersuite>() {
        let mut rng = rand_dev::DevRng::new();

        let key_pairs = bise_tests::generate_key_pairs::<C::Curve>(&mut rng, 3);
        let key_agg_cache =
            KeyAggCache::<C>::new(&bise_tests::public_keys::<C>(&key_pairs)).unwrap();
        let mut msg = [0u8; 32];
        rng.fill_bytes(&mut msg);

        let output = bise_tests::run_signing(&mut rng, &key_pairs, &key_agg_cache, &msg, None);

        let partial_sig_bytes = output.partial_sigs[0].to_bytes::<C>().as_ref().to_vec();
        for i in 0..partial_sig_bytes.len() {
            let mut altered = partial_sig_bytes.clone();
            altered[i] ^= 1;
            let Ok(altered) = bise::signing::round2::PartialSig::from_bytes::<C>(&altered) else {
                // Altered bytes are out of range
                continue;
            };
            let result = bise::signing::round2::verify(
                &altered,
                &output.public_nonces[0],
                &key_pairs[0].x_only_public_key::<C>(),
                &key_agg_cache,
                &output.session,
            );
            assert!(result.is_err(), "altered byte {i} wasn't detected");
        }
    }

    #[test]
    fn partial_sig_is_rejected_under_wrong_signer<C: Ciphersuite>() {
        let mut rng = rand_dev::DevRng::new();

        let key_pairs = bise_tests::generate_key_pairs::<C::Curve>(&mut rng, 3);
        let key_agg_cache =
            KeyAggCache::<C>::new(&bise_tests::public_keys::<C>(&key_pairs)).unwrap();
        let mut msg = [0u8; 32];
        rng.fill_bytes(&mut msg);

        let output = bise_tests::run_signing(&mut rng, &key_pairs, &key_agg_cache, &msg, None);

        // Wrong public key
        assert!(bise::signing::round2::verify(
            &output.partial_sigs[0],
            &output.public_nonces[0],
            &key_pairs[1].x_only_public_key::<C>(),
            &key_agg_cache,
            &output.session,
        )
        .is_err());
        // Wrong public nonce
        assert!(bise::signing::round2::verify(
            &output.partial_sigs[0],
            &output.public_nonces[1],
            &key_pairs[0].x_only_public_key::<C>(),
            &key_agg_cache,
            &output.session,
        )
        .is_err());
    }

    #[test]
    fn aggregation_of_nothing_fails<C: Ciphersuite>() {
        let mut rng = rand_dev::DevRng::new();

        let key_pairs = bise_tests::generate_key_pairs::<C::Curve>(&mut rng, 2);
        let key_agg_cache =
            KeyAggCache::<C>::new(&bise_tests::public_keys::<C>(&key_pairs)).unwrap();
        let msg = [7u8; 32];

        let output = bise_tests::run_signing(&mut rng, &key_pairs, &key_agg_cache, &msg, None);
        assert!(bise::signing::aggregate::aggregate(&output.session, &[]).is_err());
    }

    #[instantiate_tests(<bise::ciphersuite::Secp256k1>)]
    mod secp256k1 {}
}

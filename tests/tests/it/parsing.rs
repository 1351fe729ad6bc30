use bise::{
    ciphersuite::{NormalizedPoint, Secp256k1},
    generic_ec::{curves::Secp256k1 as E, NonZero, Point},
    signing::{
        aggregate::Signature, nonce_agg::AggNonce, round1::PublicNonce, round2::PartialSig,
    },
    KeyPair,
};
use hex_literal::hex;
use rand::Rng;

/// Order of secp256k1 group
const ORDER: [u8; 32] = hex!("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");
/// X coordinate that doesn't correspond to any point on secp256k1
const NOT_ON_CURVE: [u8; 32] =
    hex!("EEFDEA4CDB677750A420FEE807EACF21EB9898AE79B9768766E4FAA04A2D4A34");

fn random_public_nonce_bytes(rng: &mut rand_dev::DevRng) -> Vec<u8> {
    let session_id: [u8; 32] = rng.gen();
    let (_, public_nonce) =
        bise::signing::round1::NonceGenerator::<Secp256k1>::new(&session_id)
            .generate()
            .unwrap();
    let bytes = public_nonce.to_bytes::<Secp256k1>();
    assert_eq!(
        PublicNonce::<E>::from_bytes::<Secp256k1>(&bytes).unwrap(),
        public_nonce
    );
    bytes
}

#[test]
fn public_nonce() {
    let mut rng = rand_dev::DevRng::new();
    let bytes = random_public_nonce_bytes(&mut rng);
    assert_eq!(bytes.len(), 66);

    // Invalid prefix
    for i in [0, 33] {
        let mut invalid = bytes.clone();
        invalid[i] = 0x05;
        assert!(PublicNonce::<E>::from_bytes::<Secp256k1>(&invalid).is_err());
        assert!(AggNonce::<E>::from_bytes::<Secp256k1>(&invalid).is_err());
    }

    // X coordinate is not on the curve
    for i in [1, 34] {
        let mut invalid = bytes.clone();
        invalid[i..i + 32].copy_from_slice(&NOT_ON_CURVE);
        assert!(PublicNonce::<E>::from_bytes::<Secp256k1>(&invalid).is_err());
    }

    // Wrong length
    assert!(PublicNonce::<E>::from_bytes::<Secp256k1>(&bytes[..65]).is_err());
    let too_long = [bytes.as_slice(), &[0]].concat();
    assert!(PublicNonce::<E>::from_bytes::<Secp256k1>(&too_long).is_err());
    assert!(PublicNonce::<E>::from_bytes::<Secp256k1>(&[]).is_err());

    // Zero point can't be a part of public nonce
    assert!(PublicNonce::<E>::from_bytes::<Secp256k1>(&[0u8; 66]).is_err());
}

#[test]
fn partial_sig() {
    let mut rng = rand_dev::DevRng::new();

    let s: [u8; 32] = rng.gen();
    if let Ok(partial_sig) = PartialSig::<E>::from_bytes::<Secp256k1>(&s) {
        let bytes = partial_sig.to_bytes::<Secp256k1>();
        assert_eq!(AsRef::<[u8]>::as_ref(&bytes), &s[..]);
    }

    let mut order_minus_one = ORDER;
    order_minus_one[31] -= 1;
    assert!(PartialSig::<E>::from_bytes::<Secp256k1>(&order_minus_one).is_ok());
    assert!(PartialSig::<E>::from_bytes::<Secp256k1>(&[0u8; 32]).is_ok());

    assert!(PartialSig::<E>::from_bytes::<Secp256k1>(&ORDER).is_err());
    assert!(PartialSig::<E>::from_bytes::<Secp256k1>(&[0xff; 32]).is_err());
    assert!(PartialSig::<E>::from_bytes::<Secp256k1>(&[1u8; 31]).is_err());
    assert!(PartialSig::<E>::from_bytes::<Secp256k1>(&[1u8; 33]).is_err());
}

/// Test vector #0 from BIP-340
#[test]
fn bip340_signature() {
    let secret_key = hex!("0000000000000000000000000000000000000000000000000000000000000003");
    let public_key = hex!("F9308A019258C31049344F85F89D5229B531C845836F99B08601F113BCE036F9");
    let msg = [0u8; 32];
    let sig = hex!(
        "E907831F80848D1069A5371B402410364BDF1C5F8307B0084C55F1CE2DCA8215"
        "25F66A4A85EA8B71E482A74F382D2CE5EBEEE8FDB2172F477DF4900D310536C0"
    );

    let key_pair = KeyPair::<E>::from_secret_key_bytes::<Secp256k1>(&secret_key).unwrap();
    let pk = key_pair.x_only_public_key::<Secp256k1>();
    assert_eq!(pk.to_bytes(), public_key);
    assert_eq!(
        NormalizedPoint::<Secp256k1, NonZero<Point<E>>>::from_bytes(&public_key).unwrap(),
        pk
    );

    let signature = Signature::<Secp256k1>::from_bytes(&sig).unwrap();
    assert_eq!(signature.to_bytes(), sig);
    signature.verify(&pk, &msg).unwrap();

    let mut other_msg = msg;
    other_msg[31] = 1;
    assert!(signature.verify(&pk, &other_msg).is_err());
}

#[test]
fn invalid_signature() {
    let sig = hex!(
        "E907831F80848D1069A5371B402410364BDF1C5F8307B0084C55F1CE2DCA8215"
        "25F66A4A85EA8B71E482A74F382D2CE5EBEEE8FDB2172F477DF4900D310536C0"
    );

    let mut r_not_on_curve = sig;
    r_not_on_curve[..32].copy_from_slice(&NOT_ON_CURVE);
    assert!(Signature::<Secp256k1>::from_bytes(&r_not_on_curve).is_err());

    let mut s_out_of_range = sig;
    s_out_of_range[32..].copy_from_slice(&ORDER);
    assert!(Signature::<Secp256k1>::from_bytes(&s_out_of_range).is_err());

    assert!(Signature::<Secp256k1>::from_bytes(&sig[..63]).is_err());
}

#[test]
fn invalid_secret_key() {
    for secret_key in [[0u8; 32], ORDER, [0xff; 32]] {
        assert!(KeyPair::<E>::from_secret_key_bytes::<Secp256k1>(&secret_key).is_err());
    }
    assert!(KeyPair::<E>::from_secret_key_bytes::<Secp256k1>(&[1u8; 31]).is_err());
}

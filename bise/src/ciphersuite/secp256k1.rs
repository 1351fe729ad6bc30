use alloc::vec::Vec;

use digest::Digest;

use crate::Ciphersuite;

/// MuSig2(secp256k1, SHA-256) ciphersuite
///
/// Outputs [BIP-340] compliant signatures. Individual public keys of signers and the aggregated
/// public key are x-only, i.e. they implicitly have even Y coordinate.
///
/// [BIP-340]: https://github.com/bitcoin/bips/blob/master/bip-0340.mediawiki
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Secp256k1;

impl Ciphersuite for Secp256k1 {
    type Curve = generic_ec::curves::Secp256k1;
    type Digest = sha2::Sha256;

    fn nonce_seed_hash() -> Self::Digest {
        tagged_hash(b"MuSig/nonce")
    }
    fn nonce_expand_hash() -> Self::Digest {
        sha2::Sha256::new()
    }
    fn nonce_coef_hash() -> Self::Digest {
        tagged_hash(b"MuSig/noncecoef")
    }
    fn key_agg_list_hash() -> Self::Digest {
        tagged_hash(b"KeyAgg list")
    }
    fn key_agg_coef_hash() -> Self::Digest {
        tagged_hash(b"KeyAgg coefficient")
    }

    fn compute_challenge(
        nonce: &crate::ciphersuite::NormalizedPoint<
            Self,
            generic_ec::NonZero<generic_ec::Point<Self::Curve>>,
        >,
        public_key: &crate::ciphersuite::NormalizedPoint<
            Self,
            generic_ec::NonZero<generic_ec::Point<Self::Curve>>,
        >,
        msg: &[u8],
    ) -> generic_ec::Scalar<Self::Curve> {
        let challenge = tagged_hash(b"BIP0340/challenge")
            .chain_update(nonce.to_bytes())
            .chain_update(public_key.to_bytes())
            .chain_update(msg)
            .finalize();
        generic_ec::Scalar::from_be_bytes_mod_order(challenge)
    }

    type PointBytes = generic_ec::EncodedPoint<Self::Curve>;
    const POINT_SIZE: usize = 33;
    fn serialize_point(point: &generic_ec::Point<Self::Curve>) -> Self::PointBytes {
        point.to_bytes(true)
    }
    fn deserialize_point(
        bytes: &[u8],
    ) -> Result<generic_ec::Point<Self::Curve>, generic_ec::errors::InvalidPoint> {
        generic_ec::Point::from_bytes(bytes)
    }

    type ScalarBytes = generic_ec::EncodedScalar<Self::Curve>;
    const SCALAR_SIZE: usize = 32;
    fn serialize_scalar(scalar: &generic_ec::Scalar<Self::Curve>) -> Self::ScalarBytes {
        scalar.to_be_bytes()
    }
    fn deserialize_scalar(
        bytes: &[u8],
    ) -> Result<generic_ec::Scalar<Self::Curve>, generic_ec::errors::InvalidScalar> {
        generic_ec::Scalar::from_be_bytes(bytes)
    }

    fn is_normalized(point: &generic_ec::Point<Self::Curve>) -> bool {
        if point.is_zero() {
            return true;
        }
        // First byte of compressed point is either 2 or 3. 2 means the Y coordinate is even.
        let bytes = point.to_bytes(true);
        debug_assert!(matches!(bytes[0], 2 | 3));
        bytes[0] == 2
    }

    type NormalizedPointBytes = [u8; 32];
    const NORMALIZED_POINT_SIZE: usize = 32;
    fn serialize_normalized_point<P: AsRef<generic_ec::Point<Self::Curve>>>(
        point: &crate::ciphersuite::NormalizedPoint<Self, P>,
    ) -> Self::NormalizedPointBytes {
        let point: &generic_ec::Point<Self::Curve> = point.as_ref();
        let mut out = [0u8; 32];
        if !point.is_zero() {
            // Zero point has no X coordinate, we serialize it as 32 zero bytes
            out.copy_from_slice(&point.to_bytes(true)[1..]);
        }
        out
    }
    fn deserialize_normalized_point(
        bytes: &[u8],
    ) -> Result<
        crate::ciphersuite::NormalizedPoint<Self, generic_ec::Point<Self::Curve>>,
        generic_ec::errors::InvalidPoint,
    > {
        // X coordinate is lifted to the point with even Y, which corresponds to prefix 2
        // in compressed form. Input of wrong length results into invalid encoding.
        let mut compressed = Vec::with_capacity(bytes.len() + 1);
        compressed.push(2);
        compressed.extend_from_slice(bytes);
        let point = generic_ec::Point::from_bytes(&compressed)?;
        Ok(Self::normalize_point(point))
    }
}

/// Tagged hash as defined in [BIP-340]: `SHA256(SHA256(tag) || SHA256(tag) || ...)`
///
/// [BIP-340]: https://github.com/bitcoin/bips/blob/master/bip-0340.mediawiki#design
fn tagged_hash(tag: &[u8]) -> sha2::Sha256 {
    let tag = sha2::Sha256::digest(tag);
    sha2::Sha256::new().chain_update(tag).chain_update(tag)
}

// Secret nonces must never be duplicated
static_assertions::assert_not_impl_any!(
    crate::signing::round1::SecretNonce<generic_ec::curves::Secp256k1>: Clone, Copy
);

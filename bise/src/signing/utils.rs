use alloc::vec::Vec;

use digest::{FixedOutput, Update};
use generic_ec::{Curve, NonZero, Point, Scalar};

use crate::ciphersuite::{Ciphersuite, NormalizedPoint};

use super::{ParseError, ParseReason};

/// Derives a seed of the secret nonce
///
/// Hashes `session_id` followed by each of optional `inputs`. Each input is prefixed with
/// its length in a single byte, absent input is encoded as zero length, so the position of
/// every input in the hash is fixed.
///
/// Returns `None` if some input is longer than 255 bytes.
pub fn nonce_seed<C: Ciphersuite>(
    session_id: &[u8; 32],
    inputs: [Option<&[u8]>; 4],
) -> Option<digest::Output<C::Digest>> {
    let mut hash = C::nonce_seed_hash().chain(session_id);
    for input in inputs {
        match input {
            Some(input) => {
                let len = u8::try_from(input.len()).ok()?;
                hash.update(&[len]);
                hash.update(input);
            }
            None => hash.update(&[0]),
        }
    }
    Some(hash.finalize_fixed())
}

/// Expands the seed into `i`-th secret nonce
pub fn expand_nonce_seed<C: Ciphersuite>(
    seed: &digest::Output<C::Digest>,
    i: u8,
) -> Scalar<C::Curve> {
    let mut hash = C::nonce_expand_hash()
        .chain(seed)
        .chain([i])
        .finalize_fixed();
    let k = Scalar::from_be_bytes_mod_order(&hash);
    zeroize::Zeroize::zeroize(hash.as_mut_slice());
    k
}

/// Computes nonce coefficient `b = H(R_0, R_1, P, msg)`
pub fn compute_nonce_coef<C: Ciphersuite>(
    r0: &Point<C::Curve>,
    r1: &Point<C::Curve>,
    agg_public_key: &NormalizedPoint<C, NonZero<Point<C::Curve>>>,
    msg: &[u8],
) -> Scalar<C::Curve> {
    let hash = C::nonce_coef_hash()
        .chain(C::serialize_point(r0))
        .chain(C::serialize_point(r1))
        .chain(agg_public_key.to_bytes())
        .chain(msg)
        .finalize_fixed();
    Scalar::from_be_bytes_mod_order(hash)
}

/// Encodes pair of nonce points: `R_0 || R_1`
pub fn encode_nonce_pair<C: Ciphersuite>(
    r0: &Point<C::Curve>,
    r1: &Point<C::Curve>,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 * C::POINT_SIZE);
    out.extend_from_slice(C::serialize_point(r0).as_ref());
    out.extend_from_slice(C::serialize_point(r1).as_ref());
    out
}

/// Decodes pair of non-zero nonce points
pub fn decode_nonce_pair<C: Ciphersuite>(
    bytes: &[u8],
) -> Result<[NonZero<Point<C::Curve>>; 2], ParseError> {
    if bytes.len() != 2 * C::POINT_SIZE {
        return Err(ParseReason::Length {
            expected: 2 * C::POINT_SIZE,
            actual: bytes.len(),
        }
        .into());
    }
    let (r0, r1) = bytes.split_at(C::POINT_SIZE);
    Ok([decode_non_zero_point::<C>(r0)?, decode_non_zero_point::<C>(r1)?])
}

fn decode_non_zero_point<C: Ciphersuite>(
    bytes: &[u8],
) -> Result<NonZero<Point<C::Curve>>, ParseError> {
    let point = C::deserialize_point(bytes).map_err(|_| ParseReason::Point)?;
    NonZero::from_point(point).ok_or(ParseReason::ZeroPoint.into())
}

/// Returns `+1` if `negate` is false, and `-1` otherwise
pub fn sign<E: Curve>(negate: bool) -> Scalar<E> {
    if negate {
        -Scalar::one()
    } else {
        Scalar::one()
    }
}

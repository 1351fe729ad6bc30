//! Round 2 - Partial signing
//!
//! In the second round, each signer signs a message and obtains a [partial signature](PartialSig).
//! Partial signatures may be verified individually via [verify], which lets Coordinator
//! identify misbehaving signers.
//!
//! For more details, refer to [parent module](super) docs.

use core::fmt;

use generic_ec::{Curve, NonZero, Point, Scalar, SecretScalar};

use crate::{
    ciphersuite::{has_odd_y, Ciphersuite, NormalizedPoint},
    key_agg::KeyAggCache,
    KeyPair,
};

use super::{
    round1::{PublicNonce, SecretNonce},
    session::Session,
    utils, ParseError, ParseReason,
};

/// Partial signature
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(bound = "")
)]
pub struct PartialSig<E: Curve>(pub Scalar<E>);

impl<E: Curve> PartialSig<E> {
    /// Serializes partial signature as a big-endian scalar
    pub fn to_bytes<C: Ciphersuite<Curve = E>>(&self) -> C::ScalarBytes {
        C::serialize_scalar(&self.0)
    }

    /// Parses partial signature
    ///
    /// Returns error if bytes don't represent a scalar in canonical range
    pub fn from_bytes<C: Ciphersuite<Curve = E>>(bytes: &[u8]) -> Result<Self, ParseError> {
        if bytes.len() != C::SCALAR_SIZE {
            return Err(ParseReason::Length {
                expected: C::SCALAR_SIZE,
                actual: bytes.len(),
            }
            .into());
        }
        C::deserialize_scalar(bytes)
            .map(Self)
            .map_err(|_| ParseReason::Scalar.into())
    }
}

/// Issues a partial signature
///
/// Inputs:
/// * Secret nonce from [round 1](super::round1), consumed by the call
/// * Signer's key pair, public key of which was aggregated in `key_agg_cache`
/// * Key aggregation cache
/// * Signing [session](super::session)
///
/// Outputs a partial signature. Secret nonce is erased once the signature is computed.
///
/// **Never reuse nonces!** Signing twice with the same nonce leaks the secret key.
pub fn sign<C: Ciphersuite>(
    secret_nonce: SecretNonce<C::Curve>,
    key_pair: &KeyPair<C::Curve>,
    key_agg_cache: &KeyAggCache<C>,
    session: &Session<C>,
) -> PartialSig<C::Curve> {
    let (k0, k1) = secret_nonce.into_scalars();

    // Secret key is negated if either the signer's key or the aggregated key has odd Y, with
    // x-only tweaks possibly flipping the aggregated key's parity along the way
    let pk_odd = has_odd_y::<C>(&key_pair.public_key());
    let agg_pk_odd = has_odd_y::<C>(&key_agg_cache.agg_public_key_point());
    let negate_sk = (pk_odd != agg_pk_odd) != key_agg_cache.internal_key_parity();

    let mu = key_agg_cache.coefficient(&key_pair.x_only_public_key::<C>());
    let mut e_sk =
        utils::sign::<C::Curve>(negate_sk) * mu * session.challenge() * key_pair.secret_key();
    let e_sk = SecretScalar::new(&mut e_sk);

    // k = (k0 + b k1), negated if the final nonce has odd Y. Each secret intermediate is
    // moved into a `SecretScalar` right away
    let mut k1_b = k1 * session.nonce_coef();
    let k1_b = SecretScalar::new(&mut k1_b);
    let mut k = k0 + *k1_b.as_ref();
    let k = SecretScalar::new(&mut k);
    let mut k = k * utils::sign::<C::Curve>(session.fin_nonce_parity());
    let k = SecretScalar::new(&mut k);

    PartialSig(*k.as_ref() + *e_sk.as_ref())
}

/// Verifies a partial signature
///
/// Inputs:
/// * Partial signature to be verified
/// * Public nonce of the signer who issued the partial signature
/// * X-only public key of the signer
/// * Key aggregation cache
/// * Signing session
///
/// Verification of a partial signature is optional, as a final signature can be verified
/// instead. However, only partial verification can tell which signer misbehaved.
pub fn verify<C: Ciphersuite>(
    partial_sig: &PartialSig<C::Curve>,
    public_nonce: &PublicNonce<C::Curve>,
    public_key: &NormalizedPoint<C, NonZero<Point<C::Curve>>>,
    key_agg_cache: &KeyAggCache<C>,
    session: &Session<C>,
) -> Result<(), InvalidPartialSig> {
    // R_i = R_{i,0} + b R_{i,1}
    let r_i = (*public_nonce.r0 + *public_nonce.r1 * session.nonce_coef())
        * utils::sign::<C::Curve>(session.fin_nonce_parity());

    let agg_pk_odd = has_odd_y::<C>(&key_agg_cache.agg_public_key_point());
    let e_i = utils::sign::<C::Curve>(agg_pk_odd != key_agg_cache.internal_key_parity())
        * session.challenge()
        * key_agg_cache.coefficient(public_key);

    let lhs = Point::generator() * partial_sig.0;
    let rhs = r_i + **public_key * e_i;

    if lhs == rhs {
        Ok(())
    } else {
        Err(InvalidPartialSig)
    }
}

/// Partial signature is invalid
#[derive(Debug)]
pub struct InvalidPartialSig;

impl fmt::Display for InvalidPartialSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid partial signature")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidPartialSig {}

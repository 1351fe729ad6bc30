//! Nonce aggregation
//!
//! Coordinator sums public nonces of all signers into an [AggNonce]. Aggregated nonce is
//! then used by everyone to derive a [signing session](super::session::Session).

use alloc::vec::Vec;
use core::fmt;

use generic_ec::{Curve, NonZero, Point};

use crate::Ciphersuite;

use super::{round1::PublicNonce, utils, ParseError};

/// Aggregated nonce
///
/// Has the same form as a [public nonce](PublicNonce): a pair of points $(R_0, R_1)$,
/// where each point is the sum of respective points of all signers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(bound = "")
)]
pub struct AggNonce<E: Curve> {
    /// $R_0$ component
    pub r0: NonZero<Point<E>>,
    /// $R_1$ component
    pub r1: NonZero<Point<E>>,
}

impl<E: Curve> AggNonce<E> {
    /// Size of serialized aggregated nonce in bytes
    pub fn serialized_len<C: Ciphersuite<Curve = E>>() -> usize {
        2 * C::POINT_SIZE
    }

    /// Serializes aggregated nonce as `R_0 || R_1` where each point is in compressed form
    pub fn to_bytes<C: Ciphersuite<Curve = E>>(&self) -> Vec<u8> {
        utils::encode_nonce_pair::<C>(&self.r0, &self.r1)
    }

    /// Parses aggregated nonce
    ///
    /// Returns error if bytes don't encode two valid non-zero points
    pub fn from_bytes<C: Ciphersuite<Curve = E>>(bytes: &[u8]) -> Result<Self, ParseError> {
        let [r0, r1] = utils::decode_nonce_pair::<C>(bytes)?;
        Ok(Self { r0, r1 })
    }
}

/// Aggregates public nonces of all signers
///
/// Sums $R_0$ and $R_1$ components of the nonces independently. If any of the sums is
/// zero, it's replaced with the generator, so the aggregated nonce always consists of
/// non-zero points and can't be forced to degenerate by malicious signers.
///
/// Returns error if list of nonces is empty.
pub fn aggregate_nonces<E: Curve>(
    public_nonces: &[PublicNonce<E>],
) -> Result<AggNonce<E>, NonceAggError> {
    if public_nonces.is_empty() {
        return Err(Reason::NoNonces.into());
    }

    let (r0, r1) = public_nonces
        .iter()
        .fold((Point::zero(), Point::zero()), |(r0, r1), nonce| {
            (r0 + *nonce.r0, r1 + *nonce.r1)
        });

    Ok(AggNonce {
        r0: non_zero_or_generator(r0)?,
        r1: non_zero_or_generator(r1)?,
    })
}

fn non_zero_or_generator<E: Curve>(point: Point<E>) -> Result<NonZero<Point<E>>, Bug> {
    match NonZero::from_point(point) {
        Some(point) => Ok(point),
        None => NonZero::from_point(Point::generator().to_point()).ok_or(Bug::ZeroGenerator),
    }
}

/// Nonce aggregation error
#[derive(Debug)]
pub struct NonceAggError(Reason);

#[derive(Debug)]
enum Reason {
    NoNonces,
    Bug(Bug),
}

#[derive(Debug)]
enum Bug {
    ZeroGenerator,
}

impl fmt::Display for NonceAggError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Reason::NoNonces => f.write_str("list of public nonces is empty"),
            Reason::Bug(_) => f.write_str("bug occurred"),
        }
    }
}

impl fmt::Display for Bug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bug::ZeroGenerator => f.write_str("generator is zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NonceAggError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.0 {
            Reason::NoNonces => None,
            Reason::Bug(bug) => Some(bug),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Bug {}

impl From<Reason> for NonceAggError {
    fn from(err: Reason) -> Self {
        NonceAggError(err)
    }
}
impl From<Bug> for NonceAggError {
    fn from(err: Bug) -> Self {
        NonceAggError(Reason::Bug(err))
    }
}

//! Partial signatures aggregation
//!
//! In this phase, Coordinator aggregates partial signatures into a regular Schnorr signature.
//! Partial signatures are not verified during aggregation: either verify each of them
//! beforehand via [round2::verify](super::round2::verify), or verify the resulting signature.
//!
//! For more details, refer to [parent module](super) docs.

use alloc::vec::Vec;
use core::fmt;

use generic_ec::{NonZero, Point, Scalar};

use crate::{ciphersuite::NormalizedPoint, Ciphersuite};

use super::{round2::PartialSig, session::Session, ParseError, ParseReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(bound = "")
)]
/// Schnorr Signature
pub struct Signature<C: Ciphersuite> {
    /// $R$ component of the signature
    pub r: NormalizedPoint<C, NonZero<Point<C::Curve>>>,
    /// $s$ component of the signature
    pub s: Scalar<C::Curve>,
}

impl<C: Ciphersuite> Signature<C> {
    /// Verifies signature against a public key and a message
    pub fn verify(
        &self,
        public_key: &NormalizedPoint<C, NonZero<Point<C::Curve>>>,
        msg: &[u8],
    ) -> Result<(), InvalidSignature> {
        let challenge = C::compute_challenge(&self.r, public_key, msg);

        let lhs = Point::generator() * self.s;
        let rhs = **self.r + **public_key * challenge;

        if lhs == rhs {
            Ok(())
        } else {
            Err(InvalidSignature)
        }
    }

    /// Size of serialized signature in bytes
    pub fn serialized_len() -> usize {
        C::NORMALIZED_POINT_SIZE + C::SCALAR_SIZE
    }

    /// Serializes signature as `R_x || s`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::serialized_len());
        out.extend_from_slice(self.r.to_bytes().as_ref());
        out.extend_from_slice(C::serialize_scalar(&self.s).as_ref());
        out
    }

    /// Parses signature
    ///
    /// Returns error if $R$ doesn't encode X coordinate of a point, or if $s$ is not
    /// in canonical range
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        if bytes.len() != Self::serialized_len() {
            return Err(ParseReason::Length {
                expected: Self::serialized_len(),
                actual: bytes.len(),
            }
            .into());
        }
        let (r, s) = bytes.split_at(C::NORMALIZED_POINT_SIZE);
        let r = NormalizedPoint::from_bytes(r).ok_or(ParseReason::Point)?;
        let s = C::deserialize_scalar(s).map_err(|_| ParseReason::Scalar)?;
        Ok(Self { r, s })
    }
}

/// Aggregates [partial signatures](PartialSig) into a regular [Schnorr signature](Signature)
///
/// Inputs:
/// * Signing session
/// * Partial signatures of all signers
///
/// Returns error if list of partial signatures is empty.
pub fn aggregate<C: Ciphersuite>(
    session: &Session<C>,
    partial_sigs: &[PartialSig<C::Curve>],
) -> Result<Signature<C>, AggregateError> {
    if partial_sigs.is_empty() {
        return Err(Reason::NoPartialSigs.into());
    }

    let s = partial_sigs
        .iter()
        .fold(session.tweak_term(), |acc, partial_sig| acc + partial_sig.0);

    Ok(Signature {
        r: session.fin_nonce(),
        s,
    })
}

/// Aggregation error
#[derive(Debug)]
pub struct AggregateError(Reason);

#[derive(Debug)]
enum Reason {
    NoPartialSigs,
}

impl From<Reason> for AggregateError {
    fn from(err: Reason) -> Self {
        Self(err)
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Reason::NoPartialSigs => f.write_str("list of partial signatures is empty"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AggregateError {}

/// Signature verification failed
#[derive(Debug)]
pub struct InvalidSignature;

impl fmt::Display for InvalidSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid signature")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidSignature {}

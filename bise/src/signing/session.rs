//! Signing session
//!
//! Once nonces are aggregated, a session is derived from the aggregated nonce, the message
//! and the key aggregation cache. Session is the same for all signers, so it can be either
//! computed by each signer independently or computed once by Coordinator and shared.

use core::fmt;

use generic_ec::{NonZero, Point, Scalar};

use crate::{
    ciphersuite::{has_odd_y, Ciphersuite, NormalizedPoint},
    key_agg::KeyAggCache,
};

use super::{nonce_agg::AggNonce, utils};

/// Signing session
///
/// Holds the final nonce $R$, nonce coefficient $b$, challenge $e$ and the part of the
/// signature contributed by tweaks.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(bound = "")
)]
pub struct Session<C: Ciphersuite> {
    fin_nonce: NormalizedPoint<C, NonZero<Point<C::Curve>>>,
    fin_nonce_parity: bool,
    nonce_coef: Scalar<C::Curve>,
    challenge: Scalar<C::Curve>,
    tweak_term: Scalar<C::Curve>,
}

impl<C: Ciphersuite> Session<C> {
    /// Final nonce $R$ normalized to even Y
    ///
    /// This is the $R$ component of the final signature.
    pub fn fin_nonce(&self) -> NormalizedPoint<C, NonZero<Point<C::Curve>>> {
        self.fin_nonce
    }

    /// Indicates whether the final nonce had odd Y before normalization
    ///
    /// Needed to [adapt](super::aggregate::Signature::adapt) an adaptor signature.
    pub fn fin_nonce_parity(&self) -> bool {
        self.fin_nonce_parity
    }

    /// Nonce coefficient $b$
    pub fn nonce_coef(&self) -> Scalar<C::Curve> {
        self.nonce_coef
    }

    /// Schnorr challenge $e$
    pub fn challenge(&self) -> Scalar<C::Curve> {
        self.challenge
    }

    /// Part of the signature contributed by tweaks, $\pm e \cdot t$
    ///
    /// Added by Coordinator at aggregation.
    pub fn tweak_term(&self) -> Scalar<C::Curve> {
        self.tweak_term
    }
}

/// Builder of the [Session]
pub struct SessionBuilder<'a, C: Ciphersuite> {
    agg_nonce: &'a AggNonce<C::Curve>,
    msg: &'a [u8; 32],
    key_agg_cache: &'a KeyAggCache<C>,
    adaptor: Option<NonZero<Point<C::Curve>>>,
}

impl<'a, C: Ciphersuite> SessionBuilder<'a, C> {
    /// Constructs a session builder
    ///
    /// Inputs:
    /// * Nonce aggregated from public nonces of all signers
    /// * `msg` to be signed
    /// * Key aggregation cache
    pub fn new(
        agg_nonce: &'a AggNonce<C::Curve>,
        msg: &'a [u8; 32],
        key_agg_cache: &'a KeyAggCache<C>,
    ) -> Self {
        Self {
            agg_nonce,
            msg,
            key_agg_cache,
            adaptor: None,
        }
    }

    /// Sets adaptor point $T$
    ///
    /// Final nonce will be shifted by $T$, so signature produced in this session will be a
    /// pre-signature: it becomes valid only after it's adapted with the discrete log of $T$.
    pub fn set_adaptor(mut self, adaptor: NonZero<Point<C::Curve>>) -> Self {
        self.adaptor = Some(adaptor);
        self
    }

    /// Derives the session
    ///
    /// Returns error if nonce becomes zero: that happens with negligible probability
    /// unless the adaptor point is chosen to cancel out the aggregated nonce.
    pub fn build(self) -> Result<Session<C>, SessionError> {
        let agg_public_key = self.key_agg_cache.agg_public_key();

        let r0 = match self.adaptor {
            Some(adaptor) => *self.agg_nonce.r0 + *adaptor,
            None => *self.agg_nonce.r0,
        };
        if r0.is_zero() {
            return Err(Reason::AdaptedNonceIsZero.into());
        }
        let r1 = *self.agg_nonce.r1;

        let nonce_coef = utils::compute_nonce_coef::<C>(&r0, &r1, &agg_public_key, self.msg);

        // R = R_0 + b R_1
        let fin_nonce =
            NonZero::from_point(r0 + r1 * nonce_coef).ok_or(Reason::FinalNonceIsZero)?;
        let (fin_nonce, fin_nonce_parity) =
            match NormalizedPoint::<C, _>::try_normalize(fin_nonce) {
                Ok(fin_nonce) => (fin_nonce, false),
                Err(neg_fin_nonce) => (neg_fin_nonce, true),
            };

        let challenge = C::compute_challenge(&fin_nonce, &agg_public_key, self.msg);

        let tweak = self.key_agg_cache.tweak();
        let tweak_term = if tweak.is_zero() {
            Scalar::zero()
        } else {
            let odd_y = has_odd_y::<C>(&self.key_agg_cache.agg_public_key_point());
            utils::sign::<C::Curve>(odd_y) * challenge * tweak
        };

        Ok(Session {
            fin_nonce,
            fin_nonce_parity,
            nonce_coef,
            challenge,
            tweak_term,
        })
    }
}

/// Session derivation error
#[derive(Debug)]
pub struct SessionError(Reason);

#[derive(Debug)]
enum Reason {
    AdaptedNonceIsZero,
    FinalNonceIsZero,
}

impl From<Reason> for SessionError {
    fn from(err: Reason) -> Self {
        Self(err)
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Reason::AdaptedNonceIsZero => {
                f.write_str("aggregated nonce shifted by the adaptor is zero")
            }
            Reason::FinalNonceIsZero => f.write_str("final nonce is zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SessionError {}

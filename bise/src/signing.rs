//! MuSig2 Signing Protocol
//!
//! Signing is carried out in two rounds. We assume presence of Coordinator, it can be either
//! some entity in the system, or any of the signers.
//!
//! 0. Public keys of all signers are aggregated via [KeyAggCache::new](crate::key_agg::KeyAggCache::new).
//!    The aggregated key can be tweaked before signing.
//! 1. Each signer generates nonces via [round1::NonceGenerator] \
//!    Inputs: fresh random session id and, optionally, secret key, message, key aggregation cache
//!    and extra input. Message doesn't need to be known at this point yet. \
//!    Outputs:
//!    * [round1::SecretNonce] that needs to be kept secret
//!    * [round1::PublicNonce] that needs to be sent to Coordinator
//! 2. Coordinator aggregates public nonces via [nonce_agg::aggregate_nonces] and sends resulting
//!    [nonce_agg::AggNonce] to each signer.
//! 3. Anyone who knows the aggregated nonce, the message and the key aggregation cache can
//!    derive a [session::Session] via [session::SessionBuilder].
//! 4. Each signer signs a message via [round2::sign], and sends resulting [round2::PartialSig]
//!    to Coordinator. Secret nonce is consumed by signing and can never be used again.
//! 5. Coordinator may check each partial signature via [round2::verify] to identify signers who
//!    misbehaved. Then it aggregates partial signatures via [aggregate::aggregate] into a
//!    regular [aggregate::Signature].
//!
//! If an adaptor point was set at step 3, the output of step 5 is a pre-signature that becomes
//! valid only after it's [adapted](aggregate::Signature::adapt) with a secret adaptor, see
//! [adaptor] module.
//!
//! ## Nonce reuse
//! Using the same secret nonce to sign twice leaks the secret key. [round2::sign] takes the
//! secret nonce by value and [round1::SecretNonce] can neither be copied nor cloned, so
//! reusing it is rejected at compile time:
//!
//! ```rust,compile_fail
//! # use bise::{ciphersuite::Secp256k1, key_agg::KeyAggCache, signing::*, KeyPair};
//! # fn f(
//! #     secret_nonce: round1::SecretNonce<bise::generic_ec::curves::Secp256k1>,
//! #     key_pair: &KeyPair<bise::generic_ec::curves::Secp256k1>,
//! #     key_agg_cache: &KeyAggCache<Secp256k1>,
//! #     session: &session::Session<Secp256k1>,
//! # ) {
//! let partial_sig1 = round2::sign(secret_nonce, key_pair, key_agg_cache, session);
//! let partial_sig2 = round2::sign(secret_nonce, key_pair, key_agg_cache, session);
//! # }
//! ```

use core::fmt;

pub mod adaptor;
pub mod aggregate;
pub mod nonce_agg;
pub mod round1;
pub mod round2;
pub mod session;
mod utils;

/// Error parsing a serialized value
#[derive(Debug)]
pub struct ParseError(ParseReason);

#[derive(Debug)]
enum ParseReason {
    Length { expected: usize, actual: usize },
    Point,
    ZeroPoint,
    Scalar,
}

impl From<ParseReason> for ParseError {
    fn from(err: ParseReason) -> Self {
        Self(err)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            ParseReason::Length { expected, actual } => {
                write!(f, "expected {expected} bytes, got {actual} bytes")
            }
            ParseReason::Point => f.write_str("invalid point encoding"),
            ParseReason::ZeroPoint => f.write_str("point is zero"),
            ParseReason::Scalar => f.write_str("scalar is not in canonical range"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

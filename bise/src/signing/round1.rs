//! Round 1 - Nonce generation
//!
//! In the first round, each signer generates a pair of secret nonces and sends the
//! corresponding [PublicNonce] to Coordinator.
//!
//! Nonces are derived deterministically from a session id and optional inputs, see
//! [NonceGenerator]. Session id must be fresh and random for every signing attempt: it's the
//! only input that guarantees that nonces are never repeated. The optional inputs (secret key,
//! message, aggregated public key, extra input) are mixed in as defense-in-depth against a
//! broken source of randomness.
//!
//! Note that when secret key is provided, it's hashed directly, so nonce derivation doesn't
//! have the same side-channel resistance as deterministic nonce derivation in BIP-340.
//! The derivation can't be changed without breaking compatibility with other implementations
//! of the protocol.

use alloc::vec::Vec;
use core::fmt;

use generic_ec::{Curve, NonZero, Point, SecretScalar};
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use crate::{key_agg::KeyAggCache, Ciphersuite};

use super::{utils, ParseError};

/// Secret nonce
///
/// Pair of secret scalars $(k_0, k_1)$. Secret nonce can be used for signing only once:
/// it can't be copied or cloned, and [signing](super::round2::sign) takes it by value.
/// Secret scalars are erased from memory when nonce is dropped.
pub struct SecretNonce<E: Curve> {
    k0: SecretScalar<E>,
    k1: SecretScalar<E>,
}

impl<E: Curve> SecretNonce<E> {
    /// Consumes the nonce and returns the secret scalars
    pub(crate) fn into_scalars(self) -> (SecretScalar<E>, SecretScalar<E>) {
        (self.k0, self.k1)
    }
}

impl<E: Curve> fmt::Debug for SecretNonce<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretNonce(<redacted>)")
    }
}

/// Public nonce
///
/// Pair of points $(R_0, R_1) = (k_0 \cdot G, k_1 \cdot G)$ that corresponds to the [SecretNonce].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(bound = "")
)]
pub struct PublicNonce<E: Curve> {
    /// $R_0$ component
    pub r0: NonZero<Point<E>>,
    /// $R_1$ component
    pub r1: NonZero<Point<E>>,
}

impl<E: Curve> PublicNonce<E> {
    /// Size of serialized public nonce in bytes
    pub fn serialized_len<C: Ciphersuite<Curve = E>>() -> usize {
        2 * C::POINT_SIZE
    }

    /// Serializes public nonce as `R_0 || R_1` where each point is in compressed form
    pub fn to_bytes<C: Ciphersuite<Curve = E>>(&self) -> Vec<u8> {
        utils::encode_nonce_pair::<C>(&self.r0, &self.r1)
    }

    /// Parses public nonce
    ///
    /// Returns error if bytes don't encode two valid non-zero points
    pub fn from_bytes<C: Ciphersuite<Curve = E>>(bytes: &[u8]) -> Result<Self, ParseError> {
        let [r0, r1] = utils::decode_nonce_pair::<C>(bytes)?;
        Ok(Self { r0, r1 })
    }
}

/// Nonce generator
///
/// Derives [SecretNonce] and [PublicNonce] from a session id and optional inputs.
///
/// ## Example
/// ```rust
/// use bise::ciphersuite::Secp256k1;
/// use rand_core::RngCore;
///
/// let mut session_id = [0u8; 32];
/// rand_core::OsRng.fill_bytes(&mut session_id);
///
/// let (secret_nonce, public_nonce) =
///     bise::signing::round1::NonceGenerator::<Secp256k1>::new(&session_id)
///         .set_message(b"32 bytes message to be signed!!!")
///         .generate()?;
/// # Ok::<_, bise::signing::round1::NonceGenError>(())
/// ```
pub struct NonceGenerator<'a, C: Ciphersuite> {
    session_id: &'a [u8; 32],
    secret_key: Option<&'a [u8; 32]>,
    msg: Option<&'a [u8; 32]>,
    key_agg_cache: Option<&'a KeyAggCache<C>>,
    extra_input: Option<&'a [u8; 32]>,
}

impl<'a, C: Ciphersuite> NonceGenerator<'a, C> {
    /// Constructs a nonce generator
    ///
    /// `session_id` must be generated uniformly at random for every call of [`generate`](Self::generate).
    pub fn new(session_id: &'a [u8; 32]) -> Self {
        Self {
            session_id,
            secret_key: None,
            msg: None,
            key_agg_cache: None,
            extra_input: None,
        }
    }

    /// Mixes secret key that will be used for signing into nonce derivation
    ///
    /// When secret key is specified, `session_id` may be zero. Nonce generation fails
    /// if secret key is not a valid non-zero scalar.
    pub fn set_secret_key(mut self, secret_key: &'a [u8; 32]) -> Self {
        self.secret_key = Some(secret_key);
        self
    }

    /// Mixes message to be signed into nonce derivation
    pub fn set_message(mut self, msg: &'a [u8; 32]) -> Self {
        self.msg = Some(msg);
        self
    }

    /// Mixes aggregated public key into nonce derivation
    ///
    /// Binds the nonce to the specific set of signers and tweaks.
    pub fn set_key_agg_cache(mut self, key_agg_cache: &'a KeyAggCache<C>) -> Self {
        self.key_agg_cache = Some(key_agg_cache);
        self
    }

    /// Mixes extra input into nonce derivation
    pub fn set_extra_input(mut self, extra_input: &'a [u8; 32]) -> Self {
        self.extra_input = Some(extra_input);
        self
    }

    /// Derives secret and public nonces
    ///
    /// Returns error if secret key is not specified and session id is zero, or if the
    /// secret key is invalid. Inputs are validated without early exits, so the time it
    /// takes to validate them doesn't depend on the secret key.
    pub fn generate(
        self,
    ) -> Result<(SecretNonce<C::Curve>, PublicNonce<C::Curve>), NonceGenError> {
        let mut valid = Choice::from(1);

        if self.secret_key.is_none() {
            let mut acc = self.session_id.iter().fold(0u8, |acc, byte| acc | byte);
            valid &= !acc.ct_eq(&0);
            acc.zeroize();
        }
        if let Some(secret_key) = self.secret_key {
            let in_range = C::deserialize_secret_scalar(secret_key).is_ok();
            let is_zero = secret_key[..].ct_eq(&[0u8; 32][..]);
            valid &= Choice::from(u8::from(in_range)) & !is_zero;
        }

        let agg_pk = self
            .key_agg_cache
            .map(|cache| cache.agg_public_key().to_bytes());

        let mut seed = utils::nonce_seed::<C>(
            self.session_id,
            [
                self.msg.map(|msg| &msg[..]),
                self.secret_key.map(|sk| &sk[..]),
                agg_pk.as_ref().map(AsRef::<[u8]>::as_ref),
                self.extra_input.map(|input| &input[..]),
            ],
        )
        .ok_or(Bug::NonceSeedInput)?;

        let mut k0 = utils::expand_nonce_seed::<C>(&seed, 0);
        let mut k1 = utils::expand_nonce_seed::<C>(&seed, 1);
        seed.as_mut_slice().zeroize();

        debug_assert!(!k0.is_zero());
        debug_assert!(!k1.is_zero());
        debug_assert!(k0 != k1);

        let secret_nonce = SecretNonce {
            k0: SecretScalar::new(&mut k0),
            k1: SecretScalar::new(&mut k1),
        };
        let public_nonce = PublicNonce {
            r0: NonZero::from_point(Point::generator() * &secret_nonce.k0)
                .ok_or(Bug::ZeroPublicNonce)?,
            r1: NonZero::from_point(Point::generator() * &secret_nonce.k1)
                .ok_or(Bug::ZeroPublicNonce)?,
        };

        if !bool::from(valid) {
            return Err(Reason::InvalidInput.into());
        }
        Ok((secret_nonce, public_nonce))
    }
}

/// Nonce generation error
#[derive(Debug)]
pub struct NonceGenError(Reason);

#[derive(Debug)]
enum Reason {
    InvalidInput,
    Bug(Bug),
}

#[derive(Debug)]
enum Bug {
    NonceSeedInput,
    ZeroPublicNonce,
}

impl fmt::Display for NonceGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Reason::InvalidInput => f.write_str(
                "invalid input: either session id is zero and secret key \
                is not provided, or secret key is invalid",
            ),
            Reason::Bug(_) => f.write_str("bug occurred"),
        }
    }
}

impl fmt::Display for Bug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bug::NonceSeedInput => f.write_str("nonce seed input is too long"),
            Bug::ZeroPublicNonce => f.write_str("public nonce is zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NonceGenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.0 {
            Reason::InvalidInput => None,
            Reason::Bug(bug) => Some(bug),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Bug {}

impl From<Reason> for NonceGenError {
    fn from(err: Reason) -> Self {
        NonceGenError(err)
    }
}
impl From<Bug> for NonceGenError {
    fn from(err: Bug) -> Self {
        NonceGenError(Reason::Bug(err))
    }
}

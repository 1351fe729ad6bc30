//! Key aggregation
//!
//! Aggregates x-only public keys of all signers into a single public key that the final
//! signature will verify under. Resulting [KeyAggCache] carries everything that's needed later
//! in the signing: the aggregated key, coefficients of individual keys, and the history of
//! tweaks applied to the aggregated key.
//!
//! ## Tweaks
//! Aggregated key can be tweaked, so the signers can produce a signature under the tweaked key
//! without changing their secret keys. There are two kinds of tweaks:
//! * [plain](KeyAggCache::plain_tweak_add): $P' = P + t \cdot G$
//! * [x-only](KeyAggCache::xonly_tweak_add): $P' = |P| + t \cdot G$ where $|P|$ is the key
//!   normalized to even Y coordinate, this is how BIP-32 and BIP-341 tweak the keys respectively.
//!
//! Any number of tweaks can be applied in any order.

use core::fmt;

use digest::{FixedOutput, Update};
use generic_ec::{NonZero, Point, Scalar};

use crate::ciphersuite::{has_odd_y, Ciphersuite, NormalizedPoint};

#[cfg(feature = "taproot")]
pub mod taproot;

/// Key aggregation cache
///
/// Output of the key aggregation. Stores the aggregated public key, data needed to
/// compute coefficients of individual keys, and the accumulated tweak.
#[derive(Debug, Clone)]
pub struct KeyAggCache<C: Ciphersuite> {
    /// Aggregated public key, possibly with odd Y coordinate
    pk: NonZero<Point<C::Curve>>,
    /// First public key in the list that is distinct from the first one
    second_pk: Option<NormalizedPoint<C, NonZero<Point<C::Curve>>>>,
    /// Commitment to the list of public keys
    pk_hash: digest::Output<C::Digest>,
    tweak: Scalar<C::Curve>,
    internal_key_parity: bool,
}

impl<C: Ciphersuite> KeyAggCache<C> {
    /// Aggregates the public keys
    ///
    /// Order of the keys matters: the same set of keys in a different order results into
    /// a different aggregated key. The same key may appear in the list more than once.
    ///
    /// Returns error if the list is empty or if aggregated key is zero (probability of
    /// that is negligible unless public keys were chosen maliciously).
    pub fn new(
        public_keys: &[NormalizedPoint<C, NonZero<Point<C::Curve>>>],
    ) -> Result<Self, KeyAggError> {
        let first_pk = public_keys.first().ok_or(Reason::NoPublicKeys)?;

        let pk_hash = public_keys
            .iter()
            .fold(C::key_agg_list_hash(), |hash, pk| hash.chain(pk.to_bytes()))
            .finalize_fixed();
        let second_pk = public_keys.iter().find(|pk| **pk != *first_pk).copied();

        let pk = public_keys.iter().fold(Point::zero(), |acc, pk_i| {
            let mu_i = key_agg_coef::<C>(&pk_hash, second_pk.as_ref(), pk_i);
            let pk_i: &Point<C::Curve> = pk_i.as_ref();
            acc + *pk_i * mu_i
        });
        let pk = NonZero::from_point(pk).ok_or(Reason::AggregatedKeyIsZero)?;

        Ok(Self {
            pk,
            second_pk,
            pk_hash,
            tweak: Scalar::zero(),
            internal_key_parity: false,
        })
    }

    /// Aggregated public key
    ///
    /// Final signature is valid under this (x-only) public key. If any tweaks were applied,
    /// the key is tweaked accordingly.
    pub fn agg_public_key(&self) -> NormalizedPoint<C, NonZero<Point<C::Curve>>> {
        C::normalize_point(self.pk)
    }

    /// Aggregated public key as a point, without normalization
    ///
    /// After [plain tweak](Self::plain_tweak_add) the key may have odd Y coordinate, which
    /// matters if it's going to be tweaked further.
    pub fn agg_public_key_point(&self) -> NonZero<Point<C::Curve>> {
        self.pk
    }

    /// Sum of all tweaks applied to the aggregated key, with sign adjusted by x-only tweaks
    pub fn tweak(&self) -> Scalar<C::Curve> {
        self.tweak
    }

    /// Net parity flip accumulated by x-only tweaks
    ///
    /// `true` if the key had odd Y coordinate before an odd number of x-only tweaks.
    pub fn internal_key_parity(&self) -> bool {
        self.internal_key_parity
    }

    /// Key aggregation coefficient of the signer with given public key
    ///
    /// Doesn't check whether the key was in the list of aggregated keys.
    pub fn coefficient(
        &self,
        public_key: &NormalizedPoint<C, NonZero<Point<C::Curve>>>,
    ) -> Scalar<C::Curve> {
        key_agg_coef::<C>(&self.pk_hash, self.second_pk.as_ref(), public_key)
    }

    /// Applies plain tweak to the aggregated key
    ///
    /// Computes $P' = P + t \cdot G$. Returns tweaked public key, or error if it's zero,
    /// in which case the cache is left unchanged.
    pub fn plain_tweak_add(
        &mut self,
        tweak: Scalar<C::Curve>,
    ) -> Result<NonZero<Point<C::Curve>>, TweakError> {
        self.tweak_add(tweak, false)
    }

    /// Applies x-only tweak to the aggregated key
    ///
    /// Computes $P' = |P| + t \cdot G$ where $|P|$ is $P$ normalized to even Y. Returns tweaked
    /// public key, or error if it's zero, in which case the cache is left unchanged.
    pub fn xonly_tweak_add(
        &mut self,
        tweak: Scalar<C::Curve>,
    ) -> Result<NonZero<Point<C::Curve>>, TweakError> {
        self.tweak_add(tweak, true)
    }

    fn tweak_add(
        &mut self,
        tweak: Scalar<C::Curve>,
        xonly: bool,
    ) -> Result<NonZero<Point<C::Curve>>, TweakError> {
        let mut pk = self.pk;
        let mut acc_tweak = self.tweak;
        let mut internal_key_parity = self.internal_key_parity;

        if xonly && has_odd_y::<C>(&pk) {
            pk = -pk;
            acc_tweak = -acc_tweak;
            internal_key_parity = !internal_key_parity;
        }

        let pk = NonZero::from_point(*pk + Point::generator() * tweak)
            .ok_or(TweakReason::TweakedKeyIsZero)?;

        self.pk = pk;
        self.tweak = acc_tweak + tweak;
        self.internal_key_parity = internal_key_parity;
        Ok(pk)
    }
}

/// Computes key aggregation coefficient of `pk`
///
/// Coefficient of the second distinct key in the list is always one, which saves one
/// scalar multiplication in key aggregation.
fn key_agg_coef<C: Ciphersuite>(
    pk_hash: &digest::Output<C::Digest>,
    second_pk: Option<&NormalizedPoint<C, NonZero<Point<C::Curve>>>>,
    pk: &NormalizedPoint<C, NonZero<Point<C::Curve>>>,
) -> Scalar<C::Curve> {
    if second_pk == Some(pk) {
        return Scalar::one();
    }
    let hash = C::key_agg_coef_hash()
        .chain(pk_hash)
        .chain(pk.to_bytes())
        .finalize_fixed();
    Scalar::from_be_bytes_mod_order(hash)
}

/// Key aggregation error
#[derive(Debug)]
pub struct KeyAggError(Reason);

#[derive(Debug)]
enum Reason {
    NoPublicKeys,
    AggregatedKeyIsZero,
}

impl From<Reason> for KeyAggError {
    fn from(err: Reason) -> Self {
        Self(err)
    }
}

impl fmt::Display for KeyAggError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Reason::NoPublicKeys => f.write_str("list of public keys is empty"),
            Reason::AggregatedKeyIsZero => f.write_str("aggregated public key is zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for KeyAggError {}

/// Tweaking the key failed
#[derive(Debug)]
pub struct TweakError(TweakReason);

#[derive(Debug)]
enum TweakReason {
    TweakedKeyIsZero,
    #[cfg_attr(not(feature = "taproot"), allow(dead_code))]
    UndefinedTaprootTweak,
}

impl From<TweakReason> for TweakError {
    fn from(err: TweakReason) -> Self {
        Self(err)
    }
}

impl fmt::Display for TweakError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            TweakReason::TweakedKeyIsZero => f.write_str("tweaked public key is zero"),
            TweakReason::UndefinedTaprootTweak => {
                f.write_str("taproot tweak is not defined for given input")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TweakError {}

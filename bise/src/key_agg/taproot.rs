//! Taproot tweak
//!
//! This module provides functionality for tweaking the aggregated public key
//! to obtain a taproot output key following the
//! [BIP-341](https://github.com/bitcoin/bips/blob/master/bip-0341.mediawiki)

use digest::Digest;
use generic_ec::{NonZero, Point, Scalar};

use crate::{ciphersuite::NormalizedPoint, Ciphersuite};

use super::{KeyAggCache, TweakError, TweakReason};

/// Calculates the tweak for given (normalized) public key and merkle root
///
/// Returns `None` if the hash doesn't represent a scalar in canonical range (probability
/// of that is negligible).
pub fn tweak<C: Ciphersuite>(
    public_key: &NormalizedPoint<C, NonZero<Point<C::Curve>>>,
    merkle_root: Option<[u8; 32]>,
) -> Option<Scalar<C::Curve>> {
    let tag = sha2::Sha256::digest("TapTweak");
    let hash = sha2::Sha256::new()
        .chain_update(tag)
        .chain_update(tag)
        .chain_update(public_key.to_bytes())
        .chain_update(if let Some(root) = &merkle_root {
            root.as_slice()
        } else {
            &[]
        })
        .finalize();
    Scalar::from_be_bytes(hash).ok()
}

impl<C: Ciphersuite> KeyAggCache<C> {
    /// Tweaks the aggregated key with specified merkle root following [BIP-341]
    ///
    /// Applies x-only tweak derived from the current aggregated key and `merkle_root`. If the
    /// key is meant to be spent via key path only, `merkle_root` should be `None`.
    ///
    /// Returns tweaked public key. On error, the cache is left unchanged.
    ///
    /// [BIP-341]: https://github.com/bitcoin/bips/blob/master/bip-0341.mediawiki
    pub fn taproot_tweak_add(
        &mut self,
        merkle_root: Option<[u8; 32]>,
    ) -> Result<NonZero<Point<C::Curve>>, TweakError> {
        let t = tweak::<C>(&self.agg_public_key(), merkle_root)
            .ok_or(TweakReason::UndefinedTaprootTweak)?;
        self.xonly_tweak_add(t)
    }
}

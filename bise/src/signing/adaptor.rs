//! Adaptor signatures
//!
//! When [adaptor point](super::session::SessionBuilder::set_adaptor) $T = t \cdot G$ is set, the
//! signers produce a pre-signature instead of a valid signature. Pre-signature becomes valid
//! once it's adapted with the adaptor secret $t$. Conversely, anyone who knows both the
//! pre-signature and the adapted signature can extract $t$.
//!
//! Both operations need the [parity of the final nonce](super::session::Session::fin_nonce_parity)
//! of the session in which the pre-signature was produced.
//!
//! ## Example
//! ```rust
//! # use bise::{ciphersuite::Secp256k1, signing::{aggregate::Signature, adaptor}};
//! # use bise::generic_ec::{curves::Secp256k1 as E, NonZero, SecretScalar};
//! # fn f(pre_sig: Signature<Secp256k1>, t: NonZero<SecretScalar<E>>, nonce_parity: bool) {
//! let sig = pre_sig.adapt(&t, nonce_parity);
//! let extracted = adaptor::extract_adaptor(&sig, &pre_sig, nonce_parity);
//! # }
//! ```

use generic_ec::{NonZero, SecretScalar};

use crate::Ciphersuite;

use super::{aggregate::Signature, utils};

impl<C: Ciphersuite> Signature<C> {
    /// Adapts a pre-signature with the adaptor secret $t$
    ///
    /// Returns $s + t$ if the final nonce had even Y, and $s - t$ otherwise.
    /// $R$ component is left unchanged.
    pub fn adapt(
        self,
        adaptor_secret: &NonZero<SecretScalar<C::Curve>>,
        nonce_parity: bool,
    ) -> Self {
        Self {
            r: self.r,
            s: self.s + utils::sign::<C::Curve>(nonce_parity) * adaptor_secret,
        }
    }
}

/// Extracts the adaptor secret $t$ from a signature and the pre-signature it was adapted from
///
/// Doesn't check that the signatures correspond to each other: if they don't, the output is
/// meaningless.
pub fn extract_adaptor<C: Ciphersuite>(
    signature: &Signature<C>,
    pre_signature: &Signature<C>,
    nonce_parity: bool,
) -> SecretScalar<C::Curve> {
    let mut t = (signature.s - pre_signature.s) * utils::sign::<C::Curve>(nonce_parity);
    SecretScalar::new(&mut t)
}

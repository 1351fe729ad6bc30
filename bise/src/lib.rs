//! MuSig2 multi-signatures
//!
//! MuSig2 is a two-round multi-signature scheme: $n$ signers, each holding own secret key,
//! jointly produce a single Schnorr signature that is valid under the aggregated public key.
//! The resulting signature is indistinguishable from a regular single-signer one, i.e. with
//! [`Secp256k1`](ciphersuite::Secp256k1) ciphersuite it's a regular [BIP-340] signature.
//!
//! This crate provides:
//! * [Key aggregation](key_agg) with plain, x-only and (with `taproot` feature) BIP-341 tweaks
//! * [Signing](mod@signing): nonce generation, nonce aggregation, partial signing, partial
//!   signature verification and aggregation into the final signature
//! * [Adaptor signatures](signing::adaptor)
//!
//! Message transport between signers is out of scope of this crate.
//!
//! ## Example
//! ```rust
//! use bise::{ciphersuite::Secp256k1, key_agg::KeyAggCache, signing, KeyPair};
//! use bise::generic_ec::curves::Secp256k1 as E;
//! use rand_core::{OsRng, RngCore};
//!
//! let msg = b"32 bytes message to be signed!!!";
//! let key_pairs = [
//!     KeyPair::<E>::generate(&mut OsRng),
//!     KeyPair::<E>::generate(&mut OsRng),
//! ];
//! let public_keys = key_pairs
//!     .iter()
//!     .map(|key_pair| key_pair.x_only_public_key::<Secp256k1>())
//!     .collect::<Vec<_>>();
//! let key_agg_cache = KeyAggCache::<Secp256k1>::new(&public_keys)?;
//!
//! // Round 1
//! let mut secret_nonces = vec![];
//! let mut public_nonces = vec![];
//! for _ in &key_pairs {
//!     let mut session_id = [0u8; 32];
//!     OsRng.fill_bytes(&mut session_id);
//!     let (secret_nonce, public_nonce) =
//!         signing::round1::NonceGenerator::new(&session_id)
//!             .set_key_agg_cache(&key_agg_cache)
//!             .set_message(msg)
//!             .generate()?;
//!     secret_nonces.push(secret_nonce);
//!     public_nonces.push(public_nonce);
//! }
//!
//! let agg_nonce = signing::nonce_agg::aggregate_nonces(&public_nonces)?;
//! let session = signing::session::SessionBuilder::new(&agg_nonce, msg, &key_agg_cache).build()?;
//!
//! // Round 2
//! let mut partial_sigs = vec![];
//! for (secret_nonce, key_pair) in secret_nonces.into_iter().zip(&key_pairs) {
//!     partial_sigs.push(signing::round2::sign(secret_nonce, key_pair, &key_agg_cache, &session));
//! }
//!
//! let sig = signing::aggregate::aggregate(&session, &partial_sigs)?;
//! sig.verify(&key_agg_cache.agg_public_key(), msg)?;
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! [BIP-340]: https://github.com/bitcoin/bips/blob/master/bip-0340.mediawiki

#![no_std]
#![forbid(unsafe_code, unused_crate_dependencies)]
#![deny(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
#![deny(missing_docs)]
#![allow(clippy::type_complexity)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use generic_ec;

pub mod ciphersuite;
pub mod key_agg;
pub mod keypair;
pub mod signing;

pub use self::{ciphersuite::Ciphersuite, keypair::KeyPair};

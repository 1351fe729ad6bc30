//! Signer key pair

use core::fmt;

use generic_ec::{Curve, NonZero, Point, SecretScalar};
use rand_core::{CryptoRng, RngCore};

use crate::{ciphersuite::NormalizedPoint, Ciphersuite};

/// Secret key of the signer along with corresponding public key
#[derive(Clone)]
pub struct KeyPair<E: Curve> {
    secret_key: NonZero<SecretScalar<E>>,
    public_key: NonZero<Point<E>>,
}

impl<E: Curve> KeyPair<E> {
    /// Constructs a key pair from the secret key
    ///
    /// Never fails in practice: public key is zero only if secret key is zero, which is
    /// ruled out by the type.
    pub fn from_secret_key(secret_key: NonZero<SecretScalar<E>>) -> Result<Self, InvalidSecretKey> {
        let sk: &SecretScalar<E> = secret_key.as_ref();
        let public_key = NonZero::from_point(Point::generator() * sk).ok_or(InvalidSecretKey)?;
        Ok(Self {
            secret_key,
            public_key,
        })
    }

    /// Parses the secret key and derives a key pair
    ///
    /// Returns error if the bytes don't represent a non-zero scalar in canonical range
    pub fn from_secret_key_bytes<C: Ciphersuite<Curve = E>>(
        bytes: &[u8],
    ) -> Result<Self, InvalidSecretKey> {
        if bytes.len() != C::SCALAR_SIZE {
            return Err(InvalidSecretKey);
        }
        let secret_key = C::deserialize_secret_scalar(bytes).map_err(|_| InvalidSecretKey)?;
        let secret_key = NonZero::from_secret_scalar(secret_key).ok_or(InvalidSecretKey)?;
        Self::from_secret_key(secret_key)
    }

    /// Generates a random key pair
    pub fn generate(rng: &mut (impl RngCore + CryptoRng)) -> Self {
        loop {
            if let Ok(key_pair) = Self::from_secret_key(NonZero::<SecretScalar<E>>::random(rng)) {
                return key_pair;
            }
        }
    }

    /// Secret key
    pub fn secret_key(&self) -> &NonZero<SecretScalar<E>> {
        &self.secret_key
    }

    /// Public key
    pub fn public_key(&self) -> NonZero<Point<E>> {
        self.public_key
    }

    /// X-only public key, i.e. public key normalized according to the ciphersuite
    ///
    /// This is the form in which the public key takes part in the key aggregation.
    pub fn x_only_public_key<C: Ciphersuite<Curve = E>>(
        &self,
    ) -> NormalizedPoint<C, NonZero<Point<E>>> {
        C::normalize_point(self.public_key)
    }
}

impl<E: Curve> fmt::Debug for KeyPair<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("secret_key", &"<redacted>")
            .field("public_key", &self.public_key)
            .finish()
    }
}

/// Secret key is zero or out of range
#[derive(Debug)]
pub struct InvalidSecretKey;

impl fmt::Display for InvalidSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid secret key")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidSecretKey {}

//! MuSig2 Ciphersuite
//!
//! Ciphersuite specifies which curve and hash primitives to use during key aggregation
//! and signing.
//!
//! Out of the box, we provide:
//! * [Secp256k1], outputs [BIP-340] signatures, requires `ciphersuite-secp256k1` feature
//!
//! [BIP-340]: https://github.com/bitcoin/bips/blob/master/bip-0340.mediawiki

use generic_ec::{
    errors::{InvalidPoint, InvalidScalar},
    Curve, NonZero, Point, Scalar, SecretScalar,
};

#[cfg(feature = "ciphersuite-secp256k1")]
mod secp256k1;

#[cfg(feature = "ciphersuite-secp256k1")]
pub use secp256k1::Secp256k1;

/// Ciphersuite determines an underlying curve and set of cryptographic primitives
/// used in the protocol
///
/// Every operation of the crate is generic over the ciphersuite, so the primitives are
/// always passed explicitly at the type level rather than taken from some global context.
pub trait Ciphersuite: Sized + Clone + Copy + PartialEq + Eq + core::fmt::Debug {
    /// Underlying curve on which signatures will be produced
    type Curve: Curve;

    /// Digest that's used by all hash functions of the protocol
    type Digest: digest::Update + digest::FixedOutput + Clone;

    /// Hash function used to derive a seed for secret nonces
    ///
    /// Returns a (tagged) hash state, input is fed by the caller.
    fn nonce_seed_hash() -> Self::Digest;
    /// Hash function used to expand the seed into secret nonces
    fn nonce_expand_hash() -> Self::Digest;
    /// Hash function used to compute the nonce coefficient `b`
    fn nonce_coef_hash() -> Self::Digest;
    /// Hash function used to commit to the list of aggregated public keys
    fn key_agg_list_hash() -> Self::Digest;
    /// Hash function used to derive key aggregation coefficients
    fn key_agg_coef_hash() -> Self::Digest;

    /// Computes the challenge according to Schnorr scheme
    fn compute_challenge(
        nonce: &NormalizedPoint<Self, NonZero<Point<Self::Curve>>>,
        public_key: &NormalizedPoint<Self, NonZero<Point<Self::Curve>>>,
        msg: &[u8],
    ) -> Scalar<Self::Curve>;

    /// Byte array that contains bytes representation of the point
    type PointBytes: AsRef<[u8]>;
    /// Size of serialized point in bytes
    const POINT_SIZE: usize;
    /// Serializes point
    fn serialize_point(point: &Point<Self::Curve>) -> Self::PointBytes;
    /// Deserializes point
    fn deserialize_point(bytes: &[u8]) -> Result<Point<Self::Curve>, InvalidPoint>;

    /// Byte array that contains bytes representation of the scalar
    type ScalarBytes: AsRef<[u8]>;
    /// Size of serialized scalar in bytes
    const SCALAR_SIZE: usize;
    /// Serializes scalar
    fn serialize_scalar(scalar: &Scalar<Self::Curve>) -> Self::ScalarBytes;
    /// Deserializes scalar
    ///
    /// Returns error if bytes don't represent a scalar in canonical range
    fn deserialize_scalar(bytes: &[u8]) -> Result<Scalar<Self::Curve>, InvalidScalar>;
    /// Deserializes secret scalar
    fn deserialize_secret_scalar(bytes: &[u8]) -> Result<SecretScalar<Self::Curve>, InvalidScalar> {
        let mut scalar = Self::deserialize_scalar(bytes)?;
        Ok(SecretScalar::new(&mut scalar))
    }

    /// Determines if the point is normalized
    ///
    /// MuSig2 works with X-only points: aggregated public key, individual public keys of
    /// signers and the R-component of the signature. Y coordinate of such points is chosen
    /// implicitly to be even.
    ///
    /// Our implementation requires that if point $X$ isn't normalized, then $-X$ is normalized.
    /// Zero point (aka point at infinity) is always normalized.
    fn is_normalized(point: &Point<Self::Curve>) -> bool;
    /// Normalizes the point
    ///
    /// Returns either `point` if it's already normalized, or `-point` otherwise. See [Ciphersuite::is_normalized]
    /// for more details.
    fn normalize_point<P: AsRef<Point<Self::Curve>> + core::ops::Neg<Output = P>>(
        point: P,
    ) -> NormalizedPoint<Self, P> {
        match NormalizedPoint::<Self, P>::try_normalize(point) {
            Ok(point) => point,
            Err(point) => point,
        }
    }
    /// Byte array that contains bytes representation of the normalized point
    type NormalizedPointBytes: AsRef<[u8]>;
    /// Size of serialized normalized point in bytes
    const NORMALIZED_POINT_SIZE: usize;
    /// Serializes a normalized point as X coordinate
    fn serialize_normalized_point<P: AsRef<Point<Self::Curve>>>(
        point: &NormalizedPoint<Self, P>,
    ) -> Self::NormalizedPointBytes;
    /// Deserializes a normalized point
    ///
    /// Lifts X coordinate to the point with even Y
    fn deserialize_normalized_point(
        bytes: &[u8],
    ) -> Result<NormalizedPoint<Self, Point<Self::Curve>>, InvalidPoint>;
}

/// Returns `true` if point has odd Y coordinate, i.e. it isn't [normalized](Ciphersuite::is_normalized)
pub fn has_odd_y<C: Ciphersuite>(point: &Point<C::Curve>) -> bool {
    !C::is_normalized(point)
}

/// Normalized point
///
/// Point that satisfies [`Ciphersuite::is_normalized`]. Can wrap both `Point<E>` and
/// `NonZero<Point<E>>`.
#[derive(Debug, Clone, Copy)]
pub struct NormalizedPoint<C, P>(P, core::marker::PhantomData<C>);

impl<C: Ciphersuite, P: AsRef<Point<C::Curve>>> NormalizedPoint<C, P> {
    /// Serializes the normalized point as X coordinate
    ///
    /// Alias to [`Ciphersuite::serialize_normalized_point`]
    pub fn to_bytes(&self) -> C::NormalizedPointBytes {
        C::serialize_normalized_point(self)
    }
}

impl<C: Ciphersuite, P: AsRef<Point<C::Curve>> + core::ops::Neg<Output = P>> NormalizedPoint<C, P> {
    /// Normalizes the point
    ///
    /// Returns `Ok(point)` is point is already normalized, or `Err(-point)` otherwise.
    pub fn try_normalize(point: P) -> Result<Self, Self> {
        if point.as_ref().is_zero() || C::is_normalized(point.as_ref()) {
            Ok(Self(point, Default::default()))
        } else {
            let neg_point = -point;
            debug_assert!(C::is_normalized(neg_point.as_ref()));
            Err(Self(neg_point, Default::default()))
        }
    }
}

impl<C: Ciphersuite> NormalizedPoint<C, Point<C::Curve>> {
    /// Converts `Point` into `NonZero<Point>`, returns `None` if point is zero
    pub fn into_non_zero(self) -> Option<NormalizedPoint<C, NonZero<Point<C::Curve>>>> {
        let point = NonZero::from_point(self.0)?;
        Some(NormalizedPoint(point, Default::default()))
    }
}

impl<C> NormalizedPoint<C, NonZero<Point<C::Curve>>>
where
    C: Ciphersuite,
{
    /// Parses a normalized non-zero point from its X coordinate
    ///
    /// Returns `None` if bytes don't encode X coordinate of any point
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        C::deserialize_normalized_point(bytes).ok()?.into_non_zero()
    }
}

impl<C, P> core::ops::Deref for NormalizedPoint<C, P> {
    type Target = P;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl<C, P, T> AsRef<T> for NormalizedPoint<C, P>
where
    P: AsRef<T>,
{
    fn as_ref(&self) -> &T {
        self.0.as_ref()
    }
}
impl<C, P: core::cmp::PartialEq> core::cmp::PartialEq for NormalizedPoint<C, P> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl<C, P: core::cmp::Eq> core::cmp::Eq for NormalizedPoint<C, P> {}

#[cfg(feature = "serde")]
impl<C, P: serde::Serialize> serde::Serialize for NormalizedPoint<C, P> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Normalized point is serialized as a regular point - we do not take advantage
        // of shorter form in serde traits to keep impl simpler
        (**self).serialize(serializer)
    }
}
#[cfg(feature = "serde")]
impl<'de, C, P> serde::Deserialize<'de> for NormalizedPoint<C, P>
where
    C: Ciphersuite,
    P: AsRef<Point<C::Curve>> + serde::Deserialize<'de> + core::ops::Neg<Output = P>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let point = P::deserialize(deserializer)?;
        NormalizedPoint::<C, P>::try_normalize(point)
            .map_err(|_| <D::Error as serde::de::Error>::custom("point isn't normalized"))
    }
}

//! Discriminator-driven decoding of one of several concrete types.
//!
//! A [`PolymorphicCodableStrategy`] names the discriminator key and lists
//! the candidate types. Decoding reads the discriminator as a string, picks
//! the first candidate whose identifier matches exactly (or the fallback),
//! and decodes the whole payload as that type.
//!
//! ```rust
//! use resilient_codable::de::{self, Decode, Decoder};
//! use resilient_codable::polymorphic::{
//!     PolymorphicCandidate, PolymorphicCodableStrategy, PolymorphicType, PolymorphicValue,
//! };
//! use resilient_codable::ser::{Encode, Encoder};
//! use resilient_codable::{DecodeError, EncodeError, Value};
//!
//! #[derive(Debug, PartialEq)]
//! struct Circle {
//!     radius: f64,
//! }
//!
//! impl Decode for Circle {
//!     fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
//!         Ok(Circle { radius: decoder.keyed()?.decode("radius")? })
//!     }
//! }
//!
//! impl Encode for Circle {
//!     fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
//!         let mut keyed = encoder.keyed();
//!         keyed.encode("radius", &self.radius)?;
//!         Ok(keyed.finish())
//!     }
//! }
//!
//! impl PolymorphicType for Circle {
//!     const IDENTIFIER: &'static str = "circle";
//! }
//!
//! #[derive(Debug, PartialEq)]
//! enum Shape {
//!     Circle(Circle),
//! }
//!
//! struct ShapeStrategy;
//!
//! impl PolymorphicCodableStrategy for ShapeStrategy {
//!     type Expected = Shape;
//!
//!     fn candidates() -> Vec<PolymorphicCandidate<Shape>> {
//!         vec![PolymorphicCandidate::new::<Circle>(
//!             |c| Some(Shape::Circle(c)),
//!             |s| match s {
//!                 Shape::Circle(c) => Some(c),
//!             },
//!         )]
//!     }
//! }
//!
//! let doc = Value::from_fields(vec![("type", "circle".into()), ("radius", 2.0.into())]);
//! let shape: PolymorphicValue<ShapeStrategy> = de::decode(&doc).unwrap();
//! assert_eq!(*shape, Shape::Circle(Circle { radius: 2.0 }));
//! ```

mod wrappers;

pub use wrappers::{
    DefaultEmptyPolymorphicArray, LossyPolymorphicArray, LossyPolymorphicValue,
    OptionalPolymorphicValue, PolymorphicArray, PolymorphicValue,
};

use crate::de::{Decode, Decoder};
use crate::error::{DecodeError, DecodeErrorKind, EncodeError};
use crate::ser::{Encode, Encoder};
use crate::value::Value;
use crate::wrappers::short_type_name;

/// A concrete type that can stand in for a polymorphic abstraction.
pub trait PolymorphicType: Decode + Encode {
    /// The discriminator value that selects this type.
    const IDENTIFIER: &'static str;
}

type DecodeFn<E> = Box<dyn Fn(&Decoder<'_>) -> Result<E, DecodeError>>;
type EncodeFn<E> = Box<dyn Fn(&E, &Encoder<'_>) -> Option<Result<Value, EncodeError>>>;

/// One registry entry: an identifier and how to decode and encode it.
pub struct PolymorphicCandidate<E> {
    identifier: &'static str,
    type_name: &'static str,
    decode: DecodeFn<E>,
    encode: EncodeFn<E>,
}

impl<E: 'static> PolymorphicCandidate<E> {
    /// A candidate for `T`. `upcast` widens a decoded `T` to the expected
    /// type; `downcast` recognizes values of `T` when encoding.
    pub fn new<T: PolymorphicType + 'static>(
        upcast: fn(T) -> Option<E>,
        downcast: fn(&E) -> Option<&T>,
    ) -> Self {
        PolymorphicCandidate {
            identifier: T::IDENTIFIER,
            type_name: short_type_name::<T>(),
            decode: Box::new(move |decoder: &Decoder<'_>| {
                let concrete = T::decode(decoder)?;
                upcast(concrete).ok_or_else(|| {
                    DecodeError::new(
                        DecodeErrorKind::PolymorphicTypeMismatch {
                            decoded: short_type_name::<T>().to_string(),
                            expected: short_type_name::<E>().to_string(),
                        },
                        decoder.path().clone(),
                    )
                })
            }),
            encode: Box::new(move |value: &E, encoder: &Encoder<'_>| {
                downcast(value).map(|concrete| concrete.encode(encoder))
            }),
        }
    }
}

impl<E> PolymorphicCandidate<E> {
    pub fn identifier(&self) -> &'static str {
        self.identifier
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// Describes one polymorphic abstraction.
pub trait PolymorphicCodableStrategy {
    type Expected: 'static;

    fn discriminator_key() -> &'static str {
        "type"
    }

    /// Candidates in match order.
    fn candidates() -> Vec<PolymorphicCandidate<Self::Expected>>;

    /// Used when no candidate identifier matches.
    fn fallback() -> Option<PolymorphicCandidate<Self::Expected>> {
        None
    }

    /// When set, the concrete type's fields live in a nested object under
    /// this key instead of beside the discriminator.
    fn nested_key() -> Option<&'static str> {
        None
    }
}

/// Candidate table built from a strategy, reused across the elements of an
/// array.
pub struct PolymorphicRegistry<E> {
    discriminator_key: &'static str,
    nested_key: Option<&'static str>,
    candidates: Vec<PolymorphicCandidate<E>>,
    fallback: Option<PolymorphicCandidate<E>>,
}

impl<E: 'static> PolymorphicRegistry<E> {
    pub fn from_strategy<S: PolymorphicCodableStrategy<Expected = E>>() -> Self {
        PolymorphicRegistry {
            discriminator_key: S::discriminator_key(),
            nested_key: S::nested_key(),
            candidates: S::candidates(),
            fallback: S::fallback(),
        }
    }

    /// First candidate with exactly this identifier, else the fallback.
    pub fn resolve(&self, identifier: &str) -> Option<&PolymorphicCandidate<E>> {
        self.candidates
            .iter()
            .find(|candidate| candidate.identifier == identifier)
            .or(self.fallback.as_ref())
    }

    pub fn decode(&self, decoder: &Decoder<'_>) -> Result<E, DecodeError> {
        let keyed = decoder.keyed()?;
        let identifier: String = keyed.decode(self.discriminator_key)?;
        let candidate = self.resolve(&identifier).ok_or_else(|| {
            DecodeError::new(
                DecodeErrorKind::NoMatchingPolymorphicType {
                    identifier: identifier.clone(),
                },
                decoder.path().clone(),
            )
        })?;
        match self.nested_key {
            None => (candidate.decode)(decoder),
            Some(key) => (candidate.decode)(&keyed.decoder_for(key)),
        }
    }

    pub fn encode(&self, value: &E, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        for candidate in &self.candidates {
            if let Some(payload) = self.encode_as(candidate, value, encoder) {
                return self.wrap(candidate.identifier, payload?, encoder, true);
            }
        }
        if let Some(fallback) = &self.fallback {
            if let Some(payload) = self.encode_as(fallback, value, encoder) {
                return self.wrap(fallback.identifier, payload?, encoder, false);
            }
        }
        Err(EncodeError::PolymorphicEncoding {
            path: encoder.path().clone(),
            type_name: short_type_name::<E>().to_string(),
        })
    }

    fn encode_as(
        &self,
        candidate: &PolymorphicCandidate<E>,
        value: &E,
        encoder: &Encoder<'_>,
    ) -> Option<Result<Value, EncodeError>> {
        match self.nested_key {
            None => (candidate.encode)(value, encoder),
            Some(key) => (candidate.encode)(value, &encoder.child(key)),
        }
    }

    // A fallback payload keeps its own discriminator when it carries one, so
    // an unrecognized identifier survives the round trip.
    fn wrap(
        &self,
        identifier: &str,
        payload: Value,
        encoder: &Encoder<'_>,
        overwrite: bool,
    ) -> Result<Value, EncodeError> {
        if let Some(key) = self.nested_key {
            let mut keyed = encoder.keyed();
            keyed.insert_raw(self.discriminator_key, Value::from(identifier));
            keyed.insert_raw(key, payload);
            return Ok(keyed.finish());
        }
        match payload {
            Value::Object(mut map) => {
                if overwrite || !map.contains_key(self.discriminator_key) {
                    map.insert(self.discriminator_key.to_string(), Value::from(identifier));
                }
                Ok(Value::Object(map))
            }
            other => Err(encoder.invalid_value(format!(
                "polymorphic payload must encode as an object, got {}",
                other.type_name()
            ))),
        }
    }
}

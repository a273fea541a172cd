//! Serde integration.
//!
//! [`Value`] implements `Serialize` and `Deserialize`, so documents can be
//! read from any serde format. [`Serde<T>`] goes the other way and lets a
//! serde type sit inside a resilient wrapper:
//!
//! ```rust
//! use resilient_codable::serde::Serde;
//! use resilient_codable::wrappers::LossyValue;
//! use resilient_codable::{de, Value};
//!
//! #[derive(serde::Deserialize, Debug, PartialEq)]
//! struct Point {
//!     x: i64,
//!     y: i64,
//! }
//!
//! let doc = Value::from_fields(vec![("x", 1i64.into()), ("y", 2i64.into())]);
//! let point: LossyValue<Serde<Point>> = de::decode(&doc).unwrap();
//! assert_eq!(point.as_deref(), Some(&Point { x: 1, y: 2 }));
//!
//! let broken: LossyValue<Serde<Point>> = de::decode(&Value::from("nope")).unwrap();
//! assert!(broken.is_none());
//! ```

mod de;
mod error;
mod ser;

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Deref, DerefMut};

pub use de::ValueDeserializer;
pub use error::SerdeError;
pub use ser::ValueSerializer;

use serde::de::{DeserializeOwned, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::de::{Decode, Decoder};
use crate::error::{DecodeError, EncodeError};
use crate::ser::{Encode, Encoder};
use crate::value::Value;

/// Serialize a value into a `Value` tree.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, SerdeError> {
    ValueSerializer::serialize(value)
}

/// Deserialize a Rust type out of a `Value` tree.
pub fn from_value<'de, T: Deserialize<'de>>(value: &'de Value) -> Result<T, SerdeError> {
    ValueDeserializer::deserialize(value)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Integer(v) => serializer.serialize_i64(*v),
            Value::Double(v) => serializer.serialize_f64(*v),
            Value::String(v) => serializer.serialize_str(v),
            Value::Array(items) => serializer.collect_seq(items),
            Value::Object(map) => serializer.collect_map(map),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any document value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Integer(v))
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Value, E> {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| E::custom(SerdeError::IntegerOutOfRange(v)))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Double(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut map = BTreeMap::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            map.insert(key, value);
        }
        Ok(Value::Object(map))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

/// Adapter that decodes and encodes a serde type through the `Value` tree.
///
/// Serde failures become `TypeMismatch` or `DataCorrupted` errors at the
/// decoder's path, so the surrounding wrapper can recover from them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Serde<T>(pub T);

impl<T> Serde<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: DeserializeOwned> Decode for Serde<T> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        let value = decoder.value()?;
        from_value::<T>(value).map(Serde).map_err(|err| match err {
            SerdeError::TypeMismatch { expected, found } => {
                DecodeError::type_mismatch(decoder.path(), expected, found)
            }
            other => DecodeError::data_corrupted(decoder.path(), other.to_string()),
        })
    }
}

impl<T: Serialize> Encode for Serde<T> {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        to_value(&self.0).map_err(|err| encoder.invalid_value(err.to_string()))
    }
}

impl<T> Deref for Serde<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Serde<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

#[cfg(feature = "json")]
mod json {
    use crate::de::{self, Decode, Decoded};
    use crate::error::Result;
    use crate::options::DecoderOptions;
    use crate::ser::{self, Encode};
    use crate::value::Value;

    /// Parse JSON text into a `Value` tree.
    pub fn from_json_str(json: &str) -> Result<Value> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(value: &Value) -> Result<String> {
        Ok(serde_json::to_string(value)?)
    }

    /// Parse `json` and decode it, collecting a digest when
    /// `options.report_resilient_errors` is set.
    pub fn decode_json<T: Decode>(json: &str, options: &DecoderOptions) -> Result<Decoded<T>> {
        let value = from_json_str(json)?;
        Ok(de::decode_with_report(&value, options)?)
    }

    pub fn encode_json<T: Encode + ?Sized>(value: &T) -> Result<String> {
        to_json_string(&ser::encode(value)?)
    }
}

#[cfg(feature = "json")]
pub use json::{decode_json, encode_json, from_json_str, to_json_string};

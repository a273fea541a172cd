use std::fmt;

use super::short_type_name;
use crate::de::{Decode, Decoder};
use crate::error::{DecodeError, DecodeErrorKind, EncodeError};
use crate::ser::{Encode, Encoder};
use crate::value::Value;

/// An enum whose cases map one-to-one onto raw scalar values.
///
/// Implement [`Decode`] and [`Encode`] for such an enum with
/// [`decode_raw_enum`] and [`encode_raw_enum`]:
///
/// ```rust
/// use resilient_codable::de::{Decode, Decoder};
/// use resilient_codable::ser::{Encode, Encoder};
/// use resilient_codable::wrappers::{decode_raw_enum, encode_raw_enum, RawEnum};
/// use resilient_codable::{DecodeError, EncodeError, Value};
///
/// #[derive(Debug, PartialEq)]
/// enum Size {
///     Small,
///     Large,
/// }
///
/// impl RawEnum for Size {
///     type Raw = String;
///
///     fn from_raw(raw: &String) -> Option<Self> {
///         match raw.as_str() {
///             "small" => Some(Size::Small),
///             "large" => Some(Size::Large),
///             _ => None,
///         }
///     }
///
///     fn to_raw(&self) -> String {
///         match self {
///             Size::Small => "small".into(),
///             Size::Large => "large".into(),
///         }
///     }
/// }
///
/// impl Decode for Size {
///     fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
///         decode_raw_enum(decoder)
///     }
/// }
///
/// impl Encode for Size {
///     fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
///         encode_raw_enum(self, encoder)
///     }
/// }
///
/// let size: Size = resilient_codable::de::decode(&Value::from("large")).unwrap();
/// assert_eq!(size, Size::Large);
/// let err = resilient_codable::de::decode::<Size>(&Value::from("huge")).unwrap_err();
/// assert!(err.is_unknown_novel_value());
/// ```
pub trait RawEnum: Sized {
    type Raw: Decode + Encode + fmt::Debug;

    fn from_raw(raw: &Self::Raw) -> Option<Self>;

    fn to_raw(&self) -> Self::Raw;
}

/// Decode the raw value and map it to a case, failing with
/// `UnknownNovelValue` when no case matches.
pub fn decode_raw_enum<E: RawEnum>(decoder: &Decoder<'_>) -> Result<E, DecodeError> {
    let raw = E::Raw::decode(decoder)?;
    E::from_raw(&raw).ok_or_else(|| {
        DecodeError::new(
            DecodeErrorKind::UnknownNovelValue {
                type_name: short_type_name::<E>().to_string(),
                raw: format!("{:?}", raw),
            },
            decoder.path().clone(),
        )
    })
}

pub fn encode_raw_enum<E: RawEnum>(value: &E, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
    value.to_raw().encode(encoder)
}

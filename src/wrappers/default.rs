use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use super::coerce::decode_bool_coercing;
use super::raw_enum::RawEnum;
use super::recover;
use crate::de::{Decode, Decoder};
use crate::error::{DecodeError, DecodeErrorKind};
use crate::outcome::DecodingOutcome;
use crate::ser::{Encode, Encoder};
use crate::value::Value;

/// Supplies the fallback for a [`DefaultValue`] field.
pub trait DefaultCodableStrategy {
    type Value: Decode + Encode;

    fn default_value() -> Self::Value;

    /// Whether an unknown enum raw value means corrupted data rather than a
    /// case this consumer does not know yet.
    fn is_frozen() -> bool {
        false
    }

    /// Decode a present, non-null value. Strategies override this to accept
    /// looser input before the default kicks in.
    fn decode_value(decoder: &Decoder<'_>) -> Result<Self::Value, DecodeError> {
        Self::Value::decode(decoder)
    }
}

/// A field that falls back to `S::default_value()` when it is absent, null,
/// or fails to decode.
pub struct DefaultValue<S: DefaultCodableStrategy> {
    value: S::Value,
    outcome: DecodingOutcome,
    strategy: PhantomData<S>,
}

impl<S: DefaultCodableStrategy> DefaultValue<S> {
    pub fn new(value: S::Value) -> Self {
        DefaultValue {
            value,
            outcome: DecodingOutcome::Success,
            strategy: PhantomData,
        }
    }

    pub fn value(&self) -> &S::Value {
        &self.value
    }

    pub fn into_inner(self) -> S::Value {
        self.value
    }

    pub fn outcome(&self) -> &DecodingOutcome {
        &self.outcome
    }

    fn fallback(outcome: DecodingOutcome) -> Self {
        DefaultValue {
            value: S::default_value(),
            outcome,
            strategy: PhantomData,
        }
    }
}

impl<S: DefaultCodableStrategy> Decode for DefaultValue<S> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        if decoder.is_absent() {
            return Ok(Self::fallback(DecodingOutcome::KeyAbsent));
        }
        if decoder.is_null() {
            return Ok(Self::fallback(DecodingOutcome::ValueWasNull));
        }
        match S::decode_value(decoder) {
            Ok(value) => Ok(DefaultValue::new(value)),
            Err(error) => {
                let error = if S::is_frozen() {
                    freeze(error)
                } else {
                    error
                };
                Ok(Self::fallback(recover(decoder, error)))
            }
        }
    }
}

/// Unknown raw values of a frozen enum are ordinary corruption.
fn freeze(error: DecodeError) -> DecodeError {
    match error.kind {
        DecodeErrorKind::UnknownNovelValue { type_name, raw } => DecodeError::new(
            DecodeErrorKind::DataCorrupted {
                message: format!("unknown raw value {} for frozen {}", raw, type_name),
            },
            error.path,
        ),
        kind => DecodeError::new(kind, error.path),
    }
}

impl<S: DefaultCodableStrategy> Encode for DefaultValue<S> {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, crate::EncodeError> {
        self.value.encode(encoder)
    }
}

impl<S: DefaultCodableStrategy> Default for DefaultValue<S> {
    fn default() -> Self {
        DefaultValue::new(S::default_value())
    }
}

impl<S: DefaultCodableStrategy> Deref for DefaultValue<S> {
    type Target = S::Value;

    fn deref(&self) -> &S::Value {
        &self.value
    }
}

impl<S: DefaultCodableStrategy> DerefMut for DefaultValue<S> {
    fn deref_mut(&mut self) -> &mut S::Value {
        &mut self.value
    }
}

impl<S: DefaultCodableStrategy> fmt::Debug for DefaultValue<S>
where
    S::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultValue")
            .field("value", &self.value)
            .field("outcome", &self.outcome)
            .finish()
    }
}

impl<S: DefaultCodableStrategy> Clone for DefaultValue<S>
where
    S::Value: Clone,
{
    fn clone(&self) -> Self {
        DefaultValue {
            value: self.value.clone(),
            outcome: self.outcome.clone(),
            strategy: PhantomData,
        }
    }
}

impl<S: DefaultCodableStrategy> PartialEq for DefaultValue<S>
where
    S::Value: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// `false`, with integer and truthy-string coercion.
pub struct DefaultFalse;

impl DefaultCodableStrategy for DefaultFalse {
    type Value = bool;

    fn default_value() -> bool {
        false
    }

    fn decode_value(decoder: &Decoder<'_>) -> Result<bool, DecodeError> {
        decode_bool_coercing(decoder)
    }
}

/// `true`, with integer and truthy-string coercion.
pub struct DefaultTrue;

impl DefaultCodableStrategy for DefaultTrue {
    type Value = bool;

    fn default_value() -> bool {
        true
    }

    fn decode_value(decoder: &Decoder<'_>) -> Result<bool, DecodeError> {
        decode_bool_coercing(decoder)
    }
}

/// The numeric type's `Default`, i.e. zero.
pub struct DefaultZero<T>(PhantomData<T>);

impl<T: Decode + Encode + Default> DefaultCodableStrategy for DefaultZero<T> {
    type Value = T;

    fn default_value() -> T {
        T::default()
    }
}

pub struct DefaultEmptyString;

impl DefaultCodableStrategy for DefaultEmptyString {
    type Value = String;

    fn default_value() -> String {
        String::new()
    }
}

/// An empty `Vec`. Any element failure empties the whole array.
pub struct DefaultEmptyVec<T>(PhantomData<T>);

impl<T: Decode + Encode> DefaultCodableStrategy for DefaultEmptyVec<T> {
    type Value = Vec<T>;

    fn default_value() -> Vec<T> {
        Vec::new()
    }
}

pub struct DefaultEmptyMap<T>(PhantomData<T>);

impl<T: Decode + Encode> DefaultCodableStrategy for DefaultEmptyMap<T> {
    type Value = BTreeMap<String, T>;

    fn default_value() -> BTreeMap<String, T> {
        BTreeMap::new()
    }
}

/// The enum's `Default` case; unknown raw values are novel, not corrupt.
pub struct DefaultCase<E>(PhantomData<E>);

impl<E: RawEnum + Decode + Encode + Default> DefaultCodableStrategy for DefaultCase<E> {
    type Value = E;

    fn default_value() -> E {
        E::default()
    }
}

/// Like [`DefaultCase`], but unknown raw values are reported as corruption.
pub struct FrozenDefaultCase<E>(PhantomData<E>);

impl<E: RawEnum + Decode + Encode + Default> DefaultCodableStrategy for FrozenDefaultCase<E> {
    type Value = E;

    fn default_value() -> E {
        E::default()
    }

    fn is_frozen() -> bool {
        true
    }
}

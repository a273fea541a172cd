use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use super::coerce::truthiness;
use super::short_type_name;
use crate::de::{Decode, Decoder};
use crate::error::{DecodeError, EncodeError, Path};
use crate::options::EncoderOptions;
use crate::outcome::DecodingOutcome;
use crate::ser::{Encode, Encoder};
use crate::value::Value;

/// The scalar kind a lossless value was actually read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    /// Decoded directly as the declared type.
    Native,
    String,
    Bool,
    Integer,
    Double,
}

impl Representation {
    pub fn name(&self) -> &'static str {
        match self {
            Representation::Native => "native",
            Representation::String => "string",
            Representation::Bool => "boolean",
            Representation::Integer => "integer",
            Representation::Double => "double",
        }
    }

    /// The scalar kind of a raw node.
    fn of(value: &Value) -> Option<Representation> {
        match value {
            Value::String(_) => Some(Representation::String),
            Value::Bool(_) => Some(Representation::Bool),
            Value::Integer(_) => Some(Representation::Integer),
            Value::Double(_) => Some(Representation::Double),
            _ => None,
        }
    }

    /// Re-render `text` in this representation.
    fn render(self, text: String, path: &Path) -> Result<Value, EncodeError> {
        let unrepresentable = |text: String| EncodeError::LosslessConversion {
            path: path.clone(),
            value: text,
            representation: self.name(),
        };
        match self {
            Representation::String => Ok(Value::String(text)),
            Representation::Bool => match text.parse::<bool>() {
                Ok(v) => Ok(Value::Bool(v)),
                Err(_) => Err(unrepresentable(text)),
            },
            Representation::Integer => match text.parse::<i64>() {
                Ok(v) => Ok(Value::Integer(v)),
                Err(_) => Err(unrepresentable(text)),
            },
            Representation::Double => match text.parse::<f64>() {
                Ok(v) => Ok(Value::Double(v)),
                Err(_) => Err(unrepresentable(text)),
            },
            Representation::Native => Err(unrepresentable(text)),
        }
    }
}

/// One probe: read the raw node as some scalar kind and render it as text.
#[derive(Clone, Copy)]
pub struct Probe {
    pub name: &'static str,
    pub representation: Representation,
    attempt: fn(&Value) -> Option<String>,
}

impl Probe {
    pub const STRING: Probe = Probe::new("string", Representation::String, probe_string);
    pub const BOOL: Probe = Probe::new("boolean", Representation::Bool, probe_bool);
    pub const INTEGER: Probe = Probe::new("integer", Representation::Integer, probe_integer);
    pub const DOUBLE: Probe = Probe::new("double", Representation::Double, probe_double);
    /// Booleans, numbers and truthy strings, all rendered as `true`/`false`.
    pub const TRUTHY: Probe = Probe::new("truthy", Representation::Bool, probe_truthy);

    pub const fn new(
        name: &'static str,
        representation: Representation,
        attempt: fn(&Value) -> Option<String>,
    ) -> Self {
        Probe {
            name,
            representation,
            attempt,
        }
    }

    pub fn attempt(&self, value: &Value) -> Option<String> {
        (self.attempt)(value)
    }
}

impl fmt::Debug for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Probe")
            .field("name", &self.name)
            .field("representation", &self.representation)
            .finish()
    }
}

fn probe_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn probe_bool(value: &Value) -> Option<String> {
    value.as_bool().map(|v| v.to_string())
}

fn probe_integer(value: &Value) -> Option<String> {
    value.as_integer().map(|v| v.to_string())
}

fn probe_double(value: &Value) -> Option<String> {
    match value {
        Value::Double(v) => Some(v.to_string()),
        _ => None,
    }
}

fn probe_truthy(value: &Value) -> Option<String> {
    let truth = match value {
        Value::Bool(v) => Some(*v),
        Value::Integer(v) => Some(*v != 0),
        Value::Double(v) => Some(*v != 0.0),
        Value::String(s) => truthiness(s),
        _ => None,
    };
    truth.map(|v| v.to_string())
}

/// Ordered probes tried when the declared type does not decode directly.
pub trait LosslessDecodingStrategy {
    fn probes() -> &'static [Probe];
}

/// String, boolean, integer, then double.
pub struct LosslessDefaultStrategy;

impl LosslessDecodingStrategy for LosslessDefaultStrategy {
    fn probes() -> &'static [Probe] {
        &[Probe::STRING, Probe::BOOL, Probe::INTEGER, Probe::DOUBLE]
    }
}

/// Truthy coercion first, so `1`, `"yes"` or `"t"` become `true`.
pub struct LosslessBooleanStrategy;

impl LosslessDecodingStrategy for LosslessBooleanStrategy {
    fn probes() -> &'static [Probe] {
        &[
            Probe::TRUTHY,
            Probe::STRING,
            Probe::BOOL,
            Probe::INTEGER,
            Probe::DOUBLE,
        ]
    }
}

/// Scalars that survive a round-trip through their text form.
pub trait LosslessScalar: Decode + Encode + FromStr + fmt::Display {}

impl<T: Decode + Encode + FromStr + fmt::Display> LosslessScalar for T {}

/// Decode `T` directly, else through the first probe that accepts the raw
/// node. Fails with the direct error when no probe applies.
pub(crate) fn decode_lossless<T: LosslessScalar, S: LosslessDecodingStrategy>(
    decoder: &Decoder<'_>,
) -> Result<(T, Representation), DecodeError> {
    let original = match T::decode(decoder) {
        Ok(value) => {
            let representation = direct_representation(&value, decoder.raw());
            return Ok((value, representation));
        }
        Err(error) => error,
    };
    let Some(raw) = decoder.raw() else {
        return Err(original);
    };
    for probe in S::probes() {
        if let Some(text) = probe.attempt(raw) {
            return match text.parse::<T>() {
                Ok(value) => Ok((value, probe.representation)),
                Err(_) => Err(DecodeError::data_corrupted(
                    decoder.path(),
                    format!(
                        "cannot convert {} '{}' to {}",
                        probe.name,
                        text,
                        short_type_name::<T>()
                    ),
                )),
            };
        }
    }
    Err(original)
}

/// `Native` unless the direct decode widened the raw node into another
/// scalar kind, in which case the raw kind is kept so encoding restores it.
fn direct_representation<T: Encode>(value: &T, raw: Option<&Value>) -> Representation {
    let Some(raw) = raw.and_then(|raw| Representation::of(raw).map(|repr| (raw, repr))) else {
        return Representation::Native;
    };
    let options = EncoderOptions::default();
    match value.encode(&Encoder::new(&options)) {
        Ok(encoded) if encoded.type_name() != raw.0.type_name() => raw.1,
        _ => Representation::Native,
    }
}

fn encode_lossless<T: LosslessScalar>(
    value: &T,
    representation: Representation,
    encoder: &Encoder<'_>,
) -> Result<Value, EncodeError> {
    match representation {
        Representation::Native => value.encode(encoder),
        other => other.render(value.to_string(), encoder.path()),
    }
}

/// A scalar that accepts other scalar kinds without losing information.
///
/// Encoding writes the value back in the representation it was read from.
pub struct LosslessValueWith<T, S> {
    value: T,
    representation: Representation,
    strategy: PhantomData<S>,
}

pub type LosslessValue<T> = LosslessValueWith<T, LosslessDefaultStrategy>;
pub type LosslessBoolValue = LosslessValueWith<bool, LosslessBooleanStrategy>;

impl<T, S> LosslessValueWith<T, S> {
    pub fn new(value: T) -> Self {
        LosslessValueWith {
            value,
            representation: Representation::Native,
            strategy: PhantomData,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn representation(&self) -> Representation {
        self.representation
    }
}

impl<T: LosslessScalar, S: LosslessDecodingStrategy> Decode for LosslessValueWith<T, S> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        let (value, representation) = decode_lossless::<T, S>(decoder)?;
        Ok(LosslessValueWith {
            value,
            representation,
            strategy: PhantomData,
        })
    }
}

impl<T: LosslessScalar, S> Encode for LosslessValueWith<T, S> {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        encode_lossless(&self.value, self.representation, encoder)
    }
}

impl<T, S> Deref for LosslessValueWith<T, S> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T, S> DerefMut for LosslessValueWith<T, S> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: fmt::Debug, S> fmt::Debug for LosslessValueWith<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LosslessValue")
            .field("value", &self.value)
            .field("representation", &self.representation)
            .finish()
    }
}

impl<T: Clone, S> Clone for LosslessValueWith<T, S> {
    fn clone(&self) -> Self {
        LosslessValueWith {
            value: self.value.clone(),
            representation: self.representation,
            strategy: PhantomData,
        }
    }
}

impl<T: PartialEq, S> PartialEq for LosslessValueWith<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// [`LosslessValueWith`] where null and a missing key yield `None`.
pub struct OptionalLosslessValueWith<T, S> {
    value: Option<T>,
    representation: Representation,
    outcome: DecodingOutcome,
    strategy: PhantomData<S>,
}

pub type OptionalLosslessValue<T> = OptionalLosslessValueWith<T, LosslessDefaultStrategy>;
pub type OptionalLosslessBoolValue = OptionalLosslessValueWith<bool, LosslessBooleanStrategy>;

impl<T, S> OptionalLosslessValueWith<T, S> {
    pub fn new(value: Option<T>) -> Self {
        OptionalLosslessValueWith {
            value,
            representation: Representation::Native,
            outcome: DecodingOutcome::Success,
            strategy: PhantomData,
        }
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_inner(self) -> Option<T> {
        self.value
    }

    pub fn representation(&self) -> Representation {
        self.representation
    }

    pub fn outcome(&self) -> &DecodingOutcome {
        &self.outcome
    }

    fn empty(outcome: DecodingOutcome) -> Self {
        OptionalLosslessValueWith {
            value: None,
            representation: Representation::Native,
            outcome,
            strategy: PhantomData,
        }
    }
}

impl<T: LosslessScalar, S: LosslessDecodingStrategy> Decode for OptionalLosslessValueWith<T, S> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        if decoder.is_absent() {
            return Ok(Self::empty(DecodingOutcome::KeyAbsent));
        }
        if decoder.is_null() {
            return Ok(Self::empty(DecodingOutcome::ValueWasNull));
        }
        let (value, representation) = decode_lossless::<T, S>(decoder)?;
        Ok(OptionalLosslessValueWith {
            value: Some(value),
            representation,
            outcome: DecodingOutcome::Success,
            strategy: PhantomData,
        })
    }
}

impl<T: LosslessScalar, S> Encode for OptionalLosslessValueWith<T, S> {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        match &self.value {
            Some(value) => encode_lossless(value, self.representation, encoder),
            None => Ok(Value::Null),
        }
    }
}

impl<T, S> Deref for OptionalLosslessValueWith<T, S> {
    type Target = Option<T>;

    fn deref(&self) -> &Option<T> {
        &self.value
    }
}

impl<T, S> DerefMut for OptionalLosslessValueWith<T, S> {
    fn deref_mut(&mut self) -> &mut Option<T> {
        &mut self.value
    }
}

impl<T: fmt::Debug, S> fmt::Debug for OptionalLosslessValueWith<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionalLosslessValue")
            .field("value", &self.value)
            .field("representation", &self.representation)
            .field("outcome", &self.outcome)
            .finish()
    }
}

impl<T: PartialEq, S> PartialEq for OptionalLosslessValueWith<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

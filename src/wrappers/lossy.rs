use std::ops::{Deref, DerefMut};

use super::recover;
use crate::de::{Decode, Decoder};
use crate::error::{DecodeError, EncodeError};
use crate::outcome::DecodingOutcome;
use crate::ser::{Encode, Encoder};
use crate::value::Value;

/// An optional field that becomes `None` instead of failing.
#[derive(Debug, Clone)]
pub struct LossyValue<T> {
    value: Option<T>,
    outcome: DecodingOutcome,
}

impl<T> LossyValue<T> {
    pub fn new(value: Option<T>) -> Self {
        LossyValue {
            value,
            outcome: DecodingOutcome::Success,
        }
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_inner(self) -> Option<T> {
        self.value
    }

    pub fn outcome(&self) -> &DecodingOutcome {
        &self.outcome
    }
}

impl<T: Decode> Decode for LossyValue<T> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        let (value, outcome) = if decoder.is_absent() {
            (None, DecodingOutcome::KeyAbsent)
        } else if decoder.is_null() {
            (None, DecodingOutcome::ValueWasNull)
        } else {
            match T::decode(decoder) {
                Ok(value) => (Some(value), DecodingOutcome::Success),
                Err(error) => (None, recover(decoder, error)),
            }
        };
        Ok(LossyValue { value, outcome })
    }
}

impl<T: Encode> Encode for LossyValue<T> {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        self.value.encode(encoder)
    }
}

impl<T> Default for LossyValue<T> {
    fn default() -> Self {
        LossyValue::new(None)
    }
}

impl<T> Deref for LossyValue<T> {
    type Target = Option<T>;

    fn deref(&self) -> &Option<T> {
        &self.value
    }
}

impl<T> DerefMut for LossyValue<T> {
    fn deref_mut(&mut self) -> &mut Option<T> {
        &mut self.value
    }
}

impl<T: PartialEq> PartialEq for LossyValue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::de::decode;

    #[test]
    fn test_failure_becomes_none() {
        let lossy: LossyValue<i64> = decode(&Value::from("nope")).unwrap();
        assert_eq!(lossy.value(), None);
        assert!(lossy.outcome().was_reported());
        assert!(lossy.outcome().error().unwrap().is_type_mismatch());
    }

    #[test]
    fn test_null_and_success() {
        let lossy: LossyValue<i64> = decode(&Value::Null).unwrap();
        assert_eq!(lossy.outcome(), &DecodingOutcome::ValueWasNull);
        let lossy: LossyValue<i64> = decode(&Value::Integer(4)).unwrap();
        assert_eq!(lossy.value(), Some(&4));
    }
}

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use super::decode_elements;
use crate::de::{Decode, Decoder};
use crate::error::{DecodeError, EncodeError};
use crate::outcome::DecodingOutcome;
use crate::ser::{Encode, Encoder};
use crate::value::Value;
use crate::wrappers::{
    decode_lossless, recover, LosslessDecodingStrategy, LosslessDefaultStrategy, LosslessScalar,
};

/// An array whose elements decode losslessly; elements that cannot be
/// converted are dropped.
///
/// Element failures are not reported one by one. The aggregate error is
/// the only place they surface, so it is reported once at the array path.
pub struct LosslessArrayWith<T, S> {
    elements: Vec<T>,
    outcome: DecodingOutcome,
    #[cfg(feature = "diagnostics")]
    slots: Vec<Result<usize, DecodeError>>,
    strategy: PhantomData<S>,
}

pub type LosslessArray<T> = LosslessArrayWith<T, LosslessDefaultStrategy>;

impl<T, S> LosslessArrayWith<T, S> {
    pub fn new(elements: Vec<T>) -> Self {
        LosslessArrayWith {
            elements,
            outcome: DecodingOutcome::Success,
            #[cfg(feature = "diagnostics")]
            slots: Vec::new(),
            strategy: PhantomData,
        }
    }

    pub fn elements(&self) -> &[T] {
        &self.elements
    }

    pub fn into_inner(self) -> Vec<T> {
        self.elements
    }

    pub fn outcome(&self) -> &DecodingOutcome {
        &self.outcome
    }

    #[cfg(feature = "diagnostics")]
    pub fn results(&self) -> impl Iterator<Item = Result<&T, &DecodeError>> + '_ {
        self.slots.iter().map(|slot| match slot {
            Ok(index) => Ok(&self.elements[*index]),
            Err(error) => Err(error),
        })
    }
}

impl<T: LosslessScalar, S: LosslessDecodingStrategy> Decode for LosslessArrayWith<T, S> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        let seq = match decoder.sequence() {
            Ok(seq) => seq,
            Err(error) => {
                let mut empty = LosslessArrayWith::new(Vec::new());
                empty.outcome = recover(decoder, error);
                return Ok(empty);
            }
        };
        let decoded = decode_elements(seq, false, |element| {
            decode_lossless::<T, S>(element).map(|(value, _)| value)
        });
        let outcome = match decoded.aggregate(decoder) {
            Some(aggregate) => recover(decoder, aggregate),
            None => DecodingOutcome::Success,
        };
        Ok(LosslessArrayWith {
            elements: decoded.elements,
            outcome,
            #[cfg(feature = "diagnostics")]
            slots: decoded.slots,
            strategy: PhantomData,
        })
    }
}

impl<T: Encode, S> Encode for LosslessArrayWith<T, S> {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        self.elements.encode(encoder)
    }
}

impl<T, S> Deref for LosslessArrayWith<T, S> {
    type Target = Vec<T>;

    fn deref(&self) -> &Vec<T> {
        &self.elements
    }
}

impl<T, S> DerefMut for LosslessArrayWith<T, S> {
    fn deref_mut(&mut self) -> &mut Vec<T> {
        &mut self.elements
    }
}

impl<T: std::fmt::Debug, S> std::fmt::Debug for LosslessArrayWith<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LosslessArray")
            .field("elements", &self.elements)
            .field("outcome", &self.outcome)
            .finish()
    }
}

impl<T: PartialEq, S> PartialEq for LosslessArrayWith<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::de::decode;

    #[test]
    fn test_mixed_scalars() {
        let doc = Value::Array(vec![
            1i64.into(),
            "2".into(),
            Value::Double(3.0),
            "four".into(),
            Value::Null,
        ]);
        let array: LosslessArray<i64> = decode(&doc).unwrap();
        assert_eq!(array.elements(), &[1, 2, 3]);
        assert!(array.outcome().was_reported());
    }
}

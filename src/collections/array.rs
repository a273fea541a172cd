use std::ops::{Deref, DerefMut};

use super::{decode_elements, DecodedElements};
use crate::de::{Decode, Decoder};
use crate::error::{DecodeError, EncodeError};
use crate::outcome::DecodingOutcome;
use crate::ser::{Encode, Encoder};
use crate::value::Value;
use crate::wrappers::{recover, suppress};

/// An array that keeps the elements that decode and drops the rest.
///
/// Each dropped element is reported at its own index. The aggregate
/// `ArrayDecoding` error in the outcome is therefore not reported again.
/// A value that is missing, null, or not an array yields an empty array
/// and one reported error at the field's path.
#[derive(Debug, Clone)]
pub struct LossyArray<T> {
    elements: Vec<T>,
    outcome: DecodingOutcome,
    #[cfg(feature = "diagnostics")]
    slots: Vec<Result<usize, DecodeError>>,
}

impl<T> LossyArray<T> {
    pub fn new(elements: Vec<T>) -> Self {
        LossyArray {
            elements,
            outcome: DecodingOutcome::Success,
            #[cfg(feature = "diagnostics")]
            slots: Vec::new(),
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

    /// One result per input element, in input order.
    #[cfg(feature = "diagnostics")]
    pub fn results(&self) -> impl Iterator<Item = Result<&T, &DecodeError>> + '_ {
        self.slots.iter().map(|slot| match slot {
            Ok(index) => Ok(&self.elements[*index]),
            Err(error) => Err(error),
        })
    }

    fn empty(outcome: DecodingOutcome) -> Self {
        LossyArray {
            elements: Vec::new(),
            outcome,
            #[cfg(feature = "diagnostics")]
            slots: Vec::new(),
        }
    }

    fn from_decoded(decoded: DecodedElements<T>, outcome: DecodingOutcome) -> Self {
        LossyArray {
            elements: decoded.elements,
            outcome,
            #[cfg(feature = "diagnostics")]
            slots: decoded.slots,
        }
    }

    /// Decode with a custom element decoder, under the same policy as
    /// [`Decode`] for `LossyArray<T>`.
    pub(crate) fn decode_with<'a>(
        decoder: &Decoder<'a>,
        decode: impl FnMut(&Decoder<'a>) -> Result<T, DecodeError>,
    ) -> Self {
        let seq = match decoder.sequence() {
            Ok(seq) => seq,
            Err(error) => return LossyArray::empty(recover(decoder, error)),
        };
        let decoded = decode_elements(seq, true, decode);
        let outcome = match decoded.aggregate(decoder) {
            Some(aggregate) => suppress(aggregate),
            None => DecodingOutcome::Success,
        };
        LossyArray::from_decoded(decoded, outcome)
    }
}

impl<T: Decode> Decode for LossyArray<T> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        Ok(LossyArray::decode_with(decoder, T::decode))
    }
}

impl<T: Encode> Encode for LossyArray<T> {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        self.elements.encode(encoder)
    }
}

impl<T> Default for LossyArray<T> {
    fn default() -> Self {
        LossyArray::new(Vec::new())
    }
}

impl<T> Deref for LossyArray<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Vec<T> {
        &self.elements
    }
}

impl<T> DerefMut for LossyArray<T> {
    fn deref_mut(&mut self) -> &mut Vec<T> {
        &mut self.elements
    }
}

impl<T: PartialEq> PartialEq for LossyArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

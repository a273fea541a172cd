//! Element-by-element resilient collections.
//!
//! One bad element never fails the whole collection: it is dropped, and its
//! error is kept both in the collection's aggregate outcome and, when the
//! `diagnostics` feature is on, in a per-element result list.

mod array;
mod dictionary;
mod lossless_array;

pub use array::LossyArray;
pub use dictionary::{DictionaryKey, LossyDictionary};
pub use lossless_array::{LosslessArray, LosslessArrayWith};

use crate::de::{Decoder, SequenceDecoder};
use crate::error::{DecodeError, DecodeErrorKind};

/// Successful elements plus a slot per input element.
pub(crate) struct DecodedElements<T> {
    pub(crate) elements: Vec<T>,
    // Ok(index into elements) or the element's error
    pub(crate) slots: Vec<Result<usize, DecodeError>>,
    pub(crate) errors: Vec<DecodeError>,
}

impl<T> DecodedElements<T> {
    /// The aggregate error covering every failed element, if any failed.
    pub(crate) fn aggregate(&self, decoder: &Decoder<'_>) -> Option<DecodeError> {
        if self.errors.is_empty() {
            return None;
        }
        Some(DecodeError::new(
            DecodeErrorKind::ArrayDecoding {
                element_count: self.slots.len(),
                errors: self.errors.clone(),
            },
            decoder.path().clone(),
        ))
    }
}

/// Decode every remaining element of `seq` with `decode`.
///
/// The cursor always advances past a failing element. With `report_each`,
/// each failure is reported at its element path as it happens.
pub(crate) fn decode_elements<'a, T>(
    mut seq: SequenceDecoder<'a>,
    report_each: bool,
    mut decode: impl FnMut(&Decoder<'a>) -> Result<T, DecodeError>,
) -> DecodedElements<T> {
    let mut decoded = DecodedElements {
        elements: Vec::with_capacity(seq.len()),
        slots: Vec::with_capacity(seq.len()),
        errors: Vec::new(),
    };
    while let Some(element) = seq.next_decoder() {
        match decode(&element) {
            Ok(value) => {
                decoded.slots.push(Ok(decoded.elements.len()));
                decoded.elements.push(value);
            }
            Err(error) => {
                if report_each {
                    element.report(&error);
                }
                tracing::debug!(
                    path = %element.path(),
                    error = %error.kind,
                    "dropping array element"
                );
                decoded.errors.push(error.clone());
                decoded.slots.push(Err(error));
            }
        }
    }
    decoded
}

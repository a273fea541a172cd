use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use super::{PolymorphicCodableStrategy, PolymorphicRegistry};
use crate::collections::LossyArray;
use crate::de::{Decode, Decoder};
use crate::error::{DecodeError, EncodeError};
use crate::outcome::DecodingOutcome;
use crate::ser::{Encode, Encoder};
use crate::value::Value;
use crate::wrappers::recover;

fn registry<S: PolymorphicCodableStrategy>() -> PolymorphicRegistry<S::Expected> {
    PolymorphicRegistry::from_strategy::<S>()
}

fn encode_elements<S: PolymorphicCodableStrategy>(
    elements: &[S::Expected],
    encoder: &Encoder<'_>,
) -> Result<Value, EncodeError> {
    let registry = registry::<S>();
    let mut encoded = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        encoded.push(registry.encode(element, &encoder.element(index))?);
    }
    Ok(Value::Array(encoded))
}

/// A required polymorphic value. Any failure fails the enclosing decode.
pub struct PolymorphicValue<S: PolymorphicCodableStrategy> {
    value: S::Expected,
    strategy: PhantomData<S>,
}

impl<S: PolymorphicCodableStrategy> PolymorphicValue<S> {
    pub fn new(value: S::Expected) -> Self {
        PolymorphicValue {
            value,
            strategy: PhantomData,
        }
    }

    pub fn into_inner(self) -> S::Expected {
        self.value
    }
}

impl<S: PolymorphicCodableStrategy> Decode for PolymorphicValue<S> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        registry::<S>().decode(decoder).map(PolymorphicValue::new)
    }
}

impl<S: PolymorphicCodableStrategy> Encode for PolymorphicValue<S> {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        registry::<S>().encode(&self.value, encoder)
    }
}

impl<S: PolymorphicCodableStrategy> Deref for PolymorphicValue<S> {
    type Target = S::Expected;

    fn deref(&self) -> &S::Expected {
        &self.value
    }
}

impl<S: PolymorphicCodableStrategy> DerefMut for PolymorphicValue<S> {
    fn deref_mut(&mut self) -> &mut S::Expected {
        &mut self.value
    }
}

impl<S: PolymorphicCodableStrategy> fmt::Debug for PolymorphicValue<S>
where
    S::Expected: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PolymorphicValue").field(&self.value).finish()
    }
}

impl<S: PolymorphicCodableStrategy> PartialEq for PolymorphicValue<S>
where
    S::Expected: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// An optional polymorphic value: absent or null is `None`, anything else
/// must decode.
pub struct OptionalPolymorphicValue<S: PolymorphicCodableStrategy> {
    value: Option<S::Expected>,
    strategy: PhantomData<S>,
}

impl<S: PolymorphicCodableStrategy> OptionalPolymorphicValue<S> {
    pub fn new(value: Option<S::Expected>) -> Self {
        OptionalPolymorphicValue {
            value,
            strategy: PhantomData,
        }
    }

    pub fn into_inner(self) -> Option<S::Expected> {
        self.value
    }
}

impl<S: PolymorphicCodableStrategy> Decode for OptionalPolymorphicValue<S> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        if decoder.is_absent() || decoder.is_null() {
            return Ok(OptionalPolymorphicValue::new(None));
        }
        registry::<S>()
            .decode(decoder)
            .map(|value| OptionalPolymorphicValue::new(Some(value)))
    }
}

impl<S: PolymorphicCodableStrategy> Encode for OptionalPolymorphicValue<S> {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        match &self.value {
            Some(value) => registry::<S>().encode(value, encoder),
            None => Ok(Value::Null),
        }
    }
}

impl<S: PolymorphicCodableStrategy> Default for OptionalPolymorphicValue<S> {
    fn default() -> Self {
        OptionalPolymorphicValue::new(None)
    }
}

impl<S: PolymorphicCodableStrategy> Deref for OptionalPolymorphicValue<S> {
    type Target = Option<S::Expected>;

    fn deref(&self) -> &Option<S::Expected> {
        &self.value
    }
}

impl<S: PolymorphicCodableStrategy> DerefMut for OptionalPolymorphicValue<S> {
    fn deref_mut(&mut self) -> &mut Option<S::Expected> {
        &mut self.value
    }
}

impl<S: PolymorphicCodableStrategy> fmt::Debug for OptionalPolymorphicValue<S>
where
    S::Expected: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OptionalPolymorphicValue")
            .field(&self.value)
            .finish()
    }
}

impl<S: PolymorphicCodableStrategy> PartialEq for OptionalPolymorphicValue<S>
where
    S::Expected: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// An optional polymorphic value that becomes `None` on any failure,
/// including an unknown discriminator with no fallback.
pub struct LossyPolymorphicValue<S: PolymorphicCodableStrategy> {
    value: Option<S::Expected>,
    outcome: DecodingOutcome,
    strategy: PhantomData<S>,
}

impl<S: PolymorphicCodableStrategy> LossyPolymorphicValue<S> {
    pub fn new(value: Option<S::Expected>) -> Self {
        LossyPolymorphicValue {
            value,
            outcome: DecodingOutcome::Success,
            strategy: PhantomData,
        }
    }

    pub fn into_inner(self) -> Option<S::Expected> {
        self.value
    }

    pub fn outcome(&self) -> &DecodingOutcome {
        &self.outcome
    }
}

impl<S: PolymorphicCodableStrategy> Decode for LossyPolymorphicValue<S> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        let (value, outcome) = if decoder.is_absent() {
            (None, DecodingOutcome::KeyAbsent)
        } else if decoder.is_null() {
            (None, DecodingOutcome::ValueWasNull)
        } else {
            match registry::<S>().decode(decoder) {
                Ok(value) => (Some(value), DecodingOutcome::Success),
                Err(error) => (None, recover(decoder, error)),
            }
        };
        Ok(LossyPolymorphicValue {
            value,
            outcome,
            strategy: PhantomData,
        })
    }
}

impl<S: PolymorphicCodableStrategy> Encode for LossyPolymorphicValue<S> {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        match &self.value {
            Some(value) => registry::<S>().encode(value, encoder),
            None => Ok(Value::Null),
        }
    }
}

impl<S: PolymorphicCodableStrategy> Default for LossyPolymorphicValue<S> {
    fn default() -> Self {
        LossyPolymorphicValue::new(None)
    }
}

impl<S: PolymorphicCodableStrategy> Deref for LossyPolymorphicValue<S> {
    type Target = Option<S::Expected>;

    fn deref(&self) -> &Option<S::Expected> {
        &self.value
    }
}

impl<S: PolymorphicCodableStrategy> DerefMut for LossyPolymorphicValue<S> {
    fn deref_mut(&mut self) -> &mut Option<S::Expected> {
        &mut self.value
    }
}

impl<S: PolymorphicCodableStrategy> fmt::Debug for LossyPolymorphicValue<S>
where
    S::Expected: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LossyPolymorphicValue")
            .field("value", &self.value)
            .field("outcome", &self.outcome)
            .finish()
    }
}

impl<S: PolymorphicCodableStrategy> PartialEq for LossyPolymorphicValue<S>
where
    S::Expected: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// A required array of polymorphic values. One bad element fails the whole
/// array.
pub struct PolymorphicArray<S: PolymorphicCodableStrategy> {
    elements: Vec<S::Expected>,
    strategy: PhantomData<S>,
}

impl<S: PolymorphicCodableStrategy> PolymorphicArray<S> {
    pub fn new(elements: Vec<S::Expected>) -> Self {
        PolymorphicArray {
            elements,
            strategy: PhantomData,
        }
    }

    pub fn into_inner(self) -> Vec<S::Expected> {
        self.elements
    }
}

impl<S: PolymorphicCodableStrategy> Decode for PolymorphicArray<S> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        let registry = registry::<S>();
        let mut seq = decoder.sequence()?;
        let mut elements = Vec::with_capacity(seq.len());
        while let Some(element) = seq.next_decoder() {
            elements.push(registry.decode(&element)?);
        }
        Ok(PolymorphicArray::new(elements))
    }
}

impl<S: PolymorphicCodableStrategy> Encode for PolymorphicArray<S> {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        encode_elements::<S>(&self.elements, encoder)
    }
}

impl<S: PolymorphicCodableStrategy> Deref for PolymorphicArray<S> {
    type Target = Vec<S::Expected>;

    fn deref(&self) -> &Vec<S::Expected> {
        &self.elements
    }
}

impl<S: PolymorphicCodableStrategy> DerefMut for PolymorphicArray<S> {
    fn deref_mut(&mut self) -> &mut Vec<S::Expected> {
        &mut self.elements
    }
}

impl<S: PolymorphicCodableStrategy> fmt::Debug for PolymorphicArray<S>
where
    S::Expected: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PolymorphicArray").field(&self.elements).finish()
    }
}

impl<S: PolymorphicCodableStrategy> PartialEq for PolymorphicArray<S>
where
    S::Expected: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

/// A polymorphic array that drops the elements that fail, under the same
/// policy as [`LossyArray`].
pub struct LossyPolymorphicArray<S: PolymorphicCodableStrategy> {
    inner: LossyArray<S::Expected>,
    strategy: PhantomData<S>,
}

impl<S: PolymorphicCodableStrategy> LossyPolymorphicArray<S> {
    pub fn new(elements: Vec<S::Expected>) -> Self {
        LossyPolymorphicArray {
            inner: LossyArray::new(elements),
            strategy: PhantomData,
        }
    }

    pub fn into_inner(self) -> Vec<S::Expected> {
        self.inner.into_inner()
    }

    pub fn outcome(&self) -> &DecodingOutcome {
        self.inner.outcome()
    }

    /// One result per input element, in input order.
    #[cfg(feature = "diagnostics")]
    pub fn results(&self) -> impl Iterator<Item = Result<&S::Expected, &DecodeError>> + '_ {
        self.inner.results()
    }
}

impl<S: PolymorphicCodableStrategy> Decode for LossyPolymorphicArray<S> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        let registry = registry::<S>();
        Ok(LossyPolymorphicArray {
            inner: LossyArray::decode_with(decoder, |element| registry.decode(element)),
            strategy: PhantomData,
        })
    }
}

impl<S: PolymorphicCodableStrategy> Encode for LossyPolymorphicArray<S> {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        encode_elements::<S>(&self.inner, encoder)
    }
}

impl<S: PolymorphicCodableStrategy> Default for LossyPolymorphicArray<S> {
    fn default() -> Self {
        LossyPolymorphicArray::new(Vec::new())
    }
}

impl<S: PolymorphicCodableStrategy> Deref for LossyPolymorphicArray<S> {
    type Target = Vec<S::Expected>;

    fn deref(&self) -> &Vec<S::Expected> {
        &self.inner
    }
}

impl<S: PolymorphicCodableStrategy> DerefMut for LossyPolymorphicArray<S> {
    fn deref_mut(&mut self) -> &mut Vec<S::Expected> {
        &mut self.inner
    }
}

impl<S: PolymorphicCodableStrategy> fmt::Debug for LossyPolymorphicArray<S>
where
    S::Expected: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LossyPolymorphicArray")
            .field("elements", &self.inner.elements())
            .field("outcome", self.inner.outcome())
            .finish()
    }
}

impl<S: PolymorphicCodableStrategy> PartialEq for LossyPolymorphicArray<S>
where
    S::Expected: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.inner.elements() == other.inner.elements()
    }
}

/// A polymorphic array that is all or nothing: if any element fails, or
/// the value is not an array, the whole array is empty.
pub struct DefaultEmptyPolymorphicArray<S: PolymorphicCodableStrategy> {
    elements: Vec<S::Expected>,
    outcome: DecodingOutcome,
    strategy: PhantomData<S>,
}

impl<S: PolymorphicCodableStrategy> DefaultEmptyPolymorphicArray<S> {
    pub fn new(elements: Vec<S::Expected>) -> Self {
        DefaultEmptyPolymorphicArray {
            elements,
            outcome: DecodingOutcome::Success,
            strategy: PhantomData,
        }
    }

    pub fn into_inner(self) -> Vec<S::Expected> {
        self.elements
    }

    pub fn outcome(&self) -> &DecodingOutcome {
        &self.outcome
    }

    fn empty(outcome: DecodingOutcome) -> Self {
        DefaultEmptyPolymorphicArray {
            elements: Vec::new(),
            outcome,
            strategy: PhantomData,
        }
    }
}

impl<S: PolymorphicCodableStrategy> Decode for DefaultEmptyPolymorphicArray<S> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        if decoder.is_absent() {
            return Ok(DefaultEmptyPolymorphicArray::empty(DecodingOutcome::KeyAbsent));
        }
        if decoder.is_null() {
            return Ok(DefaultEmptyPolymorphicArray::empty(DecodingOutcome::ValueWasNull));
        }
        match PolymorphicArray::<S>::decode(decoder) {
            Ok(array) => Ok(DefaultEmptyPolymorphicArray::new(array.into_inner())),
            Err(error) => {
                tracing::warn!(
                    path = %decoder.path(),
                    error = %error,
                    "discarding polymorphic array"
                );
                Ok(DefaultEmptyPolymorphicArray::empty(recover(decoder, error)))
            }
        }
    }
}

impl<S: PolymorphicCodableStrategy> Encode for DefaultEmptyPolymorphicArray<S> {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        encode_elements::<S>(&self.elements, encoder)
    }
}

impl<S: PolymorphicCodableStrategy> Default for DefaultEmptyPolymorphicArray<S> {
    fn default() -> Self {
        DefaultEmptyPolymorphicArray::new(Vec::new())
    }
}

impl<S: PolymorphicCodableStrategy> Deref for DefaultEmptyPolymorphicArray<S> {
    type Target = Vec<S::Expected>;

    fn deref(&self) -> &Vec<S::Expected> {
        &self.elements
    }
}

impl<S: PolymorphicCodableStrategy> DerefMut for DefaultEmptyPolymorphicArray<S> {
    fn deref_mut(&mut self) -> &mut Vec<S::Expected> {
        &mut self.elements
    }
}

impl<S: PolymorphicCodableStrategy> fmt::Debug for DefaultEmptyPolymorphicArray<S>
where
    S::Expected: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultEmptyPolymorphicArray")
            .field("elements", &self.elements)
            .field("outcome", &self.outcome)
            .finish()
    }
}

impl<S: PolymorphicCodableStrategy> PartialEq for DefaultEmptyPolymorphicArray<S>
where
    S::Expected: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::de::decode;
    use crate::error::DecodeErrorKind;
    use crate::polymorphic::{PolymorphicCandidate, PolymorphicType};

    #[derive(Debug, PartialEq)]
    struct Dog {
        name: String,
    }

    impl Decode for Dog {
        fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
            Ok(Dog {
                name: decoder.keyed()?.decode("name")?,
            })
        }
    }

    impl Encode for Dog {
        fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
            let mut keyed = encoder.keyed();
            keyed.encode("name", &self.name)?;
            Ok(keyed.finish())
        }
    }

    impl PolymorphicType for Dog {
        const IDENTIFIER: &'static str = "dog";
    }

    #[derive(Debug, PartialEq)]
    enum Animal {
        Dog(Dog),
    }

    fn upcast_dog(dog: Dog) -> Option<Animal> {
        Some(Animal::Dog(dog))
    }

    fn downcast_dog(animal: &Animal) -> Option<&Dog> {
        match animal {
            Animal::Dog(dog) => Some(dog),
        }
    }

    struct AnimalStrategy;

    impl PolymorphicCodableStrategy for AnimalStrategy {
        type Expected = Animal;

        fn candidates() -> Vec<PolymorphicCandidate<Animal>> {
            vec![PolymorphicCandidate::new(upcast_dog, downcast_dog)]
        }
    }

    fn dog(name: &str) -> Value {
        Value::from_fields(vec![("type", "dog".into()), ("name", name.into())])
    }

    #[test]
    fn test_unknown_identifier_fails_required() {
        let doc = Value::from_fields(vec![("type", "cat".into())]);
        let err = decode::<PolymorphicValue<AnimalStrategy>>(&doc).unwrap_err();
        assert!(matches!(
            err.kind,
            DecodeErrorKind::NoMatchingPolymorphicType { ref identifier } if identifier == "cat"
        ));
    }

    #[test]
    fn test_lossy_value_absorbs_failure() {
        let doc = Value::from_fields(vec![("type", "cat".into())]);
        let value: LossyPolymorphicValue<AnimalStrategy> = decode(&doc).unwrap();
        assert!(value.is_none());
        assert!(value.outcome().was_reported());
    }

    #[test]
    fn test_optional_value_propagates() {
        let value: OptionalPolymorphicValue<AnimalStrategy> = decode(&Value::Null).unwrap();
        assert!(value.is_none());

        let doc = Value::from_fields(vec![("name", "rex".into())]);
        assert!(decode::<OptionalPolymorphicValue<AnimalStrategy>>(&doc).is_err());
    }

    #[test]
    fn test_array_variants() {
        let doc = Value::Array(vec![dog("rex"), Value::from("junk"), dog("fido")]);

        assert!(decode::<PolymorphicArray<AnimalStrategy>>(&doc).is_err());

        let lossy: LossyPolymorphicArray<AnimalStrategy> = decode(&doc).unwrap();
        assert_eq!(lossy.len(), 2);

        let all_or_nothing: DefaultEmptyPolymorphicArray<AnimalStrategy> = decode(&doc).unwrap();
        assert!(all_or_nothing.is_empty());
        assert!(all_or_nothing.outcome().was_reported());
    }
}

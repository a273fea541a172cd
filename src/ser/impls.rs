use std::collections::{BTreeMap, HashMap};

use super::{Encode, Encoder};
use crate::error::EncodeError;
use crate::value::Value;

impl Encode for bool {
    fn encode(&self, _encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        Ok(Value::Bool(*self))
    }
}

macro_rules! impl_encode_integer {
    ($($ty:ty),*) => {
        $(
            impl Encode for $ty {
                fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
                    i64::try_from(*self)
                        .map(Value::Integer)
                        .map_err(|_| {
                            encoder.invalid_value(format!(
                                "{} does not fit in a 64-bit integer",
                                self
                            ))
                        })
                }
            }
        )*
    };
}

impl_encode_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Encode for f64 {
    fn encode(&self, _encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        Ok(Value::Double(*self))
    }
}

impl Encode for f32 {
    fn encode(&self, _encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        Ok(Value::Double(*self as f64))
    }
}

impl Encode for str {
    fn encode(&self, _encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        Ok(Value::String(self.to_string()))
    }
}

impl Encode for String {
    fn encode(&self, _encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        Ok(Value::String(self.clone()))
    }
}

impl Encode for char {
    fn encode(&self, _encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        Ok(Value::String(self.to_string()))
    }
}

impl Encode for Value {
    fn encode(&self, _encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        Ok(self.clone())
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        match self {
            Some(v) => v.encode(encoder),
            None => Ok(Value::Null),
        }
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        (**self).encode(encoder)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        (**self).encode(encoder)
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        self.iter()
            .enumerate()
            .map(|(i, item)| item.encode(&encoder.element(i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        self.as_slice().encode(encoder)
    }
}

// Map keys are user data and bypass the key encoding strategy.
impl<T: Encode> Encode for BTreeMap<String, T> {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        let mut keyed = encoder.keyed();
        for (key, value) in self {
            let encoded = value.encode(&encoder.child(key))?;
            keyed.insert_raw(key.clone(), encoded);
        }
        Ok(keyed.finish())
    }
}

impl<T: Encode> Encode for HashMap<String, T> {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        let mut keyed = encoder.keyed();
        for (key, value) in self {
            let encoded = value.encode(&encoder.child(key))?;
            keyed.insert_raw(key.clone(), encoded);
        }
        Ok(keyed.finish())
    }
}

#[cfg(test)]
mod tests {
    use crate::options::{EncoderOptions, KeyEncodingStrategy};
    use crate::ser::{encode, encode_with_options, Encode, Encoder};
    use crate::value::Value;
    use crate::EncodeError;
    use std::collections::BTreeMap;

    struct Profile {
        display_name: String,
        tags: BTreeMap<String, i64>,
    }

    impl Encode for Profile {
        fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
            let mut keyed = encoder.keyed();
            keyed.encode("displayName", &self.display_name)?;
            keyed.encode("tags", &self.tags)?;
            Ok(keyed.finish())
        }
    }

    #[test]
    fn test_key_strategy_skips_map_keys() {
        let mut tags = BTreeMap::new();
        tags.insert("someTag".to_string(), 1);
        let profile = Profile {
            display_name: "x".into(),
            tags,
        };
        let options = EncoderOptions::new()
            .with_key_encoding_strategy(KeyEncodingStrategy::ConvertToSnakeCase);
        let value = encode_with_options(&profile, &options).unwrap();
        assert_eq!(value.get("display_name"), Some(&Value::from("x")));
        assert_eq!(
            value.get("tags").and_then(|t| t.get("someTag")),
            Some(&Value::Integer(1))
        );
    }

    #[test]
    fn test_u64_overflow() {
        let err = encode(&u64::MAX).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidValue { .. }));
    }
}

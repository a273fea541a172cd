use std::collections::{BTreeMap, HashMap};

use super::{Decode, Decoder};
use crate::error::DecodeError;
use crate::value::Value;

impl Decode for bool {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        match decoder.require("boolean")? {
            Value::Bool(v) => Ok(*v),
            other => Err(decoder.type_mismatch("boolean", other)),
        }
    }
}

fn decode_integer(decoder: &Decoder<'_>, expected: &str) -> Result<i64, DecodeError> {
    match decoder.require(expected)? {
        Value::Integer(v) => Ok(*v),
        Value::Double(v) if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 => {
            Ok(*v as i64)
        }
        Value::Double(v) => Err(DecodeError::data_corrupted(
            decoder.path(),
            format!("number {} does not fit in {}", v, expected),
        )),
        other => Err(decoder.type_mismatch(expected, other)),
    }
}

macro_rules! impl_decode_integer {
    ($($ty:ty),*) => {
        $(
            impl Decode for $ty {
                fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
                    let v = decode_integer(decoder, stringify!($ty))?;
                    <$ty>::try_from(v).map_err(|_| {
                        DecodeError::data_corrupted(
                            decoder.path(),
                            format!("number {} does not fit in {}", v, stringify!($ty)),
                        )
                    })
                }
            }
        )*
    };
}

impl_decode_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Decode for f64 {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        match decoder.require("double")? {
            Value::Double(v) => Ok(*v),
            Value::Integer(v) => Ok(*v as f64),
            other => Err(decoder.type_mismatch("double", other)),
        }
    }
}

impl Decode for f32 {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        f64::decode(decoder).map(|v| v as f32)
    }
}

impl Decode for String {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        match decoder.require("string")? {
            Value::String(s) => Ok(s.clone()),
            other => Err(decoder.type_mismatch("string", other)),
        }
    }
}

impl Decode for char {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        let s = String::decode(decoder)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(DecodeError::type_mismatch(
                decoder.path(),
                "single character",
                format!("string of length {}", s.chars().count()),
            )),
        }
    }
}

impl Decode for Value {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        decoder.value().cloned()
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        if decoder.is_absent() || decoder.is_null() {
            return Ok(None);
        }
        T::decode(decoder).map(Some)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        T::decode(decoder).map(Box::new)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        let mut seq = decoder.sequence()?;
        let mut out = Vec::with_capacity(seq.len());
        while !seq.is_at_end() {
            out.push(seq.decode_next()?);
        }
        Ok(out)
    }
}

impl<T: Decode> Decode for BTreeMap<String, T> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        let keyed = decoder.keyed()?;
        let mut out = BTreeMap::new();
        for (key, value) in keyed.entries() {
            let child = Decoder::new(Some(value), decoder.path().join_key(key), decoder.context());
            out.insert(key.clone(), T::decode(&child)?);
        }
        Ok(out)
    }
}

impl<T: Decode> Decode for HashMap<String, T> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        BTreeMap::<String, T>::decode(decoder).map(|map| map.into_iter().collect())
    }
}

//! Encoding Rust values back into [`Value`] trees.

mod impls;

use std::collections::BTreeMap;

use crate::error::{EncodeError, Path};
use crate::options::EncoderOptions;
use crate::value::Value;

/// Types that can be encoded into a document node.
pub trait Encode {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError>;
}

/// Path-tracking encode cursor.
#[derive(Debug, Clone)]
pub struct Encoder<'a> {
    path: Path,
    options: &'a EncoderOptions,
}

impl<'a> Encoder<'a> {
    /// An encoder for the document root.
    pub fn new(options: &'a EncoderOptions) -> Self {
        Encoder {
            path: Path::root(),
            options,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &'a EncoderOptions {
        self.options
    }

    /// An encoder for the value stored under `key`.
    pub fn child(&self, key: &str) -> Encoder<'a> {
        Encoder {
            path: self.path.join_key(key),
            options: self.options,
        }
    }

    /// An encoder for the array element at `index`.
    pub fn element(&self, index: usize) -> Encoder<'a> {
        Encoder {
            path: self.path.join_index(index),
            options: self.options,
        }
    }

    pub fn keyed(&self) -> KeyedEncoder<'a> {
        KeyedEncoder {
            encoder: self.clone(),
            map: BTreeMap::new(),
        }
    }

    pub fn encode<T: Encode + ?Sized>(&self, value: &T) -> Result<Value, EncodeError> {
        value.encode(self)
    }

    pub fn invalid_value(&self, message: impl Into<String>) -> EncodeError {
        EncodeError::InvalidValue {
            path: self.path.clone(),
            message: message.into(),
        }
    }
}

/// Builder for an object node.
///
/// Struct field keys go through the configured
/// [`KeyEncodingStrategy`](crate::options::KeyEncodingStrategy); keys
/// inserted with [`insert_raw`](KeyedEncoder::insert_raw) are kept literally.
#[derive(Debug)]
pub struct KeyedEncoder<'a> {
    encoder: Encoder<'a>,
    map: BTreeMap<String, Value>,
}

impl<'a> KeyedEncoder<'a> {
    pub fn encode<T: Encode + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), EncodeError> {
        let encoded = value.encode(&self.encoder.child(key))?;
        let key = self.encoder.options.key_encoding_strategy.apply(key);
        self.map.insert(key, encoded);
        Ok(())
    }

    /// Encode `value` only when it is `Some`; the key is omitted otherwise.
    pub fn encode_if_present<T: Encode>(
        &mut self,
        key: &str,
        value: &Option<T>,
    ) -> Result<(), EncodeError> {
        match value {
            Some(value) => self.encode(key, value),
            None => Ok(()),
        }
    }

    /// Insert an already-encoded value under a literal key.
    pub fn insert_raw(&mut self, key: impl Into<String>, value: Value) {
        self.map.insert(key.into(), value);
    }

    pub fn encoder(&self) -> &Encoder<'a> {
        &self.encoder
    }

    pub fn finish(self) -> Value {
        Value::Object(self.map)
    }
}

/// Encode `value` with default options.
pub fn encode<T: Encode + ?Sized>(value: &T) -> Result<Value, EncodeError> {
    encode_with_options(value, &EncoderOptions::default())
}

pub fn encode_with_options<T: Encode + ?Sized>(
    value: &T,
    options: &EncoderOptions,
) -> Result<Value, EncodeError> {
    value.encode(&Encoder::new(options))
}

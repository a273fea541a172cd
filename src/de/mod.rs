//! Path-tracking decode framework over [`Value`] trees.
//!
//! A [`Decoder`] points at one node of the document (or at a key that is
//! absent), knows its path from the root, and carries the shared
//! [`DecodeContext`]. Types implement [`Decode`] by opening keyed or
//! sequential views on it.
//!
//! ```rust
//! use resilient_codable::de::{self, Decode, Decoder};
//! use resilient_codable::{DecodeError, Value};
//!
//! struct Person {
//!     name: String,
//!     age: i64,
//! }
//!
//! impl Decode for Person {
//!     fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
//!         let keyed = decoder.keyed()?;
//!         Ok(Person {
//!             name: keyed.decode("name")?,
//!             age: keyed.decode("age")?,
//!         })
//!     }
//! }
//!
//! let doc = Value::from_fields(vec![("name", "Alice".into()), ("age", 30i64.into())]);
//! let person: Person = de::decode(&doc).unwrap();
//! assert_eq!(person.name, "Alice");
//! assert_eq!(person.age, 30);
//! ```

mod impls;

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use crate::error::{DecodeError, Path};
use crate::options::{DecoderOptions, KeyDecodingStrategy};
use crate::report::{ErrorDigest, ErrorReporter};
use crate::value::Value;

/// Types that can be decoded from a document node.
pub trait Decode: Sized {
    /// Decode from the node `decoder` points at. The node may be absent
    /// (missing key) or null; most types reject both.
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError>;
}

/// State shared by every decoder of one top-level decode call.
///
/// Holds at most one [`ErrorReporter`]. The context is `!Sync` and is meant
/// to be created right before a decode and dropped right after it.
#[derive(Debug, Default)]
pub struct DecodeContext {
    options: DecoderOptions,
    reporter: RefCell<Option<ErrorReporter>>,
}

impl DecodeContext {
    pub fn new(options: DecoderOptions) -> Self {
        DecodeContext {
            options,
            reporter: RefCell::new(None),
        }
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Install `reporter`, returning the one it displaced, if any.
    ///
    /// A displaced reporter is marked so that its digest reports "may be
    /// missing reported errors".
    pub fn install_reporter(&mut self, reporter: ErrorReporter) -> Option<ErrorReporter> {
        let displaced = self.reporter.get_mut().replace(reporter);
        displaced.map(|mut prior| {
            tracing::warn!(
                "replacing an installed error reporter; its digest may be missing reported errors"
            );
            prior.mark_may_be_missing_reported_errors();
            prior
        })
    }

    /// Remove and return the installed reporter.
    pub fn take_reporter(&mut self) -> Option<ErrorReporter> {
        self.reporter.get_mut().take()
    }

    pub fn has_reporter(&self) -> bool {
        self.reporter.borrow().is_some()
    }

    /// Forward `error` to the installed reporter at `path`. Returns false
    /// when no reporter is installed.
    pub(crate) fn report(&self, error: &DecodeError, path: &Path) -> bool {
        match self.reporter.borrow_mut().as_mut() {
            Some(reporter) => {
                reporter.record(error.clone(), &path.to_strings());
                true
            }
            None => false,
        }
    }

    /// Decode `value` as the document root.
    pub fn decode_root<T: Decode>(&self, value: &Value) -> Result<T, DecodeError> {
        T::decode(&Decoder::new(Some(value), Path::root(), self))
    }
}

/// Cursor over one (possibly absent) node of the document.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    value: Option<&'a Value>,
    path: Path,
    context: &'a DecodeContext,
}

impl<'a> Decoder<'a> {
    pub fn new(value: Option<&'a Value>, path: Path, context: &'a DecodeContext) -> Self {
        Decoder {
            value,
            path,
            context,
        }
    }

    /// True when the key this decoder was created for is missing.
    pub fn is_absent(&self) -> bool {
        self.value.is_none()
    }

    /// True when the key is present with an explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self.value, Some(Value::Null))
    }

    /// The raw node, `None` when absent.
    pub fn raw(&self) -> Option<&'a Value> {
        self.value
    }

    /// The raw node, failing with `KeyNotFound` when absent.
    pub fn value(&self) -> Result<&'a Value, DecodeError> {
        self.value.ok_or_else(|| self.key_not_found())
    }

    /// The raw node, failing when absent or null.
    pub fn require(&self, expected: &str) -> Result<&'a Value, DecodeError> {
        match self.value {
            None => Err(self.key_not_found()),
            Some(Value::Null) => Err(DecodeError::value_not_found(&self.path, expected)),
            Some(value) => Ok(value),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn context(&self) -> &'a DecodeContext {
        self.context
    }

    pub fn options(&self) -> &'a DecoderOptions {
        &self.context.options
    }

    pub fn user_info(&self, key: &str) -> Option<&'a Value> {
        self.context.options.user_info.get(key)
    }

    /// Open a keyed view of an object node.
    pub fn keyed(&self) -> Result<KeyedDecoder<'a>, DecodeError> {
        match self.require("object")? {
            Value::Object(map) => Ok(KeyedDecoder::new(map, self.path.clone(), self.context)),
            other => Err(self.type_mismatch("object", other)),
        }
    }

    /// Open a sequential view of an array node.
    pub fn sequence(&self) -> Result<SequenceDecoder<'a>, DecodeError> {
        match self.require("array")? {
            Value::Array(items) => Ok(SequenceDecoder {
                items,
                index: 0,
                path: self.path.clone(),
                context: self.context,
            }),
            other => Err(self.type_mismatch("array", other)),
        }
    }

    pub fn decode<T: Decode>(&self) -> Result<T, DecodeError> {
        T::decode(self)
    }

    /// Forward `error` to the ambient reporter at this decoder's path.
    pub fn report(&self, error: &DecodeError) -> bool {
        self.context.report(error, &self.path)
    }

    /// A `TypeMismatch` error at this path.
    pub fn type_mismatch(&self, expected: &str, found: &Value) -> DecodeError {
        DecodeError::type_mismatch(&self.path, expected, found.type_name())
    }

    fn key_not_found(&self) -> DecodeError {
        let key = self.path.last_key().unwrap_or("<root>");
        DecodeError::key_not_found(&self.path, key)
    }
}

/// Keyed view of an object node.
#[derive(Debug)]
pub struct KeyedDecoder<'a> {
    map: &'a BTreeMap<String, Value>,
    path: Path,
    context: &'a DecodeContext,
    // converted key -> literal key, present only under a converting strategy
    converted: Option<HashMap<String, &'a str>>,
}

impl<'a> KeyedDecoder<'a> {
    fn new(map: &'a BTreeMap<String, Value>, path: Path, context: &'a DecodeContext) -> Self {
        let strategy = context.options.key_decoding_strategy;
        let converted = match strategy {
            KeyDecodingStrategy::UseDefaultKeys => None,
            KeyDecodingStrategy::ConvertFromCamelCase => {
                let mut converted = HashMap::with_capacity(map.len());
                for literal in map.keys() {
                    if let Some(key) = strategy.convert(literal) {
                        converted.entry(key).or_insert(literal.as_str());
                    }
                }
                Some(converted)
            }
        };
        KeyedDecoder {
            map,
            path,
            context,
            converted,
        }
    }

    fn lookup(&self, key: &str) -> Option<&'a Value> {
        match &self.converted {
            Some(converted) => converted.get(key).and_then(|literal| self.map.get(*literal)),
            None => self.map.get(key),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// True when `key` is present with an explicit null.
    pub fn is_null(&self, key: &str) -> bool {
        matches!(self.lookup(key), Some(Value::Null))
    }

    /// A decoder for `key`, absent if the key is missing.
    pub fn decoder_for(&self, key: &str) -> Decoder<'a> {
        Decoder::new(self.lookup(key), self.path.join_key(key), self.context)
    }

    pub fn decode<T: Decode>(&self, key: &str) -> Result<T, DecodeError> {
        T::decode(&self.decoder_for(key))
    }

    /// The document's keys exactly as written, never key-converted.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.map.keys().map(String::as_str)
    }

    /// The underlying entries with their literal keys.
    pub fn entries(&self) -> &'a BTreeMap<String, Value> {
        self.map
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn context(&self) -> &'a DecodeContext {
        self.context
    }
}

/// Sequential view of an array node.
#[derive(Debug)]
pub struct SequenceDecoder<'a> {
    items: &'a [Value],
    index: usize,
    path: Path,
    context: &'a DecodeContext,
}

impl<'a> SequenceDecoder<'a> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.items.len()
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    /// A decoder for the next element, advancing the cursor whether or not
    /// the caller then decodes it successfully.
    pub fn next_decoder(&mut self) -> Option<Decoder<'a>> {
        let item = self.items.get(self.index)?;
        let decoder = Decoder::new(Some(item), self.path.join_index(self.index), self.context);
        self.index += 1;
        Some(decoder)
    }

    pub fn decode_next<T: Decode>(&mut self) -> Result<T, DecodeError> {
        match self.next_decoder() {
            Some(decoder) => T::decode(&decoder),
            None => Err(DecodeError::value_not_found(
                &self.path.join_index(self.index),
                "element past the end of the array",
            )),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A decoded value together with the digest of errors recovered on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub digest: Option<ErrorDigest>,
}

/// Decode `value` with default options.
pub fn decode<T: Decode>(value: &Value) -> Result<T, DecodeError> {
    decode_with_options(value, &DecoderOptions::default())
}

/// Decode `value` with the given options and no error reporting.
pub fn decode_with_options<T: Decode>(
    value: &Value,
    options: &DecoderOptions,
) -> Result<T, DecodeError> {
    DecodeContext::new(options.clone()).decode_root(value)
}

/// Decode `value`, collecting recovered errors when
/// `options.report_resilient_errors` is set.
///
/// The reporter is owned by this call and flushed exactly once after the
/// decode completes. A hard failure discards it.
pub fn decode_with_report<T: Decode>(
    value: &Value,
    options: &DecoderOptions,
) -> Result<Decoded<T>, DecodeError> {
    let mut context = DecodeContext::new(options.clone());
    if options.report_resilient_errors {
        context.install_reporter(ErrorReporter::new());
    }
    let value = context.decode_root(value)?;
    let digest = context.take_reporter().and_then(|mut reporter| reporter.flush());
    Ok(Decoded { value, digest })
}

/// [`decode_with_report`] with default options and reporting enabled.
pub fn decode_reporting<T: Decode>(value: &Value) -> Result<Decoded<T>, DecodeError> {
    decode_with_report(
        value,
        &DecoderOptions::default().with_resilient_error_reporting(true),
    )
}

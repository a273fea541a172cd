use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use crate::de::{Decode, Decoder};
use crate::error::{DecodeError, DecodeErrorKind, EncodeError};
use crate::outcome::DecodingOutcome;
use crate::ser::{Encode, Encoder};
use crate::value::Value;
use crate::wrappers::{recover, short_type_name, suppress};

/// Key types a [`LossyDictionary`] can be keyed by.
///
/// Implemented for `String` and the integer types; those are the only keys
/// with a defined text form.
pub trait DictionaryKey: Ord + Clone {
    fn from_key(key: &str) -> Option<Self>;

    fn to_key(&self) -> String;
}

impl DictionaryKey for String {
    fn from_key(key: &str) -> Option<Self> {
        Some(key.to_string())
    }

    fn to_key(&self) -> String {
        self.clone()
    }
}

macro_rules! impl_integer_key {
    ($($ty:ty),*) => {
        $(
            impl DictionaryKey for $ty {
                fn from_key(key: &str) -> Option<Self> {
                    key.parse().ok()
                }

                fn to_key(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_integer_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// A dictionary that keeps the entries that decode and drops the rest.
///
/// Keys are the document's literal keys: the key decoding strategy that
/// applies to struct fields never touches them.
#[derive(Debug, Clone)]
pub struct LossyDictionary<K, V> {
    entries: BTreeMap<K, V>,
    outcome: DecodingOutcome,
    #[cfg(feature = "diagnostics")]
    results: Vec<(String, Result<K, DecodeError>)>,
}

impl<K: DictionaryKey, V> LossyDictionary<K, V> {
    pub fn new(entries: BTreeMap<K, V>) -> Self {
        LossyDictionary {
            entries,
            outcome: DecodingOutcome::Success,
            #[cfg(feature = "diagnostics")]
            results: Vec::new(),
        }
    }

    pub fn entries(&self) -> &BTreeMap<K, V> {
        &self.entries
    }

    pub fn into_inner(self) -> BTreeMap<K, V> {
        self.entries
    }

    pub fn outcome(&self) -> &DecodingOutcome {
        &self.outcome
    }

    /// One result per input entry, keyed by the literal key, in key order.
    #[cfg(feature = "diagnostics")]
    pub fn results(&self) -> impl Iterator<Item = (&str, Result<&V, &DecodeError>)> + '_ {
        self.results.iter().filter_map(|(literal, result)| match result {
            Ok(key) => self.entries.get(key).map(|v| (literal.as_str(), Ok(v))),
            Err(error) => Some((literal.as_str(), Err(error))),
        })
    }

    fn empty(outcome: DecodingOutcome) -> Self {
        LossyDictionary {
            entries: BTreeMap::new(),
            outcome,
            #[cfg(feature = "diagnostics")]
            results: Vec::new(),
        }
    }
}

fn decode_entry<K: DictionaryKey, V: Decode>(
    literal: &str,
    decoder: &Decoder<'_>,
) -> Result<(K, V), DecodeError> {
    let key = K::from_key(literal).ok_or_else(|| {
        DecodeError::data_corrupted(
            decoder.path(),
            format!("dictionary key '{}' is not a valid {}", literal, short_type_name::<K>()),
        )
    })?;
    let value = V::decode(decoder)?;
    Ok((key, value))
}

impl<K: DictionaryKey, V: Decode> Decode for LossyDictionary<K, V> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        let keyed = match decoder.keyed() {
            Ok(keyed) => keyed,
            Err(error) => return Ok(LossyDictionary::empty(recover(decoder, error))),
        };

        let mut entries = BTreeMap::new();
        let mut errors = Vec::new();
        #[cfg(feature = "diagnostics")]
        let mut results = Vec::with_capacity(keyed.len());

        for (literal, raw) in keyed.entries() {
            let child = Decoder::new(
                Some(raw),
                decoder.path().join_key(literal),
                decoder.context(),
            );
            let entry = decode_entry::<K, V>(literal, &child).and_then(|(key, value)| {
                if entries.contains_key(&key) {
                    // an earlier literal already parsed to this key
                    Err(DecodeError::data_corrupted(
                        child.path(),
                        format!("duplicate dictionary key '{}'", literal),
                    ))
                } else {
                    Ok((key, value))
                }
            });
            match entry {
                Ok((key, value)) => {
                    #[cfg(feature = "diagnostics")]
                    results.push((literal.clone(), Ok(key.clone())));
                    entries.insert(key, value);
                }
                Err(error) => {
                    child.report(&error);
                    tracing::debug!(
                        path = %child.path(),
                        error = %error.kind,
                        "dropping dictionary entry"
                    );
                    #[cfg(feature = "diagnostics")]
                    results.push((literal.clone(), Err(error.clone())));
                    errors.push(error);
                }
            }
        }

        // Per-entry errors are already reported; with no single key to blame,
        // the aggregate stays out of the digest.
        let outcome = if errors.is_empty() {
            DecodingOutcome::Success
        } else {
            suppress(DecodeError::new(
                DecodeErrorKind::DictionaryDecoding {
                    entry_count: keyed.len(),
                    errors,
                },
                decoder.path().clone(),
            ))
        };

        Ok(LossyDictionary {
            entries,
            outcome,
            #[cfg(feature = "diagnostics")]
            results,
        })
    }
}

impl<K: DictionaryKey, V: Encode> Encode for LossyDictionary<K, V> {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        let mut keyed = encoder.keyed();
        for (key, value) in &self.entries {
            let literal = key.to_key();
            let encoded = value.encode(&encoder.child(&literal))?;
            keyed.insert_raw(literal, encoded);
        }
        Ok(keyed.finish())
    }
}

impl<K: DictionaryKey, V> Default for LossyDictionary<K, V> {
    fn default() -> Self {
        LossyDictionary::new(BTreeMap::new())
    }
}

impl<K, V> Deref for LossyDictionary<K, V> {
    type Target = BTreeMap<K, V>;

    fn deref(&self) -> &BTreeMap<K, V> {
        &self.entries
    }
}

impl<K, V> DerefMut for LossyDictionary<K, V> {
    fn deref_mut(&mut self) -> &mut BTreeMap<K, V> {
        &mut self.entries
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for LossyDictionary<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

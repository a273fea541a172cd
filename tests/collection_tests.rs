//! Lossy and lossless collections: per-element recovery and key fidelity.

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use resilient_codable::collections::{LosslessArray, LossyArray, LossyDictionary};
use resilient_codable::de::{self, Decode, Decoder};
use resilient_codable::ser::{self, Encode, Encoder};
use resilient_codable::{
    DecodeError, DecodeErrorKind, DecoderOptions, DecodingOutcome, EncodeError,
    KeyDecodingStrategy, Value,
};

#[derive(Debug)]
struct Inventory {
    counts: LossyArray<i64>,
    codes: LosslessArray<String>,
    high_scores: LossyDictionary<String, i64>,
    bins: LossyDictionary<u32, String>,
}

impl Decode for Inventory {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        let keyed = decoder.keyed()?;
        Ok(Inventory {
            counts: keyed.decode("counts")?,
            codes: keyed.decode("codes")?,
            high_scores: keyed.decode("high_scores")?,
            bins: keyed.decode("bins")?,
        })
    }
}

impl Encode for Inventory {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        let mut keyed = encoder.keyed();
        keyed.encode("counts", &self.counts)?;
        keyed.encode("codes", &self.codes)?;
        keyed.encode("high_scores", &self.high_scores)?;
        keyed.encode("bins", &self.bins)?;
        Ok(keyed.finish())
    }
}

fn reporting() -> DecoderOptions {
    DecoderOptions::default().with_resilient_error_reporting(true)
}

#[test]
fn test_array_partial_failure() {
    let doc = Value::from_fields(vec![(
        "counts",
        Value::Array(vec![1i64.into(), "bad".into(), 3i64.into(), Value::Null]),
    )]);
    let decoded = de::decode_with_report::<Inventory>(&doc, &reporting()).unwrap();

    assert_eq!(decoded.value.counts.elements(), &[1, 3]);

    let digest = decoded.digest.unwrap();
    assert_eq!(digest.errors_at(&["counts", "1"]).len(), 1);
    assert_eq!(digest.errors_at(&["counts", "3"]).len(), 1);
    // the aggregate is not reported on top of its elements
    assert!(digest.errors_at(&["counts"]).is_empty());
    let element_errors: Vec<_> = digest
        .errors()
        .into_iter()
        .filter(|e| e.path.to_string().starts_with("counts"))
        .collect();
    assert_eq!(element_errors.len(), 2);
}

#[test]
fn test_array_aggregate_outcome() {
    let doc = Value::from_fields(vec![(
        "counts",
        Value::Array(vec!["x".into(), "y".into()]),
    )]);
    let inventory: Inventory = de::decode(&doc).unwrap();
    assert!(inventory.counts.is_empty());
    match inventory.counts.outcome() {
        DecodingOutcome::Recovered {
            error,
            was_reported,
        } => {
            assert!(!was_reported);
            assert!(matches!(
                error.kind,
                DecodeErrorKind::ArrayDecoding {
                    element_count: 2,
                    ..
                }
            ));
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[cfg(feature = "diagnostics")]
#[test]
fn test_array_results_keep_input_order() {
    let doc = Value::from_fields(vec![(
        "counts",
        Value::Array(vec![1i64.into(), "bad".into(), 3i64.into()]),
    )]);
    let inventory: Inventory = de::decode(&doc).unwrap();
    let results: Vec<_> = inventory.counts.results().collect();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0], Ok(&1));
    assert!(results[1].is_err());
    assert_eq!(results[2], Ok(&3));
}

#[test]
fn test_lossless_array_reports_once() {
    let doc = Value::from_fields(vec![(
        "codes",
        Value::Array(vec!["a".into(), 2i64.into(), Value::Null, true.into()]),
    )]);
    let decoded = de::decode_with_report::<Inventory>(&doc, &reporting()).unwrap();

    assert_eq!(
        decoded.value.codes.elements(),
        &["a".to_string(), "2".to_string(), "true".to_string()]
    );
    let digest = decoded.digest.unwrap();
    assert_eq!(digest.errors_at(&["codes"]).len(), 1);
    assert!(digest.node(&["codes", "2"]).is_none());
}

#[test]
fn test_dictionary_keeps_literal_keys_under_key_conversion() {
    let doc = Value::from_fields(vec![(
        "highScores",
        Value::from_fields(vec![
            ("snake_case.odd-key", 1i64.into()),
            ("oddKey.With-Caps", 2i64.into()),
        ]),
    )]);
    let options = DecoderOptions::default()
        .with_key_decoding_strategy(KeyDecodingStrategy::ConvertFromCamelCase);
    let inventory: Inventory = de::decode_with_options(&doc, &options).unwrap();

    let keys: Vec<&str> = inventory.high_scores.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["oddKey.With-Caps", "snake_case.odd-key"]);
    assert_eq!(inventory.high_scores.get("snake_case.odd-key"), Some(&1));
}

#[test]
fn test_dictionary_drops_bad_entries() {
    let doc = Value::from_fields(vec![
        (
            "high_scores",
            Value::from_fields(vec![("ann", 10i64.into()), ("bob", "ten".into())]),
        ),
        (
            "bins",
            Value::from_fields(vec![("1", "top".into()), ("shelf", "mid".into())]),
        ),
    ]);
    let decoded = de::decode_with_report::<Inventory>(&doc, &reporting()).unwrap();
    let inventory = decoded.value;

    let mut expected = BTreeMap::new();
    expected.insert("ann".to_string(), 10);
    assert_eq!(inventory.high_scores.entries(), &expected);
    assert_eq!(inventory.bins.get(&1).map(String::as_str), Some("top"));
    assert_eq!(inventory.bins.len(), 1);

    let digest = decoded.digest.unwrap();
    assert_eq!(digest.errors_at(&["high_scores", "bob"]).len(), 1);
    assert_eq!(digest.errors_at(&["bins", "shelf"]).len(), 1);
}

#[test]
fn test_dictionary_duplicate_integer_key_is_reported() {
    let doc = Value::from_fields(vec![(
        "bins",
        Value::from_fields(vec![("1", "a".into()), ("01", "b".into())]),
    )]);
    let decoded = de::decode_with_report::<Inventory>(&doc, &reporting()).unwrap();
    let bins = &decoded.value.bins;
    assert_eq!(bins.len(), 1);
    assert_eq!(bins.get(&1).map(String::as_str), Some("b"));

    let digest = decoded.digest.unwrap();
    let duplicates = digest.errors_at(&["bins", "1"]);
    assert_eq!(duplicates.len(), 1);
    assert_eq!(
        duplicates[0].kind,
        DecodeErrorKind::DataCorrupted {
            message: "duplicate dictionary key '1'".into()
        }
    );
    assert!(digest.errors_at(&["bins", "01"]).is_empty());
}

// A dictionary whose every entry fails surfaces no top-level error, while a
// dictionary that is not an object at all does. This asymmetry is deliberate.
#[test]
fn test_dictionary_error_surface_asymmetry() {
    let doc = Value::from_fields(vec![
        (
            "high_scores",
            Value::from_fields(vec![("a", "x".into()), ("b", "y".into())]),
        ),
        ("bins", Value::Array(vec![])),
    ]);
    let decoded = de::decode_with_report::<Inventory>(&doc, &reporting()).unwrap();
    let digest = decoded.digest.unwrap();

    assert!(decoded.value.high_scores.is_empty());
    assert!(digest.errors_at(&["high_scores"]).is_empty());
    assert_eq!(digest.errors_at(&["high_scores", "a"]).len(), 1);
    assert_eq!(digest.errors_at(&["high_scores", "b"]).len(), 1);

    assert!(decoded.value.bins.is_empty());
    assert_eq!(digest.errors_at(&["bins"]).len(), 1);
    assert!(decoded.value.bins.outcome().was_reported());
}

#[test]
fn test_missing_collections_are_empty_and_reported() {
    let decoded = de::decode_with_report::<Inventory>(&Value::new_object(), &reporting()).unwrap();
    assert!(decoded.value.counts.is_empty());
    assert!(decoded.value.codes.is_empty());
    assert!(decoded.value.high_scores.is_empty());

    let digest = decoded.digest.unwrap();
    assert_eq!(digest.errors().len(), 4);
    assert!(digest.errors()[0].kind == DecodeErrorKind::KeyNotFound {
        key: "bins".to_string()
    });
}

#[test]
fn test_encode_collections() {
    let doc = Value::from_fields(vec![
        ("counts", Value::Array(vec![1i64.into(), "x".into()])),
        ("codes", Value::Array(vec![5i64.into()])),
        ("high_scores", Value::from_fields(vec![("Mixed-Key", 3i64.into())])),
        ("bins", Value::from_fields(vec![("4", "low".into())])),
    ]);
    let inventory: Inventory = de::decode(&doc).unwrap();
    let encoded = ser::encode(&inventory).unwrap();

    assert_eq!(encoded.get("counts"), Some(&Value::Array(vec![1i64.into()])));
    assert_eq!(encoded.get("codes"), Some(&Value::Array(vec!["5".into()])));
    assert_eq!(
        encoded.get("high_scores").and_then(|m| m.get("Mixed-Key")),
        Some(&Value::Integer(3))
    );
    assert_eq!(
        encoded.get("bins").and_then(|m| m.get("4")),
        Some(&Value::from("low"))
    );
}

//! Error reporting across a whole decode: aggregation, flushing and reporter lifecycle.

use pretty_assertions::assert_eq;
use resilient_codable::collections::LossyArray;
use resilient_codable::de::{self, Decode, DecodeContext, Decoder};
use resilient_codable::wrappers::{DefaultEmptyString, DefaultValue, DefaultZero, LossyValue};
use resilient_codable::{DecodeError, DecoderOptions, ErrorReporter, Value};

#[derive(Debug)]
struct Order {
    id: DefaultValue<DefaultZero<i64>>,
    customer: Customer,
    lines: LossyArray<Line>,
    note: LossyValue<String>,
}

#[derive(Debug)]
struct Customer {
    name: DefaultValue<DefaultEmptyString>,
}

#[derive(Debug, PartialEq)]
struct Line {
    sku: String,
    quantity: i64,
}

impl Decode for Order {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        let keyed = decoder.keyed()?;
        Ok(Order {
            id: keyed.decode("id")?,
            customer: keyed.decode("customer")?,
            lines: keyed.decode("lines")?,
            note: keyed.decode("note")?,
        })
    }
}

impl Decode for Customer {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        Ok(Customer {
            name: decoder.keyed()?.decode("name")?,
        })
    }
}

impl Decode for Line {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        let keyed = decoder.keyed()?;
        Ok(Line {
            sku: keyed.decode("sku")?,
            quantity: keyed.decode("quantity")?,
        })
    }
}

fn line(sku: &str, quantity: Value) -> Value {
    Value::from_fields(vec![("sku", sku.into()), ("quantity", quantity)])
}

fn messy_order() -> Value {
    Value::from_fields(vec![
        ("id", "A17".into()),
        (
            "customer",
            Value::from_fields(vec![("name", Value::Array(vec![]))]),
        ),
        (
            "lines",
            Value::Array(vec![
                line("x-1", 2i64.into()),
                line("x-2", "two".into()),
                line("x-3", 1i64.into()),
            ]),
        ),
        ("note", 99i64.into()),
    ])
}

#[test]
fn test_digest_collects_every_failure_by_path() {
    let decoded = de::decode_reporting::<Order>(&messy_order()).unwrap();
    let order = decoded.value;
    assert_eq!(*order.id, 0);
    assert_eq!(order.customer.name.as_str(), "");
    assert_eq!(order.lines.len(), 2);
    assert!(order.note.is_none());

    let digest = decoded.digest.unwrap();
    assert!(!digest.may_be_missing_reported_errors());
    assert_eq!(digest.errors().len(), 4);
    assert_eq!(digest.errors_at(&["id"]).len(), 1);
    assert_eq!(digest.errors_at(&["customer", "name"]).len(), 1);
    assert_eq!(digest.errors_at(&["lines", "1"]).len(), 1);
    assert_eq!(digest.errors_at(&["note"]).len(), 1);

    // the element error itself points inside the element
    assert_eq!(
        digest.errors_at(&["lines", "1"])[0].path.to_string(),
        "lines[1].quantity"
    );
}

#[test]
fn test_digest_display() {
    let decoded = de::decode_reporting::<Order>(&messy_order()).unwrap();
    let rendered = decoded.digest.unwrap().to_string();
    assert!(rendered.starts_with("customer\n  name\n    - type mismatch"));
    assert!(rendered.contains("lines\n  1\n    - "));
}

#[test]
fn test_reporting_disabled() {
    let options = DecoderOptions::default();
    let decoded = de::decode_with_report::<Order>(&messy_order(), &options).unwrap();
    assert!(decoded.digest.is_none());
    assert_eq!(decoded.value.lines.len(), 2);
}

#[test]
fn test_clean_document_has_no_digest() {
    let doc = Value::from_fields(vec![
        ("id", 5i64.into()),
        ("customer", Value::from_fields(vec![("name", "Ann".into())])),
        ("lines", Value::Array(vec![line("a", 1i64.into())])),
    ]);
    let decoded = de::decode_reporting::<Order>(&doc).unwrap();
    assert!(decoded.digest.is_none());
    assert_eq!(
        decoded.value.lines.elements(),
        &[Line {
            sku: "a".into(),
            quantity: 1
        }]
    );
}

#[test]
fn test_hard_failure_discards_reporter() {
    let doc = Value::from_fields(vec![("id", "x".into())]);
    // `customer` is a plain required field
    let err = de::decode_reporting::<Order>(&doc).unwrap_err();
    assert_eq!(err.path.to_string(), "customer");
}

#[test]
fn test_second_flush_is_empty() {
    let mut context = DecodeContext::new(DecoderOptions::default());
    context.install_reporter(ErrorReporter::new());
    let _order: Order = context.decode_root(&messy_order()).unwrap();

    let mut reporter = context.take_reporter().unwrap();
    let first = reporter.flush();
    assert!(first.is_some_and(|digest| digest.errors().len() == 4));
    assert!(reporter.flush().is_none());
}

#[test]
fn test_displaced_reporter_is_flagged() {
    let mut context = DecodeContext::new(DecoderOptions::default());
    context.install_reporter(ErrorReporter::new());
    let displaced = context.install_reporter(ErrorReporter::new());
    let _order: Order = context.decode_root(&messy_order()).unwrap();

    let displaced_digest = displaced.and_then(|mut r| r.flush()).unwrap();
    assert!(displaced_digest.may_be_missing_reported_errors());
    assert!(displaced_digest.is_empty());

    let current = context.take_reporter().and_then(|mut r| r.flush()).unwrap();
    assert!(!current.may_be_missing_reported_errors());
    assert_eq!(current.errors().len(), 4);
}

#[test]
fn test_independent_decodes_use_independent_reporters() {
    let first = de::decode_reporting::<Order>(&messy_order()).unwrap();
    let second = de::decode_reporting::<Order>(&messy_order()).unwrap();
    assert_eq!(first.digest, second.digest);
    assert_eq!(first.digest.map(|d| d.errors().len()), Some(4));
}

//! Lossless scalar wrappers: cross-type coercion and representation-preserving encode.

use pretty_assertions::assert_eq;
use resilient_codable::de::{self, Decode, Decoder};
use resilient_codable::ser::{self, Encode, Encoder};
use resilient_codable::wrappers::{
    LosslessBoolValue, LosslessValue, OptionalLosslessBoolValue, OptionalLosslessValue,
    Representation,
};
use resilient_codable::{DecodeError, DecodingOutcome, EncodeError, Value};

#[derive(Debug, PartialEq)]
struct Listing {
    id: LosslessValue<i64>,
    sku: LosslessValue<String>,
    price: LosslessValue<f64>,
    in_stock: LosslessBoolValue,
    featured: OptionalLosslessBoolValue,
    rating: OptionalLosslessValue<f64>,
}

impl Decode for Listing {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
        let keyed = decoder.keyed()?;
        Ok(Listing {
            id: keyed.decode("id")?,
            sku: keyed.decode("sku")?,
            price: keyed.decode("price")?,
            in_stock: keyed.decode("in_stock")?,
            featured: keyed.decode("featured")?,
            rating: keyed.decode("rating")?,
        })
    }
}

impl Encode for Listing {
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value, EncodeError> {
        let mut keyed = encoder.keyed();
        keyed.encode("id", &self.id)?;
        keyed.encode("sku", &self.sku)?;
        keyed.encode("price", &self.price)?;
        keyed.encode("in_stock", &self.in_stock)?;
        keyed.encode("featured", &self.featured)?;
        keyed.encode("rating", &self.rating)?;
        Ok(keyed.finish())
    }
}

fn native_listing() -> Value {
    Value::from_fields(vec![
        ("id", 7i64.into()),
        ("sku", "A-1".into()),
        ("price", Value::Double(9.5)),
        ("in_stock", true.into()),
        ("featured", false.into()),
        ("rating", Value::Double(4.25)),
    ])
}

#[test]
fn test_native_values_round_trip() {
    let doc = native_listing();
    let listing: Listing = de::decode(&doc).unwrap();
    assert_eq!(listing.id.representation(), Representation::Native);
    assert_eq!(ser::encode(&listing).unwrap(), doc);
}

#[test]
fn test_cross_type_coercion() {
    let doc = Value::from_fields(vec![
        ("id", "42".into()),
        ("sku", 42i64.into()),
        ("price", "19.99".into()),
        ("in_stock", "yes".into()),
        ("featured", "false".into()),
        ("rating", 4i64.into()),
    ]);
    let listing: Listing = de::decode(&doc).unwrap();

    assert_eq!(*listing.id, 42);
    assert_eq!(listing.id.representation(), Representation::String);
    assert_eq!(listing.sku.as_str(), "42");
    assert_eq!(listing.sku.representation(), Representation::Integer);
    assert_eq!(*listing.price, 19.99);
    assert!(*listing.in_stock);
    assert_eq!(*listing.featured, Some(false));
    assert_eq!(*listing.rating, Some(4.0));
    assert_eq!(listing.rating.representation(), Representation::Integer);

    // a widened integer still encodes as an integer
    let encoded = ser::encode(&listing).unwrap();
    assert_eq!(encoded.get("rating"), Some(&Value::Integer(4)));
}

#[test]
fn test_coerced_values_encode_in_source_representation() {
    let doc = Value::from_fields(vec![
        ("id", "42".into()),
        ("sku", 42i64.into()),
        ("price", "19.99".into()),
        ("in_stock", Value::Bool(true)),
    ]);
    let listing: Listing = de::decode(&doc).unwrap();
    let encoded = ser::encode(&listing).unwrap();

    assert_eq!(encoded.get("id"), Some(&Value::from("42")));
    assert_eq!(encoded.get("sku"), Some(&Value::Integer(42)));
    assert_eq!(encoded.get("price"), Some(&Value::from("19.99")));
}

#[test]
fn test_truthy_strings() {
    for (raw, expected) in [("yes", true), ("false", false), ("1", true), ("no", false)] {
        let value: LosslessBoolValue = de::decode(&Value::from(raw)).unwrap();
        assert_eq!(*value, expected, "{}", raw);
    }
    let value: LosslessBoolValue = de::decode(&Value::Integer(0)).unwrap();
    assert!(!*value);
}

#[test]
fn test_optional_absent_and_null() {
    let doc = Value::from_fields(vec![
        ("id", 1i64.into()),
        ("sku", "x".into()),
        ("price", 1i64.into()),
        ("in_stock", false.into()),
        ("featured", Value::Null),
    ]);
    let listing: Listing = de::decode(&doc).unwrap();
    assert_eq!(*listing.featured, None);
    assert_eq!(listing.featured.outcome(), &DecodingOutcome::ValueWasNull);
    assert_eq!(*listing.rating, None);
    assert_eq!(listing.rating.outcome(), &DecodingOutcome::KeyAbsent);
}

#[test]
fn test_unconvertible_value_fails() {
    let doc = Value::from_fields(vec![
        ("id", "forty-two".into()),
        ("sku", "x".into()),
        ("price", 1i64.into()),
        ("in_stock", false.into()),
    ]);
    let err = de::decode::<Listing>(&doc).unwrap_err();
    assert_eq!(err.path.to_string(), "id");
}

#[cfg(feature = "json")]
#[test]
fn test_widened_numbers_round_trip_through_json() {
    use resilient_codable::serde::{decode_json, encode_json, from_json_str};
    use resilient_codable::DecoderOptions;

    let json = r#"{"featured":null,"id":7.0,"in_stock":true,"price":20,"rating":4,"sku":"A-1"}"#;
    let decoded = decode_json::<Listing>(json, &DecoderOptions::default()).unwrap();
    let listing = decoded.value;
    assert_eq!(*listing.id, 7);
    assert_eq!(listing.id.representation(), Representation::Double);
    assert_eq!(*listing.price, 20.0);
    assert_eq!(listing.price.representation(), Representation::Integer);

    let encoded = encode_json(&listing).unwrap();
    assert_eq!(from_json_str(&encoded).unwrap(), from_json_str(json).unwrap());
    assert!(encoded.contains(r#""price":20,"#));
    assert!(encoded.contains(r#""id":7.0,"#));
}

//! Decoder and encoder configuration.

use std::collections::BTreeMap;

use crate::case::to_snake_case;
use crate::value::Value;

/// How document keys are matched against struct field names.
///
/// Dictionary wrappers always see the literal keys; only keyed lookups of
/// struct fields go through the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum KeyDecodingStrategy {
    /// Keys must match field names exactly.
    #[default]
    UseDefaultKeys,
    /// Document keys are converted with [`to_snake_case`] before matching.
    ConvertFromCamelCase,
}

impl KeyDecodingStrategy {
    pub(crate) fn convert(&self, key: &str) -> Option<String> {
        match self {
            KeyDecodingStrategy::UseDefaultKeys => None,
            KeyDecodingStrategy::ConvertFromCamelCase => Some(to_snake_case(key)),
        }
    }
}

/// How struct field names are written as document keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum KeyEncodingStrategy {
    #[default]
    UseDefaultKeys,
    ConvertToSnakeCase,
}

impl KeyEncodingStrategy {
    pub(crate) fn apply(&self, key: &str) -> String {
        match self {
            KeyEncodingStrategy::UseDefaultKeys => key.to_string(),
            KeyEncodingStrategy::ConvertToSnakeCase => to_snake_case(key),
        }
    }
}

/// Options for a decode call.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct DecoderOptions {
    pub key_decoding_strategy: KeyDecodingStrategy,
    /// When true, [`decode_with_report`](crate::de::decode_with_report)
    /// installs a reporter and returns its digest.
    pub report_resilient_errors: bool,
    /// Caller-supplied values readable from any decoder in the tree.
    pub user_info: BTreeMap<String, Value>,
}

impl DecoderOptions {
    pub fn new() -> Self {
        DecoderOptions::default()
    }

    pub fn with_key_decoding_strategy(mut self, strategy: KeyDecodingStrategy) -> Self {
        self.key_decoding_strategy = strategy;
        self
    }

    pub fn with_resilient_error_reporting(mut self, enabled: bool) -> Self {
        self.report_resilient_errors = enabled;
        self
    }

    pub fn with_user_info(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.user_info.insert(key.into(), value.into());
        self
    }
}

/// Options for an encode call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EncoderOptions {
    pub key_encoding_strategy: KeyEncodingStrategy,
}

impl EncoderOptions {
    pub fn new() -> Self {
        EncoderOptions::default()
    }

    pub fn with_key_encoding_strategy(mut self, strategy: KeyEncodingStrategy) -> Self {
        self.key_encoding_strategy = strategy;
        self
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_config() {
        let options: DecoderOptions = serde_json::from_str(
            r#"{"key_decoding_strategy": "convert_from_camel_case", "report_resilient_errors": true}"#,
        )
        .unwrap();
        assert_eq!(
            options.key_decoding_strategy,
            KeyDecodingStrategy::ConvertFromCamelCase
        );
        assert!(options.report_resilient_errors);
        assert!(options.user_info.is_empty());
    }
}

//! Resilient decoding for JSON-like documents.
//!
//! Fields wrapped in the types of this crate decode as much of a document as
//! they can: a missing key, a null, or a malformed value falls back to a
//! declared default, is dropped from a collection, or is coerced from a
//! compatible representation. Every substitution is recorded as a
//! [`DecodingOutcome`] on the wrapper and, when an [`ErrorReporter`] is
//! installed, collected into a path-addressed [`ErrorDigest`].
//!
//! # Quick Start
//!
//! ```rust
//! use resilient_codable::collections::LossyArray;
//! use resilient_codable::de::{self, Decode, Decoder};
//! use resilient_codable::wrappers::{DefaultFalse, DefaultValue};
//! use resilient_codable::{DecodeError, Value};
//!
//! struct Settings {
//!     enabled: DefaultValue<DefaultFalse>,
//!     ports: LossyArray<u16>,
//! }
//!
//! impl Decode for Settings {
//!     fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodeError> {
//!         let keyed = decoder.keyed()?;
//!         Ok(Settings {
//!             enabled: keyed.decode("enabled")?,
//!             ports: keyed.decode("ports")?,
//!         })
//!     }
//! }
//!
//! let doc = Value::from_fields(vec![
//!     ("enabled", Value::Null),
//!     ("ports", Value::Array(vec![80i64.into(), "http".into(), 443i64.into()])),
//! ]);
//!
//! let decoded = de::decode_reporting::<Settings>(&doc).unwrap();
//! assert!(!*decoded.value.enabled);
//! assert_eq!(decoded.value.ports.elements(), &[80, 443]);
//!
//! let digest = decoded.digest.unwrap();
//! assert_eq!(digest.errors_at(&["ports", "1"]).len(), 1);
//! ```

pub mod case;
pub mod collections;
pub mod de;
pub mod error;
pub mod options;
pub mod outcome;
pub mod polymorphic;
pub mod report;
pub mod ser;
pub mod value;
pub mod wrappers;

#[cfg(feature = "serde")]
pub mod serde;

pub use case::to_snake_case;
pub use de::{Decode, DecodeContext, Decoded, Decoder};
pub use error::{DecodeError, DecodeErrorKind, EncodeError, Error, Path, PathSegment, Result};
pub use options::{DecoderOptions, EncoderOptions, KeyDecodingStrategy, KeyEncodingStrategy};
pub use outcome::DecodingOutcome;
pub use report::{DigestNode, ErrorDigest, ErrorReporter};
pub use ser::{Encode, Encoder};
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrappers::{DefaultEmptyString, DefaultValue};
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_displaced_reporter_is_logged() {
        let mut context = DecodeContext::new(DecoderOptions::default());
        assert!(context.install_reporter(ErrorReporter::new()).is_none());
        let displaced = context.install_reporter(ErrorReporter::new());
        assert!(displaced.is_some());
        assert!(logs_contain("replacing an installed error reporter"));

        let digest = displaced.and_then(|mut reporter| reporter.flush());
        assert!(digest.is_some_and(|d| d.may_be_missing_reported_errors()));
    }

    #[traced_test]
    #[test]
    fn test_fallback_is_logged() {
        let value: DefaultValue<DefaultEmptyString> = de::decode(&Value::Integer(5)).unwrap();
        assert_eq!(value.as_str(), "");
        assert!(logs_contain("substituting fallback value"));
    }
}

//! Resilient single-value wrappers.
//!
//! Each wrapper is used as an ordinary struct field. It decodes its own key,
//! substitutes a fallback where its policy allows, and keeps a
//! [`DecodingOutcome`] describing what happened.

mod coerce;
mod default;
mod lossless;
mod lossy;
mod raw_enum;

pub use coerce::{decode_bool_coercing, truthiness};
pub use default::{
    DefaultCase, DefaultCodableStrategy, DefaultEmptyMap, DefaultEmptyString, DefaultEmptyVec,
    DefaultFalse, DefaultTrue, DefaultValue, DefaultZero, FrozenDefaultCase,
};
pub use lossless::{
    LosslessBoolValue, LosslessBooleanStrategy, LosslessDecodingStrategy, LosslessDefaultStrategy,
    LosslessScalar, LosslessValue, LosslessValueWith, OptionalLosslessBoolValue,
    OptionalLosslessValue, OptionalLosslessValueWith, Probe, Representation,
};
pub(crate) use lossless::decode_lossless;
pub use lossy::LossyValue;
pub use raw_enum::{decode_raw_enum, encode_raw_enum, RawEnum};

use crate::de::Decoder;
use crate::error::DecodeError;
use crate::outcome::DecodingOutcome;

/// Report `error` at the decoder's path and build the matching outcome.
pub(crate) fn recover(decoder: &Decoder<'_>, error: DecodeError) -> DecodingOutcome {
    tracing::debug!(path = %decoder.path(), error = %error.kind, "substituting fallback value");
    decoder.report(&error);
    DecodingOutcome::Recovered {
        error,
        was_reported: true,
    }
}

/// Build a recovered outcome that is kept out of the digest.
pub(crate) fn suppress(error: DecodeError) -> DecodingOutcome {
    DecodingOutcome::Recovered {
        error,
        was_reported: false,
    }
}

/// `std::any::type_name` without the module path.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}

#[cfg(test)]
mod tests {
    use super::short_type_name;

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<String>(), "String");
        assert_eq!(short_type_name::<i64>(), "i64");
    }
}

use crate::error::DecodeError;

/// How a single resilient decode attempt concluded.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DecodingOutcome {
    /// The value decoded as declared.
    #[default]
    Success,
    /// The key was not present in the input. Not an error by itself.
    KeyAbsent,
    /// The key was present with an explicit null. Not an error by itself.
    ValueWasNull,
    /// Decoding failed and a fallback value was substituted.
    ///
    /// `was_reported` is false for errors deliberately kept out of the
    /// digest, such as an aggregate whose elements were already reported.
    Recovered {
        error: DecodeError,
        was_reported: bool,
    },
}

impl DecodingOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DecodingOutcome::Success)
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, DecodingOutcome::Recovered { .. })
    }

    /// The causal error, for `Recovered` outcomes.
    pub fn error(&self) -> Option<&DecodeError> {
        match self {
            DecodingOutcome::Recovered { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn was_reported(&self) -> bool {
        matches!(
            self,
            DecodingOutcome::Recovered {
                was_reported: true,
                ..
            }
        )
    }
}

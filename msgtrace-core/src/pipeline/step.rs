//! Pipeline phases and step registration options.

use crate::error::{MsgTraceError, Result, ValidationError};
#[cfg(feature = "validation")]
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "validation")]
use std::sync::OnceLock;

#[cfg(feature = "validation")]
static STEP_NAME_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Validates a middleware name. Must match the pattern: ^[\w\-\.:]+$
fn is_valid_step_name(value: &str) -> bool {
    #[cfg(feature = "validation")]
    {
        STEP_NAME_PATTERN
            .get_or_init(|| Regex::new(r"^[\w\-\.:]+$").expect("step name pattern is valid"))
            .is_match(value)
    }
    #[cfg(not(feature = "validation"))]
    {
        !value.is_empty()
            && value
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '.' || c == ':' || c == '_')
    }
}

/// Ordered phases of a request pipeline.
///
/// Middleware registered at an earlier step runs before (and wraps) every
/// middleware registered at a later one, so `Initialize` sees the logical
/// command before it is serialized or signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    Initialize,
    Serialize,
    Build,
    FinalizeRequest,
    Deserialize,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Initialize => "initialize",
            Step::Serialize => "serialize",
            Step::Build => "build",
            Step::FinalizeRequest => "finalizeRequest",
            Step::Deserialize => "deserialize",
        };
        write!(f, "{}", name)
    }
}

/// Ordering hint within a step. `High` runs first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Normal,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::High => "high",
            Priority::Normal => "normal",
            Priority::Low => "low",
        };
        write!(f, "{}", name)
    }
}

/// Registration options for a middleware step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOptions {
    /// Unique name of the step within its stack
    pub name: String,
    /// Pipeline phase the step belongs to
    pub step: Step,
    /// Ordering hint within the phase
    #[serde(default)]
    pub priority: Priority,
}

impl StepOptions {
    /// Create step options with validation
    ///
    /// # Examples
    /// ```
    /// use msgtrace_core::pipeline::{Priority, Step, StepOptions};
    ///
    /// let options = StepOptions::new("TracingSnsMiddleware", Step::Initialize)
    ///     .unwrap()
    ///     .with_priority(Priority::High);
    /// assert_eq!(options.name, "TracingSnsMiddleware");
    /// assert_eq!(options.priority, Priority::High);
    ///
    /// assert!(StepOptions::new("has spaces", Step::Build).is_err());
    /// ```
    pub fn new<N: Into<String>>(name: N, step: Step) -> Result<Self> {
        let name = name.into();
        if !is_valid_step_name(&name) {
            return Err(MsgTraceError::Validation(ValidationError::InvalidFormat {
                field: "name".to_string(),
                value: name,
                expected_format: "^[\\w\\-\\.:]+$".to_string(),
            }));
        }

        Ok(Self {
            name,
            step,
            priority: Priority::default(),
        })
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order() {
        assert!(Step::Initialize < Step::Serialize);
        assert!(Step::Serialize < Step::Build);
        assert!(Step::Build < Step::FinalizeRequest);
        assert!(Step::FinalizeRequest < Step::Deserialize);
    }

    #[test]
    fn test_priority_order_and_default() {
        assert!(Priority::High < Priority::Normal);
        assert!(Priority::Normal < Priority::Low);
        assert_eq!(Priority::default(), Priority::Normal);
    }

    #[test]
    fn test_invalid_names_rejected() {
        assert!(StepOptions::new("", Step::Initialize).is_err());
        assert!(StepOptions::new("two words", Step::Initialize).is_err());
        assert!(StepOptions::new("slash/name", Step::Initialize).is_err());
        assert!(StepOptions::new("ok.name-1:v2", Step::Initialize).is_ok());
    }

    #[cfg(feature = "validation")]
    #[test]
    fn test_name_pattern_compiled_once() {
        assert!(StepOptions::new("first", Step::Build).is_ok());
        let compiled = STEP_NAME_PATTERN.get().unwrap() as *const Regex;

        for name in ["second", "third.step", "bad name"] {
            let _ = StepOptions::new(name, Step::Build);
        }
        assert_eq!(STEP_NAME_PATTERN.get().unwrap() as *const Regex, compiled);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(Step::FinalizeRequest.to_string(), "finalizeRequest");
        assert_eq!(Priority::High.to_string(), "high");
        let json = serde_json::to_value(Step::FinalizeRequest).unwrap();
        assert_eq!(json, serde_json::json!("finalizeRequest"));
    }
}

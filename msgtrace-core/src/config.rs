//! Instrumentation configuration.
//!
//! ```toml
//! enabled = true
//! middleware_name = "TracingSnsMiddleware"
//! priority = "high"
//! opaque = true
//! ```

use crate::constants::SNS_MIDDLEWARE_NAME;
use crate::error::{ConfigError, MsgTraceError, Result};
use crate::pipeline::{Priority, Step, StepOptions};
use serde::{Deserialize, Serialize};

/// Settings applied by an instrumentation when it registers its middleware
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentationConfig {
    /// When false, clients are left untouched
    pub enabled: bool,
    /// Name of the registered middleware step
    pub middleware_name: String,
    /// Priority within the `initialize` step
    pub priority: Priority,
    /// Hide spans opened below recorded calls
    pub opaque: bool,
}

impl Default for InstrumentationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            middleware_name: SNS_MIDDLEWARE_NAME.to_string(),
            priority: Priority::High,
            opaque: true,
        }
    }
}

impl InstrumentationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_middleware_name<N: Into<String>>(mut self, name: N) -> Self {
        self.middleware_name = name.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_opaque(mut self, opaque: bool) -> Self {
        self.opaque = opaque;
        self
    }

    /// Step options the middleware is registered with
    pub fn step_options(&self) -> Result<StepOptions> {
        StepOptions::new(self.middleware_name.clone(), Step::Initialize)
            .map(|options| options.with_priority(self.priority))
            .map_err(|_| {
                MsgTraceError::Config(ConfigError::InvalidValue {
                    key: "middleware_name".to_string(),
                    value: self.middleware_name.clone(),
                    expected: "a name matching ^[\\w\\-\\.:]+$".to_string(),
                })
            })
    }

    pub fn validate(&self) -> Result<()> {
        self.step_options().map(|_| ())
    }

    /// Parse and validate a TOML document; absent keys keep their defaults
    #[cfg(feature = "config-support")]
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "config-support")]
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&source).map_err(|e| {
            MsgTraceError::Config(ConfigError::ParsingFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        })?;
        config.validate()?;
        Ok(config)
    }
}

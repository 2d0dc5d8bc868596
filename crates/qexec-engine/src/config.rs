//! Executor configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML, or JSON when the extension is `.json`)
//! 2. Environment variables (with `QEXEC_` prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use qexec_ir::ArityClass;
use serde::{Deserialize, Serialize};

/// Order in which the executor applies gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One gate at a time, in insertion order.
    #[default]
    Sequential,
    /// Overlapping gate application. Not implemented.
    Pipelined,
    /// Concurrent application of gates on disjoint qubits. Not implemented.
    Parallel,
    /// Optimize the circuit first, then run sequentially.
    Optimized,
}

impl ExecutionMode {
    /// Every mode, in declaration order.
    pub const ALL: [ExecutionMode; 4] = [
        ExecutionMode::Sequential,
        ExecutionMode::Pipelined,
        ExecutionMode::Parallel,
        ExecutionMode::Optimized,
    ];

    /// Lowercase name, as used in config files.
    pub fn name(self) -> &'static str {
        match self {
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Pipelined => "pipelined",
            ExecutionMode::Parallel => "parallel",
            ExecutionMode::Optimized => "optimized",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExecutionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::ParseError(format!("Unknown execution mode: {s}")))
    }
}

/// How aggressively a circuit is rewritten before execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationLevel {
    /// Verbatim gate-for-gate copy.
    #[default]
    None,
    /// Not implemented.
    Light,
    /// Not implemented.
    Medium,
    /// Not implemented.
    Aggressive,
}

impl OptimizationLevel {
    /// Every level, in declaration order.
    pub const ALL: [OptimizationLevel; 4] = [
        OptimizationLevel::None,
        OptimizationLevel::Light,
        OptimizationLevel::Medium,
        OptimizationLevel::Aggressive,
    ];

    /// Lowercase name, as used in config files.
    pub fn name(self) -> &'static str {
        match self {
            OptimizationLevel::None => "none",
            OptimizationLevel::Light => "light",
            OptimizationLevel::Medium => "medium",
            OptimizationLevel::Aggressive => "aggressive",
        }
    }

    /// Numeric level, 0 through 3.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for OptimizationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OptimizationLevel {
    type Err = ConfigError;

    /// Accepts a name (`"light"`) or a number (`"1"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s) || level.as_u8().to_string() == s)
            .ok_or_else(|| ConfigError::ParseError(format!("Unknown optimization level: {s}")))
    }
}

/// What to do when an unimplemented mode or level is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Substitute the implemented strategy and report a fallback.
    #[default]
    Degrade,
    /// Fail the run before any gate is applied.
    Reject,
}

impl FromStr for FallbackPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "degrade" => Ok(FallbackPolicy::Degrade),
            "reject" => Ok(FallbackPolicy::Reject),
            _ => Err(ConfigError::ParseError(format!("Unknown fallback policy: {s}"))),
        }
    }
}

/// Per-class gate fidelities used for the run's fidelity estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateFidelity {
    /// One-qubit gates.
    #[serde(default = "default_single_fidelity")]
    pub single: f64,
    /// Two-qubit gates.
    #[serde(default = "default_two_fidelity")]
    pub two: f64,
    /// Gates on three or more qubits.
    #[serde(default = "default_multi_fidelity")]
    pub multi: f64,
    /// Measurements.
    #[serde(default = "default_measurement_fidelity")]
    pub measurement: f64,
}

impl GateFidelity {
    /// Ideal gates: the estimate stays at 1.0.
    pub const IDEAL: GateFidelity = GateFidelity {
        single: 1.0,
        two: 1.0,
        multi: 1.0,
        measurement: 1.0,
    };

    /// Fidelity of one gate of the given class.
    pub fn for_class(&self, class: ArityClass) -> f64 {
        match class {
            ArityClass::Single => self.single,
            ArityClass::Two => self.two,
            ArityClass::Multi => self.multi,
            ArityClass::Measurement => self.measurement,
        }
    }
}

impl Default for GateFidelity {
    fn default() -> Self {
        Self {
            single: default_single_fidelity(),
            two: default_two_fidelity(),
            multi: default_multi_fidelity(),
            measurement: default_measurement_fidelity(),
        }
    }
}

/// Complete executor configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Gate ordering strategy.
    #[serde(default)]
    pub mode: ExecutionMode,

    /// Optimization applied in [`ExecutionMode::Optimized`].
    #[serde(default)]
    pub optimization: OptimizationLevel,

    /// Handling of unimplemented modes and levels.
    #[serde(default)]
    pub fallback: FallbackPolicy,

    /// Fidelity model.
    #[serde(default)]
    pub gate_fidelity: GateFidelity,
}

// Default value functions
fn default_single_fidelity() -> f64 {
    0.9999
}

fn default_two_fidelity() -> f64 {
    0.999
}

fn default_multi_fidelity() -> f64 {
    0.995
}

fn default_measurement_fidelity() -> f64 {
    0.999
}

impl ExecutorConfig {
    /// Load configuration from a YAML or JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config: ExecutorConfig = if is_json {
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?
        } else {
            serde_yaml_ng::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => ExecutorConfig::default(),
        };
        let config = config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `QEXEC_MODE`, `QEXEC_OPTIMIZATION` and `QEXEC_FALLBACK` overrides.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Only keys that are present override the current values. A present key
    /// with an unparseable value is an error.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("QEXEC_MODE") {
            self.mode = v.parse()?;
        }
        if let Some(v) = lookup("QEXEC_OPTIMIZATION") {
            self.optimization = v.parse()?;
        }
        if let Some(v) = lookup("QEXEC_FALLBACK") {
            self.fallback = v.parse()?;
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fidelities = [
            ("single", self.gate_fidelity.single),
            ("two", self.gate_fidelity.two),
            ("multi", self.gate_fidelity.multi),
            ("measurement", self.gate_fidelity.measurement),
        ];
        for (class, value) in fidelities {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::ValidationError(format!(
                    "gate_fidelity.{class} must be in (0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Render as YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml_ng::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ExecutorConfig::default();
        assert_eq!(config.mode, ExecutionMode::Sequential);
        assert_eq!(config.optimization, OptimizationLevel::None);
        assert_eq!(config.fallback, FallbackPolicy::Degrade);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Parallel".parse::<ExecutionMode>().unwrap(), ExecutionMode::Parallel);
        assert_eq!("2".parse::<OptimizationLevel>().unwrap(), OptimizationLevel::Medium);
        assert_eq!(
            "aggressive".parse::<OptimizationLevel>().unwrap(),
            OptimizationLevel::Aggressive
        );
        assert_eq!("REJECT".parse::<FallbackPolicy>().unwrap(), FallbackPolicy::Reject);
        assert!("turbo".parse::<ExecutionMode>().is_err());
        assert!("4".parse::<OptimizationLevel>().is_err());
    }

    #[test]
    fn test_yaml_file_with_partial_fields() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "mode: optimized\ngate_fidelity:\n  two: 0.98").unwrap();

        let config = ExecutorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.mode, ExecutionMode::Optimized);
        assert_eq!(config.optimization, OptimizationLevel::None);
        assert!((config.gate_fidelity.two - 0.98).abs() < f64::EPSILON);
        assert!((config.gate_fidelity.single - 0.9999).abs() < f64::EPSILON);
    }

    #[test]
    fn test_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"mode": "pipelined", "fallback": "reject"}}"#).unwrap();

        let config = ExecutorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.mode, ExecutionMode::Pipelined);
        assert_eq!(config.fallback, FallbackPolicy::Reject);
    }

    #[test]
    fn test_file_errors() {
        assert!(matches!(
            ExecutorConfig::from_file("/nonexistent/qexec.yaml"),
            Err(ConfigError::IoError(_))
        ));

        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "mode: warp").unwrap();
        assert!(matches!(
            ExecutorConfig::from_file(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_validate_fidelity_range() {
        let mut config = ExecutorConfig::default();
        config.gate_fidelity.multi = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
        config.gate_fidelity.multi = f64::NAN;
        assert!(config.validate().is_err());
        config.gate_fidelity.multi = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = ExecutorConfig::default()
            .apply_overrides(|key| match key {
                "QEXEC_MODE" => Some("parallel".to_string()),
                "QEXEC_OPTIMIZATION" => Some("light".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.mode, ExecutionMode::Parallel);
        assert_eq!(config.optimization, OptimizationLevel::Light);
        assert_eq!(config.fallback, FallbackPolicy::Degrade);

        let bad = ExecutorConfig::default()
            .apply_overrides(|key| (key == "QEXEC_FALLBACK").then(|| "maybe".to_string()));
        assert!(matches!(bad, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = ExecutorConfig {
            mode: ExecutionMode::Optimized,
            optimization: OptimizationLevel::Medium,
            ..Default::default()
        };
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("mode: optimized"));
        let parsed: ExecutorConfig = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}

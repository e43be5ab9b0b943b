//! Configuration loading from veribench.toml
//!
//! Run-level defaults can be specified in a `veribench.toml` file in the
//! project root. The file is discovered by walking up from the current
//! directory; every field is optional and falls back to the built-in
//! defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use veribench_core::{CaseConfig, ConfidenceLevel, TrimPolicy};

/// Harness configuration as read from `veribench.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HarnessConfig {
    /// Run-level measurement defaults.
    #[serde(default)]
    pub run: RunSection,
    /// Output configuration.
    #[serde(default)]
    pub output: OutputSection,
}

/// `[run]` section: defaults applied to every case without an override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSection {
    /// Target relative error bound, as a fraction (e.g. 0.01 for 1%).
    #[serde(default = "default_target_relative_error")]
    pub target_relative_error: f64,
    /// Minimum number of samples per case.
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    /// Minimum aggregate measured time per case (e.g. "500ms").
    #[serde(default = "default_min_total_duration")]
    pub min_total_duration: String,
    /// Wall-clock cutoff per case (e.g. "5s", "2m").
    #[serde(default = "default_max_run_duration")]
    pub max_run_duration: String,
    /// Confidence level: "p90", "p95", or "p99".
    #[serde(default)]
    pub confidence_level: ConfidenceLevel,
    /// Outlier trimming policy.
    #[serde(default)]
    pub trim: TrimPolicy,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            target_relative_error: default_target_relative_error(),
            min_samples: default_min_samples(),
            min_total_duration: default_min_total_duration(),
            max_run_duration: default_max_run_duration(),
            confidence_level: ConfidenceLevel::default(),
            trim: TrimPolicy::default(),
        }
    }
}

fn default_target_relative_error() -> f64 {
    0.01
}
fn default_min_samples() -> usize {
    5
}
fn default_min_total_duration() -> String {
    "500ms".to_string()
}
fn default_max_run_duration() -> String {
    "5s".to_string()
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    /// Default output format: "human" or "json".
    #[serde(default = "default_format")]
    pub format: String,
    /// Output directory for JSON reports.
    #[serde(default = "default_output_dir")]
    pub directory: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: default_format(),
            directory: default_output_dir(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}
fn default_output_dir() -> String {
    "target/veribench".to_string()
}

impl HarnessConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from the
    /// current directory.
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("veribench.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Resolve the `[run]` section into validated case defaults.
    pub fn case_defaults(&self) -> anyhow::Result<CaseConfig> {
        let config = CaseConfig {
            target_relative_error: self.run.target_relative_error,
            min_samples: self.run.min_samples,
            min_total_duration: Self::parse_duration(&self.run.min_total_duration)?,
            max_run_duration: Self::parse_duration(&self.run.max_run_duration)?,
            confidence_level: self.run.confidence_level,
            trim: self.run.trim,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a duration string (e.g. "3s", "500ms", "2m").
    pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;

        let multiplier: u64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1,
            "us" => 1_000,
            "ms" => 1_000_000,
            "s" | "" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok(Duration::from_nanos((value * multiplier as f64) as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_resolves_to_default_case_config() {
        let config = HarnessConfig::default();
        let defaults = config.case_defaults().unwrap();
        assert_eq!(defaults, CaseConfig::default());
    }

    #[test]
    fn parse_duration_units() {
        let parse = HarnessConfig::parse_duration;
        assert_eq!(parse("3s").unwrap(), Duration::from_secs(3));
        assert_eq!(parse("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse("100us").unwrap(), Duration::from_micros(100));
        assert_eq!(parse("1000ns").unwrap(), Duration::from_nanos(1000));
        assert_eq!(parse("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse("1.5s").unwrap(), Duration::from_millis(1500));
        assert!(parse("").is_err());
        assert!(parse("10fortnights").is_err());
    }

    #[test]
    fn parse_toml_with_partial_sections() {
        let toml_str = r#"
            [run]
            target_relative_error = 0.05
            min_samples = 10
            confidence_level = "p99"

            [run.trim]
            method = "std-dev"
            k = 3.0
        "#;

        let config: HarnessConfig = toml::from_str(toml_str).unwrap();
        let defaults = config.case_defaults().unwrap();
        assert_eq!(defaults.target_relative_error, 0.05);
        assert_eq!(defaults.min_samples, 10);
        assert_eq!(defaults.confidence_level, ConfidenceLevel::P99);
        assert_eq!(defaults.trim, TrimPolicy::StdDev { k: 3.0 });
        // Untouched fields keep their defaults.
        assert_eq!(defaults.min_total_duration, Duration::from_millis(500));
        assert_eq!(config.output.format, "human");
    }

    #[test]
    fn invalid_run_section_is_rejected() {
        let toml_str = r#"
            [run]
            min_samples = 1
        "#;
        let config: HarnessConfig = toml::from_str(toml_str).unwrap();
        assert!(config.case_defaults().is_err());
    }
}

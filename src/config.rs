use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub eligibility: EligibilityConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityConfig {
    #[serde(default = "default_overall_threshold")]
    pub overall_threshold: f64,
}

impl EligibilityConfig {
    pub fn threshold(&self) -> Decimal {
        Decimal::from_f64(self.overall_threshold).unwrap_or_else(|| {
            Decimal::from_f64(default_overall_threshold()).unwrap_or(Decimal::ZERO)
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_excluded_sections")]
    pub excluded_sections: Vec<String>,
}

impl ScoringConfig {
    pub fn is_excluded(&self, section_code: &str) -> bool {
        self.excluded_sections
            .iter()
            .any(|code| code.eq_ignore_ascii_case(section_code))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Days a submitted assessment waits before a new one may start.
    #[serde(default = "default_cooldown_days")]
    pub cooldown_days: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphConfig {
    #[serde(default = "default_risk_range")]
    pub risk: AxisRange,
    #[serde(default = "default_impact_range")]
    pub impact: AxisRange,
    #[serde(default = "default_return_range")]
    pub returns: AxisRange,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub db_path: Option<String>,
    pub overall_threshold: Option<f64>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/assessment-oracle/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(db_path) = overrides.db_path {
            self.storage.db_path = db_path;
        }
        if let Some(threshold) = overrides.overall_threshold {
            self.eligibility.overall_threshold = threshold;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    pub fn default_template() -> String {
        let template = r#"[storage]
db_path = "~/.local/share/assessment-oracle/results.db"

[eligibility]
overall_threshold = 70.0

[scoring]
excluded_sections = ["FEEDBACK"]

[submission]
cooldown_days = 180

[graph]
risk = { min = -20.0, max = 100.0 }
impact = { min = 0.0, max = 2000.0 }
returns = { min = 0.0, max = 100.0 }
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            overall_threshold: default_overall_threshold(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            excluded_sections: default_excluded_sections(),
        }
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            cooldown_days: default_cooldown_days(),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            risk: default_risk_range(),
            impact: default_impact_range(),
            returns: default_return_range(),
        }
    }
}

fn default_db_path() -> String {
    "~/.local/share/assessment-oracle/results.db".to_string()
}

fn default_overall_threshold() -> f64 {
    70.0
}

fn default_excluded_sections() -> Vec<String> {
    vec!["FEEDBACK".to_string()]
}

fn default_cooldown_days() -> i64 {
    180
}

fn default_risk_range() -> AxisRange {
    AxisRange {
        min: -20.0,
        max: 100.0,
    }
}

fn default_impact_range() -> AxisRange {
    AxisRange {
        min: 0.0,
        max: 2000.0,
    }
}

fn default_return_range() -> AxisRange {
    AxisRange {
        min: 0.0,
        max: 100.0,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rust_decimal::Decimal;

    use crate::config::{Config, ConfigOverrides};

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::load(Some(&dir.path().join("absent.toml"))).expect("load defaults");
        assert_eq!(config.eligibility.threshold(), Decimal::from(70));
        assert!(config.scoring.is_excluded("feedback"));
        assert_eq!(config.graph.impact.max, 2000.0);
    }

    #[test]
    fn template_round_trips_and_partial_files_fill_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("conf").join("config.toml");
        Config::write_template(&path).expect("write template");
        let config = Config::load(Some(&path)).expect("load template");
        assert_eq!(config.graph.risk.min, -20.0);
        assert_eq!(config.submission.cooldown_days, 180);
        assert_eq!(config.scoring.excluded_sections, vec!["FEEDBACK".to_string()]);

        fs::write(&path, "[eligibility]\noverall_threshold = 65.5\n").expect("write partial");
        let config = Config::load(Some(&path)).expect("load partial");
        assert_eq!(config.eligibility.threshold(), Decimal::new(655, 1));
        assert!(config.storage.db_path.ends_with("results.db"));
    }

    #[test]
    fn overrides_replace_loaded_values() {
        let mut config = Config::default();
        config.apply_overrides(ConfigOverrides {
            db_path: Some("/tmp/x.db".into()),
            overall_threshold: Some(50.0),
        });
        assert_eq!(config.resolved_db_path().to_string_lossy(), "/tmp/x.db");
        assert_eq!(config.eligibility.threshold(), Decimal::from(50));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[eligibility\n").expect("write broken");
        assert!(Config::load(Some(&path)).is_err());
    }
}

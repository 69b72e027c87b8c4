//! Config schema and deserialization

use crate::{AuditMode, Check, Priority};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::warn;

/// Per-check switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckSetting {
    On,
    /// Drop the check's issue and fix from every report
    Off,
}

/// Per-path override configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverride {
    /// Glob patterns this override applies to
    pub files: Vec<String>,

    /// Audit mode for matched files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<AuditMode>,

    /// Check switches for matched files
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub checks: BTreeMap<String, CheckSetting>,
}

/// Root config structure for .pageauditrc.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Default audit mode. Default: seo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<AuditMode>,

    /// Exit 1 when any fix at or above this priority is reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<Priority>,

    /// Check switches. Key is the check id in kebab-case.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub checks: BTreeMap<String, CheckSetting>,

    /// Glob patterns for files/directories to exclude from auditing
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,

    /// Per-path configuration overrides
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<ConfigOverride>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_mode: Option<AuditMode>, cli_fail_on: Option<Priority>) -> Self {
        if cli_mode.is_some() {
            self.mode = cli_mode;
        }
        if cli_fail_on.is_some() {
            self.fail_on = cli_fail_on;
        }
        self
    }

    /// Mode used when neither CLI nor overrides pick one
    pub fn default_mode(&self) -> AuditMode {
        self.mode.unwrap_or(AuditMode::Seo)
    }

    /// Get effective config for a specific file path, applying overrides in order
    pub fn effective_for_file(&self, file_path: &Path) -> EffectiveConfig {
        let mut effective = EffectiveConfig {
            mode: self.default_mode(),
            checks: self.checks.clone(),
        };

        for override_cfg in &self.overrides {
            if Self::matches_override(file_path, &override_cfg.files) {
                if let Some(mode) = override_cfg.mode {
                    effective.mode = mode;
                }
                for (check, setting) in &override_cfg.checks {
                    effective.checks.insert(check.clone(), *setting);
                }
            }
        }

        effective
    }

    /// Match against the full path, then the bare file name
    fn matches_override(file_path: &Path, patterns: &[String]) -> bool {
        patterns.iter().any(|pattern| match globset::Glob::new(pattern) {
            Ok(glob) => {
                let matcher = glob.compile_matcher();
                matcher.is_match(file_path)
                    || file_path
                        .file_name()
                        .is_some_and(|name| matcher.is_match(name))
            }
            Err(err) => {
                warn!(pattern, error = %err, "invalid override pattern");
                false
            }
        })
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        if self.mode.is_none() {
            self.mode = base.mode;
        }
        if self.fail_on.is_none() {
            self.fail_on = base.fail_on;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }

        for (check, setting) in base.checks {
            self.checks.entry(check).or_insert(setting);
        }

        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;

        // Base overrides apply first so this config's win
        let mut all_overrides = base.overrides;
        all_overrides.append(&mut self.overrides);
        self.overrides = all_overrides;
    }
}

/// Effective configuration for a specific file (after applying overrides)
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub mode: AuditMode,
    pub checks: BTreeMap<String, CheckSetting>,
}

impl EffectiveConfig {
    /// Checks switched off. Unknown ids are logged and skipped.
    pub fn disabled_checks(&self) -> HashSet<Check> {
        self.checks
            .iter()
            .filter(|(_, setting)| **setting == CheckSetting::Off)
            .filter_map(|(id, _)| match id.parse::<Check>() {
                Ok(check) => Some(check),
                Err(_) => {
                    warn!(check = %id, "unknown check id in config");
                    None
                }
            })
            .collect()
    }
}

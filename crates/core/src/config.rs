use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::finding::{Finding, Severity};
use crate::heuristics::{Heuristics, DEFAULT_ACCESS_MODIFIERS, DEFAULT_OWNER_KEYWORDS};

pub const CONFIG_FILE_NAME: &str = ".solflow.toml";

const IGNORE_MARKER: &str = "solflow-ignore";

/// Project-level configuration loaded from `.solflow.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub global: GlobalConfig,
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
    #[serde(default)]
    pub heuristics: HeuristicsConfig,
    #[serde(default)]
    pub suppressions: SuppressionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub severity_threshold: String,
    pub output_format: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            severity_threshold: "low".to_string(),
            output_format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub enabled: Option<bool>,
    pub severity: Option<String>,
}

/// Replaces the built-in keyword tables when set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HeuristicsConfig {
    pub owner_keywords: Option<Vec<String>>,
    pub access_modifiers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SuppressionConfig {
    pub files: Vec<String>,
}

impl Config {
    /// Read `path`, or the defaults when no such file exists.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Check if a rule is enabled according to config.
    pub fn is_rule_enabled(&self, name: &str) -> bool {
        self.rules.get(name).and_then(|r| r.enabled).unwrap_or(true)
    }

    /// Severity override for a rule, if one is configured and valid.
    pub fn severity_override(&self, name: &str) -> Option<Severity> {
        self.rules
            .get(name)
            .and_then(|r| r.severity.as_deref())
            .and_then(Severity::parse)
    }

    /// Minimum severity to report; unknown names fall back to `low`.
    pub fn severity_threshold(&self) -> Severity {
        Severity::parse(&self.global.severity_threshold).unwrap_or(Severity::Low)
    }

    /// True when `[suppressions] files` matches the path.
    pub fn is_file_excluded(&self, file_path: &Path) -> bool {
        let path_str = file_path.to_string_lossy();
        let path_str = path_str.strip_prefix("./").unwrap_or(&path_str);
        self.suppressions
            .files
            .iter()
            .any(|pattern| glob::Pattern::new(pattern).is_ok_and(|p| p.matches(path_str)))
    }

    /// Keyword tables for the summarizer, falling back to the built-in defaults.
    pub fn heuristics(&self) -> Heuristics {
        let owner_keywords = self.heuristics.owner_keywords.clone().unwrap_or_else(|| {
            DEFAULT_OWNER_KEYWORDS.iter().map(|s| s.to_string()).collect()
        });
        let access_modifiers = self.heuristics.access_modifiers.clone().unwrap_or_else(|| {
            DEFAULT_ACCESS_MODIFIERS.iter().map(|s| s.to_string()).collect()
        });
        Heuristics::new(owner_keywords, access_modifiers)
    }

    /// Body written by `solflow init`.
    pub fn default_toml() -> &'static str {
        r#"# solflow configuration

[global]
# Minimum severity to report: "critical", "high", "medium", "low", "informational"
severity_threshold = "low"
# Output format: "text", "json", "sarif"
output_format = "text"

# Per-rule overrides
# [rules.unrestricted-entry-point]
# enabled = false

# [rules.missing-bounds-check]
# severity = "informational"

[heuristics]
# State variables and require() guards naming one of these count as ownership checks
owner_keywords = ["owner", "admin", "governor", "controller"]
# Modifiers that count as access control
access_modifiers = ["onlyOwner", "onlyAdmin", "adminOnly"]

[suppressions]
# Glob patterns for files to skip entirely
files = ["test/**", "lib/**", "node_modules/**"]
"#
    }
}

/// Inline suppression: scans one source file for `// solflow-ignore` comments.
/// Returns a map of line → suppressed rule names.
/// A bare `// solflow-ignore` (no colon) suppresses all rules for that line.
pub fn parse_inline_suppressions(source: &str) -> HashMap<usize, Vec<String>> {
    let mut suppressions = HashMap::new();

    for (idx, line) in source.lines().enumerate() {
        if let Some(rest) = extract_suppression_comment(line.trim()) {
            // Suppression applies to the *next* line (idx is 0-based, lines are 1-based)
            let target_line = idx + 2;
            let rules = if rest.is_empty() {
                vec!["*".to_string()]
            } else {
                rest.split(',').map(|s| s.trim().to_string()).collect()
            };
            suppressions.insert(target_line, rules);
        }
    }

    suppressions
}

/// Returns Some("") for a bare ignore, Some("r1, r2") for specific rules,
/// None if the line is not a suppression comment.
fn extract_suppression_comment(line: &str) -> Option<&str> {
    let comment = line.strip_prefix("//")?.trim();
    let rest = comment.strip_prefix(IGNORE_MARKER)?.trim();
    if rest.is_empty() {
        Some("")
    } else {
        Some(rest.strip_prefix(':')?.trim())
    }
}

/// Filter findings based on config and inline suppressions of their file.
pub fn apply_suppressions(
    findings: Vec<Finding>,
    config: &Config,
    inline_suppressions: &HashMap<usize, Vec<String>>,
) -> Vec<Finding> {
    findings
        .into_iter()
        .filter(|f| {
            let rule = f.category.id();
            if !config.is_rule_enabled(rule) {
                return false;
            }
            if config.is_file_excluded(&f.location.file) {
                return false;
            }
            !inline_suppressions
                .get(&f.location.line)
                .is_some_and(|names| names.iter().any(|s| s == "*" || s == rule))
        })
        .collect()
}

/// Rewrite severities for rules that carry an override.
pub fn apply_severity_overrides(findings: Vec<Finding>, config: &Config) -> Vec<Finding> {
    findings
        .into_iter()
        .map(|mut f| {
            if let Some(severity) = config.severity_override(f.category.id()) {
                f.severity = severity;
            }
            f
        })
        .collect()
}

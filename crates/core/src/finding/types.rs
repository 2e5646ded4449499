use std::path::PathBuf;

use serde::Serialize;

/// Severity levels ordered from most to least severe.
/// IMPORTANT: Variant order matters: derived Ord puts Critical < High < ... < Informational,
/// which is used for filtering (retain findings where severity <= threshold).
/// Do NOT reorder these variants.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Informational,
}

impl Severity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Some(Severity::Critical),
            "high" => Some(Severity::High),
            "medium" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            "informational" | "info" => Some(Severity::Informational),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "Critical"),
            Severity::High => write!(f, "High"),
            Severity::Medium => write!(f, "Medium"),
            Severity::Low => write!(f, "Low"),
            Severity::Informational => write!(f, "Informational"),
        }
    }
}

/// One variant per rule in the fixed rule table.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    UnrestrictedEntryPoint,
    UnguardedValueFlow,
    DelegatecallRisk,
    UncheckedArithmetic,
    MissingZeroAddressCheck,
    MissingBoundsCheck,
    ReentrancyOrdering,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::UnrestrictedEntryPoint,
        Category::UnguardedValueFlow,
        Category::DelegatecallRisk,
        Category::UncheckedArithmetic,
        Category::MissingZeroAddressCheck,
        Category::MissingBoundsCheck,
        Category::ReentrancyOrdering,
    ];

    /// Stable identifier used in config files, suppressions and SARIF rule ids.
    pub fn id(&self) -> &'static str {
        match self {
            Category::UnrestrictedEntryPoint => "unrestricted-entry-point",
            Category::UnguardedValueFlow => "unguarded-value-flow",
            Category::DelegatecallRisk => "delegatecall-risk",
            Category::UncheckedArithmetic => "unchecked-arithmetic",
            Category::MissingZeroAddressCheck => "missing-zero-address-check",
            Category::MissingBoundsCheck => "missing-bounds-check",
            Category::ReentrancyOrdering => "reentrancy-ordering",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    pub fn is_input_validation(&self) -> bool {
        matches!(
            self,
            Category::MissingZeroAddressCheck | Category::MissingBoundsCheck
        )
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    pub snippet: String,
    /// Set when the AST node had no usable span and the position fell back to 1:1.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub approximate: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Finding {
    pub category: Category,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub contract_name: String,
    pub function_name: String,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub recommendation: Option<String>,
}

impl Finding {
    /// Identity used for deduplication within one function.
    pub fn dedup_key(&self) -> (usize, Category) {
        (self.location.line, self.category)
    }
}

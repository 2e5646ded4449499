use regex::Regex;

/// Names whose presence marks a state variable as owner-like and a `require`
/// argument list as an ownership guard.
pub const DEFAULT_OWNER_KEYWORDS: &[&str] = &["owner", "admin", "governor", "controller"];

/// Modifiers that count as structural access control.
pub const DEFAULT_ACCESS_MODIFIERS: &[&str] = &["onlyOwner", "onlyAdmin", "adminOnly"];

/// A guard expression that counts as validation evidence for a parameter.
/// `{p}` in the template is replaced by the escaped parameter name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationShape {
    pub name: &'static str,
    pub template: &'static str,
}

/// Ordered most specific first; the first matching shape is recorded.
pub const DEFAULT_VALIDATION_SHAPES: &[ValidationShape] = &[
    ValidationShape {
        name: "non-zero-address",
        template: r"\b{p}\s*!=\s*address\s*\(\s*0\s*\)|address\s*\(\s*0\s*\)\s*!=\s*{p}\b",
    },
    ValidationShape {
        name: "non-zero-address-hex",
        template: r"\b{p}\s*!=\s*(?:address\s*\(\s*)?0x0+\b|\b0x0+\s*\)?\s*!=\s*{p}\b",
    },
    ValidationShape {
        name: "positive",
        template: r"\b{p}\s*>\s*0\b|\b0\s*<\s*{p}\b",
    },
    ValidationShape {
        name: "length-bound",
        template: r"\b{p}\s*<=?\s*[\w.\[\]]+\.length\b",
    },
    ValidationShape {
        name: "comparison",
        template: r"\b{p}(?:\.\w+)*\s*(?:==|!=|<=|>=|<|>)[^<>=]|[^<>=!](?:==|!=|<=|>=|<|>)\s*{p}\b",
    },
];

/// Immutable keyword tables and guard shapes shared by the summarizer and flow engine.
#[derive(Debug, Clone)]
pub struct Heuristics {
    owner_keywords: Vec<String>,
    access_modifiers: Vec<String>,
    validation_shapes: Vec<ValidationShape>,
    owner_guard: Option<Regex>,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self::new(
            DEFAULT_OWNER_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_ACCESS_MODIFIERS.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl Heuristics {
    pub fn new(owner_keywords: Vec<String>, access_modifiers: Vec<String>) -> Self {
        let owner_keywords: Vec<String> = owner_keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        let owner_guard = build_owner_guard(&owner_keywords);
        Self {
            owner_keywords,
            access_modifiers,
            validation_shapes: DEFAULT_VALIDATION_SHAPES.to_vec(),
            owner_guard,
        }
    }

    pub fn owner_keywords(&self) -> &[String] {
        &self.owner_keywords
    }

    pub fn access_modifiers(&self) -> &[String] {
        &self.access_modifiers
    }

    pub fn validation_shapes(&self) -> &[ValidationShape] {
        &self.validation_shapes
    }

    pub fn is_owner_like(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.owner_keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    pub fn is_access_modifier(&self, name: &str) -> bool {
        self.access_modifiers.iter().any(|m| m == name)
    }

    /// `require(...<keyword>...)` anywhere in `body`, case-insensitive.
    /// The argument list is approximated as everything up to the first `)`.
    pub fn has_owner_guard(&self, body: &str) -> bool {
        self.owner_guard.as_ref().is_some_and(|re| re.is_match(body))
    }
}

fn build_owner_guard(keywords: &[String]) -> Option<Regex> {
    if keywords.is_empty() {
        return None;
    }
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\brequire\s*\([^)]*(?:{alternation})[^)]*\)")).ok()
}

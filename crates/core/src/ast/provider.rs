use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde_json::{json, Value};
use tracing::debug;

use super::nodes::SourceUnit;
use crate::error::AnalysisError;

/// A source file together with the AST the provider built for it.
#[derive(Debug, Clone)]
pub struct ParsedSource {
    pub path: PathBuf,
    pub source: String,
    pub ast: SourceUnit,
}

/// Front-end that turns Solidity source text into a compact-JSON AST.
/// Implementations must be usable from several worker threads at once.
pub trait SyntaxProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Produce the compact-JSON AST for `source`, read from `path`.
    fn provide_ast(&self, path: &Path, source: &str) -> Result<String, AnalysisError>;
}

impl<P: SyntaxProvider + ?Sized> SyntaxProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn provide_ast(&self, path: &Path, source: &str) -> Result<String, AnalysisError> {
        (**self).provide_ast(path, source)
    }
}

/// Read `path` and run it through `provider`.
pub fn load(provider: &dyn SyntaxProvider, path: &Path) -> Result<ParsedSource, AnalysisError> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| AnalysisError::source_unavailable(path, e))?;
    let ast_json = provider.provide_ast(path, &source)?;
    let ast = parse_ast_json(path, &ast_json)?;
    debug!(
        path = %path.display(),
        provider = provider.name(),
        nodes = ast.nodes.len(),
        "loaded AST"
    );
    Ok(ParsedSource {
        path: path.to_path_buf(),
        source,
        ast,
    })
}

/// Deserialize a compact-JSON AST string
pub fn parse_ast_json(path: &Path, ast_json: &str) -> Result<SourceUnit, AnalysisError> {
    serde_json::from_str(ast_json)
        .map_err(|e| AnalysisError::parse_failure(path, format!("invalid AST JSON: {e}")))
}

/// Invokes a `solc` binary in standard-JSON mode, requesting only the AST.
#[derive(Debug, Clone)]
pub struct SolcProvider {
    pub solc: PathBuf,
    pub base_path: Option<PathBuf>,
    pub include_paths: Vec<PathBuf>,
}

impl Default for SolcProvider {
    fn default() -> Self {
        Self {
            solc: PathBuf::from("solc"),
            base_path: None,
            include_paths: vec![PathBuf::from("node_modules")],
        }
    }
}

impl SolcProvider {
    pub fn new(solc: impl Into<PathBuf>) -> Self {
        Self {
            solc: solc.into(),
            ..Self::default()
        }
    }

    fn standard_json_input(key: &str, source: &str) -> Value {
        json!({
            "language": "Solidity",
            "sources": { key: { "content": source } },
            "settings": {
                "outputSelection": { "*": { "": ["ast"] } }
            }
        })
    }

    /// Arguments for one file, and the source unit name the file is submitted
    /// under. The name is relative to `--base-path`, so relative imports
    /// resolve against the importing file's directory.
    fn invocation(&self, path: &Path) -> (Vec<OsString>, String) {
        let base = self
            .base_path
            .clone()
            .or_else(|| path.parent().map(Path::to_path_buf))
            .filter(|p| !p.as_os_str().is_empty());

        let mut args: Vec<OsString> = vec!["--standard-json".into()];
        let unit_name = match &base {
            Some(base) => {
                args.push("--base-path".into());
                args.push(base.clone().into_os_string());
                path.strip_prefix(base).unwrap_or(path)
            }
            None => path,
        };
        for include in self.include_paths.iter().filter(|p| p.exists()) {
            args.push("--include-path".into());
            args.push(include.clone().into_os_string());
        }
        (args, unit_name.to_string_lossy().replace('\\', "/"))
    }
}

impl SyntaxProvider for SolcProvider {
    fn name(&self) -> &str {
        "solc"
    }

    fn provide_ast(&self, path: &Path, source: &str) -> Result<String, AnalysisError> {
        let (args, key) = self.invocation(path);
        let input = Self::standard_json_input(&key, source).to_string();

        let mut child = Command::new(&self.solc)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                AnalysisError::parse_failure(
                    path,
                    format!("failed to run {}: {e}", self.solc.display()),
                )
            })?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .map_err(|e| AnalysisError::parse_failure(path, format!("solc stdin: {e}")))?;
        }
        let output = child
            .wait_with_output()
            .map_err(|e| AnalysisError::parse_failure(path, format!("solc did not finish: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AnalysisError::parse_failure(path, stderr.trim()));
        }
        extract_ast(path, &key, &stdout)
    }
}

/// Pull the AST for `key` out of a standard-JSON compiler output, surfacing
/// fatal compiler errors as a parse failure.
fn extract_ast(path: &Path, key: &str, output: &str) -> Result<String, AnalysisError> {
    let output: Value = serde_json::from_str(output)
        .map_err(|e| AnalysisError::parse_failure(path, format!("unreadable solc output: {e}")))?;

    if let Some(errors) = output.get("errors").and_then(Value::as_array) {
        let fatal: Vec<&str> = errors
            .iter()
            .filter(|e| e.get("severity").and_then(Value::as_str) == Some("error"))
            .map(|e| {
                e.get("formattedMessage")
                    .or_else(|| e.get("message"))
                    .and_then(Value::as_str)
                    .unwrap_or("unknown compiler error")
            })
            .collect();
        if !fatal.is_empty() {
            return Err(AnalysisError::parse_failure(path, fatal.join("\n")));
        }
    }

    output
        .get("sources")
        .and_then(|s| s.get(key))
        .and_then(|s| s.get("ast"))
        .map(Value::to_string)
        .ok_or_else(|| AnalysisError::parse_failure(path, "AST not returned by solc"))
}

/// Reads ASTs that an earlier build step already produced: `Token.sol` is paired
/// with `Token.sol.ast.json` in the same directory.
#[derive(Debug, Clone, Default)]
pub struct JsonAstProvider;

impl JsonAstProvider {
    pub fn ast_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(".ast.json");
        PathBuf::from(name)
    }
}

impl SyntaxProvider for JsonAstProvider {
    fn name(&self) -> &str {
        "json"
    }

    fn provide_ast(&self, path: &Path, _source: &str) -> Result<String, AnalysisError> {
        let ast_path = Self::ast_path(path);
        std::fs::read_to_string(&ast_path).map_err(|e| {
            AnalysisError::parse_failure(path, format!("no AST at {}: {e}", ast_path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_ast_from_standard_json() {
        let output = r#"{
            "sources": {"src/A.sol": {"id": 0, "ast": {"nodeType": "SourceUnit", "nodes": []}}}
        }"#;
        let ast = extract_ast(Path::new("src/A.sol"), "src/A.sol", output).unwrap();
        let unit = parse_ast_json(Path::new("src/A.sol"), &ast).unwrap();
        assert!(unit.nodes.is_empty());
    }

    #[test]
    fn test_extract_ast_reports_fatal_errors_only() {
        let output = r#"{
            "errors": [
                {"severity": "warning", "formattedMessage": "Warning: unused variable"},
                {"severity": "error", "formattedMessage": "ParserError: Expected ';'"}
            ],
            "sources": {}
        }"#;
        let err = extract_ast(Path::new("A.sol"), "A.sol", output).unwrap_err();
        assert!(matches!(err, AnalysisError::ParseFailure { .. }));
        assert_eq!(err.message(), "ParserError: Expected ';'");
    }

    fn os(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_solc_unit_name_is_relative_to_base_path() {
        let solc = SolcProvider {
            include_paths: Vec::new(),
            ..SolcProvider::default()
        };
        let (args, key) = solc.invocation(Path::new("contracts/Vault.sol"));
        assert_eq!(args, os(&["--standard-json", "--base-path", "contracts"]));
        assert_eq!(key, "Vault.sol");

        let (args, key) = solc.invocation(Path::new("Vault.sol"));
        assert_eq!(args, os(&["--standard-json"]));
        assert_eq!(key, "Vault.sol");

        let rooted = SolcProvider {
            base_path: Some(PathBuf::from("project")),
            include_paths: Vec::new(),
            ..SolcProvider::default()
        };
        let (args, key) = rooted.invocation(Path::new("project/src/token/Token.sol"));
        assert_eq!(args, os(&["--standard-json", "--base-path", "project"]));
        assert_eq!(key, "src/token/Token.sol");
    }

    #[test]
    fn test_extract_ast_missing_source() {
        let output = r#"{"sources": {}}"#;
        let err = extract_ast(Path::new("A.sol"), "A.sol", output).unwrap_err();
        assert_eq!(err.message(), "AST not returned by solc");
    }

    #[test]
    fn test_load_missing_file_is_source_unavailable() {
        let err = load(&JsonAstProvider, Path::new("/nonexistent/solflow/Missing.sol")).unwrap_err();
        assert!(matches!(err, AnalysisError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_json_ast_path() {
        assert_eq!(
            JsonAstProvider::ast_path(Path::new("contracts/Token.sol")),
            PathBuf::from("contracts/Token.sol.ast.json")
        );
    }

    #[test]
    fn test_invalid_ast_json_is_parse_failure() {
        let err = parse_ast_json(Path::new("A.sol"), "{not json").unwrap_err();
        assert!(matches!(err, AnalysisError::ParseFailure { .. }));
    }
}

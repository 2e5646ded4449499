pub mod nodes;
pub mod provider;
pub mod sitter;
pub mod span;

pub use nodes::*;
pub use provider::{load, parse_ast_json, JsonAstProvider, ParsedSource, SolcProvider, SyntaxProvider};
pub use sitter::TreeSitterProvider;
pub use span::{line_col, line_text, SourceSpan};

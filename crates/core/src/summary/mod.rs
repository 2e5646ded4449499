pub mod extractor;
pub mod function;
pub mod types;

pub use extractor::ContractExtractor;
pub use function::{sensitive_operations, summarize_function};
pub use types::*;

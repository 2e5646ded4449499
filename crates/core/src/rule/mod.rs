pub mod context;
pub mod registry;
pub mod traits;

pub use context::RuleContext;
pub use registry::{dedup_findings, RuleRegistry};
pub use traits::Rule;

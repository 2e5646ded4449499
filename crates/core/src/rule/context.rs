use std::path::Path;

use crate::ast::{line_col, line_text, SourceSpan};
use crate::finding::Location;
use crate::summary::{ContractSummary, FunctionSummary};

/// Gives rules the function under evaluation, its contract, and the source text
/// needed to turn offsets into locations.
pub struct RuleContext<'a> {
    pub file: &'a Path,
    pub source: &'a str,
    pub contract: &'a ContractSummary,
    pub function: &'a FunctionSummary,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        file: &'a Path,
        source: &'a str,
        contract: &'a ContractSummary,
        function: &'a FunctionSummary,
    ) -> Self {
        Self {
            file,
            source,
            contract,
            function,
        }
    }

    /// Location of an absolute byte offset. `None` degrades to 1:1 and is
    /// flagged as approximate.
    pub fn location_at(&self, offset: Option<usize>) -> Location {
        let (line, column, approximate) = match offset {
            Some(offset) => {
                let (line, column) = line_col(self.source, offset);
                (line, column, false)
            }
            None => (1, 1, true),
        };
        Location {
            file: self.file.to_path_buf(),
            line,
            column,
            snippet: line_text(self.source, line).to_string(),
            approximate,
        }
    }

    pub fn span_location(&self, span: Option<SourceSpan>) -> Location {
        self.location_at(span.map(|s| s.start))
    }

    /// Declaration of the function under evaluation
    pub fn function_location(&self) -> Location {
        self.span_location(self.function.span)
    }

    /// Location of an offset relative to the analyzed body slice
    pub fn body_location(&self, relative: usize) -> Location {
        self.location_at(self.function.absolute_offset(relative))
    }
}

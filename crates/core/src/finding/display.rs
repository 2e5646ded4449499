use std::fmt;

use super::types::{Finding, Location};

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)?;
        if self.approximate {
            write!(f, " (approximate)")?;
        }
        Ok(())
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}) in {}.{} at {}",
            self.severity,
            self.title,
            self.category,
            self.contract_name,
            self.function_name,
            self.location
        )
    }
}

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{AnalysisError, ErrorKind};
use crate::finding::{Finding, Severity};
use crate::summary::ContractSummary;

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub informational: usize,
}

impl SeverityCounts {
    fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
            Severity::Informational => self.informational += 1,
        }
    }
}

/// Summaries and findings for one successfully analyzed file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub contracts: Vec<ContractSummary>,
}

impl FileReport {
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.contracts.iter().flat_map(|c| c.findings.iter())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileError {
    pub path: PathBuf,
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&AnalysisError> for FileError {
    fn from(err: &AnalysisError) -> Self {
        Self {
            path: err.path().clone(),
            kind: err.kind(),
            message: err.message().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub files: Vec<FileReport>,
    pub errors: Vec<FileError>,
    pub total_findings: usize,
    pub findings_by_severity: SeverityCounts,
}

impl AnalysisReport {
    pub fn new(files: Vec<FileReport>, errors: Vec<FileError>) -> Self {
        let mut counts = SeverityCounts::default();
        let mut total = 0;
        for finding in files.iter().flat_map(FileReport::findings) {
            counts.add(finding.severity);
            total += 1;
        }
        Self {
            files,
            errors,
            total_findings: total,
            findings_by_severity: counts,
        }
    }

    /// All findings in file, contract, function order
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.files.iter().flat_map(FileReport::findings)
    }

    /// True when there was input and none of it could be analyzed
    pub fn all_failed(&self) -> bool {
        self.files.is_empty() && !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::{Category, Location};

    fn contract(severities: &[Severity]) -> ContractSummary {
        ContractSummary {
            name: "Vault".to_string(),
            kind: "contract".to_string(),
            state_variables: Vec::new(),
            functions: Vec::new(),
            findings: severities
                .iter()
                .enumerate()
                .map(|(i, &severity)| Finding {
                    category: Category::UnrestrictedEntryPoint,
                    severity,
                    title: String::new(),
                    message: String::new(),
                    contract_name: "Vault".to_string(),
                    function_name: "f".to_string(),
                    location: Location {
                        file: PathBuf::from("Vault.sol"),
                        line: i + 1,
                        column: 1,
                        snippet: String::new(),
                        approximate: false,
                    },
                    detail: None,
                    recommendation: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_counts_by_severity() {
        let report = AnalysisReport::new(
            vec![FileReport {
                path: PathBuf::from("Vault.sol"),
                contracts: vec![
                    contract(&[Severity::Critical, Severity::High]),
                    contract(&[Severity::High, Severity::Low]),
                ],
            }],
            Vec::new(),
        );
        assert_eq!(report.total_findings, 4);
        assert_eq!(
            report.findings_by_severity,
            SeverityCounts {
                critical: 1,
                high: 2,
                medium: 0,
                low: 1,
                informational: 0,
            }
        );
        assert_eq!(report.findings().count(), 4);
    }

    #[test]
    fn test_all_failed() {
        let err = AnalysisError::source_unavailable("Missing.sol", "No such file");
        let report = AnalysisReport::new(Vec::new(), vec![FileError::from(&err)]);
        assert!(report.all_failed());
        assert_eq!(report.errors[0].kind, ErrorKind::SourceUnavailable);
        assert!(!AnalysisReport::new(Vec::new(), Vec::new()).all_failed());
    }
}

use anyhow::Result;
use serde_json::{json, Value};
use solflow::finding::Severity;
use solflow::report::AnalysisReport;

/// Print SARIF 2.1.0 output for GitHub Code Scanning integration
pub fn print(report: &AnalysisReport) -> Result<()> {
    let json = serde_json::to_string_pretty(&build(report))?;
    println!("{json}");
    Ok(())
}

pub fn build(report: &AnalysisReport) -> Value {
    // Stable rule descriptions come from rule metadata, not per-finding titles
    let rules: Vec<Value> = solflow_rules::all_rules()
        .iter()
        .map(|r| {
            json!({
                "id": r.name(),
                "shortDescription": { "text": r.description() },
                "defaultConfiguration": { "level": severity_to_sarif_level(&r.severity()) }
            })
        })
        .collect();

    let results: Vec<Value> = report
        .findings()
        .map(|f| {
            let mut result = json!({
                "ruleId": f.category.id(),
                "level": severity_to_sarif_level(&f.severity),
                "message": { "text": f.message },
                "locations": [{
                    "physicalLocation": {
                        "artifactLocation": { "uri": f.location.file.display().to_string() },
                        "region": {
                            "startLine": f.location.line,
                            "startColumn": f.location.column,
                            "snippet": { "text": f.location.snippet }
                        }
                    },
                    "logicalLocations": [{
                        "fullyQualifiedName": format!("{}.{}", f.contract_name, f.function_name),
                        "kind": "function"
                    }]
                }],
                "properties": { "severity": f.severity.to_string() }
            });
            if let Some(rec) = &f.recommendation {
                result["properties"]["recommendation"] = json!(rec);
            }
            result
        })
        .collect();

    let notifications: Vec<Value> = report
        .errors
        .iter()
        .map(|e| {
            json!({
                "level": "error",
                "message": { "text": e.message },
                "locations": [{
                    "physicalLocation": {
                        "artifactLocation": { "uri": e.path.display().to_string() }
                    }
                }],
                "properties": { "kind": e.kind }
            })
        })
        .collect();

    json!({
        "$schema": "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/main/sarif-2.1/schema/sarif-schema-2.1.0.json",
        "version": "2.1.0",
        "runs": [{
            "tool": {
                "driver": {
                    "name": "solflow",
                    "version": env!("CARGO_PKG_VERSION"),
                    "rules": rules
                }
            },
            "invocations": [{
                "executionSuccessful": !report.all_failed(),
                "toolExecutionNotifications": notifications
            }],
            "results": results
        }]
    })
}

fn severity_to_sarif_level(severity: &Severity) -> &'static str {
    match severity {
        Severity::Critical | Severity::High => "error",
        Severity::Medium => "warning",
        Severity::Low | Severity::Informational => "note",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solflow::error::AnalysisError;
    use solflow::report::FileError;

    #[test]
    fn test_sarif_lists_every_rule_and_errors() {
        let err = AnalysisError::parse_failure("Broken.sol", "ParserError");
        let report = AnalysisReport::new(Vec::new(), vec![FileError::from(&err)]);
        let sarif = build(&report);
        let run = &sarif["runs"][0];
        assert_eq!(
            run["tool"]["driver"]["rules"].as_array().unwrap().len(),
            solflow_rules::all_rules().len()
        );
        assert_eq!(run["invocations"][0]["executionSuccessful"], json!(false));
        assert_eq!(
            run["invocations"][0]["toolExecutionNotifications"][0]["properties"]["kind"],
            json!("parse-failure")
        );
        assert!(run["results"].as_array().unwrap().is_empty());
    }
}

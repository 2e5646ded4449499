use std::fmt::Write;

use anyhow::Result;
use colored::Colorize;
use solflow::finding::{Finding, Severity};
use solflow::report::AnalysisReport;
use solflow::summary::ContractSummary;

pub fn print(report: &AnalysisReport, quiet: bool, no_color: bool) -> Result<()> {
    if no_color {
        colored::control::set_override(false);
    }
    print!("{}", render(report, quiet)?);
    Ok(())
}

/// The whole text report: errors, then findings grouped by file and contract,
/// then severity counts. `quiet` keeps only contracts that have findings.
pub fn render(report: &AnalysisReport, quiet: bool) -> Result<String> {
    let mut out = String::new();

    if !quiet {
        writeln!(out)?;
        writeln!(out, "{}", "  solflow - Solidity Static Analysis".bold())?;
        writeln!(
            out,
            "  Files analyzed: {}",
            report.files.len() + report.errors.len()
        )?;
        writeln!(out)?;
    }

    for error in &report.errors {
        writeln!(
            out,
            "  [{}] {}: {}",
            "ERROR".red(),
            error.path.display(),
            error.message
        )?;
    }
    if !report.errors.is_empty() {
        writeln!(out)?;
    }

    for file in &report.files {
        let contracts: Vec<&ContractSummary> = file
            .contracts
            .iter()
            .filter(|c| !quiet || !c.findings.is_empty())
            .collect();
        if quiet && contracts.is_empty() {
            continue;
        }

        writeln!(out, "  {} {}", "File:".bold(), file.path.display())?;
        if file.contracts.is_empty() {
            writeln!(out, "    No contracts defined in this file.")?;
        }
        for contract in contracts {
            write_contract(&mut out, contract, quiet)?;
        }
        writeln!(out)?;
    }

    if report.total_findings == 0 {
        if !quiet {
            writeln!(out, "  {} No issues found.", "✓".green().bold())?;
            writeln!(out)?;
        }
        return Ok(out);
    }

    if !quiet {
        let counts = &report.findings_by_severity;
        writeln!(out, "{}", "  Summary".bold().underline())?;
        writeln!(out, "    Critical:      {}", counts.critical)?;
        writeln!(out, "    High:          {}", counts.high)?;
        writeln!(out, "    Medium:        {}", counts.medium)?;
        writeln!(out, "    Low:           {}", counts.low)?;
        writeln!(out, "    Informational: {}", counts.informational)?;
        writeln!(out, "    Total:         {}", report.total_findings)?;
        writeln!(out)?;
    }

    Ok(out)
}

fn write_contract(out: &mut String, contract: &ContractSummary, quiet: bool) -> Result<()> {
    writeln!(
        out,
        "    {} {} ({})",
        "Contract".bold(),
        contract.name.bold(),
        contract.kind
    )?;

    if !quiet && !contract.state_variables.is_empty() {
        writeln!(out, "      State variables:")?;
        for var in &contract.state_variables {
            let marker = if var.is_owner_like { " (owner-like)" } else { "" };
            writeln!(out, "        {}: {}{}", var.name, var.type_name, marker)?;
        }
    }

    if contract.findings.is_empty() {
        if !quiet {
            writeln!(out, "      {} No findings.", "✓".green())?;
        }
        return Ok(());
    }

    writeln!(out)?;
    for finding in &contract.findings {
        write_finding(out, finding)?;
    }
    Ok(())
}

fn write_finding(out: &mut String, finding: &Finding) -> Result<()> {
    let severity_label = match finding.severity {
        Severity::Critical => "CRITICAL".bright_red().bold().reversed(),
        Severity::High => "HIGH".red().bold(),
        Severity::Medium => "MEDIUM".yellow().bold(),
        Severity::Low => "LOW".blue(),
        Severity::Informational => "INFO".dimmed(),
    };

    writeln!(
        out,
        "      [{}] {} ({}) in {}",
        severity_label, finding.title, finding.category, finding.function_name
    )?;
    writeln!(out, "        {}", finding.message)?;
    writeln!(out, "        {} {}", "-->".dimmed(), finding.location)?;
    if !finding.location.snippet.is_empty() {
        writeln!(out, "        {} {}", "|".dimmed(), finding.location.snippet)?;
    }
    if let Some(rec) = &finding.recommendation {
        writeln!(out, "        {} {}", "Fix:".green(), rec)?;
    }
    writeln!(out)?;
    Ok(())
}

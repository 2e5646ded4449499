use anyhow::Result;

pub fn run() -> Result<()> {
    let rules = solflow_rules::all_rules();

    println!("{:<30} {:<14} Description", "Name", "Severity");
    println!("{}", "-".repeat(90));

    for r in &rules {
        println!(
            "{:<30} {:<14} {}",
            r.name(),
            r.severity().to_string(),
            r.description()
        );
    }

    println!("\nTotal: {} rules", rules.len());
    Ok(())
}

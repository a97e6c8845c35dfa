// Colored terminal output for verdicts, batch reports, and registry
// lookups. The main.rs command handlers delegate here; everything JSON
// goes through serde instead.

use colored::Colorize;

use crate::model::{AnalysisResult, Severity};
use crate::registry::traits::RegistryRecord;
use crate::scoring::verdict::AggregateResult;

/// Display one analyzed URL in detail.
pub fn display_verdict(verdict: &AggregateResult) {
    let analysis = &verdict.analysis;

    println!(
        "\n{}",
        format!("=== Analysis for {} ===", analysis.url).bold()
    );
    println!();
    println!(
        "  Risk score: {:>6.2}/100  {}",
        analysis.total_score,
        colorize_severity(analysis.severity)
    );
    println!("  Action: {}", analysis.recommendation.action);
    println!("  {}", analysis.recommendation.message);

    if !analysis.warnings.is_empty() {
        println!("\n  Warnings:");
        for warning in &analysis.warnings {
            println!(
                "    {} {}: {}",
                warning.icon,
                warning.title.bold(),
                warning.description
            );
        }
    }

    let degraded: Vec<&str> = analysis
        .results
        .iter()
        .filter(|r| r.is_degraded())
        .map(|r| r.plugin_id.as_str())
        .collect();
    if !degraded.is_empty() {
        println!(
            "\n  {} incomplete: no data from {}",
            "~".yellow(),
            degraded.join(", ")
        );
    }
    println!();
}

/// Display a batch of verdicts as a ranked table, riskiest first.
pub fn display_batch(verdicts: &[AggregateResult]) {
    if verdicts.is_empty() {
        println!("No URLs analyzed.");
        return;
    }

    let mut ranked: Vec<&AggregateResult> = verdicts.iter().collect();
    ranked.sort_by(|a, b| b.analysis.total_score.total_cmp(&a.analysis.total_score));

    println!(
        "\n{}",
        format!("=== Batch Report ({} URLs) ===", ranked.len()).bold()
    );
    println!();

    // Header
    println!(
        "  {:>6}  {:<8}  {:<11}  {}",
        "Score".dimmed(),
        "Severity".dimmed(),
        "Action".dimmed(),
        "URL".dimmed(),
    );
    println!("  {}", "-".repeat(78).dimmed());

    for verdict in &ranked {
        let analysis = &verdict.analysis;
        println!(
            "  {:>6.2}  {:<8}  {:<11}  {}",
            analysis.total_score,
            colorize_severity(analysis.severity),
            analysis.recommendation.action.as_str(),
            super::truncate_chars(&analysis.url, 60),
        );
    }
    println!();

    // Summary
    let count_of = |severity: Severity| {
        ranked
            .iter()
            .filter(|v| v.analysis.severity == severity)
            .count()
    };
    let critical = count_of(Severity::Critical);
    let high = count_of(Severity::High);
    let medium = count_of(Severity::Medium);

    if critical > 0 {
        println!("  {} {} critical", "!!".red().bold(), critical);
    }
    if high > 0 {
        println!("  {} {} high risk", "!".bright_red(), high);
    }
    if medium > 0 {
        println!("  {} {} suspicious", "~".yellow(), medium);
    }
}

/// Display a raw registration record from the `lookup` command.
pub fn display_registry_record(domain: &str, record: &RegistryRecord) {
    println!("\n{}", format!("=== Registration for {domain} ===").bold());

    if record == &RegistryRecord::default() {
        println!("  No registration data returned.");
        println!();
        return;
    }

    if let Some(created) = record.creation_date {
        println!("  Created: {}", created.format("%Y-%m-%d"));
    }
    if let Some(expires) = record.expiration_date {
        println!("  Expires: {}", expires.format("%Y-%m-%d"));
    }
    if let Some(registrar) = &record.registrar {
        println!("  Registrar: {registrar}");
    }
    if let Some(registrant) = &record.registrant {
        println!("  Registrant: {registrant}");
    }
    if let Some(org) = &record.organization {
        println!("  Organization: {org}");
    }
    if !record.name_servers.is_empty() {
        println!("  Name servers:");
        for ns in &record.name_servers {
            println!("    {ns}");
        }
    }
    println!();
}

/// Display how the registration analyzer reads a record, printed below the
/// raw fields by the `lookup` command.
pub fn display_registry_analysis(result: &AnalysisResult) {
    println!(
        "  Derived risk: {:>6.2}/100  {}",
        result.score,
        colorize_severity(result.severity)
    );
    for reason in &result.reasons {
        println!("    - {reason}");
    }
    println!();
}

/// Colorize a severity tier for table and detail display.
fn colorize_severity(severity: Severity) -> colored::ColoredString {
    let label = severity.as_str();
    match severity {
        Severity::Critical => label.red().bold(),
        Severity::High => label.bright_red(),
        Severity::Medium => label.yellow(),
        Severity::Low => label.blue(),
        Severity::Info => label.green(),
    }
}

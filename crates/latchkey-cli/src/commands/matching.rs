use super::{csv_field, print_json};
use crate::OutputFormat;
use anyhow::Result;
use latchkey_core::{DomainMatch, DomainMatcher};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub a: String,
    pub b: String,
    pub matches: bool,
    #[serde(rename = "match")]
    pub domain_match: DomainMatch,
    pub confidence: f64,
}

pub fn compare(a: &str, b: &str) -> MatchReport {
    let domain_match = DomainMatcher::compare(a, b);
    MatchReport {
        a: a.to_string(),
        b: b.to_string(),
        matches: domain_match.is_match(),
        domain_match,
        confidence: domain_match.confidence(),
    }
}

pub fn execute(a: &str, b: &str, format: OutputFormat) -> Result<()> {
    let report = compare(a, b);
    tracing::debug!("Compared {} and {}: {:?}", a, b, report.domain_match.tier);

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            println!("A,B,Match,Tier,Confidence");
            println!(
                "{},{},{},{},{:.2}",
                csv_field(&report.a),
                csv_field(&report.b),
                report.matches,
                report.domain_match.tier.as_str(),
                report.confidence
            );
        }
        OutputFormat::Pretty => {
            use console::style;

            let verdict = if report.matches {
                style("MATCH").green().bold()
            } else {
                style("NO MATCH").red().bold()
            };
            println!("\n{}", verdict);
            println!("  {}", report.a);
            println!("  {}", report.b);
            println!(
                "  {} ({:.0}% confidence)\n",
                style(report.domain_match.tier.as_str()).cyan(),
                report.confidence * 100.0
            );
        }
    }

    Ok(())
}

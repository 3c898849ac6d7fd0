use application::knowledge_service::IndexReport;
use colored::Colorize;
use domain::engagement::EngagementType;
use domain::models::{RetrievedFramework, StrategyBrief};
use domain::scenario::SAMPLE_SCENARIOS;
use shared::utils::{terminal_width, truncate_chars};

fn rule() -> String {
    "─".repeat(terminal_width())
}

pub fn print_brief(brief: &StrategyBrief, cached: bool) {
    println!("{}", rule().blue());
    let title = if brief.industry.is_empty() {
        format!("Strategy Brief: {}", brief.engagement_type)
    } else {
        format!("Strategy Brief: {} / {}", brief.engagement_type, brief.industry)
    };
    println!("{}", title.bold());
    if cached {
        println!("{}", "(from cache; pass --no-cache to regenerate)".dimmed());
    }
    println!("{}\n", rule().blue());
    println!("{}\n", brief.content);
    println!("{}", rule().blue());
    if !brief.sources.is_empty() {
        println!("{}", "Frameworks consulted:".green());
        for source in &brief.sources {
            println!("  - {source}");
        }
    }
    println!("{}", format!("Generated by {}", brief.model).dimmed());
}

pub fn print_frameworks(query: &str, frameworks: &[RetrievedFramework]) {
    println!("{} {}", "Query:".green().bold(), query);
    if frameworks.is_empty() {
        println!("{}", "No framework chunks matched.".yellow());
        return;
    }
    for (rank, framework) in frameworks.iter().enumerate() {
        println!(
            "\n{} {} {}",
            format!("[{}]", rank + 1).blue(),
            framework.source.bold(),
            format!("(score {:.3})", framework.score).dimmed()
        );
        println!("{}", truncate_chars(&framework.text, 500));
    }
}

pub fn print_index_report(report: &IndexReport) {
    if report.model_reset {
        println!(
            "{}",
            "Embedding model changed: previous vectors were discarded.".yellow()
        );
    }
    if report.is_up_to_date() {
        println!(
            "{} {} chunks from {} documents",
            "Knowledge base up to date:".green(),
            report.total_chunks,
            report.files_scanned
        );
        return;
    }
    println!(
        "{} scanned {} documents, re-embedded {} ({} chunks), removed {}, skipped {}",
        "Knowledge base built:".green(),
        report.files_scanned,
        report.files_changed,
        report.chunks_embedded,
        report.files_removed,
        report.files_skipped
    );
    println!("Total chunks in store: {}", report.total_chunks);
}

pub fn print_scenarios() {
    for scenario in &SAMPLE_SCENARIOS {
        println!("{}", scenario.name.bold());
        println!("  {} {}", "Engagement:".green(), scenario.engagement_type);
        println!("  {} {}", "Industry:".green(), scenario.industry);
        println!("  {} {}", "Challenge:".green(), scenario.challenge);
        println!("  {} {}\n", "Constraints:".green(), scenario.constraints);
    }
}

pub fn print_engagements() {
    for engagement in EngagementType::ALL {
        println!(
            "{:<11} {}  {}",
            engagement.slug().bold(),
            engagement.label(),
            format!("[{}]", engagement.focus_frameworks().join(", ")).dimmed()
        );
    }
}

//! Terminal form: pick a sample scenario or start blank, fill in the
//! challenge, read the brief, optionally save or copy it, repeat.

use anyhow::bail;
use crate::brief_export::{copy_to_clipboard, default_filename, save_brief};
use crate::cli::CliApp;
use crate::render;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use domain::engagement::EngagementType;
use domain::error::DomainError;
use domain::models::BusinessChallenge;
use domain::scenario::SAMPLE_SCENARIOS;
use domain::session::Session;
use shared::confirmation::{ask_confirmation, is_interactive_terminal};
use shared::types::Result;
use std::path::PathBuf;

pub async fn run(app: &CliApp) -> Result<()> {
    if !is_interactive_terminal() {
        bail!("interactive mode needs a terminal; use `ai-consultant brief` for scripted runs");
    }
    println!("{}", "AI Consultant".bold());
    println!("{}\n", "Strategy & Operations Analysis powered by AI".dimmed());

    let service = app.consulting_service().await?;
    let theme = ColorfulTheme::default();
    let mut session = Session::new();

    loop {
        let Some(challenge) = ask_challenge(&theme)? else {
            break;
        };

        let brief = match app.cached_brief(&challenge) {
            Some(brief) => {
                render::print_brief(&brief, true);
                brief
            }
            None => {
                eprintln!(
                    "{}",
                    "Analyzing challenge and retrieving relevant frameworks...".dimmed()
                );
                match service.generate_brief(&challenge).await {
                    Ok(brief) => {
                        app.remember_brief(&challenge, &brief);
                        render::print_brief(&brief, false);
                        brief
                    }
                    Err(e) => {
                        println!("{} {:#}", "Could not generate the brief:".red(), e);
                        if ask_confirmation("Try another challenge?", true)? {
                            continue;
                        }
                        break;
                    }
                }
            }
        };

        if ask_confirmation("Save this brief to a file?", false)? {
            let filename: String = Input::with_theme(&theme)
                .with_prompt("File name (.txt, .md or .docx)")
                .default(default_filename(&brief))
                .interact_text()?;
            let path = PathBuf::from(filename.trim());
            match save_brief(&brief, &path) {
                Ok(()) => println!("{} {}", "Saved to".green(), path.display()),
                Err(e) => println!("{} {:#}", "Save failed:".red(), e),
            }
        }
        if ask_confirmation("Copy the brief to the clipboard?", false)? {
            match copy_to_clipboard(&brief.content) {
                Ok(()) => println!("{}", "Copied to clipboard.".green()),
                Err(e) => println!("{} {:#}", "Copy failed:".yellow(), e),
            }
        }

        session.add_brief(brief);
        if !ask_confirmation("Analyze another challenge?", true)? {
            break;
        }
    }

    if !session.is_empty() {
        println!(
            "{}",
            format!("{} brief(s) generated this session:", session.len()).dimmed()
        );
        for brief in session.briefs() {
            let industry = if brief.industry.is_empty() {
                "General"
            } else {
                brief.industry.as_str()
            };
            println!("  - {} / {}", brief.engagement_type, industry);
        }
    }
    Ok(())
}

/// `None` when the user chooses to quit.
fn ask_challenge(theme: &ColorfulTheme) -> Result<Option<BusinessChallenge>> {
    let mut starts: Vec<String> = vec!["Blank challenge".to_string()];
    starts.extend(SAMPLE_SCENARIOS.iter().map(|s| format!("Sample: {}", s.name)));
    starts.push("Quit".to_string());

    let choice = Select::with_theme(theme)
        .with_prompt("Define your challenge")
        .items(&starts)
        .default(0)
        .interact()?;
    if choice == starts.len() - 1 {
        return Ok(None);
    }
    let template = match choice {
        0 => BusinessChallenge::default(),
        n => SAMPLE_SCENARIOS[n - 1].to_challenge(),
    };

    let labels: Vec<&str> = EngagementType::ALL.iter().map(|e| e.label()).collect();
    let selected = EngagementType::ALL
        .iter()
        .position(|e| *e == template.engagement_type)
        .unwrap_or(0);
    let engagement_idx = Select::with_theme(theme)
        .with_prompt("Engagement Type")
        .items(&labels)
        .default(selected)
        .interact()?;

    let industry: String = Input::with_theme(theme)
        .with_prompt("Industry (e.g., Technology, Healthcare, Finance)")
        .with_initial_text(template.industry.clone())
        .allow_empty(true)
        .interact_text()?;

    let challenge_text = loop {
        let text: String = Input::with_theme(theme)
            .with_prompt("Describe the challenge")
            .with_initial_text(template.challenge.clone())
            .allow_empty(true)
            .interact_text()?;
        if !text.trim().is_empty() {
            break text;
        }
        println!("{}", DomainError::EmptyChallenge.to_string().red());
    };

    let constraints: String = Input::with_theme(theme)
        .with_prompt("Key constraints (optional)")
        .with_initial_text(template.constraints.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    let mut challenge = BusinessChallenge::new(EngagementType::ALL[engagement_idx], challenge_text)
        .with_industry(industry);
    if !constraints.trim().is_empty() {
        challenge = challenge.with_constraints(constraints);
    }
    Ok(Some(challenge))
}

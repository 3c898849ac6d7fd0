use crate::types::Result;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::io::IsTerminal;

/// Yes/no question in the interactive form. Esc or `q` keeps the default.
pub fn ask_confirmation(prompt: &str, default_yes: bool) -> Result<bool> {
    let answer = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default_yes)
        .wait_for_newline(true)
        .interact_opt()?;
    Ok(answer.unwrap_or(default_yes))
}

/// Prompts need both ends attached to a terminal.
pub fn is_interactive_terminal() -> bool {
    std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
}

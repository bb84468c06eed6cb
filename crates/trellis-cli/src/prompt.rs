use anyhow::{anyhow, Context, Result};
use inquire::{Confirm, Select, Text};
use trellis_core::PromptSource;

/// Prompts the operator on the controlling terminal.
pub struct TerminalPrompts;

impl PromptSource for TerminalPrompts {
    fn choose(&mut self, prompt: &str, options: &[&str]) -> Result<usize> {
        let choices: Vec<String> = options.iter().map(|entry| entry.to_string()).collect();
        let selected = Select::new(prompt, choices.clone())
            .prompt()
            .context("prompt cancelled")?;
        choices
            .iter()
            .position(|entry| entry == &selected)
            .ok_or_else(|| anyhow!("prompt returned an unknown option"))
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        let value = Text::new(prompt).prompt().context("prompt cancelled")?;
        Ok(value.trim().to_string())
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::new(prompt)
            .with_default(default)
            .prompt()
            .context("prompt cancelled")
    }
}

/// Fails closed: a required choice with no flag-derived default terminates
/// the run instead of guessing. Yes/no questions fall back to their default.
pub struct NonInteractivePrompts;

impl PromptSource for NonInteractivePrompts {
    fn choose(&mut self, prompt: &str, _options: &[&str]) -> Result<usize> {
        Err(anyhow!(
            "a non-interactive run requires an explicit value for: {prompt}"
        ))
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        Err(anyhow!(
            "a non-interactive run requires an explicit value for: {prompt}"
        ))
    }

    fn confirm(&mut self, _prompt: &str, default: bool) -> Result<bool> {
        Ok(default)
    }
}

//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::collections::VecDeque;
use std::io::{self, Write};

use console::style;
use semver::Version;

use crate::domain::{next_version, ReleaseType};
use crate::error::{ReleaseError, Result};

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_commit_summary, display_error, display_history_preview, display_release_plan,
    display_status, display_success, display_warning,
};

/// Questions the release workflow asks the user
pub trait Prompter {
    /// Ask which kind of release to make
    fn select_release_type(&mut self, current: &Version) -> Result<ReleaseType>;

    /// Ask a yes/no question
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

fn read_answer() -> Result<String> {
    io::stdout().flush()?;

    let mut input = String::new();
    let read = io::stdin().read_line(&mut input)?;
    if read == 0 {
        return Err(ReleaseError::prompt("Input closed before an answer was given"));
    }
    Ok(input.trim().to_string())
}

/// Parses a 1-based menu selection; empty input selects the first entry.
pub fn parse_selection(input: &str, len: usize) -> Option<usize> {
    let index = if input.is_empty() {
        1
    } else {
        input.parse::<usize>().ok()?
    };

    (index > 0 && index <= len).then(|| index - 1)
}

/// Interprets a yes/no answer; anything but "y"/"yes" is no.
pub fn parse_confirmation(input: &str) -> bool {
    let response = input.trim().to_lowercase();
    response == "y" || response == "yes"
}

/// Prompts on the controlling terminal
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    /// Displays a numbered list of release types with the version each produces.
    /// Default selection is patch (index 1) if user presses Enter.
    fn select_release_type(&mut self, current: &Version) -> Result<ReleaseType> {
        println!(
            "\n{}",
            style(format!("Select release type (current: {}):", current)).bold()
        );
        for (i, release_type) in ReleaseType::ALL.iter().enumerate() {
            println!(
                "  {}. {} ({})",
                i + 1,
                release_type,
                next_version(current, *release_type)
            );
        }

        print!("\nRelease type (1-{}) [default: 1]: ", ReleaseType::ALL.len());
        let answer = read_answer()?;

        parse_selection(&answer, ReleaseType::ALL.len())
            .map(|index| ReleaseType::ALL[index])
            .ok_or_else(|| ReleaseError::prompt(format!("Invalid selection '{}'", answer)))
    }

    /// Default is "no" if user presses Enter.
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        print!("\n{} (y/N): ", prompt);
        Ok(parse_confirmation(&read_answer()?))
    }
}

/// Replays queued answers and records every prompt, for tests
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    release_types: VecDeque<ReleaseType>,
    confirmations: VecDeque<bool>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_release_type(mut self, release_type: ReleaseType) -> Self {
        self.release_types.push_back(release_type);
        self
    }

    pub fn with_confirmation(mut self, answer: bool) -> Self {
        self.confirmations.push_back(answer);
        self
    }

    /// Every prompt shown so far
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    pub fn was_asked(&self, fragment: &str) -> bool {
        self.asked.iter().any(|p| p.contains(fragment))
    }
}

impl Prompter for ScriptedPrompter {
    fn select_release_type(&mut self, current: &Version) -> Result<ReleaseType> {
        self.asked.push(format!("release type (current: {})", current));
        self.release_types
            .pop_front()
            .ok_or_else(|| ReleaseError::prompt("No scripted release type"))
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        self.asked.push(prompt.to_string());
        self.confirmations
            .pop_front()
            .ok_or_else(|| ReleaseError::prompt(format!("No scripted answer for '{}'", prompt)))
    }
}

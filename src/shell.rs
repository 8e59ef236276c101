//! External command execution
//!
//! Every mutating step of a release (git-flow, commit, push, build, publish)
//! is expressed as an [Invocation] and handed to a [CommandRunner]. The
//! workflow never spawns processes itself, so tests can record what would
//! have been run.

use std::fmt;
use std::process::Command;

use crate::error::{ReleaseError, Result};

/// A single external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    interactive: bool,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            interactive: false,
        }
    }

    /// `git <args>`
    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation::new("git", args)
    }

    /// A user-supplied command line run through the platform shell
    pub fn shell(script: impl Into<String>) -> Self {
        if cfg!(windows) {
            Invocation::new("cmd", ["/C".to_string(), script.into()])
        } else {
            Invocation::new("sh", ["-c".to_string(), script.into()])
        }
    }

    /// Inherit the terminal so the command can show output and ask questions
    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }
}

fn quote(arg: &str) -> String {
    if !arg.is_empty() && !arg.chars().any(|c| c.is_whitespace() || c == '"' || c == '\\') {
        return arg.to_string();
    }
    format!("\"{}\"", arg.replace('\\', "\\\\").replace('"', "\\\""))
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

/// Runs external commands on behalf of the release workflow
pub trait CommandRunner {
    /// Run the command to completion
    ///
    /// # Returns
    /// * `Ok(())` - Command exited with status 0
    /// * `Err` - Command could not be spawned or exited non-zero
    fn run(&mut self, invocation: &Invocation) -> Result<()>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for Box<T> {
    fn run(&mut self, invocation: &Invocation) -> Result<()> {
        (**self).run(invocation)
    }
}

/// Spawns real processes
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<()> {
        log::info!("Running: {}", invocation);

        let mut cmd = Command::new(invocation.program());
        cmd.args(invocation.args());

        if invocation.is_interactive() {
            let status = cmd.status().map_err(|e| {
                ReleaseError::command(format!("Failed to execute '{}': {}", invocation, e))
            })?;

            if !status.success() {
                return Err(ReleaseError::command(format!(
                    "'{}' exited with code {}",
                    invocation,
                    status.code().unwrap_or(-1)
                )));
            }
            return Ok(());
        }

        let output = cmd.output().map_err(|e| {
            ReleaseError::command(format!("Failed to execute '{}': {}", invocation, e))
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            log::debug!("{}", stdout.trim_end());
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReleaseError::command(format!(
                "'{}' exited with code {}\nStdout: {}\nStderr: {}",
                invocation,
                output.status.code().unwrap_or(-1),
                stdout.trim_end(),
                stderr.trim_end()
            )));
        }

        Ok(())
    }
}

/// Prints commands instead of running them
#[derive(Debug, Default)]
pub struct DryRunRunner;

impl CommandRunner for DryRunRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<()> {
        log::info!("Dry run, skipping: {}", invocation);
        crate::ui::display_status(&format!("Would run: {}", invocation));
        Ok(())
    }
}

/// Records commands for tests; can be told to fail on one of them
#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: Vec<String>,
    fail_on: Option<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first command whose command line starts with `prefix`
    pub fn fail_on(mut self, prefix: impl Into<String>) -> Self {
        self.fail_on = Some(prefix.into());
        self
    }

    /// Command lines run so far, including a failed one
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn ran(&self, prefix: &str) -> bool {
        self.commands.iter().any(|c| c.starts_with(prefix))
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<()> {
        let line = invocation.to_string();
        self.commands.push(line.clone());

        match &self.fail_on {
            Some(prefix) if line.starts_with(prefix.as_str()) => Err(ReleaseError::command(
                format!("'{}' exited with code 1", line),
            )),
            _ => Ok(()),
        }
    }
}

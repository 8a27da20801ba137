//! Interactive input.
//!
//! The installer asks for two things: a disk number and passwords. Both go
//! through the `Prompter` trait so pipeline steps can be driven by canned
//! answers in tests.

use crate::error::{InstallError, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use zeroize::Zeroizing;

/// Source of user answers.
pub trait Prompter {
    /// Print `prompt` and read one line, without the trailing newline.
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    /// Print `prompt` and read one line without echoing it.
    fn read_secret(&mut self, prompt: &str) -> Result<Zeroizing<String>>;
}

/// Prompter backed by the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

/// Restores cooked mode even if reading a key fails.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode()
            .map_err(|e| InstallError::input(format!("Failed to enable raw mode: {}", e)))?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(InstallError::input("standard input closed"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn read_secret(&mut self, prompt: &str) -> Result<Zeroizing<String>> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut secret = Zeroizing::new(String::new());
        {
            let _raw = RawModeGuard::enable()?;
            loop {
                let Event::Key(key) = event::read()? else {
                    continue;
                };
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Enter => break,
                    KeyCode::Char('c') | KeyCode::Char('d')
                        if key.modifiers.contains(KeyModifiers::CONTROL) =>
                    {
                        println!("\r");
                        return Err(InstallError::input("password entry interrupted"));
                    }
                    KeyCode::Backspace => {
                        secret.pop();
                    }
                    KeyCode::Char(c) => secret.push(c),
                    _ => {}
                }
            }
        }
        println!();
        Ok(secret)
    }
}

/// Prompter that replays a fixed list of answers.
///
/// Records every prompt it was shown. Running out of answers is reported
/// the same way as a closed terminal.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next_answer(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| InstallError::input("standard input closed"))
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.next_answer(prompt)
    }

    fn read_secret(&mut self, prompt: &str) -> Result<Zeroizing<String>> {
        self.next_answer(prompt).map(Zeroizing::new)
    }
}

// Terminal I/O boundary. The dispatcher only talks to a `Console`, so the
// same flows run against a real terminal (dialoguer + crossterm colors)
// or against a scripted list of input lines in tests.

use crossterm::style::{style, Stylize};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};
use std::time::Duration;

/// How a message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Heading,
    Info,
    Success,
    Warning,
    Error,
}

pub trait Console {
    fn say(&mut self, tone: Tone, message: &str);

    /// Reads one line of input. `Ok(None)` means input is closed.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Progress indicator shown while a slow call runs. Hidden by default.
    fn progress(&mut self, _message: &str) -> ProgressBar {
        ProgressBar::hidden()
    }
}

/// Interactive console on the real terminal.
#[derive(Default)]
pub struct TerminalConsole;

impl TerminalConsole {
    pub fn new() -> Self {
        TerminalConsole
    }
}

impl Console for TerminalConsole {
    fn say(&mut self, tone: Tone, message: &str) {
        match tone {
            Tone::Plain => println!("{}", message),
            Tone::Heading => println!("{}", style(message).cyan().bold()),
            Tone::Info => println!("{}", style(message).magenta()),
            Tone::Success => println!("{}", style(message).green()),
            Tone::Warning => println!("{}", style(message).yellow()),
            Tone::Error => println!("{}", style(message).red()),
        }
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        // dialoguer never reports EOF on piped input, so only use it on a tty.
        if !io::stdin().is_terminal() {
            print!("{}: ", prompt);
            io::stdout().flush()?;
            return read_line_from(&mut io::stdin().lock());
        }
        // `Input` re-prompts by itself on empty input unless allowed.
        let result = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text();
        match result {
            Ok(line) => Ok(Some(line)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn progress(&mut self, message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}

/// Reads one line without its line ending. Zero bytes read means EOF.
pub fn read_line_from<R: BufRead + ?Sized>(reader: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

/// Console fed from a fixed list of input lines; records everything the
/// application says. Input runs out as if stdin was closed.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    prompts: Vec<String>,
    messages: Vec<(Tone, String)>,
}

impl ScriptedConsole {
    pub fn new<I, T>(inputs: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        ScriptedConsole {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn messages(&self) -> &[(Tone, String)] {
        &self.messages
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Every message joined by newlines.
    pub fn transcript(&self) -> String {
        self.messages
            .iter()
            .map(|(_, m)| m.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn said(&self, needle: &str) -> bool {
        self.messages.iter().any(|(_, m)| m.contains(needle))
    }

    pub fn said_with(&self, tone: Tone, needle: &str) -> bool {
        self.messages
            .iter()
            .any(|(t, m)| *t == tone && m.contains(needle))
    }

    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }
}

impl Console for ScriptedConsole {
    fn say(&mut self, tone: Tone, message: &str) {
        self.messages.push((tone, message.to_string()));
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.inputs.pop_front())
    }
}

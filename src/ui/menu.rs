// Interactive Menu - Producer side of the pipeline
//
// Runs on its own OS thread because reading stdin blocks. It:
// - Prompts for one of five numbered options
// - Writes entered paths into the ConfigStore (under the input lock)
// - Queues analysis requests without waiting for them
// - Flips the shutdown signal on Quit or end of input

use crate::dispatch::RequestSender;
use crate::models::{PathField, SnapshotPolicy};
use crate::state::{ConfigStore, InputLock, ShutdownSignal};
use std::io::{self, BufRead, Write};

const BANNER: &str = "\
************************************************************
*     ATU - Dept. of Computer Science & Applied Physics    *
*                                                          *
*             Virtual Threaded Sentiment Analyser          *
*                                                          *
************************************************************
(1) Specify a Text File
(2) Specify a Sentiment Map File
(3) Specify a Stopwords File
(4) Perform Sentiment Analysis
(5) Quit
Select Option [1-5]>";

/// One of the five menu options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    SetPath(PathField),
    RunAnalysis,
    Quit,
}

impl MenuChoice {
    /// Parse the operator's selection. Only the exact strings "1".."5" are valid.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::SetPath(PathField::Text)),
            "2" => Some(MenuChoice::SetPath(PathField::Lexicon)),
            "3" => Some(MenuChoice::SetPath(PathField::Stopwords)),
            "4" => Some(MenuChoice::RunAnalysis),
            "5" => Some(MenuChoice::Quit),
            _ => None,
        }
    }
}

fn set_path_heading(field: PathField) -> &'static str {
    match field {
        PathField::Text => "Option 1 Selected: Specify a Text File",
        PathField::Lexicon => "Option 2 Selected: Specify a Sentiment Map File",
        PathField::Stopwords => "Option 3 Selected: Specify a Stopwords File",
    }
}

/// The interactive control loop
///
/// Generic over its input and output so it can be driven by scripted input
/// in tests; the binary uses locked stdin and stdout.
pub struct MenuLoop<R, W> {
    input: R,
    output: W,
    config: ConfigStore,
    requests: RequestSender,
    input_lock: InputLock,
    shutdown: ShutdownSignal,
    policy: SnapshotPolicy,
}

impl<R: BufRead, W: Write> MenuLoop<R, W> {
    pub fn new(
        input: R,
        output: W,
        config: ConfigStore,
        requests: RequestSender,
        input_lock: InputLock,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            input,
            output,
            config,
            requests,
            input_lock,
            shutdown,
            policy: SnapshotPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: SnapshotPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run until Quit is chosen, input ends or shutdown is signalled elsewhere.
    ///
    /// Must not be called from an async context: path entry takes the
    /// input lock with `blocking_lock`.
    pub fn run(&mut self) -> io::Result<()> {
        tracing::info!("Menu loop started");

        while !self.shutdown.is_triggered() {
            let Some(choice) = self.select_option()? else {
                tracing::info!("Input closed, shutting down");
                self.shutdown.trigger();
                break;
            };

            if self.shutdown.is_triggered() {
                break;
            }

            match choice {
                MenuChoice::SetPath(field) => {
                    writeln!(self.output, "\n{}", set_path_heading(field))?;
                    if !self.read_path(field)? {
                        self.shutdown.trigger();
                        break;
                    }
                }
                MenuChoice::RunAnalysis => {
                    writeln!(self.output, "\nOption 4 Selected: Perform Sentiment Analysis")?;
                    let snapshot = match self.policy {
                        SnapshotPolicy::AtEnqueue => Some(self.config.snapshot()),
                        SnapshotPolicy::AtDispatch => None,
                    };
                    match self.requests.enqueue(snapshot) {
                        Some(id) => writeln!(self.output, "Analysis #{} queued", id)?,
                        None => writeln!(self.output, "Shutting down, analysis not queued")?,
                    }
                }
                MenuChoice::Quit => {
                    writeln!(self.output, "Quitting the application")?;
                    self.shutdown.trigger();
                }
            }
        }

        tracing::info!("Menu loop finished");
        Ok(())
    }

    /// Show the menu until a valid option is entered. `None` on end of input.
    fn select_option(&mut self) -> io::Result<Option<MenuChoice>> {
        loop {
            let Some(input) = self.prompt_non_empty(BANNER)? else {
                return Ok(None);
            };
            writeln!(self.output)?;

            match MenuChoice::parse(&input) {
                Some(choice) => return Ok(Some(choice)),
                None => {
                    tracing::debug!("Invalid menu option: {:?}", input);
                    writeln!(self.output, "Is not a valid option!")?;
                }
            }
        }
    }

    /// Read a path for `field` under the input lock and store it.
    ///
    /// Returns `false` if input ended before a path was entered.
    fn read_path(&mut self, field: PathField) -> io::Result<bool> {
        let input_lock = self.input_lock.clone();
        let _guard = input_lock.blocking_lock();

        let prompt = format!("Enter the path of the {}: ", field.label());
        match self.prompt_non_empty(&prompt)? {
            Some(path) => {
                tracing::info!("{} set to {}", field, path);
                self.config.set(field, path);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Prompt until a non-empty trimmed line is read. `None` on end of input.
    fn prompt_non_empty(&mut self, prompt: &str) -> io::Result<Option<String>> {
        loop {
            write!(self.output, "{}", prompt)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
        }
    }
}

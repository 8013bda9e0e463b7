// UI layer: the two collaborators the pipeline talks to instead of the
// terminal directly. `UrlProvider` supplies the snippet URL (from a flag
// or an interactive prompt) and `Reporter` receives everything the user
// should see.

use std::time::Duration;

use anyhow::Result;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};

/// Source of the URL of the snippet the image is attached to.
pub trait UrlProvider {
    fn target_url(&mut self) -> Result<String>;
}

/// URL already known, e.g. passed with `--url`.
pub struct FixedUrl(pub String);

impl UrlProvider for FixedUrl {
    fn target_url(&mut self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Ask for the URL on the terminal.
///
/// `Input::interact_text()` keeps prompting on the same line and returns
/// what was typed once Enter is pressed.
pub struct PromptUrl;

impl UrlProvider for PromptUrl {
    fn target_url(&mut self) -> Result<String> {
        let url: String = Input::new()
            .with_prompt("Enter the URL this image is to be assigned to")
            .interact_text()?;
        Ok(url)
    }
}

/// Sink for user-facing output.
pub trait Reporter {
    /// A slow step has started (network calls).
    fn stage(&mut self, message: &str);
    /// One printed line.
    fn line(&mut self, message: &str);
}

/// Stdout reporter. Stages are shown on an `indicatif` spinner which is
/// cleared before the next printed line.
#[derive(Default)]
pub struct ConsoleReporter {
    spinner: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Reporter for ConsoleReporter {
    fn stage(&mut self, message: &str) {
        let spinner = self.spinner.get_or_insert_with(|| {
            let spinner = ProgressBar::new_spinner();
            let style = ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            spinner.set_style(style);
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        });
        spinner.set_message(message.to_string());
    }

    fn line(&mut self, message: &str) {
        self.clear_spinner();
        println!("{}", message);
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        self.clear_spinner();
    }
}

/// Reporter that keeps everything in memory, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    pub stages: Vec<String>,
    pub lines: Vec<String>,
}

impl Reporter for MemoryReporter {
    fn stage(&mut self, message: &str) {
        self.stages.push(message.to_string());
    }

    fn line(&mut self, message: &str) {
        self.lines.push(message.to_string());
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn stage(&mut self, message: &str) {
        (**self).stage(message)
    }

    fn line(&mut self, message: &str) {
        (**self).line(message)
    }
}

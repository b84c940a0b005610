use std::io::{self, IsTerminal};

use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use tracing::debug;

/// Answers the yes/no questions asked while entering a mode.
pub trait Prompter {
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Asks on the controlling terminal. When stdin is not a terminal every
/// question is answered "no".
#[derive(Debug)]
pub struct TerminalPrompter {
    interactive: bool,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        TerminalPrompter {
            interactive: io::stdin().is_terminal(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        TerminalPrompter::new()
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        if !self.interactive {
            debug!(question, "stdin is not a terminal, answering no");
            return Ok(false);
        }

        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(question)
            .default(false)
            .interact()
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_terminal_answers_no() {
        let mut prompter = TerminalPrompter { interactive: false };
        assert!(!prompter.confirm("Enable ForceCompositionPipeline?").unwrap());
        assert!(!prompter.confirm("Enable Coolbits?").unwrap());
    }
}

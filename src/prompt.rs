use console::{Term, style};
use log::{info, warn};

use crate::host::{Alert, Buttons, Choice, Icon, Prompter};

/// Shows alerts on the terminal and reads answers from stdin.
pub struct TerminalPrompter {
    term: Term,
    assume_yes: bool,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            assume_yes: false,
        }
    }

    /// Answer every question with yes/ok without reading stdin.
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    fn render(&self, alert: &Alert) -> std::io::Result<()> {
        let header = match alert.icon {
            Icon::Error => style(format!("✖ {}", alert.title)).red().bold(),
            Icon::Warning => style(format!("⚠️ {}", alert.title)).yellow().bold(),
            Icon::Question => style(format!("? {}", alert.title)).cyan().bold(),
            Icon::Status => style(format!("ℹ {}", alert.title)).green().bold(),
        };
        self.term.write_line("")?;
        self.term.write_line(&header.to_string())?;
        for line in alert.message.lines() {
            self.term.write_line(&format!("   {}", line))?;
        }
        Ok(())
    }

    fn ask(&self, buttons: Buttons) -> std::io::Result<Choice> {
        let hint = match buttons {
            Buttons::Ok => return Ok(Choice::Ok),
            Buttons::YesNo => "(Y=yes, N=no)",
        };
        self.term.write_str(&format!("{} ", style(hint).dim()))?;
        self.term.flush()?;
        let answer = self.term.read_line()?;
        Ok(parse_answer(&answer, buttons))
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn alert(&mut self, alert: &Alert) -> Choice {
        if let Err(e) = self.render(alert) {
            warn!("cannot write to terminal: {}", e);
        }

        if self.assume_yes {
            let choice = default_yes(alert.buttons);
            info!("'{}' answered {:?} automatically", alert.title, choice);
            return choice;
        }

        match self.ask(alert.buttons) {
            Ok(choice) => choice,
            Err(e) => {
                warn!("cannot read answer: {}", e);
                negative(alert.buttons)
            }
        }
    }
}

fn default_yes(buttons: Buttons) -> Choice {
    match buttons {
        Buttons::Ok => Choice::Ok,
        Buttons::YesNo => Choice::Yes,
    }
}

fn negative(buttons: Buttons) -> Choice {
    match buttons {
        Buttons::Ok => Choice::Ok,
        Buttons::YesNo => Choice::No,
    }
}

/// Unrecognised input counts as the negative answer.
fn parse_answer(input: &str, buttons: Buttons) -> Choice {
    let answer = input.trim().to_lowercase();
    match (buttons, answer.as_str()) {
        (Buttons::Ok, _) => Choice::Ok,
        (Buttons::YesNo, "y" | "yes") => Choice::Yes,
        _ => negative(buttons),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_answers() {
        assert_eq!(parse_answer("Y\n", Buttons::YesNo), Choice::Yes);
        assert_eq!(parse_answer(" yes ", Buttons::YesNo), Choice::Yes);
        assert_eq!(parse_answer("n", Buttons::YesNo), Choice::No);
        assert_eq!(parse_answer("anything", Buttons::Ok), Choice::Ok);
    }

    #[test]
    fn unknown_input_is_negative() {
        assert_eq!(parse_answer("maybe", Buttons::YesNo), Choice::No);
        assert_eq!(parse_answer("", Buttons::YesNo), Choice::No);
    }

    #[test]
    fn assume_yes_answers_without_stdin() {
        let mut prompter = TerminalPrompter::new().assume_yes(true);
        let question = Alert::new("Continue?", "go on?").buttons(Buttons::YesNo);
        assert_eq!(prompter.alert(&question), Choice::Yes);
        assert_eq!(prompter.alert(&Alert::new("Done", "ok")), Choice::Ok);
    }
}

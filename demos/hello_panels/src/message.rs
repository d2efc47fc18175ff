//! Greeting planning and printing.

use std::io::Write;

use crate::cli::{Commands, GreetCommand, HelloPanelsCli, TakeLeaveCommand};
use crate::error::Result;

/// How loudly to deliver the greeting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeliveryMode {
    /// As written.
    #[default]
    Normal,
    /// Upper case.
    Excited,
    /// Lower case.
    Quiet,
}

impl DeliveryMode {
    /// The mode selected by the global switches.
    #[must_use]
    pub const fn from_cli(cli: &HelloPanelsCli) -> Self {
        if cli.is_excited {
            Self::Excited
        } else if cli.is_quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    fn apply(self, text: &str) -> String {
        match self {
            Self::Normal => text.to_owned(),
            Self::Excited => text.to_uppercase(),
            Self::Quiet => text.to_lowercase(),
        }
    }
}

/// The lines a run prints, in order.
#[must_use]
pub fn plan(cli: &HelloPanelsCli) -> Vec<String> {
    match &cli.command {
        None => {
            let greet = GreetCommand {
                punctuation: "!".to_owned(),
                preamble: None,
            };
            greeting_lines(cli, &greet)
        }
        Some(Commands::Greet(greet)) => greeting_lines(cli, greet),
        Some(Commands::TakeLeave(leave)) => farewell_lines(cli, leave),
    }
}

fn greeting_lines(cli: &HelloPanelsCli, greet: &GreetCommand) -> Vec<String> {
    let mode = DeliveryMode::from_cli(cli);
    let mut lines: Vec<String> = greet.preamble.iter().map(|text| mode.apply(text)).collect();
    let greeting = format!("{}, {}{}", cli.salutation, cli.recipient, greet.punctuation);
    lines.push(mode.apply(&greeting));
    lines
}

fn farewell_lines(cli: &HelloPanelsCli, leave: &TakeLeaveCommand) -> Vec<String> {
    let mode = DeliveryMode::from_cli(cli);
    let farewell = format!("{}, {}.", leave.farewell, cli.recipient);
    let mut lines = vec![mode.apply(&farewell)];
    if let Some(gift) = &leave.gift {
        lines.push(format!("Leaving you {gift}."));
    }
    if let Some(minutes) = leave.reminder_minutes {
        lines.push(format!("Reminder set for {minutes} minutes."));
    }
    lines
}

/// Writes the planned lines to `out`.
///
/// # Errors
///
/// Returns an error when writing fails.
pub fn print_plan(cli: &HelloPanelsCli, out: &mut dyn Write) -> Result<()> {
    for line in plan(cli) {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

use std::io::{self, Write};

use super::dispatch::{Command, DispatchError};
use crate::http_client::RunCommand;

const TOKEN_PROMPT: &str = "Select a token (from \"List tokens\")";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    ListTokens,
    NewToken,
    GetTime,
    GetSplits,
    Run(RunCommand),
    PrintHost,
    SetHost,
    Quit
}

/// menu entries, in display order
pub const MENU: [Action; 14] = [
    Action::ListTokens,
    Action::NewToken,
    Action::GetTime,
    Action::GetSplits,
    Action::Run(RunCommand::Reset),
    Action::Run(RunCommand::Start),
    Action::Run(RunCommand::Split),
    Action::Run(RunCommand::Undo),
    Action::Run(RunCommand::Skip),
    Action::Run(RunCommand::PauseToggle),
    Action::Run(RunCommand::Save),
    Action::PrintHost,
    Action::SetHost,
    Action::Quit
];

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Self::ListTokens => "List tokens",
            Self::NewToken => "New token",
            Self::GetTime => "Get run time",
            Self::GetSplits => "Retrieve the run's splits",
            Self::Run(command) => match command {
                RunCommand::Reset => "Reset the current run",
                RunCommand::Start => "Start a new run",
                RunCommand::Split => "Split to the next segment",
                RunCommand::Undo => "Undo the latest segment",
                RunCommand::Skip => "Skip the current segment",
                RunCommand::PauseToggle => "Pause-toggle the run's timer",
                RunCommand::Save => "Save the complete run"
            },
            Self::PrintHost => "Print host",
            Self::SetHost => "Set host",
            Self::Quit => "Quit"
        }
    }

    /// prompt for the action's argument, if it takes one
    pub fn prompt(self) -> Option<&'static str> {
        match self {
            Self::NewToken => Some("Insert the game/category"),
            Self::GetTime | Self::GetSplits | Self::Run(_) => Some(TOKEN_PROMPT),
            Self::SetHost => Some("Insert the runs host/url"),
            Self::ListTokens | Self::PrintHost | Self::Quit => None
        }
    }

    /// whether the action talks to the run server
    pub fn is_remote(self) -> bool {
        matches!(self, Self::NewToken | Self::GetTime | Self::GetSplits | Self::Run(_))
    }

    /// attach the prompted argument; actions without one ignore it
    pub fn bind(self, argument: Option<String>) -> Command {
        let argument = argument.unwrap_or_default();
        match self {
            Self::ListTokens => Command::ListTokens,
            Self::NewToken => Command::NewToken { game: argument },
            Self::GetTime => Command::GetTime { index: argument },
            Self::GetSplits => Command::GetSplits { index: argument },
            Self::Run(command) => Command::Run { command, index: argument },
            Self::PrintHost => Command::PrintHost,
            Self::SetHost => Command::SetHost { host: argument },
            Self::Quit => Command::Quit
        }
    }
}

/// parse a 1-based menu choice
pub fn parse_selection(raw: &str) -> Result<Action, DispatchError> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| MENU.get(i).copied())
        .ok_or_else(|| DispatchError::InvalidOption(raw.to_string()))
}

pub fn print_menu(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Select an option:\n")?;
    for (i, action) in MENU.iter().enumerate() {
        writeln!(out, "{} - {}", i + 1, action.label())?;
    }
    writeln!(out)
}

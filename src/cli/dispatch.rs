use std::io::{self, Write};

use console::style;
use log::debug;
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};
use thiserror::Error;

use super::session::Session;
use crate::{http_client::{HttpClient, HttpClientError, RunCommand}, tokens::TokenRegistry};

/// a menu action together with the argument it was given
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ListTokens,
    NewToken { game: String },
    GetTime { index: String },
    GetSplits { index: String },
    Run { command: RunCommand, index: String },
    PrintHost,
    SetHost { host: String },
    Quit
}

/// why a token index could not be resolved; logged, not shown
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("not a number")]
    NotANumber,
    #[error("index {index} is outside 1..={len}")]
    OutOfRange { index: usize, len: usize }
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Invalid option \"{0}\"")]
    InvalidOption(String),
    #[error("Invalid token index \"{raw}\"")]
    InvalidTokenIndex { raw: String, cause: IndexError },
    #[error(transparent)]
    Api(#[from] HttpClientError)
}

type Result<T> = std::result::Result<T, DispatchError>;

/// what a successfully executed command has to show
#[derive(Debug)]
pub enum Outcome {
    Tokens,
    NewToken { index: usize, token: String },
    Time { token: String, time: Value },
    Splits(Value),
    Acknowledged,
    Host,
    Silent
}

/// resolve a raw 1-based index typed by the user
fn token_at<'a>(tokens: &'a TokenRegistry, raw: &str) -> Result<&'a str> {
    let invalid = |cause| DispatchError::InvalidTokenIndex { raw: raw.to_string(), cause };
    let index = raw
        .trim()
        .parse::<usize>()
        .map_err(|_| invalid(IndexError::NotANumber))?;
    tokens
        .resolve(index)
        .ok_or_else(|| invalid(IndexError::OutOfRange { index, len: tokens.len() }))
}

/// run one command against the session, making at most one request
pub async fn execute(command: Command, session: &mut Session, client: &HttpClient) -> Result<Outcome> {
    match command {
        Command::ListTokens => Ok(Outcome::Tokens),
        Command::NewToken { game } => {
            let token = client.new_token(session.host(), &game).await?;
            let tokens = session.tokens_mut();
            tokens.append(token.clone());
            Ok(Outcome::NewToken { index: tokens.len(), token })
        },
        Command::GetTime { index } => {
            let token = token_at(session.tokens(), &index)?;
            let time = client.get_time(session.host(), token).await?;
            Ok(Outcome::Time { token: token.into(), time })
        },
        Command::GetSplits { index } => {
            let token = token_at(session.tokens(), &index)?;
            Ok(Outcome::Splits(client.get_splits(session.host(), token).await?))
        },
        Command::Run { command, index } => {
            let token = token_at(session.tokens(), &index)?;
            client.send_command(session.host(), token, command).await?;
            Ok(Outcome::Acknowledged)
        },
        Command::PrintHost => Ok(Outcome::Host),
        Command::SetHost { host } => {
            debug!("Switching host to {}", host);
            session.set_host(host);
            Ok(Outcome::Silent)
        },
        Command::Quit => {
            session.quit();
            Ok(Outcome::Silent)
        }
    }
}

/// `[H:]MM:SS.mmm`
fn format_millis(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = ms / 60_000 % 60;
    let seconds = ms / 1000 % 60;
    let millis = ms % 1000;
    if hours > 0 {
        format!("{}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
    } else {
        format!("{:02}:{:02}.{:03}", minutes, seconds, millis)
    }
}

fn describe_time(time: &Value) -> String {
    match time {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_u64() {
            Some(ms) => format!("{} ({})", ms, format_millis(ms)),
            None => n.to_string()
        },
        other => other.to_string()
    }
}

pub fn list_tokens(tokens: &TokenRegistry, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "  Tokens:")?;
    if tokens.is_empty() {
        return writeln!(out, "    {}", style("none yet, use \"New token\" first").dim());
    }
    for (index, token) in tokens.list() {
        writeln!(out, "    {} - {}", index, token)?;
    }
    Ok(())
}

pub fn render(outcome: &Outcome, session: &Session, out: &mut impl Write) -> io::Result<()> {
    match outcome {
        Outcome::Tokens => list_tokens(session.tokens(), out),
        Outcome::NewToken { index, token } => writeln!(
            out,
            "{} {} - {}",
            style("New token:").dim(),
            index,
            style(token).cyan().bold()
        ),
        Outcome::Time { token, time } => writeln!(
            out,
            "Token: {} - Time: {}",
            token,
            describe_time(time)
        ),
        Outcome::Splits(splits) => {
            let mut ser = Serializer::with_formatter(&mut *out, PrettyFormatter::with_indent(b"    "));
            splits.serialize(&mut ser)?;
            writeln!(out)
        },
        Outcome::Acknowledged => writeln!(out, "{}", style("OK!").green()),
        Outcome::Host => writeln!(out, "Current host: {}", session.host()),
        Outcome::Silent => Ok(())
    }
}

/// print a recoverable error; bad token indices also get the token list
pub fn report(err: &DispatchError, session: &Session, out: &mut impl Write) -> io::Result<()> {
    if let DispatchError::InvalidTokenIndex { raw, cause } = err {
        debug!("Token index {:?} rejected: {}", raw, cause);
    }
    writeln!(out, "{}", style(err).red())?;
    if let DispatchError::InvalidTokenIndex { .. } = err {
        list_tokens(session.tokens(), out)?;
    }
    Ok(())
}

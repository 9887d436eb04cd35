mod dispatch;
mod menu;
mod prompt;
mod session;
mod status_spinner;

use thiserror::Error;
use clap::Parser;
use console::style;
use log::{LevelFilter, debug, error};
use indicatif_log_bridge::LogWrapper;
use indicatif::MultiProgress;
use std::{io::{self, stdin, stdout, IsTerminal, Write}, process::ExitCode, time::Duration};
use crate::http_client::{HttpClient, HttpClientError};
use dispatch::{execute, render, report, DispatchError};
use menu::{parse_selection, print_menu};
use prompt::{LinePrompter, Prompter, TermPrompter};
use session::{Session, DEFAULT_HOST};
use status_spinner::StatusSpinner;

/// Speedrun split-timer client
#[derive(Parser, Debug)]
#[command(version, about, long_about = "Interactive client for a speedrun split-timer server: create run tokens, then start, split, pause and save runs from a menu.", name = "splitctl")]
struct Args {
    /// Maximum logging level
    #[arg(short, long)]
    log_level: Option<LevelFilter>,

    /// Run server URL. Can also be changed from the menu
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Request timeout, in seconds
    #[arg(short, long, default_value_t = 30)]
    timeout: u64
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("API error: {0}")]
    ApiError(#[from] HttpClientError),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Input error: {0}")]
    InputError(#[from] dialoguer::Error)
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::ApiError(e) => e.exit_code(),
            _ => 1
        }
    }

    /// the error followed by every distinct cause in its source chain
    fn diagnostic(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        message
    }
}

type Result<T = ()> = std::result::Result<T, CliError>;

fn setup_logging() -> (MultiProgress, Args) {
    let mut logger = env_logger::Builder::from_default_env();
    let args = Args::parse();

    if let Some(level) = args.log_level {
        logger.filter_level(level);
    }

    let multi = MultiProgress::new();
    let logger = logger.build();
    let log_filter = logger.filter();
    LogWrapper::new(multi.clone(), logger)
        .try_init()
        .unwrap();
    log::set_max_level(log_filter);

    (multi, args)
}

/// prompt for a line; `None` once input is exhausted
fn ask(prompter: &mut impl Prompter, prompt: &str) -> Result<Option<String>> {
    match prompter.read_line(prompt) {
        Ok(line) => Ok(Some(line)),
        Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e.into())
    }
}

/// one pass of the menu: show it, read a choice, act on it
async fn step(
    session: &mut Session,
    client: &HttpClient,
    prompter: &mut impl Prompter,
    multi: &MultiProgress,
    out: &mut impl Write
) -> Result {
    print_menu(out)?;
    out.flush()?;

    let Some(choice) = ask(prompter, "Option")? else {
        debug!("Input closed");
        session.quit();
        return Ok(());
    };
    writeln!(out)?;

    let action = match parse_selection(&choice) {
        Ok(action) => action,
        Err(e) => {
            report(&e, session, out)?;
            writeln!(out)?;
            return Ok(());
        }
    };

    let argument = match action.prompt() {
        Some(prompt) => match ask(prompter, prompt)? {
            Some(argument) => Some(argument),
            None => {
                session.quit();
                return Ok(());
            }
        },
        None => None
    };

    let status = action
        .is_remote()
        .then(|| StatusSpinner::new("Contacting run server...", multi));
    let result = execute(action.bind(argument), session, client).await;

    match result {
        Ok(outcome) => {
            if let Some(status) = &status {
                status.clear();
            }
            render(&outcome, session, out)?;
        },
        Err(DispatchError::Api(e)) if e.is_fatal() => {
            if let Some(status) = &status {
                status.fail("Request failed");
            }
            return Err(e.into());
        },
        Err(e) => {
            if let Some(status) = &status {
                match &e {
                    DispatchError::Api(_) => status.fail("Bad reply from run server"),
                    _ => status.clear()
                }
            }
            report(&e, session, out)?;
        }
    }

    writeln!(out)?;
    Ok(())
}

/// drive the menu until the session is quit or a request fails fatally
async fn run_session(
    session: &mut Session,
    client: &HttpClient,
    prompter: &mut impl Prompter,
    multi: &MultiProgress,
    out: &mut impl Write
) -> Result {
    while session.is_running() {
        step(session, client, prompter, multi, out).await?;
    }
    Ok(())
}

async fn run_internal(multi: MultiProgress, args: Args) -> Result {
    let client = HttpClient::init(Duration::from_secs(args.timeout))?;
    let mut session = Session::new(args.host);
    let mut out = stdout();

    if stdin().is_terminal() {
        run_session(&mut session, &client, &mut TermPrompter::new(), &multi, &mut out).await
    } else {
        let mut prompter = LinePrompter::new(stdin().lock(), stdout());
        run_session(&mut session, &client, &mut prompter, &multi, &mut out).await
    }
}

pub async fn run() -> ExitCode {
    let (multi, args) = setup_logging();
    if let Err(err) = run_internal(multi, args).await {
        let diagnostic = err.diagnostic();
        error!("{}", diagnostic);
        // printed even when logging is turned off
        eprintln!("{}", style(&diagnostic).red());
        return ExitCode::from(err.exit_code());
    }

    ExitCode::SUCCESS
}

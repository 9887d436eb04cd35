use serde_json::Value;

use super::{run_url, HttpClient, IntoResult, Result};

/// bodiless POST commands accepted on `/run/<token>/<command>`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RunCommand {
    /// discard unsaved progress
    Reset,
    Start,
    /// close the current segment and move to the next
    Split,
    Undo,
    /// move to the next segment without timing the current one
    Skip,
    PauseToggle,
    /// persist a finished run on the server
    Save
}

impl RunCommand {
    pub fn segment(self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::Start => "start",
            Self::Split => "split",
            Self::Undo => "undo",
            Self::Skip => "skip",
            Self::PauseToggle => "pause-toggle",
            Self::Save => "save"
        }
    }
}

impl HttpClient {
    /// start tracking a new run of a game/category, returning its token
    pub async fn new_token(&self, host: &str, game: &str) -> Result<String> {
        let game = urlencoding::encode(game);
        let reply = self.get_json(&run_url(host, &["new", &*game])).await?;
        let token = reply
            .get("Token")
            .and_then(Value::as_str)
            .ir("Token")?;
        Ok(token.into())
    }

    /// the run's elapsed time, as reported by the server
    pub async fn get_time(&self, host: &str, token: &str) -> Result<Value> {
        let mut reply = self.get_json(&run_url(host, &["timer", token])).await?;
        reply
            .get_mut("Time")
            .map(Value::take)
            .ir("Time")
    }

    pub async fn get_splits(&self, host: &str, token: &str) -> Result<Value> {
        self.get_json(&run_url(host, &["splits", token])).await
    }

    pub async fn send_command(&self, host: &str, token: &str, command: RunCommand) -> Result<()> {
        self.post_empty(&run_url(host, &[token, command.segment()])).await
    }
}

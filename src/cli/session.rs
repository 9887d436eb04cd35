use crate::tokens::TokenRegistry;

pub const DEFAULT_HOST: &str = "http://localhost:8080";

/// everything an interactive session mutates between requests
#[derive(Debug)]
pub struct Session {
    host: String,
    tokens: TokenRegistry,
    running: bool
}

impl Session {
    pub fn new(host: String) -> Self {
        Self {
            host,
            tokens: TokenRegistry::new(),
            running: true
        }
    }

    /// host exactly as configured (not normalized)
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn set_host(&mut self, host: String) {
        self.host = host;
    }

    pub fn tokens(&self) -> &TokenRegistry {
        &self.tokens
    }

    pub fn tokens_mut(&mut self) -> &mut TokenRegistry {
        &mut self.tokens
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}

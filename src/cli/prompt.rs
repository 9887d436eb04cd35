use std::io::{self, BufRead, Write};

use dialoguer::{theme::ColorfulTheme, Input};

/// source of the operator's answers
pub trait Prompter {
    /// read one line; end of input is an `UnexpectedEof` I/O error
    fn read_line(&mut self, prompt: &str) -> dialoguer::Result<String>;
}

/// interactive terminal prompts
#[derive(Default)]
pub struct TermPrompter {
    theme: ColorfulTheme
}

impl TermPrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompter for TermPrompter {
    fn read_line(&mut self, prompt: &str) -> dialoguer::Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
    }
}

/// plain line-based prompts, for piped stdin
pub struct LinePrompter<R, W> {
    input: R,
    output: W
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn read_line(&mut self, prompt: &str) -> dialoguer::Result<String> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
        // keep the answer verbatim apart from the line terminator
        let len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(len);
        Ok(line)
    }
}

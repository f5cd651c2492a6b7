use std::fmt;
use std::str::FromStr;

use crate::handler::ProcessResponse;

use super::ClientError;

pub const SUCCESS_BANNER: &str = "Data processed successfully!";

/// Which result fields are shown after a successful request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DisplayMode {
    #[default]
    AlphabetsAndNumbers,
    Symbols,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 2] = [DisplayMode::AlphabetsAndNumbers, DisplayMode::Symbols];

    /// Label shown in the option picker
    pub fn label(&self) -> &'static str {
        match self {
            Self::AlphabetsAndNumbers => "Alphabets & Numbers",
            Self::Symbols => "Symbols",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown display mode: {0}")]
pub struct UnknownDisplayMode(String);

impl FromStr for DisplayMode {
    type Err = UnknownDisplayMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "alphabets & numbers" | "alphabets-and-numbers" | "alphabets" | "numbers" => {
                Ok(Self::AlphabetsAndNumbers)
            }
            "symbols" => Ok(Self::Symbols),
            _ => Err(UnknownDisplayMode(s.to_string())),
        }
    }
}

/// Formats a successful response for the selected mode.
///
/// The highest lowercase letter is printed in both modes, and only when one was found.
pub fn render(response: &ProcessResponse, mode: DisplayMode) -> String {
    let result = &response.result;
    let mut lines = vec![SUCCESS_BANNER.to_string()];

    match mode {
        DisplayMode::AlphabetsAndNumbers => {
            lines.push("Alphabets and Numbers:".to_string());
            lines.push(format!("Alphabets: {}", result.alphabets.join(", ")));
            lines.push(format!("Numbers: {}", result.numbers.join(", ")));
        }
        DisplayMode::Symbols => {
            lines.push("Symbols:".to_string());
            lines.push(format!("Symbols: {}", result.symbols.join(", ")));
        }
    }

    if !result.highest_lowercase_alphabet.is_empty() {
        lines.push(format!(
            "Highest Lowercase Alphabet: {}",
            result.highest_lowercase_alphabet
        ));
    }

    lines.join("\n")
}

/// Inline message shown for a failed attempt
pub fn render_error(err: &ClientError) -> String {
    match err {
        ClientError::LocalParse(_) => "Invalid JSON format".to_string(),
        ClientError::UpstreamUnavailable(_) => "Failed to process the data".to_string(),
    }
}

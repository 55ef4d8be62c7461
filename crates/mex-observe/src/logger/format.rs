use std::{
    fmt,
    io::{self, IsTerminal},
    str::FromStr,
};

use crate::logger::error::LoggerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerFormat {
    Text,
    Json,
}

impl FromStr for LoggerFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "logfmt" => Ok(LoggerFormat::Text),
            "json" => Ok(LoggerFormat::Json),
            _ => Err(LoggerError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for LoggerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggerFormat::Text => f.write_str("text"),
            LoggerFormat::Json => f.write_str("json"),
        }
    }
}

/// When the text format emits ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Color when stderr is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Auto => io::stderr().is_terminal(),
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

impl FromStr for ColorMode {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            _ => Err(LoggerError::InvalidColor(s.to_string())),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::Auto => f.write_str("auto"),
            ColorMode::Always => f.write_str("always"),
            ColorMode::Never => f.write_str("never"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_formats() {
        assert_eq!("text".parse::<LoggerFormat>().unwrap(), LoggerFormat::Text);
        assert_eq!(" JSON ".parse::<LoggerFormat>().unwrap(), LoggerFormat::Json);
        assert_eq!("logfmt".parse::<LoggerFormat>().unwrap(), LoggerFormat::Text);
    }

    #[test]
    fn rejects_unknown_format() {
        let err = "xml".parse::<LoggerFormat>().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidFormat(s) if s == "xml"));
    }

    #[test]
    fn color_modes() {
        assert_eq!("Always".parse::<ColorMode>().unwrap(), ColorMode::Always);
        assert_eq!(ColorMode::Never.to_string(), "never");
        assert!(ColorMode::Always.enabled());
        assert!(!ColorMode::Never.enabled());
        assert!(matches!("sometimes".parse::<ColorMode>(), Err(LoggerError::InvalidColor(_))));
    }
}

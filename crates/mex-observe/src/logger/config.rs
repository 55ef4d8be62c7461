use crate::logger::format::{ColorMode, LoggerFormat};

/// Logging setup for the exporter binary.
///
/// Defaults: text output on stderr, `info` filter, no targets, color only on a terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// `EnvFilter` directive, e.g. `info` or `info,mex_client=debug`.
    pub filter: String,
    pub with_targets: bool,
    pub color: ColorMode,
}

impl LoggerConfig {
    pub fn new(format: LoggerFormat, filter: impl Into<String>) -> Self {
        Self {
            format,
            filter: filter.into(),
            with_targets: false,
            color: ColorMode::Auto,
        }
    }

    pub fn with_targets(mut self, with_targets: bool) -> Self {
        self.with_targets = with_targets;
        self
    }

    pub fn with_color(mut self, color: ColorMode) -> Self {
        self.color = color;
        self
    }

    /// ANSI colors for the text format; json output is never colored.
    pub fn ansi(&self) -> bool {
        match self.format {
            LoggerFormat::Text => self.color.enabled(),
            LoggerFormat::Json => false,
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::new(LoggerFormat::Text, "info")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_quiet_text() {
        let cfg = LoggerConfig::default();
        assert_eq!(cfg.format, LoggerFormat::Text);
        assert_eq!(cfg.filter, "info");
        assert!(!cfg.with_targets);
        assert_eq!(cfg.color, ColorMode::Auto);
    }

    #[test]
    fn json_is_never_colored() {
        let cfg = LoggerConfig::new(LoggerFormat::Json, "debug").with_color(ColorMode::Always);
        assert!(!cfg.ansi());

        let cfg = LoggerConfig::new(LoggerFormat::Text, "debug").with_color(ColorMode::Always);
        assert!(cfg.ansi());
        assert!(!cfg.with_color(ColorMode::Never).ansi());
    }
}

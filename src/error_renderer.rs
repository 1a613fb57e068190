//! Error rendering using miette's graphical report handler
//!
//! Conversion errors carry a diagnostic code, an optional help line, and
//! for host faults the host's own message as the source. This module
//! renders all of it for humans.

use miette::{GraphicalReportHandler, GraphicalTheme, ThemeCharacters, ThemeStyles};
use std::io::Write;

use crate::ConversionError;

/// Character set for rendering error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSet {
    /// Use Unicode characters for rich visual output.
    #[default]
    Unicode,
    /// Use ASCII-only characters for compatibility.
    Ascii,
}

/// Configuration for error rendering.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
    /// The character set to use for rendering.
    /// Defaults to Unicode for rich visual output.
    pub charset: CharSet,
    /// Column at which long messages wrap.
    pub width: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig::default()
    }
}

impl RenderConfig {
    const fn default() -> Self {
        Self {
            color: true,
            charset: CharSet::Unicode,
            width: 100,
        }
    }

    fn theme(&self) -> GraphicalTheme {
        let characters = match self.charset {
            CharSet::Unicode => ThemeCharacters::unicode(),
            CharSet::Ascii => ThemeCharacters::ascii(),
        };
        let styles = if self.color {
            ThemeStyles::ansi()
        } else {
            ThemeStyles::none()
        };
        GraphicalTheme { characters, styles }
    }
}

/// Render an error with formatting to stderr using default config.
///
/// # Example
/// ```no_run
/// use datumbridge::{ConversionError, render_error};
///
/// render_error(&ConversionError::ImmutableViolation);
/// ```
pub fn render_error(error: &ConversionError) {
    render_error_to(error, &mut std::io::stderr(), &RenderConfig::default()).ok();
}

/// Render an error to a writer with the given configuration.
///
/// # Example
/// ```
/// use datumbridge::{ConversionError, RenderConfig, render_error_to};
///
/// let mut buf = Vec::new();
/// let config = RenderConfig { color: false, ..Default::default() };
/// render_error_to(&ConversionError::ImmutableViolation, &mut buf, &config).unwrap();
/// let output = String::from_utf8_lossy(&buf);
/// assert!(output.contains("datumbridge::immutable_violation"));
/// ```
pub fn render_error_to(
    error: &ConversionError,
    writer: &mut dyn Write,
    config: &RenderConfig,
) -> std::io::Result<()> {
    let handler = GraphicalReportHandler::new_themed(config.theme()).with_width(config.width);

    let mut rendered = String::new();
    handler
        .render_report(&mut rendered, error)
        .map_err(std::io::Error::other)?;
    writer.write_all(rendered.as_bytes())
}

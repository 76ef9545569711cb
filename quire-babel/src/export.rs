//! Export dispatcher
//!
//! [`Exporter`] is what a front end talks to. It validates the source, derives
//! the output filename, routes to exactly one encoder through the
//! [`FormatRegistry`], hands the bytes to a [`Delivery`] and keeps a small
//! per-format status board that clears itself after a display window.
//!
//! Errors never escape [`Exporter::export`]: every failure becomes an
//! [`ExportOutcome::Failure`] with a user-facing message while the cause is
//! logged.

use crate::error::FormatError;
use crate::registry::FormatRegistry;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;

pub const VALIDATION_MESSAGE: &str = "Please enter some markdown content before exporting";

pub const SUCCESS_DISPLAY: Duration = Duration::from_secs(2);
pub const VALIDATION_DISPLAY: Duration = Duration::from_secs(3);
pub const FAILURE_DISPLAY: Duration = Duration::from_secs(5);

static TRAILING_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.[^/.]+$").expect("valid regex"));

/// The five export targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Docx,
    Html,
    Txt,
    Rtf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Pdf,
        ExportFormat::Docx,
        ExportFormat::Html,
        ExportFormat::Txt,
        ExportFormat::Rtf,
    ];

    /// Registry name of the encoder.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Html => "html",
            ExportFormat::Txt => "txt",
            ExportFormat::Rtf => "rtf",
        }
    }

    /// Canonical file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Html => "text/html",
            ExportFormat::Txt => "text/plain",
            ExportFormat::Rtf => "application/rtf",
        }
    }

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "PDF",
            ExportFormat::Docx => "Word",
            ExportFormat::Html => "HTML",
            ExportFormat::Txt => "Text",
            ExportFormat::Rtf => "RTF",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "Portable Document Format",
            ExportFormat::Docx => "Microsoft Word Document",
            ExportFormat::Html => "Web Page Format",
            ExportFormat::Txt => "Plain Text File",
            ExportFormat::Rtf => "Rich Text Format",
        }
    }

    /// Message shown when an export of this format fails.
    pub fn failure_message(&self) -> String {
        format!(
            "Failed to export as {}. Please try again.",
            self.as_str().to_uppercase()
        )
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" | "paginated-document" => Ok(ExportFormat::Pdf),
            "docx" | "word-document" | "word" => Ok(ExportFormat::Docx),
            "html" | "html-file" | "htm" => Ok(ExportFormat::Html),
            "txt" | "plain-text" | "text" => Ok(ExportFormat::Txt),
            "rtf" | "rich-text" => Ok(ExportFormat::Rtf),
            _ => Err(FormatError::FormatNotFound(s.to_string())),
        }
    }
}

/// Replace a trailing extension of `base` with the format's canonical one.
///
/// A trailing extension is the last `.` followed by at least one character,
/// none of which is `/` or `.`.
pub fn export_filename(base: &str, format: ExportFormat) -> String {
    let stem = TRAILING_EXTENSION.replace(base, "");
    format!("{stem}.{}", format.extension())
}

/// Bytes ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedOutput {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

/// Transient per-format export state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Idle,
    InProgress(ExportFormat),
    Success(ExportFormat),
    Failure {
        format: ExportFormat,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{0}")]
    Validation(String),
    #[error("Export as {0} is already in progress")]
    Busy(ExportFormat),
    #[error("Failed to export as {format}: {source}")]
    Format {
        format: ExportFormat,
        #[source]
        source: FormatError,
    },
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Receives the encoded bytes of a successful export.
pub trait Delivery: Send + Sync {
    fn deliver(&self, output: &EncodedOutput) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
enum Slot {
    Running,
    Shown {
        outcome: ExportOutcome,
        until: Instant,
    },
}

/// Per-format status with lazy expiry.
#[derive(Debug, Default)]
pub struct StatusBoard {
    slots: Mutex<HashMap<ExportFormat, Slot>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `format` as running. Fails if it already is.
    pub fn begin(&self, format: ExportFormat) -> Result<(), ExportError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(slots.get(&format), Some(Slot::Running)) {
            return Err(ExportError::Busy(format));
        }
        slots.insert(format, Slot::Running);
        Ok(())
    }

    /// Record a terminal outcome visible until `now + display`.
    pub fn finish(
        &self,
        format: ExportFormat,
        outcome: ExportOutcome,
        now: Instant,
        display: Duration,
    ) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.insert(
            format,
            Slot::Shown {
                outcome,
                until: now + display,
            },
        );
    }

    /// Show a validation failure unless an export of `format` is running.
    fn reject(&self, format: ExportFormat, message: &str, now: Instant) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(slots.get(&format), Some(Slot::Running)) {
            return;
        }
        slots.insert(
            format,
            Slot::Shown {
                outcome: ExportOutcome::Failure {
                    format,
                    message: message.to_string(),
                },
                until: now + VALIDATION_DISPLAY,
            },
        );
    }

    /// The state of `format` as seen at `now`.
    pub fn status(&self, format: ExportFormat, now: Instant) -> ExportOutcome {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        match slots.get(&format) {
            Some(Slot::Running) => ExportOutcome::InProgress(format),
            Some(Slot::Shown { outcome, until }) if now < *until => outcome.clone(),
            _ => ExportOutcome::Idle,
        }
    }
}

/// A format marked running on the board. Dropping it without [`finish`]
/// (an encoder or delivery panicked) records a failure so the format does not
/// stay busy.
///
/// [`finish`]: RunningExport::finish
struct RunningExport<'a> {
    board: &'a StatusBoard,
    format: ExportFormat,
    finished: bool,
}

impl RunningExport<'_> {
    fn finish(mut self, outcome: ExportOutcome, display: Duration) {
        self.board
            .finish(self.format, outcome, Instant::now(), display);
        self.finished = true;
    }
}

impl Drop for RunningExport<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        tracing::warn!(format = %self.format, "export aborted");
        self.board.finish(
            self.format,
            ExportOutcome::Failure {
                format: self.format,
                message: self.format.failure_message(),
            },
            Instant::now(),
            FAILURE_DISPLAY,
        );
    }
}

/// Routes exports to encoders and delivers the result.
pub struct Exporter {
    registry: FormatRegistry,
    delivery: Box<dyn Delivery>,
    board: StatusBoard,
}

impl Exporter {
    pub fn new(registry: FormatRegistry, delivery: impl Delivery + 'static) -> Self {
        Self {
            registry,
            delivery: Box::new(delivery),
            board: StatusBoard::new(),
        }
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// Encode `markdown` without touching the status board or the delivery.
    pub fn convert(
        &self,
        format: ExportFormat,
        markdown: &str,
        base_filename: &str,
    ) -> Result<EncodedOutput, ExportError> {
        if markdown.trim().is_empty() {
            return Err(ExportError::Validation(VALIDATION_MESSAGE.to_string()));
        }
        let bytes = self
            .registry
            .render(format.as_str(), markdown)
            .map_err(|source| ExportError::Format { format, source })?
            .into_bytes();
        Ok(EncodedOutput {
            bytes,
            content_type: format.content_type(),
            filename: export_filename(base_filename, format),
        })
    }

    /// Export and deliver, recording the outcome on the status board.
    pub fn export(
        &self,
        format: ExportFormat,
        markdown: &str,
        base_filename: &str,
    ) -> ExportOutcome {
        if markdown.trim().is_empty() {
            tracing::warn!(%format, "rejected export of empty document");
            self.board.reject(format, VALIDATION_MESSAGE, Instant::now());
            return ExportOutcome::Failure {
                format,
                message: VALIDATION_MESSAGE.to_string(),
            };
        }

        if let Err(err) = self.board.begin(format) {
            tracing::warn!(%format, "{err}");
            return ExportOutcome::InProgress(format);
        }
        let running = RunningExport {
            board: &self.board,
            format,
            finished: false,
        };

        let result = self.convert(format, markdown, base_filename).and_then(|output| {
            self.delivery
                .deliver(&output)
                .map_err(|e| ExportError::Delivery(e.to_string()))?;
            Ok(output)
        });

        let (outcome, display) = match result {
            Ok(output) => {
                tracing::info!(
                    %format,
                    filename = %output.filename,
                    bytes = output.bytes.len(),
                    "exported document"
                );
                (ExportOutcome::Success(format), SUCCESS_DISPLAY)
            }
            Err(err) => {
                tracing::warn!(%format, error = %err, "export failed");
                (
                    ExportOutcome::Failure {
                        format,
                        message: format.failure_message(),
                    },
                    FAILURE_DISPLAY,
                )
            }
        };
        running.finish(outcome.clone(), display);
        outcome
    }

    pub fn status(&self, format: ExportFormat) -> ExportOutcome {
        self.status_at(format, Instant::now())
    }

    pub fn status_at(&self, format: ExportFormat, now: Instant) -> ExportOutcome {
        self.board.status(format, now)
    }
}

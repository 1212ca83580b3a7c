//! Hand-off of the rendered report to delivery
//!
//! Delivery itself (SMTP, retries, bounces) belongs to whatever consumes the
//! output, e.g. `perfwatch --format mail | sendmail -t`.

use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;

/// Output format for the dispatched envelope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// RFC 5322 style message with HTML body (default)
    #[default]
    Mail,
    /// JSON envelope for machine parsing
    Json,
    /// HTML body only
    Html,
}

/// Subject, body and addressing of one report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    pub subject: String,
    pub sender: String,
    pub recipients: Vec<String>,
    pub body: String,
}

/// Receives finished envelopes
pub trait Dispatcher {
    fn dispatch(&mut self, envelope: &Envelope) -> anyhow::Result<()>;
}

/// Writes envelopes to any `io::Write` in the chosen format
pub struct WriterDispatcher<W: Write> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> WriterDispatcher<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Dispatcher for WriterDispatcher<W> {
    fn dispatch(&mut self, envelope: &Envelope) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Mail => {
                writeln!(self.writer, "From: {}", envelope.sender)?;
                writeln!(self.writer, "To: {}", envelope.recipients.join(", "))?;
                writeln!(self.writer, "Subject: {}", envelope.subject)?;
                writeln!(self.writer, "MIME-Version: 1.0")?;
                writeln!(self.writer, "Content-Type: text/html; charset=UTF-8")?;
                writeln!(self.writer)?;
                self.writer.write_all(envelope.body.as_bytes())?;
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.writer, envelope)?;
                writeln!(self.writer)?;
            }
            OutputFormat::Html => {
                self.writer.write_all(envelope.body.as_bytes())?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}

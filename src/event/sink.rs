//! Event sinks
//!
//! The poller hands every event to an [`EventSink`] in production order.
//! [`JsonLinesSink`] writes one JSON object per line for a log shipper to pick
//! up; `Vec<Event>` collects events in memory.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::Event;
use crate::error::SinkError;

/// Destination for collected events
pub trait EventSink {
    /// Forward one event downstream
    fn publish(&mut self, event: Event) -> Result<(), SinkError>;
}

impl EventSink for Vec<Event> {
    fn publish(&mut self, event: Event) -> Result<(), SinkError> {
        self.push(event);
        Ok(())
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn publish(&mut self, event: Event) -> Result<(), SinkError> {
        (**self).publish(event)
    }
}

/// Newline-delimited JSON writer
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLinesSink<io::Stdout> {
    /// Write events to standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl JsonLinesSink<BufWriter<File>> {
    /// Append events to a file, creating it if needed
    pub fn append_file<P: AsRef<Path>>(path: P) -> Result<Self, SinkError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn publish(&mut self, event: Event) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, &event)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

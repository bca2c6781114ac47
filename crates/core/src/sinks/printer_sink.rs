use crate::error::Result;
use crate::pipeline::{Message, SinkComponent};
use std::fmt::Display;
use std::io::{self, Write};
use std::marker::PhantomData;

pub const DEFAULT_PREFIX: &str = "Processed output: ";

/// A sink that writes one line per received message: the prefix followed by
/// the payload.
pub struct PrinterSink<T, W = io::Stdout> {
    name: String,
    prefix: String,
    writer: W,
    _phantom: PhantomData<fn(T)>,
}

impl<T> PrinterSink<T, io::Stdout> {
    pub fn stdout() -> Self {
        PrinterSink::new(io::stdout())
    }
}

impl<T, W: Write> PrinterSink<T, W> {
    pub fn new(writer: W) -> Self {
        PrinterSink {
            name: "sink".to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            writer,
            _phantom: PhantomData,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<T, W> SinkComponent for PrinterSink<T, W>
where
    T: Display + Send + 'static,
    W: Write + Send + 'static,
{
    type Input = T;

    fn name(&self) -> &str {
        &self.name
    }

    fn consume(&mut self, msg: Message<T>) -> Result<()> {
        writeln!(self.writer, "{}{}", self.prefix, msg)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

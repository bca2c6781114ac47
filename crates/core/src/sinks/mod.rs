pub mod printer_sink;

pub use printer_sink::PrinterSink;

#![forbid(unsafe_code)]

//! Per-stream write endpoint.

use crate::error::PrintError;
use crate::printer::Printer;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// `io::Write` endpoint that tags every chunk with its stream identifier.
///
/// Writes always report the whole buffer as consumed. Callers such as child
/// process pipes do not expect a log sink to fail, so printer errors are
/// logged here instead of surfaced.
///
/// Each `write` call is rendered as one message. `write!` and `writeln!`
/// are formatted in full first, so they also render as one message.
#[derive(Clone, Debug)]
pub struct StreamWriter {
    printer: Printer,
    id: Arc<str>,
}

impl StreamWriter {
    pub fn new(printer: Printer, id: &str) -> Self {
        Self {
            printer,
            id: Arc::from(id),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl StreamWriter {
    fn forward(&self, message: &str) {
        match self.printer.write(&self.id, message) {
            Ok(_) => {}
            Err(PrintError::NotReady) => {
                tracing::error!(id = %self.id, bytes = message.len(), "write before printer start; output dropped");
            }
            Err(err) => {
                tracing::warn!(id = %self.id, bytes = message.len(), error = %err, "output dropped");
            }
        }
    }
}

impl Write for StreamWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.forward(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        match args.as_str() {
            Some(message) => self.forward(message),
            None => self.forward(&args.to_string()),
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LateWritePolicy, PrinterConfig};
    use crate::ui::MultiWriter;
    use runmux_harness::SharedBuffer;
    use tracing_test::traced_test;

    #[test]
    fn forwards_with_identifier() {
        let printer = Printer::new(PrinterConfig::plain());
        let buf = SharedBuffer::new();
        printer.bind(buf.boxed(), &["job".to_string()]).unwrap();

        let mut writer = printer.writer("job");
        writer.write_all(b"hello\n").unwrap();
        writer.flush().unwrap();
        assert_eq!(buf.contents(), "  job│  hello\n");
    }

    #[test]
    #[traced_test]
    fn write_before_start_reports_full_consumption() {
        let printer = Printer::new(PrinterConfig::plain());
        let mut writer = StreamWriter::new(printer, "early");
        assert_eq!(writer.write(b"lost").unwrap(), 4);
        assert!(logs_contain("write before printer start"));
    }

    #[test]
    #[traced_test]
    fn rejected_late_write_is_logged() {
        let printer =
            Printer::new(PrinterConfig::plain().with_late_writes(LateWritePolicy::Reject));
        printer
            .bind(SharedBuffer::new().boxed(), &["a".to_string()])
            .unwrap();
        printer.unbind();
        let mut writer = printer.writer("a");
        assert_eq!(writer.write(b"late").unwrap(), 4);
        assert!(logs_contain("output dropped"));
    }

    #[test]
    fn formatted_write_is_one_message() {
        let printer = Printer::new(PrinterConfig::plain());
        let buf = SharedBuffer::new();
        printer.bind(buf.boxed(), &["build".to_string()]).unwrap();

        let step = 3;
        let mut boxed = printer.writer("build");
        writeln!(boxed, "step {step} done").unwrap();
        let mut direct = StreamWriter::new(printer.clone(), "build");
        write!(direct, "{}/{}", step, 5).unwrap();
        assert_eq!(buf.contents(), "  build│  step 3 done\n          3/5\n");
    }

    #[test]
    fn empty_buffer_is_fine() {
        let printer = Printer::new(PrinterConfig::plain());
        printer
            .bind(SharedBuffer::new().boxed(), &["a".to_string()])
            .unwrap();
        let mut writer = StreamWriter::new(printer, "a");
        assert_eq!(writer.write(b"").unwrap(), 0);
        assert_eq!(writer.id(), "a");
    }
}

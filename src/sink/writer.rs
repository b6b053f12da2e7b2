//! Sinks over `std::io::Write` destinations: stderr, stdout and files.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use parking_lot::Mutex;

use crate::diagnostics::DiagContext;
use crate::error::SinkError;

use super::Sink;

/// Sink writing each record to a `Write` destination.
///
/// The writer is held behind a mutex for the duration of one record and
/// flushed after every write. It is released on `close` or drop.
pub struct WriterSink<W: Write + Send> {
    label: String,
    writer: Mutex<Option<W>>,
}

pub type StderrSink = WriterSink<io::Stderr>;
pub type StdoutSink = WriterSink<io::Stdout>;
pub type FileSink = WriterSink<File>;

impl<W: Write + Send> WriterSink<W> {
    pub fn new(label: &str, writer: W) -> Self {
        Self {
            label: label.to_string(),
            writer: Mutex::new(Some(writer)),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.writer.lock().is_none()
    }
}

impl WriterSink<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new("stderr", io::stderr())
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new("stdout", io::stdout())
    }
}

impl WriterSink<File> {
    /// Open `path` for appending, creating it if missing.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(&format!("file:{}", path.display()), file))
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn write(&self, encoded: &[u8]) -> Result<(), SinkError> {
        let mut guard = self.writer.lock();
        let writer = guard.as_mut().ok_or(SinkError::Closed)?;
        writer.write_all(encoded)?;
        writer.flush()?;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        match self.writer.lock().as_mut() {
            Some(writer) => Ok(writer.flush()?),
            None => Ok(()),
        }
    }

    fn close(&self) -> Result<(), SinkError> {
        match self.writer.lock().take() {
            Some(mut writer) => Ok(writer.flush()?),
            None => Ok(()),
        }
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

impl<W: Write + Send> Drop for WriterSink<W> {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.get_mut().as_mut() {
            if let Err(e) = writer.flush() {
                log::warn!(
                    "{} SINK_FLUSH_ON_DROP_FAILED error={}",
                    DiagContext::default().stream(&self.label),
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            // Deliberately short writes to exercise write_all.
            let n = buf.len().min(3);
            self.0.lock().extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "device gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_then_close() {
        let buf = SharedBuf::default();
        let sink = WriterSink::new("mem", buf.clone());

        sink.write(b"{\"a\":1}\n").unwrap();
        sink.close().unwrap();
        assert!(sink.is_closed());
        assert!(matches!(sink.write(b"x\n"), Err(SinkError::Closed)));
        // Idempotent.
        sink.close().unwrap();

        assert_eq!(&*buf.0.lock(), b"{\"a\":1}\n");
    }

    #[test]
    fn test_io_error_surfaces() {
        let sink = WriterSink::new("broken", FailingWriter);
        assert!(matches!(sink.write(b"line\n"), Err(SinkError::Io(_))));
    }

    #[test]
    fn test_concurrent_lines_do_not_interleave() {
        let buf = SharedBuf::default();
        let sink = Arc::new(WriterSink::new("mem", buf.clone()));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    let line = format!("{}\n", t.to_string().repeat(40));
                    for _ in 0..50 {
                        sink.write(line.as_bytes()).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let text = String::from_utf8(buf.0.lock().clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 400);
        for line in lines {
            let first = line.chars().next().unwrap();
            assert_eq!(line.len(), 40);
            assert!(line.chars().all(|c| c == first));
        }
    }

    #[test]
    fn test_file_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.log");

        {
            let sink = FileSink::open(&path).unwrap();
            assert!(sink.describe().starts_with("file:"));
            sink.write(b"first\n").unwrap();
        }
        {
            let sink = FileSink::open(&path).unwrap();
            sink.write(b"second\n").unwrap();
            sink.close().unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_file_sink_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("test.log");
        assert!(FileSink::open(&path).is_err());
    }
}

//! NDJSON (newline-delimited JSON) row sink.
//!
//! Each row is serialized straight into a buffered writer:
//!
//! ```ignore
//! let mut sink = NdjsonSink::stdout();
//! sink.write_rows(&receipts)?;
//! sink.write_rows(&events)?;
//! sink.finish()?;
//! ```

use serde::Serialize;
use std::io::{self, BufWriter, Write};

pub struct NdjsonSink<W: Write> {
    writer: BufWriter<W>,
    rows_written: usize,
}

impl NdjsonSink<io::Stdout> {
    /// Write NDJSON to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> NdjsonSink<W> {
    /// Create a sink wrapping any writer (file, Vec<u8>, etc.).
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(64 * 1024, writer),
            rows_written: 0,
        }
    }

    /// Write one row followed by a newline.
    pub fn write_row<T: Serialize>(&mut self, row: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, row).map_err(io::Error::other)?;
        self.writer.write_all(b"\n")?;
        self.rows_written += 1;
        Ok(())
    }

    /// Write every row in order.
    pub fn write_rows<T: Serialize>(&mut self, rows: &[T]) -> io::Result<()> {
        rows.iter().try_for_each(|row| self.write_row(row))
    }

    /// Flush and return how many rows were written.
    pub fn finish(mut self) -> io::Result<usize> {
        self.writer.flush()?;
        Ok(self.rows_written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        step: usize,
        ok: bool,
    }

    #[test]
    fn writes_one_line_per_row() {
        let mut buf = Vec::new();
        let mut sink = NdjsonSink::new(&mut buf);
        sink.write_rows(&[Row { step: 0, ok: true }, Row { step: 1, ok: false }])
            .unwrap();
        assert_eq!(sink.finish().unwrap(), 2);

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "{\"step\":0,\"ok\":true}\n{\"step\":1,\"ok\":false}\n");
    }

    #[test]
    fn different_row_types_share_one_stream() {
        #[derive(Serialize)]
        struct Event {
            kind: &'static str,
        }

        let mut buf = Vec::new();
        let mut sink = NdjsonSink::new(&mut buf);
        sink.write_rows(&[Row { step: 0, ok: true }]).unwrap();
        sink.write_rows(&[Event { kind: "withdrawn" }]).unwrap();
        sink.write_rows::<Event>(&[]).unwrap();
        assert_eq!(sink.finish().unwrap(), 2);

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "{\"step\":0,\"ok\":true}\n{\"kind\":\"withdrawn\"}\n");
    }
}

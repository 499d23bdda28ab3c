//! Buffered output for query results.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Error;

/// A buffered writer for result files.
///
/// Operators write through the [Write] implementation; [ResultWriter::finish]
/// flushes the buffer and surfaces any deferred write error.
#[derive(Debug)]
pub struct ResultWriter {
    inner: BufWriter<File>,
}

impl ResultWriter {
    /// Create the output file at the given path, truncating an existing one.
    pub fn create(path: &Path) -> Result<Self, Error> {
        let file = File::create(path).map_err(|error| Error::IoWriting {
            error,
            filename: path.display().to_string(),
        })?;

        Ok(Self {
            inner: BufWriter::new(file),
        })
    }

    /// Flush the buffer and close the file.
    pub fn finish(mut self) -> Result<(), Error> {
        self.inner.flush()?;
        Ok(())
    }
}

impl Write for ResultWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn writes_lines() {
        let directory = TempDir::new().unwrap();
        let path = directory.path().join("output.csv");

        let mut writer = ResultWriter::create(&path).unwrap();
        writeln!(writer, "1, 2").unwrap();
        writeln!(writer, "3, 4").unwrap();
        writer.finish().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "1, 2\n3, 4\n");
    }
}

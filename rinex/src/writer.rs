//! Buffered, optionally gzip-compressed text sink
use std::{
    fs::File,
    io::{BufWriter, Error as IoError, ErrorKind, Result as IoResult, Write},
    path::Path,
};

#[cfg(feature = "flate2")]
use flate2::{write::GzEncoder, Compression};

enum WriterWrapper {
    PlainFile(BufWriter<File>),
    #[cfg(feature = "flate2")]
    GzFile(BufWriter<GzEncoder<File>>),
}

/// Wraps either a plain or gzip-compressed writer, selected by file
/// extension. `.Z`-compressed output is not supported.
pub struct BufferedWriter {
    writer: WriterWrapper,
}

impl BufferedWriter {
    pub fn new<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|ext| ext.to_str());
        if matches!(ext, Some(ext) if ext.eq_ignore_ascii_case("z")) {
            return Err(IoError::new(
                ErrorKind::Unsupported,
                "unsupported compression: .Z",
            ));
        }
        let file = File::create(path)?;
        let writer = match ext {
            Some(ext) if ext.eq_ignore_ascii_case("gz") => {
                #[cfg(feature = "flate2")]
                {
                    WriterWrapper::GzFile(BufWriter::new(GzEncoder::new(
                        file,
                        Compression::default(),
                    )))
                }
                #[cfg(not(feature = "flate2"))]
                {
                    WriterWrapper::PlainFile(BufWriter::new(file))
                }
            }
            _ => WriterWrapper::PlainFile(BufWriter::new(file)),
        };
        Ok(Self { writer })
    }

    pub fn write_line(&mut self, line: &str) -> IoResult<()> {
        self.write_all(line.as_bytes())?;
        self.write_all(b"\n")
    }
}

impl Write for BufferedWriter {
    fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
        match &mut self.writer {
            WriterWrapper::PlainFile(w) => w.write(buf),
            #[cfg(feature = "flate2")]
            WriterWrapper::GzFile(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> IoResult<()> {
        match &mut self.writer {
            WriterWrapper::PlainFile(w) => w.flush(),
            #[cfg(feature = "flate2")]
            WriterWrapper::GzFile(w) => w.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_z_extension_is_reported_not_panicked() {
        let err = BufferedWriter::new("output.24O.Z").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }
}

//! Buffered, optionally gzip-compressed byte source
use std::{
    fs::File,
    io::{BufRead, BufReader, Read, Result as IoResult},
    path::Path,
};

#[cfg(feature = "flate2")]
use flate2::read::GzDecoder;

/// Wraps either a plain or gzip-compressed `BufRead`, selected by file
/// extension at construction time.
pub enum BufferedReader {
    Plain(BufReader<File>),
    #[cfg(feature = "flate2")]
    Gz(BufReader<GzDecoder<File>>),
}

impl BufferedReader {
    pub fn new<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let is_gz = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("gz"))
            .unwrap_or(false);
        if is_gz {
            #[cfg(feature = "flate2")]
            {
                Ok(Self::Gz(BufReader::new(GzDecoder::new(file))))
            }
            #[cfg(not(feature = "flate2"))]
            {
                Ok(Self::Plain(BufReader::new(file)))
            }
        } else {
            Ok(Self::Plain(BufReader::new(file)))
        }
    }
}

impl Read for BufferedReader {
    fn read(&mut self, buf: &mut [u8]) -> IoResult<usize> {
        match self {
            Self::Plain(r) => r.read(buf),
            #[cfg(feature = "flate2")]
            Self::Gz(r) => r.read(buf),
        }
    }
}

impl BufRead for BufferedReader {
    fn fill_buf(&mut self) -> IoResult<&[u8]> {
        match self {
            Self::Plain(r) => r.fill_buf(),
            #[cfg(feature = "flate2")]
            Self::Gz(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            Self::Plain(r) => r.consume(amt),
            #[cfg(feature = "flate2")]
            Self::Gz(r) => r.consume(amt),
        }
    }
}

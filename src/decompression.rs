use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Chain, Cursor, Read, Write};
use std::path::Path;

/// Gzip member header magic
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

type ChainReader = Chain<Cursor<Vec<u8>>, File>;
type GzipReader = BufReader<MultiGzDecoder<ChainReader>>;
type PlainReader = BufReader<ChainReader>;

/// Compression format of an input file, decided by content only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Plain,
    Gzip,
}

impl Compression {
    /// Classify from the leading bytes of a file
    pub fn from_magic(head: &[u8]) -> Self {
        if head.len() >= 2 && head[..2] == GZIP_MAGIC {
            Compression::Gzip
        } else {
            Compression::Plain
        }
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compression::Plain => write!(f, "plain"),
            Compression::Gzip => write!(f, "gzip"),
        }
    }
}

/// Format Detector over an already open reader. Consumes at most two bytes
/// (retrying short reads) and returns them with the verdict, so callers can
/// chain them back in front of the rest of the stream.
pub fn sniff<R: Read>(reader: &mut R) -> io::Result<(Compression, Vec<u8>)> {
    let mut head = Vec::with_capacity(GZIP_MAGIC.len());
    reader
        .by_ref()
        .take(GZIP_MAGIC.len() as u64)
        .read_to_end(&mut head)?;
    Ok((Compression::from_magic(&head), head))
}

/// Sniff a file's compression by its magic bytes.
/// Only the header is checked; a corrupt gzip body fails later, on read.
pub fn detect<P: AsRef<Path>>(path: P) -> io::Result<Compression> {
    let mut file = File::open(path)?;
    let (compression, _) = sniff(&mut file)?;
    Ok(compression)
}

/// Streaming line source over a plain or gzip file
pub enum InputReader {
    /// Gzip decompression, multi-member aware
    Gzip(GzipReader),
    /// Passthrough for non-compressed files
    Plain(PlainReader),
}

impl std::fmt::Debug for InputReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputReader::Gzip(_) => write!(f, "InputReader::Gzip"),
            InputReader::Plain(_) => write!(f, "InputReader::Plain"),
        }
    }
}

impl InputReader {
    /// Open a file and pick the reader variant from its magic bytes.
    /// The file is opened once; the sniffed bytes are chained back in front.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let mut file = File::open(path)?;
        let (compression, head) = sniff(&mut file)?;
        let chained = Cursor::new(head).chain(file);

        Ok(match compression {
            Compression::Gzip => InputReader::Gzip(BufReader::new(MultiGzDecoder::new(chained))),
            Compression::Plain => InputReader::Plain(BufReader::new(chained)),
        })
    }

    pub fn compression(&self) -> Compression {
        match self {
            InputReader::Gzip(_) => Compression::Gzip,
            InputReader::Plain(_) => Compression::Plain,
        }
    }
}

impl BufRead for InputReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            InputReader::Gzip(reader) => reader.fill_buf(),
            InputReader::Plain(reader) => reader.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            InputReader::Gzip(reader) => reader.consume(amt),
            InputReader::Plain(reader) => reader.consume(amt),
        }
    }
}

impl Read for InputReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            InputReader::Gzip(reader) => reader.read(buf),
            InputReader::Plain(reader) => reader.read(buf),
        }
    }
}

/// Buffered output file, gzip-compressed when the input was
pub enum OutputWriter {
    Gzip(GzEncoder<BufWriter<File>>),
    Plain(BufWriter<File>),
}

impl std::fmt::Debug for OutputWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputWriter::Gzip(_) => write!(f, "OutputWriter::Gzip"),
            OutputWriter::Plain(_) => write!(f, "OutputWriter::Plain"),
        }
    }
}

impl OutputWriter {
    /// Create (truncating) an output file in the given format
    pub fn create<P: AsRef<Path>>(path: P, compression: Compression, level: u32) -> io::Result<Self> {
        let file = BufWriter::new(File::create(path)?);
        Ok(match compression {
            Compression::Gzip => {
                OutputWriter::Gzip(GzEncoder::new(file, flate2::Compression::new(level)))
            }
            Compression::Plain => OutputWriter::Plain(file),
        })
    }

    /// Flush buffers and write the gzip trailer. Dropping without calling this
    /// still closes the file, but late write errors would go unreported.
    pub fn finish(self) -> io::Result<()> {
        match self {
            OutputWriter::Gzip(encoder) => encoder.finish()?.flush(),
            OutputWriter::Plain(mut writer) => writer.flush(),
        }
    }
}

impl Write for OutputWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputWriter::Gzip(writer) => writer.write(buf),
            OutputWriter::Plain(writer) => writer.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            OutputWriter::Gzip(writer) => writer.write_all(buf),
            OutputWriter::Plain(writer) => writer.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputWriter::Gzip(writer) => writer.flush(),
            OutputWriter::Plain(writer) => writer.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use std::io::{Read, Write};
    use tempfile::{NamedTempFile, TempDir};

    fn gzip_bytes(content: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(content).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_sniff_returns_consumed_head() -> io::Result<()> {
        let gz = gzip_bytes(b"@r\nA\n+\nI\n");
        let mut cursor = io::Cursor::new(gz.clone());
        let (compression, head) = sniff(&mut cursor)?;
        assert_eq!(compression, Compression::Gzip);
        assert_eq!(head, gz[..2]);
        assert_eq!(cursor.position(), 2);

        let (compression, head) = sniff(&mut io::Cursor::new(b"@".to_vec()))?;
        assert_eq!(compression, Compression::Plain);
        assert_eq!(head, b"@");
        Ok(())
    }

    #[test]
    fn test_plain_file_passthrough() -> io::Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "@read1")?;
        writeln!(temp_file, "ACGT")?;
        temp_file.flush()?;

        assert_eq!(detect(temp_file.path())?, Compression::Plain);

        let mut reader = InputReader::open(temp_file.path())?;
        assert_eq!(reader.compression(), Compression::Plain);
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        assert_eq!(content, "@read1\nACGT\n");
        Ok(())
    }

    #[test]
    fn test_gzip_detected_by_content_not_name() -> io::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("reads.fq");
        std::fs::write(&path, gzip_bytes(b"@r\nAC\n+\nII\n"))?;

        assert_eq!(detect(&path)?, Compression::Gzip);

        let mut reader = InputReader::open(&path)?;
        assert_eq!(reader.compression(), Compression::Gzip);
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        assert_eq!(content, "@r\nAC\n+\nII\n");
        Ok(())
    }

    #[test]
    fn test_gz_suffix_with_plain_content() -> io::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("reads.fq.gz");
        std::fs::write(&path, b"@r\nAC\n")?;
        assert_eq!(detect(&path)?, Compression::Plain);
        Ok(())
    }

    #[test]
    fn test_short_and_empty_files_are_plain() -> io::Result<()> {
        let empty = NamedTempFile::new()?;
        assert_eq!(detect(empty.path())?, Compression::Plain);

        let mut one_byte = NamedTempFile::new()?;
        one_byte.write_all(&[0x1F])?;
        one_byte.flush()?;
        assert_eq!(detect(one_byte.path())?, Compression::Plain);

        let mut reader = InputReader::open(one_byte.path())?;
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;
        assert_eq!(content, vec![0x1F]);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = detect(dir.path().join("absent.fq"));
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_multi_member_gzip_read_fully() -> io::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("multi.fastq.gz");
        let mut bytes = gzip_bytes(b"@a\nAAAA\n+\nIIII\n");
        bytes.extend(gzip_bytes(b"@b\nCCCC\n+\nIIII\n"));
        std::fs::write(&path, bytes)?;

        let mut reader = InputReader::open(&path)?;
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        assert_eq!(content.lines().count(), 8);
        assert!(content.contains("@b"));
        Ok(())
    }

    #[test]
    fn test_corrupt_gzip_fails_on_read() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        temp.write_all(&[0x1F, 0x8B, 0x00, 0xFF, 0xFF])?;
        temp.write_all(b"not deflate")?;
        temp.flush()?;

        // Detection only looks at the magic bytes
        assert_eq!(detect(temp.path())?, Compression::Gzip);

        let mut reader = InputReader::open(temp.path())?;
        let mut content = Vec::new();
        assert!(reader.read_to_end(&mut content).is_err());
        Ok(())
    }

    #[test]
    fn test_output_writer_matches_format() -> io::Result<()> {
        let dir = TempDir::new()?;
        let gz_path = dir.path().join("out.fq.gz");
        let mut writer = OutputWriter::create(&gz_path, Compression::Gzip, 6)?;
        writer.write_all(b"@r\nACGT\n")?;
        writer.finish()?;
        assert_eq!(detect(&gz_path)?, Compression::Gzip);

        let mut content = String::new();
        InputReader::open(&gz_path)?.read_to_string(&mut content)?;
        assert_eq!(content, "@r\nACGT\n");

        let plain_path = dir.path().join("out.fq");
        let mut writer = OutputWriter::create(&plain_path, Compression::Plain, 6)?;
        writer.write_all(b"@r\nACGT\n")?;
        writer.finish()?;
        assert_eq!(std::fs::read(&plain_path)?, b"@r\nACGT\n");
        Ok(())
    }
}

//! BAM readers and writers with optional multi-threaded BGZF.
//!
//! - **Single-threaded**: `threads=1`, lowest overhead
//! - **Multi-threaded**: `threads>1`, BGZF blocks are (de)compressed on worker threads

use anyhow::{Context, Result};
use noodles::bgzf::io::{MultithreadedReader, MultithreadedWriter, Reader as BgzfReader, Writer as BgzfWriter};
use noodles::sam::Header;
use noodles::sam::alignment::io::Write as AlignmentWrite;
use noodles::sam::alignment::RecordBuf;
use std::fs::File;
use std::io::{self, BufRead, Read, Write};
use std::num::NonZero;
use std::path::Path;

/// Single- or multi-threaded BGZF reader.
pub enum BgzfReaderEnum {
    SingleThreaded(BgzfReader<File>),
    MultiThreaded(MultithreadedReader<File>),
}

impl Read for BgzfReaderEnum {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::SingleThreaded(r) => r.read(buf),
            Self::MultiThreaded(r) => r.read(buf),
        }
    }
}

impl BufRead for BgzfReaderEnum {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            Self::SingleThreaded(r) => r.fill_buf(),
            Self::MultiThreaded(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            Self::SingleThreaded(r) => r.consume(amt),
            Self::MultiThreaded(r) => r.consume(amt),
        }
    }
}

/// BAM reader over either BGZF reader.
pub type BamReader = noodles::bam::io::Reader<BgzfReaderEnum>;

/// Single- or multi-threaded BGZF writer.
pub enum BgzfWriterEnum {
    SingleThreaded(BgzfWriter<File>),
    MultiThreaded(MultithreadedWriter<File>),
}

impl Write for BgzfWriterEnum {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::SingleThreaded(w) => w.write(buf),
            Self::MultiThreaded(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::SingleThreaded(w) => w.flush(),
            Self::MultiThreaded(w) => w.flush(),
        }
    }
}

impl BgzfWriterEnum {
    /// Flushes remaining blocks and writes the BGZF EOF marker.
    ///
    /// # Errors
    /// Returns an error if the final blocks cannot be written.
    pub fn finish(self) -> io::Result<()> {
        match self {
            Self::SingleThreaded(mut w) => w.try_finish(),
            Self::MultiThreaded(mut w) => w.finish().map(|_| ()),
        }
    }
}

/// BAM writer over either BGZF writer.
pub type BamWriter = noodles::bam::io::Writer<BgzfWriterEnum>;

/// Opens a BAM file and reads its header.
///
/// # Arguments
/// * `path` - Path to the input BAM file
/// * `threads` - Number of BGZF decompression threads (1 = single-threaded)
///
/// # Errors
/// Returns an error if the file cannot be opened or the header cannot be read.
pub fn create_bam_reader<P: AsRef<Path>>(path: P, threads: usize) -> Result<(BamReader, Header)> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open input BAM: {}", path.display()))?;

    let bgzf_reader = match NonZero::new(threads).filter(|n| n.get() > 1) {
        Some(worker_count) => {
            BgzfReaderEnum::MultiThreaded(MultithreadedReader::with_worker_count(worker_count, file))
        }
        None => BgzfReaderEnum::SingleThreaded(BgzfReader::new(file)),
    };

    let mut reader = noodles::bam::io::Reader::from(bgzf_reader);
    let header = reader
        .read_header()
        .with_context(|| format!("Failed to read header from: {}", path.display()))?;

    Ok((reader, header))
}

/// Creates a BAM file and writes its header.
///
/// # Arguments
/// * `path` - Path for the output BAM file
/// * `header` - SAM header to write
/// * `threads` - Number of BGZF compression threads (1 = single-threaded)
///
/// # Errors
/// Returns an error if the file cannot be created or the header cannot be written.
pub fn create_bam_writer<P: AsRef<Path>>(path: P, header: &Header, threads: usize) -> Result<BamWriter> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create output BAM: {}", path.display()))?;

    let bgzf_writer = match NonZero::new(threads).filter(|n| n.get() > 1) {
        Some(worker_count) => {
            BgzfWriterEnum::MultiThreaded(MultithreadedWriter::with_worker_count(worker_count, file))
        }
        None => BgzfWriterEnum::SingleThreaded(BgzfWriter::new(file)),
    };

    let mut writer = noodles::bam::io::Writer::from(bgzf_writer);
    writer
        .write_header(header)
        .with_context(|| format!("Failed to write header to: {}", path.display()))?;
    Ok(writer)
}

/// Writes one record.
///
/// # Errors
/// Returns an error if the record cannot be encoded or written.
pub fn write_record(writer: &mut BamWriter, header: &Header, record: &RecordBuf) -> Result<()> {
    writer.write_alignment_record(header, record).context("Failed to write BAM record")
}

/// Finishes a BAM writer, writing the EOF marker.
///
/// # Errors
/// Returns an error if the remaining data cannot be flushed.
pub fn finish_bam_writer(writer: BamWriter) -> Result<()> {
    writer.into_inner().finish().context("Failed to finish output BAM")
}

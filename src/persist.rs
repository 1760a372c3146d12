use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

pub const HEADER_BYTES: usize = 8;
pub const RECORD_BYTES: usize = 14;

/// One solved-table record, 14 bytes on disk (little-endian):
/// state code, the two side-to-move labels, the two depths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub code: u64,
    pub dp0: i8,
    pub dp1: i8,
    pub depth0: u16,
    pub depth1: u16,
}

impl Record {
    pub fn to_bytes(self) -> [u8; RECORD_BYTES] {
        let mut raw = [0u8; RECORD_BYTES];
        raw[0..8].copy_from_slice(&self.code.to_le_bytes());
        raw[8] = self.dp0.to_le_bytes()[0];
        raw[9] = self.dp1.to_le_bytes()[0];
        raw[10..12].copy_from_slice(&self.depth0.to_le_bytes());
        raw[12..14].copy_from_slice(&self.depth1.to_le_bytes());
        raw
    }

    pub fn from_bytes(raw: &[u8; RECORD_BYTES]) -> Self {
        let mut code = [0u8; 8];
        code.copy_from_slice(&raw[0..8]);
        Self {
            code: u64::from_le_bytes(code),
            dp0: i8::from_le_bytes([raw[8]]),
            dp1: i8::from_le_bytes([raw[9]]),
            depth0: u16::from_le_bytes([raw[10], raw[11]]),
            depth1: u16::from_le_bytes([raw[12], raw[13]]),
        }
    }
}

/// Streaming table writer. The record count is not known until the end, so
/// a placeholder header is written first and fixed up by [`finish`].
/// Pushes must arrive strictly ascending by state code; the reader relies
/// on sortedness for binary search and streaming merges.
///
/// [`finish`]: TableWriter::finish
#[derive(Debug)]
pub struct TableWriter {
    file: BufWriter<File>,
    count: u64,
    last_code: Option<u64>,
}

impl TableWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(path.as_ref())
            .map_err(|e| format!("open table for write error: {e}"))?;
        let mut file = BufWriter::new(file);
        file.write_all(&0u64.to_le_bytes())
            .map_err(|e| format!("write header placeholder error: {e}"))?;
        Ok(Self {
            file,
            count: 0,
            last_code: None,
        })
    }

    pub fn push(&mut self, rec: &Record) -> Result<(), String> {
        if let Some(prev) = self.last_code {
            if rec.code <= prev {
                return Err(format!(
                    "records out of order: {} after {prev}",
                    rec.code
                ));
            }
        }
        self.file
            .write_all(&rec.to_bytes())
            .map_err(|e| format!("write record error: {e}"))?;
        self.last_code = Some(rec.code);
        self.count += 1;
        Ok(())
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Seeks back and writes the real record count. Returns it.
    pub fn finish(mut self) -> Result<u64, String> {
        self.file
            .seek(SeekFrom::Start(0))
            .map_err(|e| format!("seek to header error: {e}"))?;
        self.file
            .write_all(&self.count.to_le_bytes())
            .map_err(|e| format!("write header count error: {e}"))?;
        self.file
            .flush()
            .map_err(|e| format!("table flush error: {e}"))?;
        Ok(self.count)
    }
}

/// Streaming table reader over the fixed-layout file.
#[derive(Debug)]
pub struct TableReader {
    file: BufReader<File>,
    record_count: u64,
    read: u64,
}

impl TableReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let file = OpenOptions::new()
            .read(true)
            .open(path.as_ref())
            .map_err(|e| format!("open table for read error: {e}"))?;
        let mut file = BufReader::new(file);
        let mut header = [0u8; HEADER_BYTES];
        file.read_exact(&mut header)
            .map_err(|e| format!("read header error: {e}"))?;
        Ok(Self {
            file,
            record_count: u64::from_le_bytes(header),
            read: 0,
        })
    }

    #[inline]
    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    #[inline]
    pub fn remaining(&self) -> u64 {
        self.record_count - self.read
    }

    /// Reads up to `max` records into `out` (cleared first). Returns false
    /// once all declared records have been consumed. A file shorter than its
    /// header promises is an error.
    pub fn read_batch(&mut self, out: &mut Vec<Record>, max: usize) -> Result<bool, String> {
        out.clear();
        let take = (self.remaining().min(max as u64)) as usize;
        if take == 0 {
            return Ok(false);
        }
        let mut raw = [0u8; RECORD_BYTES];
        for _ in 0..take {
            self.file
                .read_exact(&mut raw)
                .map_err(|e| format!("read record error (truncated table?): {e}"))?;
            out.push(Record::from_bytes(&raw));
        }
        self.read += take as u64;
        Ok(true)
    }
}

/// Convenience: write a full in-memory table. Records must be sorted.
pub fn write_table<P: AsRef<Path>>(path: P, records: &[Record]) -> Result<u64, String> {
    let mut writer = TableWriter::create(path)?;
    for rec in records {
        writer.push(rec)?;
    }
    writer.finish()
}

/// Convenience: read a full table into memory.
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, String> {
    let mut reader = TableReader::open(path)?;
    let mut records = Vec::with_capacity(reader.record_count().min(1 << 24) as usize);
    let mut batch = Vec::new();
    while reader.read_batch(&mut batch, 1 << 16)? {
        records.extend_from_slice(&batch);
    }
    Ok(records)
}

/// Structural summary produced by [`verify_table`].
#[derive(Debug, Clone, Serialize)]
pub struct TableCheck {
    pub record_count: u64,
    pub file_bytes: u64,
    pub min_code: Option<u64>,
    pub max_code: Option<u64>,
}

/// Validates the structure of a table file: the byte size matches the
/// header count, records are strictly ascending, and labels stay in
/// {-1, 0, +1}. Content-level soundness is the solver's concern, not the
/// file's.
pub fn verify_table<P: AsRef<Path>>(path: P) -> Result<TableCheck, String> {
    let file_bytes = std::fs::metadata(path.as_ref())
        .map_err(|e| format!("stat table error: {e}"))?
        .len();
    let mut reader = TableReader::open(path.as_ref())?;
    let expected = HEADER_BYTES as u64 + RECORD_BYTES as u64 * reader.record_count();
    if file_bytes != expected {
        return Err(format!(
            "size mismatch: header promises {} records ({expected} bytes), file has {file_bytes}",
            reader.record_count()
        ));
    }
    let mut min_code = None;
    let mut max_code = None;
    let mut prev: Option<u64> = None;
    let mut batch = Vec::new();
    while reader.read_batch(&mut batch, 1 << 16)? {
        for rec in &batch {
            if let Some(p) = prev {
                if rec.code <= p {
                    return Err(format!("records out of order: {} after {p}", rec.code));
                }
            }
            if rec.dp0.abs() > 1 || rec.dp1.abs() > 1 {
                return Err(format!(
                    "label out of domain at state {}: dp0={} dp1={}",
                    rec.code, rec.dp0, rec.dp1
                ));
            }
            prev = Some(rec.code);
            if min_code.is_none() {
                min_code = Some(rec.code);
            }
            max_code = Some(rec.code);
        }
    }
    Ok(TableCheck {
        record_count: reader.record_count(),
        file_bytes,
        min_code,
        max_code,
    })
}

/// SHA-256 of the whole table file, hex-encoded. Recorded in solve
/// summaries so downstream consumers can pin the exact artifact.
pub fn table_sha256<P: AsRef<Path>>(path: P) -> Result<String, String> {
    let file = OpenOptions::new()
        .read(true)
        .open(path.as_ref())
        .map_err(|e| format!("open table for digest error: {e}"))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = reader
            .read(&mut buf)
            .map_err(|e| format!("read for digest error: {e}"))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

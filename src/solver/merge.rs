// Streaming two-pointer merge of the two single-sided edgeless outputs.
// Both inputs are consumed in bounded batches; the output header count is
// fixed up by the writer once the total is known.

use std::path::Path;

use crate::persist::{Record, TableReader, TableWriter};

// Roughly 14 MiB of records buffered per input.
const MERGE_BATCH: usize = 1 << 20;

#[derive(Debug, Clone, Copy, Default)]
pub struct MergeStats {
    pub written: u64,
    pub x_only: u64,
    pub y_only: u64,
    pub both: u64,
}

struct Cursor {
    label: &'static str,
    reader: TableReader,
    buf: Vec<Record>,
    idx: usize,
    last_code: Option<u64>,
}

impl Cursor {
    fn open<P: AsRef<Path>>(path: P, label: &'static str) -> Result<Self, String> {
        Ok(Self {
            label,
            reader: TableReader::open(path).map_err(|e| format!("{label}: {e}"))?,
            buf: Vec::new(),
            idx: 0,
            last_code: None,
        })
    }

    fn peek(&mut self) -> Result<Option<Record>, String> {
        if self.idx >= self.buf.len() {
            if !self
                .reader
                .read_batch(&mut self.buf, MERGE_BATCH)
                .map_err(|e| format!("{}: {e}", self.label))?
            {
                return Ok(None);
            }
            self.idx = 0;
        }
        Ok(Some(self.buf[self.idx]))
    }

    fn bump(&mut self) -> Result<(), String> {
        let rec = self.buf[self.idx];
        if let Some(prev) = self.last_code {
            if rec.code <= prev {
                return Err(format!(
                    "{} input not sorted: {} after {prev}",
                    self.label, rec.code
                ));
            }
        }
        self.last_code = Some(rec.code);
        self.idx += 1;
        Ok(())
    }
}

fn pick_label(code: u64, field: &str, a: i8, b: i8) -> Result<i8, String> {
    match (a != 0, b != 0) {
        (true, true) => Err(format!(
            "merge collision at state {code}: {field} {a} vs {b} (label domains must not overlap)"
        )),
        (true, false) => Ok(a),
        (false, _) => Ok(b),
    }
}

fn pick_depth(code: u64, field: &str, a: u16, b: u16) -> Result<u16, String> {
    match (a != 0, b != 0) {
        (true, true) => Err(format!(
            "merge collision at state {code}: {field} {a} vs {b} (at most one input may set it)"
        )),
        (true, false) => Ok(a),
        (false, _) => Ok(b),
    }
}

// Per-field union: at most one input may supply a non-zero value. Two
// non-zero values mean the inputs were not the complementary single-sided
// tables this merge is defined over.
fn combine(a: &Record, b: &Record) -> Result<Record, String> {
    Ok(Record {
        code: a.code,
        dp0: pick_label(a.code, "dp0", a.dp0, b.dp0)?,
        dp1: pick_label(a.code, "dp1", a.dp1, b.dp1)?,
        depth0: pick_depth(a.code, "depth0", a.depth0, b.depth0)?,
        depth1: pick_depth(a.code, "depth1", a.depth1, b.depth1)?,
    })
}

/// Merges two sorted single-sided tables into the full table. Emits the
/// union of state codes; shared states have their fields combined by
/// non-zero preference, and a field set by both inputs is reported as a
/// collision. Inputs are verified to be sorted while streaming.
pub fn merge_tables<P1, P2, P3>(
    xwin_path: P1,
    ywin_path: P2,
    out_path: P3,
) -> Result<MergeStats, String>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
    P3: AsRef<Path>,
{
    let mut xs = Cursor::open(xwin_path, "xwin")?;
    let mut ys = Cursor::open(ywin_path, "ywin")?;
    let mut writer = TableWriter::create(out_path)?;
    let mut stats = MergeStats::default();

    loop {
        match (xs.peek()?, ys.peek()?) {
            (None, None) => break,
            (Some(a), None) => {
                xs.bump()?;
                writer.push(&a)?;
                stats.x_only += 1;
            }
            (None, Some(b)) => {
                ys.bump()?;
                writer.push(&b)?;
                stats.y_only += 1;
            }
            (Some(a), Some(b)) => {
                if a.code < b.code {
                    xs.bump()?;
                    writer.push(&a)?;
                    stats.x_only += 1;
                } else if b.code < a.code {
                    ys.bump()?;
                    writer.push(&b)?;
                    stats.y_only += 1;
                } else {
                    let rec = combine(&a, &b)?;
                    xs.bump()?;
                    ys.bump()?;
                    writer.push(&rec)?;
                    stats.both += 1;
                }
            }
        }
    }

    stats.written = writer.finish()?;
    Ok(stats)
}

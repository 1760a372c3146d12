// Canonical state discovery: scan the single-side code lists pairwise,
// filter for legality, canonicalize, deduplicate across worker threads.

use std::hash::BuildHasherDefault;
use std::sync::Mutex;

use hashbrown::HashSet as HbHashSet;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::board::terminal_result;
use crate::code::decode_seq;
use crate::params::Params;
use crate::state::State;
use crate::symmetry::Symmetry;

type FastHasher = BuildHasherDefault<ahash::AHasher>;
type FastSet = HbHashSet<u64, FastHasher>;

/// Sharded concurrent visited set keyed by canonical code.
/// try_insert() returns true only the first time a code is observed.
pub struct SharedVisited {
    shards: Vec<Mutex<FastSet>>,
    mask: usize,
}

impl SharedVisited {
    /// Create with shard_count rounded up to next power of two.
    pub fn new(shard_count: usize) -> Self {
        let sc = shard_count.next_power_of_two().max(1);
        let mut shards = Vec::with_capacity(sc);
        for _ in 0..sc {
            shards.push(Mutex::new(HbHashSet::with_hasher(FastHasher::default())));
        }
        Self { shards, mask: sc - 1 }
    }

    #[inline]
    fn shard_index(&self, code: u64) -> usize {
        (code as usize) & self.mask
    }

    /// Returns true if the code was not present and is inserted now.
    #[inline]
    pub fn try_insert(&self, code: u64) -> bool {
        let idx = self.shard_index(code);
        let mut guard = match self.shards[idx].lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.insert(code)
    }

    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|m| match m.lock() {
                Ok(g) => g.len(),
                Err(poisoned) => poisoned.into_inner().len(),
            })
            .sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The legal single-side code lists driving the pair scan.
pub struct ValidCodes {
    pub x: Vec<u64>,
    pub y: Vec<u64>,
}

/// Precomputes every single-side code that decodes legally. The X list is
/// additionally restricted to codes whose most-significant digit names an
/// orbit-representative cell: canonicalization maps the newest X piece onto
/// one, so the restricted scan still covers every equivalence class. The
/// prune is a speed optimization only.
pub fn valid_codes(params: &Params, sym: &Symmetry) -> ValidCodes {
    let reps = sym.orbit_representatives();
    let mut x = Vec::new();
    let mut y = Vec::new();
    for code in 0..params.separator() {
        let Some(seq) = decode_seq(params, code) else {
            continue;
        };
        y.push(code);
        match seq.last() {
            None => x.push(code),
            Some(newest) if reps.contains(&newest) => x.push(code),
            Some(_) => {}
        }
    }
    ValidCodes { x, y }
}

/// Output of the canonical scan: the sorted canonical codes and the terminal
/// classification of both sides. Every list is sorted ascending, which keeps
/// parallel runs deterministic downstream.
pub struct Enumeration {
    pub codes: Vec<u64>,
    pub x_terminal: Vec<u64>,
    pub y_terminal: Vec<u64>,
    pub scanned: u64,
}

pub fn enumerate_canonical(params: &Params, sym: &Symmetry, progress: bool) -> Enumeration {
    let valid = valid_codes(params, sym);
    let visited = SharedVisited::new(256);

    let pb = if progress {
        let pb = ProgressBar::new(valid.x.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] scan {bar:40.cyan/blue} {pos}/{len}")
                .unwrap()
                .progress_chars("=>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let results: Vec<(Vec<u64>, Vec<u64>, Vec<u64>)> = valid
        .x
        .par_iter()
        .map(|&xcode| {
            let mut codes = Vec::new();
            let mut x_terminal = Vec::new();
            let mut y_terminal = Vec::new();
            let Some(x) = decode_seq(params, xcode) else {
                return (codes, x_terminal, y_terminal);
            };
            for &ycode in &valid.y {
                let Some(y) = decode_seq(params, ycode) else {
                    continue;
                };
                let state = State::new(x, y);
                if !state.lengths_legal() || !state.disjoint() {
                    continue;
                }
                let canon = sym.canonicalize(params, &state);
                if !visited.try_insert(canon.code) {
                    continue;
                }
                codes.push(canon.code);
                match terminal_result(params, &canon.state) {
                    1 => x_terminal.push(canon.code),
                    -1 => y_terminal.push(canon.code),
                    _ => {}
                }
            }
            pb.inc(1);
            (codes, x_terminal, y_terminal)
        })
        .collect();
    pb.finish_and_clear();

    let scanned = valid.x.len() as u64 * valid.y.len() as u64;
    let mut codes = Vec::with_capacity(visited.len());
    let mut x_terminal = Vec::new();
    let mut y_terminal = Vec::new();
    for (c, xt, yt) in results {
        codes.extend(c);
        x_terminal.extend(xt);
        y_terminal.extend(yt);
    }
    codes.sort_unstable();
    x_terminal.sort_unstable();
    y_terminal.sort_unstable();

    if progress {
        eprintln!(
            "[enumerate] scanned {scanned} pairs: {} canonical states, {} X-win terminals, {} Y-win terminals",
            codes.len(),
            x_terminal.len(),
            y_terminal.len()
        );
    }

    Enumeration {
        codes,
        x_terminal,
        y_terminal,
        scanned,
    }
}

// Edgeless mode: no forward edges are ever materialized. The solver keeps
// only the sorted canonical code array plus per-state counters and flags,
// and synthesizes predecessors from the decoded state at each BFS step.
// This is what makes boards whose edge sets would not fit in memory
// solvable: four parallel arrays, about 14 bytes per state.

use std::collections::VecDeque;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::code::decode_state;
use crate::moves::{predecessors, successors};
use crate::params::Params;
use crate::persist::{Record, TableWriter};
use crate::solver::enumerate::enumerate_canonical;
use crate::symmetry::Symmetry;
use crate::types::Side;

// Flag bits. A = winner-to-move wins, B = opponent-to-move is lost.
// Own-side terminals carry both; terminals of the other side are fenced off
// so a pass never relabels states the dual pass seeds.
const FLAG_A: u8 = 1;
const FLAG_B: u8 = 2;
const FLAG_FOREIGN: u8 = 4;

#[derive(Debug, Clone, Copy, Default)]
pub struct EdgelessStats {
    pub states: u64,
    pub seeds: u64,
    pub foreign_terminals: u64,
    pub type_a: u64,
    pub type_b: u64,
}

/// One single-sided edgeless pass, parameterized by the winning side.
/// The X-win pass propagates +1 labels; the Y-win pass is its exact mirror
/// with -1 labels and the player roles swapped.
pub struct EdgelessSolver {
    params: Params,
    winner: Side,
    codes: Vec<u64>,
    need: Vec<u8>,
    flags: Vec<u8>,
    depth_a: Vec<u16>,
    depth_b: Vec<u16>,
    stats: EdgelessStats,
}

impl EdgelessSolver {
    /// Enumerates, seeds, initializes the need counters, and runs the BFS
    /// to fixed point.
    pub fn run(params: &Params, sym: &Symmetry, winner: Side, progress: bool) -> Self {
        let enumeration = enumerate_canonical(params, sym, progress);
        let codes = enumeration.codes;
        let (own_terminal, foreign_terminal) = match winner {
            Side::X => (enumeration.x_terminal, enumeration.y_terminal),
            Side::Y => (enumeration.y_terminal, enumeration.x_terminal),
        };

        let mut flags = vec![0u8; codes.len()];
        let depth_a = vec![0u16; codes.len()];
        let depth_b = vec![0u16; codes.len()];

        let mut seeds: Vec<usize> = Vec::with_capacity(own_terminal.len());
        for &code in &own_terminal {
            if let Ok(i) = codes.binary_search(&code) {
                flags[i] = FLAG_A | FLAG_B;
                seeds.push(i);
            }
        }
        for &code in &foreign_terminal {
            if let Ok(i) = codes.binary_search(&code) {
                flags[i] = FLAG_FOREIGN;
            }
        }

        // need[i] = number of distinct canonical opponent-successors; a state
        // becomes Type B exactly when the counter is exhausted. Terminals
        // keep 0 and never participate. Out-degree is bounded by the cell
        // count, so 8 bits suffice.
        let opp = winner.other();
        let need: Vec<u8> = (0..codes.len())
            .into_par_iter()
            .map(|i| {
                if flags[i] != 0 {
                    return 0u8;
                }
                let state =
                    decode_state(params, codes[i]).expect("canonical code must decode");
                successors(params, sym, &state, opp).len() as u8
            })
            .collect();

        let mut solver = Self {
            params: *params,
            winner,
            stats: EdgelessStats {
                states: codes.len() as u64,
                seeds: seeds.len() as u64,
                foreign_terminals: foreign_terminal.len() as u64,
                ..EdgelessStats::default()
            },
            codes,
            need,
            flags,
            depth_a,
            depth_b,
        };
        solver.bfs(sym, &seeds, progress);
        solver
    }

    fn bfs(&mut self, sym: &Symmetry, seeds: &[usize], progress: bool) {
        let pb = if progress {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("[{elapsed_precise}] bfs {spinner} {msg}").unwrap(),
            );
            pb.enable_steady_tick(std::time::Duration::from_millis(250));
            pb
        } else {
            ProgressBar::hidden()
        };

        let params = self.params;
        let winner = self.winner;
        let opp = winner.other();

        let mut queue: VecDeque<u32> = seeds.iter().map(|&i| i as u32).collect();
        let mut iters = 0u64;

        while let Some(i) = queue.pop_front() {
            let i = i as usize;
            iters += 1;
            if iters % 1_000_000 == 0 {
                pb.set_message(format!(
                    "processed {iters}, A={}, B={}, queue={}",
                    self.stats.type_a,
                    self.stats.type_b,
                    queue.len()
                ));
            }

            // i is a Type-B state: the winner just moved into it. Its
            // winner-side predecessors gain a winning move.
            let s = decode_state(&params, self.codes[i]).expect("canonical code must decode");
            for p in predecessors(&params, sym, &s, winner) {
                let Ok(j) = self.codes.binary_search(&p) else {
                    continue;
                };
                if self.flags[j] & (FLAG_A | FLAG_FOREIGN) != 0 {
                    continue;
                }
                self.flags[j] |= FLAG_A;
                self.depth_a[j] = self.depth_b[i] + 1;
                self.stats.type_a += 1;

                // Every opponent move from k that reaches j is one less
                // escape for k; when none remain, k is lost for the
                // opponent to move.
                let sj =
                    decode_state(&params, self.codes[j]).expect("canonical code must decode");
                for q in predecessors(&params, sym, &sj, opp) {
                    let Ok(k) = self.codes.binary_search(&q) else {
                        continue;
                    };
                    if self.flags[k] & (FLAG_B | FLAG_FOREIGN) != 0 {
                        continue;
                    }
                    assert!(self.need[k] > 0, "need counter underflow at index {k}");
                    self.need[k] -= 1;
                    if self.need[k] == 0 {
                        self.flags[k] |= FLAG_B;
                        self.depth_b[k] = self.depth_a[j] + 1;
                        self.stats.type_b += 1;
                        queue.push_back(k as u32);
                    }
                }
            }
        }
        pb.finish_and_clear();

        if progress {
            eprintln!(
                "[edgeless] {:?}-win pass done: {} seeds, {} Type A, {} Type B",
                winner, self.stats.seeds, self.stats.type_a, self.stats.type_b
            );
        }
    }

    #[inline]
    pub fn params(&self) -> &Params {
        &self.params
    }

    #[inline]
    pub fn winner(&self) -> Side {
        self.winner
    }

    #[inline]
    pub fn stats(&self) -> EdgelessStats {
        self.stats
    }

    #[inline]
    pub fn state_count(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn lookup(&self, code: u64) -> Option<usize> {
        self.codes.binary_search(&code).ok()
    }

    /// The record for index `i`, or None when the pass left it unlabelled.
    /// Flag slots map onto table fields according to the pass's winner:
    /// the A label belongs to the winner-to-move phase, the B label to the
    /// opponent-to-move phase.
    pub fn record_at(&self, i: usize) -> Option<Record> {
        let f = self.flags[i];
        if f & (FLAG_A | FLAG_B) == 0 {
            return None;
        }
        let sign = self.winner.sign();
        let mut rec = Record {
            code: self.codes[i],
            dp0: 0,
            dp1: 0,
            depth0: 0,
            depth1: 0,
        };
        let (a_set, b_set) = (f & FLAG_A != 0, f & FLAG_B != 0);
        match self.winner {
            Side::X => {
                if a_set {
                    rec.dp0 = sign;
                    rec.depth0 = self.depth_a[i];
                }
                if b_set {
                    rec.dp1 = sign;
                    rec.depth1 = self.depth_b[i];
                }
            }
            Side::Y => {
                if a_set {
                    rec.dp1 = sign;
                    rec.depth1 = self.depth_a[i];
                }
                if b_set {
                    rec.dp0 = sign;
                    rec.depth0 = self.depth_b[i];
                }
            }
        }
        Some(rec)
    }

    /// All labelled states as records, sorted (the code array already is).
    pub fn records(&self) -> Vec<Record> {
        (0..self.codes.len())
            .filter_map(|i| self.record_at(i))
            .collect()
    }

    /// Streams the labelled states to a table file. Returns the record count.
    pub fn write_table<P: AsRef<std::path::Path>>(&self, path: P) -> Result<u64, String> {
        let mut writer = TableWriter::create(path)?;
        for i in 0..self.codes.len() {
            if let Some(rec) = self.record_at(i) {
                writer.push(&rec)?;
            }
        }
        writer.finish()
    }
}

// Explicit-graph mode: materialize both players' forward edges during the
// build, invert them, then run the two retrograde BFS passes. Sized for
// small boards; the edgeless solver covers the large ones.

use std::collections::VecDeque;
use std::hash::BuildHasherDefault;

use hashbrown::{HashMap as HbHashMap, HashSet as HbHashSet};

use crate::code::decode_state;
use crate::moves::successors;
use crate::params::Params;
use crate::persist::Record;
use crate::solver::enumerate::enumerate_canonical;
use crate::symmetry::Symmetry;
use crate::types::Side;

type FastHasher = BuildHasherDefault<ahash::AHasher>;
type FastMap<V> = HbHashMap<u64, V, FastHasher>;
type FastSet = HbHashSet<u64, FastHasher>;

/// Per-state labels: slot 0 is the X-to-move phase, slot 1 the Y-to-move
/// phase. 0 = undetermined, +1 = X wins, -1 = Y wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateInfo {
    pub dp: [i8; 2],
    pub depth: [u16; 2],
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SolveStats {
    pub states: u64,
    pub terminal_x_wins: u64,
    pub terminal_y_wins: u64,
    pub win_updates: u64,
    pub lose_updates: u64,
}

/// The explicit-mode solver aggregate: the state table, both forward edge
/// maps and the terminal seed lists, built once and then solved in place.
pub struct ExplicitSolver {
    params: Params,
    states: FastMap<StateInfo>,
    edge0: FastMap<Vec<u64>>,
    edge1: FastMap<Vec<u64>>,
    wins: Vec<u64>,
    losses: Vec<u64>,
}

impl ExplicitSolver {
    /// Enumerates every canonical state, seeds the terminal labels, and
    /// records one forward edge per distinct canonical successor per mover.
    pub fn build(params: &Params, sym: &Symmetry, progress: bool) -> Self {
        let enumeration = enumerate_canonical(params, sym, progress);

        let terminal: FastSet = enumeration
            .x_terminal
            .iter()
            .chain(enumeration.y_terminal.iter())
            .copied()
            .collect();

        let mut states: FastMap<StateInfo> = FastMap::default();
        states.reserve(enumeration.codes.len());
        for &code in &enumeration.codes {
            states.insert(code, StateInfo::default());
        }
        for &code in &enumeration.x_terminal {
            if let Some(info) = states.get_mut(&code) {
                info.dp = [1, 1];
            }
        }
        for &code in &enumeration.y_terminal {
            if let Some(info) = states.get_mut(&code) {
                info.dp = [-1, -1];
            }
        }

        let mut edge0: FastMap<Vec<u64>> = FastMap::default();
        let mut edge1: FastMap<Vec<u64>> = FastMap::default();
        for &code in &enumeration.codes {
            if terminal.contains(&code) {
                continue;
            }
            let state = decode_state(params, code).expect("canonical code must decode");
            edge0.insert(code, successors(params, sym, &state, Side::X));
            edge1.insert(code, successors(params, sym, &state, Side::Y));
        }

        if progress {
            eprintln!(
                "[explicit] graph built: {} states, {} X-win terminals, {} Y-win terminals",
                states.len(),
                enumeration.x_terminal.len(),
                enumeration.y_terminal.len()
            );
        }

        Self {
            params: *params,
            states,
            edge0,
            edge1,
            wins: enumeration.x_terminal,
            losses: enumeration.y_terminal,
        }
    }

    #[inline]
    pub fn params(&self) -> &Params {
        &self.params
    }

    #[inline]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn info(&self, code: u64) -> Option<StateInfo> {
        self.states.get(&code).copied()
    }

    /// Runs win propagation then loss propagation to fixed point. Each
    /// (state, phase) label is written at most once; FIFO order makes the
    /// recorded depths shortest-path distances.
    pub fn solve(&mut self) -> SolveStats {
        let mut e0r: FastMap<Vec<u64>> = FastMap::default();
        let mut e1r: FastMap<Vec<u64>> = FastMap::default();
        for (&s, targets) in &self.edge0 {
            for &t in targets {
                e0r.entry(t).or_default().push(s);
            }
        }
        for (&s, targets) in &self.edge1 {
            for &t in targets {
                e1r.entry(t).or_default().push(s);
            }
        }

        let mut need: FastMap<[u32; 2]> = FastMap::default();
        need.reserve(self.states.len());
        for &s in self.states.keys() {
            let n0 = self.edge0.get(&s).map_or(0, Vec::len);
            let n1 = self.edge1.get(&s).map_or(0, Vec::len);
            need.insert(s, [n0 as u32, n1 as u32]);
        }

        let mut stats = SolveStats {
            states: self.states.len() as u64,
            terminal_x_wins: self.wins.len() as u64,
            terminal_y_wins: self.losses.len() as u64,
            ..SolveStats::default()
        };

        // Win propagation: X-to-move labels over player-0 reverse edges,
        // Y-to-move labels when a state's every Y move is exhausted.
        let mut queue: VecDeque<u64> = self.wins.iter().copied().collect();
        while let Some(xc) = queue.pop_front() {
            let x_depth1 = self.states.get(&xc).map_or(0, |i| i.depth[1]);
            let Some(preds) = e0r.get(&xc) else {
                continue;
            };
            for &yc in preds {
                let y_depth0 = {
                    let Some(info) = self.states.get_mut(&yc) else {
                        continue;
                    };
                    if info.dp[0] == 1 {
                        continue;
                    }
                    info.dp[0] = 1;
                    info.depth[0] = x_depth1 + 1;
                    info.depth[0]
                };
                stats.win_updates += 1;
                let Some(zpreds) = e1r.get(&yc) else {
                    continue;
                };
                for &zc in zpreds {
                    let Some(n) = need.get_mut(&zc) else {
                        continue;
                    };
                    assert!(n[1] > 0, "need counter underflow at state {zc}");
                    n[1] -= 1;
                    if n[1] == 0 {
                        if let Some(zinfo) = self.states.get_mut(&zc) {
                            zinfo.dp[1] = 1;
                            zinfo.depth[1] = y_depth0 + 1;
                        }
                        stats.win_updates += 1;
                        queue.push_back(zc);
                    }
                }
            }
        }

        // Loss propagation: the mirror, seeded from terminal Y wins.
        let mut queue: VecDeque<u64> = self.losses.iter().copied().collect();
        while let Some(xc) = queue.pop_front() {
            let x_depth0 = self.states.get(&xc).map_or(0, |i| i.depth[0]);
            let Some(preds) = e1r.get(&xc) else {
                continue;
            };
            for &yc in preds {
                let y_depth1 = {
                    let Some(info) = self.states.get_mut(&yc) else {
                        continue;
                    };
                    if info.dp[1] == -1 {
                        continue;
                    }
                    info.dp[1] = -1;
                    info.depth[1] = x_depth0 + 1;
                    info.depth[1]
                };
                stats.lose_updates += 1;
                let Some(zpreds) = e0r.get(&yc) else {
                    continue;
                };
                for &zc in zpreds {
                    let Some(n) = need.get_mut(&zc) else {
                        continue;
                    };
                    assert!(n[0] > 0, "need counter underflow at state {zc}");
                    n[0] -= 1;
                    if n[0] == 0 {
                        if let Some(zinfo) = self.states.get_mut(&zc) {
                            zinfo.dp[0] = -1;
                            zinfo.depth[0] = y_depth1 + 1;
                        }
                        stats.lose_updates += 1;
                        queue.push_back(zc);
                    }
                }
            }
        }

        stats
    }

    /// All states as records, sorted ascending by canonical code.
    pub fn records(&self) -> Vec<Record> {
        let mut codes: Vec<u64> = self.states.keys().copied().collect();
        codes.sort_unstable();
        codes
            .into_iter()
            .map(|code| {
                let info = self.states.get(&code).copied().unwrap_or_default();
                Record {
                    code,
                    dp0: info.dp[0],
                    dp1: info.dp[1],
                    depth0: info.depth[0],
                    depth1: info.depth[1],
                }
            })
            .collect()
    }
}

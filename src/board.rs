use crate::params::Params;
use crate::state::State;

pub const MAX_CELLS: usize = 256;

// Line orientations scanned from a piece: vertical, horizontal, both
// diagonals. Each is walked in both directions.
const DIR_R: [i16; 4] = [-1, 0, -1, -1];
const DIR_C: [i16; 4] = [0, -1, -1, 1];

/// An n x n occupancy grid materialized from a state's sequences.
/// Cells hold +1 for X, -1 for Y, 0 for empty.
pub struct Grid {
    n: i16,
    cells: [i8; MAX_CELLS],
}

impl Grid {
    pub fn from_state(params: &Params, state: &State) -> Self {
        let mut cells = [0i8; MAX_CELLS];
        for &p in state.x.as_slice() {
            cells[p as usize] = 1;
        }
        for &p in state.y.as_slice() {
            cells[p as usize] = -1;
        }
        Self {
            n: i16::from(params.n()),
            cells,
        }
    }

    #[inline]
    pub fn get(&self, idx: u8) -> i8 {
        self.cells[idx as usize]
    }

    #[inline]
    pub fn is_empty(&self, idx: u8) -> bool {
        self.cells[idx as usize] == 0
    }

    /// True when a run of at least `m` same-colour cells in some orientation
    /// passes through `pos`. Walks up to m-1 steps away on each side.
    pub fn line_through(&self, pos: u8, m: u8) -> bool {
        let n = self.n;
        let val = self.cells[pos as usize];
        if val == 0 {
            return false;
        }
        let (r, c) = (i16::from(pos) / n, i16::from(pos) % n);
        for d in 0..4 {
            let mut run = 1u8;
            for sign in [1i16, -1i16] {
                let (mut r_, mut c_) = (r, c);
                for _ in 0..m - 1 {
                    r_ += sign * DIR_R[d];
                    c_ += sign * DIR_C[d];
                    if r_ < 0 || r_ >= n || c_ < 0 || c_ >= n {
                        break;
                    }
                    if self.cells[(r_ * n + c_) as usize] != val {
                        break;
                    }
                    run += 1;
                }
            }
            if run >= m {
                return true;
            }
        }
        false
    }
}

/// Terminal classification: +1 when X's oldest piece lies on a completed
/// m-line, -1 for Y, 0 otherwise. X is checked first.
///
/// A side is only inspected once it holds at least m-1 pieces. A winner
/// always holds exactly m aligned pieces, so the guard never masks a
/// terminal; it is derived from the budget rather than fixed per variant.
pub fn terminal_result(params: &Params, state: &State) -> i8 {
    let grid = Grid::from_state(params, state);
    let guard = params.budget().saturating_sub(1);
    if state.x.len() >= guard {
        if let Some(p0) = state.x.first() {
            if grid.line_through(p0, params.m()) {
                return 1;
            }
        }
    }
    if state.y.len() >= guard {
        if let Some(p0) = state.y.first() {
            if grid.line_through(p0, params.m()) {
                return -1;
            }
        }
    }
    0
}

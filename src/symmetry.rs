use crate::code::encode_state;
use crate::params::Params;
use crate::state::{Seq, State};
use crate::types::idx_to_rc;

pub const TRANSFORM_COUNT: usize = 8;

/// The eight symmetries of the square, as position permutations of the
/// row-major n x n board. Fixed order: identity, the three rotations, then
/// the horizontal, vertical, main-diagonal and anti-diagonal reflections.
pub struct Symmetry {
    n: u8,
    maps: [[u8; 256]; TRANSFORM_COUNT],
}

impl Symmetry {
    pub fn new(n: u8) -> Self {
        let mut maps = [[0u8; 256]; TRANSFORM_COUNT];
        let k = n - 1;
        for idx in 0..n * n {
            let (r, c) = idx_to_rc(idx, n);
            let images = [
                (r, c),
                (c, k - r),
                (k - r, k - c),
                (k - c, r),
                (r, k - c),
                (k - r, c),
                (c, r),
                (k - c, k - r),
            ];
            for (t, &(tr, tc)) in images.iter().enumerate() {
                maps[t][idx as usize] = tr * n + tc;
            }
        }
        Self { n, maps }
    }

    #[inline]
    pub fn n(&self) -> u8 {
        self.n
    }

    #[inline]
    pub fn apply(&self, transform: usize, cell: u8) -> u8 {
        self.maps[transform][cell as usize]
    }

    /// Applies a transform element-wise, preserving insertion order.
    pub fn apply_seq(&self, transform: usize, seq: &Seq) -> Seq {
        let mut out = Seq::empty();
        for &p in seq.as_slice() {
            out.push_back(self.apply(transform, p));
        }
        out
    }

    pub fn apply_state(&self, transform: usize, state: &State) -> State {
        State::new(
            self.apply_seq(transform, &state.x),
            self.apply_seq(transform, &state.y),
        )
    }

    /// The canonical representative: the image with the numerically smallest
    /// state code. Tying transforms produce identical codes, so the first
    /// transform index wins deterministically.
    pub fn canonicalize(&self, params: &Params, state: &State) -> Canonical {
        let mut best = Canonical {
            code: u64::MAX,
            state: *state,
            transform: 0,
        };
        for t in 0..TRANSFORM_COUNT {
            let image = self.apply_state(t, state);
            let code = encode_state(params, &image);
            if code < best.code {
                best = Canonical {
                    code,
                    state: image,
                    transform: t as u8,
                };
            }
        }
        best
    }

    /// Canonical code only, for callers that discard the representative.
    pub fn canonical_code(&self, params: &Params, state: &State) -> u64 {
        let mut best = u64::MAX;
        for t in 0..TRANSFORM_COUNT {
            let code = encode_state(params, &self.apply_state(t, state));
            if code < best {
                best = code;
            }
        }
        best
    }

    /// Cells that are the numerically smallest member of their orbit under
    /// the group. The canonical form of any state maps its newest X piece to
    /// one of these, which is what makes the enumeration's first-digit prune
    /// a complete cover.
    pub fn orbit_representatives(&self) -> Vec<u8> {
        let cells = self.n * self.n;
        let mut reps = Vec::new();
        for cell in 0..cells {
            let min = (0..TRANSFORM_COUNT)
                .map(|t| self.apply(t, cell))
                .min()
                .unwrap_or(cell);
            if min == cell {
                reps.push(cell);
            }
        }
        reps
    }
}

/// Result of canonicalization: the minimum code, the transformed state that
/// produced it, and which transform was chosen.
#[derive(Debug, Clone, Copy)]
pub struct Canonical {
    pub code: u64,
    pub state: State,
    pub transform: u8,
}

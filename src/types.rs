use serde::{Deserialize, Serialize};

/// The two players. `X` owns the first move of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    X,
    Y,
}

impl Side {
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Side::X => Side::Y,
            Side::Y => Side::X,
        }
    }

    /// Label slot for this side-to-move phase: 0 for X, 1 for Y.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::X => 0,
            Side::Y => 1,
        }
    }

    /// Outcome sign carried in labels: +1 for an X win, -1 for a Y win.
    #[inline]
    pub fn sign(self) -> i8 {
        match self {
            Side::X => 1,
            Side::Y => -1,
        }
    }
}

/// Board indexing helpers (n x n board, row-major)
#[inline]
pub fn idx_to_rc(idx: u8, n: u8) -> (u8, u8) {
    debug_assert!(idx < n * n);
    (idx / n, idx % n)
}

#[inline]
pub fn rc_to_idx(r: u8, c: u8, n: u8) -> Option<u8> {
    if r < n && c < n {
        Some(r * n + c)
    } else {
        None
    }
}

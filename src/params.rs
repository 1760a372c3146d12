use serde::{Deserialize, Serialize};

use crate::state::MAX_BUDGET;

/// Solving-run parameters: board side `n`, per-side piece budget `m` (which
/// is also the alignment length required to win), and the digit base `b` of
/// the positional encoding.
///
/// Derived constants are computed once and validated at construction:
/// `cells = n*n` and `separator = b^m`, the factor that packs two single-side
/// codes into one state code. Any combination whose state codes would not fit
/// in a `u64` is rejected up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    n: u8,
    m: u8,
    base: u64,
    cells: u8,
    separator: u64,
}

impl Params {
    pub fn new(n: u8, m: u8, base: u64) -> Result<Self, String> {
        if n < 2 {
            return Err(format!("board side must be at least 2, got {n}"));
        }
        let wide_cells = u16::from(n) * u16::from(n);
        let Ok(cells) = u8::try_from(wide_cells) else {
            return Err(format!(
                "board of {wide_cells} cells exceeds the supported 255"
            ));
        };
        if m == 0 || m as usize > MAX_BUDGET {
            return Err(format!("piece budget must be in 1..={MAX_BUDGET}, got {m}"));
        }
        if m > cells {
            return Err(format!("piece budget {m} exceeds cell count {cells}"));
        }
        if base < u64::from(cells) + 1 {
            return Err(format!(
                "base {base} too small: must be at least cells + 1 = {}",
                u64::from(cells) + 1
            ));
        }
        let separator = base
            .checked_pow(u32::from(m))
            .ok_or_else(|| format!("separator {base}^{m} overflows u64"))?;
        // The largest state code is separator^2 - 1; it must be representable.
        separator
            .checked_mul(separator)
            .ok_or_else(|| format!("state code space {base}^{} overflows u64", 2 * u32::from(m)))?;
        Ok(Self {
            n,
            m,
            base,
            cells,
            separator,
        })
    }

    /// The conventional base: one digit value per cell plus the zero sentinel.
    pub fn with_default_base(n: u8, m: u8) -> Result<Self, String> {
        let cells = u64::from(n) * u64::from(n);
        Self::new(n, m, cells + 1)
    }

    #[inline]
    pub fn n(&self) -> u8 {
        self.n
    }

    #[inline]
    pub fn m(&self) -> u8 {
        self.m
    }

    #[inline]
    pub fn base(&self) -> u64 {
        self.base
    }

    #[inline]
    pub fn cells(&self) -> u8 {
        self.cells
    }

    #[inline]
    pub fn separator(&self) -> u64 {
        self.separator
    }

    #[inline]
    pub fn budget(&self) -> usize {
        self.m as usize
    }
}

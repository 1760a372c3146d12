use crate::params::Params;
use crate::state::{Seq, State};

/// Encodes a sequence as `sum((p_i + 1) * base^i)`. The +1 shift reserves the
/// zero digit as a sentinel, so the empty sequence encodes to 0 and no legal
/// code has a zero digit below its most significant one.
pub fn encode_seq(params: &Params, seq: &Seq) -> u64 {
    let mut code = 0u64;
    let mut place = 1u64;
    for &p in seq.as_slice() {
        code += (u64::from(p) + 1) * place;
        place *= params.base();
    }
    code
}

/// Packs both sides into one state code: `code(x) * separator + code(y)`.
#[inline]
pub fn encode_state(params: &Params, state: &State) -> u64 {
    encode_seq(params, &state.x) * params.separator() + encode_seq(params, &state.y)
}

/// Inverse of [`encode_seq`]. Returns `None` for any code that is not the
/// image of a legal sequence: a zero digit below the most significant one,
/// a position outside the board, a repeated position, or more digits than
/// the piece budget.
pub fn decode_seq(params: &Params, mut code: u64) -> Option<Seq> {
    let mut seq = Seq::empty();
    while code > 0 {
        let digit = code % params.base();
        if digit == 0 {
            return None;
        }
        let pos = digit - 1;
        if pos >= u64::from(params.cells()) {
            return None;
        }
        let pos = pos as u8;
        if seq.contains(pos) || seq.len() >= params.budget() {
            return None;
        }
        seq.push_back(pos);
        code /= params.base();
    }
    Some(seq)
}

/// Inverse of [`encode_state`]: splits on the separator and decodes both
/// sides. Length pairing and disjointness are state-level properties checked
/// by callers that require them.
pub fn decode_state(params: &Params, code: u64) -> Option<State> {
    let x = decode_seq(params, code / params.separator())?;
    let y = decode_seq(params, code % params.separator())?;
    Some(State::new(x, y))
}

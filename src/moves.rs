use crate::board::Grid;
use crate::code::decode_state;
use crate::params::Params;
use crate::state::State;
use crate::symmetry::Symmetry;
use crate::types::Side;

// Result lists are tiny (at most one per empty cell); a linear scan beats a
// set for deduplication at this size.
#[inline]
fn push_unique(out: &mut Vec<u64>, code: u64) {
    if !out.contains(&code) {
        out.push(code);
    }
}

// Post-canonicalization legality: the successor must decode, pair its
// lengths, and keep the sides disjoint.
fn legal_successor(params: &Params, code: u64) -> bool {
    match decode_state(params, code) {
        Some(s) => s.lengths_legal() && s.disjoint(),
        None => false,
    }
}

/// Canonical codes of the states reached when `side` places a piece on some
/// empty cell of `state`, under the budget rule (a placement at capacity
/// evicts the oldest piece). Distinct target cells may collapse to the same
/// canonical successor; the result is deduplicated. Successors that would
/// break the length pairing are dropped.
pub fn successors(params: &Params, sym: &Symmetry, state: &State, side: Side) -> Vec<u64> {
    let grid = Grid::from_state(params, state);
    let budget = params.budget();
    let mut out = Vec::new();
    for cell in 0..params.cells() {
        if !grid.is_empty(cell) {
            continue;
        }
        let next = match side {
            Side::X => State::new(state.x.pushed_evicting(cell, budget), state.y),
            Side::Y => State::new(state.x, state.y.pushed_evicting(cell, budget)),
        };
        let legal = match side {
            Side::X => next.x.len() <= state.y.len() + 1,
            Side::Y => state.x.len() >= next.y.len(),
        };
        if !legal {
            continue;
        }
        let code = sym.canonical_code(params, &next);
        if legal_successor(params, code) {
            push_unique(&mut out, code);
        }
    }
    out
}

/// Canonical codes of the states from which one `side` placement reaches
/// `state`. Two shapes exist:
/// - no overflow: the newest piece is removed (for X only when |X| > |Y|,
///   the pre-state would otherwise break the length pairing);
/// - overflow: the sequence was at capacity, so some evicted piece is
///   restored at the front on any currently empty cell and the newest
///   piece is removed.
///
/// Synthesized shapes are deduplicated after canonicalization. Codes of
/// shapes that were never enumerated (illegal pairings) may appear; callers
/// filter them by table lookup.
pub fn predecessors(params: &Params, sym: &Symmetry, state: &State, side: Side) -> Vec<u64> {
    let own = state.seq(side);
    if own.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::new();

    let plain = match side {
        Side::X if state.x.len() > state.y.len() => {
            Some(State::new(state.x.dropped_last(), state.y))
        }
        Side::X => None,
        Side::Y => Some(State::new(state.x, state.y.dropped_last())),
    };
    if let Some(prev) = plain {
        push_unique(&mut out, sym.canonical_code(params, &prev));
    }

    if own.len() == params.budget() {
        let grid = Grid::from_state(params, state);
        for fallen in 0..params.cells() {
            if !grid.is_empty(fallen) {
                continue;
            }
            let prev = match side {
                Side::X => State::new(state.x.with_front_restored(fallen), state.y),
                Side::Y => State::new(state.x, state.y.with_front_restored(fallen)),
            };
            push_unique(&mut out, sym.canonical_code(params, &prev));
        }
    }
    out
}

use fadeline::solver::enumerate_canonical;
use fadeline::{
    decode_state, predecessors, successors, Params, Seq, Side, State, Symmetry,
};

fn params_3x3() -> Params {
    Params::with_default_base(3, 3).expect("3x3 params")
}

#[test]
fn placement_at_capacity_evicts_the_oldest() {
    let s = Seq::from_slice(&[0, 1, 5]);
    let pushed = s.pushed_evicting(7, 3);
    assert_eq!(pushed.as_slice(), &[1, 5, 7]);
    let not_full = Seq::from_slice(&[0, 1]).pushed_evicting(7, 3);
    assert_eq!(not_full.as_slice(), &[0, 1, 7]);
}

#[test]
fn successor_counts_respect_length_pairing() {
    let p = params_3x3();
    let sym = Symmetry::new(p.n());
    // |X| = |Y| + 1: X placing again is only legal through the overflow
    // branch, which is unavailable below capacity
    let state = State::new(Seq::from_slice(&[0, 5]), Seq::from_slice(&[3]));
    assert!(successors(&p, &sym, &state, Side::X).is_empty());
    assert!(!successors(&p, &sym, &state, Side::Y).is_empty());
    // at capacity the lengths stay put, so X may move from a 3-2 state
    let full = State::new(Seq::from_slice(&[0, 1, 5]), Seq::from_slice(&[3, 4]));
    assert!(!successors(&p, &sym, &full, Side::X).is_empty());
}

#[test]
fn predecessor_branches_cover_plain_and_overflow_shapes() {
    let p = params_3x3();
    let sym = Symmetry::new(p.n());
    let state = State::new(Seq::from_slice(&[1, 5, 2]), Seq::from_slice(&[3, 4]));
    let preds = predecessors(&p, &sym, &state, Side::X);

    // plain branch: the newest X piece removed
    let plain = State::new(Seq::from_slice(&[1, 5]), Seq::from_slice(&[3, 4]));
    assert!(preds.contains(&sym.canonical_code(&p, &plain)));

    // overflow branch: an evicted piece restored on an empty cell
    let restored = State::new(Seq::from_slice(&[0, 1, 5]), Seq::from_slice(&[3, 4]));
    assert!(preds.contains(&sym.canonical_code(&p, &restored)));

    // the restored cell must be empty in the current state
    let occupied = State::new(Seq::from_slice(&[3, 1, 5]), Seq::from_slice(&[3, 4]));
    assert!(!preds.contains(&sym.canonical_code(&p, &occupied)));
}

#[test]
fn no_x_predecessor_when_lengths_are_equal_below_capacity() {
    let p = params_3x3();
    let sym = Symmetry::new(p.n());
    // 1-1 state: removing the only X yields |X| < |Y|, and the overflow
    // branch needs a full sequence
    let state = State::new(Seq::from_slice(&[4]), Seq::from_slice(&[0]));
    assert!(predecessors(&p, &sym, &state, Side::X).is_empty());
    assert_eq!(predecessors(&p, &sym, &state, Side::Y).len(), 1);
}

#[test]
fn distinct_fallen_cells_may_collapse_after_canonicalization() {
    let p = params_3x3();
    let sym = Symmetry::new(p.n());
    // a symmetric position: several restored cells are images of each other
    let state = State::new(Seq::from_slice(&[1, 3, 4]), Seq::from_slice(&[0, 8]));
    let preds = predecessors(&p, &sym, &state, Side::X);
    let empties = 9 - 5;
    assert!(preds.len() <= 1 + empties);
    let mut sorted = preds.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), preds.len(), "predecessors must be deduplicated");
}

#[test]
fn successors_and_predecessors_are_dual_over_the_enumeration() {
    let p = params_3x3();
    let sym = Symmetry::new(p.n());
    let enumeration = enumerate_canonical(&p, &sym, false);
    let codes = &enumeration.codes;

    for &code in codes.iter().step_by(97) {
        let state = decode_state(&p, code).expect("canonical code decodes");
        for side in [Side::X, Side::Y] {
            for succ in successors(&p, &sym, &state, side) {
                assert!(
                    codes.binary_search(&succ).is_ok(),
                    "successor {succ} of {code} missing from the enumeration"
                );
                let succ_state = decode_state(&p, succ).expect("successor decodes");
                assert!(
                    predecessors(&p, &sym, &succ_state, side).contains(&code),
                    "move {code} -> {succ} has no matching predecessor"
                );
            }
            for pred in predecessors(&p, &sym, &state, side) {
                if codes.binary_search(&pred).is_err() {
                    continue; // synthesized shape outside the legal space
                }
                let pred_state = decode_state(&p, pred).expect("predecessor decodes");
                assert!(
                    successors(&p, &sym, &pred_state, side).contains(&code),
                    "undo {code} -> {pred} has no matching forward move"
                );
            }
        }
    }
}

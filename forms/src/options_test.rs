use super::*;

fn catalog() -> Vec<Candidate> {
    vec![Candidate::new(1, "Water 1.5L"), Candidate::new(2, "Water 0.5L"), Candidate::new(3, "Juice")]
}

fn row(key: u64, selection: Option<i64>) -> Row {
    let mut row = Row::blank(RowKey(key));
    row.selection = selection.map(CandidateId);
    row
}

fn ids(options: &[&Candidate]) -> Vec<i64> {
    options.iter().map(|candidate| candidate.id.0).collect()
}

#[test]
fn empty_rows_offer_every_candidate_in_order() {
    let candidates = catalog();
    let options = available_options(&[], &candidates, RowKey(0));
    assert_eq!(ids(&options), vec![1, 2, 3]);
}

#[test]
fn other_rows_selections_are_excluded() {
    let candidates = catalog();
    let rows = vec![row(0, Some(2)), row(1, None)];
    assert_eq!(ids(&available_options(&rows, &candidates, RowKey(1))), vec![1, 3]);
}

#[test]
fn own_selection_stays_visible() {
    let candidates = catalog();
    let rows = vec![row(0, Some(2)), row(1, Some(3))];
    assert_eq!(ids(&available_options(&rows, &candidates, RowKey(0))), vec![1, 2]);
    assert_eq!(ids(&available_options(&rows, &candidates, RowKey(1))), vec![1, 3]);
}

#[test]
fn own_selection_survives_a_duplicate_held_elsewhere() {
    let candidates = catalog();
    let rows = vec![row(0, Some(1)), row(1, Some(1))];
    assert_eq!(ids(&available_options(&rows, &candidates, RowKey(1))), vec![1, 2, 3]);
}

#[test]
fn unselected_rows_do_not_block_anything() {
    let candidates = catalog();
    let rows = vec![row(0, None), row(1, None), row(2, None)];
    assert_eq!(ids(&available_options(&rows, &candidates, RowKey(0))), vec![1, 2, 3]);
}

#[test]
fn unknown_key_sees_only_unused_candidates() {
    let candidates = catalog();
    let rows = vec![row(0, Some(1))];
    assert_eq!(ids(&available_options(&rows, &candidates, RowKey(99))), vec![2, 3]);
}

#[test]
fn unused_candidates_excludes_every_selection() {
    let candidates = catalog();
    let rows = vec![row(0, Some(3)), row(1, Some(1))];
    assert_eq!(ids(&unused_candidates(&rows, &candidates)), vec![2]);
}

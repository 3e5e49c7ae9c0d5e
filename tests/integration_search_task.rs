use assert_matches::assert_matches;
use foolcools::search::{generate, parse_targets, SearchTask, DEFAULT_ROW_WIDTH};
use foolcools::FocusError;
use rand::{rngs::StdRng, SeedableRng};

#[test]
fn custom_targets_round_through_a_seeded_grid() {
    let targets = parse_targets("Q, 7, z").unwrap();
    assert_eq!(targets, vec!['q', '7', 'z']);

    let mut rng = StdRng::seed_from_u64(42);
    let grid = generate(&mut rng, 60, DEFAULT_ROW_WIDTH, &targets).unwrap();
    assert_eq!(grid.len(), 60);
    assert_eq!(grid.row_count(), 4);

    let mut task = SearchTask::from_grid(grid, &targets).unwrap();

    // a wrong pick does not count and can be undone
    let filler = (0..task.grid().row_count())
        .flat_map(|r| (0..task.grid().row_len(r)).map(move |c| (r, c)))
        .find(|&(r, c)| !task.is_target(task.grid().cell(r, c).unwrap()))
        .unwrap();
    let outcome = task.toggle_cell(filler.0, filler.1).unwrap();
    assert!(outcome.is_now_selected);
    assert_eq!(outcome.correct_count, 0);
    assert!(!task.toggle_cell(filler.0, filler.1).unwrap().is_now_selected);

    let positions: Vec<(usize, usize)> = targets
        .iter()
        .map(|&t| {
            let found = task.grid().positions_of(t);
            assert_eq!(found.len(), 1);
            found[0]
        })
        .collect();

    for (i, &(r, c)) in positions.iter().enumerate() {
        let outcome = task.toggle_cell(r, c).unwrap();
        assert_eq!(outcome.correct_count, i + 1);
        assert_eq!(outcome.is_task_complete, i + 1 == targets.len());
    }

    // latched: deselecting after completion is ignored
    let (r, c) = positions[0];
    let outcome = task.toggle_cell(r, c).unwrap();
    assert!(outcome.is_now_selected);
    assert!(outcome.is_task_complete);
    assert_eq!(task.correct_count(), 3);
}

#[test]
fn out_of_range_cells_are_rejected() {
    let mut task = SearchTask::new(&['f', 'c']).unwrap();
    assert_matches!(
        task.toggle_cell(10, 0),
        Err(FocusError::CellOutOfRange { row: 10, col: 0 })
    );
    assert_matches!(
        task.toggle_cell(0, 15),
        Err(FocusError::CellOutOfRange { row: 0, col: 15 })
    );
    assert!(task.selections().is_empty());
}

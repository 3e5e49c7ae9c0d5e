//! Letter-search warm-up: a character grid hiding each target letter once.

use itertools::Itertools;
use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::error::{FocusError, Result};

pub const DEFAULT_GRID_LENGTH: usize = 150;
pub const DEFAULT_ROW_WIDTH: usize = 15;
pub const DEFAULT_TARGETS: [char; 2] = ['f', 'c'];

/// Characters a grid may contain; filler draws from this minus the targets
pub const BASE_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

/// (row, column) coordinates the user has toggled on
pub type SelectionSet = HashSet<(usize, usize)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchGrid {
    rows: Vec<Vec<char>>,
}

impl SearchGrid {
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.as_ref().chars().collect())
                .collect(),
        }
    }

    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row_len(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, Vec::len)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<char> {
        self.rows.get(row)?.get(col).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn row_strings(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.iter().collect()).collect()
    }

    pub fn concatenated(&self) -> String {
        self.rows.iter().flatten().collect()
    }

    pub fn positions_of(&self, c: char) -> Vec<(usize, usize)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .filter(move |&(_, &ch)| ch == c)
                    .map(move |(col, _)| (r, col))
            })
            .collect()
    }
}

/// Parse a target list such as `"fc"` or `"f, c"` into distinct letters
pub fn parse_targets(input: &str) -> Result<Vec<char>> {
    let targets: Vec<char> = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .flat_map(char::to_lowercase)
        .collect();

    if targets.is_empty() {
        return Err(FocusError::InvalidTarget(input.to_string()));
    }
    validate_targets(&targets)?;
    // the default grid is always longer than the target list, so it needs filler
    if filler_alphabet(&targets).is_empty() {
        return Err(FocusError::InvalidArgument(
            "target letters must leave at least one filler character".to_string(),
        ));
    }
    Ok(targets)
}

fn validate_targets(targets: &[char]) -> Result<()> {
    let mut seen = HashSet::new();
    for &t in targets {
        if !BASE_ALPHABET.contains(t) {
            return Err(FocusError::InvalidTarget(t.to_string()));
        }
        if !seen.insert(t) {
            return Err(FocusError::DuplicateTarget(t));
        }
    }
    Ok(())
}

pub fn filler_alphabet(targets: &[char]) -> Vec<char> {
    BASE_ALPHABET
        .chars()
        .filter(|c| !targets.contains(c))
        .collect()
}

/// Build a grid of `total_length` characters split into rows of `row_width`.
///
/// Filler is drawn uniformly from [`filler_alphabet`]; each target is then
/// spliced in, in order, at a uniformly random index of the growing string.
/// The last row is shorter when `total_length` is not a multiple of the width.
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    total_length: usize,
    row_width: usize,
    targets: &[char],
) -> Result<SearchGrid> {
    if row_width == 0 {
        return Err(FocusError::InvalidArgument(
            "row width must be positive".to_string(),
        ));
    }
    if total_length < targets.len() {
        return Err(FocusError::NotEnoughRoom {
            total_length,
            targets: targets.len(),
        });
    }
    validate_targets(targets)?;

    let filler_len = total_length - targets.len();
    let alphabet = filler_alphabet(targets);
    if alphabet.is_empty() && filler_len > 0 {
        return Err(FocusError::InvalidArgument(
            "no filler characters left after excluding targets".to_string(),
        ));
    }

    let mut chars: Vec<char> = (0..filler_len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect();

    for &target in targets {
        let idx = rng.gen_range(0..=chars.len());
        chars.insert(idx, target);
    }

    let rows = chars
        .chunks(row_width)
        .map(<[char]>::to_vec)
        .collect::<Vec<_>>();

    debug!(
        total_length,
        row_width,
        targets = %targets.iter().join(""),
        rows = rows.len(),
        "search grid generated"
    );
    Ok(SearchGrid { rows })
}

/// [`generate`] with the default 150-character, 15-wide layout
pub fn generate_search_grid(targets: &[char]) -> Result<SearchGrid> {
    generate(
        &mut rand::thread_rng(),
        DEFAULT_GRID_LENGTH,
        DEFAULT_ROW_WIDTH,
        targets,
    )
}

/// Number of selected cells whose character is one of `targets`
pub fn score(grid: &SearchGrid, selections: &SelectionSet, targets: &[char]) -> usize {
    selections
        .iter()
        .filter_map(|&(row, col)| grid.cell(row, col))
        .filter(|c| targets.contains(c))
        .count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub is_now_selected: bool,
    pub correct_count: usize,
    pub is_task_complete: bool,
}

/// One round of the warm-up: a grid, its targets and the user's selections.
///
/// Completion latches. Once every target has been found, further toggles
/// leave the selection untouched and just report the current state.
#[derive(Debug, Clone)]
pub struct SearchTask {
    grid: SearchGrid,
    targets: Vec<char>,
    selections: SelectionSet,
    completed: bool,
}

impl SearchTask {
    pub fn new(targets: &[char]) -> Result<Self> {
        let grid = generate_search_grid(targets)?;
        Self::from_grid(grid, targets)
    }

    pub fn from_grid(grid: SearchGrid, targets: &[char]) -> Result<Self> {
        if targets.is_empty() {
            return Err(FocusError::InvalidArgument(
                "search task needs at least one target letter".to_string(),
            ));
        }
        validate_targets(targets)?;

        Ok(Self {
            grid,
            targets: targets.to_vec(),
            selections: SelectionSet::new(),
            completed: false,
        })
    }

    pub fn grid(&self) -> &SearchGrid {
        &self.grid
    }

    pub fn targets(&self) -> &[char] {
        &self.targets
    }

    pub fn selections(&self) -> &SelectionSet {
        &self.selections
    }

    pub fn is_selected(&self, row: usize, col: usize) -> bool {
        self.selections.contains(&(row, col))
    }

    pub fn is_target(&self, c: char) -> bool {
        self.targets.contains(&c)
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    pub fn correct_count(&self) -> usize {
        score(&self.grid, &self.selections, &self.targets)
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn toggle_cell(&mut self, row: usize, col: usize) -> Result<ToggleOutcome> {
        if self.grid.cell(row, col).is_none() {
            return Err(FocusError::CellOutOfRange { row, col });
        }

        if !self.completed && !self.selections.remove(&(row, col)) {
            self.selections.insert((row, col));
        }

        let correct_count = self.correct_count();
        if !self.completed && correct_count >= self.target_count() {
            self.completed = true;
            info!(
                selections = self.selections.len(),
                "search task complete"
            );
        }

        Ok(ToggleOutcome {
            is_now_selected: self.is_selected(row, col),
            correct_count,
            is_task_complete: self.completed,
        })
    }
}

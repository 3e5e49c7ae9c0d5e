//! Error types for the focus session and search task core.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FocusError>;

/// Invalid-argument conditions reported by the library.
///
/// Nothing in the core performs I/O, so every variant describes a caller
/// supplying something the timers or the grid generator cannot honor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FocusError {
    #[error("focus duration must be at least one minute, got {0}")]
    InvalidDuration(u32),

    #[error("grid of length {total_length} cannot hold {targets} target letters")]
    NotEnoughRoom { total_length: usize, targets: usize },

    #[error("target letter '{0}' appears more than once")]
    DuplicateTarget(char),

    #[error("invalid target letter {0:?}")]
    InvalidTarget(String),

    #[error("cell ({row}, {col}) is outside the grid")]
    CellOutOfRange { row: usize, col: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FocusError::InvalidDuration(0).to_string(),
            "focus duration must be at least one minute, got 0"
        );
        assert_eq!(
            FocusError::NotEnoughRoom {
                total_length: 1,
                targets: 2
            }
            .to_string(),
            "grid of length 1 cannot hold 2 target letters"
        );
        assert_eq!(
            FocusError::CellOutOfRange { row: 3, col: 20 }.to_string(),
            "cell (3, 20) is outside the grid"
        );
    }
}

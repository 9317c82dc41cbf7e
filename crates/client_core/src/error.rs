//! User-facing failures surfaced in the controller's error slot.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("Failed to fetch todos")]
    Load,
    #[error("Failed to add todo")]
    Add,
    #[error("Failed to update todo")]
    Save,
    #[error("Failed to update todo status")]
    Toggle,
    #[error("Failed to delete todo")]
    Delete,
    #[error("Title must be 128 characters or fewer")]
    TitleTooLong,
}

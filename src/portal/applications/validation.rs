//! Pre-persistence validation of university selections.

use std::collections::HashSet;

use super::domain::UniversitySelection;

/// Hard cap on the number of universities per application.
pub const MAX_SELECTIONS: usize = 5;

/// First rule violated by a proposed selection list. Messages are surfaced
/// to the student verbatim, never raised as a panic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("select at least one university")]
    Empty,
    #[error("maximum {limit} universities allowed")]
    TooMany { limit: usize },
    #[error("select an intake for {university}")]
    MissingIntake { university: String },
    #[error("{university} is already in your selection")]
    Duplicate { university: String },
}

/// Validate a proposed selection list, reporting only the first violation.
pub fn validate_selections(selections: &[UniversitySelection]) -> Result<(), SelectionError> {
    if selections.is_empty() {
        return Err(SelectionError::Empty);
    }

    if selections.len() > MAX_SELECTIONS {
        return Err(SelectionError::TooMany {
            limit: MAX_SELECTIONS,
        });
    }

    if let Some(missing) = selections.iter().find(|selection| !selection.has_intake()) {
        return Err(SelectionError::MissingIntake {
            university: missing.university_name.clone(),
        });
    }

    // Duplicates are keyed on the university alone: two different programs
    // at the same university still count as the same pick here.
    let mut seen = HashSet::new();
    for selection in selections {
        if !seen.insert(selection.university_id.as_str()) {
            return Err(SelectionError::Duplicate {
                university: selection.university_name.clone(),
            });
        }
    }

    Ok(())
}

/// Reassign priorities as dense 1-based ranks matching list order.
pub fn rerank_priorities(selections: &mut [UniversitySelection]) {
    for (index, selection) in selections.iter_mut().enumerate() {
        selection.priority = (index + 1) as u8;
    }
}

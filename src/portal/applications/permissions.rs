//! Affordance gates derived from application state.
//!
//! These decide whether the portal surfaces an action; the backend remains
//! the authority on legal transitions and may still reject a call the UI
//! permitted. The service layer re-runs the same gates before mutating.

use super::domain::{ApplicationStatus, UniversitySelection};

/// Minimum profile-completion percentage required before submission.
pub const SUBMISSION_ELIGIBILITY_FLOOR: u8 = 85;

/// True while the student can still change profile, notes, and selections.
pub const fn can_edit(status: ApplicationStatus) -> bool {
    matches!(
        status,
        ApplicationStatus::Draft | ApplicationStatus::InReview
    )
}

/// True once offers may be accepted or rejected.
pub const fn can_manage_offers(status: ApplicationStatus) -> bool {
    matches!(
        status,
        ApplicationStatus::OffersReceived | ApplicationStatus::Accepted
    )
}

/// Reasons a submission is refused. Variants are declared in check order;
/// the message is shown to the student verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionBlock {
    #[error("application already submitted")]
    AlreadySubmitted,
    #[error("profile completion {actual}% is below the required {required}%")]
    ProfileIncomplete { required: u8, actual: u8 },
    #[error("no universities selected")]
    NoSelections,
    #[error("no intake selected for {university}")]
    MissingIntake { university: String },
}

/// Inputs the submit gate looks at, passed explicitly rather than pulled
/// from ambient session state.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionContext<'a> {
    pub status: ApplicationStatus,
    pub selections: &'a [UniversitySelection],
    pub eligibility_percentage: u8,
}

type SubmissionCheck = for<'a> fn(&SubmissionContext<'a>) -> Option<SubmissionBlock>;

// Evaluated in sequence; the first failing check supplies the reported
// reason, so the order here is load-bearing.
const SUBMISSION_CHECKS: &[SubmissionCheck] = &[
    not_yet_submitted,
    profile_complete_enough,
    has_selections,
    every_selection_has_intake,
];

/// Whether the application may be submitted, with the first blocking reason
/// when it may not.
pub fn can_submit(
    status: ApplicationStatus,
    selections: &[UniversitySelection],
    eligibility_percentage: u8,
) -> Result<(), SubmissionBlock> {
    let context = SubmissionContext {
        status,
        selections,
        eligibility_percentage,
    };

    match SUBMISSION_CHECKS.iter().find_map(|check| check(&context)) {
        Some(block) => Err(block),
        None => Ok(()),
    }
}

fn not_yet_submitted(context: &SubmissionContext<'_>) -> Option<SubmissionBlock> {
    if context.status == ApplicationStatus::Draft {
        None
    } else {
        Some(SubmissionBlock::AlreadySubmitted)
    }
}

fn profile_complete_enough(context: &SubmissionContext<'_>) -> Option<SubmissionBlock> {
    if context.eligibility_percentage >= SUBMISSION_ELIGIBILITY_FLOOR {
        None
    } else {
        Some(SubmissionBlock::ProfileIncomplete {
            required: SUBMISSION_ELIGIBILITY_FLOOR,
            actual: context.eligibility_percentage,
        })
    }
}

fn has_selections(context: &SubmissionContext<'_>) -> Option<SubmissionBlock> {
    if context.selections.is_empty() {
        Some(SubmissionBlock::NoSelections)
    } else {
        None
    }
}

fn every_selection_has_intake(context: &SubmissionContext<'_>) -> Option<SubmissionBlock> {
    context
        .selections
        .iter()
        .find(|selection| !selection.has_intake())
        .map(|selection| SubmissionBlock::MissingIntake {
            university: selection.university_name.clone(),
        })
}

//! Ordering queries over the application pipeline.
//!
//! Stage values coming off the wire are trusted but not guaranteed: an
//! unrecognized stage string reads as "not started" (progress 0) instead of
//! an error, so [`ApplicationStage::parse`] returns an `Option` and
//! [`progress_for`] maps the unknown case to zero.

use super::domain::ApplicationStage;

impl ApplicationStage {
    /// Zero-based position within [`ApplicationStage::ordered`].
    pub const fn position(self) -> usize {
        match self {
            Self::ProfileReview => 0,
            Self::UniversitySelection => 1,
            Self::DocumentPreparation => 2,
            Self::Submission => 3,
            Self::OfferManagement => 4,
            Self::VisaApplication => 5,
            Self::Completed => 6,
        }
    }

    /// Completion percentage for an application sitting at this stage:
    /// `round(100 * (position + 1) / 7)`.
    pub fn progress(self) -> u8 {
        let total = Self::ordered().len();
        (((self.position() + 1) as f64 / total as f64) * 100.0).round() as u8
    }

    /// The following stage, or `None` once the pipeline is finished.
    pub fn next(self) -> Option<Self> {
        Self::ordered().get(self.position() + 1).copied()
    }

    /// True when this stage sits strictly before `current` in the pipeline.
    pub fn is_completed(self, current: Self) -> bool {
        self.position() < current.position()
    }

    /// True when this stage is the one the application currently sits at.
    pub fn is_current(self, current: Self) -> bool {
        self == current
    }

    /// Wire name used by the backend API (snake_case).
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::ProfileReview => "profile_review",
            Self::UniversitySelection => "university_selection",
            Self::DocumentPreparation => "document_preparation",
            Self::Submission => "submission",
            Self::OfferManagement => "offer_management",
            Self::VisaApplication => "visa_application",
            Self::Completed => "completed",
        }
    }

    /// Parse a wire value. Unknown values map to `None` rather than an error.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|stage| stage.wire_name() == raw)
    }
}

/// Progress for a raw stage string; unrecognized stages read as not started.
pub fn progress_for(raw: &str) -> u8 {
    ApplicationStage::parse(raw).map_or(0, ApplicationStage::progress)
}

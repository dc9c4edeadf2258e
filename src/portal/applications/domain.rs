use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for portal applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier wrapper for the student owning an application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentId(pub String);

/// Business outcome of an application. Tracked independently of [`ApplicationStage`];
/// the backend does not guarantee any particular pairing between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Draft,
    InReview,
    Submitted,
    OffersReceived,
    Accepted,
    Rejected,
    VisaApplied,
    Completed,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::InReview => "In Review",
            Self::Submitted => "Submitted",
            Self::OffersReceived => "Offers Received",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
            Self::VisaApplied => "Visa Applied",
            Self::Completed => "Completed",
        }
    }
}

/// Workflow position within the fixed seven-step application pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStage {
    ProfileReview,
    UniversitySelection,
    DocumentPreparation,
    Submission,
    OfferManagement,
    VisaApplication,
    Completed,
}

impl ApplicationStage {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::ProfileReview,
            Self::UniversitySelection,
            Self::DocumentPreparation,
            Self::Submission,
            Self::OfferManagement,
            Self::VisaApplication,
            Self::Completed,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ProfileReview => "Profile Review",
            Self::UniversitySelection => "University Selection",
            Self::DocumentPreparation => "Document Preparation",
            Self::Submission => "Submission",
            Self::OfferManagement => "Offer Management",
            Self::VisaApplication => "Visa Application",
            Self::Completed => "Completed",
        }
    }
}

/// Sub-status carried by each offer letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
}

impl OfferStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
        }
    }
}

/// A (university, program, intake, priority) pick on an application.
/// At most five selections per application; priorities are dense 1-based
/// ranks matching list order, reassigned by the service on every save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversitySelection {
    pub university_id: String,
    pub program_id: String,
    pub university_name: String,
    pub program_name: String,
    pub country: String,
    pub tuition_fee: u32,
    pub duration: String,
    #[serde(default)]
    pub intake_options: Vec<String>,
    #[serde(default)]
    pub selected_intake: Option<String>,
    pub priority: u8,
}

impl UniversitySelection {
    /// Whether the student has picked an intake for this selection.
    pub fn has_intake(&self) -> bool {
        self.selected_intake
            .as_deref()
            .is_some_and(|intake| !intake.trim().is_empty())
    }
}

/// A university's response to a submitted application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferLetter {
    pub offer_id: String,
    pub university_id: String,
    pub program_id: String,
    pub university_name: String,
    pub offer_date: NaiveDate,
    pub status: OfferStatus,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub response_date: Option<NaiveDate>,
}

/// Externally computed profile-completeness snapshot gating submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub eligible: bool,
    pub completion_percentage: u8,
    #[serde(default)]
    pub missing_fields: Vec<String>,
    #[serde(default)]
    pub missing_documents: Vec<String>,
}

/// The central portal entity. Created as a draft and mutated only through
/// discrete service operations; view state (progress, editability) is always
/// derived from the latest snapshot, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub student_id: StudentId,
    pub status: ApplicationStatus,
    pub stage: ApplicationStage,
    #[serde(default)]
    pub university_selections: Vec<UniversitySelection>,
    #[serde(default)]
    pub offer_letters: Vec<OfferLetter>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Application {
    /// Fresh draft positioned at the start of the pipeline.
    pub fn draft(id: ApplicationId, student_id: StudentId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            student_id,
            status: ApplicationStatus::Draft,
            stage: ApplicationStage::ProfileReview,
            university_selections: Vec::new(),
            offer_letters: Vec::new(),
            notes: None,
            created_at,
            updated_at: created_at,
            submitted_at: None,
            completed_at: None,
        }
    }

    /// Move the workflow pointer forward; never rewinds an already-later stage.
    pub fn advance_stage_to(&mut self, stage: ApplicationStage) {
        if stage.position() > self.stage.position() {
            self.stage = stage;
        }
    }
}

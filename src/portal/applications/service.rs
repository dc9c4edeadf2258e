use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::domain::{
    Application, ApplicationId, ApplicationStage, ApplicationStatus, EligibilityReport,
    OfferLetter, OfferStatus, StudentId, UniversitySelection,
};
use super::permissions::{can_edit, can_manage_offers, can_submit, SubmissionBlock};
use super::repository::{
    ApplicationRepository, EligibilityError, EligibilityProvider, RepositoryError,
};
use super::summary::{summarize, ApplicationSummary};
use super::validation::{rerank_priorities, validate_selections, SelectionError};

/// Service composing the repository, the eligibility source, and the pure
/// lifecycle rules. Every mutation re-runs the relevant gate so the stored
/// snapshot can never drift past what the rules allow.
pub struct PortalService<R, E> {
    repository: Arc<R>,
    eligibility: Arc<E>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// Mutations accepted by the offers endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferAction {
    Accept,
    Reject,
    Add,
}

/// Payload for an offer mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferActionRequest {
    pub action: OfferAction,
    #[serde(default)]
    pub offer_id: Option<String>,
    #[serde(default)]
    pub offer: Option<OfferLetter>,
}

impl<R, E> PortalService<R, E>
where
    R: ApplicationRepository + 'static,
    E: EligibilityProvider + 'static,
{
    pub fn new(repository: Arc<R>, eligibility: Arc<E>) -> Self {
        Self {
            repository,
            eligibility,
        }
    }

    /// Open a fresh draft for the student.
    pub fn create(&self, student: StudentId) -> Result<Application, PortalServiceError> {
        let application = Application::draft(next_application_id(), student, Utc::now());
        Ok(self.repository.insert(application)?)
    }

    /// All applications belonging to the student.
    pub fn list(&self, student: &StudentId) -> Result<Vec<Application>, PortalServiceError> {
        Ok(self.repository.list_for_student(student)?)
    }

    /// Fetch one application for API responses.
    pub fn get(&self, id: &ApplicationId) -> Result<Application, PortalServiceError> {
        let application = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(application)
    }

    /// Replace the application's free-text notes.
    pub fn update_notes(
        &self,
        id: &ApplicationId,
        notes: Option<String>,
    ) -> Result<Application, PortalServiceError> {
        let mut application = self.get(id)?;
        ensure_editable(&application)?;

        application.notes = notes;
        application.updated_at = Utc::now();
        self.repository.update(application.clone())?;
        Ok(application)
    }

    /// Persist a new selection list after validating it. Priorities are
    /// re-ranked densely in list order before storing.
    pub fn set_selections(
        &self,
        id: &ApplicationId,
        mut selections: Vec<UniversitySelection>,
    ) -> Result<Application, PortalServiceError> {
        let mut application = self.get(id)?;
        ensure_editable(&application)?;
        validate_selections(&selections)?;
        rerank_priorities(&mut selections);

        application.university_selections = selections;
        application.advance_stage_to(ApplicationStage::UniversitySelection);
        application.updated_at = Utc::now();
        self.repository.update(application.clone())?;
        Ok(application)
    }

    /// Submit the application once every gate passes, stamping the
    /// submission time and moving the workflow pointer forward.
    pub fn submit(&self, id: &ApplicationId) -> Result<Application, PortalServiceError> {
        let mut application = self.get(id)?;
        let eligibility = self.eligibility.eligibility_for(&application.student_id)?;
        can_submit(
            application.status,
            &application.university_selections,
            eligibility.completion_percentage,
        )?;

        let now = Utc::now();
        application.status = ApplicationStatus::Submitted;
        application.advance_stage_to(ApplicationStage::Submission);
        application.submitted_at = Some(now);
        application.updated_at = now;
        self.repository.update(application.clone())?;
        Ok(application)
    }

    /// Apply an offer mutation. Adding an offer moves the application into
    /// offer management; accept and reject are gated on offer-management
    /// being open and stamp the offer's response date.
    pub fn offer_action(
        &self,
        id: &ApplicationId,
        request: OfferActionRequest,
    ) -> Result<Application, PortalServiceError> {
        let mut application = self.get(id)?;
        let now = Utc::now();

        match request.action {
            OfferAction::Add => {
                let offer = request
                    .offer
                    .ok_or(PortalServiceError::MissingOfferPayload)?;
                application.offer_letters.push(offer);
                if !matches!(
                    application.status,
                    ApplicationStatus::Accepted
                        | ApplicationStatus::Rejected
                        | ApplicationStatus::VisaApplied
                        | ApplicationStatus::Completed
                ) {
                    application.status = ApplicationStatus::OffersReceived;
                }
                application.advance_stage_to(ApplicationStage::OfferManagement);
            }
            OfferAction::Accept | OfferAction::Reject => {
                if !can_manage_offers(application.status) {
                    return Err(PortalServiceError::OffersLocked {
                        status: application.status,
                    });
                }
                let offer_id = request.offer_id.ok_or(PortalServiceError::MissingOfferId)?;
                let offer = application
                    .offer_letters
                    .iter_mut()
                    .find(|offer| offer.offer_id == offer_id)
                    .ok_or_else(|| PortalServiceError::OfferNotFound(offer_id.clone()))?;

                offer.status = if request.action == OfferAction::Accept {
                    OfferStatus::Accepted
                } else {
                    OfferStatus::Rejected
                };
                offer.response_date = Some(now.date_naive());

                if request.action == OfferAction::Accept {
                    application.status = ApplicationStatus::Accepted;
                }
            }
        }

        application.updated_at = now;
        self.repository.update(application.clone())?;
        Ok(application)
    }

    /// Dashboard counts across the student's applications.
    pub fn summary(&self, student: &StudentId) -> Result<ApplicationSummary, PortalServiceError> {
        let applications = self.repository.list_for_student(student)?;
        Ok(summarize(&applications))
    }

    /// Current profile-completeness snapshot for the student.
    pub fn eligibility(
        &self,
        student: &StudentId,
    ) -> Result<EligibilityReport, PortalServiceError> {
        Ok(self.eligibility.eligibility_for(student)?)
    }
}

fn ensure_editable(application: &Application) -> Result<(), PortalServiceError> {
    if can_edit(application.status) {
        Ok(())
    } else {
        Err(PortalServiceError::NotEditable {
            status: application.status,
        })
    }
}

/// Error raised by the portal service.
#[derive(Debug, thiserror::Error)]
pub enum PortalServiceError {
    #[error(transparent)]
    Submission(#[from] SubmissionBlock),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Eligibility(#[from] EligibilityError),
    #[error("application cannot be edited while {}", .status.label())]
    NotEditable { status: ApplicationStatus },
    #[error("offers cannot be managed while {}", .status.label())]
    OffersLocked { status: ApplicationStatus },
    #[error("offer {0} not found")]
    OfferNotFound(String),
    #[error("offer payload required to add an offer")]
    MissingOfferPayload,
    #[error("offer_id required to accept or reject an offer")]
    MissingOfferId,
}

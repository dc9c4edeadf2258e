use chrono::NaiveDate;
use serde::Serialize;

use crate::portal::dates::{format_date, relative_time};

use super::domain::{
    Application, ApplicationId, ApplicationStage, ApplicationStatus, EligibilityReport, StudentId,
};
use super::permissions::{can_edit, can_manage_offers};

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn update(&self, application: Application) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn list_for_student(&self, student: &StudentId) -> Result<Vec<Application>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// External profile-completeness source consulted before submission.
pub trait EligibilityProvider: Send + Sync {
    fn eligibility_for(&self, student: &StudentId) -> Result<EligibilityReport, EligibilityError>;
}

/// Eligibility lookup error.
#[derive(Debug, thiserror::Error)]
pub enum EligibilityError {
    #[error("eligibility service unavailable: {0}")]
    Unavailable(String),
}

/// Derived, read-only dashboard card for an application. Everything here is
/// recomputed from the latest snapshot; nothing is persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationCard {
    pub application_id: ApplicationId,
    pub status: ApplicationStatus,
    pub status_label: &'static str,
    pub stage: ApplicationStage,
    pub stage_label: &'static str,
    pub progress: u8,
    pub can_edit: bool,
    pub can_manage_offers: bool,
    pub universities_selected: usize,
    pub offers: usize,
    pub last_updated: String,
    pub updated_relative: String,
}

impl Application {
    pub fn card(&self, today: NaiveDate) -> ApplicationCard {
        let updated_raw = self.updated_at.to_rfc3339();

        ApplicationCard {
            application_id: self.id.clone(),
            status: self.status,
            status_label: self.status.label(),
            stage: self.stage,
            stage_label: self.stage.label(),
            progress: self.stage.progress(),
            can_edit: can_edit(self.status),
            can_manage_offers: can_manage_offers(self.status),
            universities_selected: self.university_selections.len(),
            offers: self.offer_letters.len(),
            last_updated: format_date(&updated_raw),
            updated_relative: relative_time(&updated_raw, today),
        }
    }
}

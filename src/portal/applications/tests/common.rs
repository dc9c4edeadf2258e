use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::portal::applications::domain::{
    Application, ApplicationId, ApplicationStage, ApplicationStatus, EligibilityReport,
    OfferLetter, OfferStatus, StudentId, UniversitySelection,
};
use crate::portal::applications::repository::{
    ApplicationRepository, EligibilityError, EligibilityProvider, RepositoryError,
};
use crate::portal::applications::{portal_router, PortalService};

pub(super) const STUDENT: &str = "stu-test";

pub(super) fn student() -> StudentId {
    StudentId(STUDENT.to_string())
}

pub(super) fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn selection(university_id: &str, university_name: &str) -> UniversitySelection {
    UniversitySelection {
        university_id: university_id.to_string(),
        program_id: format!("{university_id}-prog"),
        university_name: university_name.to_string(),
        program_name: "MSc Computer Science".to_string(),
        country: "United Kingdom".to_string(),
        tuition_fee: 24_000,
        duration: "2 years".to_string(),
        intake_options: vec!["Fall 2026".to_string(), "Spring 2027".to_string()],
        selected_intake: Some("Fall 2026".to_string()),
        priority: 0,
    }
}

pub(super) fn selection_without_intake(
    university_id: &str,
    university_name: &str,
) -> UniversitySelection {
    UniversitySelection {
        selected_intake: None,
        ..selection(university_id, university_name)
    }
}

pub(super) fn offer(offer_id: &str, status: OfferStatus) -> OfferLetter {
    OfferLetter {
        offer_id: offer_id.to_string(),
        university_id: "uni-york".to_string(),
        program_id: "uni-york-prog".to_string(),
        university_name: "University of York".to_string(),
        offer_date: NaiveDate::from_ymd_opt(2026, 2, 20).expect("valid date"),
        status,
        conditions: Vec::new(),
        response_date: None,
    }
}

pub(super) fn application(status: ApplicationStatus, stage: ApplicationStage) -> Application {
    Application {
        status,
        stage,
        ..Application::draft(
            ApplicationId("app-fixture".to_string()),
            student(),
            fixed_time(),
        )
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl ApplicationRepository for MemoryRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, application: Application) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(application.id.clone(), application);
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_for_student(&self, student: &StudentId) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut applications: Vec<Application> = guard
            .values()
            .filter(|application| application.student_id == *student)
            .cloned()
            .collect();
        applications.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(applications)
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _application: Application) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for_student(&self, _student: &StudentId) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Eligibility stub returning a configurable completion percentage.
#[derive(Clone)]
pub(super) struct StubEligibility {
    pub(super) percentage: u8,
}

impl EligibilityProvider for StubEligibility {
    fn eligibility_for(&self, _student: &StudentId) -> Result<EligibilityReport, EligibilityError> {
        Ok(EligibilityReport {
            eligible: self.percentage >= 85,
            completion_percentage: self.percentage,
            missing_fields: Vec::new(),
            missing_documents: Vec::new(),
        })
    }
}

pub(super) fn build_service(
    percentage: u8,
) -> (
    PortalService<MemoryRepository, StubEligibility>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let eligibility = Arc::new(StubEligibility { percentage });
    let service = PortalService::new(repository.clone(), eligibility);
    (service, repository)
}

pub(super) fn portal_router_with_service(
    service: PortalService<MemoryRepository, StubEligibility>,
) -> axum::Router {
    portal_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

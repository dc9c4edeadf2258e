//! In-memory adapters backing the server, the dashboard demo, and the
//! integration tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::portal::applications::{
    Application, ApplicationId, ApplicationRepository, EligibilityError, EligibilityProvider,
    EligibilityReport, RepositoryError, StudentId,
};

#[derive(Default, Clone)]
pub struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
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
        if !guard.contains_key(&application.id) {
            return Err(RepositoryError::NotFound);
        }
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
        applications.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.0.cmp(&b.id.0)));
        Ok(applications)
    }
}

/// Eligibility source returning the same report for every student. Stands in
/// for the profile service the production deployment talks to.
#[derive(Clone)]
pub struct FixedEligibilityProvider {
    report: EligibilityReport,
}

impl FixedEligibilityProvider {
    pub fn new(report: EligibilityReport) -> Self {
        Self { report }
    }
}

impl Default for FixedEligibilityProvider {
    fn default() -> Self {
        Self::new(EligibilityReport {
            eligible: true,
            completion_percentage: 100,
            missing_fields: Vec::new(),
            missing_documents: Vec::new(),
        })
    }
}

impl EligibilityProvider for FixedEligibilityProvider {
    fn eligibility_for(&self, _student: &StudentId) -> Result<EligibilityReport, EligibilityError> {
        Ok(self.report.clone())
    }
}

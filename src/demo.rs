//! Seeded portal used by the `dashboard` command and CLI demos.
//!
//! The data is built through the same service operations the HTTP surface
//! uses, so the demo exercises every gate rather than hand-assembling
//! records in arbitrary states.

use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};

use crate::infra::{FixedEligibilityProvider, InMemoryApplicationRepository};
use crate::portal::applications::{
    EligibilityReport, OfferAction, OfferActionRequest, OfferLetter, OfferStatus, PortalService,
    PortalServiceError, StudentId, UniversitySelection,
};

pub type DemoPortal = PortalService<InMemoryApplicationRepository, FixedEligibilityProvider>;

pub const DEMO_STUDENT: &str = "stu-000042";

/// Eligibility snapshot used for the demo student: complete enough to
/// submit, with one cosmetic gap left to show in the dashboard output.
pub fn demo_eligibility() -> EligibilityReport {
    EligibilityReport {
        eligible: true,
        completion_percentage: 92,
        missing_fields: vec!["Emergency contact".to_string()],
        missing_documents: Vec::new(),
    }
}

/// Build a portal holding one draft, one submitted application, and one
/// application with offers in play (one accepted, one still pending).
pub fn seeded_portal() -> Result<(DemoPortal, StudentId), PortalServiceError> {
    let repository = Arc::new(InMemoryApplicationRepository::default());
    let eligibility = Arc::new(FixedEligibilityProvider::new(demo_eligibility()));
    let service = PortalService::new(repository, eligibility);
    let student = StudentId(DEMO_STUDENT.to_string());
    let today = Local::now().date_naive();

    let draft = service.create(student.clone())?;
    service.set_selections(
        &draft.id,
        vec![
            selection(
                "uni-edinburgh",
                "prog-cs-msc",
                "University of Edinburgh",
                "MSc Computer Science",
                "United Kingdom",
                "September 2026",
            ),
            selection(
                "uni-toronto",
                "prog-ds-msc",
                "University of Toronto",
                "MSc Data Science",
                "Canada",
                "September 2026",
            ),
        ],
    )?;

    let submitted = service.create(student.clone())?;
    service.set_selections(
        &submitted.id,
        vec![selection(
            "uni-melbourne",
            "prog-ee-msc",
            "University of Melbourne",
            "MEng Electrical Engineering",
            "Australia",
            "February 2027",
        )],
    )?;
    service.submit(&submitted.id)?;

    let offered = service.create(student.clone())?;
    service.set_selections(
        &offered.id,
        vec![
            selection(
                "uni-amsterdam",
                "prog-ai-msc",
                "University of Amsterdam",
                "MSc Artificial Intelligence",
                "Netherlands",
                "September 2026",
            ),
            selection(
                "uni-delft",
                "prog-cs-msc",
                "TU Delft",
                "MSc Computer Science",
                "Netherlands",
                "September 2026",
            ),
        ],
    )?;
    service.submit(&offered.id)?;
    service.offer_action(
        &offered.id,
        OfferActionRequest {
            action: OfferAction::Add,
            offer_id: None,
            offer: Some(offer(
                "offer-001",
                "uni-amsterdam",
                "prog-ai-msc",
                "University of Amsterdam",
                today - Duration::days(12),
                vec!["IELTS 7.0 overall".to_string()],
            )),
        },
    )?;
    service.offer_action(
        &offered.id,
        OfferActionRequest {
            action: OfferAction::Add,
            offer_id: None,
            offer: Some(offer(
                "offer-002",
                "uni-delft",
                "prog-cs-msc",
                "TU Delft",
                today - Duration::days(5),
                Vec::new(),
            )),
        },
    )?;
    service.offer_action(
        &offered.id,
        OfferActionRequest {
            action: OfferAction::Accept,
            offer_id: Some("offer-001".to_string()),
            offer: None,
        },
    )?;

    Ok((service, student))
}

fn selection(
    university_id: &str,
    program_id: &str,
    university_name: &str,
    program_name: &str,
    country: &str,
    intake: &str,
) -> UniversitySelection {
    UniversitySelection {
        university_id: university_id.to_string(),
        program_id: program_id.to_string(),
        university_name: university_name.to_string(),
        program_name: program_name.to_string(),
        country: country.to_string(),
        tuition_fee: 28_500,
        duration: "2 years".to_string(),
        intake_options: vec![intake.to_string(), "January 2027".to_string()],
        selected_intake: Some(intake.to_string()),
        priority: 0,
    }
}

fn offer(
    offer_id: &str,
    university_id: &str,
    program_id: &str,
    university_name: &str,
    offer_date: NaiveDate,
    conditions: Vec<String>,
) -> OfferLetter {
    OfferLetter {
        offer_id: offer_id.to_string(),
        university_id: university_id.to_string(),
        program_id: program_id.to_string(),
        university_name: university_name.to_string(),
        offer_date,
        status: OfferStatus::Pending,
        conditions,
        response_date: None,
    }
}

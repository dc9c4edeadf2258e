use super::common::*;
use crate::portal::applications::domain::{
    ApplicationId, ApplicationStage, ApplicationStatus, OfferStatus,
};
use crate::portal::applications::permissions::SubmissionBlock;
use crate::portal::applications::repository::{ApplicationRepository, RepositoryError};
use crate::portal::applications::service::{OfferAction, OfferActionRequest, PortalServiceError};
use crate::portal::applications::validation::SelectionError;

#[test]
fn create_opens_a_draft_at_the_pipeline_start() {
    let (service, _) = build_service(90);

    let application = service.create(student()).expect("draft created");

    assert_eq!(application.status, ApplicationStatus::Draft);
    assert_eq!(application.stage, ApplicationStage::ProfileReview);
    assert!(application.university_selections.is_empty());
    assert!(application.submitted_at.is_none());
    assert_eq!(application.created_at, application.updated_at);
}

#[test]
fn set_selections_reranks_and_advances_the_stage() {
    let (service, repository) = build_service(90);
    let draft = service.create(student()).expect("draft created");

    let mut first = selection("uni-york", "University of York");
    first.priority = 7;
    let second = selection("uni-leeds", "University of Leeds");

    let updated = service
        .set_selections(&draft.id, vec![first, second])
        .expect("selections stored");

    let priorities: Vec<u8> = updated
        .university_selections
        .iter()
        .map(|s| s.priority)
        .collect();
    assert_eq!(priorities, vec![1, 2]);
    assert_eq!(updated.stage, ApplicationStage::UniversitySelection);

    let stored = repository
        .fetch(&draft.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored, updated);
}

#[test]
fn set_selections_surfaces_the_first_validation_failure() {
    let (service, _) = build_service(90);
    let draft = service.create(student()).expect("draft created");

    let result = service.set_selections(&draft.id, Vec::new());

    match result {
        Err(PortalServiceError::Selection(SelectionError::Empty)) => {}
        other => panic!("expected empty-selection error, got {other:?}"),
    }
}

#[test]
fn set_selections_is_refused_once_submitted() {
    let (service, repository) = build_service(90);
    let draft = service.create(student()).expect("draft created");
    service
        .set_selections(&draft.id, vec![selection("uni-york", "University of York")])
        .expect("selections stored");
    service.submit(&draft.id).expect("submission succeeds");

    let result = service.set_selections(&draft.id, vec![selection("uni-bath", "University of Bath")]);

    match result {
        Err(PortalServiceError::NotEditable { status }) => {
            assert_eq!(status, ApplicationStatus::Submitted);
        }
        other => panic!("expected not-editable error, got {other:?}"),
    }

    let stored = repository
        .fetch(&draft.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.university_selections.len(), 1);
    assert_eq!(stored.university_selections[0].university_id, "uni-york");
}

#[test]
fn submit_stamps_the_time_and_moves_the_stage() {
    let (service, repository) = build_service(90);
    let draft = service.create(student()).expect("draft created");
    service
        .set_selections(&draft.id, vec![selection("uni-york", "University of York")])
        .expect("selections stored");

    let submitted = service.submit(&draft.id).expect("submission succeeds");

    assert_eq!(submitted.status, ApplicationStatus::Submitted);
    assert_eq!(submitted.stage, ApplicationStage::Submission);
    assert!(submitted.submitted_at.is_some());
    assert_eq!(submitted.submitted_at, Some(submitted.updated_at));

    let stored = repository
        .fetch(&draft.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.status, ApplicationStatus::Submitted);
}

#[test]
fn submit_is_blocked_below_the_eligibility_floor() {
    let (service, repository) = build_service(70);
    let draft = service.create(student()).expect("draft created");
    service
        .set_selections(&draft.id, vec![selection("uni-york", "University of York")])
        .expect("selections stored");

    match service.submit(&draft.id) {
        Err(PortalServiceError::Submission(SubmissionBlock::ProfileIncomplete {
            required,
            actual,
        })) => {
            assert_eq!(required, 85);
            assert_eq!(actual, 70);
        }
        other => panic!("expected profile-incomplete block, got {other:?}"),
    }

    let stored = repository
        .fetch(&draft.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.status, ApplicationStatus::Draft, "status unchanged");
    assert!(stored.submitted_at.is_none());
}

#[test]
fn adding_an_offer_opens_offer_management() {
    let (service, _) = build_service(90);
    let draft = service.create(student()).expect("draft created");
    service
        .set_selections(&draft.id, vec![selection("uni-york", "University of York")])
        .expect("selections stored");
    service.submit(&draft.id).expect("submission succeeds");

    let updated = service
        .offer_action(
            &draft.id,
            OfferActionRequest {
                action: OfferAction::Add,
                offer_id: None,
                offer: Some(offer("offer-1", OfferStatus::Pending)),
            },
        )
        .expect("offer added");

    assert_eq!(updated.status, ApplicationStatus::OffersReceived);
    assert_eq!(updated.stage, ApplicationStage::OfferManagement);
    assert_eq!(updated.offer_letters.len(), 1);
}

#[test]
fn accepting_an_offer_marks_application_and_offer() {
    let (service, _) = build_service(90);
    let draft = service.create(student()).expect("draft created");
    service
        .set_selections(&draft.id, vec![selection("uni-york", "University of York")])
        .expect("selections stored");
    service.submit(&draft.id).expect("submission succeeds");
    service
        .offer_action(
            &draft.id,
            OfferActionRequest {
                action: OfferAction::Add,
                offer_id: None,
                offer: Some(offer("offer-1", OfferStatus::Pending)),
            },
        )
        .expect("offer added");

    let updated = service
        .offer_action(
            &draft.id,
            OfferActionRequest {
                action: OfferAction::Accept,
                offer_id: Some("offer-1".to_string()),
                offer: None,
            },
        )
        .expect("offer accepted");

    assert_eq!(updated.status, ApplicationStatus::Accepted);
    let accepted = &updated.offer_letters[0];
    assert_eq!(accepted.status, OfferStatus::Accepted);
    assert!(accepted.response_date.is_some());
}

#[test]
fn rejecting_an_offer_leaves_the_application_status_alone() {
    let (service, _) = build_service(90);
    let draft = service.create(student()).expect("draft created");
    service
        .set_selections(&draft.id, vec![selection("uni-york", "University of York")])
        .expect("selections stored");
    service.submit(&draft.id).expect("submission succeeds");
    service
        .offer_action(
            &draft.id,
            OfferActionRequest {
                action: OfferAction::Add,
                offer_id: None,
                offer: Some(offer("offer-1", OfferStatus::Pending)),
            },
        )
        .expect("offer added");

    let updated = service
        .offer_action(
            &draft.id,
            OfferActionRequest {
                action: OfferAction::Reject,
                offer_id: Some("offer-1".to_string()),
                offer: None,
            },
        )
        .expect("offer rejected");

    assert_eq!(updated.status, ApplicationStatus::OffersReceived);
    assert_eq!(updated.offer_letters[0].status, OfferStatus::Rejected);
    assert!(updated.offer_letters[0].response_date.is_some());
}

#[test]
fn offer_decisions_are_locked_before_offers_arrive() {
    let (service, _) = build_service(90);
    let draft = service.create(student()).expect("draft created");

    let result = service.offer_action(
        &draft.id,
        OfferActionRequest {
            action: OfferAction::Accept,
            offer_id: Some("offer-1".to_string()),
            offer: None,
        },
    );

    match result {
        Err(PortalServiceError::OffersLocked { status }) => {
            assert_eq!(status, ApplicationStatus::Draft);
        }
        other => panic!("expected offers-locked error, got {other:?}"),
    }
}

#[test]
fn deciding_a_missing_offer_is_not_found() {
    let (service, _) = build_service(90);
    let draft = service.create(student()).expect("draft created");
    service
        .set_selections(&draft.id, vec![selection("uni-york", "University of York")])
        .expect("selections stored");
    service.submit(&draft.id).expect("submission succeeds");
    service
        .offer_action(
            &draft.id,
            OfferActionRequest {
                action: OfferAction::Add,
                offer_id: None,
                offer: Some(offer("offer-1", OfferStatus::Pending)),
            },
        )
        .expect("offer added");

    let result = service.offer_action(
        &draft.id,
        OfferActionRequest {
            action: OfferAction::Accept,
            offer_id: Some("offer-9".to_string()),
            offer: None,
        },
    );

    match result {
        Err(PortalServiceError::OfferNotFound(id)) => assert_eq!(id, "offer-9"),
        other => panic!("expected offer-not-found error, got {other:?}"),
    }
}

#[test]
fn update_notes_requires_an_editable_application() {
    let (service, _) = build_service(90);
    let draft = service.create(student()).expect("draft created");

    let updated = service
        .update_notes(&draft.id, Some("Ask about scholarships".to_string()))
        .expect("notes stored");
    assert_eq!(updated.notes.as_deref(), Some("Ask about scholarships"));

    service
        .set_selections(&draft.id, vec![selection("uni-york", "University of York")])
        .expect("selections stored");
    service.submit(&draft.id).expect("submission succeeds");

    let result = service.update_notes(&draft.id, None);
    assert!(matches!(
        result,
        Err(PortalServiceError::NotEditable { .. })
    ));
}

#[test]
fn get_propagates_not_found() {
    let (service, _) = build_service(90);

    match service.get(&ApplicationId("missing".to_string())) {
        Err(PortalServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not-found error, got {other:?}"),
    }
}

#[test]
fn summary_reflects_the_students_portfolio() {
    let (service, _) = build_service(90);
    let first = service.create(student()).expect("draft created");
    service
        .set_selections(&first.id, vec![selection("uni-york", "University of York")])
        .expect("selections stored");
    service.submit(&first.id).expect("submission succeeds");

    let _second = service.create(student()).expect("second draft");

    let summary = service.summary(&student()).expect("summary builds");
    assert_eq!(summary.total, 2);
    assert_eq!(summary.draft, 1);
    assert_eq!(summary.submitted, 1);
    assert_eq!(summary.total_offers, 0);
}

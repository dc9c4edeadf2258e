use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationId, StudentId, UniversitySelection};
use super::repository::{ApplicationRepository, EligibilityProvider, RepositoryError};
use super::service::{OfferActionRequest, PortalService, PortalServiceError};

/// Router builder exposing the portal's application endpoints.
pub fn portal_router<R, E>(service: Arc<PortalService<R, E>>) -> Router
where
    R: ApplicationRepository + 'static,
    E: EligibilityProvider + 'static,
{
    Router::new()
        .route(
            "/api/v1/students/:student_id/applications",
            post(create_handler::<R, E>).get(list_handler::<R, E>),
        )
        .route(
            "/api/v1/students/:student_id/applications/summary",
            get(summary_handler::<R, E>),
        )
        .route(
            "/api/v1/students/:student_id/eligibility",
            get(eligibility_handler::<R, E>),
        )
        .route(
            "/api/v1/applications/:application_id",
            get(detail_handler::<R, E>),
        )
        .route(
            "/api/v1/applications/:application_id/card",
            get(card_handler::<R, E>),
        )
        .route(
            "/api/v1/applications/:application_id/universities",
            put(universities_handler::<R, E>),
        )
        .route(
            "/api/v1/applications/:application_id/submit",
            post(submit_handler::<R, E>),
        )
        .route(
            "/api/v1/applications/:application_id/offers",
            put(offers_handler::<R, E>),
        )
        .with_state(service)
}

/// Body for the universities endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct UniversitiesRequest {
    pub(crate) universities: Vec<UniversitySelection>,
}

pub(crate) async fn create_handler<R, E>(
    State(service): State<Arc<PortalService<R, E>>>,
    Path(student_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    E: EligibilityProvider + 'static,
{
    match service.create(StudentId(student_id)) {
        Ok(application) => (
            StatusCode::CREATED,
            axum::Json(json!({ "application": application })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R, E>(
    State(service): State<Arc<PortalService<R, E>>>,
    Path(student_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    E: EligibilityProvider + 'static,
{
    match service.list(&StudentId(student_id)) {
        Ok(applications) => (
            StatusCode::OK,
            axum::Json(json!({ "applications": applications })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn summary_handler<R, E>(
    State(service): State<Arc<PortalService<R, E>>>,
    Path(student_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    E: EligibilityProvider + 'static,
{
    match service.summary(&StudentId(student_id)) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn eligibility_handler<R, E>(
    State(service): State<Arc<PortalService<R, E>>>,
    Path(student_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    E: EligibilityProvider + 'static,
{
    match service.eligibility(&StudentId(student_id)) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn detail_handler<R, E>(
    State(service): State<Arc<PortalService<R, E>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    E: EligibilityProvider + 'static,
{
    match service.get(&ApplicationId(application_id)) {
        Ok(application) => (
            StatusCode::OK,
            axum::Json(json!({ "application": application })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn card_handler<R, E>(
    State(service): State<Arc<PortalService<R, E>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    E: EligibilityProvider + 'static,
{
    match service.get(&ApplicationId(application_id)) {
        Ok(application) => {
            let card = application.card(Local::now().date_naive());
            (StatusCode::OK, axum::Json(card)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn universities_handler<R, E>(
    State(service): State<Arc<PortalService<R, E>>>,
    Path(application_id): Path<String>,
    axum::Json(payload): axum::Json<UniversitiesRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    E: EligibilityProvider + 'static,
{
    match service.set_selections(&ApplicationId(application_id), payload.universities) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<R, E>(
    State(service): State<Arc<PortalService<R, E>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    E: EligibilityProvider + 'static,
{
    match service.submit(&ApplicationId(application_id)) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn offers_handler<R, E>(
    State(service): State<Arc<PortalService<R, E>>>,
    Path(application_id): Path<String>,
    axum::Json(payload): axum::Json<OfferActionRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    E: EligibilityProvider + 'static,
{
    match service.offer_action(&ApplicationId(application_id), payload) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: PortalServiceError) -> Response {
    let status = match &error {
        PortalServiceError::Submission(_)
        | PortalServiceError::Selection(_)
        | PortalServiceError::NotEditable { .. }
        | PortalServiceError::OffersLocked { .. }
        | PortalServiceError::MissingOfferPayload
        | PortalServiceError::MissingOfferId => StatusCode::UNPROCESSABLE_ENTITY,
        PortalServiceError::Repository(RepositoryError::NotFound)
        | PortalServiceError::OfferNotFound(_) => StatusCode::NOT_FOUND,
        PortalServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        PortalServiceError::Repository(RepositoryError::Unavailable(_))
        | PortalServiceError::Eligibility(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use abroad_portal::config::AppConfig;
use abroad_portal::demo;
use abroad_portal::error::AppError;
use abroad_portal::infra::{FixedEligibilityProvider, InMemoryApplicationRepository};
use abroad_portal::portal::applications::{
    portal_router, Application, ApplicationSummary, EligibilityReport, PortalService,
};
use abroad_portal::telemetry;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Study Abroad Portal",
    about = "Run the study-abroad application portal service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print a seeded application dashboard for stakeholder demos
    Dashboard(DashboardArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug, Default)]
struct DashboardArgs {
    /// Evaluation date for relative timestamps (defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Dashboard(args) => run_dashboard(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let repository = Arc::new(InMemoryApplicationRepository::default());
    let eligibility = Arc::new(FixedEligibilityProvider::default());
    let service = Arc::new(PortalService::new(repository, eligibility));

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(portal_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "study-abroad portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn run_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let (service, student) = demo::seeded_portal()?;
    let applications = service.list(&student)?;
    let summary = service.summary(&student)?;
    let eligibility = service.eligibility(&student)?;

    render_dashboard(&applications, &summary, &eligibility, today);
    Ok(())
}

fn render_dashboard(
    applications: &[Application],
    summary: &ApplicationSummary,
    eligibility: &EligibilityReport,
    today: NaiveDate,
) {
    println!("Study-abroad portal dashboard (student {})", demo::DEMO_STUDENT);

    println!("\nApplications");
    for application in applications {
        let card = application.card(today);
        println!(
            "- {} | {} | {} | {}% complete | {} universities | {} offers | updated {}",
            card.application_id.0,
            card.status_label,
            card.stage_label,
            card.progress,
            card.universities_selected,
            card.offers,
            card.updated_relative
        );
        for selection in &application.university_selections {
            let intake = selection.selected_intake.as_deref().unwrap_or("no intake");
            println!(
                "    {}. {} - {} ({intake})",
                selection.priority, selection.university_name, selection.program_name
            );
        }
        for offer in &application.offer_letters {
            println!(
                "    offer {} from {}: {}",
                offer.offer_id,
                offer.university_name,
                offer.status.label()
            );
        }
    }

    println!("\nSummary");
    println!(
        "- {} total | {} draft | {} in review | {} submitted | {} with offers",
        summary.total, summary.draft, summary.in_review, summary.submitted, summary.offers_received
    );
    println!(
        "- {} accepted | {} rejected | {} completed",
        summary.accepted, summary.rejected, summary.completed
    );
    println!(
        "- offers: {} total, {} pending, {} accepted",
        summary.total_offers, summary.pending_offers, summary.accepted_offers
    );

    println!("\nEligibility");
    println!(
        "- {}% profile completion ({})",
        eligibility.completion_percentage,
        if eligibility.eligible {
            "eligible to submit"
        } else {
            "not yet eligible"
        }
    );
    for field in &eligibility.missing_fields {
        println!("- missing field: {field}");
    }
    for document in &eligibility.missing_documents {
        println!("- missing document: {document}");
    }
}

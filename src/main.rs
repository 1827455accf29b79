use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use admission_ai::config::AppConfig;
use admission_ai::error::AppError;
use admission_ai::telemetry;
use admission_ai::workflows::admission::{
    admission_router, AdmissionScoreService, AgeClass, ChildId, CsvHistoryProvider,
    EmptyHistoryProvider, FacilityHistoryProvider, FacilityId, HistoricalCase, PriorityKind,
    ProviderError, ScoreRequest, ScoringConfig,
};
use axum::extract::State;
use axum::http::StatusCode;
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
    name = "Admission Probability Scorer",
    about = "Score childcare admission probability from the command line or over HTTP",
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
    /// Score a single request against the configured data files and print the result
    Score(ScoreArgs),
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

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Facility identifier to score against
    #[arg(long)]
    facility: String,
    /// Child identifier the request is scored for
    #[arg(long)]
    child: String,
    /// Target age class (age0..age5)
    #[arg(long, value_parser = parse_age_class)]
    class: AgeClass,
    /// Primary priority classification (e.g. dual_income, none)
    #[arg(long, value_parser = parse_priority, default_value = "none")]
    priority: PriorityKind,
    /// Additional priority classifications
    #[arg(long = "additional", value_parser = parse_priority)]
    additional: Vec<PriorityKind>,
    /// Evaluation date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    as_of: Option<NaiveDate>,
    /// Override the facility metadata JSON path
    #[arg(long)]
    facilities: Option<PathBuf>,
    /// Override the admission history CSV path
    #[arg(long)]
    history: Option<PathBuf>,
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
        Command::Score(args) => run_score(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn parse_age_class(raw: &str) -> Result<AgeClass, String> {
    serde_json::from_value(json!(raw.trim()))
        .map_err(|_| format!("unknown age class '{raw}' (expected age0..age5)"))
}

fn parse_priority(raw: &str) -> Result<PriorityKind, String> {
    serde_json::from_value(json!(raw.trim()))
        .map_err(|_| format!("unknown priority classification '{raw}'"))
}

/// History backend chosen from configuration: a CSV export when one is configured,
/// otherwise an empty past.
enum HistoryBackend {
    Csv(CsvHistoryProvider),
    Empty(EmptyHistoryProvider),
}

impl FacilityHistoryProvider for HistoryBackend {
    fn get_cases(
        &self,
        facility_id: &FacilityId,
        target_class: AgeClass,
    ) -> Result<Vec<HistoricalCase>, ProviderError> {
        match self {
            HistoryBackend::Csv(provider) => provider.get_cases(facility_id, target_class),
            HistoryBackend::Empty(provider) => provider.get_cases(facility_id, target_class),
        }
    }
}

fn load_history(path: Option<&PathBuf>) -> Result<HistoryBackend, AppError> {
    match path {
        Some(path) => Ok(HistoryBackend::Csv(CsvHistoryProvider::from_path(path)?)),
        None => Ok(HistoryBackend::Empty(EmptyHistoryProvider)),
    }
}

fn build_service(
    facilities_path: &PathBuf,
    history_path: Option<&PathBuf>,
) -> Result<
    AdmissionScoreService<admission_ai::workflows::admission::JsonMetadataProvider, HistoryBackend>,
    AppError,
> {
    let metadata =
        admission_ai::workflows::admission::JsonMetadataProvider::from_path(facilities_path)?;
    let history = load_history(history_path)?;
    Ok(AdmissionScoreService::new(
        Arc::new(metadata),
        Arc::new(history),
        ScoringConfig::default(),
    ))
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

    let service = build_service(
        &config.data.facilities_path,
        config.data.history_path.as_ref(),
    )?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(admission_router(Arc::new(service)))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "admission scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let facilities_path = args
        .facilities
        .unwrap_or_else(|| config.data.facilities_path.clone());
    let history_path = args.history.or_else(|| config.data.history_path.clone());

    let service = build_service(&facilities_path, history_path.as_ref())?;

    let request = ScoreRequest {
        facility_id: FacilityId(args.facility),
        child_id: ChildId(args.child),
        target_class: args.class,
        priority: args.priority,
        additional_priorities: args.additional.into_iter().collect::<BTreeSet<_>>(),
    };

    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let result = service.score_as_of(&request, as_of)?;

    let rendered = serde_json::to_string_pretty(&result)
        .unwrap_or_else(|_| "{\"error\": \"unserializable result\"}".to_string());
    println!("{rendered}");
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
    state.metrics.render()
}

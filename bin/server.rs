// Cost Eras - Web Server
// REST API + server-rendered dashboard with Axum

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use clap::Parser;
use cost_eras::{
    charts, control_id, currency, dataset, ChartConfig, Dashboard, DashboardError, Emphasis, Era,
    EraMetrics, MemoryPage, Profile, Severity, SlotKind, Surface,
};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Cost Eras API server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "COST_DASHBOARD_ADDR", default_value = "0.0.0.0:3000")]
    addr: String,

    /// Profile rendered at startup
    #[arg(long, default_value = "single")]
    profile: Profile,
}

/// Shared application state
#[derive(Clone)]
struct AppState {
    dashboard: Arc<Mutex<Dashboard<MemoryPage>>>,
}

impl AppState {
    fn new(dashboard: Dashboard<MemoryPage>) -> Self {
        Self {
            dashboard: Arc::new(Mutex::new(dashboard)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Dashboard<MemoryPage>>, ApiError> {
        self.dashboard
            .lock()
            .map_err(|_| ApiError::Internal("dashboard lock poisoned".to_string()))
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

enum ApiError {
    NotFound(String),
    Internal(String),
}

impl From<DashboardError> for ApiError {
    fn from(e: DashboardError) -> Self {
        if e.is_defect() {
            ApiError::Internal(e.to_string())
        } else {
            ApiError::NotFound(e.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Internal(message) => {
                error!("request failed: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(ApiResponse::failure(message))).into_response()
    }
}

fn parse_profile(raw: &str) -> Result<Profile, ApiError> {
    Ok(raw.parse::<Profile>()?)
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/dashboard/:profile - Select a profile and return the rendered page
async fn get_dashboard(
    State(state): State<AppState>,
    Path(profile): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let profile = parse_profile(&profile)?;

    let snapshot = {
        let mut dashboard = state.lock()?;
        dashboard.select_profile(profile)?;
        dashboard.presenter().snapshot()
    };

    let body = serde_json::to_vec(&ApiResponse::ok(snapshot))
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let etag = format!("\"{}\"", hex_digest(&body));

    let matches = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == etag)
        .unwrap_or(false);

    let etag_value =
        HeaderValue::from_str(&etag).map_err(|e| ApiError::Internal(e.to_string()))?;

    if matches {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag_value)]).into_response());
    }

    Ok((
        StatusCode::OK,
        [
            (header::ETAG, etag_value),
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            ),
        ],
        body,
    )
        .into_response())
}

/// GET /api/metrics/:profile - Derived metrics for every era
async fn get_metrics(Path(profile): Path<String>) -> Result<Json<ApiResponse<Vec<EraMetrics>>>, ApiError> {
    let profile = parse_profile(&profile)?;
    Ok(Json(ApiResponse::ok(EraMetrics::all(dataset::get(profile)))))
}

/// GET /api/charts/:profile/:surface - One chart configuration
async fn get_chart(
    Path((profile, surface)): Path<(String, String)>,
) -> Result<Json<ApiResponse<ChartConfig>>, ApiError> {
    let profile = parse_profile(&profile)?;
    let surface = Surface::from_key(&surface)
        .ok_or_else(|| ApiError::NotFound(format!("unknown chart '{}'", surface)))?;
    Ok(Json(ApiResponse::ok(charts::build(surface, dataset::get(profile)))))
}

#[derive(Deserialize)]
struct IndexQuery {
    profile: Option<String>,
}

/// GET / - Server-rendered dashboard
async fn serve_index(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> Result<Html<String>, ApiError> {
    let mut dashboard = state.lock()?;
    if let Some(raw) = query.profile {
        dashboard.select_profile(parse_profile(&raw)?)?;
    }
    Ok(Html(render_html(dashboard.profile(), dashboard.presenter()).into_string()))
}

fn hex_digest(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

// ============================================================================
// HTML
// ============================================================================

fn severity_color(severity: Option<Severity>) -> &'static str {
    match severity {
        Some(Severity::High) => "#DC2626",
        Some(Severity::Medium) => "#CA8A04",
        Some(Severity::Low) => "#16A34A",
        None => "#0F172A",
    }
}

const PAGE_CSS: &str = "body{font-family:sans-serif;background:#F8FAFC;color:#0F172A;margin:2rem}\
nav{background:#0F172A;padding:8px;border-radius:8px;display:inline-block}\
.cards{display:flex;gap:1rem;margin:1rem 0}.card{background:#fff;padding:1rem;border-radius:8px;flex:1}\
table{border-collapse:collapse;margin:1rem 0;background:#fff}\
td,th{padding:4px 10px;border-bottom:1px solid #E2E8F0;text-align:right}";

fn render_html(profile: Profile, page: &MemoryPage) -> Markup {
    html!(
        (DOCTYPE)
        html lang="en-GB" {
            head {
                meta charset="utf-8";
                title { "Cost of Living: " (profile) }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                h1 { "Cost of Living 1965 / 1995 / 2025" }
                nav {
                    @for candidate in Profile::ALL {
                        @let style = match page.control(&control_id(candidate)) {
                            Some(Emphasis::Active) => "background:#fff;color:#0F172A;font-weight:600",
                            _ => "color:#CBD5E1",
                        };
                        a
                            id=(control_id(candidate))
                            href={ "/?profile=" (candidate) }
                            style={ (style) ";padding:6px 18px;border-radius:6px;text-decoration:none" }
                        { (candidate) }
                    }
                }
                div class="cards" {
                    @for era in Era::ALL {
                        (render_card(era, page))
                    }
                }
                @for surface in Surface::ALL {
                    @if let Some(config) = page.chart(surface) {
                        (render_chart_table(surface, config))
                    }
                }
            }
        }
    )
}

fn render_card(era: Era, page: &MemoryPage) -> Markup {
    let text = |kind: SlotKind| page.text(&kind.id(era)).unwrap_or("").to_string();
    let ratio = page.slot(&SlotKind::Ratio.id(era)).and_then(|s| s.style);

    html!(
        div class="card" {
            h2 { (era) }
            p { "Income " b id=(SlotKind::Income.id(era)) { (text(SlotKind::Income)) } }
            p { "House " b id=(SlotKind::HousePrice.id(era)) { (text(SlotKind::HousePrice)) } }
            p
                id=(SlotKind::Ratio.id(era))
                style={ "font-size:1.25rem;font-weight:700;color:" (severity_color(ratio)) }
            { (text(SlotKind::Ratio)) }
        }
    )
}

fn render_chart_table(surface: Surface, config: &ChartConfig) -> Markup {
    html!(
        section id=(surface.id()) {
            h2 { (config.title) }
            table {
                tr {
                    th {}
                    @for label in &config.labels {
                        th { (label) }
                    }
                }
                @for series in &config.series {
                    tr {
                        th style={ "color:" (series.color) } { (series.label) }
                        @for point in &series.points {
                            @let cell = match surface {
                                Surface::Decoupling => currency::compact(point.value),
                                Surface::Wallet => format!("{}%", point.value),
                                Surface::BigTicket => format!("{:.1}", point.value),
                            };
                            @let title = match &point.detail {
                                Some(detail) => format!("{} / {}", point.tooltip, detail),
                                None => point.tooltip.clone(),
                            };
                            td title=(title) { (cell) }
                        }
                    }
                }
            }
        }
    )
}

// ============================================================================
// Main Server
// ============================================================================

fn app(state: AppState) -> Router {
    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/dashboard/:profile", get(get_dashboard))
        .route("/metrics/:profile", get(get_metrics))
        .route("/charts/:profile/:surface", get(get_chart))
        .with_state(state.clone());

    // Build main router
    Router::new()
        .route("/", get(serve_index))
        .with_state(state)
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("🌐 Cost Eras - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut dashboard = Dashboard::load(MemoryPage::standard())?;
    dashboard.select_profile(args.profile)?;
    info!(profile = %args.profile, "dashboard rendered");

    let state = AppState::new(dashboard);

    let listener = tokio::net::TcpListener::bind(&args.addr).await?;

    println!("\n🚀 Server running on http://{}", args.addr);
    println!("   API: http://{}/api/dashboard/single", args.addr);
    println!("   UI:  http://{}", args.addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app(state)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let dashboard = Dashboard::load(MemoryPage::standard()).unwrap();
        app(AppState::new(dashboard))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(test_app(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_dashboard_couple() {
        let (status, body) = get_json(test_app(), "/api/dashboard/couple").await;
        assert_eq!(status, StatusCode::OK);
        let slots = &body["data"]["slots"];
        assert_eq!(slots["val-inc-2025"]["text"], "£70,000");
        assert_eq!(slots["ratio-2025"]["text"], "4.1x Salary");
        assert_eq!(slots["ratio-2025"]["style"], "medium");
        assert_eq!(body["data"]["controls"]["btn-couple"], "active");
        assert!(body["data"]["charts"]["chart-wallet"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_profile_is_404() {
        let (status, body) = get_json(test_app(), "/api/dashboard/family").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_etag_not_modified() {
        let app = test_app();
        let first = app
            .clone()
            .oneshot(Request::builder().uri("/api/dashboard/single").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let etag = first.headers().get(header::ETAG).unwrap().clone();

        let second = app
            .oneshot(
                Request::builder()
                    .uri("/api/dashboard/single")
                    .header(header::IF_NONE_MATCH, etag)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_chart_endpoint() {
        let (status, body) = get_json(test_app(), "/api/charts/couple/bigticket").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["series"][1]["points"][2]["value"], 0.8);

        let (status, _) = get_json(test_app(), "/api/charts/couple/pie").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_index_html() {
        let response = test_app()
            .oneshot(Request::builder().uri("/?profile=couple").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("4.1x Salary"));
        assert!(html.contains("chart-bigticket"));
    }

    #[test]
    fn test_html_escapes_labels() {
        let dashboard = Dashboard::load(MemoryPage::standard()).unwrap();
        let html = render_html(dashboard.profile(), dashboard.presenter()).into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(!html.contains("Tax & NI"));
        assert!(html.contains("Tax &amp; NI"));
        assert!(html.contains("title=\"Tax &amp; NI: 22% / Est. Monthly Cost: £642\""));
        assert!(html.contains("8.1x Salary"));
    }
}

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::{Form, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, Response};
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::app::form::render_form_page;
use crate::formats::RawJobForm;
use crate::normalize::missing_required;
use crate::profile::DocumentProfile;
use crate::render::{build_pdf, today};

const CONTENT_DISPOSITION: &str = "attachment; filename=\"RAMS.pdf\"";

#[derive(Clone)]
pub struct AppState {
    profile: Arc<DocumentProfile>,
}

impl AppState {
    pub fn new(profile: DocumentProfile) -> Self {
        Self {
            profile: Arc::new(profile),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(form_page))
        .route("/generate", post(generate))
        .route("/healthz", get(|| async { "ok\n" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn form_page(State(state): State<AppState>) -> Html<String> {
    Html(render_form_page(&state.profile, today()))
}

async fn generate(
    State(state): State<AppState>,
    Form(raw): Form<RawJobForm>,
) -> Result<Response, (StatusCode, String)> {
    if state.profile.require_core_fields {
        let missing = missing_required(&raw);
        if !missing.is_empty() {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("missing required fields: {}", missing.join(", ")),
            ));
        }
    }

    let profile = Arc::clone(&state.profile);
    let bytes = tokio::task::spawn_blocking(move || build_pdf(&raw, &profile, today()))
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "render task failed");
            build_failure()
        })?
        .map_err(|err| {
            tracing::error!("build rams pdf: {err:#}");
            build_failure()
        })?;
    tracing::info!(
        variant = state.profile.variant.as_str(),
        bytes = bytes.len(),
        "generated rams pdf"
    );

    let mut resp = Response::new(Body::from(bytes));
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    resp.headers_mut().insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static(CONTENT_DISPOSITION),
    );
    Ok(resp)
}

fn build_failure() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "failed to build RAMS document".to_string(),
    )
}

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use riskmark_core::highlight::RawRule;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::classifier::{ClassifierBackend, ClassifierOptions};
use crate::config::{AnalysisConfig, Config};
use crate::prelude::{eprintln, *};

#[derive(Debug, clap::Args)]
pub struct Options {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    #[clap(flatten)]
    pub classifier: ClassifierOptions,
}

pub struct ServerState {
    pub classifier: ClassifierBackend,
    pub analysis: AnalysisConfig,
}

type Reply = (StatusCode, Json<Value>);

pub async fn run(options: Options, global: crate::Global, config: Config) -> Result<()> {
    let analysis = options.classifier.apply(config.analysis.clone());
    let classifier =
        ClassifierBackend::from_config(&analysis, options.classifier.google_api_key.clone())?;

    let addr = format!("{}:{}", options.host, options.port);

    if global.verbose {
        eprintln!("Classifier: {}", classifier.describe());
        eprintln!("Listening on http://{}", addr);
    }

    let app_router = router(Arc::new(ServerState {
        classifier,
        analysis,
    }));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;
    log::info!("listening on {}", addr);

    axum::serve(listener, app_router)
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

pub fn router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/analyze-policy", post(analyze_policy))
        .route("/api/highlight", post(highlight))
        .layer(cors)
        .with_state(state)
}

fn bad_request(message: &str) -> Reply {
    log::warn!("bad request: {}", message);
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy", "message": "API is running"}))
}

/// Null, `false`, zero, and empty strings, arrays or objects.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Pull the policy text out of a request body, accepting `policyText` or `text`.
///
/// An empty `policyText` counts as absent and falls through to `text`.
fn policy_text(body: &Value) -> std::result::Result<&str, &'static str> {
    let Some(object) = body.as_object() else {
        return Err("Request body must be a JSON object");
    };

    let field = ["policyText", "text"]
        .into_iter()
        .filter_map(|key| object.get(key))
        .find(|value| !is_empty_value(value));

    match field {
        None => Err("policyText or text is required and cannot be empty"),
        Some(Value::String(text)) if text.trim().is_empty() => {
            Err("policyText cannot be empty or only whitespace")
        }
        Some(Value::String(text)) => Ok(text.as_str()),
        Some(_) => Err("policyText must be a string"),
    }
}

async fn analyze_policy(State(state): State<Arc<ServerState>>, body: Bytes) -> Reply {
    let Ok(payload) = serde_json::from_slice::<Value>(&body) else {
        return bad_request("Invalid JSON format");
    };
    let text = match policy_text(&payload) {
        Ok(text) => text,
        Err(message) => return bad_request(message),
    };

    log::info!("analyzing policy text ({} chars)", text.chars().count());

    match crate::analyze::analyze_policy(&state.classifier, text, &state.analysis).await {
        Ok(analysis) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "premiumEstimate": analysis.premium_estimate,
                "sentences": analysis.sentences,
            })),
        ),
        Err(err) => {
            log::error!("policy analysis failed: {:#}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Failed to analyze policy text: {:#}", err) })),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HighlightRequest {
    pub text: String,
    #[serde(default)]
    pub rules: Vec<RawRule>,
}

async fn highlight(Json(request): Json<HighlightRequest>) -> Reply {
    match crate::highlight::highlight_text(&request.text, request.rules) {
        Ok(output) => (StatusCode::OK, Json(json!(output))),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string() })),
        ),
    }
}

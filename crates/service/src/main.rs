use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{routing::get, routing::post, Json, Router};
use serde::Deserialize;
use thiserror::Error;
use tokio::task;
use tracing::{error, info};

use logsift_core::LogLine;
use logsift_engine::{run_analysis, AnalysisConfig, AnalysisResult, EmbeddingClient, RunMeta};
use logsift_llm::LlmClient;

const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

#[derive(Clone)]
struct AppState {
    embed_client: EmbeddingClient,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();
    let embed_client = EmbeddingClient::from_env().unwrap_or_else(|_| EmbeddingClient::hash());
    let state = Arc::new(AppState { embed_client });
    let app = Router::new()
        .route("/", get(serve_ui))
        .route("/analyze", post(handle_analyze))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state);
    let addr: SocketAddr = std::env::var("LOGSIFT_BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
        .parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening" = %addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
struct AnalyzeParams {
    eps: Option<f32>,
    min_samples: Option<usize>,
    disable_ai: Option<bool>,
    term: Option<String>,
}

#[derive(Debug, Error)]
enum ServiceError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("analysis failed: {0}")]
    Internal(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

async fn handle_analyze(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyzeParams>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, ServiceError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ServiceError::BadRequest(err.to_string()))?
    {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or("upload.log").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|err| ServiceError::BadRequest(err.to_string()))?;
            upload = Some((name, bytes.to_vec()));
        }
    }
    let (file_name, bytes) =
        upload.ok_or_else(|| ServiceError::BadRequest("missing 'file' field".to_string()))?;
    let result = task::spawn_blocking(move || analyze_upload(&state, &file_name, &bytes, &params))
        .await
        .map_err(|err| ServiceError::Internal(err.to_string()))??;
    Ok(Json(result))
}

fn analyze_upload(
    state: &AppState,
    file_name: &str,
    bytes: &[u8],
    params: &AnalyzeParams,
) -> Result<AnalysisResult, ServiceError> {
    let mut config =
        AnalysisConfig::from_env().map_err(|err| ServiceError::Internal(err.to_string()))?;
    if let Some(eps) = params.eps {
        config.similarity_eps = eps;
    }
    if let Some(min_samples) = params.min_samples {
        config.min_samples = min_samples;
    }
    if params.disable_ai.unwrap_or(false) {
        config.ai_enhancement_enabled = false;
    }

    let needle = params.term.as_ref().map(|term| term.to_lowercase());
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<LogLine> = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter(|(_, line)| {
            needle
                .as_ref()
                .map(|needle| line.to_lowercase().contains(needle))
                .unwrap_or(true)
        })
        .map(|(index, line)| LogLine::located(line.trim(), PathBuf::from(file_name), index + 1))
        .collect();
    if lines.is_empty() {
        return Err(ServiceError::BadRequest(
            "no log lines in upload".to_string(),
        ));
    }

    let client = if config.ai_enhancement_enabled {
        match LlmClient::new(config.provider, config.model_identifier.clone()) {
            Ok(client) => Some(client),
            Err(err) => {
                error!("language model unavailable, degrading to fallback: {err:#}");
                config.ai_enhancement_enabled = false;
                None
            }
        }
    } else {
        None
    };

    let meta = RunMeta {
        log_directory: Some(file_name.to_string()),
        total_files: 1,
    };
    info!(file = file_name, lines = lines.len(), "running analysis");
    run_analysis(
        lines,
        &|contents| state.embed_client.embed_batch(contents),
        &|prompt| match &client {
            Some(client) => client.generate(prompt),
            None => Err(anyhow::anyhow!("language model provider unavailable")),
        },
        &config,
        meta,
    )
    .map_err(|err| ServiceError::Internal(format!("{err:#}")))
}

async fn serve_ui() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <title>logsift</title>
</head>
<body>
  <h1>logsift</h1>
  <p>Upload a log file to cluster and summarize it.</p>
  <form action="/analyze" method="post" enctype="multipart/form-data">
    <input type="file" name="file" required>
    <button type="submit">Analyze</button>
  </form>
</body>
</html>
"#;

use crate::classifier::GlyphClassifier;
use crate::classifiers::{ModelState, RUNTIME_AVAILABLE};
use crate::config::Config;
use crate::error::OcrError;
use crate::recognizer::{Recognition, Recognizer};
use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

/// Upload form served at `/`
const INDEX_HTML: &str = include_str!("../static/index.html");

/// File extensions accepted by `/upload`
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "tiff"];

/// Room for multipart framing on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<ModelState>,
    pub config: Arc<Config>,
}

/// Successful upload response
#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recognized_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// Model status response
#[derive(Serialize)]
pub struct ModelStatusResponse {
    pub loaded: bool,
    pub status: String,
    /// Whether an inference runtime is compiled in (name kept for existing clients)
    pub tensorflow_available: bool,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    let model = ModelState::load(&config);
    if !model.is_ready() {
        tracing::warn!("Starting without a classifier; recognition requests will be refused");
    }

    let addr = format!("{}:{}", config.host, config.port);
    let app = router(AppState {
        model: Arc::new(model),
        config: Arc::new(config),
    });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let max_file_size = state.config.max_file_size;

    Router::new()
        .route("/", get(handle_index))
        .route("/upload", post(handle_upload))
        .route("/model_status", get(handle_model_status))
        .route("/health", get(handle_health))
        .layer(DefaultBodyLimit::max(max_file_size + MULTIPART_OVERHEAD))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Handle upload and recognition requests
async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, OcrError> {
    let start = Instant::now();

    let mut upload: Option<(String, Bytes)> = None;

    // Parse multipart form
    let max_file_size = state.config.max_file_size;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Failed to parse multipart", max_file_size))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, "Failed to read file data", max_file_size))?;
        upload = Some((filename, data));
    }

    let (filename, data) = upload.ok_or(OcrError::MissingFile)?;
    if filename.is_empty() {
        return Err(OcrError::MissingFile);
    }

    let extension = upload_extension(&filename)
        .ok_or_else(|| OcrError::UnsupportedFormat(filename.clone()))?;

    if data.len() > state.config.max_file_size {
        return Err(OcrError::ImageTooLarge {
            size: data.len(),
            max: state.config.max_file_size,
        });
    }

    let classifier = state.model.classifier()?;
    let upload_dir = state.config.upload_dir.clone();

    let recognition = tokio::task::spawn_blocking(move || {
        recognize_upload(classifier, upload_dir.as_deref(), &extension, &data)
    })
    .await
    .map_err(|e| OcrError::Internal(format!("Recognition task failed: {}", e)))??;

    tracing::info!(
        "Recognized {} glyph(s) from '{}' in {}ms",
        recognition.glyph_count,
        filename,
        start.elapsed().as_millis()
    );

    Ok(Json(UploadResponse {
        success: true,
        recognized_text: Some(recognition.text),
        filename: Some(filename),
    }))
}

/// Body-limit failures become `UploadTooLarge`, anything else is a bad request
fn multipart_error(err: MultipartError, context: &str, max_file_size: usize) -> OcrError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        OcrError::UploadTooLarge { max: max_file_size }
    } else {
        OcrError::InvalidRequest(format!("{}: {}", context, err))
    }
}

/// Lowercased extension of `filename` if it is an accepted image type
fn upload_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Stage the upload in a temporary file and run recognition on it.
///
/// The temporary file is removed when this returns, whatever the outcome.
fn recognize_upload(
    classifier: Arc<dyn GlyphClassifier>,
    upload_dir: Option<&Path>,
    extension: &str,
    data: &[u8],
) -> Result<Recognition, OcrError> {
    let suffix = format!(".{}", extension);
    let mut builder = tempfile::Builder::new();
    builder.prefix("upload-").suffix(&suffix);

    let mut temp_file = match upload_dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|e| OcrError::Internal(format!("Failed to create temp file: {}", e)))?;

    temp_file
        .write_all(data)
        .map_err(|e| OcrError::Internal(format!("Failed to write temp file: {}", e)))?;

    Recognizer::new(classifier).recognize_file(temp_file.path())
}

/// Handle model status requests
async fn handle_model_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(ModelStatusResponse {
        loaded: state.model.is_ready(),
        status: state.model.status().to_string(),
        tensorflow_available: RUNTIME_AVAILABLE,
    })
}

/// Handle health check requests
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

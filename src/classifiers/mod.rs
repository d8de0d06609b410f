//! Glyph classifier implementations and model lifecycle
//!
//! The classifier is loaded once at startup. Loading never aborts the server:
//! any failure leaves the process running in a "not ready" state that refuses
//! recognition requests.

#[cfg(feature = "classifier-rten")]
pub mod rten;

use crate::classifier::GlyphClassifier;
use crate::config::Config;
use crate::error::OcrError;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

/// Whether an inference runtime was compiled into this binary
pub const RUNTIME_AVAILABLE: bool = cfg!(feature = "classifier-rten");

/// Process-wide classifier state, fixed after startup
#[derive(Clone)]
pub enum ModelState {
    Ready(Arc<dyn GlyphClassifier>),
    Unavailable { reason: String },
}

impl ModelState {
    /// Load the configured model, degrading to `Unavailable` on any failure
    pub fn load(config: &Config) -> Self {
        match try_load(config) {
            Ok(classifier) => {
                tracing::info!(
                    "Glyph classifier '{}' ready (model: {:?})",
                    classifier.name(),
                    config.model_path
                );
                Self::Ready(classifier)
            }
            Err(e) => {
                tracing::warn!("Glyph classifier unavailable: {}", e);
                Self::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The classifier, or the reason recognition is refused
    pub fn classifier(&self) -> Result<Arc<dyn GlyphClassifier>, OcrError> {
        match self {
            Self::Ready(classifier) => Ok(Arc::clone(classifier)),
            Self::Unavailable { reason } => Err(OcrError::ModelUnavailable(reason.clone())),
        }
    }

    /// Human-readable status for the model status endpoint
    pub fn status(&self) -> &'static str {
        match self {
            Self::Ready(_) => "model loaded",
            Self::Unavailable { .. } => "model not loaded",
        }
    }
}

#[cfg(feature = "classifier-rten")]
fn try_load(config: &Config) -> Result<Arc<dyn GlyphClassifier>, OcrError> {
    ensure_model_file(&config.model_path, config.model_url.as_deref())?;
    let classifier = rten::RtenClassifier::load(&config.model_path)?;
    Ok(Arc::new(classifier))
}

#[cfg(not(feature = "classifier-rten"))]
fn try_load(_config: &Config) -> Result<Arc<dyn GlyphClassifier>, OcrError> {
    Err(OcrError::InitializationError(
        "No inference runtime available. Build with --features classifier-rten".to_string(),
    ))
}

/// Make sure the model file exists, downloading it when a URL is configured
#[cfg_attr(not(feature = "classifier-rten"), allow(dead_code))]
fn ensure_model_file(path: &Path, url: Option<&str>) -> Result<(), OcrError> {
    if path.exists() {
        tracing::info!("Using model file {:?}", path);
        return Ok(());
    }

    let Some(url) = url else {
        return Err(OcrError::InitializationError(format!(
            "Model file not found: {}",
            path.display()
        )));
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            OcrError::InitializationError(format!("Failed to create model directory: {}", e))
        })?;
    }

    tracing::info!("Downloading model from {} (this may take a moment)...", url);
    download_file(url, path)?;
    tracing::info!("Downloaded model to {:?}", path);
    Ok(())
}

/// Download a file from URL to path using ureq
///
/// The body is streamed to disk; models are larger than ureq's in-memory
/// read limit.
#[cfg_attr(not(feature = "classifier-rten"), allow(dead_code))]
fn download_file(url: &str, path: &Path) -> Result<(), OcrError> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| OcrError::InitializationError(format!("Failed to download model: {}", e)))?;

    // Write under a temporary name so a failed download never looks like a model
    let partial = path.with_extension("part");
    let mut file = File::create(&partial).map_err(|e| {
        OcrError::InitializationError(format!("Failed to create model file: {}", e))
    })?;

    let mut reader = response.into_body().into_reader();
    let copied = io::copy(&mut reader, &mut file).and_then(|_| file.flush());
    if let Err(e) = copied {
        let _ = std::fs::remove_file(&partial);
        return Err(OcrError::InitializationError(format!(
            "Failed to write model file: {}",
            e
        )));
    }

    std::fs::rename(&partial, path)
        .map_err(|e| OcrError::InitializationError(format!("Failed to store model file: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::CanonicalGlyph;

    struct Constant;

    impl GlyphClassifier for Constant {
        fn name(&self) -> &'static str {
            "constant"
        }

        fn predict(&self, _glyph: &CanonicalGlyph) -> Result<Vec<f32>, OcrError> {
            Ok(vec![1.0])
        }
    }

    #[test]
    fn test_missing_model_degrades_to_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::for_tests(None);
        config.model_path = dir.path().join("missing.rten");

        let state = ModelState::load(&config);
        assert!(!state.is_ready());
        assert_eq!(state.status(), "model not loaded");
        assert!(matches!(
            state.classifier(),
            Err(OcrError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_corrupt_model_degrades_to_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.rten");
        std::fs::write(&path, b"definitely not a model").unwrap();

        let mut config = Config::for_tests(None);
        config.model_path = path;

        let state = ModelState::load(&config);
        assert!(!state.is_ready());
    }

    #[test]
    fn test_ready_state_hands_out_classifier() {
        let state = ModelState::Ready(Arc::new(Constant));
        assert!(state.is_ready());
        assert_eq!(state.status(), "model loaded");
        assert_eq!(state.classifier().unwrap().name(), "constant");
    }

    #[test]
    fn test_existing_model_file_skips_download() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.rten");
        std::fs::write(&path, b"weights").unwrap();

        // The URL is never contacted
        ensure_model_file(&path, Some("http://127.0.0.1:9/model.rten")).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"weights");
    }

    /// Serve `body` once over plain HTTP on a local port
    fn serve_once(body: Vec<u8>) -> String {
        use std::io::{BufRead, BufReader};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            )
            .unwrap();
            stream.write_all(&body).unwrap();
        });
        format!("http://{}/model.rten", addr)
    }

    #[test]
    fn test_download_streams_models_past_ten_megabytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models").join("big.rten");
        let body: Vec<u8> = (0..11 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
        let url = serve_once(body.clone());

        ensure_model_file(&path, Some(&url)).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), body);
        assert!(!path.with_extension("part").exists());
    }

    #[test]
    fn test_missing_model_without_url_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ensure_model_file(&dir.path().join("absent.rten"), None).unwrap_err();
        assert!(err.to_string().contains("Model file not found"));
    }
}

use crate::Args;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub model_url: Option<String>,
    pub max_file_size: usize,
    pub upload_dir: Option<PathBuf>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            model_path: args.model_path,
            model_url: args.model_url,
            max_file_size: args.max_file_size,
            upload_dir: args.upload_dir,
        }
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for in-process tests: no model, uploads in `upload_dir`.
    pub fn for_tests(upload_dir: Option<PathBuf>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            model_path: PathBuf::from("does-not-exist.rten"),
            model_url: None,
            max_file_size: 16 * 1024 * 1024,
            upload_dir,
        }
    }
}

use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: &str = "8081";
const DEFAULT_UPLOAD_DIR: &str = "public/uploads";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: String,
    pub upload_dir: PathBuf,
    pub frontend_dir: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let frontend_dir = env::var("FRONTEND_DIR").unwrap_or_else(|_| {
            if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
                format!("{}/../frontend/dist", manifest_dir)
            } else {
                "/usr/src/app/frontend/dist".to_string()
            }
        });

        let max_upload_bytes = match env::var("MAX_UPLOAD_BYTES") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                log::warn!("Invalid MAX_UPLOAD_BYTES {:?} ({}), using default", raw, e);
                DEFAULT_MAX_UPLOAD_BYTES
            }),
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Self {
            port: env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string()),
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string())
                .into(),
            frontend_dir,
            max_upload_bytes,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

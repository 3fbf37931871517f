use std::{env, net::SocketAddr, path::PathBuf};

use chrono::Duration;

use crate::error::AppError;

/// Largest accepted photo reference (a data URL or a link), in bytes.
pub const DEFAULT_MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub static_dir: PathBuf,
    /// In-transit trips older than this are flagged as overdue on the dashboard.
    pub stale_after: Option<Duration>,
    pub max_photo_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let static_dir = env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("static"));

        let stale_after = match env::var("APP_STALE_AFTER_HOURS") {
            Ok(raw) if !raw.trim().is_empty() => {
                let hours: u32 = raw.trim().parse().map_err(|err| {
                    AppError::Config(format!("invalid APP_STALE_AFTER_HOURS: {err}"))
                })?;
                Some(Duration::hours(i64::from(hours)))
            }
            _ => None,
        };

        let max_photo_bytes = match env::var("APP_MAX_PHOTO_BYTES") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|err| AppError::Config(format!("invalid APP_MAX_PHOTO_BYTES: {err}")))?,
            Err(_) => DEFAULT_MAX_PHOTO_BYTES,
        };

        Ok(Self {
            listen_addr,
            static_dir,
            stale_after,
            max_photo_bytes,
        })
    }

    /// Request body limit: five photos plus room for the text fields.
    pub fn body_limit(&self) -> usize {
        self.max_photo_bytes.saturating_mul(5).saturating_add(64 * 1024)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            static_dir: PathBuf::from("static"),
            stale_after: None,
            max_photo_bytes: DEFAULT_MAX_PHOTO_BYTES,
        }
    }
}

use std::env;
use std::num::NonZeroUsize;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 9000;
const DEFAULT_JSON_LIMIT: usize = 2 * 1024 * 1024; // 2 MB
const DEFAULT_SESSION_CAPACITY: usize = 64;

/// Service settings, read from the environment (after `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub json_limit: usize,
    /// `glpsol` executable, looked up on `PATH` unless absolute.
    pub glpsol_path: PathBuf,
    /// Parent directory of the per-solve scratch directories.
    pub scratch_dir: PathBuf,
    pub session_capacity: NonZeroUsize,
    pub sentry_dsn: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let json_limit = env::var("JSON_PAYLOAD_LIMIT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_JSON_LIMIT);

        let glpsol_path = env::var("GLPSOL_PATH")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("glpsol"));

        let scratch_dir = env::var("SCRATCH_DIR")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(env::temp_dir);

        let session_capacity = env::var("SESSION_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .and_then(NonZeroUsize::new)
            .or(NonZeroUsize::new(DEFAULT_SESSION_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);

        let sentry_dsn = env::var("SENTRY_DSN").ok().filter(|v| !v.is_empty());

        Config {
            port,
            json_limit,
            glpsol_path,
            scratch_dir,
            session_capacity,
            sentry_dsn,
        }
    }
}

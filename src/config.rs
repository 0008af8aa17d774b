use std::env;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use log::warn;

use crate::domain::problem_type::{FieldGroupMap, ProblemType};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SOLVER_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_SESSION_CAPACITY: usize = 1024;
const DEFAULT_UPLOAD_LIMIT: usize = 16 * 1024 * 1024;

/// Runtime settings read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub solver_url: String,
    pub solver_timeout: Option<Duration>,
    /// File-backed result store directory; in-memory when unset
    pub result_store_dir: Option<PathBuf>,
    pub session_capacity: NonZeroUsize,
    pub upload_limit: usize,
    pub sentry_dsn: Option<String>,
    pub field_groups: FieldGroupMap,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let solver_url = lookup("SOLVER_API_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SOLVER_URL.to_string());

        let solver_timeout = lookup("SOLVER_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let result_store_dir = lookup("RESULT_STORE_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let session_capacity = lookup("SESSION_CAPACITY")
            .and_then(|v| v.parse::<usize>().ok())
            .and_then(NonZeroUsize::new)
            .unwrap_or(NonZeroUsize::new(DEFAULT_SESSION_CAPACITY).unwrap_or(NonZeroUsize::MIN));

        let upload_limit = lookup("UPLOAD_LIMIT")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_UPLOAD_LIMIT);

        let sentry_dsn = lookup("SENTRY_DSN").filter(|s| !s.trim().is_empty());

        let mut field_groups = FieldGroupMap::default();
        for problem_type in ProblemType::ALL {
            let key = format!("FIELD_GROUPS_{}", problem_type.as_str().to_uppercase());
            let Some(value) = lookup(&key) else {
                continue;
            };
            match FieldGroupMap::parse_groups(&value) {
                Ok(groups) => field_groups = field_groups.with_groups(problem_type, groups),
                Err(err) => warn!("ignoring {}: {}", key, err),
            }
        }

        Settings {
            port,
            solver_url,
            solver_timeout,
            result_store_dir,
            session_capacity,
            upload_limit,
            sentry_dsn,
            field_groups,
        }
    }
}

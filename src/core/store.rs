use std::collections::HashSet;
use std::fmt;

use tracing::{debug, warn};

use crate::core::error::TrackError;
use crate::core::job::{seed, JobRecord};
use crate::core::storage::KeyValueStore;

pub const JOBS_KEY: &str = "trackflow-jobs-v3";
pub const THEME_KEY: &str = "trackflow-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Anything other than the literal `"dark"` reads as light.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistence boundary for the job collection and the theme flag.
#[derive(Debug)]
pub struct Store<S> {
    backend: S,
}

impl<S: KeyValueStore> Store<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Persisted collection, or the seed when absent or unreadable.
    pub fn load(&self) -> Vec<JobRecord> {
        let raw = match self.backend.get(JOBS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = JOBS_KEY, "no saved jobs, using seed");
                return seed();
            }
            Err(err) => {
                warn!(key = JOBS_KEY, error = %err, "failed to read saved jobs, using seed");
                return seed();
            }
        };

        match serde_json::from_str::<Vec<JobRecord>>(&raw) {
            Ok(jobs) => {
                let jobs = dedupe_ids(jobs);
                debug!(key = JOBS_KEY, count = jobs.len(), "loaded jobs");
                jobs
            }
            Err(err) => {
                warn!(key = JOBS_KEY, error = %err, "saved jobs are malformed, using seed");
                seed()
            }
        }
    }

    pub fn persist(&mut self, jobs: &[JobRecord]) -> Result<(), TrackError> {
        let encoded = serde_json::to_string(jobs)?;
        self.backend.set(JOBS_KEY, &encoded)?;
        debug!(key = JOBS_KEY, count = jobs.len(), "persisted jobs");
        Ok(())
    }

    pub fn load_theme(&self) -> Theme {
        match self.backend.get(THEME_KEY) {
            Ok(value) => Theme::from_stored(value.as_deref()),
            Err(err) => {
                warn!(key = THEME_KEY, error = %err, "failed to read theme, using light");
                Theme::Light
            }
        }
    }

    pub fn persist_theme(&mut self, theme: Theme) -> Result<(), TrackError> {
        self.backend.set(THEME_KEY, theme.as_str())
    }
}

fn dedupe_ids(jobs: Vec<JobRecord>) -> Vec<JobRecord> {
    let mut seen = HashSet::new();
    let before = jobs.len();
    let kept: Vec<JobRecord> = jobs
        .into_iter()
        .filter(|job| seen.insert(job.id.clone()))
        .collect();
    if kept.len() != before {
        warn!(dropped = before - kept.len(), "dropped records with duplicate ids");
    }
    kept
}

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::config::{FilterRequest, SectionError};
use crate::query::Family;
use crate::utils::{get_elapsed_time, u32_to_dotted, Asn};

/// What happened to one config section
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum RequestOutcome {
    /// Query succeeded and its output was saved
    Written { path: PathBuf, bytes: usize },
    Disabled,
    /// Query or file write failed
    Failed(String),
    /// Section was rejected while loading the config
    Invalid(String),
    /// Dry run, holds the arguments that would have been used
    Planned(String),
}

#[derive(Clone, Debug, Serialize)]
pub struct RequestReport {
    pub name: String,
    pub asn: Option<Asn>,
    /// asdot form of `asn`, e.g. "65000.100"
    pub asdot: Option<String>,
    pub family: Option<Family>,
    #[serde(flatten)]
    pub outcome: RequestOutcome,
}

impl RequestReport {
    pub fn new(request: &FilterRequest, outcome: RequestOutcome) -> Self {
        Self {
            name: request.name.clone(),
            asn: Some(request.asn),
            asdot: Some(u32_to_dotted(request.asn.0, '.')),
            family: Some(request.family()),
            outcome,
        }
    }

    /// A section dropped while loading; disabled ones count as disabled, not failed
    pub fn rejected(err: &SectionError) -> Self {
        let outcome = if err.disabled {
            RequestOutcome::Disabled
        } else {
            RequestOutcome::Invalid(err.reason.clone())
        };
        Self {
            name: err.section.clone(),
            asn: None,
            asdot: None,
            family: None,
            outcome,
        }
    }
}

/// Outcome of every section of one config file
#[derive(Clone, Debug, Serialize)]
pub struct SourceReport {
    pub name: String,
    pub config: Option<PathBuf>,
    pub requests: Vec<RequestReport>,
    pub merged: Option<PathBuf>,
    /// Set when the source as a whole could not be processed
    pub error: Option<String>,
}

impl SourceReport {
    pub fn new(name: &str, config: Option<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            config,
            requests: vec![],
            merged: None,
            error: None,
        }
    }

    pub fn failed(name: &str, config: Option<PathBuf>, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(name, config)
        }
    }

    fn count(&self, predicate: impl Fn(&RequestOutcome) -> bool) -> usize {
        self.requests.iter().filter(|r| predicate(&r.outcome)).count()
    }

    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, RequestOutcome::Written { .. }))
    }

    pub fn disabled(&self) -> usize {
        self.count(|o| matches!(o, RequestOutcome::Disabled))
    }

    /// Failed queries plus invalid sections
    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, RequestOutcome::Failed(_) | RequestOutcome::Invalid(_)))
    }

    pub fn planned(&self) -> usize {
        self.count(|o| matches!(o, RequestOutcome::Planned(_)))
    }

    pub fn is_clean(&self) -> bool {
        self.error.is_none() && self.failed_count() == 0
    }

    /// Turn written requests whose file was left out of the merge into failures
    pub fn mark_unmerged(&mut self, skipped: &[PathBuf]) {
        for request in &mut self.requests {
            let missing = match &request.outcome {
                RequestOutcome::Written { path, .. } => skipped.contains(path),
                _ => false,
            };
            if missing {
                request.outcome = RequestOutcome::Failed(format!(
                    "{} is missing from the merged file",
                    request.name
                ));
            }
        }
    }
}

/// Run-wide context collecting every source's outcome
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub started: DateTime<Utc>,
    pub finished: Option<DateTime<Utc>>,
    pub dry_run: bool,
    pub sources: Vec<SourceReport>,
}

impl RunReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            started: Utc::now(),
            finished: None,
            dry_run,
            sources: vec![],
        }
    }

    pub fn finish(&mut self) {
        self.finished = Some(Utc::now());
    }

    pub fn elapsed(&self) -> Duration {
        match self.finished {
            Some(finished) => finished.signed_duration_since(self.started),
            None => get_elapsed_time(self.started),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.sources.iter().map(SourceReport::succeeded).sum()
    }

    pub fn failed_count(&self) -> usize {
        self.sources.iter().map(SourceReport::failed_count).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.sources.iter().all(SourceReport::is_clean)
    }

    /// Save the report as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }
}

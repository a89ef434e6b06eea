use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::config::{scan_dir, source_name, ConfigSource, FilterRequest};
use crate::error::Error;
use crate::merge::{merge_filters, MERGED_FILE_NAME};
use crate::query::{FilterQuery, QueryArgs, QueryOptions};
use crate::report::{RequestOutcome, RequestReport, RunReport, SourceReport};

/// Directory holding the per-section files of a source
pub const FILTERS_DIR: &str = "filters";
/// Extension of every generated filter file
pub const FILTER_EXTENSION: &str = "conf";

/// `<root>/<source>/filters/<request>.conf`
pub fn filter_path(output_root: &Path, source: &str, request: &str) -> PathBuf {
    output_root
        .join(source)
        .join(FILTERS_DIR)
        .join(format!("{}.{}", request, FILTER_EXTENSION))
}

/// `<root>/<source>/filtersprefix.conf`
pub fn merged_path(output_root: &Path, source: &str) -> PathBuf {
    output_root.join(source).join(MERGED_FILE_NAME)
}

/// Drives config sources through the query tool, one request at a time
pub struct Runner<Q> {
    query: Q,
    output_root: PathBuf,
    options: QueryOptions,
    dry_run: bool,
}

impl<Q: FilterQuery> Runner<Q> {
    pub fn new<P: Into<PathBuf>>(query: Q, output_root: P, options: QueryOptions) -> Self {
        Self {
            query,
            output_root: output_root.into(),
            options,
            dry_run: false,
        }
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Log the queries that would run without invoking anything or writing files
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Process every config file in `config_dir`
    ///
    /// Only setup problems are returned as errors, everything else ends up in the report.
    pub async fn run(&self, config_dir: &Path) -> Result<RunReport, Error> {
        let files = scan_dir(config_dir)?;
        info!("Found {} config file(s) in {}", files.len(), config_dir.display());
        if !self.dry_run {
            fs::create_dir_all(&self.output_root).map_err(|source| Error::OutputRoot {
                path: self.output_root.clone(),
                source,
            })?;
        }

        let mut report = RunReport::new(self.dry_run);
        for path in files {
            let source_report = match ConfigSource::from_file(&path) {
                Ok(source) => self.run_source(&source).await,
                Err(err) => {
                    error!("{}", err);
                    SourceReport::failed(&source_name(&path), Some(path.clone()), err.to_string())
                }
            };
            report.sources.push(source_report);
        }
        report.finish();
        Ok(report)
    }

    /// Query every enabled request of `source` and merge the results
    pub async fn run_source(&self, source: &ConfigSource) -> SourceReport {
        info!(
            "Processing config {} ({} enabled section(s))",
            source.name,
            source.enabled().count()
        );
        let mut report = SourceReport::new(&source.name, source.path.clone());
        report
            .requests
            .extend(source.rejected.iter().map(RequestReport::rejected));

        let filters_dir = self.output_root.join(&source.name).join(FILTERS_DIR);
        if !self.dry_run {
            if let Err(err) = fs::create_dir_all(&filters_dir) {
                error!("Failed to create {}: {}", filters_dir.display(), err);
                report.error = Some(format!("Failed to create {}: {}", filters_dir.display(), err));
                return report;
            }
        }

        let mut written = Vec::new();
        for request in &source.requests {
            let outcome = self.run_request(source, request).await;
            if let RequestOutcome::Written { path, .. } = &outcome {
                written.push(path.clone());
            }
            report.requests.push(RequestReport::new(request, outcome));
        }
        if self.dry_run {
            return report;
        }

        if written.is_empty() {
            warn!("No filters were generated for {}", source.name);
        }
        let merged = merged_path(&self.output_root, &source.name);
        match merge_filters(&merged, &written) {
            Ok(result) => {
                info!(
                    "Merged {} file(s) to {} ({} bytes)",
                    written.len() - result.skipped.len(),
                    merged.display(),
                    result.bytes
                );
                report.mark_unmerged(&result.skipped);
                report.merged = Some(merged);
            }
            Err(err) => {
                error!("Failed to merge {}: {}", merged.display(), err);
                report.error = Some(format!("Failed to merge {}: {}", merged.display(), err));
            }
        }
        report
    }

    async fn run_request(&self, source: &ConfigSource, request: &FilterRequest) -> RequestOutcome {
        if !request.enabled {
            debug!("Skipping disabled section {}", request.name);
            return RequestOutcome::Disabled;
        }
        let query = QueryArgs::build(request, &self.options);
        info!(
            "{}: {} {} ({})",
            request.name, self.options.program, query, query.family
        );
        if self.dry_run {
            return RequestOutcome::Planned(query.to_string());
        }

        let output = match self.query.run(&query).await {
            Ok(output) => output,
            Err(err) => {
                error!("{}: {}", request.name, err);
                return RequestOutcome::Failed(err.to_string());
            }
        };
        let path = filter_path(&self.output_root, &source.name, &request.name);
        match fs::write(&path, &output) {
            Ok(()) => {
                info!("Saved to: {}", path.display());
                RequestOutcome::Written {
                    path,
                    bytes: output.len(),
                }
            }
            Err(err) => {
                error!("Failed to write {}: {}", path.display(), err);
                RequestOutcome::Failed(format!("Failed to write {}: {}", path.display(), err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_paths() {
        let root = Path::new("output");
        assert_eq!(
            filter_path(root, "demo", "PFX_AS100"),
            PathBuf::from("output/demo/filters/PFX_AS100.conf")
        );
        assert_eq!(
            merged_path(root, "demo"),
            PathBuf::from("output/demo/filtersprefix.conf")
        );
    }
}

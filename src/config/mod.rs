mod file;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;

use crate::error::Error;
use crate::query::Family;
use crate::utils::Asn;

use file::{ConfigFileSpec, FilterRequestSpec};

/// Extension of the files picked up from the config directory
pub const CONFIG_EXTENSION: &str = "toml";

/// A config file that could not be used at all
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {file}: {source}")]
    Read { file: String, source: io::Error },
    #[error("Failed to parse config file {file}: {source}")]
    Parse {
        file: String,
        source: toml::de::Error,
    },
}

/// A single section that was rejected while its siblings were kept
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Invalid section [{section}]: {reason}")]
pub struct SectionError {
    pub section: String,
    pub reason: String,
    /// The section parsed but is not enabled, so it would never have been queried
    pub disabled: bool,
}

/// In-memory representation of one validated config section
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterRequest {
    /// Section name, also the output file stem
    pub name: String,
    pub enabled: bool,
    pub ipv6: bool,
    pub asn: Asn,
}

impl FilterRequest {
    pub fn family(&self) -> Family {
        if self.ipv6 {
            Family::Ipv6
        } else {
            Family::Ipv4
        }
    }

    fn from_spec(name: &str, spec: FilterRequestSpec) -> Result<Self, SectionError> {
        let disabled = !spec.enabled;
        let invalid = |reason: String| SectionError {
            section: name.to_string(),
            reason,
            disabled,
        };
        check_section_name(name).map_err(invalid)?;
        let from = spec
            .from
            .ok_or_else(|| invalid("Missing required field `from`".to_string()))?;
        let asn = from
            .as_text()
            .parse::<Asn>()
            .map_err(|err| invalid(err.reason))?;
        Ok(Self {
            name: name.to_string(),
            enabled: spec.enabled,
            ipv6: spec.ipv6,
            asn,
        })
    }
}

/// One config file: its name (output subdirectory) and its sections in declared order
#[derive(Clone, Debug)]
pub struct ConfigSource {
    pub name: String,
    pub path: Option<PathBuf>,
    pub requests: Vec<FilterRequest>,
    pub rejected: Vec<SectionError>,
}

impl ConfigSource {
    /// Read and validate a config file, named after its file stem
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            file: path.display().to_string(),
            source,
        })?;
        let mut config = Self::parse(&source_name(path), &contents).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                file: path.display().to_string(),
                source,
            },
            other => other,
        })?;
        config.path = Some(path.to_owned());
        Ok(config)
    }

    /// Parse config contents for a source called `name`
    ///
    /// Fails only when `contents` isn't valid TOML; invalid sections are
    /// collected in `rejected` instead.
    pub fn parse(name: &str, contents: &str) -> Result<Self, ConfigError> {
        let spec = ConfigFileSpec::from_str(contents).map_err(|source| ConfigError::Parse {
            file: name.to_string(),
            source,
        })?;
        let mut requests = Vec::with_capacity(spec.sections.len());
        let mut rejected = Vec::new();
        for (section, value) in spec.sections {
            let request = FilterRequestSpec::from_value(value)
                .map_err(|reason| SectionError {
                    section: section.clone(),
                    reason,
                    disabled: false,
                })
                .and_then(|spec| FilterRequest::from_spec(&section, spec));
            match request {
                Ok(request) => requests.push(request),
                Err(err) if err.disabled => {
                    warn!("{}: {} (section is disabled, ignoring)", name, err);
                    rejected.push(err);
                }
                Err(err) => {
                    warn!("{}: {}", name, err);
                    rejected.push(err);
                }
            }
        }
        debug!(
            "Loaded {} section(s) from {} ({} rejected)",
            requests.len(),
            name,
            rejected.len()
        );
        Ok(Self {
            name: name.to_string(),
            path: None,
            requests,
            rejected,
        })
    }

    pub fn enabled(&self) -> impl Iterator<Item = &FilterRequest> {
        self.requests.iter().filter(|r| r.enabled)
    }
}

/// Output subdirectory name for a config file (file name without extension)
pub fn source_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// List the config files directly inside `dir`, sorted by file name
pub fn scan_dir(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let dir_error = |source| Error::ConfigDir {
        path: dir.to_owned(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(dir_error)? {
        let path = entry.map_err(dir_error)?.path();
        let is_config = path
            .extension()
            .map_or(false, |ext| ext == CONFIG_EXTENSION);
        if is_config && path.is_file() {
            files.push(path);
        }
    }
    if files.is_empty() {
        return Err(Error::NoConfigFiles(dir.to_owned()));
    }
    files.sort();
    Ok(files)
}

// Section names become file names under `filters/`
fn check_section_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(format!("'{}' can't be used as a file name", name));
    }
    if name.contains(|c: char| c == '/' || c == '\\' || c == '\0') {
        return Err(format!("'{}' contains a path separator", name));
    }
    Ok(())
}

use std::fmt;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use clap::ArgEnum;
use log::{debug, trace};
use serde::Serialize;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

use crate::config::FilterRequest;
use crate::utils::Asn;

/// Default name of the query binary, resolved through PATH
pub const DEFAULT_PROGRAM: &str = "bgpq4";
/// Default per-query timeout in seconds
pub const DEFAULT_TIMEOUT: u64 = 120;

/// Address family of the generated prefix list
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Family {
    Ipv4,
    Ipv6,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let display = match self {
            Family::Ipv4 => "IPv4",
            Family::Ipv6 => "IPv6",
        };
        write!(f, "{}", display)
    }
}

/// Router configuration dialect bgpq4 should emit
#[derive(ArgEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Bird,
    Juniper,
    Cisco,
    Json,
}

impl OutputFormat {
    fn flag(self) -> Option<&'static str> {
        match self {
            OutputFormat::Bird => Some("-b"),
            OutputFormat::Juniper => Some("-J"),
            OutputFormat::Cisco => None, // bgpq4 default
            OutputFormat::Json => Some("-j"),
        }
    }

    fn list_name(self, name: &str) -> String {
        match self {
            OutputFormat::Bird => format!("define {}", name),
            _ => name.to_string(),
        }
    }
}

/// Settings shared by every query of a run
#[derive(Clone, Debug)]
pub struct QueryOptions {
    pub program: String,
    pub format: OutputFormat,
    /// IRR server to query instead of bgpq4's default (`-h`)
    pub irr_host: Option<String>,
    /// Comma separated IRR sources (`-S`)
    pub sources: Option<String>,
    pub timeout: Option<Duration>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            format: OutputFormat::Bird,
            irr_host: None,
            sources: None,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT)),
        }
    }
}

/// Arguments for a single bgpq4 invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryArgs {
    pub family: Family,
    pub asn: Asn,
    pub args: Vec<String>,
}

impl QueryArgs {
    pub fn build(request: &FilterRequest, options: &QueryOptions) -> Self {
        let family = request.family();
        let mut args = Vec::with_capacity(8);
        if family == Family::Ipv6 {
            args.push("-6".to_string());
        }
        if let Some(flag) = options.format.flag() {
            args.push(flag.to_string());
        }
        if let Some(host) = &options.irr_host {
            args.push("-h".to_string());
            args.push(host.clone());
        }
        if let Some(sources) = &options.sources {
            args.push("-S".to_string());
            args.push(sources.clone());
        }
        args.push("-l".to_string());
        args.push(options.format.list_name(&request.name));
        args.push(request.asn.to_string());
        Self {
            family,
            asn: request.asn,
            args,
        }
    }
}

impl fmt::Display for QueryArgs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let args: Vec<_> = self
            .args
            .iter()
            .map(|arg| {
                if arg.contains(' ') {
                    format!("\"{}\"", arg)
                } else {
                    arg.clone()
                }
            })
            .collect();
        write!(f, "{}", args.join(" "))
    }
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Failed to launch {program}: {source}")]
    Spawn { program: String, source: io::Error },
    #[error("{program} exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("{program} timed out after {}s", .timeout.as_secs())]
    Timeout { program: String, timeout: Duration },
}

/// Something that can turn query arguments into filter text
///
/// The returned bytes are stored as-is, without any decoding.
#[async_trait]
pub trait FilterQuery: Send + Sync {
    async fn run(&self, query: &QueryArgs) -> Result<Vec<u8>, QueryError>;
}

/// Runs the bgpq4 binary as a subprocess
#[derive(Clone, Debug)]
pub struct Bgpq4 {
    program: String,
    timeout: Option<Duration>,
}

impl Bgpq4 {
    pub fn new(options: &QueryOptions) -> Self {
        Self {
            program: options.program.clone(),
            timeout: options.timeout,
        }
    }
}

#[async_trait]
impl FilterQuery for Bgpq4 {
    async fn run(&self, query: &QueryArgs) -> Result<Vec<u8>, QueryError> {
        let mut command = Command::new(&self.program);
        command
            .args(&query.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        let output = match self.timeout {
            Some(limit) => timeout(limit, command.output())
                .await
                .map_err(|_| QueryError::Timeout {
                    program: self.program.clone(),
                    timeout: limit,
                })?,
            None => command.output().await,
        }
        .map_err(|source| QueryError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        debug!(
            "{} {} exited with {} ({} bytes)",
            self.program,
            query.asn,
            output.status,
            output.stdout.len()
        );
        if !output.status.success() {
            return Err(QueryError::Exit {
                program: self.program.clone(),
                status: describe_status(&output.status),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        trace!("{}", String::from_utf8_lossy(&output.stdout));
        Ok(output.stdout)
    }
}

fn describe_status(status: &ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

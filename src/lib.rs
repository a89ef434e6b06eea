//! Generate BGP prefix filters with [bgpq4](https://github.com/bgp/bgpq4).
//!
//! Every `*.toml` file in the config directory is a source; each of its
//! sections asks for one prefix list:
//!
//! ```toml
//! [PFX_AS100]
//! enabled = true
//! ipv6 = false
//! from = "AS100"
//! ```
//!
//! Output goes to `<output>/<source>/filters/<section>.conf`, and the
//! sections of a source are concatenated in declared order into
//! `<output>/<source>/filtersprefix.conf`.

pub mod config;
mod error;
pub mod merge;
pub mod query;
pub mod report;
pub mod runner;
pub mod utils;

pub use config::{ConfigSource, FilterRequest};
pub use error::Error;
pub use query::{Bgpq4, Family, FilterQuery, OutputFormat, QueryArgs, QueryError, QueryOptions};
pub use report::{RequestOutcome, RunReport, SourceReport};
pub use runner::Runner;

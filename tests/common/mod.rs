#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use bgp_filters::utils::Asn;
use bgp_filters::{Family, FilterQuery, QueryArgs, QueryError};

/// Canned bgpq4 answers keyed by (ASN, family); unknown queries exit 1
#[derive(Default)]
pub struct StubQuery {
    responses: HashMap<(Asn, Family), Vec<u8>>,
    pub calls: Mutex<Vec<Vec<String>>>,
}

impl StubQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<O: AsRef<[u8]>>(mut self, asn: u32, family: Family, output: O) -> Self {
        self.responses
            .insert((Asn(asn), family), output.as_ref().to_vec());
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FilterQuery for StubQuery {
    async fn run(&self, query: &QueryArgs) -> Result<Vec<u8>, QueryError> {
        self.calls.lock().unwrap().push(query.args.clone());
        self.responses
            .get(&(query.asn, query.family))
            .cloned()
            .ok_or_else(|| QueryError::Exit {
                program: "bgpq4".to_string(),
                status: "status 1".to_string(),
                stderr: format!("no data for {}", query.asn),
            })
    }
}

pub fn write_config(dir: &Path, name: &str, contents: &str) {
    fs::create_dir_all(dir).expect("config dir");
    fs::write(dir.join(name), contents).expect("write config");
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|err| panic!("{}: {}", path.display(), err))
}

pub const DEMO_CONFIG: &str = r#"
[PFX_AS100]
enabled = true
ipv6 = false
from = "AS100"

[PFX_AS200]
enabled = true
ipv6 = true
from = "200"
"#;

pub const AS100_V4: &str = "route 1.2.3.0/24;\n";
pub const AS200_V6: &str = "route6 2001:db8::/32;\n";

/// Write an executable shell script standing in for bgpq4
#[cfg(unix)]
pub fn stub_bgpq4(dir: &Path, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("bgpq4");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write stub");
    let mut perms = fs::metadata(&path).expect("stub metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod stub");
    path
}

/// Answers like bgpq4 would for AS100 (IPv4) and AS200 (IPv6)
pub const DEMO_STUB: &str = r#"
for arg in "$@"; do last="$arg"; done
case "$1" in -6) family=6 ;; *) family=4 ;; esac
case "$family:$last" in
  4:AS100) printf 'route 1.2.3.0/24;\n' ;;
  6:AS200) printf 'route6 2001:db8::/32;\n' ;;
  *) echo "no data for $last" >&2; exit 1 ;;
esac
"#;

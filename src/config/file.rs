use serde::Deserialize;
use toml::value::{Table, Value};

struct Defaults {}

impl Defaults {
    fn enabled() -> bool {
        false
    }

    fn ipv6() -> bool {
        false
    }
}

/// AS identifier as written in the config, `from = "AS65000"` or `from = 65000`
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum AsnSpec {
    Text(String),
    Number(i64),
}

impl AsnSpec {
    pub(super) fn as_text(&self) -> String {
        match self {
            AsnSpec::Text(text) => text.clone(),
            AsnSpec::Number(number) => number.to_string(),
        }
    }
}

/// Config (toml) representation of a single filter section
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct FilterRequestSpec {
    // Only enabled sections are queried
    #[serde(default = "Defaults::enabled")]
    pub(super) enabled: bool,

    // Query IPv6 prefixes instead of IPv4
    #[serde(default = "Defaults::ipv6")]
    pub(super) ipv6: bool,

    // Required, validated after deserializing so the error names the section
    pub(super) from: Option<AsnSpec>,
}

/// Top-level sections of one config file, in declaration order
#[derive(Debug)]
pub(super) struct ConfigFileSpec {
    pub(super) sections: Vec<(String, Value)>,
}

impl ConfigFileSpec {
    pub(super) fn from_str(contents: &str) -> Result<Self, toml::de::Error> {
        let table: Table = toml::from_str(contents)?;
        Ok(Self {
            sections: table.into_iter().collect(),
        })
    }
}

impl FilterRequestSpec {
    pub(super) fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Table(_) => value.try_into().map_err(|err| err.to_string()),
            other => Err(format!(
                "Expected a table, found a {}",
                other.type_str()
            )),
        }
    }
}

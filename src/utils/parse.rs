use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("ParseError: {reason}")]
pub struct ParseError {
    pub reason: String,
}

impl ParseError {
    pub fn new(reason: String) -> Self {
        ParseError { reason }
    }
}

/// Convert an ASN string to a u32
/// E.g. "65000.100" -> 4259840100
pub fn asn_from_dotted(value: &str) -> Result<u32, ParseError> {
    // Parse to list of u32, since we should support 4 byte ASN as a single int
    // (E.g. "4259840100")
    let mut chunks = [0; 2];
    let check_for_overflow = value.contains('.');
    // Iterate through chunks in reverse, so if there's no dot (only one number),
    // it will be in the least significant position
    for (i, chunk) in value.splitn(2, '.').collect::<Vec<_>>().into_iter().rev().enumerate() {
        // u32::from_str would also take a leading '+'
        if chunk.is_empty() || !chunk.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::new(format!("Not a valid ASN: '{}'", value)));
        }
        let chunk: u32 = chunk
            .parse()
            .map_err(|err| ParseError::new(format!("{} '{}'", err, value)))?;
        if check_for_overflow && chunk > u32::from(u16::MAX) {
            return Err(ParseError::new(format!("Unsupported ASN '{}'", value)));
        }
        chunks[i] = chunk;
    }
    Ok((chunks[1] << 16) + chunks[0])
}

/// Autonomous System number, normalized from "65000", "AS65000" or "as65000.100"
///
/// Always displayed with the "AS" prefix, which is the form bgpq4 receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Asn(pub u32);

impl FromStr for Asn {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let number = match trimmed.get(..2) {
            Some(prefix) if prefix.eq_ignore_ascii_case("as") => &trimmed[2..],
            _ => trimmed,
        };
        let asn = asn_from_dotted(number)
            .map_err(|_| ParseError::new(format!("Not a valid AS number: '{}'", value)))?;
        // AS0 is reserved and never originates routes (RFC 7607)
        if asn == 0 {
            return Err(ParseError::new(format!("Reserved AS number: '{}'", value)));
        }
        Ok(Asn(asn))
    }
}

impl fmt::Display for Asn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AS{}", self.0)
    }
}

impl Serialize for Asn {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asn_from_dotted() {
        assert_eq!(asn_from_dotted("100"), Ok(100));
        assert_eq!(asn_from_dotted("65000.100"), Ok(4259840100));
        assert_eq!(asn_from_dotted("4259840100"), Ok(4259840100));
        assert!(asn_from_dotted("65536.1").is_err());
        assert!(asn_from_dotted("65000.").is_err());
        assert!(asn_from_dotted("+100").is_err());
        assert!(asn_from_dotted("4294967296").is_err());
    }

    #[test]
    fn test_asn_normalization() {
        let expected = Asn(65000);
        for value in &["65000", "AS65000", "as65000", "As65000", " AS65000 "] {
            assert_eq!(value.parse::<Asn>(), Ok(expected), "{}", value);
        }
        assert_eq!("AS65000.100".parse::<Asn>(), Ok(Asn(4259840100)));
    }

    #[test]
    fn test_asn_rejects_malformed() {
        for value in &["", "AS", "AS-EXAMPLE", "65k", "AS 65000", "ASAS100", "AS0", "1.2.3"] {
            assert!(value.parse::<Asn>().is_err(), "{} should be rejected", value);
        }
    }

    #[test]
    fn test_asn_display() {
        assert_eq!(Asn(65000).to_string(), "AS65000");
        assert_eq!(
            serde_json::to_string(&Asn(100)).unwrap(),
            "\"AS100\"".to_string()
        );
    }
}

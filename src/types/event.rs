//! Calendar identity types: events, session kinds and driver numbers

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chronological ordering key of an event: `(year, round_number)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventKey {
    pub year: i32,
    pub round_number: u32,
}

impl EventKey {
    pub fn new(year: i32, round_number: u32) -> Self {
        Self { year, round_number }
    }

    /// Whether no earlier round exists in this season.
    pub fn is_season_opener(&self) -> bool {
        self.round_number <= 1
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} round {}", self.year, self.round_number)
    }
}

/// A scheduled competition round
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Event {
    /// Season year
    pub year: i32,
    /// Round number within the season, starting at 1
    pub round_number: u32,
    /// Event name, e.g. "Spanish Grand Prix"
    #[serde(rename = "EventName")]
    pub name: String,
}

impl Event {
    pub fn new(year: i32, round_number: u32, name: impl Into<String>) -> Self {
        Self { year, round_number, name: name.into() }
    }

    pub fn key(&self) -> EventKey {
        EventKey::new(self.year, self.round_number)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (round {})", self.year, self.name, self.round_number)
    }
}

/// Timed activity within an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionType {
    Race,
    Qualifying,
}

impl SessionType {
    /// Short session identifier used by timing providers ("R" / "Q").
    pub fn identifier(self) -> &'static str {
        match self {
            SessionType::Race => "R",
            SessionType::Qualifying => "Q",
        }
    }

    /// Parse a session identifier or full name.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier.trim().to_ascii_lowercase().as_str() {
            "r" | "race" => Some(SessionType::Race),
            "q" | "qualifying" => Some(SessionType::Qualifying),
            _ => None,
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionType::Race => f.write_str("Race"),
            SessionType::Qualifying => f.write_str("Qualifying"),
        }
    }
}

/// How a session provider should locate an event within a season
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionRef {
    /// By round number
    Round(u32),
    /// By event name (providers may match loosely)
    Name(String),
}

impl From<u32> for SessionRef {
    fn from(round: u32) -> Self {
        SessionRef::Round(round)
    }
}

impl From<&str> for SessionRef {
    fn from(name: &str) -> Self {
        SessionRef::Name(name.to_string())
    }
}

impl fmt::Display for SessionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionRef::Round(round) => write!(f, "round {}", round),
            SessionRef::Name(name) => write!(f, "'{}'", name),
        }
    }
}

/// Car number identifying a driver within a session, e.g. "44"
///
/// Serialized as a string. Deserializes from either a string or an integer, so
/// archives may write `DriverNumber: 44` unquoted.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DriverNumber(String);

impl DriverNumber {
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DriverNumber {
    fn from(number: &str) -> Self {
        Self::new(number)
    }
}

impl From<u32> for DriverNumber {
    fn from(number: u32) -> Self {
        Self(number.to_string())
    }
}

impl<'de> Deserialize<'de> for DriverNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DriverNumberVisitor;

        impl Visitor<'_> for DriverNumberVisitor {
            type Value = DriverNumber;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a car number as a string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(DriverNumber::from(v))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(DriverNumber(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(DriverNumber(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(DriverNumber(v.to_string()))
            }
        }

        deserializer.deserialize_any(DriverNumberVisitor)
    }
}

impl fmt::Display for DriverNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_keys_order_chronologically() {
        let mut keys = vec![EventKey::new(2024, 2), EventKey::new(2023, 22), EventKey::new(2024, 1)];
        keys.sort();
        assert_eq!(keys, vec![EventKey::new(2023, 22), EventKey::new(2024, 1), EventKey::new(2024, 2)]);
    }

    #[test]
    fn session_identifiers_round_trip() {
        for session_type in [SessionType::Race, SessionType::Qualifying] {
            assert_eq!(SessionType::from_identifier(session_type.identifier()), Some(session_type));
        }
        assert_eq!(SessionType::from_identifier("Qualifying"), Some(SessionType::Qualifying));
        assert_eq!(SessionType::from_identifier("FP1"), None);
    }

    #[test]
    fn driver_number_is_transparent_in_yaml() {
        let driver: DriverNumber = serde_yaml_ng::from_str("'44'").unwrap();
        assert_eq!(driver, DriverNumber::from("44"));
        assert_eq!(DriverNumber::from(1u32).as_str(), "1");
    }

    #[test]
    fn unquoted_driver_numbers_deserialize() {
        let row: crate::types::ResultRow =
            serde_yaml_ng::from_str("DriverNumber: 44
TeamName: Ferrari
Position: 3
").unwrap();
        assert_eq!(row.driver_number.as_str(), "44");
        assert_eq!(row.position, Some(3));

        let driver: DriverNumber = serde_yaml_ng::from_str("1").unwrap();
        assert_eq!(driver, DriverNumber::from(1u32));
        assert!(serde_yaml_ng::from_str::<DriverNumber>("[44]").is_err());
    }
}

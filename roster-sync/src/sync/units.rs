//! Unit types and the delimited unit-number sets stored in merge fields

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::SyncError;

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,]+").expect("separator pattern is valid"));

/// The five organizational unit kinds, each backed by one merge field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitType {
    Troop,
    Pack,
    Crew,
    Ship,
    Team,
}

impl UnitType {
    /// Merge field holding this unit type's memberships
    pub fn field_name(&self) -> &'static str {
        match self {
            UnitType::Troop => "TROOPS",
            UnitType::Pack => "PACKS",
            UnitType::Crew => "CREWS",
            UnitType::Ship => "SHIPS",
            UnitType::Team => "TEAMS",
        }
    }

    pub fn all_variants() -> &'static [UnitType] {
        &[
            UnitType::Troop,
            UnitType::Pack,
            UnitType::Crew,
            UnitType::Ship,
            UnitType::Team,
        ]
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitType::Troop => write!(f, "Troop"),
            UnitType::Pack => write!(f, "Pack"),
            UnitType::Crew => write!(f, "Crew"),
            UnitType::Ship => write!(f, "Ship"),
            UnitType::Team => write!(f, "Team"),
        }
    }
}

impl FromStr for UnitType {
    type Err = SyncError;

    /// Accepts the roster spelling, ignoring case and surrounding blanks
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        UnitType::all_variants()
            .iter()
            .copied()
            .find(|t| t.to_string().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SyncError::UnknownUnitType(s.to_string()))
    }
}

/// Ordered, duplicate-free set of unit numbers parsed from a merge field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitSet {
    units: Vec<String>,
}

impl UnitSet {
    /// Split on runs of whitespace and commas; blank input is the empty set
    pub fn parse(raw: &str) -> Self {
        let mut set = UnitSet::default();
        for token in SEPARATORS.split(raw.trim()) {
            if !token.is_empty() {
                set.insert(token);
            }
        }
        set
    }

    pub fn contains(&self, unit: &str) -> bool {
        self.units.iter().any(|u| u == unit)
    }

    /// Append `unit` unless present. Returns whether the set changed.
    pub fn insert(&mut self, unit: &str) -> bool {
        if self.contains(unit) {
            return false;
        }
        self.units.push(unit.to_string());
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(String::as_str)
    }

    /// Comma-joined form written back to the merge field
    pub fn to_field_value(&self) -> String {
        self.units.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_type_field_names() {
        assert_eq!("Troop".parse::<UnitType>().unwrap().field_name(), "TROOPS");
        assert_eq!("Pack".parse::<UnitType>().unwrap().field_name(), "PACKS");
        assert_eq!("Crew".parse::<UnitType>().unwrap().field_name(), "CREWS");
        assert_eq!("Ship".parse::<UnitType>().unwrap().field_name(), "SHIPS");
        assert_eq!("Team".parse::<UnitType>().unwrap().field_name(), "TEAMS");
    }

    #[test]
    fn test_unit_type_is_lenient_about_case() {
        assert_eq!(" troop ".parse::<UnitType>().unwrap(), UnitType::Troop);
    }

    #[test]
    fn test_unknown_unit_type() {
        let err = "Den".parse::<UnitType>().unwrap_err();
        assert!(matches!(err, SyncError::UnknownUnitType(ref t) if t == "Den"));
        assert!("".parse::<UnitType>().is_err());
    }

    #[test]
    fn test_parse_mixed_separators() {
        let set = UnitSet::parse(" 10, 42  7,,\t99 ");
        assert_eq!(set.to_field_value(), "10,42,7,99");
        assert!(set.contains("7"));
    }

    #[test]
    fn test_parse_blank_is_empty() {
        assert_eq!(UnitSet::parse(""), UnitSet::default());
        assert_eq!(UnitSet::parse("  ,  "), UnitSet::default());
    }

    #[test]
    fn test_parse_drops_duplicates() {
        assert_eq!(UnitSet::parse("10,42,10").to_field_value(), "10,42");
    }

    #[test]
    fn test_insert_existing_is_noop() {
        let mut set = UnitSet::parse("10,42");
        assert!(!set.insert("42"));
        assert_eq!(set.to_field_value(), "10,42");
        assert!(set.insert("99"));
        assert_eq!(set.to_field_value(), "10,42,99");
    }

    #[test]
    fn test_tokens_match_exactly() {
        let set = UnitSet::parse("142");
        assert!(!set.contains("42"));
    }
}

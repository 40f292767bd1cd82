//! Faculty profile and the closed vocabularies it is built from
//!
//! The pay hierarchy is a fixed sequence (10 -> 11 -> 12 -> 13A1 -> 14), so
//! levels are a closed enum with a `next()` walk rather than free strings;
//! anything else is rejected at the edge as [`EngineError::UnknownLevel`].

use crate::dates::sub_years;
use crate::error::EngineError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Academic pay levels of the 7th CPC matrix, in promotion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PayLevel {
    #[serde(rename = "10")]
    L10,
    #[serde(rename = "11")]
    L11,
    #[serde(rename = "12")]
    L12,
    #[serde(rename = "13A1")]
    L13A1,
    #[serde(rename = "14")]
    L14,
}

impl PayLevel {
    /// All levels in promotion order.
    pub const ALL: [PayLevel; 5] = [
        PayLevel::L10,
        PayLevel::L11,
        PayLevel::L12,
        PayLevel::L13A1,
        PayLevel::L14,
    ];

    /// Level code as stored in reference data ("10", "13A1", ...).
    pub fn code(&self) -> &'static str {
        match self {
            PayLevel::L10 => "10",
            PayLevel::L11 => "11",
            PayLevel::L12 => "12",
            PayLevel::L13A1 => "13A1",
            PayLevel::L14 => "14",
        }
    }

    /// Next level in the CAS sequence, or `None` at the top.
    pub fn next(&self) -> Option<PayLevel> {
        match self {
            PayLevel::L10 => Some(PayLevel::L11),
            PayLevel::L11 => Some(PayLevel::L12),
            PayLevel::L12 => Some(PayLevel::L13A1),
            PayLevel::L13A1 => Some(PayLevel::L14),
            PayLevel::L14 => None,
        }
    }

    /// Leading numeric component of the code ("13A1" -> 13), used by the
    /// transport allowance slabs which are keyed on plain numeric levels.
    pub fn numeric(&self) -> u32 {
        match self {
            PayLevel::L10 => 10,
            PayLevel::L11 => 11,
            PayLevel::L12 => 12,
            PayLevel::L13A1 => 13,
            PayLevel::L14 => 14,
        }
    }
}

impl fmt::Display for PayLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PayLevel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "10" => Ok(PayLevel::L10),
            "11" => Ok(PayLevel::L11),
            "12" => Ok(PayLevel::L12),
            "13A1" => Ok(PayLevel::L13A1),
            "14" => Ok(PayLevel::L14),
            other => Err(EngineError::UnknownLevel(other.to_string())),
        }
    }
}

/// Qualification held at entry (or acquired in service).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Qualification {
    #[serde(rename = "B.E./B.Tech")]
    Bachelors,
    #[serde(rename = "M.E./M.Tech")]
    Masters,
    #[serde(rename = "M.Phil")]
    MPhil,
    #[serde(rename = "Ph.D.")]
    Doctorate,
}

impl Qualification {
    pub fn is_masters_or_higher(&self) -> bool {
        !matches!(self, Qualification::Bachelors)
    }
}

/// HRA city classification. The classifier letter is what the HRA tier rule
/// keys on; the descriptive suffix ("X (Metro)") is display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CityClass {
    X,
    Y,
    Z,
}

impl CityClass {
    /// Parse a city label by its leading classifier letter, accepting both
    /// bare codes ("X") and display labels ("X (Metro)").
    pub fn from_label(label: &str) -> Option<CityClass> {
        match label.trim().chars().next()? {
            'X' | 'x' => Some(CityClass::X),
            'Y' | 'y' => Some(CityClass::Y),
            'Z' | 'z' => Some(CityClass::Z),
            _ => None,
        }
    }

    /// City type used by the transport allowance slabs.
    pub fn city_type(&self) -> CityType {
        match self {
            CityClass::X => CityType::Metro,
            CityClass::Y | CityClass::Z => CityType::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CityClass::X => "X (Metro)",
            CityClass::Y => "Y (Urban)",
            CityClass::Z => "Z (Rural)",
        }
    }
}

/// Transport allowance city bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CityType {
    Metro,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstituteType {
    Government,
    #[serde(rename = "Aided-BoG")]
    AidedBog,
    Unaided,
}

/// Validated career-defining attributes of one faculty member.
///
/// Owned by the caller; the engines never persist or mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacultyProfile {
    pub name: String,
    pub institute_type: InstituteType,
    pub city_class: CityClass,

    /// Date of joining the current institute.
    pub date_of_joining: NaiveDate,
    /// Approved past service credited toward CAS, in whole years.
    #[serde(default)]
    pub past_service_years: u32,

    pub entry_qualification: Qualification,
    /// In-service M.E./M.Tech acquisition, if any.
    #[serde(default)]
    pub acquired_mtech_date: Option<NaiveDate>,
    /// In-service Ph.D. acquisition, if any.
    #[serde(default)]
    pub acquired_phd_date: Option<NaiveDate>,

    /// Recorded CAS promotion to Level 11 (Senior Scale), if any.
    #[serde(default)]
    pub promoted_level_11_date: Option<NaiveDate>,
    /// Recorded CAS promotion to Level 12 (Selection Grade), if any.
    #[serde(default)]
    pub promoted_level_12_date: Option<NaiveDate>,

    pub current_level: PayLevel,
    pub current_basic: u32,
}

impl FacultyProfile {
    /// Joining date pulled back by the credited past service, the anchor for
    /// all service-length rules.
    pub fn effective_joining_date(&self) -> NaiveDate {
        sub_years(self.date_of_joining, self.past_service_years)
    }

    /// Whether a doctorate is on file at all (entry qualification or acquired
    /// in service, regardless of date).
    pub fn holds_doctorate(&self) -> bool {
        self.entry_qualification == Qualification::Doctorate || self.acquired_phd_date.is_some()
    }

    /// Whether a doctorate is held on `date`.
    pub fn doctorate_held_by(&self, date: NaiveDate) -> bool {
        if self.entry_qualification == Qualification::Doctorate {
            return true;
        }
        matches!(self.acquired_phd_date, Some(acquired) if acquired <= date)
    }

    /// Whether a master's degree (or higher) is on file.
    pub fn holds_masters(&self) -> bool {
        self.entry_qualification.is_masters_or_higher() || self.acquired_mtech_date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_sequence() {
        assert_eq!(PayLevel::L10.next(), Some(PayLevel::L11));
        assert_eq!(PayLevel::L12.next(), Some(PayLevel::L13A1));
        assert_eq!(PayLevel::L14.next(), None);
        assert_eq!(PayLevel::L13A1.numeric(), 13);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("13A1".parse::<PayLevel>().unwrap(), PayLevel::L13A1);
        assert!(matches!(
            "13A".parse::<PayLevel>(),
            Err(EngineError::UnknownLevel(_))
        ));
    }

    #[test]
    fn test_city_label_parse() {
        assert_eq!(CityClass::from_label("X (Metro)"), Some(CityClass::X));
        assert_eq!(CityClass::from_label("z"), Some(CityClass::Z));
        assert_eq!(CityClass::from_label("Metro"), None);
        assert_eq!(CityClass::Y.city_type(), CityType::Other);
    }
}

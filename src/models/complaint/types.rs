use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Options offered by the product type select. Validation accepts any
/// non-empty value.
pub const PRODUCT_TYPES: [&str; 9] = [
    "CPU", "Printer", "UPS", "Laptop", "Keyboard", "Mouse", "RAM", "Monitor", "Other",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplaintStatus {
    Open,
    Closed,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 2] = [ComplaintStatus::Open, ComplaintStatus::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Open => "Open",
            ComplaintStatus::Closed => "Closed",
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, ComplaintStatus::Closed)
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Open" | "open" => Ok(ComplaintStatus::Open),
            "Closed" | "closed" => Ok(ComplaintStatus::Closed),
            other => Err(format!("Unknown status '{other}'")),
        }
    }
}

/// A stored complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: i64,
    pub user_name: String,
    pub room_number: String,
    pub section: String,
    pub product_type: String,
    pub product_serial_number: String,
    pub problem_description: String,
    pub user_signature: String,
    pub representative_name: String,
    pub solution: String,
    pub representative_signature: String,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
}

impl Complaint {
    /// Creation time in local time, e.g. `Oct 19, 2026, 2:16 PM`.
    pub fn created_display(&self) -> String {
        format_timestamp(&self.created_at)
    }

    /// Long form used on the detail page, e.g. `October 19th, 2026 at 2:16 PM`.
    pub fn filed_on_display(&self) -> String {
        let local = self.created_at.with_timezone(&Local);
        let day = local.format("%-d").to_string();
        format!(
            "{} {}{}, {} at {}",
            local.format("%B"),
            day,
            ordinal_suffix(&day),
            local.format("%Y"),
            local.format("%-I:%M %p"),
        )
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%b %-d, %Y, %-I:%M %p").to_string()
}

fn ordinal_suffix(day: &str) -> &'static str {
    match day {
        "11" | "12" | "13" => "th",
        d if d.ends_with('1') => "st",
        d if d.ends_with('2') => "nd",
        d if d.ends_with('3') => "rd",
        _ => "th",
    }
}

/// Validated complaint fields, ready to be appended to a store.
///
/// Only `ComplaintForm::validate` builds one.
#[derive(Debug, Clone, PartialEq)]
pub struct NewComplaint {
    pub(crate) user_name: String,
    pub(crate) room_number: String,
    pub(crate) section: String,
    pub(crate) product_type: String,
    pub(crate) product_serial_number: String,
    pub(crate) problem_description: String,
    pub(crate) user_signature: String,
    pub(crate) representative_name: String,
    pub(crate) solution: String,
    pub(crate) representative_signature: String,
}

impl NewComplaint {
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn problem_description(&self) -> &str {
        &self.problem_description
    }

    /// Stamp store-assigned fields. New records are always `Open`.
    pub(crate) fn into_complaint(self, id: i64, created_at: DateTime<Utc>) -> Complaint {
        Complaint {
            id,
            user_name: self.user_name,
            room_number: self.room_number,
            section: self.section,
            product_type: self.product_type,
            product_serial_number: self.product_serial_number,
            problem_description: self.problem_description,
            user_signature: self.user_signature,
            representative_name: self.representative_name,
            solution: self.solution,
            representative_signature: self.representative_signature,
            status: ComplaintStatus::Open,
            created_at,
        }
    }
}

/// Raw submission from the complaint form or the JSON API.
///
/// Missing fields deserialize as empty strings so they surface as
/// validation messages rather than parse errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplaintForm {
    pub user_name: String,
    pub room_number: String,
    pub section: String,
    pub product_type: String,
    pub product_serial_number: String,
    pub problem_description: String,
    pub user_signature: String,
    pub representative_name: String,
    pub solution: String,
    pub representative_signature: String,
    #[serde(rename = "csrf_token", skip_serializing_if = "String::is_empty")]
    pub csrf_token: String,
}

/// Status change from the detail page.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
    pub csrf_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_both_cases() {
        assert_eq!("Open".parse::<ComplaintStatus>().unwrap(), ComplaintStatus::Open);
        assert_eq!("closed".parse::<ComplaintStatus>().unwrap(), ComplaintStatus::Closed);
        assert!("Pending".parse::<ComplaintStatus>().is_err());
    }

    #[test]
    fn status_serializes_as_label() {
        let json = serde_json::to_string(&ComplaintStatus::Closed).unwrap();
        assert_eq!(json, "\"Closed\"");
    }

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(ordinal_suffix("1"), "st");
        assert_eq!(ordinal_suffix("2"), "nd");
        assert_eq!(ordinal_suffix("3"), "rd");
        assert_eq!(ordinal_suffix("11"), "th");
        assert_eq!(ordinal_suffix("12"), "th");
        assert_eq!(ordinal_suffix("22"), "nd");
        assert_eq!(ordinal_suffix("30"), "th");
    }
}

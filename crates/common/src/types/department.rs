use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Municipal unit a complaint is routed to.
///
/// Closed set: downstream filtering matches on it exhaustively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    Electricity,
    Water,
    Roads,
    Sanitation,
    #[serde(rename = "Public Safety", alias = "PublicSafety")]
    PublicSafety,
    Unassigned,
}

impl Department {
    pub const ALL: [Department; 6] = [
        Self::Electricity,
        Self::Water,
        Self::Roads,
        Self::Sanitation,
        Self::PublicSafety,
        Self::Unassigned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Electricity => "Electricity",
            Self::Water => "Water",
            Self::Roads => "Roads",
            Self::Sanitation => "Sanitation",
            Self::PublicSafety => "Public Safety",
            Self::Unassigned => "Unassigned",
        }
    }

    /// Map a classifier category name onto the department that owns it.
    ///
    /// Older analysis backends emitted broader categories ("Infrastructure",
    /// "Public Health", ...). Unknown categories land in `Unassigned`.
    pub fn from_category(category: &str) -> Self {
        match category.trim() {
            "Electricity" => Self::Electricity,
            "Water" | "Water & Drainage" => Self::Water,
            "Roads" | "Infrastructure" | "Transport" | "Law & Order" => Self::Roads,
            "Sanitation" | "Environment" | "Public Health" => Self::Sanitation,
            "Public Safety" | "PublicSafety" => Self::PublicSafety,
            _ => Self::Unassigned,
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = String;

    /// Strict parse of a department name (case-insensitive, no category remapping).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| {
                d.as_str().eq_ignore_ascii_case(wanted)
                    || format!("{:?}", d).eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| format!("unknown department: {}", s))
    }
}

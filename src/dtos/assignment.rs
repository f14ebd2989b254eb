use serde::{Deserialize, Serialize};
use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;

use crate::dtos::timestamp;

/// Backend versions disagree on the status vocabulary; older ones emit
/// `Active`/`Complete`, which read as `Ongoing`/`Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AssignmentStatus {
    #[default]
    Pending,
    #[serde(alias = "Active")]
    Ongoing,
    #[serde(alias = "Complete")]
    Completed,
}

impl AssignmentStatus {
    pub const ALL: [AssignmentStatus; 3] = [
        AssignmentStatus::Pending,
        AssignmentStatus::Ongoing,
        AssignmentStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "Pending",
            AssignmentStatus::Ongoing => "Ongoing",
            AssignmentStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(AssignmentStatus::Pending),
            "ongoing" | "active" => Ok(AssignmentStatus::Ongoing),
            "completed" | "complete" => Ok(AssignmentStatus::Completed),
            other => Err(format!(
                "Invalid assignment status: {other} (expected Pending, Ongoing or Completed)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub driver_id: i64,
    pub truck_id: i64,
    #[serde(with = "timestamp")]
    pub start_date: NaiveDateTime,
    #[serde(default, with = "timestamp::option")]
    pub end_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub status: AssignmentStatus,
}

/// Body for `POST /assignments` and `PATCH /assignments/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentPayload {
    pub driver_id: i64,
    pub truck_id: i64,
    #[serde(with = "timestamp")]
    pub start_date: NaiveDateTime,
    #[serde(with = "timestamp::option")]
    pub end_date: Option<NaiveDateTime>,
    pub status: AssignmentStatus,
}

/// Partial update; absent fields are left alone by `PATCH`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssignmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AssignmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub end_date: Option<NaiveDateTime>,
}

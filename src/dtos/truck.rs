use serde::{Deserialize, Serialize};
use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;

use crate::dtos::timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TruckStatus {
    #[default]
    Available,
    #[serde(rename = "In Use")]
    InUse,
    Maintenance,
}

impl TruckStatus {
    pub const ALL: [TruckStatus; 3] = [TruckStatus::Available, TruckStatus::InUse, TruckStatus::Maintenance];

    pub fn as_str(&self) -> &'static str {
        match self {
            TruckStatus::Available => "Available",
            TruckStatus::InUse => "In Use",
            TruckStatus::Maintenance => "Maintenance",
        }
    }
}

impl fmt::Display for TruckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TruckStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TruckStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .or_else(|| s.eq_ignore_ascii_case("in_use").then_some(TruckStatus::InUse))
            .ok_or_else(|| format!("Invalid truck status: {s} (expected Available, In Use or Maintenance)"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Truck {
    pub id: i64,
    pub plate_number: String,
    pub model: String,
    #[serde(default)]
    pub status: TruckStatus,
    #[serde(default)]
    pub current_driver_id: Option<i64>,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

/// Body for `POST /trucks` and `PUT /trucks/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckPayload {
    pub plate_number: String,
    pub model: String,
    pub status: TruckStatus,
    pub current_driver_id: Option<i64>,
}

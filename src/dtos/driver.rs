use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::dtos::timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: i64,
    pub name: String,
    pub license_number: String,
    pub contact_info: String,
    #[serde(default)]
    pub assigned_truck_id: Option<i64>,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

/// Body for `POST /drivers` and `PUT /drivers/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverPayload {
    pub name: String,
    pub license_number: String,
    pub contact_info: String,
    pub assigned_truck_id: Option<i64>, // null unassigns
}

//! Wire types for the Malaffi CRM API.
//!
//! # Design
//! These mirror the mock-server's schema but are defined independently, so
//! integration tests catch drift between the two crates. Field names are
//! camelCase on the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `{data, message?, success}` envelope every successful response uses.
///
/// Any other top-level fields the backend sends (paging totals and the like)
/// are kept in `extra`, so the envelope serializes back to the body it came
/// from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub success: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> T {
        self.data
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupStatus {
    Active,
    Inactive,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: u64,
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub status: GroupStatus,
}

/// Payload for creating or replacing a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub status: GroupStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacilityStatus {
    Active,
    Inactive,
    Maintenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub facility_id: u64,
    pub group_id: u64,
    pub display_name: String,
    pub name: String,
    pub license_number: u64,
    pub emr_system_details: String,
    pub facility_type_id: u64,
    pub facility_sub_type_id: u64,
    pub license_renewal: Option<String>,
    #[serde(default)]
    pub facility_contacts: Vec<Value>,
    #[serde(default, rename = "facilityEMRs")]
    pub facility_emrs: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<FacilityStatus>,
}

/// Payload for creating or replacing a facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFacility {
    pub group_id: u64,
    pub display_name: String,
    pub name: String,
    pub license_number: u64,
    pub emr_system_details: String,
    pub facility_type_id: u64,
    pub facility_sub_type_id: u64,
    #[serde(default)]
    pub license_renewal: Option<String>,
    #[serde(default)]
    pub facility_contacts: Vec<Value>,
    #[serde(default, rename = "facilityEMRs")]
    pub facility_emrs: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<FacilityStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupFacilityCount {
    pub group_id: u64,
    pub group_name: String,
    pub facility_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_groups: u64,
    pub active_groups: u64,
    pub total_facilities: u64,
    pub recent_activities: u64,
    pub group_status_distribution: BTreeMap<GroupStatus, u64>,
    pub facilities_per_group: Vec<GroupFacilityCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: u64,
    pub description: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
}

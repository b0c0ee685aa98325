use std::collections::{BTreeMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BackendError;

const MAX_ACTIVITIES: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupStatus {
    Active,
    Inactive,
    Pending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacilityStatus {
    Active,
    Inactive,
    Maintenance,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: u64,
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub status: GroupStatus,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInput {
    pub name: String,
    pub contact_person: String,
    pub email: String,
    #[serde(default = "active")]
    pub status: GroupStatus,
}

fn active() -> GroupStatus {
    GroupStatus::Active
}

#[derive(Clone, Debug, Serialize, Deserialize)]
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
    pub facility_contacts: Vec<serde_json::Value>,
    #[serde(rename = "facilityEMRs")]
    pub facility_emrs: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FacilityStatus>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityInput {
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
    pub facility_contacts: Vec<serde_json::Value>,
    #[serde(default, rename = "facilityEMRs")]
    pub facility_emrs: Vec<serde_json::Value>,
    #[serde(default)]
    pub status: Option<FacilityStatus>,
}

impl FacilityInput {
    fn into_facility(self, facility_id: u64) -> Facility {
        Facility {
            facility_id,
            group_id: self.group_id,
            display_name: self.display_name,
            name: self.name,
            license_number: self.license_number,
            emr_system_details: self.emr_system_details,
            facility_type_id: self.facility_type_id,
            facility_sub_type_id: self.facility_sub_type_id,
            license_renewal: self.license_renewal,
            facility_contacts: self.facility_contacts,
            facility_emrs: self.facility_emrs,
            status: self.status,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Activity {
    pub id: u64,
    pub description: String,
    pub timestamp: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupFacilityCount {
    pub group_id: u64,
    pub group_name: String,
    pub facility_count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_groups: u64,
    pub active_groups: u64,
    pub total_facilities: u64,
    pub recent_activities: u64,
    pub group_status_distribution: BTreeMap<GroupStatus, u64>,
    pub facilities_per_group: Vec<GroupFacilityCount>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
}

/// In-memory backing state for every resource.
#[derive(Debug, Default)]
pub struct Store {
    groups: BTreeMap<u64, Group>,
    facilities: BTreeMap<u64, Facility>,
    activities: VecDeque<Activity>,
    tokens: HashSet<String>,
    next_group_id: u64,
    next_facility_id: u64,
    next_activity_id: u64,
}

impl Store {
    /// The groups and facilities the dashboard ships as its mock tables.
    pub fn seeded() -> Self {
        let mut store = Store {
            next_facility_id: 1,
            next_activity_id: 1,
            ..Store::default()
        };

        let groups = [
            ("City General Hospital", "Dr. Sarah Johnson", "s.johnson@citygeneral.com", GroupStatus::Active),
            ("Metro Health Center", "Dr. Michael Chen", "m.chen@metrohealth.com", GroupStatus::Active),
            ("Suburban Medical Group", "Dr. Emily Davis", "e.davis@suburban.com", GroupStatus::Inactive),
            ("Regional Care Network", "Dr. Robert Wilson", "r.wilson@regionalcare.com", GroupStatus::Active),
        ];
        for (id, (name, contact_person, email, status)) in (1..).zip(groups) {
            let group = Group {
                id,
                name: name.to_string(),
                contact_person: contact_person.to_string(),
                email: email.to_string(),
                status,
            };
            store.record(format!("Group created: {}", group.name));
            store.groups.insert(id, group);
        }
        store.next_group_id = 5;

        let facilities = [
            (1, "City Hospital", "City Hospital Main Branch", 12345, "Cerner System", FacilityStatus::Active),
            (3, "Central Clinic", "Central Clinic - Main Branch", 123456, "Epic EMR v2.1", FacilityStatus::Active),
            (4, "Central Clinic", "Central Clinic - Main Branch", 123456, "Epic EMR v2.1", FacilityStatus::Inactive),
        ];
        for (facility_id, display_name, name, license_number, emr, status) in facilities {
            let input = FacilityInput {
                group_id: 1,
                display_name: display_name.to_string(),
                name: name.to_string(),
                license_number,
                emr_system_details: emr.to_string(),
                facility_type_id: 1,
                facility_sub_type_id: 1,
                license_renewal: None,
                facility_contacts: Vec::new(),
                facility_emrs: Vec::new(),
                status: Some(status),
            };
            store.facilities.insert(facility_id, input.into_facility(facility_id));
        }
        store.next_facility_id = 5;

        store
    }

    // --- groups ---

    pub fn groups(&self) -> Vec<Group> {
        self.groups.values().cloned().collect()
    }

    pub fn group(&self, id: u64) -> Result<Group, BackendError> {
        self.groups.get(&id).cloned().ok_or(BackendError::NotFound("group"))
    }

    pub fn create_group(&mut self, input: GroupInput) -> Result<Group, BackendError> {
        self.ensure_name_free(&input.name, None)?;
        let id = self.next_group_id;
        self.next_group_id += 1;
        let group = Group {
            id,
            name: input.name,
            contact_person: input.contact_person,
            email: input.email,
            status: input.status,
        };
        self.groups.insert(id, group.clone());
        self.record(format!("Group created: {}", group.name));
        Ok(group)
    }

    pub fn update_group(&mut self, id: u64, input: GroupInput) -> Result<Group, BackendError> {
        if !self.groups.contains_key(&id) {
            return Err(BackendError::NotFound("group"));
        }
        self.ensure_name_free(&input.name, Some(id))?;
        let group = Group {
            id,
            name: input.name,
            contact_person: input.contact_person,
            email: input.email,
            status: input.status,
        };
        self.groups.insert(id, group.clone());
        self.record(format!("Group updated: {}", group.name));
        Ok(group)
    }

    pub fn delete_group(&mut self, id: u64) -> Result<(), BackendError> {
        if !self.groups.contains_key(&id) {
            return Err(BackendError::NotFound("group"));
        }
        if self.facilities.values().any(|f| f.group_id == id) {
            return Err(BackendError::GroupInUse(id));
        }
        if let Some(group) = self.groups.remove(&id) {
            self.record(format!("Group deleted: {}", group.name));
        }
        Ok(())
    }

    fn ensure_name_free(&self, name: &str, except: Option<u64>) -> Result<(), BackendError> {
        let taken = self
            .groups
            .values()
            .any(|g| Some(g.id) != except && g.name.eq_ignore_ascii_case(name));
        if taken {
            Err(BackendError::NameTaken)
        } else {
            Ok(())
        }
    }

    // --- facilities ---

    pub fn facilities(&self, group_id: Option<u64>) -> Vec<Facility> {
        self.facilities
            .values()
            .filter(|f| group_id.map_or(true, |g| f.group_id == g))
            .cloned()
            .collect()
    }

    pub fn facility(&self, id: u64) -> Result<Facility, BackendError> {
        self.facilities.get(&id).cloned().ok_or(BackendError::NotFound("facility"))
    }

    pub fn create_facility(&mut self, input: FacilityInput) -> Result<Facility, BackendError> {
        self.ensure_group_exists(input.group_id)?;
        let id = self.next_facility_id;
        self.next_facility_id += 1;
        let facility = input.into_facility(id);
        self.facilities.insert(id, facility.clone());
        self.record(format!("Facility created: {}", facility.display_name));
        Ok(facility)
    }

    pub fn update_facility(&mut self, id: u64, input: FacilityInput) -> Result<Facility, BackendError> {
        if !self.facilities.contains_key(&id) {
            return Err(BackendError::NotFound("facility"));
        }
        self.ensure_group_exists(input.group_id)?;
        let facility = input.into_facility(id);
        self.facilities.insert(id, facility.clone());
        self.record(format!("Facility updated: {}", facility.display_name));
        Ok(facility)
    }

    pub fn delete_facility(&mut self, id: u64) -> Result<(), BackendError> {
        let facility = self
            .facilities
            .remove(&id)
            .ok_or(BackendError::NotFound("facility"))?;
        self.record(format!("Facility deleted: {}", facility.display_name));
        Ok(())
    }

    fn ensure_group_exists(&self, group_id: u64) -> Result<(), BackendError> {
        if self.groups.contains_key(&group_id) {
            Ok(())
        } else {
            Err(BackendError::UnknownGroup(group_id))
        }
    }

    // --- dashboard ---

    pub fn stats(&self) -> DashboardStats {
        let mut distribution = BTreeMap::new();
        for group in self.groups.values() {
            *distribution.entry(group.status).or_insert(0) += 1;
        }
        let facilities_per_group = self
            .groups
            .values()
            .map(|g| GroupFacilityCount {
                group_id: g.id,
                group_name: g.name.clone(),
                facility_count: self.facilities.values().filter(|f| f.group_id == g.id).count() as u64,
            })
            .collect();
        DashboardStats {
            total_groups: self.groups.len() as u64,
            active_groups: distribution.get(&GroupStatus::Active).copied().unwrap_or(0),
            total_facilities: self.facilities.len() as u64,
            recent_activities: self.activities.len() as u64,
            group_status_distribution: distribution,
            facilities_per_group,
        }
    }

    /// Most recent first.
    pub fn activities(&self) -> Vec<Activity> {
        self.activities.iter().cloned().collect()
    }

    fn record(&mut self, description: String) {
        let activity = Activity {
            id: self.next_activity_id,
            description,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        self.next_activity_id += 1;
        self.activities.push_front(activity);
        self.activities.truncate(MAX_ACTIVITIES);
    }

    // --- auth ---

    pub fn login(&mut self, credentials: &Credentials) -> Result<Session, BackendError> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(BackendError::InvalidCredentials);
        }
        Ok(self.issue_token())
    }

    pub fn logout(&mut self, token: &str) -> Result<(), BackendError> {
        if self.tokens.remove(token) {
            Ok(())
        } else {
            Err(BackendError::Unauthorized)
        }
    }

    /// Swap a live token for a fresh one.
    pub fn refresh(&mut self, token: &str) -> Result<Session, BackendError> {
        self.logout(token)?;
        Ok(self.issue_token())
    }

    fn issue_token(&mut self) -> Session {
        let token = Uuid::new_v4().to_string();
        self.tokens.insert(token.clone());
        Session { token }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_input(name: &str) -> GroupInput {
        GroupInput {
            name: name.to_string(),
            contact_person: "Dr. Test".to_string(),
            email: "test@example.org".to_string(),
            status: GroupStatus::Pending,
        }
    }

    fn facility_input(group_id: u64) -> FacilityInput {
        serde_json::from_value(serde_json::json!({
            "groupId": group_id,
            "displayName": "North Clinic",
            "name": "North Clinic - Annex",
            "licenseNumber": 777,
            "emrSystemDetails": "Epic EMR v2.1",
            "facilityTypeId": 2,
            "facilitySubTypeId": 3
        }))
        .unwrap()
    }

    #[test]
    fn seed_matches_dashboard_tables() {
        let store = Store::seeded();
        assert_eq!(store.groups().len(), 4);
        assert_eq!(store.facilities(None).len(), 3);
        assert_eq!(store.facility(4).unwrap().status, Some(FacilityStatus::Inactive));
        assert!(store.facility(2).is_err());
        assert_eq!(store.activities().len(), 4);
        assert_eq!(store.group(3).unwrap().name, "Suburban Medical Group");
        assert_eq!(store.activities()[0].description, "Group created: Regional Care Network");
    }

    #[test]
    fn stats_reflect_seed() {
        let stats = Store::seeded().stats();
        assert_eq!(stats.total_groups, 4);
        assert_eq!(stats.active_groups, 3);
        assert_eq!(stats.total_facilities, 3);
        assert_eq!(stats.group_status_distribution[&GroupStatus::Inactive], 1);
        assert_eq!(stats.facilities_per_group[0].facility_count, 3);
        assert_eq!(stats.facilities_per_group[1].facility_count, 0);
    }

    #[test]
    fn group_names_are_unique_ignoring_case() {
        let mut store = Store::seeded();
        let err = store.create_group(group_input("metro health center")).unwrap_err();
        assert!(matches!(err, BackendError::NameTaken));

        // Renaming a group to its own name is fine.
        let renamed = store.update_group(2, group_input("Metro Health Center")).unwrap();
        assert_eq!(renamed.status, GroupStatus::Pending);
    }

    #[test]
    fn new_ids_continue_after_seed() {
        let mut store = Store::seeded();
        assert_eq!(store.create_group(group_input("New Group")).unwrap().id, 5);
        assert_eq!(store.create_facility(facility_input(5)).unwrap().facility_id, 5);
        assert_eq!(store.facilities(Some(5)).len(), 1);
    }

    #[test]
    fn facility_requires_known_group() {
        let mut store = Store::seeded();
        let err = store.create_facility(facility_input(99)).unwrap_err();
        assert!(matches!(err, BackendError::UnknownGroup(99)));
    }

    #[test]
    fn group_with_facilities_cannot_be_deleted() {
        let mut store = Store::seeded();
        assert!(matches!(store.delete_group(1), Err(BackendError::GroupInUse(1))));
        store.delete_group(2).unwrap();
        assert!(matches!(store.group(2), Err(BackendError::NotFound("group"))));
    }

    #[test]
    fn activities_are_newest_first_and_capped() {
        let mut store = Store::seeded();
        for i in 0..30 {
            store.create_group(group_input(&format!("Group {i}"))).unwrap();
        }
        let activities = store.activities();
        assert_eq!(activities.len(), MAX_ACTIVITIES);
        assert_eq!(activities[0].description, "Group created: Group 29");
    }

    #[test]
    fn token_lifecycle() {
        let mut store = Store::seeded();
        let creds = Credentials {
            email: "admin@malaffi.ae".to_string(),
            password: "pw".to_string(),
        };
        let session = store.login(&creds).unwrap();
        let refreshed = store.refresh(&session.token).unwrap();
        assert_ne!(refreshed.token, session.token);
        assert!(matches!(store.logout(&session.token), Err(BackendError::Unauthorized)));
        store.logout(&refreshed.token).unwrap();

        let empty = Credentials {
            email: " ".to_string(),
            password: "pw".to_string(),
        };
        assert!(matches!(store.login(&empty), Err(BackendError::InvalidCredentials)));
    }
}

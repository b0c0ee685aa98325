//! Resource facades: fixed endpoint bindings over `ApiClient`.
//!
//! Each facade borrows the client, so a token set on the client applies to
//! every facade call made afterwards.

use serde_json::Value;

use crate::client::{ApiClient, Body};
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{
    Activity, ApiResponse, AuthSession, DashboardStats, Facility, Group, LoginCredentials,
    NewFacility, NewGroup,
};

impl<T: Transport> ApiClient<T> {
    pub fn auth(&self) -> AuthApi<'_, T> {
        AuthApi { client: self }
    }

    pub fn groups(&self) -> GroupsApi<'_, T> {
        GroupsApi { client: self }
    }

    pub fn facilities(&self) -> FacilitiesApi<'_, T> {
        FacilitiesApi { client: self }
    }

    pub fn dashboard(&self) -> DashboardApi<'_, T> {
        DashboardApi { client: self }
    }
}

/// `/auth/*`
pub struct AuthApi<'a, T> {
    client: &'a ApiClient<T>,
}

impl<T: Transport> AuthApi<'_, T> {
    pub fn login(&self, credentials: &LoginCredentials) -> Result<ApiResponse<AuthSession>, ApiError> {
        self.client.post("/auth/login", Some(Body::json(credentials)?), None)
    }

    pub fn logout(&self) -> Result<ApiResponse<Value>, ApiError> {
        self.client.post("/auth/logout", None, None)
    }

    pub fn refresh_token(&self) -> Result<ApiResponse<AuthSession>, ApiError> {
        self.client.post("/auth/refresh", None, None)
    }
}

/// `/groups`
pub struct GroupsApi<'a, T> {
    client: &'a ApiClient<T>,
}

impl<T: Transport> GroupsApi<'_, T> {
    pub fn get_all(&self) -> Result<ApiResponse<Vec<Group>>, ApiError> {
        self.client.get("/groups", None)
    }

    pub fn get_by_id(&self, id: u64) -> Result<ApiResponse<Group>, ApiError> {
        self.client.get(&format!("/groups/{id}"), None)
    }

    pub fn create(&self, group: &NewGroup) -> Result<ApiResponse<Group>, ApiError> {
        self.client.post("/groups", Some(Body::json(group)?), None)
    }

    pub fn update(&self, id: u64, group: &NewGroup) -> Result<ApiResponse<Group>, ApiError> {
        self.client.put(&format!("/groups/{id}"), Some(Body::json(group)?), None)
    }

    pub fn delete(&self, id: u64) -> Result<ApiResponse<Value>, ApiError> {
        self.client.delete(&format!("/groups/{id}"), None)
    }
}

/// `/facilities`
pub struct FacilitiesApi<'a, T> {
    client: &'a ApiClient<T>,
}

impl<T: Transport> FacilitiesApi<'_, T> {
    pub fn get_all(&self) -> Result<ApiResponse<Vec<Facility>>, ApiError> {
        self.client.get("/facilities", None)
    }

    pub fn get_by_id(&self, id: u64) -> Result<ApiResponse<Facility>, ApiError> {
        self.client.get(&format!("/facilities/{id}"), None)
    }

    pub fn get_by_group_id(&self, group_id: u64) -> Result<ApiResponse<Vec<Facility>>, ApiError> {
        self.client.get(&format!("/facilities?groupId={group_id}"), None)
    }

    pub fn create(&self, facility: &NewFacility) -> Result<ApiResponse<Facility>, ApiError> {
        self.client.post("/facilities", Some(Body::json(facility)?), None)
    }

    pub fn update(&self, id: u64, facility: &NewFacility) -> Result<ApiResponse<Facility>, ApiError> {
        self.client.put(&format!("/facilities/{id}"), Some(Body::json(facility)?), None)
    }

    pub fn delete(&self, id: u64) -> Result<ApiResponse<Value>, ApiError> {
        self.client.delete(&format!("/facilities/{id}"), None)
    }
}

/// `/dashboard`
pub struct DashboardApi<'a, T> {
    client: &'a ApiClient<T>,
}

impl<T: Transport> DashboardApi<'_, T> {
    pub fn get_stats(&self) -> Result<ApiResponse<DashboardStats>, ApiError> {
        self.client.get("/dashboard/stats", None)
    }

    pub fn get_recent_activities(&self) -> Result<ApiResponse<Vec<Activity>>, ApiError> {
        self.client.get("/dashboard/activities", None)
    }
}

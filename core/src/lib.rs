//! API client core for the Malaffi CRM dashboard backend.
//!
//! # Overview
//! Issues JSON-over-HTTP requests against a configured base URL, merges
//! per-call headers over the client's defaults, enforces a per-request
//! deadline and folds every failure into one `ApiError`.
//!
//! # Design
//! - `ApiClient` is an explicit value; there is no process-wide instance.
//! - Request building and response parsing are pure (`build_request`,
//!   `parse_response`); the round-trip goes through the `Transport` trait,
//!   with `UreqTransport` as the default.
//! - Resource facades (`groups()`, `facilities()`, `dashboard()`, `auth()`)
//!   bind the client to fixed endpoint paths and add no logic.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod resources;
pub mod transport;
pub mod types;

pub use client::{ApiClient, Body, RequestOptions};
pub use config::ClientConfig;
pub use error::{ApiError, ApiFailure, ErrorKind};
pub use http::{Headers, HttpMethod, HttpRequest, HttpResponse};
pub use resources::{AuthApi, DashboardApi, FacilitiesApi, GroupsApi};
pub use transport::{Transport, TransportError, UreqTransport};
pub use types::{
    Activity, ApiResponse, AuthSession, DashboardStats, Facility, FacilityStatus, Group,
    GroupFacilityCount, GroupStatus, LoginCredentials, NewFacility, NewGroup,
};

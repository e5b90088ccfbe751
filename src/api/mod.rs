//! Access to the remote listings API.
//!
//! The UI never talks to the network directly; it goes through
//! [`PropertyApi`], which has an HTTP implementation for the real service
//! and an in-memory fake for tests.

mod http;
#[cfg(test)]
pub mod fake;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Project, ProjectKey, Property};

pub use http::HttpApi;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("unexpected response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[async_trait]
pub trait PropertyApi: Send + Sync {
    /// `GET /api/projects`
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError>;

    /// `GET /api/properties/all?projectId=<project>`
    async fn list_properties(&self, project: &ProjectKey) -> Result<Vec<Property>, ApiError>;

    /// `POST /api/projects/<project>/properties`; the response body is ignored
    async fn add_property(&self, project: &ProjectKey, property: &Property) -> Result<(), ApiError>;
}

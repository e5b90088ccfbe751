//! In-memory [`PropertyApi`] for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{ApiError, PropertyApi};
use crate::models::{Project, ProjectKey, Property};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListProjects,
    ListProperties(ProjectKey),
    AddProperty(ProjectKey, String),
}

#[derive(Default)]
pub struct FakeApi {
    pub projects: Option<Vec<Project>>,
    /// Properties per project; a missing key makes the listing fail
    pub properties: Mutex<HashMap<ProjectKey, Vec<Property>>>,
    /// Whether a successful add also stores the property server-side
    pub store_added: bool,
    pub fail_adds: bool,
    /// Artificial latency per project listing
    pub delays: HashMap<ProjectKey, Duration>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn with_projects(projects: Vec<Project>) -> Self {
        Self {
            projects: Some(projects),
            ..Default::default()
        }
    }

    pub fn set_properties(&self, project: &str, properties: Vec<Property>) {
        self.properties
            .lock()
            .unwrap()
            .insert(ProjectKey::new(project), properties);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn failure(path: &str) -> ApiError {
        ApiError::Status {
            url: format!("http://fake{}", path),
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[async_trait]
impl PropertyApi for FakeApi {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.record(Call::ListProjects);
        self.projects
            .clone()
            .ok_or_else(|| Self::failure("/api/projects"))
    }

    async fn list_properties(&self, project: &ProjectKey) -> Result<Vec<Property>, ApiError> {
        self.record(Call::ListProperties(project.clone()));
        if let Some(delay) = self.delays.get(project) {
            tokio::time::sleep(*delay).await;
        }
        self.properties
            .lock()
            .unwrap()
            .get(project)
            .cloned()
            .ok_or_else(|| Self::failure("/api/properties/all"))
    }

    async fn add_property(&self, project: &ProjectKey, property: &Property) -> Result<(), ApiError> {
        self.record(Call::AddProperty(project.clone(), property.id.clone()));
        if self.fail_adds {
            return Err(Self::failure("/api/projects/properties"));
        }
        if self.store_added {
            self.properties
                .lock()
                .unwrap()
                .entry(project.clone())
                .or_default()
                .push(property.clone());
        }
        Ok(())
    }
}

pub fn project(id: &str, label: &str, name: &str) -> Project {
    Project {
        id: ProjectKey::new(id),
        project_id: label.to_string(),
        name: name.to_string(),
    }
}

pub fn property(id: &str, title: &str) -> Property {
    serde_json::from_value(serde_json::json!({
        "_id": id,
        "post_title": title,
        "type_name": "Apartment",
        "address": "Main St",
        "price": 100000,
        "area": 50
    }))
    .unwrap()
}

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::state::{Generation, ViewState};
use crate::api::{ApiError, PropertyApi};
use crate::models::{Project, ProjectKey, Property};

/// Result of a request, delivered back to the UI loop
#[derive(Debug)]
pub enum Completion {
    Projects {
        generation: Generation,
        result: Result<Vec<Project>, ApiError>,
    },
    Properties {
        generation: Generation,
        project: ProjectKey,
        result: Result<Vec<Property>, ApiError>,
    },
    Added {
        project: ProjectKey,
        property_id: String,
        result: Result<(), ApiError>,
    },
}

// Represents the application controller.
// Owns the view state and is the only thing that changes it.
//
// Requests run as tokio tasks; their completions queue up on a channel
// and are applied when the UI loop calls `Controller::drain`.
pub struct Controller {
    api: Arc<dyn PropertyApi>,
    state: ViewState,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl Controller {
    pub fn new(api: Arc<dyn PropertyApi>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            state: ViewState::new(),
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Number of requests whose completion has not been applied yet
    pub fn pending(&self) -> usize {
        self.in_flight
    }

    fn spawn<F>(&mut self, request: F)
    where
        F: std::future::Future<Output = Completion> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            // The receiver lives as long as the controller; a send error
            // only means the app is shutting down.
            let _ = tx.send(request.await);
        });
    }

    /// Fetch the project list. Called once at startup.
    pub fn load_projects(&mut self) {
        let generation = self.state.begin_projects_fetch();
        info!(generation, "Loading projects");

        let api = Arc::clone(&self.api);
        self.spawn(async move {
            Completion::Projects {
                generation,
                result: api.list_projects().await,
            }
        });
    }

    pub fn load_properties(&mut self, project: ProjectKey) {
        let generation = self.state.begin_properties_fetch();
        info!(generation, project = %project, "Loading properties");

        let api = Arc::clone(&self.api);
        self.spawn(async move {
            let result = api.list_properties(&project).await;
            Completion::Properties {
                generation,
                project,
                result,
            }
        });
    }

    /// React to a dropdown choice. An empty value means the placeholder
    /// was chosen and clears the selection without touching the network.
    pub fn select_project(&mut self, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            info!("Project selection cleared");
            self.state.select(None);
            return;
        }

        let project = ProjectKey::new(value);
        self.state.select(Some(project.clone()));
        self.load_properties(project);
    }

    /// Append the property locally, then ask the server to add it to the
    /// selected project and reconcile with a fresh listing on success.
    pub fn add_property(&mut self, property: Property) {
        let Some(project) = self.state.selected().cloned() else {
            warn!(property = %property.id, "Add ignored, no project selected");
            return;
        };

        self.state.append_optimistic(property.clone());
        info!(project = %project, property = %property.id, "Adding property");

        let api = Arc::clone(&self.api);
        self.spawn(async move {
            let result = api.add_property(&project, &property).await;
            Completion::Added {
                project,
                property_id: property.id,
                result,
            }
        });
    }

    fn apply(&mut self, completion: Completion) {
        // Every completion retires exactly one spawned request
        self.in_flight = self.in_flight.saturating_sub(1);

        match completion {
            Completion::Projects { generation, result } => {
                if let Err(e) = &result {
                    error!("Error fetching projects: {}", e);
                }
                if !self.state.apply_projects(generation, result) {
                    debug!(generation, "Dropped stale project list");
                }
            }
            Completion::Properties {
                generation,
                project,
                result,
            } => {
                if let Err(e) = &result {
                    error!(project = %project, "Error fetching properties: {}", e);
                }
                if !self.state.apply_properties(generation, result) {
                    debug!(generation, project = %project, "Dropped stale property list");
                }
            }
            Completion::Added {
                project,
                property_id,
                result,
            } => match result {
                // Reconcile only against the project the add was made for
                Ok(()) if self.state.selected() == Some(&project) => {
                    self.load_properties(project);
                }
                Ok(()) => {
                    debug!(project = %project, "Selection changed, skipping reconciliation");
                }
                // The optimistic row stays; the failure is only logged
                Err(e) => {
                    error!(project = %project, property = %property_id, "Error adding property: {}", e);
                }
            },
        }
    }

    /// Apply every completion that has arrived so far without waiting.
    pub fn drain(&mut self) {
        while let Ok(completion) = self.rx.try_recv() {
            self.apply(completion);
        }
    }

    /// Wait for a single completion and apply it.
    #[cfg(test)]
    pub async fn step(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.rx.recv().await {
            Some(completion) => {
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    /// Wait until no request is outstanding, including reconciliation
    /// fetches started along the way.
    #[cfg(test)]
    pub async fn settle(&mut self) {
        while self.step().await {}
    }
}

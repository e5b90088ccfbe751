use crate::api::ApiError;
use crate::models::{Project, ProjectKey, Property};

pub const PROJECTS_ERROR: &str = "Error fetching projects";
pub const PROPERTIES_ERROR: &str = "Error fetching properties";

/// Identifies one issued fetch. Only the latest generation of a resource
/// may write its result into the state.
pub type Generation = u64;

/// Coarse phase of the property area, derived from the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Error,
}

// Represents everything the renderer needs.
// Mutated only through the methods below.
#[derive(Debug, Default)]
pub struct ViewState {
    projects: Vec<Project>,
    properties: Vec<Property>,
    selected: Option<ProjectKey>,
    error: Option<String>,
    last_generation: Generation,
    projects_pending: Option<Generation>,
    properties_pending: Option<Generation>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn selected(&self) -> Option<&ProjectKey> {
        self.selected.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.projects_pending.is_some() || self.properties_pending.is_some()
    }

    pub fn phase(&self) -> Phase {
        if self.is_loading() {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Error
        } else if self.selected.is_none() {
            Phase::Idle
        } else {
            Phase::Loaded
        }
    }

    fn next_generation(&mut self) -> Generation {
        self.last_generation += 1;
        self.last_generation
    }

    pub fn begin_projects_fetch(&mut self) -> Generation {
        let generation = self.next_generation();
        self.projects_pending = Some(generation);
        generation
    }

    /// Returns false when the result belongs to a superseded fetch and was dropped.
    pub fn apply_projects(
        &mut self,
        generation: Generation,
        result: Result<Vec<Project>, ApiError>,
    ) -> bool {
        if self.projects_pending != Some(generation) {
            return false;
        }
        self.projects_pending = None;

        match result {
            Ok(projects) => self.projects = projects,
            Err(_) => self.error = Some(PROJECTS_ERROR.to_string()),
        }
        true
    }

    /// Starts a property fetch, superseding any fetch still in flight.
    pub fn begin_properties_fetch(&mut self) -> Generation {
        let generation = self.next_generation();
        self.properties_pending = Some(generation);
        self.error = None;
        generation
    }

    /// Returns false when the result belongs to a superseded fetch and was dropped.
    pub fn apply_properties(
        &mut self,
        generation: Generation,
        result: Result<Vec<Property>, ApiError>,
    ) -> bool {
        if self.properties_pending != Some(generation) {
            return false;
        }
        self.properties_pending = None;

        match result {
            Ok(properties) => self.properties = properties,
            Err(_) => self.error = Some(PROPERTIES_ERROR.to_string()),
        }
        true
    }

    /// Records the dropdown choice. Clearing the selection empties the
    /// property list and invalidates any property fetch in flight.
    pub fn select(&mut self, project: Option<ProjectKey>) {
        if project.is_none() {
            self.properties.clear();
            self.properties_pending = None;
            self.error = None;
        }
        self.selected = project;
    }

    /// Appends without de-duplication. Refused when nothing is selected.
    pub fn append_optimistic(&mut self, property: Property) -> bool {
        if self.selected.is_none() {
            return false;
        }
        self.properties.push(property);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{project, property};

    fn failure() -> ApiError {
        ApiError::Status {
            url: "http://fake".to_string(),
            status: reqwest::StatusCode::BAD_GATEWAY,
        }
    }

    #[test]
    fn starts_idle_and_empty() {
        let state = ViewState::new();
        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.projects().is_empty());
        assert!(state.properties().is_empty());
        assert!(state.error().is_none());
    }

    #[test]
    fn project_failure_keeps_previous_list() {
        let mut state = ViewState::new();
        let first = state.begin_projects_fetch();
        assert!(state.is_loading());
        assert!(state.apply_projects(first, Ok(vec![project("1", "P-1", "Alpha")])));

        let second = state.begin_projects_fetch();
        assert!(state.apply_projects(second, Err(failure())));
        assert_eq!(state.projects().len(), 1);
        assert_eq!(state.error(), Some(PROJECTS_ERROR));
        assert!(!state.is_loading());
    }

    #[test]
    fn property_fetch_walks_loading_then_loaded() {
        let mut state = ViewState::new();
        state.select(Some(ProjectKey::new("1")));
        let generation = state.begin_properties_fetch();
        assert_eq!(state.phase(), Phase::Loading);

        state.apply_properties(generation, Ok(vec![property("a", "Flat 1")]));
        assert_eq!(state.phase(), Phase::Loaded);
        assert_eq!(state.properties().len(), 1);
    }

    #[test]
    fn property_failure_keeps_list_and_sets_error() {
        let mut state = ViewState::new();
        state.select(Some(ProjectKey::new("1")));
        let ok = state.begin_properties_fetch();
        state.apply_properties(ok, Ok(vec![property("a", "Flat 1")]));

        let failed = state.begin_properties_fetch();
        state.apply_properties(failed, Err(failure()));
        assert_eq!(state.phase(), Phase::Error);
        assert_eq!(state.error(), Some(PROPERTIES_ERROR));
        assert_eq!(state.properties().len(), 1);

        state.begin_properties_fetch();
        assert_eq!(state.phase(), Phase::Loading);
        assert!(state.error().is_none());
    }

    #[test]
    fn stale_property_results_are_dropped() {
        let mut state = ViewState::new();
        state.select(Some(ProjectKey::new("1")));
        let old = state.begin_properties_fetch();
        state.select(Some(ProjectKey::new("2")));
        let current = state.begin_properties_fetch();

        assert!(state.apply_properties(current, Ok(vec![property("b", "House 2")])));
        assert!(!state.apply_properties(old, Ok(vec![property("a", "Flat 1")])));
        assert_eq!(state.properties()[0].id, "b");
    }

    #[test]
    fn clearing_selection_returns_to_idle_from_any_phase() {
        let mut state = ViewState::new();
        state.select(Some(ProjectKey::new("1")));
        let pending = state.begin_properties_fetch();

        state.select(None);
        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.properties().is_empty());

        assert!(!state.apply_properties(pending, Ok(vec![property("a", "Flat 1")])));
        assert!(state.properties().is_empty());
    }

    #[test]
    fn optimistic_append_allows_duplicates_but_needs_a_selection() {
        let mut state = ViewState::new();
        assert!(!state.append_optimistic(property("a", "Flat 1")));

        state.select(Some(ProjectKey::new("1")));
        assert!(state.append_optimistic(property("a", "Flat 1")));
        assert!(state.append_optimistic(property("a", "Flat 1")));
        assert_eq!(state.properties().len(), 2);
    }
}

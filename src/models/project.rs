use std::fmt;

use serde::{Deserialize, Deserializer};

/// Opaque key the API uses to address a project.
///
/// The server sends it either as a JSON number or a string; both are kept
/// in their textual form since the key only ever travels back in URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectKey(String);

impl ProjectKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProjectKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => ProjectKey(n.to_string()),
            Raw::Text(s) => ProjectKey(s),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    pub id: ProjectKey,
    #[serde(rename = "projectId", default)]
    pub project_id: String,
    #[serde(default)]
    pub name: String,
}

impl Project {
    /// Text shown for this project in the dropdown
    pub fn label(&self) -> String {
        format!("{} - {}", self.project_id, self.name)
    }
}

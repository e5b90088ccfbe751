mod project;
mod property;

pub use project::{Project, ProjectKey};
pub use property::Property;

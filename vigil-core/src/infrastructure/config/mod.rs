pub mod conditions;
pub mod project;

pub use crate::domain::project::ProjectConfig;
pub use conditions::YamlConditionSource;
pub use project::{load_project_config, resolve_path};

/// Project file validation module - Gateway
mod checks;

pub use checks::{
    validate_compose_file, validate_project_structure, validate_realm_file,
    validate_runtime_installation, ComposeDocument, RealmDocument,
};

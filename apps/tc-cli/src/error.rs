use tc_project::ProjectError;
use tc_sim::SimError;

pub type CliResult<T> = Result<T, CliError>;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

use thiserror::Error;

/// Top-level CLI error, wrapping every layer's error type. Unlike the
/// viewshed/coverage layers, which treat per-pixel/per-pair failures as
/// local, an `Err` that reaches here is always surfaced to the user.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Common(#[from] meshplan_common::CommonError),

    #[error(transparent)]
    Terrain(#[from] meshplan_terrain::TerrainError),

    #[error(transparent)]
    Physics(#[from] meshplan_physics::PhysicsError),

    #[error(transparent)]
    Viewshed(#[from] meshplan_viewshed::ViewshedError),

    #[error(transparent)]
    Coverage(#[from] meshplan_coverage::CoverageError),
}

use fractus_core::CoreError;
use fractus_render::RenderError;
use thiserror::Error;

/// Errors surfaced by the viewport controller and its host.
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

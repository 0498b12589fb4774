/// Errors surfaced by [`crate::Renderer::format`]. Malformed trees are not
/// errors; they render as a placeholder.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
  #[error("unrecognized mode: {0}")]
  UnknownFormat(String),

  #[error("could not serialize tree: {0}")]
  Json(#[from] serde_json::Error),
}

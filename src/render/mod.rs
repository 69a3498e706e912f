use std::path::Path;

use anyhow::Result;

use crate::memory::Transition;

mod asciicast;

pub use asciicast::AsciicastRenderer;

/// Writes a trajectory to a recording on disk
pub trait Renderer {
    /// File extension of the recordings this renderer produces, without the dot
    fn extension(&self) -> &str;

    /// Render `trajectory` to a new file at `path`
    ///
    /// The parent directory of `path` must already exist.
    fn render(&mut self, path: &Path, trajectory: &[Transition]) -> Result<()>;
}

//! Rendering of function and point plots to PNG images, and the bounded directory the images are
//! kept in.

pub mod error;
pub mod plot;
pub mod render;
pub mod store;
mod text_align;

pub use error::PlotError;
pub use plot::{Plot, PlotOptions, Series};
pub use render::Renderer;
pub use store::{Artifact, ArtifactStore};

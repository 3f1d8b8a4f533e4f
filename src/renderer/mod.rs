//! WebGPU rendering module
//!
//! `frame` assembles texture-batched triangles on the CPU; `pipeline` owns the
//! GPU side and draws a `Frame`.

pub mod frame;
pub mod pipeline;
pub mod shapes;
pub mod text;
pub mod vertex;

pub use frame::{Frame, ImageSizes, Scene, TextureSlot, build_frame};
pub use pipeline::{RenderError, RenderState, request_adapter, screen_to_ndc};
pub use text::TextRenderer;
pub use vertex::SpriteVertex;

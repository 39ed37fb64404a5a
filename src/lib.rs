pub mod app;
pub mod atlas;
pub mod backend;
pub mod config;
pub mod draw;
pub mod error;
pub mod font;
pub mod host;
pub mod input;

// Re-export for host applications
pub use crate::app::{Adapter, FontMetrics, ToolkitContext};
pub use crate::atlas::{AtlasTexture, RendererResources};
pub use crate::backend::{render, Color, Command, FontId, Rect, RenderBackend, TextMetrics, Vec2};
pub use crate::config::{BackendConfig, ClipOrigin};
pub use crate::draw::Canvas;
pub use crate::error::{AtlasError, BackendError, ConfigError};
pub use crate::host::{FrameInput, HostFont, HostInput, Key, MouseButton, Rasterizer, TextureId};
pub use crate::input::{InputPusher, InputSink, Keys, MouseButtons};

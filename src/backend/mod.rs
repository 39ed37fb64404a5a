// filepath: src/backend/mod.rs
//! Render backend for toolkit command lists
//!
//! This is the main entry point for command dispatch.
//! It re-exports the command types, the backend trait and the rasterizer-backed implementation.

pub mod interface;
mod raster;

pub use interface::{
    render, Color, Command, FontId, Rect, RenderBackend, TextMetrics, Vec2,
};
pub use raster::{center_icon, RasterBackend};

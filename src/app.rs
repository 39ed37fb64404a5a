// filepath: src/app.rs
//! Adapter glue between a toolkit context and a host
//!
//! The host owns one [`Adapter`] per window and drives it from its render
//! loop: `setup` once, then `push_inputs` and `render` every frame.

use std::sync::Arc;

use log::{debug, info};

use crate::atlas::RendererResources;
use crate::backend::{self, Command, FontId, RasterBackend, TextMetrics};
use crate::config::BackendConfig;
use crate::error::AtlasError;
use crate::host::{HostFont, HostInput, Rasterizer};
use crate::input::{InputPusher, InputSink};

/// Toolkit context hooks the adapter registers into at setup
pub trait ToolkitContext: InputSink {
    fn set_text_metrics(&mut self, metrics: Arc<dyn TextMetrics>);
}

/// Text measurement backed by the host default font
pub struct FontMetrics {
    font: Arc<dyn HostFont>,
    size: i32,
}

impl FontMetrics {
    pub fn new(font: Arc<dyn HostFont>, size: i32) -> Self {
        Self { font, size }
    }
}

impl TextMetrics for FontMetrics {
    fn text_width(&self, font: Option<FontId>, text: &str) -> i32 {
        match font {
            None => self.font.measure_text(text, self.size),
            // Custom fonts are not measured
            Some(_) => 1,
        }
    }

    fn text_height(&self, font: Option<FontId>) -> i32 {
        match font {
            None => self.font.line_height(self.size),
            Some(_) => 1,
        }
    }
}

pub struct Adapter {
    config: BackendConfig,
    resources: RendererResources,
    input: InputPusher,
}

impl Adapter {
    pub fn new(config: BackendConfig) -> Self {
        Self::with_resources(config, RendererResources::new())
    }

    pub fn with_resources(config: BackendConfig, resources: RendererResources) -> Self {
        let input = InputPusher::new(&config.input);
        Self {
            config,
            resources,
            input,
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn resources(&self) -> &RendererResources {
        &self.resources
    }

    /// Load the atlas (once) and register text metrics with the toolkit
    pub fn setup<T, R>(&self, ctx: &mut T, raster: &mut R) -> Result<(), AtlasError>
    where
        T: ToolkitContext + ?Sized,
        R: Rasterizer + ?Sized,
    {
        self.resources.setup(raster)?;

        let metrics = FontMetrics::new(raster.default_font(), self.config.render.font_size);
        ctx.set_text_metrics(Arc::new(metrics));
        info!("Backend set up");
        Ok(())
    }

    /// Forward this frame's host input to the toolkit
    pub fn push_inputs<H, S>(&mut self, host: &mut H, sink: &mut S)
    where
        H: HostInput + ?Sized,
        S: InputSink + ?Sized,
    {
        self.input.push_inputs(host, sink);
    }

    /// Draw one frame's command list. Returns the number of rejected commands.
    pub fn render<R: Rasterizer + ?Sized>(
        &self,
        raster: &mut R,
        commands: &[Command],
    ) -> Result<usize, AtlasError> {
        let mut target = RasterBackend::new(raster, &self.resources, &self.config.render)?;
        let rejected = backend::render(&mut target, commands);
        debug!(
            "Rendered {} commands ({} rejected)",
            commands.len(),
            rejected
        );
        Ok(rejected)
    }
}

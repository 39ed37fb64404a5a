// filepath: src/backend/raster.rs
//! Render backend over a host [`Rasterizer`]
//!
//! Maps each toolkit command onto one rasterizer primitive and tracks the
//! single active scissor region.

use log::trace;

use crate::atlas::{icon_rect, AtlasTexture, RendererResources};
use crate::backend::interface::{Color, FontId, Rect, RenderBackend, Vec2};
use crate::config::{ClipOrigin, RenderConfig};
use crate::error::{AtlasError, BackendError};
use crate::host::Rasterizer;

pub struct RasterBackend<'a, R: Rasterizer + ?Sized> {
    raster: &'a mut R,
    atlas: AtlasTexture,
    font_size: i32,
    clip_origin: ClipOrigin,
    clip: Option<Rect>,
}

impl<'a, R: Rasterizer + ?Sized> RasterBackend<'a, R> {
    /// Wrap a rasterizer for one frame. Fails if the atlas was never set up.
    pub fn new(
        raster: &'a mut R,
        resources: &RendererResources,
        config: &RenderConfig,
    ) -> Result<Self, AtlasError> {
        let atlas = *resources.atlas()?;
        Ok(Self {
            raster,
            atlas,
            font_size: config.font_size,
            clip_origin: config.clip_origin,
            clip: None,
        })
    }

    /// Toolkit-space rect of the active scissor region
    pub fn active_clip(&self) -> Option<Rect> {
        self.clip
    }

    fn close_clip(&mut self) {
        if self.clip.take().is_some() {
            self.raster.end_scissor();
        }
    }

    fn open_clip(&mut self, rect: Rect) {
        let y = match self.clip_origin {
            ClipOrigin::TopLeft => rect.y,
            ClipOrigin::BottomLeft => {
                let (_, screen_h) = self.raster.screen_size();
                screen_h.saturating_sub(rect.bottom())
            }
        };
        self.raster.begin_scissor(rect.x, y, rect.w, rect.h);
        self.clip = Some(rect);
    }
}

/// Top-left position that centers `icon` inside `target`
pub fn center_icon(target: Rect, icon: Rect) -> Vec2 {
    Vec2::new(
        target
            .x
            .saturating_add(target.w.saturating_sub(icon.w).div_euclid(2)),
        target
            .y
            .saturating_add(target.h.saturating_sub(icon.h).div_euclid(2)),
    )
}

impl<R: Rasterizer + ?Sized> RenderBackend for RasterBackend<'_, R> {
    fn begin_frame(&mut self) {
        let (w, h) = self.raster.screen_size();
        self.close_clip();
        self.open_clip(Rect::new(0, 0, w, h));
    }

    fn draw_text(&mut self, font: Option<FontId>, text: &str, pos: Vec2, color: Color) {
        match font {
            None => self
                .raster
                .draw_text(text, pos.x, pos.y, self.font_size, color),
            // TODO: custom fonts need a font registry on the host side
            Some(font) => trace!("Dropping text for unsupported font {:?}", font),
        }
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.raster
            .draw_rectangle(rect.x, rect.y, rect.w, rect.h, color);
    }

    fn draw_icon(&mut self, id: u32, rect: Rect, color: Color) -> Result<(), BackendError> {
        let source = icon_rect(id)?;
        if source.is_empty() {
            trace!("Icon {} has an empty atlas rect, nothing to draw", id);
            return Ok(());
        }

        let position = center_icon(rect, source);
        self.raster
            .draw_texture_rec(self.atlas.texture, source, position, color);
        Ok(())
    }

    fn set_clip(&mut self, rect: Rect) {
        self.close_clip();
        self.open_clip(rect);
    }

    fn end_frame(&mut self) {
        self.close_clip();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::{ICON_CHECK, ICON_CLOSE, ICON_COLLAPSED, ICON_EXPANDED};
    use crate::backend::interface::{render, Command};
    use crate::host::{HostFont, TextureId};
    use image::RgbaImage;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Text(String, i32, i32, i32),
        Rectangle(i32, i32, i32, i32),
        Blit(TextureId, Rect, Vec2, Color),
        BeginScissor(i32, i32, i32, i32),
        EndScissor,
    }

    struct NullFont;

    impl HostFont for NullFont {
        fn measure_text(&self, text: &str, _size: i32) -> i32 {
            text.len() as i32
        }

        fn base_size(&self) -> i32 {
            10
        }
    }

    #[derive(Default)]
    struct Recording {
        calls: Vec<Call>,
        scissor: Option<(i32, i32, i32, i32)>,
    }

    impl Rasterizer for Recording {
        fn screen_size(&self) -> (i32, i32) {
            (800, 500)
        }

        fn load_texture(&mut self, _image: &RgbaImage) -> TextureId {
            TextureId(7)
        }

        fn draw_text(&mut self, text: &str, x: i32, y: i32, size: i32, _color: Color) {
            self.calls.push(Call::Text(text.to_string(), x, y, size));
        }

        fn draw_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32, _color: Color) {
            self.calls.push(Call::Rectangle(x, y, width, height));
        }

        fn draw_texture_rec(&mut self, texture: TextureId, source: Rect, position: Vec2, tint: Color) {
            self.calls.push(Call::Blit(texture, source, position, tint));
        }

        fn begin_scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
            assert!(self.scissor.is_none(), "scissor opened twice");
            self.scissor = Some((x, y, width, height));
            self.calls.push(Call::BeginScissor(x, y, width, height));
        }

        fn end_scissor(&mut self) {
            self.scissor = None;
            self.calls.push(Call::EndScissor);
        }

        fn default_font(&self) -> Arc<dyn HostFont> {
            Arc::new(NullFont)
        }
    }

    fn loaded_resources(raster: &mut Recording) -> RendererResources {
        let resources = RendererResources::new();
        resources.setup(raster).unwrap();
        resources
    }

    #[test]
    fn backend_requires_atlas() {
        let mut raster = Recording::default();
        let resources = RendererResources::new();
        assert!(matches!(
            RasterBackend::new(&mut raster, &resources, &RenderConfig::default()),
            Err(AtlasError::NotLoaded)
        ));
    }

    #[test]
    fn every_clip_replaces_the_previous_one() {
        let mut raster = Recording::default();
        let resources = loaded_resources(&mut raster);
        let mut backend =
            RasterBackend::new(&mut raster, &resources, &RenderConfig::default()).unwrap();

        backend.begin_frame();
        assert_eq!(backend.active_clip(), Some(Rect::new(0, 0, 800, 500)));

        let clips = [
            Rect::new(10, 10, 100, 100),
            Rect::new(50, 60, 20, 30),
            Rect::new(0, 0, 1000, 1000),
        ];
        for clip in clips {
            backend.set_clip(clip);
            assert_eq!(backend.active_clip(), Some(clip));
        }
        backend.end_frame();
        assert_eq!(backend.active_clip(), None);
        drop(backend);

        assert_eq!(raster.scissor, None);
        assert_eq!(
            raster.calls,
            [
                Call::BeginScissor(0, 0, 800, 500),
                Call::EndScissor,
                Call::BeginScissor(10, 10, 100, 100),
                Call::EndScissor,
                Call::BeginScissor(50, 60, 20, 30),
                Call::EndScissor,
                Call::BeginScissor(0, 0, 1000, 1000),
                Call::EndScissor,
            ]
        );
    }

    #[test]
    fn bottom_left_origin_flips_scissor_y() {
        let mut raster = Recording::default();
        let resources = loaded_resources(&mut raster);
        let config = RenderConfig {
            clip_origin: ClipOrigin::BottomLeft,
            ..RenderConfig::default()
        };
        let mut backend = RasterBackend::new(&mut raster, &resources, &config).unwrap();

        backend.set_clip(Rect::new(10, 100, 50, 40));
        assert_eq!(backend.active_clip(), Some(Rect::new(10, 100, 50, 40)));
        drop(backend);

        assert_eq!(raster.scissor, Some((10, 500 - 140, 50, 40)));
    }

    #[test]
    fn extreme_geometry_does_not_overflow() {
        let mut raster = Recording::default();
        let resources = loaded_resources(&mut raster);
        let config = RenderConfig {
            clip_origin: ClipOrigin::BottomLeft,
            ..RenderConfig::default()
        };
        let mut backend = RasterBackend::new(&mut raster, &resources, &config).unwrap();

        backend.set_clip(Rect::new(0, i32::MAX - 5, 10, 100));
        backend
            .draw_icon(1, Rect::new(i32::MAX - 5, i32::MAX - 5, 100, 100), Color::WHITE)
            .unwrap();
        drop(backend);

        assert_eq!(raster.scissor, Some((0, 500 - i32::MAX, 10, 100)));
        assert_eq!(
            raster.calls.last(),
            Some(&Call::Blit(
                TextureId(7),
                ICON_CLOSE,
                Vec2::new(i32::MAX, i32::MAX),
                Color::WHITE
            ))
        );
    }

    #[test]
    fn centering_saturates_at_the_far_edge() {
        assert_eq!(
            center_icon(Rect::new(i32::MAX, 0, i32::MAX, 16), ICON_CLOSE),
            Vec2::new(i32::MAX, 0)
        );
    }

    #[test]
    fn icons_are_centered_from_the_table() {
        let mut raster = Recording::default();
        let resources = loaded_resources(&mut raster);
        let mut backend =
            RasterBackend::new(&mut raster, &resources, &RenderConfig::default()).unwrap();

        let target = Rect::new(100, 200, 25, 30);
        let tint = Color::new(10, 20, 30, 255);
        for id in 1..=4 {
            backend.draw_icon(id, target, tint).unwrap();
        }
        drop(backend);

        // (25 - 16) / 2 = 4, (30 - 16) / 2 = 7
        let position = Vec2::new(104, 207);
        assert_eq!(
            raster.calls,
            [ICON_CLOSE, ICON_CHECK, ICON_COLLAPSED, ICON_EXPANDED]
                .into_iter()
                .map(|source| Call::Blit(TextureId(7), source, position, tint))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn centering_floors_when_target_is_smaller() {
        assert_eq!(
            center_icon(Rect::new(0, 0, 13, 16), ICON_CLOSE),
            Vec2::new(-2, 0)
        );
        assert_eq!(
            center_icon(Rect::new(5, 5, 16, 17), ICON_CLOSE),
            Vec2::new(5, 5)
        );
    }

    #[test]
    fn empty_and_invalid_icons_draw_nothing() {
        let mut raster = Recording::default();
        let resources = loaded_resources(&mut raster);
        let mut backend =
            RasterBackend::new(&mut raster, &resources, &RenderConfig::default()).unwrap();

        let target = Rect::new(0, 0, 20, 20);
        assert_eq!(backend.draw_icon(0, target, Color::WHITE), Ok(()));
        assert_eq!(
            backend.draw_icon(5, target, Color::WHITE),
            Err(BackendError::InvalidIcon(5))
        );
        drop(backend);

        assert!(raster.calls.is_empty());
    }

    #[test]
    fn text_uses_default_font_size_and_drops_custom_fonts() {
        let mut raster = Recording::default();
        let resources = loaded_resources(&mut raster);
        let mut backend =
            RasterBackend::new(&mut raster, &resources, &RenderConfig::default()).unwrap();

        let commands = [
            Command::Text {
                font: None,
                pos: Vec2::new(3, 4),
                color: Color::WHITE,
                text: "hello".into(),
            },
            Command::Text {
                font: Some(FontId(1)),
                pos: Vec2::new(3, 4),
                color: Color::WHITE,
                text: "ignored".into(),
            },
            Command::Rect {
                rect: Rect::new(1, 2, 3, 4),
                color: Color::BLACK,
            },
        ];
        assert_eq!(render(&mut backend, &commands), 0);
        drop(backend);

        assert_eq!(
            raster.calls,
            [
                Call::BeginScissor(0, 0, 800, 500),
                Call::Text("hello".into(), 3, 4, 10),
                Call::Rectangle(1, 2, 3, 4),
                Call::EndScissor,
            ]
        );
    }
}

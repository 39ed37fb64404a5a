// filepath: src/draw.rs
//! Software canvas for mu-canvas
//!
//! This file contains an RGBA8 pixel buffer that implements the host
//! rasterizer: alpha-blended rectangles, tinted texture blits, bitmap text
//! and a single scissor region.

use std::sync::Arc;

use image::RgbaImage;
use log::{debug, warn};

use crate::backend::{Color, Rect, Vec2};
use crate::font::{self, BitmapFont};
use crate::host::{HostFont, Rasterizer, TextureId};

/// Canvas that owns its pixels and uploaded textures
pub struct Canvas {
    buffer: Vec<u8>,
    width: u32,
    height: u32,
    textures: Vec<RgbaImage>,
    scissor: Option<Rect>,
}

impl Canvas {
    /// Create a new transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: vec![0; width as usize * height as usize * 4],
            width,
            height,
            textures: Vec::new(),
            scissor: None,
        }
    }

    /// Get the width of the canvas
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height of the canvas
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 pixels, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.buffer
    }

    /// Color of one pixel, if inside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.buffer[idx..idx + 4];
        Some(Color::new(p[0], p[1], p[2], p[3]))
    }

    /// Fill the whole canvas with a solid color, ignoring the scissor
    pub fn clear(&mut self, color: Color) {
        let color = color.to_array();
        for pixel in self.buffer.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }

    /// Copy the pixels out as an image
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_raw(self.width, self.height, self.buffer.clone())
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    /// Region draws may touch: canvas bounds, narrowed by the scissor
    fn drawable(&self) -> Rect {
        let bounds = Rect::new(0, 0, self.width as i32, self.height as i32);
        match self.scissor {
            Some(scissor) => bounds.intersect(&scissor),
            None => bounds,
        }
    }

    /// Source-over blend of one pixel. Callers clip coordinates first.
    fn blend(&mut self, x: i32, y: i32, color: Color) {
        if color.a == 0 {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let dst = &mut self.buffer[idx..idx + 4];
        if color.a == 255 {
            dst.copy_from_slice(&color.to_array());
            return;
        }

        let sa = color.a as u32;
        let da = dst[3] as u32;
        // Output alpha in 0..=255*255 fixed point
        let out_a = sa * 255 + da * (255 - sa);
        if out_a == 0 {
            return;
        }
        for (channel, src) in dst.iter_mut().take(3).zip([color.r, color.g, color.b]) {
            let blended = (src as u32 * sa * 255 + *channel as u32 * da * (255 - sa)) / out_a;
            *channel = blended as u8;
        }
        dst[3] = ((out_a + 127) / 255) as u8;
    }

    /// Draw a filled rectangle
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        // Ensure the rectangle is within bounds
        let area = self.drawable().intersect(&Rect::new(x, y, width, height));
        if area.is_empty() {
            return; // Nothing to draw
        }

        for py in area.y..area.y + area.h {
            for px in area.x..area.x + area.w {
                self.blend(px, py, color);
            }
        }
    }

    /// Draw text with the built-in bitmap font
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Color, size: i32) {
        let scale = font::scale_for(size);
        let area = self.drawable();
        for (dx, dy) in font::layout(text, size) {
            let cell = area.intersect(&Rect::new(
                x.saturating_add(dx),
                y.saturating_add(dy),
                scale,
                scale,
            ));
            for py in cell.y..cell.y + cell.h {
                for px in cell.x..cell.x + cell.w {
                    self.blend(px, py, color);
                }
            }
        }
    }

    /// Blit part of an uploaded texture, multiplying every texel by `tint`
    pub fn blit(&mut self, texture: TextureId, source: Rect, position: Vec2, tint: Color) {
        let Some(image) = self.textures.get(texture.0 as usize) else {
            warn!("Blit from unknown texture {:?}", texture);
            return;
        };
        let tex_bounds = Rect::new(0, 0, image.width() as i32, image.height() as i32);
        let source = tex_bounds.intersect(&source);

        let dest = self.drawable().intersect(&Rect::new(
            position.x,
            position.y,
            source.w,
            source.h,
        ));
        if dest.is_empty() {
            return;
        }

        // Collect first: the texture borrow must end before blending into the buffer
        let mut texels = Vec::with_capacity((dest.w * dest.h) as usize);
        for py in dest.y..dest.y + dest.h {
            for px in dest.x..dest.x + dest.w {
                let sx = source.x + (px - position.x);
                let sy = source.y + (py - position.y);
                let [r, g, b, a] = image.get_pixel(sx as u32, sy as u32).0;
                texels.push((px, py, modulate(Color::new(r, g, b, a), tint)));
            }
        }
        for (px, py, color) in texels {
            self.blend(px, py, color);
        }
    }
}

fn modulate(texel: Color, tint: Color) -> Color {
    let mul = |a: u8, b: u8| ((a as u32 * b as u32 + 127) / 255) as u8;
    Color::new(
        mul(texel.r, tint.r),
        mul(texel.g, tint.g),
        mul(texel.b, tint.b),
        mul(texel.a, tint.a),
    )
}

impl Rasterizer for Canvas {
    fn screen_size(&self) -> (i32, i32) {
        (self.width as i32, self.height as i32)
    }

    fn load_texture(&mut self, image: &RgbaImage) -> TextureId {
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(image.clone());
        debug!(
            "Canvas: uploaded texture {:?} ({}x{})",
            id,
            image.width(),
            image.height()
        );
        id
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: i32, color: Color) {
        Canvas::draw_text(self, x, y, text, color, size);
    }

    fn draw_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        self.fill_rect(x, y, width, height, color);
    }

    fn draw_texture_rec(&mut self, texture: TextureId, source: Rect, position: Vec2, tint: Color) {
        self.blit(texture, source, position, tint);
    }

    fn begin_scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.scissor = Some(Rect::new(x, y, width, height));
    }

    fn end_scissor(&mut self) {
        self.scissor = None;
    }

    fn default_font(&self) -> Arc<dyn HostFont> {
        Arc::new(BitmapFont)
    }
}

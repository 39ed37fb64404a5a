// filepath: src/backend/interface.rs
//! Toolkit-facing interface definitions
//!
//! This file defines the geometry, the draw commands a toolkit emits each
//! frame, and the traits a render backend implements to consume them.

use crate::error::BackendError;

/// Integer point in toolkit pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Rectangle used for commands and atlas regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// True when the rectangle covers no pixels
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Right edge (exclusive), saturating at `i32::MAX`
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// Bottom edge (exclusive), saturating at `i32::MAX`
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    /// Overlapping area of two rectangles, possibly empty
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());
        Rect::new(
            x1,
            y1,
            x2.saturating_sub(x1).max(0),
            y2.saturating_sub(y1).max(0),
        )
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

/// Opaque handle to a toolkit font. `None` in a command means the default font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

/// Drawing instructions emitted by the toolkit, in painter's order
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Glyph run at a position
    Text {
        font: Option<FontId>,
        pos: Vec2,
        color: Color,
        text: String,
    },

    /// Filled axis-aligned rectangle
    Rect { rect: Rect, color: Color },

    /// Atlas icon centered inside a target rectangle
    Icon { id: u32, rect: Rect, color: Color },

    /// Replace the active clip region
    Clip { rect: Rect },
}

/// Text measurement the toolkit needs for layout
pub trait TextMetrics {
    /// Width in pixels of `text` drawn with `font`
    fn text_width(&self, font: Option<FontId>, text: &str) -> i32;

    /// Line height in pixels of `font`
    fn text_height(&self, font: Option<FontId>) -> i32;
}

/// Core render backend trait, implemented once per target rasterizer.
///
/// # Call order per frame
///
/// ```text
/// backend.begin_frame()
/// backend.dispatch(cmd)   // for every command, in list order
/// backend.end_frame()
/// ```
pub trait RenderBackend {
    /// Reset the clip region to the full viewport
    fn begin_frame(&mut self);

    fn draw_text(&mut self, font: Option<FontId>, text: &str, pos: Vec2, color: Color);

    fn draw_rect(&mut self, rect: Rect, color: Color);

    /// Blit atlas icon `id` centered in `rect`
    fn draw_icon(&mut self, id: u32, rect: Rect, color: Color) -> Result<(), BackendError>;

    /// Close the active clip region and open one at `rect`
    fn set_clip(&mut self, rect: Rect);

    /// Clear the clip region
    fn end_frame(&mut self);

    /// Route one command to the matching draw method
    fn dispatch(&mut self, command: &Command) -> Result<(), BackendError> {
        match command {
            Command::Text {
                font,
                pos,
                color,
                text,
            } => self.draw_text(*font, text, *pos, *color),
            Command::Rect { rect, color } => self.draw_rect(*rect, *color),
            Command::Icon { id, rect, color } => self.draw_icon(*id, *rect, *color)?,
            Command::Clip { rect } => self.set_clip(*rect),
        }
        Ok(())
    }
}

/// Render one frame's command list.
///
/// Commands that the backend rejects are logged and skipped so the rest of
/// the frame still draws. Returns the number of rejected commands.
pub fn render<B: RenderBackend + ?Sized>(backend: &mut B, commands: &[Command]) -> usize {
    backend.begin_frame();

    let mut rejected = 0;
    for command in commands {
        if let Err(err) = backend.dispatch(command) {
            log::warn!("Skipping command {:?}: {}", command, err);
            rejected += 1;
        }
    }

    backend.end_frame();
    rejected
}

// filepath: src/host.rs
//! Host graphics and input interfaces
//!
//! The host owns the window, input polling and rasterization. These traits
//! are the subset of it the adapter calls into.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use image::RgbaImage;

use crate::backend::{Color, Rect, Vec2};

/// Handle to a texture uploaded to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Host's built-in default font
pub trait HostFont: Send + Sync {
    /// Width in pixels of `text` at `size`
    fn measure_text(&self, text: &str, size: i32) -> i32;

    /// Native line height of the font
    fn base_size(&self) -> i32;

    /// Line height in pixels when drawn at `size`
    fn line_height(&self, size: i32) -> i32 {
        size
    }
}

/// Drawing primitives of the host graphics library
pub trait Rasterizer {
    /// Render target size in pixels (width, height)
    fn screen_size(&self) -> (i32, i32);

    /// Upload an RGBA8 image and return its texture handle
    fn load_texture(&mut self, image: &RgbaImage) -> TextureId;

    /// Draw text with the default font, top-left at (x, y)
    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: i32, color: Color);

    fn draw_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color);

    /// Draw the `source` region of `texture` at `position`, multiplied by `tint`
    fn draw_texture_rec(&mut self, texture: TextureId, source: Rect, position: Vec2, tint: Color);

    /// Limit subsequent draws to a screen region
    fn begin_scissor(&mut self, x: i32, y: i32, width: i32, height: i32);

    /// Remove the scissor region
    fn end_scissor(&mut self);

    fn default_font(&self) -> Arc<dyn HostFont>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    LeftControl,
    RightControl,
    LeftShift,
    RightShift,
    LeftAlt,
    RightAlt,
    Backspace,
    Enter,
}

/// Input device state of the host for the current frame
pub trait HostInput {
    /// Absolute pointer position
    fn mouse_position(&self) -> (f32, f32);

    /// Wheel movement since the last poll (horizontal, vertical)
    fn mouse_wheel_move(&self) -> (f32, f32);

    fn is_mouse_button_pressed(&self, button: MouseButton) -> bool;

    fn is_mouse_button_released(&self, button: MouseButton) -> bool;

    fn is_key_pressed(&self, key: Key) -> bool;

    fn is_key_released(&self, key: Key) -> bool;

    /// Pop the next pending typed character, if any
    fn next_char(&mut self) -> Option<char>;
}

/// Recorded input for one frame.
///
/// Window-system event handlers feed this between frames; the adapter reads
/// it as a [`HostInput`]. Call [`FrameInput::new_frame`] after each frame to
/// drop the one-frame edges.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    mouse_pos: (f32, f32),
    wheel: (f32, f32),
    buttons_down: HashSet<MouseButton>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,
    keys_down: HashSet<Key>,
    keys_pressed: HashSet<Key>,
    keys_released: HashSet<Key>,
    chars: VecDeque<char>,
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roll over to the next frame: edges, wheel and unread characters are cleared
    pub fn new_frame(&mut self) {
        self.wheel = (0.0, 0.0);
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.chars.clear();
    }

    pub fn set_mouse_pos(&mut self, x: f32, y: f32) {
        self.mouse_pos = (x, y);
    }

    pub fn add_wheel(&mut self, dx: f32, dy: f32) {
        self.wheel.0 += dx;
        self.wheel.1 += dy;
    }

    pub fn set_mouse_button(&mut self, button: MouseButton, down: bool) {
        if down {
            if self.buttons_down.insert(button) {
                self.buttons_pressed.insert(button);
            }
        } else if self.buttons_down.remove(&button) {
            self.buttons_released.insert(button);
        }
    }

    pub fn set_key(&mut self, key: Key, down: bool) {
        if down {
            if self.keys_down.insert(key) {
                self.keys_pressed.insert(key);
            }
        } else if self.keys_down.remove(&key) {
            self.keys_released.insert(key);
        }
    }

    pub fn push_char(&mut self, ch: char) {
        self.chars.push_back(ch);
    }

    pub fn push_str(&mut self, text: &str) {
        self.chars.extend(text.chars());
    }

    pub fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }
}

impl HostInput for FrameInput {
    fn mouse_position(&self) -> (f32, f32) {
        self.mouse_pos
    }

    fn mouse_wheel_move(&self) -> (f32, f32) {
        self.wheel
    }

    fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    fn is_mouse_button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    fn is_key_released(&self, key: Key) -> bool {
        self.keys_released.contains(&key)
    }

    fn next_char(&mut self) -> Option<char> {
        self.chars.pop_front()
    }
}

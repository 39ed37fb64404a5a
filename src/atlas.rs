// filepath: src/atlas.rs
//! Default icon atlas
//!
//! The atlas is a small PNG bundled into the binary holding the four toolkit
//! icons and a solid white block. It is decoded and uploaded once per
//! [`RendererResources`].

use image::{ImageFormat, RgbaImage};
use log::{debug, info};
use once_cell::sync::OnceCell;

use crate::backend::Rect;
use crate::error::{AtlasError, BackendError};
use crate::host::{Rasterizer, TextureId};

/// Embedded default sprite sheet
pub const DEFAULT_ATLAS_PNG: &[u8] = include_bytes!("../assets/default_atlas.png");

pub const ICON_CLOSE: Rect = Rect::new(0, 0, 16, 16);
pub const ICON_CHECK: Rect = Rect::new(16, 0, 16, 16);
pub const ICON_COLLAPSED: Rect = Rect::new(32, 0, 16, 16);
pub const ICON_EXPANDED: Rect = Rect::new(48, 0, 16, 16);
pub const ATLAS_WHITE: Rect = Rect::new(2, 18, 3, 3);

/// Highest valid icon id
pub const ICON_MAX: u32 = 4;

/// Atlas regions by index. Icon ids address 0..=ICON_MAX, the last entry is
/// the white sampling block.
pub const ATLAS_RECTS: [Rect; 6] = [
    Rect::ZERO,
    ICON_CLOSE,
    ICON_CHECK,
    ICON_COLLAPSED,
    ICON_EXPANDED,
    ATLAS_WHITE,
];

/// Look up the atlas region of an icon id.
///
/// Id 0 is the reserved empty rect.
pub fn icon_rect(id: u32) -> Result<Rect, BackendError> {
    if id > ICON_MAX {
        return Err(BackendError::InvalidIcon(id));
    }
    Ok(ATLAS_RECTS[id as usize])
}

/// The uploaded atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasTexture {
    pub texture: TextureId,
    pub width: u32,
    pub height: u32,
}

/// Decode a PNG sprite sheet into RGBA8 pixels
pub fn decode_atlas(png: &[u8]) -> Result<RgbaImage, AtlasError> {
    let image = image::load_from_memory_with_format(png, ImageFormat::Png)?;
    Ok(image.to_rgba8())
}

/// Renderer resources owned by the host, one per window/context
#[derive(Debug)]
pub struct RendererResources {
    png: &'static [u8],
    atlas: OnceCell<AtlasTexture>,
}

impl Default for RendererResources {
    fn default() -> Self {
        Self::new()
    }
}

impl RendererResources {
    /// Resources backed by the embedded default atlas
    pub fn new() -> Self {
        Self::with_atlas_png(DEFAULT_ATLAS_PNG)
    }

    /// Resources backed by a custom sprite sheet with the default layout
    pub fn with_atlas_png(png: &'static [u8]) -> Self {
        Self {
            png,
            atlas: OnceCell::new(),
        }
    }

    /// Decode and upload the atlas on the first call; later calls return the
    /// cached texture without touching the rasterizer.
    pub fn setup<R: Rasterizer + ?Sized>(&self, raster: &mut R) -> Result<&AtlasTexture, AtlasError> {
        self.atlas.get_or_try_init(|| {
            let image = decode_atlas(self.png)?;
            let (width, height) = image.dimensions();
            debug!("Decoded atlas {}x{}", width, height);

            let texture = raster.load_texture(&image);
            info!("Default atlas loaded as {:?}", texture);
            Ok(AtlasTexture {
                texture,
                width,
                height,
            })
        })
    }

    /// The atlas, if setup has completed
    pub fn atlas(&self) -> Result<&AtlasTexture, AtlasError> {
        self.atlas.get().ok_or(AtlasError::NotLoaded)
    }
}

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Identifier of a product as reported by the catalog service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// 24-bit RGB color stored as `0xRRGGBB`, with an optional alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub rgb: u32,
    pub alpha: f32,
}

impl Color {
    pub const WHITE: Self = Self::hex(0xffffff);

    pub const fn hex(rgb: u32) -> Self {
        Self { rgb, alpha: 1.0 }
    }

    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self {
            rgb: self.rgb,
            alpha,
        }
    }

    /// Normalized `[r, g, b, a]`.
    pub fn to_rgba(self) -> [f32; 4] {
        let r = ((self.rgb >> 16) & 0xff) as f32 / 255.0;
        let g = ((self.rgb >> 8) & 0xff) as f32 / 255.0;
        let b = (self.rgb & 0xff) as f32 / 255.0;
        [r, g, b, self.alpha]
    }

    pub fn is_opaque(&self) -> bool {
        self.alpha >= 1.0
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.rgb)
    }
}

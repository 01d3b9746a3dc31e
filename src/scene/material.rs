use serde::{Deserialize, Serialize};

use crate::math::Color;

/// Index into the scene's texture store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shading {
    /// Unlit colour (and map)
    Basic,
    /// Diffuse + ambient lighting
    Standard,
    /// Diffuse + specular lighting with bump and specular maps
    Phong,
    /// View-space normal as colour
    Normal,
    /// Unlit line colour
    Line,
    /// Rim-light shell, see [`crate::shader::glow_intensity`]
    Glow { intensity: f32, fade: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Blending {
    Normal,
    Additive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureChannel {
    Map,
    BumpMap,
    SpecularMap,
    AlphaMap,
}

impl TextureChannel {
    /// Colour maps are sampled as sRGB, data maps as linear
    pub fn is_color(self) -> bool {
        matches!(self, TextureChannel::Map)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextureMaps {
    pub map: Option<TextureHandle>,
    pub bump_map: Option<TextureHandle>,
    pub specular_map: Option<TextureHandle>,
    pub alpha_map: Option<TextureHandle>,
}

impl TextureMaps {
    pub fn get(&self, channel: TextureChannel) -> Option<TextureHandle> {
        match channel {
            TextureChannel::Map => self.map,
            TextureChannel::BumpMap => self.bump_map,
            TextureChannel::SpecularMap => self.specular_map,
            TextureChannel::AlphaMap => self.alpha_map,
        }
    }

    pub fn set(&mut self, channel: TextureChannel, handle: TextureHandle) {
        let slot = match channel {
            TextureChannel::Map => &mut self.map,
            TextureChannel::BumpMap => &mut self.bump_map,
            TextureChannel::SpecularMap => &mut self.specular_map,
            TextureChannel::AlphaMap => &mut self.alpha_map,
        };
        *slot = Some(handle);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub shading: Shading,
    pub color: Color,
    pub specular: Color,
    pub shininess: f32,
    pub bump_scale: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub side: Side,
    pub blending: Blending,
    pub depth_write: bool,
    pub maps: TextureMaps,
}

impl Material {
    fn with_shading(shading: Shading) -> Self {
        Self {
            shading,
            color: Color::WHITE,
            specular: Color::from_hex(0x111111),
            shininess: 30.0,
            bump_scale: 1.0,
            opacity: 1.0,
            transparent: false,
            side: Side::Front,
            blending: Blending::Normal,
            depth_write: true,
            maps: TextureMaps::default(),
        }
    }

    pub fn basic(color: Color) -> Self {
        Self {
            color,
            ..Self::with_shading(Shading::Basic)
        }
    }

    pub fn standard(color: Color) -> Self {
        Self {
            color,
            ..Self::with_shading(Shading::Standard)
        }
    }

    pub fn phong() -> Self {
        Self::with_shading(Shading::Phong)
    }

    pub fn normal() -> Self {
        Self::with_shading(Shading::Normal)
    }

    pub fn line(color: Color) -> Self {
        Self {
            color,
            ..Self::with_shading(Shading::Line)
        }
    }

    /// Back faces only, additive, no depth writes
    pub fn glow(intensity: f32, fade: f32, color: Color) -> Self {
        Self {
            color,
            side: Side::Back,
            blending: Blending::Additive,
            transparent: true,
            depth_write: false,
            ..Self::with_shading(Shading::Glow { intensity, fade })
        }
    }

    pub fn with_map(mut self, channel: TextureChannel, handle: TextureHandle) -> Self {
        self.maps.set(channel, handle);
        self
    }

    /// Overlay explicit overrides on this material, field by field
    pub fn merged(mut self, overrides: &MaterialOptions) -> Self {
        if let Some(color) = overrides.color {
            self.color = Color::from_hex(color);
        }
        if let Some(specular) = overrides.specular {
            self.specular = Color::from_hex(specular);
        }
        if let Some(shininess) = overrides.shininess {
            self.shininess = shininess;
        }
        if let Some(bump_scale) = overrides.bump_scale {
            self.bump_scale = bump_scale;
        }
        if let Some(opacity) = overrides.opacity {
            self.opacity = opacity;
        }
        if let Some(transparent) = overrides.transparent {
            self.transparent = transparent;
        }
        if let Some(side) = overrides.side {
            self.side = side;
        }
        if let Some(blending) = overrides.blending {
            self.blending = blending;
        }
        if let Some(depth_write) = overrides.depth_write {
            self.depth_write = depth_write;
        }
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.transparent || self.opacity < 1.0
    }
}

/// Optional material overrides; unset fields keep the base material's value.
/// Colours are packed `0xRRGGBB`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialOptions {
    pub color: Option<u32>,
    pub specular: Option<u32>,
    pub shininess: Option<f32>,
    pub bump_scale: Option<f32>,
    pub opacity: Option<f32>,
    pub transparent: Option<bool>,
    pub side: Option<Side>,
    pub blending: Option<Blending>,
    pub depth_write: Option<bool>,
}

use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::assets::decode::{PreparedImage, decode_image, premultiply_rgba8_in_place};
use crate::foundation::error::{ApproxError, ApproxResult};

/// Color variant of a sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// White sprite.
    Light,
    /// Black sprite.
    Dark,
}

/// Detail flag of a sprite.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Detail {
    /// Plain body.
    #[default]
    Plain,
    /// Body with a marked core.
    Marked,
}

/// One entry of the sprite set, ready for the CPU rasterizer.
#[derive(Clone)]
pub struct Sprite {
    width: u32,
    height: u32,
    px_width: u32,
    px_height: u32,
    paint: vello_cpu::Image,
}

impl Sprite {
    /// Build a sprite from premultiplied pixels.
    pub fn from_prepared(img: &PreparedImage) -> ApproxResult<Self> {
        let pixmap =
            image_premul_bytes_to_pixmap(img.rgba8_premul.as_slice(), img.width, img.height)?;
        Ok(Self {
            width: img.width,
            height: img.height,
            px_width: img.width,
            px_height: img.height,
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
        })
    }

    /// Draw the same pixels over a `width x height` footprint instead of their native size.
    pub fn with_footprint(mut self, width: u32, height: u32) -> ApproxResult<Self> {
        if width == 0 || height == 0 {
            return Err(ApproxError::validation("sprite footprint must be non-zero"));
        }
        self.width = width;
        self.height = height;
        Ok(self)
    }

    /// Intrinsic width; placements are centered on half of it.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Intrinsic height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Paint transform mapping pixmap pixels onto the footprint.
    pub(crate) fn paint_scale(&self) -> (f64, f64) {
        (
            f64::from(self.width) / f64::from(self.px_width),
            f64::from(self.height) / f64::from(self.px_height),
        )
    }

    pub(crate) fn paint(&self) -> &vello_cpu::Image {
        &self.paint
    }
}

impl std::fmt::Debug for Sprite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sprite")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("px_width", &self.px_width)
            .field("px_height", &self.px_height)
            .finish_non_exhaustive()
    }
}

/// The four sprites addressed by `(variant, detail)`.
#[derive(Clone, Debug)]
pub struct SpriteSet {
    light_plain: Sprite,
    light_marked: Sprite,
    dark_plain: Sprite,
    dark_marked: Sprite,
}

/// Footprint of the [`SpriteSet::fallback`] discs.
pub const FALLBACK_FOOTPRINT: u32 = 3000;

/// Pixels per side stored for each [`SpriteSet::fallback`] disc.
pub const FALLBACK_RESOLUTION: u32 = 128;

/// File names looked up by [`SpriteSet::load_dir`].
pub const SPRITE_FILES: [(Variant, Detail, &str); 4] = [
    (Variant::Light, Detail::Plain, "white_apple.png"),
    (Variant::Dark, Detail::Plain, "black_apple.png"),
    (Variant::Light, Detail::Marked, "white_apple_core.png"),
    (Variant::Dark, Detail::Marked, "black_apple_core.png"),
];

impl SpriteSet {
    /// Assemble a set from four prepared images.
    pub fn new(
        light_plain: Sprite,
        light_marked: Sprite,
        dark_plain: Sprite,
        dark_marked: Sprite,
    ) -> Self {
        Self {
            light_plain,
            light_marked,
            dark_plain,
            dark_marked,
        }
    }

    /// Look up the sprite for a `(variant, detail)` pair.
    pub fn get(&self, variant: Variant, detail: Detail) -> &Sprite {
        match (variant, detail) {
            (Variant::Light, Detail::Plain) => &self.light_plain,
            (Variant::Light, Detail::Marked) => &self.light_marked,
            (Variant::Dark, Detail::Plain) => &self.dark_plain,
            (Variant::Dark, Detail::Marked) => &self.dark_marked,
        }
    }

    /// Load the four sprite PNGs from `dir` (see [`SPRITE_FILES`]).
    pub fn load_dir(dir: &Path) -> ApproxResult<Self> {
        let load = |variant: Variant, detail: Detail| -> ApproxResult<Sprite> {
            let name = SPRITE_FILES
                .iter()
                .find(|(v, d, _)| *v == variant && *d == detail)
                .map(|(_, _, name)| *name)
                .ok_or_else(|| ApproxError::validation("sprite file table is incomplete"))?;
            let path = dir.join(name);
            let bytes = std::fs::read(&path)
                .with_context(|| format!("read sprite '{}'", path.display()))?;
            let img = decode_image(&bytes)?;
            if img.width == 0 || img.height == 0 {
                return Err(ApproxError::validation(format!(
                    "sprite '{}' is empty",
                    path.display()
                )));
            }
            Sprite::from_prepared(&img)
        };

        Ok(Self::new(
            load(Variant::Light, Detail::Plain)?,
            load(Variant::Light, Detail::Marked)?,
            load(Variant::Dark, Detail::Plain)?,
            load(Variant::Dark, Detail::Marked)?,
        ))
    }

    /// Disc set used when no sprite directory is available.
    ///
    /// The discs cover [`FALLBACK_FOOTPRINT`] units, the size the default scale exponents are
    /// tuned for, while only [`FALLBACK_RESOLUTION`] pixels per side are stored.
    pub fn fallback() -> ApproxResult<Self> {
        Self::procedural_with_footprint(FALLBACK_RESOLUTION, FALLBACK_FOOTPRINT)
    }

    /// Procedural discs rasterized at `resolution` pixels and drawn over `footprint` units.
    pub fn procedural_with_footprint(resolution: u32, footprint: u32) -> ApproxResult<Self> {
        let set = Self::procedural(resolution)?;
        let fit = |s: Sprite| s.with_footprint(footprint, footprint);
        Ok(Self::new(
            fit(set.light_plain)?,
            fit(set.light_marked)?,
            fit(set.dark_plain)?,
            fit(set.dark_marked)?,
        ))
    }

    /// Generated disc sprites of `size x size` pixels.
    ///
    /// Light sprites are white, dark sprites black; marked sprites carry a core disc of the
    /// opposite shade.
    pub fn procedural(size: u32) -> ApproxResult<Self> {
        if size == 0 {
            return Err(ApproxError::validation("procedural sprite size must be > 0"));
        }
        let make = |variant: Variant, detail: Detail| -> ApproxResult<Sprite> {
            Sprite::from_prepared(&disc_image(size, variant, detail))
        };
        Ok(Self::new(
            make(Variant::Light, Detail::Plain)?,
            make(Variant::Light, Detail::Marked)?,
            make(Variant::Dark, Detail::Plain)?,
            make(Variant::Dark, Detail::Marked)?,
        ))
    }
}

/// Flat intensity a fully covered pixel of `variant` has.
pub fn variant_intensity(variant: Variant) -> u8 {
    match variant {
        Variant::Light => 255,
        Variant::Dark => 0,
    }
}

fn disc_image(size: u32, variant: Variant, detail: Detail) -> PreparedImage {
    let body = variant_intensity(variant);
    let core = 255 - body;
    let c = f64::from(size) * 0.5;
    let body_r = f64::from(size) * 0.45;
    let core_r = f64::from(size) * 0.15;

    let mut rgba = Vec::with_capacity((size as usize) * (size as usize) * 4);
    for y in 0..size {
        for x in 0..size {
            let dx = f64::from(x) + 0.5 - c;
            let dy = f64::from(y) + 0.5 - c;
            let dist = (dx * dx + dy * dy).sqrt();
            let coverage = (body_r - dist + 0.5).clamp(0.0, 1.0);
            let a = (coverage * 255.0).round() as u8;
            let shade = if detail == Detail::Marked && dist < core_r {
                core
            } else {
                body
            };
            rgba.extend_from_slice(&[shade, shade, shade, a]);
        }
    }
    premultiply_rgba8_in_place(&mut rgba);
    PreparedImage {
        width: size,
        height: size,
        rgba8_premul: Arc::new(rgba),
    }
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> ApproxResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ApproxError::raster("sprite width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ApproxError::raster("sprite height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(ApproxError::raster("sprite byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/sprites.rs"]
mod tests;

use crate::assets::sprites::Sprite;
use crate::foundation::core::{Affine, Rect};
use crate::foundation::error::{ApproxError, ApproxResult};
use crate::foundation::math::over_opaque;
use crate::raster::surface::{Raster, Region};

/// Composite `sprite` onto `raster`, centered on the origin of `transform`.
///
/// The sprite is rasterized into a scratch pixmap sized to its transformed bounding box and then
/// blended source-over into the opaque surface. Returns the touched region, or `None` when the
/// sprite lands entirely outside the surface.
pub fn composite_sprite(
    raster: &mut Raster,
    sprite: &Sprite,
    transform: Affine,
) -> ApproxResult<Option<Region>> {
    let w = f64::from(sprite.width());
    let h = f64::from(sprite.height());
    let local = Rect::new(0.0, 0.0, w, h);
    let full = transform * Affine::translate((-w * 0.5, -h * 0.5));

    let Some(region) = clip_bbox(full.transform_rect_bbox(local), raster) else {
        return Ok(None);
    };

    let width_u16: u16 = region
        .width
        .try_into()
        .map_err(|_| ApproxError::raster("sprite footprint width exceeds u16"))?;
    let height_u16: u16 = region
        .height
        .try_into()
        .map_err(|_| ApproxError::raster("sprite footprint height exceeds u16"))?;

    let to_scratch =
        Affine::translate((-f64::from(region.x), -f64::from(region.y))) * full;

    let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
    let (sx, sy) = sprite.paint_scale();
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::scale_non_uniform(sx, sy));
    ctx.set_transform(affine_to_cpu(to_scratch));
    ctx.set_paint(sprite.paint().clone());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
    ctx.flush();
    let mut scratch = vello_cpu::Pixmap::new(width_u16, height_u16);
    ctx.render_to_pixmap(&mut scratch);

    blend_over(raster, region, scratch.data_as_u8_slice());
    Ok(Some(region))
}

fn blend_over(raster: &mut Raster, region: Region, src_premul: &[u8]) {
    let stride = raster.canvas().width as usize * 4;
    let row_len = region.width as usize * 4;
    let dst = raster.data_mut();
    for (row, src_row) in src_premul.chunks_exact(row_len).enumerate() {
        let start = (region.y as usize + row) * stride + region.x as usize * 4;
        let dst_row = &mut dst[start..start + row_len];
        for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
            let a = s[3];
            if a == 0 {
                continue;
            }
            if a == 255 {
                d[..3].copy_from_slice(&s[..3]);
                continue;
            }
            d[0] = over_opaque(d[0], s[0], a);
            d[1] = over_opaque(d[1], s[1], a);
            d[2] = over_opaque(d[2], s[2], a);
        }
    }
}

/// Snap a float bounding box outward to whole pixels and clip it to the surface.
fn clip_bbox(bbox: Rect, raster: &Raster) -> Option<Region> {
    let canvas = raster.canvas();
    let x0 = bbox.x0.floor().max(0.0);
    let y0 = bbox.y0.floor().max(0.0);
    let x1 = bbox.x1.ceil().min(f64::from(canvas.width));
    let y1 = bbox.y1.ceil().min(f64::from(canvas.height));
    if !(x1 > x0 && y1 > y0) {
        return None;
    }
    Some(Region {
        x: x0 as u32,
        y: y0 as u32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    })
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/blit.rs"]
mod tests;

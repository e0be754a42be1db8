pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Premultiplied source-over onto an opaque destination channel.
pub(crate) fn over_opaque(dst: u8, src_premul: u8, src_alpha: u8) -> u8 {
    let inv = 255u16 - u16::from(src_alpha);
    (u16::from(src_premul) + mul_div255_u16(u16::from(dst), inv)).min(255) as u8
}

/// Map a value in `[0, 1]` onto `[a, b]`.
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;

use super::*;

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u16(128, 255), 128);
}

#[test]
fn over_opaque_endpoints() {
    // Fully transparent source leaves the destination intact.
    assert_eq!(over_opaque(200, 0, 0), 200);
    // Fully opaque source replaces it.
    assert_eq!(over_opaque(200, 10, 255), 10);
    // Half-covered white over black.
    assert_eq!(over_opaque(0, 128, 128), 128);
}

#[test]
fn lerp_clamps_t() {
    assert_eq!(lerp(-6.5, -4.5, 0.0), -6.5);
    assert_eq!(lerp(-6.5, -4.5, 1.0), -4.5);
    assert_eq!(lerp(-6.5, -4.5, 2.0), -4.5);
}

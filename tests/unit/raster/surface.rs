use super::*;

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

#[test]
fn new_fills_opaque_gray() {
    let r = Raster::new(canvas(3, 2), 77);
    assert_eq!(r.data().len(), 24);
    for px in r.data().chunks_exact(4) {
        assert_eq!(px, &[77, 77, 77, 255]);
    }
    assert_eq!(r.intensity(2, 1), 77);
}

#[test]
fn from_rgba8_forces_alpha_and_checks_len() {
    let r = Raster::from_rgba8(canvas(1, 1), vec![9, 8, 7, 0]).unwrap();
    assert_eq!(r.data(), &[9, 8, 7, 255]);
    assert!(Raster::from_rgba8(canvas(2, 2), vec![0; 4]).is_err());
}

#[test]
fn region_read_write_restores_exact_bytes() {
    let mut r = Raster::new(canvas(4, 4), 10);
    let region = Region {
        x: 1,
        y: 1,
        width: 2,
        height: 3,
    };
    let saved = r.read_region(region).unwrap();
    assert_eq!(saved.data.len(), 2 * 3 * 4);

    r.fill(200);
    r.write_region(&saved).unwrap();
    assert_eq!(r.intensity(1, 1), 10);
    assert_eq!(r.intensity(2, 3), 10);
    assert_eq!(r.intensity(0, 0), 200);
    assert_eq!(r.intensity(3, 3), 200);
}

#[test]
fn region_out_of_bounds_is_rejected() {
    let r = Raster::new(canvas(4, 4), 0);
    let region = Region {
        x: 3,
        y: 0,
        width: 2,
        height: 1,
    };
    assert!(r.read_region(region).is_err());
}

#[test]
fn copy_from_requires_matching_canvas() {
    let mut a = Raster::new(canvas(2, 2), 0);
    let b = Raster::new(canvas(2, 2), 5);
    a.copy_from(&b).unwrap();
    assert_eq!(a, b);

    let c = Raster::new(canvas(3, 2), 5);
    assert!(a.copy_from(&c).is_err());
}

use super::*;

#[test]
fn procedural_set_has_four_distinct_entries() {
    let set = SpriteSet::procedural(32).unwrap();
    for (variant, detail, _) in SPRITE_FILES {
        let s = set.get(variant, detail);
        assert_eq!(s.width(), 32);
        assert_eq!(s.height(), 32);
    }
}

#[test]
fn procedural_rejects_zero_size() {
    assert!(SpriteSet::procedural(0).is_err());
}

#[test]
fn disc_center_and_corner_coverage() {
    let img = disc_image(16, Variant::Light, Detail::Plain);
    let px = |x: usize, y: usize| {
        let i = (y * 16 + x) * 4;
        [
            img.rgba8_premul[i],
            img.rgba8_premul[i + 1],
            img.rgba8_premul[i + 2],
            img.rgba8_premul[i + 3],
        ]
    };
    assert_eq!(px(8, 8), [255, 255, 255, 255]);
    assert_eq!(px(0, 0), [0, 0, 0, 0]);
}

#[test]
fn marked_core_uses_opposite_shade() {
    let img = disc_image(20, Variant::Dark, Detail::Marked);
    let i = (10 * 20 + 10) * 4;
    assert_eq!(&img.rgba8_premul[i..i + 4], &[255, 255, 255, 255]);
}

#[test]
fn load_dir_reports_missing_files() {
    let dir = std::env::temp_dir().join("appletrace_missing_sprites");
    let _ = std::fs::create_dir_all(&dir);
    let err = SpriteSet::load_dir(&dir).unwrap_err();
    assert!(err.to_string().contains("white_apple.png"));
}

#[test]
fn fallback_discs_cover_the_debug_footprint() {
    let set = SpriteSet::fallback().unwrap();
    for (variant, detail, _) in SPRITE_FILES {
        let s = set.get(variant, detail);
        assert_eq!((s.width(), s.height()), (FALLBACK_FOOTPRINT, FALLBACK_FOOTPRINT));
        let (sx, sy) = s.paint_scale();
        assert_eq!(sx, f64::from(FALLBACK_FOOTPRINT) / f64::from(FALLBACK_RESOLUTION));
        assert_eq!(sx, sy);
    }
}

#[test]
fn zero_footprint_is_rejected() {
    assert!(SpriteSet::procedural_with_footprint(8, 0).is_err());
}

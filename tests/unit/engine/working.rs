use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::*;
use crate::engine::candidate::CandidateSampler;
use crate::engine::config::CandidateConfig;

fn working() -> WorkingSet {
    let sprites = Arc::new(SpriteSet::procedural(64).unwrap());
    WorkingSet::new(Canvas::new(48, 32).unwrap(), sprites, 255)
}

fn big_candidates(n: usize, seed: u64) -> Vec<Candidate> {
    let cfg = CandidateConfig {
        scale_exp_min: -1.5,
        scale_exp_max: -0.5,
        late_scale_exp_max: -0.5,
        ..CandidateConfig::default()
    };
    let sampler = CandidateSampler::new(Canvas::new(48, 32).unwrap(), &cfg, 0.0);
    let mut rng = Pcg32::seed_from_u64(seed);
    (0..n).map(|_| sampler.random(&mut rng)).collect()
}

#[test]
fn restore_of_save_is_exact() {
    let mut ws = working();
    for c in big_candidates(4, 11) {
        ws.commit(c).unwrap();
    }
    let before_pixels = ws.raster().clone();
    let before_seq = ws.candidates().to_vec();

    let snap = ws.save();
    for c in big_candidates(6, 12) {
        ws.commit(c).unwrap();
    }
    assert_eq!(ws.len(), 10);

    ws.restore(&snap).unwrap();
    assert_eq!(ws.raster(), &before_pixels);
    assert_eq!(ws.candidates(), before_seq.as_slice());
}

#[test]
fn restore_can_be_repeated_from_one_snapshot() {
    let mut ws = working();
    let snap = ws.save();
    for c in big_candidates(3, 13) {
        ws.commit(c).unwrap();
        ws.restore(&snap).unwrap();
        assert!(ws.is_empty());
        assert_eq!(ws.raster(), snap.raster());
    }
}

#[test]
fn buffer_matches_recomposed_sequence() {
    let mut ws = working();
    for c in big_candidates(8, 14) {
        ws.commit(c).unwrap();
    }
    assert_eq!(&ws.recompose().unwrap(), ws.raster());
}

#[test]
fn compositing_elsewhere_does_not_track() {
    let ws = working();
    let mut other = Raster::new(Canvas::new(48, 32).unwrap(), 0);
    for c in big_candidates(2, 15) {
        c.composite_onto(&mut other, ws.sprites(), 1.0).unwrap();
    }
    assert!(ws.is_empty());
}

#[test]
fn clear_resets_to_background() {
    let mut ws = working();
    for c in big_candidates(3, 16) {
        ws.commit(c).unwrap();
    }
    ws.clear();
    assert!(ws.is_empty());
    assert_eq!(ws.raster(), &Raster::new(Canvas::new(48, 32).unwrap(), 255));
}

#[test]
fn restore_rejects_foreign_snapshot() {
    let mut ws = working();
    let sprites = ws.sprites().clone();
    let other = WorkingSet::new(Canvas::new(8, 8).unwrap(), sprites, 255);
    assert!(ws.restore(&other.save()).is_err());
}

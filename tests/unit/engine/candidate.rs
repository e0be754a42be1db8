use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::*;

fn canvas() -> Canvas {
    Canvas::new(64, 48).unwrap()
}

#[test]
fn random_candidates_stay_in_their_domains() {
    let cfg = CandidateConfig::default();
    let sampler = CandidateSampler::new(canvas(), &cfg, 0.0);
    let mut rng = Pcg32::seed_from_u64(1);
    let (lo, hi) = sampler.scale_exp_range();
    for _ in 0..500 {
        let c = sampler.random(&mut rng);
        assert!((0.0..64.0).contains(&c.x()));
        assert!((0.0..48.0).contains(&c.y()));
        assert!((0.0..360.0).contains(&c.dir()));
        assert!(c.scale() >= lo.exp() && c.scale() <= hi.exp());
        assert_eq!(c.detail(), Detail::Plain);
    }
}

#[test]
fn variant_is_roughly_balanced() {
    let cfg = CandidateConfig::default();
    let sampler = CandidateSampler::new(canvas(), &cfg, 0.0);
    let mut rng = Pcg32::seed_from_u64(2);
    let light = (0..1000)
        .filter(|_| sampler.random(&mut rng).variant() == Variant::Light)
        .count();
    assert!((400..=600).contains(&light), "light={light}");
}

#[test]
fn materialize_keeps_set_fields() {
    let cfg = CandidateConfig::default();
    let sampler = CandidateSampler::new(canvas(), &cfg, 0.0);
    let mut rng = Pcg32::seed_from_u64(3);
    let c = sampler.materialize(
        CandidateSpec {
            x: Some(1.0),
            y: Some(2.0),
            dir: Some(3.0),
            scale: Some(0.5),
            variant: Some(Variant::Dark),
            detail: Some(Detail::Marked),
        },
        &mut rng,
    );
    assert_eq!((c.x(), c.y(), c.dir(), c.scale()), (1.0, 2.0, 3.0, 0.5));
    assert_eq!(c.variant(), Variant::Dark);
    assert_eq!(c.detail(), Detail::Marked);
}

#[test]
fn scale_range_narrows_with_progress() {
    let cfg = CandidateConfig::default();
    let early = CandidateSampler::new(canvas(), &cfg, 0.0).scale_exp_range();
    let late = CandidateSampler::new(canvas(), &cfg, 1.0).scale_exp_range();
    assert_eq!(early, (-6.5, -3.5));
    assert_eq!(late, (-6.5, -4.5));
}

#[test]
fn children_stay_within_mutation_windows() {
    let cfg = CandidateConfig::default();
    let sampler = CandidateSampler::new(canvas(), &cfg, 0.3);
    let mut rng = Pcg32::seed_from_u64(4);
    for _ in 0..200 {
        let parent = sampler.random(&mut rng);
        let child = parent.create_child(&sampler, &mut rng);

        let dist = ((child.x() - parent.x()).powi(2) + (child.y() - parent.y()).powi(2)).sqrt();
        assert!(dist <= 10.0 + 1e-9, "dist={dist}");

        assert!(child.scale() >= 0.75 * parent.scale() - 1e-12);
        assert!(child.scale() <= 1.25 * parent.scale() + 1e-12);

        assert!((0.0..360.0).contains(&child.dir()));
        let offset = (child.dir() - parent.dir()).rem_euclid(360.0);
        assert!(
            offset < 32.5 + 1e-9 || offset >= 360.0 - 12.5 - 1e-9,
            "offset={offset}"
        );
    }
}

#[test]
fn inherit_policy_copies_traits() {
    let cfg = CandidateConfig {
        child_traits: ChildTraits::Inherit,
        ..CandidateConfig::default()
    };
    let sampler = CandidateSampler::new(canvas(), &cfg, 0.0);
    let mut rng = Pcg32::seed_from_u64(5);
    for _ in 0..100 {
        let parent = sampler.random(&mut rng);
        let child = parent.create_child(&sampler, &mut rng);
        assert_eq!(child.variant(), parent.variant());
        assert_eq!(child.detail(), parent.detail());
    }
}

#[test]
fn transform_places_center_and_applies_ratio() {
    let cfg = CandidateConfig::default();
    let sampler = CandidateSampler::new(canvas(), &cfg, 0.0);
    let mut rng = Pcg32::seed_from_u64(6);
    let c = sampler.materialize(
        CandidateSpec {
            x: Some(10.0),
            y: Some(20.0),
            dir: Some(90.0),
            scale: Some(0.5),
            ..CandidateSpec::default()
        },
        &mut rng,
    );
    let origin = c.transform(2.0) * kurbo::Point::ORIGIN;
    assert!((origin.x - 20.0).abs() < 1e-9);
    assert!((origin.y - 40.0).abs() < 1e-9);
}

#[test]
fn children_of_edge_parents_stay_inside_the_frame() {
    let cfg = CandidateConfig::default();
    let sampler = CandidateSampler::new(canvas(), &cfg, 0.0);
    let c = canvas();
    let (w, h) = (f64::from(c.width), f64::from(c.height));
    let mut rng = Pcg32::seed_from_u64(11);
    for (px, py) in [(0.5, 0.5), (w - 0.5, h - 0.5), (0.0, h - 0.25)] {
        let parent = sampler.materialize(
            CandidateSpec {
                x: Some(px),
                y: Some(py),
                ..CandidateSpec::default()
            },
            &mut rng,
        );
        for _ in 0..100 {
            let child = parent.create_child(&sampler, &mut rng);
            assert!((0.0..w).contains(&child.x()), "x={}", child.x());
            assert!((0.0..h).contains(&child.y()), "y={}", child.y());
            let dist =
                ((child.x() - parent.x()).powi(2) + (child.y() - parent.y()).powi(2)).sqrt();
            assert!(dist <= 10.0 + 1e-9);
        }
    }
}

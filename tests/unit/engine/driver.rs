use super::*;
use crate::engine::config::{ConvergeConfig, SearchConfig};
use crate::source::memory::InMemorySource;

fn canvas() -> Canvas {
    Canvas::new(24, 16).unwrap()
}

fn sprites() -> Arc<SpriteSet> {
    Arc::new(SpriteSet::procedural(32).unwrap())
}

fn quick_cfg(max_sprites: usize, diff_target: f64, spawns_per_tick: usize) -> ApproxConfig {
    ApproxConfig {
        search: SearchConfig {
            initial_pool: 6,
            parent_pool: 2,
            children: 2,
            generations: 2,
        },
        converge: ConvergeConfig {
            max_sprites,
            diff_target,
            spawns_per_tick,
        },
        seed: Some(99),
        ..ApproxConfig::default()
    }
}

struct FailingSource;

impl FrameSource for FailingSource {
    fn canvas(&self) -> Canvas {
        canvas()
    }

    fn next_frame(&mut self) -> ApproxResult<Option<Raster>> {
        Err(ApproxError::source("decoder went away"))
    }
}

#[test]
fn uniform_light_frame_finalizes_without_sprites() {
    let mut driver = FrameDriver::new(quick_cfg(16, 0.02, 3), canvas(), sprites()).unwrap();
    let mut src = InMemorySource::new(canvas(), [Raster::new(canvas(), 255)]).unwrap();

    let DriverStep::Finalized(frame) = driver.tick(&mut src).unwrap() else {
        panic!("expected immediate finalization");
    };
    assert_eq!(frame.index, FrameIndex(0));
    assert!(frame.candidates.is_empty());
    assert_eq!(frame.stats.reason, FinalizeReason::Converged);
    assert_eq!(frame.stats.spawn_calls, 0);
    assert!(frame.stats.distance <= 0.02);
    assert_eq!(driver.frames_finalized(), 1);
}

#[test]
fn unmatchable_frame_is_capped_at_max_sprites() {
    let max = 4;
    let mut driver = FrameDriver::new(quick_cfg(max, 0.0, 3), canvas(), sprites()).unwrap();
    let mut src = InMemorySource::new(canvas(), [Raster::new(canvas(), 0)]).unwrap();

    let mut ticks = 0;
    let frame = loop {
        ticks += 1;
        assert!(ticks <= max + 1, "driver never finalized");
        match driver.tick(&mut src).unwrap() {
            DriverStep::Working { sprites, distance } => {
                assert!(sprites <= max);
                assert!(distance > 0.0);
            }
            DriverStep::Finalized(frame) => break frame,
            DriverStep::Exhausted => panic!("source should still hold the frame"),
        }
    };
    assert_eq!(frame.stats.reason, FinalizeReason::Capped);
    assert_eq!(frame.stats.spawn_calls, max);
    assert!(frame.candidates.len() <= max);
    assert!(frame.stats.evaluations >= max * 6);
    assert!(driver.working().is_empty());
}

#[test]
fn threshold_grows_with_spawn_calls() {
    let mut driver = FrameDriver::new(quick_cfg(16, 0.02, 1), canvas(), sprites()).unwrap();
    assert_eq!(driver.threshold(), 0.0);
    driver.begin_frame(Raster::new(canvas(), 0)).unwrap();
    assert_eq!(driver.threshold(), 0.0);

    driver.spawn_once().unwrap();
    let expected = 0.02 * (1.0f64 / 16.0).powf(0.25);
    assert!((driver.threshold() - expected).abs() < 1e-12);
}

#[test]
fn exhausted_after_source_runs_dry() {
    let mut driver = FrameDriver::new(quick_cfg(8, 0.02, 3), canvas(), sprites()).unwrap();
    let mut src = InMemorySource::new(canvas(), [Raster::new(canvas(), 255)]).unwrap();

    assert!(matches!(
        driver.tick(&mut src).unwrap(),
        DriverStep::Finalized(_)
    ));
    assert_eq!(driver.tick(&mut src).unwrap(), DriverStep::Exhausted);
    assert_eq!(driver.tick(&mut src).unwrap(), DriverStep::Exhausted);
    assert_eq!(driver.frames_finalized(), 1);
}

#[test]
fn frame_indices_follow_source_order() {
    let mut driver = FrameDriver::new(quick_cfg(8, 0.02, 3), canvas(), sprites()).unwrap();
    let frames = (0..3).map(|_| Raster::new(canvas(), 255));
    let mut src = InMemorySource::new(canvas(), frames).unwrap();

    let mut seen = Vec::new();
    loop {
        match driver.tick(&mut src).unwrap() {
            DriverStep::Finalized(f) => seen.push(f.index),
            DriverStep::Exhausted => break,
            DriverStep::Working { .. } => {}
        }
    }
    assert_eq!(seen, vec![FrameIndex(0), FrameIndex(1), FrameIndex(2)]);
}

#[test]
fn mismatched_source_frame_is_rejected() {
    let mut driver = FrameDriver::new(quick_cfg(8, 0.02, 3), canvas(), sprites()).unwrap();
    let other = Canvas::new(8, 8).unwrap();
    let mut src = InMemorySource::new(other, [Raster::new(other, 0)]).unwrap();

    let err = driver.tick(&mut src).unwrap_err();
    assert!(err.to_string().contains("source error:"));
    assert!(driver.working().is_empty());
}

#[test]
fn source_failure_propagates_and_clears_surface() {
    let mut driver = FrameDriver::new(quick_cfg(8, 0.02, 3), canvas(), sprites()).unwrap();
    let err = driver.tick(&mut FailingSource).unwrap_err();
    assert!(err.to_string().contains("decoder went away"));
    assert!(driver.working().is_empty());
    assert!(
        driver
            .working()
            .raster()
            .data()
            .chunks_exact(4)
            .all(|px| px[0] == 255)
    );
}

#[test]
fn same_seed_reproduces_the_same_frame() {
    let run = || {
        let mut driver = FrameDriver::new(quick_cfg(3, 0.0, 3), canvas(), sprites()).unwrap();
        let mut src = InMemorySource::new(canvas(), [Raster::new(canvas(), 0)]).unwrap();
        loop {
            if let DriverStep::Finalized(f) = driver.tick(&mut src).unwrap() {
                return f;
            }
        }
    };
    assert_eq!(run(), run());
}

#[test]
fn zero_sample_stride_is_rejected() {
    let mut cfg = quick_cfg(8, 0.02, 3);
    cfg.fitness.sample_stride = 0;
    assert!(FrameDriver::new(cfg, canvas(), sprites()).is_err());

    let mut cfg = quick_cfg(8, 0.02, 3);
    cfg.fitness.sample_stride = 64;
    assert!(FrameDriver::new(cfg, canvas(), sprites()).is_err());
}

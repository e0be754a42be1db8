use super::*;
use crate::foundation::core::{Canvas, Fps};

fn cfg(width: u32, height: u32, fps: Fps) -> SinkConfig {
    SinkConfig {
        canvas: Canvas { width, height },
        fps,
    }
}

#[test]
fn config_validation_catches_bad_values() {
    assert!(validate_for_mp4(&cfg(0, 10, Fps::default())).is_err());
    assert!(validate_for_mp4(&cfg(11, 10, Fps::default())).is_err());
    assert!(validate_for_mp4(&cfg(10, 10, Fps { num: 0, den: 1 })).is_err());
    assert!(validate_for_mp4(&cfg(10, 10, Fps::default())).is_ok());
}

#[test]
fn push_before_begin_is_rejected() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(
        std::env::temp_dir().join("appletrace_unused.mp4"),
    ));
    let frame = Raster::new(Canvas::new(4, 4).unwrap(), 255);
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn refuses_to_clobber_without_overwrite() {
    let path = std::env::temp_dir()
        .join("appletrace_ffmpeg")
        .join("existing.mp4");
    ensure_parent_dir(&path).unwrap();
    std::fs::write(&path, b"keep me").unwrap();

    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: path.clone(),
        overwrite: false,
    });
    let err = sink.begin(cfg(4, 4, Fps::default())).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    assert_eq!(std::fs::read(&path).unwrap(), b"keep me");
}

#[test]
fn encodes_a_short_clip_when_ffmpeg_is_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let path = std::env::temp_dir()
        .join("appletrace_ffmpeg")
        .join("clip.mp4");
    let canvas = Canvas::new(16, 16).unwrap();
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&path));
    sink.begin(cfg(16, 16, Fps::default())).unwrap();
    for i in 0..4u8 {
        sink.push_frame(FrameIndex(u64::from(i)), &Raster::new(canvas, i * 60))
            .unwrap();
    }
    assert!(
        sink.push_frame(FrameIndex(1), &Raster::new(canvas, 0))
            .is_err()
    );
    sink.end().unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}

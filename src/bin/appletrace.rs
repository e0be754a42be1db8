use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "appletrace", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Approximate every source frame and write the recording as JSON.
    Approximate(ApproximateArgs),
    /// Play a recording into an MP4 (requires `ffmpeg` on PATH) or a PNG sequence directory.
    Play(PlayArgs),
    /// Render a single recorded frame as a PNG.
    Frame(FrameArgs),
}

#[derive(Args, Debug)]
#[group(id = "input", required = true, multiple = false)]
struct InputArgs {
    /// Directory of source frames (PNG/JPEG, read in file-name order).
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Source video (requires the `media-ffmpeg` feature).
    #[arg(long)]
    video: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ApproximateArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Use every N-th frame of a frame directory.
    #[arg(long, default_value_t = 1)]
    step: usize,

    /// Resize source frames to this width (height follows the aspect ratio).
    #[arg(long)]
    width: Option<u32>,

    /// Sprite directory; procedural discs are used when omitted.
    #[arg(long)]
    sprites: Option<PathBuf>,

    /// Engine config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed, overriding the config.
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<usize>,

    /// Cancel generation after this many seconds and keep the frames finalized so far.
    #[arg(long)]
    time_limit: Option<f64>,

    /// Output recording JSON.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Recording JSON produced by `approximate`.
    #[arg(long)]
    recording: PathBuf,

    /// Sprite directory; procedural discs are used when omitted.
    #[arg(long)]
    sprites: Option<PathBuf>,

    /// Output width; sprites and positions are scaled to match.
    #[arg(long)]
    width: Option<u32>,

    /// Times to repeat the sequence.
    #[arg(long, default_value_t = 1)]
    loops: u32,

    /// Cancel the export after this many seconds; the output is still closed.
    #[arg(long)]
    time_limit: Option<f64>,

    /// Output `.mp4` file, or a directory for a PNG sequence.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Recording JSON produced by `approximate`.
    #[arg(long)]
    recording: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    index: u64,

    /// Sprite directory; procedural discs are used when omitted.
    #[arg(long)]
    sprites: Option<PathBuf>,

    /// Output width; sprites and positions are scaled to match.
    #[arg(long)]
    width: Option<u32>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Approximate(args) => cmd_approximate(args),
        Command::Play(args) => cmd_play(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn load_sprites(dir: Option<&Path>) -> anyhow::Result<Arc<appletrace::SpriteSet>> {
    let set = match dir {
        Some(dir) => appletrace::SpriteSet::load_dir(dir)
            .with_context(|| format!("load sprites from '{}'", dir.display()))?,
        None => {
            tracing::warn!("no sprite directory given, using procedural discs");
            appletrace::SpriteSet::fallback()?
        }
    };
    Ok(Arc::new(set))
}

/// Token cancelled once `secs` have elapsed; a zero budget is cancelled up front.
fn cancel_after(secs: Option<f64>) -> anyhow::Result<appletrace::CancelToken> {
    let cancel = appletrace::CancelToken::new();
    let Some(secs) = secs else {
        return Ok(cancel);
    };
    let budget = Duration::try_from_secs_f64(secs)
        .with_context(|| format!("invalid --time-limit {secs}"))?;
    if budget.is_zero() {
        cancel.cancel();
        return Ok(cancel);
    }
    let timer = cancel.clone();
    std::thread::spawn(move || {
        std::thread::sleep(budget);
        tracing::info!(secs, "time limit reached");
        timer.cancel();
    });
    Ok(cancel)
}

fn scaled_canvas(
    src: appletrace::Canvas,
    width: Option<u32>,
) -> anyhow::Result<appletrace::Canvas> {
    let Some(width) = width else {
        return Ok(src);
    };
    let ratio = f64::from(width) / f64::from(src.width);
    let height = (f64::from(src.height) * ratio).round() as u32;
    Ok(appletrace::Canvas::new(width, height.max(1))?)
}

fn open_source(args: &ApproximateArgs) -> anyhow::Result<Box<dyn appletrace::FrameSource>> {
    if let Some(path) = &args.input.video {
        let probe =
            appletrace::VideoSource::open(path, appletrace::VideoSourceOpts::default())?;
        let canvas = scaled_canvas(appletrace::FrameSource::canvas(&probe), args.width)?;
        let opts = appletrace::VideoSourceOpts {
            canvas: Some(canvas),
            ..appletrace::VideoSourceOpts::default()
        };
        return Ok(Box::new(appletrace::VideoSource::open(path, opts)?));
    }
    let dir = args
        .input
        .frames
        .as_deref()
        .context("either --frames or --video is required")?;
    let probe = appletrace::ImageSequenceSource::open(dir, None, args.step)?;
    let canvas = scaled_canvas(appletrace::FrameSource::canvas(&probe), args.width)?;
    Ok(Box::new(appletrace::ImageSequenceSource::open(
        dir,
        Some(canvas),
        args.step,
    )?))
}

fn cmd_approximate(args: ApproximateArgs) -> anyhow::Result<()> {
    let mut cfg = match &args.config {
        Some(path) => appletrace::ApproxConfig::load_json(path)?,
        None => appletrace::ApproxConfig::default(),
    };
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }

    let sprites = load_sprites(args.sprites.as_deref())?;
    let source = open_source(&args)?;
    let mut session = appletrace::Session::new(cfg, source, sprites)?;
    if let Some(n) = args.max_frames {
        session = session.with_max_frames(n);
    }

    let cancel = cancel_after(args.time_limit)?;
    let outcome = session.run(&cancel, |frame| {
        eprintln!(
            "frame {}: {} sprites, distance {:.4}",
            frame.index.0,
            frame.candidates.len(),
            frame.stats.distance
        );
    })?;

    if outcome == appletrace::SessionOutcome::Cancelled {
        eprintln!("time limit reached, keeping finalized frames");
    }

    let recording = session.into_recording();
    recording.save_json(&args.out)?;
    eprintln!("wrote {} ({} frames)", args.out.display(), recording.len());
    Ok(())
}

fn open_player(
    recording: &Path,
    sprites: Option<&Path>,
    width: Option<u32>,
) -> anyhow::Result<appletrace::Player> {
    let recording = appletrace::Recording::load_json(recording)?;
    let canvas = scaled_canvas(recording.canvas, width)?;
    let sprites = load_sprites(sprites)?;
    Ok(appletrace::Player::new(
        Arc::new(recording),
        sprites,
        Some(canvas),
    )?)
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let player = open_player(&args.recording, args.sprites.as_deref(), args.width)?;
    let cancel = cancel_after(args.time_limit)?;
    let is_mp4 = args
        .out
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("mp4"));

    let mut sink: Box<dyn appletrace::FrameSink> = if is_mp4 {
        Box::new(appletrace::FfmpegSink::new(
            appletrace::FfmpegSinkOpts::new(&args.out),
        ))
    } else {
        Box::new(appletrace::PngSequenceSink::new(&args.out))
    };
    let outcome = player.export(sink.as_mut(), args.loops, &cancel)?;

    eprintln!(
        "wrote {} ({} frames)",
        args.out.display(),
        outcome.frames_written
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let player = open_player(&args.recording, args.sprites.as_deref(), args.width)?;
    let frame = player.render(appletrace::FrameIndex(args.index))?;
    appletrace::encode::sink::write_png(&args.out, &frame)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use scroll_capture::capture::{ImageSequenceSource, ReplayDispatcher, SETTLE_DELAY};
use scroll_capture::config::{CaptureConfig, SelectionTimeout};
use scroll_capture::core::{Point, Region, ScreenSize};
use scroll_capture::output::PngFileSink;
use scroll_capture::selection::PointerEvent;
use scroll_capture::{Page, ScrollCapture};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Stitch scrolling screenshots into one tall image.
#[derive(Parser, Debug)]
#[command(name = "scrollcap")]
#[command(about = "Stitch scrolling screenshots into one tall image")]
#[command(long_about = "Stitch scrolling screenshots into one tall image.
`stitch` merges already-cropped pages. `replay` runs the full capture loop
against a sequence of full-screen screenshots, one per scroll step.")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge cropped pages, top to bottom, into one image
    Stitch {
        /// Page images in capture order
        #[arg(required = true)]
        pages: Vec<PathBuf>,

        #[arg(short, long, default_value = "stitched.png", help = "Output image path")]
        output: PathBuf,
    },

    /// Replay full-screen screenshots through the capture orchestrator
    #[command(group(ArgGroup::new("selection").required(true).args(["region", "drag"])))]
    Replay {
        /// Screenshots in scroll order; the last one repeats if more are needed
        #[arg(required = true)]
        frames: Vec<PathBuf>,

        #[arg(long, value_parser = parse_region,
              help = "Finalized capture region as left,top,right,bottom")]
        region: Option<Region>,

        #[arg(long, value_parser = parse_drag,
              help = "Simulate a drag from x1,y1 to x2,y2 and wait for the selection timeout")]
        drag: Option<(Point, Point)>,

        /// Scroll between pages (only used with --region)
        #[arg(long)]
        long: bool,

        #[arg(long, value_parser = parse_screen,
              help = "Screen size as WIDTHxHEIGHT (default: size of the first frame)")]
        screen: Option<ScreenSize>,

        #[arg(short, long, default_value = "5s",
              help = "Selection timeout: 5s, 10s, 15s or 20s (milliseconds also accepted)")]
        timeout: SelectionTimeout,

        #[arg(long, default_value_t = SETTLE_DELAY.as_millis() as u64,
              help = "Wait after each scroll step in milliseconds")]
        settle_ms: u64,

        #[arg(short, long, default_value = "long_capture.png", help = "Output image path")]
        output: PathBuf,

        /// Print the diagnostics report as JSON when done
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match args.command {
        Command::Stitch { pages, output } => stitch_pages(pages, output).await,
        Command::Replay {
            frames,
            region,
            drag,
            long,
            screen,
            timeout,
            settle_ms,
            output,
            json,
        } => {
            let screen = match screen {
                Some(screen) => screen,
                None => first_frame_size(&frames)?,
            };
            let config = CaptureConfig::new(screen, timeout);
            let mut capture = ScrollCapture::builder()
                .with_config(config)
                .with_frame_source(ImageSequenceSource::from_paths(frames))
                .with_gesture_dispatcher(ReplayDispatcher)
                .with_sink(PngFileSink::new(&output))
                .with_settle_delay(Duration::from_millis(settle_ms))
                .build()?;

            let summary = match (region, drag) {
                (Some(region), _) => Some(capture.capture(region, long).await?),
                (None, Some((from, to))) => {
                    println!("Selection finalizes in {}", timeout);
                    capture.run(replay_drag(from, to).await?).await?
                }
                (None, None) => None,
            };

            match summary {
                Some(summary) => println!(
                    "Wrote {} ({}x{}, {} pages, overlaps {:?})",
                    output.display(),
                    summary.width,
                    summary.height,
                    summary.page_count,
                    summary.report.overlaps
                ),
                None => println!("Selection abandoned or empty, nothing captured"),
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&capture.diagnostics().to_json())?);
            }
            Ok(())
        }
    }
}

async fn stitch_pages(paths: Vec<PathBuf>, output: PathBuf) -> Result<()> {
    let pages = tokio::task::spawn_blocking(move || {
        paths
            .iter()
            .enumerate()
            .map(|(index, path)| {
                image::open(path)
                    .with_context(|| format!("failed to read page {}", path.display()))
                    .map(|img| Page::new(index, img.to_rgba8()))
            })
            .collect::<Result<Vec<_>>>()
    })
    .await??;

    let result = scroll_capture::stitch(pages).context("no pages to stitch")?;
    for (pair, overlap) in result.report.overlaps.iter().enumerate() {
        println!("pages {}-{}: overlap {} rows", pair, pair + 1, overlap);
    }
    if result.report.dropped_pages > 0 {
        println!("{} page(s) dropped: composite allocation failed", result.report.dropped_pages);
    }
    if result.report.truncated {
        println!("composite truncated at the height cap");
    }

    let (width, height) = (result.width(), result.height());
    result
        .page
        .into_image()
        .save(&output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("Wrote {} ({}x{})", output.display(), width, height);
    Ok(())
}

/// Feed a press-drag-release gesture into a closed channel.
async fn replay_drag(from: Point, to: Point) -> Result<mpsc::Receiver<PointerEvent>> {
    let (tx, rx) = mpsc::channel(4);
    for event in [
        PointerEvent::Down(from),
        PointerEvent::Move(to),
        PointerEvent::Up(to),
    ] {
        tx.send(event).await.context("selection channel closed")?;
    }
    Ok(rx)
}

fn first_frame_size(frames: &[PathBuf]) -> Result<ScreenSize> {
    let first = frames.first().context("no frames given")?;
    let (width, height) = image::image_dimensions(first)
        .with_context(|| format!("failed to read {}", first.display()))?;
    Ok(ScreenSize::new(width, height))
}

fn parse_numbers<const N: usize>(s: &str) -> Result<[f32; N], String> {
    let values = s
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{}': {}", s, e))?;
    values
        .try_into()
        .map_err(|_| format!("expected {} comma-separated numbers, got '{}'", N, s))
}

/// Parse "left,top,right,bottom"; corners may be given in any order.
fn parse_region(s: &str) -> Result<Region, String> {
    let [left, top, right, bottom] = parse_numbers::<4>(s)?;
    Ok(Region::from_corners(Point::new(left, top), Point::new(right, bottom)))
}

fn parse_drag(s: &str) -> Result<(Point, Point), String> {
    let [x1, y1, x2, y2] = parse_numbers::<4>(s)?;
    Ok((Point::new(x1, y1), Point::new(x2, y2)))
}

fn parse_screen(s: &str) -> Result<ScreenSize, String> {
    let (width, height) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let width = width.trim().parse().map_err(|e| format!("invalid width: {}", e))?;
    let height = height.trim().parse().map_err(|e| format!("invalid height: {}", e))?;
    Ok(ScreenSize::new(width, height))
}

#[macro_use]
extern crate failure;

mod config;
mod countdown;
mod font;
mod overlay;
mod render;
mod window;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use countdown::Countdown;
use overlay::X11Overlay;
use render::Renderer;
use window::{Display, Size, Window};

const OVERLAY_SIZE: Size = Size { wd: 200, ht: 200 };

/// How long we sleep between frames, which is also the worst-case
/// latency for input
const TICK: Duration = Duration::from_millis(100);

fn main() {
    // fixed filter: the environment never decides whether a fatal
    // message gets printed
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("hourglass=info"))
        .with_writer(std::io::stderr)
        .init();

    let result = config::Args::try_parse()
        .map_err(failure::Error::from)
        .and_then(|args| run(&args));
    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &config::Args) -> Result<(), failure::Error> {
    let conf = config::Config::from_args(args);
    debug!("{:?}", conf);

    // the loop never ends on its own, so give SIGINT and SIGTERM a way
    // to let everything below get dropped in order
    let shutdown = Arc::new(AtomicBool::new(false));
    for &sig in &[signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        signal_hook::flag::register(sig, Arc::clone(&shutdown))?;
    }

    let display = Display::create()?;
    let window = Window::create_overlay(&display, OVERLAY_SIZE)?;
    let color = window.alloc_color(&conf.appearance.color)?;
    let surface = window.cairo_surface();
    let renderer = Renderer::new(&surface, window.size(), &conf.appearance.font, color.rgb())?;
    window.map();

    let countdown = Countdown::new(conf.initial_seconds);
    match countdown.deadline() {
        Some(at) => info!(
            "counting down {}s, done at {}",
            countdown.initial_seconds(),
            at.format("%a %b %d %H:%M:%S")
        ),
        None => info!("counting down {}s", countdown.initial_seconds()),
    }

    let mut overlay = X11Overlay {
        window: &window,
        renderer: &renderer,
    };
    overlay::run(&mut overlay, countdown, &shutdown, TICK);
    info!("shutting down");
    Ok(())
}

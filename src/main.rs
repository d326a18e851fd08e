//! Flank Helper - Entry Point
//!
//! Loads a map snapshot, enables indicators for the chosen tokens and prints
//! their overlays as JSON. With `--watch` the scene file is polled on the
//! auto-refresh interval; once token positions settle, a debounced
//! recomputation reprints the overlays if they changed.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use clap::Parser;
use serde::Serialize;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use flank_helper::core::config::{load_config, FlankConfig};
use flank_helper::core::error::Result;
use flank_helper::core::types::TokenId;
use flank_helper::flanking::{IndicatorRegistry, PixelMapper, PixelPrimitive, Primitive};
use flank_helper::grid::Square;
use flank_helper::refresh::{recompute_when_settled, AutoRefresh, Debouncer};
use flank_helper::scene::{load_scene, Alliance, Scene, Viewer};

/// Flank Helper - show where allies can stand to flank enemies
#[derive(Parser, Debug)]
#[command(name = "flank-helper")]
#[command(about = "Compute flanking indicators for a grid combat map")]
struct Args {
    /// Scene snapshot (JSON)
    #[arg(long)]
    scene: PathBuf,

    /// Settings file (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Token name or id to show indicators for (repeatable; default: all party tokens)
    #[arg(long = "token")]
    tokens: Vec<String>,

    /// View as game master (hidden tokens are included)
    #[arg(long)]
    privileged: bool,

    /// Emit pixel coordinates instead of grid units
    #[arg(long)]
    pixels: bool,

    /// Keep polling the scene file and reprint when the overlays change
    #[arg(long)]
    watch: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Rendered {
    Grid(Vec<Primitive>),
    Pixels(Vec<PixelPrimitive>),
}

#[derive(Serialize)]
struct TokenOverlay {
    token: String,
    id: TokenId,
    primitives: Rendered,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => FlankConfig::default(),
    };

    let filter = if args.verbose || config.debug {
        "flank_helper=debug"
    } else {
        "flank_helper=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    let viewer = Viewer {
        privileged: args.privileged,
    };

    let scene = load_scene(&args.scene)?;
    tracing::info!(tokens = scene.tokens.len(), walls = scene.walls.len(), "Scene loaded");

    let mut registry = IndicatorRegistry::new();
    enable_tokens(&mut registry, &scene, &args.tokens, viewer);
    registry.recompute_all(&scene, &config, viewer);

    let report = render(&registry, &scene, args.pixels)?;
    println!("{}", report);

    if args.watch {
        watch(args, config, viewer, registry, scene, report)?;
    }

    Ok(())
}

/// Enable the requested tokens, or every visible party token when none are named
fn enable_tokens(registry: &mut IndicatorRegistry, scene: &Scene, keys: &[String], viewer: Viewer) {
    if keys.is_empty() {
        for token in &scene.tokens {
            if token.alliance == Some(Alliance::Party) && viewer.can_see(token) {
                registry.toggle(token.id, true);
            }
        }
        return;
    }

    for key in keys {
        match scene.find(key) {
            Some(token) => registry.toggle(token.id, true),
            None => tracing::warn!(token = %key, "Token not found in scene"),
        }
    }
}

fn render(registry: &IndicatorRegistry, scene: &Scene, pixels: bool) -> Result<String> {
    let mapper = PixelMapper::new(scene.grid_size);
    let overlays: Vec<TokenOverlay> = registry
        .overlays()
        .into_iter()
        .filter_map(|(id, overlay)| {
            let token = scene.get(id)?;
            let primitives = if pixels {
                Rendered::Pixels(overlay.to_pixels(&mapper))
            } else {
                Rendered::Grid(overlay.primitives.clone())
            };
            Some(TokenOverlay {
                token: token.name.clone(),
                id,
                primitives,
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&overlays)?)
}

struct WatchState {
    registry: IndicatorRegistry,
    scene: Scene,
    last_report: String,
}

fn watch(
    args: Args,
    config: FlankConfig,
    viewer: Viewer,
    registry: IndicatorRegistry,
    scene: Scene,
    report: String,
) -> Result<()> {
    let rt = Runtime::new()?;
    let state = Arc::new(Mutex::new(WatchState {
        registry,
        scene,
        last_report: report,
    }));
    let scene_path = args.scene.clone();
    let pixels = args.pixels;

    rt.block_on(async move {
        let mut refresh = AutoRefresh::new();
        let interval = config.auto_refresh_interval();
        if interval.is_none() {
            tracing::warn!("--watch needs auto_refresh_secs > 0; nothing to do");
            return;
        }

        let debouncer = Arc::new(tokio::sync::Mutex::new(Debouncer::new()));
        refresh.restart(interval, move || {
            let state = state.clone();
            let debouncer = debouncer.clone();
            let path = scene_path.clone();
            let config = config.clone();
            async move {
                let job = {
                    let path = path.clone();
                    let config = config.clone();
                    move || async move {
                        if let Err(e) = refresh_once(&state, &path, &config, viewer, pixels) {
                            tracing::warn!(error = %e, "Refresh failed");
                        }
                    }
                };

                // Let in-flight moves finish before the scene is read for real
                let mut debouncer = debouncer.lock().await;
                let samples =
                    recompute_when_settled(&config, &mut debouncer, || token_positions(&path), job)
                        .await;
                tracing::debug!(samples, "Scene settled");
            }
        });

        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        }
        refresh.stop();
        tracing::info!("Stopped watching");
    });

    Ok(())
}

/// Token positions in the scene file, or `None` while it cannot be read
fn token_positions(path: &Path) -> Option<Vec<(TokenId, Vec<Square>)>> {
    match load_scene(path) {
        Ok(scene) => Some(scene.positions()),
        Err(e) => {
            tracing::debug!(error = %e, "Scene unreadable while settling");
            None
        }
    }
}

fn refresh_once(
    state: &Mutex<WatchState>,
    path: &Path,
    config: &FlankConfig,
    viewer: Viewer,
    pixels: bool,
) -> Result<()> {
    let scene = load_scene(path)?;
    let mut state = match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    state.scene = scene;
    let WatchState {
        registry, scene, ..
    } = &mut *state;
    registry.recompute_all(scene, config, viewer);

    let report = render(&state.registry, &state.scene, pixels)?;
    if report != state.last_report {
        println!("{}", report);
        state.last_report = report;
    } else {
        tracing::debug!("Overlays unchanged");
    }
    Ok(())
}

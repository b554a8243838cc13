use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use formats::{LoadOptions, load_network_from_path};
use layers::{BasemapLayer, NetworkLayer, PickingController};
use scene::World;
use scene::camera::Viewport;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod script;
mod session;

use config::ViewerConfig;
use script::parse_script;
use session::ViewerSession;

const DEFAULT_CONFIG: &str = "gridview.toml";

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect an electrical network on a 3D map")]
struct Args {
    /// Config file (default: ./gridview.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Network document (.xml or .json), overrides the config
    #[arg(long)]
    document: Option<PathBuf>,

    /// Pointer event script to replay against the scene
    #[arg(long)]
    script: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 720.0)]
    height: f64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(document) = args.document {
        config.document = document;
    }

    let mut session = build_session(&config, Viewport::new(args.width, args.height))?;

    let graph = session.graph();
    println!(
        "{} nodes, {} lines, {} primitives",
        graph.nodes().len(),
        graph.lines().len(),
        session.scene().world.len()
    );

    if let Some(path) = args.script {
        let source = fs::read_to_string(&path).map_err(|e| format!("read {path:?}: {e}"))?;
        let events = parse_script(&source).map_err(|e| e.to_string())?;
        for event in events {
            if session.apply(event).is_some() {
                println!("\n{}", session.tooltip().unwrap_or("(nothing picked)"));
            }
        }

        let camera = session.camera();
        info!(
            x = camera.position.x,
            y = camera.position.y,
            z = camera.position.z,
            azimuth = camera.azimuth_deg,
            elevation = camera.elevation_deg,
            highlighted = session.picking().selection().pair().is_some(),
            "script finished"
        );
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ViewerConfig, String> {
    match path {
        Some(path) => ViewerConfig::load(path).map_err(|e| e.to_string()),
        None if Path::new(DEFAULT_CONFIG).exists() => {
            ViewerConfig::load(DEFAULT_CONFIG).map_err(|e| e.to_string())
        }
        None => {
            info!("no {DEFAULT_CONFIG}, using built-in defaults");
            Ok(ViewerConfig::default())
        }
    }
}

fn build_session(config: &ViewerConfig, viewport: Viewport) -> Result<ViewerSession, String> {
    let bounds = config.geo_bounds();
    let options = LoadOptions {
        zone: config.zone(),
    };
    let (graph, report) =
        load_network_from_path(&config.document, options, |node| bounds.contains(node.position))
            .map_err(|e| format!("load {:?}: {e}", config.document))?;
    info!(
        nodes_filtered = report.nodes_filtered,
        lines_dropped = report.lines_dropped,
        "document loaded"
    );

    let mut world = World::new();
    BasemapLayer::new(
        config.basemap.source.clone(),
        config.basemap.width,
        config.basemap.height,
    )
    .spawn(&mut world);

    let style = config.network_style();
    let highlight = style.highlight.clone();
    let scene = NetworkLayer::with_style(style)
        .build_over(world, &graph, bounds, config.map_size())
        .map_err(|e| e.to_string())?;

    Ok(ViewerSession::new(
        graph,
        scene,
        PickingController::new(highlight),
        config.map_camera(),
        viewport,
    ))
}

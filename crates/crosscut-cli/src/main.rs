use anyhow::{Context, Result, bail};
use cgmath::{Deg, InnerSpace, Point3, Quaternion, Rotation3, Vector3};
use clap::{Args, Parser, Subcommand};
use crosscut_clip::{BoxVolume, ClipVolume};
use crosscut_geometry::{ClipSet, MeshData, Transform};
use crosscut_pick::pick_scene;
use crosscut_scene::{Camera, CanvasSize, NullMarker, PointerEvent, Scene, SceneMesh};
use crosscut_snap::SnapController;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "crosscut")]
#[command(about = "Crosscut scene clipping and snapping CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Derive the six clip planes of a transformed box volume.
    Planes(PlanesArgs),
    /// Pick the demo scene at a pointer position.
    Pick(PickArgs),
    /// Snap to the nearest demo scene vertex around a pointer position.
    Snap(SnapArgs),
}

#[derive(Args)]
struct PlanesArgs {
    /// Box dimensions as width,height,depth.
    #[arg(long, default_value = "2,2,2")]
    size: String,
    /// World position as x,y,z.
    #[arg(long)]
    position: Option<String>,
    /// Per-axis scale as x,y,z.
    #[arg(long)]
    scale: Option<String>,
    /// Rotation as axis-x,axis-y,axis-z,degrees.
    #[arg(long)]
    rotate: Option<String>,
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct PickArgs {
    /// Pointer position in canvas pixels as x,y.
    #[arg(long)]
    pointer: String,
    /// Canvas dimensions as width,height.
    #[arg(long, default_value = "800,600")]
    canvas: String,
    /// Optional clip box: dimensions as width,height,depth.
    #[arg(long)]
    clip_size: Option<String>,
    /// Clip box position as x,y,z.
    #[arg(long)]
    clip_position: Option<String>,
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct SnapArgs {
    /// Pointer position in canvas pixels as x,y.
    #[arg(long)]
    pointer: String,
    /// Canvas dimensions as width,height.
    #[arg(long, default_value = "800,600")]
    canvas: String,
    /// Snap tolerance in pixels.
    #[arg(long, default_value_t = crosscut_snap::DEFAULT_SNAP_TOLERANCE_PX)]
    tolerance: f64,
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Serialize)]
struct SnapReport {
    point: Option<Point3<f64>>,
    tolerance_px: f64,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Planes(args) => planes(args),
        Command::Pick(args) => pick(args),
        Command::Snap(args) => snap(args),
    }
}

fn planes(args: PlanesArgs) -> Result<()> {
    let (width, height, depth) = parse_triple(&args.size, "--size")?;
    let mut volume = BoxVolume::with_size(width, height, depth);
    volume.transform = parse_transform(&args)?;

    let set = volume.derive_planes().context("clip plane derivation failed")?;
    info!(planes = set.len(), "derived clip planes");
    write_json(&set, args.out.as_deref())
}

fn pick(args: PickArgs) -> Result<()> {
    let (x, y) = parse_pair(&args.pointer, "--pointer")?;
    let scene = demo_scene(parse_canvas(&args.canvas)?);

    let clip = match args.clip_size {
        Some(size) => {
            let (width, height, depth) = parse_triple(&size, "--clip-size")?;
            let mut volume = BoxVolume::with_size(width, height, depth);
            if let Some(position) = args.clip_position {
                let (px, py, pz) = parse_triple(&position, "--clip-position")?;
                volume.transform.position = Vector3::new(px, py, pz);
            }
            volume.derive_planes().context("clip plane derivation failed")?
        }
        None => ClipSet::empty(),
    };

    let result = pick_scene(&scene, (x, y), &clip, None);
    match result.hit {
        Some(hit) => info!(distance = hit.distance, face = hit.face_index, "hit"),
        None => info!("miss"),
    }
    write_json(&result, args.out.as_deref())
}

fn snap(args: SnapArgs) -> Result<()> {
    let (x, y) = parse_pair(&args.pointer, "--pointer")?;
    if args.tolerance <= 0.0 {
        bail!("--tolerance must be positive");
    }
    let mut scene = demo_scene(parse_canvas(&args.canvas)?);

    let mut snapper = SnapController::with_tolerance(Box::new(NullMarker), args.tolerance);
    snapper.start(&mut scene);
    snapper.on_pointer(&scene, &PointerEvent::moved(x, y), &ClipSet::empty());

    let report = SnapReport {
        point: snapper.snap_point(),
        tolerance_px: args.tolerance,
    };
    match report.point {
        Some(_) => info!("snapped"),
        None => info!("no vertex within tolerance"),
    }
    write_json(&report, args.out.as_deref())
}

/// A unit demo scene: one 2x2x2 box at the origin, camera fitted to it.
fn demo_scene(canvas: CanvasSize) -> Scene {
    let mut scene = Scene::new(Camera::new(canvas.width / canvas.height), canvas);
    scene.add_mesh(SceneMesh::new("demo-box", MeshData::box_mesh(2.0, 2.0, 2.0)));
    if let Some(extent) = scene.world_extent(None) {
        scene.camera.fit_extent(&extent);
    }
    scene
}

fn parse_transform(args: &PlanesArgs) -> Result<Transform> {
    let mut transform = Transform::default();
    if let Some(position) = &args.position {
        let (x, y, z) = parse_triple(position, "--position")?;
        transform.position = Vector3::new(x, y, z);
    }
    if let Some(scale) = &args.scale {
        let (x, y, z) = parse_triple(scale, "--scale")?;
        transform.scale = Vector3::new(x, y, z);
    }
    if let Some(rotate) = &args.rotate {
        let parts: Vec<&str> = rotate.split(',').collect();
        if parts.len() != 4 {
            bail!("--rotate expects axis-x,axis-y,axis-z,degrees, e.g. 0,0,1,45");
        }
        let ax: f64 = parts[0].trim().parse().context("invalid rotation axis x")?;
        let ay: f64 = parts[1].trim().parse().context("invalid rotation axis y")?;
        let az: f64 = parts[2].trim().parse().context("invalid rotation axis z")?;
        let degrees: f64 = parts[3].trim().parse().context("invalid rotation angle")?;
        let axis = Vector3::new(ax, ay, az);
        if axis.magnitude() < 1.0e-12 {
            bail!("--rotate axis must be non-zero");
        }
        transform.rotation = Quaternion::from_axis_angle(axis.normalize(), Deg(degrees));
    }
    Ok(transform)
}

fn parse_canvas(text: &str) -> Result<CanvasSize> {
    let (width, height) = parse_pair(text, "--canvas")?;
    if width <= 0.0 || height <= 0.0 {
        bail!("--canvas dimensions must be positive");
    }
    Ok(CanvasSize::new(width, height))
}

fn parse_pair(text: &str, flag: &str) -> Result<(f64, f64)> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != 2 {
        bail!("{flag} expects two comma-separated numbers, e.g. 400,300");
    }
    let x: f64 = parts[0].trim().parse().with_context(|| format!("invalid {flag} x"))?;
    let y: f64 = parts[1].trim().parse().with_context(|| format!("invalid {flag} y"))?;
    Ok((x, y))
}

fn parse_triple(text: &str, flag: &str) -> Result<(f64, f64, f64)> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != 3 {
        bail!("{flag} expects three comma-separated numbers, e.g. 1,2,3");
    }
    let x: f64 = parts[0].trim().parse().with_context(|| format!("invalid {flag} x"))?;
    let y: f64 = parts[1].trim().parse().with_context(|| format!("invalid {flag} y"))?;
    let z: f64 = parts[2].trim().parse().with_context(|| format!("invalid {flag} z"))?;
    Ok((x, y, z))
}

fn write_json<T: Serialize>(value: &T, out: Option<&std::path::Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    match out {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

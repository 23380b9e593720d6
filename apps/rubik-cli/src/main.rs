use clap::{Parser, Subcommand};
use glam::Vec3;
use rubik_common::{CellKind, CubePosition, Face, FaceColor};
use rubik_input::{Key, KeyBindings};
use rubik_kernel::OrbitCamera;
use rubik_kernel::camera::{ANGLE_STEP, DISTANCE_SCALE};
use rubik_render::{CUBE_SPACING, RecordingBackend, RenderContext, Scene, ShaderSources};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rubik-cli", about = "Headless tool for the cube scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and scene constants
    Info,
    /// List every cubie with its face colors
    Scene {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Apply key presses to a fresh camera and print its state
    Camera {
        /// Keys to press in order: left, right, up, down, u, d
        keys: Vec<Key>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Render one frame into the recording backend and print the draw log
    Frame {
        /// Keys to press before rendering
        keys: Vec<Key>,
        /// Viewport width over height
        #[arg(long, default_value = "1.3333334")]
        aspect: f32,
    },
}

/// Placeholder shader text; the recording backend only checks it is non-empty.
const RECORDING_SHADERS: ShaderSources<'static> = ShaderSources {
    vertex: "recording vertex stage",
    fragment: "recording fragment stage",
};

#[derive(Serialize)]
struct CubieReport {
    position: CubePosition,
    kind: CellKind,
    faces: Vec<FaceReport>,
}

#[derive(Serialize)]
struct FaceReport {
    face: Face,
    color: FaceColor,
}

#[derive(Serialize)]
struct CameraReport {
    camera: OrbitCamera,
    position: Vec3,
    up: Vec3,
    target: Vec3,
    view: [[f32; 4]; 4],
}

fn press_keys(keys: &[Key]) -> OrbitCamera {
    let bindings = KeyBindings::default();
    let mut camera = OrbitCamera::default();
    for key in keys {
        if let Some(action) = bindings.on_key(*key, true) {
            action.apply(&mut camera);
        }
    }
    camera
}

fn scene_report() -> anyhow::Result<Vec<CubieReport>> {
    let mut backend = RecordingBackend::new();
    let mut scene = Scene::build(&mut backend)?;
    let report = scene
        .cubes()
        .iter()
        .map(|cube| CubieReport {
            position: cube.position,
            kind: cube.position.kind(),
            faces: Face::ALL
                .iter()
                .map(|face| FaceReport {
                    face: *face,
                    color: cube.colors[face.index()],
                })
                .collect(),
        })
        .collect();
    scene.release(&mut backend);
    Ok(report)
}

fn color_name(color: FaceColor) -> &'static str {
    match color {
        c if c == FaceColor::WHITE => "white",
        c if c == FaceColor::RED => "red",
        c if c == FaceColor::BLUE => "blue",
        c if c == FaceColor::YELLOW => "yellow",
        c if c == FaceColor::ORANGE => "orange",
        c if c == FaceColor::GREEN => "green",
        c if c == FaceColor::INTERIOR_GREY => "grey",
        _ => "custom",
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("rubik-cli v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Info => {
            println!("rubik-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("cubies: {}", CubePosition::all().count());
            println!("spacing: {CUBE_SPACING}");
            println!("angle step: {:.1} deg", ANGLE_STEP.to_degrees());
            println!("distance scale: {DISTANCE_SCALE}");
        }
        Commands::Scene { json } => {
            let report = scene_report()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for cubie in &report {
                    let faces: Vec<String> = cubie
                        .faces
                        .iter()
                        .map(|f| format!("{}={}", f.face.name(), color_name(f.color)))
                        .collect();
                    println!("{} {:?}: {}", cubie.position, cubie.kind, faces.join(" "));
                }
            }
        }
        Commands::Camera { keys, json } => {
            let camera = press_keys(&keys);
            let report = CameraReport {
                camera,
                position: camera.position(),
                up: camera.up_vector(),
                target: camera.target(),
                view: camera.view_matrix().to_cols_array_2d(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "distance={:.4} azimuth={:.2}deg elevation={:.2}deg",
                    camera.distance(),
                    camera.azimuth().to_degrees(),
                    camera.elevation().to_degrees()
                );
                let p = report.position;
                let u = report.up;
                println!("position=({:.4}, {:.4}, {:.4})", p.x, p.y, p.z);
                println!("up=({:.4}, {:.4}, {:.4})", u.x, u.y, u.z);
                for row in 0..4 {
                    let r = camera.view_matrix().row(row);
                    println!("  [{:8.4} {:8.4} {:8.4} {:8.4}]", r.x, r.y, r.z, r.w);
                }
            }
        }
        Commands::Frame { keys, aspect } => {
            let camera = press_keys(&keys);
            tracing::info!(keys = keys.len(), aspect, "rendering one recorded frame");
            let mut ctx =
                RenderContext::new(RecordingBackend::new(), RECORDING_SHADERS, FaceColor::WHITE)?;
            ctx.render_frame(&camera, aspect)?;
            print!("{}", ctx.backend().describe_last_frame());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_keys_leaves_default_camera() {
        let cam = press_keys(&[]);
        assert_eq!(cam, OrbitCamera::default());
        let p = cam.position();
        assert!((p - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn scene_report_lists_all_cubies() {
        let report = scene_report().unwrap();
        assert_eq!(report.len(), 27);
        assert!(report.iter().all(|c| c.faces.len() == 6));
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"Corner\""));
    }

    #[test]
    fn color_names() {
        assert_eq!(color_name(FaceColor::ORANGE), "orange");
        assert_eq!(color_name(FaceColor::INTERIOR_GREY), "grey");
        assert_eq!(color_name(FaceColor([0.5, 0.5, 0.5, 1.0])), "custom");
    }

    #[test]
    fn cli_parses_key_lists() {
        let cli = Cli::try_parse_from(["rubik-cli", "camera", "right", "u", "--json"]).unwrap();
        match cli.command {
            Commands::Camera { keys, json } => {
                assert_eq!(keys, vec![Key::Right, Key::U]);
                assert!(json);
            }
            _ => panic!("expected camera command"),
        }
        assert!(Cli::try_parse_from(["rubik-cli", "camera", "space"]).is_err());
    }
}

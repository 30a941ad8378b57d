//! Ball Grid Sim entry point
//!
//! Headless runner: builds a scene, drives the simulation with jittered
//! frame times, and prints the last frame as ASCII art.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use ball_grid_sim::sim::{BodyDesc, Simulation};
use ball_grid_sim::{Renderer, SimConfig, SimError, Viewport, scenes};

/// Nominal frame time
const FRAME_DT: f32 = 1.0 / 60.0;

/// Character-cell canvas; one cell is one "pixel" of the viewport
struct AsciiRenderer {
    viewport: Viewport,
    cells: Vec<char>,
}

impl AsciiRenderer {
    fn new(viewport: Viewport) -> Self {
        let len = (viewport.width_px * viewport.height_px) as usize;
        Self {
            viewport,
            cells: vec![' '; len],
        }
    }

    fn clear(&mut self) {
        self.cells.fill(' ');
    }

    fn plot(&mut self, screen: Vec2, c: char) {
        let (x, y) = (screen.x.floor(), screen.y.floor());
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x < self.viewport.width_px && y < self.viewport.height_px {
            self.cells[(y * self.viewport.width_px + x) as usize] = c;
        }
    }

    fn frame(&self) -> String {
        self.cells
            .chunks(self.viewport.width_px as usize)
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Renderer for AsciiRenderer {
    fn draw_circle(&mut self, center: Vec2, _radius: f32) {
        let p = self.viewport.to_screen(center);
        self.plot(p, 'o');
    }

    fn draw_square(&mut self, corner: Vec2, side: f32) {
        let top_left = self.viewport.to_screen(corner + Vec2::new(0.0, side));
        let size = self.viewport.length_to_screen(side).max(1.0) as u32;
        for dy in 0..size {
            for dx in 0..size {
                self.plot(top_left + Vec2::new(dx as f32, dy as f32), '#');
            }
        }
    }

    fn draw_segment(&mut self, a: Vec2, b: Vec2) {
        let (sa, sb) = (self.viewport.to_screen(a), self.viewport.to_screen(b));
        let steps = (sb - sa).abs().max_element().ceil().max(1.0) as u32;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.plot(sa.lerp(sb, t), '-');
        }
    }
}

/// Headless ball/block collision simulator
#[derive(Debug, Parser)]
#[command(name = "ball-grid-sim", version, about)]
struct Args {
    /// JSON simulation config; defaults are used when omitted
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// JSON list of body descriptors; a seeded demo box when omitted
    #[arg(long, value_name = "FILE")]
    scene: Option<PathBuf>,
    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u32,
    /// Seed for the demo scene and the frame-time jitter
    #[arg(long, default_value_t = 12345)]
    seed: u64,
}

fn load_scene(path: &Path) -> Result<Vec<BodyDesc>, SimError> {
    let json = std::fs::read_to_string(path)?;
    let descs = serde_json::from_str(&json)?;
    log::info!("Loaded scene from {}", path.display());
    Ok(descs)
}

fn run(args: Args) -> Result<(), SimError> {
    let config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    let descs = match &args.scene {
        Some(path) => load_scene(path)?,
        None => scenes::block_box(args.seed, 16, 12, 24),
    };

    let mut sim = Simulation::new(config, &descs)?;
    let mut renderer = AsciiRenderer::new(Viewport::new(
        sim.config().grid_width.min(80),
        sim.config().grid_height.min(40),
        1.0,
    ));
    let mut rng = Pcg32::seed_from_u64(args.seed);

    log::info!("Running {} ticks (seed {})", args.ticks, args.seed);
    let mut resolved = 0;
    for _ in 0..args.ticks {
        renderer.clear();
        // Wall-clock frame times are never exact
        let dt = FRAME_DT * rng.random_range(0.8..1.25);
        let stats = sim.update(dt, &mut renderer)?;
        resolved += stats.resolved;
    }

    log::info!(
        "Done: {} ticks, {} contacts resolved, {} balls left, kinetic energy {:.4}",
        sim.ticks(),
        resolved,
        sim.scene().ball_count(),
        sim.scene().kinetic_energy()
    );
    println!("{}", renderer.frame());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Ball Grid Sim starting...");

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Simulation stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["ball-grid-sim"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.scene.is_none());
        assert_eq!(args.ticks, 600);
        assert_eq!(args.seed, 12345);
    }

    #[test]
    fn test_args_overrides_and_rejects_bad_numbers() {
        let args = Args::try_parse_from([
            "ball-grid-sim",
            "--scene",
            "drop.json",
            "--ticks",
            "30",
            "--seed",
            "9",
        ])
        .unwrap();
        assert_eq!(args.scene, Some(PathBuf::from("drop.json")));
        assert_eq!((args.ticks, args.seed), (30, 9));

        assert!(Args::try_parse_from(["ball-grid-sim", "--ticks", "-1"]).is_err());
        assert!(Args::try_parse_from(["ball-grid-sim", "--frames", "3"]).is_err());
    }
}

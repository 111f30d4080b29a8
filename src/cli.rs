use std::{num::NonZeroUsize, path::PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use glassray::{RenderSettings, demos::DemoKind, render};
use indicatif::ProgressBar;
use log::info;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SceneName {
    /// Matte spheres in a room
    Spheres,
    /// Hexagons built from nested groups
    Hexagons,
    /// Reflective and transparent spheres
    Glass,
    /// Cylinders and a cone
    Conics,
}

impl From<SceneName> for DemoKind {
    fn from(name: SceneName) -> Self {
        match name {
            SceneName::Spheres => DemoKind::Spheres,
            SceneName::Hexagons => DemoKind::Hexagons,
            SceneName::Glass => DemoKind::Glass,
            SceneName::Conics => DemoKind::Conics,
        }
    }
}

#[derive(Parser)]
#[command(name = "glassray")]
#[command(about = "Renders one of the built in scenes to a PNG file", long_about = None)]
struct Cli {
    #[arg(short, long, value_enum, default_value = "glass")]
    scene: SceneName,

    #[arg(long, default_value_t = 640)]
    width: u32,

    #[arg(long, default_value_t = 400)]
    height: u32,

    /// Maximum number of reflection / refraction bounces
    #[arg(short, long, default_value_t = 5)]
    depth: u32,

    /// Worker threads, defaults to the number of CPUs
    #[arg(short, long)]
    threads: Option<NonZeroUsize>,

    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    anyhow::ensure!(cli.width > 0 && cli.height > 0, "Image size must be positive");

    let demo = DemoKind::from(cli.scene)
        .build()
        .with_context(|| format!("Building scene {:?}", cli.scene))?;
    demo.world.log_statistics();

    let camera = demo.camera(cli.width, cli.height);
    let settings = RenderSettings {
        max_depth: cli.depth,
        threads: cli.threads,
    };

    let bar = ProgressBar::new(cli.height as u64);
    let image = render(&demo.world, &camera, &settings, |progress| {
        bar.update(|ps| {
            ps.set_len(progress.total as u64);
            ps.set_pos(progress.finished as u64)
        })
    })?;
    bar.finish();

    image
        .save(&cli.output)
        .with_context(|| format!("Saving {}", cli.output.display()))?;
    info!("Saved {}", cli.output.display());

    Ok(())
}

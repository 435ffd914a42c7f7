//! Command-line configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Which sketch to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoKind {
    /// A subdivided cube wired to every panel widget
    DebugCube,
    /// Sphere, plane and torus sharing one tunable material
    Materials,
    /// Extruded text among scattered wireframe figures
    Text,
}

#[derive(Debug, Parser)]
#[command(name = "vitrine")]
#[command(about = "Interactive 3D scene sketches", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Sketch to run
    #[arg(value_enum, default_value = "text")]
    pub demo: DemoKind,

    /// Directory holding matcaps/ and fonts/
    #[arg(long, default_value = "static")]
    pub assets: PathBuf,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Exit after this many frames (at least 1)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub frames: Option<u64>,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Settings the application needs once the command line is parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub asset_root: PathBuf,
    pub width: u32,
    pub height: u32,
    pub frame_limit: Option<u64>,
}

impl From<&Cli> for AppSettings {
    fn from(cli: &Cli) -> Self {
        Self {
            asset_root: cli.assets.clone(),
            width: cli.width.max(1),
            height: cli.height.max(1),
            frame_limit: cli.frames,
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("static"),
            width: 1280,
            height: 800,
            frame_limit: None,
        }
    }
}

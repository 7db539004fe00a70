// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "shape-viewer")]
#[command(about = "Interactive 3D viewer for named shapes", long_about = None)]
pub struct Cli {
    /// JSON file holding the shape list
    #[arg(long, env = "SHAPES_FILE", default_value = "shapes.json")]
    pub shapes: PathBuf,

    /// Hide the overlay panel
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Seed one shape of each kind when the shape file does not exist
    #[arg(long)]
    pub demo: bool,
}

use clap::Parser;

use crate::cli::Cli;
use mesh_viewer::args::Args;
use mesh_viewer::run;

mod cli;

fn main() {
    let cli = Cli::parse();
    run(Args {
        geometry: cli.geometry,
        shader: cli.shader,
    });
}

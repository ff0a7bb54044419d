use clap::Parser;

/// A small viewer for line-oriented mesh description files
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the geometry description file ([points] / [indices] sections)
    pub geometry: Option<String>,

    /// Path to the WGSL shader used to draw the mesh
    #[arg(short, long)]
    pub shader: Option<String>,
}

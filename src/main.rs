use anyhow::Result;
use clap::Parser;
use tmclust::cluster::{self, ClusterArgs};

#[derive(Parser)]
#[command(name = "tmclust")]
#[command(version)]
#[command(
    about = "Structure clustering by sequence-independent structure alignment",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    args: ClusterArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cluster::run(cli.args)
}

mod cli;

use clap::Parser;
use cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    seasoncost::logging::init(cli.verbose);
    cli.run()
}

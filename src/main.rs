mod cli;

use clap::Parser;
use cli::Cli;

fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    cli::init_tracing(cli.verbose);
    cli.run()
}

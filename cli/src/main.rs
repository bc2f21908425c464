mod commands;
mod terminal;

use arper_common::config::Config;
use commands::CommandLine;
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    let cfg: Config = commands.to_config()?;

    arper_core::service::run(cfg).await
}

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = selsub::cli::Cli::parse();
    let config = selsub::infra::config::Config::load()?;
    selsub::init(&config);

    cli.execute(config)
}

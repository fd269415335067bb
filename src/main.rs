use clap::{Parser, crate_version};
use foxden::{
    cli::{self, Args, Command},
    prelude::*,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Stash(args) => cli::stash(&args).await?,
        Command::Peek(args) => cli::peek(&args).await?,
    }

    info!("done!");
    Ok(())
}

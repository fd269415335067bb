mod peek;
mod stash;

use clap::{Parser, Subcommand};

pub use self::{
    peek::{PeekArgs, peek},
    stash::{StashArgs, stash},
};
use crate::{api::powerfox, prelude::*};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: back up the meter's daily reports into a JSON Lines file.
    #[clap(name = "stash")]
    Stash(Box<StashArgs>),

    /// Development tools.
    #[clap(name = "peek")]
    Peek(Box<PeekArgs>),
}

#[derive(Parser)]
pub struct PowerfoxApiArgs {
    /// Powerfox account username (the one used in the app).
    #[clap(long, env = "POWERFOX_USERNAME")]
    pub username: String,

    /// Powerfox account password.
    #[clap(long, env = "POWERFOX_PASSWORD")]
    pub password: String,
}

impl PowerfoxApiArgs {
    pub fn new_client(&self) -> Result<powerfox::Api> {
        powerfox::Api::new(self.username.clone(), self.password.clone())
    }
}

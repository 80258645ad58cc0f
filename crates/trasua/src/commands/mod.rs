//! Command handlers, one module per subcommand group.

pub mod config_cmd;
pub mod divisions;
pub mod geocode;
pub mod parse;
pub mod pick;
pub mod resolve;
pub mod search;

use trasua_api::AddressClient;
use trasua_core::AddressPipeline;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a network-backed command to its handler.
pub async fn dispatch(
    cmd: Command,
    client: &AddressClient,
    pipeline: &AddressPipeline<AddressClient>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Provinces => divisions::provinces(client, global).await,
        Command::Districts { province } => divisions::districts(client, &province, global).await,
        Command::Wards { district } => divisions::wards(client, &district, global).await,
        Command::Search(args) => search::handle(args, pipeline, global).await,
        Command::Resolve(args) => resolve::handle(args, pipeline, global).await,
        Command::Geocode(args) => geocode::handle(args, pipeline, global).await,
        Command::Pick => pick::handle(pipeline, global).await,
        Command::Config(_) | Command::Completions(_) | Command::Parse { .. } => {
            Err(CliError::Internal(
                "offline command routed to network dispatch".into(),
            ))
        }
    }
}

use std::error::Error;
use configuration::DiscoverConfiguration;
use mdns_client::MdnsSocket;
use tracing_subscriber::EnvFilter;

use crate::cli_args::CliArgs;
use crate::render::{PacketSummary, ServiceLine};

mod cli_args;
mod render;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: CliArgs = argh::from_env();
    let mut config: DiscoverConfiguration = configuration::get_config(args.config.clone())?;
    if let Some(service) = args.service {
        config.browse.service = service;
    }
    tracing::info!("browsing {} via {}", config.browse.service, config.mdns.group_address());

    let mut socket = MdnsSocket::bind(&config.mdns)?;

    let quiet = args.quiet;
    let services = mdns_client::browse(&mut socket, &config.browse, |message| {
        if !quiet {
            print!("{}", PacketSummary(message));
        }
    })
    .await?;

    for service in &services {
        println!("{}", ServiceLine(service));
    }

    Ok(())
}

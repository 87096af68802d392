mod cli;
mod pcap;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use crate::pcap::{CaptureLoader, CaptureSource};
use dns_monitor::dns::DnsCollector;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.list_interfaces {
        println!("Available network interfaces:");
        for interface in CaptureLoader::list_interfaces()? {
            println!("  {interface}");
        }
        return Ok(());
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    let source = match (&args.pcap_file, &args.interface) {
        (Some(path), _) => CaptureSource::File(path.clone()),
        (None, Some(iface)) => CaptureSource::Interface(iface.clone()),
        (None, None) => CaptureSource::Interface(CaptureLoader::select_default_interface()?),
    };

    info!("Starting DNS monitor on {source:?}");

    let (capture_handle, result_rx, cancel_token) =
        CaptureLoader::load(&source, args.filter.as_deref(), args.display_options())?;

    let collector = DnsCollector::new(result_rx, std::io::stdout());
    let collector_handle = tokio::spawn(collector.run());

    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping capture");
            shutdown_token.cancel();
        }
    });

    // The collector finishes once the capture task drops its sender: at end of
    // file, or after Ctrl-C flips the stop flag.
    let catalog = collector_handle.await.context("Collector task failed")??;
    capture_handle.await.context("Capture task failed")?;

    if let Some(path) = &args.domains_file {
        catalog.write_domains(path)?;
        info!("Wrote {} domain names to {}", catalog.domains().len(), path.display());
    }
    if let Some(path) = &args.translations_file {
        catalog.write_translations(path)?;
        info!(
            "Wrote {} translations to {}",
            catalog.translations().len(),
            path.display()
        );
    }

    info!("DNS monitor stopped");
    Ok(())
}

use clap::Parser;
use dns_monitor::DisplayOptions;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dns-monitor")]
#[command(about = "Monitor DNS traffic on an interface or in a pcap file", long_about = None)]
pub struct Args {
    /// Interface to capture on; the first usable one when neither -i nor -p is given
    #[arg(short, long, conflicts_with = "pcap_file")]
    pub interface: Option<String>,

    /// Replay frames from a pcap file instead of capturing live
    #[arg(short = 'p', long = "pcap-file")]
    pub pcap_file: Option<PathBuf>,

    /// Print every message in full instead of one line each
    #[arg(short, long)]
    pub verbose: bool,

    /// Write the domain names seen to this file on exit
    #[arg(short = 'd', long = "domains-file")]
    pub domains_file: Option<PathBuf>,

    /// Write name to address translations seen to this file on exit
    #[arg(short = 't', long = "translations-file")]
    pub translations_file: Option<PathBuf>,

    /// BPF filter installed on the capture (default: udp port 53)
    #[arg(short, long)]
    pub filter: Option<String>,

    #[arg(short, long, default_value = "warn")]
    pub log_level: String,

    #[arg(long)]
    pub list_interfaces: bool,
}

impl Args {
    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            verbose: self.verbose,
            collect_domains: self.domains_file.is_some(),
            collect_translations: self.translations_file.is_some(),
            timestamp: None,
        }
    }
}

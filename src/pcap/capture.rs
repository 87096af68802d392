use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local};
use dns_monitor::{DisplayOptions, DissectResult, dissect};
use log::{debug, info, warn};
use pcap::{Activated, Capture, Device, Error, Linktype, PacketHeader};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const DEFAULT_FILTER: &str = "udp port 53";

/// Where frames come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureSource {
    Interface(String),
    File(PathBuf),
}

/// The parts of a pcap device that listing and default selection look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    pub name: String,
    pub description: Option<String>,
    pub up: bool,
    pub running: bool,
    pub loopback: bool,
}

impl From<&Device> for Interface {
    fn from(device: &Device) -> Self {
        Self {
            name: device.name.clone(),
            description: device.desc.clone(),
            up: device.flags.is_up(),
            running: device.flags.is_running(),
            loopback: device.flags.is_loopback(),
        }
    }
}

impl fmt::Display for Interface {
    /// `eth0 [UP RUNNING] Intel Ethernet`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut states = vec![if self.up { "UP" } else { "DOWN" }];
        if self.running {
            states.push("RUNNING");
        }
        if self.loopback {
            states.push("LOOPBACK");
        }
        write!(f, "{} [{}]", self.name, states.join(" "))?;
        if let Some(description) = &self.description {
            write!(f, " {description}")?;
        }
        Ok(())
    }
}

impl Interface {
    /// A running non-loopback interface if there is one, else any interface
    /// that is up. The `any` pseudo-device never qualifies.
    pub fn pick_default(interfaces: &[Interface]) -> Option<&Interface> {
        let candidates = || interfaces.iter().filter(|i| i.name != "any" && i.up);
        candidates()
            .find(|i| i.running && !i.loopback)
            .or_else(|| candidates().next())
    }
}

pub struct CaptureLoader;

impl CaptureLoader {
    pub fn list_interfaces() -> Result<Vec<Interface>> {
        let devices = Device::list().context("Failed to list capture devices")?;
        Ok(devices.iter().map(Interface::from).collect())
    }

    pub fn select_default_interface() -> Result<String> {
        let interfaces = Self::list_interfaces()?;
        match Interface::pick_default(&interfaces) {
            Some(interface) => Ok(interface.name.clone()),
            None => bail!("No suitable network interface found"),
        }
    }

    /// Opens the source and starts a blocking task that dissects every frame
    /// and sends the result down the returned channel. The channel closes
    /// when the file ends, the token is cancelled or the receiver is dropped.
    pub fn load(
        source: &CaptureSource,
        filter: Option<&str>,
        options: DisplayOptions,
    ) -> Result<(
        JoinHandle<()>,
        mpsc::Receiver<DissectResult>,
        CancellationToken,
    )> {
        let mut cap = open(source)?;

        // DLT_EN10MB: every decoder downstream starts at an Ethernet header
        let linktype = cap.get_datalink();
        if linktype != Linktype::ETHERNET {
            bail!(
                "{source:?} does not provide Ethernet headers ({}), not supported",
                linktype.get_name().unwrap_or_else(|_| linktype.0.to_string())
            );
        }

        let filter = filter.unwrap_or(DEFAULT_FILTER);
        cap.filter(filter, true)
            .with_context(|| format!("Failed to install capture filter {filter:?}"))?;

        info!("Capture started on {source:?} with filter {filter:?}");

        let (tx, rx) = mpsc::channel(10000);
        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        // Checked between packets; the capture call itself blocks up to the
        // read timeout.
        let should_stop = Arc::new(AtomicBool::new(false));
        let should_stop_clone = should_stop.clone();

        let handle = tokio::task::spawn_blocking(move || {
            let mut frames = 0u64;
            while !should_stop_clone.load(Ordering::Relaxed) {
                match cap.next_packet() {
                    Ok(packet) => {
                        frames += 1;
                        let frame_options = match packet_time(packet.header) {
                            Some(ts) => options.with_timestamp(ts),
                            None => options,
                        };
                        let caplen = packet.header.caplen as usize;
                        let result = dissect(packet.data, caplen, frame_options);
                        if let Some(err) = &result.error {
                            debug!("Frame {frames}: {err}");
                        }
                        if tx.blocking_send(result).is_err() {
                            info!("Channel closed, stopping capture");
                            break;
                        }
                    }
                    Err(Error::TimeoutExpired) => {
                        // Live capture: loop back to check the stop flag
                        continue;
                    }
                    Err(Error::NoMorePackets) => {
                        info!("End of capture file after {frames} frames");
                        break;
                    }
                    Err(e) => {
                        warn!("Error reading packet: {e}");
                        continue;
                    }
                }
            }
            info!("Packet capture task terminated");
        });

        let stop_handle = should_stop.clone();
        tokio::spawn(async move {
            token_clone.cancelled().await;
            stop_handle.store(true, Ordering::Relaxed);
        });

        Ok((handle, rx, cancel_token))
    }
}

fn open(source: &CaptureSource) -> Result<Capture<dyn Activated>> {
    match source {
        CaptureSource::Interface(interface) => {
            info!("Opening capture on interface: {interface}");
            let device = Device::list()?
                .into_iter()
                .find(|d| d.name == *interface)
                .context(format!("Interface {interface} not found"))?;

            let cap = Capture::from_device(device)?
                .immediate_mode(true)
                .timeout(100)
                .open()
                .with_context(|| format!("Couldn't open device {interface}"))?;
            Ok(cap.into())
        }
        CaptureSource::File(path) => {
            info!("Opening capture file: {}", path.display());
            let cap = Capture::from_file(path)
                .with_context(|| format!("Couldn't open capture file {}", path.display()))?;
            Ok(cap.into())
        }
    }
}

fn packet_time(header: &PacketHeader) -> Option<DateTime<Local>> {
    let secs = i64::from(header.ts.tv_sec);
    let nanos = u32::try_from(header.ts.tv_usec).ok()?.checked_mul(1000)?;
    DateTime::from_timestamp(secs, nanos).map(|ts| ts.with_timezone(&Local))
}

use std::io;
use std::thread;
use std::time::Duration;

use anyhow::{Context, bail};
use arper_protocols::ethernet;
use pnet::datalink::{self, Channel, Config, DataLinkReceiver, DataLinkSender, NetworkInterface};
use pnet::packet::ethernet::EtherTypes;
use tokio::sync::mpsc;
use tracing::debug;

const READ_TIMEOUT: Duration = Duration::from_millis(250);

/// Frames waiting for the responder. A full queue stalls the capture thread.
pub const QUEUE_CAPACITY: usize = 1024;

const MIN_ERROR_BACKOFF: Duration = Duration::from_millis(1);
const MAX_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Raw ARP frames (or the read error in their place) as seen by the capture thread.
pub type FrameQueue = mpsc::Receiver<io::Result<Vec<u8>>>;
type FrameSink = mpsc::Sender<io::Result<Vec<u8>>>;

pub struct EthernetHandle {
    pub tx: Box<dyn DataLinkSender>,
    pub rx: FrameQueue,
}

/// Opens an Ethernet channel on `intf` and starts forwarding its ARP frames.
pub fn start_capture(intf: &NetworkInterface) -> anyhow::Result<EthernetHandle> {
    start_capture_with(intf, datalink::channel)
}

pub fn start_capture_with<F>(intf: &NetworkInterface, channel_opener: F) -> anyhow::Result<EthernetHandle>
where
    F: FnOnce(&NetworkInterface, Config) -> io::Result<Channel>,
{
    let (tx, rx_socket) = open_eth_channel(intf, &get_config(), channel_opener)?;
    let (queue_tx, queue_rx) = mpsc::channel(QUEUE_CAPACITY);

    spawn_listener(&intf.name, rx_socket, queue_tx)
        .with_context(|| format!("spawning capture thread for {}", intf.name))?;

    Ok(EthernetHandle { tx, rx: queue_rx })
}

fn open_eth_channel<F>(intf: &NetworkInterface, cfg: &Config, channel_opener: F)
    -> anyhow::Result<(Box<dyn DataLinkSender>, Box<dyn DataLinkReceiver>)>
where F: FnOnce(&NetworkInterface, Config) -> io::Result<Channel>
{
    let ch: Channel = channel_opener(intf, *cfg).with_context(|| format!("opening on {}", intf.name))?;
    match ch {
        Channel::Ethernet(tx, rx) => {
            debug!("Ethernet channel open on {}", intf.name);
            Ok((tx, rx))
        },
        _ => bail!("non-ethernet channel for {}", intf.name),
    }
}

/// Reads frames until the queue's receiving side is dropped.
///
/// Non-ARP frames are skipped here. Read errors are queued for the consumer
/// to report, except read timeouts which only serve to notice shutdown.
/// Consecutive read errors back off exponentially up to [`MAX_ERROR_BACKOFF`],
/// and a full queue blocks the thread until the consumer catches up.
fn spawn_listener(
    name: &str,
    mut rx: Box<dyn DataLinkReceiver>,
    queue_tx: FrameSink,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("capture-{name}"))
        .spawn(move || {
            let mut backoff = Duration::ZERO;
            loop {
                let item = match rx.next() {
                    Ok(frame) => {
                        backoff = Duration::ZERO;
                        if ethernet::ether_type(frame) != Some(EtherTypes::Arp) {
                            continue;
                        }
                        Ok(frame.to_vec())
                    }
                    Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                        if queue_tx.is_closed() {
                            break;
                        }
                        continue;
                    }
                    Err(e) => Err(e),
                };

                let failed = item.is_err();
                if queue_tx.blocking_send(item).is_err() {
                    break;
                }

                if failed {
                    backoff = (backoff * 2).clamp(MIN_ERROR_BACKOFF, MAX_ERROR_BACKOFF);
                    thread::sleep(backoff);
                }
            }
        })
}

fn get_config() -> Config {
    Config {
        read_timeout: Some(READ_TIMEOUT),
        ..Default::default()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

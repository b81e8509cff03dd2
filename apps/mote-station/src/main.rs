//! Simulated sensor node reporting to a base station over in-memory links.
//!
//! Runs a duty-cycling publisher that takes a fake temperature reading
//! each cycle, shuttles frames between the two links, and prints what the
//! station hears. Ends by broadcasting a shutdown command back to the
//! node's command listener.

use std::cell::RefCell;
use std::rc::Rc;

use clap::Parser;
use rand::Rng;
use tracing::{info, warn};

use mote_codec::Payload;
use mote_core::{DeviceName, Endpoint, MoteError, NodeAddress, NodeIdentity, SecurityKey};
use mote_link::{route_submitted, DeliveryStatus, InMemoryLink};
use mote_node::{
    ListenerTable, ManualSleepTimer, Publisher, PublisherConfig, PublisherState, Transport,
};

const NODE_ADDRESS: u16 = 0x8001;
const STATION_ADDRESS: u16 = 0x0001;
const PAN_ID: u16 = 0x4567;
const CHANNEL: u8 = 0x0F;
const SECURITY_KEY: &[u8] = b"TestSecurityKey1";
const DATA_ENDPOINT: u8 = 1;
const COMMAND_ENDPOINT: u8 = 2;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of publish cycles to simulate
    #[arg(long, default_value_t = 5)]
    cycles: u32,
    /// Simulated sleep interval between transmissions, in seconds
    #[arg(long, default_value_t = 30)]
    interval_secs: u32,
    /// Device name of the publishing sensor node
    #[arg(long, default_value = "weather-mote")]
    node_name: String,
    /// Device name of the receiving station
    #[arg(long, default_value = "base-station")]
    station_name: String,
}

fn identity(address: u16, name: &str) -> Result<NodeIdentity, MoteError> {
    Ok(NodeIdentity::new(
        address,
        DeviceName::new(name)?,
        PAN_ID,
        CHANNEL,
        SecurityKey::new(SECURITY_KEY)?,
    ))
}

fn run(cli: &Cli) -> Result<(), MoteError> {
    let data_endpoint = Endpoint::new(DATA_ENDPOINT)?;
    let command_endpoint = Endpoint::new(COMMAND_ENDPOINT)?;

    let mut node_link = InMemoryLink::with_auto_complete(DeliveryStatus::Success);
    let mut station_link = InMemoryLink::with_auto_complete(DeliveryStatus::Success);

    let mut publisher = Publisher::initialize(
        &identity(NODE_ADDRESS, &cli.node_name)?,
        PublisherConfig {
            recipient: NodeAddress::new(STATION_ADDRESS, data_endpoint),
            sleep_interval_secs: cli.interval_secs,
        },
        Box::new(|payload: &mut Payload| {
            // Centi-degrees, roughly room temperature.
            let reading: i16 = rand::thread_rng().gen_range(1800..2600);
            let _ = payload.extend_from_slice(&reading.to_be_bytes());
        }),
        Box::new(|| warn!("sensor node requested a reset")),
        &mut node_link,
    );

    let shutdown_seen = Rc::new(RefCell::new(false));
    let shutdown_flag = Rc::clone(&shutdown_seen);
    let mut node_listeners = ListenerTable::new();
    node_listeners.register(
        &mut node_link,
        command_endpoint,
        Box::new(move |_, sender, payload| {
            info!(%sender, command = %String::from_utf8_lossy(payload), "node received command");
            *shutdown_flag.borrow_mut() = true;
        }),
    );

    let mut station = Transport::initialize(&identity(STATION_ADDRESS, &cli.station_name)?, &mut station_link);
    let mut station_listeners = ListenerTable::new();
    station_listeners.register(
        &mut station_link,
        data_endpoint,
        Box::new(|source, sender, payload| {
            if let Ok(raw) = <[u8; 2]>::try_from(payload) {
                let centi = i16::from_be_bytes(raw);
                info!(
                    source = format_args!("{source:#06x}"),
                    %sender,
                    "station received {}.{:02} C",
                    centi / 100,
                    (centi % 100).unsigned_abs()
                );
            } else {
                warn!(source, "station received a malformed reading");
            }
        }),
    );

    // The simulated clock just records how long the node would have slept.
    let mut timer = ManualSleepTimer::default();

    let mut completed = 0;
    while completed < cli.cycles {
        let before = publisher.state();
        publisher.update(&mut node_link, &mut timer);
        if before == PublisherState::Sleeping && publisher.state() == PublisherState::UpdatingPayload
        {
            completed += 1;
        }
        route_submitted(&mut node_link, &mut station_link, NODE_ADDRESS);
        station_listeners.tick(&mut station_link);
    }
    info!(
        cycles = completed,
        slept_secs = timer.slept().iter().sum::<u32>(),
        "simulation finished"
    );

    // Tell the node (and anything else on the network) to shut down.
    let mut command = Payload::new();
    let _ = command.extend_from_slice(b"shutdown");
    if let Err(error) = station.enqueue_broadcast(&mut station_link, 0, command_endpoint, &command)
    {
        warn!(%error, "station could not queue the shutdown broadcast");
        return Ok(());
    }
    station.tick(&mut station_link);
    route_submitted(&mut station_link, &mut node_link, STATION_ADDRESS);
    node_listeners.tick(&mut node_link);
    if *shutdown_seen.borrow() {
        info!("node acknowledged the shutdown command");
    }
    Ok(())
}

fn main() {
    let filter = std::env::var("MOTE_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    if let Err(error) = run(&cli) {
        tracing::error!(%error, "simulation failed");
        std::process::exit(1);
    }
}

mod tick_loop;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rangeview_config::{load_config, Config, SenderType, SerializerType};
use rangeview_core::{Marker, MarkerFrame, ScreenPos};
use rangeview_feed::{
    aircraft_markers, reconcile, rocket_markers, AircraftSource, LaunchClient, OpenSkyClient,
    PadMap,
};
use rangeview_simulation::{filter_markers, Category, TrafficParams, TrafficSimulator};
use rangeview_transport::{
    BinarySerializer, JsonSerializer, Sender, Serializer, StdioSender, WebSocketSender,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tick_loop::TickLoop;

#[derive(Parser, Debug)]
#[command(author, version, about = "Launch-range traffic overlay feed", long_about = None)]
struct Args {
    /// Path to the configuration file (JSON or TOML)
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Run a bounded number of ticks, then exit
    #[arg(long)]
    ticks: Option<u64>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            log::error!("failed to load config {}: {e}", args.config.display());
            process::exit(1);
        }
    };
    log::info!("using configuration from {}", args.config.display());

    // Bounds and category were validated at load; construction stays fallible.
    let bounds = match config.bounds.geo_bounds() {
        Ok(bounds) => bounds,
        Err(e) => {
            log::error!("{e}");
            process::exit(1);
        }
    };
    let category: Category = match config.display.category.parse() {
        Ok(category) => category,
        Err(e) => {
            log::error!("{e}");
            process::exit(1);
        }
    };

    let mut rng = match config.traffic.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let params = TrafficParams {
        aircraft_count: config.traffic.aircraft_count,
        vessel_count: config.traffic.vessel_count,
        aircraft_speed: config.traffic.aircraft_speed,
        vessel_speed: config.traffic.vessel_speed,
    };
    let mut simulator = TrafficSimulator::new(bounds, params, &mut rng);
    log::info!(
        "simulating {} aircraft and {} vessels",
        config.traffic.aircraft_count,
        config.traffic.vessel_count
    );

    let timeout = Duration::from_secs(config.feeds.timeout_secs);

    // Upcoming launches are fetched once at startup; a failure just means no
    // rocket markers.
    let rockets = fetch_rocket_markers(&config, timeout, &mut rng);

    let live_source: Option<OpenSkyClient> = if config.feeds.live_aircraft {
        match OpenSkyClient::new(&config.feeds.aircraft_url, timeout) {
            Ok(client) => Some(client),
            Err(e) => {
                log::warn!("could not build live aircraft client: {e}");
                None
            }
        }
    } else {
        None
    };

    let serializer = create_serializer(&config);
    let mut sender = create_sender(&config);

    let tick_loop = TickLoop::new(Duration::from_millis(config.tick_ms), args.ticks);
    let stop = tick_loop.stop_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        stop.store(false, Ordering::SeqCst);
    }) {
        log::warn!("failed to install Ctrl+C handler: {e}");
    }

    log::info!("running at one tick per {}ms", config.tick_ms);

    let search = config.display.search.clone();
    let mut was_live = false;

    tick_loop.run(|tick| {
        // Blocking fetch with a timeout: at most one request is in flight
        // and ticks never overlap.
        let live = live_source.as_ref().and_then(|source| {
            match source.fetch_states(&bounds) {
                Ok(states) => Some(aircraft_markers(&states, &bounds)),
                Err(e) => {
                    log::warn!("live aircraft fetch failed: {e}");
                    None
                }
            }
        });

        simulator.tick();
        let (traffic, is_live) =
            reconcile(live, simulator.aircraft_markers(), simulator.vessel_markers());
        if is_live != was_live {
            log::info!("aircraft source: {}", if is_live { "LIVE" } else { "SIM" });
            was_live = is_live;
        }

        // Rockets first, then traffic.
        let mut markers = rockets.clone();
        markers.extend(traffic);
        let visible = filter_markers(&markers, category, &search);

        let frame = MarkerFrame { tick, live_aircraft: is_live, markers: visible };
        match serializer.serialize(&frame) {
            Ok(data) => {
                if let Err(e) = sender.send(data.as_bytes()) {
                    log::error!("failed to send frame: {e}");
                }
            }
            Err(e) => log::error!("failed to serialize frame: {e}"),
        }
    });
}

fn fetch_rocket_markers(
    config: &Config,
    timeout: Duration,
    rng: &mut StdRng,
) -> Vec<Marker> {
    let pads = PadMap::new(
        config
            .pads
            .coordinates
            .iter()
            .map(|pad| (pad.pad_id, ScreenPos { x: pad.x, y: pad.y }))
            .collect::<HashMap<_, _>>(),
        config.pads.fallback(),
    );

    let client = match LaunchClient::new(
        &config.feeds.launch_url,
        config.feeds.location_ids.clone(),
        config.feeds.launch_limit,
        timeout,
    ) {
        Ok(client) => client,
        Err(e) => {
            log::warn!("could not build launch client: {e}");
            return Vec::new();
        }
    };

    match client.fetch_upcoming() {
        Ok(missions) => {
            for mission in &missions {
                log::info!(
                    "upcoming: {} at {} ({})",
                    mission.title,
                    mission.location,
                    mission.launch_time_utc
                );
            }
            rocket_markers(&missions, &pads, rng)
        }
        Err(e) => {
            log::warn!("launch feed unavailable: {e}");
            Vec::new()
        }
    }
}

fn create_serializer(config: &Config) -> Box<dyn Serializer> {
    match config.transport.serializer {
        SerializerType::Json => Box::new(JsonSerializer),
        SerializerType::Binary => Box::new(BinarySerializer),
    }
}

fn create_sender(config: &Config) -> Box<dyn Sender> {
    match config.transport.sender {
        SenderType::Stdio => Box::new(StdioSender::new()),
        SenderType::WebSocket => {
            let options = &config.transport.websocket;
            let mut ws_sender = WebSocketSender::new(&options.host, options.port);
            if let Err(e) = ws_sender.start() {
                log::error!("failed to start websocket server: {e}");
                process::exit(1);
            }
            log::info!(
                "websocket server listening on ws://{}:{}",
                options.host,
                options.port
            );
            Box::new(ws_sender)
        }
    }
}

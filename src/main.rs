use clap::Parser;
use crossbeam_channel::{Sender, select};
use evsource::config::SourceConfig;
use evsource::consumer::EventConsumer;
use evsource::consumer::dispatcher::{DrainStats, EventDispatcher};
use evsource::{Context, EventView, Instance, PushEvent, PushInstance, SourceError};
use log::{debug, error, info};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant, SystemTime};

#[derive(Debug, Parser)]
#[command(name = "evsource")]
#[command(about = "Push-model event source host", long_about = None)]
struct Cli {
    /// TOML file with timeout_ms, batch_size and event_size.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Events produced per second.
    #[arg(long, default_value_t = 1000)]
    rate: u64,
    /// Stop producing after this many events.
    #[arg(long)]
    max_events: Option<u64>,
    #[arg(long, default_value_t = 5000)]
    status_interval_ms: u64,
}

struct ByteCounter {
    events: u64,
    bytes: u64,
}

impl EventConsumer for ByteCounter {
    fn consume(&mut self, event: &EventView<'_>) -> bool {
        self.events += 1;
        self.bytes += event.len() as u64;
        true
    }

    fn flush(&mut self) {
        debug!("consumed {} events, {} bytes", self.events, self.bytes);
    }

    fn name(&self) -> &str {
        "bytes"
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => SourceConfig::from_path(path)?,
        None => SourceConfig::default(),
    };
    info!("starting event source: {config:?}");
    println!("Press Ctrl+C to stop\n");

    let (ctx, cancel) = Context::background().with_cancel();
    let handler_cancel = cancel.clone();
    ctrlc::set_handler(move || {
        info!("shutting down...");
        handler_cancel.cancel();
    })?;

    let (tx, rx) = crossbeam_channel::bounded(config.batch_size as usize);
    let producer = {
        let ctx = ctx.clone();
        let interval = Duration::from_micros(1_000_000 / cli.rate.max(1));
        let max_events = cli.max_events;
        thread::spawn(move || produce(ctx, tx, interval, max_events))
    };

    let options = config
        .options()
        .with_context(ctx)
        .with_close(|| info!("event source closed"));
    let mut instance = PushInstance::new(rx, options)?;

    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_consumer(ByteCounter {
        events: 0,
        bytes: 0,
    });

    let status_interval = Duration::from_millis(cli.status_interval_ms);
    let mut total = DrainStats::default();
    let mut last_report = Instant::now();

    let result = loop {
        let (outcome, stats) = dispatcher.poll(&mut instance, &());
        total.merge(&stats);

        if last_report.elapsed() >= status_interval {
            info!(
                "[STATUS] batches={} timeouts={} events={}",
                total.batches, total.timeouts, total.events_read
            );
            last_report = Instant::now();
        }

        match outcome.status {
            Ok(()) | Err(SourceError::Timeout) => {}
            Err(SourceError::Eof) => break Ok(()),
            Err(err) => break Err(err),
        }
    };

    instance.close();
    // a producer blocked on a full channel only notices the root context
    cancel.cancel();
    let produced = producer.join().map_err(|_| "producer thread panicked")?;

    println!("Total events produced: {produced}");
    println!("Total events processed: {}", total.events_read);
    result.map_err(Into::into)
}

fn produce(
    ctx: Context,
    tx: Sender<PushEvent>,
    interval: Duration,
    max_events: Option<u64>,
) -> u64 {
    let mut count = 0u64;

    while max_events.is_none_or(|max| count < max) {
        let evt = PushEvent::new(format!("event #{count}")).with_timestamp(SystemTime::now());
        select! {
            send(tx, evt) -> res => {
                if res.is_err() {
                    break;
                }
                count += 1;
            }
            recv(ctx.done()) -> _ => break,
        }

        select! {
            recv(ctx.done()) -> _ => break,
            default(interval) => {}
        }
    }

    // dropping the sender ends the stream
    count
}

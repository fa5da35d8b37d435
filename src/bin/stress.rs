use evsource::{Context, EventWriter, Instance, InstanceOptions, PullInstance, SourceError};
use log::info;
use std::io::Write;
use std::time::{Duration, Instant};

const RUN_FOR: Duration = Duration::from_secs(5);

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("pull-model event source stress test\n");

    let (ctx, cancel) = Context::background().with_cancel();
    ctrlc::set_handler(move || cancel.cancel())
        .map_err(|e| format!("Failed to set Ctrl+C handler: {}", e))?;

    // ends the run after RUN_FOR unless Ctrl+C gets there first
    let (run_ctx, stop) = ctx.with_cancel();
    std::thread::spawn(move || {
        let _ = ctx.done().recv_timeout(RUN_FOR);
        stop.cancel();
    });

    let mut count = 0u64;
    let pull = move |_ctx: &Context, evt: &mut EventWriter<'_>| -> Result<(), SourceError> {
        evt.writer().write_all(&count.to_le_bytes())?;
        count += 1;
        Ok(())
    };

    let options = InstanceOptions::new()
        .with_context(run_ctx)
        .with_event_size(64);
    let mut instance = PullInstance::new(pull, options)?;

    println!("Running for {} seconds...", RUN_FOR.as_secs());
    let start = Instant::now();
    let mut events = 0u64;
    let mut batches = 0u64;
    let mut timeouts = 0u64;

    loop {
        let mut evts = instance.take_events();
        let outcome = instance.next_batch(&(), &mut evts);
        instance.set_events(evts);

        events += outcome.count as u64;
        batches += 1;
        if outcome.is_timeout() {
            timeouts += 1;
        }
        if outcome.is_terminal() {
            break;
        }
    }
    instance.close();

    let elapsed = start.elapsed().as_secs_f64();
    info!("stress run finished after {:.2}s", elapsed);

    println!("\nResults:");
    println!("  Batches: {}", batches);
    println!("  Timeouts: {}", timeouts);
    println!("  Events: {}", events);
    println!(
        "  Throughput: {:.2}M events/sec",
        events as f64 / elapsed / 1_000_000.0
    );

    Ok(())
}

use std::future::Future;
use std::time::Duration;

use clap::Args;
use mindease_core::{drive, Event};

use super::{describe, open_companion};

#[derive(Args)]
pub struct BreatheArgs {
    /// Stop automatically after this many seconds
    #[arg(long)]
    seconds: Option<u64>,
    /// Print every event, including progress ticks, as JSON lines
    #[arg(long)]
    json: bool,
}

pub fn run(args: BreatheArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut companion = open_companion()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut last_shown: Option<u64> = None;
    let mut write_error = None;
    let mut sink = |event: &Event| {
        if args.json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => write_error = Some(e),
            }
            return;
        }
        match event {
            Event::PhaseTick { remaining_secs, .. } => {
                if last_shown != Some(*remaining_secs) {
                    last_shown = Some(*remaining_secs);
                    println!("  {remaining_secs}s");
                }
            }
            other => {
                last_shown = None;
                if let Some(line) = describe(other) {
                    println!("{line}");
                }
            }
        }
    };

    let events = companion.start_breathing();
    for event in &events {
        sink(event);
    }

    let limit = args.seconds;
    runtime.block_on(drive(&mut companion, &mut sink, async move {
        match limit {
            Some(secs) => {
                tokio::select! {
                    _ = interrupted() => {}
                    _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
                }
            }
            None => interrupted().await,
        }
    }));

    match write_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Resolves on Ctrl-C. If the handler cannot be installed the session
/// keeps running instead of ending at once.
async fn interrupted() {
    wait_for_signal(tokio::signal::ctrl_c()).await;
}

async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::warn!("could not listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

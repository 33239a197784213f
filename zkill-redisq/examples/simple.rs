//! Print kills and errors from RedisQ as they arrive
//!
//! Usage: cargo run -p zkill-redisq --example simple -- --kills kills.log --errors errors.log
//!
//! Kills are appended to the kills file as JSON lines, errors as text lines.
//! Press Ctrl-C to stop.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use zkill_redisq::{PollEvent, Poller};

#[derive(Parser, Debug)]
#[command(about = "Listen to zKillboard's RedisQ service")]
struct Args {
    /// File to log retrieved kills into
    #[arg(long)]
    kills: Option<PathBuf>,

    /// File to log errors into
    #[arg(long)]
    errors: Option<PathBuf>,

    /// Seconds RedisQ waits before answering with a null kill
    #[arg(long, default_value_t = 5)]
    ttw: u32,

    /// Queue ID identifying this client to RedisQ
    #[arg(long)]
    queue_id: Option<String>,
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    zkill_redisq::logging::init_from_env()?;
    let args = Args::parse();

    let poller = Arc::new(Poller::new()?);
    poller.set_time_to_wait(args.ttw);
    if let Some(queue_id) = &args.queue_id {
        poller.set_queue_id(queue_id.as_str());
    }

    {
        let poller = Arc::clone(&poller);
        ctrlc::set_handler(move || {
            eprintln!("Stopping...");
            poller.stop();
        })?;
    }

    // Ends once the poller has stopped
    for event in poller.iter() {
        match event {
            PollEvent::Kill(kill) => {
                println!(
                    "Kill {} at {}: {} lost a {} ({:.2} ISK)",
                    kill.id(),
                    kill.killmail().kill_time,
                    kill.killmail().victim.character.name,
                    kill.killmail().victim.ship.name,
                    kill.zkb().total_value
                );

                if let Some(path) = &args.kills {
                    let result = serde_json::to_string(&kill)
                        .map_err(std::io::Error::from)
                        .and_then(|line| append_line(path, &line));
                    if let Err(e) = result {
                        eprintln!("*** FAILED WRITE KILL LOG: {}", e);
                    }
                }
            }
            PollEvent::Error(error) => {
                eprintln!("*** ERROR: {}", error);

                if let Some(path) = &args.errors {
                    if let Err(e) = append_line(path, &error.to_string()) {
                        eprintln!("*** FAILED WRITE ERROR LOG: {}", e);
                    }
                }
            }
        }
    }

    poller.wait();
    Ok(())
}

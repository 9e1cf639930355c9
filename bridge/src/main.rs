use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::Parser;

use glyphport::events::ManualEventSource;
use glyphport::{logging, ports, Bridge, Config, Error, Inbound, Result};

/// Serves port messages as JSON lines: requests on stdin, answers on stdout.
#[derive(Debug, Parser)]
#[command(name = "glyphport", version, about)]
struct Cli {
  /// Configuration file. Defaults to glyphport[.<env>].yaml in the working
  /// directory, then built-in defaults.
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Environment suffix used when searching for the configuration file.
  #[arg(short, long, env = "GLYPHPORT_ENV")]
  env: Option<String>,
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("glyphport: {}", e);
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<()> {
  let config = Config::load(cli.config.as_deref(), cli.env.as_deref())?;
  logging::init(&config.logging)?;

  let runtime = tokio::runtime::Builder::new_multi_thread()
    .thread_name("glyphport-fonts")
    .enable_all()
    .build()
    .map_err(|source| Error::Io {
      context: "runtime",
      source,
    })?;

  let (app, bridge_ports) = ports::open(config.ports.capacity);
  let events = ManualEventSource::new();
  let bridge = Bridge::from_config(&config, bridge_ports.outbox.clone(), Some(runtime.handle().clone()), &events)?;
  let dispatcher = bridge.spawn(bridge_ports);

  let ports::AppPorts { inbound, outbound } = app;
  let writer = thread::spawn(move || -> Result<()> {
    let stdout = io::stdout();
    while let Ok(message) = outbound.recv() {
      let mut out = stdout.lock();
      serde_json::to_writer(&mut out, &message)?;
      out
        .write_all(b"\n")
        .and_then(|()| out.flush())
        .map_err(|source| Error::Io {
          context: "stdout",
          source,
        })?;
    }
    Ok(())
  });

  for line in io::stdin().lock().lines() {
    let line = line.map_err(|source| Error::Io {
      context: "stdin",
      source,
    })?;
    if line.trim().is_empty() {
      continue;
    }
    match serde_json::from_str::<Inbound>(&line) {
      Ok(message) => {
        if inbound.send(message).is_err() {
          tracing::warn!("dispatcher stopped, ignoring remaining input");
          break;
        }
      }
      Err(e) => tracing::warn!(error = %e, "skipping malformed message"),
    }
  }
  drop(inbound);
  drop(events);

  let dispatched = dispatcher
    .join()
    .unwrap_or_else(|_| Err(Error::PortClosed("inbound")));
  // Lets in-flight font loads answer before the outbound port closes.
  runtime.shutdown_timeout(Duration::from_secs(10));
  let written = writer
    .join()
    .unwrap_or_else(|_| Err(Error::PortClosed("outbound")));

  dispatched?;
  written
}

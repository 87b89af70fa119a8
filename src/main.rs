use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use picoircd::config::{Config, PortPolicy, USAGE};
use picoircd::network::Gateway;
use picoircd::state::Core;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_args(std::env::args().skip(1), PortPolicy::Ephemeral) {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "Invalid arguments");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "Server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let core = Arc::new(Core::new(config.password));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let gateway = Gateway::bind(addr, core).await?;

    // SIGQUIT must not kill the server; a task consumes the signal stream.
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut quit = signal(SignalKind::quit())?;
        tokio::spawn(async move {
            while quit.recv().await.is_some() {
                info!("Ignoring SIGQUIT");
            }
        });
    }

    tokio::select! {
        () = gateway.run() => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Interrupt received, shutting down");
        }
    }
    Ok(())
}

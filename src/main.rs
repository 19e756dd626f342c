use anyhow::Result;
use marco_docker::config::{AppConfig, CliArgs};
use marco_docker::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliArgs::parse(std::env::args().skip(1))?;
    if cli.help {
        println!("{}", config::usage());
        return Ok(());
    }
    if cli.version {
        println!("{} {}", version::NAME, version::VERSION);
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = AppConfig::load(&cli)?;
    tracing::info!(
        version = version::VERSION,
        marco = %app_config.marco,
        endpoint = %app_config.endpoint,
        ports = %app_config.ports,
        env = %app_config.env,
        frequency_secs = app_config.frequency,
        match_mode = %app_config.match_mode,
        "Starting {}",
        version::NAME
    );

    let docker_repo = Arc::new(docker_repo::DockerRepo::connect(
        &app_config.endpoint,
        app_config.docker_timeout_secs,
    )?);
    let registry = Arc::new(registry::RegistryClient::new(
        app_config.marco.clone(),
        app_config.push_timeout(),
    )?);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            runtime: docker_repo,
            registry,
            shutdown_rx,
        },
        worker::WorkerConfig {
            interval: app_config.poll_interval(),
            cycle: worker::CycleConfig::from(&app_config),
        },
    );

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Received shutdown signal");
    let _ = shutdown_tx.send(());
    let _ = worker_handle.await;

    Ok(())
}

//! Mel Feature Pipeline - Main Entry Point

use mel_pipeline::{init_logging, load_config, run_session, DEFAULT_CONFIG_PATH};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config(&path)?;
    init_logging(&config.logging)?;

    info!("=== Mel Feature Pipeline v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "{} mel features every {}ms from {}-sample frames at {} Hz",
        config.feature.num_filters,
        config.scheduler.hop_length_ms,
        config.feature.transform_size,
        config.feature.sample_rate
    );

    // The session owns the only control path; Ctrl-C is honoured at the next cycle boundary
    let stop = Arc::new(AtomicBool::new(false));
    let mut session = tokio::task::spawn_blocking({
        let stop = Arc::clone(&stop);
        move || run_session(config, &stop)
    });

    let stats = tokio::select! {
        joined = &mut session => joined??,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, finishing current cycle");
            stop.store(true, Ordering::Relaxed);
            session.await??
        }
    };

    info!(
        "Session ended: {} cycles, {} vectors emitted, {} sample timeouts, {} late samples",
        stats.cycles, stats.emitted, stats.timeouts, stats.late_samples
    );
    Ok(())
}

use equilibrio_core::notify::{polling_period, run_polling, SystemClock};

use super::open_session;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session()?;
    let period = polling_period(session.settings())?;
    let routine = session.store().current_id().to_string();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    eprintln!(
        "watching '{routine}' every {}s, Ctrl-C to stop",
        period.as_secs()
    );
    let cycles = runtime.block_on(run_polling(&mut session, &SystemClock, period, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }));
    tracing::info!(cycles, "watch stopped");
    Ok(())
}

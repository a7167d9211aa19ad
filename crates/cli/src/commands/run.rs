use std::io;
use warmstart_config::Config;
use warmstart_trigger::{EventSource, TriggerController};

pub fn execute(config: &Config, stdin: bool) -> eyre::Result<()> {
    if config.applications.is_empty() {
        tracing::warn!("no applications configured, launch events will be ignored");
    }

    // Lists are partitioned once, before the first event is read
    let mut controller = TriggerController::from_config(config);
    tracing::info!(
        applications = controller.applications().len(),
        marker = %config.launch_marker,
        min_interval_secs = config.min_interval_secs,
        "watching for launches"
    );

    let stats = if stdin {
        controller.run(io::stdin().lock())?
    } else {
        let source = EventSource::spawn(&config.event_command)?;
        controller.run(source)?
    };

    println!("{stats}");
    Ok(())
}

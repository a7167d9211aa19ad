use warmstart_config::Config;
use warmstart_preload::Partitioner;

pub fn execute(config: &Config) -> eyre::Result<()> {
    println!(
        "event command: {}\nlaunch marker: {:?}\nmin interval: {}s\nworkers: {}\nblock size: {} bytes",
        config.event_command_line(),
        config.launch_marker,
        config.min_interval_secs,
        config.workers,
        config.block_size
    );

    let partitioner = Partitioner::new(config.block_size);
    let mut unavailable = 0;
    for (identifier, list) in &config.applications {
        match partitioner.prepare(list) {
            Ok((chunks, summary)) => {
                println!("{identifier}: {summary} ({} bytes)", chunks.total_bytes());
            }
            Err(e) => {
                unavailable += 1;
                println!("{identifier}: {e}");
            }
        }
    }

    println!(
        "{} applications, {} file lists unavailable",
        config.applications.len(),
        unavailable
    );
    Ok(())
}

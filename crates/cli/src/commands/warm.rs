use std::path::Path;
use warmstart_config::Config;
use warmstart_preload::{Partitioner, PreloadOptions, PreloadSession};

pub fn execute(config: &Config, list: &Path, label: &str) -> eyre::Result<()> {
    let options = PreloadOptions {
        block_size: config.block_size,
        workers: config.workers,
    };

    // A missing list is a usage error here, unlike in the trigger loop
    let (chunks, summary) = Partitioner::new(options.block_size).prepare(list)?;
    println!("{summary}");

    let mut session = PreloadSession::from_chunks(label, chunks, &options);
    let report = session.run();
    println!("{report}");
    Ok(())
}

//! Launch-event source backed by a child process (logcat by default)

use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, ChildStdout, Command, Stdio};
use warmstart_core::{Error, Result};

/// Line-oriented stdout of a spawned event command.
///
/// The child is killed and reaped when the source is dropped.
pub struct EventSource {
    command: String,
    child: Child,
    reader: BufReader<ChildStdout>,
}

impl EventSource {
    /// Spawn `argv[0]` with the remaining arguments and capture its stdout
    pub fn spawn(argv: &[String]) -> Result<Self> {
        let command = argv.join(" ");
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| Error::event_source(&command, "is empty"))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::event_source_io(&command, "could not be spawned", e))?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(Error::event_source(&command, "produced no stdout"));
        };

        tracing::info!(command = %command, pid = child.id(), "event source started");
        Ok(Self {
            command,
            child,
            reader: BufReader::new(stdout),
        })
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }
}

impl Read for EventSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for EventSource {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt)
    }
}

impl Drop for EventSource {
    fn drop(&mut self) {
        // Already-exited children make kill fail; wait still reaps them
        let _ = self.child.kill();
        match self.child.wait() {
            Ok(status) => tracing::debug!(command = %self.command, %status, "event source stopped"),
            Err(e) => tracing::warn!(command = %self.command, error = %e, "failed to reap event source"),
        }
    }
}

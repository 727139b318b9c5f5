//! Live debug edits. `PATH=VALUE` lines are read off the render thread and
//! queued; the world applies whatever has arrived once per frame.
use std::io::{self, BufRead};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, info, warn};

use crate::debug::DebugOverride;

/// Receiving end of the edit queue.
#[derive(Debug)]
pub struct DebugEdits {
    receiver: Receiver<DebugOverride>,
}

impl DebugEdits {
    pub fn channel() -> (Sender<DebugOverride>, Self) {
        let (sender, receiver) = unbounded();
        (sender, Self { receiver })
    }

    /// Queues `initial`, then keeps reading edits from stdin for the life of
    /// the process.
    pub fn from_stdin(initial: Vec<DebugOverride>) -> io::Result<Self> {
        let (sender, edits) = Self::channel();
        for edit in initial {
            // The receiver is alive in `edits`.
            let _ = sender.send(edit);
        }
        spawn_reader(io::BufReader::new(io::stdin()), sender)?;
        info!("debug edits enabled: write PATH=VALUE lines to stdin");
        Ok(edits)
    }

    /// Everything queued so far, oldest first.
    pub fn drain(&self) -> Vec<DebugOverride> {
        self.receiver.try_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

/// Parses `reader` line by line on a named thread until EOF or until the
/// receiver is gone. Blank lines and `#` comments are skipped; malformed
/// lines are logged and dropped.
pub fn spawn_reader<R>(reader: R, sender: Sender<DebugOverride>) -> io::Result<JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("earthmap-debug-edits".into())
        .spawn(move || {
            for line in reader.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        warn!("debug edit input closed: {err}");
                        return;
                    }
                };
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
                match trimmed.parse::<DebugOverride>() {
                    Ok(edit) => {
                        if sender.send(edit).is_err() {
                            return;
                        }
                    }
                    Err(err) => warn!("debug edit ignored: {err}"),
                }
            }
            debug!("debug edit input reached end of stream");
        })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reader_queues_valid_lines_in_order() {
        let (sender, edits) = DebugEdits::channel();
        let input = "Earth Map/Position X=2\n\n# comment\nnot an edit\nEarth Map/Material/Strength = 0.5\n";
        spawn_reader(Cursor::new(input), sender)
            .unwrap()
            .join()
            .unwrap();

        let queued = edits.drain();
        assert_eq!(queued.len(), 2);
        assert_eq!(queued[0].path, "Earth Map/Position X");
        assert_eq!(queued[0].value, 2.0);
        assert_eq!(queued[1].path, "Earth Map/Material/Strength");
        assert_eq!(queued[1].value, 0.5);
        assert!(edits.is_empty());
    }

    #[test]
    fn reader_stops_when_receiver_dropped() {
        let (sender, edits) = DebugEdits::channel();
        drop(edits);
        let handle = spawn_reader(Cursor::new("Earth Map/Position X=1\n"), sender).unwrap();
        assert!(handle.join().is_ok());
    }
}

//! The delivery core shared by watcher backends.

use std::path::{Path, PathBuf};

use crossbeam_channel::{Receiver, Sender, bounded};
use tracing::{debug, error};

use crate::error::Fault;
use crate::event::DirEvent;

/// Delivery core for a single watched root directory.
///
/// A monitor owns one rendezvous channel pair (events and errors), fixed
/// for its entire lifetime. The watcher backend that owns the monitor is
/// the single producer: it pushes each observed change through
/// [`Monitor::emit`] and each internal failure through [`Monitor::throw`].
/// Consumers drain the receiver handles returned by [`Monitor::events`] and
/// [`Monitor::errors`].
///
/// Both channels are unbuffered, so a send completes only once a receive
/// matches it. Backpressure is structural: a backend that outruns its
/// consumers stalls inside `emit`/`throw` instead of queueing. Delivery is
/// FIFO per channel, with no ordering guarantee between the two channels.
///
/// There is no explicit stop operation. Dropping the monitor drops the
/// sender halves, and outstanding receiver handles observe disconnection,
/// which consumers treat as end-of-stream. A concrete backend owns a
/// monitor next to its OS subscription state, so tearing down the backend
/// tears down the stream.
pub struct Monitor {
    /// The watched root.
    dir: PathBuf,

    /// Rendezvous channel for observed changes.
    events: (Sender<Box<dyn DirEvent>>, Receiver<Box<dyn DirEvent>>),

    /// Rendezvous channel for failures.
    errors: (Sender<Box<dyn Fault>>, Receiver<Box<dyn Fault>>),
}

impl Monitor {
    /// Create the delivery core for the root directory `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        debug!("creating monitor for {}", dir.display());

        Self {
            dir,
            events: bounded(0),
            errors: bounded(0),
        }
    }

    /// The watched root directory.
    pub fn directory(&self) -> &Path {
        &self.dir
    }

    /// Receiver handle for observed changes.
    ///
    /// Handles may be cloned freely; consumers race for messages and each
    /// event is delivered to exactly one of them.
    pub fn events(&self) -> Receiver<Box<dyn DirEvent>> {
        self.events.1.clone()
    }

    /// Receiver handle for failures.
    pub fn errors(&self) -> Receiver<Box<dyn Fault>> {
        self.errors.1.clone()
    }

    /// Deliver an event to whichever consumer is draining [`Monitor::events`].
    ///
    /// Blocks the calling producer until a consumer receives. Never fails:
    /// any failure a backend observes travels through [`Monitor::throw`],
    /// not back to the caller.
    pub fn emit(&self, event: impl DirEvent + 'static) {
        if self.events.0.send(Box::new(event)).is_err() {
            // The monitor holds its own receiver half, so the channel
            // cannot disconnect before the monitor itself is gone.
            error!("event channel disconnected, dropping event");
        }
    }

    /// Deliver a failure to whichever consumer is draining [`Monitor::errors`].
    ///
    /// Same rendezvous semantics as [`Monitor::emit`].
    pub fn throw(&self, error: impl Fault + 'static) {
        if self.errors.0.send(Box::new(error)).is_err() {
            error!("error channel disconnected, dropping error");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::MonitorError;
    use crate::event::{DirectoryEvent, Op};

    fn event(file: &str) -> DirectoryEvent {
        DirectoryEvent::new("/a", "/a", format!("/a/{file}"), vec![Op::Create])
    }

    #[test]
    fn test_emit_blocks_until_a_consumer_receives() {
        let monitor = Arc::new(Monitor::new("/a"));
        let delivered = Arc::new(AtomicBool::new(false));

        let producer = {
            let monitor = Arc::clone(&monitor);
            let delivered = Arc::clone(&delivered);
            thread::spawn(move || {
                monitor.emit(event("f.txt"));
                delivered.store(true, Ordering::SeqCst);
            })
        };

        // No consumer yet, so the producer must stay parked inside emit.
        thread::sleep(Duration::from_millis(100));
        assert!(!delivered.load(Ordering::SeqCst));

        let received = monitor.events().recv().unwrap();
        producer.join().unwrap();
        assert!(delivered.load(Ordering::SeqCst));
        assert_eq!(received.describe(), "[Create] happened on f.txt");
    }

    #[test]
    fn test_throw_blocks_until_a_consumer_receives() {
        let monitor = Arc::new(Monitor::new("/a"));
        let delivered = Arc::new(AtomicBool::new(false));

        let producer = {
            let monitor = Arc::clone(&monitor);
            let delivered = Arc::clone(&delivered);
            thread::spawn(move || {
                monitor.throw(MonitorError::new("boom", "watching /a"));
                delivered.store(true, Ordering::SeqCst);
            })
        };

        thread::sleep(Duration::from_millis(100));
        assert!(!delivered.load(Ordering::SeqCst));

        let fault = monitor.errors().recv().unwrap();
        producer.join().unwrap();
        assert_eq!(
            fault.describe(),
            "An error occurred while handling monitoring events: boom, watching /a"
        );
    }

    #[test]
    fn test_events_are_received_in_emission_order() {
        let monitor = Arc::new(Monitor::new("/a"));
        let events = monitor.events();

        let producer = {
            let monitor = Arc::clone(&monitor);
            thread::spawn(move || {
                for i in 0..10 {
                    monitor.emit(event(&format!("{i}.txt")));
                }
            })
        };

        for i in 0..10 {
            let received = events.recv().unwrap();
            assert_eq!(received.describe(), format!("[Create] happened on {i}.txt"));
        }
        producer.join().unwrap();
    }

    #[test]
    fn test_throw_delivers_the_wrapped_cause() {
        let monitor = Arc::new(Monitor::new("/a"));
        let errors = monitor.errors();

        let producer = {
            let monitor = Arc::clone(&monitor);
            thread::spawn(move || {
                let cause =
                    io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
                monitor.throw(MonitorError::new(cause, "watching /a"));
            })
        };

        let fault = errors.recv().unwrap();
        producer.join().unwrap();
        assert_eq!(fault.cause().to_string(), "permission denied");
        assert_eq!(
            fault.describe(),
            "An error occurred while handling monitoring events: permission denied, watching /a"
        );
    }

    #[test]
    fn test_dropping_the_monitor_disconnects_receivers() {
        let monitor = Monitor::new("/a");
        let events = monitor.events();
        let errors = monitor.errors();
        drop(monitor);

        assert!(events.recv().is_err());
        assert!(errors.recv().is_err());
    }

    #[test]
    fn test_directory_reports_the_watched_root() {
        let monitor = Monitor::new("/watched/root");
        assert_eq!(monitor.directory(), Path::new("/watched/root"));
    }
}

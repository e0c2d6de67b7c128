//! # Vigil Watching
//!
//! Directory-change monitoring core for the Vigil daemon. This crate
//! defines the event and error model a filesystem watcher backend reports
//! through, and the delivery channel consumers drain.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                     Monitor (one per root)                     │
//! ├────────────────────────────────────────────────────────────────┤
//! │  backend ──emit──►   events channel   ──recv──► consumer       │
//! │     │                                                          │
//! │     └────throw──►   errors channel   ──recv──► consumer        │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both channels are unbuffered: [`Monitor::emit`] and [`Monitor::throw`]
//! block the backend until a consumer receives, so backpressure is
//! structural rather than a bounded buffer with a drop policy.
//!
//! The OS-level subscription mechanism is deliberately not part of this
//! crate. A concrete backend owns a [`Monitor`] next to its subscription
//! state, classifies raw notifications into [`Op`] sequences, and drives
//! `emit`/`throw`; anything routing on [`DirEvent::name`] can dispatch the
//! resulting events without knowing their payload shape.

pub mod error;
pub mod event;
pub mod monitor;

pub use error::{Fault, MonitorError};
pub use event::{DirEvent, DirectoryEvent, Op};
pub use monitor::Monitor;

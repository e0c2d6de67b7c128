//! Directory events delivered by a monitor.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of a single filesystem change.
///
/// One observed change may carry several classifications at once, e.g. a
/// rename the OS reports as a remove followed by a create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    /// A file was created.
    Create,

    /// A file's contents or metadata changed.
    Modify,

    /// A file was removed.
    Remove,

    /// A file was renamed.
    Rename,

    /// A change the classifier does not recognize. Carries no label and is
    /// omitted from rendered descriptions.
    Unknown,
}

impl Op {
    /// Label rendered in event descriptions, `None` for [`Op::Unknown`].
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::Create => Some("Create"),
            Self::Modify => Some("Modify"),
            Self::Remove => Some("Remove"),
            Self::Rename => Some("Rename"),
            Self::Unknown => None,
        }
    }
}

impl From<notify::EventKind> for Op {
    fn from(kind: notify::EventKind) -> Self {
        match kind {
            notify::EventKind::Create(_) => Self::Create,
            notify::EventKind::Modify(modify_kind) => match modify_kind {
                notify::event::ModifyKind::Name(_) => Self::Rename,
                _ => Self::Modify,
            },
            notify::EventKind::Remove(_) => Self::Remove,
            _ => Self::Unknown,
        }
    }
}

/// Capabilities an event exposes to consumers and event-bus routing.
///
/// Routing layers dispatch on [`DirEvent::name`] without knowing the
/// concrete payload shape, so a backend carrying extra subscription state
/// can ship its own event type through the same channel.
pub trait DirEvent: Send {
    /// Fixed type discriminator for bus routing.
    fn name(&self) -> &'static str;

    /// When the change was observed.
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Classifications for this change, in the order they were observed.
    fn operations(&self) -> &[Op];

    /// Absolute path of the directory containing the changed file.
    fn directory(&self) -> &Path;

    /// Human-readable description of the change.
    fn describe(&self) -> String;
}

/// A change observed on one file under a watched root.
///
/// Immutable once constructed. The producing backend guarantees that the
/// file and its directory are descendants of the root and that the
/// operation sequence is non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryEvent {
    /// The watched root this event is scoped to.
    root: PathBuf,

    /// Absolute path of the changed file.
    file: PathBuf,

    /// Absolute path of the directory containing the file.
    dir: PathBuf,

    /// Classifications, in observation order.
    ops: Vec<Op>,

    /// When the change was observed.
    timestamp: DateTime<Utc>,
}

impl DirectoryEvent {
    /// Type discriminator reported by every event of this kind.
    pub const NAME: &'static str = "watching.directory";

    /// Create an event for a change observed under `root`.
    pub fn new(
        root: impl Into<PathBuf>,
        dir: impl Into<PathBuf>,
        file: impl Into<PathBuf>,
        ops: Vec<Op>,
    ) -> Self {
        Self {
            root: root.into(),
            file: file.into(),
            dir: dir.into(),
            ops,
            timestamp: Utc::now(),
        }
    }

    /// Raw absolute path of the changed file. Backend-facing.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Raw path of the watched root. Backend-facing.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory path relative to the watched root.
    ///
    /// Falls back to the empty path when no relative path can be computed.
    pub fn relative_dir(&self) -> PathBuf {
        pathdiff::diff_paths(&self.dir, &self.root).unwrap_or_default()
    }

    /// File path relative to the watched root.
    ///
    /// Falls back to the empty path when no relative path can be computed.
    pub fn relative_file(&self) -> PathBuf {
        pathdiff::diff_paths(&self.file, &self.root).unwrap_or_default()
    }
}

impl DirEvent for DirectoryEvent {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn operations(&self) -> &[Op] {
        &self.ops
    }

    fn directory(&self) -> &Path {
        &self.dir
    }

    fn describe(&self) -> String {
        let labels: Vec<&str> = self.ops.iter().copied().filter_map(Op::label).collect();
        format!(
            "[{}] happened on {}",
            labels.join(" "),
            self.relative_file().display()
        )
    }
}

//! Schedule data file and the background writer that keeps it current.

use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::schedule::item::{CalendarItem, ItemKind};
use crate::schedule::model::{Employee, EmployeeStatus, Schedule};
use crate::schedule::recurrence::RecurrenceRule;
use crate::schedule::ticket::{IncidentStatus, Priority, Ticket};

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the data file. A file that does not exist yet gives the demo schedule.
    pub fn load(&self) -> Result<Schedule, StoreError> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no schedule file, starting from demo data");
            return Ok(demo_schedule());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|source| self.io(source))?;
        let schedule: Schedule = serde_json::from_str(&content)?;
        info!(
            path = %self.path.display(),
            items = schedule.items.len(),
            employees = schedule.employees.len(),
            "schedule loaded"
        );
        Ok(schedule)
    }

    /// Write through a temp file so a crash never leaves half a document.
    pub fn save(&self, schedule: &Schedule) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).map_err(|source| self.io(source))?;
            }
        }
        let json = serde_json::to_string_pretty(schedule)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|source| self.io(source))?;
        std::fs::rename(&tmp, &self.path).map_err(|source| self.io(source))?;
        Ok(())
    }

    fn io(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

/// Writes schedule snapshots off the UI thread. Bursts of snapshots are
/// coalesced; only the newest one in a burst is written.
pub struct Persister {
    tx: Option<mpsc::UnboundedSender<Schedule>>,
    handle: Option<JoinHandle<()>>,
    failures: std_mpsc::Receiver<String>,
}

impl Persister {
    pub fn spawn(store: Store, debounce: Duration) -> Result<Self, StoreError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let (fail_tx, failures) = std_mpsc::channel();
        let path = store.path().display().to_string();

        let handle = std::thread::Builder::new()
            .name("persister".into())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        warn!(error = %e, "persister runtime failed to start");
                        let _ = fail_tx.send(e.to_string());
                        return;
                    }
                };
                runtime.block_on(write_loop(store, rx, debounce, fail_tx));
            })
            .map_err(|source| StoreError::Io { path, source })?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
            failures,
        })
    }

    pub fn submit(&self, schedule: Schedule) -> Result<(), StoreError> {
        self.tx
            .as_ref()
            .ok_or(StoreError::Closed)?
            .send(schedule)
            .map_err(|_| StoreError::Closed)
    }

    /// Most recent write failure, if any happened since the last call.
    pub fn take_failure(&self) -> Option<String> {
        self.failures.try_iter().last()
    }

    /// Flush pending snapshots and stop the writer thread.
    pub fn shutdown(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("persister thread panicked");
            }
        }
    }
}

impl Drop for Persister {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn write_loop(
    store: Store,
    mut rx: mpsc::UnboundedReceiver<Schedule>,
    debounce: Duration,
    failures: std_mpsc::Sender<String>,
) {
    while let Some(mut latest) = rx.recv().await {
        loop {
            tokio::select! {
                next = rx.recv() => match next {
                    Some(snapshot) => latest = snapshot,
                    None => break,
                },
                _ = tokio::time::sleep(debounce) => break,
            }
        }
        match store.save(&latest) {
            Ok(()) => info!(path = %store.path().display(), "schedule saved"),
            Err(e) => {
                warn!(error = %e, "schedule save failed");
                let _ = failures.send(e.to_string());
            }
        }
    }
}

/// The station's standing week, used until a data file exists.
pub fn demo_schedule() -> Schedule {
    Schedule {
        items: vec![
            CalendarItem::new("1", "Morning Show", ItemKind::Event, "08:00", "11:00")
                .with_facility("Studio A")
                .with_recurrence(RecurrenceRule::weekdays())
                .with_color("lightblue"),
            CalendarItem::new("s1", "Show Host", ItemKind::Shift, "07:30", "11:30")
                .with_facility("Studio A")
                .attached_to("1")
                .with_staff(&["e1"])
                .with_color("lightgreen"),
            CalendarItem::new("2", "Evening News", ItemKind::Event, "18:00", "19:00")
                .with_facility("Studio B")
                .with_recurrence(RecurrenceRule::weekdays())
                .with_color("purple"),
            CalendarItem::new("s2", "News Anchor", ItemKind::Shift, "17:30", "19:30")
                .with_facility("Studio B")
                .attached_to("2")
                .with_staff(&["e2"])
                .with_color("orange"),
            CalendarItem::new("s3", "Technical Support", ItemKind::Shift, "09:00", "17:00")
                .with_facility("Control Room")
                .with_staff(&["e3"])
                .with_color("yellow"),
        ],
        employees: vec![
            employee("e1", "John Doe", "Presenter", "On Air"),
            employee("e2", "Jane Smith", "News Anchor", "News"),
            employee("e3", "Mike Johnson", "Broadcast Engineer", "Engineering"),
            employee("e4", "Sara Lee", "Producer", "On Air"),
        ],
        time_off: Vec::new(),
        tickets: vec![Ticket::Incident {
            id: "i1".into(),
            title: "Studio B talkback intermittent".into(),
            priority: Priority::Medium,
            status: IncidentStatus::Open,
            facility: Some("Studio B".into()),
        }],
    }
}

fn employee(id: &str, name: &str, position: &str, department: &str) -> Employee {
    Employee {
        id: id.into(),
        name: name.into(),
        position: position.into(),
        department: department.into(),
        status: EmployeeStatus::Active,
    }
}

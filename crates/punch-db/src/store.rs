//! Store facade: the mutation API and subscribable snapshot over the log.
//!
//! [`Store`] is an explicit state owner: it holds the database handle, the
//! derived [`Snapshot`], the lifecycle [`EventBus`], and the snapshot
//! listeners. There is no global state; UI layers receive a reference to the
//! store and subscribe to it.
//!
//! The snapshot is a cache, never the source of truth: it is rebuilt from
//! storage after every mutation and broadcast synchronously to listeners.

use chrono::{DateTime, NaiveDate, Utc};

use punch_core::day::day_bounds;
use punch_core::{EventBus, MarkKind, StoreEvent, TimeMark, Timer, TimerName};

use crate::{Database, DbError};

/// Derived, non-authoritative view of current state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// The timer presumed currently selected, if any.
    pub active_timer: Option<TimerName>,
    /// Whether the active timer is running.
    pub active_timer_running: bool,
    /// All timers, most recently used first.
    pub all_timers: Vec<Timer>,
}

/// Token returned by [`Store::subscribe`], accepted by [`Store::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&Snapshot)>;

/// State owner: snapshot, mutation API, and subscription surface.
pub struct Store {
    db: Database,
    snapshot: Snapshot,
    bus: EventBus,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl Store {
    /// Opens the store at the given path and bootstraps the snapshot.
    pub fn open(path: &std::path::Path) -> Result<Self, DbError> {
        Self::from_database(Database::open(path)?)
    }

    /// Opens an in-memory store. Useful for testing.
    pub fn open_in_memory() -> Result<Self, DbError> {
        Self::from_database(Database::open_in_memory()?)
    }

    fn from_database(db: Database) -> Result<Self, DbError> {
        let mut store = Self {
            db,
            snapshot: Snapshot::default(),
            bus: EventBus::new(),
            listeners: Vec::new(),
            next_listener: 0,
        };
        store.bootstrap()?;
        Ok(store)
    }

    /// Loads timers and resumes the running timer, if any.
    ///
    /// The resume step inspects the single most recent mark across all
    /// timers: a trailing start means that timer is presumed still running.
    /// This relies on the log alternating globally, which writers uphold but
    /// storage does not enforce.
    fn bootstrap(&mut self) -> Result<(), DbError> {
        self.snapshot.all_timers = self.db.list_timers()?;
        if let Some(last) = self.db.last_mark()? {
            if last.kind == MarkKind::Start {
                self.snapshot.active_timer = Some(last.timer);
                self.snapshot.active_timer_running = true;
            }
        }
        self.bus.emit(&StoreEvent::Init);
        self.notify();
        Ok(())
    }

    // ========== Mutations ==========

    /// Creates a timer, or bumps `last_started` if the name exists.
    ///
    /// When nothing is running, the new timer becomes the active one.
    pub fn create_timer(&mut self, title: &TimerName) -> Result<(), DbError> {
        self.create_timer_at(title, Utc::now())
    }

    fn create_timer_at(&mut self, title: &TimerName, now: DateTime<Utc>) -> Result<(), DbError> {
        self.db.upsert_timer(title, now)?;
        tracing::debug!(timer = %title, "timer created");

        if !self.snapshot.active_timer_running {
            self.snapshot.active_timer = Some(title.clone());
        }
        self.snapshot.all_timers = self.db.list_timers()?;
        self.bus.emit(&StoreEvent::TimerCreated {
            timer: title.clone(),
        });
        self.notify();
        Ok(())
    }

    /// Starts a timer, implicitly stopping the running one if it differs.
    ///
    /// Only one timer may run at a time; this is the single place that
    /// invariant is enforced. The implicit end mark and the new start mark
    /// are written in one transaction.
    pub fn start_timer(&mut self, title: &TimerName) -> Result<(), DbError> {
        self.start_timer_at(title, Utc::now())
    }

    fn start_timer_at(&mut self, title: &TimerName, now: DateTime<Utc>) -> Result<(), DbError> {
        let implicit_stop = match (&self.snapshot.active_timer, self.snapshot.active_timer_running)
        {
            (Some(active), true) if active != title => Some(active.clone()),
            _ => None,
        };

        self.db.switch_timer(implicit_stop.as_ref(), title, now)?;
        tracing::debug!(timer = %title, stopped = ?implicit_stop, "timer started");

        self.snapshot.active_timer = Some(title.clone());
        self.snapshot.active_timer_running = true;
        self.snapshot.all_timers = self.db.list_timers()?;

        if let Some(stopped) = implicit_stop {
            self.bus.emit(&StoreEvent::TimerStopped { timer: stopped });
        }
        self.bus.emit(&StoreEvent::TimerStarted {
            timer: title.clone(),
        });
        self.notify();
        Ok(())
    }

    /// Appends an end mark for the timer.
    ///
    /// No check that `title` is the running timer: stopping a timer that
    /// never started still appends an end mark, and the reconstruction
    /// tolerates the resulting log.
    pub fn stop_timer(&mut self, title: &TimerName) -> Result<(), DbError> {
        self.stop_timer_at(title, Utc::now())
    }

    fn stop_timer_at(&mut self, title: &TimerName, now: DateTime<Utc>) -> Result<(), DbError> {
        self.db.insert_mark(&TimeMark::end(title.clone(), now))?;
        tracing::debug!(timer = %title, "timer stopped");

        self.snapshot.active_timer_running = false;
        self.bus.emit(&StoreEvent::TimerStopped {
            timer: title.clone(),
        });
        self.notify();
        Ok(())
    }

    // ========== Queries ==========

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Lists all timers, most recently used first.
    pub fn all_timers(&self) -> Result<Vec<Timer>, DbError> {
        self.db.list_timers()
    }

    /// Returns one timer's full mark log, chronological.
    pub fn timer_marks(&self, title: &TimerName) -> Result<Vec<TimeMark>, DbError> {
        self.db.marks_for_timer(title)
    }

    /// Returns the most recent mark for one timer.
    pub fn last_mark(&self, title: &TimerName) -> Result<Option<TimeMark>, DbError> {
        self.db.last_mark_for_timer(title)
    }

    /// Returns all marks falling on the given local calendar day.
    pub fn marks_at(&self, date: NaiveDate) -> Result<Vec<TimeMark>, DbError> {
        let (start, end) = day_bounds(date);
        self.db.marks_in_range(start, end)
    }

    // ========== Subscriptions ==========

    /// Registers a snapshot listener.
    ///
    /// The listener is invoked synchronously after each snapshot mutation
    /// with the full current snapshot, not a diff.
    pub fn subscribe(&mut self, listener: impl FnMut(&Snapshot) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a snapshot listener. Returns false if it was not found.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// The lifecycle event bus.
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    fn notify(&mut self) {
        for (_, listener) in &mut self.listeners {
            listener(&self.snapshot);
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("snapshot", &self.snapshot)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

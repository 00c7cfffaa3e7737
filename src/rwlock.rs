//! # Writer-priority read-write lock
//!
//! A read-write lock built from one [`Mutex`] and two [`Condvar`]s instead of
//! atomics and futex calls. Any number of readers may hold the lock together,
//! a writer holds it alone, and a waiting writer blocks new readers from
//! starting. That last rule is what makes the policy writer-priority: an
//! unbroken stream of arriving readers cannot keep a writer waiting forever.
//!
//! The lock guards no data of its own. It only coordinates access to a
//! resource owned elsewhere, so the guards are empty tokens whose lifetime
//! marks the access window.
//!
//! All four counters live in a single [`LockState`] behind one mutex, and the
//! "may I proceed" check plus the active-counter increment happen under the
//! same mutex hold. Splitting them into two critical sections would let two
//! threads both see a green light and both walk through.
//!
//! Wake discipline on release:
//! - last reader out, writers waiting: signal one writer
//! - writer out, writers waiting: signal one writer
//! - writer out, only readers waiting: broadcast the whole reader cohort
//!
//! Readers never conflict with each other, so waking them all at once is safe
//! and skips the chain of one-by-one wake-ups. Among waiting writers, service
//! order is whatever order the condvar wakes them in.

use std::sync::{Condvar, Mutex};

/// The four counters that make up the whole lock state. They move as one
/// guarded unit: no counter is read or written without holding the mutex.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LockState {
    /// readers currently inside the read section
    pub active_readers: usize,
    /// writers currently inside the write section, 0 or 1
    pub active_writers: usize,
    /// readers blocked in [`RwLock::acquire_read`]
    pub waiting_readers: usize,
    /// writers blocked in [`RwLock::acquire_write`]
    pub waiting_writers: usize,
}

impl LockState {
    /// True when nobody holds or waits for the lock.
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

pub struct RwLock {
    state: Mutex<LockState>,
    ok_to_read: Condvar,
    ok_to_write: Condvar,
}

impl RwLock {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LockState::default()),
            ok_to_read: Condvar::new(),
            ok_to_write: Condvar::new(),
        }
    }

    /// Block until shared access is granted.
    ///
    /// Waits while a writer is active *or waiting* - the waiting half is the
    /// priority rule. The wait sits in a loop because a condvar wake-up is a
    /// hint, not a grant: the predicate must be re-checked after every wake.
    pub fn acquire_read(&self) {
        let mut s = self.state.lock().unwrap();
        while s.active_writers + s.waiting_writers > 0 {
            s.waiting_readers += 1;
            s = self.ok_to_read.wait(s).unwrap();
            s.waiting_readers -= 1;
        }
        // still holding the mutex, so nothing can slip in between the
        // predicate check above and this increment
        s.active_readers += 1;
        debug_assert_eq!(0, s.active_writers);
    }

    /// Release shared access. The last reader out wakes one waiting writer if
    /// there is one; waking more would be wasted, only one writer can enter.
    pub fn release_read(&self) {
        let mut s = self.state.lock().unwrap();
        s.active_readers -= 1;
        if s.active_readers == 0 && s.waiting_writers > 0 {
            self.ok_to_write.notify_one();
        }
    }

    /// Block until exclusive access is granted.
    ///
    /// Only *active* parties appear in the predicate: other waiting writers
    /// are serialized by the one-at-a-time signal on release, not here.
    pub fn acquire_write(&self) {
        let mut s = self.state.lock().unwrap();
        while s.active_writers + s.active_readers > 0 {
            s.waiting_writers += 1;
            s = self.ok_to_write.wait(s).unwrap();
            s.waiting_writers -= 1;
        }
        s.active_writers += 1;
        debug_assert_eq!(1, s.active_writers);
        debug_assert_eq!(0, s.active_readers);
    }

    /// Release exclusive access. A waiting writer is preferred over waiting
    /// readers; only when no writer waits does the reader cohort get
    /// broadcast in. At most one of the two wake-ups fires.
    pub fn release_write(&self) {
        let mut s = self.state.lock().unwrap();
        s.active_writers -= 1;
        if s.waiting_writers > 0 {
            self.ok_to_write.notify_one();
        } else if s.waiting_readers > 0 {
            self.ok_to_read.notify_all();
        }
    }

    /// Shared access as an RAII guard: the read section ends when the guard
    /// drops, on every exit path including a panicking caller.
    pub fn read(&self) -> ReadGuard<'_> {
        self.acquire_read();
        ReadGuard { lock: self }
    }

    /// Exclusive access as an RAII guard.
    pub fn write(&self) -> WriteGuard<'_> {
        self.acquire_write();
        WriteGuard { lock: self }
    }

    /// A point-in-time copy of the counters, for diagnostics and tests.
    pub fn snapshot(&self) -> LockState {
        *self.state.lock().unwrap()
    }
}

pub struct ReadGuard<'a> {
    lock: &'a RwLock,
}

impl Drop for ReadGuard<'_> {
    fn drop(&mut self) {
        self.lock.release_read();
    }
}

pub struct WriteGuard<'a> {
    lock: &'a RwLock,
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.lock.release_write();
    }
}

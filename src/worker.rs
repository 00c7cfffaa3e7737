//! Worker side of the harness: a reader or writer task that takes the lock
//! in its mode, runs an opaque payload inside the held section, and releases
//! on the way out.

use log::info;
use strum_macros::{Display, EnumString};

use crate::delay::Delay;
use crate::rwlock::RwLock;

/// Which side of the lock a worker sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Reader,
    Writer,
}

/// Everything a spawned worker needs to know about itself. Moved by value
/// into the worker's thread, so no argument-encoding tricks are needed.
#[derive(Clone, Copy, Debug)]
pub struct WorkerContext {
    pub role: Role,
    /// numeric identity, only used in diagnostics
    pub id: usize,
}

pub struct Worker<'a> {
    lock: &'a RwLock,
    ctx: WorkerContext,
    delay: Delay,
}

impl<'a> Worker<'a> {
    pub fn new(lock: &'a RwLock, ctx: WorkerContext, delay: Delay) -> Self {
        Self { lock, ctx, delay }
    }

    /// One full acquire/payload/release cycle. The guard ties the release to
    /// scope exit, so a panicking payload still lets go of the lock.
    pub fn run(&self, payload: impl FnOnce(&WorkerContext)) {
        let WorkerContext { role, id } = self.ctx;
        info!("{role} {id} created");
        match role {
            Role::Reader => {
                let _guard = self.lock.read();
                info!("reader {id} begin reading");
                self.delay.pause();
                payload(&self.ctx);
                info!("reader {id} finished reading");
            }
            Role::Writer => {
                let _guard = self.lock.write();
                info!("writer {id} begin writing");
                self.delay.pause();
                payload(&self.ctx);
                info!("writer {id} finished writing");
            }
        }
    }
}

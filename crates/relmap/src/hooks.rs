use std::collections::HashMap;
use std::rc::Rc;

use crate::record::Record;
use crate::value::Value;

/// A deferred write-back action run against a record after a mutation
/// completes. Closures are scoped to one insert call; the queues are cleared
/// once dispatched.
pub type HookClosure = Rc<dyn Fn(&mut dyn Record)>;

/// Identity of a record instance, used to key deferred after-hooks for
/// replay at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BeanKey(usize);

impl BeanKey {
    /// Derives the key from the record's address. Valid only while the
    /// caller keeps the record at the same location.
    #[must_use]
    pub fn of(record: &dyn Record) -> Self {
        Self(std::ptr::from_ref(record).cast::<()>() as usize)
    }
}

/// Pending after-hooks for one record: the closures to replay plus whether
/// the record's own after-insert capability still needs invoking.
struct Deferred {
    closures: Vec<HookClosure>,
    invoke_capability: bool,
}

/// Executes before/after mutation hooks in registration order, deferring
/// after-hooks while a transaction is pending.
#[derive(Default)]
pub struct HookRunner {
    before: Vec<HookClosure>,
    after: Vec<HookClosure>,
    deferred: HashMap<BeanKey, Deferred>,
}

impl HookRunner {
    /// Registers a closure to run before the next insert executes.
    pub fn push_before(&mut self, closure: HookClosure) {
        self.before.push(closure);
    }

    /// Registers a closure to run after the next insert executes.
    pub fn push_after(&mut self, closure: HookClosure) {
        self.after.push(closure);
    }

    /// Registers an after-closure that stamps `value` into `column`,
    /// reporting (but not propagating) write-back failures.
    pub(crate) fn push_after_set(&mut self, column: String, value: Value) {
        self.after.push(Rc::new(move |record: &mut dyn Record| {
            if let Err(err) = record.set(&column, value.clone()) {
                tracing::warn!(column, %err, "post-insert write-back skipped");
            }
        }));
    }

    /// Runs the before queue against one record and clears it.
    pub fn run_before(&mut self, record: &mut dyn Record) {
        self.dispatch_before(record);
        self.before.clear();
    }

    /// Runs the before queue against one record without clearing it, for
    /// batch paths that share the queue across every element.
    pub(crate) fn dispatch_before(&self, record: &mut dyn Record) {
        for closure in &self.before {
            closure(record);
        }
        if record.hook_capability().before_insert {
            record.before_insert();
        }
    }

    pub(crate) fn clear_before(&mut self) {
        self.before.clear();
    }

    /// Dispatches the after queue for one record and clears it.
    ///
    /// In autocommit mode the closures and the record's after-insert
    /// capability run immediately. Otherwise they are recorded against the
    /// record's identity for replay at commit time.
    pub fn run_after(&mut self, record: &mut dyn Record, autocommit: bool) {
        self.dispatch_after(record, autocommit);
        self.after.clear();
    }

    /// Dispatches the after queue for one record without clearing it.
    pub(crate) fn dispatch_after(&mut self, record: &mut dyn Record, autocommit: bool) {
        let capability = record.hook_capability().after_insert;

        if autocommit {
            for closure in &self.after {
                closure(record);
            }
            if capability {
                record.after_insert();
            }
            return;
        }

        if self.after.is_empty() && !capability {
            return;
        }

        let entry = self
            .deferred
            .entry(BeanKey::of(record))
            .or_insert_with(|| Deferred {
                closures: Vec::new(),
                invoke_capability: capability,
            });
        entry.closures.extend(self.after.iter().map(Rc::clone));
    }

    pub(crate) fn clear_after(&mut self) {
        self.after.clear();
    }

    /// Replays any after-hooks deferred for `record`, typically at commit.
    /// Does nothing when no hooks are pending for this record.
    pub fn replay_deferred(&mut self, record: &mut dyn Record) {
        let Some(pending) = self.deferred.remove(&BeanKey::of(record)) else {
            return;
        };
        for closure in pending.closures {
            closure(record);
        }
        if pending.invoke_capability {
            record.after_insert();
        }
    }

    /// Number of records with deferred after-hooks pending.
    #[must_use]
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }
}

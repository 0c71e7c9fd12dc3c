//! Per-scope accounting of emulator reads.
//!
//! Every read performed through [`crate::bus::MemoryClient`] is charged to
//! all currently open scopes on the calling thread. Scopes nest; only the
//! outermost scope emits a summary log line when it closes, so a full
//! snapshot build produces exactly one line no matter how many decoders ran.

use std::cell::RefCell;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadCounters {
    /// Individual bridge calls (one `read_ranges` batch counts as one call).
    pub calls: u64,
    /// Total number of `(addr, len)` ranges requested.
    pub ranges: u64,
    /// Bytes requested across all ranges.
    pub bytes_requested: u64,
    /// Bytes actually returned (short reads return less).
    pub bytes_returned: u64,
}

impl ReadCounters {
    fn absorb(&mut self, calls: u64, ranges: u64, requested: u64, returned: u64) {
        self.calls += calls;
        self.ranges += ranges;
        self.bytes_requested += requested;
        self.bytes_returned += returned;
    }
}

struct ScopeData {
    label: String,
    counters: ReadCounters,
}

thread_local! {
    static SCOPES: RefCell<Vec<ScopeData>> = const { RefCell::new(Vec::new()) };
}

/// Open a metrics scope for the current thread. Dropped in reverse order of
/// creation; dropping out of order is a programming error and panics in
/// debug builds.
pub fn scope(label: &str) -> ScopeGuard {
    SCOPES.with(|stack| {
        stack.borrow_mut().push(ScopeData {
            label: label.to_owned(),
            counters: ReadCounters::default(),
        });
    });
    ScopeGuard {
        label: label.to_owned(),
    }
}

/// Charge a read to every open scope on this thread.
pub(crate) fn record_read(ranges: u64, requested: u64, returned: u64) {
    SCOPES.with(|stack| {
        for scope in stack.borrow_mut().iter_mut() {
            scope.counters.absorb(1, ranges, requested, returned);
        }
    });
}

/// Counters of the innermost open scope, if any. Used by the state builder
/// to attach per-step tallies to the benchmarking trailer.
#[must_use]
pub fn current_counters() -> Option<ReadCounters> {
    SCOPES.with(|stack| stack.borrow().last().map(|s| s.counters))
}

pub struct ScopeGuard {
    label: String,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        let (popped, outermost) = SCOPES.with(|stack| {
            let mut stack = stack.borrow_mut();
            let popped = stack.pop();
            (popped, stack.is_empty())
        });
        let Some(popped) = popped else {
            debug_assert!(false, "metrics scope stack underflow");
            return;
        };
        debug_assert_eq!(popped.label, self.label, "metrics scopes dropped out of order");
        if outermost {
            let c = popped.counters;
            tracing::debug!(
                target: "bridge::metrics",
                scope = %popped.label,
                calls = c.calls,
                ranges = c.ranges,
                bytes_requested = c.bytes_requested,
                bytes_returned = c.bytes_returned,
                "memory client scope closed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn nested_scopes_both_account_reads() {
        let outer = scope("outer");
        record_read(2, 100, 100);
        {
            let _inner = scope("inner");
            record_read(1, 8, 6);
            let inner_counters = current_counters().unwrap();
            assert_eq!(inner_counters.calls, 1);
            assert_eq!(inner_counters.ranges, 1);
            assert_eq!(inner_counters.bytes_returned, 6);
        }
        let outer_counters = current_counters().unwrap();
        assert_eq!(outer_counters.calls, 2);
        assert_eq!(outer_counters.ranges, 3);
        assert_eq!(outer_counters.bytes_requested, 108);
        assert_eq!(outer_counters.bytes_returned, 106);
        drop(outer);
        assert_eq!(current_counters(), None);
    }
}

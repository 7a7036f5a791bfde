use serde_json::Value;
use std::cell::RefCell;

// operations run their callables on the calling thread, so a per-thread log
// keeps parallel tests apart
thread_local! {
    static VISITS: RefCell<Vec<Value>> = RefCell::new(vec![]);
}

pub fn record(value: Value) {
    VISITS.with(|v| v.borrow_mut().push(value));
}

/// Everything recorded on this thread so far, clearing the log.
pub fn take() -> Vec<Value> {
    VISITS.with(|v| v.take())
}

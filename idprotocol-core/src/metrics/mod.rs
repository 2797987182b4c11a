//! Metrics collection for the ID pipeline

use metrics::{counter, describe_counter};

/// Initialize metrics with descriptions
pub fn init_metrics() {
    describe_counter!("id.registration.opened", "Registration forms opened");
    describe_counter!(
        "id.registration.committed",
        "Registrations committed to the profile store"
    );
    describe_counter!(
        "id.registration.rejected",
        "Registrations rejected by validation"
    );
    describe_counter!(
        "id.registration.stale",
        "Finalize passes that found no session"
    );
    describe_counter!("id.display.self", "Records displayed to their holder");
    describe_counter!("id.display.others", "Record displays fanned out to nearby players");
    describe_counter!("id.records.deleted", "Committed records deleted");
}

/// Record a counter metric
pub fn record_counter(name: &'static str, value: u64) {
    counter!(name).increment(value);
}

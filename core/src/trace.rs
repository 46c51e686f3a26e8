//! Plan-stage trace hooks, compiled out unless the `tracing` feature is on.

/// Emits a debug event for a query-planning stage with the number of items
/// it produced. Expands to nothing without the `tracing` feature.
#[cfg(feature = "tracing")]
#[macro_export]
macro_rules! crud_trace_plan {
    ($stage:expr, $count:expr) => {{
        ::tracing::debug!(stage = $stage, count = $count, "crudkit.plan");
    }};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! crud_trace_plan {
    ($stage:expr, $count:expr) => {{
        let _ = ($stage, $count);
    }};
}

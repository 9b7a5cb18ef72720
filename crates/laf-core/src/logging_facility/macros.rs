//! Operation boundary macros
//!
//! Every lifecycle operation (registry init, pool creation, function
//! invocation) logs a `start` event and then exactly one of `end` or
//! `end_error`. Events carry the same `component` names as `Logger`, so one
//! filter on `component` selects both the free-form lines and the operation
//! boundaries of a subsystem. Without an explicit `component = ...` the
//! events belong to the server component.

#[doc(hidden)]
#[macro_export]
macro_rules! __laf_op_event {
    ($level:ident, $component:expr, $op:expr, $event:expr $(, $($field:tt)*)?) => {
        $crate::logging_facility::__tracing::$level!(
            component = $component,
            op = $op,
            event = $event,
            $($($field)*)?
        )
    };
}

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use laf_core::log_op_start;
/// log_op_start!("registry_init");
/// log_op_start!(component = "db", "create_accessor", database = "sys");
/// ```
#[macro_export]
macro_rules! log_op_start {
    (component = $component:expr, $op:expr $(, $($field:tt)*)?) => {
        $crate::__laf_op_event!(
            info,
            $component,
            $op,
            $crate::logging_facility::schema::EVENT_START
            $(, $($field)*)?
        )
    };
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::log_op_start!(
            component = $crate::logging_facility::schema::COMPONENT_SERVER,
            $op
            $(, $($field)*)?
        )
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use laf_core::log_op_end;
/// log_op_end!("registry_init", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    (component = $component:expr, $op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__laf_op_event!(
            info,
            $component,
            $op,
            $crate::logging_facility::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::log_op_end!(
            component = $crate::logging_facility::schema::COMPONENT_SERVER,
            $op,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Log an operation that failed
///
/// Accepts anything convertible into `ExError` and records its kind and
/// stable code.
///
/// # Example
///
/// ```
/// # use laf_core::log_op_error;
/// # use laf_core::errors::ResourceError;
/// let err = ResourceError::AccessorEmpty { slot: "app_accessor" };
/// log_op_error!("create_app_db", err, duration_ms = 0);
/// ```
#[macro_export]
macro_rules! log_op_error {
    (component = $component:expr, $op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = ::core::convert::Into::into($err);
        $crate::__laf_op_event!(
            error,
            $component,
            $op,
            $crate::logging_facility::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code()
            $(, $($field)*)?
        )
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::log_op_error!(
            component = $crate::logging_facility::schema::COMPONENT_SERVER,
            $op,
            $err,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

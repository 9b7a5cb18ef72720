//! Execution result payload
//!
//! What the sandbox harness sends back after running a user function: the
//! returned data (or error text), the captured console lines and the time
//! the run took.

use crate::console::FunctionConsole;
use crate::errors::{ExError, ExErrorKind};
use crate::{log_op_end, log_op_error, log_op_start};
use laf_core_types::schema::COMPONENT_FUNCTION;
use laf_core_types::ExecutionId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResult {
    pub execution_id: ExecutionId,
    pub data: Value,
    pub logs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall time of the run in milliseconds
    pub time_usage: u64,
}

impl FunctionResult {
    /// Result of a function that returned normally
    pub fn success(
        execution_id: ExecutionId,
        data: Value,
        console: FunctionConsole,
        elapsed: Duration,
    ) -> Self {
        Self {
            execution_id,
            data,
            logs: console.into_logs(),
            error: None,
            time_usage: elapsed.as_millis() as u64,
        }
    }

    /// Result of a function that failed; the lines logged before the
    /// failure are kept
    pub fn failure(
        execution_id: ExecutionId,
        error: impl fmt::Display,
        console: FunctionConsole,
        elapsed: Duration,
    ) -> Self {
        Self {
            execution_id,
            data: Value::Null,
            logs: console.into_logs(),
            error: Some(error.to_string()),
            time_usage: elapsed.as_millis() as u64,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Run `f` with a fresh console and package what it produced
///
/// The console lives exactly as long as the run; its lines move into the
/// returned payload.
pub fn invoke<F, E>(execution_id: ExecutionId, f: F) -> FunctionResult
where
    F: FnOnce(&mut FunctionConsole) -> std::result::Result<Value, E>,
    E: fmt::Display,
{
    invoke_with_console(execution_id, FunctionConsole::new(), f)
}

/// `invoke` with a caller-supplied console (e.g. one with a fixed clock)
pub fn invoke_with_console<F, E>(
    execution_id: ExecutionId,
    mut console: FunctionConsole,
    f: F,
) -> FunctionResult
where
    F: FnOnce(&mut FunctionConsole) -> std::result::Result<Value, E>,
    E: fmt::Display,
{
    let started = Instant::now();
    log_op_start!(
        component = COMPONENT_FUNCTION,
        "invoke_function",
        execution_id = %execution_id
    );

    let outcome = f(&mut console);
    let elapsed = started.elapsed();
    let duration_ms = elapsed.as_millis() as u64;

    match outcome {
        Ok(data) => {
            log_op_end!(
                component = COMPONENT_FUNCTION,
                "invoke_function",
                duration_ms = duration_ms,
                execution_id = %execution_id,
                lines = console.len()
            );
            FunctionResult::success(execution_id, data, console, elapsed)
        }
        Err(err) => {
            let message = err.to_string();
            let failure = ExError::new(ExErrorKind::Internal)
                .with_op("invoke_function")
                .with_message(message.clone());
            log_op_error!(
                component = COMPONENT_FUNCTION,
                "invoke_function",
                failure,
                duration_ms = duration_ms,
                execution_id = %execution_id
            );
            FunctionResult::failure(execution_id, message, console, elapsed)
        }
    }
}

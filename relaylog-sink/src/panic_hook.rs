//! Crash reporting through the panic hook
//!
//! Records a panic as an error entry (message plus backtrace) in a shared
//! batcher and flushes it before the previously installed hook runs.

use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::{self, PanicHookInfo};
use std::sync::{Arc, Mutex, TryLockError};

use crate::batcher::RemoteLogBatcher;

/// Chains a panic hook that reports every panic through `batcher`
///
/// If another thread holds the batcher when a panic happens, the report is
/// skipped rather than waiting on the lock.
pub fn install_panic_hook(batcher: Arc<Mutex<RemoteLogBatcher>>) {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        report_panic(&batcher, info);
        previous(info);
    }));
}

fn report_panic(batcher: &Mutex<RemoteLogBatcher>, info: &PanicHookInfo<'_>) {
    let mut batcher = match batcher.try_lock() {
        Ok(guard) => guard,
        Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        Err(TryLockError::WouldBlock) => return,
    };

    let frames = backtrace_frames(&Backtrace::force_capture().to_string());
    batcher.record_error(describe_panic(info), &frames);
    batcher.flush();
}

fn describe_panic(info: &PanicHookInfo<'_>) -> String {
    let message = panic_message(info.payload());
    match info.location() {
        Some(location) => format!(
            "panicked at {}:{}:{}: {}",
            location.file(),
            location.line(),
            location.column(),
            message
        ),
        None => format!("panicked: {}", message),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "Box<dyn Any>"
    }
}

fn backtrace_frames(rendered: &str) -> Vec<String> {
    rendered
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

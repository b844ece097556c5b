//! Stack dumps via `std::backtrace`.

use corelib::StackDumper;
use std::backtrace::Backtrace;

/// Captures the stack of the calling thread.
///
/// The standard library offers no portable way to walk other threads, so the
/// dump covers the thread serving the request.
#[derive(Clone, Copy, Debug, Default)]
pub struct BacktraceDumper;

impl StackDumper for BacktraceDumper {
    fn current_global_stack(&self) -> String {
        let thread = std::thread::current();
        format!(
            "thread '{}' ({:?}):\n{}",
            thread.name().unwrap_or("<unnamed>"),
            thread.id(),
            Backtrace::force_capture()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_names_the_thread() {
        let dump = std::thread::Builder::new()
            .name("stack-dumper-test".to_string())
            .spawn(|| BacktraceDumper.current_global_stack())
            .unwrap()
            .join()
            .unwrap();
        assert!(dump.starts_with("thread 'stack-dumper-test'"));
    }
}

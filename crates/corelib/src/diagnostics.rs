//! Runtime diagnostics contracts: profiling and stack dumps.

use crate::error::Result;
use std::path::Path;

/// The profiling facility of the running process.
///
/// CPU profiling is continuous and must be matched start/stop. Heap and lock
/// dumps are instantaneous and independent of CPU profiling.
pub trait ProfilingBackend: Send + Sync + 'static {
    /// Open `path` and begin continuous CPU sampling into it.
    fn start_cpu(&self, path: &Path) -> Result<()>;

    /// Stop sampling, flush and close the CPU profile.
    ///
    /// The profile is released even when this returns an error; the error
    /// only reports that the output may be incomplete. Fails with
    /// `NotInProgress` when nothing is running.
    fn stop_cpu(&self) -> Result<()>;

    /// Write one heap snapshot to `path`.
    fn dump_heap(&self, path: &Path) -> Result<()>;

    /// Write one lock-contention snapshot to `path`.
    fn dump_lock_contention(&self, path: &Path) -> Result<()>;
}

/// Produces a human-readable stack dump of the process.
pub trait StackDumper: Send + Sync + 'static {
    fn current_global_stack(&self) -> String;
}

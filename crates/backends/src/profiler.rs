//! Process profiler.
//!
//! - CPU: a background sampler thread appends one line per interval with the
//!   process CPU usage and resident memory, until stopped.
//! - Heap: one snapshot of process and system memory.
//! - Locks: the `parking_lot` deadlock detector's report. This lists cycles of
//!   threads blocked on each other's `parking_lot` locks, not wait times, so a
//!   healthy process reports zero cycles. The detector needs the
//!   `deadlock_detection` feature, enabled by this crate only. Cargo unifies
//!   features, so every `parking_lot` lock in a binary linking this crate pays
//!   the detector's per-acquire bookkeeping.
//!
//! All outputs are tab-separated text with a `#` header line.

use chrono::Utc;
use corelib::{Error, ProfilingBackend, Result};
use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;
use std::time::Duration;
use sysinfo::{Pid, ProcessExt, System, SystemExt};
use tracing::{debug, warn};

pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

struct CpuSession {
    stop: Sender<()>,
    sampler: JoinHandle<io::Result<u64>>,
    path: PathBuf,
}

impl CpuSession {
    /// Signal the sampler, wait for it, and report how many samples it wrote.
    fn finish(self) -> Result<u64> {
        // A closed channel also stops the sampler.
        let _ = self.stop.send(());
        let samples = self
            .sampler
            .join()
            .map_err(|_| Error::collaborator("cpu sampler thread panicked"))??;
        debug!(path = %self.path.display(), samples, "cpu sampler finished");
        Ok(samples)
    }
}

pub struct ProcessProfiler {
    interval: Duration,
    session: Mutex<Option<CpuSession>>,
}

impl Default for ProcessProfiler {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_INTERVAL)
    }
}

impl ProcessProfiler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            session: Mutex::new(None),
        }
    }

    pub fn is_sampling(&self) -> bool {
        self.session.lock().is_some()
    }
}

fn current_pid() -> Option<Pid> {
    sysinfo::get_current_pid().ok()
}

/// (cpu %, resident bytes, virtual bytes) of this process.
fn process_usage(sys: &mut System, pid: Option<Pid>) -> (f32, u64, u64) {
    let Some(pid) = pid else {
        return (0.0, 0, 0);
    };
    if !sys.refresh_process(pid) {
        return (0.0, 0, 0);
    }
    sys.process(pid)
        .map(|p| (p.cpu_usage(), p.memory(), p.virtual_memory()))
        .unwrap_or((0.0, 0, 0))
}

fn sample_loop(mut out: BufWriter<File>, stop: Receiver<()>, interval: Duration) -> io::Result<u64> {
    let pid = current_pid();
    let mut sys = System::new();
    let mut samples = 0u64;

    loop {
        match stop.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
        let (cpu, resident, _) = process_usage(&mut sys, pid);
        writeln!(out, "{}\t{:.2}\t{}", Utc::now().to_rfc3339(), cpu, resident)?;
        samples += 1;
    }

    out.flush()?;
    Ok(samples)
}

impl ProfilingBackend for ProcessProfiler {
    fn start_cpu(&self, path: &Path) -> Result<()> {
        let mut session = self.session.lock();
        if session.is_some() {
            return Err(Error::AlreadyInProgress);
        }

        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "# cpu profile started {}", Utc::now().to_rfc3339())?;
        writeln!(out, "# timestamp\tcpu_percent\tresident_bytes")?;

        let (stop, stopped) = channel::bounded(1);
        let interval = self.interval;
        let sampler = std::thread::Builder::new()
            .name("cpu-profiler".to_string())
            .spawn(move || sample_loop(out, stopped, interval))?;

        *session = Some(CpuSession {
            stop,
            sampler,
            path: path.to_path_buf(),
        });
        Ok(())
    }

    // The session is taken before it is finished, so a failed flush still
    // leaves the profiler free for the next start.
    fn stop_cpu(&self) -> Result<()> {
        let session = self.session.lock().take().ok_or(Error::NotInProgress)?;
        session.finish().map(|_| ())
    }

    fn dump_heap(&self, path: &Path) -> Result<()> {
        let mut sys = System::new();
        sys.refresh_memory();
        let (_, resident, virtual_bytes) = process_usage(&mut sys, current_pid());

        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "# heap snapshot {}", Utc::now().to_rfc3339())?;
        writeln!(out, "process_resident_bytes\t{resident}")?;
        writeln!(out, "process_virtual_bytes\t{virtual_bytes}")?;
        writeln!(out, "system_total_bytes\t{}", sys.total_memory())?;
        writeln!(out, "system_used_bytes\t{}", sys.used_memory())?;
        out.flush()?;
        Ok(())
    }

    fn dump_lock_contention(&self, path: &Path) -> Result<()> {
        let cycles = parking_lot::deadlock::check_deadlock();

        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "# lock contention snapshot {}", Utc::now().to_rfc3339())?;
        writeln!(out, "deadlocked_cycles\t{}", cycles.len())?;
        for (i, cycle) in cycles.iter().enumerate() {
            for thread in cycle {
                writeln!(out, "# cycle {i} thread {:?}", thread.thread_id())?;
                writeln!(out, "{:?}", thread.backtrace())?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

impl Drop for ProcessProfiler {
    fn drop(&mut self) {
        if let Some(session) = self.session.get_mut().take() {
            if let Err(err) = session.finish() {
                warn!(error = %err, "cpu profile did not close cleanly");
            }
        }
    }
}

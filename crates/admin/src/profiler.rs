//! CPU profiler state machine.
//!
//! # States
//!
//! ```text
//!            start_cpu_profiler(path)
//!   Idle  ─────────────────────────────▶  CpuProfiling { path }
//!     ▲                                        │
//!     └────────────── stop_cpu_profiler() ─────┘
//! ```
//!
//! - `start` while `CpuProfiling` fails with `AlreadyInProgress`
//! - `stop` while `Idle` fails with `NotInProgress`
//! - a failed backend start leaves the state `Idle`
//! - a failed backend stop still ends in `Idle`: the backend releases the
//!   profile either way and the error only reports lost output
//!
//! Heap and lock snapshots are stateless and never take the state lock, so
//! they succeed in either state.

use corelib::{Error, ProfilingBackend, Result};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Current profiler activity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProfilerState {
    Idle,
    CpuProfiling { path: PathBuf },
}

impl ProfilerState {
    pub fn is_profiling(&self) -> bool {
        matches!(self, ProfilerState::CpuProfiling { .. })
    }
}

/// Guards the profiling backend behind the two-state machine.
///
/// The backend call for a transition runs while the state lock is held, which
/// makes `start` linearizable: between a successful start and its matching
/// stop no other start can succeed.
pub struct ProfilerController {
    backend: Arc<dyn ProfilingBackend>,
    state: Mutex<ProfilerState>,
}

impl ProfilerController {
    pub fn new(backend: Arc<dyn ProfilingBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(ProfilerState::Idle),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ProfilerState {
        self.state.lock().clone()
    }

    /// Idle → CpuProfiling.
    pub fn start_cpu_profiler(&self, path: &Path) -> Result<()> {
        let mut state = self.state.lock();
        if let ProfilerState::CpuProfiling { path: current } = &*state {
            warn!(current = %current.display(), "cpu profile start rejected, already running");
            return Err(Error::AlreadyInProgress);
        }

        self.backend.start_cpu(path)?;
        *state = ProfilerState::CpuProfiling {
            path: path.to_path_buf(),
        };
        info!(path = %path.display(), "cpu profile started");
        Ok(())
    }

    /// CpuProfiling → Idle.
    pub fn stop_cpu_profiler(&self) -> Result<()> {
        let mut state = self.state.lock();
        let path = match &*state {
            ProfilerState::Idle => return Err(Error::NotInProgress),
            ProfilerState::CpuProfiling { path } => path.clone(),
        };

        let stopped = self.backend.stop_cpu();
        *state = ProfilerState::Idle;
        match &stopped {
            Ok(()) => info!(path = %path.display(), "cpu profile stopped"),
            Err(err) => warn!(path = %path.display(), error = %err, "cpu profile stopped with errors"),
        }
        stopped
    }

    pub fn memory_profile(&self, path: &Path) -> Result<()> {
        self.backend.dump_heap(path)
    }

    pub fn lock_profile(&self, path: &Path) -> Result<()> {
        self.backend.dump_lock_contention(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Barrier;

    /// Counts calls and fails on demand.
    #[derive(Default)]
    struct CountingBackend {
        starts: AtomicUsize,
        stops: AtomicUsize,
        fail_start: AtomicBool,
        fail_stop: AtomicBool,
    }

    impl ProfilingBackend for CountingBackend {
        fn start_cpu(&self, path: &Path) -> Result<()> {
            if self.fail_start.load(Ordering::SeqCst) {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("cannot create {}", path.display()),
                )));
            }
            self.starts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        // Releases the session before reporting a failed flush.
        fn stop_cpu(&self) -> Result<()> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            if self.fail_stop.load(Ordering::SeqCst) {
                return Err(Error::collaborator("flush failed"));
            }
            Ok(())
        }

        fn dump_heap(&self, _path: &Path) -> Result<()> {
            Ok(())
        }

        fn dump_lock_contention(&self, _path: &Path) -> Result<()> {
            Ok(())
        }
    }

    fn controller() -> (Arc<CountingBackend>, ProfilerController) {
        let backend = Arc::new(CountingBackend::default());
        let controller = ProfilerController::new(backend.clone());
        (backend, controller)
    }

    #[test]
    fn test_start_then_stop() {
        let (backend, ctl) = controller();
        ctl.start_cpu_profiler(Path::new("cpu.profile")).unwrap();
        assert_eq!(
            ctl.state(),
            ProfilerState::CpuProfiling {
                path: PathBuf::from("cpu.profile")
            }
        );
        ctl.stop_cpu_profiler().unwrap();
        assert_eq!(ctl.state(), ProfilerState::Idle);
        assert_eq!(backend.starts.load(Ordering::SeqCst), 1);
        assert_eq!(backend.stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_double_start_rejected_without_touching_backend() {
        let (backend, ctl) = controller();
        ctl.start_cpu_profiler(Path::new("a.profile")).unwrap();
        let err = ctl.start_cpu_profiler(Path::new("b.profile")).unwrap_err();
        assert!(matches!(err, Error::AlreadyInProgress));
        assert_eq!(backend.starts.load(Ordering::SeqCst), 1);
        // Still profiling into the first file
        assert_eq!(
            ctl.state(),
            ProfilerState::CpuProfiling {
                path: PathBuf::from("a.profile")
            }
        );
    }

    #[test]
    fn test_stop_while_idle_rejected() {
        let (backend, ctl) = controller();
        assert!(matches!(ctl.stop_cpu_profiler(), Err(Error::NotInProgress)));
        assert_eq!(backend.stops.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failed_start_stays_idle() {
        let (backend, ctl) = controller();
        backend.fail_start.store(true, Ordering::SeqCst);
        let err = ctl.start_cpu_profiler(Path::new("/nope/cpu.profile")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(ctl.state(), ProfilerState::Idle);

        backend.fail_start.store(false, Ordering::SeqCst);
        ctl.start_cpu_profiler(Path::new("cpu.profile")).unwrap();
    }

    #[test]
    fn test_failed_stop_returns_error_and_goes_idle() {
        let (backend, ctl) = controller();
        ctl.start_cpu_profiler(Path::new("cpu.profile")).unwrap();
        backend.fail_stop.store(true, Ordering::SeqCst);
        let err = ctl.stop_cpu_profiler().unwrap_err();
        assert_eq!(err.to_string(), "flush failed");
        assert_eq!(ctl.state(), ProfilerState::Idle);

        // Nothing is left running, so the next pair works normally
        backend.fail_stop.store(false, Ordering::SeqCst);
        assert!(matches!(ctl.stop_cpu_profiler(), Err(Error::NotInProgress)));
        ctl.start_cpu_profiler(Path::new("cpu.profile")).unwrap();
        ctl.stop_cpu_profiler().unwrap();
    }

    #[test]
    fn test_snapshots_ignore_cpu_state() {
        let (_backend, ctl) = controller();
        ctl.memory_profile(Path::new("mem.profile")).unwrap();
        ctl.lock_profile(Path::new("lock.profile")).unwrap();
        ctl.start_cpu_profiler(Path::new("cpu.profile")).unwrap();
        ctl.memory_profile(Path::new("mem.profile")).unwrap();
        ctl.lock_profile(Path::new("lock.profile")).unwrap();
        assert!(ctl.state().is_profiling());
    }

    #[test]
    fn test_concurrent_starts_exactly_one_wins() {
        let (backend, ctl) = controller();
        let ctl = Arc::new(ctl);
        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|i| {
                let ctl = Arc::clone(&ctl);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    ctl.start_cpu_profiler(Path::new(&format!("cpu-{i}.profile")))
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let wins = results.iter().filter(|r| r.is_ok()).count();
        let rejected = results
            .iter()
            .filter(|r| matches!(r, Err(Error::AlreadyInProgress)))
            .count();

        assert_eq!(wins, 1);
        assert_eq!(rejected, threads - 1);
        assert_eq!(backend.starts.load(Ordering::SeqCst), 1);
    }

    proptest! {
        #[test]
        fn prop_start_stop_sequences_follow_state_machine(ops in proptest::collection::vec(0u8..3, 0..64)) {
            let (backend, ctl) = controller();
            let mut profiling = false;

            for op in ops {
                if op == 0 {
                    let result = ctl.start_cpu_profiler(Path::new("cpu.profile"));
                    if profiling {
                        prop_assert!(matches!(result, Err(Error::AlreadyInProgress)));
                    } else {
                        prop_assert!(result.is_ok());
                        profiling = true;
                    }
                } else {
                    // op 2 is a stop whose flush fails
                    backend.fail_stop.store(op == 2, Ordering::SeqCst);
                    let result = ctl.stop_cpu_profiler();
                    if !profiling {
                        prop_assert!(matches!(result, Err(Error::NotInProgress)));
                    } else if op == 2 {
                        prop_assert!(matches!(result, Err(Error::Collaborator(_))));
                    } else {
                        prop_assert!(result.is_ok());
                    }
                    profiling = false;
                }
                prop_assert_eq!(ctl.state().is_profiling(), profiling);
            }

            // Every backend start is matched by a stop, except a running one
            let starts = backend.starts.load(Ordering::SeqCst);
            let stops = backend.stops.load(Ordering::SeqCst);
            prop_assert!(starts == stops || starts == stops + 1);
        }
    }
}

//! Single-shot background jobs with cooperative cancellation
//!
//! A [`TaskHandle`] runs one closure on its own thread and yields exactly one
//! result. Cancellation is cooperative: the job polls its [`CancelToken`] and
//! bails out with [`ZetaError::Cancelled`]. Once cancelled, whatever the job
//! produces is discarded, partial or not.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use crate::error::{Result, ZetaError};

/// Shared cancellation flag, cheap to clone
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// `Err(Cancelled)` once cancellation has been requested
    #[inline]
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(ZetaError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Handle to a job started with [`TaskHandle::spawn`]
#[derive(Debug)]
pub struct TaskHandle<T> {
    token: CancelToken,
    rx: Receiver<Result<T>>,
    taken: bool,
}

impl<T: Send + 'static> TaskHandle<T> {
    /// Run `job` on a new thread.
    pub fn spawn<F>(job: F) -> Self
    where
        F: FnOnce(&CancelToken) -> Result<T> + Send + 'static,
    {
        let token = CancelToken::new();
        let (tx, rx) = mpsc::channel();
        let worker_token = token.clone();
        thread::spawn(move || {
            let result = job(&worker_token);
            // receiver may already be gone; nothing to report then
            let _ = tx.send(result);
        });
        Self {
            token,
            rx,
            taken: false,
        }
    }
}

impl<T> TaskHandle<T> {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Poll without blocking.
    ///
    /// Returns `None` while the job is running and after the result has
    /// already been taken.
    pub fn try_take(&mut self) -> Option<Result<T>> {
        if self.taken {
            return None;
        }
        let result = match self.rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(ZetaError::WorkerLost),
        };
        self.taken = true;
        Some(self.discard_if_cancelled(result))
    }

    /// Block until the job finishes.
    ///
    /// Calling this after [`Self::try_take`] returned the result yields
    /// [`ZetaError::WorkerLost`].
    pub fn wait(mut self) -> Result<T> {
        let result = self.rx.recv().unwrap_or(Err(ZetaError::WorkerLost));
        self.taken = true;
        self.discard_if_cancelled(result)
    }

    fn discard_if_cancelled(&self, result: Result<T>) -> Result<T> {
        if self.token.is_cancelled() {
            Err(ZetaError::Cancelled)
        } else {
            result
        }
    }
}

/// Dropping a handle whose result was never taken cancels the job.
impl<T> Drop for TaskHandle<T> {
    fn drop(&mut self) {
        if !self.taken {
            self.token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;
    use std::time::Duration;

    #[test]
    fn test_task_yields_result() {
        let handle = TaskHandle::spawn(|_| Ok(21 * 2));
        assert_eq!(handle.wait(), Ok(42));
    }

    #[test]
    fn test_task_propagates_error() {
        let handle: TaskHandle<u8> =
            TaskHandle::spawn(|_| Err(ZetaError::InvalidParameters("bad".into())));
        assert!(matches!(handle.wait(), Err(ZetaError::InvalidParameters(_))));
    }

    #[test]
    fn test_cancel_discards_result() {
        let (gate_tx, gate_rx) = channel::<()>();
        let handle = TaskHandle::spawn(move |token| {
            gate_rx.recv().ok();
            // job ignores the flag and still finishes
            let _ = token.is_cancelled();
            Ok("partial")
        });
        handle.cancel();
        gate_tx.send(()).unwrap();
        assert_eq!(handle.wait(), Err(ZetaError::Cancelled));
    }

    #[test]
    fn test_cooperative_cancellation() {
        let handle: TaskHandle<u64> = TaskHandle::spawn(|token| {
            let mut spins = 0u64;
            loop {
                token.check()?;
                spins += 1;
                thread::sleep(Duration::from_millis(1));
                if spins > 60_000 {
                    return Ok(spins);
                }
            }
        });
        handle.cancel();
        assert_eq!(handle.wait(), Err(ZetaError::Cancelled));
    }

    #[test]
    fn test_drop_cancels_job() {
        let (seen_tx, seen_rx) = channel::<u64>();
        let handle: TaskHandle<()> = TaskHandle::spawn(move |token| {
            let mut spins = 0u64;
            while !token.is_cancelled() {
                spins += 1;
                thread::sleep(Duration::from_millis(1));
            }
            seen_tx.send(spins).ok();
            Err(ZetaError::Cancelled)
        });
        let token = handle.token().clone();
        drop(handle);
        assert!(token.is_cancelled());
        assert!(seen_rx.recv_timeout(Duration::from_secs(10)).is_ok());
    }

    #[test]
    fn test_drop_after_take_leaves_token() {
        let handle = TaskHandle::spawn(|_| Ok(1));
        let token = handle.token().clone();
        assert_eq!(handle.wait(), Ok(1));
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_panicked_worker_reported() {
        let handle: TaskHandle<u8> = TaskHandle::spawn(|_| panic!("worker died"));
        assert_eq!(handle.wait(), Err(ZetaError::WorkerLost));
    }

    #[test]
    fn test_try_take_polls() {
        let (gate_tx, gate_rx) = channel::<()>();
        let mut handle = TaskHandle::spawn(move |_| {
            gate_rx.recv().ok();
            Ok(7)
        });
        assert_eq!(handle.try_take(), None);
        gate_tx.send(()).unwrap();

        let mut result = None;
        for _ in 0..1000 {
            result = handle.try_take();
            if result.is_some() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(result, Some(Ok(7)));
        assert_eq!(handle.try_take(), None);
    }

    #[test]
    fn test_token_check() {
        let token = CancelToken::new();
        assert!(token.check().is_ok());
        token.clone().cancel();
        assert_eq!(token.check(), Err(ZetaError::Cancelled));
    }
}

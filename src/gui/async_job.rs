//! Generic async job handling for GUI operations
//!
//! Background work runs on its own thread with a current-thread Tokio
//! runtime; the GUI thread polls the result once per frame.

use anyhow::{anyhow, Result};
use std::future::Future;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tokio::runtime::Builder;

/// Helper struct for async jobs - polls a background task
pub struct AsyncJob<T> {
    receiver: Option<Receiver<Result<T>>>,
}

impl<T> AsyncJob<T> {
    /// Create a new async job with the given receiver
    pub fn new(receiver: Receiver<Result<T>>) -> Self {
        Self {
            receiver: Some(receiver),
        }
    }

    /// Poll the job for completion
    /// Returns Some(result) if the job has completed, None if still running
    pub fn poll(&mut self) -> Option<Result<T>> {
        if let Some(rx) = &self.receiver {
            match rx.try_recv() {
                Ok(res) => {
                    self.receiver = None;
                    return Some(res);
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.receiver = None;
                    return Some(Err(anyhow!("Worker task disconnected")));
                }
            }
        }
        None
    }

    /// Check if the job is still running
    pub fn is_running(&self) -> bool {
        self.receiver.is_some()
    }
}

/// Run a future on a background thread and return a pollable handle
pub fn spawn_job<T, FutBuilder, Fut>(builder: FutBuilder) -> AsyncJob<T>
where
    T: Send + 'static,
    FutBuilder: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = match Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime.block_on(builder()),
            Err(e) => Err(anyhow!("Failed to create async runtime: {}", e)),
        };
        let _ = tx.send(result);
    });
    AsyncJob::new(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait<T>(job: &mut AsyncJob<T>) -> Result<T> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(res) = job.poll() {
                return res;
            }
            assert!(Instant::now() < deadline, "job did not finish in time");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_spawned_job_delivers_result() {
        let mut job = spawn_job(|| async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok(41 + 1)
        });
        assert_eq!(wait(&mut job).unwrap(), 42);
        assert!(!job.is_running());
    }

    #[test]
    fn test_spawned_job_delivers_error() {
        let mut job: AsyncJob<()> = spawn_job(|| async { Err(anyhow!("boom")) });
        assert_eq!(wait(&mut job).unwrap_err().to_string(), "boom");
    }

    #[test]
    fn test_dropped_sender_reports_disconnect() {
        let (tx, rx) = mpsc::channel::<Result<u8>>();
        drop(tx);
        let mut job = AsyncJob::new(rx);
        let res = job.poll().expect("disconnect should complete the job");
        assert!(res.unwrap_err().to_string().contains("disconnected"));
        assert!(job.poll().is_none());
    }
}

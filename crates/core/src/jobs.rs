// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry of background jobs.
//!
//! The registry map sits behind a reader/writer lock; every job carries its
//! own mutex for status, output and error, so listing never blocks a job's
//! progress and a busy job never blocks listing. Each job also owns a
//! one-shot completion signal (a `watch` channel flipped to `true` exactly
//! once, on the terminal transition) that [`JobManager::wait`] and
//! [`JobManager::kill`] block on.
//!
//! Jobs are never removed implicitly: a finished job stays queryable until
//! [`JobManager::prune`] or [`JobManager::remove`] drops it. Dropping the
//! manager does not kill outstanding work.

use crate::id::{IdCounter, JobId};
use crate::job::{JobError, JobSnapshot, JobStatus};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::watch;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
use tracing::Instrument;

/// Default cap on a job's captured output (1 MiB).
pub const DEFAULT_OUTPUT_LIMIT: usize = 1024 * 1024;

/// Default time a kill waits for the job to reach a cancellation checkpoint.
pub const DEFAULT_KILL_GRACE: Duration = Duration::from_secs(5);

type CancelFn = Box<dyn FnOnce() + Send>;

struct JobState {
    status: JobStatus,
    pid: Option<u32>,
    output: String,
    error: Option<String>,
    /// Run time, fixed at the terminal transition
    finished_after: Option<Duration>,
    cancel: Option<CancelFn>,
    kill_requested: bool,
}

struct JobEntry {
    id: JobId,
    command: String,
    started_at: SystemTime,
    started: Instant,
    state: Mutex<JobState>,
    done: watch::Sender<bool>,
}

impl JobEntry {
    fn new(id: JobId, command: String) -> Self {
        let (done, _) = watch::channel(false);
        Self {
            id,
            command,
            started_at: SystemTime::now(),
            started: Instant::now(),
            state: Mutex::new(JobState {
                status: JobStatus::Pending,
                pid: None,
                output: String::new(),
                error: None,
                finished_after: None,
                cancel: None,
                kill_requested: false,
            }),
            done,
        }
    }

    fn snapshot(&self) -> JobSnapshot {
        let state = self.state.lock();
        let elapsed = state
            .finished_after
            .unwrap_or_else(|| self.started.elapsed());
        JobSnapshot {
            id: self.id,
            command: self.command.clone(),
            status: state.status,
            pid: state.pid,
            started_at_ms: self
                .started_at
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0),
            elapsed_ms: elapsed.as_millis() as u64,
            output_bytes: state.output.len(),
            error: state.error.clone(),
        }
    }

    /// Move to a terminal status and fire the completion signal.
    ///
    /// Caller holds the state lock. No-op when already terminal.
    fn terminate(&self, state: &mut JobState, status: JobStatus, error: Option<String>) -> bool {
        if !state.status.can_transition_to(status) {
            return false;
        }
        state.status = status;
        state.error = error;
        state.finished_after = Some(self.started.elapsed());
        state.cancel = None;
        self.done.send_replace(true);
        true
    }
}

struct Inner {
    jobs: RwLock<BTreeMap<JobId, Arc<JobEntry>>>,
    ids: IdCounter,
    output_limit: usize,
    kill_grace: Duration,
}

/// Tracks asynchronously running invocations.
///
/// Cheap to clone; clones share one registry.
#[derive(Clone)]
pub struct JobManager {
    inner: Arc<Inner>,
}

impl fmt::Debug for JobManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobManager")
            .field("jobs", &self.inner.jobs.read().len())
            .field("output_limit", &self.inner.output_limit)
            .field("kill_grace", &self.inner.kill_grace)
            .finish()
    }
}

impl Default for JobManager {
    fn default() -> Self {
        Self::new()
    }
}

impl JobManager {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_OUTPUT_LIMIT, DEFAULT_KILL_GRACE)
    }

    /// Create a manager with a per-job output cap (`0` = unbounded) and a
    /// kill grace period.
    pub fn with_limits(output_limit: usize, kill_grace: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                jobs: RwLock::new(BTreeMap::new()),
                ids: IdCounter::new(),
                output_limit,
                kill_grace,
            }),
        }
    }

    fn entry(&self, id: JobId) -> Result<Arc<JobEntry>, JobError> {
        self.inner
            .jobs
            .read()
            .get(&id)
            .cloned()
            .ok_or(JobError::NotFound(id))
    }

    /// Register a new job in `pending` and return its id.
    ///
    /// The caller moves it to `running` with [`start`](Self::start) once the
    /// underlying work begins.
    pub fn add(&self, command: impl Into<String>) -> JobId {
        let id = self.inner.ids.next();
        let entry = Arc::new(JobEntry::new(id, command.into()));
        tracing::info!(job = %id, command = entry.command.as_str(), "job registered");
        self.inner.jobs.write().insert(id, entry);
        id
    }

    /// Transition `pending → running`, installing the cancellation function
    /// a later kill will invoke.
    ///
    /// Fails when the job was killed before it started, in which case the
    /// caller must not run the work.
    pub fn start(
        &self,
        id: JobId,
        cancel: impl FnOnce() + Send + 'static,
    ) -> Result<(), JobError> {
        let entry = self.entry(id)?;
        let mut state = entry.state.lock();
        match state.status {
            JobStatus::Pending => {
                state.status = JobStatus::Running;
                state.cancel = Some(Box::new(cancel));
                tracing::debug!(job = %id, "job running");
                Ok(())
            }
            JobStatus::Running => Err(JobError::StillActive(id)),
            status => Err(JobError::AlreadyFinished { id, status }),
        }
    }

    /// Record the OS process backing a job.
    pub fn set_pid(&self, id: JobId, pid: u32) -> Result<(), JobError> {
        let entry = self.entry(id)?;
        entry.state.lock().pid = Some(pid);
        tracing::debug!(job = %id, pid, "job process started");
        Ok(())
    }

    /// Append captured output. Output arriving after the job is terminal
    /// is discarded.
    pub fn append_output(&self, id: JobId, text: &str) -> Result<(), JobError> {
        let entry = self.entry(id)?;
        let mut state = entry.state.lock();
        if !state.status.is_terminal() {
            append_capped(&mut state.output, text, self.inner.output_limit);
        }
        Ok(())
    }

    /// Record the outcome of the job's work.
    ///
    /// A job with a pending kill request ends `killed` whatever the work
    /// returned; otherwise `Ok` completes it and `Err` fails it. Calls on an
    /// already terminal job are ignored.
    pub fn finish(&self, id: JobId, result: Result<(), JobError>) {
        let Ok(entry) = self.entry(id) else {
            return;
        };
        let mut state = entry.state.lock();
        let (status, error) = match result {
            _ if state.kill_requested => (JobStatus::Killed, Some(JobError::Killed.to_string())),
            Err(JobError::Killed) => (JobStatus::Killed, Some(JobError::Killed.to_string())),
            Ok(()) => (JobStatus::Completed, None),
            Err(e) => (JobStatus::Failed, Some(e.to_string())),
        };
        if entry.terminate(&mut state, status, error) {
            tracing::info!(job = %id, %status, "job finished");
        } else {
            tracing::debug!(job = %id, current = %state.status, "late job result ignored");
        }
    }

    /// Snapshot of one job.
    pub fn get(&self, id: JobId) -> Option<JobSnapshot> {
        self.entry(id).ok().map(|e| e.snapshot())
    }

    /// Snapshots of all jobs in id order.
    pub fn list(&self) -> Vec<JobSnapshot> {
        let entries: Vec<Arc<JobEntry>> = self.inner.jobs.read().values().cloned().collect();
        entries.iter().map(|e| e.snapshot()).collect()
    }

    /// Captured output so far; the job need not be finished.
    pub fn logs(&self, id: JobId) -> Result<String, JobError> {
        let entry = self.entry(id)?;
        let output = entry.state.lock().output.clone();
        Ok(output)
    }

    /// Cancel an active job and wait for it to stop.
    ///
    /// A pending job is marked killed at once. A running job has its
    /// cancellation function invoked, then the call waits on the completion
    /// signal for the kill grace period; if the work has not reached a
    /// cancellation checkpoint by then the job is forced to `killed`.
    pub async fn kill(&self, id: JobId) -> Result<(), JobError> {
        let entry = self.entry(id)?;
        let cancel = {
            let mut state = entry.state.lock();
            match state.status {
                status if status.is_terminal() => {
                    return Err(JobError::AlreadyFinished { id, status });
                }
                JobStatus::Pending => {
                    entry.terminate(
                        &mut state,
                        JobStatus::Killed,
                        Some(JobError::Killed.to_string()),
                    );
                    tracing::info!(job = %id, "pending job killed");
                    return Ok(());
                }
                _ => {
                    state.kill_requested = true;
                    state.cancel.take()
                }
            }
        };

        tracing::info!(job = %id, "killing job");
        if let Some(cancel) = cancel {
            cancel();
        }

        let mut done = entry.done.subscribe();
        let stopped = tokio::time::timeout(self.inner.kill_grace, done.wait_for(|d| *d))
            .await
            .is_ok();
        if !stopped {
            let mut state = entry.state.lock();
            if entry.terminate(
                &mut state,
                JobStatus::Killed,
                Some(JobError::Killed.to_string()),
            ) {
                tracing::warn!(job = %id, grace_ms = self.inner.kill_grace.as_millis() as u64, "job ignored cancellation, forced to killed");
            }
        }
        Ok(())
    }

    /// Kill every active job. Returns how many kill requests succeeded.
    pub async fn kill_all(&self) -> usize {
        let active: Vec<JobId> = self
            .list()
            .into_iter()
            .filter(|j| !j.status.is_terminal())
            .map(|j| j.id)
            .collect();
        let mut kills = tokio::task::JoinSet::new();
        for id in active {
            let jobs = self.clone();
            kills.spawn(async move { jobs.kill(id).await.is_ok() });
        }
        let mut killed = 0;
        while let Some(result) = kills.join_next().await {
            if matches!(result, Ok(true)) {
                killed += 1;
            }
        }
        killed
    }

    /// Block until the job is terminal, then return its outcome.
    ///
    /// Completed jobs return `Ok`, failed ones their recorded error, killed
    /// ones [`JobError::Killed`]. Any number of callers may wait on the same
    /// job concurrently.
    pub async fn wait(&self, id: JobId) -> Result<(), JobError> {
        let entry = self.entry(id)?;
        let mut done = entry.done.subscribe();
        // The sender lives in `entry`, which we hold, so this cannot close.
        let _ = done.wait_for(|d| *d).await;

        let state = entry.state.lock();
        match state.status {
            JobStatus::Completed => Ok(()),
            JobStatus::Killed => Err(JobError::Killed),
            JobStatus::Failed => Err(JobError::Failed(
                state.error.clone().unwrap_or_else(|| "failed".to_string()),
            )),
            JobStatus::Pending | JobStatus::Running => Err(JobError::StillActive(id)),
        }
    }

    /// Remove one finished job from the registry.
    pub fn remove(&self, id: JobId) -> Result<JobSnapshot, JobError> {
        let mut jobs = self.inner.jobs.write();
        let entry = jobs.get(&id).cloned().ok_or(JobError::NotFound(id))?;
        let snapshot = entry.snapshot();
        if !snapshot.status.is_terminal() {
            return Err(JobError::StillActive(id));
        }
        jobs.remove(&id);
        Ok(snapshot)
    }

    /// Remove every finished job, returning the removed ids.
    pub fn prune(&self) -> Vec<JobId> {
        let mut jobs = self.inner.jobs.write();
        let finished: Vec<JobId> = jobs
            .iter()
            .filter(|(_, e)| e.state.lock().status.is_terminal())
            .map(|(id, _)| *id)
            .collect();
        for id in &finished {
            jobs.remove(id);
        }
        if !finished.is_empty() {
            tracing::debug!(count = finished.len(), "pruned finished jobs");
        }
        finished
    }

    /// Register a job and drive `work` on a background task.
    ///
    /// The job is started with a fresh cancellation token (independent of
    /// whatever call launched it) that a kill cancels. The work's result is
    /// recorded with [`finish`](Self::finish); a panic inside the work is
    /// caught and recorded as a failure. Must be called inside a tokio
    /// runtime.
    pub fn launch<F, Fut>(&self, command: impl Into<String>, work: F) -> JobId
    where
        F: FnOnce(JobHandle) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), JobError>> + Send + 'static,
    {
        let id = self.add(command);
        let token = CancellationToken::new();
        let handle = JobHandle {
            id,
            jobs: self.clone(),
            token: token.clone(),
        };
        let jobs = self.clone();

        tokio::spawn(
            async move {
                if let Err(e) = jobs.start(id, move || token.cancel()) {
                    tracing::debug!(error = %e, "job not started");
                    return;
                }
                let result = match tokio::spawn(work(handle)).await {
                    Ok(result) => result,
                    Err(join_err) if join_err.is_panic() => {
                        let message = panic_message(join_err);
                        tracing::error!(panic = message.as_str(), "job panicked");
                        Err(JobError::Panicked(message))
                    }
                    Err(join_err) => Err(JobError::Failed(join_err.to_string())),
                };
                jobs.finish(id, result);
            }
            .instrument(tracing::info_span!("job", id = %id)),
        );
        id
    }
}

/// Handle given to the work driving a launched job.
#[derive(Clone)]
pub struct JobHandle {
    id: JobId,
    jobs: JobManager,
    token: CancellationToken,
}

impl fmt::Debug for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobHandle")
            .field("id", &self.id)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

impl JobHandle {
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Append to the job's output buffer.
    pub fn append(&self, text: &str) {
        let _ = self.jobs.append_output(self.id, text);
    }

    pub fn set_pid(&self, pid: u32) {
        let _ = self.jobs.set_pid(self.id, pid);
    }

    /// The job's cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the job has been asked to stop.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}

fn panic_message(err: tokio::task::JoinError) -> String {
    match err.try_into_panic() {
        Ok(payload) => payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string()),
        Err(err) => err.to_string(),
    }
}

/// Append `text`, keeping only the last `limit` bytes (`0` = unbounded).
///
/// The cut point moves forward to a char boundary so the buffer stays valid
/// UTF-8.
fn append_capped(buffer: &mut String, text: &str, limit: usize) {
    buffer.push_str(text);
    if limit == 0 || buffer.len() <= limit {
        return;
    }
    let mut cut = buffer.len() - limit;
    while !buffer.is_char_boundary(cut) {
        cut += 1;
    }
    buffer.drain(..cut);
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;

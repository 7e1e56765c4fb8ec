//! Mock backend for testing
//!
//! Scripted submission responses and progress snapshots, with call tracking.

#![allow(dead_code)]

use async_trait::async_trait;
use playlist_ajax::backend::{Backend, RawResponse};
use playlist_ajax::error::{Error, Result};
use playlist_ajax::types::{FormDescriptor, JobHandle, ProgressSnapshot};
use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// One scripted answer of the progress endpoint
#[derive(Debug, Clone)]
pub enum PollReply {
    Snapshot(ProgressSnapshot),
    Status(u16),
    Unreachable,
}

/// Call record for `submit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitCall {
    pub action: String,
    pub fields: Vec<(String, String)>,
}

/// Hand-written backend double
///
/// Features:
/// - Queued submission responses (default: empty 200)
/// - Queued progress replies (default once exhausted: unreachable)
/// - Optional delay before a submission answers
/// - Call tracking with timestamps for poll cadence checks
pub struct MockBackend {
    submit_replies: Mutex<VecDeque<Option<RawResponse>>>,
    poll_replies: Mutex<VecDeque<PollReply>>,
    submit_delay: Mutex<Duration>,
    submit_calls: Mutex<Vec<SubmitCall>>,
    compare_calls: Mutex<Vec<String>>,
    poll_calls: Mutex<Vec<(String, Instant)>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            submit_replies: Mutex::new(VecDeque::new()),
            poll_replies: Mutex::new(VecDeque::new()),
            submit_delay: Mutex::new(Duration::ZERO),
            submit_calls: Mutex::new(Vec::new()),
            compare_calls: Mutex::new(Vec::new()),
            poll_calls: Mutex::new(Vec::new()),
        }
    }

    // === Scripting ===

    /// Queue a submission (or comparison) response
    pub fn reply(&self, status: u16, body: &str) {
        self.submit_replies
            .lock()
            .unwrap()
            .push_back(Some(RawResponse::new(status, body)));
    }

    /// Queue a network failure for the next submission
    pub fn fail_submit(&self) {
        self.submit_replies.lock().unwrap().push_back(None);
    }

    /// Delay every submission by `delay`
    pub fn delay_submit(&self, delay: Duration) {
        *self.submit_delay.lock().unwrap() = delay;
    }

    /// Queue a progress reply
    pub fn poll(&self, reply: PollReply) {
        self.poll_replies.lock().unwrap().push_back(reply);
    }

    // === Call verification ===

    pub fn submit_calls(&self) -> Vec<SubmitCall> {
        self.submit_calls.lock().unwrap().clone()
    }

    /// Users a comparison was requested for
    pub fn compare_calls(&self) -> Vec<String> {
        self.compare_calls.lock().unwrap().clone()
    }

    pub fn poll_count(&self) -> usize {
        self.poll_calls.lock().unwrap().len()
    }

    /// Instants at which the progress endpoint was hit
    pub fn poll_times(&self) -> Vec<Instant> {
        self.poll_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, at)| *at)
            .collect()
    }

    /// Task ids the progress endpoint was asked about
    pub fn polled_jobs(&self) -> Vec<String> {
        self.poll_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }
}

impl MockBackend {
    fn next_reply(&self) -> Result<RawResponse> {
        let next = self.submit_replies.lock().unwrap().pop_front();
        match next {
            Some(Some(response)) => Ok(response),
            Some(None) => Err(unreachable_error()),
            None => Ok(RawResponse::new(200, "")),
        }
    }
}

fn unreachable_error() -> Error {
    Error::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"))
}

#[async_trait]
impl Backend for MockBackend {
    async fn submit(&self, form: &FormDescriptor) -> Result<RawResponse> {
        self.submit_calls.lock().unwrap().push(SubmitCall {
            action: form.action.clone(),
            fields: form.serialize(),
        });

        let delay = *self.submit_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.next_reply()
    }

    async fn fetch_progress(&self, job: &JobHandle) -> Result<ProgressSnapshot> {
        self.poll_calls
            .lock()
            .unwrap()
            .push((job.task_id.clone(), Instant::now()));

        let next = self.poll_replies.lock().unwrap().pop_front();
        match next {
            Some(PollReply::Snapshot(snap)) => Ok(snap),
            Some(PollReply::Status(code)) => Err(Error::HttpStatus(code)),
            Some(PollReply::Unreachable) | None => Err(unreachable_error()),
        }
    }

    async fn compare(&self, user: &str) -> Result<RawResponse> {
        self.compare_calls.lock().unwrap().push(user.to_string());
        self.next_reply()
    }
}

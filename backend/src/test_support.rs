//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`).
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::DataUrl;
use crate::domain::ports::{ReceiptExtractor, ReceiptExtractorError};

/// Clock whose current instant is set and advanced by the test.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => {
                panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}")
            }
        };
        *self.lock_clock() += delta;
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// One request observed by [`ScriptedReceiptExtractor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionCall {
    pub mime_type: String,
    pub prompt: String,
}

/// Receipt extractor that replays queued replies in order.
///
/// Once the script is exhausted every further call fails with
/// [`ReceiptExtractorError::Unconfigured`].
#[derive(Clone, Default)]
pub struct ScriptedReceiptExtractor {
    replies: Arc<Mutex<VecDeque<Result<String, ReceiptExtractorError>>>>,
    calls: Arc<Mutex<Vec<ExtractionCall>>>,
}

impl ScriptedReceiptExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply carrying `text`.
    #[must_use]
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()));
        self
    }

    /// Queue a failed reply.
    #[must_use]
    pub fn fail(self, error: ReceiptExtractorError) -> Self {
        self.push(Err(error));
        self
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<ExtractionCall> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(_) => panic!("calls mutex"),
        }
    }

    fn push(&self, reply: Result<String, ReceiptExtractorError>) {
        match self.replies.lock() {
            Ok(mut replies) => replies.push_back(reply),
            Err(_) => panic!("replies mutex"),
        }
    }
}

#[async_trait]
impl ReceiptExtractor for ScriptedReceiptExtractor {
    async fn extract(&self, image: &DataUrl, prompt: &str) -> Result<String, ReceiptExtractorError> {
        match self.calls.lock() {
            Ok(mut calls) => calls.push(ExtractionCall {
                mime_type: image.mime_type().to_owned(),
                prompt: prompt.to_owned(),
            }),
            Err(_) => panic!("calls mutex"),
        }
        let next = match self.replies.lock() {
            Ok(mut replies) => replies.pop_front(),
            Err(_) => panic!("replies mutex"),
        };
        next.unwrap_or(Err(ReceiptExtractorError::Unconfigured))
    }
}

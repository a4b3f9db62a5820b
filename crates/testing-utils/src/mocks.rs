//! Mock implementations of the consumer's broker, processor and repository traits
//!
//! All mocks are cheap to clone and share their recorded state, so a test can
//! hand one clone to the code under test and inspect another afterwards.

use assignment_consumer_core::{
    Acknowledger, Assignment, AssignmentRepository, BusinessProcessor, ConsumerError,
    ConsumerResult, Delivery, OutgoingMessage, Publisher,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Mock publisher that records every publish call
#[derive(Debug, Clone, Default)]
pub struct MockPublisher {
    published: Arc<Mutex<Vec<(String, OutgoingMessage)>>>,
    fail: Arc<AtomicBool>,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A publisher whose every publish returns an error
    pub fn failing() -> Self {
        let publisher = Self::default();
        publisher.set_fail(true);
        publisher
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Every attempted publish as `(exchange, message)`, including failed ones
    pub fn published(&self) -> Vec<(String, OutgoingMessage)> {
        self.published.lock().unwrap().clone()
    }

    pub fn publish_count(&self) -> usize {
        self.published.lock().unwrap().len()
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn publish(&self, exchange: &str, message: &OutgoingMessage) -> ConsumerResult<()> {
        self.published
            .lock()
            .unwrap()
            .push((exchange.to_string(), message.clone()));

        if self.fail.load(Ordering::SeqCst) {
            return Err(ConsumerError::MessageQueue(format!(
                "mock publish to {exchange} failed"
            )));
        }
        Ok(())
    }
}

/// Mock acknowledger counting ack calls
#[derive(Debug, Clone, Default)]
pub struct MockAcknowledger {
    acks: Arc<AtomicUsize>,
    fail: bool,
}

impl MockAcknowledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// An acknowledger whose ack is counted but returns an error
    pub fn failing() -> Self {
        Self {
            acks: Arc::new(AtomicUsize::new(0)),
            fail: true,
        }
    }

    pub fn ack_count(&self) -> usize {
        self.acks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Acknowledger for MockAcknowledger {
    async fn ack(&self) -> ConsumerResult<()> {
        self.acks.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ConsumerError::MessageQueue("mock ack failed".to_string()));
        }
        Ok(())
    }
}

/// Mock processor returning scripted results
///
/// Scripted results are consumed in order; once exhausted the default result is used.
#[derive(Debug, Clone)]
pub struct MockProcessor {
    script: Arc<Mutex<VecDeque<bool>>>,
    default_success: bool,
    calls: Arc<Mutex<Vec<Delivery>>>,
}

impl MockProcessor {
    pub fn succeeding() -> Self {
        Self::with_default(true)
    }

    pub fn failing() -> Self {
        Self::with_default(false)
    }

    /// Results for the first calls, `true` meaning success, then failures
    pub fn scripted(results: Vec<bool>) -> Self {
        let processor = Self::with_default(false);
        *processor.script.lock().unwrap() = results.into();
        processor
    }

    fn with_default(default_success: bool) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            default_success,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockProcessor {
    fn default() -> Self {
        Self::succeeding()
    }
}

#[async_trait]
impl BusinessProcessor for MockProcessor {
    async fn process(&self, delivery: &Delivery) -> ConsumerResult<()> {
        self.calls.lock().unwrap().push(delivery.clone());

        let success = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.default_success);

        if success {
            Ok(())
        } else {
            Err(ConsumerError::Processing("mock processing failed".to_string()))
        }
    }
}

/// In-memory assignment repository
#[derive(Debug, Clone, Default)]
pub struct MockAssignmentRepository {
    assignments: Arc<Mutex<Vec<Assignment>>>,
    fail: Arc<AtomicBool>,
}

impl MockAssignmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.assignments.lock().unwrap().len()
    }

    pub fn get_all_assignments(&self) -> Vec<Assignment> {
        self.assignments.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssignmentRepository for MockAssignmentRepository {
    async fn create(&self, assignment: &Assignment) -> ConsumerResult<u64> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ConsumerError::Internal("mock repository unavailable".to_string()));
        }

        let mut assignments = self.assignments.lock().unwrap();
        assignments.push(assignment.clone());
        Ok(assignments.len() as u64)
    }
}

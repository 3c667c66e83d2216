//! In-memory providers and checkpoint sinks for unit tests

use crate::adapters::providers::{GeocodingProvider, Session};
use crate::core::checkpoint::CheckpointSink;
use crate::domain::{Coordinates, GeobatchError, GeocodeResult, Lookup, ProviderError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy)]
pub enum Answer {
    Found(f64, f64),
    NotFound,
    Fail,
}

/// Provider that replays scripted answers
///
/// Answers queued for a specific address take precedence over the shared
/// queue. Once both are empty every lookup answers `NotFound`.
pub struct ScriptedProvider {
    name: String,
    shared: Mutex<VecDeque<Answer>>,
    by_address: Mutex<HashMap<String, VecDeque<Answer>>>,
    calls: AtomicUsize,
    sessions: Mutex<Vec<u64>>,
}

impl ScriptedProvider {
    pub fn new(name: &str, answers: Vec<Answer>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            shared: Mutex::new(answers.into()),
            by_address: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            sessions: Mutex::new(Vec::new()),
        })
    }

    pub fn script(self: &Arc<Self>, address: &str, answers: Vec<Answer>) -> Arc<Self> {
        self.by_address
            .lock()
            .unwrap()
            .insert(address.to_string(), answers.into());
        self.clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Id of the session passed to each lookup, in call order
    pub fn session_ids(&self) -> Vec<u64> {
        self.sessions.lock().unwrap().clone()
    }

    fn next_answer(&self, address: &str) -> Answer {
        if let Some(queue) = self.by_address.lock().unwrap().get_mut(address) {
            if let Some(answer) = queue.pop_front() {
                return answer;
            }
        }
        self.shared
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Answer::NotFound)
    }
}

#[async_trait]
impl GeocodingProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn lookup(&self, address: &str, session: &Session) -> Result<Lookup> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sessions.lock().unwrap().push(session.id());
        match self.next_answer(address) {
            Answer::Found(lat, lon) => Ok(Lookup::Found(Coordinates::new(lat, lon))),
            Answer::NotFound => Ok(Lookup::NotFound),
            Answer::Fail => Err(ProviderError::ConnectionFailed {
                provider: self.name.clone(),
                message: "connection reset by peer".to_string(),
            }
            .into()),
        }
    }
}

/// Checkpoint sink that keeps every snapshot in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub snapshots: Vec<(usize, Vec<GeocodeResult>)>,
    pub fail: bool,
}

impl CheckpointSink for MemorySink {
    fn write(&mut self, results: &[GeocodeResult], index: usize) -> Result<PathBuf> {
        if self.fail {
            return Err(GeobatchError::Checkpoint("disk full".to_string()));
        }
        self.snapshots.push((index, results.to_vec()));
        Ok(PathBuf::from(format!("memory/{index}.csv")))
    }
}

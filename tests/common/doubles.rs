//! Scripted collaborators for poll cycle tests.
//!
//! Every double can share an [`EventLog`] so tests can assert the relative
//! order of fetches, dispatches and checkpoint advances.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use search_harvester::checkpoint::InMemoryCheckpointStore;
use search_harvester::dispatch::DispatchReceipt;
use search_harvester::{
    AdvanceOutcome, CheckpointError, CheckpointStore, Cursor, DispatchError, Dispatcher, Item,
    Page, SearchError, SearchSource,
};
use std::collections::VecDeque;
use std::sync::Arc;

/// Ordered record of collaborator calls
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

pub fn items(ids: impl IntoIterator<Item = i64>) -> Vec<Item> {
    ids.into_iter().map(Item::bare).collect()
}

/// Items whose text mentions `query`, so a corpus-backed source matches them
pub fn posts(ids: impl IntoIterator<Item = i64>, query: &str) -> Vec<Item> {
    ids.into_iter()
        .map(|id| {
            let mut fields = serde_json::Map::new();
            fields.insert(
                "text".to_string(),
                serde_json::Value::String(format!("post {id} about {query}")),
            );
            Item::new(id, fields)
        })
        .collect()
}

/// Page whose cursor is its largest item id
pub fn page_of(ids: impl IntoIterator<Item = i64>) -> Page {
    let items = items(ids);
    let next = items.iter().map(Item::cursor).max().unwrap_or(Cursor::new(0));
    Page::new(items, next)
}

/// Search source replaying a fixed script of responses. Once the script
/// runs out it answers with empty pages.
#[derive(Debug, Default)]
pub struct ScriptedSearchSource {
    script: Mutex<VecDeque<Result<Page, SearchError>>>,
    calls: Mutex<Vec<(String, Option<Cursor>)>>,
    log: EventLog,
}

impl ScriptedSearchSource {
    pub fn new(pages: impl IntoIterator<Item = Page>) -> Self {
        Self {
            script: Mutex::new(pages.into_iter().map(Ok).collect()),
            ..Self::default()
        }
    }

    pub fn with_log(mut self, log: EventLog) -> Self {
        self.log = log;
        self
    }

    pub fn then_fail(self, error: SearchError) -> Self {
        self.script.lock().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<(String, Option<Cursor>)> {
        self.calls.lock().clone()
    }

    pub fn since_cursors(&self) -> Vec<Option<Cursor>> {
        self.calls.lock().iter().map(|(_, since)| *since).collect()
    }
}

#[async_trait]
impl SearchSource for ScriptedSearchSource {
    async fn fetch(&self, query: &str, since: Option<Cursor>) -> Result<Page, SearchError> {
        self.calls.lock().push((query.to_string(), since));
        self.log.push(format!("fetch:{}", since.map_or("none".to_string(), |c| c.to_string())));

        match self.script.lock().pop_front() {
            Some(response) => response,
            None => Ok(Page::empty(since.unwrap_or(Cursor::new(0)))),
        }
    }
}

/// Dispatcher recording batch ids, optionally failing on the nth call (1-based)
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    batches: Mutex<Vec<Vec<i64>>>,
    fail_on_call: Option<usize>,
    calls: Mutex<usize>,
    log: EventLog,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on_call(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::default()
        }
    }

    pub fn with_log(mut self, log: EventLog) -> Self {
        self.log = log;
        self
    }

    pub fn batches(&self) -> Vec<Vec<i64>> {
        self.batches.lock().clone()
    }
}

#[async_trait]
impl Dispatcher for RecordingDispatcher {
    async fn dispatch(&self, batch: &[Item]) -> Result<DispatchReceipt, DispatchError> {
        let call = {
            let mut calls = self.calls.lock();
            *calls += 1;
            *calls
        };

        if self.fail_on_call == Some(call) {
            self.log.push("dispatch:failed");
            return Err(DispatchError::unreachable("recording", "downstream offline"));
        }

        let ids: Vec<i64> = batch.iter().map(|item| item.id).collect();
        self.log.push(format!("dispatch:{ids:?}"));
        self.batches.lock().push(ids);
        Ok(DispatchReceipt::new("recording", batch.len()))
    }
}

/// Checkpoint store delegating to the in-memory store while recording
/// advance requests, with switchable failures.
#[derive(Debug, Default)]
pub struct RecordingCheckpointStore {
    inner: InMemoryCheckpointStore,
    advances: Mutex<Vec<(Cursor, AdvanceOutcome)>>,
    reads: Mutex<usize>,
    fail_reads: bool,
    fail_advances: bool,
    log: EventLog,
}

impl RecordingCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cursor(cursor: Cursor) -> Self {
        Self {
            inner: InMemoryCheckpointStore::with_cursor(cursor),
            ..Self::default()
        }
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_advances(mut self) -> Self {
        self.fail_advances = true;
        self
    }

    pub fn with_log(mut self, log: EventLog) -> Self {
        self.log = log;
        self
    }

    pub fn advances(&self) -> Vec<(Cursor, AdvanceOutcome)> {
        self.advances.lock().clone()
    }

    pub fn reads(&self) -> usize {
        *self.reads.lock()
    }

    pub async fn stored(&self) -> Option<Cursor> {
        self.inner.read().await.unwrap()
    }
}

#[async_trait]
impl CheckpointStore for RecordingCheckpointStore {
    async fn read(&self) -> Result<Option<Cursor>, CheckpointError> {
        *self.reads.lock() += 1;
        self.log.push("read");
        if self.fail_reads {
            return Err(CheckpointError::connection("checkpoint table unreachable"));
        }
        self.inner.read().await
    }

    async fn advance(&self, cursor: Cursor) -> Result<AdvanceOutcome, CheckpointError> {
        self.log.push(format!("advance:{cursor}"));
        if self.fail_advances {
            return Err(CheckpointError::query("advance", "permission denied for table"));
        }
        let outcome = self.inner.advance(cursor).await?;
        self.advances.lock().push((cursor, outcome));
        Ok(outcome)
    }
}

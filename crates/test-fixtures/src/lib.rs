//! Test fixtures and doubles for the media search workspace.
//!
//! Provides recorded entity-search API responses, serialized query ASTs,
//! and call-counting fakes for the transport, cache store, and resolver seams.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mediasearch_core::errors::{CacheError, ResolverError};
use mediasearch_core::models::{EntityMatch, ParsedNode, ParsedQuery, Resolution};
use mediasearch_core::traits::{
    EntityResolver, EntitySearchRequest, KeyValueStore, SearchTransport,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Root directory of the fixture data.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as its raw text.
pub fn load_fixture_text(relative_path: &str) -> String {
    let path = fixtures_root().join(relative_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Recorded entity-search API body, e.g. `search_api_body("cat")`.
pub fn search_api_body(name: &str) -> String {
    load_fixture_text(&format!("search_api/{name}.json"))
}

#[derive(Deserialize)]
struct QueryFixture {
    raw: String,
    root: ParsedNode,
}

/// Load a serialized parser output from `queries/<name>.json`.
pub fn load_query(name: &str) -> ParsedQuery {
    let fixture: QueryFixture = load_fixture(&format!("queries/{name}.json"));
    ParsedQuery::new(fixture.raw, fixture.root)
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Scripted behaviour for one term.
#[derive(Debug, Clone)]
pub enum FakeResponse {
    Body(String),
    Fail(String),
    /// Respond with the body after a delay.
    Slow(Duration, String),
}

#[derive(Default)]
struct TransportState {
    responses: Mutex<HashMap<String, FakeResponse>>,
    requests: Mutex<Vec<EntitySearchRequest>>,
}

/// `SearchTransport` returning scripted bodies and recording every request.
///
/// Unscripted terms get an empty search result. Clones share state.
#[derive(Clone, Default)]
pub struct FakeTransport {
    state: Arc<TransportState>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, term: &str, response: FakeResponse) -> Self {
        self.state
            .responses
            .lock()
            .unwrap()
            .insert(term.to_string(), response);
        self
    }

    /// Script a term with a recorded fixture body.
    pub fn respond_with_fixture(self, term: &str, fixture: &str) -> Self {
        self.respond(term, FakeResponse::Body(search_api_body(fixture)))
    }

    pub fn requests(&self) -> Vec<EntitySearchRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    pub fn requested_terms(&self) -> Vec<String> {
        let mut terms: Vec<String> = self.requests().into_iter().map(|r| r.term).collect();
        terms.sort();
        terms
    }
}

impl SearchTransport for FakeTransport {
    async fn fetch(&self, request: &EntitySearchRequest) -> Result<String, ResolverError> {
        self.state.requests.lock().unwrap().push(request.clone());
        let scripted = self
            .state
            .responses
            .lock()
            .unwrap()
            .get(&request.term)
            .cloned();
        match scripted {
            None => Ok(search_api_body("no_hits")),
            Some(FakeResponse::Body(body)) => Ok(body),
            Some(FakeResponse::Fail(reason)) => Err(ResolverError::Transport {
                term: request.term.clone(),
                reason,
            }),
            Some(FakeResponse::Slow(delay, body)) => {
                tokio::time::sleep(delay).await;
                Ok(body)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Cache store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct StoreState {
    entries: Mutex<HashMap<String, String>>,
    get_calls: AtomicUsize,
    set_calls: AtomicUsize,
    unavailable: AtomicBool,
}

/// `KeyValueStore` counting round trips, switchable into an outage.
///
/// Ignores TTLs. Clones share state.
#[derive(Clone, Default)]
pub struct RecordingStore {
    state: Arc<StoreState>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn get_calls(&self) -> usize {
        self.state.get_calls.load(Ordering::SeqCst)
    }

    pub fn set_calls(&self) -> usize {
        self.state.set_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.state.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.state.entries.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Write a raw value directly, bypassing the counters.
    pub fn seed(&self, key: String, value: String) {
        self.state.entries.lock().unwrap().insert(key, value);
    }

    fn check_available(&self) -> Result<(), CacheError> {
        if self.state.unavailable.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable {
                reason: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for RecordingStore {
    async fn get_many(&self, keys: &[String]) -> Result<HashMap<String, String>, CacheError> {
        self.state.get_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let entries = self.state.entries.lock().unwrap();
        Ok(keys
            .iter()
            .filter_map(|k| entries.get(k).map(|v| (k.clone(), v.clone())))
            .collect())
    }

    async fn set_many(
        &self,
        entries: Vec<(String, String)>,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        self.state.set_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.state.entries.lock().unwrap().extend(entries);
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// `EntityResolver` answering from a fixed table and recording each batch.
#[derive(Clone, Default)]
pub struct StaticResolver {
    table: BTreeMap<String, Vec<EntityMatch>>,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `term` with the given `(entity id, score)` pairs.
    pub fn with(mut self, term: &str, matches: &[(&str, f64)]) -> Self {
        let matches = matches
            .iter()
            .map(|(id, score)| EntityMatch::new(*id, *score))
            .collect();
        self.table.insert(term.to_string(), matches);
        self
    }

    /// Every batch this resolver was asked for, in call order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl EntityResolver for StaticResolver {
    async fn resolve(&self, terms: &[String]) -> Resolution {
        self.calls.lock().unwrap().push(terms.to_vec());
        let mut resolution = Resolution::default();
        for term in terms {
            let matches = self.table.get(term).cloned().unwrap_or_default();
            resolution.insert(term.clone(), matches);
        }
        resolution
    }
}

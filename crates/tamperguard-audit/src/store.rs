//! Reference store: the trusted expected values for one session.
//!
//! Each load builds a complete new [`ReferenceSnapshot`] and swaps it in as
//! one step. Readers take an `Arc` to the current snapshot, so an
//! evaluation never observes a half-loaded set of values.

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tamperguard_client::{EndpointConfig, ReferenceFetcher, RemoteEndpoint, DEFAULT_TIMEOUT};
use tamperguard_core::{IntegrityError, ReferenceKey, ReferenceValue};
use tracing::{debug, info, warn};

/// Where reference values come from
#[derive(Debug, Clone)]
pub enum ReferenceSource {
    /// Values embedded in configuration
    Static(Vec<ReferenceValue>),
    /// One remote retrieval per key
    Remote(Vec<RemoteEndpoint>),
    /// Keys resolved against an endpoint configuration at load time.
    ///
    /// A key whose URL cannot be built is recorded absent like a failed fetch.
    Configured {
        endpoints: EndpointConfig,
        keys: Vec<ReferenceKey>,
    },
}

/// Immutable set of reference values from one load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSnapshot {
    values: BTreeMap<ReferenceKey, String>,
    absent: BTreeSet<ReferenceKey>,
    loaded_at: DateTime<Utc>,
}

impl Default for ReferenceSnapshot {
    fn default() -> Self {
        Self::from_values(std::iter::empty())
    }
}

impl ReferenceSnapshot {
    /// Build a snapshot from known values; later duplicates win
    pub fn from_values(values: impl IntoIterator<Item = ReferenceValue>) -> Self {
        Self {
            values: values.into_iter().map(|v| (v.key, v.value)).collect(),
            absent: BTreeSet::new(),
            loaded_at: Utc::now(),
        }
    }

    /// Look up a reference value; `None` means the check cannot run
    #[must_use]
    pub fn get(&self, key: &ReferenceKey) -> Option<ReferenceValue> {
        self.values
            .get(key)
            .map(|value| ReferenceValue::new(key.clone(), value.clone()))
    }

    /// Borrow a reference value
    #[must_use]
    pub fn value(&self, key: &ReferenceKey) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Keys requested in the last load that came back absent
    pub fn absent(&self) -> impl Iterator<Item = &ReferenceKey> {
        self.absent.iter()
    }

    /// All loaded values, ordered by key
    pub fn iter(&self) -> impl Iterator<Item = (&ReferenceKey, &str)> {
        self.values.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// When this snapshot was built
    #[must_use]
    pub const fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// What a load produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: Vec<ReferenceKey>,
    pub absent: Vec<ReferenceKey>,
}

impl LoadSummary {
    /// True if every requested key was loaded
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.absent.is_empty()
    }
}

/// Holds the current reference snapshot and refreshes it.
pub struct ReferenceStore {
    current: RwLock<Arc<ReferenceSnapshot>>,
    fetcher: Option<Arc<dyn ReferenceFetcher>>,
    fetch_timeout: Duration,
}

impl Default for ReferenceStore {
    fn default() -> Self {
        Self::offline()
    }
}

impl ReferenceStore {
    /// Store that loads remote sources through `fetcher`
    pub fn new(fetcher: impl ReferenceFetcher + 'static) -> Self {
        Self {
            current: RwLock::new(Arc::new(ReferenceSnapshot::default())),
            fetcher: Some(Arc::new(fetcher)),
            fetch_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Store with no remote fetcher; remote keys load as absent
    #[must_use]
    pub fn offline() -> Self {
        Self {
            current: RwLock::new(Arc::new(ReferenceSnapshot::default())),
            fetcher: None,
            fetch_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Bound each remote retrieval
    #[must_use]
    pub const fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<ReferenceSnapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Look up one key in the current snapshot
    pub fn get(&self, key: &ReferenceKey) -> Option<ReferenceValue> {
        self.snapshot().get(key)
    }

    /// Replace the snapshot with freshly loaded values.
    ///
    /// Remote keys are fetched concurrently; a key whose fetch fails or
    /// times out is recorded absent without affecting the others. Returns
    /// once every fetch has resolved.
    pub async fn load(&self, source: ReferenceSource) -> LoadSummary {
        let snapshot = match source {
            ReferenceSource::Static(values) => ReferenceSnapshot::from_values(values),
            ReferenceSource::Remote(endpoints) => self.fetch_all(endpoints).await,
            ReferenceSource::Configured { endpoints, keys } => {
                self.fetch_configured(&endpoints, keys).await
            }
        };

        let summary = LoadSummary {
            loaded: snapshot.values.keys().cloned().collect(),
            absent: snapshot.absent.iter().cloned().collect(),
        };
        info!(
            loaded = summary.loaded.len(),
            absent = summary.absent.len(),
            "reference values loaded"
        );

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(snapshot);
        summary
    }

    async fn fetch_configured(
        &self,
        config: &EndpointConfig,
        keys: Vec<ReferenceKey>,
    ) -> ReferenceSnapshot {
        let mut endpoints = Vec::with_capacity(keys.len());
        let mut unresolved = Vec::new();
        for key in keys {
            match config.endpoint(&key) {
                Ok(endpoint) => endpoints.push(endpoint),
                Err(e) => {
                    warn!(key = %key, error = %e, "reference endpoint unusable");
                    unresolved.push(key);
                }
            }
        }

        let mut snapshot = self.fetch_all(endpoints).await;
        for key in unresolved {
            if !snapshot.values.contains_key(&key) {
                snapshot.absent.insert(key);
            }
        }
        snapshot
    }

    async fn fetch_all(&self, endpoints: Vec<RemoteEndpoint>) -> ReferenceSnapshot {
        let fetches = endpoints.into_iter().map(|endpoint| async move {
            let value = self.fetch_one(&endpoint).await;
            (endpoint.key, value)
        });

        let mut values = BTreeMap::new();
        let mut absent = BTreeSet::new();
        for (key, result) in join_all(fetches).await {
            match result {
                Ok(value) => {
                    absent.remove(&key);
                    values.insert(key, value);
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "reference value absent");
                    if !values.contains_key(&key) {
                        absent.insert(key);
                    }
                }
            }
        }

        ReferenceSnapshot {
            values,
            absent,
            loaded_at: Utc::now(),
        }
    }

    async fn fetch_one(&self, endpoint: &RemoteEndpoint) -> Result<String, IntegrityError> {
        let Some(fetcher) = &self.fetcher else {
            return Err(IntegrityError::Config("no reference fetcher configured".into()));
        };

        debug!(key = %endpoint.key, url = %endpoint.url, "fetching reference value");
        tokio::time::timeout(self.fetch_timeout, fetcher.fetch(endpoint))
            .await
            .unwrap_or_else(|_| Err(IntegrityError::Timeout(self.fetch_timeout)))
    }
}

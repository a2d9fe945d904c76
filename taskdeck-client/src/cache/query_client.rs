/// The process-wide query cache
///
/// One shared structure holds every cached query result; components never
/// keep private copies. Per key, the state machine is
/// `idle → fetching → success | error`: success data is served without a
/// network call until its staleness window elapses or an invalidation marks
/// it stale; errors are never cached, so the next subscriber starts a fresh
/// attempt.
///
/// Concurrency model: for a single key at most one fetch is in flight at a
/// time; later requesters join the pending shared future instead of racing
/// it. Responses for different keys land in whatever order the network
/// produces; because results are slotted by key, a superseded filter's late
/// response can never overwrite another key's data.
///
/// # Example
///
/// ```no_run
/// use taskdeck_client::cache::{Freshness, QueryClient, QueryKey, QueryScope};
///
/// # async fn example(cache: &QueryClient) -> Result<(), taskdeck_client::error::ClientError> {
/// let key = QueryKey::entity(QueryScope::Board, "b1");
/// let board: serde_json::Value = cache
///     .fetch(key, Freshness::List, || async { Ok(serde_json::json!({"id": "b1"})) })
///     .await?;
/// # Ok(())
/// # }
/// ```

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

use super::key::{EntityKind, Invalidate, MutationTarget, QueryKey, QueryScope};

/// Staleness class of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Frequently-changing list data (boards, tasks, users): 30 s by default
    List,

    /// Reference data for selection widgets (all-boards, all-users): 300 s
    Lookup,
}

/// Staleness windows, configurable so tests can shrink them
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Window for [`Freshness::List`] queries
    pub list_ttl: Duration,

    /// Window for [`Freshness::Lookup`] queries
    pub lookup_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            list_ttl: Duration::from_secs(30),
            lookup_ttl: Duration::from_secs(300),
        }
    }
}

impl CacheConfig {
    fn ttl(&self, freshness: Freshness) -> Duration {
        match freshness {
            Freshness::List => self.list_ttl,
            Freshness::Lookup => self.lookup_ttl,
        }
    }
}

type SharedFetch = Shared<BoxFuture<'static, Result<Value, ClientError>>>;

struct CacheEntry {
    data: Value,
    fetched_at: Instant,
    stale: bool,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<QueryKey, CacheEntry>,
    in_flight: HashMap<QueryKey, (u64, SharedFetch)>,
    pending_mutations: HashSet<(EntityKind, String)>,
    generation: u64,
}

/// Removes the pending-mutation claim when the mutation future is dropped,
/// completed or not, so an abandoned mutation can never wedge its entity.
struct MutationGuard {
    inner: Arc<Mutex<CacheInner>>,
    claim: (EntityKind, String),
}

impl Drop for MutationGuard {
    fn drop(&mut self) {
        self.inner
            .lock()
            .unwrap()
            .pending_mutations
            .remove(&self.claim);
    }
}

enum Plan {
    Hit(Value),
    Await(u64, SharedFetch),
}

/// The shared query cache
pub struct QueryClient {
    inner: Arc<Mutex<CacheInner>>,
    config: CacheConfig,
}

impl QueryClient {
    /// Creates a cache with the given staleness windows
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheInner::default())),
            config,
        }
    }

    /// Resolves a query through the cache
    ///
    /// Serves a fresh cached value directly; otherwise joins the in-flight
    /// fetch for this key, or starts one from `load`. The loader's result is
    /// stored only on success; a failed fetch leaves any previous data for
    /// this key intact and is returned to every joined waiter.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: QueryKey,
        freshness: Freshness,
        load: F,
    ) -> ClientResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<T>> + Send + 'static,
    {
        let ttl = self.config.ttl(freshness);

        let plan = {
            let mut inner = self.inner.lock().unwrap();

            let fresh = inner.entries.get(&key).and_then(|entry| {
                (!entry.stale && entry.fetched_at.elapsed() < ttl)
                    .then(|| entry.data.clone())
            });

            if let Some(data) = fresh {
                Plan::Hit(data)
            } else if let Some((generation, shared)) = inner.in_flight.get(&key) {
                tracing::debug!(key = %key, "joining in-flight fetch");
                Plan::Await(*generation, shared.clone())
            } else {
                inner.generation += 1;
                let generation = inner.generation;

                let future = load();
                let shared = async move {
                    let value = future.await?;
                    serde_json::to_value(value)
                        .map_err(|err| ClientError::Decode(err.to_string()))
                }
                .boxed()
                .shared();

                inner.in_flight.insert(key.clone(), (generation, shared.clone()));
                tracing::debug!(key = %key, "cache miss, fetching");
                Plan::Await(generation, shared)
            }
        };

        match plan {
            Plan::Hit(data) => {
                tracing::debug!(key = %key, "cache hit");
                decode(data)
            }
            Plan::Await(generation, shared) => {
                let result = shared.await;
                self.settle(&key, generation, &result);
                decode(result?)
            }
        }
    }

    /// Completes bookkeeping for a finished fetch
    ///
    /// Every waiter calls this; the generation check makes it idempotent and
    /// keeps a stale waiter from clobbering a newer fetch for the same key.
    fn settle(&self, key: &QueryKey, generation: u64, result: &Result<Value, ClientError>) {
        let mut inner = self.inner.lock().unwrap();

        let is_current = matches!(
            inner.in_flight.get(key),
            Some((current, _)) if *current == generation
        );
        if !is_current {
            return;
        }
        inner.in_flight.remove(key);

        if let Ok(value) = result {
            inner.entries.insert(
                key.clone(),
                CacheEntry {
                    data: value.clone(),
                    fetched_at: Instant::now(),
                    stale: false,
                },
            );
        }
    }

    /// Runs a mutation and applies its invalidations on success
    ///
    /// A mutation against a specific entity id claims that id for its
    /// duration; a concurrent second mutation for the same id is rejected
    /// with [`ClientError::MutationInFlight`] instead of racing (documented
    /// policy: last-write-wins would silently drop one of the edits). A
    /// failed mutation applies nothing: every cached value stays as it was.
    pub async fn mutate<T, F, Fut>(
        &self,
        target: MutationTarget,
        invalidates: Vec<Invalidate>,
        run: F,
    ) -> ClientResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        let _guard = match &target {
            MutationTarget::Entity(kind, id) => Some(self.claim(*kind, id.clone())?),
            MutationTarget::Collection(_) => None,
        };

        let result = run().await;

        if result.is_ok() {
            let mut inner = self.inner.lock().unwrap();
            for invalidate in &invalidates {
                apply_invalidation(&mut inner, invalidate);
            }
        }

        result
    }

    fn claim(&self, kind: EntityKind, id: String) -> ClientResult<MutationGuard> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.pending_mutations.insert((kind, id.clone())) {
            return Err(ClientError::MutationInFlight {
                kind: kind.as_str().to_string(),
                id,
            });
        }
        Ok(MutationGuard {
            inner: self.inner.clone(),
            claim: (kind, id),
        })
    }

    /// Stores server-confirmed data under a key, marking it fresh
    ///
    /// Used for write-through of mutation responses (e.g. the updated board
    /// returned by `PATCH /boards/:id`). Never used for optimistic values.
    pub fn store<T: Serialize>(&self, key: QueryKey, value: &T) -> ClientResult<()> {
        let data = serde_json::to_value(value)
            .map_err(|err| ClientError::Decode(err.to_string()))?;

        self.inner.lock().unwrap().entries.insert(
            key,
            CacheEntry {
                data,
                fetched_at: Instant::now(),
                stale: false,
            },
        );
        Ok(())
    }

    /// Marks every entry in a scope stale
    pub fn invalidate_scope(&self, scope: QueryScope) {
        let mut inner = self.inner.lock().unwrap();
        apply_invalidation(&mut inner, &Invalidate::Scope(scope));
    }

    /// Marks one entry stale
    pub fn invalidate_key(&self, key: &QueryKey) {
        let mut inner = self.inner.lock().unwrap();
        apply_invalidation(&mut inner, &Invalidate::Key(key.clone()));
    }

    /// Drops one entry entirely (used after deletes)
    pub fn remove(&self, key: &QueryKey) {
        self.inner.lock().unwrap().entries.remove(key);
    }

    /// Drops every cached entry (used on logout)
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries.clear();
    }

    /// Returns the cached value for a key, fresh or stale, without fetching
    pub fn cached(&self, key: &QueryKey) -> Option<Value> {
        self.inner
            .lock()
            .unwrap()
            .entries
            .get(key)
            .map(|entry| entry.data.clone())
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

fn apply_invalidation(inner: &mut CacheInner, invalidate: &Invalidate) {
    match invalidate {
        Invalidate::Scope(scope) => {
            for (key, entry) in inner.entries.iter_mut() {
                if key.scope == *scope {
                    entry.stale = true;
                }
            }
            tracing::debug!(scope = scope.as_str(), "invalidated scope");
        }
        Invalidate::Key(key) => {
            if let Some(entry) = inner.entries.get_mut(key) {
                entry.stale = true;
            }
            tracing::debug!(key = %key, "invalidated key");
        }
    }
}

fn decode<T: DeserializeOwned>(data: Value) -> ClientResult<T> {
    serde_json::from_value(data).map_err(|err| ClientError::Decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_cache() -> QueryClient {
        QueryClient::new(CacheConfig {
            list_ttl: Duration::from_millis(40),
            lookup_ttl: Duration::from_millis(200),
        })
    }

    fn counting_loader(
        counter: &Arc<AtomicUsize>,
        value: u32,
    ) -> impl Future<Output = ClientResult<u32>> + Send + 'static {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(value)
        }
    }

    #[tokio::test]
    async fn test_fresh_hit_skips_the_loader() {
        let cache = test_cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::entity(QueryScope::Board, "b1");

        let first: u32 = cache
            .fetch(key.clone(), Freshness::List, || counting_loader(&calls, 7))
            .await
            .unwrap();
        let second: u32 = cache
            .fetch(key, Freshness::List, || counting_loader(&calls, 8))
            .await
            .unwrap();

        assert_eq!(first, 7);
        assert_eq!(second, 7); // served from cache, loader not called
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_share_entries() {
        let cache = test_cache();
        let calls = Arc::new(AtomicUsize::new(0));

        let a: u32 = cache
            .fetch(QueryKey::entity(QueryScope::Board, "b1"), Freshness::List, || {
                counting_loader(&calls, 1)
            })
            .await
            .unwrap();
        let b: u32 = cache
            .fetch(QueryKey::entity(QueryScope::Board, "b2"), Freshness::List, || {
                counting_loader(&calls, 2)
            })
            .await
            .unwrap();

        assert_eq!((a, b), (1, 2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_elapsed_window_triggers_refetch() {
        let cache = test_cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::entity(QueryScope::Board, "b1");

        let _: u32 = cache
            .fetch(key.clone(), Freshness::List, || counting_loader(&calls, 1))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;

        let refreshed: u32 = cache
            .fetch(key, Freshness::List, || counting_loader(&calls, 2))
            .await
            .unwrap();

        assert_eq!(refreshed, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_lookup_window_outlives_list_window() {
        let cache = test_cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::entity(QueryScope::AllUsers, "{}");

        let _: u32 = cache
            .fetch(key.clone(), Freshness::Lookup, || counting_loader(&calls, 1))
            .await
            .unwrap();

        // Past the list window but inside the lookup window.
        tokio::time::sleep(Duration::from_millis(60)).await;

        let _: u32 = cache
            .fetch(key, Freshness::Lookup, || counting_loader(&calls, 2))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidation_forces_refetch_within_window() {
        let cache = test_cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::entity(QueryScope::Boards, "{}");

        let _: u32 = cache
            .fetch(key.clone(), Freshness::List, || counting_loader(&calls, 1))
            .await
            .unwrap();

        cache.invalidate_scope(QueryScope::Boards);

        let refreshed: u32 = cache
            .fetch(key, Freshness::List, || counting_loader(&calls, 2))
            .await
            .unwrap();

        assert_eq!(refreshed, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_identical_queries_share_one_fetch() {
        let cache = Arc::new(test_cache());
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::entity(QueryScope::Boards, "{}");

        let slow_loader = |counter: &Arc<AtomicUsize>| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(30)).await;
                Ok(42u32)
            }
        };

        let (a, b): (ClientResult<u32>, ClientResult<u32>) = tokio::join!(
            cache.fetch(key.clone(), Freshness::List, || slow_loader(&calls)),
            cache.fetch(key.clone(), Freshness::List, || slow_loader(&calls)),
        );

        assert_eq!(a.unwrap(), 42);
        assert_eq!(b.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = test_cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::entity(QueryScope::Board, "b1");

        let failing = {
            let calls = calls.clone();
            move || {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<u32, _>(ClientError::Network("down".to_string()))
                }
            }
        };

        assert!(cache
            .fetch::<u32, _, _>(key.clone(), Freshness::List, failing.clone())
            .await
            .is_err());

        // The error was terminal for that attempt only: a fresh subscriber
        // starts a new fetch.
        let recovered: u32 = cache
            .fetch(key, Freshness::List, || counting_loader(&calls, 5))
            .await
            .unwrap();

        assert_eq!(recovered, 5);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_data() {
        let cache = test_cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::entity(QueryScope::Board, "b1");

        let _: u32 = cache
            .fetch(key.clone(), Freshness::List, || counting_loader(&calls, 9))
            .await
            .unwrap();

        cache.invalidate_key(&key);

        let failed = cache
            .fetch::<u32, _, _>(key.clone(), Freshness::List, || async {
                Err(ClientError::Network("down".to_string()))
            })
            .await;
        assert!(failed.is_err());

        // The stale pre-error value is still present for rendering.
        assert_eq!(cache.cached(&key), Some(serde_json::json!(9)));
    }

    #[tokio::test]
    async fn test_mutation_success_applies_invalidations() {
        let cache = test_cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::entity(QueryScope::Boards, "{}");

        let _: u32 = cache
            .fetch(key.clone(), Freshness::List, || counting_loader(&calls, 1))
            .await
            .unwrap();

        let result: ClientResult<()> = cache
            .mutate(
                MutationTarget::Collection(EntityKind::Board),
                vec![Invalidate::Scope(QueryScope::Boards)],
                || async { Ok(()) },
            )
            .await;
        assert!(result.is_ok());

        let _: u32 = cache
            .fetch(key, Freshness::List, || counting_loader(&calls, 2))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_mutation_failure_leaves_cache_untouched() {
        let cache = test_cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::entity(QueryScope::Boards, "{}");

        let _: u32 = cache
            .fetch(key.clone(), Freshness::List, || counting_loader(&calls, 1))
            .await
            .unwrap();

        let result: ClientResult<()> = cache
            .mutate(
                MutationTarget::Entity(EntityKind::Board, "b1".to_string()),
                vec![Invalidate::Scope(QueryScope::Boards)],
                || async { Err(ClientError::Forbidden("no".to_string())) },
            )
            .await;
        assert!(result.is_err());

        // Still fresh: no invalidation happened, so no refetch occurs.
        let cached: u32 = cache
            .fetch(key, Freshness::List, || counting_loader(&calls, 2))
            .await
            .unwrap();
        assert_eq!(cached, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_second_mutation_for_same_entity_is_rejected() {
        let cache = Arc::new(test_cache());

        let (started_tx, started_rx) = tokio::sync::oneshot::channel();
        let (release_tx, release_rx) = tokio::sync::oneshot::channel();

        let slow = {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache
                    .mutate(
                        MutationTarget::Entity(EntityKind::Task, "t1".to_string()),
                        vec![],
                        || async move {
                            started_tx.send(()).ok();
                            release_rx.await.ok();
                            Ok(())
                        },
                    )
                    .await
            })
        };

        started_rx.await.unwrap();

        let rejected: ClientResult<()> = cache
            .mutate(
                MutationTarget::Entity(EntityKind::Task, "t1".to_string()),
                vec![],
                || async { Ok(()) },
            )
            .await;
        assert!(matches!(rejected, Err(ClientError::MutationInFlight { .. })));

        // A different task is unaffected.
        let other: ClientResult<()> = cache
            .mutate(
                MutationTarget::Entity(EntityKind::Task, "t2".to_string()),
                vec![],
                || async { Ok(()) },
            )
            .await;
        assert!(other.is_ok());

        release_tx.send(()).ok();
        slow.await.unwrap().unwrap();

        // After completion the entity can be mutated again.
        let again: ClientResult<()> = cache
            .mutate(
                MutationTarget::Entity(EntityKind::Task, "t1".to_string()),
                vec![],
                || async { Ok(()) },
            )
            .await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn test_store_writes_through_as_fresh() {
        let cache = test_cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::entity(QueryScope::Board, "b1");

        cache.store(key.clone(), &17u32).unwrap();

        let value: u32 = cache
            .fetch(key, Freshness::List, || counting_loader(&calls, 99))
            .await
            .unwrap();

        assert_eq!(value, 17);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_clear_drops_everything() {
        let cache = test_cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::entity(QueryScope::Board, "b1");

        let _: u32 = cache
            .fetch(key.clone(), Freshness::List, || counting_loader(&calls, 1))
            .await
            .unwrap();

        cache.clear();
        assert!(cache.cached(&key).is_none());

        let _: u32 = cache
            .fetch(key, Freshness::List, || counting_loader(&calls, 2))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}

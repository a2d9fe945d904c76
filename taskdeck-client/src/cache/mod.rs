/// Entity cache layer
///
/// Maps a declarative "what data does this view need" request onto a cached,
/// deduplicated, time-bounded fetch, and provides the mutation primitive
/// that invalidates dependent caches on success.
///
/// # Design Rules
///
/// - A query is identified by `(scope, serialized filter)`; structurally
///   equal filters share one entry, any differing field means a distinct
///   entry.
/// - Within the staleness window a repeated request is served from memory
///   with no network call.
/// - Concurrent requests for one key join a single in-flight fetch.
/// - Mutations invalidate their declared scopes/keys on success only; a
///   failed mutation leaves every cached value untouched.
/// - There are no optimistic updates anywhere: the cache only ever stores
///   server-confirmed data.
///
/// # Modules
///
/// - [`key`]: query identity, mutation targets, invalidation descriptors
/// - [`query_client`]: the cache itself

pub mod key;
pub mod query_client;

pub use key::{EntityKind, Invalidate, MutationTarget, QueryKey, QueryScope};
pub use query_client::{CacheConfig, Freshness, QueryClient};

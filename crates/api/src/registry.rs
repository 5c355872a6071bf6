//! Subscription registry.
//!
//! Tracks which push connections want updates for which aggregation scope.
//! A connection may belong to any number of scope groups; disconnecting
//! removes it from all of them. Fan-out is unordered; closed connections
//! are pruned on publish.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{
    Arc, RwLock,
    atomic::{AtomicU64, Ordering},
};

use collate_db::entities::constituency::Region;
use tokio::sync::mpsc;
use tracing::debug;

use crate::streaming::ServerMessage;

/// Identifier for one push connection.
pub type ConnectionId = u64;

/// Key identifying one aggregation scope group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScopeKey {
    /// National presidential results.
    Presidential,
    /// Parliamentary results of one constituency.
    Constituency(String),
    /// Combined rollup of one region.
    Region(Region),
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Presidential => f.write_str("presidential"),
            Self::Constituency(id) => write!(f, "constituency:{id}"),
            Self::Region(region) => write!(f, "region:{region}"),
        }
    }
}

#[derive(Default)]
struct RegistryInner {
    senders: HashMap<ConnectionId, mpsc::UnboundedSender<ServerMessage>>,
    groups: HashMap<ScopeKey, HashSet<ConnectionId>>,
    memberships: HashMap<ConnectionId, HashSet<ScopeKey>>,
}

impl RegistryInner {
    fn remove(&mut self, conn: ConnectionId) {
        self.senders.remove(&conn);
        if let Some(scopes) = self.memberships.remove(&conn) {
            for scope in scopes {
                if let Some(group) = self.groups.get_mut(&scope) {
                    group.remove(&conn);
                    if group.is_empty() {
                        self.groups.remove(&scope);
                    }
                }
            }
        }
    }
}

/// Shared registry of push subscriptions.
#[derive(Clone, Default)]
pub struct SubscriptionRegistry {
    inner: Arc<RwLock<RegistryInner>>,
    next_id: Arc<AtomicU64>,
}

impl SubscriptionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, RegistryInner> {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, RegistryInner> {
        self.inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Register a new connection and return its ID.
    pub fn register(&self, sender: mpsc::UnboundedSender<ServerMessage>) -> ConnectionId {
        let conn = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut inner = self.write();
        inner.senders.insert(conn, sender);
        conn
    }

    /// Add a connection to a scope group.
    pub fn subscribe(&self, conn: ConnectionId, scope: ScopeKey) {
        let mut inner = self.write();
        if !inner.senders.contains_key(&conn) {
            return;
        }
        debug!(connection = conn, scope = %scope, "Subscribed");
        inner.groups.entry(scope.clone()).or_default().insert(conn);
        inner.memberships.entry(conn).or_default().insert(scope);
    }

    /// Remove a connection from a scope group.
    pub fn unsubscribe(&self, conn: ConnectionId, scope: &ScopeKey) {
        let mut inner = self.write();
        if let Some(group) = inner.groups.get_mut(scope) {
            group.remove(&conn);
            if group.is_empty() {
                inner.groups.remove(scope);
            }
        }
        if let Some(scopes) = inner.memberships.get_mut(&conn) {
            scopes.remove(scope);
        }
    }

    /// Drop a connection from every group it belonged to.
    pub fn remove(&self, conn: ConnectionId) {
        self.write().remove(conn);
    }

    /// Number of connections subscribed to a scope.
    #[must_use]
    pub fn member_count(&self, scope: &ScopeKey) -> usize {
        self.read().groups.get(scope).map_or(0, HashSet::len)
    }

    /// Push a snapshot to every member of a scope group.
    ///
    /// Returns the number of connections the message was handed to.
    /// Connections whose receive side is gone are pruned from the registry.
    pub fn publish(&self, scope: &ScopeKey, message: &ServerMessage) -> usize {
        let (targets, dead) = {
            let inner = self.read();
            let Some(group) = inner.groups.get(scope) else {
                return 0;
            };

            let mut delivered = 0;
            let mut dead = Vec::new();
            for conn in group {
                match inner.senders.get(conn) {
                    Some(sender) if sender.send(message.clone()).is_ok() => delivered += 1,
                    _ => dead.push(*conn),
                }
            }
            (delivered, dead)
        };

        if !dead.is_empty() {
            let mut inner = self.write();
            for conn in dead {
                debug!(connection = conn, "Pruning closed push connection");
                inner.remove(conn);
            }
        }

        targets
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_message() -> ServerMessage {
        ServerMessage::Subscribed {
            channel: "presidential".to_string(),
        }
    }

    #[test]
    fn test_scope_keys() {
        assert_eq!(ScopeKey::Presidential.to_string(), "presidential");
        assert_eq!(
            ScopeKey::Constituency("abc".to_string()).to_string(),
            "constituency:abc"
        );
        assert_eq!(
            ScopeKey::Region(Region::Ashanti).to_string(),
            "region:ASHANTI"
        );
    }

    #[test]
    fn test_subscribe_and_publish() {
        let registry = SubscriptionRegistry::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let conn = registry.register(tx);
        registry.subscribe(conn, ScopeKey::Presidential);

        let delivered = registry.publish(&ScopeKey::Presidential, &test_message());
        assert_eq!(delivered, 1);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_publish_targets_only_the_scope_group() {
        let registry = SubscriptionRegistry::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();

        let presidential = registry.register(tx1);
        let regional = registry.register(tx2);
        registry.subscribe(presidential, ScopeKey::Presidential);
        registry.subscribe(regional, ScopeKey::Region(Region::Volta));

        registry.publish(&ScopeKey::Presidential, &test_message());

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_err());
    }

    #[test]
    fn test_connection_in_multiple_groups() {
        let registry = SubscriptionRegistry::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let conn = registry.register(tx);
        registry.subscribe(conn, ScopeKey::Presidential);
        registry.subscribe(conn, ScopeKey::Constituency("c1".to_string()));

        registry.publish(&ScopeKey::Presidential, &test_message());
        registry.publish(&ScopeKey::Constituency("c1".to_string()), &test_message());

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let registry = SubscriptionRegistry::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let conn = registry.register(tx);
        registry.subscribe(conn, ScopeKey::Presidential);
        registry.unsubscribe(conn, &ScopeKey::Presidential);

        let delivered = registry.publish(&ScopeKey::Presidential, &test_message());
        assert_eq!(delivered, 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_remove_clears_every_group() {
        let registry = SubscriptionRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        let conn = registry.register(tx);
        registry.subscribe(conn, ScopeKey::Presidential);
        registry.subscribe(conn, ScopeKey::Region(Region::Bono));

        registry.remove(conn);

        assert_eq!(registry.member_count(&ScopeKey::Presidential), 0);
        assert_eq!(registry.member_count(&ScopeKey::Region(Region::Bono)), 0);
    }

    #[test]
    fn test_publish_prunes_dead_connections() {
        let registry = SubscriptionRegistry::new();
        let (tx, rx) = mpsc::unbounded_channel();

        let conn = registry.register(tx);
        registry.subscribe(conn, ScopeKey::Presidential);
        drop(rx);

        let delivered = registry.publish(&ScopeKey::Presidential, &test_message());
        assert_eq!(delivered, 0);
        assert_eq!(registry.member_count(&ScopeKey::Presidential), 0);
    }

    #[test]
    fn test_subscribe_unknown_connection_is_ignored() {
        let registry = SubscriptionRegistry::new();
        registry.subscribe(42, ScopeKey::Presidential);
        assert_eq!(registry.member_count(&ScopeKey::Presidential), 0);
    }
}

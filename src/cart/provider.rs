//! Cart state container
//!
//! A [`CartProvider`] is mounted once at startup: it loads the stored cart,
//! owns the in-memory line list and the persistence writer. Consumers get
//! [`CartHandle`]s from it. A handle only works while its provider is alive;
//! using it before provisioning or after shutdown fails immediately with
//! [`MarketError::CartNotProvisioned`]. Besides that, only `add_to_cart`
//! can fail, for a product with a negative price. Store failures are
//! reported on the side channel.

use crate::audit::AuditLog;
use crate::cart::item::{CartItem, Product};
use crate::cart::ops;
use crate::cart::persist::{CartEvent, PersistCallback, Persister, Snapshot};
use crate::cart::summary::{summarize, CartSummary};
use crate::config::schema::DEFAULT_CART_KEY;
use crate::config::{Config, PersistMode};
use crate::error::{MarketError, MarketResult};
use crate::store::KeyValueStore;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::{Arc, Weak};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// Settings for mounting a cart
#[derive(Clone)]
pub struct CartOptions {
    /// Store key holding the cart blob
    pub key: String,

    /// Write strategy
    pub persist_mode: PersistMode,

    /// Audit trail for mutations and failed writes
    pub audit: Option<AuditLog>,

    /// Called after every snapshot write attempt
    pub on_persist: Option<PersistCallback>,
}

impl CartOptions {
    /// Options for `key` with queued persistence and no audit log
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            persist_mode: PersistMode::Queued,
            audit: None,
            on_persist: None,
        }
    }

    /// Options from the `[store]` section
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.store.key.clone()).with_persist_mode(config.store.persist_mode)
    }

    pub fn with_persist_mode(mut self, mode: PersistMode) -> Self {
        self.persist_mode = mode;
        self
    }

    pub fn with_audit(mut self, audit: AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn on_persist(mut self, callback: PersistCallback) -> Self {
        self.on_persist = Some(callback);
        self
    }
}

impl Default for CartOptions {
    fn default() -> Self {
        Self::new(DEFAULT_CART_KEY)
    }
}

struct CartShared {
    key: String,
    items: watch::Sender<Vec<CartItem>>,
    /// Serializes mutations; holds the last sequence number handed out
    seq: Mutex<u64>,
    persister: Persister,
}

impl CartShared {
    async fn apply<F>(&self, event: CartEvent, transform: F)
    where
        F: FnOnce(&[CartItem]) -> Vec<CartItem>,
    {
        let mut seq = self.seq.lock().await;
        let next = transform(&self.items.borrow());
        *seq += 1;

        let encoded = ops::encode(&next);
        self.items.send_replace(next);
        info!("{} {} (cart #{})", event.name(), event.id(), *seq);

        match encoded {
            Ok(blob) => {
                self.persister
                    .persist(Snapshot {
                        seq: *seq,
                        blob,
                        event,
                    })
                    .await;
            }
            Err(e) => warn!("Failed to serialize cart #{} for {}: {}", *seq, self.key, e),
        }
    }
}

/// Owner of the cart state for the lifetime of the app
pub struct CartProvider {
    shared: Arc<CartShared>,
}

impl CartProvider {
    /// Load the cart from `store` and start persistence.
    ///
    /// An absent or empty value yields an empty cart. A value that fails to
    /// parse aborts the mount with [`MarketError::CartCorrupt`].
    pub async fn mount(store: Arc<dyn KeyValueStore>, options: CartOptions) -> MarketResult<Self> {
        let stored = store.get(&options.key).await?;
        let items = ops::decode(&options.key, stored.as_deref())?;
        info!(
            "Loaded {} cart line(s) from {} store",
            items.len(),
            store.backend_name()
        );

        let (items, _) = watch::channel(items);
        let persister = Persister::start(
            options.persist_mode,
            store,
            options.key.clone(),
            options.audit,
            options.on_persist,
        );

        Ok(Self {
            shared: Arc::new(CartShared {
                key: options.key,
                items,
                seq: Mutex::new(0),
                persister,
            }),
        })
    }

    /// A handle for consumers; valid until this provider shuts down
    pub fn handle(&self) -> CartHandle {
        CartHandle {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Store key this cart persists under
    pub fn key(&self) -> &str {
        &self.shared.key
    }

    /// Write out pending snapshots and end the provisioning scope
    pub async fn shutdown(self) {
        self.shared.persister.shutdown().await;
        debug!("Cart provider for {} shut down", self.shared.key);
    }
}

impl fmt::Debug for CartProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartProvider")
            .field("key", &self.shared.key)
            .field("lines", &self.shared.items.borrow().len())
            .finish()
    }
}

/// Consumer access to the cart
#[derive(Clone, Default)]
pub struct CartHandle {
    shared: Weak<CartShared>,
}

impl CartHandle {
    /// A handle not attached to any provider
    pub fn detached() -> Self {
        Self::default()
    }

    /// Whether the provider behind this handle is still alive
    pub fn is_provisioned(&self) -> bool {
        self.shared.strong_count() > 0
    }

    fn shared(&self) -> MarketResult<Arc<CartShared>> {
        self.shared.upgrade().ok_or(MarketError::CartNotProvisioned)
    }

    /// Snapshot of the current lines
    pub fn items(&self) -> MarketResult<Vec<CartItem>> {
        Ok(self.shared()?.items.borrow().clone())
    }

    /// Receiver that observes every change to the lines
    pub fn subscribe(&self) -> MarketResult<watch::Receiver<Vec<CartItem>>> {
        Ok(self.shared()?.items.subscribe())
    }

    /// Totals for the current lines
    pub fn summary(&self) -> MarketResult<CartSummary> {
        Ok(summarize(&self.shared()?.items.borrow()))
    }

    /// Append `product` with quantity 1
    pub async fn add_to_cart(&self, product: Product) -> MarketResult<()> {
        let shared = self.shared()?;
        if product.price < Decimal::ZERO {
            return Err(MarketError::InvalidPrice {
                id: product.id,
                price: product.price,
            });
        }
        let event = CartEvent::Added {
            id: product.id.clone(),
        };
        shared.apply(event, |items| ops::add(items, product)).await;
        Ok(())
    }

    /// Raise the quantity of lines matching `id`
    pub async fn increment(&self, id: &str) -> MarketResult<()> {
        let shared = self.shared()?;
        let event = CartEvent::Incremented { id: id.to_string() };
        shared.apply(event, |items| ops::increment(items, id)).await;
        Ok(())
    }

    /// Lower the quantity of lines matching `id`, removing lines at 1
    pub async fn decrement(&self, id: &str) -> MarketResult<()> {
        let shared = self.shared()?;
        let event = CartEvent::Decremented { id: id.to_string() };
        shared.apply(event, |items| ops::decrement(items, id)).await;
        Ok(())
    }

    /// Wait for all snapshots queued so far to be written
    pub async fn flush(&self) -> MarketResult<()> {
        self.shared()?.persister.flush().await;
        Ok(())
    }
}

impl fmt::Debug for CartHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartHandle")
            .field("provisioned", &self.is_provisioned())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::persist::PersistOutcome;
    use crate::store::MemoryStore;
    use std::sync::Mutex as StdMutex;

    const KEY: &str = DEFAULT_CART_KEY;

    fn shirt() -> Product {
        Product {
            id: "1".to_string(),
            title: "Shirt".to_string(),
            image_url: "u".to_string(),
            price: Decimal::from(50),
        }
    }

    fn line(id: &str, quantity: u32) -> CartItem {
        CartItem {
            id: id.to_string(),
            title: format!("Item {}", id),
            image_url: format!("{}.png", id),
            price: Decimal::from(5),
            quantity,
        }
    }

    async fn mount(store: &Arc<MemoryStore>) -> CartProvider {
        let store: Arc<dyn KeyValueStore> = store.clone();
        CartProvider::mount(store, CartOptions::default())
            .await
            .unwrap()
    }

    fn seeded(items: &[CartItem]) -> Arc<MemoryStore> {
        Arc::new(MemoryStore::with_entry(
            KEY,
            &serde_json::to_string(items).unwrap(),
        ))
    }

    #[tokio::test]
    async fn empty_store_then_add() {
        let store = Arc::new(MemoryStore::new());
        let provider = mount(&store).await;
        let cart = provider.handle();

        assert!(cart.items().unwrap().is_empty());

        cart.add_to_cart(shirt()).await.unwrap();
        cart.flush().await.unwrap();

        let expected = vec![CartItem::from_product(shirt())];
        assert_eq!(cart.items().unwrap(), expected);
        assert_eq!(
            store.peek(KEY).unwrap(),
            serde_json::to_string(&expected).unwrap()
        );
    }

    #[tokio::test]
    async fn negative_price_is_rejected_and_cart_reloads() {
        let store = Arc::new(MemoryStore::new());
        let provider = mount(&store).await;
        let cart = provider.handle();

        let refund = Product {
            price: Decimal::from(-5),
            ..shirt()
        };
        let err = cart.add_to_cart(refund).await.unwrap_err();
        assert!(matches!(err, MarketError::InvalidPrice { ref id, .. } if id == "1"));

        let cheap = Product {
            id: "2".to_string(),
            price: Decimal::new(1, 1),
            ..shirt()
        };
        cart.add_to_cart(cheap.clone()).await.unwrap();
        let free = Product {
            price: Decimal::ZERO,
            ..shirt()
        };
        cart.add_to_cart(free).await.unwrap();
        provider.shutdown().await;

        let remounted = mount(&store).await;
        let items = remounted.handle().items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], CartItem::from_product(cheap));
        assert_eq!(items[1].price, Decimal::ZERO);
    }

    #[tokio::test]
    async fn decrement_last_unit_persists_empty_array() {
        let store = seeded(&[line("1", 1)]);
        let provider = mount(&store).await;
        let cart = provider.handle();

        cart.decrement("1").await.unwrap();
        cart.flush().await.unwrap();

        assert!(cart.items().unwrap().is_empty());
        assert_eq!(store.peek(KEY).as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn mutations_preserve_order() {
        let store = seeded(&[line("a", 1), line("b", 3), line("c", 1)]);
        let provider = mount(&store).await;
        let cart = provider.handle();

        cart.decrement("b").await.unwrap();
        cart.increment("c").await.unwrap();

        assert_eq!(
            cart.items().unwrap(),
            vec![line("a", 1), line("b", 2), line("c", 2)]
        );
    }

    #[tokio::test]
    async fn add_twice_keeps_duplicate_lines() {
        let store = Arc::new(MemoryStore::new());
        let provider = mount(&store).await;
        let cart = provider.handle();

        cart.add_to_cart(shirt()).await.unwrap();
        cart.add_to_cart(shirt()).await.unwrap();

        let items = cart.items().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|item| item.id == "1" && item.quantity == 1));
    }

    #[tokio::test]
    async fn unknown_id_is_noop_but_still_persists() {
        let store = seeded(&[line("a", 2)]);
        let provider = mount(&store).await;
        let cart = provider.handle();

        cart.increment("missing").await.unwrap();
        cart.decrement("missing").await.unwrap();
        cart.flush().await.unwrap();

        assert_eq!(cart.items().unwrap(), vec![line("a", 2)]);
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn empty_blob_loads_as_empty_cart() {
        let store = Arc::new(MemoryStore::with_entry(KEY, ""));
        let provider = mount(&store).await;
        assert!(provider.handle().items().unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_blob_fails_mount() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::with_entry(KEY, "[{\"id\":"));
        let err = CartProvider::mount(store, CartOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::CartCorrupt { .. }));
    }

    #[tokio::test]
    async fn detached_handle_fails_fast() {
        let cart = CartHandle::detached();

        assert!(!cart.is_provisioned());
        assert!(matches!(
            cart.items().unwrap_err(),
            MarketError::CartNotProvisioned
        ));
        assert!(matches!(
            cart.add_to_cart(shirt()).await.unwrap_err(),
            MarketError::CartNotProvisioned
        ));
    }

    #[tokio::test]
    async fn handle_fails_after_shutdown() {
        let store = Arc::new(MemoryStore::new());
        let provider = mount(&store).await;
        let cart = provider.handle();

        cart.add_to_cart(shirt()).await.unwrap();
        provider.shutdown().await;

        // Pending write landed before the scope ended
        assert!(store.peek(KEY).is_some());
        assert!(matches!(
            cart.increment("1").await.unwrap_err(),
            MarketError::CartNotProvisioned
        ));
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let store = Arc::new(MemoryStore::new());
        let provider = mount(&store).await;
        let cart = provider.handle();
        let mut rx = cart.subscribe().unwrap();

        cart.add_to_cart(shirt()).await.unwrap();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);
    }

    #[tokio::test]
    async fn failed_write_keeps_memory_state() {
        let store = Arc::new(MemoryStore::with_entry(KEY, "[]"));
        store.set_fail_writes(true);

        let seen = Arc::new(StdMutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);
        let options = CartOptions::default().on_persist(Arc::new(move |outcome: &PersistOutcome| {
            recorder.lock().unwrap().push(outcome.clone());
        }));
        let dyn_store: Arc<dyn KeyValueStore> = store.clone();
        let provider = CartProvider::mount(dyn_store, options).await.unwrap();
        let cart = provider.handle();

        cart.add_to_cart(shirt()).await.unwrap();
        cart.flush().await.unwrap();

        assert_eq!(cart.items().unwrap().len(), 1);
        assert_eq!(store.peek(KEY).as_deref(), Some("[]"));
        assert!(seen.lock().unwrap()[0].is_failed());
    }

    #[tokio::test]
    async fn immediate_mode_persists_without_flush() {
        let store = Arc::new(MemoryStore::new());
        let dyn_store: Arc<dyn KeyValueStore> = store.clone();
        let provider = CartProvider::mount(
            dyn_store,
            CartOptions::default().with_persist_mode(PersistMode::Immediate),
        )
        .await
        .unwrap();

        provider.handle().add_to_cart(shirt()).await.unwrap();

        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn summary_tracks_items() {
        let store = seeded(&[line("a", 2), line("b", 1)]);
        let provider = mount(&store).await;

        let summary = provider.handle().summary().unwrap();
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.subtotal, Decimal::from(15));
    }
}

//! The cart store: sole owner and writer of the cart collection.

use crate::cart::{CartItemDraft, CartLineItem, CartStorage, EphemeralStorage};
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// Client-side shopping cart.
///
/// Holds at most one line item per product id, each with `quantity >= 1`.
/// Every mutation is synchronous and is followed by a best-effort write to
/// the storage port; storage failures are logged and otherwise ignored, so
/// the cart keeps working in memory.
#[derive(Debug)]
pub struct CartStore<S: CartStorage = EphemeralStorage> {
    items: Vec<CartLineItem>,
    storage: S,
    hydrated: bool,
}

impl CartStore<EphemeralStorage> {
    /// A cart that is never written anywhere.
    pub fn in_memory() -> Self {
        Self::new(EphemeralStorage)
    }
}

impl Default for CartStore<EphemeralStorage> {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<S: CartStorage> CartStore<S> {
    /// Create an empty cart that writes through to `storage` but has not
    /// read from it.
    pub fn new(storage: S) -> Self {
        Self {
            items: Vec::new(),
            storage,
            hydrated: false,
        }
    }

    /// Restore a cart from `storage`.
    ///
    /// An unreadable record yields an empty cart. Records that violate the
    /// cart invariants (duplicate ids, non-positive quantities) are repaired
    /// rather than rejected.
    pub fn hydrate(storage: S) -> Self {
        let mut store = Self::new(storage);
        match store.storage.load() {
            Ok(Some(items)) => {
                store.items = normalize(items);
                tracing::debug!(items = store.items.len(), "cart restored from storage");
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "failed to restore cart, starting empty");
            }
        }
        store.hydrated = true;
        store
    }

    /// Whether the cart has been restored from storage.
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Add one unit of a product.
    ///
    /// A repeat add only bumps the quantity; the stored name and price are
    /// kept as they were first added.
    pub fn add_item(&mut self, draft: CartItemDraft) {
        match self.items.iter_mut().find(|i| i.id == draft.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(1);
            }
            None => self.items.push(CartLineItem::from_draft(draft)),
        }
        self.persist();
    }

    /// Remove a product's line item. Missing ids are ignored.
    pub fn remove_item(&mut self, id: &ProductId) {
        let len_before = self.items.len();
        self.items.retain(|i| &i.id != id);
        if self.items.len() != len_before {
            self.persist();
        }
    }

    /// Set a product's quantity; zero or below removes the line item.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| &i.id == id) {
            item.quantity = quantity;
            self.persist();
        }
    }

    /// Remove everything.
    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Sum of price times quantity over all line items.
    pub fn total_amount(&self) -> Money {
        self.items
            .iter()
            .fold(Money::zero(Currency::RUB), |acc, item| {
                acc.saturating_add(&item.line_total())
            })
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Look up a line item by product id.
    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Number of distinct line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all line items.
    pub fn item_count(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |acc, i| acc.saturating_add(i.quantity))
    }

    /// The storage port.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&self) {
        if let Err(e) = self.storage.save(&self.items) {
            tracing::warn!(error = %e, items = self.items.len(), "failed to persist cart");
        }
    }
}

/// Merge duplicate ids (summing quantities, first occurrence wins for the
/// other fields) and drop non-positive quantities.
fn normalize(items: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut out: Vec<CartLineItem> = Vec::with_capacity(items.len());
    for item in items {
        if item.quantity < 1 {
            continue;
        }
        match out.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => out.push(item),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CommerceError;
    use proptest::prelude::*;
    use std::cell::{Cell, RefCell};

    /// Storage double that remembers the last save and can be told to fail.
    #[derive(Default)]
    struct RecordingStorage {
        saved: RefCell<Option<Vec<CartLineItem>>>,
        saves: Cell<usize>,
        fail_writes: bool,
        fail_reads: bool,
    }

    impl CartStorage for RecordingStorage {
        fn load(&self) -> Result<Option<Vec<CartLineItem>>, CommerceError> {
            if self.fail_reads {
                return Err(CommerceError::StorageError("read denied".to_string()));
            }
            Ok(self.saved.borrow().clone())
        }

        fn save(&self, items: &[CartLineItem]) -> Result<(), CommerceError> {
            self.saves.set(self.saves.get() + 1);
            if self.fail_writes {
                return Err(CommerceError::StorageError("quota exceeded".to_string()));
            }
            *self.saved.borrow_mut() = Some(items.to_vec());
            Ok(())
        }
    }

    fn draft(id: &str, rubles: i64) -> CartItemDraft {
        CartItemDraft::new(id, format!("Товар {}", id), Money::new(rubles * 100, Currency::RUB))
    }

    #[test]
    fn test_add_same_item_increments_quantity() {
        let mut cart = CartStore::in_memory();
        cart.add_item(draft("p1", 1000));
        cart.add_item(draft("p1", 1000));
        cart.add_item(draft("p2", 500));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get(&"p1".into()).unwrap().quantity, 2);
        assert_eq!(cart.total_amount(), Money::new(250000, Currency::RUB));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_repeat_add_keeps_original_fields() {
        let mut cart = CartStore::in_memory();
        cart.add_item(draft("p1", 1000));
        cart.add_item(CartItemDraft::new("p1", "Renamed", Money::new(1, Currency::RUB)));

        let item = cart.get(&"p1".into()).unwrap();
        assert_eq!(item.name, "Товар p1");
        assert_eq!(item.price, Money::new(100000, Currency::RUB));
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_update_quantity_to_zero_removes() {
        let mut cart = CartStore::in_memory();
        cart.add_item(draft("p1", 1000));
        cart.add_item(draft("p1", 1000));
        cart.add_item(draft("p2", 500));

        cart.update_quantity(&"p1".into(), 0);
        assert_eq!(cart.len(), 1);
        assert!(cart.get(&"p1".into()).is_none());
        assert_eq!(cart.total_amount(), Money::new(50000, Currency::RUB));
    }

    #[test]
    fn test_update_quantity_negative_removes() {
        let mut cart = CartStore::in_memory();
        cart.add_item(draft("p1", 10));
        cart.update_quantity(&"p1".into(), -1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_sets_value_without_upper_bound() {
        let mut cart = CartStore::in_memory();
        cart.add_item(draft("p1", 10));
        cart.update_quantity(&"p1".into(), 100_000);
        assert_eq!(cart.get(&"p1".into()).unwrap().quantity, 100_000);
    }

    #[test]
    fn test_update_and_remove_missing_are_noops() {
        let storage = RecordingStorage::default();
        let mut cart = CartStore::new(storage);
        cart.update_quantity(&"ghost".into(), 5);
        cart.remove_item(&"ghost".into());
        assert!(cart.is_empty());
        assert_eq!(cart.storage().saves.get(), 0);
    }

    #[test]
    fn test_clear_cart() {
        let mut cart = CartStore::in_memory();
        cart.add_item(draft("p1", 10));
        cart.add_item(draft("p2", 20));
        cart.clear_cart();
        assert!(cart.is_empty());
        assert!(cart.total_amount().is_zero());
    }

    #[test]
    fn test_every_mutation_persists() {
        let mut cart = CartStore::new(RecordingStorage::default());
        cart.add_item(draft("p1", 10));
        cart.update_quantity(&"p1".into(), 4);
        cart.clear_cart();

        assert_eq!(cart.storage().saves.get(), 3);
        assert_eq!(cart.storage().saved.borrow().as_deref(), Some(&[][..]));
    }

    #[test]
    fn test_storage_write_failure_is_swallowed() {
        let storage = RecordingStorage {
            fail_writes: true,
            ..Default::default()
        };
        let mut cart = CartStore::new(storage);
        cart.add_item(draft("p1", 10));
        cart.add_item(draft("p1", 10));

        assert_eq!(cart.get(&"p1".into()).unwrap().quantity, 2);
        assert_eq!(cart.storage().saves.get(), 2);
    }

    #[test]
    fn test_hydrate_restores_saved_items() {
        let mut cart = CartStore::new(RecordingStorage::default());
        assert!(!cart.is_hydrated());
        cart.add_item(draft("p1", 1000));
        cart.add_item(draft("p1", 1000));

        let restored = CartStore::hydrate(cart.storage);
        assert!(restored.is_hydrated());
        assert_eq!(restored.get(&"p1".into()).unwrap().quantity, 2);
        assert_eq!(restored.total_amount(), Money::new(200000, Currency::RUB));
    }

    #[test]
    fn test_hydrate_read_failure_starts_empty() {
        let storage = RecordingStorage {
            fail_reads: true,
            ..Default::default()
        };
        let cart = CartStore::hydrate(storage);
        assert!(cart.is_hydrated());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_hydrate_repairs_invalid_records() {
        let mut a = CartLineItem::from_draft(draft("p1", 10));
        a.quantity = 2;
        let mut b = CartLineItem::from_draft(draft("p1", 99));
        b.quantity = 3;
        let mut c = CartLineItem::from_draft(draft("p2", 10));
        c.quantity = 0;

        let storage = RecordingStorage::default();
        *storage.saved.borrow_mut() = Some(vec![a, b, c]);

        let cart = CartStore::hydrate(storage);
        assert_eq!(cart.len(), 1);
        let p1 = cart.get(&"p1".into()).unwrap();
        assert_eq!(p1.quantity, 5);
        assert_eq!(p1.price, Money::new(1000, Currency::RUB));
    }

    proptest! {
        #[test]
        fn prop_repeated_adds_collapse_to_one_line(n in 1usize..50) {
            let mut cart = CartStore::in_memory();
            for _ in 0..n {
                cart.add_item(draft("p1", 7));
            }
            prop_assert_eq!(cart.len(), 1);
            prop_assert_eq!(cart.get(&"p1".into()).unwrap().quantity, n as i64);
        }

        #[test]
        fn prop_total_matches_line_sum(
            ops in prop::collection::vec((0u8..5, 1i64..10_000, -3i64..20), 0..40)
        ) {
            let mut cart = CartStore::in_memory();
            for (id, price, qty) in ops {
                let id = format!("p{}", id);
                if qty <= 0 || qty % 4 == 0 {
                    cart.update_quantity(&id.as_str().into(), qty);
                } else {
                    cart.add_item(CartItemDraft::new(id.as_str(), "x", Money::new(price, Currency::RUB)));
                }
            }

            let expected: i64 = cart.items().iter().map(|i| i.price.amount_minor * i.quantity).sum();
            prop_assert_eq!(cart.total_amount().amount_minor, expected);
            prop_assert!(cart.items().iter().all(|i| i.quantity >= 1));

            let mut ids: Vec<_> = cart.items().iter().map(|i| i.id.clone()).collect();
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), cart.len());
        }
    }
}

//! Persistence seam for inventory documents.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use feralhost_protocol::AccountId;
use parking_lot::RwLock;

use crate::{InventoryAccessor, InventoryDocument, InventoryError, PlayerInventory};

/// Durable storage for player inventories.
///
/// The server only ever loads a whole inventory at login and saves
/// single documents as they become dirty. How documents are laid out
/// on disk (or anywhere else) is up to the implementation.
pub trait InventoryStore: Send + Sync + 'static {
    /// Loads every document of an account. Unknown accounts get an
    /// empty inventory.
    fn load(&self, account: &AccountId) -> Result<PlayerInventory, InventoryError>;

    /// Replaces one document of an account.
    fn save(
        &self,
        account: &AccountId,
        category: &str,
        document: &InventoryDocument,
    ) -> Result<(), InventoryError>;
}

impl<S: InventoryStore + ?Sized> InventoryStore for Arc<S> {
    fn load(&self, account: &AccountId) -> Result<PlayerInventory, InventoryError> {
        (**self).load(account)
    }

    fn save(
        &self,
        account: &AccountId,
        category: &str,
        document: &InventoryDocument,
    ) -> Result<(), InventoryError> {
        (**self).save(account, category, document)
    }
}

/// Saves every dirty document of `accessor`, then acknowledges the flush.
///
/// Returns the number of documents written. If a save fails the dirty
/// set is left as it was, so the next flush retries everything.
pub fn flush_dirty<S>(
    accessor: &mut InventoryAccessor,
    account: &AccountId,
    store: &S,
) -> Result<usize, InventoryError>
where
    S: InventoryStore + ?Sized,
{
    let categories = accessor.dirty_categories();
    if categories.is_empty() {
        return Ok(0);
    }

    let empty = InventoryDocument::new();
    for category in &categories {
        let document = accessor.inventory().get(category).unwrap_or(&empty);
        store.save(account, category, document)?;
    }
    accessor.acknowledge_flush();

    tracing::debug!(%account, documents = categories.len(), "inventory flushed");
    Ok(categories.len())
}

/// An in-process [`InventoryStore`].
///
/// Documents are kept as encoded JSON, exactly as a file-backed store
/// would write them, so loading goes through the same decoding path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: RwLock<HashMap<AccountId, BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an account with a full inventory.
    pub fn insert(&self, account: AccountId, inventory: &PlayerInventory) -> Result<(), InventoryError> {
        let mut encoded = BTreeMap::new();
        for category in inventory.categories() {
            if let Some(document) = inventory.get(category) {
                encoded.insert(category.to_string(), encode(category, document)?);
            }
        }
        self.accounts.write().insert(account, encoded);
        Ok(())
    }

    /// Returns the stored JSON of one document.
    pub fn raw_document(&self, account: &AccountId, category: &str) -> Option<String> {
        self.accounts.read().get(account)?.get(category).cloned()
    }

    pub fn contains_account(&self, account: &AccountId) -> bool {
        self.accounts.read().contains_key(account)
    }
}

impl InventoryStore for MemoryStore {
    fn load(&self, account: &AccountId) -> Result<PlayerInventory, InventoryError> {
        let accounts = self.accounts.read();
        let mut inventory = PlayerInventory::new();
        if let Some(documents) = accounts.get(account) {
            for (category, json) in documents {
                let document = serde_json::from_str(json).map_err(|source| InventoryError::Decode {
                    category: category.clone(),
                    source,
                })?;
                inventory.insert(category.clone(), document);
            }
        }
        Ok(inventory)
    }

    fn save(
        &self,
        account: &AccountId,
        category: &str,
        document: &InventoryDocument,
    ) -> Result<(), InventoryError> {
        let json = encode(category, document)?;
        self.accounts
            .write()
            .entry(account.clone())
            .or_default()
            .insert(category.to_string(), json);
        Ok(())
    }
}

fn encode(category: &str, document: &InventoryDocument) -> Result<String, InventoryError> {
    serde_json::to_string(document).map_err(|source| InventoryError::Encode {
        category: category.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use feralhost_catalog::Catalogs;

    use super::*;

    struct FailingStore;

    impl InventoryStore for FailingStore {
        fn load(&self, _: &AccountId) -> Result<PlayerInventory, InventoryError> {
            Ok(PlayerInventory::new())
        }

        fn save(&self, _: &AccountId, _: &str, _: &InventoryDocument) -> Result<(), InventoryError> {
            Err(InventoryError::Storage("disk full".into()))
        }
    }

    fn accessor() -> InventoryAccessor {
        InventoryAccessor::new(PlayerInventory::new(), Arc::new(Catalogs::empty()))
    }

    #[test]
    fn test_flush_dirty_saves_and_acknowledges() {
        let store = MemoryStore::new();
        let account = AccountId::from("acct-1");
        let mut acc = accessor();
        acc.add_dye(7);
        acc.unlock_avatar_part(12);

        let written = flush_dirty(&mut acc, &account, &store).unwrap();
        assert_eq!(written, 2);
        assert!(!acc.is_dirty());

        let loaded = store.load(&account).unwrap();
        assert_eq!(loaded.get("111").map(InventoryDocument::len), Some(1));
        assert_eq!(loaded.get("2").map(InventoryDocument::len), Some(1));
    }

    #[test]
    fn test_flush_dirty_keeps_dirty_set_on_error() {
        let mut acc = accessor();
        acc.add_house(2694);
        let result = flush_dirty(&mut acc, &AccountId::from("a"), &FailingStore);
        assert!(matches!(result, Err(InventoryError::Storage(_))));
        assert_eq!(acc.dirty_categories(), vec!["5".to_string()]);
    }

    #[test]
    fn test_flush_dirty_nothing_to_do() {
        let mut acc = accessor();
        let written = flush_dirty(&mut acc, &AccountId::from("a"), &FailingStore).unwrap();
        assert_eq!(written, 0);
    }

    #[test]
    fn test_memory_store_unknown_account_loads_empty() {
        let store = MemoryStore::new();
        let inventory = store.load(&AccountId::from("nobody")).unwrap();
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_memory_store_corrupt_document_fails_decode() {
        let store = MemoryStore::new();
        let account = AccountId::from("a");
        store
            .accounts
            .write()
            .entry(account.clone())
            .or_default()
            .insert("100".into(), "{not json".into());
        assert!(matches!(
            store.load(&account),
            Err(InventoryError::Decode { .. })
        ));
    }
}

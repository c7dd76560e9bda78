// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The console's record store.
//!
//! [`ConsoleStore`] is an owned service shared as `Arc<ConsoleStore>`. It
//! reads and writes the three JSON records through a [`StorageAdapter`],
//! applies the seed/reseed policy, orders contacts by recency, serializes
//! contact-list writes behind one lock, tracks inbox focus, and publishes
//! a [`StoreEvent`] after every write.

use std::sync::{Arc, RwLock};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use lineoa_bus::{EventBus, StoreEvent};
use lineoa_config::model::StorageConfig;
use lineoa_core::{Contact, KeywordRule, LineOaError, StorageAdapter, SystemSettings};

use crate::{seed, MemoryStorage, SqliteStorage, CONTACTS_KEY, RULES_KEY, SETTINGS_KEY};

/// How a record read was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    /// The stored record parsed.
    Stored,
    /// No record existed; the seed was written and returned.
    Seeded,
    /// The stored record did not parse; it was replaced by the seed.
    Reseeded,
}

pub struct ConsoleStore {
    backend: Arc<dyn StorageAdapter>,
    bus: Arc<EventBus>,
    contacts_lock: Mutex<()>,
    focus: RwLock<Option<String>>,
}

impl ConsoleStore {
    /// Wraps an already-initialized backend.
    pub fn new(backend: Arc<dyn StorageAdapter>, bus: Arc<EventBus>) -> Self {
        Self {
            backend,
            bus,
            contacts_lock: Mutex::new(()),
            focus: RwLock::new(None),
        }
    }

    /// Opens the SQLite backend described by `config`.
    pub async fn open(config: &StorageConfig, bus: Arc<EventBus>) -> Result<Self, LineOaError> {
        let storage = SqliteStorage::new(config.clone());
        storage.initialize().await?;
        Ok(Self::new(Arc::new(storage), bus))
    }

    /// A store backed by process memory only.
    pub fn ephemeral(bus: Arc<EventBus>) -> Self {
        Self::new(Arc::new(MemoryStorage::new()), bus)
    }

    pub fn backend(&self) -> &Arc<dyn StorageAdapter> {
        &self.backend
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    // --- Contacts ---

    /// Contacts ordered by descending last-active time, plus how the read
    /// was satisfied.
    pub async fn load_contacts(&self) -> Result<(Vec<Contact>, RecordStatus), LineOaError> {
        let (mut contacts, status) =
            self.load_record(CONTACTS_KEY, || seed::contacts(Utc::now())).await?;
        sort_by_recency(&mut contacts);
        Ok((contacts, status))
    }

    pub async fn get_contacts(&self) -> Result<Vec<Contact>, LineOaError> {
        Ok(self.load_contacts().await?.0)
    }

    /// Overwrites the whole contact list. Last writer wins.
    pub async fn save_contacts(&self, contacts: &[Contact]) -> Result<(), LineOaError> {
        let _guard = self.contacts_lock.lock().await;
        self.write_contacts(contacts).await
    }

    /// Read-modify-write of the contact list under the contact write lock.
    ///
    /// `f` sees the list in recency order. The list is written back and a
    /// change published regardless of what `f` did.
    pub async fn modify_contacts<F, R>(&self, f: F) -> Result<R, LineOaError>
    where
        F: FnOnce(&mut Vec<Contact>) -> R,
    {
        let _guard = self.contacts_lock.lock().await;
        let mut contacts = self.get_contacts().await?;
        let out = f(&mut contacts);
        self.write_contacts(&contacts).await?;
        Ok(out)
    }

    /// Applies `f` to the contact with `id` under the contact write lock.
    ///
    /// Returns `None` and writes nothing when no such contact exists.
    pub async fn update_contact<F, R>(&self, id: &str, f: F) -> Result<Option<R>, LineOaError>
    where
        F: FnOnce(&mut Contact) -> R,
    {
        let _guard = self.contacts_lock.lock().await;
        let mut contacts = self.get_contacts().await?;
        let Some(contact) = contacts.iter_mut().find(|c| c.id == id) else {
            debug!(contact_id = id, "update skipped: contact not found");
            return Ok(None);
        };
        let out = f(contact);
        self.write_contacts(&contacts).await?;
        Ok(Some(out))
    }

    /// Removes the contact with `id`. Returns whether it existed.
    pub async fn remove_contact(&self, id: &str) -> Result<bool, LineOaError> {
        let _guard = self.contacts_lock.lock().await;
        let mut contacts = self.get_contacts().await?;
        let before = contacts.len();
        contacts.retain(|c| c.id != id);
        if contacts.len() == before {
            return Ok(false);
        }
        self.write_contacts(&contacts).await?;
        if self.focused().as_deref() == Some(id) {
            self.set_focus(None);
        }
        info!(contact_id = id, "contact deleted");
        Ok(true)
    }

    async fn write_contacts(&self, contacts: &[Contact]) -> Result<(), LineOaError> {
        let json = serde_json::to_string(contacts)?;
        self.backend.write_record(CONTACTS_KEY, &json).await?;
        self.bus.publish(StoreEvent::ContactsChanged);
        Ok(())
    }

    // --- Rules ---

    pub async fn load_rules(&self) -> Result<(Vec<KeywordRule>, RecordStatus), LineOaError> {
        self.load_record(RULES_KEY, seed::rules).await
    }

    /// Rules in stored order.
    pub async fn get_rules(&self) -> Result<Vec<KeywordRule>, LineOaError> {
        Ok(self.load_rules().await?.0)
    }

    pub async fn save_rules(&self, rules: &[KeywordRule]) -> Result<(), LineOaError> {
        let json = serde_json::to_string(rules)?;
        self.backend.write_record(RULES_KEY, &json).await?;
        self.bus.publish(StoreEvent::RulesChanged);
        Ok(())
    }

    // --- Settings ---

    pub async fn load_settings(&self) -> Result<(SystemSettings, RecordStatus), LineOaError> {
        self.load_record(SETTINGS_KEY, seed::settings).await
    }

    pub async fn get_settings(&self) -> Result<SystemSettings, LineOaError> {
        Ok(self.load_settings().await?.0)
    }

    pub async fn save_settings(&self, settings: &SystemSettings) -> Result<(), LineOaError> {
        let json = serde_json::to_string(settings)?;
        self.backend.write_record(SETTINGS_KEY, &json).await?;
        self.bus.publish(StoreEvent::SettingsChanged);
        Ok(())
    }

    // --- Focus ---

    /// Sets (or clears) the contact currently open in the inbox.
    pub fn set_focus(&self, id: Option<String>) {
        let mut focus = self.focus.write().unwrap_or_else(|e| e.into_inner());
        *focus = id;
    }

    pub fn focused(&self) -> Option<String> {
        self.focus
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_focused(&self, id: &str) -> bool {
        self.focused().as_deref() == Some(id)
    }

    /// Flushes and closes the backend.
    pub async fn close(&self) -> Result<(), LineOaError> {
        self.backend.close().await
    }

    async fn load_record<T, S>(&self, key: &str, seed: S) -> Result<(T, RecordStatus), LineOaError>
    where
        T: Serialize + DeserializeOwned,
        S: FnOnce() -> T,
    {
        let Some(raw) = self.backend.read_record(key).await? else {
            let value = seed();
            self.backend
                .write_record(key, &serde_json::to_string(&value)?)
                .await?;
            debug!(key, "record seeded");
            return Ok((value, RecordStatus::Seeded));
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => Ok((value, RecordStatus::Stored)),
            Err(e) => {
                warn!(key, error = %e, "stored record is malformed, replacing with seed");
                let value = seed();
                self.backend
                    .write_record(key, &serde_json::to_string(&value)?)
                    .await?;
                Ok((value, RecordStatus::Reseeded))
            }
        }
    }
}

fn sort_by_recency(contacts: &mut [Contact]) {
    contacts.sort_by(|a, b| b.last_active.cmp(&a.last_active));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use lineoa_core::Message;

    fn store() -> ConsoleStore {
        ConsoleStore::ephemeral(Arc::new(EventBus::new()))
    }

    #[tokio::test]
    async fn first_read_seeds_then_reads_stored() {
        let store = store();
        let (contacts, status) = store.load_contacts().await.unwrap();
        assert_eq!(status, RecordStatus::Seeded);
        assert_eq!(contacts.len(), 2);
        // Jane Doe is more recent.
        assert_eq!(contacts[0].display_name, "Jane Doe");

        let (_, status) = store.load_contacts().await.unwrap();
        assert_eq!(status, RecordStatus::Stored);
    }

    #[tokio::test]
    async fn malformed_rules_are_reseeded_and_overwritten() {
        let backend = Arc::new(MemoryStorage::new().with_record(RULES_KEY, "{not json"));
        let store = ConsoleStore::new(backend.clone(), Arc::new(EventBus::new()));

        let (rules, status) = store.load_rules().await.unwrap();
        assert_eq!(status, RecordStatus::Reseeded);
        assert_eq!(rules, seed::rules());

        let raw = backend.read_record(RULES_KEY).await.unwrap().unwrap();
        assert!(serde_json::from_str::<Vec<KeywordRule>>(&raw).is_ok());
        assert_eq!(store.load_rules().await.unwrap().1, RecordStatus::Stored);
    }

    #[tokio::test]
    async fn structurally_wrong_settings_are_reseeded() {
        let backend = Arc::new(MemoryStorage::new().with_record(SETTINGS_KEY, "[1,2,3]"));
        let store = ConsoleStore::new(backend, Arc::new(EventBus::new()));
        let (settings, status) = store.load_settings().await.unwrap();
        assert_eq!(status, RecordStatus::Reseeded);
        assert!(settings.is_ai_enabled);
    }

    #[tokio::test]
    async fn get_contacts_orders_by_last_active_desc() {
        let store = store();
        let now = Utc::now();
        let mut old = Contact::new_customer();
        old.last_active = now - Duration::hours(2);
        let mut new = Contact::new_customer();
        new.last_active = now;
        let mut mid = Contact::new_customer();
        mid.last_active = now - Duration::hours(1);

        store
            .save_contacts(&[old.clone(), new.clone(), mid.clone()])
            .await
            .unwrap();
        let ids: Vec<_> = store
            .get_contacts()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![new.id, mid.id, old.id]);
    }

    #[tokio::test]
    async fn update_contact_on_missing_id_writes_nothing() {
        let bus = Arc::new(EventBus::new());
        let store = ConsoleStore::ephemeral(bus.clone());
        store.get_contacts().await.unwrap();
        let mut events = bus.subscribe("probe");

        let out = store.update_contact("ghost", |c| c.unread_count).await.unwrap();
        assert!(out.is_none());
        assert!(events.try_recv().is_none());
    }

    #[tokio::test]
    async fn writes_publish_change_events() {
        let bus = Arc::new(EventBus::new());
        let store = ConsoleStore::ephemeral(bus.clone());
        let mut sub = bus.subscribe("test");

        store.save_rules(&seed::rules()).await.unwrap();
        store.save_settings(&seed::settings()).await.unwrap();
        store
            .modify_contacts(|contacts| contacts.push(Contact::new_customer()))
            .await
            .unwrap();

        assert_eq!(sub.try_recv().unwrap().event, StoreEvent::RulesChanged);
        assert_eq!(sub.try_recv().unwrap().event, StoreEvent::SettingsChanged);
        assert_eq!(sub.try_recv().unwrap().event, StoreEvent::ContactsChanged);
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn concurrent_modifications_are_not_lost() {
        let store = Arc::new(store());
        let seeded = store.get_contacts().await.unwrap();
        let target = seeded[0].id.clone();
        let before = seeded[0].messages.len();

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            let target = target.clone();
            handles.push(tokio::spawn(async move {
                store
                    .update_contact(&target, |c| c.push_message(Message::user(format!("m{i}"))))
                    .await
                    .unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let after = store.get_contacts().await.unwrap();
        let contact = after.iter().find(|c| c.id == target).unwrap();
        assert_eq!(contact.messages.len(), before + 16);
    }

    #[tokio::test]
    async fn removing_focused_contact_clears_focus() {
        let store = store();
        store.get_contacts().await.unwrap();
        store.set_focus(Some("2".to_string()));
        assert!(store.is_focused("2"));

        assert!(store.remove_contact("2").await.unwrap());
        assert!(store.focused().is_none());
        assert!(!store.remove_contact("2").await.unwrap());
        assert_eq!(store.get_contacts().await.unwrap().len(), 1);
    }
}

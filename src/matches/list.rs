use std::collections::HashSet;

use serde_json::Value;

use super::model::{MatchId, MatchViewItem, RawMatchRecord};
use super::store::{MatchStore, PersistenceBridge};

type Subscriber = Box<dyn Fn(&[MatchViewItem]) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

enum PendingChange {
    Arrival(RawMatchRecord),
    Delete(MatchId),
}

pub struct MatchList<S> {
    items: Vec<MatchViewItem>,
    known_ids: HashSet<MatchId>,
    pending: Option<Vec<PendingChange>>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription_id: u64,
    persistence: PersistenceBridge<S>,
}

impl<S: MatchStore> MatchList<S> {
    pub fn new(persistence: PersistenceBridge<S>) -> Self {
        Self {
            items: Vec::new(),
            known_ids: HashSet::new(),
            pending: Some(Vec::new()),
            subscribers: Vec::new(),
            next_subscription_id: 0,
            persistence,
        }
    }

    pub fn new_ready(persistence: PersistenceBridge<S>) -> Self {
        let mut list = Self::new(persistence);
        list.pending = None;
        list
    }

    pub fn is_ready(&self) -> bool {
        self.pending.is_none()
    }

    pub fn persistence(&self) -> &PersistenceBridge<S> {
        &self.persistence
    }

    pub fn current_list(&self) -> &[MatchViewItem] {
        &self.items
    }

    pub fn get(&self, match_id: MatchId) -> Option<&MatchViewItem> {
        self.items.iter().find(|item| item.match_id == match_id)
    }

    pub fn contains(&self, match_id: MatchId) -> bool {
        self.known_ids.contains(&match_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: Fn(&[MatchViewItem]) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription_id);
        self.next_subscription_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers
            .retain(|(subscription_id, _)| *subscription_id != id);
        self.subscribers.len() != before
    }

    pub fn on_payload(&mut self, payload: &str) {
        match decode_payload(payload) {
            Ok(raw) => self.on_match_arrived(raw),
            Err(error) => {
                tracing::warn!(
                    payload_len = payload.len(),
                    error = %error,
                    "Dropping malformed match payload"
                );
            }
        }
    }

    pub fn on_match_arrived(&mut self, raw: RawMatchRecord) {
        if let Some(pending) = self.pending.as_mut() {
            tracing::debug!(match_id = raw.id, "Buffering match until persisted list is restored");
            pending.push(PendingChange::Arrival(raw));
            return;
        }

        if self.insert_front(raw) {
            self.commit();
        }
    }

    // Before restore the delete is buffered in order with arrivals; the
    // return value then reports whether a buffered arrival was cancelled.
    pub fn delete_match(&mut self, match_id: MatchId) -> bool {
        if let Some(pending) = self.pending.as_mut() {
            let buffered = pending_contains(pending, match_id);
            pending.push(PendingChange::Delete(match_id));
            return buffered;
        }

        if self.remove(match_id) {
            tracing::debug!(match_id, "Deleted match");
            self.commit();
            true
        } else {
            false
        }
    }

    /// Installs the persisted baseline, then replays buffered arrivals and
    /// deletes in the order they were received. Ignored once the list is ready.
    pub fn restore(&mut self, baseline: Vec<MatchViewItem>) {
        let Some(pending) = self.pending.take() else {
            tracing::warn!("Ignoring restore of persisted matches after list became ready");
            return;
        };

        let mut skipped_count = 0usize;
        for item in baseline {
            if self.known_ids.insert(item.match_id) {
                self.items.push(item);
            } else {
                tracing::warn!(match_id = item.match_id, "Skipping duplicate persisted match");
                skipped_count += 1;
            }
        }
        let restored_count = self.items.len();

        let buffered_count = pending.len();
        let mut replayed_count = 0usize;
        let mut deleted_count = 0usize;
        for change in pending {
            match change {
                PendingChange::Arrival(raw) => {
                    if self.insert_front(raw) {
                        replayed_count += 1;
                    }
                }
                PendingChange::Delete(match_id) => {
                    if self.remove(match_id) {
                        deleted_count += 1;
                    }
                }
            }
        }

        tracing::info!(
            restored_count,
            buffered_count,
            replayed_count,
            deleted_count,
            "Restored persisted matches"
        );

        if replayed_count > 0 || deleted_count > 0 || skipped_count > 0 {
            self.persistence.save(&self.items);
        }
        self.notify();
    }

    pub async fn flush(&mut self) {
        self.persistence.flush().await;
    }

    fn insert_front(&mut self, raw: RawMatchRecord) -> bool {
        if !self.known_ids.insert(raw.id) {
            tracing::debug!(match_id = raw.id, "Ignoring already known match");
            return false;
        }

        let item = MatchViewItem::from_raw(raw);
        tracing::debug!(match_id = item.match_id, duration = %item.duration, "Added match");
        self.items.insert(0, item);
        true
    }

    fn remove(&mut self, match_id: MatchId) -> bool {
        if !self.known_ids.remove(&match_id) {
            return false;
        }

        self.items.retain(|item| item.match_id != match_id);
        true
    }

    fn commit(&mut self) {
        self.persistence.save(&self.items);
        self.notify();
    }

    fn notify(&self) {
        for (_, subscriber) in &self.subscribers {
            subscriber(&self.items);
        }
    }
}

// The backend emits the record as a JSON string wrapping the object.
pub fn decode_payload(payload: &str) -> serde_json::Result<RawMatchRecord> {
    match serde_json::from_str::<Value>(payload)? {
        Value::String(inner) => serde_json::from_str(&inner),
        value => serde_json::from_value(value),
    }
}

fn pending_contains(pending: &[PendingChange], match_id: MatchId) -> bool {
    pending
        .iter()
        .rev()
        .find_map(|change| match change {
            PendingChange::Arrival(raw) if raw.id == match_id => Some(true),
            PendingChange::Delete(id) if *id == match_id => Some(false),
            _ => None,
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::MatchList;
    use crate::matches::model::{MatchViewItem, RawMatchRecord};
    use crate::matches::store::{MatchStore, MemoryMatchStore, PersistenceBridge};

    fn raw(id: u64, status: &str, ticks: u64) -> RawMatchRecord {
        RawMatchRecord {
            id,
            status: status.to_string(),
            ticks,
            date: "2024-03-01 20:15".to_string(),
            ..Default::default()
        }
    }

    fn ready_list() -> MatchList<MemoryMatchStore> {
        MatchList::new_ready(PersistenceBridge::new(MemoryMatchStore::new(), "matches"))
    }

    fn ids(list: &MatchList<MemoryMatchStore>) -> Vec<u64> {
        list.current_list()
            .iter()
            .map(|item| item.match_id)
            .collect()
    }

    fn record_notifications(list: &mut MatchList<MemoryMatchStore>) -> Arc<Mutex<Vec<Vec<u64>>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        list.subscribe(move |items: &[MatchViewItem]| {
            seen_clone
                .lock()
                .unwrap()
                .push(items.iter().map(|item| item.match_id).collect());
        });
        seen
    }

    #[tokio::test]
    async fn newest_arrival_goes_first() {
        let mut list = ready_list();
        for id in [1, 2, 3] {
            list.on_match_arrived(raw(id, "{}", 0));
        }

        assert_eq!(ids(&list), vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn duplicate_arrival_is_ignored_including_its_status() {
        let mut list = ready_list();
        list.on_match_arrived(raw(1, r#"{"response":"ok"}"#, 605));
        let once = list.current_list().to_vec();

        list.on_match_arrived(raw(1, "oops", 605));

        assert_eq!(list.current_list(), once.as_slice());
        assert_eq!(list.len(), 1);
        assert_eq!(list.current_list()[0].status, json!({ "response": "ok" }));
        assert_eq!(list.current_list()[0].duration, "01:00");
        assert!(list.current_list()[0].is_ok());
    }

    #[tokio::test]
    async fn malformed_status_becomes_error_object() {
        let mut list = ready_list();
        list.on_match_arrived(raw(7, "upload failed", 0));

        let item = list.get(7).expect("match 7 should be listed");
        assert_eq!(item.status, json!({ "error": "upload failed" }));
        assert!(!item.is_ok());
    }

    #[tokio::test]
    async fn malformed_payload_is_dropped_without_mutation() {
        let mut list = ready_list();
        let notifications = record_notifications(&mut list);

        list.on_payload("not json at all");
        list.on_payload(r#"{"status":"{}","ticks":10}"#);

        assert!(list.is_empty());
        assert!(notifications.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn string_wrapped_payload_is_unwrapped() {
        let mut list = ready_list();
        let inner = r#"{"id":9,"status":"{\"response\":\"ok\"}","ticks":600}"#;
        let wrapped = serde_json::to_string(inner).unwrap();

        list.on_payload(&wrapped);

        let item = list.get(9).expect("match 9 should be listed");
        assert_eq!(item.duration, "01:00");
        assert!(item.is_ok());
    }

    #[tokio::test]
    async fn payload_with_only_an_id_is_accepted() {
        let mut list = ready_list();
        list.on_payload(r#"{"id":42,"unknown_field":true}"#);

        let item = list.get(42).expect("match 42 should be listed");
        assert_eq!(item.duration, "00:00");
        assert_eq!(item.status, json!({ "error": "" }));
    }

    #[tokio::test]
    async fn subscribers_are_notified_once_per_mutation() {
        let mut list = ready_list();
        let notifications = record_notifications(&mut list);

        list.on_match_arrived(raw(1, "{}", 0));
        list.on_match_arrived(raw(1, "{}", 0));
        list.on_match_arrived(raw(2, "{}", 0));
        list.delete_match(99);
        list.delete_match(1);

        assert_eq!(
            *notifications.lock().unwrap(),
            vec![vec![1], vec![2, 1], vec![2]]
        );
    }

    #[tokio::test]
    async fn unsubscribed_callbacks_stop_receiving() {
        let mut list = ready_list();
        let calls = Arc::new(Mutex::new(0usize));
        let calls_clone = Arc::clone(&calls);
        let subscription = list.subscribe(move |_| *calls_clone.lock().unwrap() += 1);

        list.on_match_arrived(raw(1, "{}", 0));
        assert!(list.unsubscribe(subscription));
        assert!(!list.unsubscribe(subscription));
        list.on_match_arrived(raw(2, "{}", 0));

        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_clears_list_known_ids_and_store() {
        let mut list = ready_list();
        list.on_match_arrived(raw(1, "{}", 0));
        list.on_match_arrived(raw(2, "{}", 0));

        assert!(list.delete_match(1));
        assert!(!list.delete_match(1));
        assert!(!list.contains(1));
        assert_eq!(ids(&list), vec![2]);

        list.flush().await;
        let persisted = list.persistence().load().await;
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].match_id, 2);

        list.on_match_arrived(raw(1, "{}", 0));
        assert_eq!(ids(&list), vec![1, 2], "Deleted ids can be ingested again");
    }

    #[tokio::test]
    async fn every_mutation_is_persisted() {
        let mut list = ready_list();
        for id in [1, 2, 3] {
            list.on_match_arrived(raw(id, "{}", id * 10));
        }
        list.flush().await;

        let persisted = list.persistence().load().await;
        assert_eq!(persisted.as_slice(), list.current_list());
    }

    #[tokio::test]
    async fn arrivals_before_restore_are_buffered_and_replayed() {
        let store = MemoryMatchStore::new();
        let baseline: Vec<MatchViewItem> = [5, 4]
            .into_iter()
            .map(|id| MatchViewItem::from_raw(raw(id, "{}", 0)))
            .collect();
        store
            .save("matches", serde_json::to_value(&baseline).unwrap())
            .await
            .unwrap();

        let mut list = MatchList::new(PersistenceBridge::new(store, "matches"));
        let notifications = record_notifications(&mut list);

        list.on_match_arrived(raw(6, "{}", 0));
        list.on_match_arrived(raw(4, "{}", 0));
        list.on_match_arrived(raw(6, "{}", 0));
        assert!(!list.is_ready());
        assert!(list.is_empty());
        assert!(notifications.lock().unwrap().is_empty());

        let loaded = list.persistence().load().await;
        list.restore(loaded);

        assert!(list.is_ready());
        assert_eq!(ids(&list), vec![6, 5, 4]);
        assert_eq!(*notifications.lock().unwrap(), vec![vec![6, 5, 4]]);

        list.flush().await;
        let persisted = list.persistence().load().await;
        assert_eq!(persisted.as_slice(), list.current_list());
    }

    #[tokio::test]
    async fn deletes_before_restore_apply_to_baseline() {
        let mut list = MatchList::new(PersistenceBridge::new(MemoryMatchStore::new(), "matches"));
        list.on_match_arrived(raw(3, "{}", 0));

        assert!(list.delete_match(3));
        assert!(!list.delete_match(1));

        let baseline = vec![MatchViewItem::from_raw(raw(1, "{}", 0))];
        list.restore(baseline);

        assert!(list.is_empty());
        assert!(!list.contains(1));
        assert!(!list.contains(3));
    }

    #[tokio::test]
    async fn arrival_after_buffered_delete_survives_restore() {
        let mut list = MatchList::new(PersistenceBridge::new(MemoryMatchStore::new(), "matches"));
        let notifications = record_notifications(&mut list);

        list.on_match_arrived(raw(5, "{}", 0));
        assert!(list.delete_match(5));
        assert!(!list.delete_match(5));
        list.on_match_arrived(raw(5, r#"{"response":"ok"}"#, 0));

        list.restore(Vec::new());

        assert!(list.contains(5));
        assert_eq!(ids(&list), vec![5]);
        assert!(list.get(5).map(|item| item.is_ok()).unwrap_or(false));
        assert_eq!(*notifications.lock().unwrap(), vec![vec![5]]);
    }

    #[tokio::test]
    async fn buffered_delete_then_arrival_replaces_persisted_match() {
        let mut list = MatchList::new(PersistenceBridge::new(MemoryMatchStore::new(), "matches"));
        let mut persisted = MatchViewItem::from_raw(raw(2, "{}", 0));
        persisted.played_at = "persisted".to_string();

        list.delete_match(2);
        list.on_match_arrived(raw(2, "{}", 600));
        list.restore(vec![persisted, MatchViewItem::from_raw(raw(1, "{}", 0))]);

        assert_eq!(ids(&list), vec![2, 1]);
        assert_eq!(list.get(2).map(|item| item.duration.as_str()), Some("01:00"));

        list.flush().await;
        let saved = list.persistence().load().await;
        assert_eq!(saved.as_slice(), list.current_list());
    }

    #[tokio::test]
    async fn restore_keeps_first_of_duplicate_persisted_ids() {
        let mut list = MatchList::new(PersistenceBridge::new(MemoryMatchStore::new(), "matches"));
        let mut first = MatchViewItem::from_raw(raw(1, "{}", 0));
        first.played_at = "first".to_string();
        let mut second = first.clone();
        second.played_at = "second".to_string();

        list.restore(vec![first, second, MatchViewItem::from_raw(raw(2, "{}", 0))]);

        assert_eq!(ids(&list), vec![1, 2]);
        assert_eq!(list.get(1).map(|item| item.played_at.as_str()), Some("first"));
    }

    #[tokio::test]
    async fn restore_after_ready_is_ignored() {
        let mut list = ready_list();
        list.on_match_arrived(raw(1, "{}", 0));

        list.restore(vec![MatchViewItem::from_raw(raw(2, "{}", 0))]);

        assert_eq!(ids(&list), vec![1]);
    }
}

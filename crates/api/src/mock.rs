//! In-memory transport for testing.

use crate::error::{ErrorKind, Result};
use crate::PhotosApi;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// One recorded invocation of a [`MockApi`] operation.
///
/// `keys` carries the dedup/media keys of the request (empty for plain
/// paging calls); `arg` carries the remaining scalar argument — cursor,
/// query, album key, description or flag — rendered as a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub endpoint: &'static str,
    pub keys: Vec<String>,
    pub arg: Option<String>,
}

/// Scripted in-memory [`PhotosApi`] for tests.
///
/// Responses are queued per endpoint and consumed in order. Paging
/// endpoints fall back to an empty payload (which decodes to "no data" and
/// terminates collection); action endpoints fall back to echoing the
/// request keys as the result sequence. Every invocation is recorded.
///
/// Locks are plain [`Mutex`]es: the mock is intended for tests, where a
/// poisoned lock should panic the test anyway.
#[derive(Default)]
pub struct MockApi {
    scripted: Mutex<HashMap<&'static str, VecDeque<std::result::Result<Value, ErrorKind>>>>,
    info_ext: Mutex<HashMap<String, Value>>,
    calls: Mutex<Vec<Call>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful payload for an endpoint (by trait method name).
    pub fn with_page(self, endpoint: &'static str, payload: Value) -> Self {
        self.scripted.lock().unwrap().entry(endpoint).or_default().push_back(Ok(payload));
        self
    }

    /// Queue a failure for an endpoint (by trait method name).
    pub fn with_failure(self, endpoint: &'static str, kind: ErrorKind) -> Self {
        self.scripted.lock().unwrap().entry(endpoint).or_default().push_back(Err(kind));
        self
    }

    /// Set the extended-info payload returned for one media key.
    pub fn with_info_ext(self, media_key: impl Into<String>, payload: Value) -> Self {
        self.info_ext.lock().unwrap().insert(media_key.into(), payload);
        self
    }

    /// Everything invoked so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Invocations of a single endpoint, in order.
    pub fn calls_to(&self, endpoint: &'static str) -> Vec<Call> {
        self.calls().into_iter().filter(|call| call.endpoint == endpoint).collect()
    }

    fn record(&self, endpoint: &'static str, keys: &[String], arg: Option<&str>) {
        self.calls.lock().unwrap().push(Call {
            endpoint,
            keys: keys.to_vec(),
            arg: arg.map(str::to_string),
        });
    }

    fn next_scripted(&self, endpoint: &'static str) -> Option<std::result::Result<Value, ErrorKind>> {
        self.scripted.lock().unwrap().get_mut(endpoint).and_then(VecDeque::pop_front)
    }

    fn page(&self, endpoint: &'static str, keys: &[String], arg: Option<&str>) -> Result<Value> {
        self.record(endpoint, keys, arg);
        match self.next_scripted(endpoint) {
            Some(Ok(payload)) => Ok(payload),
            Some(Err(kind)) => exn::bail!(kind),
            None => Ok(json!([])),
        }
    }

    fn action(&self, endpoint: &'static str, keys: &[String], arg: Option<&str>) -> Result<Value> {
        self.record(endpoint, keys, arg);
        match self.next_scripted(endpoint) {
            Some(Ok(payload)) => Ok(payload),
            Some(Err(kind)) => exn::bail!(kind),
            None => Ok(json!(keys)),
        }
    }
}

#[async_trait]
impl PhotosApi for MockApi {
    async fn timeline_page(&self, cursor: Option<&str>) -> Result<Value> {
        self.page("timeline_page", &[], cursor)
    }

    async fn albums_page(&self, cursor: Option<&str>) -> Result<Value> {
        self.page("albums_page", &[], cursor)
    }

    async fn shared_links_page(&self, cursor: Option<&str>) -> Result<Value> {
        self.page("shared_links_page", &[], cursor)
    }

    async fn album_items_page(&self, album_media_key: &str, cursor: Option<&str>) -> Result<Value> {
        self.page("album_items_page", &[album_media_key.to_string()], cursor)
    }

    async fn trash_page(&self, cursor: Option<&str>) -> Result<Value> {
        self.page("trash_page", &[], cursor)
    }

    async fn favorites_page(&self, cursor: Option<&str>) -> Result<Value> {
        self.page("favorites_page", &[], cursor)
    }

    async fn search_page(&self, query: &str, cursor: Option<&str>) -> Result<Value> {
        self.page("search_page", &[query.to_string()], cursor)
    }

    async fn locked_folder_page(&self, cursor: Option<&str>) -> Result<Value> {
        self.page("locked_folder_page", &[], cursor)
    }

    async fn move_to_locked_folder(&self, dedup_keys: &[String]) -> Result<Value> {
        self.action("move_to_locked_folder", dedup_keys, None)
    }

    async fn remove_from_locked_folder(&self, dedup_keys: &[String]) -> Result<Value> {
        self.action("remove_from_locked_folder", dedup_keys, None)
    }

    async fn move_to_trash(&self, dedup_keys: &[String]) -> Result<Value> {
        self.action("move_to_trash", dedup_keys, None)
    }

    async fn restore_from_trash(&self, dedup_keys: &[String]) -> Result<Value> {
        self.action("restore_from_trash", dedup_keys, None)
    }

    async fn set_archive(&self, dedup_keys: &[String], archived: bool) -> Result<Value> {
        self.action("set_archive", dedup_keys, Some(if archived { "true" } else { "false" }))
    }

    async fn set_favorite(&self, dedup_keys: &[String], favorite: bool) -> Result<Value> {
        self.action("set_favorite", dedup_keys, Some(if favorite { "true" } else { "false" }))
    }

    async fn create_album(&self, name: &str) -> Result<String> {
        self.record("create_album", &[], Some(name));
        match self.next_scripted("create_album") {
            Some(Ok(payload)) => Ok(payload.as_str().unwrap_or("new-album-key").to_string()),
            Some(Err(kind)) => exn::bail!(kind),
            None => Ok("new-album-key".to_string()),
        }
    }

    async fn add_items_to_album(&self, media_keys: &[String], album_media_key: &str) -> Result<Value> {
        self.action("add_items_to_album", media_keys, Some(album_media_key))
    }

    async fn add_items_to_shared_album(&self, media_keys: &[String], album_media_key: &str) -> Result<Value> {
        self.action("add_items_to_shared_album", media_keys, Some(album_media_key))
    }

    async fn batch_media_info(&self, media_keys: &[String]) -> Result<Value> {
        self.action("batch_media_info", media_keys, None)
    }

    async fn item_info_ext(&self, media_key: &str) -> Result<Value> {
        self.record("item_info_ext", &[media_key.to_string()], None);
        if let Some(scripted) = self.next_scripted("item_info_ext") {
            return match scripted {
                Ok(payload) => Ok(payload),
                Err(kind) => exn::bail!(kind),
            };
        }
        Ok(self.info_ext.lock().unwrap().get(media_key).cloned().unwrap_or(json!([])))
    }

    async fn set_item_description(&self, dedup_key: &str, description: &str) -> Result<()> {
        self.record("set_item_description", &[dedup_key.to_string()], Some(description));
        match self.next_scripted("set_item_description") {
            Some(Err(kind)) => exn::bail!(kind),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pages_are_consumed_in_order_then_fall_back_to_empty() {
        let api = MockApi::new()
            .with_page("trash_page", json!([["item"], "cursor"]))
            .with_page("trash_page", json!([["item2"], null]));
        assert_eq!(api.trash_page(None).await.unwrap(), json!([["item"], "cursor"]));
        assert_eq!(api.trash_page(Some("cursor")).await.unwrap(), json!([["item2"], null]));
        assert_eq!(api.trash_page(None).await.unwrap(), json!([]));
        let calls = api.calls_to("trash_page");
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].arg.as_deref(), Some("cursor"));
    }

    #[tokio::test]
    async fn actions_echo_keys_by_default() {
        let api = MockApi::new();
        let keys = vec!["k1".to_string(), "k2".to_string()];
        assert_eq!(api.move_to_trash(&keys).await.unwrap(), json!(["k1", "k2"]));
    }

    #[tokio::test]
    async fn scripted_failures_surface_as_errors() {
        use std::ops::Deref;
        let api = MockApi::new().with_failure("set_archive", ErrorKind::Transport);
        let error = api.set_archive(&["k".to_string()], true).await.unwrap_err();
        assert!(matches!(error.deref(), ErrorKind::Transport));
        // The queue is consumed; the next call succeeds.
        assert!(api.set_archive(&["k".to_string()], true).await.is_ok());
    }
}

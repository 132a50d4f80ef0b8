//! Behavioural tests for `ImagesListService`.
//!
//! Driven through a scripted in-memory photo source so request counts,
//! page numbers, and in-flight windows are fully observable.

mod common;

use std::sync::{Arc, OnceLock, Weak};

use assert_matches::assert_matches;
use imagefeed_events::{EventBus, ServiceEventKind};
use imagefeed_services::{
    ImagesListService, MemoryTokenStore, ServiceError, TokenStore, TokenStoreError,
    PHOTOS_PER_PAGE,
};

use common::{assert_no_event, next_event, page_of, wait_idle, ScriptedSource};

fn service_with(
    source: Arc<ScriptedSource>,
    tokens: MemoryTokenStore,
) -> (Arc<ImagesListService>, Arc<EventBus>) {
    let events = Arc::new(EventBus::default());
    let service = ImagesListService::new(source, Arc::new(tokens), Arc::clone(&events));
    (service, events)
}

fn three_page_source() -> ScriptedSource {
    ScriptedSource::new()
        .with_page(1, page_of(1, 10))
        .with_page(2, page_of(2, 10))
        .with_page(3, page_of(3, 10))
}

// ---------------------------------------------------------------------------
// Test: a second call while fetching starts no request
// ---------------------------------------------------------------------------

#[tokio::test]
async fn second_call_while_fetching_is_ignored() {
    let source = Arc::new(ScriptedSource::gated().with_page(1, page_of(1, 10)));
    let (service, events) = service_with(Arc::clone(&source), MemoryTokenStore::with_token("t"));
    let mut rx = events.subscribe();

    service.fetch_photos_next_page();
    source.wait_started().await;
    assert!(service.is_fetching());

    service.fetch_photos_next_page();
    assert_eq!(service.last_loaded_page(), None);

    source.release();
    next_event(&mut rx).await;
    wait_idle(&service).await;

    assert_eq!(source.requested_pages(), vec![1]);
    assert_eq!(service.photos().len(), 10);
    assert_no_event(&mut rx);
}

// ---------------------------------------------------------------------------
// Test: the request carries the bearer token and fixed page size
// ---------------------------------------------------------------------------

#[tokio::test]
async fn request_uses_stored_token_and_page_size() {
    let source = Arc::new(three_page_source());
    let (service, events) =
        service_with(Arc::clone(&source), MemoryTokenStore::with_token("bearer-xyz"));
    let mut rx = events.subscribe();

    service.fetch_photos_next_page();
    next_event(&mut rx).await;

    assert_eq!(source.calls(), vec![("bearer-xyz".to_string(), 1, PHOTOS_PER_PAGE)]);
    assert_eq!(PHOTOS_PER_PAGE, 10);
}

// ---------------------------------------------------------------------------
// Test: sequential pages append in page order
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sequential_pages_append_in_order() {
    let source = Arc::new(three_page_source());
    let (service, events) = service_with(Arc::clone(&source), MemoryTokenStore::with_token("t"));
    let mut rx = events.subscribe();

    for _ in 0..3 {
        service.fetch_photos_next_page();
        let event = next_event(&mut rx).await;
        assert_eq!(event.kind, ServiceEventKind::ImagesListChanged);
    }

    let ids: Vec<String> = service.photos().into_iter().map(|p| p.id).collect();
    let expected: Vec<String> = (1..=3)
        .flat_map(|page| (0..10).map(move |i| format!("p{page}-{i}")))
        .collect();
    assert_eq!(ids, expected);
    assert_no_event(&mut rx);
}

// ---------------------------------------------------------------------------
// Test: after N fetches the next request is page N+1
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cursor_advances_one_page_per_success() {
    let source = Arc::new(three_page_source());
    let (service, events) = service_with(Arc::clone(&source), MemoryTokenStore::with_token("t"));
    let mut rx = events.subscribe();

    for n in 1..=3u32 {
        service.fetch_photos_next_page();
        next_event(&mut rx).await;
        assert_eq!(service.last_loaded_page(), Some(n));
    }

    service.fetch_photos_next_page();
    next_event(&mut rx).await;

    assert_eq!(source.requested_pages(), vec![1, 2, 3, 4]);
}

// ---------------------------------------------------------------------------
// Test: without a token nothing is requested
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_token_makes_no_request() {
    let source = Arc::new(three_page_source());
    let (service, events) = service_with(Arc::clone(&source), MemoryTokenStore::new());
    let mut rx = events.subscribe();

    service.fetch_photos_next_page();
    tokio::task::yield_now().await;

    assert!(!service.is_fetching());
    assert!(source.calls().is_empty());
    assert!(service.photos().is_empty());
    assert_no_event(&mut rx);
}

// ---------------------------------------------------------------------------
// Test: the token is read without holding the feed lock
// ---------------------------------------------------------------------------

/// Token store that reads the feed while handing out the token.
#[derive(Default)]
struct FeedReadingTokens {
    feed: OnceLock<Weak<ImagesListService>>,
    seen_photos: std::sync::Mutex<Option<usize>>,
}

impl TokenStore for FeedReadingTokens {
    fn token(&self) -> Option<String> {
        if let Some(feed) = self.feed.get().and_then(Weak::upgrade) {
            *self.seen_photos.lock().unwrap() = Some(feed.photos().len());
        }
        Some("t".into())
    }

    fn set_token(&self, _token: &str) -> Result<(), TokenStoreError> {
        Ok(())
    }

    fn clear_token(&self) -> Result<(), TokenStoreError> {
        Ok(())
    }
}

#[tokio::test]
async fn token_lookup_can_read_the_feed() {
    let source = Arc::new(three_page_source());
    let tokens = Arc::new(FeedReadingTokens::default());
    let events = Arc::new(EventBus::default());
    let service = ImagesListService::new(source.clone(), tokens.clone(), Arc::clone(&events));
    tokens.feed.set(Arc::downgrade(&service)).unwrap();
    let mut rx = events.subscribe();

    service.fetch_photos_next_page();
    next_event(&mut rx).await;

    assert_eq!(*tokens.seen_photos.lock().unwrap(), Some(0));
    assert_eq!(service.photos().len(), 10);
}

// ---------------------------------------------------------------------------
// Test: a failed page changes nothing and is retried next time
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_page_leaves_feed_untouched_and_is_retried() {
    let source = Arc::new(three_page_source());
    let (service, events) = service_with(Arc::clone(&source), MemoryTokenStore::with_token("t"));
    let mut rx = events.subscribe();

    service.fetch_photos_next_page();
    next_event(&mut rx).await;

    source.fail_page(2);
    service.fetch_photos_next_page();
    source.wait_finished().await;
    wait_idle(&service).await;

    assert_eq!(service.photos().len(), 10);
    assert_eq!(service.last_loaded_page(), Some(1));
    assert_no_event(&mut rx);

    source.heal_page(2);
    service.fetch_photos_next_page();
    next_event(&mut rx).await;

    assert_eq!(source.requested_pages(), vec![1, 2, 2]);
    assert_eq!(service.photos().len(), 20);
}

// ---------------------------------------------------------------------------
// Test: clear resets the cursor to page 1
// ---------------------------------------------------------------------------

#[tokio::test]
async fn clear_resets_cursor_and_notifies_once() {
    let source = Arc::new(three_page_source());
    let (service, events) = service_with(Arc::clone(&source), MemoryTokenStore::with_token("t"));
    let mut rx = events.subscribe();

    service.fetch_photos_next_page();
    next_event(&mut rx).await;
    service.fetch_photos_next_page();
    next_event(&mut rx).await;

    service.clear_photos();
    assert_eq!(next_event(&mut rx).await.kind, ServiceEventKind::ImagesListChanged);
    assert_no_event(&mut rx);
    assert!(service.photos().is_empty());
    assert_eq!(service.last_loaded_page(), None);

    service.fetch_photos_next_page();
    next_event(&mut rx).await;

    assert_eq!(source.requested_pages(), vec![1, 2, 1]);
    assert_eq!(service.photos()[0].id, "p1-0");
}

// ---------------------------------------------------------------------------
// Test: a fetch that completes after a clear is discarded
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_completing_after_clear_is_discarded() {
    let source = Arc::new(ScriptedSource::gated().with_page(1, page_of(1, 10)));
    let (service, events) = service_with(Arc::clone(&source), MemoryTokenStore::with_token("t"));
    let mut rx = events.subscribe();

    service.fetch_photos_next_page();
    source.wait_started().await;

    service.clear_photos();
    next_event(&mut rx).await;
    assert!(!service.is_fetching());

    source.release();
    source.wait_finished().await;
    tokio::task::yield_now().await;

    assert!(service.photos().is_empty());
    assert_eq!(service.last_loaded_page(), None);
    assert_no_event(&mut rx);
}

// ---------------------------------------------------------------------------
// Test: a stale fetch finishing after a newer one started leaves it alone
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stale_fetch_does_not_disturb_fetch_started_after_clear() {
    let source = Arc::new(ScriptedSource::gated().with_page(1, page_of(1, 10)));
    let (service, events) = service_with(Arc::clone(&source), MemoryTokenStore::with_token("t"));
    let mut rx = events.subscribe();

    service.fetch_photos_next_page();
    source.wait_started().await;
    service.clear_photos();
    next_event(&mut rx).await;

    service.fetch_photos_next_page();
    source.wait_started().await;
    assert_eq!(source.requested_pages(), vec![1, 1]);

    // Parked calls are released in arrival order: the stale one first.
    source.release();
    source.wait_finished().await;
    tokio::task::yield_now().await;

    assert!(service.is_fetching());
    assert!(service.photos().is_empty());
    assert_eq!(service.last_loaded_page(), None);
    assert_no_event(&mut rx);

    source.release();
    next_event(&mut rx).await;
    wait_idle(&service).await;

    assert_eq!(service.photos().len(), 10);
    assert_eq!(service.last_loaded_page(), Some(1));
    assert_no_event(&mut rx);
}

// ---------------------------------------------------------------------------
// Test: clear on an empty, idle feed still notifies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn clear_when_idle_notifies() {
    let source = Arc::new(ScriptedSource::new());
    let (service, events) = service_with(source, MemoryTokenStore::new());
    let mut rx = events.subscribe();

    service.clear_photos();

    assert_eq!(next_event(&mut rx).await.kind, ServiceEventKind::ImagesListChanged);
}

// ---------------------------------------------------------------------------
// Test: ids already in the feed are not appended twice
// ---------------------------------------------------------------------------

#[tokio::test]
async fn repeated_ids_across_pages_are_skipped() {
    let mut second = page_of(2, 9);
    second.push(common::record("p1-3"));
    let source = Arc::new(
        ScriptedSource::new()
            .with_page(1, page_of(1, 10))
            .with_page(2, second),
    );
    let (service, events) = service_with(Arc::clone(&source), MemoryTokenStore::with_token("t"));
    let mut rx = events.subscribe();

    service.fetch_photos_next_page();
    next_event(&mut rx).await;
    service.fetch_photos_next_page();
    next_event(&mut rx).await;

    let photos = service.photos();
    assert_eq!(photos.len(), 19);
    assert_eq!(service.last_loaded_page(), Some(2));
    let mut ids: Vec<&str> = photos.iter().map(|p| p.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 19);
}

// ---------------------------------------------------------------------------
// Test: like toggling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn change_like_replaces_only_the_target_entry() {
    let source = Arc::new(three_page_source());
    let (service, events) = service_with(Arc::clone(&source), MemoryTokenStore::with_token("t"));
    let mut rx = events.subscribe();

    service.fetch_photos_next_page();
    next_event(&mut rx).await;
    let before = service.photos();

    service.change_like("p1-4", false).unwrap();

    let after = service.photos();
    assert!(after[4].is_liked);
    assert_eq!(after[4], before[4].with_liked(true));
    for (i, (a, b)) in after.iter().zip(before.iter()).enumerate() {
        if i != 4 {
            assert_eq!(a, b);
        }
    }
    assert_no_event(&mut rx);
}

#[tokio::test]
async fn toggling_twice_restores_the_feed() {
    let source = Arc::new(three_page_source());
    let (service, events) = service_with(Arc::clone(&source), MemoryTokenStore::with_token("t"));
    let mut rx = events.subscribe();

    service.fetch_photos_next_page();
    next_event(&mut rx).await;
    let before = service.photos();

    service.change_like("p1-0", false).unwrap();
    service.change_like("p1-0", true).unwrap();

    assert_eq!(service.photos(), before);
}

#[tokio::test]
async fn change_like_flips_stored_state_even_from_stale_view() {
    let source = Arc::new(three_page_source());
    let (service, events) = service_with(Arc::clone(&source), MemoryTokenStore::with_token("t"));
    let mut rx = events.subscribe();

    service.fetch_photos_next_page();
    next_event(&mut rx).await;
    assert!(!service.photos()[0].is_liked);

    // Caller believes the photo is already liked; the stored flag still flips.
    service.change_like("p1-0", true).unwrap();
    assert!(service.photos()[0].is_liked);

    // Two toggles with the same caller view still restore the original.
    service.change_like("p1-1", false).unwrap();
    service.change_like("p1-1", false).unwrap();
    assert!(!service.photos()[1].is_liked);
}

#[tokio::test]
async fn change_like_on_unknown_id_reports_not_found() {
    let source = Arc::new(three_page_source());
    let (service, events) = service_with(Arc::clone(&source), MemoryTokenStore::with_token("t"));
    let mut rx = events.subscribe();

    service.fetch_photos_next_page();
    next_event(&mut rx).await;
    let before = service.photos();

    let err = service.change_like("nope", false).unwrap_err();

    assert_matches!(err, ServiceError::PhotoNotFound(ref id) if id == "nope");
    assert_eq!(service.photos(), before);
}

// ---------------------------------------------------------------------------
// Test: the same instance serves a new session after clear
// ---------------------------------------------------------------------------

#[tokio::test]
async fn service_is_reusable_after_clear() {
    let source = Arc::new(three_page_source());
    let (service, events) = service_with(Arc::clone(&source), MemoryTokenStore::with_token("t"));
    let mut rx = events.subscribe();

    service.fetch_photos_next_page();
    next_event(&mut rx).await;
    service.clear_photos();
    next_event(&mut rx).await;

    service.fetch_photos_next_page();
    next_event(&mut rx).await;
    service.fetch_photos_next_page();
    next_event(&mut rx).await;

    assert_eq!(service.photos().len(), 20);
    assert_eq!(service.last_loaded_page(), Some(2));
}

//! Paged photo feed.
//!
//! [`ImagesListService`] owns the authoritative list of fetched photos and
//! the page cursor. Fetches are single-flight: while one page request is
//! outstanding, further calls to
//! [`fetch_photos_next_page`](ImagesListService::fetch_photos_next_page)
//! are ignored, so pages are requested and appended strictly in order.
//!
//! Every state transition happens inside one short critical section on
//! [`FeedState`], never held across an `.await`. Observers subscribe to the
//! [`EventBus`] and re-read [`photos`](ImagesListService::photos) on each
//! [`ServiceEventKind::ImagesListChanged`].
//!
//! [`ServiceEventKind::ImagesListChanged`]: imagefeed_events::ServiceEventKind::ImagesListChanged

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use imagefeed_core::photo::Photo;
use imagefeed_events::{EventBus, ServiceEvent};
use imagefeed_unsplash::convert;
use imagefeed_unsplash::PhotoSource;
use tokio::task::JoinHandle;

use crate::error::ServiceError;
use crate::token_store::TokenStore;

/// Number of photos requested per page.
pub const PHOTOS_PER_PAGE: u32 = 10;

/// Mutable feed state guarded by a single mutex.
#[derive(Default)]
struct FeedState {
    photos: Vec<Photo>,
    /// Last page appended, `None` before the first successful fetch.
    last_loaded_page: Option<u32>,
    /// Outstanding page fetch; `Some` means the feed is fetching.
    in_flight: Option<JoinHandle<()>>,
    /// Bumped on every clear. Fetches started under an older epoch are
    /// discarded when they complete.
    epoch: u64,
}

impl FeedState {
    fn is_fetching(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

/// Page number that follows `last_loaded_page`.
fn next_page(last_loaded_page: Option<u32>) -> u32 {
    last_loaded_page.map_or(1, |page| page + 1)
}

/// The photo feed of the signed-in user.
///
/// Created once per session via [`ImagesListService::new`] and shared as
/// `Arc`. Reset with [`clear_photos`](Self::clear_photos) on logout; the
/// same instance serves the next login.
pub struct ImagesListService {
    source: Arc<dyn PhotoSource>,
    tokens: Arc<dyn TokenStore>,
    events: Arc<EventBus>,
    state: Mutex<FeedState>,
}

impl ImagesListService {
    pub fn new(
        source: Arc<dyn PhotoSource>,
        tokens: Arc<dyn TokenStore>,
        events: Arc<EventBus>,
    ) -> Arc<Self> {
        Arc::new(Self {
            source,
            tokens,
            events,
            state: Mutex::new(FeedState::default()),
        })
    }

    /// Snapshot of the feed in insertion order.
    pub fn photos(&self) -> Vec<Photo> {
        self.state().photos.clone()
    }

    /// Last page successfully appended.
    pub fn last_loaded_page(&self) -> Option<u32> {
        self.state().last_loaded_page
    }

    /// Whether a page fetch is outstanding.
    pub fn is_fetching(&self) -> bool {
        self.state().is_fetching()
    }

    /// Start loading the next page in the background.
    ///
    /// Returns immediately. Does nothing when a fetch is already in
    /// flight, when no token is stored, or when called outside a Tokio
    /// runtime. Success is signalled by one `ImagesListChanged` event;
    /// failures are logged and leave the feed untouched.
    pub fn fetch_photos_next_page(self: &Arc<Self>) {
        // The token store may touch the filesystem; read it outside the lock.
        let token = self.tokens.token();
        let mut state = self.state();

        if state.is_fetching() {
            tracing::debug!("Photos page fetch already in flight, ignoring");
            return;
        }

        let Some(token) = token else {
            tracing::error!(error = %ServiceError::MissingToken, "Cannot fetch photos page");
            return;
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!(error = %e, "Cannot fetch photos page outside a Tokio runtime");
                return;
            }
        };

        let page = next_page(state.last_loaded_page);
        let epoch = state.epoch;
        let service = Arc::clone(self);

        tracing::debug!(page, epoch, "Fetching photos page");
        state.in_flight = Some(runtime.spawn(async move {
            service.run_fetch(token, page, epoch).await;
        }));
    }

    /// Flip the like state of one photo.
    ///
    /// The stored flag is inverted. `is_liked` is the caller's view of the
    /// photo before the toggle and only feeds the log; a stale view never
    /// turns the call into a no-op. The photo value is replaced at the same
    /// index and no other field changes. Local-only: nothing is sent
    /// upstream.
    pub fn change_like(&self, photo_id: &str, is_liked: bool) -> Result<(), ServiceError> {
        let mut state = self.state();

        let Some(index) = state.photos.iter().position(|photo| photo.id == photo_id) else {
            tracing::warn!(photo_id, "Like toggle for unknown photo");
            return Err(ServiceError::PhotoNotFound(photo_id.to_string()));
        };

        let stored = state.photos[index].is_liked;
        if stored != is_liked {
            tracing::debug!(photo_id, caller = is_liked, stored, "Like toggle from stale view");
        }
        let updated = state.photos[index].with_liked(!stored);
        state.photos[index] = updated;

        tracing::debug!(photo_id, is_liked = !stored, "Photo like state changed");
        Ok(())
    }

    /// Empty the feed and reset the cursor.
    ///
    /// An outstanding fetch is not aborted, but its result will be
    /// discarded. Publishes one `ImagesListChanged`.
    pub fn clear_photos(&self) {
        {
            let mut state = self.state();
            state.photos.clear();
            state.last_loaded_page = None;
            state.epoch += 1;
            // Detach rather than abort; the stale result is dropped on completion.
            state.in_flight = None;
            tracing::info!(epoch = state.epoch, "Photos cleared");
        }
        self.events.publish(ServiceEvent::images_list_changed());
    }

    // ---- private helpers ----

    fn state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Body of the background fetch task.
    async fn run_fetch(self: Arc<Self>, token: String, page: u32, epoch: u64) {
        let result = self
            .source
            .list_photos(&token, page, PHOTOS_PER_PAGE)
            .await;

        let appended = {
            let mut state = self.state();

            if state.epoch != epoch {
                tracing::info!(page, epoch, "Discarding photos page fetched before clear");
                return;
            }
            state.in_flight = None;

            match result {
                Ok(records) => {
                    let known: HashSet<&str> =
                        state.photos.iter().map(|photo| photo.id.as_str()).collect();
                    let mut seen = HashSet::new();
                    let new_photos: Vec<Photo> = convert::to_photos(records)
                        .into_iter()
                        .filter(|photo| {
                            !known.contains(photo.id.as_str()) && seen.insert(photo.id.clone())
                        })
                        .collect();
                    drop(known);

                    let count = new_photos.len();
                    state.photos.extend(new_photos);
                    state.last_loaded_page = Some(page);
                    tracing::info!(page, count, total = state.photos.len(), "Photos page loaded");
                    true
                }
                Err(e) => {
                    tracing::error!(page, error = %e, "Failed to load photos page");
                    false
                }
            }
        };

        if appended {
            self.events.publish(ServiceEvent::images_list_changed());
        }
    }
}

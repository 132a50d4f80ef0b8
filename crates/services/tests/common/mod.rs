//! Shared fixtures for service integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use imagefeed_events::ServiceEvent;
use imagefeed_services::ImagesListService;
use imagefeed_unsplash::messages::{PhotoResult, PhotoUrls};
use imagefeed_unsplash::{PhotoSource, UnsplashApiError};
use tokio::sync::{broadcast, Notify};

/// Upper bound for anything a test waits on.
pub const WAIT: Duration = Duration::from_secs(5);

/// A wire record with id `id` and well-formed fields.
pub fn record(id: &str) -> PhotoResult {
    PhotoResult {
        id: id.to_string(),
        width: 1200,
        height: 800,
        created_at: Some("2024-03-01T10:00:00Z".into()),
        description: Some(format!("photo {id}")),
        urls: PhotoUrls {
            thumb: Some(format!("https://images.example/{id}/thumb")),
            full: Some(format!("https://images.example/{id}/full")),
        },
        likes: 0,
        liked_by_user: false,
    }
}

/// `count` records with ids `p{page}-{index}`.
pub fn page_of(page: u32, count: usize) -> Vec<PhotoResult> {
    (0..count).map(|i| record(&format!("p{page}-{i}"))).collect()
}

/// Same records as JSON, as Unsplash would send them.
pub fn page_json(page: u32, count: usize) -> String {
    let items: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            let id = format!("p{page}-{i}");
            serde_json::json!({
                "id": id,
                "width": 1200,
                "height": 800,
                "created_at": "2024-03-01T10:00:00Z",
                "description": null,
                "urls": {
                    "thumb": format!("https://images.example/{id}/thumb"),
                    "full": format!("https://images.example/{id}/full")
                },
                "likes": 5,
                "liked_by_user": false
            })
        })
        .collect();
    serde_json::Value::Array(items).to_string()
}

// ---------------------------------------------------------------------------
// ScriptedSource
// ---------------------------------------------------------------------------

/// In-memory [`PhotoSource`] serving scripted pages.
///
/// When built with [`ScriptedSource::gated`], every call parks until the
/// test hands out a permit with [`ScriptedSource::release`], which keeps a
/// fetch observably in flight.
#[derive(Default)]
pub struct ScriptedSource {
    pages: Mutex<HashMap<u32, Vec<PhotoResult>>>,
    failing: Mutex<HashSet<u32>>,
    calls: Mutex<Vec<(String, u32, u32)>>,
    gate: Option<Notify>,
    started: Notify,
    finished: Notify,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::default()
        }
    }

    pub fn with_page(self, page: u32, records: Vec<PhotoResult>) -> Self {
        self.pages.lock().unwrap().insert(page, records);
        self
    }

    pub fn fail_page(&self, page: u32) {
        self.failing.lock().unwrap().insert(page);
    }

    pub fn heal_page(&self, page: u32) {
        self.failing.lock().unwrap().remove(&page);
    }

    /// Requested page numbers, in call order.
    pub fn requested_pages(&self) -> Vec<u32> {
        self.calls.lock().unwrap().iter().map(|(_, page, _)| *page).collect()
    }

    pub fn calls(&self) -> Vec<(String, u32, u32)> {
        self.calls.lock().unwrap().clone()
    }

    /// Let one parked call proceed.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Wait until a call has reached the source.
    pub async fn wait_started(&self) {
        tokio::time::timeout(WAIT, self.started.notified())
            .await
            .expect("source was never called");
    }

    /// Wait until a call has returned from the source.
    pub async fn wait_finished(&self) {
        tokio::time::timeout(WAIT, self.finished.notified())
            .await
            .expect("source call never finished");
    }
}

#[async_trait]
impl PhotoSource for ScriptedSource {
    async fn list_photos(
        &self,
        token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PhotoResult>, UnsplashApiError> {
        self.calls
            .lock()
            .unwrap()
            .push((token.to_string(), page, per_page));
        self.started.notify_one();

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let result = if self.failing.lock().unwrap().contains(&page) {
            Err(UnsplashApiError::HttpStatus {
                status: 503,
                body: "unavailable".into(),
            })
        } else {
            Ok(self
                .pages
                .lock()
                .unwrap()
                .get(&page)
                .cloned()
                .unwrap_or_default())
        };

        self.finished.notify_one();
        result
    }
}

// ---------------------------------------------------------------------------
// Waiting helpers
// ---------------------------------------------------------------------------

/// Next event on `rx`, failing the test after [`WAIT`].
pub async fn next_event(rx: &mut broadcast::Receiver<ServiceEvent>) -> ServiceEvent {
    tokio::time::timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event bus closed")
}

/// Assert that nothing else was published.
pub fn assert_no_event(rx: &mut broadcast::Receiver<ServiceEvent>) {
    assert!(
        matches!(rx.try_recv(), Err(broadcast::error::TryRecvError::Empty)),
        "unexpected extra event"
    );
}

/// Wait for the feed to return to idle.
pub async fn wait_idle(service: &Arc<ImagesListService>) {
    tokio::time::timeout(WAIT, async {
        while service.is_fetching() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("feed never became idle");
}

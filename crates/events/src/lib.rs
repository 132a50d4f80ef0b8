//! ImageFeed change notifications.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ServiceEvent`] -- the change notifications services publish.

pub mod bus;

pub use bus::{EventBus, ServiceEvent, ServiceEventKind};

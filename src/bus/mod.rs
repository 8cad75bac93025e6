//! Bus boundary: the traits the dispatch core publishes through and the
//! subscription mechanism consumes from.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                Publisher + Subscriber Traits                  │
//! │  Publisher:  publish(destination, envelope)                   │
//! │  Subscriber: poll(timeout) / ack(tag) / nack(tag, requeue)    │
//! └──────────────────────────────────────────────────────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!  ┌───────────────────┐             ┌─────────────────────────┐
//!  │  InMemoryQueue    │             │  AMQP / other brokers   │
//!  │   (included)      │             │       (external)        │
//!  └───────────────────┘             └─────────────────────────┘
//! ```

mod in_memory_queue;
mod publisher;
mod subscriber;

pub use in_memory_queue::{InMemoryQueue, Posted, DEFAULT_VISIBILITY_TIMEOUT};
pub use publisher::{Envelope, NoPublisher, Publisher};
pub use subscriber::{Delivery, Subscriber};

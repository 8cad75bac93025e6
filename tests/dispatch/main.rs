//! Dispatch integration tests.

mod support;
mod war;
mod redelivery;

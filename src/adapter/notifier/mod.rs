//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for concrete channels.

pub mod console;

pub use console::ConsoleNotifier;

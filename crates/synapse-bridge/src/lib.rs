//! Synapse-Bridge: service binding, call forwarding and event fan-out
//!
//! Connects a host application to one out-of-process biosignal service:
//! discovers the provider, holds the proxy handle, forwards imperative calls
//! and republishes service events to the registered host callback.

pub mod bridge;

pub use bridge::*;

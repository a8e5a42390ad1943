//! Core push-notification dispatch pipeline.
//!
//! For each document-created event:
//! 1. Resolve the affected recipient profile(s) (`resolver`)
//! 2. Filter by notification preference and token presence (`gate`)
//! 3. Build the provider-agnostic push payload (`message`)
//! 4. Send single or multicast through the delivery provider (`dispatcher`)
//! 5. Clear tokens the provider reports as no longer registered (`invalidator`)
//!
//! The profile store and the push transport are external collaborators
//! reached through the `store::ProfileStore` and `delivery::PushDelivery`
//! traits; handlers in `handler` orchestrate the pipeline per event type.

pub mod delivery;
pub mod dispatcher;
pub mod gate;
pub mod handler;
pub mod invalidator;
pub mod message;
pub mod resolver;
pub mod store;

//! Event relay: consumes document-created events from the Redis queue and
//! drives the dispatch pipeline. Hosts the production adapters for the
//! profile store (PostgreSQL) and the push provider (HTTP).

pub mod listener;
pub mod pg_store;
pub mod push_client;

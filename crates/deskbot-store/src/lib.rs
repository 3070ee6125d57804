// Ticket store boundary
//
// This crate provides the client side of the hosted ticket store:
// - TicketStore: the async trait the synchronization layer is written against
// - RestTicketStore: reqwest client for the hosted relational store
// - InMemoryTicketStore: per-instance double for tests and demos
// - wire records translating the store's snake_case JSON to domain types

pub mod config;
pub mod error;
pub mod memory;
pub mod models;
pub mod rest;
pub mod store;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use memory::{InMemoryTicketStore, OpCounts};
pub use models::{
    FeedbackRecord, NewFeedback, NewFeedbackRecord, NewTicket, NewTicketRecord, StatusPatch,
    TicketRecord,
};
pub use rest::RestTicketStore;
pub use store::TicketStore;

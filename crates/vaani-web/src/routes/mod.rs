//! Route handlers.

pub mod explore;
pub mod query;
pub mod space;
pub mod status;
pub mod whatsapp;

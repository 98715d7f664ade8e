//! Dashboard state: document model, storage, controllers and configuration

pub mod backup;
pub mod config;
pub mod dashboard;
pub mod document;
pub mod editing;
pub mod layout;
pub mod pages;
pub mod store;

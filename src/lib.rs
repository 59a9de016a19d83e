pub mod attachments;
pub mod config;
pub mod connector;
pub mod enrichment;
pub mod humanize;
pub mod library;
pub mod mapping;
pub mod observability;
pub mod pipeline;

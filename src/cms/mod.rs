//! Headless CMS (Sanity) access: reads for pricing configuration and the
//! single document write that stores a quote.

pub mod client;
pub mod queries;

pub use client::{CmsClient, CmsError, CreatedDocument, SanityClient};

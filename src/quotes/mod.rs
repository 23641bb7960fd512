//! Quote flow: request shapes, assembly, and persistence.

pub mod ids;
pub mod persistence;
pub mod requests;
pub mod responses;
pub mod services;

pub use requests::QuoteRequest;
pub use responses::{Quote, QuoteItem, QuoteResponse};
pub use services::{QuoteError, QuoteService};

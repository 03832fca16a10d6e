//! Daily Thought Chain backend library.
//!
//! One anonymous thought per token per UTC calendar day, with a server-minted
//! edit capability per thought and additive schema evolution across API
//! generations.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::Trace;

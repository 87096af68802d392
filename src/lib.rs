//! Layered dissection of captured frames down to DNS messages.
//!
//! ```text
//! Ethernet -> IPv4 / IPv6 -> UDP -> DNS header -> question -> records
//! ```
//!
//! [`dissect`] takes one frame and returns formatted text plus the domain
//! names and translations it saw. It keeps no state between calls.

pub mod dissect;
pub mod dns;
pub mod error;
pub mod packet;
pub mod report;

pub use dissect::{DNS_PORT, DisplayOptions, DissectResult, FrameSummary, NetworkLayer, dissect};
pub use error::{DissectError, Stage};

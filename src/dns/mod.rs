mod collector;
mod event;
mod header;
mod message;
mod name;
mod record;
pub mod types;

pub use collector::{DnsCollector, NameCatalog};
pub use event::{DomainEvent, TranslationEvent};
pub use header::{DNS_HEADER_LEN, DnsHeader, decode_dns_header};
pub use message::{DissectedMessage, decode_message};
pub use name::{DomainName, MAX_LABEL_LEN, MAX_NAME_LEN, MAX_POINTER_HOPS, decode_name};
pub use record::{Question, RData, ResourceRecord, decode_question, decode_rr};
pub use types::{RRClass, RRType};

use std::net::IpAddr;

/// A domain name seen in a dissected message, without the trailing dot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DomainEvent {
    pub name: String,
}

/// A name to address translation taken from an A or AAAA record.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TranslationEvent {
    pub name: String,
    pub addr: IpAddr,
}

/// Notification events emitted by governance mutations
use chrono::{ DateTime, Utc };
use serde::Serialize;

/// Governance mutation events, carrying the mutated key and new value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Event {
    AliasRegistered {
        name: String,
        asset: String,
    },
    RouteRegistered {
        token0: String,
        token1: String,
        venue: String,
        fee: u32,
    },
    ResolverReplaced {
        resolver: String,
    },
}

/// An emitted event with its emission time
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub at: DateTime<Utc>,
    pub event: Event,
}

impl Notification {
    pub fn now(event: Event) -> Self {
        Self { at: Utc::now(), event }
    }
}

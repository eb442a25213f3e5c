//! # Accept Gate
//!
//! The server-held front door: owns the active filter, screens raw messages,
//! and counts what it decides.
//!
//! The filter sits behind an [`ArcSwap`], so a new policy is published with a
//! single pointer swap. Readers on other threads see either the old filter or
//! the new one, never a mix of fields from both.

use crate::core::header::{Header, HEADER_LEN};
use crate::core::response::reject_reply;
use crate::protocol::accept::{AcceptFilter, AcceptPolicy, Verdict};
use crate::utils::metrics::GateMetrics;
use arc_swap::ArcSwap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

type SharedFilter = Box<dyn AcceptFilter>;

/// What the caller should do with a screened message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Hand the message to the full parser
    Process(Header),
    /// Send these bytes back and stop
    Reply([u8; HEADER_LEN]),
    /// Send nothing
    Drop,
}

/// Acceptance gate with a swappable filter.
pub struct AcceptGate {
    filter: ArcSwap<SharedFilter>,
    metrics: GateMetrics,
}

impl Default for AcceptGate {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AcceptGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcceptGate")
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl AcceptGate {
    /// Gate running the default policy
    pub fn new() -> Self {
        Self::with_policy(AcceptPolicy::default())
    }

    pub fn with_policy(policy: AcceptPolicy) -> Self {
        Self::with_filter(policy)
    }

    pub fn with_filter<F>(filter: F) -> Self
    where
        F: AcceptFilter + 'static,
    {
        Self {
            filter: ArcSwap::from_pointee(Box::new(filter) as SharedFilter),
            metrics: GateMetrics::new(),
        }
    }

    /// Publish a new filter. In-flight checks finish on the previous one.
    pub fn replace_filter<F>(&self, filter: F)
    where
        F: AcceptFilter + 'static,
    {
        self.filter.store(Arc::new(Box::new(filter) as SharedFilter));
        debug!("Accept filter replaced");
    }

    pub fn replace_policy(&self, policy: AcceptPolicy) {
        debug!(?policy, "Accept policy replaced");
        self.filter.store(Arc::new(Box::new(policy) as SharedFilter));
    }

    /// Classify a decoded header with the active filter
    pub fn check(&self, header: &Header) -> Verdict {
        let verdict = self.filter.load().accept(header);
        self.metrics.record(verdict);

        match verdict {
            Verdict::Accept => trace!(id = header.id, "Message accepted"),
            Verdict::Reject => debug!(
                id = header.id,
                opcode = %header.opcode(),
                qdcount = header.qdcount,
                ancount = header.ancount,
                nscount = header.nscount,
                arcount = header.arcount,
                "Message rejected"
            ),
            Verdict::Ignore => debug!(id = header.id, "Response ignored"),
        }

        verdict
    }

    /// Decode the header of a raw message and decide what to do with it.
    ///
    /// Messages shorter than a header are dropped: without an ID there is
    /// nothing a reply could be matched against.
    pub fn screen(&self, message: &[u8]) -> Disposition {
        let header = match Header::from_bytes(message) {
            Ok(header) => header,
            Err(e) => {
                self.metrics.undecodable();
                debug!(error = %e, "Dropping undecodable message");
                return Disposition::Drop;
            }
        };

        match self.check(&header) {
            Verdict::Accept => Disposition::Process(header),
            Verdict::Reject => Disposition::Reply(reject_reply(&header).to_bytes()),
            Verdict::Ignore => Disposition::Drop,
        }
    }

    pub fn metrics(&self) -> &GateMetrics {
        &self.metrics
    }
}

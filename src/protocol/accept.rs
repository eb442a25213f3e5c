//! # Acceptance Decision
//!
//! Classifies an inbound message from its fixed header alone, before any of
//! the variable-length sections are parsed.
//!
//! ## Verdicts
//! - **Accept**: parse and process the full message
//! - **Reject**: answer with a FORMERR reply, do not process further
//! - **Ignore**: drop silently, never reply
//!
//! Keeping Reject and Ignore apart matters. Answering a response would let two
//! servers bounce error replies at each other indefinitely, so anything with
//! the QR flag set is ignored before any other rule is looked at.
//!
//! ## Rule Order
//! 1. QR set → Ignore
//! 2. opcode not permitted → Reject
//! 3. Z bit set → Reject
//! 4. QDCOUNT != required → Reject
//! 5. ANCOUNT above maximum → Reject
//! 6. NSCOUNT above maximum → Reject
//! 7. ARCOUNT above maximum → Reject
//! 8. otherwise Accept

use crate::core::header::{Header, Opcode, OpcodeSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of the acceptance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Accept,
    Reject,
    Ignore,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accept => f.write_str("accept"),
            Verdict::Reject => f.write_str("reject"),
            Verdict::Ignore => f.write_str("ignore"),
        }
    }
}

/// Thresholds a header is checked against.
///
/// The default permits QUERY and NOTIFY with exactly one question, no answer
/// or authority records and at most two additional records (room for an OPT
/// and a TSIG/SIG(0) record). Dynamic updates are refused because their
/// sections may legitimately carry many records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceptPolicy {
    /// Opcodes that are processed; all others are rejected
    pub opcodes: OpcodeSet,
    /// Exact number of questions a request must carry
    pub question_count: u16,
    pub max_answer_count: u16,
    pub max_authority_count: u16,
    pub max_additional_count: u16,
}

impl Default for AcceptPolicy {
    fn default() -> Self {
        Self {
            opcodes: OpcodeSet::empty()
                .with(Opcode::Query)
                .with(Opcode::Notify),
            question_count: 1,
            max_answer_count: 0,
            max_authority_count: 0,
            max_additional_count: 2,
        }
    }
}

impl AcceptPolicy {
    /// A policy for primaries that take dynamic updates (RFC 2136).
    ///
    /// UPDATE reuses the sections as zone/prerequisite/update/additional, so
    /// the answer and authority limits are opened up. The zone section must
    /// still hold exactly one entry.
    pub fn permissive_update() -> Self {
        Self {
            opcodes: OpcodeSet::empty()
                .with(Opcode::Query)
                .with(Opcode::Notify)
                .with(Opcode::Update),
            question_count: 1,
            max_answer_count: u16::MAX,
            max_authority_count: u16::MAX,
            max_additional_count: u16::MAX,
        }
    }

    #[inline]
    pub fn decide(&self, header: &Header) -> Verdict {
        decide(header, self)
    }
}

/// Classify `header` under `policy`. First matching rule wins.
///
/// Pure and total: no logging, no allocation, every header maps to a verdict.
#[inline]
pub fn decide(header: &Header, policy: &AcceptPolicy) -> Verdict {
    if header.is_response() {
        return Verdict::Ignore;
    }

    if !policy.opcodes.contains_code(header.opcode_bits()) {
        return Verdict::Reject;
    }
    if header.reserved_bit() {
        return Verdict::Reject;
    }
    if header.qdcount != policy.question_count {
        return Verdict::Reject;
    }
    if header.ancount > policy.max_answer_count {
        return Verdict::Reject;
    }
    if header.nscount > policy.max_authority_count {
        return Verdict::Reject;
    }
    if header.arcount > policy.max_additional_count {
        return Verdict::Reject;
    }

    Verdict::Accept
}

/// Anything able to classify a header.
///
/// [`AcceptPolicy`] is the standard implementation; [`filter_fn`] turns a
/// closure into one for deployments whose rules don't fit a threshold table.
pub trait AcceptFilter: Send + Sync {
    fn accept(&self, header: &Header) -> Verdict;
}

impl AcceptFilter for AcceptPolicy {
    #[inline]
    fn accept(&self, header: &Header) -> Verdict {
        decide(header, self)
    }
}

/// Filter backed by a closure. Build with [`filter_fn`].
#[derive(Clone)]
pub struct FilterFn<F> {
    f: F,
}

impl<F> fmt::Debug for FilterFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterFn").finish_non_exhaustive()
    }
}

impl<F> AcceptFilter for FilterFn<F>
where
    F: Fn(&Header) -> Verdict + Send + Sync,
{
    #[inline]
    fn accept(&self, header: &Header) -> Verdict {
        (self.f)(header)
    }
}

/// Wrap a closure as an [`AcceptFilter`].
///
/// ```rust
/// use dns_accept::core::header::Header;
/// use dns_accept::protocol::accept::{filter_fn, AcceptFilter, AcceptPolicy, Verdict};
///
/// // Stricter than the default: no additional records at all
/// let strict = filter_fn(|h: &Header| match AcceptPolicy::default().decide(h) {
///     Verdict::Accept if h.arcount > 0 => Verdict::Reject,
///     other => other,
/// });
///
/// assert_eq!(strict.accept(&Header::query(1)), Verdict::Accept);
/// assert_eq!(strict.accept(&Header::query(1).with_counts(1, 0, 0, 1)), Verdict::Reject);
/// ```
pub fn filter_fn<F>(f: F) -> FilterFn<F>
where
    F: Fn(&Header) -> Verdict + Send + Sync,
{
    FilterFn { f }
}

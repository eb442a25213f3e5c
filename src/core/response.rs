//! Header-only reply for rejected requests.
//!
//! A rejected request was never parsed past its header, so the reply cannot
//! echo the question section. It carries the request ID so the sender can
//! match it, and FORMERR so the refusal is diagnosable.

use crate::core::header::{Header, Opcode, FLAG_AA, FLAG_CD, FLAG_QR, FLAG_RD};

/// Format error: the server was unable to interpret the query
pub const RCODE_FORMERR: u8 = 1;

/// Build the reply header for a rejected request.
///
/// The reply has the request's ID, QR set, opcode QUERY, rcode FORMERR and
/// empty sections. RD and CD are copied from the request (RFC 1035 §4.1.1).
/// AA is never set since nothing authoritative was consulted.
pub fn reject_reply(request: &Header) -> Header {
    let mut reply = Header {
        id: request.id,
        ..Header::default()
    }
    .with_opcode(Opcode::Query)
    .with_rcode(RCODE_FORMERR);

    reply.bits |= FLAG_QR | (request.bits & (FLAG_RD | FLAG_CD));
    reply.bits &= !FLAG_AA;
    reply
}

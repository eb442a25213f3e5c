//! Property-based tests using proptest
//!
//! These tests check the acceptance rules over arbitrary headers rather than
//! hand-picked cases.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use dns_accept::core::header::{FLAG_QR, FLAG_Z};
use dns_accept::{decide, AcceptGate, AcceptPolicy, Disposition, Header, Opcode, Verdict};
use proptest::prelude::*;

fn any_header() -> impl Strategy<Value = Header> {
    (
        any::<u16>(),
        any::<u16>(),
        any::<u16>(),
        any::<u16>(),
        any::<u16>(),
        any::<u16>(),
    )
        .prop_map(|(id, bits, qdcount, ancount, nscount, arcount)| Header {
            id,
            bits,
            qdcount,
            ancount,
            nscount,
            arcount,
        })
}

// Property: responses are always ignored, whatever else the header says
proptest! {
    #[test]
    fn prop_response_always_ignored(mut header in any_header()) {
        header.bits |= FLAG_QR;
        prop_assert_eq!(decide(&header, &AcceptPolicy::default()), Verdict::Ignore);
        prop_assert_eq!(decide(&header, &AcceptPolicy::permissive_update()), Verdict::Ignore);
    }
}

// Property: requests with an unsupported opcode are rejected
proptest! {
    #[test]
    fn prop_unsupported_opcode_rejected(header in any_header(), code in 0u8..16) {
        let opcode = Opcode::from_bits(code);
        prop_assume!(opcode != Opcode::Query && opcode != Opcode::Notify);

        let header = header.with_response(false).with_opcode(opcode);
        prop_assert_eq!(decide(&header, &AcceptPolicy::default()), Verdict::Reject);
    }
}

// Property: every conforming request is accepted
proptest! {
    #[test]
    fn prop_conforming_request_accepted(
        header in any_header(),
        notify in any::<bool>(),
        arcount in 0u16..=2,
    ) {
        let opcode = if notify { Opcode::Notify } else { Opcode::Query };
        let header = header
            .with_response(false)
            .with_reserved_bit(false)
            .with_opcode(opcode)
            .with_counts(1, 0, 0, arcount);

        prop_assert_eq!(decide(&header, &AcceptPolicy::default()), Verdict::Accept);
    }
}

// Property: a request never comes back as Ignore under the default policy
proptest! {
    #[test]
    fn prop_requests_never_ignored(mut header in any_header()) {
        header.bits &= !FLAG_QR;
        prop_assert_ne!(decide(&header, &AcceptPolicy::default()), Verdict::Ignore);
    }
}

// Property: the Z bit alone turns an otherwise accepted request into a rejection
proptest! {
    #[test]
    fn prop_reserved_bit_rejects(id in any::<u16>(), arcount in 0u16..=2) {
        let header = Header::query(id).with_counts(1, 0, 0, arcount);
        prop_assert_eq!(decide(&header, &AcceptPolicy::default()), Verdict::Accept);

        let mut flagged = header;
        flagged.bits |= FLAG_Z;
        prop_assert_eq!(decide(&flagged, &AcceptPolicy::default()), Verdict::Reject);
    }
}

// Property: decide is deterministic and leaves its input alone
proptest! {
    #[test]
    fn prop_decide_deterministic(header in any_header()) {
        let before = header;
        let policy = AcceptPolicy::default();
        let first = decide(&header, &policy);
        let second = decide(&header, &policy);
        prop_assert_eq!(first, second);
        prop_assert_eq!(header, before);
    }
}

// Property: screening arbitrary bytes never panics and matches decide
proptest! {
    #[test]
    fn prop_screen_matches_decide(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let gate = AcceptGate::new();
        let disposition = gate.screen(&bytes);

        match Header::from_bytes(&bytes) {
            Err(_) => prop_assert_eq!(disposition, Disposition::Drop),
            Ok(header) => match decide(&header, &AcceptPolicy::default()) {
                Verdict::Accept => prop_assert_eq!(disposition, Disposition::Process(header)),
                Verdict::Reject => prop_assert!(matches!(disposition, Disposition::Reply(_))),
                Verdict::Ignore => prop_assert_eq!(disposition, Disposition::Drop),
            },
        }
    }
}

// Property: a rejection reply is itself a response, so a peer running this
// gate drops it instead of answering back
proptest! {
    #[test]
    fn prop_reject_reply_is_ignored_by_peer(header in any_header()) {
        let gate = AcceptGate::new();
        if let Disposition::Reply(bytes) = gate.screen(&header.to_bytes()) {
            let peer = AcceptGate::new();
            prop_assert_eq!(peer.screen(&bytes), Disposition::Drop);
        }
    }
}

#![no_main]

use dns_accept::{AcceptGate, AcceptPolicy, Disposition, Header};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Screening must never panic, and a reply must never provoke a reply
    let gate = AcceptGate::with_policy(AcceptPolicy::default());
    if let Disposition::Reply(bytes) = gate.screen(data) {
        let reply = Header::from_bytes(&bytes).expect("reply is a full header");
        assert!(reply.is_response());
        assert_eq!(gate.screen(&bytes), Disposition::Drop);
    }
});

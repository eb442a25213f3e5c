//! Fixed DNS message header (RFC 1035 §4.1.1).
//!
//! The header is decoded before anything else in the message so the gate can
//! classify a request without walking its variable-length sections.

use crate::error::{AcceptError, Result};
use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of the fixed header on the wire
pub const HEADER_LEN: usize = 12;

/// Query/response flag
pub const FLAG_QR: u16 = 1 << 15;
/// Authoritative answer
pub const FLAG_AA: u16 = 1 << 10;
/// Truncated
pub const FLAG_TC: u16 = 1 << 9;
/// Recursion desired
pub const FLAG_RD: u16 = 1 << 8;
/// Recursion available
pub const FLAG_RA: u16 = 1 << 7;
/// Reserved, must be zero
pub const FLAG_Z: u16 = 1 << 6;
/// Authentic data
pub const FLAG_AD: u16 = 1 << 5;
/// Checking disabled
pub const FLAG_CD: u16 = 1 << 4;

const OPCODE_SHIFT: u16 = 11;
const OPCODE_MASK: u16 = 0x0F;
const RCODE_MASK: u16 = 0x0F;

/// Operation requested by a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Opcode {
    Query,
    IQuery,
    Status,
    Notify,
    Update,
    /// DNS Stateful Operations (RFC 8490)
    Stateful,
    /// A 4-bit value without an assigned meaning
    Unassigned(UnassignedOpcode),
}

/// Opcode value in `0..=15` that none of the named [`Opcode`] variants cover.
///
/// Only constructible through [`UnassignedOpcode::new`] (or `Opcode::try_from`),
/// so every wire code has exactly one `Opcode` representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct UnassignedOpcode(u8);

impl UnassignedOpcode {
    /// `None` for values above 15 and for codes with a named variant
    pub const fn new(code: u8) -> Option<Self> {
        match code {
            3 | 7..=15 => Some(UnassignedOpcode(code)),
            _ => None,
        }
    }

    pub const fn code(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for UnassignedOpcode {
    type Error = String;

    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        UnassignedOpcode::new(code).ok_or_else(|| {
            if code > 0x0F {
                format!("Opcode value {code} does not fit in 4 bits")
            } else {
                format!("Opcode value {code} is assigned, use its name")
            }
        })
    }
}

impl From<UnassignedOpcode> for u8 {
    fn from(op: UnassignedOpcode) -> Self {
        op.0
    }
}

impl Opcode {
    /// Interpret the low four bits of `bits` as an opcode
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x0F {
            0 => Opcode::Query,
            1 => Opcode::IQuery,
            2 => Opcode::Status,
            4 => Opcode::Notify,
            5 => Opcode::Update,
            6 => Opcode::Stateful,
            other => Opcode::Unassigned(UnassignedOpcode(other)),
        }
    }

    /// Wire value of this opcode, always in `0..=15`
    pub fn code(self) -> u8 {
        match self {
            Opcode::Query => 0,
            Opcode::IQuery => 1,
            Opcode::Status => 2,
            Opcode::Notify => 4,
            Opcode::Update => 5,
            Opcode::Stateful => 6,
            Opcode::Unassigned(op) => op.code(),
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = String;

    /// Unlike [`Opcode::from_bits`], refuses values that do not fit in 4 bits
    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        if code > 0x0F {
            return Err(format!("Opcode value {code} does not fit in 4 bits"));
        }
        Ok(Opcode::from_bits(code))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::Query => f.write_str("QUERY"),
            Opcode::IQuery => f.write_str("IQUERY"),
            Opcode::Status => f.write_str("STATUS"),
            Opcode::Notify => f.write_str("NOTIFY"),
            Opcode::Update => f.write_str("UPDATE"),
            Opcode::Stateful => f.write_str("DSO"),
            Opcode::Unassigned(op) => write!(f, "OPCODE{}", op.code()),
        }
    }
}

/// Set of opcodes packed into a 16-bit mask, one bit per 4-bit opcode value.
///
/// Membership is a single shift-and-test, so checking it on every inbound
/// message costs nothing measurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Opcode>", into = "Vec<Opcode>")]
pub struct OpcodeSet(u16);

impl OpcodeSet {
    /// The empty set
    pub const fn empty() -> Self {
        OpcodeSet(0)
    }

    pub fn insert(&mut self, opcode: Opcode) {
        self.0 |= 1 << opcode.code();
    }

    pub fn with(mut self, opcode: Opcode) -> Self {
        self.insert(opcode);
        self
    }

    #[inline]
    pub fn contains(self, opcode: Opcode) -> bool {
        self.contains_code(opcode.code())
    }

    /// Test a raw 4-bit opcode without converting it to [`Opcode`] first
    #[inline]
    pub fn contains_code(self, code: u8) -> bool {
        code <= 0x0F && self.0 & (1 << code) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in ascending wire order
    pub fn iter(self) -> impl Iterator<Item = Opcode> {
        (0u8..16)
            .filter(move |code| self.contains_code(*code))
            .map(Opcode::from_bits)
    }
}

impl FromIterator<Opcode> for OpcodeSet {
    fn from_iter<I: IntoIterator<Item = Opcode>>(iter: I) -> Self {
        let mut set = OpcodeSet::empty();
        for opcode in iter {
            set.insert(opcode);
        }
        set
    }
}

impl From<Vec<Opcode>> for OpcodeSet {
    fn from(opcodes: Vec<Opcode>) -> Self {
        opcodes.into_iter().collect()
    }
}

impl From<OpcodeSet> for Vec<Opcode> {
    fn from(set: OpcodeSet) -> Self {
        set.iter().collect()
    }
}

/// The fixed 12-byte header of a DNS message.
///
/// Counts are what the sender *claims* each section holds; nothing here has
/// been verified against the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Header {
    pub id: u16,
    /// Packed flags, opcode and rcode
    pub bits: u16,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

impl Header {
    /// A plain QUERY request with one question and nothing else
    pub fn query(id: u16) -> Self {
        Header {
            id,
            bits: 0,
            qdcount: 1,
            ancount: 0,
            nscount: 0,
            arcount: 0,
        }
    }

    /// Decode the fixed header from the start of `bytes`.
    ///
    /// Anything past the first [`HEADER_LEN`] bytes is ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(AcceptError::TruncatedHeader(bytes.len()));
        }

        let mut buf = &bytes[..HEADER_LEN];
        Ok(Header {
            id: buf.get_u16(),
            bits: buf.get_u16(),
            qdcount: buf.get_u16(),
            ancount: buf.get_u16(),
            nscount: buf.get_u16(),
            arcount: buf.get_u16(),
        })
    }

    /// Append the header in network byte order
    pub fn write_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_u16(self.id);
        buf.put_u16(self.bits);
        buf.put_u16(self.qdcount);
        buf.put_u16(self.ancount);
        buf.put_u16(self.nscount);
        buf.put_u16(self.arcount);
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        self.write_to(&mut &mut out[..]);
        out
    }

    #[inline]
    pub fn is_response(&self) -> bool {
        self.bits & FLAG_QR != 0
    }

    /// Raw 4-bit opcode
    #[inline]
    pub fn opcode_bits(&self) -> u8 {
        ((self.bits >> OPCODE_SHIFT) & OPCODE_MASK) as u8
    }

    pub fn opcode(&self) -> Opcode {
        Opcode::from_bits(self.opcode_bits())
    }

    /// The Z bit, which conforming senders leave clear
    #[inline]
    pub fn reserved_bit(&self) -> bool {
        self.bits & FLAG_Z != 0
    }

    pub fn authoritative(&self) -> bool {
        self.bits & FLAG_AA != 0
    }

    pub fn truncated(&self) -> bool {
        self.bits & FLAG_TC != 0
    }

    pub fn recursion_desired(&self) -> bool {
        self.bits & FLAG_RD != 0
    }

    pub fn recursion_available(&self) -> bool {
        self.bits & FLAG_RA != 0
    }

    pub fn authentic_data(&self) -> bool {
        self.bits & FLAG_AD != 0
    }

    pub fn checking_disabled(&self) -> bool {
        self.bits & FLAG_CD != 0
    }

    pub fn rcode(&self) -> u8 {
        (self.bits & RCODE_MASK) as u8
    }

    pub fn with_response(mut self, response: bool) -> Self {
        self.set_flag(FLAG_QR, response);
        self
    }

    pub fn with_opcode(mut self, opcode: Opcode) -> Self {
        self.bits &= !(OPCODE_MASK << OPCODE_SHIFT);
        self.bits |= u16::from(opcode.code()) << OPCODE_SHIFT;
        self
    }

    pub fn with_reserved_bit(mut self, set: bool) -> Self {
        self.set_flag(FLAG_Z, set);
        self
    }

    pub fn with_rcode(mut self, rcode: u8) -> Self {
        self.bits = (self.bits & !RCODE_MASK) | (u16::from(rcode) & RCODE_MASK);
        self
    }

    /// Set all four section counts at once (question, answer, authority, additional)
    pub fn with_counts(mut self, qd: u16, an: u16, ns: u16, ar: u16) -> Self {
        self.qdcount = qd;
        self.ancount = an;
        self.nscount = ns;
        self.arcount = ar;
        self
    }

    fn set_flag(&mut self, flag: u16, on: bool) {
        if on {
            self.bits |= flag;
        } else {
            self.bits &= !flag;
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn test_decode_known_bytes() {
        // id 0xBEEF, RD set, 1 question, 1 additional (typical EDNS query)
        let wire = [
            0xBE, 0xEF, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
        ];
        let header = Header::from_bytes(&wire).expect("12 bytes should decode");

        assert_eq!(header.id, 0xBEEF);
        assert!(header.recursion_desired());
        assert!(!header.is_response());
        assert_eq!(header.opcode(), Opcode::Query);
        assert_eq!(header.qdcount, 1);
        assert_eq!(header.arcount, 1);
        assert_eq!(header.to_bytes(), wire);
    }

    #[test]
    fn test_decode_ignores_body() {
        let mut wire = Header::query(7).to_bytes().to_vec();
        wire.extend_from_slice(&[0xFF; 40]);
        let header = Header::from_bytes(&wire).expect("should decode");
        assert_eq!(header, Header::query(7));
    }

    #[test]
    fn test_truncated_header() {
        for len in 0..HEADER_LEN {
            let bytes = vec![0u8; len];
            match Header::from_bytes(&bytes) {
                Err(err @ AcceptError::TruncatedHeader(n)) => {
                    assert_eq!(n, len);
                    assert!(err
                        .to_string()
                        .starts_with(crate::error::constants::ERR_TRUNCATED_HEADER));
                }
                other => panic!("Expected TruncatedHeader, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_opcode_bits_placement() {
        let header = Header::query(1).with_opcode(Opcode::Update);
        assert_eq!(header.bits, 5 << 11);
        assert_eq!(header.opcode(), Opcode::Update);

        // Replacing the opcode must not leave stale bits behind
        let header = header.with_opcode(Opcode::Notify);
        assert_eq!(header.opcode_bits(), 4);
    }

    #[test]
    fn test_flag_builders_are_independent() {
        let header = Header::query(1)
            .with_response(true)
            .with_reserved_bit(true)
            .with_opcode(Opcode::from_bits(15))
            .with_rcode(3);

        assert!(header.is_response());
        assert!(header.reserved_bit());
        assert_eq!(header.opcode().code(), 15);
        assert_eq!(header.rcode(), 3);

        let header = header.with_response(false).with_reserved_bit(false);
        assert!(!header.is_response());
        assert!(!header.reserved_bit());
        assert_eq!(header.opcode_bits(), 15);
    }

    #[test]
    fn test_opcode_set_membership() {
        let set: OpcodeSet = [Opcode::Query, Opcode::Notify].into_iter().collect();
        assert!(set.contains(Opcode::Query));
        assert!(set.contains(Opcode::Notify));
        assert!(!set.contains(Opcode::Update));
        assert!(!set.contains_code(16));
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Opcode::Query, Opcode::Notify]);
    }

    #[test]
    fn test_unassigned_opcode_rejects_wide_and_named_values() {
        assert!(UnassignedOpcode::new(20).is_none());
        assert!(UnassignedOpcode::new(16).is_none());
        assert!(UnassignedOpcode::try_from(200u8).is_err());
        // Named codes have exactly one representation
        assert!(UnassignedOpcode::new(4).is_none());
        assert!(UnassignedOpcode::new(0).is_none());
        assert_eq!(UnassignedOpcode::new(9).map(UnassignedOpcode::code), Some(9));

        assert!(Opcode::try_from(20u8).is_err());
        assert_eq!(Opcode::try_from(4u8), Ok(Opcode::Notify));
        assert_eq!(Opcode::from_bits(4), Opcode::Notify);
    }

    #[test]
    fn test_unassigned_opcode_never_aliases_named() {
        let nine = Opcode::Unassigned(UnassignedOpcode::new(9).expect("9 is unassigned"));

        let collected: OpcodeSet = [nine].into_iter().collect();
        let built = OpcodeSet::empty().with(nine);
        for set in [collected, built] {
            assert_eq!(set.len(), 1);
            assert!(set.contains_code(9));
            assert!(!set.contains(Opcode::Notify));
        }

        let header = Header::query(1).with_opcode(nine);
        assert_eq!(header.opcode(), nine);
        assert_ne!(header.opcode(), Opcode::Notify);

        // Every wire code decodes to one opcode that encodes back to itself
        for code in 0u8..16 {
            let opcode = Opcode::from_bits(code);
            assert_eq!(opcode.code(), code);
            assert_eq!(Header::query(1).with_opcode(opcode).opcode(), opcode);
        }
    }
}

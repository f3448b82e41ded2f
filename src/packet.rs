//! TDI/TDO packet framing and FIFO write planning.
//!
//! A chain of N bits goes out as `N / 128` full packets followed by one residual packet holding
//! the last `N % 128` bits.  Each packet is a 16-bit header written to the double-byte port, then
//! its payload: whole 32-bit words through the quad-byte port and, for a residual packet, a tail
//! of fewer than 32 bits through the narrowest port that fits it.
//!
//! Everything here is pure; the programmer in `chain` decides when the writes happen.
use crate::config::{
    IO_SCAN_CHAIN_128BIT_MASK, IO_SCAN_CHAIN_128BIT_SHIFT, IO_SCAN_CHAIN_32BIT_MASK,
    IO_SCAN_CHAIN_32BIT_SHIFT, IO_SCAN_CHAIN_BYTE_MASK, IO_SCAN_CHAIN_PAYLOAD_24BIT,
    TDI_TDO_HEADER_FIRST_BYTE, TDI_TDO_HEADER_SECOND_BYTE_SHIFT, TDI_TDO_MAX_PAYLOAD,
};
use crate::regs::Register;

/// Largest payload of a single packet, in bits
pub const MAX_PACKET_BITS: u32 = TDI_TDO_MAX_PAYLOAD + 1;

/// Number of 32-bit table words holding `bits` bits of chain data
pub const fn words_for_bits(bits: u32) -> usize {
    bits.div_ceil(32) as usize
}

/// Header of a TDI/TDO packet programming an IO scan chain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TdiTdoHeader(u16);

impl TdiTdoHeader {
    /// Header for a packet carrying `payload_bits` bits, which must be in 1..=128
    pub const fn new(payload_bits: u32) -> Option<Self> {
        if payload_bits == 0 || payload_bits > MAX_PACKET_BITS {
            return None;
        }
        Some(Self::encode(payload_bits))
    }

    const fn encode(payload_bits: u32) -> Self {
        let len = (payload_bits - 1) as u16;
        Self(TDI_TDO_HEADER_FIRST_BYTE | len << TDI_TDO_HEADER_SECOND_BYTE_SHIFT)
    }

    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Whether the first byte marks an IO scan-chain program packet
    pub const fn is_program(self) -> bool {
        self.0 & 0xff == TDI_TDO_HEADER_FIRST_BYTE
    }

    /// The length field, `payload_bits - 1`
    pub const fn length_field(self) -> u8 {
        (self.0 >> TDI_TDO_HEADER_SECOND_BYTE_SHIFT) as u8
    }

    pub const fn payload_bits(self) -> u32 {
        self.length_field() as u32 + 1
    }
}

/// One of the write FIFO's entry points
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FifoPort {
    SingleByte,
    DoubleByte,
    QuadByte,
}

impl FifoPort {
    pub const fn register(self) -> Register {
        match self {
            FifoPort::SingleByte => Register::FifoSingleByte,
            FifoPort::DoubleByte => Register::FifoDoubleByte,
            FifoPort::QuadByte => Register::FifoQuadByte,
        }
    }

    pub const fn width_bits(self) -> u32 {
        match self {
            FifoPort::SingleByte => 8,
            FifoPort::DoubleByte => 16,
            FifoPort::QuadByte => 32,
        }
    }
}

/// A single write to a FIFO port
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FifoWrite {
    pub port: FifoPort,
    pub value: u32,
    /// Chain bits this write carries; zero for a header
    pub payload_bits: u32,
}

impl FifoWrite {
    const fn header(header: TdiTdoHeader) -> Self {
        Self {
            port: FifoPort::DoubleByte,
            value: header.raw() as u32,
            payload_bits: 0,
        }
    }

    const fn data(port: FifoPort, value: u32, payload_bits: u32) -> Self {
        Self {
            port,
            value,
            payload_bits,
        }
    }
}

/// A packet's slice of the chain: `payload_bits` bits starting at table word `first_word`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Packet {
    pub first_word: usize,
    pub payload_bits: u32,
}

impl Packet {
    pub const fn header(&self) -> TdiTdoHeader {
        // TransferPlan only produces packets of 1..=128 bits
        TdiTdoHeader::encode(self.payload_bits)
    }

    /// Whole 32-bit words written through the quad-byte port
    pub const fn full_words(&self) -> u32 {
        self.payload_bits >> IO_SCAN_CHAIN_32BIT_SHIFT
    }

    /// Bits left over after the whole words, 0..=31
    pub const fn tail_bits(&self) -> u32 {
        self.payload_bits & IO_SCAN_CHAIN_32BIT_MASK
    }

    /// Table words this packet reads
    pub const fn word_span(&self) -> usize {
        words_for_bits(self.payload_bits)
    }

    /// The FIFO writes for this packet, header first.  `table` must hold at least
    /// `first_word + word_span()` words.
    pub fn writes<'a>(&self, table: &'a [u32]) -> PacketWrites<'a> {
        let words = &table[self.first_word..self.first_word + self.word_span()];
        PacketWrites {
            header: Some(FifoWrite::header(self.header())),
            words,
            full_words: self.full_words() as usize,
            next_word: 0,
            tail_bits: self.tail_bits(),
            tail_done: 0,
        }
    }
}

/// Iterator over the FIFO writes of one packet
#[derive(Clone, Debug)]
pub struct PacketWrites<'a> {
    header: Option<FifoWrite>,
    words: &'a [u32],
    full_words: usize,
    next_word: usize,
    tail_bits: u32,
    // Tail bits already emitted
    tail_done: u32,
}

impl Iterator for PacketWrites<'_> {
    type Item = FifoWrite;

    fn next(&mut self) -> Option<FifoWrite> {
        if let Some(header) = self.header.take() {
            return Some(header);
        }

        if self.next_word < self.full_words {
            let word = self.words[self.next_word];
            self.next_word += 1;
            return Some(FifoWrite::data(FifoPort::QuadByte, word, 32));
        }

        if self.tail_done >= self.tail_bits {
            return None;
        }
        let word = self.words[self.full_words];
        let left = self.tail_bits - self.tail_done;

        // A tail wider than three bytes goes out whole.  Narrower tails are written a byte or two
        // at a time so the engine never pulls an unused byte out of the FIFO and shifts it in.
        let write = if self.tail_done == 0 && self.tail_bits > IO_SCAN_CHAIN_PAYLOAD_24BIT {
            FifoWrite::data(FifoPort::QuadByte, word, left)
        } else if left > 8 {
            let value = (word >> self.tail_done) & 0xffff;
            FifoWrite::data(FifoPort::DoubleByte, value, left.min(16))
        } else {
            let value = (word >> self.tail_done) & IO_SCAN_CHAIN_BYTE_MASK;
            FifoWrite::data(FifoPort::SingleByte, value, left)
        };
        self.tail_done += write.payload_bits;
        Some(write)
    }
}

/// Splits a chain of `total_bits` bits into packets
#[derive(Clone, Debug)]
pub struct TransferPlan {
    remaining_bits: u32,
    next_word: usize,
}

impl TransferPlan {
    pub const fn new(total_bits: u32) -> Self {
        Self {
            remaining_bits: total_bits,
            next_word: 0,
        }
    }

    /// Number of full 128-bit packets in a chain of `total_bits` bits
    pub const fn full_packets(total_bits: u32) -> u32 {
        total_bits >> IO_SCAN_CHAIN_128BIT_SHIFT
    }

    /// Bits in the residual packet, zero when there is none
    pub const fn residual_bits(total_bits: u32) -> u32 {
        total_bits & IO_SCAN_CHAIN_128BIT_MASK
    }
}

impl Iterator for TransferPlan {
    type Item = Packet;

    fn next(&mut self) -> Option<Packet> {
        if self.remaining_bits == 0 {
            return None;
        }
        let payload_bits = self.remaining_bits.min(MAX_PACKET_BITS);
        let packet = Packet {
            first_word: self.next_word,
            payload_bits,
        };
        self.remaining_bits -= payload_bits;
        self.next_word += packet.word_span();
        Some(packet)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining_bits.div_ceil(MAX_PACKET_BITS) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for TransferPlan {}

//! MD5 block transform (RFC 1321) over arena memory.
//!
//! Running state layout at the header offset:
//!
//! | bytes    | content                                   |
//! |----------|-------------------------------------------|
//! | `0..16`  | registers A, B, C, D (little-endian `u32`) |
//! | `16..24` | bytes absorbed so far (little-endian `u64`) |
//!
//! Registers are serialized in digest order, so the first 16 header bytes are
//! the digest after the final block.

use super::{BLOCK_SIZE, CompressionPrimitive, HEADER_SIZE, check_bounds};
use crate::error::PrimitiveError;

const IV: [u32; 4] = [0x6745_2301, 0xefcd_ab89, 0x98ba_dcfe, 0x1032_5476];

/// `K[i] = floor(2^32 * |sin(i + 1)|)`.
const K: [u32; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee, 0xf57c0faf, 0x4787c62a, 0xa8304613, 0xfd469501,
    0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be, 0x6b901122, 0xfd987193, 0xa679438e, 0x49b40821,
    0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa, 0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8,
    0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed, 0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a,
    0xfffa3942, 0x8771f681, 0x6d9d6122, 0xfde5380c, 0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
    0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05, 0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665,
    0xf4292244, 0x432aff97, 0xab9423a7, 0xfc93a039, 0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1, 0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

/// Per-step left rotations.
const S: [u32; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, //
    5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, //
    4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, //
    6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

/// Offset of the length-in-bits field inside a final block.
const LENGTH_FIELD: usize = BLOCK_SIZE - 8;

/// Portable MD5 compression primitive.
///
/// Stateless apart from what it keeps in the header region, so one value can
/// serve any number of sequential digests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Kernel;

impl Md5Kernel {
    /// Creates the kernel.
    pub const fn new() -> Self {
        Self
    }
}

impl CompressionPrimitive for Md5Kernel {
    fn init(&mut self, memory: &mut [u8], header_offset: usize) -> Result<(), PrimitiveError> {
        check_bounds(memory, header_offset, HEADER_SIZE)?;
        store_state(memory, header_offset, &IV, 0);
        Ok(())
    }

    fn absorb(
        &mut self,
        memory: &mut [u8],
        input_offset: usize,
        len: usize,
        header_offset: usize,
    ) -> Result<(), PrimitiveError> {
        if len % BLOCK_SIZE != 0 {
            return Err(PrimitiveError::Unaligned {
                len,
                block: BLOCK_SIZE,
            });
        }
        check_bounds(memory, header_offset, HEADER_SIZE)?;
        check_bounds(memory, input_offset, len)?;

        let (mut state, count) = load_state(memory, header_offset);
        for block in memory[input_offset..input_offset + len].chunks_exact(BLOCK_SIZE) {
            compress(&mut state, block);
        }
        store_state(memory, header_offset, &state, count.wrapping_add(len as u64));
        Ok(())
    }

    fn pad(
        &mut self,
        memory: &mut [u8],
        input_offset: usize,
        len: usize,
        header_offset: usize,
    ) -> Result<usize, PrimitiveError> {
        check_bounds(memory, input_offset, len)?;

        // Whole blocks of the terminal chunk go straight through; only the
        // tail is padded, moved down to the start of the staging region.
        let tail = len % BLOCK_SIZE;
        let whole = len - tail;
        self.absorb(memory, input_offset, whole, header_offset)?;
        memory.copy_within(input_offset + whole..input_offset + len, input_offset);

        let padded = if tail < LENGTH_FIELD {
            BLOCK_SIZE
        } else {
            2 * BLOCK_SIZE
        };
        check_bounds(memory, input_offset, padded)?;

        let (state, count) = load_state(memory, header_offset);
        let total = count.wrapping_add(tail as u64);
        store_state(memory, header_offset, &state, total);

        let block = &mut memory[input_offset..input_offset + padded];
        block[tail] = 0x80;
        block[tail + 1..padded - 8].fill(0);
        block[padded - 8..].copy_from_slice(&total.wrapping_mul(8).to_le_bytes());

        Ok(padded)
    }
}

fn load_state(memory: &[u8], header_offset: usize) -> ([u32; 4], u64) {
    let header = &memory[header_offset..header_offset + HEADER_SIZE];
    let mut state = [0u32; 4];
    for (word, bytes) in state.iter_mut().zip(header[..16].chunks_exact(4)) {
        *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }
    let mut count = [0u8; 8];
    count.copy_from_slice(&header[16..]);
    (state, u64::from_le_bytes(count))
}

fn store_state(memory: &mut [u8], header_offset: usize, state: &[u32; 4], count: u64) {
    let header = &mut memory[header_offset..header_offset + HEADER_SIZE];
    for (bytes, word) in header[..16].chunks_exact_mut(4).zip(state) {
        bytes.copy_from_slice(&word.to_le_bytes());
    }
    header[16..].copy_from_slice(&count.to_le_bytes());
}

/// Mixes one 64-byte block into `state`.
fn compress(state: &mut [u32; 4], block: &[u8]) {
    let mut w = [0u32; 16];
    for (word, bytes) in w.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }

    let [mut a, mut b, mut c, mut d] = *state;
    for i in 0..64 {
        let (f, g) = match i / 16 {
            0 => ((b & c) | (!b & d), i),
            1 => ((d & b) | (!d & c), (5 * i + 1) % 16),
            2 => (b ^ c ^ d, (3 * i + 5) % 16),
            _ => (c ^ (b | !d), (7 * i) % 16),
        };
        let mixed = a
            .wrapping_add(f)
            .wrapping_add(K[i])
            .wrapping_add(w[g])
            .rotate_left(S[i]);
        a = d;
        d = c;
        c = b;
        b = b.wrapping_add(mixed);
    }

    state[0] = state[0].wrapping_add(a);
    state[1] = state[1].wrapping_add(b);
    state[2] = state[2].wrapping_add(c);
    state[3] = state[3].wrapping_add(d);
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: usize = 0;
    const IN: usize = HEADER_SIZE;

    fn run(data: &[u8]) -> [u8; 16] {
        let mut memory = vec![0u8; IN + data.len() + 2 * BLOCK_SIZE];
        let mut kernel = Md5Kernel::new();
        kernel.init(&mut memory, H).unwrap();

        let whole = data.len() - data.len() % BLOCK_SIZE;
        memory[IN..IN + whole].copy_from_slice(&data[..whole]);
        kernel.absorb(&mut memory, IN, whole, H).unwrap();

        let tail = &data[whole..];
        memory[IN..IN + tail.len()].copy_from_slice(tail);
        let n = kernel.pad(&mut memory, IN, tail.len(), H).unwrap();
        kernel.absorb(&mut memory, IN, n, H).unwrap();

        let mut out = [0u8; 16];
        out.copy_from_slice(&memory[H..H + 16]);
        out
    }

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    #[test]
    fn test_rfc1321_vectors() {
        assert_eq!(hex(&run(b"")), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(hex(&run(b"a")), "0cc175b9c0f1b6a831c399e269772661");
        assert_eq!(hex(&run(b"abc")), "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(
            hex(&run(b"message digest")),
            "f96b697d7cb7938d525a2f31aaf161d0"
        );
        assert_eq!(
            hex(&run(
                b"12345678901234567890123456789012345678901234567890123456789012345678901234567890"
            )),
            "57edf4a22be3c955ac49da2e2107b67a"
        );
    }

    #[test]
    fn test_pad_block_counts() {
        let mut kernel = Md5Kernel::new();
        for (len, expected) in [(0, 64), (55, 64), (56, 128), (63, 128), (64, 64), (120, 128)] {
            let mut memory = vec![0u8; IN + len + 2 * BLOCK_SIZE];
            kernel.init(&mut memory, H).unwrap();
            assert_eq!(kernel.pad(&mut memory, IN, len, H).unwrap(), expected, "len {len}");
        }
    }

    #[test]
    fn test_pad_tail_moves_to_input_offset() {
        let mut kernel = Md5Kernel::new();
        let mut memory = vec![0u8; IN + 70 + BLOCK_SIZE];
        kernel.init(&mut memory, H).unwrap();
        memory[IN + 64..IN + 70].copy_from_slice(b"tail!!");

        kernel.pad(&mut memory, IN, 70, H).unwrap();
        assert_eq!(&memory[IN..IN + 6], b"tail!!");
        assert_eq!(memory[IN + 6], 0x80);
    }

    #[test]
    fn test_absorb_rejects_unaligned_length() {
        let mut kernel = Md5Kernel::new();
        let mut memory = vec![0u8; 256];
        kernel.init(&mut memory, H).unwrap();
        assert_eq!(
            kernel.absorb(&mut memory, IN, 65, H),
            Err(PrimitiveError::Unaligned { len: 65, block: 64 })
        );
    }

    #[test]
    fn test_out_of_bounds_calls() {
        let mut kernel = Md5Kernel::new();
        let mut memory = vec![0u8; 100];
        assert!(kernel.init(&mut memory, 90).is_err());
        kernel.init(&mut memory, H).unwrap();
        assert!(matches!(
            kernel.absorb(&mut memory, IN, 128, H),
            Err(PrimitiveError::OutOfBounds { .. })
        ));
        assert!(kernel.pad(&mut memory, IN, 60, H).is_err());
    }

    #[test]
    fn test_init_resets_state() {
        let mut kernel = Md5Kernel::new();
        let mut memory = vec![0xFFu8; 128];
        kernel.init(&mut memory, H).unwrap();
        assert_eq!(&memory[..4], &IV[0].to_le_bytes());
        assert_eq!(&memory[16..24], &[0u8; 8]);
    }
}

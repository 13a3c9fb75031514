//! Bit-set view over the word arrays filled in by `EVIOCGBIT` and the state ioctls.
//!
//! The kernel fills these buffers as arrays of `unsigned long`, where bit `i` of word `w`
//! stands for code `w * BITS_PER_LONG + i`. [`Bitmap`] keeps the buffer as plain bytes and
//! reads it back one native word at a time.

use crate::FeatureCode;
use std::mem;

/// The machine word the kernel uses for bitmaps.
pub type Word = libc::c_ulong;

const WORD_BYTES: usize = mem::size_of::<Word>();
const WORD_BITS: usize = WORD_BYTES * 8;

/// A capability or state bitmap, one bit per feature code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    bytes: Vec<u8>,
}

impl Bitmap {
    /// A zeroed bitmap with room for every code in `[0, max_code)`.
    pub fn for_codes(max_code: u16) -> Self {
        let words = usize::from(max_code).div_ceil(WORD_BITS);

        Self {
            bytes: vec![0; words * WORD_BYTES],
        }
    }

    pub fn from_words(words: &[Word]) -> Self {
        Self {
            bytes: words.iter().flat_map(|w| w.to_ne_bytes()).collect(),
        }
    }

    /// The raw buffer, to be handed to the control call.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn word_count(&self) -> usize {
        self.bytes.len() / WORD_BYTES
    }

    pub fn words(&self) -> impl Iterator<Item = Word> + '_ {
        self.bytes.chunks_exact(WORD_BYTES).map(|chunk| {
            let mut word = [0u8; WORD_BYTES];
            word.copy_from_slice(chunk);
            Word::from_ne_bytes(word)
        })
    }

    /// Whether bit `bit` is set. Bits past the end of the buffer read as clear.
    pub fn is_set(&self, bit: usize) -> bool {
        self.words()
            .nth(bit / WORD_BITS)
            .map_or(false, |word| (word >> (bit % WORD_BITS)) & 1 == 1)
    }

    /// Collect the set bits below `upper_bound`, in increasing order.
    pub fn scan(&self, upper_bound: u16) -> Vec<FeatureCode> {
        let bound = usize::from(upper_bound);
        let mut codes = Vec::new();

        for (i, mut word) in self.words().enumerate() {
            let base = i * WORD_BITS;
            if base >= bound {
                break;
            }

            while word != 0 {
                let code = base + word.trailing_zeros() as usize;
                if code >= bound {
                    break;
                }

                // code < bound <= u16::MAX
                codes.push(code as FeatureCode);
                // Clear the lowest set bit
                word &= word - 1;
            }
        }

        codes
    }
}

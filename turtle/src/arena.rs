//! Growable byte stack holding length-prefixed "measured strings" (spec
//! §3, §4.2).
//!
//! Every syntactic construct pushes the strings it needs while it parses
//! and pops every one of them before returning, success or failure, so
//! the arena's size after parsing a construct equals its size before.
//! The logical stack of outstanding references is tracked unconditionally
//! (it is one `Vec<usize>` push/pop, negligible next to the byte-copying
//! `push_byte` calls it accompanies); only the top-of-stack check on
//! `pop` is gated behind `debug_assert_eq!`, so release builds pay
//! nothing for it beyond the tracking itself.

use std::convert::TryInto;
use std::str;

/// Offset of a measured string's header within the arena.
pub type StrRef = usize;

const HEADER_LEN: usize = 8;

/// A cheap, borrowed view of a measured string: byte length, character
/// length, and the raw bytes (well-formed UTF-8 once the construct that
/// is building it returns control to its caller).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasuredStr<'a> {
    pub n_bytes: u32,
    pub n_chars: u32,
    pub bytes: &'a [u8],
}

impl<'a> MeasuredStr<'a> {
    pub fn as_str(&self) -> &'a str {
        str::from_utf8(self.bytes).expect("arena string is not valid UTF-8")
    }
}

const N_VOCAB: usize = 8;

pub struct StringArena {
    data: Vec<u8>,
    stack: Vec<StrRef>,
    vocab: [StrRef; N_VOCAB],
}

/// Index into the pre-registered RDF/XSD constants every Turtle document
/// can reach without a `@prefix` declaration (spec §4.5): the three
/// `rdf:` list constructors, the `rdf:type` keyword expansion for bare
/// `a`, and the three `xsd:` datatypes inferred for unquoted numeric
/// literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vocab {
    RdfFirst,
    RdfRest,
    RdfNil,
    RdfType,
    XsdInteger,
    XsdDecimal,
    XsdDouble,
    XsdBoolean,
}

const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

impl StringArena {
    pub fn new() -> Self {
        let mut data = Vec::with_capacity(4096);
        let mut push_vocab = |data: &mut Vec<u8>, ns: &str, name: &str| -> StrRef {
            let r = data.len();
            let full = [ns, name].concat();
            data.extend_from_slice(&(full.len() as u32).to_ne_bytes());
            data.extend_from_slice(&(full.chars().count() as u32).to_ne_bytes());
            data.extend_from_slice(full.as_bytes());
            data.push(0);
            r
        };

        let vocab = [
            push_vocab(&mut data, RDF_NS, "first"),
            push_vocab(&mut data, RDF_NS, "rest"),
            push_vocab(&mut data, RDF_NS, "nil"),
            push_vocab(&mut data, RDF_NS, "type"),
            push_vocab(&mut data, XSD_NS, "integer"),
            push_vocab(&mut data, XSD_NS, "decimal"),
            push_vocab(&mut data, XSD_NS, "double"),
            push_vocab(&mut data, XSD_NS, "boolean"),
        ];

        StringArena { data, stack: vocab.to_vec(), vocab }
    }

    pub fn vocab(&self, which: Vocab) -> StrRef {
        match which {
            Vocab::RdfFirst => self.vocab[0],
            Vocab::RdfRest => self.vocab[1],
            Vocab::RdfNil => self.vocab[2],
            Vocab::RdfType => self.vocab[3],
            Vocab::XsdInteger => self.vocab[4],
            Vocab::XsdDecimal => self.vocab[5],
            Vocab::XsdDouble => self.vocab[6],
            Vocab::XsdBoolean => self.vocab[7],
        }
    }

    fn is_vocab(&self, r: StrRef) -> bool {
        self.vocab.contains(&r)
    }

    /// Reserves a zero-length measured string and returns its reference.
    pub fn push_empty(&mut self) -> StrRef {
        let r = self.data.len();
        self.data.extend_from_slice(&0u32.to_ne_bytes());
        self.data.extend_from_slice(&0u32.to_ne_bytes());
        self.data.push(0);
        self.stack.push(r);
        r
    }

    fn n_bytes(&self, r: StrRef) -> u32 {
        u32::from_ne_bytes(self.data[r..r + 4].try_into().unwrap())
    }

    fn set_n_bytes(&mut self, r: StrRef, v: u32) {
        self.data[r..r + 4].copy_from_slice(&v.to_ne_bytes());
    }

    fn n_chars(&self, r: StrRef) -> u32 {
        u32::from_ne_bytes(self.data[r + 4..r + 8].try_into().unwrap())
    }

    fn set_n_chars(&mut self, r: StrRef, v: u32) {
        self.data[r + 4..r + 8].copy_from_slice(&v.to_ne_bytes());
    }

    /// Appends one raw byte to the top-of-stack string identified by `r`.
    /// Character count increments only for non-continuation bytes
    /// (`byte & 0xC0 != 0x80`).
    pub fn push_byte(&mut self, r: StrRef, byte: u8) {
        debug_assert_eq!(
            self.stack.last().copied(),
            Some(r),
            "push_byte must target the top-of-stack string"
        );
        self.data.pop(); // drop the NUL terminator
        self.data.push(byte);
        self.data.push(0);
        self.set_n_bytes(r, self.n_bytes(r) + 1);
        if byte & 0xC0 != 0x80 {
            self.set_n_chars(r, self.n_chars(r) + 1);
        }
    }

    /// Bulk-appends `bytes` to the top-of-stack string. Both counters grow
    /// by `bytes.len()`; the caller is responsible for `bytes` being a
    /// whole number of UTF-8 characters if it wants an accurate char count.
    pub fn append(&mut self, r: StrRef, bytes: &[u8]) {
        debug_assert_eq!(
            self.stack.last().copied(),
            Some(r),
            "append must target the top-of-stack string"
        );
        self.data.pop();
        self.data.extend_from_slice(bytes);
        self.data.push(0);
        self.set_n_bytes(r, self.n_bytes(r) + bytes.len() as u32);
        self.set_n_chars(r, self.n_chars(r) + bytes.len() as u32);
    }

    /// Frees the top record. `r` must equal the top-of-stack reference
    /// (checked in debug builds). A no-op for the three pre-registered
    /// RDF vocabulary strings.
    pub fn pop(&mut self, r: StrRef) {
        if self.is_vocab(r) {
            return;
        }
        let top = self.stack.pop();
        debug_assert_eq!(top, Some(r), "pop must target the top-of-stack string");
        self.data.truncate(r);
    }

    pub fn get(&self, r: StrRef) -> MeasuredStr<'_> {
        let n_bytes = self.n_bytes(r);
        let n_chars = self.n_chars(r);
        let start = r + HEADER_LEN;
        let bytes = &self.data[start..start + n_bytes as usize];
        MeasuredStr { n_bytes, n_chars, bytes }
    }

    pub fn as_str(&self, r: StrRef) -> &str {
        self.get(r).as_str()
    }

    /// Overwrites the first `replacement.len()` content bytes of the
    /// string at `r` in place. Callers must only use this for a
    /// same-length swap (e.g. the Turtle `genid`→`docid` blank-label
    /// rewrite, spec §4.5) — it does not touch the length header.
    pub fn overwrite_prefix(&mut self, r: StrRef, replacement: &[u8]) {
        let start = r + HEADER_LEN;
        self.data[start..start + replacement.len()].copy_from_slice(replacement);
    }

    /// Current size of the arena, for the "unchanged across a construct"
    /// invariant exercised by tests (spec §8).
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl Default for StringArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_pop_restores_size() {
        let mut arena = StringArena::new();
        let base = arena.size();
        let r = arena.push_empty();
        arena.push_byte(r, b'h');
        arena.push_byte(r, b'i');
        assert_eq!(arena.as_str(r), "hi");
        arena.pop(r);
        assert_eq!(arena.size(), base);
    }

    #[test]
    fn push_byte_tracks_utf8_char_count() {
        let mut arena = StringArena::new();
        let r = arena.push_empty();
        // 'é' = 0xC3 0xA9, one character, two bytes.
        arena.push_byte(r, 0xC3);
        arena.push_byte(r, 0xA9);
        let measured = arena.get(r);
        assert_eq!(measured.n_bytes, 2);
        assert_eq!(measured.n_chars, 1);
        arena.pop(r);
    }

    #[test]
    fn vocab_strings_survive_pop() {
        let mut arena = StringArena::new();
        let nil = arena.vocab(Vocab::RdfNil);
        assert_eq!(
            arena.as_str(nil),
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil"
        );
        let size_before = arena.size();
        arena.pop(nil);
        assert_eq!(arena.size(), size_before);
        assert_eq!(
            arena.as_str(nil),
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil"
        );
    }

    #[test]
    #[should_panic(expected = "top-of-stack")]
    fn pop_non_top_panics_in_debug() {
        let mut arena = StringArena::new();
        let a = arena.push_empty();
        let _b = arena.push_empty();
        arena.pop(a); // a is not top-of-stack; b is.
    }
}

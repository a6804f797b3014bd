//! Fresh blank-node identifier minting (spec §4.5 "Blank-node mint").

/// Mints `"{prefix}genid{n}"` identifiers with a monotonically increasing
/// counter, starting at 1 and never reset over the life of a reader — two
/// readers parsing the same prefix independently can still clash, which
/// is why [`BlankNodeMint::with_prefix`] lets a caller scope each document
/// to a prefix of its own.
pub struct BlankNodeMint {
    prefix: String,
    counter: u64,
}

impl BlankNodeMint {
    pub fn new() -> Self {
        BlankNodeMint { prefix: String::new(), counter: 0 }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        BlankNodeMint { prefix: prefix.into(), counter: 0 }
    }

    /// Prepends `bytes` to every identifier minted from now on.
    pub fn add_prefix(&mut self, bytes: &str) {
        self.prefix.insert_str(0, bytes);
    }

    /// Mints the next fresh identifier, formatted into `out` (a string
    /// the caller owns — typically a string-arena slot).
    pub fn mint(&mut self, out: &mut String) {
        self.counter += 1;
        out.push_str(&self.prefix);
        out.push_str("genid");
        out.push_str(&self.counter.to_string());
    }
}

impl Default for BlankNodeMint {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_monotonic() {
        let mut mint = BlankNodeMint::new();
        let mut a = String::new();
        let mut b = String::new();
        mint.mint(&mut a);
        mint.mint(&mut b);
        assert_eq!(a, "genid1");
        assert_eq!(b, "genid2");
    }

    #[test]
    fn prefix_is_prepended() {
        let mut mint = BlankNodeMint::with_prefix("doc1-");
        let mut a = String::new();
        mint.mint(&mut a);
        assert_eq!(a, "doc1-genid1");
    }
}

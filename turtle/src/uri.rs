//! RFC 3986 reference parsing, resolution against a base URI, and
//! serialisation with dot-segment normalisation (spec §4.3).
//!
//! `ParsedUri` holds byte ranges over one source string rather than
//! copied substrings — parsing an IRI reference is O(length) with no
//! allocation. `resolve` writes its result straight to a sink instead of
//! building an intermediate target struct first, so the merge-then-write
//! of the reference and base paths happens in one pass.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Range {
    start: usize,
    end: usize,
}

/// A parsed URI reference: optional byte ranges over `source` (spec §3
/// "Parsed URI"). A range collapses to `None` when the component is
/// entirely absent *or* empty — resolution only needs to distinguish
/// "present with content" from "not there", never a present-but-empty
/// component from an absent one.
#[derive(Debug, Clone, Copy)]
pub struct ParsedUri<'a> {
    source: &'a str,
    scheme: Option<Range>,
    authority: Option<Range>,
    path: Option<Range>,
    query: Option<Range>,
    fragment: Option<Range>,
}

fn scheme_end(bytes: &[u8]) -> Option<usize> {
    if bytes.is_empty() || !bytes[0].is_ascii_alphabetic() {
        return None;
    }
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b':' => return Some(i),
            b if b.is_ascii_alphanumeric() || b == b'+' || b == b'-' || b == b'.' => i += 1,
            _ => return None,
        }
    }
    None
}

/// `true` iff `utf8` starts with an ALPHA followed by zero or more scheme
/// characters followed by `:` (spec §4.3).
pub fn uri_string_has_scheme(utf8: &str) -> bool {
    scheme_end(utf8.as_bytes()).is_some()
}

impl<'a> ParsedUri<'a> {
    pub fn parse(source: &'a str) -> Self {
        let bytes = source.as_bytes();
        let mut pos = 0usize;

        let scheme = scheme_end(bytes).map(|end| {
            pos = end + 1;
            Range { start: 0, end }
        });

        let mut authority = None;
        if bytes[pos..].starts_with(b"//") {
            let start = pos + 2;
            let mut end = start;
            while end < bytes.len() && !matches!(bytes[end], b'/' | b'?' | b'#') {
                end += 1;
            }
            authority = Some(Range { start, end });
            pos = end;
        }

        let path_start = pos;
        while pos < bytes.len() && bytes[pos] != b'?' && bytes[pos] != b'#' {
            pos += 1;
        }
        let path = if pos > path_start {
            Some(Range { start: path_start, end: pos })
        } else {
            None
        };

        let mut query = None;
        if pos < bytes.len() && bytes[pos] == b'?' {
            let start = pos + 1;
            let mut end = start;
            while end < bytes.len() && bytes[end] != b'#' {
                end += 1;
            }
            if end > start {
                query = Some(Range { start, end });
            }
            pos = end;
        }

        let fragment = if pos < bytes.len() && bytes[pos] == b'#' {
            Some(Range { start: pos, end: bytes.len() })
        } else {
            None
        };

        ParsedUri { source, scheme, authority, path, query, fragment }
    }

    fn slice(&self, range: Option<Range>) -> Option<&'a str> {
        range.map(|r| &self.source[r.start..r.end])
    }

    pub fn scheme(&self) -> Option<&'a str> {
        self.slice(self.scheme)
    }

    pub fn authority(&self) -> Option<&'a str> {
        self.slice(self.authority)
    }

    pub fn path(&self) -> Option<&'a str> {
        self.slice(self.path)
    }

    pub fn query(&self) -> Option<&'a str> {
        self.slice(self.query)
    }

    /// Includes the leading `#`.
    pub fn fragment(&self) -> Option<&'a str> {
        self.slice(self.fragment)
    }

    pub fn is_relative(&self) -> bool {
        self.scheme.is_none()
    }
}

/// RFC 3986 §5.3 path merge: join `ref_path` onto `base_path`'s directory
/// (everything up to and including its last `/`), or, when `base_path` is
/// absent but an authority was present, onto a bare root.
fn merge_paths(base_has_authority: bool, base_path: Option<&str>, ref_path: &str) -> String {
    match base_path {
        Some(bp) => match bp.rfind('/') {
            Some(i) => format!("{}{}", &bp[..=i], ref_path),
            None => ref_path.to_string(),
        },
        None if base_has_authority => format!("/{}", ref_path),
        None => ref_path.to_string(),
    }
}

/// RFC 3986 §5.2.4 `remove_dot_segments`, applied once to a fully merged
/// path at serialisation time — this is where "dot segments resolved on
/// the fly" (spec §4.3) happens.
fn remove_dot_segments(path: &str) -> String {
    let mut input = path.to_string();
    let mut output = String::new();
    while !input.is_empty() {
        if input.starts_with("../") {
            input.replace_range(0..3, "");
        } else if input.starts_with("./") {
            input.replace_range(0..2, "");
        } else if input.starts_with("/./") {
            input.replace_range(0..2, "");
        } else if input == "/." {
            input.replace_range(1..2, "");
        } else if input.starts_with("/../") {
            input.replace_range(0..3, "");
            remove_last_segment(&mut output);
        } else if input == "/.." {
            input.replace_range(1..3, "");
            remove_last_segment(&mut output);
        } else if input == "." || input == ".." {
            input.clear();
        } else {
            let has_leading_slash = input.starts_with('/');
            let rest = if has_leading_slash { &input[1..] } else { &input[..] };
            let segment_len_in_rest = rest.find('/').unwrap_or_else(|| rest.len());
            let cut = segment_len_in_rest + if has_leading_slash { 1 } else { 0 };
            output.push_str(&input[..cut]);
            input.replace_range(0..cut, "");
        }
    }
    output
}

fn remove_last_segment(output: &mut String) {
    if let Some(idx) = output.rfind('/') {
        output.truncate(idx);
    } else {
        output.clear();
    }
}

/// Serialises a single parsed URI verbatim — no base, no dot-segment
/// normalisation. Satisfies the round-trip law in spec §8: `parse` then
/// `serialise` reproduces the original source byte-for-byte.
pub fn serialise<W: fmt::Write>(uri: &ParsedUri<'_>, out: &mut W) -> fmt::Result {
    if let Some(scheme) = uri.scheme() {
        out.write_str(scheme)?;
        out.write_char(':')?;
    }
    if let Some(authority) = uri.authority() {
        out.write_str("//")?;
        out.write_str(authority)?;
    }
    if let Some(path) = uri.path() {
        out.write_str(path)?;
    }
    if let Some(query) = uri.query() {
        out.write_char('?')?;
        out.write_str(query)?;
    }
    if let Some(fragment) = uri.fragment() {
        out.write_str(fragment)?;
    }
    Ok(())
}

/// Resolves `reference` against `base` (RFC 3986 §5.2.2) and writes the
/// result straight to `out`.
pub fn resolve<W: fmt::Write>(base: &ParsedUri<'_>, reference: &str, out: &mut W) -> fmt::Result {
    let r = ParsedUri::parse(reference);

    if let Some(scheme) = r.scheme() {
        out.write_str(scheme)?;
        out.write_char(':')?;
        if let Some(a) = r.authority() {
            out.write_str("//")?;
            out.write_str(a)?;
        }
        out.write_str(&remove_dot_segments(r.path().unwrap_or("")))?;
        return write_query_and_fragment(out, r.query(), r.fragment());
    }

    if let Some(a) = r.authority() {
        write_scheme(out, base.scheme())?;
        out.write_str("//")?;
        out.write_str(a)?;
        out.write_str(&remove_dot_segments(r.path().unwrap_or("")))?;
        return write_query_and_fragment(out, r.query(), r.fragment());
    }

    write_scheme(out, base.scheme())?;
    if let Some(a) = base.authority() {
        out.write_str("//")?;
        out.write_str(a)?;
    }

    if r.path().is_none() {
        if let Some(path) = base.path() {
            out.write_str(path)?;
        }
        let query = r.query().or_else(|| base.query());
        return write_query_and_fragment(out, query, r.fragment());
    }

    let merged = merge_paths(base.authority().is_some(), base.path(), r.path().unwrap());
    out.write_str(&remove_dot_segments(&merged))?;
    write_query_and_fragment(out, r.query(), r.fragment())
}

fn write_scheme<W: fmt::Write>(out: &mut W, scheme: Option<&str>) -> fmt::Result {
    if let Some(scheme) = scheme {
        out.write_str(scheme)?;
        out.write_char(':')?;
    }
    Ok(())
}

fn write_query_and_fragment<W: fmt::Write>(
    out: &mut W,
    query: Option<&str>,
    fragment: Option<&str>,
) -> fmt::Result {
    if let Some(query) = query {
        out.write_char('?')?;
        out.write_str(query)?;
    }
    if let Some(fragment) = fragment {
        out.write_str(fragment)?;
    }
    Ok(())
}

/// Resolves `reference` against `base` and returns an owned `String`.
/// Convenience wrapper over [`resolve`] for callers (and tests) that do
/// not need the zero-allocation sink path.
pub fn resolve_to_string(base: &ParsedUri<'_>, reference: &str) -> String {
    let mut out = String::new();
    resolve(base, reference, &mut out).expect("String writes are infallible");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(base: &str, ref_: &str) -> String {
        let b = ParsedUri::parse(base);
        resolve_to_string(&b, ref_)
    }

    #[test]
    fn has_scheme_detection() {
        assert!(uri_string_has_scheme("http://example.com/"));
        assert!(uri_string_has_scheme("mailto:foo@bar.com"));
        assert!(!uri_string_has_scheme("//example.com/"));
        assert!(!uri_string_has_scheme("relative/path"));
        assert!(!uri_string_has_scheme("1scheme:not-alpha-start"));
    }

    #[test]
    fn parse_then_serialise_round_trips() {
        for uri in [
            "http://a/b/c/d;p?q",
            "https://example.com/a/b?x=1&y=2#frag",
            "mailto:foo@bar.com",
            "urn:isbn:0451450523",
            "http://example.com",
        ] {
            let parsed = ParsedUri::parse(uri);
            let mut out = String::new();
            serialise(&parsed, &mut out).unwrap();
            assert_eq!(out, uri);
        }
    }

    /// RFC 3986 §5.4.1, "normal examples", base = http://a/b/c/d;p?q
    #[test]
    fn rfc3986_normal_examples() {
        let base = "http://a/b/c/d;p?q";
        let cases: &[(&str, &str)] = &[
            ("g:h", "g:h"),
            ("g", "http://a/b/c/g"),
            ("./g", "http://a/b/c/g"),
            ("g/", "http://a/b/c/g/"),
            ("/g", "http://a/g"),
            ("//g", "http://g"),
            ("?y", "http://a/b/c/d;p?y"),
            ("g?y", "http://a/b/c/g?y"),
            ("#s", "http://a/b/c/d;p?q#s"),
            ("g#s", "http://a/b/c/g#s"),
            ("g?y#s", "http://a/b/c/g?y#s"),
            (";x", "http://a/b/c/;x"),
            ("g;x", "http://a/b/c/g;x"),
            ("g;x?y#s", "http://a/b/c/g;x?y#s"),
            ("", "http://a/b/c/d;p?q"),
            (".", "http://a/b/c/"),
            ("./", "http://a/b/c/"),
            ("..", "http://a/b/"),
            ("../", "http://a/b/"),
            ("../g", "http://a/b/g"),
            ("../..", "http://a/"),
            ("../../", "http://a/"),
            ("../../g", "http://a/g"),
        ];
        for (reference, expected) in cases {
            assert_eq!(&resolved(base, reference), expected, "resolving {:?}", reference);
        }
    }
}

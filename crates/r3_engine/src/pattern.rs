/* 📖 # How is the replacement template read?

The template follows the ECMAScript replacement rules that users of `sed`-like rename tools
and of JavaScript's `String.replace` expect, not the `regex` crate's own `${name}` syntax:

| Template | Inserts |
|---|---|
| `$&` | the whole match |
| `$n`, `$nn` | capture group n (two digits are taken if present); nothing if there is no such group or it did not participate |
| `` $` `` | the text between the previous match (or the start) and this match |
| `$'` | the text after this match |
| `$$` | a single `$` |

Any other `$` is copied as is. So `baz$1_old` is group 1 followed by `_old`.

Matching runs on the raw bytes of the base name, so names that are not valid Unicode can
still match and be renamed.
*/

use std::ffi::{OsStr, OsString};

use regex::bytes::Regex;

use r3_base::{R3Error, R3Result, bail};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(Vec<u8>),
    Group(usize),
    Prefix,
    Suffix,
}

fn parse_template(template: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut literal = Vec::new();
    let bytes = template.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'$' || i + 1 == bytes.len() {
            literal.push(bytes[i]);
            i += 1;
            continue;
        }
        let piece = match bytes[i + 1] {
            b'$' => {
                literal.push(b'$');
                i += 2;
                continue;
            }
            b'&' => {
                i += 2;
                Piece::Group(0)
            }
            b'`' => {
                i += 2;
                Piece::Prefix
            }
            b'\'' => {
                i += 2;
                Piece::Suffix
            }
            first @ b'0'..=b'9' => {
                let mut group = usize::from(first - b'0');
                i += 2;
                if let Some(second @ b'0'..=b'9') = bytes.get(i).copied() {
                    group = group * 10 + usize::from(second - b'0');
                    i += 1;
                }
                Piece::Group(group)
            }
            _ => {
                literal.push(b'$');
                i += 1;
                continue;
            }
        };
        if !literal.is_empty() {
            pieces.push(Piece::Literal(std::mem::take(&mut literal)));
        }
        pieces.push(piece);
    }
    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }
    pieces
}

#[cfg(unix)]
fn os_string_from_bytes(bytes: Vec<u8>) -> OsString {
    use std::os::unix::ffi::OsStringExt;
    OsString::from_vec(bytes)
}

// Elsewhere the platform encoding cannot be rebuilt from arbitrary bytes.
#[cfg(not(unix))]
fn os_string_from_bytes(bytes: Vec<u8>) -> OsString {
    OsString::from(String::from_utf8_lossy(&bytes).into_owned())
}

/// The compiled `<find>` pattern together with its replacement template.
///
/// Compiled once per run and shared read-only by every match.
#[derive(Debug, Clone)]
pub struct RenamePattern {
    regex: Regex,
    replacement: String,
    pieces: Vec<Piece>,
}

impl RenamePattern {
    /// Compile `find` and pair it with the `replace` template.
    pub fn compile(find: &str, replace: &str) -> R3Result<Self> {
        if find.is_empty() {
            bail!("<find> must not be empty!");
        }
        let regex = Regex::new(find).map_err(|e| {
            Box::new(R3Error::message(format!("<find> is not a valid pattern: {}", e)))
        })?;
        Ok(Self {
            regex,
            replacement: replace.to_string(),
            pieces: parse_template(replace),
        })
    }

    pub fn find(&self) -> &str {
        self.regex.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Whether `name` contains a match anywhere.
    pub fn is_match(&self, name: &OsStr) -> bool {
        self.regex.is_match(name.as_encoded_bytes())
    }

    /// The new base name for `name`, or `None` if the pattern does not occur in it.
    ///
    /// Every non-overlapping match is replaced.
    pub fn rename(&self, name: &OsStr) -> Option<OsString> {
        let haystack = name.as_encoded_bytes();
        let mut renamed = Vec::with_capacity(haystack.len());
        let mut last = 0;
        let mut matched = false;

        for captures in self.regex.captures_iter(haystack) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            matched = true;
            renamed.extend_from_slice(&haystack[last..whole.start()]);
            for piece in &self.pieces {
                match piece {
                    Piece::Literal(bytes) => renamed.extend_from_slice(bytes),
                    Piece::Group(index) => {
                        if let Some(group) = captures.get(*index) {
                            renamed.extend_from_slice(group.as_bytes());
                        }
                    }
                    Piece::Prefix => renamed.extend_from_slice(&haystack[last..whole.start()]),
                    Piece::Suffix => renamed.extend_from_slice(&haystack[whole.end()..]),
                }
            }
            last = whole.end();
        }
        if !matched {
            return None;
        }
        renamed.extend_from_slice(&haystack[last..]);
        Some(os_string_from_bytes(renamed))
    }
}

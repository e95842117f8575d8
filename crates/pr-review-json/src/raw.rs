//! Substring-level scanning of raw JSON text
//!
//! These helpers locate values by the literal text of their key without
//! building a parse tree. Lookup is purely textual: a key is matched wherever
//! its literal text first occurs, so an identical key inside an earlier,
//! unrelated nested object wins. Malformed or truncated input yields `None`
//! or a shorter sequence, never a panic.
//!
//! Keys are passed in their quoted form including the colon, e.g. `"\"id\":"`.

/// Byte range of a delimited value inside the scanned text.
///
/// `start` points at the opening delimiter and `end` at the matching closing
/// delimiter (both inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Slice the span (delimiters included) out of the text it was found in.
    pub fn slice<'a>(&self, json: &'a str) -> &'a str {
        &json[self.start..=self.end]
    }
}

/// Find the `}` matching the `{` at `open_pos`.
///
/// Braces inside string literals are ignored, and a backslash inside a string
/// escapes the following character. Returns `None` if `open_pos` is not a `{`
/// or the depth never returns to zero.
pub fn find_matching_brace(json: &str, open_pos: usize) -> Option<usize> {
    find_matching(json, open_pos, b'{', b'}')
}

/// Array analogue of [`find_matching_brace`].
pub fn find_matching_bracket(json: &str, open_pos: usize) -> Option<usize> {
    find_matching(json, open_pos, b'[', b']')
}

fn find_matching(json: &str, open_pos: usize, open: u8, close: u8) -> Option<usize> {
    let bytes = json.as_bytes();
    if bytes.get(open_pos) != Some(&open) {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[open_pos..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }

        if byte == b'"' {
            in_string = true;
        } else if byte == open {
            depth += 1;
        } else if byte == close {
            depth -= 1;
            if depth == 0 {
                return Some(open_pos + offset);
            }
        }
    }

    None
}

/// Position just past the first literal occurrence of `key`.
fn value_start(json: &str, key: &str) -> Option<usize> {
    json.find(key).map(|pos| pos + key.len())
}

/// Locate the array following the first occurrence of `array_key`.
///
/// The first `[` after the key is taken as the array start, whether or not it
/// syntactically belongs to that key.
pub fn find_array_span(json: &str, array_key: &str) -> Option<Span> {
    let after_key = value_start(json, array_key)?;
    let start = after_key + json[after_key..].find('[')?;
    let end = find_matching_bracket(json, start)?;
    Some(Span { start, end })
}

/// Iterate the top-level `{...}` elements of the array at `span`.
///
/// Each call scans from the start of the array. Elements that are not
/// objects are stepped over; an object whose braces never close ends the
/// iteration.
pub fn iterate_objects(json: &str, span: Span) -> Objects<'_> {
    Objects {
        json,
        pos: span.start + 1,
        end: span.end,
    }
}

/// Iterator returned by [`iterate_objects`].
#[derive(Debug, Clone)]
pub struct Objects<'a> {
    json: &'a str,
    pos: usize,
    end: usize,
}

impl<'a> Iterator for Objects<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.json.as_bytes();

        loop {
            while self.pos < self.end
                && (bytes[self.pos].is_ascii_whitespace() || bytes[self.pos] == b',')
            {
                self.pos += 1;
            }

            if self.pos >= self.end || bytes[self.pos] == b']' {
                self.pos = self.end;
                return None;
            }

            if bytes[self.pos] == b'{' {
                let Some(close) = find_matching_brace(self.json, self.pos) else {
                    self.pos = self.end;
                    return None;
                };
                let object = &self.json[self.pos..=close];
                self.pos = close + 1;
                return Some(object);
            }

            self.pos = skip_scalar_element(bytes, self.pos, self.end);
        }
    }
}

/// Advance past a non-object array element up to the next top-level comma.
fn skip_scalar_element(bytes: &[u8], mut pos: usize, end: usize) -> usize {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    while pos < end {
        let byte = bytes[pos];
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
        } else {
            match byte {
                b'"' => in_string = true,
                b'[' | b'{' => depth += 1,
                b']' | b'}' => depth = depth.saturating_sub(1),
                b',' if depth == 0 => return pos,
                _ => {}
            }
        }
        pos += 1;
    }

    end
}

/// Raw string value following `key`.
///
/// Scans from the first `"` after the key to the next unescaped `"`. Escape
/// sequences are returned verbatim: `va\"lue` stays `va\"lue`.
pub fn extract_string<'a>(json: &'a str, key: &str) -> Option<&'a str> {
    let after_key = value_start(json, key)?;
    let open = after_key + json[after_key..].find('"')?;
    let bytes = json.as_bytes();

    let mut escaped = false;
    for (offset, &byte) in bytes[open + 1..].iter().enumerate() {
        if escaped {
            escaped = false;
        } else if byte == b'\\' {
            escaped = true;
        } else if byte == b'"' {
            return Some(&json[open + 1..open + 1 + offset]);
        }
    }

    None
}

/// Text after `key` with leading whitespace removed.
fn scalar_text<'a>(json: &'a str, key: &str) -> Option<&'a str> {
    let after_key = value_start(json, key)?;
    Some(json[after_key..].trim_start())
}

fn number_text<'a>(json: &'a str, key: &str) -> Option<&'a str> {
    let text = scalar_text(json, key)?;
    let len = text
        .bytes()
        .take_while(|b| b.is_ascii_digit() || *b == b'-')
        .count();
    (len > 0).then(|| &text[..len])
}

/// Integer value following `key`, as a 64-bit number.
pub fn extract_long(json: &str, key: &str) -> Option<i64> {
    number_text(json, key)?.parse().ok()
}

/// Integer value following `key`, as a 32-bit number.
pub fn extract_int(json: &str, key: &str) -> Option<i32> {
    number_text(json, key)?.parse().ok()
}

/// Literal `true`/`false` following `key`.
pub fn extract_boolean(json: &str, key: &str) -> Option<bool> {
    let text = scalar_text(json, key)?;
    if text.starts_with("true") {
        Some(true)
    } else if text.starts_with("false") {
        Some(false)
    } else {
        None
    }
}

/// Object following `key`, braces included.
pub fn extract_object<'a>(json: &'a str, key: &str) -> Option<&'a str> {
    let after_key = value_start(json, key)?;
    let open = after_key + json[after_key..].find('{')?;
    let close = find_matching_brace(json, open)?;
    Some(&json[open..=close])
}

/*!
 * Inline markup handling for subtitle cue text.
 *
 * Three concerns live here: stripping style/voice tags from cue payloads
 * while preserving bare `<b>`/`<i>`/`<u>` markers, reversible "boxing" of
 * those markers so a generic XML escape pass can't mangle them, and
 * removal of `<lang>` spans that don't match a requested language.
 *
 * The scanners work on character buffers with explicit index arithmetic.
 * Tags are never parsed into a tree; the feature set is three inline tags,
 * which does not justify a markup AST.
 */

use crate::language_utils;
use crate::xml_text::unescape_xml_text;

// Ordered literal/placeholder substitution pairs. The delimiters are
// private-use scalars, which pass through the XML escaper untouched.
const TAG_BOX_TABLE: [(&str, &str); 6] = [
    ("<b>", "\u{e000}b\u{e001}"),
    ("</b>", "\u{e000}/b\u{e001}"),
    ("<i>", "\u{e000}i\u{e001}"),
    ("</i>", "\u{e000}/i\u{e001}"),
    ("<u>", "\u{e000}u\u{e001}"),
    ("</u>", "\u{e000}/u\u{e001}"),
];

/// Substitute the bold/italic/underline markers with placeholders that
/// survive XML escaping. Reversed by [`tag_unbox`].
pub fn tag_box(text: &str) -> String {
    let mut result = text.to_string();
    for (literal, placeholder) in TAG_BOX_TABLE {
        result = result.replace(literal, placeholder);
    }
    result
}

/// Reverse of [`tag_box`].
pub fn tag_unbox(text: &str) -> String {
    let mut result = text.to_string();
    for (literal, placeholder) in TAG_BOX_TABLE {
        result = result.replace(placeholder, literal);
    }
    result
}

/// Delete the bold/italic/underline markers outright. SubRip output
/// carries no styling, so the markers [`strip_tags`] preserves are
/// removed on that path.
pub fn strip_style_markers(text: &str) -> String {
    let mut result = text.to_string();
    for (literal, _) in TAG_BOX_TABLE {
        result = result.replace(literal, "");
    }
    result
}

fn self_close_at(text: &[char], idx: usize) -> bool {
    idx + 1 < text.len() && text[idx] == '/' && text[idx + 1] == '>'
}

/// Strip inline tags from cue text, then unescape XML entities.
///
/// Generic tags (open or close) are deleted whole. Bare or self-closed
/// `<b>`/`<i>`/`<u>` markers are preserved; a class or attribute payload
/// on them (`<b class="x">`, `<i.yellow>`, whitespace tolerated) is
/// deleted, collapsing the tag to its bare form. A `<` with no matching
/// `>` before the end of the text aborts the scan and returns the text
/// as-is up to that point.
pub fn strip_tags(input: &str) -> String {
    let mut text: Vec<char> = input.chars().collect();
    if text.len() < 3 {
        // too short to contain a tag
        return input.to_string();
    }

    // position of a pending unmatched '<', once one is seen
    let mut idx: Option<usize> = None;
    let mut i = 0usize;

    while i < text.len() {
        if let Some(open) = idx {
            if text[i] == '>' {
                text.drain(open..=i);
                idx = None;
                i = open;
                continue;
            }
            i += 1;
            continue;
        }

        if text[i] != '<' {
            i += 1;
            continue;
        }

        if i + 2 >= text.len() {
            // truncated tag, bad data; keep what we have
            return text.into_iter().collect();
        }

        let close = text[i + 1] == '/';
        let mut j = i;
        if close {
            j += 1;
        }
        let mut skip = false;

        match text[j + 1] {
            // bypass for bold, italic and underline
            'b' | 'i' | 'u' => {
                j += 2;
                if j >= text.len() {
                    return text.into_iter().collect();
                }

                // check for "<b   >" or "</b  >"
                let whitespace = matches!(text[j], '\r' | '\n' | '\t' | ' ');

                if text[j] == '>' || self_close_at(&text, j) {
                    skip = true;
                } else if whitespace || text[j] == '.' {
                    // strip class or attributes
                    let class_start = j;
                    j += 1;
                    while j < text.len() {
                        if text[j] == '>' || self_close_at(&text, j) {
                            text.drain(class_start..j);
                            j = class_start;
                            skip = true;
                            break;
                        }
                        j += 1;
                    }
                }
                // a longer name merely starting with b/i/u falls through
                // and is treated like any other tag from this position
            }
            _ => {
                if close {
                    j -= 1;
                }
            }
        }

        if skip {
            i = j + 1;
            continue;
        }
        idx = Some(j);
        i = j + 1;
    }

    let stripped: String = text.into_iter().collect();
    unescape_xml_text(&stripped)
}

struct SpanTag {
    start: usize,
    end: usize,
    self_close: bool,
}

// Locate the next open (or close) tag of the given name, scanning from
// `start`. Returns None on truncated or whitespace-broken tag data.
fn find_xml_tag(buffer: &[char], name: &str, find_open: bool, mut start: usize) -> Option<SpanTag> {
    let name: Vec<char> = name.chars().collect();

    while start < buffer.len() {
        if buffer[start] != '<' {
            start += 1;
            continue;
        }

        if start + 2 >= buffer.len() {
            return None; // truncated tag
        }

        let close = buffer[start + 1] == '/';
        if !find_open && close {
            start += 1;
        }
        if find_open == close {
            start += 1;
            continue; // wrong kind of tag, keep scanning
        }

        start += 1;
        if start >= buffer.len() {
            return None;
        }
        if matches!(buffer[start], '\r' | '\n' | '\t' | ' ') {
            return None; // illegal spaces on tag
        }

        let mut idx = start;
        let mut escaped = false;
        while idx < buffer.len() {
            if buffer[idx] == '>' {
                let name_end = start + name.len();
                if name_end > idx || buffer[start..name_end] != name[..] {
                    // some other tag; resume scanning past it
                    start = idx + 2;
                    escaped = true;
                    break;
                }

                return Some(SpanTag {
                    start: start - if find_open { 1 } else { 2 },
                    end: idx + 1,
                    self_close: find_open && buffer[idx - 1] == '/',
                });
            }
            idx += 1;
        }

        if !escaped {
            return None; // '>' never reached
        }
    }

    None
}

/// Delete `<lang>` spans from cue text.
///
/// Tag markers are always removed. When a span's language value does not
/// match `language_code` the span's whole content is deleted with it. A
/// close tag that can't be found truncates the text from the open tag on,
/// treating the document as cut short there. No-op on an empty filter.
pub fn strip_language_spans(text: &str, language_code: &str) -> String {
    if language_code.is_empty() {
        return text.to_string();
    }

    let mut buffer: Vec<char> = text.chars().collect();
    let mut i = 0usize;

    while let Some(tag) = find_xml_tag(&buffer, "lang", true, i) {
        // the language value trails the tag name: "<lang en-US>"
        let attr_end = tag.end - if tag.self_close { 2 } else { 1 };
        let value: String = buffer[tag.start + 5..attr_end].iter().collect();
        let value = value.trim();
        let foreign =
            !value.is_empty() && !language_utils::span_language_matches(value, language_code);

        let span_start = tag.start;
        buffer.drain(tag.start..tag.end);

        if tag.self_close && foreign {
            // rest of the text belongs to the unwanted language
            buffer.truncate(span_start);
            continue;
        }

        match find_xml_tag(&buffer, "lang", false, span_start) {
            None => {
                // document truncated mid-span
                buffer.truncate(span_start);
                return buffer.into_iter().collect();
            }
            Some(close_tag) => {
                let delete_from = if foreign { span_start } else { close_tag.start };
                buffer.drain(delete_from..close_tag.end);
            }
        }

        i = span_start;
    }

    buffer.into_iter().collect()
}

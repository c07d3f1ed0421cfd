/*!
 * XML character escaping and unescaping for subtitle cue text.
 *
 * Both directions are deliberately lenient: subtitle sources in the wild
 * are frequently non-conformant, so malformed entity text degrades (drop
 * or pass-through) instead of erroring. Neither function can fail.
 */

/// Escape text content for embedding in an XML document.
///
/// `&`, `<` and `>` are always escaped; quotes only in attribute mode
/// (subtitle cue text always uses text mode). NUL and the U+FFFE/U+FFFF
/// non-characters are dropped. C0 controls other than tab/CR/LF are
/// dropped under XML 1.0 and emitted as numeric character references under
/// XML 1.1; the C1 range is always emitted as references. Supplementary
/// plane characters pass through whole, since `char` iteration cannot
/// split a surrogate pair.
pub fn escape_xml_text(input: &str, for_xml10: bool, for_attributes: bool, hex_refs: bool) -> String {
    let mut buffer = String::with_capacity(input.len() + input.len() / 10);

    for chr in input.chars() {
        match chr {
            '"' if for_attributes => buffer.push_str("&quot;"),
            '\'' if for_attributes => buffer.push_str("&apos;"),
            '&' => buffer.push_str("&amp;"),
            '<' => buffer.push_str("&lt;"),
            '>' => buffer.push_str("&gt;"),
            '\u{0b}' | '\u{0c}' => {
                if !for_xml10 {
                    push_char_ref(&mut buffer, chr as u32, hex_refs);
                }
            }
            _ => match chr as u32 {
                0 | 0xfffe | 0xffff => {}
                code @ (1..=8 | 14..=31) => {
                    if !for_xml10 {
                        push_char_ref(&mut buffer, code, hex_refs);
                    }
                }
                code @ (127..=132 | 134..=159) => {
                    push_char_ref(&mut buffer, code, hex_refs);
                }
                _ => buffer.push(chr),
            },
        }
    }

    buffer
}

fn push_char_ref(buffer: &mut String, code: u32, hex: bool) {
    if hex {
        buffer.push_str(&format!("&#x{:x};", code));
    } else {
        buffer.push_str(&format!("&#{};", code));
    }
}

/// Unescape XML character and entity references in subtitle text.
///
/// Recognizes the named entities `quot`, `amp`, `lt`, `gt`, `apos` and
/// `nbsp` (case-insensitively) plus decimal `&#n;` and hexadecimal
/// `&#xn;` references. Any other name between `&` and `;` is treated as
/// not being an entity at all and the literal text, ampersand included,
/// is emitted unchanged. A numeric reference that fails to parse is
/// silently dropped.
pub fn unescape_xml_text(input: &str) -> String {
    let mut buffer = String::with_capacity(input.len());
    // byte offset just past a pending '&', if any
    let mut escape: Option<usize> = None;

    for (i, chr) in input.char_indices() {
        match escape {
            None => {
                if chr == '&' {
                    escape = Some(i + 1);
                } else {
                    buffer.push(chr);
                }
            }
            Some(start) => {
                if chr != ';' {
                    continue;
                }
                let name = input[start..i].to_lowercase();
                match name.as_str() {
                    "quot" => buffer.push('"'),
                    "amp" => buffer.push('&'),
                    "lt" => buffer.push('<'),
                    "gt" => buffer.push('>'),
                    "apos" => buffer.push('\''),
                    "nbsp" => buffer.push('\u{a0}'),
                    _ => {
                        if let Some(reference) = name.strip_prefix('#') {
                            // unparseable references are dropped, not kept
                            if let Some(decoded) = decode_char_ref(reference) {
                                buffer.push(decoded);
                            }
                        } else {
                            // not an entity: keep the literal text
                            buffer.push('&');
                            buffer.push_str(&input[start..i]);
                            buffer.push(';');
                        }
                    }
                }
                escape = None;
            }
        }
    }

    // trailing '&' that never found its ';' stays literal
    if let Some(start) = escape {
        buffer.push('&');
        buffer.push_str(&input[start..]);
    }

    buffer
}

fn decode_char_ref(reference: &str) -> Option<char> {
    let code = if let Some(hex) = reference.strip_prefix('x') {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        reference.parse::<u32>().ok()?
    };

    char::from_u32(code)
}

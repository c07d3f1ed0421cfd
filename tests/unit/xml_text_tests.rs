/*!
 * Tests for XML text escaping and unescaping
 */

use yascon::xml_text::{escape_xml_text, unescape_xml_text};

/// Test the three always-escaped characters in text mode
#[test]
fn test_escape_withMarkupCharacters_shouldEscapeAlways() {
    assert_eq!(escape_xml_text("a & b", true, false, false), "a &amp; b");
    assert_eq!(escape_xml_text("5 < 6 > 4", true, false, false), "5 &lt; 6 &gt; 4");
}

/// Quotes are only escaped in attribute mode
#[test]
fn test_escape_withQuotes_shouldDependOnAttributeMode() {
    assert_eq!(escape_xml_text(r#"say "hi'"#, true, false, false), r#"say "hi'"#);
    assert_eq!(
        escape_xml_text(r#"say "hi'"#, true, true, false),
        "say &quot;hi&apos;"
    );
}

/// NUL and the two non-characters are dropped in both modes
#[test]
fn test_escape_withForbiddenCodepoints_shouldDrop() {
    assert_eq!(escape_xml_text("a\u{0}b", true, false, false), "ab");
    assert_eq!(escape_xml_text("a\u{0}b", false, false, false), "ab");
    assert_eq!(escape_xml_text("a\u{fffe}b\u{ffff}c", true, false, false), "abc");
}

/// C0 controls are dropped under XML 1.0 and referenced under XML 1.1
#[test]
fn test_escape_withC0Controls_shouldFollowSchemaMode() {
    assert_eq!(escape_xml_text("a\u{7}b", true, false, false), "ab");
    assert_eq!(escape_xml_text("a\u{7}b", false, false, false), "a&#7;b");
    assert_eq!(escape_xml_text("a\u{b}b", true, false, false), "ab");
    assert_eq!(escape_xml_text("a\u{b}b", false, false, false), "a&#11;b");
}

/// Tab, CR and LF are ordinary whitespace and always pass through
#[test]
fn test_escape_withCommonWhitespace_shouldPassThrough() {
    assert_eq!(escape_xml_text("a\tb\r\nc", true, false, false), "a\tb\r\nc");
}

/// The C1 range is referenced in both modes; U+0085 (NEL) is exempt
#[test]
fn test_escape_withC1Controls_shouldAlwaysReference() {
    assert_eq!(escape_xml_text("a\u{9c}b", true, false, false), "a&#156;b");
    assert_eq!(escape_xml_text("a\u{9c}b", false, false, false), "a&#156;b");
    assert_eq!(escape_xml_text("a\u{85}b", true, false, false), "a\u{85}b");
}

/// Hex reference mode
#[test]
fn test_escape_withHexMode_shouldEmitHexReferences() {
    assert_eq!(escape_xml_text("a\u{9c}b", true, false, true), "a&#x9c;b");
}

/// Supplementary-plane characters pass through whole
#[test]
fn test_escape_withSupplementaryPlane_shouldPassThroughWhole() {
    assert_eq!(escape_xml_text("a😀b", true, false, false), "a😀b");
    assert_eq!(escape_xml_text("𝄞", false, false, false), "𝄞");
}

/// Escape then unescape is the identity for ordinary markup text
#[test]
fn test_escape_unescape_roundtrip_withPrintableAscii_shouldBeIdentity() {
    let input = "Tom & Jerry <3, a > b, plain text";
    let escaped = escape_xml_text(input, true, false, false);
    assert_eq!(unescape_xml_text(&escaped), input);
}

/// Named entities, case-insensitively
#[test]
fn test_unescape_withNamedEntities_shouldDecode() {
    assert_eq!(unescape_xml_text("&amp;&lt;&gt;&quot;&apos;"), "&<>\"'");
    assert_eq!(unescape_xml_text("&AMP;"), "&");
    assert_eq!(unescape_xml_text("a&nbsp;b"), "a\u{a0}b");
}

/// Decimal and hexadecimal numeric references
#[test]
fn test_unescape_withNumericReferences_shouldDecode() {
    assert_eq!(unescape_xml_text("&#65;"), "A");
    assert_eq!(unescape_xml_text("&#x41;"), "A");
    assert_eq!(unescape_xml_text("&#X41;"), "A"); // names are lowercased first
    assert_eq!(unescape_xml_text("&#128512;"), "😀");
}

/// Unknown names are not entities; the literal text stays
#[test]
fn test_unescape_withUnknownEntity_shouldKeepLiteralText() {
    assert_eq!(unescape_xml_text("a &foo; b"), "a &foo; b");
    assert_eq!(unescape_xml_text("fish &chips; tonight"), "fish &chips; tonight");
}

/// Unparseable numeric references are dropped silently
#[test]
fn test_unescape_withBadNumericReference_shouldDropSilently() {
    assert_eq!(unescape_xml_text("a&#zz;b"), "ab");
    assert_eq!(unescape_xml_text("a&#;b"), "ab");
    // a surrogate code point is not a valid scalar value
    assert_eq!(unescape_xml_text("a&#xd800;b"), "ab");
}

/// A trailing ampersand with no terminator stays literal
#[test]
fn test_unescape_withUnterminatedAmpersand_shouldKeepTail() {
    assert_eq!(unescape_xml_text("at&t"), "at&t");
    assert_eq!(unescape_xml_text("a &"), "a &");
}

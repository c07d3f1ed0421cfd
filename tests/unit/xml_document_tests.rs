/*!
 * Tests for the path-addressed XML document reader
 */

use yascon::errors::ConversionError;
use yascon::xml_document::XmlDocument;

fn doc(xml: &str) -> XmlDocument {
    XmlDocument::from_bytes(xml.as_bytes().to_vec())
}

/// A root path query lands on the root element and its attributes
#[test]
fn test_select_single_node_withRootPath_shouldExposeAttributes() {
    let document = doc(r#"<root version="3"><child/></root>"#);

    let mut selection = document.select_single_node(&["root"]).unwrap().unwrap();
    let node = selection.node();
    assert_eq!(node.attribute("version"), Some("3"));
    assert_eq!(node.attribute("missing"), None);
}

/// A nested path walks through intermediate elements
#[test]
fn test_select_single_node_withNestedPath_shouldFindElement() {
    let document = doc("<a><skip><deep/></skip><b><c>text</c></b></a>");

    let mut selection = document.select_single_node(&["a", "b", "c"]).unwrap().unwrap();
    let node = selection.node();
    assert_eq!(node.inner_text().unwrap(), Some("text".to_string()));
}

/// Paths that match nothing return None, not an error
#[test]
fn test_select_single_node_withMissingPath_shouldReturnNone() {
    let document = doc("<a><b/></a>");

    assert!(document.select_single_node(&["a", "nope"]).unwrap().is_none());
    assert!(document.select_single_node(&["wrong"]).unwrap().is_none());
    assert!(document.select_single_node(&[]).unwrap().is_none());
}

/// A node cursor yields every same-name sibling at the recorded depth
#[test]
fn test_select_nodes_withSiblings_shouldIterateAll() {
    let document = doc(
        r#"<list><item v="1"/><other/><item v="2"><sub><item v="nested"/></sub></item><item v="3"/></list>"#,
    );

    let mut items = document.select_nodes(&["list", "item"]).unwrap().unwrap();
    let mut seen = Vec::new();
    while let Some(node) = items.next_node().unwrap() {
        seen.push(node.attribute("v").unwrap().to_string());
    }

    // the nested item sits deeper and is not a sibling
    assert_eq!(seen, vec!["1", "2", "3"]);
}

/// Inner text flattens descendant text nodes
#[test]
fn test_inner_text_withNestedElements_shouldFlatten() {
    let document = doc("<p>Hello <span>wor</span>ld</p>");

    let mut selection = document.select_single_node(&["p"]).unwrap().unwrap();
    assert_eq!(
        selection.node().inner_text().unwrap(),
        Some("Hello world".to_string())
    );
}

/// Immediate text stops at the first text node of the element itself
#[test]
fn test_text_withLeadingText_shouldReturnImmediateText() {
    let document = doc("<p>Hello <span>wor</span>ld</p>");

    let mut selection = document.select_single_node(&["p"]).unwrap().unwrap();
    assert_eq!(selection.node().text().unwrap(), Some("Hello ".to_string()));
}

/// A childless element has no text at all
#[test]
fn test_inner_text_withSelfClosedElement_shouldReturnNone() {
    let document = doc(r#"<list><item v="1"/></list>"#);

    let mut selection = document.select_single_node(&["list", "item"]).unwrap().unwrap();
    assert_eq!(selection.node().inner_text().unwrap(), None);
}

/// Entity references in text decode leniently
#[test]
fn test_inner_text_withEntities_shouldDecodeLeniently() {
    let document = doc("<p>Tom &amp; Jerry &unknown; here</p>");

    let mut selection = document.select_single_node(&["p"]).unwrap().unwrap();
    assert_eq!(
        selection.node().inner_text().unwrap(),
        Some("Tom & Jerry &unknown; here".to_string())
    );
}

/// The default namespace resolves on the root element
#[test]
fn test_namespace_withDefaultNamespace_shouldResolve() {
    let document = doc(r#"<tt xmlns="http://www.w3.org/ns/ttml"><body/></tt>"#);

    let mut selection = document.select_single_node(&["tt"]).unwrap().unwrap();
    assert_eq!(selection.node().namespace(), Some("http://www.w3.org/ns/ttml"));
}

/// Every top-level query replays the document from the start
#[test]
fn test_queries_withRepeatedUse_shouldRestartEachTime() {
    let document = doc(r#"<root a="x"><item>1</item><item>2</item></root>"#);

    // exhaust a cursor first
    let mut items = document.select_nodes(&["root", "item"]).unwrap().unwrap();
    let mut count = 0;
    while items.next_node().unwrap().is_some() {
        count += 1;
    }
    assert_eq!(count, 2);

    // an unrelated follow-up query still sees the whole document
    let mut selection = document.select_single_node(&["root"]).unwrap().unwrap();
    assert_eq!(selection.node().attribute("a"), Some("x"));

    let mut items_again = document.select_nodes(&["root", "item"]).unwrap().unwrap();
    assert_eq!(
        items_again.next_node().unwrap().unwrap().inner_text().unwrap(),
        Some("1".to_string())
    );
}

/// A document that ends inside an open element is malformed
#[test]
fn test_inner_text_withTruncatedDocument_shouldFail() {
    let document = doc("<root><p>cut off");

    let mut selection = document.select_single_node(&["root", "p"]).unwrap().unwrap();
    assert!(matches!(
        selection.node().inner_text(),
        Err(ConversionError::MalformedDocument(_))
    ));
}

//! Comprehensive tests for blaster-html
//!
//! Parsing edge cases and serialization round trips.

use blaster_html::{HtmlParser, inner_html, outer_html, parse, parse_fragment};

#[test]
fn test_parse_minimal_html() {
    let doc = parse("").unwrap();
    assert!(doc.body().is_some(), "even empty HTML gets a body");
}

#[test]
fn test_parse_doctype_and_title() {
    let doc = parse("<!DOCTYPE html><title> Hello </title><p>x</p>").unwrap();
    assert_eq!(doc.title(), "Hello");
    let first = doc.tree().child_ids(doc.root())[0];
    assert_eq!(outer_html(doc.tree(), first), "<!DOCTYPE html>");
}

#[test]
fn test_parse_with_url() {
    let doc = HtmlParser::new().parse_with_url("<p>x</p>", "https://example.test/").unwrap();
    assert_eq!(doc.url(), "https://example.test/");
}

#[test]
fn test_attributes_preserved_in_order() {
    let doc = parse(r#"<input type="checkbox" name="opt" value="a" checked>"#).unwrap();
    let input = doc.get_elements_by_tag_name("input")[0];
    assert_eq!(
        outer_html(doc.tree(), input),
        r#"<input type="checkbox" name="opt" value="a" checked="">"#
    );
}

#[test]
fn test_entities_decoded_and_reescaped() {
    let doc = parse("<p title=\"a&amp;b\">1 &lt; 2 &nbsp;</p>").unwrap();
    let p = doc.get_elements_by_tag_name("p")[0];
    assert_eq!(doc.tree().attr(p, "title"), Some("a&b"));
    assert_eq!(doc.tree().text_content(p), "1 < 2 \u{a0}");
    assert_eq!(inner_html(doc.tree(), p), "1 &lt; 2 &nbsp;");
}

#[test]
fn test_implied_structure() {
    let doc = parse("<table><tr><td>1</td></tr></table>").unwrap();
    let tbody = doc.get_elements_by_tag_name("tbody");
    assert_eq!(tbody.len(), 1, "html5ever inserts tbody");
}

#[test]
fn test_template_contents_converted() {
    let doc = parse("<template><span>t</span></template>").unwrap();
    assert_eq!(doc.get_elements_by_tag_name("span").len(), 1);
}

#[test]
fn test_fragment_round_trip() {
    let mut doc = parse("<div id=\"host\"></div>").unwrap();
    let host = doc.get_element_by_id("host").unwrap();
    let markup = r#"<ul class="list"><li>one</li><li>two &amp; three</li></ul>tail"#;
    let nodes = parse_fragment(doc.tree_mut(), markup, "div").unwrap();
    for node in nodes {
        doc.append_child(host, node).unwrap();
    }
    assert_eq!(inner_html(doc.tree(), host), markup);
}

#[test]
fn test_fragment_of_plain_text() {
    let mut doc = parse("").unwrap();
    let nodes = parse_fragment(doc.tree_mut(), "just text", "p").unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(doc.tree().text_content(nodes[0]), "just text");
}

#[test]
fn test_empty_fragment() {
    let mut doc = parse("").unwrap();
    assert!(parse_fragment(doc.tree_mut(), "", "body").unwrap().is_empty());
}

#[test]
fn test_fragment_in_select_keeps_options() {
    let mut doc = parse("<select id=\"s\"></select>").unwrap();
    let select = doc.get_element_by_id("s").unwrap();
    let nodes = parse_fragment(doc.tree_mut(), "<option>a</option><option>b</option>", "select").unwrap();
    assert_eq!(nodes.len(), 2);
    for node in nodes {
        doc.append_child(select, node).unwrap();
    }
    assert_eq!(inner_html(doc.tree(), select), "<option>a</option><option>b</option>");
}

#[test]
fn test_fragment_table_rows_need_table_context() {
    let mut doc = parse("").unwrap();
    let rows = parse_fragment(doc.tree_mut(), "<tr><td>a</td></tr>", "tbody").unwrap();
    assert_eq!(outer_html(doc.tree(), rows[0]), "<tr><td>a</td></tr>");
    let flat = parse_fragment(doc.tree_mut(), "<tr><td>a</td></tr>", "div").unwrap();
    assert_eq!(doc.tree().text_content(flat[0]), "a");
}

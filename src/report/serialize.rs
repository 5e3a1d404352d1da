//! Serialize a [`Report`] with [`quick_xml`].

use std::{borrow::Cow, io};

use quick_xml::{
    escape::escape,
    events::{attributes::Attribute, BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    name::QName,
    Writer,
};

use super::{Attributes, Node, Report, Testcase, Testsuite};
use crate::Result;

const TESTSUITES_TAG: &str = "testsuites";
const TESTSUITE_TAG: &str = "testsuite";
const TESTCASE_TAG: &str = "testcase";

/// Indentation width of the pretty-printed output.
const INDENT: usize = 2;

pub(super) fn serialize_report(report: &Report, output: impl io::Write) -> Result<()> {
    let mut writer = Writer::new_with_indent(output, b' ', INDENT);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let root = start_tag(TESTSUITES_TAG, &report.attrs);
    if report.testsuites.is_empty() {
        writer.write_event(Event::Empty(root))?;
    } else {
        writer.write_event(Event::Start(root))?;
        for testsuite in &report.testsuites {
            serialize_testsuite(testsuite, &mut writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(TESTSUITES_TAG)))?;
    }

    // Add a trailing newline.
    writer.get_mut().write_all(b"\n")?;
    Ok(())
}

fn serialize_testsuite(
    testsuite: &Testsuite,
    writer: &mut Writer<impl io::Write>,
) -> Result<()> {
    let Testsuite { attrs, testcases } = testsuite;

    let tag = start_tag(TESTSUITE_TAG, attrs);
    if testcases.is_empty() {
        writer.write_event(Event::Empty(tag))?;
        return Ok(());
    }

    writer.write_event(Event::Start(tag))?;
    for testcase in testcases {
        serialize_testcase(testcase, writer)?;
    }
    writer.write_event(Event::End(BytesEnd::new(TESTSUITE_TAG)))?;
    Ok(())
}

fn serialize_testcase(
    testcase: &Testcase,
    writer: &mut Writer<impl io::Write>,
) -> Result<()> {
    let Testcase { attrs, children } = testcase;

    let tag = start_tag(TESTCASE_TAG, attrs);
    if children.is_empty() {
        writer.write_event(Event::Empty(tag))?;
        return Ok(());
    }

    writer.write_event(Event::Start(tag))?;
    for node in children {
        serialize_node(node, writer)?;
    }
    writer.write_event(Event::End(BytesEnd::new(TESTCASE_TAG)))?;
    Ok(())
}

fn serialize_node(node: &Node, writer: &mut Writer<impl io::Write>) -> Result<()> {
    let tag_name = node.kind.tag();
    let tag = start_tag(tag_name, &node.attrs);

    match node.body.as_deref() {
        None => writer.write_event(Event::Empty(tag))?,
        Some(body) => {
            writer.write_event(Event::Start(tag))?;
            writer.write_event(Event::Text(BytesText::from_escaped(escape_text(body))))?;
            writer.write_event(Event::End(BytesEnd::new(tag_name)))?;
        }
    }
    Ok(())
}

fn start_tag<'a>(name: &'a str, attrs: &'a Attributes) -> BytesStart<'a> {
    let mut tag = BytesStart::new(name);
    for (key, value) in attrs.iter() {
        tag.push_attribute(Attribute {
            key: QName(key.as_bytes()),
            value: Cow::Owned(escape_attr(value).into_bytes()),
        });
    }
    tag
}

/// Escapes `s` as the text of an element.
///
/// A parser turns a raw `\r` into `\n`, so it's written as a character
/// reference.
fn escape_text(s: &str) -> String {
    escape(xml_chars(s).as_ref()).replace('\r', "&#13;")
}

/// Escapes `s` as an attribute value.
///
/// A parser turns raw `\t`, `\n` and `\r` in attribute values into spaces,
/// so they're written as character references.
fn escape_attr(s: &str) -> String {
    escape(xml_chars(s).as_ref())
        .replace('\t', "&#9;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
}

/// Replaces characters not allowed in an XML 1.0 document with U+FFFD.
///
/// This only ensures that arbitrary captured output (e.g. ANSI sequences in a
/// panic message) can't make the document ill-formed.
fn xml_chars(s: &str) -> Cow<'_, str> {
    if s.chars().all(is_xml_char) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(
        s.chars()
            .map(|c| if is_xml_char(c) { c } else { char::REPLACEMENT_CHARACTER })
            .collect(),
    )
}

const fn is_xml_char(c: char) -> bool {
    matches!(
        c as u32,
        0x09 | 0x0A | 0x0D | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x1_0000..=0x10_FFFF
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NodeKind;

    fn some(v: &str) -> Option<String> {
        Some(v.to_owned())
    }

    fn report_with_case(node: Option<Node>) -> Report {
        let mut report = Report::new(some("default"), [("name", some("run"))]);
        let suite = report.open_testsuite([("name", some("sub/foo")), ("tests", some("1"))]);
        let case = report.open_testcase(
            suite,
            [("name", some("Scenario")), ("classname", some("sub/foo"))],
        );
        if let Some(node) = node {
            report.append_child(case, node);
        }
        report
    }

    #[test]
    fn serializes_pretty_printed_document() {
        let report = report_with_case(Some(
            Node::new(NodeKind::Failure, "[L 4] Then it works").with_body(Some("boom".to_owned())),
        ));

        assert_eq!(
            report.to_xml().unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <testsuites name=\"run\">\n\
             \x20 <testsuite package=\"default\" name=\"sub.foo\" tests=\"1\">\n\
             \x20   <testcase name=\"Scenario\" classname=\"default.sub.foo\">\n\
             \x20     <failure message=\"[L 4] Then it works\">boom</failure>\n\
             \x20   </testcase>\n\
             \x20 </testsuite>\n\
             </testsuites>\n",
        );
    }

    #[test]
    fn childless_elements_are_self_closed() {
        let xml = report_with_case(None).to_xml().unwrap();

        assert!(xml.contains("<testcase name=\"Scenario\" classname=\"default.sub.foo\"/>"));

        let xml = Report::new(some("s"), [("a", None::<String>)]).to_xml().unwrap();
        assert!(xml.ends_with("<testsuites/>\n"));
    }

    #[test]
    fn escapes_markup_in_attributes_and_bodies() {
        let report = report_with_case(Some(
            Node::new(NodeKind::Error, "a \"quoted\" <step> & more")
                .with_body(Some("]]> </failure> <![CDATA[ &amp;".to_owned())),
        ));
        let xml = report.to_xml().unwrap();

        assert!(xml.contains("message=\"a &quot;quoted&quot; &lt;step&gt; &amp; more\""));
        assert!(xml.contains("]]&gt; &lt;/failure&gt; &lt;![CDATA[ &amp;amp;</error>"));
    }

    #[test]
    fn keeps_control_whitespace_through_parsing() {
        use quick_xml::Reader;

        let report = report_with_case(Some(
            Node::new(NodeKind::Failure, "first\tcol\nsecond\r\nthird")
                .with_body(Some("trace\r\n  at step".to_owned())),
        ));
        let xml = report.to_xml().unwrap();

        assert!(xml.contains("message=\"first&#9;col&#10;second&#13;&#10;third\""));
        assert!(xml.contains(">trace&#13;\n  at step</failure>"));

        let mut reader = Reader::from_str(&xml);
        let (mut message, mut body) = (None, None);
        loop {
            match reader.read_event().unwrap() {
                Event::Start(tag) if tag.name().as_ref() == b"failure" => {
                    let attr = tag.try_get_attribute("message").unwrap().unwrap();
                    message = Some(attr.unescape_value().unwrap().into_owned());
                }
                Event::Text(text) if message.is_some() && body.is_none() => {
                    body = Some(text.unescape().unwrap().into_owned());
                }
                Event::Eof => break,
                _ => {}
            }
        }
        assert_eq!(message.as_deref(), Some("first\tcol\nsecond\r\nthird"));
        assert_eq!(body.as_deref(), Some("trace\r\n  at step"));
    }

    #[test]
    fn replaces_characters_forbidden_in_xml() {
        let report = report_with_case(Some(
            Node::new(NodeKind::Failure, "bell\u{7}").with_body(Some("\u{1b}[31mred\u{1b}[0m".to_owned())),
        ));
        let xml = report.to_xml().unwrap();

        assert!(xml.contains("message=\"bell\u{FFFD}\""));
        assert!(xml.contains("\u{FFFD}[31mred\u{FFFD}[0m"));
        assert!(!xml.contains('\u{1b}'));
    }
}

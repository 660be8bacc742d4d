// Page loading - markdown in, document tree out
//
// Uses pulldown-cmark to build the element tree the augmenter operates
// on. Fenced and indented code blocks become pre > code containers;
// inline markup becomes nested elements, so visible-text extraction has
// real markup to strip. Unsupported constructs degrade to their text
// content rather than being dropped.

use crate::dom::{Document, NodeId};
use anyhow::{Context, Result};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::path::Path;

/// Read a markdown file and build its document.
pub fn load(path: &Path) -> Result<Document> {
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read page {}", path.display()))?;
    Ok(from_markdown(&input))
}

/// Build a document from markdown source.
pub fn from_markdown(input: &str) -> Document {
    let mut doc = Document::new();
    let root = doc.root();
    // Stack of open container elements; text flows into the top.
    let mut stack: Vec<NodeId> = vec![root];

    let options = Options::ENABLE_STRIKETHROUGH;
    for event in Parser::new_ext(input, options) {
        match event {
            Event::Start(tag) => match tag {
                Tag::Paragraph => open(&mut doc, &mut stack, "p"),
                Tag::Heading { level, .. } => {
                    open(&mut doc, &mut stack, heading_tag(level));
                }
                Tag::CodeBlock(kind) => {
                    // pre wraps code; content events land in the code element.
                    let parent = top(&stack);
                    let pre = doc.create_element("pre");
                    doc.append_child(parent, pre);
                    let code = doc.create_element("code");
                    if let CodeBlockKind::Fenced(lang) = kind {
                        if !lang.is_empty() {
                            doc.add_class(code, &format!("language-{}", lang));
                        }
                    }
                    doc.append_child(pre, code);
                    stack.push(code);
                }
                Tag::Emphasis => open(&mut doc, &mut stack, "em"),
                Tag::Strong => open(&mut doc, &mut stack, "strong"),
                Tag::Strikethrough => open(&mut doc, &mut stack, "del"),
                Tag::BlockQuote => open(&mut doc, &mut stack, "blockquote"),
                Tag::List(Some(_)) => open(&mut doc, &mut stack, "ol"),
                Tag::List(None) => open(&mut doc, &mut stack, "ul"),
                Tag::Item => open(&mut doc, &mut stack, "li"),
                // Everything else (links, images, tables) contributes its
                // text content to the current container.
                _ => {}
            },
            Event::End(tag_end) => match tag_end {
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::CodeBlock
                | TagEnd::Emphasis
                | TagEnd::Strong
                | TagEnd::Strikethrough
                | TagEnd::BlockQuote
                | TagEnd::List(_)
                | TagEnd::Item => close(&mut stack),
                _ => {}
            },
            Event::Text(text) => {
                let parent = top(&stack);
                let node = doc.create_text(&text);
                doc.append_child(parent, node);
            }
            // Inline code span: `like this`
            Event::Code(text) => {
                let parent = top(&stack);
                let code = doc.create_element("code");
                let node = doc.create_text(&text);
                doc.append_child(code, node);
                doc.append_child(parent, code);
            }
            Event::SoftBreak => {
                let parent = top(&stack);
                let node = doc.create_text(" ");
                doc.append_child(parent, node);
            }
            Event::HardBreak => {
                let parent = top(&stack);
                let node = doc.create_text("\n");
                doc.append_child(parent, node);
            }
            Event::Rule => {
                let parent = top(&stack);
                let hr = doc.create_element("hr");
                doc.append_child(parent, hr);
            }
            _ => {}
        }
    }

    doc
}

fn open(doc: &mut Document, stack: &mut Vec<NodeId>, tag: &str) {
    let parent = top(stack);
    let el = doc.create_element(tag);
    doc.append_child(parent, el);
    stack.push(el);
}

fn close(stack: &mut Vec<NodeId>) {
    // The root stays; unbalanced End events from malformed input are ignored.
    if stack.len() > 1 {
        stack.pop();
    }
}

fn top(stack: &[NodeId]) -> NodeId {
    *stack.last().expect("element stack never empties below the root")
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

/// First top-level heading, for the viewer's title bar.
pub fn title(doc: &Document) -> Option<String> {
    doc.elements_by_tag("h1")
        .first()
        .map(|&h| doc.visible_text(h))
}

const SAMPLE_MD: &str = r#"# codecopy sample page

Every fenced code block below carries a copy control. Focus one with Tab,
then press Enter or Space - or click it - to copy the block's text.

```rust
fn main() {
    println!("hello from the sample page");
}
```

Some prose with `inline code` that stays un-augmented, since only
preformatted containers qualify.

```sh
cargo run -- README.md
```
"#;

/// The built-in sample page: the markdown above plus two hand-built
/// blocks the loader cannot produce - a bare preformatted container with
/// no code element (ineligible, never augmented) and a code element with
/// emphasized markup inside it (copies as plain text).
pub fn sample() -> Document {
    let mut doc = from_markdown(SAMPLE_MD);
    let root = doc.root();

    // <pre>plain text, no code element</pre>
    let bare = doc.create_element("pre");
    let bare_text = doc.create_text("A preformatted block without a code element.\nNo control appears here.");
    doc.append_child(bare, bare_text);
    doc.append_child(root, bare);

    // <pre><code>let answer = <em>value</em>;</code></pre>
    let pre = doc.create_element("pre");
    let code = doc.create_element("code");
    let head = doc.create_text("let answer = ");
    doc.append_child(code, head);
    let em = doc.create_element("em");
    let word = doc.create_text("value");
    doc.append_child(em, word);
    doc.append_child(code, em);
    let tail = doc.create_text(";");
    doc.append_child(code, tail);
    doc.append_child(pre, code);
    doc.append_child(root, pre);

    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_code_becomes_pre_wrapping_code() {
        let doc = from_markdown("```rust\nfn f() {}\n```\n");
        let pres = doc.elements_by_tag("pre");
        assert_eq!(pres.len(), 1);
        let code = doc.descendant_by_tag(pres[0], "code").unwrap();
        assert!(doc.has_class(code, "language-rust"));
        assert_eq!(doc.visible_text(code), "fn f() {}\n");
    }

    #[test]
    fn prose_does_not_produce_preformatted_containers() {
        let doc = from_markdown("Just a paragraph with `inline code`.\n");
        assert!(doc.elements_by_tag("pre").is_empty());
        // The inline span still exists as a code element, outside any pre.
        assert_eq!(doc.elements_by_tag("code").len(), 1);
    }

    #[test]
    fn emphasis_becomes_nested_markup() {
        let doc = from_markdown("some *emphasized* text\n");
        let ems = doc.elements_by_tag("em");
        assert_eq!(ems.len(), 1);
        assert_eq!(doc.visible_text(ems[0]), "emphasized");
        let ps = doc.elements_by_tag("p");
        assert_eq!(doc.visible_text(ps[0]), "some emphasized text");
    }

    #[test]
    fn title_is_the_first_heading() {
        let doc = from_markdown("# The Title\n\nbody\n");
        assert_eq!(title(&doc).as_deref(), Some("The Title"));
    }

    #[test]
    fn sample_page_has_eligible_and_ineligible_blocks() {
        let doc = sample();
        let pres = doc.elements_by_tag("pre");
        // Two fenced blocks + one bare pre + one hand-built code block.
        assert_eq!(pres.len(), 4);
        let eligible = pres
            .iter()
            .filter(|&&pre| doc.descendant_by_tag(pre, "code").is_some())
            .count();
        assert_eq!(eligible, 3);
    }
}

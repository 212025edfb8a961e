//! Event-stream transform over pulldown-cmark.
//!
//! Headings and code blocks are buffered until their end tag so the heading
//! text (for the slug) and the full code text (for highlighting) are known;
//! they are then emitted as raw HTML events. Everything else goes straight
//! through to `pulldown_cmark::html::push_html`.

use super::highlight::Highlighter;
use super::slug::Slugger;
use super::{CodeBlock, Heading, RenderedDocument, escape_html};
use crate::catalog::Catalog;
use crate::log;
use crate::nav::{LinkKind, classify};
use crate::resolve::{is_content_link, is_external_link};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// A heading whose end tag has not been seen yet.
struct PendingHeading<'a> {
    level: HeadingLevel,
    id: Option<CowStr<'a>>,
    classes: Vec<CowStr<'a>>,
    text: String,
    events: Vec<Event<'a>>,
}

/// A code block whose end tag has not been seen yet.
struct PendingCode {
    lang: Option<String>,
    text: String,
}

pub(super) fn render(
    source: &str,
    current_file: Option<&str>,
    catalog: &Catalog,
    highlighter: &Highlighter,
) -> RenderedDocument {
    let mut doc = RenderedDocument::default();
    let mut slugger = Slugger::new();
    let mut events: Vec<Event<'_>> = Vec::new();
    let mut heading: Option<PendingHeading<'_>> = None;
    let mut code: Option<PendingCode> = None;

    for event in Parser::new_ext(source, options()) {
        if let Some(mut block) = code.take() {
            match event {
                Event::Text(text) => {
                    block.text.push_str(&text);
                    code = Some(block);
                }
                Event::End(TagEnd::CodeBlock) => {
                    let html = code_block_html(doc.code_blocks.len(), &block, highlighter);
                    doc.code_blocks.push(CodeBlock {
                        lang: block.lang,
                        text: block.text,
                    });
                    push(&mut heading, &mut events, Event::Html(html.into()));
                }
                _ => code = Some(block),
            }
            continue;
        }

        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|l| l.trim_matches(|c: char| c == '{' || c == '}').to_owned())
                        .filter(|l| !l.is_empty()),
                    CodeBlockKind::Indented => None,
                };
                code = Some(PendingCode {
                    lang,
                    text: String::new(),
                });
            }
            Event::Start(Tag::Heading {
                level, id, classes, ..
            }) => {
                heading = Some(PendingHeading {
                    level,
                    id,
                    classes,
                    text: String::new(),
                    events: Vec::new(),
                });
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(pending) = heading.take() {
                    finish_heading(pending, &mut slugger, &mut doc, &mut events);
                }
            }
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => {
                let dest_url = rewrite_link(dest_url, current_file, catalog, &mut doc);
                push(
                    &mut heading,
                    &mut events,
                    Event::Start(Tag::Link {
                        link_type,
                        dest_url,
                        title,
                        id,
                    }),
                );
            }
            Event::Text(text) => {
                if let Some(pending) = heading.as_mut() {
                    pending.text.push_str(&text);
                }
                push(&mut heading, &mut events, Event::Text(text));
            }
            Event::Code(text) => {
                if let Some(pending) = heading.as_mut() {
                    pending.text.push_str(&text);
                }
                push(&mut heading, &mut events, Event::Code(text));
            }
            other => push(&mut heading, &mut events, other),
        }
    }

    html::push_html(&mut doc.html, events.into_iter());
    doc
}

/// Route an event into the open heading, or the document otherwise.
fn push<'a>(heading: &mut Option<PendingHeading<'a>>, events: &mut Vec<Event<'a>>, event: Event<'a>) {
    match heading {
        Some(pending) => pending.events.push(event),
        None => events.push(event),
    }
}

fn finish_heading<'a>(
    pending: PendingHeading<'a>,
    slugger: &mut Slugger,
    doc: &mut RenderedDocument,
    events: &mut Vec<Event<'a>>,
) {
    let id = match pending.id {
        Some(explicit) => slugger.claim(explicit.into_string()),
        None => slugger.slug(&pending.text),
    };
    let level = pending.level as u8;

    let class_attr = if pending.classes.is_empty() {
        String::new()
    } else {
        let classes: Vec<&str> = pending.classes.iter().map(AsRef::as_ref).collect();
        format!(r#" class="{}""#, escape_html(&classes.join(" ")))
    };

    events.push(Event::Html(
        format!(r#"<h{level} id="{}"{class_attr}>"#, escape_html(&id)).into(),
    ));
    events.extend(pending.events);
    events.push(Event::Html(format!("</h{level}>\n").into()));

    doc.headings.push(Heading {
        level,
        text: pending.text.trim().to_owned(),
        id,
    });
}

/// Rewrite internal `.md` links to page routes; note unresolved ones.
fn rewrite_link<'a>(
    dest_url: CowStr<'a>,
    current_file: Option<&str>,
    catalog: &Catalog,
    doc: &mut RenderedDocument,
) -> CowStr<'a> {
    match classify(&dest_url, catalog) {
        LinkKind::InternalContent { location } => location.to_string().into(),
        LinkKind::InPageAnchor { .. } => dest_url,
        LinkKind::External => {
            if is_content_link(&dest_url) && !is_external_link(&dest_url) {
                log!("render"; "unresolved link `{}` in {}", dest_url, current_file.unwrap_or("document"));
                doc.unresolved_links.push(dest_url.to_string());
            }
            dest_url
        }
    }
}

/// Highlighted block wrapped with its copy button.
fn code_block_html(index: usize, block: &PendingCode, highlighter: &Highlighter) -> String {
    let lang_class = block
        .lang
        .as_deref()
        .map(|l| format!(r#" class="language-{}""#, escape_html(l)))
        .unwrap_or_default();
    let code = highlighter.highlight(&block.text, block.lang.as_deref());

    format!(
        concat!(
            r#"<div class="code-block" data-block="{index}">"#,
            r#"<button type="button" class="copy-button" data-state="idle" aria-label="Copy code">Copy</button>"#,
            r#"<pre><code{lang_class}>{code}</code></pre>"#,
            "</div>\n"
        ),
        index = index,
        lang_class = lang_class,
        code = code,
    )
}

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use quick_xml::Reader;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use zip::ZipArchive;

pub(crate) fn read_html(path: &Path) -> Result<String> {
    let file = File::open(path)
        .with_context(|| format!("failed to open word file: {}", path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("failed to read word archive: {}", path.display()))?;

    let mut document_xml = archive
        .by_name("word/document.xml")
        .with_context(|| format!("no word/document.xml in {}", path.display()))?;
    let mut xml = String::new();
    document_xml
        .read_to_string(&mut xml)
        .with_context(|| format!("failed to read word/document.xml in {}", path.display()))?;

    document_xml_to_html(&xml)
}

pub(crate) fn document_xml_to_html(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    // Tabs and spaces are significant in these documents (xml:space).
    reader.trim_text(false);

    let mut writer = HtmlWriter::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => writer.handle_start(&e),
            Ok(Event::Empty(e)) => writer.handle_empty(&e),
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .context("failed to decode text in word/document.xml")?;
                writer.handle_text(&text);
            }
            Ok(Event::End(e)) => writer.handle_end(&e),
            Ok(Event::Eof) => break,
            Err(err) => bail!("failed to parse word/document.xml: {err}"),
            _ => {}
        }
        buf.clear();
    }

    Ok(writer.finish())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunTag {
    Strong,
    Em,
    Underline,
    Smallcaps,
    Sup,
    Sub,
}

impl RunTag {
    fn open(self) -> &'static str {
        match self {
            Self::Strong => "<strong>",
            Self::Em => "<em>",
            Self::Underline => "<u>",
            Self::Smallcaps => "<span class=\"smallcaps\">",
            Self::Sup => "<sup>",
            Self::Sub => "<sub>",
        }
    }

    fn close(self) -> &'static str {
        match self {
            Self::Strong => "</strong>",
            Self::Em => "</em>",
            Self::Underline => "</u>",
            Self::Smallcaps => "</span>",
            Self::Sup => "</sup>",
            Self::Sub => "</sub>",
        }
    }
}

#[derive(Debug, Default)]
struct RunProps {
    bold: bool,
    italic: bool,
    underline: bool,
    smallcaps: bool,
    vert_align: Option<RunTag>,
}

impl RunProps {
    fn tags(&self) -> Vec<RunTag> {
        let mut tags = Vec::new();
        if self.bold {
            tags.push(RunTag::Strong);
        }
        if self.italic {
            tags.push(RunTag::Em);
        }
        if self.underline {
            tags.push(RunTag::Underline);
        }
        if self.smallcaps {
            tags.push(RunTag::Smallcaps);
        }
        if let Some(vert) = self.vert_align {
            tags.push(vert);
        }
        tags
    }
}

#[derive(Debug)]
struct ParagraphState {
    tag: String,
    html: String,
}

#[derive(Debug, Default)]
struct HtmlWriter {
    out: String,
    paragraph: Option<ParagraphState>,
    // Set between the cell start and its first content; carries the colspan
    // once w:gridSpan has been seen.
    pending_cell: Option<Option<String>>,
    props: RunProps,
    run_text: String,
    open_tags: Vec<RunTag>,
    in_paragraph_props: bool,
    in_run_props: bool,
    in_text: bool,
}

impl HtmlWriter {
    fn handle_start(&mut self, e: &BytesStart) {
        match e.name().as_ref() {
            b"w:p" => {
                self.flush_pending_cell();
                self.paragraph = Some(ParagraphState {
                    tag: "p".to_string(),
                    html: String::new(),
                });
                self.open_tags.clear();
            }
            b"w:pPr" => self.in_paragraph_props = true,
            b"w:rPr" => self.in_run_props = true,
            b"w:r" => {
                self.props = RunProps::default();
                self.run_text.clear();
            }
            b"w:t" => self.in_text = true,
            b"w:tbl" => self.out.push_str("<table>"),
            b"w:tr" => self.out.push_str("<tr>"),
            b"w:tc" => self.pending_cell = Some(None),
            _ => self.handle_property(e),
        }
    }

    fn handle_empty(&mut self, e: &BytesStart) {
        match e.name().as_ref() {
            // w:tab also occurs as a tab-stop definition inside w:pPr.
            b"w:tab" if !self.in_paragraph_props && self.paragraph.is_some() => {
                self.run_text.push('\t');
            }
            b"w:br" if self.paragraph.is_some() => self.run_text.push_str("<br />"),
            _ => self.handle_property(e),
        }
    }

    fn handle_property(&mut self, e: &BytesStart) {
        match e.name().as_ref() {
            b"w:b" if self.in_run_props => self.props.bold = !val_is_off(e),
            b"w:i" if self.in_run_props => self.props.italic = !val_is_off(e),
            b"w:u" if self.in_run_props => {
                let val = get_attr(e, b"w:val").unwrap_or_default();
                self.props.underline = !val.is_empty() && val != "none" && val != "0";
            }
            b"w:smallCaps" if self.in_run_props => self.props.smallcaps = !val_is_off(e),
            b"w:vertAlign" if self.in_run_props => {
                self.props.vert_align = match get_attr(e, b"w:val").as_deref() {
                    Some("superscript") => Some(RunTag::Sup),
                    Some("subscript") => Some(RunTag::Sub),
                    _ => None,
                };
            }
            b"w:pStyle" if self.in_paragraph_props => {
                if let Some(style) = get_attr(e, b"w:val") {
                    if let Some(tag) = heading_tag(&style) {
                        if let Some(paragraph) = &mut self.paragraph {
                            paragraph.tag = tag;
                        }
                    }
                }
            }
            b"w:gridSpan" => {
                if let Some(cell) = &mut self.pending_cell {
                    *cell = get_attr(e, b"w:val");
                }
            }
            _ => {}
        }
    }

    fn handle_text(&mut self, text: &str) {
        if self.in_text && self.paragraph.is_some() {
            self.run_text.push_str(&escape_html(text));
        }
    }

    fn handle_end(&mut self, e: &BytesEnd) {
        match e.name().as_ref() {
            b"w:p" => {
                if let Some(mut paragraph) = self.paragraph.take() {
                    while let Some(tag) = self.open_tags.pop() {
                        paragraph.html.push_str(tag.close());
                    }
                    self.out.push('<');
                    self.out.push_str(&paragraph.tag);
                    self.out.push('>');
                    self.out.push_str(&paragraph.html);
                    self.out.push_str("</");
                    self.out.push_str(&paragraph.tag);
                    self.out.push('>');
                }
            }
            b"w:pPr" => self.in_paragraph_props = false,
            b"w:rPr" => self.in_run_props = false,
            b"w:t" => self.in_text = false,
            b"w:r" => self.flush_run(),
            b"w:tc" => {
                self.flush_pending_cell();
                self.out.push_str("</td>");
            }
            b"w:tr" => self.out.push_str("</tr>"),
            b"w:tbl" => self.out.push_str("</table>"),
            _ => {}
        }
    }

    // Keeps formatting open across runs so consecutive bold runs merge into a
    // single element, the way Word-to-HTML converters serialize them.
    fn flush_run(&mut self) {
        if self.run_text.is_empty() {
            return;
        }
        let desired = self.props.tags();
        let Some(paragraph) = &mut self.paragraph else {
            self.run_text.clear();
            return;
        };

        let common = self
            .open_tags
            .iter()
            .zip(desired.iter())
            .take_while(|(open, wanted)| open == wanted)
            .count();
        while self.open_tags.len() > common {
            if let Some(tag) = self.open_tags.pop() {
                paragraph.html.push_str(tag.close());
            }
        }
        for tag in &desired[common..] {
            paragraph.html.push_str(tag.open());
            self.open_tags.push(*tag);
        }

        paragraph.html.push_str(&self.run_text);
        self.run_text.clear();
    }

    fn flush_pending_cell(&mut self) {
        if let Some(colspan) = self.pending_cell.take() {
            match colspan {
                Some(span) => {
                    self.out.push_str("<td colspan=\"");
                    self.out.push_str(&span);
                    self.out.push_str("\">");
                }
                None => self.out.push_str("<td>"),
            }
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

fn heading_tag(style: &str) -> Option<String> {
    let level = style
        .strip_prefix("Heading")
        .or_else(|| style.strip_prefix("berschrift"))?;
    matches!(level, "1" | "2" | "3" | "4" | "5" | "6").then(|| format!("h{level}"))
}

fn val_is_off(e: &BytesStart) -> bool {
    matches!(get_attr(e, b"w:val").as_deref(), Some("0") | Some("false"))
}

fn get_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .find(|a| a.as_ref().ok().map(|attr| attr.key.as_ref()) == Some(key))
        .and_then(Result::ok)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

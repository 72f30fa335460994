use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, warn};

use super::classify::{
    Classifier, FOLIO_MARKER, MEASURE_MARKER, PAGE_MARKER, ParagraphKind, SYSTEM_MARKER,
};
use super::markup::{Paragraph, split_trimmed};
use crate::model::{ContentItem, ContentItemLinkTo, Folio, Row, System};

const SKETCH_PREFIX: &str = "M ";
const SKETCH_STAR_PREFIX: &str = "M* ";
const ROW_TABLE_SHEET_ID: &str = "SkRT";

/// Parses the content section of a source description: items with their
/// folios, system groups and tone-row labels.
pub(crate) struct ContentParser {
    row_pattern: Regex,
}

impl ContentParser {
    pub(crate) fn new() -> Result<Self> {
        // Row labels like "Gg (1)", "KUgis (38)" or "Gg" without an index.
        let row_pattern = Regex::new(r"([A-Z]{1,2})([a-z]{1,3})(\s\((\d{1,2}|[IVXL]{1,7})\))?")
            .context("failed to compile row label regex")?;
        Ok(Self { row_pattern })
    }

    pub(crate) fn items(&self, classifier: &Classifier, slice: &[Paragraph]) -> Vec<ContentItem> {
        let mut items = Vec::new();
        for (offset, paragraph) in slice.iter().enumerate() {
            if !matches!(classifier.classify(paragraph), ParagraphKind::Other) {
                continue;
            }
            let mut item = item_from_paragraph(paragraph);
            let siblings = collect_item_siblings(&slice[offset + 1..]);
            item.folios = self.folios(classifier, &siblings);
            items.push(item);
        }
        items
    }

    fn folios(&self, classifier: &Classifier, siblings: &[&Paragraph]) -> Vec<Folio> {
        let mut folios: Vec<Folio> = Vec::new();
        for paragraph in siblings {
            let mut parts = split_trimmed(&paragraph.text, " \t");
            if parts.len() != 2 {
                parts = split_trimmed(&paragraph.text, "\t");
            }
            match classifier.classify(paragraph) {
                ParagraphKind::FolioLine => {
                    folios.push(self.folio_from_parts(paragraph, &parts));
                }
                ParagraphKind::SystemLine => {
                    if let Some(folio) = folios.last_mut() {
                        folio.system_groups.push(self.system_group(&parts));
                    } else {
                        warn!(
                            index = paragraph.index,
                            text = %paragraph.text,
                            "system group before any folio line; skipping"
                        );
                    }
                }
                _ => {}
            }
        }
        folios
    }

    fn folio_from_parts(&self, paragraph: &Paragraph, parts: &[String]) -> Folio {
        let mut folio = Folio::default();

        if let Some(first) = parts.first().filter(|part| contains_marker(part)) {
            folio.folio = folio_label(first);
        } else if parts.len() > 2 {
            if let Some(second) = parts.get(1).filter(|part| contains_marker(part)) {
                folio.folio = folio_label(second);
            }
        }

        if paragraph.text.contains(PAGE_MARKER) {
            folio.is_page = Some(true);
        }

        if paragraph.text.contains(SYSTEM_MARKER) {
            folio.system_groups = vec![self.system_group(parts)];
        } else {
            folio.folio_description = parts.get(1).cloned().unwrap_or_else(|| {
                debug!(index = paragraph.index, "folio line without description part");
                String::new()
            });
        }
        folio
    }

    pub(crate) fn system_group(&self, parts: &[String]) -> Vec<System> {
        let mut group = Vec::new();
        for part in parts {
            if contains_marker(part) || !part.contains(SYSTEM_MARKER) {
                continue;
            }
            let pieces = split_trimmed(part, ":");
            let mut system = System {
                system: pieces
                    .first()
                    .map(|piece| piece.replace(SYSTEM_MARKER, "").trim().to_string())
                    .unwrap_or_default(),
                ..System::default()
            };
            // A bare system label carries neither measures nor rows.
            let Some(remainder) = pieces.get(1) else {
                continue;
            };
            if remainder.contains(MEASURE_MARKER) {
                system.measure = remainder
                    .trim_start_matches(['T', '.'])
                    .trim_end_matches(['.', ';'])
                    .trim()
                    .to_string();
            } else if let Some(row) = self.row_from_text(remainder) {
                system.row = Some(row);
            }
            group.push(system);
        }
        group
    }

    pub(crate) fn row_from_text(&self, text: &str) -> Option<Row> {
        self.row_pattern.captures(text).map(|captures| Row {
            row_type: capture_string(&captures, 1),
            row_base: capture_string(&captures, 2),
            row_number: capture_string(&captures, 4),
        })
    }
}

pub(crate) fn item_from_paragraph(paragraph: &Paragraph) -> ContentItem {
    let mut item = ContentItem::default();
    let content = paragraph.inner.as_str();
    let text = paragraph.text.as_str();

    let has_strong = content.contains("<strong");
    if has_strong && (text.starts_with(SKETCH_PREFIX) || text.starts_with(SKETCH_STAR_PREFIX)) {
        let label = split_trimmed(text, "(")
            .first()
            .cloned()
            .unwrap_or_default();
        item.item_link_to = Some(link_target(&label));
        item.item = label;
        match content.split_once('(') {
            Some((_, rest)) => {
                item.item_description = format!("({}", rest.trim().trim_end_matches(':'));
            }
            None => {
                debug!(text, "content item without description parenthesis");
            }
        }
    } else if has_strong {
        warn!(text, "unexpected bold run in content item paragraph");
    } else {
        item.item_description = content.trim().trim_end_matches(':').to_string();
    }
    item
}

pub(crate) fn link_target(label: &str) -> ContentItemLinkTo {
    let mut sheet_id = label
        .replace(' ', "_")
        .replace('.', "_")
        .replace('*', "star");
    let complex_id = sheet_id
        .split('_')
        .take(2)
        .collect::<String>()
        .to_lowercase();
    // Aggregated row-table sheets share one sheet id.
    if label.contains('/') {
        sheet_id = ROW_TABLE_SHEET_ID.to_string();
    }
    ContentItemLinkTo {
        complex_id,
        sheet_id,
    }
}

/// Collects the paragraphs belonging to one item: everything up to the next
/// paragraph with a bold run (excluded) or one ending with a period (included).
fn collect_item_siblings(following: &[Paragraph]) -> Vec<&Paragraph> {
    let mut siblings = Vec::new();
    for paragraph in following {
        if paragraph.html.contains("<strong") {
            break;
        }
        siblings.push(paragraph);
        if paragraph.text.trim_end().ends_with('.') {
            break;
        }
    }
    siblings
}

fn contains_marker(part: &str) -> bool {
    part.contains(FOLIO_MARKER) || part.contains(PAGE_MARKER)
}

fn folio_label(token: &str) -> String {
    let mut label = String::new();
    if token.contains(FOLIO_MARKER) {
        label = strip_marker(token, FOLIO_MARKER);
    }
    if token.contains(PAGE_MARKER) {
        label = strip_marker(token, PAGE_MARKER);
    }
    label
}

fn strip_marker(token: &str, marker: &str) -> String {
    token
        .trim_start_matches('\t')
        .replace(&format!("{marker}\u{a0}"), "")
        .replace(marker, "")
        .trim()
        .to_string()
}

fn capture_string(captures: &regex::Captures, group: usize) -> String {
    captures
        .get(group)
        .map(|group| group.as_str().to_string())
        .unwrap_or_default()
}

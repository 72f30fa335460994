use tracing::debug;

use super::markup::{Paragraph, split_trimmed};
use crate::model::WritingInstruments;

pub(crate) const WRITING_MATERIAL_LABEL: &str = "Beschreibstoff:";
pub(crate) const WRITING_INSTRUMENTS_LABEL: &str = "Schreibstoff:";
pub(crate) const TITLES_LABEL: &str = "Titel:";
pub(crate) const DATES_LABEL: &str = "Datierung:";
pub(crate) const PAGINATIONS_LABEL: &str = "Paginierung:";
pub(crate) const MEASURE_NUMBERS_LABEL: &str = "Taktzahlen:";
pub(crate) const INSTRUMENTATIONS_LABEL: &str = "Besetzung:";
pub(crate) const ANNOTATIONS_LABEL: &str = "Eintragungen:";
pub(crate) const CONTENT_LABEL: &str = "Inhalt:";
pub(crate) const COMMENT_LABELS: [&str; 2] =
    ["Textkritischer Kommentar:", "Textkritische Anmerkungen:"];

pub(crate) fn paragraph_index_by_label(paragraphs: &[Paragraph], label: &str) -> Option<usize> {
    if label.is_empty() {
        return None;
    }
    paragraphs
        .iter()
        .position(|paragraph| paragraph.text.contains(label))
}

/// Collects the content of a labeled field: the part of the labeled paragraph
/// after the label, plus following paragraphs while fragments keep ending with
/// a semicolon. A fragment ending with a period closes the field.
pub(crate) fn paragraph_content_by_label(paragraphs: &[Paragraph], label: &str) -> Vec<String> {
    let Some(index) = paragraph_index_by_label(paragraphs, label) else {
        debug!(label, "label not found in source partition");
        return Vec::new();
    };

    let parts = split_trimmed(&paragraphs[index].inner, label);
    let initial = parts.get(1).cloned().unwrap_or_default();

    let mut contents = vec![trim_field(&initial)];
    if initial.ends_with(';') {
        for paragraph in &paragraphs[index + 1..] {
            let fragment = paragraph.inner.as_str();
            if fragment.ends_with('.') {
                contents.push(trim_field(fragment));
                break;
            }
            if fragment.ends_with(';') {
                contents.push(trim_field(fragment));
            } else {
                break;
            }
        }
    }
    contents
}

pub(crate) fn extract_writing_instruments(content: &str) -> WritingInstruments {
    let parts = split_trimmed(content, ";");
    let main = parts
        .first()
        .map(|part| part.trim_end_matches('.').to_string())
        .unwrap_or_default();
    let secondary = parts
        .get(1)
        .map(|rest| {
            split_trimmed(rest, ",")
                .into_iter()
                .map(|entry| entry.trim_end_matches('.').to_string())
                .collect()
        })
        .unwrap_or_default();

    WritingInstruments { main, secondary }
}

fn trim_field(fragment: &str) -> String {
    fragment
        .trim()
        .trim_end_matches('.')
        .trim_end_matches(';')
        .to_string()
}

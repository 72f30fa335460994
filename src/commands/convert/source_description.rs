use anyhow::Result;
use tracing::{info, warn};

use super::classify::{Classifier, ParagraphKind, SiglumStart};
use super::content_items::ContentParser;
use super::label_fields::{
    ANNOTATIONS_LABEL, COMMENT_LABELS, CONTENT_LABEL, DATES_LABEL, INSTRUMENTATIONS_LABEL,
    MEASURE_NUMBERS_LABEL, PAGINATIONS_LABEL, TITLES_LABEL, WRITING_INSTRUMENTS_LABEL,
    WRITING_MATERIAL_LABEL, extract_writing_instruments, paragraph_content_by_label,
    paragraph_index_by_label,
};
use super::markup::Paragraph;
use crate::model::{ContentItem, PhysDesc, SourceDescription, SourceList};

pub(crate) struct SourceParser {
    classifier: Classifier,
    content: ContentParser,
}

impl SourceParser {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            classifier: Classifier::new()?,
            content: ContentParser::new()?,
        })
    }

    /// Partitions the paragraph list at siglum paragraphs and assembles one
    /// source description per partition. Duplicate ids are skipped, first
    /// occurrence wins.
    pub(crate) fn source_list(&self, paragraphs: &[Paragraph]) -> SourceList {
        let indices = self.siglum_indices(paragraphs);

        let mut sources: Vec<SourceDescription> = Vec::new();
        for (position, &start) in indices.iter().enumerate() {
            let end = indices
                .get(position + 1)
                .copied()
                .unwrap_or(paragraphs.len());
            if start >= end {
                continue;
            }

            let source = self.source_description(&paragraphs[start..end]);
            if sources.iter().any(|existing| existing.id == source.id) {
                warn!(id = %source.id, "duplicate source description skipped; check the source document");
                continue;
            }
            info!(id = %source.id, "appending source description");
            sources.push(source);
        }

        SourceList { sources }
    }

    pub(crate) fn siglum_indices(&self, paragraphs: &[Paragraph]) -> Vec<usize> {
        paragraphs
            .iter()
            .enumerate()
            .filter_map(|(index, paragraph)| {
                matches!(
                    self.classifier.classify(paragraph),
                    ParagraphKind::SiglumStart(_)
                )
                .then_some(index)
            })
            .collect()
    }

    pub(crate) fn source_description(&self, partition: &[Paragraph]) -> SourceDescription {
        let siglum = partition
            .first()
            .and_then(|paragraph| self.classifier.match_siglum(&paragraph.html))
            .unwrap_or_else(SiglumStart::default);

        let id = if siglum.siglum.is_empty() {
            String::new()
        } else {
            format!("source_{}{}", siglum.siglum, siglum.addendum)
        };

        let phys_desc = self.phys_desc(&id, partition);
        SourceDescription {
            id,
            siglum: siglum.siglum,
            siglum_addendum: siglum.addendum,
            missing: siglum.missing.then_some(true),
            source_type: inner_at(partition, 1),
            location: inner_at(partition, 2),
            phys_desc,
        }
    }

    fn phys_desc(&self, id: &str, partition: &[Paragraph]) -> PhysDesc {
        let instruments = paragraph_content_by_label(partition, WRITING_INSTRUMENTS_LABEL);

        PhysDesc {
            conditions: vec![inner_at(partition, 3)],
            writing_material_strings: paragraph_content_by_label(partition, WRITING_MATERIAL_LABEL),
            writing_instruments: extract_writing_instruments(
                instruments.first().map(String::as_str).unwrap_or_default(),
            ),
            titles: paragraph_content_by_label(partition, TITLES_LABEL),
            dates: paragraph_content_by_label(partition, DATES_LABEL),
            paginations: paragraph_content_by_label(partition, PAGINATIONS_LABEL),
            measure_numbers: paragraph_content_by_label(partition, MEASURE_NUMBERS_LABEL),
            instrumentations: paragraph_content_by_label(partition, INSTRUMENTATIONS_LABEL),
            annotations: paragraph_content_by_label(partition, ANNOTATIONS_LABEL),
            contents: self.contents(id, partition),
        }
    }

    fn contents(&self, id: &str, partition: &[Paragraph]) -> Vec<ContentItem> {
        let Some(content_index) = paragraph_index_by_label(partition, CONTENT_LABEL) else {
            warn!(id, "no content section found");
            return Vec::new();
        };

        let comments_index = COMMENT_LABELS
            .iter()
            .find_map(|label| paragraph_index_by_label(partition, label))
            .unwrap_or(partition.len());

        let start = content_index + 1;
        let end = comments_index.clamp(start, partition.len());
        self.content.items(&self.classifier, &partition[start..end])
    }
}

fn inner_at(partition: &[Paragraph], index: usize) -> String {
    partition
        .get(index)
        .map(|paragraph| paragraph.inner.clone())
        .unwrap_or_default()
}

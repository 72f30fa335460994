use anyhow::{Context, Result};
use regex::Regex;

use super::markup::Paragraph;

pub(crate) const FOLIO_MARKER: &str = "Bl.";
pub(crate) const PAGE_MARKER: &str = "S.";
pub(crate) const SYSTEM_MARKER: &str = "System";
pub(crate) const MEASURE_MARKER: &str = "T.";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ParagraphKind {
    SiglumStart(SiglumStart),
    FolioLine,
    SystemLine,
    Continuation,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SiglumStart {
    pub(crate) siglum: String,
    pub(crate) addendum: String,
    pub(crate) missing: bool,
}

/// Classifies paragraphs by their structural role. Siglum recognition works on
/// the serialized markup; everything else on the plain text.
pub(crate) struct Classifier {
    plain_siglum: Regex,
    siglum_with_addendum: Regex,
    bracketed_siglum: Regex,
    bracketed_siglum_with_addendum: Regex,
}

// A siglum addendum is a letter with an optional digit or digit range.
const ADDENDUM_PATTERN: &str = "([a-zA-Z][0-9]?(?:–[0-9])?)?";

impl Classifier {
    pub(crate) fn new() -> Result<Self> {
        let plain_siglum = Regex::new(r"^<p>\s*<strong>\s*([A-Z])\s*</strong>\s*</p>$")
            .context("failed to compile siglum regex")?;
        let siglum_with_addendum = Regex::new(&format!(
            r"^<p>\s*<strong>\s*([A-Z])<sup>{ADDENDUM_PATTERN}</sup>\s*</strong>\s*</p>$"
        ))
        .context("failed to compile siglum addendum regex")?;
        let bracketed_siglum = Regex::new(r"^<p>\s*<strong>\s*\[([A-Z])\]\s*</strong>\s*</p>$")
            .context("failed to compile bracketed siglum regex")?;
        let bracketed_siglum_with_addendum = Regex::new(&format!(
            r"^<p>\s*<strong>\s*\[([A-Z])<sup>{ADDENDUM_PATTERN}</sup>\]</strong>\s*</p>$"
        ))
        .context("failed to compile bracketed siglum addendum regex")?;

        Ok(Self {
            plain_siglum,
            siglum_with_addendum,
            bracketed_siglum,
            bracketed_siglum_with_addendum,
        })
    }

    pub(crate) fn classify(&self, paragraph: &Paragraph) -> ParagraphKind {
        if let Some(siglum) = self.match_siglum(&paragraph.html) {
            return ParagraphKind::SiglumStart(siglum);
        }
        if paragraph.text.contains(FOLIO_MARKER) || paragraph.text.contains(PAGE_MARKER) {
            return ParagraphKind::FolioLine;
        }
        if paragraph.text.contains(SYSTEM_MARKER) {
            return ParagraphKind::SystemLine;
        }
        if paragraph.text.starts_with('\t') {
            return ParagraphKind::Continuation;
        }
        ParagraphKind::Other
    }

    pub(crate) fn match_siglum(&self, markup: &str) -> Option<SiglumStart> {
        let patterns = [
            (&self.plain_siglum, false),
            (&self.siglum_with_addendum, false),
            (&self.bracketed_siglum, true),
            (&self.bracketed_siglum_with_addendum, true),
        ];
        for (pattern, missing) in patterns {
            if let Some(captures) = pattern.captures(markup) {
                return Some(SiglumStart {
                    siglum: captures
                        .get(1)
                        .map(|group| group.as_str().to_string())
                        .unwrap_or_default(),
                    addendum: captures
                        .get(2)
                        .map(|group| group.as_str().to_string())
                        .unwrap_or_default(),
                    missing,
                });
            }
        }
        None
    }
}

use anyhow::{Context, Result};
use regex::{Captures, Regex};
use tracing::{debug, info, warn};

use super::markup::{Table, TableRow, clean_cell};
use crate::model::{
    TextcriticalComment, TextcriticalCommentBlock, TextcriticalCommentary, Textcritics,
    TextcriticsList,
};

const CORRECTION_MARKER: &str = "Korrektur";
const SVG_GROUP_PLACEHOLDER: &str = "TODO";

const GLYPHS: [&str; 24] = [
    "a",
    "b",
    "bb",
    "#",
    "x",
    "f",
    "ff",
    "fff",
    "ffff",
    "mf",
    "mp",
    "p",
    "pp",
    "ppp",
    "pppp",
    "ped",
    "sf",
    "sfz",
    "sp",
    "Achtelnote",
    "Ganze Note",
    "Halbe Note",
    "Sechzehntelnote",
    "Viertelnote",
];
const ACCIDENTALS: [&str; 5] = ["a", "b", "bb", "#", "x"];

/// Converts the document's tables into textcritical comment blocks.
pub(crate) struct TextcriticsParser {
    strong_fragment: Regex,
    glyph: Regex,
}

impl TextcriticsParser {
    pub(crate) fn new() -> Result<Self> {
        let strong_fragment = Regex::new("<strong>(.*?)</strong>")
            .context("failed to compile strong fragment regex")?;
        // A glyph name directly followed by a hyphen is a measure range,
        // not a glyph.
        let glyph = Regex::new(&format!(r"\[({})\](-)?", GLYPHS.join("|")))
            .context("failed to compile glyph regex")?;
        Ok(Self {
            strong_fragment,
            glyph,
        })
    }

    pub(crate) fn textcritics_list(&self, tables: &[Table]) -> TextcriticsList {
        let mut list = TextcriticsList::default();
        for (number, table) in tables.iter().enumerate() {
            let number = number + 1;
            let Some((mut textcritics, is_correction)) = self.process_table(table, number) else {
                continue;
            };
            if is_correction {
                strip_correction_fields(&mut textcritics);
                info!(table = number, "appending corrections");
                list.corrections.push(textcritics);
            } else {
                info!(table = number, "appending textcritics");
                list.textcritics.push(textcritics);
            }
        }
        list
    }

    fn process_table(&self, table: &Table, number: usize) -> Option<(Textcritics, bool)> {
        let Some(header) = table.rows.first() else {
            warn!(table = number, "table without rows skipped");
            return None;
        };
        let is_correction = header
            .cells
            .last()
            .is_some_and(|cell| cell.text.contains(CORRECTION_MARKER));

        let mut blocks = vec![TextcriticalCommentBlock::default()];
        for row in table.rows.iter().skip(1) {
            let header_cell = row.cells.first().filter(|cell| cell.colspan.is_some());
            if let Some(cell) = header_cell {
                if blocks
                    .first()
                    .is_some_and(|block| {
                        block.block_header.is_empty() && block.block_comments.is_empty()
                    })
                {
                    blocks.remove(0);
                }
                blocks.push(TextcriticalCommentBlock {
                    block_header: clean_cell(&cell.html),
                    block_comments: Vec::new(),
                });
                continue;
            }
            if let Some(block) = blocks.last_mut() {
                block.block_comments.push(self.comment_from_row(row, number));
            }
        }

        let textcritics = Textcritics {
            commentary: TextcriticalCommentary {
                preamble: String::new(),
                comments: blocks,
            },
            link_boxes: Some(Vec::new()),
            ..Textcritics::default()
        };
        Some((textcritics, is_correction))
    }

    fn comment_from_row(&self, row: &TableRow, number: usize) -> TextcriticalComment {
        let cleaned = |index: usize| {
            row.cells
                .get(index)
                .map(|cell| clean_cell(&cell.html))
                .unwrap_or_else(|| {
                    debug!(table = number, cell = index, "comment row is missing a cell");
                    String::new()
                })
        };

        TextcriticalComment {
            svg_group_id: Some(SVG_GROUP_PLACEHOLDER.to_string()),
            measure: cleaned(0),
            system: cleaned(1),
            position: cleaned(2),
            comment: self.post_process_comment(&cleaned(3)),
        }
    }

    pub(crate) fn post_process_comment(&self, comment: &str) -> String {
        let escaped = escape_curly_brackets(comment);
        let linked = self.add_report_fragment_links(&escaped);
        self.replace_glyphs(&linked)
    }

    pub(crate) fn add_report_fragment_links(&self, comment: &str) -> String {
        self.strong_fragment
            .replace_all(
                comment,
                "<a (click)=\"ref.navigateToReportFragment({complexId: 'TODO', fragmentId: 'source_$1'})\"><strong>$1</strong></a>",
            )
            .to_string()
    }

    pub(crate) fn replace_glyphs(&self, comment: &str) -> String {
        self.glyph
            .replace_all(comment, |captures: &Captures| {
                if captures.get(2).is_some() {
                    return captures
                        .get(0)
                        .map(|whole| whole.as_str().to_string())
                        .unwrap_or_default();
                }
                let name = captures.get(1).map(|group| group.as_str()).unwrap_or_default();
                let class = if ACCIDENTALS.contains(&name) {
                    "glyph accid"
                } else {
                    "glyph"
                };
                format!("<span class='{class}'>{{{{ref.getGlyph('[{name}]')}}}}</span>")
            })
            .to_string()
    }
}

pub(crate) fn escape_curly_brackets(comment: &str) -> String {
    let mut escaped = String::with_capacity(comment.len());
    for ch in comment.chars() {
        match ch {
            '{' => escaped.push_str("{{ '{' }}"),
            '}' => escaped.push_str("{{ '}' }}"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn strip_correction_fields(textcritics: &mut Textcritics) {
    textcritics.link_boxes = None;
    for block in &mut textcritics.commentary.comments {
        for comment in &mut block.block_comments {
            comment.svg_group_id = None;
        }
    }
}

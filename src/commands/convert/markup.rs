use anyhow::{Result, anyhow};
use scraper::{Html, Selector};

#[derive(Debug, Clone)]
pub(crate) struct Paragraph {
    pub(crate) index: usize,
    pub(crate) html: String,
    pub(crate) inner: String,
    pub(crate) text: String,
}

#[derive(Debug, Clone)]
pub(crate) struct TableCell {
    pub(crate) html: String,
    pub(crate) text: String,
    pub(crate) colspan: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct TableRow {
    pub(crate) cells: Vec<TableCell>,
}

#[derive(Debug, Clone)]
pub(crate) struct Table {
    pub(crate) rows: Vec<TableRow>,
}

#[derive(Debug, Clone)]
pub(crate) struct MarkupDocument {
    pub(crate) paragraphs: Vec<Paragraph>,
    pub(crate) tables: Vec<Table>,
}

impl MarkupDocument {
    pub(crate) fn parse(html: &str) -> Result<Self> {
        let document = Html::parse_document(html);
        let paragraph_selector = selector("p")?;
        let table_selector = selector("table")?;
        let row_selector = selector("tr")?;
        let cell_selector = selector("td")?;

        // Flat scan in document order, table-cell paragraphs included.
        let paragraphs = document
            .select(&paragraph_selector)
            .enumerate()
            .map(|(index, element)| Paragraph {
                index,
                html: element.html(),
                inner: element.inner_html().trim().to_string(),
                text: element.text().collect(),
            })
            .collect();

        let tables = document
            .select(&table_selector)
            .map(|table| Table {
                rows: table
                    .select(&row_selector)
                    .map(|row| TableRow {
                        cells: row
                            .select(&cell_selector)
                            .map(|cell| TableCell {
                                html: cell.html(),
                                text: cell.text().collect(),
                                colspan: cell.value().attr("colspan").map(str::to_string),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Ok(Self { paragraphs, tables })
    }
}

fn selector(css: &'static str) -> Result<Selector> {
    Selector::parse(css).map_err(|err| anyhow!("invalid selector {css}: {err}"))
}

/// Removes one leading `<tag …>` and one trailing `</tag>` from a serialized
/// fragment and trims the remainder.
pub(crate) fn strip_tag(markup: &str, tag: &str) -> String {
    let mut stripped = markup.trim();

    let opening = format!("<{tag}");
    if let Some(start) = stripped.find(&opening) {
        if let Some(offset) = stripped[start..].find('>') {
            stripped = &stripped[start + offset + 1..];
        }
    }

    let closing = format!("</{tag}>");
    stripped = stripped.trim_end();
    if let Some(rest) = stripped.strip_suffix(closing.as_str()) {
        stripped = rest;
    }

    stripped.trim().to_string()
}

/// Unwraps a serialized table cell and joins its inner paragraphs with
/// ` <br /> `.
pub(crate) fn clean_cell(markup: &str) -> String {
    strip_tag(&strip_tag(markup, "td"), "p").replace("</p><p>", " <br /> ")
}

pub(crate) fn split_trimmed(text: &str, delimiter: &str) -> Vec<String> {
    text.split(delimiter)
        .map(|part| part.trim().to_string())
        .collect()
}

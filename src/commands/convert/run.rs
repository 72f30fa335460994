use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::ConvertArgs;
use crate::util::write_json_pretty;

use super::docx_extract;
use super::markup::MarkupDocument;
use super::source_description::SourceParser;
use super::textcritics::TextcriticsParser;

const SOURCE_DESCRIPTION_SUFFIX: &str = "_source-description.json";
const TEXTCRITICS_SUFFIX: &str = "_textcritics.json";

pub fn run(args: ConvertArgs) -> Result<()> {
    let docx_path = args.directory.join(format!("{}.docx", args.file_name));
    info!(path = %docx_path.display(), "converting word source descriptions");

    let html = docx_extract::read_html(&docx_path)?;
    let document = MarkupDocument::parse(&html)?;
    info!(
        paragraphs = document.paragraphs.len(),
        tables = document.tables.len(),
        "parsed document markup"
    );

    let source_parser = SourceParser::new()?;
    let source_list = source_parser.source_list(&document.paragraphs);
    info!(
        sources = source_list.sources.len(),
        "assembled source descriptions"
    );

    let textcritics_parser = TextcriticsParser::new()?;
    let textcritics = textcritics_parser.textcritics_list(&document.tables);

    let source_path = args
        .directory
        .join(format!("{}{SOURCE_DESCRIPTION_SUFFIX}", args.file_name));
    let textcritics_path = args
        .directory
        .join(format!("{}{TEXTCRITICS_SUFFIX}", args.file_name));

    // A failed write is reported but must not keep the other file from being
    // written.
    write_output(&source_path, &source_list);
    write_output(&textcritics_path, &textcritics);

    Ok(())
}

fn write_output<T: Serialize>(path: &Path, value: &T) {
    match write_json_pretty(path, value) {
        Ok(()) => info!(path = %path.display(), "wrote json output"),
        Err(err) => warn!(path = %path.display(), error = %err, "failed to write json output"),
    }
}

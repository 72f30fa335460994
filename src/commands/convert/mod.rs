mod classify;
mod content_items;
mod docx_extract;
mod label_fields;
mod markup;
mod run;
mod source_description;
mod textcritics;

pub use run::run;

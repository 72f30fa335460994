use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceList {
    pub sources: Vec<SourceDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescription {
    pub id: String,
    pub siglum: String,
    pub siglum_addendum: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<bool>,
    #[serde(rename = "type")]
    pub source_type: String,
    pub location: String,
    pub phys_desc: PhysDesc,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysDesc {
    pub conditions: Vec<String>,
    pub writing_material_strings: Vec<String>,
    pub writing_instruments: WritingInstruments,
    pub titles: Vec<String>,
    pub dates: Vec<String>,
    pub paginations: Vec<String>,
    pub measure_numbers: Vec<String>,
    pub instrumentations: Vec<String>,
    pub annotations: Vec<String>,
    pub contents: Vec<ContentItem>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WritingInstruments {
    pub main: String,
    pub secondary: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub item: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_link_to: Option<ContentItemLinkTo>,
    pub item_description: String,
    pub folios: Vec<Folio>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItemLinkTo {
    pub complex_id: String,
    pub sheet_id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folio {
    pub folio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_page: Option<bool>,
    pub folio_link_to: String,
    pub folio_description: String,
    pub system_groups: Vec<Vec<System>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct System {
    pub system: String,
    pub measure: String,
    pub link_to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<Row>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub row_type: String,
    pub row_base: String,
    pub row_number: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextcriticsList {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub textcritics: Vec<Textcritics>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub corrections: Vec<Textcritics>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Textcritics {
    pub id: String,
    pub label: String,
    pub evaluations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_table: Option<bool>,
    pub commentary: TextcriticalCommentary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_boxes: Option<Vec<LinkBox>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextcriticalCommentary {
    pub preamble: String,
    pub comments: Vec<TextcriticalCommentBlock>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextcriticalCommentBlock {
    pub block_header: String,
    pub block_comments: Vec<TextcriticalComment>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextcriticalComment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg_group_id: Option<String>,
    pub measure: String,
    pub system: String,
    pub position: String,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkBox {
    pub svg_group_id: String,
    pub link_to: String,
}

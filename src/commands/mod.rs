pub mod compare_pdfs;
pub mod convert;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use image::RgbImage;
use image::imageops;
use pdfium_render::prelude::*;
use rayon::prelude::*;
use tracing::info;

use crate::cli::ComparePdfsArgs;
use crate::util::{ensure_directory, now_utc_string};

use super::diff::{diff_mask, diff_regions, draw_diff_regions};

pub fn run(args: ComparePdfsArgs) -> Result<()> {
    info!(
        pdf1 = %args.pdf1.display(),
        pdf2 = %args.pdf2.display(),
        dpi = args.dpi,
        threshold = args.threshold,
        "comparing pdfs"
    );

    let pdfium = bind_pdfium()?;
    let first_pages = rasterize_pages(&pdfium, &args.pdf1, args.dpi)?;
    let second_pages = rasterize_pages(&pdfium, &args.pdf2, args.dpi)?;

    if first_pages.len() != second_pages.len() {
        bail!(
            "page counts differ: {} has {} pages, {} has {}",
            args.pdf1.display(),
            first_pages.len(),
            args.pdf2.display(),
            second_pages.len()
        );
    }
    info!(pages = first_pages.len(), "rendered both documents");

    let diff_dir = args.output.join("diff_images");
    ensure_directory(&diff_dir)?;

    let comparisons = (0..first_pages.len())
        .into_par_iter()
        .map(|index| {
            compare_page(
                index + 1,
                &first_pages[index],
                &second_pages[index],
                args.threshold,
                &diff_dir,
            )
        })
        .collect::<Result<Vec<PageComparison>>>()?;

    let changed_pages: Vec<usize> = comparisons
        .iter()
        .filter(|comparison| comparison.changed)
        .map(|comparison| comparison.number)
        .collect();

    if changed_pages.is_empty() {
        info!("no differences detected");
    } else {
        info!(pages = ?changed_pages, "differences detected");
    }

    let summary_path = diff_dir.join("diff.txt");
    fs::write(&summary_path, render_summary(&args, &changed_pages)).with_context(|| {
        format!("failed to write summary: {}", summary_path.display())
    })?;
    info!(path = %summary_path.display(), "wrote comparison summary");

    Ok(())
}

struct PageComparison {
    number: usize,
    changed: bool,
}

fn bind_pdfium() -> Result<Pdfium> {
    Ok(Pdfium::new(
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .context("failed to bind pdfium library")?,
    ))
}

fn rasterize_pages(pdfium: &Pdfium, path: &Path, dpi: u32) -> Result<Vec<RgbImage>> {
    let document = pdfium
        .load_pdf_from_file(path, None)
        .with_context(|| format!("failed to open pdf: {}", path.display()))?;

    let mut pages = Vec::new();
    for page in document.pages().iter() {
        let width = pixel_size(page.width(), dpi);
        let height = pixel_size(page.height(), dpi);
        let bitmap = page
            .render_with_config(
                &PdfRenderConfig::new()
                    .set_target_width(width)
                    .set_target_height(height),
            )
            .with_context(|| format!("failed to render page of {}", path.display()))?;
        pages.push(bitmap.as_image().to_rgb8());
    }
    Ok(pages)
}

pub(crate) fn pixel_size(points: PdfPoints, dpi: u32) -> i32 {
    ((points.value / 72.0) * dpi as f32).round().max(1.0) as i32
}

fn compare_page(
    number: usize,
    first: &RgbImage,
    second: &RgbImage,
    threshold: u8,
    diff_dir: &Path,
) -> Result<PageComparison> {
    if first.dimensions() != second.dimensions() {
        bail!(
            "page {number} differs in size: {:?} vs {:?}",
            first.dimensions(),
            second.dimensions()
        );
    }

    let mask = diff_mask(
        &imageops::grayscale(first),
        &imageops::grayscale(second),
        threshold,
    );
    let regions = diff_regions(&mask);

    let mut annotated = second.clone();
    draw_diff_regions(&mut annotated, &regions);

    let image_path = diff_page_path(diff_dir, number);
    annotated
        .save(&image_path)
        .with_context(|| format!("failed to write diff image: {}", image_path.display()))?;

    Ok(PageComparison {
        number,
        changed: !regions.is_empty(),
    })
}

fn diff_page_path(diff_dir: &Path, number: usize) -> PathBuf {
    diff_dir.join(format!("diff_page_{number}.png"))
}

pub(crate) fn render_summary(args: &ComparePdfsArgs, changed_pages: &[usize]) -> String {
    let divider = "=".repeat(50);
    let mut summary = String::new();
    summary.push_str("PDF Comparison Results\n");
    summary.push_str(&divider);
    summary.push('\n');
    summary.push_str(&format!("PDF 1: {}\n", args.pdf1.display()));
    summary.push_str(&format!("PDF 2: {}\n", args.pdf2.display()));
    summary.push_str(&format!("DPI: {}\n", args.dpi));
    summary.push_str(&format!("Threshold: {}\n", args.threshold));
    summary.push_str(&format!("Timestamp: {}\n", now_utc_string()));
    summary.push_str(&divider);
    summary.push('\n');

    if changed_pages.is_empty() {
        summary.push_str("No diffs detected.\n");
    } else {
        let pages = changed_pages
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        summary.push_str(&format!("Diffs detected on pages: {pages}\n"));
    }
    summary
}

// src/render.rs
// =============================================================================
// Writing crawled pages to disk.
//
// Two formats:
// - text: one document with a header and every page's content, meant to be
//   read by people (or pasted into an LLM)
// - json: the Page records as a pretty-printed JSON array
// - pdf: accepted for compatibility with older invocations, writes the text
//   document next to the requested path (docs.pdf -> docs.txt)
//
// Both fix up the file extension (output.pdf -> output.txt, output ->
// output.txt) and create missing parent directories.
// =============================================================================

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::RenderError;
use crate::page::Page;

/// Extensions we replace instead of appending to
const OUTPUT_EXTENSIONS: &[&str] = &["txt", "json", "pdf"];

const RULE_WIDTH: usize = 80;

/// Output document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Txt,
    Json,
    /// No PDF backend: produces the text document
    Pdf,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Txt | OutputFormat::Pdf => "txt",
            OutputFormat::Json => "json",
        }
    }
}

/// Writes `pages` in `format`, returning the path actually written
pub fn render(pages: &[Page], seed_url: &str, path: &Path, format: OutputFormat) -> Result<PathBuf, RenderError> {
    match format {
        OutputFormat::Txt | OutputFormat::Pdf => render_text(pages, seed_url, path),
        OutputFormat::Json => render_json(pages, path),
    }
}

/// Writes the text document
pub fn render_text(pages: &[Page], seed_url: &str, path: &Path) -> Result<PathBuf, RenderError> {
    if pages.is_empty() {
        return Err(RenderError::NoPages);
    }

    let path = with_output_extension(path, OutputFormat::Txt);
    let mut out = BufWriter::new(create_file(&path)?);

    writeln!(out, "# Crawl results")?;
    writeln!(out, "# Start URL: {seed_url}")?;
    writeln!(out, "# Fetched at: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "# Pages: {}", pages.len())?;
    writeln!(out)?;

    let rule = "=".repeat(RULE_WIDTH);
    for (i, page) in pages.iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "{rule}")?;
        writeln!(out, "# Page {}/{}", i + 1, pages.len())?;
        writeln!(out, "# URL: {}", page.url)?;
        writeln!(out, "# Title: {}", page.title)?;
        writeln!(out, "# Depth: {}", page.depth)?;
        writeln!(out, "{rule}")?;
        writeln!(out)?;
        writeln!(out, "{}", clean_text(&page.content))?;
        writeln!(out)?;
    }

    out.flush()?;
    Ok(path)
}

/// Writes the pages as a JSON array
pub fn render_json(pages: &[Page], path: &Path) -> Result<PathBuf, RenderError> {
    if pages.is_empty() {
        return Err(RenderError::NoPages);
    }

    let path = with_output_extension(path, OutputFormat::Json);
    let mut out = BufWriter::new(create_file(&path)?);
    serde_json::to_writer_pretty(&mut out, pages)?;
    writeln!(out)?;
    out.flush()?;
    Ok(path)
}

fn create_file(path: &Path) -> Result<fs::File, RenderError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(fs::File::create(path)?)
}

// output.pdf -> output.txt, output -> output.txt, notes.v2 -> notes.v2.txt
pub fn with_output_extension(path: &Path, format: OutputFormat) -> PathBuf {
    let wanted = format.extension();
    let current = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match current.as_deref() {
        Some(ext) if ext == wanted => path.to_path_buf(),
        Some(ext) if OUTPUT_EXTENSIONS.contains(&ext) => path.with_extension(wanted),
        _ => {
            let mut name = path.as_os_str().to_os_string();
            name.push(".");
            name.push(wanted);
            PathBuf::from(name)
        }
    }
}

/// Normalizes extracted text for the document: unix newlines, no trailing
/// spaces, at most one blank line in a row, no leading/trailing blank lines
pub fn clean_text(content: &str) -> String {
    let content = content.replace("\r\n", "\n");

    let mut lines = Vec::new();
    let mut previous_blank = false;
    for line in content.trim().lines() {
        let line = line.trim_end();
        let blank = line.is_empty();
        if blank && previous_blank {
            continue;
        }
        lines.push(line);
        previous_blank = blank;
    }

    lines.join("\n")
}

//! Terminal rendering of the page.

use crate::app::{PageState, Phase};
use crate::format::{format_analysis, Fragment};
use crate::Result;
use serde::Serialize;
use std::fmt::Write as _;

pub const TITLE: &str = "Free Stone Identifier";
pub const SUBTITLE: &str =
    "Upload a stone photo for educational identification and geological information";
pub const UPLOAD_HINT: &str = "PNG, JPG or JPEG (MAX. 20MB)";
pub const RESULTS_HEADING: &str = "Stone Analysis Results";

#[derive(Debug, Serialize)]
struct ImageSummary<'a> {
    mime_type: &'a str,
    bytes: usize,
}

#[derive(Debug, Serialize)]
struct PageView<'a> {
    phase: Phase,
    loading: bool,
    error: Option<&'a str>,
    image: Option<ImageSummary<'a>>,
    fragments: Vec<Fragment>,
}

/// Plain-text page: header, error banner, preview summary, action buttons
/// and formatted results.
pub fn render_text(state: &PageState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", TITLE);
    let _ = writeln!(out, "{}", SUBTITLE);
    let _ = writeln!(out, "[Upload Stone Photo]  {}", UPLOAD_HINT);
    out.push('\n');

    if let Some(error) = &state.error {
        let _ = writeln!(out, "Error: {}", error);
        out.push('\n');
    }

    if state.loading && state.image.is_none() {
        let _ = writeln!(out, "Loading...");
        out.push('\n');
    }

    if let Some(image) = &state.image {
        let _ = writeln!(
            out,
            "Stone preview: {} ({} bytes)",
            image.mime_type(),
            image.decoded_len()
        );
        let identify = if state.loading {
            "[Analyzing...]"
        } else {
            "[Identify Stone]"
        };
        let _ = writeln!(out, "{}  [Upload Another Photo]", identify);
        out.push('\n');
    }

    if !state.analysis.is_empty() {
        let _ = writeln!(out, "{}", RESULTS_HEADING);
        let _ = writeln!(out, "{}", "=".repeat(RESULTS_HEADING.len()));
        for (i, fragment) in format_analysis(&state.analysis).iter().enumerate() {
            if i > 0 && matches!(fragment, Fragment::SectionHeader { .. }) {
                out.push('\n');
            }
            let _ = writeln!(out, "{}", fragment);
        }
    }

    out
}

pub fn render_json(state: &PageState) -> Result<String> {
    let view = PageView {
        phase: state.phase(),
        loading: state.loading,
        error: state.error.as_deref(),
        image: state.image.as_ref().map(|image| ImageSummary {
            mime_type: image.mime_type(),
            bytes: image.decoded_len(),
        }),
        fragments: format_analysis(&state.analysis),
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

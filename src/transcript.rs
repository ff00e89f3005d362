//! Plain-text transcript of a harvested thread.
//!
//! Layout: the page title, one `ID:<id>` line per thread-creator ID and a
//! blank line; then for each post its header, the filenames assigned to its
//! downloaded images, its body (when not empty) and a blank line.

use crate::download::DownloadReport;
use crate::result::Harvest;

/// Written instead of a transcript when no posts were found.
pub const NO_STRUCTURE_NOTICE: &str = "Could not extract thread structure from this page.";

/// Render the transcript of a harvest and its download results.
#[must_use]
pub fn render_transcript(harvest: &Harvest, report: &DownloadReport) -> String {
    if harvest.posts.is_empty() {
        return NO_STRUCTURE_NOTICE.to_string();
    }

    let mut lines = vec![harvest.title.clone()];
    lines.extend(harvest.thread_creator_ids.iter().map(|id| format!("ID:{id}")));
    lines.push(String::new());

    for post in &harvest.posts {
        lines.push(post.header_raw.clone());
        lines.extend(
            post.images
                .iter()
                .filter_map(|image| report.filename_for(&image.url))
                .map(str::to_string),
        );
        if !post.body_text.is_empty() {
            lines.push(post.body_text.clone());
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_harvest_renders_notice() {
        let text = render_transcript(&Harvest::default(), &DownloadReport::default());
        assert_eq!(text, NO_STRUCTURE_NOTICE);
    }
}

//! Page-level metadata: title and thread-creator IDs.

use std::collections::BTreeSet;

use crate::dom::{self, Selection};
use crate::page::Page;
use crate::patterns::{ID_TOKEN, THREAD_CREATOR_CLASS, TITLE_UNSAFE};

/// Title used when a page has none.
pub const DEFAULT_TITLE: &str = "post";

/// Maximum length (chars) of a normalized title.
pub const MAX_TITLE_CHARS: usize = 50;

/// Text of the page `<title>`, or [`DEFAULT_TITLE`].
#[must_use]
pub fn page_title(page: &Page) -> String {
    page.select_first("title")
        .map(|t| dom::joined_text(&t, ""))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Filesystem-safe form of a title, usable as a folder name.
#[must_use]
pub fn normalize_title(raw: &str) -> String {
    let replaced = TITLE_UNSAFE.replace_all(raw.trim(), "_");
    let title: String = replaced.trim_matches('_').chars().take(MAX_TITLE_CHARS).collect();
    if title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title
    }
}

/// Responder IDs of the thread creator, sorted and unique.
///
/// The first post's responder is the creator by definition; blogs that mark
/// creator posts with an OP/author class contribute the IDs found there.
#[must_use]
pub fn thread_creator_ids(page: &Page, first_post_id: Option<&str>) -> Vec<String> {
    let mut ids: BTreeSet<String> = first_post_id.map(str::to_string).into_iter().collect();

    for node in page.root().select("[class]").nodes() {
        let sel = Selection::from(*node);
        if !THREAD_CREATOR_CLASS.is_match(&dom::class(&sel)) {
            continue;
        }
        if let Some(id) = ID_TOKEN.captures(&sel.text()).and_then(|c| c.get(1)) {
            ids.insert(id.as_str().to_string());
        }
    }
    ids.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_defaults_to_post() {
        let page = Page::parse("<p>x</p>", "https://example.jp/").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(page_title(&page), "post");
    }

    #[test]
    fn normalize_replaces_unsafe_runs() {
        assert_eq!(normalize_title(" 【画像】これ、すごい。 / まとめ "), "【画像】これ_すごい_まとめ");
        assert_eq!(normalize_title("???"), "post");
        assert_eq!(normalize_title(&"あ".repeat(80)).chars().count(), 50);
    }

    #[test]
    fn creator_ids_merge_first_post_and_op_markers() {
        let page = Page::parse(
            r#"<title>t</title><div class="res op">1: 名無し ID:Zed42</div>
               <div class="res">2: 名無し ID:other</div>
               <span class="author-name">ID:Abc12</span>"#,
            "https://example.jp/",
        )
        .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(thread_creator_ids(&page, Some("Zed42")), vec!["Abc12", "Zed42"]);
        assert_eq!(page_title(&page), "t");
    }
}

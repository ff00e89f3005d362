//! Download-time mirror selection.
//!
//! Pairs each post's local and mirror references by position and decides
//! which URL to hand to the download collaborator. The collaborator itself
//! (HTTP client, timeouts) lives outside this crate behind [`Fetcher`].
//!
//! The set of identities downloaded here is separate from the one used
//! during extraction: an image seen while extracting still gets downloaded
//! once, and one that was downloaded for an earlier post is never fetched
//! again on the same page.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::identity::{DedupKey, IdentityResolver};
use crate::options::Options;
use crate::result::{ImageRef, Post};
use crate::url_utils::image_extension;

/// The external download collaborator.
///
/// Implementations enforce their own timeout and classify failures as
/// [`FetchError::Http`] or [`FetchError::Transport`].
pub trait Fetcher {
    /// Fetch the bytes at an absolute URL.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

impl<F> Fetcher for F
where
    F: Fn(&str) -> Result<Vec<u8>, FetchError>,
{
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self(url)
    }
}

/// One successfully fetched image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadedImage {
    /// Index of the post the image belongs to.
    pub post_index: usize,
    /// Position slot within the post.
    pub slot: usize,
    /// URL that was actually fetched.
    pub url: String,
    /// Assigned local filename.
    pub filename: String,
    /// Whether the mirror entry of the slot was used.
    pub from_mirror: bool,
    /// Fetched bytes.
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// A slot for which no candidate could be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotFailure {
    /// Index of the post.
    pub post_index: usize,
    /// Position slot within the post.
    pub slot: usize,
    /// Error of the last attempt.
    pub error: FetchError,
}

/// Outcome of downloading one page's images.
#[derive(Debug, Clone, Default)]
pub struct DownloadReport {
    /// Fetched images in download order.
    pub images: Vec<DownloadedImage>,
    /// Slots skipped because their image was already downloaded.
    pub skipped_duplicates: usize,
    /// Slots omitted after every candidate failed.
    pub failures: Vec<SlotFailure>,
}

impl DownloadReport {
    /// Filename assigned to a fetched URL.
    #[must_use]
    pub fn filename_for(&self, url: &str) -> Option<&str> {
        self.images.iter().find(|i| i.url == url).map(|i| i.filename.as_str())
    }

    /// URL to filename mapping for the output consumer.
    #[must_use]
    pub fn mapping(&self) -> HashMap<&str, &str> {
        self.images.iter().map(|i| (i.url.as_str(), i.filename.as_str())).collect()
    }

    /// Images fetched for one post, in slot order.
    pub fn for_post(&self, post_index: usize) -> impl Iterator<Item = &DownloadedImage> {
        self.images.iter().filter(move |i| i.post_index == post_index)
    }
}

/// Per-page download state.
///
/// Create one per page; never share it across pages.
pub struct DownloadSession<'a> {
    identity: &'a IdentityResolver,
    filename_prefix: String,
    downloaded: HashSet<DedupKey>,
    next_index: usize,
    report: DownloadReport,
}

impl<'a> DownloadSession<'a> {
    /// Start a session for one page.
    #[must_use]
    pub fn new(identity: &'a IdentityResolver, options: &Options) -> Self {
        Self {
            identity,
            filename_prefix: options.filename_prefix.clone(),
            downloaded: HashSet::new(),
            next_index: 1,
            report: DownloadReport::default(),
        }
    }

    /// Skip `count` filename indices already used by the caller.
    pub fn reserve(&mut self, count: usize) {
        self.next_index += count;
    }

    /// Whether an image with this identity was already fetched.
    #[must_use]
    pub fn is_downloaded(&self, url: &str) -> bool {
        self.downloaded.contains(&self.identity.key(url))
    }

    /// Download every post's slots in page order.
    pub fn download_posts(&mut self, posts: &[Post], fetcher: &impl Fetcher) {
        for (post_index, post) in posts.iter().enumerate() {
            self.download_post(post_index, post, fetcher);
        }
    }

    /// Download one post's slots.
    pub fn download_post(&mut self, post_index: usize, post: &Post, fetcher: &impl Fetcher) {
        let local: Vec<&ImageRef> = post.local_images().collect();
        let mirror: Vec<&ImageRef> = post.mirror_images().collect();

        for slot in 0..local.len().max(mirror.len()) {
            let candidates = [(local.get(slot), false), (mirror.get(slot), true)];
            let mut last_error = None;

            for (candidate, from_mirror) in candidates {
                let Some(image) = candidate else { continue };
                let key = self.identity.key(&image.url);
                if self.downloaded.contains(&key) {
                    debug!(url = %image.url, slot, "already downloaded, skipping slot");
                    self.report.skipped_duplicates += 1;
                    last_error = None;
                    break;
                }

                match fetcher.fetch(&image.url) {
                    Ok(bytes) => {
                        self.record(post_index, slot, image, from_mirror, key, bytes);
                        last_error = None;
                        break;
                    }
                    Err(error) => {
                        warn!(url = %image.url, %error, from_mirror, "image fetch failed");
                        last_error = Some(error);
                    }
                }
            }

            if let Some(error) = last_error {
                self.report.failures.push(SlotFailure { post_index, slot, error });
            }
        }
    }

    fn record(
        &mut self,
        post_index: usize,
        slot: usize,
        image: &ImageRef,
        from_mirror: bool,
        key: DedupKey,
        bytes: Vec<u8>,
    ) {
        let filename = format!("{}{}{}", self.filename_prefix, self.next_index, image_extension(&image.url));
        self.next_index += 1;
        self.downloaded.insert(key);
        self.report.images.push(DownloadedImage {
            post_index,
            slot,
            url: image.url.clone(),
            filename,
            from_mirror,
            bytes,
        });
    }

    /// Finish the session.
    #[must_use]
    pub fn finish(self) -> DownloadReport {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{ImageMedium, ImageSource, ParsedHeader};
    use dom_query::Document;

    fn post(local: &[&str], mirror: &[&str]) -> Post {
        let doc = Document::from("<img>");
        let node = doc.select("img").nodes()[0].id;
        let image = |url: &&str, source| ImageRef {
            medium: ImageMedium::Embedded,
            url: (*url).to_string(),
            source,
            source_node: node,
        };
        Post {
            header_raw: String::new(),
            parsed_header: ParsedHeader::default(),
            body_text: String::new(),
            images: local
                .iter()
                .map(|u| image(u, ImageSource::Local))
                .chain(mirror.iter().map(|u| image(u, ImageSource::Mirror)))
                .collect(),
        }
    }

    fn ok_fetcher(url: &str) -> Result<Vec<u8>, FetchError> {
        if url.contains("missing") {
            Err(FetchError::Http { status: 404 })
        } else {
            Ok(url.as_bytes().to_vec())
        }
    }

    #[test]
    fn filenames_count_from_one_and_keep_extension() {
        let identity = IdentityResolver::default();
        let mut session = DownloadSession::new(&identity, &Options::default());
        session.download_post(0, &post(&["https://x.jp/a/aaaa1111.png", "https://x.jp/b/bbbb2222"], &[]), &ok_fetcher);
        let report = session.finish();
        assert_eq!(report.filename_for("https://x.jp/a/aaaa1111.png"), Some("image1.png"));
        assert_eq!(report.filename_for("https://x.jp/b/bbbb2222"), Some("image2.jpg"));
    }

    #[test]
    fn reserve_skips_indices() {
        let identity = IdentityResolver::default();
        let mut session = DownloadSession::new(&identity, &Options::default());
        session.reserve(2);
        session.download_post(0, &post(&["https://x.jp/a/aaaa1111.gif"], &[]), &ok_fetcher);
        assert_eq!(session.finish().images[0].filename, "image3.gif");
    }

    #[test]
    fn both_candidates_failing_omits_the_slot() {
        let identity = IdentityResolver::default();
        let mut session = DownloadSession::new(&identity, &Options::default());
        session.download_post(
            0,
            &post(&["https://x.jp/missing/aaaa1111.jpg", "https://x.jp/ok/bbbb2222.jpg"], &["https://i.imgur.com/missing1.jpg"]),
            &ok_fetcher,
        );
        let report = session.finish();
        assert_eq!(report.images.len(), 1);
        assert_eq!(report.images[0].filename, "image1.jpg");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].slot, 0);
        assert_eq!(report.failures[0].error, FetchError::Http { status: 404 });
    }

    #[test]
    fn downloaded_identity_covers_other_renditions() {
        let identity = IdentityResolver::default();
        let mut session = DownloadSession::new(&identity, &Options::default());
        session.download_post(0, &post(&["https://x.jp/a/aaaa1111.jpg"], &[]), &ok_fetcher);
        assert!(session.is_downloaded("https://i.imgur.com/aaaa1111.jpg"));
        assert!(!session.is_downloaded("https://x.jp/a/cccc3333.jpg"));
    }
}

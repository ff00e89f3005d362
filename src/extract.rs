//! Harvest entry point.
//!
//! A [`Harvester`] holds the matchers compiled from one [`Options`] value and
//! can be reused for any number of pages. Everything scoped to a page (the
//! parsed document, both dedup sets) is created per call and dropped with it.

use tracing::info;

use crate::download::{DownloadReport, DownloadSession, Fetcher};
use crate::error::Result;
use crate::extractor::run_pipeline;
use crate::identity::IdentityResolver;
use crate::images::MirrorHost;
use crate::metadata;
use crate::options::Options;
use crate::page::{Page, PageContext};
use crate::result::{Harvest, PatternKind};

/// Reusable harvesting engine.
#[derive(Debug, Clone)]
pub struct Harvester {
    options: Options,
    identity: IdentityResolver,
    mirror: MirrorHost,
}

impl Harvester {
    /// Validate `options` and compile the matchers derived from them.
    pub fn new(options: Options) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            identity: IdentityResolver::new(options.min_identity_token_len)?,
            mirror: MirrorHost::new(&options)?,
            options,
        })
    }

    /// Options in effect.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Identity resolver built from the options.
    #[must_use]
    pub fn identity(&self) -> &IdentityResolver {
        &self.identity
    }

    /// Parse rendered markup and harvest it.
    pub fn harvest(&self, html: &str, base_url: &str) -> Result<Harvest> {
        let page = Page::parse(html, base_url)?;
        Ok(self.harvest_page(&page))
    }

    /// Harvest an already parsed page. Never fails.
    #[must_use]
    pub fn harvest_page(&self, page: &Page) -> Harvest {
        let cx = self.context(page);
        let outcome = run_pipeline(&cx);

        let first_id = outcome
            .posts
            .first()
            .and_then(|p| p.parsed_header.responder_id.as_deref());
        let thread_creator_ids = metadata::thread_creator_ids(page, first_id);
        let harvest = Harvest {
            title: metadata::page_title(page),
            thread_creator_ids,
            detected_pattern: Some(outcome.detected),
            applied_pattern: outcome.applied,
            posts: outcome.posts,
        };

        info!(
            url = %page.base_url(),
            pattern = %outcome.detected,
            applied = %harvest.applied_pattern.map_or("none", PatternKind::as_str),
            posts = harvest.posts.len(),
            images = harvest.image_count(),
            "page harvested"
        );
        harvest
    }

    /// Classify a parsed page without extracting it.
    #[must_use]
    pub fn classify(&self, page: &Page) -> PatternKind {
        crate::classifier::classify(page, &self.options)
    }

    /// Start a download session for one page.
    #[must_use]
    pub fn download_session(&self) -> DownloadSession<'_> {
        DownloadSession::new(&self.identity, &self.options)
    }

    /// Download a harvest's images through `fetcher`, mirror fallback included.
    pub fn download(&self, harvest: &Harvest, fetcher: &impl Fetcher) -> DownloadReport {
        let mut session = self.download_session();
        session.download_posts(&harvest.posts, fetcher);
        session.finish()
    }

    fn context<'p>(&'p self, page: &'p Page) -> PageContext<'p> {
        PageContext {
            page,
            options: &self.options,
            identity: &self.identity,
            mirror: &self.mirror,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn invalid_options_are_rejected() {
        let options = Options { mirror_host: String::new(), ..Options::default() };
        assert!(matches!(Harvester::new(options), Err(Error::InvalidOption(_))));
    }

    #[test]
    fn harvest_fills_page_metadata() {
        let harvester = Harvester::new(Options::default()).unwrap_or_else(|e| panic!("{e}"));
        let html = r#"<title>スレタイ</title>
            <article class="post">
              <div class="t_h">1: 名無し 25/01/01(水) 00:00:01 ID:Op1d</div>
              <div class="t_b">始まり<img src="/i/opening01.jpg"></div>
            </article>"#;
        let harvest = harvester.harvest(html, "https://example.jp/a/1.html").expect("valid base url");
        assert_eq!(harvest.title, "スレタイ");
        assert_eq!(harvest.thread_creator_ids, vec!["Op1d"]);
        assert_eq!(harvest.detected_pattern, Some(PatternKind::Standard));
        assert_eq!(harvest.applied_pattern, Some(PatternKind::Standard));
        assert_eq!(harvest.image_count(), 1);
    }

    #[test]
    fn bad_base_url_is_an_error() {
        let harvester = Harvester::new(Options::default()).unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(harvester.harvest("<p>x</p>", "not a url"), Err(Error::InvalidBaseUrl(_))));
    }
}

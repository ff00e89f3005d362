use thread_harvest::extractor::{extract_with, run_pipeline};
use thread_harvest::{harvest, Harvester, IdentityResolver, Options, Page, PageContext, PatternKind};

const BASE: &str = "https://matome.example.jp/archives/1.html";

#[test]
fn image_less_standard_result_is_replaced_by_whole_page_scan() {
    let html = r#"<article class="post">
        <div class="t_h">1: 名無し ID:x1</div><div class="t_b">テキストだけ</div>
        <div class="t_h">2: 名無し ID:x2</div><div class="t_b">これも</div>
        <figure><img src="/f/outsidepic.jpg"></figure>
    </article>"#;

    let result = harvest(html, BASE).expect("valid base url");
    assert_eq!(result.detected_pattern, Some(PatternKind::Standard));
    assert_eq!(result.applied_pattern, Some(PatternKind::WholePageFallback));
    assert_eq!(result.posts.len(), 1);
    assert_eq!(result.image_count(), 1);
}

#[test]
fn image_less_result_is_kept_when_fallback_finds_nothing() {
    let html = r#"<div class="t_h">1: 名無し ID:x1</div><div class="t_b">テキスト</div>"#;
    let result = harvest(html, BASE).expect("valid base url");
    assert_eq!(result.applied_pattern, Some(PatternKind::Standard));
    assert_eq!(result.posts.len(), 1);
    assert_eq!(result.image_count(), 0);
}

#[test]
fn structural_mismatch_recovers_through_fallback() {
    let options = Options::default();
    let page = Page::parse(r#"<div><img src="/m/mismatch1.jpg"></div>"#, BASE).expect("valid base url");
    let identity = IdentityResolver::default();
    let harvester = Harvester::new(options.clone()).expect("default options are valid");
    let mirror = thread_harvest::images::MirrorHost::new(&options).expect("default hosts");
    let cx = PageContext { page: &page, options: &options, identity: &identity, mirror: &mirror };

    // Run directly, the standard strategy has nothing to work with.
    assert!(extract_with(PatternKind::Standard, &cx).is_err());

    let outcome = run_pipeline(&cx);
    assert_eq!(outcome.detected, PatternKind::WholePageFallback);
    assert_eq!(outcome.posts.len(), 1);
    assert_eq!(harvester.classify(&page), PatternKind::WholePageFallback);
}

#[test]
fn zero_posts_from_a_strategy_falls_back() {
    // Every body region is a noise section: BodyOnly yields no posts.
    let html = r#"<div class="t_b">スポンサーリンク</div>
                  <div class="content"><img src="/z/zeroposts.png"></div>"#;
    let result = harvest(html, BASE).expect("valid base url");
    assert_eq!(result.detected_pattern, Some(PatternKind::BodyOnly));
    assert_eq!(result.applied_pattern, Some(PatternKind::WholePageFallback));
    assert_eq!(result.image_count(), 1);
}

#[test]
fn page_without_anything_yields_empty_harvest() {
    let result = harvest("<html><body><p>挨拶だけ</p></body></html>", BASE).expect("valid base url");
    assert!(result.posts.is_empty());
    assert_eq!(result.title, "post");
}

#[test]
fn whole_page_never_misses_images_found_by_independent_scan() {
    let pages = [
        r#"<div class="t_b">1:a</div><p><img src="/q/indep0001.jpg"></p>"#,
        r#"<dl><dt>1: x ID:a</dt><dd>text</dd></dl><img src="/q/indep0002.jpg">"#,
        r#"<article><div>1: x</div><p>text</p></article><img src="/q/indep0003.jpg">"#,
    ];
    let options = Options::default();
    let identity = IdentityResolver::default();
    let mirror = thread_harvest::images::MirrorHost::new(&options).expect("default hosts");

    for html in pages {
        let page = Page::parse(html, BASE).expect("valid base url");
        let cx = PageContext { page: &page, options: &options, identity: &identity, mirror: &mirror };
        let fallback_images: usize = extract_with(PatternKind::WholePageFallback, &cx)
            .expect("whole-page scan")
            .iter()
            .map(|p| p.images.len())
            .sum();
        let outcome = run_pipeline(&cx);
        let images: usize = outcome.posts.iter().map(|p| p.images.len()).sum();
        assert!(fallback_images > 0);
        assert!(images > 0, "no images for {html}");
    }
}

use thread_harvest::{harvest, harvest_bytes, Error, Harvester, Options, PatternKind};

const BASE: &str = "https://matome.example.jp/archives/3.html";

#[test]
fn empty_input_yields_empty_harvest() {
    let result = harvest("", BASE).expect("valid base url");
    assert!(result.posts.is_empty());
    assert_eq!(result.detected_pattern, Some(PatternKind::WholePageFallback));
    assert!(result.thread_creator_ids.is_empty());
}

#[test]
fn relative_or_non_http_base_urls_are_rejected() {
    for base in ["/archives/3.html", "ftp://example.jp/", "", "https://"] {
        assert!(
            matches!(harvest("<p>x</p>", base), Err(Error::InvalidBaseUrl(_))),
            "accepted {base:?}"
        );
    }
}

#[test]
fn unclosed_tags_are_tolerated() {
    let html = r#"<article class="post"><div class="t_h">1: 名無し ID:bad1</div>
        <div class="t_b">途中<img src="/u/unclosed1.jpg"><p>閉じない"#;
    let result = harvest(html, BASE).expect("valid base url");
    assert_eq!(result.image_count(), 1);
}

#[test]
fn deeply_nested_markup_does_not_overflow() {
    let depth = 200;
    let html = format!(
        "{}<img src=\"/n/nestedpic.jpg\">{}",
        "<div>".repeat(depth),
        "</div>".repeat(depth)
    );
    let result = harvest(&html, BASE).expect("valid base url");
    assert_eq!(result.image_count(), 1);
}

#[test]
fn unusable_image_sources_are_ignored() {
    let html = r#"<div class="entry-content">
        <img src="javascript:void(0)">
        <img src="">
        <img>
        <a href="mailto:x@example.jp">mail</a>
        <img src="//cdn.example.jp/p/schemeless.jpg">
    </div>"#;
    let result = harvest(html, BASE).expect("valid base url");
    let urls: Vec<&str> = result.posts.iter().flat_map(|p| &p.images).map(|i| i.url.as_str()).collect();
    assert_eq!(urls, vec!["https://cdn.example.jp/p/schemeless.jpg"]);
}

#[test]
fn invalid_options_are_rejected_up_front() {
    let options = Options { min_identity_token_len: 0, ..Options::default() };
    assert!(matches!(Harvester::new(options), Err(Error::InvalidOption(_))));

    let options = Options { body_marker_classes: vec!["t b".into()], ..Options::default() };
    assert!(Harvester::new(options).is_err());
}

#[test]
fn non_utf8_bytes_are_decoded_before_parsing() {
    let (bytes, _, _) = encoding_rs::EUC_JP.encode(r#"<div class="t_b">1:日本語<img src="/e/eucimage1.gif"></div>"#);
    let result = harvest_bytes(&bytes, Some("text/html; charset=EUC-JP"), BASE, &Options::default())
        .expect("valid base url");
    assert_eq!(result.posts[0].body_text, "1:日本語");
    assert_eq!(result.image_count(), 1);
}

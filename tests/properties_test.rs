use std::collections::HashSet;

use proptest::prelude::*;
use thread_harvest::ad_filter::{is_too_small, AdCandidate, FilterMode};
use thread_harvest::{classify, harvest, IdentityResolver, Options, PatternKind};

const BASE: &str = "https://matome.example.jp/archives/5.html";

const TOKENS: [&str; 4] = ["aaaa111", "bbbb222", "cccc333", "dddd444"];

fn rendition(token: &str, form: u8) -> String {
    match form % 3 {
        0 => format!(r#"<img src="/imgs/9/d/{token}.jpg">"#),
        1 => format!(r#"<a href="/imgs/9/d/{token}.jpg"><img src="/imgs/9/d/{token}-s.jpg"></a>"#),
        _ => format!(r#"<a href="https://imgur.com/{token}">https://imgur.com/{token}</a>"#),
    }
}

fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("<div>".to_string()),
        Just("</div>".to_string()),
        Just(r#"<div class="t_h">1: 名無し</div>"#.to_string()),
        Just(r#"<div class="t_b">本文</div>"#.to_string()),
        Just("<dl><dt>2：名無し</dt><dd>x</dd>".to_string()),
        Just("<article>".to_string()),
        Just(r#"<img src="/p/somepic1.png">"#.to_string()),
        Just("<p>3: 名無し".to_string()),
        "[a-zあ-ん<>/ ]{0,12}",
    ]
}

proptest! {
    /// Thumbnail, full-size and mirror renditions of one token share a key.
    #[test]
    fn renditions_share_identity(
        token in "[A-Za-z0-9]{7,12}",
        suffix in prop_oneof![Just(""), Just("-s"), Just("-l"), Just("-640x480")],
        ext in prop_oneof![Just("jpg"), Just("png"), Just("gif"), Just("webp")],
    ) {
        let resolver = IdentityResolver::default();
        let site = format!("https://livedoor.blogimg.jp/m/imgs/9/d/{token}{suffix}.{ext}");
        let mirror = format!("https://i.imgur.com/{token}.{ext}");
        prop_assert!(resolver.same_image(&site, &mirror));
        let key = resolver.key(&site);
        prop_assert_eq!(key.as_str(), token.to_lowercase());
    }

    /// Shrinking a rejected image never makes it acceptable.
    #[test]
    fn size_rule_is_monotonic(w in 0u32..200, h in 0u32..200, dw in 0u32..50, dh in 0u32..50, body in any::<bool>()) {
        let options = Options::default();
        let sized = |w: u32, h: u32| AdCandidate {
            url: "https://example.jp/p/picture1.jpg".into(),
            width: Some(w.to_string()),
            height: Some(h.to_string()),
            thread_body: body,
            ..AdCandidate::default()
        };
        for mode in [FilterMode::Standard, FilterMode::Relaxed] {
            if is_too_small(&sized(w, h), mode, &options) {
                prop_assert!(is_too_small(&sized(w.saturating_sub(dw), h.saturating_sub(dh)), mode, &options));
            }
        }
    }

    /// Every page gets exactly one pattern and harvesting never fails.
    #[test]
    fn classification_is_total(parts in prop::collection::vec(fragment(), 0..16)) {
        let html = parts.concat();
        let kind = classify(&html, BASE, &Options::default());
        prop_assert!(matches!(kind, Ok(k) if PatternKind::ALL.contains(&k)));
        prop_assert!(harvest(&html, BASE).is_ok());
    }

    /// No post ever carries two references to the same logical image.
    #[test]
    fn posts_hold_unique_identities(
        posts in prop::collection::vec(prop::collection::vec((0usize..TOKENS.len(), any::<u8>()), 1..6), 1..5),
    ) {
        let mut html = String::from(r#"<article class="post">"#);
        for (n, images) in posts.iter().enumerate() {
            html.push_str(&format!(r#"<div class="t_h">{}: 名無し ID:p{n}</div><div class="t_b">"#, n + 1));
            for (token, form) in images {
                html.push_str(&rendition(TOKENS[*token], *form));
            }
            html.push_str("</div>");
        }
        html.push_str("</article>");

        let resolver = IdentityResolver::default();
        let result = harvest(&html, BASE).expect("valid base url");
        prop_assert_eq!(result.posts.len(), posts.len());
        for (post, images) in result.posts.iter().zip(&posts) {
            let keys: HashSet<String> = post.images.iter().map(|i| resolver.key(&i.url).to_string()).collect();
            prop_assert_eq!(keys.len(), post.images.len());
            let distinct: HashSet<usize> = images.iter().map(|(t, _)| *t).collect();
            prop_assert_eq!(keys.len(), distinct.len());
        }
    }
}

pub mod assets;
pub mod body;
pub mod document;

use indicatif::ProgressBar;
use tracing::info;
use url::Url;

use crate::classifier::Classifier;
use crate::config::PipelineConfig;
use crate::fetcher::{Fetcher, Transport};
use crate::model::{AssetKind, ExtractionResult};
use crate::retry::RetryPolicy;
use assets::AssetAccumulator;
use document::{AssetRef, PageOutline};

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("URL has no host: {0}")]
    NoHost(String),
    #[error("Failed to analyze {url} after {attempts} attempt(s): {reason}")]
    Exhausted {
        url: String,
        attempts: u32,
        reason: String,
    },
}

/// Prepend `https://` unless the input already names http(s).
pub fn normalize_url(raw: &str) -> Result<Url, AnalysisError> {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    let with_scheme = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };
    let url = Url::parse(&with_scheme).map_err(|source| AnalysisError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(AnalysisError::NoHost(raw.to_string()));
    }
    Ok(url)
}

/// Drives one page analysis: root page, then every stylesheet and script in order.
pub struct Analyzer<'c, T> {
    fetcher: Fetcher<T>,
    classifier: &'c Classifier,
    page_retry: RetryPolicy,
}

impl<'c, T: Transport> Analyzer<'c, T> {
    pub fn new(transport: T, classifier: &'c Classifier, config: &PipelineConfig) -> Self {
        Self {
            fetcher: Fetcher::new(transport, &config.proxy_endpoint, config.asset_retry),
            classifier,
            page_retry: config.page_retry,
        }
    }

    pub async fn analyze(
        &self,
        raw_url: &str,
        progress: &ProgressBar,
    ) -> Result<ExtractionResult, AnalysisError> {
        let target = normalize_url(raw_url)?;
        let host = target
            .host_str()
            .ok_or_else(|| AnalysisError::NoHost(raw_url.to_string()))?
            .to_string();
        let base_url = target.origin().ascii_serialization();
        let base = Url::parse(&base_url).map_err(|source| AnalysisError::InvalidUrl {
            url: raw_url.to_string(),
            source,
        })?;

        progress.set_message(format!("Fetching {}", target));
        let html = self
            .page_retry
            .run(
                target.as_str(),
                |attempt| self.fetch_page(&target, attempt),
                |_| true,
            )
            .await
            .map_err(|e| AnalysisError::Exhausted {
                url: target.to_string(),
                attempts: e.attempts,
                reason: e.last.to_string(),
            })?;

        progress.set_message("Parsing document");
        let outline = document::outline(&html, &base, &host);
        info!(
            "Parsed {}: {} stylesheets, {} inline styles, {} external scripts, {} inline scripts",
            target,
            outline.stylesheets.len(),
            outline.inline_styles.len(),
            outline.external_scripts.len(),
            outline.inline_scripts.len()
        );

        let mut assets = AssetAccumulator::new(self.classifier);
        progress.set_message("Processing stylesheets");
        self.collect_external(&mut assets, AssetKind::Css, &outline.stylesheets, progress)
            .await;
        for (i, css) in outline.inline_styles.iter().enumerate() {
            assets.add_inline(AssetKind::Css, i, css);
        }

        progress.set_message("Processing scripts");
        self.collect_external(&mut assets, AssetKind::Js, &outline.external_scripts, progress)
            .await;
        for (i, js) in outline.inline_scripts.iter().enumerate() {
            assets.add_inline(AssetKind::Js, i, js);
        }
        let accumulated = assets.finish();

        progress.set_message("Detecting technologies");
        let corpus = format!("{}{}{}", accumulated.js, accumulated.css, html);
        let tech_guesses = self.classifier.tech().guess(&corpus);

        let PageOutline {
            title,
            description,
            internal_links,
            external_links,
            images,
            open_graph_tags,
            stylesheet_count,
            body_html,
            ..
        } = outline;

        let mut result = ExtractionResult::new(base_url);
        result.title = title;
        result.description = description;
        result.tech_guesses = tech_guesses;
        result.internal_links = internal_links;
        result.external_links = external_links;
        result.images = images;
        result.stylesheets = stylesheet_count;
        result.open_graph_tags = open_graph_tags;
        result.full_html = body_html;
        result.full_css = accumulated.css;
        result.full_js = accumulated.js;
        result.set_animation_files(accumulated.animation_files);

        info!(
            "Analysis of {} complete: {} animation file(s), {} CDN requirement(s)",
            target,
            result.animation_files().len(),
            result.required_cdn_urls().len()
        );
        Ok(result)
    }

    async fn fetch_page(&self, target: &Url, attempt: u32) -> Result<String, String> {
        info!(
            "Fetching page {} (attempt {}/{})",
            target,
            attempt,
            self.page_retry.max_attempts()
        );
        self.fetcher.fetch_with_retry(target.as_str()).await.into_result()
    }

    /// One fetch at a time, in document order.
    async fn collect_external(
        &self,
        assets: &mut AssetAccumulator<'_>,
        kind: AssetKind,
        refs: &[AssetRef],
        progress: &ProgressBar,
    ) {
        for asset in refs {
            match asset {
                AssetRef::Resolved(url) => {
                    progress.set_message(format!("Fetching {}", url));
                    let outcome = self.fetcher.fetch_with_retry(url.as_str()).await;
                    assets.add_external(kind, url.as_str(), outcome);
                }
                AssetRef::Unresolvable(raw) => assets.add_unresolvable(kind, raw),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Library;
    use crate::testing::{fast_config, FakeSite};

    const GSAP_BUNDLE: &str =
        "/*! GSAP 3.12.2 */ gsap.registerPlugin(ScrollTrigger); gsap.to('.hero', {y: 0});";

    fn landing_site() -> FakeSite {
        let html = std::fs::read_to_string("tests/fixtures/landing.html").unwrap();
        FakeSite::default()
            .with("https://acme.test/", &html)
            .with("https://acme.test/css/main.css", "body { margin: 0 }")
            .with(
                "https://cdnjs.cloudflare.com/ajax/libs/gsap/3.12.2/gsap.min.js",
                GSAP_BUNDLE,
            )
            .with(
                "https://www.googletagmanager.com/gtag/js?id=G-1",
                "window.dataLayer = window.dataLayer || []; gsap.to('.nope')",
            )
            .with("https://acme.test/js/app.js", "document.querySelector('.x')")
    }

    async fn analyze(site: FakeSite, url: &str) -> Result<ExtractionResult, AnalysisError> {
        let config = fast_config();
        let analyzer = Analyzer::new(site, Classifier::shared(), &config);
        analyzer.analyze(url, &ProgressBar::hidden()).await
    }

    #[test]
    fn normalizes_bare_hosts() {
        assert_eq!(normalize_url("example.com").unwrap().as_str(), "https://example.com/");
        assert_eq!(normalize_url("  example.com/a ").unwrap().as_str(), "https://example.com/a");
        assert_eq!(normalize_url("http://example.com").unwrap().as_str(), "http://example.com/");
        assert_eq!(normalize_url("HTTPS://Example.com").unwrap().as_str(), "https://example.com/");
        assert!(normalize_url("").is_err());
        assert!(normalize_url("https://").is_err());
    }

    #[tokio::test]
    async fn full_landing_page() {
        let result = analyze(landing_site(), "acme.test").await.unwrap();

        assert_eq!(result.base_url, "https://acme.test");
        assert_eq!(result.title, "Acme Motion Studio");
        assert_eq!(result.description, "We animate things.");
        assert_eq!(result.internal_links, 2);
        assert_eq!(result.external_links, 2);
        assert_eq!(result.images.len(), 2);
        assert_eq!(result.stylesheets, 2);
        assert_eq!(result.open_graph_tags, 2);

        let urls: Vec<&str> = result.animation_files().iter().map(|f| f.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://cdnjs.cloudflare.com/ajax/libs/gsap/3.12.2/gsap.min.js",
                "inline-script-1",
            ]
        );
        assert!(result
            .animation_files()
            .iter()
            .all(|f| f.library == Some(Library::Gsap) && f.kind == AssetKind::Js));

        let cdn: Vec<&str> = result.required_cdn_urls().iter().map(String::as_str).collect();
        assert_eq!(cdn, Library::Gsap.cdn_urls());

        assert!(result.tech_guesses.contains("GSAP"));
        assert!(result.tech_guesses.contains("AOS"));
    }

    #[tokio::test]
    async fn css_follows_document_order() {
        let result = analyze(landing_site(), "acme.test").await.unwrap();
        let css = &result.full_css;
        let main = css.find("Stylesheet https://acme.test/css/main.css").unwrap();
        let failed = css
            .find("FAILED to load stylesheet https://cdn.acme.test/aos.css")
            .unwrap();
        let inline_1 = css.find("Inline style #1").unwrap();
        let inline_2 = css.find("Inline style #2").unwrap();
        assert!(main < failed && failed < inline_1 && inline_1 < inline_2);
        assert!(css.contains("body { margin: 0 }"));
    }

    #[tokio::test]
    async fn js_external_before_inline() {
        let result = analyze(landing_site(), "acme.test").await.unwrap();
        let js = &result.full_js;
        let gsap = js.find("External script https://cdnjs.cloudflare.com").unwrap();
        let gtag = js.find("External script https://www.googletagmanager.com").unwrap();
        let app = js.find("External script https://acme.test/js/app.js").unwrap();
        let inline = js.find("Inline script #1").unwrap();
        assert!(gsap < gtag && gtag < app && app < inline);
        // blacklisted host: present but never tagged
        assert!(!js.contains("googletagmanager.com/gtag/js?id=G-1 [animation"));
        assert!(!js.contains("ld+json") && !js.contains("schema.org"));
    }

    #[tokio::test]
    async fn body_is_reconstructed_without_scripts() {
        let result = analyze(landing_site(), "acme.test").await.unwrap();
        let html = &result.full_html;
        assert!(html.starts_with(r#"<body class="home dark" data-theme="night">"#));
        assert!(html.ends_with("</body>"));
        assert!(html.contains("Hello &amp; welcome"));
        assert!(html.contains(r#"<img alt="logo" src="/img/logo.png">"#));
        assert!(!html.contains("<script"));
        assert!(!html.contains("<style"));
    }

    #[tokio::test]
    async fn failing_stylesheet_does_not_fail_analysis() {
        let site = FakeSite::default().with(
            "https://solo.test/",
            r#"<html><head><link rel="stylesheet" href="/gone.css"></head><body><p>x</p></body></html>"#,
        );
        let requested = site.requested();
        let result = analyze(site, "https://solo.test").await.unwrap();

        assert!(result
            .full_css
            .contains("FAILED to load stylesheet https://solo.test/gone.css"));
        assert!(result.animation_files().is_empty());
        assert!(result.required_cdn_urls().is_empty());

        let gone_attempts = requested
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.as_str() == "https://solo.test/gone.css")
            .count();
        assert_eq!(gone_attempts, fast_config().asset_retry.max_attempts() as usize);
    }

    #[tokio::test]
    async fn unreachable_page_is_terminal_after_nested_retries() {
        let site = FakeSite::default();
        let requested = site.requested();
        let err = analyze(site, "down.test").await.unwrap_err();

        let config = fast_config();
        match &err {
            AnalysisError::Exhausted { url, attempts, reason } => {
                assert_eq!(url, "https://down.test/");
                assert_eq!(*attempts, config.page_retry.max_attempts());
                assert_eq!(reason, "Network response was not ok (status: 404)");
            }
            other => panic!("unexpected error: {other}"),
        }
        let expected = config.page_retry.max_attempts() * config.asset_retry.max_attempts();
        assert_eq!(requested.lock().unwrap().len(), expected as usize);
    }

    #[tokio::test]
    async fn page_recovers_on_a_later_outer_attempt() {
        use crate::testing::{envelope, ScriptedTransport};

        // first outer attempt burns all 3 inner attempts, second succeeds at once
        let transport = ScriptedTransport::default()
            .respond(502, "")
            .respond(502, "")
            .respond(502, "")
            .respond(200, &envelope("<title>Back</title>"));
        let calls = transport.calls();
        let config = fast_config();
        let analyzer = Analyzer::new(transport, Classifier::shared(), &config);
        let result = analyzer
            .analyze("flaky.test", &ProgressBar::hidden())
            .await
            .unwrap();
        assert_eq!(result.title, "Back");
        assert_eq!(calls.get(), 4);
    }

    #[tokio::test]
    async fn invalid_url_fails_without_fetching() {
        let site = FakeSite::default();
        let requested = site.requested();
        let err = analyze(site, "http://[::1").await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidUrl { .. }));
        assert!(requested.lock().unwrap().is_empty());
    }
}

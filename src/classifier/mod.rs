mod library;
pub mod tech;

pub use library::Library;

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::debug;

use crate::config::{ANIMATION_THRESHOLD, GENERIC_MAX_CONFIDENCE, GENERIC_MIN_SCORE};
use tech::TechDetector;

/// Analytics, ad and chat-widget hosts. Never animation code, whatever they contain.
const URL_BLACKLIST: &[&str] = &[
    "googletagmanager",
    "google-analytics",
    "gtag",
    "facebook.net",
    "doubleclick",
    "adsystem",
    "googlesyndication",
    "hotjar",
    "intercom",
    "zendesk",
    "crisp.chat",
    "tawk.to",
];

/// Plain CSS/JS animation syntax, used when no library signature matches.
const GENERIC_PATTERNS: &[&str] = &[
    r"@keyframes|animation:|transform:|transition:",
    r"requestAnimationFrame|setInterval.*animation",
    r"\.animate\(|\.transition\(",
    r"transform.*translate|rotate|scale",
    r"opacity.*transition|visibility.*transition",
    r"cubic-bezier|ease-in|ease-out",
];

const GENERIC_WEIGHT: f64 = 10.0;

static SHARED: LazyLock<Classifier> = LazyLock::new(Classifier::new);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub is_animation: bool,
    pub library: Option<Library>,
    pub confidence: f64,
}

impl ClassificationResult {
    fn none() -> Self {
        Self {
            is_animation: false,
            library: None,
            confidence: 0.0,
        }
    }

    /// Human tag for accumulator markers, e.g. `GSAP, 82% confidence`.
    pub fn tag(&self) -> Option<String> {
        if !self.is_animation {
            return None;
        }
        let name = self.library.map(Library::name).unwrap_or("generic animation");
        Some(format!("{}, {:.0}% confidence", name, self.confidence))
    }
}

struct Signature {
    library: Library,
    patterns: Vec<(Regex, f64)>,
}

impl Signature {
    /// Average weighted score per matching pattern, capped at 100. `None` if nothing matched.
    fn confidence(&self, corpus: &str) -> Option<f64> {
        let mut total = 0.0;
        let mut matched = 0u32;
        for (re, weight) in &self.patterns {
            let hits = re.find_iter(corpus).count();
            if hits > 0 {
                total += weight * hits as f64;
                matched += 1;
            }
        }
        (matched > 0).then(|| (total / f64::from(matched)).min(100.0))
    }
}

/// Compiled library catalog plus the generic fallback and technology dictionary.
///
/// Built once; share it by reference (see [`Classifier::shared`]).
pub struct Classifier {
    signatures: Vec<Signature>,
    generic: Vec<Regex>,
    tech: TechDetector,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    pub fn new() -> Self {
        let signatures = Library::ALL
            .iter()
            .map(|&library| Signature {
                library,
                patterns: library
                    .patterns()
                    .iter()
                    .map(|&(p, w)| (compile(p), f64::from(w)))
                    .collect(),
            })
            .collect();
        let generic = GENERIC_PATTERNS.iter().map(|p| compile(p)).collect();

        Self {
            signatures,
            generic,
            tech: TechDetector::new(),
        }
    }

    /// Process-wide catalog instance.
    pub fn shared() -> &'static Classifier {
        &SHARED
    }

    pub fn tech(&self) -> &TechDetector {
        &self.tech
    }

    /// Score `content` fetched from `url` against every library signature.
    pub fn detect_animation_library(&self, url: &str, content: &str) -> ClassificationResult {
        let url_lower = url.to_lowercase();
        if URL_BLACKLIST.iter().any(|b| url_lower.contains(b)) {
            debug!("Blacklisted asset, skipping classification: {}", url);
            return ClassificationResult::none();
        }

        let corpus = format!("{} {}", url_lower, content.to_lowercase());

        let mut best: Option<(Library, f64)> = None;
        for sig in &self.signatures {
            let Some(confidence) = sig.confidence(&corpus) else {
                continue;
            };
            if confidence > best.map_or(0.0, |(_, c)| c) {
                best = Some((sig.library, confidence));
            }
        }

        match best {
            Some((library, confidence)) => ClassificationResult {
                is_animation: confidence > ANIMATION_THRESHOLD,
                library: Some(library),
                confidence,
            },
            None => self.generic_fallback(&corpus),
        }
    }

    fn generic_fallback(&self, corpus: &str) -> ClassificationResult {
        let score: f64 = self
            .generic
            .iter()
            .map(|re| re.find_iter(corpus).count() as f64 * GENERIC_WEIGHT)
            .sum();

        if score > GENERIC_MIN_SCORE {
            ClassificationResult {
                is_animation: true,
                library: None,
                confidence: score.min(GENERIC_MAX_CONFIDENCE),
            }
        } else {
            ClassificationResult::none()
        }
    }
}

fn compile(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap()
}

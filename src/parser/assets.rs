use tracing::{debug, info, warn};

use crate::classifier::{ClassificationResult, Classifier};
use crate::config::ANIMATION_THRESHOLD;
use crate::fetcher::FetchOutcome;
use crate::model::{AnimationFile, AssetKind};

/// Builds the CSS and JS accumulators in the order assets are added,
/// recording animation files along the way.
pub struct AssetAccumulator<'c> {
    classifier: &'c Classifier,
    css: String,
    js: String,
    animation_files: Vec<AnimationFile>,
}

pub struct Accumulated {
    pub css: String,
    pub js: String,
    pub animation_files: Vec<AnimationFile>,
}

impl<'c> AssetAccumulator<'c> {
    pub fn new(classifier: &'c Classifier) -> Self {
        Self {
            classifier,
            css: String::new(),
            js: String::new(),
            animation_files: Vec::new(),
        }
    }

    /// A fetched stylesheet or script. Failures leave a visible marker instead of content.
    pub fn add_external(&mut self, kind: AssetKind, url: &str, outcome: FetchOutcome) {
        match outcome.into_result() {
            Ok(content) => {
                let label = format!("{} {}", external_noun(kind), url);
                self.add(kind, url, &label, content);
            }
            Err(error) => {
                warn!("Failed to load {} {}: {}", noun(kind), url, error);
                self.push_failure(kind, url, &error);
            }
        }
    }

    /// A stylesheet/script href that could not be turned into a URL.
    pub fn add_unresolvable(&mut self, kind: AssetKind, raw: &str) {
        debug!("Unresolvable {} reference: {}", noun(kind), raw);
        self.push_failure(kind, raw, "could not resolve URL");
    }

    /// An inline `<style>`/`<script>` block; `index` is 0-based in document order.
    pub fn add_inline(&mut self, kind: AssetKind, index: usize, content: &str) {
        let id = inline_id(kind, index);
        let label = format!("Inline {} #{}", noun(kind), index + 1);
        self.add(kind, &id, &label, content.to_string());
    }

    pub fn finish(self) -> Accumulated {
        Accumulated {
            css: self.css,
            js: self.js,
            animation_files: self.animation_files,
        }
    }

    fn add(&mut self, kind: AssetKind, url: &str, label: &str, content: String) {
        let class = self.classifier.detect_animation_library(url, &content);
        let header = marker(kind, &with_tag(label, &class));
        let target = self.buffer(kind);
        target.push_str(&header);
        target.push('\n');
        target.push_str(&content);
        target.push_str("\n\n");

        if class.confidence > ANIMATION_THRESHOLD {
            info!(
                "Animation {} detected: {} ({:?}, {:.0}%)",
                noun(kind),
                url,
                class.library.map(|l| l.name()),
                class.confidence
            );
            self.animation_files.push(AnimationFile {
                url: url.to_string(),
                content,
                kind,
                is_animation: class.is_animation,
                library: class.library,
                confidence: class.confidence,
            });
        }
    }

    fn push_failure(&mut self, kind: AssetKind, url: &str, error: &str) {
        let what = match kind {
            AssetKind::Css => "stylesheet",
            AssetKind::Js => "script",
        };
        let text = format!("FAILED to load {} {} ({})", what, url, error);
        let line = marker(kind, &text);
        let target = self.buffer(kind);
        target.push_str(&line);
        target.push_str("\n\n");
    }

    fn buffer(&mut self, kind: AssetKind) -> &mut String {
        match kind {
            AssetKind::Css => &mut self.css,
            AssetKind::Js => &mut self.js,
        }
    }
}

/// Identifier inline blocks are classified and recorded under.
pub fn inline_id(kind: AssetKind, index: usize) -> String {
    match kind {
        AssetKind::Css => format!("inline-style-{}", index + 1),
        AssetKind::Js => format!("inline-script-{}", index + 1),
    }
}

fn noun(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::Css => "style",
        AssetKind::Js => "script",
    }
}

fn external_noun(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::Css => "Stylesheet",
        AssetKind::Js => "External script",
    }
}

fn with_tag(label: &str, class: &ClassificationResult) -> String {
    match class.tag() {
        Some(tag) => format!("{} [animation: {}]", label, tag),
        None => label.to_string(),
    }
}

/// One-line comment in the asset's own syntax. Text that would close it early is defused.
///
/// JS markers open with `;` so a block never runs into the previous one's last expression.
fn marker(kind: AssetKind, text: &str) -> String {
    let text = text.replace(['\r', '\n'], " ");
    match kind {
        AssetKind::Css => format!("/* ===== {} ===== */", text.replace("*/", "* /")),
        AssetKind::Js => format!(";// ===== {} =====", text),
    }
}

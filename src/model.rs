use indexmap::IndexSet;
use serde::Serialize;

use crate::classifier::Library;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Css,
    Js,
}

/// An asset the classifier tagged above the animation threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationFile {
    pub url: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub is_animation: bool,
    pub library: Option<Library>,
    pub confidence: f64,
}

/// Everything captured from one analyzed page.
///
/// `required_cdn_urls` is derived from `animation_files` and only changes through
/// [`ExtractionResult::set_animation_files`] / [`ExtractionResult::push_animation_file`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub title: String,
    pub description: String,
    pub tech_guesses: IndexSet<String>,
    pub internal_links: usize,
    pub external_links: usize,
    pub images: Vec<String>,
    pub stylesheets: usize,
    pub open_graph_tags: usize,
    #[serde(rename = "fullHTML")]
    pub full_html: String,
    #[serde(rename = "fullCSS")]
    pub full_css: String,
    #[serde(rename = "fullJS")]
    pub full_js: String,
    #[serde(rename = "baseURL")]
    pub base_url: String,
    animation_files: Vec<AnimationFile>,
    required_cdn_urls: IndexSet<String>,
}

impl ExtractionResult {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            tech_guesses: IndexSet::new(),
            internal_links: 0,
            external_links: 0,
            images: Vec::new(),
            stylesheets: 0,
            open_graph_tags: 0,
            full_html: String::new(),
            full_css: String::new(),
            full_js: String::new(),
            base_url: base_url.into(),
            animation_files: Vec::new(),
            required_cdn_urls: IndexSet::new(),
        }
    }

    pub fn animation_files(&self) -> &[AnimationFile] {
        &self.animation_files
    }

    pub fn required_cdn_urls(&self) -> &IndexSet<String> {
        &self.required_cdn_urls
    }

    pub fn set_animation_files(&mut self, files: Vec<AnimationFile>) {
        self.animation_files = files;
        self.required_cdn_urls = cdn_union(&self.animation_files);
    }

    pub fn push_animation_file(&mut self, file: AnimationFile) {
        self.animation_files.push(file);
        self.required_cdn_urls = cdn_union(&self.animation_files);
    }
}

/// Ordered union of the CDN lists of each distinct library, in order of first appearance.
pub fn cdn_union(files: &[AnimationFile]) -> IndexSet<String> {
    let mut seen = IndexSet::new();
    let mut urls = IndexSet::new();
    for library in files.iter().filter_map(|f| f.library) {
        if seen.insert(library) {
            urls.extend(library.cdn_urls().iter().map(|u| u.to_string()));
        }
    }
    urls
}

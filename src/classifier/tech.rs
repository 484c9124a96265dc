use indexmap::IndexSet;
use regex::{Regex, RegexBuilder};

use super::Library;

/// Frameworks and utility stacks worth naming, beside the animation libraries.
const FRAMEWORK_PATTERNS: &[(&str, &str)] = &[
    ("React", r"react-dom|react\.production|data-reactroot|__NEXT_DATA__|_next/static"),
    ("Vue", r"vue(\.runtime)?(\.global)?(\.min)?\.js|data-v-[0-9a-f]{8}|__vue__|__NUXT__"),
    ("Angular", r"ng-version|angular(\.min)?\.js|ng-app"),
    ("jQuery", r"jquery"),
    ("Bootstrap", r"bootstrap(\.bundle)?(\.min)?\.(css|js)|container-fluid|col-md-\d"),
    ("Tailwind", r"tailwind|--tw-"),
];

/// Coarse technology dictionary. Advisory only: never feeds classification or export.
pub struct TechDetector {
    patterns: Vec<(&'static str, Regex)>,
}

impl Default for TechDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl TechDetector {
    pub fn new() -> Self {
        let frameworks = FRAMEWORK_PATTERNS.iter().copied();
        let libraries = Library::ALL.iter().map(|l| (l.name(), l.tech_pattern()));
        let patterns = frameworks
            .chain(libraries)
            .map(|(label, p)| {
                let re = RegexBuilder::new(p).case_insensitive(true).build().unwrap();
                (label, re)
            })
            .collect();
        Self { patterns }
    }

    /// Labels whose pattern occurs anywhere in `corpus`, in dictionary order.
    pub fn guess(&self, corpus: &str) -> IndexSet<String> {
        self.patterns
            .iter()
            .filter(|(_, re)| re.is_match(corpus))
            .map(|(label, _)| label.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_frameworks_and_libraries() {
        let corpus = r#"<script id="__NEXT_DATA__"></script><div class="--tw-ring">
            <script src="https://code.jquery.com/jquery-3.7.1.min.js"></script>
            gsap.to(".hero", {y: 0})"#;
        let guesses = TechDetector::new().guess(corpus);
        let labels: Vec<&str> = guesses.iter().map(String::as_str).collect();
        assert_eq!(labels, vec!["React", "jQuery", "Tailwind", "GSAP"]);
    }

    #[test]
    fn plain_page_has_no_guesses() {
        let guesses = TechDetector::new().guess("<html><body><p>Hello</p></body></html>");
        assert!(guesses.is_empty());
    }
}

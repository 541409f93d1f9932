use crate::model::TyposquattingVerdict;

/// Trusted package names, in match priority order.
///
/// Order matters: [`TyposquatDetector::detect`] reports the first entry within
/// range, not the closest one.
pub const POPULAR_PACKAGES: &[&str] = &[
    "react",
    "react-dom",
    "next",
    "vue",
    "angular",
    "express",
    "lodash",
    "axios",
    "moment",
    "commander",
    "chalk",
    "tslib",
    "rxjs",
    "zone.js",
    "typescript",
    "eslint",
    "prettier",
    "webpack",
    "babel-core",
    "jest",
];

/// Largest edit distance still reported as a near miss.
pub const MAX_DISTANCE: usize = 2;

/// Trusted names this short or shorter are never reported as targets.
pub const MIN_TARGET_LEN: usize = 3;

/// Nearest-neighbor typosquatting detector over an ordered trusted corpus.
#[derive(Debug, Clone)]
pub struct TyposquatDetector {
    corpus: Vec<String>,
}

impl TyposquatDetector {
    pub fn new() -> Self {
        Self::with_corpus(POPULAR_PACKAGES.iter().copied())
    }

    /// Builds a detector over a custom corpus. Iteration order is preserved
    /// and used as the tie-break.
    pub fn with_corpus<I, S>(corpus: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            corpus: corpus.into_iter().map(Into::into).collect(),
        }
    }

    pub fn corpus(&self) -> &[String] {
        &self.corpus
    }

    pub fn detect(&self, name: &str) -> TyposquattingVerdict {
        if self.corpus.iter().any(|trusted| trusted == name) {
            return TyposquattingVerdict::clean();
        }

        self.corpus
            .iter()
            .find_map(|trusted| {
                let distance = levenshtein::levenshtein(name, trusted);
                let in_range = distance > 0 && distance <= MAX_DISTANCE;
                (in_range && trusted.chars().count() > MIN_TARGET_LEN)
                    .then(|| TyposquattingVerdict::suspicious(trusted.clone(), distance))
            })
            .unwrap_or_else(TyposquattingVerdict::clean)
    }
}

impl Default for TyposquatDetector {
    fn default() -> Self {
        Self::new()
    }
}

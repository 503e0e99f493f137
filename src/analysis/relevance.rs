//! Selection of the sentences that actually discuss a claim

use super::keywords::KeywordExtractor;

/// Keeps sentences mentioning at least `min(2, distinct keywords)` claim keywords
#[derive(Debug, Clone, Default)]
pub struct RelevanceFilter {
    extractor: KeywordExtractor,
}

impl RelevanceFilter {
    pub fn new(extractor: KeywordExtractor) -> Self {
        Self { extractor }
    }

    pub fn extractor(&self) -> &KeywordExtractor {
        &self.extractor
    }

    /// Relevant sentences of `content` for `claim`, lowercased and trimmed
    pub fn relevant_sentences(&self, claim: &str, content: &str) -> Vec<String> {
        let keywords = self.extractor.extract(claim);
        filter_sentences(&keywords, content)
    }
}

/// Relevance filtering against an already extracted keyword set
pub fn filter_sentences(keywords: &[String], content: &str) -> Vec<String> {
    let mut distinct: Vec<&str> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        if !distinct.contains(&keyword.as_str()) {
            distinct.push(keyword.as_str());
        }
    }

    if distinct.is_empty() {
        return Vec::new();
    }

    let threshold = distinct.len().min(2);
    let lowered = content.to_lowercase();

    lowered
        .split(|c: char| matches!(c, '.' | '!' | '?'))
        .filter(|sentence| {
            let hits = distinct.iter().filter(|k| sentence.contains(**k)).count();
            hits >= threshold
        })
        .map(|sentence| sentence.trim().to_string())
        .collect()
}

//! Phrase chunk detection
//!
//! Groups consecutive words into phrases by their tags. A phrase is a
//! maximal run of words whose tags all belong to the same [`PhraseRule`];
//! the first rule that contains a word's tag decides which rule a run
//! belongs to.

use crate::parser::model::{ChunkingSpec, PhraseRule};

/// A phrase covering words `start..end` of a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpan {
    /// Index into the chunker's rules.
    pub rule: usize,
    pub start: usize,
    pub end: usize,
}

impl ChunkSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Phrase chunk detector
#[derive(Debug, Clone)]
pub struct PhraseChunker {
    rules: Vec<PhraseRule>,
    config: ChunkingSpec,
}

impl PhraseChunker {
    pub fn new(rules: Vec<PhraseRule>) -> Self {
        Self {
            rules,
            config: ChunkingSpec::default(),
        }
    }

    /// Create a chunker with custom length limits
    pub fn with_config(mut self, config: ChunkingSpec) -> Self {
        self.config = config;
        self
    }

    pub fn rule_label(&self, rule: usize) -> &str {
        &self.rules[rule].label
    }

    fn rule_for(&self, tag: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.tags.contains(tag))
    }

    /// Extract phrase chunks from one sentence's tags
    ///
    /// Runs longer than the maximum length are cut into consecutive chunks;
    /// chunks shorter than the minimum length are dropped and their words
    /// stay outside any phrase.
    pub fn extract_chunks<S: AsRef<str>>(&self, tags: &[S]) -> Vec<ChunkSpan> {
        let mut chunks = Vec::new();
        let max_length = self.config.max_length.max(1);
        let mut i = 0;

        while i < tags.len() {
            let Some(rule) = self.rule_for(tags[i].as_ref()) else {
                i += 1;
                continue;
            };

            let start = i;
            while i < tags.len() && i - start < max_length && self.rule_for(tags[i].as_ref()) == Some(rule)
            {
                i += 1;
            }

            let span = ChunkSpan {
                rule,
                start,
                end: i,
            };
            if span.len() >= self.config.min_length {
                chunks.push(span);
            }
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(label: &str, tags: &[&str]) -> PhraseRule {
        PhraseRule {
            label: label.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn chunker() -> PhraseChunker {
        PhraseChunker::new(vec![
            rule("NP", &["DT", "JJ", "NN", "NNS", "NNP"]),
            rule("VP", &["VBZ", "VBD", "RB"]),
        ])
    }

    // "The quick brown fox jumps over the lazy dog ."
    const TAGS: [&str; 10] = ["DT", "JJ", "JJ", "NN", "VBZ", "IN", "DT", "JJ", "NN", "."];

    #[test]
    fn test_basic_chunk_extraction() {
        let chunks = chunker().extract_chunks(&TAGS);
        assert_eq!(
            chunks,
            vec![
                ChunkSpan { rule: 0, start: 0, end: 4 },
                ChunkSpan { rule: 1, start: 4, end: 5 },
                ChunkSpan { rule: 0, start: 6, end: 9 },
            ]
        );
    }

    #[test]
    fn test_rule_labels() {
        let c = chunker();
        let labels: Vec<_> = c
            .extract_chunks(&TAGS)
            .iter()
            .map(|s| c.rule_label(s.rule).to_string())
            .collect();
        assert_eq!(labels, vec!["NP", "VP", "NP"]);
    }

    #[test]
    fn test_max_length_splits_runs() {
        let chunks = chunker()
            .with_config(ChunkingSpec {
                min_length: 1,
                max_length: 2,
            })
            .extract_chunks(&TAGS[..4]);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.len() == 2));
    }

    #[test]
    fn test_min_length_drops_short_runs() {
        let chunks = chunker()
            .with_config(ChunkingSpec {
                min_length: 2,
                max_length: 8,
            })
            .extract_chunks(&TAGS);
        assert!(chunks.iter().all(|c| c.len() >= 2));
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn test_no_rules_no_chunks() {
        assert!(PhraseChunker::new(Vec::new()).extract_chunks(&TAGS).is_empty());
    }
}

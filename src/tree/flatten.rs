//! Parse-tree flattening
//!
//! Turns a constituency tree into `label:word` entries for the leaves that
//! survive the stopword and label filters. The label of a leaf is always its
//! parent's label; labels further up the tree are never emitted.
//!
//! Entries are separated by one space, and every sentence is closed with the
//! literal terminator `". "`. Because the separator is written whenever the
//! buffer is non-empty, consecutive sentences end up separated by `".  "`.
//! Downstream consumers rely on this exact format.

use regex::Regex;

use crate::errors::{ConfigError, ErrorCode};
use crate::nlp::stopwords::{NullStopwords, Stopwords};
use crate::tree::arena::ParseTree;

/// Appended to the buffer after each sentence.
pub const SENTENCE_TERMINATOR: &str = ". ";

/// Label-keep expression that matches everything.
pub const MATCH_ALL_LABELS: &str = ".*";

/// Regular expression a leaf's parent label must fully match.
#[derive(Debug, Clone)]
pub struct LabelPattern {
    source: String,
    regex: Option<Regex>,
}

impl Default for LabelPattern {
    fn default() -> Self {
        Self::match_all()
    }
}

impl LabelPattern {
    pub fn match_all() -> Self {
        Self {
            source: MATCH_ALL_LABELS.to_string(),
            regex: None,
        }
    }

    /// Compile `expr` for whole-string matching. The empty expression and
    /// `.*` keep every label.
    pub fn new(expr: &str) -> Result<Self, ConfigError> {
        if expr.is_empty() || expr == MATCH_ALL_LABELS {
            return Ok(Self::match_all());
        }

        let regex = Regex::new(&format!("^(?:{expr})$")).map_err(|e| {
            ConfigError::new(
                ErrorCode::InvalidRegex,
                "/label_pattern",
                format!("invalid label expression \"{expr}\": {e}"),
            )
        })?;

        Ok(Self {
            source: expr.to_string(),
            regex: Some(regex),
        })
    }

    pub fn matches(&self, label: &str) -> bool {
        self.regex.as_ref().map_or(true, |re| re.is_match(label))
    }

    pub fn is_match_all(&self) -> bool {
        self.regex.is_none()
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Flattens parse trees with a fixed set of filters.
#[derive(Clone, Copy)]
pub struct TreeFlattener<'a> {
    stopwords: &'a dyn Stopwords,
    labels: &'a LabelPattern,
    suppress_label_prefixes: bool,
}

impl<'a> TreeFlattener<'a> {
    pub fn new(stopwords: &'a dyn Stopwords, labels: &'a LabelPattern) -> Self {
        Self {
            stopwords,
            labels,
            suppress_label_prefixes: false,
        }
    }

    /// Emit bare words instead of `label:word`.
    pub fn with_suppressed_prefixes(mut self, suppress: bool) -> Self {
        self.suppress_label_prefixes = suppress;
        self
    }

    /// Append one sentence's entries and its terminator to `buffer`.
    pub fn flatten_into(&self, tree: &ParseTree, buffer: &mut String) {
        for leaf in tree.tagged_leaves() {
            if self.stopwords.is_stopword(leaf.word) {
                continue;
            }
            if !self.labels.matches(leaf.label) {
                continue;
            }
            if !buffer.is_empty() {
                buffer.push(' ');
            }
            if !self.suppress_label_prefixes {
                buffer.push_str(leaf.label);
                buffer.push(':');
            }
            buffer.push_str(leaf.word);
        }
        buffer.push_str(SENTENCE_TERMINATOR);
    }

    /// Flatten a whole document, one tree per sentence, and trim the result.
    pub fn flatten_document<'t>(&self, trees: impl IntoIterator<Item = &'t ParseTree>) -> String {
        let mut buffer = String::new();
        for tree in trees {
            self.flatten_into(tree, &mut buffer);
        }
        buffer.trim().to_string()
    }
}

/// Flatten a single sentence tree.
///
/// `stopwords` defaults to accepting everything and `labels` to match-all.
pub fn flatten(
    tree: &ParseTree,
    stopwords: Option<&dyn Stopwords>,
    labels: Option<&LabelPattern>,
    suppress_label_prefixes: bool,
) -> String {
    let match_all = LabelPattern::match_all();
    TreeFlattener::new(stopwords.unwrap_or(&NullStopwords), labels.unwrap_or(&match_all))
        .with_suppressed_prefixes(suppress_label_prefixes)
        .flatten_document([tree])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::stopwords::StopwordFilter;

    fn tree(text: &str) -> ParseTree {
        ParseTree::from_bracketed(text).unwrap()
    }

    fn dog_runs() -> ParseTree {
        tree(r#"(S (NP (DT "The") (NN "dog")) (VP (VBZ "runs")))"#)
    }

    #[test]
    fn test_end_to_end_example() {
        assert_eq!(flatten(&dog_runs(), None, None, false), "DT:The NN:dog VBZ:runs.");
    }

    #[test]
    fn test_flatten_into_keeps_terminator_untrimmed() {
        let mut buffer = String::new();
        let labels = LabelPattern::match_all();
        TreeFlattener::new(&NullStopwords, &labels).flatten_into(&dog_runs(), &mut buffer);
        assert_eq!(buffer, "DT:The NN:dog VBZ:runs. ");
    }

    #[test]
    fn test_suppressed_prefixes() {
        assert_eq!(flatten(&dog_runs(), None, None, true), "The dog runs.");
    }

    #[test]
    fn test_flattening_is_repeatable() {
        let t = dog_runs();
        assert_eq!(flatten(&t, None, None, false), flatten(&t, None, None, false));
    }

    #[test]
    fn test_stopwords_are_dropped() {
        let stopwords = StopwordFilter::from_list(&["the"]);
        let out = flatten(&dog_runs(), Some(&stopwords), None, true);
        assert_eq!(out, "dog runs.");
        assert!(!out.split_whitespace().any(|w| w.eq_ignore_ascii_case("the")));
    }

    #[test]
    fn test_label_pattern_is_whole_match() {
        let labels = LabelPattern::new("NN").unwrap();
        let t = tree("(S (NP (NN dog) (NNS cats)) (VP (VBZ runs)))");
        assert_eq!(flatten(&t, None, Some(&labels), false), "NN:dog.");

        let labels = LabelPattern::new("NN.*|VBZ").unwrap();
        assert_eq!(
            flatten(&t, None, Some(&labels), false),
            "NN:dog NNS:cats VBZ:runs."
        );
    }

    #[test]
    fn test_only_parent_label_is_used() {
        // "dog" sits directly under NP; NP is its label, S is never emitted.
        let t = tree("(S (NP dog (JJ big)))");
        assert_eq!(flatten(&t, None, None, false), "NP:dog JJ:big.");
    }

    #[test]
    fn test_multiple_sentences_use_double_space() {
        let labels = LabelPattern::match_all();
        let flattener = TreeFlattener::new(&NullStopwords, &labels);
        let first = dog_runs();
        let second = tree("(S (NP (PRP It)) (VP (VBZ barks)))");
        assert_eq!(
            flattener.flatten_document([&first, &second]),
            "DT:The NN:dog VBZ:runs.  PRP:It VBZ:barks."
        );
    }

    #[test]
    fn test_fully_filtered_sentence_still_terminates() {
        let labels = LabelPattern::new("XX").unwrap();
        let flattener = TreeFlattener::new(&NullStopwords, &labels);
        let t = dog_runs();
        assert_eq!(flattener.flatten_document([&t]), ".");
        assert_eq!(flattener.flatten_document([&t, &t]), ". .");
    }

    #[test]
    fn test_root_leaf_only_emits_terminator() {
        let t = ParseTree::leaf("word");
        assert_eq!(flatten(&t, None, None, false), ".");
    }

    #[test]
    fn test_empty_document() {
        let labels = LabelPattern::match_all();
        let flattener = TreeFlattener::new(&NullStopwords, &labels);
        assert_eq!(flattener.flatten_document(std::iter::empty::<&ParseTree>()), "");
    }

    #[test]
    fn test_label_pattern_defaults() {
        assert!(LabelPattern::new("").unwrap().is_match_all());
        assert!(LabelPattern::new(".*").unwrap().is_match_all());
        assert!(!LabelPattern::new("NN").unwrap().is_match_all());
        assert_eq!(LabelPattern::new("").unwrap().as_str(), ".*");
    }

    #[test]
    fn test_invalid_label_pattern() {
        let err = LabelPattern::new("NN(").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRegex);
    }
}

//! Lexicon tagger with phrase chunking.
//!
//! Each word is tagged independently, then runs of tags are grouped into
//! phrases by the model's phrase rules. The resulting tree always has the
//! shape `(ROOT (S (NP (DT The) (NN dog)) (VP (VBZ runs)) (. .)))`: a root,
//! one clause, phrases, and preterminals.

use std::path::Path;

use crate::errors::{ConfigError, ParseError};
use crate::parser::chunker::PhraseChunker;
use crate::parser::model::LexiconModel;
use crate::parser::{Parser, ParserOptions, FALLBACK_LABEL};
use crate::tree::{ParseTree, TreeBuilder};

/// Tag given to numbers.
const NUMBER_TAG: &str = "CD";

/// Tag given to sentence-final punctuation.
const FINAL_PUNCTUATION_TAG: &str = ".";

#[derive(Debug, Clone)]
pub struct LexiconParser {
    model: LexiconModel,
    chunker: PhraseChunker,
    options: ParserOptions,
}

fn is_number(word: &str) -> bool {
    let digits: String = word.chars().filter(|&c| c != ',').collect();
    !digits.is_empty()
        && digits.chars().any(|c| c.is_ascii_digit())
        && digits.parse::<f64>().is_ok()
}

fn is_punctuation(word: &str) -> bool {
    word.chars().all(|c| c.is_ascii_punctuation())
}

impl LexiconParser {
    pub fn new(model: LexiconModel, options: ParserOptions) -> Self {
        let chunker = PhraseChunker::new(model.phrases.clone()).with_config(model.chunking);
        Self {
            model,
            chunker,
            options,
        }
    }

    /// Load the model at `path`.
    pub fn from_path(path: &Path, options: ParserOptions) -> Result<Self, ConfigError> {
        Ok(Self::new(LexiconModel::load(path)?, options))
    }

    pub fn model(&self) -> &LexiconModel {
        &self.model
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    fn default_tag(&self) -> &str {
        self.options
            .default_tag
            .as_deref()
            .unwrap_or(&self.model.default_tag)
    }

    fn lookup(&self, word: &str) -> Option<&str> {
        self.model
            .lexicon
            .get(word)
            .or_else(|| self.model.lexicon.get(&word.to_lowercase()))
            .map(String::as_str)
    }

    /// Tag one word. `position` is the word's index in its sentence.
    pub fn tag_word<'s>(&'s self, word: &'s str, position: usize) -> &'s str {
        if let Some(tag) = self.lookup(word) {
            return tag;
        }
        if is_punctuation(word) {
            return match word {
                "." | "!" | "?" => FINAL_PUNCTUATION_TAG,
                _ => word,
            };
        }
        if is_number(word) {
            return NUMBER_TAG;
        }

        let folded;
        let matched_form = if self.options.case_insensitive {
            folded = word.to_lowercase();
            folded.as_str()
        } else {
            word
        };
        if let Some(rule) = self.model.suffix_rules.iter().find(|r| {
            matched_form.len() > r.suffix.len() && matched_form.ends_with(r.suffix.as_str())
        }) {
            return &rule.tag;
        }

        if !self.options.case_insensitive && position > 0 {
            let capitalized = word.chars().next().map_or(false, char::is_uppercase);
            if let (true, Some(tag)) = (capitalized, self.model.proper_noun_tag.as_deref()) {
                return tag;
            }
        }

        self.default_tag()
    }

    /// Tags for a whole sentence.
    pub fn tag_sentence<'s>(&'s self, words: &'s [String]) -> Vec<&'s str> {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| self.tag_word(w, i))
            .collect()
    }

    fn fallback_tree(words: &[String]) -> ParseTree {
        let mut builder = TreeBuilder::new(FALLBACK_LABEL);
        for word in words {
            builder.push_preterminal(builder.root(), FALLBACK_LABEL, word.as_str());
        }
        builder.build()
    }
}

impl Parser for LexiconParser {
    fn parse(&self, words: &[String]) -> Result<ParseTree, ParseError> {
        if words.is_empty() {
            return Ok(ParseTree::leaf(self.model.root_label.as_str()));
        }
        if let Some(position) = words.iter().position(String::is_empty) {
            return Err(ParseError::Failed(format!("empty word at position {position}")));
        }
        if let Some(max_length) = self.options.max_length {
            if words.len() > max_length {
                tracing::debug!(
                    words = words.len(),
                    max_length,
                    "sentence too long, using flat fallback tree"
                );
                return Ok(Self::fallback_tree(words));
            }
        }

        let tags = self.tag_sentence(words);
        let chunks = self.chunker.extract_chunks(&tags);

        let mut builder = TreeBuilder::new(self.model.root_label.as_str());
        let clause = builder.push(builder.root(), self.model.clause_label.as_str());

        let mut chunks = chunks.into_iter().peekable();
        let mut i = 0;
        while i < words.len() {
            match chunks.next_if(|c| c.start == i) {
                Some(chunk) => {
                    let phrase = builder.push(clause, self.chunker.rule_label(chunk.rule));
                    for j in chunk.start..chunk.end {
                        builder.push_preterminal(phrase, tags[j], words[j].as_str());
                    }
                    i = chunk.end;
                }
                None => {
                    builder.push_preterminal(clause, tags[i], words[i].as_str());
                    i += 1;
                }
            }
        }

        Ok(builder.build())
    }
}

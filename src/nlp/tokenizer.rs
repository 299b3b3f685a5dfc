//! Sentence tokenizers
//!
//! A tokenizer turns one sentence into a finite stream of words. Three
//! variants are built in and selected by spec string:
//!
//! - `whitespace`: split on whitespace
//! - `word [-delimiters <chars>]`: split on a set of delimiter characters
//! - `ptb [-no-normalize-brackets]`: Penn Treebank style, on Unicode word
//!   boundaries

use unicode_segmentation::UnicodeSegmentation;

use crate::errors::{ConfigError, ErrorCode};
use crate::nlp::options::{join_options, OptionArgs, Registry};

/// Delimiters of the word tokenizer when none are given.
pub const DEFAULT_DELIMITERS: &str = " \r\n\t.,;:'\"()?!";

/// Tokenizer spec used when none is configured.
pub const DEFAULT_TOKENIZER: &str = "word";

/// Words of one sentence. Consumed once, in order.
#[derive(Debug)]
pub struct Tokens {
    inner: std::vec::IntoIter<String>,
}

impl Tokens {
    pub fn new(words: Vec<String>) -> Self {
        Self {
            inner: words.into_iter(),
        }
    }
}

impl Iterator for Tokens {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Tokens {}

/// Splits a sentence into words.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Tokens;

    /// Spec string that recreates this tokenizer.
    fn spec(&self) -> String;
}

/// Splits on Unicode whitespace; empty tokens are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Tokens {
        Tokens::new(text.split_whitespace().map(str::to_string).collect())
    }

    fn spec(&self) -> String {
        "whitespace".to_string()
    }
}

/// Splits on any of a set of delimiter characters; delimiters themselves are
/// discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordTokenizer {
    delimiters: String,
}

impl Default for WordTokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITERS)
    }
}

impl WordTokenizer {
    pub fn new(delimiters: impl Into<String>) -> Self {
        Self {
            delimiters: delimiters.into(),
        }
    }

    pub fn delimiters(&self) -> &str {
        &self.delimiters
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Tokens {
        Tokens::new(
            text.split(|c: char| self.delimiters.contains(c))
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    fn spec(&self) -> String {
        if self.delimiters == DEFAULT_DELIMITERS {
            DEFAULT_TOKENIZER.to_string()
        } else {
            join_options(&[DEFAULT_TOKENIZER, "-delimiters", self.delimiters.as_str()])
        }
    }
}

/// Penn Treebank style tokenizer.
///
/// Words and punctuation are separated on Unicode word boundaries, English
/// clitics are split off the word they attach to (`don't` becomes `do n't`),
/// and brackets are rewritten to their treebank names unless disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PtbTokenizer {
    normalize_brackets: bool,
}

impl Default for PtbTokenizer {
    fn default() -> Self {
        Self {
            normalize_brackets: true,
        }
    }
}

const CLITICS: [&str; 6] = ["'s", "'re", "'ll", "'ve", "'d", "'m"];

fn bracket_name(token: &str) -> Option<&'static str> {
    match token {
        "(" => Some("-LRB-"),
        ")" => Some("-RRB-"),
        "{" => Some("-LCB-"),
        "}" => Some("-RCB-"),
        "[" => Some("-LSB-"),
        "]" => Some("-RSB-"),
        _ => None,
    }
}

/// Byte offset where a trailing clitic starts, if `word` ends in one.
fn clitic_start(word: &str) -> Option<usize> {
    let folded = word.to_lowercase().replace('\u{2019}', "'");
    // Lowercasing can change byte lengths; only split when it did not.
    if folded.len() != word.len() {
        return None;
    }
    if folded.len() > 3 && folded.ends_with("n't") {
        return Some(word.len() - 3);
    }
    CLITICS
        .iter()
        .find(|c| folded.len() > c.len() && folded.ends_with(*c))
        .map(|c| word.len() - c.len())
}

impl PtbTokenizer {
    pub fn new(normalize_brackets: bool) -> Self {
        Self { normalize_brackets }
    }

    fn push_token(&self, token: &str, out: &mut Vec<String>) {
        if self.normalize_brackets {
            if let Some(name) = bracket_name(token) {
                out.push(name.to_string());
                return;
            }
        }
        match clitic_start(token) {
            Some(at) if token.is_char_boundary(at) => {
                out.push(token[..at].to_string());
                out.push(token[at..].to_string());
            }
            _ => out.push(token.to_string()),
        }
    }
}

impl Tokenizer for PtbTokenizer {
    fn tokenize(&self, text: &str) -> Tokens {
        let mut out = Vec::new();
        for segment in text.split_word_bounds() {
            if segment.trim().is_empty() {
                continue;
            }
            self.push_token(segment, &mut out);
        }
        Tokens::new(out)
    }

    fn spec(&self) -> String {
        if self.normalize_brackets {
            "ptb".to_string()
        } else {
            "ptb -no-normalize-brackets".to_string()
        }
    }
}

// ─── Registry ───────────────────────────────────────────────────────────────

fn whitespace_factory(args: OptionArgs) -> Result<Box<dyn Tokenizer>, String> {
    args.finish()?;
    Ok(Box::new(WhitespaceTokenizer))
}

fn word_factory(mut args: OptionArgs) -> Result<Box<dyn Tokenizer>, String> {
    let delimiters = args.take_value("delimiters")?;
    args.finish()?;
    Ok(Box::new(match delimiters {
        Some(d) if d.is_empty() => return Err("-delimiters must not be empty".to_string()),
        Some(d) => WordTokenizer::new(d),
        None => WordTokenizer::default(),
    }))
}

fn ptb_factory(mut args: OptionArgs) -> Result<Box<dyn Tokenizer>, String> {
    let keep_brackets = args.take_flag("no-normalize-brackets");
    args.finish()?;
    Ok(Box::new(PtbTokenizer::new(!keep_brackets)))
}

/// The built-in tokenizers.
pub fn tokenizer_registry() -> Registry<dyn Tokenizer> {
    Registry::new("tokenizer", ErrorCode::InvalidTokenizer)
        .with("whitespace", whitespace_factory)
        .with("word", word_factory)
        .with("ptb", ptb_factory)
}

/// Build a tokenizer from a spec string. An empty spec selects the default
/// word tokenizer.
pub fn tokenizer_from_spec(spec: &str) -> Result<Box<dyn Tokenizer>, ConfigError> {
    if spec.trim().is_empty() {
        return Ok(Box::new(WordTokenizer::default()));
    }
    tokenizer_registry().create(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(tokenizer: &dyn Tokenizer, text: &str) -> Vec<String> {
        tokenizer.tokenize(text).collect()
    }

    #[test]
    fn test_whitespace_drops_empty_tokens() {
        assert_eq!(
            words(&WhitespaceTokenizer, "  The  dog\truns.\n"),
            vec!["The", "dog", "runs."]
        );
        assert!(words(&WhitespaceTokenizer, "   ").is_empty());
    }

    #[test]
    fn test_word_tokenizer_default_delimiters() {
        assert_eq!(
            words(&WordTokenizer::default(), "Hello, world! (It's \"fine\")?"),
            vec!["Hello", "world", "It", "s", "fine"]
        );
    }

    #[test]
    fn test_word_tokenizer_custom_delimiters() {
        let t = WordTokenizer::new("-");
        assert_eq!(words(&t, "a-b--c d"), vec!["a", "b", "c d"]);
    }

    #[test]
    fn test_tokens_is_consumed_once() {
        let mut tokens = WhitespaceTokenizer.tokenize("a b");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens.next().as_deref(), Some("a"));
        assert_eq!(tokens.next().as_deref(), Some("b"));
        assert_eq!(tokens.next(), None);
    }

    #[test]
    fn test_ptb_splits_punctuation_and_clitics() {
        let t = PtbTokenizer::default();
        assert_eq!(
            words(&t, "I don't like John's dog."),
            vec!["I", "do", "n't", "like", "John", "'s", "dog", "."]
        );
        assert_eq!(words(&t, "We'll see"), vec!["We", "'ll", "see"]);
    }

    #[test]
    fn test_ptb_brackets() {
        assert_eq!(
            words(&PtbTokenizer::default(), "(a) [b]"),
            vec!["-LRB-", "a", "-RRB-", "-LSB-", "b", "-RSB-"]
        );
        assert_eq!(
            words(&PtbTokenizer::new(false), "(a)"),
            vec!["(", "a", ")"]
        );
    }

    #[test]
    fn test_registry_specs() {
        let t = tokenizer_from_spec("").unwrap();
        assert_eq!(t.spec(), "word");

        let t = tokenizer_from_spec("whitespace").unwrap();
        assert_eq!(words(t.as_ref(), "a  b"), vec!["a", "b"]);

        let t = tokenizer_from_spec(r#"word -delimiters "; ""#).unwrap();
        assert_eq!(words(t.as_ref(), "a;b c"), vec!["a", "b", "c"]);
        assert_eq!(t.spec(), r#"word -delimiters "; ""#);

        let t = tokenizer_from_spec("ptb -no-normalize-brackets").unwrap();
        assert_eq!(t.spec(), "ptb -no-normalize-brackets");
    }

    #[test]
    fn test_spec_recreates_tokenizer() {
        let custom = WordTokenizer::new(" \t|");
        let rebuilt = tokenizer_from_spec(&custom.spec()).unwrap();
        assert_eq!(words(rebuilt.as_ref(), "a|b\tc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_bad_specs() {
        for spec in ["nope", "whitespace -x", "word -delimiters", "word -delimiters \"\""] {
            let err = tokenizer_from_spec(spec).err().unwrap();
            assert_eq!(err.code, ErrorCode::InvalidTokenizer, "{spec}");
        }
    }
}

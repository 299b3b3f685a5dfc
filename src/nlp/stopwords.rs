//! Stopword sources for the flattener.
//!
//! Built-in lists come from the `stop-words` crate, with small hand-kept
//! lists for Chinese and Japanese. Custom lists can be given inline or read
//! from a file. Stopword sources are selected with a spec string through
//! [`stopwords_from_spec`].

use std::path::Path;

use rustc_hash::FxHashSet;
use stop_words::{get, LANGUAGE};

use crate::errors::{ConfigError, ErrorCode};
use crate::nlp::options::{join_options, OptionArgs, Registry};

/// Stopword spec used when none is configured.
pub const DEFAULT_STOPWORDS: &str = "null";

/// Decides whether a word is dropped before flattening.
pub trait Stopwords: Send + Sync {
    fn is_stopword(&self, word: &str) -> bool;

    /// Spec string that recreates this source.
    fn spec(&self) -> String;
}

/// Accepts every word as a non-stopword.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStopwords;

impl Stopwords for NullStopwords {
    fn is_stopword(&self, _word: &str) -> bool {
        false
    }

    fn spec(&self) -> String {
        DEFAULT_STOPWORDS.to_string()
    }
}

/// Where a [`StopwordFilter`]'s words came from, kept for [`Stopwords::spec`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Language(String),
    List,
    File(String),
}

/// A set of stopwords loaded from a language list, an inline list, or a file.
#[derive(Debug, Clone)]
pub struct StopwordFilter {
    /// Lowercased unless `case_sensitive`.
    stopwords: FxHashSet<String>,
    case_sensitive: bool,
    source: Source,
}

impl Default for StopwordFilter {
    fn default() -> Self {
        Self::new("en")
    }
}

impl StopwordFilter {
    /// The built-in list for a language code or name.
    ///
    /// Supported languages: en, de, fr, es, it, pt, nl, ru, sv, no, da, fi,
    /// hu, tr, pl, ar, ja, zh. Unknown codes fall back to English; spec strings
    /// go through [`StopwordFilter::for_language`] and reject them instead.
    pub fn new(language: &str) -> Self {
        Self::for_language(language).unwrap_or_else(|| {
            tracing::warn!(language, "no stopword list for language, using English");
            let english = get(LANGUAGE::English).iter().map(|s| s.to_string()).collect();
            Self::with_words(english, language)
        })
    }

    /// The built-in list for a language code or name, or `None` when the
    /// language has no list.
    pub fn for_language(language: &str) -> Option<Self> {
        Self::load_stopwords(language).map(|words| Self::with_words(words, language))
    }

    fn with_words(stopwords: FxHashSet<String>, language: &str) -> Self {
        Self {
            stopwords,
            case_sensitive: false,
            source: Source::Language(language.to_string()),
        }
    }

    /// A filter that removes nothing until words are added.
    pub fn empty() -> Self {
        Self::from_list(&[])
    }

    /// An inline list; words are lowercased.
    pub fn from_list(words: &[&str]) -> Self {
        Self {
            stopwords: words.iter().map(|w| w.to_lowercase()).collect(),
            case_sensitive: false,
            source: Source::List,
        }
    }

    /// Read one stopword per line. Blank lines and lines starting with `#`
    /// are ignored.
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let words: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();

        let mut filter = Self::from_list(&words);
        filter.source = Source::File(path.display().to_string());
        Ok(filter)
    }

    /// Words added after this call are stored as given when
    /// `case_sensitive` is set.
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    fn normalize(&self, word: &str) -> String {
        if self.case_sensitive {
            word.to_string()
        } else {
            word.to_lowercase()
        }
    }

    pub fn add_stopwords(&mut self, words: &[&str]) {
        for word in words {
            let word = self.normalize(word);
            self.stopwords.insert(word);
        }
    }

    pub fn remove_stopwords(&mut self, words: &[&str]) {
        for word in words {
            let word = self.normalize(word);
            self.stopwords.remove(&word);
        }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        if self.case_sensitive {
            self.stopwords.contains(word)
        } else {
            self.stopwords.contains(&word.to_lowercase())
        }
    }

    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }

    fn load_stopwords(language: &str) -> Option<FxHashSet<String>> {
        let lang = match language.to_lowercase().as_str() {
            "en" | "english" => LANGUAGE::English,
            "de" | "german" => LANGUAGE::German,
            "fr" | "french" => LANGUAGE::French,
            "es" | "spanish" => LANGUAGE::Spanish,
            "it" | "italian" => LANGUAGE::Italian,
            "pt" | "portuguese" => LANGUAGE::Portuguese,
            "nl" | "dutch" => LANGUAGE::Dutch,
            "ru" | "russian" => LANGUAGE::Russian,
            "sv" | "swedish" => LANGUAGE::Swedish,
            "no" | "norwegian" => LANGUAGE::Norwegian,
            "da" | "danish" => LANGUAGE::Danish,
            "fi" | "finnish" => LANGUAGE::Finnish,
            "hu" | "hungarian" => LANGUAGE::Hungarian,
            "tr" | "turkish" => LANGUAGE::Turkish,
            "pl" | "polish" => LANGUAGE::Polish,
            "ar" | "arabic" => LANGUAGE::Arabic,
            "zh" | "chinese" => return Some(Self::chinese_stopwords()),
            "ja" | "japanese" => return Some(Self::japanese_stopwords()),
            _ => return None,
        };

        Some(get(lang).iter().map(|s| s.to_string()).collect())
    }

    /// Frequent Chinese function words.
    fn chinese_stopwords() -> FxHashSet<String> {
        [
            "的", "是", "在", "有", "和", "与", "或", "不", "了", "也", "就", "都", "而", "及",
            "这", "那", "个", "为", "以", "等", "但", "被", "给", "让", "把", "从", "到", "对",
            "将", "于", "能", "会", "可", "要", "很", "还", "更", "最", "只", "已", "又", "再",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    /// Frequent Japanese particles and auxiliaries.
    fn japanese_stopwords() -> FxHashSet<String> {
        [
            "の", "に", "は", "を", "た", "が", "で", "て", "と", "し", "れ", "さ", "ある", "いる",
            "も", "する", "から", "な", "こと", "として", "い", "や", "など", "なっ", "ない",
            "この", "ため", "その", "あっ", "よう", "また", "もの", "という", "あり", "まで",
            "られ", "なる", "へ", "か", "だ", "これ", "によって", "により", "おり",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn sorted_words(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.stopwords.iter().map(String::as_str).collect();
        words.sort_unstable();
        words
    }
}

impl Stopwords for StopwordFilter {
    fn is_stopword(&self, word: &str) -> bool {
        StopwordFilter::is_stopword(self, word)
    }

    fn spec(&self) -> String {
        let mut words = match &self.source {
            Source::Language(code) => vec!["language".to_string(), code.clone()],
            Source::File(path) => vec!["file".to_string(), path.clone()],
            Source::List => vec!["list".to_string(), self.sorted_words().join(",")],
        };
        if self.case_sensitive {
            words.push("-case-sensitive".to_string());
        }
        join_options(&words)
    }
}

// ─── Registry ───────────────────────────────────────────────────────────────

fn null_factory(args: OptionArgs) -> Result<Box<dyn Stopwords>, String> {
    args.finish()?;
    Ok(Box::new(NullStopwords))
}

fn language_factory(mut args: OptionArgs) -> Result<Box<dyn Stopwords>, String> {
    let case_sensitive = args.take_flag("case-sensitive");
    let code = args.take_positional().ok_or("missing language code")?;
    args.finish()?;
    let filter = StopwordFilter::for_language(&code)
        .ok_or_else(|| format!("unknown stopword language \"{code}\""))?;
    Ok(Box::new(filter.with_case_sensitive(case_sensitive)))
}

fn list_factory(mut args: OptionArgs) -> Result<Box<dyn Stopwords>, String> {
    let case_sensitive = args.take_flag("case-sensitive");
    let list = args.take_positional().ok_or("missing comma-separated word list")?;
    args.finish()?;

    let words: Vec<&str> = list
        .split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .collect();
    let mut filter = StopwordFilter::from_list(&[]).with_case_sensitive(case_sensitive);
    filter.add_stopwords(&words);
    Ok(Box::new(filter))
}

fn file_factory(mut args: OptionArgs) -> Result<Box<dyn Stopwords>, String> {
    let case_sensitive = args.take_flag("case-sensitive");
    let path = args.take_positional().ok_or("missing stopword file path")?;
    args.finish()?;

    let filter = if case_sensitive {
        let text = std::fs::read_to_string(&path)
            .map_err(|e| format!("cannot read stopword file {path}: {e}"))?;
        let words: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();
        let mut filter = StopwordFilter::from_list(&[]).with_case_sensitive(true);
        filter.add_stopwords(&words);
        filter.source = Source::File(path);
        filter
    } else {
        StopwordFilter::from_file(&path)
            .map_err(|e| format!("cannot read stopword file {path}: {e}"))?
    };
    Ok(Box::new(filter))
}

/// The built-in stopword sources.
pub fn stopword_registry() -> Registry<dyn Stopwords> {
    Registry::new("stopwords", ErrorCode::InvalidStopwords)
        .with("null", null_factory)
        .with("language", language_factory)
        .with("list", list_factory)
        .with("file", file_factory)
}

/// Build a stopword source from a spec string such as `language en` or
/// `file stop.txt -case-sensitive`. An empty spec means [`NullStopwords`].
pub fn stopwords_from_spec(spec: &str) -> Result<Box<dyn Stopwords>, ConfigError> {
    if spec.trim().is_empty() {
        return Ok(Box::new(NullStopwords));
    }
    stopword_registry().create(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_language_list_ignores_case() {
        let english = StopwordFilter::new("english");
        for word in ["the", "THE", "and", "Of"] {
            assert!(english.is_stopword(word), "{word}");
        }
        assert!(!english.is_stopword("parser"));
        assert_eq!(english.spec(), "language english");
    }

    #[test]
    fn test_inline_list_edits() {
        let mut list = StopwordFilter::from_list(&["Alpha", "beta"]);
        assert_eq!(list.len(), 2);
        assert!(list.is_stopword("ALPHA"));

        list.add_stopwords(&["Gamma"]);
        list.remove_stopwords(&["BETA"]);
        assert!(list.is_stopword("gamma"));
        assert!(!list.is_stopword("beta"));
        assert_eq!(list.spec(), "list alpha,gamma");
    }

    #[test]
    fn test_empty_list_removes_nothing() {
        let none = StopwordFilter::empty();
        assert!(none.is_empty());
        assert!(!Stopwords::is_stopword(&none, "a"));
    }

    #[test]
    fn test_case_sensitive_language_list() {
        let strict = StopwordFilter::new("de").with_case_sensitive(true);
        assert!(strict.is_stopword("und"));
        assert!(!strict.is_stopword("Und"));
    }

    #[test]
    fn test_cjk_stopwords() {
        assert!(StopwordFilter::new("zh").is_stopword("的"));
        assert!(!StopwordFilter::new("zh").is_stopword("机器"));
        assert!(StopwordFilter::new("ja").is_stopword("の"));
    }

    #[test]
    fn test_null_stopwords() {
        assert!(!NullStopwords.is_stopword("the"));
        assert_eq!(NullStopwords.spec(), "null");
    }

    #[test]
    fn test_from_file_skips_comments_and_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# my list\nAlpha\n\n  beta  \n#gamma").unwrap();

        let filter = StopwordFilter::from_file(file.path()).unwrap();
        assert_eq!(filter.len(), 2);
        assert!(filter.is_stopword("alpha"));
        assert!(filter.is_stopword("BETA"));
        assert!(!filter.is_stopword("gamma"));
    }

    #[test]
    fn test_spec_strings() {
        let sw = stopwords_from_spec("language en").unwrap();
        assert!(sw.is_stopword("The"));
        assert_eq!(sw.spec(), "language en");

        let sw = stopwords_from_spec("list \"Foo, bar\" -case-sensitive").unwrap();
        assert!(sw.is_stopword("Foo"));
        assert!(!sw.is_stopword("foo"));
        assert_eq!(sw.spec(), "list Foo,bar -case-sensitive");

        let sw = stopwords_from_spec("").unwrap();
        assert!(!sw.is_stopword("the"));

        let sw = stopwords_from_spec("NULL").unwrap();
        assert_eq!(sw.spec(), "null");
    }

    #[test]
    fn test_file_spec() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Dog").unwrap();
        let path = file.path().display().to_string();

        let sw = stopwords_from_spec(&format!("file {}", join_options(&[&path]))).unwrap();
        assert!(sw.is_stopword("dog"));

        let sw =
            stopwords_from_spec(&format!("file {} -case-sensitive", join_options(&[&path])))
                .unwrap();
        assert!(sw.is_stopword("Dog"));
        assert!(!sw.is_stopword("dog"));
    }

    #[test]
    fn test_unknown_language_is_a_config_error() {
        for spec in ["language klingon", "language eng -case-sensitive"] {
            let err = stopwords_from_spec(spec).err().unwrap();
            assert_eq!(err.code, ErrorCode::InvalidStopwords, "{spec}");
            assert!(err.message.contains("unknown stopword language"), "{}", err.message);
        }
        assert!(StopwordFilter::for_language("klingon").is_none());

        // Direct construction keeps the English fallback.
        let fallback = StopwordFilter::new("klingon");
        assert!(fallback.is_stopword("the"));
        assert_eq!(fallback.spec(), "language klingon");
    }

    #[test]
    fn test_bad_specs() {
        for spec in ["unknown", "language", "list", "file /no/such/stopwords.txt", "null -x"] {
            let err = stopwords_from_spec(spec).err().unwrap();
            assert_eq!(err.code, ErrorCode::InvalidStopwords, "{spec}");
        }
    }
}

//! Spec strings and named component registries.
//!
//! Tokenizers, stopword lists, and parser options are configured with a
//! single string such as `word -delimiters " .,"` or `file stop.txt
//! -case-sensitive`. The first word names the component; the remaining words
//! are its arguments. Components are looked up in an explicit [`Registry`]
//! of names to constructors.

use crate::errors::{ConfigError, ErrorCode};

/// Split an option string into words.
///
/// Words are separated by whitespace. Double or single quotes group a word
/// and backslash escapes the next character inside or outside quotes.
pub fn split_options(input: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (_, '\\') => match chars.next() {
                Some(escaped) => {
                    current.push(escaped);
                    in_word = true;
                }
                None => return Err("dangling escape at end of options".to_string()),
            },
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"') | (None, '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {q} quote in options"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Join words back into an option string that [`split_options`] reads
/// back unchanged.
pub fn join_options<S: AsRef<str>>(words: &[S]) -> String {
    words
        .iter()
        .map(|w| {
            let w = w.as_ref();
            if !w.is_empty() && !w.chars().any(|c| c.is_whitespace() || "\"'\\".contains(c)) {
                w.to_string()
            } else {
                let escaped: String = w
                    .chars()
                    .flat_map(|c| match c {
                        '"' | '\\' => vec!['\\', c],
                        _ => vec![c],
                    })
                    .collect();
                format!("\"{escaped}\"")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Flag-style arguments (`-name` or `-name value`) left after the component
/// name. Every option must be consumed; leftovers are reported by
/// [`OptionArgs::finish`].
#[derive(Debug, Clone, Default)]
pub struct OptionArgs {
    args: Vec<Option<String>>,
}

impl OptionArgs {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args: args.into_iter().map(Some).collect(),
        }
    }

    /// Parse an option string directly.
    pub fn parse(input: &str) -> Result<Self, String> {
        split_options(input).map(Self::new)
    }

    fn position(&self, name: &str) -> Option<usize> {
        let flag = format!("-{name}");
        self.args
            .iter()
            .position(|a| a.as_deref() == Some(flag.as_str()))
    }

    /// Remove `-name` and report whether it was present.
    pub fn take_flag(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(i) => {
                self.args[i] = None;
                true
            }
            None => false,
        }
    }

    /// Remove `-name <value>` and return the value.
    pub fn take_value(&mut self, name: &str) -> Result<Option<String>, String> {
        let Some(i) = self.position(name) else {
            return Ok(None);
        };
        self.args[i] = None;
        match self.args.get_mut(i + 1).and_then(Option::take) {
            Some(value) => Ok(Some(value)),
            None => Err(format!("option -{name} requires a value")),
        }
    }

    /// Remove and return the first argument not starting with `-`.
    pub fn take_positional(&mut self) -> Option<String> {
        let i = self
            .args
            .iter()
            .position(|a| matches!(a, Some(v) if !v.starts_with('-') || v == "-"))?;
        self.args[i].take()
    }

    /// Fail if any argument was not consumed.
    pub fn finish(self) -> Result<(), String> {
        let rest: Vec<String> = self.args.into_iter().flatten().collect();
        if rest.is_empty() {
            Ok(())
        } else {
            Err(format!("unrecognized option(s): {}", rest.join(" ")))
        }
    }
}

/// Constructor stored in a [`Registry`].
pub type Factory<T> = fn(OptionArgs) -> Result<Box<T>, String>;

/// Named constructors for one kind of pluggable component.
pub struct Registry<T: ?Sized> {
    kind: &'static str,
    code: ErrorCode,
    entries: Vec<(&'static str, Factory<T>)>,
}

impl<T: ?Sized> Registry<T> {
    /// `kind` is used in error messages (e.g. `"tokenizer"`); `code` is the
    /// error code reported for bad specs.
    pub fn new(kind: &'static str, code: ErrorCode) -> Self {
        Self {
            kind,
            code,
            entries: Vec::new(),
        }
    }

    /// Register `factory` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &'static str, factory: Factory<T>) {
        self.entries.retain(|(n, _)| *n != name);
        self.entries.push((name, factory));
    }

    pub fn with(mut self, name: &'static str, factory: Factory<T>) -> Self {
        self.register(name, factory);
        self
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }

    fn error(&self, message: String) -> ConfigError {
        ConfigError::new(self.code, format!("/{}", self.kind), message).with_hint(format!(
            "Known {}s: {}",
            self.kind,
            self.names().collect::<Vec<_>>().join(", ")
        ))
    }

    /// Build a component from a spec string.
    pub fn create(&self, spec: &str) -> Result<Box<T>, ConfigError> {
        let mut words = split_options(spec)
            .map_err(|e| self.error(format!("invalid {} spec \"{spec}\": {e}", self.kind)))?;

        if words.is_empty() {
            return Err(self.error(format!("invalid {} specification string", self.kind)));
        }
        let name = words.remove(0);

        let factory = self
            .entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
            .map(|(_, f)| *f)
            .ok_or_else(|| self.error(format!("unknown {} \"{name}\"", self.kind)))?;

        factory(OptionArgs::new(words))
            .map_err(|e| self.error(format!("{} \"{name}\": {e}", self.kind)))
    }
}

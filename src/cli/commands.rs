//! Subcommands and their flags.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use treeflat::nlp::stopwords::DEFAULT_STOPWORDS;
use treeflat::nlp::tokenizer::DEFAULT_TOKENIZER;
use treeflat::range::ALL_ATTRIBUTES;
use treeflat::tree::flatten::MATCH_ALL_LABELS;
use treeflat::{ChangeCaseOptions, TaggingOptions};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lower- or upper-case string attributes of a dataset
    ChangeCase(ChangeCaseArgs),

    /// Replace string attributes with their flattened parse trees
    PosTag(PosTagArgs),

    /// Run the filter described by a JSON spec file
    Run(RunArgs),

    /// Check a JSON spec file and print every diagnostic
    Validate(ValidateArgs),

    /// Print the parse tree of every sentence of a text
    Parse(ParseArgs),

    /// Flatten bracketed trees read from a file or stdin
    Flatten(FlattenArgs),
}

/// Where the dataset comes from and goes to.
#[derive(Args, Debug)]
pub struct DatasetArgs {
    /// Input dataset (JSON)
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    /// Output dataset; printed to stdout when omitted
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ChangeCaseArgs {
    #[command(flatten)]
    pub io: DatasetArgs,

    /// Attributes to process, e.g. first-3,5,last
    #[arg(long, short = 'R', default_value = ALL_ATTRIBUTES)]
    pub range: String,

    /// Process the attributes outside the range instead
    #[arg(long)]
    pub invert: bool,

    /// Upper-case instead of lower-case
    #[arg(long)]
    pub uppercase: bool,
}

impl From<ChangeCaseArgs> for ChangeCaseOptions {
    fn from(a: ChangeCaseArgs) -> Self {
        ChangeCaseOptions {
            range: a.range,
            invert: a.invert,
            uppercase: a.uppercase,
            ..ChangeCaseOptions::default()
        }
    }
}

/// Tokenizer and parser settings shared by `pos-tag` and `parse`.
#[derive(Args, Debug)]
pub struct ParserArgs {
    /// Parser model file (JSON)
    #[arg(long, short = 'm')]
    pub model: PathBuf,

    /// Tokenizer spec, e.g. "ptb" or "word -delimiters ' .,'"
    #[arg(long, default_value = DEFAULT_TOKENIZER)]
    pub tokenizer: String,

    /// Additional parser options, e.g. "-maxLength 80"
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub additional: String,
}

#[derive(Args, Debug)]
pub struct PosTagArgs {
    #[command(flatten)]
    pub io: DatasetArgs,

    #[command(flatten)]
    pub parser: ParserArgs,

    /// Attributes to process, e.g. first-3,5,last
    #[arg(long, short = 'R', default_value = ALL_ATTRIBUTES)]
    pub range: String,

    /// Process the attributes outside the range instead
    #[arg(long)]
    pub invert: bool,

    /// Emit bare words instead of label:word
    #[arg(long)]
    pub suppress_label_prefixes: bool,

    /// Keep only leaves whose parent label fully matches this expression
    #[arg(long, default_value = MATCH_ALL_LABELS)]
    pub regexp_labels: String,

    /// Stopwords spec, e.g. "language en" or "file stop.txt"
    #[arg(long, default_value = DEFAULT_STOPWORDS)]
    pub stopwords: String,
}

impl From<PosTagArgs> for TaggingOptions {
    fn from(a: PosTagArgs) -> Self {
        TaggingOptions {
            range: a.range,
            invert: a.invert,
            tokenizer: a.parser.tokenizer,
            model: a.parser.model,
            additional: a.parser.additional,
            suppress_label_prefixes: a.suppress_label_prefixes,
            label_pattern: a.regexp_labels,
            stopwords: a.stopwords,
            ..TaggingOptions::default()
        }
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Filter spec (JSON)
    #[arg(long, short = 's')]
    pub spec: PathBuf,

    #[command(flatten)]
    pub io: DatasetArgs,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Filter spec (JSON)
    #[arg(long, short = 's')]
    pub spec: PathBuf,
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    #[command(flatten)]
    pub parser: ParserArgs,

    /// Text to parse
    #[arg(long, conflicts_with = "input")]
    pub text: Option<String>,

    /// Dataset to take the text from
    #[arg(long, short = 'i', requires = "attribute")]
    pub input: Option<PathBuf>,

    /// 0-based row of the dataset
    #[arg(long, default_value_t = 0)]
    pub row: usize,

    /// Attribute of the dataset holding the text
    #[arg(long)]
    pub attribute: Option<String>,

    /// Print single-line bracketed trees instead of outlines
    #[arg(long)]
    pub bracketed: bool,
}

#[derive(Args, Debug)]
pub struct FlattenArgs {
    /// File of bracketed trees, one sentence per tree; stdin when omitted
    pub file: Option<PathBuf>,

    /// Emit bare words instead of label:word
    #[arg(long)]
    pub suppress_label_prefixes: bool,

    /// Keep only leaves whose parent label fully matches this expression
    #[arg(long, default_value = MATCH_ALL_LABELS)]
    pub regexp_labels: String,

    /// Stopwords spec, e.g. "language en" or "file stop.txt"
    #[arg(long, default_value = DEFAULT_STOPWORDS)]
    pub stopwords: String,
}

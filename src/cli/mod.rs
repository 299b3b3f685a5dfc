//! Command-line front end.
//!
//! Every subcommand converts its flags into the library's option structs and
//! hands off to the library.

pub mod commands;

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;

use commands::{
    ChangeCaseArgs, Commands, DatasetArgs, FlattenArgs, ParseArgs, PosTagArgs, RunArgs,
    ValidateArgs,
};
use treeflat::filter::TracingObserver;
use treeflat::nlp::stopwords_from_spec;
use treeflat::tree::bracketed::parse_many;
use treeflat::{
    apply, build_filter, Attribute, ChangeCase, Dataset, FilterSpec, LabelPattern,
    PartOfSpeechTagging, SentenceSplitter, StreamFilter, TaggingOptions, TreeFlattener,
    ValidationEngine, Value,
};

#[derive(Parser, Debug)]
#[command(
    name = "treeflat",
    version,
    about = "Case conversion and part-of-speech tagging for string attributes of JSON datasets"
)]
pub struct Cli {
    /// Log per-cell debug events
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::ChangeCase(args) => run_change_case(args),
            Commands::PosTag(args) => run_pos_tag(args),
            Commands::Run(args) => run_spec(args),
            Commands::Validate(args) => run_validate(args),
            Commands::Parse(args) => run_parse(args),
            Commands::Flatten(args) => run_flatten(args),
        }
    }
}

fn load_dataset(path: &Path) -> Result<Dataset> {
    Dataset::load(path).with_context(|| format!("failed to read dataset {}", path.display()))
}

fn write_dataset(dataset: &Dataset, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => dataset
            .save(path)
            .with_context(|| format!("failed to write dataset {}", path.display())),
        None => {
            println!("{}", dataset.to_json()?);
            Ok(())
        }
    }
}

fn filter_dataset(filter: &mut dyn StreamFilter, io: &DatasetArgs) -> Result<()> {
    let dataset = load_dataset(&io.input)?;
    let (filtered, _report) = apply(filter, dataset, &mut TracingObserver)
        .with_context(|| format!("{} failed on {}", filter.name(), io.input.display()))?;
    write_dataset(&filtered, io.output.as_deref())
}

fn run_change_case(args: ChangeCaseArgs) -> Result<()> {
    let io = DatasetArgs {
        input: args.io.input.clone(),
        output: args.io.output.clone(),
    };
    let mut filter = ChangeCase::new(args.into());
    filter_dataset(&mut filter, &io)
}

fn run_pos_tag(args: PosTagArgs) -> Result<()> {
    let io = DatasetArgs {
        input: args.io.input.clone(),
        output: args.io.output.clone(),
    };
    let splitter = SentenceSplitter::english();
    let mut filter = PartOfSpeechTagging::new(&splitter, args.into());
    filter_dataset(&mut filter, &io)
}

fn load_spec(path: &Path) -> Result<FilterSpec> {
    FilterSpec::load(path).with_context(|| format!("failed to read spec {}", path.display()))
}

fn run_spec(args: RunArgs) -> Result<()> {
    let spec = load_spec(&args.spec)?;
    let splitter = SentenceSplitter::english();
    let mut filter = build_filter(&spec, &splitter)
        .with_context(|| format!("invalid spec {}", args.spec.display()))?;
    filter_dataset(filter.as_mut(), &args.io)
}

fn run_validate(args: ValidateArgs) -> Result<()> {
    let spec = load_spec(&args.spec)?;
    let report = ValidationEngine::with_defaults().validate(&spec);
    println!("{}", serde_json::to_string_pretty(&report)?);
    if report.has_errors() {
        bail!(
            "{} has {} error(s)",
            args.spec.display(),
            report.errors().count()
        );
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

fn run_parse(args: ParseArgs) -> Result<()> {
    let text = match (&args.text, &args.input, &args.attribute) {
        (Some(text), _, _) => text.clone(),
        (None, Some(input), Some(attribute)) => {
            let dataset = load_dataset(input)?;
            let col = dataset.attribute_index(attribute)?;
            let row = dataset
                .rows
                .get(args.row)
                .with_context(|| format!("{} has no row {}", input.display(), args.row))?;
            match row.get(col).and_then(Value::as_text) {
                Some(text) => text.to_string(),
                None => bail!("row {}, attribute '{attribute}' holds no text", args.row),
            }
        }
        _ => read_input(None)?,
    };

    let options = TaggingOptions {
        tokenizer: args.parser.tokenizer,
        model: args.parser.model,
        additional: args.parser.additional,
        ..TaggingOptions::default()
    };
    let splitter = SentenceSplitter::english();
    let mut tagger = PartOfSpeechTagging::new(&splitter, options);
    tagger.determine_output_format(&[Attribute::string("text")])?;

    for tree in tagger.parse_sentences(&text)? {
        if args.bracketed {
            println!("{}", tree.to_bracketed());
        } else {
            print!("{}", tree.render_outline());
            println!();
        }
    }
    Ok(())
}

fn run_flatten(args: FlattenArgs) -> Result<()> {
    let input = read_input(args.file.as_deref())?;
    let trees = parse_many(&input).context("failed to read bracketed trees")?;
    let stopwords = stopwords_from_spec(&args.stopwords)?;
    let labels = LabelPattern::new(&args.regexp_labels)?;

    let flattened = TreeFlattener::new(stopwords.as_ref(), &labels)
        .with_suppressed_prefixes(args.suppress_label_prefixes)
        .flatten_document(&trees);
    println!("{flattened}");
    Ok(())
}

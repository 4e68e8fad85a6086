use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fmt::Display;
use std::path::Path;
use wphl_fold::{enclosing_fold, FoldConfig};
use wphl_lexer::{Document, Host, Position, Role};
use wphl_matcher::{Direction, TagMatch};

#[derive(Parser)]
#[command(name = "wphl")]
#[command(about = "Inspect tag, template and comment matching on a wikitext file")]
#[command(version)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// JSON file with matching and folding options
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show how each line is classified
    Tokens {
        /// Input wikitext file
        path: String,
    },

    /// Find the tag at a position and its counterpart
    Tag {
        /// Input wikitext file
        path: String,
        /// Zero-based LINE:CH
        #[arg(value_parser = parse_position)]
        pos: Position,
    },

    /// Find the innermost tag pair around a position
    Enclosing {
        /// Input wikitext file
        path: String,
        /// Zero-based LINE:CH
        #[arg(value_parser = parse_position)]
        pos: Position,
        /// Only consider tags with this name
        #[arg(long)]
        name: Option<String>,
    },

    /// Find the closing tag that balances the nesting at a position
    Closing {
        /// Input wikitext file
        path: String,
        /// Zero-based LINE:CH
        #[arg(value_parser = parse_position)]
        pos: Position,
        /// Tag name to close
        name: String,
    },

    /// Find the template parameter body around a position
    Template {
        /// Input wikitext file
        path: String,
        /// Zero-based LINE:CH
        #[arg(value_parser = parse_position)]
        pos: Position,
        /// Show the raw delimiter and bracket scan instead
        #[arg(long)]
        raw: bool,
    },

    /// Find the comment body around a position
    Comment {
        /// Input wikitext file
        path: String,
        /// Zero-based LINE:CH
        #[arg(value_parser = parse_position)]
        pos: Position,
    },

    /// Show what would be folded at a position
    Fold {
        /// Input wikitext file
        path: String,
        /// Zero-based LINE:CH
        #[arg(value_parser = parse_position)]
        pos: Position,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    let matching = &config.matching;
    let json = cli.json;

    match cli.command {
        Command::Tokens { path } => cmd_tokens(&read_document(&path), json),
        Command::Tag { path, pos } => {
            let doc = read_document(&path);
            let found = or_exit(wphl_matcher::find_matching_tag(&doc, pos, matching));
            report(json, &found, describe_match);
        }
        Command::Enclosing { path, pos, name } => {
            let doc = read_document(&path);
            let pair = or_exit(wphl_matcher::find_enclosing_tag(
                &doc,
                pos,
                name.as_deref(),
                matching,
            ));
            report(json, &pair, |pair| {
                format!(
                    "{} {} .. {} (content {})",
                    pair.open.name,
                    pair.open.range(),
                    pair.close.range(),
                    pair.inner()
                )
            });
        }
        Command::Closing { path, pos, name } => {
            let doc = read_document(&path);
            let close = or_exit(wphl_matcher::scan_for_closing_tag(&doc, pos, &name, matching));
            report(json, &close, |close| format!("{} {}", close.name, close.range()));
        }
        Command::Template { path, pos, raw } => {
            let doc = read_document(&path);
            if raw {
                let forward = or_exit(wphl_matcher::scan_for_delimiter_and_bracket(
                    &doc,
                    pos,
                    Direction::Forward,
                    matching,
                ));
                let backward = or_exit(wphl_matcher::scan_for_delimiter_and_bracket(
                    &doc,
                    pos,
                    Direction::Backward,
                    matching,
                ));
                if json {
                    print_json(&serde_json::json!({ "forward": forward, "backward": backward }));
                } else {
                    println!("backward bracket: {}", show(backward.bracket));
                    println!("forward delimiter: {}", show(forward.delimiter));
                    println!("forward bracket: {}", show(forward.bracket));
                }
                return;
            }
            let range = or_exit(wphl_matcher::find_enclosing_template(&doc, pos, matching));
            report(json, &range, |range| range.to_string());
        }
        Command::Comment { path, pos } => {
            let doc = read_document(&path);
            let range = or_exit(wphl_matcher::find_enclosing_comment(&doc, pos));
            report(json, &range, |range| range.to_string());
        }
        Command::Fold { path, pos } => {
            let doc = read_document(&path);
            let target = or_exit(enclosing_fold(&doc, pos, matching));
            report(json, &target, |target| {
                format!("{} {} ({})", target.kind, target.range, target.kind.message_key())
            });
        }
    }
}

fn parse_position(arg: &str) -> Result<Position, String> {
    let (line, column) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:CH, got {arg:?}"))?;
    let line = line
        .trim()
        .parse()
        .map_err(|e| format!("invalid line {line:?}: {e}"))?;
    let column = column
        .trim()
        .parse()
        .map_err(|e| format!("invalid column {column:?}: {e}"))?;
    Ok(Position::new(line, column))
}

fn or_exit<T, E: Display>(result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn load_config(path: Option<&str>) -> FoldConfig {
    let Some(path) = path else {
        return FoldConfig::default();
    };
    let source = read_source(path);
    let config: FoldConfig = or_exit(serde_json::from_str(&source));
    or_exit(config.validate());
    log::debug!("loaded config from {path}");
    config
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn read_document(path: &str) -> Document {
    Document::new(&read_source(path))
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!("{}", or_exit(serde_json::to_string_pretty(value)));
}

/// Print a lookup result, or `not found` on stderr with exit code 2.
fn report<T: Serialize>(json: bool, result: &Option<T>, describe: impl Fn(&T) -> String) {
    if json {
        print_json(result);
        return;
    }
    match result {
        Some(value) => println!("{}", describe(value)),
        None => {
            eprintln!("not found");
            std::process::exit(2);
        }
    }
}

fn show(pos: Option<Position>) -> String {
    pos.map_or_else(|| "-".to_string(), |pos| pos.to_string())
}

fn describe_match(found: &TagMatch) -> String {
    let other = found
        .other()
        .map_or_else(|| "unmatched".to_string(), |other| other.range().to_string());
    match found {
        TagMatch::SelfClosing { tag } => format!("self {} {}", tag.name, tag.range()),
        TagMatch::Open { open, .. } => format!("open {} {} -> {other}", open.name, open.range()),
        TagMatch::Close { close, .. } => {
            format!("close {} {} -> {other}", close.name, close.range())
        }
    }
}

/// One char per classified char of a line.
fn sketch(doc: &Document, line: usize, len: usize) -> String {
    (0..len)
        .map(|column| {
            let kind = doc.token_kind(line, column);
            match kind.role {
                Role::Text if kind.in_template => '-',
                Role::Text => '.',
                Role::TagBracket => '<',
                Role::TagName => 'n',
                Role::TagAttribute => 'a',
                Role::TemplateBracket => '{',
                Role::TemplateName => 'N',
                Role::TemplateDelimiter => '|',
                Role::ArgumentBracket => '$',
                Role::Comment => 'c',
            }
        })
        .collect()
}

fn cmd_tokens(doc: &Document, json: bool) {
    if json {
        let lines: Vec<_> = (0..doc.line_count())
            .map(|line| {
                let text = doc.line(line).unwrap_or_default();
                let kinds: Vec<_> = (0..text.chars().count())
                    .map(|column| doc.token_kind(line, column))
                    .collect();
                serde_json::json!({ "line": line, "text": text, "kinds": kinds })
            })
            .collect();
        print_json(&lines);
        return;
    }
    for (index, text) in doc.lines().enumerate() {
        println!("{index:>4} {text}");
        println!("     {}", sketch(doc, index, text.chars().count()));
    }
}

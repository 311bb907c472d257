//! Folio CLI - Browse a remote markdown content store from the terminal

use clap::{Parser, Subcommand, ValueEnum};
use folio_client::{Navigation, RemoteStore, Session};
use folio_core::{CollapseState, Config, ErrorEnvelope, NodeKind, ProbeStrategy, Slug};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Browse a markdown content store by its index", long_about = None)]
struct Cli {
    /// Base URL of the content store (overrides the config file)
    #[arg(long, global = true, env = "FOLIO_CONTENT_BASE")]
    base_url: Option<String>,

    /// Path to a folio.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Folder-index probe strategy (overrides the config file)
    #[arg(long, global = true, value_enum)]
    probe: Option<ProbeArg>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProbeArg {
    /// Try <slug>.md, then <slug>/index.md
    Sequential,
    /// Request both at once
    Parallel,
}

impl From<ProbeArg> for ProbeStrategy {
    fn from(arg: ProbeArg) -> Self {
        match arg {
            ProbeArg::Sequential => ProbeStrategy::Sequential,
            ProbeArg::Parallel => ProbeStrategy::Parallel,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the sidebar tree
    Tree {
        /// Folder path to show collapsed (repeatable)
        #[arg(long = "collapse")]
        collapse: Vec<String>,
    },

    /// List every document, optionally filtered by search terms
    Docs {
        /// Terms matched against title, date, tags and summary
        #[arg(short, long)]
        query: Option<String>,
    },

    /// List every directly navigable path
    Paths,

    /// List the immediate children of a folder
    Children {
        /// Folder slug, e.g. "posts/rust" (root if omitted)
        slug: Option<String>,
    },

    /// Resolve a slug and print the document
    Show {
        /// Document slug, e.g. "posts/hello" (root if omitted)
        slug: Option<String>,

        /// Print the heading outline instead of the body
        #[arg(long)]
        outline: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = run(&cli).await;

    if let Err(e) = result {
        if cli.json {
            let envelope = ErrorEnvelope::from(&e);
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&envelope).unwrap_or_else(|_| e.to_string())
            );
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> folio_core::Result<()> {
    let config = Config::load_or_default(cli.config.as_deref())?;
    let base_url = cli
        .base_url
        .clone()
        .unwrap_or_else(|| config.content.base_url.clone());
    let probe = cli.probe.map_or(config.client.probe, ProbeStrategy::from);

    let store = RemoteStore::new(&base_url)?;
    let session = Session::open(store).await?.with_probe(probe);

    match &cli.command {
        Commands::Tree { collapse } => cmd_tree(&session, collapse, cli.json),
        Commands::Docs { query } => cmd_docs(&session, query.as_deref(), cli.json),
        Commands::Paths => cmd_paths(&session, cli.json),
        Commands::Children { slug } => cmd_children(&session, slug.as_deref(), cli.json),
        Commands::Show { slug, outline } => {
            cmd_show(&session, slug.as_deref(), *outline, cli.json).await
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> folio_core::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_tree(
    session: &Session<RemoteStore>,
    collapse: &[String],
    json: bool,
) -> folio_core::Result<()> {
    use colored::Colorize;

    let state: CollapseState = collapse.iter().cloned().collect();
    let entries = session.sidebar(&state);

    if json {
        return print_json(&entries);
    }
    for entry in &entries {
        let indent = "  ".repeat(entry.depth);
        match entry.kind {
            NodeKind::Folder => {
                let marker = if entry.collapsed { "▸" } else { "▾" };
                println!("{}{} {}/", indent, marker, entry.title.blue().bold());
            }
            NodeKind::Document => {
                println!("{}  {} {}", indent, entry.title, entry.path.dimmed());
            }
        }
    }
    Ok(())
}

fn cmd_docs(
    session: &Session<RemoteStore>,
    query: Option<&str>,
    json: bool,
) -> folio_core::Result<()> {
    use colored::Colorize;

    let docs = session.search(query.unwrap_or(""));
    if json {
        return print_json(&docs);
    }
    for doc in &docs {
        let meta = &doc.metadata;
        let tags = if meta.tags.is_empty() {
            String::new()
        } else {
            format!(" • {}", meta.tags.join(", "))
        };
        println!(
            "{}: {} {}{}",
            doc.slug.cyan(),
            meta.title,
            meta.date.dimmed(),
            tags.dimmed()
        );
    }
    Ok(())
}

fn cmd_paths(session: &Session<RemoteStore>, json: bool) -> folio_core::Result<()> {
    let paths = session.paths();
    if json {
        return print_json(&paths);
    }
    for path in &paths {
        println!("/{}", path);
    }
    Ok(())
}

fn cmd_children(
    session: &Session<RemoteStore>,
    slug: Option<&str>,
    json: bool,
) -> folio_core::Result<()> {
    use colored::Colorize;

    let slug = Slug::parse(slug.unwrap_or(""));
    let children = session.children(&slug);
    if json {
        return print_json(&children);
    }
    for child in &children {
        match child.node.as_document() {
            Some(meta) => println!("{} {}", child.key.cyan(), meta.title),
            None => println!("{}/", child.key.blue().bold()),
        }
    }
    Ok(())
}

async fn cmd_show(
    session: &Session<RemoteStore>,
    slug: Option<&str>,
    outline: bool,
    json: bool,
) -> folio_core::Result<()> {
    use colored::Colorize;

    let slug = Slug::parse(slug.unwrap_or(""));
    let doc = match session.navigate(slug).await? {
        Navigation::Loaded(doc) => doc,
        Navigation::NotFound(slug) | Navigation::Superseded(slug) => {
            if json {
                print_json(&ErrorEnvelope::not_found(&slug.join()))?;
            } else {
                eprintln!("{}: {}", "Not found".red(), slug);
            }
            std::process::exit(1);
        }
    };

    let headings = folio_core::outline(&doc.content);

    if json {
        return print_json(&serde_json::json!({
            "document": doc,
            "outline": headings,
        }));
    }

    let meta = &doc.metadata;
    println!("{}", meta.title.bold());
    if !meta.date.is_empty() {
        println!("{}: {}", "Date".blue(), meta.date);
    }
    if !meta.tags.is_empty() {
        println!("{}: {}", "Tags".blue(), meta.tags.join(", "));
    }
    if let Some(summary) = &meta.summary {
        println!("{}: {}", "Summary".blue(), summary);
    }
    if !doc.indexed {
        println!("{}", "(not listed in index.json)".yellow());
    }
    println!();

    if outline {
        for heading in &headings {
            let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
            println!("{}{} {}", indent, heading.text, format!("#{}", heading.id).dimmed());
        }
    } else {
        println!("{}", doc.content);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree_with_collapse() {
        let cli = Cli::try_parse_from([
            "folio",
            "--base-url",
            "https://contents.example.com",
            "tree",
            "--collapse",
            "posts",
            "--collapse",
            "posts/rust",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("https://contents.example.com"));
        match cli.command {
            Commands::Tree { collapse } => assert_eq!(collapse, vec!["posts", "posts/rust"]),
            _ => panic!("expected tree"),
        }
    }

    #[test]
    fn test_parse_show_defaults_to_root() {
        let cli = Cli::try_parse_from(["folio", "show", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Show {
                slug: None,
                outline: false
            }
        ));
    }

    #[test]
    fn test_parse_strategy_flag() {
        let cli = Cli::try_parse_from(["folio", "--probe", "parallel", "paths"]).unwrap();
        assert_eq!(cli.probe, Some(ProbeArg::Parallel));
        assert_eq!(
            ProbeStrategy::from(cli.probe.unwrap()),
            ProbeStrategy::Parallel
        );

        let cli = Cli::try_parse_from(["folio", "paths"]).unwrap();
        assert_eq!(cli.probe, None);
    }

    #[test]
    fn test_rejects_unknown_probe() {
        assert!(Cli::try_parse_from(["folio", "--probe", "sideways", "paths"]).is_err());
    }
}

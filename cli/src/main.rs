use anyhow::{Context, Result};
use clap::Parser;
use howdoi_core::{load_index, parse_doc_id, save_index, DocId, IndexError, InvertedIndex, TagPolicy};
use tracing_subscriber::{fmt, EnvFilter};

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "howdoi")]
#[command(about = "Searchable command-line database designed for small pieces of information (e.g. terminal commands)", long_about = None)]
struct Cli {
    /// Insert the given text into the database instead of searching
    #[arg(short, long)]
    add: bool,
    /// Delete the item with document ID DOCID
    #[arg(short, long, value_name = "DOCID", value_parser = parse_doc_id)]
    delete: Option<DocId>,
    /// Show the stored documents and their document IDs
    #[arg(short, long)]
    show: bool,
    /// Path of the database file
    #[arg(long, env = "HOWDOI_DB", default_value = "db.howdoi")]
    db: PathBuf,
    /// Index custom tags in addition to the text words (only applies when a new database is created)
    #[arg(long, default_value_t = false)]
    augment_tags: bool,
    /// Terms to search for or add to the database
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    terms: Vec<String>,
}

/// Outcome of the extra-tags prompt.
#[derive(Debug, PartialEq, Eq)]
enum TagReply {
    Cancel,
    Tags(Vec<String>),
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    let policy = if cli.augment_tags { TagPolicy::Augment } else { TagPolicy::Replace };
    let mut index = open_database(&cli.db, policy)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.add {
        if cli.terms.is_empty() {
            writeln!(out, "Provide a phrase to add, or run with -h for help")?;
        } else {
            let stdin = io::stdin();
            add(&mut index, &cli.db, &cli.terms, &mut stdin.lock(), &mut out)?;
        }
    } else if let Some(doc_id) = cli.delete {
        delete(&mut index, &cli.db, doc_id, &mut out)?;
    } else if cli.show {
        show(&index, &mut out)?;
    } else if cli.terms.is_empty() {
        writeln!(out, "Provide terms to search for, or run with -h for help")?;
    } else {
        search(&index, &cli.terms, &mut out)?;
    }
    Ok(())
}

/// Load the database, creating an empty one on first run.
fn open_database(path: &Path, policy: TagPolicy) -> Result<InvertedIndex> {
    match load_index(path) {
        Ok(index) => Ok(index),
        Err(IndexError::NotFound { .. }) => {
            println!("Couldn't find the database, so a new one was created.");
            let index = InvertedIndex::with_policy(policy);
            persist(path, &index)?;
            Ok(index)
        }
        Err(e) => Err(e).with_context(|| format!("Hit a file-related error reading {}", path.display())),
    }
}

fn persist(path: &Path, index: &InvertedIndex) -> Result<()> {
    save_index(path, index).with_context(|| format!("Hit a file-related error writing {}", path.display()))
}

fn add<R: BufRead, W: Write>(
    index: &mut InvertedIndex,
    db: &Path,
    terms: &[String],
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let document = terms.join(" ");
    writeln!(out, "I'm going to add \"{document}\" to the database.")?;
    match index.tag_policy() {
        TagPolicy::Replace => {
            writeln!(out, "By default, each significant word in the string is a search tag.")?;
            writeln!(out, "If you want to provide your own tags INSTEAD, provide them now.")?;
        }
        TagPolicy::Augment => {
            writeln!(out, "Each significant word in the string is a search tag.")?;
            writeln!(out, "If you want to provide extra tags, provide them now.")?;
        }
    }
    writeln!(out, "Hit Enter to skip, or type ! to cancel adding this item:")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    match parse_tag_reply(&line) {
        TagReply::Cancel => writeln!(out, "Nothing was changed.")?,
        TagReply::Tags(tags) => {
            let doc_id = index.add_document(&document, &tags)?;
            persist(db, index)?;
            tracing::info!(doc_id, tags = tags.len(), "document added");
            writeln!(out, "Command added and database updated.")?;
        }
    }
    Ok(())
}

/// Split a prompt reply on spaces. Any `!` token cancels; blank tokens are dropped.
fn parse_tag_reply(line: &str) -> TagReply {
    let tokens: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(' ').collect();
    if tokens.contains(&"!") {
        return TagReply::Cancel;
    }
    TagReply::Tags(tokens.into_iter().filter(|t| !t.is_empty()).map(str::to_string).collect())
}

fn delete<W: Write>(index: &mut InvertedIndex, db: &Path, doc_id: DocId, out: &mut W) -> Result<()> {
    if index.delete_document(doc_id) {
        persist(db, index)?;
        writeln!(out, "Deleted item {doc_id}")?;
    } else {
        writeln!(out, "Can't delete item {doc_id} - it doesn't exist!")?;
    }
    Ok(())
}

fn search<W: Write>(index: &InvertedIndex, tags: &[String], out: &mut W) -> Result<()> {
    let results = index.search(tags);
    if results.is_empty() {
        writeln!(out, "Couldn't find anything matching those tags!")?;
        return Ok(());
    }
    for doc_id in results {
        if let Some(text) = index.document(doc_id) {
            writeln!(out, "{text}")?;
        }
    }
    Ok(())
}

fn show<W: Write>(index: &InvertedIndex, out: &mut W) -> Result<()> {
    if index.is_empty() {
        writeln!(out, "Database is empty!")?;
        return Ok(());
    }
    for (doc_id, text) in index.documents() {
        writeln!(out, "{doc_id}: {text}")?;
    }
    Ok(())
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use engine::{
    paginate, process_queries_in, remove_duplicates, Document, DocumentStatus, DuplicateFound,
    ExecutionMode, LogDuration, SearchConfig, SearchIndex,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: i32,
    text: String,
    #[serde(default)]
    status: DocumentStatus,
    #[serde(default)]
    ratings: Vec<i32>,
}

#[derive(Parser)]
#[command(name = "searcher")]
#[command(about = "Load documents into an in-memory TF-IDF index and query it", long_about = None)]
struct Cli {
    /// Input path (JSON/JSONL file or a directory of them)
    #[arg(long)]
    input: String,
    /// Space separated stop words
    #[arg(long, default_value = "")]
    stop_words: String,
    /// Maximum results per query
    #[arg(long, default_value_t = engine::config::MAX_RESULT_DOCUMENT_COUNT)]
    max_results: usize,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run queries and print ranked documents as JSON lines
    Search {
        /// Query text, may be repeated
        #[arg(long)]
        query: Vec<String>,
        /// File with one query per line
        #[arg(long)]
        queries: Option<String>,
        /// Only return documents with this status
        #[arg(long, value_enum, default_value_t = StatusArg::Actual)]
        status: StatusArg,
        /// Score each query on the rayon pool
        #[arg(long, default_value_t = false)]
        parallel: bool,
        /// Print all results as text pages of this size instead of JSON
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Show which query words a document matches
    Match {
        #[arg(long)]
        query: String,
        #[arg(long)]
        id: i32,
    },
    /// Remove documents whose word set repeats an earlier document
    Dedup,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

impl From<StatusArg> for DocumentStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Actual => DocumentStatus::Actual,
            StatusArg::Irrelevant => DocumentStatus::Irrelevant,
            StatusArg::Banned => DocumentStatus::Banned,
            StatusArg::Removed => DocumentStatus::Removed,
        }
    }
}

#[derive(Serialize)]
struct QueryOutput<'a> {
    query: &'a str,
    results: &'a [Document],
}

#[derive(Serialize)]
struct MatchOutput<'a> {
    id: i32,
    words: Vec<&'a str>,
    status: DocumentStatus,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let config = SearchConfig { max_results: cli.max_results, ..SearchConfig::default() };
    let mut index = SearchIndex::new(&cli.stop_words)?.with_config(config);
    load_documents(&mut index, Path::new(&cli.input))?;

    match cli.command {
        Commands::Search { query, queries, status, parallel, page_size } => {
            let mut all = query;
            if let Some(path) = queries {
                all.extend(read_queries(Path::new(&path))?);
            }
            let mode = if parallel { ExecutionMode::Parallel } else { ExecutionMode::Sequential };
            search(&index, &all, status.into(), mode, page_size)
        }
        Commands::Match { query, id } => {
            let (words, status) = index.match_document(&query, id)?;
            println!("{}", serde_json::to_string(&MatchOutput { id, words, status })?);
            Ok(())
        }
        Commands::Dedup => {
            for id in remove_duplicates(&mut index) {
                println!("{}", DuplicateFound(id));
            }
            tracing::info!(remaining = index.document_count(), "duplicates removed");
            Ok(())
        }
    }
}

fn search(
    index: &SearchIndex,
    queries: &[String],
    status: DocumentStatus,
    mode: ExecutionMode,
    page_size: Option<usize>,
) -> Result<()> {
    let _timer = LogDuration::new("search");
    let results = if status == DocumentStatus::Actual {
        process_queries_in(index, mode, queries)?
    } else {
        queries
            .iter()
            .map(|q| index.find_top_documents_in(mode, q, |_, s, _| s == status))
            .collect::<engine::Result<Vec<_>>>()?
    };

    match page_size {
        Some(size) => {
            let flat: Vec<Document> = results.into_iter().flatten().collect();
            for page in paginate(&flat, size) {
                println!("{page}");
                println!("Page break");
            }
        }
        None => {
            for (query, found) in queries.iter().zip(&results) {
                let out = QueryOutput { query, results: found };
                println!("{}", serde_json::to_string(&out)?);
            }
        }
    }
    Ok(())
}

fn load_documents(index: &mut SearchIndex, input_path: &Path) -> Result<()> {
    let _timer = LogDuration::new("load documents");
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
        files.sort();
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    }

    for file in files {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            index_jsonl(index, &file)?;
        } else {
            index_json(index, &file)?;
        }
    }

    tracing::info!(num_docs = index.document_count(), num_terms = index.term_count(), "ingested documents");
    Ok(())
}

fn index_jsonl(index: &mut SearchIndex, file: &Path) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line)?;
        ingest_doc(index, doc);
    }
    Ok(())
}

fn index_json(index: &mut SearchIndex, file: &Path) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                let doc: InputDoc = serde_json::from_value(v)?;
                ingest_doc(index, doc);
            }
        }
        serde_json::Value::Object(_) => {
            let doc: InputDoc = serde_json::from_value(json)?;
            ingest_doc(index, doc);
        }
        _ => {}
    }
    Ok(())
}

/// Rejected documents are logged and skipped; the rest of the input still loads.
fn ingest_doc(index: &mut SearchIndex, doc: InputDoc) {
    if let Err(err) = index.add_document(doc.id, &doc.text, doc.status, &doc.ratings) {
        tracing::warn!(doc_id = doc.id, error = %err, "skipping document");
    }
}

fn read_queries(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(text.lines().filter(|l| !l.trim().is_empty()).map(str::to_string).collect())
}

//! lectern CLI: reading companion engine.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use lectern::archive::ArchiveClient;
use lectern::catalog::{slugify, ReadingCatalog};
use lectern::config::LecternConfig;
use lectern::context::{self, ContextFragment};
use lectern::position::chapter_for_page;
use lectern::segment::segment;

#[derive(Parser)]
#[command(name = "lectern", version, about = "Reading companion engine")]
struct Cli {
    /// Data directory for the reading catalog.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a work's plain text from the archive, segment it, and cache it.
    Fetch {
        /// Archive work id.
        work_id: u64,

        /// Catalog id to store under (defaults to a slug of the title).
        #[arg(long)]
        id: Option<String>,
    },

    /// Import a local plain-text file, segment it, and cache it.
    Import {
        /// Path to the text file.
        file: PathBuf,

        /// Catalog id to store under (defaults to a slug of the file name).
        #[arg(long)]
        id: Option<String>,

        /// Book title.
        #[arg(long)]
        title: Option<String>,

        /// Book author.
        #[arg(long)]
        author: Option<String>,
    },

    /// List cached books.
    List,

    /// Remove a book and its cached data.
    Remove {
        /// Catalog id.
        id: String,
    },

    /// Show the chapter table of a cached book.
    Chapters {
        /// Catalog id.
        id: String,
    },

    /// Estimate which chapter a page position falls in.
    Locate {
        /// Catalog id.
        id: String,

        /// Current page.
        #[arg(long)]
        page: u32,

        /// Total pages in the reader's edition.
        #[arg(long)]
        total_pages: u32,
    },

    /// Print the spoiler-bounded context for a reading position.
    Context {
        /// Catalog id.
        id: String,

        /// Current chapter ordinal; when omitted it is estimated from
        /// --page/--total-pages.
        #[arg(long)]
        chapter: Option<usize>,

        /// Current page (bounds the scanned-passage fallback).
        #[arg(long, default_value = "0")]
        page: u32,

        /// Total pages, for estimating the chapter when --chapter is omitted.
        #[arg(long)]
        total_pages: Option<u32>,
    },

    /// Manage scanned passages.
    Scan {
        #[command(subcommand)]
        action: ScanAction,
    },
}

#[derive(Subcommand)]
enum ScanAction {
    /// Record a scanned passage for a book.
    Add {
        /// Catalog id.
        id: String,

        /// Passage text.
        text: String,

        /// Page the passage was captured from; omit for unplaced passages.
        #[arg(long)]
        page: Option<u32>,
    },

    /// List scanned passages for a book.
    List {
        /// Catalog id.
        id: String,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => LecternConfig::load(path)?,
        None => LecternConfig::default(),
    };
    let segment_config = config.segment_config()?;

    let data_dir = resolve_data_dir(cli.data_dir.as_ref())?;
    let mut catalog = ReadingCatalog::open(&data_dir)?;

    match cli.command {
        Commands::Fetch { work_id, id } => {
            let client = ArchiveClient::new(config.archive_url());
            let book = client.fetch_book(work_id)?;

            let id = id
                .or_else(|| book.title.as_deref().map(slugify))
                .unwrap_or_else(|| format!("work-{work_id}"));
            let document = segment(&book.text, &id, &segment_config)
                .with_metadata(book.title, book.author);

            let source = format!("{}/books/{}", config.archive_url(), work_id);
            catalog.store_document(&document, Some(source))?;
            println!(
                "Cached \"{}\": {} chapters, {} words",
                id,
                document.chapter_count(),
                document.total_word_count()
            );
        }

        Commands::Import {
            file,
            id,
            title,
            author,
        } => {
            let raw = std::fs::read_to_string(&file).into_diagnostic()?;
            let id = id.unwrap_or_else(|| {
                let stem = file
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                slugify(&stem)
            });
            let document = segment(&raw, &id, &segment_config).with_metadata(title, author);

            catalog.store_document(&document, Some(file.display().to_string()))?;
            println!(
                "Cached \"{}\": {} chapters, {} words",
                id,
                document.chapter_count(),
                document.total_word_count()
            );
        }

        Commands::List => {
            if catalog.is_empty() {
                println!("No books cached.");
            }
            for record in catalog.list() {
                println!(
                    "{:24} {:40} {:5} chapters {:8} words",
                    record.id,
                    record.title.as_deref().unwrap_or("(untitled)"),
                    record.chapter_count,
                    record.total_word_count
                );
            }
        }

        Commands::Remove { id } => {
            let removed = catalog.remove(&id)?;
            println!("Removed \"{}\"", removed.id);
        }

        Commands::Chapters { id } => {
            let document = catalog.load_document(&id)?;
            for chapter in document.chapters() {
                println!(
                    "{:4}  {:50} {:8} words",
                    chapter.index, chapter.title, chapter.word_count
                );
            }
        }

        Commands::Locate {
            id,
            page,
            total_pages,
        } => {
            let document = catalog.load_document(&id)?;
            let ordinal = chapter_for_page(&document, page, total_pages);
            let title = document
                .chapter(ordinal)
                .map(|c| c.title.as_str())
                .unwrap_or("");
            println!("Page {page}/{total_pages} is in chapter {ordinal}: {title}");
        }

        Commands::Context {
            id,
            chapter,
            page,
            total_pages,
        } => {
            // The book may have no downloaded text; the assembler then falls
            // back to scanned passages.
            let document = catalog.load_document(&id).ok();
            let chapter = chapter.or_else(|| {
                document
                    .as_ref()
                    .zip(total_pages)
                    .map(|(doc, total)| chapter_for_page(doc, page, total))
            });
            let fragments = catalog.fragments(&id)?;
            let out = context::assemble(document.as_ref(), chapter, &fragments, page);
            println!("{out}");
        }

        Commands::Scan { action } => match action {
            ScanAction::Add { id, text, page } => {
                let fragment = match page {
                    Some(page) => ContextFragment::new(page, text),
                    None => ContextFragment::unplaced(text),
                };
                catalog.add_fragment(&id, fragment)?;
                println!("Recorded passage for \"{id}\"");
            }
            ScanAction::List { id } => {
                for fragment in catalog.fragments(&id)? {
                    let place = if fragment.page == 0 {
                        "unplaced".to_string()
                    } else {
                        format!("p.{}", fragment.page)
                    };
                    println!("{place:>9}  {}", fragment.text);
                }
            }
        },
    }

    Ok(())
}

/// Resolve the catalog directory: explicit flag, then `$XDG_DATA_HOME`,
/// then `~/.local/share`.
fn resolve_data_dir(flag: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir.clone());
    }
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return Ok(PathBuf::from(xdg).join("lectern"));
    }
    let home = std::env::var("HOME")
        .map(PathBuf::from)
        .map_err(|_| miette::miette!("cannot determine home directory; pass --data-dir"))?;
    Ok(home.join(".local/share").join("lectern"))
}

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Department website academics tooling
#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Fetch, cache and render the department's academics content", long_about = None)]
pub struct Cli {
    /// Config file (defaults to portal.toml in the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Keep the cache in memory only
    #[arg(long, global = true)]
    pub no_persist: bool,

    /// Ignore cached content and fetch again
    #[arg(long, global = true)]
    pub refresh: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the Academics page as Markdown
    Page {
        /// Only the section with this anchor id (timetable, courses, ...)
        #[arg(long)]
        section: Option<String>,
    },
    /// List courses derived from the CMS
    Courses {
        /// Only this course type
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
    },
    /// Render the academic rules
    Rules,
    /// Parse a pipe-delimited grading table from a file
    Grading {
        file: PathBuf,
    },
    /// Run the slide carousel and print index changes
    Carousel {
        /// Image sources, in order
        #[arg(required = true)]
        images: Vec<String>,
        /// How long to let auto-advance run
        #[arg(long, default_value_t = 12_000)]
        run_for_ms: u64,
    },
    /// Remove cached academics content
    ClearCache,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Core,
    Elective,
}

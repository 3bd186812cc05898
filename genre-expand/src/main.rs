use clap::Parser;
use std::path::{Path, PathBuf};

mod cache;
mod error;
mod expand;
mod genres;
mod modify;
mod pages;
mod prompt;
mod settings;
mod tags;
#[cfg(test)]
mod testing;
mod walker;
mod wiki;

use expand::Expander;
use prompt::StdinPrompt;
use settings::{MAX_LEVEL, Settings};
use tags::LoftyTagStore;
use wiki::Wikipedia;

#[derive(Parser)]
#[command(name = "genre-expand")]
#[command(about = "Expand audio genre metadata using Wikipedia")]
struct Args {
    /// Directory to search
    #[arg(short = 'd', long, required_unless_present = "version")]
    search_dir: Option<String>,

    /// Recursively search directories
    #[arg(short, long)]
    recursive: bool,

    /// Depth of directories to recurse
    #[arg(short, long, default_value_t = MAX_LEVEL)]
    level: usize,

    /// Do not prompt user ever
    #[arg(short, long)]
    force: bool,

    /// Save files without prompt
    #[arg(short = 's', long)]
    force_save: bool,

    /// Only expand missing genres
    #[arg(short, long)]
    missing_only: bool,

    /// Suppress status and error messages
    #[arg(short, long)]
    quiet: bool,

    /// Display current version
    #[arg(short = 'v', long)]
    version: bool,
}

impl Args {
    fn into_settings(self, search_dir: PathBuf) -> Settings {
        let mut settings = Settings::new(search_dir, self.recursive, self.level);
        settings.force = self.force;
        settings.force_save = self.force_save;
        settings.missing_only = self.missing_only;
        settings.quiet = self.quiet;
        settings
    }
}

fn get_validated_search_dir(path_str: &str) -> &Path {
    let path = Path::new(path_str);

    if !path.exists() {
        eprintln!("Error: The path '{path_str}' does not exist.");
        std::process::exit(1);
    }

    if !path.is_dir() {
        eprintln!("Error: The path '{path_str}' is not a directory.");
        std::process::exit(1);
    }

    path
}

fn init_logging(settings: &Settings) {
    let mut clog = colog::default_builder();
    clog.filter(None, settings.log_filter());
    if !settings.quiet {
        clog.filter(Some("symphonia"), log::LevelFilter::Error);
        clog.filter(Some("lofty"), log::LevelFilter::Error);
    }
    clog.init();
}

fn main() {
    let args = Args::parse();
    if args.version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return;
    }
    let Some(search_dir) = args.search_dir.as_deref() else {
        return;
    };
    let search_dir = get_validated_search_dir(search_dir).to_path_buf();
    let settings = args.into_settings(search_dir);
    init_logging(&settings);

    let mut expander = Expander::new(settings, Wikipedia::new(), StdinPrompt, LoftyTagStore);
    expander.run();
}

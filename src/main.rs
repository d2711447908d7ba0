use clap::{Parser, Subcommand};
use folio::config::{self, SiteConfig};
use folio::content::Content;
use folio::logging::{self, LogConfig};
use folio::shell::{Event, Shell, ShellSettings};
use folio::{compress, generate, output};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Personal portfolio site: overview, index and about views")]
#[command(long_about = "\
Personal portfolio site: overview, index and about views

Everything comes from one content directory:

  content/
  ├── config.toml                  # Site config (optional)
  ├── cv.json                      # Projects, side projects, about, contact
  └── public/                      # Copied to the output root
      └── content/media/           # Project images and videos

Projects without attachments are hidden. The rest are shown newest first,
with \"Ongoing\" work ahead of everything dated.

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate content and print the inventory without building
    Check,
    /// Generate the static site
    Build,
    /// Recompress PNG media in place, keeping backups of the originals
    Compress {
        /// Disable the compression cache: recompress every file
        #[arg(long)]
        no_cache: bool,
    },
    /// Replay events on a fresh shell and print the resulting frame as JSON
    ///
    /// Events: overview, index, about, open:N, close, toggle, click:N,
    /// row:N, focus:N, swipe-left|right|up|down, hover:N, unhover,
    /// tick:MS, pointer:<touch|mouse>:<down|move|up|cancel>:X,Y
    Frame {
        events: Vec<Event>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(&LogConfig::from_verbosity(cli.verbose))?;

    match cli.command {
        Command::Check => {
            let (config, content) = load(&cli.source)?;
            println!("==> Checking {}", cli.source.display());
            output::print_check_output(&content, &config, &cli.source);
            println!("==> Content is valid");
        }
        Command::Build => {
            let (config, content) = load(&cli.source)?;
            println!("==> Generating HTML → {}", cli.output.display());
            let report = generate::generate(&cli.source, &cli.output, &config, &content)?;
            output::print_generate_output(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Compress { no_cache } => {
            let config = config::load_config(&cli.source)?;
            init_thread_pool(&config.processing);
            let options =
                compress::CompressOptions::from_config(&cli.source, &config.compress, !no_cache);
            println!("==> Compressing PNGs in {}", options.media_dir.display());
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    if let Some(line) = output::format_compress_progress(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = compress::compress(&options, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            output::print_compress_report(&result?);
        }
        Command::Frame { events } => {
            let (config, content) = load(&cli.source)?;
            let mut shell = Shell::new(&content, ShellSettings::from_config(&config));
            for event in events {
                shell.post(event);
            }
            let effects = shell.run();
            println!("{}", output::format_frame_json(&shell.render(), &effects)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load and validate the config, then the content file it names.
fn load(source: &Path) -> Result<(SiteConfig, Content), Box<dyn std::error::Error>> {
    let config = config::load_config(source)?;
    let content_path = source.join(&config.content_file);
    info!(content = %content_path.display(), "loading content");
    let content = Content::load(&content_path)?;
    Ok((config, content))
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

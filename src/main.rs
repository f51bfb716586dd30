use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tqblog::article::RenderOptions;
use tqblog::regenerate::{self, Templates};
use tqblog::template::PageTemplate;
use tqblog::{config, dates, output};

#[derive(Parser)]
#[command(name = "tqblog")]
#[command(about = "Regenerates a blog dated in the Tranquility calendar")]
#[command(long_about = "\
Regenerates a blog dated in the Tranquility calendar

Every article lives in its own folder under the blog root. A folder becomes
part of the blog once it has been rendered with 'tqblog article'.

Blog structure:

  blog/
  ├── config.toml                  # Site config (optional)
  ├── template.html                # Tera page template
  ├── first-post/
  │   ├── content.md               # Source (content.html is used if absent)
  │   ├── attachments/             # Files linked from the item record
  │   ├── item.json                # Written on render, kept between renders
  │   └── index.html               # Written on render
  ├── index.html                   # Latest article
  ├── archive/index.html           # By Tranquility month
  ├── tags/index.html              # By tag
  └── feeds/                       # json, json1, ..., atom, rss

Dates are shown as Tranquility dates with the Gregorian date alongside.

Run 'tqblog gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Blog root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Log per-article detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a single article folder
    Article {
        /// Article folder
        dir: PathBuf,
        /// Title to use instead of the previous one
        #[arg(long)]
        title: Option<String>,
        /// Comma-separated tags replacing the previous ones
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
        /// Page template to use instead of the configured one
        #[arg(long)]
        template: Option<PathBuf>,
    },
    /// Re-render every article and regenerate the homepage, archive, tags and feeds
    Update {
        /// Page template to use instead of the configured one
        #[arg(long)]
        template: Option<PathBuf>,
        /// Homepage template to use instead of the configured one
        #[arg(long)]
        home_template: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Article {
            dir,
            title,
            tags,
            template,
        } => {
            let mut config = config::load_config(&cli.root)?;
            if let Some(path) = template {
                config.templates.article = std::path::absolute(path)?;
            }
            init_thread_pool(&config.processing);

            let template = PageTemplate::from_file(&config.templates.article_path(&cli.root))?;
            let options = RenderOptions { title, tags };
            let item = regenerate::render_one(&dir, &options, &config, &template, dates::now())?;
            output::print_article_output(&item);
        }
        Command::Update {
            template,
            home_template,
        } => {
            let mut config = config::load_config(&cli.root)?;
            if let Some(path) = template {
                config.templates.article = std::path::absolute(path)?;
            }
            if let Some(path) = home_template {
                config.templates.home = Some(std::path::absolute(path)?);
            }
            init_thread_pool(&config.processing);

            let templates = Templates::from_config(&cli.root, &config.templates)?;
            let report = regenerate::regenerate(&cli.root, &config, &templates, dates::now())?;
            output::print_update_output(&report);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `info` by default, `debug` with `--verbose`. `TQBLOG_LOG` overrides both.
fn init_logging(verbose: bool) {
    let env = env_logger::Env::new()
        .filter("TQBLOG_LOG")
        .write_style("TQBLOG_LOG_STYLE");
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env(env)
        .init();
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

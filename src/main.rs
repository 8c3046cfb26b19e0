use clap::{Parser, Subcommand};
use sitebake::{config, links, output, pipeline};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "sitebake")]
#[command(about = "Build a static site from partials, JSON content and CSS")]
#[command(long_about = "\
Build a static site from partials, JSON content and CSS

Project structure:

  site.toml                      # Optional config (run 'sitebake gen-config')
  src/
  ├── pages/                     # Page shells with <!-- section --> markers
  │   ├── index.html
  │   └── about.html
  ├── partials/                  # One file per section: head, header, hero, ...
  ├── assets/
  │   ├── css/styles.css         # Entry stylesheet; @imports are inlined
  │   ├── js/                    # Copied verbatim
  │   ├── img/
  │   └── icons/
  └── content/content.json       # All site copy

Output (dist/): minified pages, css/styles.<hash>.css, copied assets,
sitemap.xml and robots.txt.

Set RUST_LOG=debug for per-file logging.")]
#[command(version = version_string())]
struct Cli {
    /// Project root (directory containing site.toml and src/)
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Output directory (overrides paths.output)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: bundle → copy → inject → assemble → sitemap → validate
    Build,
    /// Validate internal links of an existing build
    Check,
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Command::Build => {
            let site_config = config::load_config(&cli.root)?;
            let mut layout = site_config.layout(&cli.root);
            if let Some(out) = cli.output {
                layout.output_dir = out;
            }

            println!("==> Building {}", cli.root.display());
            let report = pipeline::build_layout(&site_config, &layout)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", layout.output_dir.display());
        }
        Command::Check => {
            let site_config = config::load_config(&cli.root)?;
            let output_dir = cli
                .output
                .unwrap_or_else(|| site_config.layout(&cli.root).output_dir);
            println!("==> Checking {}", output_dir.display());
            let broken = links::validate_links(&output_dir)?;
            output::print_check_output(&broken);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

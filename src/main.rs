use clap::{Parser, Subcommand};
use site_forge::build::{self, BuildContext, BuildRequest, ThemeSource};
use site_forge::catalog::Catalog;
use site_forge::color::Color;
use site_forge::config::{self, SiteForgeConfig};
use site_forge::country::{self, Country};
use site_forge::selector::MixingPolicy;
use site_forge::theme::{ThemeMode, generate_theme};
use site_forge::{lint, output};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "site-forge")]
#[command(about = "Assemble themed sites from a catalog of component variants")]
#[command(long_about = "\
Assemble themed sites from a catalog of component variants

Every component directory holds a component.json descriptor and one
{variant}.html (required), .css and .js (optional) per variant:

  web-components-v2/
  ├── header/
  │   ├── component.json         # description + ordered variant list
  │   ├── modern.html
  │   ├── modern.css
  │   └── luxury.html
  ├── hero/
  └── footer/

A build picks one variant per component, generates a color theme from a
single seed color, and writes:

  web-folder/
  ├── index.html
  ├── css/styles.css
  ├── js/main.js
  └── theme.json                 # reusable with --theme-file

Mixing policies:
  single   one random variant per component
  smart    random variants from one compatible theme family
  wild     random variants among those with files present

Run 'site-forge gen-config' to generate a documented site-forge.toml.")]
#[command(version)]
struct Cli {
    /// Component catalog directory [default: from config]
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Output directory [default: from config]
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Config file
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List components with their valid/total variant counts
    List,
    /// Validate the catalog structure; fails when nothing is usable
    Validate,
    /// Generate a theme from a seed color and print its tokens
    Theme {
        /// Seed color (#RGB or #RRGGBB)
        #[arg(long)]
        seed: Option<Color>,
        /// light or dark
        #[arg(long)]
        mode: Option<ThemeMode>,
        /// Write the theme as JSON
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Select variants, assemble and write the site
    Build {
        /// Components to include, or `all` / `essential`
        components: Vec<String>,
        /// single, smart or wild (or menu number 1, 2, 3)
        #[arg(long)]
        policy: Option<MixingPolicy>,
        /// Seed color (#RGB or #RRGGBB)
        #[arg(long)]
        seed: Option<Color>,
        /// light or dark
        #[arg(long)]
        mode: Option<ThemeMode>,
        /// Fix the random seed for reproducible picks
        #[arg(long)]
        rng_seed: Option<u64>,
        /// Reuse a saved theme; --seed and --mode are ignored
        #[arg(long, conflicts_with_all = ["seed", "mode"])]
        theme_file: Option<PathBuf>,
    },
    /// Stage country-specific footer and offers content
    Country {
        /// Denmark, France, Portugal or UK-IR (any case)
        name: Country,
        /// Master content directory [default: from config]
        #[arg(long)]
        master: Option<PathBuf>,
    },
    /// Run heuristic checks over the generated site
    Check,
    /// Create the catalog directory with sample descriptors
    Init,
    /// Print a stock site-forge.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = config::load_config(&cli.config)?;
    let catalog_root = cli
        .catalog
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.catalog_root));
    let output_dir = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output_dir));

    match cli.command {
        Command::List => {
            let report = Catalog::open(&catalog_root)?.validate()?;
            output::print_catalog_report(&report);
        }
        Command::Validate => {
            println!("==> Validating {}", catalog_root.display());
            let report = Catalog::open(&catalog_root)?.validate()?;
            output::print_catalog_report(&report);
            report.ensure_usable()?;
            println!("==> Catalog is valid");
        }
        Command::Theme { seed, mode, save } => {
            let theme = generate_theme(
                seed.unwrap_or(config.theme.seed),
                mode.unwrap_or(config.theme.mode),
            );
            output::print_theme(&theme);
            if let Some(path) = save {
                theme.save(&path)?;
                println!("==> Theme saved to {}", path.display());
            }
        }
        Command::Build {
            components,
            policy,
            seed,
            mode,
            rng_seed,
            theme_file,
        } => {
            run_build(
                &config,
                &catalog_root,
                &output_dir,
                BuildRequest {
                    components: if components.is_empty() {
                        config.selection.components.clone()
                    } else {
                        components
                    },
                    policy: policy.unwrap_or(config.selection.policy),
                    theme: match theme_file {
                        Some(path) => ThemeSource::File(path),
                        None => ThemeSource::Generate {
                            seed: seed.unwrap_or(config.theme.seed),
                            mode: mode.unwrap_or(config.theme.mode),
                        },
                    },
                    rng_seed: rng_seed.or(config.selection.rng_seed),
                },
            )?;
        }
        Command::Country { name, master } => {
            let master_root = master.unwrap_or_else(|| PathBuf::from(&config.master_root));
            let report = country::apply_country(&master_root, name, &output_dir)?;
            output::print_country_report(&report);
        }
        Command::Check => {
            println!("==> Checking {}", output_dir.display());
            let report = lint::check_site(&output_dir)?;
            output::print_lint_report(&report);
        }
        Command::Init => {
            let created = Catalog::scaffold(&catalog_root)?;
            output::print_scaffold(&catalog_root, &created);
        }
        Command::GenConfig => {}
    }

    Ok(())
}

fn run_build(
    config: &SiteForgeConfig,
    catalog_root: &Path,
    output_dir: &Path,
    request: BuildRequest,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = BuildContext::new(catalog_root, output_dir, config.site.clone())?;

    println!(
        "==> Building {} with {} mixing",
        request.components.join(", "),
        request.policy
    );
    let outcome = build::run_build(&ctx, &request)?;

    output::print_selection(&outcome.selection);
    println!();
    output::print_run_summary(&outcome.summary, output_dir);
    println!("==> Theme saved to {}", outcome.theme_file.display());
    Ok(())
}

/// Log level from `-v` repetitions; `RUST_LOG`-style directives are not read.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

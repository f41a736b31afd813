use clap::{Parser, Subcommand};
use sitesmith::{assets, content, output, validate};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sitesmith")]
#[command(about = "Config-driven generator pipeline for small business sites")]
#[command(long_about = "\
Config-driven generator pipeline for small business sites

One configuration file is the data source. It declares the site identity,
theme, navigation, and an ordered list of typed sections; every textual field
is either a plain string or a per-language map.

Configuration structure:

  site.yaml
  ├── name, url, languages, defaultLanguage
  ├── theme:            # colors (required), fonts
  ├── navigation:       # logo, links, cta
  ├── sections:         # ordered list of { type, id, props }
  │     hero | services | gallery | about | contact | hours |
  │     featured | testimonials | cta-banner | text-block | map
  └── footer:           # text, social, links

Remote images referenced by https:// URLs anywhere in the file are downloaded
into the asset directory and the config is rewritten to point at the local
copies, so a second run touches the network only for new URLs.

Run 'sitesmith init' to print a documented starter configuration.")]
#[command(version)]
struct Cli {
    /// Site configuration file (.yaml, .yml or .json)
    #[arg(long, default_value = "site.yaml", global = true)]
    config: PathBuf,

    /// Directory for downloaded assets
    #[arg(long, default_value = "assets", global = true)]
    assets_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the configuration without touching the network
    Check,
    /// Download remote assets and rewrite the configuration in place
    Fetch,
    /// Run the full pipeline: check → fetch
    Build,
    /// Print a documented starter configuration
    Init,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match cli.command {
        Command::Check => {
            let tree = content::load(&cli.config)?;
            let report = run_check(&tree);
            Ok(exit_for(report.is_valid()))
        }
        Command::Fetch => {
            let mut tree = content::load(&cli.config)?;
            let report = run_fetch(&mut tree, cli)?;
            if report.rewritten > 0 {
                content::save(&cli.config, &tree)?;
            }
            Ok(exit_for(report.is_clean()))
        }
        Command::Build => {
            println!("==> Stage 1: Checking {}", cli.config.display());
            let mut tree = content::load(&cli.config)?;
            let check = run_check(&tree);
            if !check.is_valid() {
                return Ok(ExitCode::FAILURE);
            }

            println!("==> Stage 2: Fetching assets \u{2192} {}", cli.assets_dir.display());
            let fetch = run_fetch(&mut tree, cli)?;
            if fetch.rewritten > 0 {
                content::save(&cli.config, &tree)?;
            }

            println!("==> Build complete: {}", cli.config.display());
            Ok(exit_for(fetch.is_clean()))
        }
        Command::Init => {
            print!("{}", starter_config_yaml());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_check(tree: &serde_json::Value) -> sitesmith::issue::ValidationReport {
    let report = validate::validate(tree);
    output::print_validation_report(&report);
    report
}

fn run_fetch(
    tree: &mut serde_json::Value,
    cli: &Cli,
) -> Result<assets::AssetReport, Box<dyn std::error::Error>> {
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            println!("{}", output::format_fetch_event(&event));
        }
    });
    let report = assets::resolve_assets(tree, &cli.assets_dir, Some(tx))?;
    printer.join().map_err(|_| "printer thread panicked")?;
    output::print_asset_summary(&report);
    Ok(report)
}

fn exit_for(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// A complete, documented starter configuration for `init`.
fn starter_config_yaml() -> &'static str {
    r##"# Site configuration
# Textual fields accept either a plain string or a per-language map:
#   title: Welcome
#   title: { en: Welcome, fr: Bienvenue }

name: My Business
url: https://example.com
languages: [en]
defaultLanguage: en

theme:
  colors:
    primary: "#1a1a2e"
    accent: "#e94560"
    background: "#ffffff"

seo:
  description: A short description shown in search results.

navigation:
  links:
    - label: Home
      anchor: top
    - label: Contact
      anchor: contact

sections:
  - type: hero
    id: top
    props:
      title: Welcome
      subtitle: What we do, in one sentence.
      # image: https://example.com/hero.jpg   # remote URLs are downloaded by 'fetch'

  - type: about
    id: about
    props:
      title: About us
      text: A paragraph about the business.

  - type: contact
    id: contact
    props:
      title: Contact
      email: hello@example.com
      phone: "+1 555 0100"

footer:
  text: "© My Business"
"##
}

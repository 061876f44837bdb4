use clap::{Parser, Subcommand};
use folio::app::{App, PreviewCommand};
use folio::chrome::{ContactForm, HttpTransport, SubmitOutcome};
use folio::clock::SystemClock;
use folio::config::{self, SiteConfig};
use folio::content::{self, ContentDocument, LoadError, Store};
use folio::i18n::Labels;
use folio::prefs::{self, FilePreferences, LOCALE_KEY, PreferenceStore};
use folio::router::{Click, Element};
use folio::types::LinkKind;
use folio::{generate, output, render};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Bilingual single-page portfolio generator")]
#[command(long_about = "\
Bilingual single-page portfolio generator

One JSON document holds everything: profile, about, experience, projects,
and publications, keyed by locale.

  content.json
  {
    \"en\": { \"ui\": {...}, \"profile\": {...}, \"about\": {...},
            \"projects\": [...], \"experience\": [...], \"publications\": [...] },
    \"pt\": { ... }
  }

'folio build' writes one page per locale. 'folio preview' runs the page
headless: open project cards, step through the carousel, switch language.

Run 'folio gen-config' to generate a documented folio.toml.")]
#[command(version)]
struct Cli {
    /// Config file (stock defaults when it doesn't exist)
    #[arg(long, default_value = "folio.toml", global = true)]
    config: PathBuf,

    /// Content document path or http(s) URL (overrides the config)
    #[arg(long, global = true)]
    content: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every locale to static HTML
    Build {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
        /// Asset directory copied into the output (images, PDFs)
        #[arg(long)]
        assets: Option<PathBuf>,
    },
    /// Load and validate the content document, then list what it holds
    Check,
    /// Print the detail modal for a project or publication id
    Detail { id: String },
    /// Show the available locales, or store the preferred one
    Locale { code: Option<String> },
    /// Submit the contact form
    Contact {
        /// Form field as name=value (repeatable)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
        /// Action URL (defaults to the profile's contactAction)
        #[arg(long)]
        action: Option<String>,
    },
    /// Drive the page interactively from stdin
    Preview,
    /// Print a stock folio.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Build {
            output: output_dir,
            assets,
        } => {
            let site_config = load_config(&cli.config, cli.content)?;
            println!("==> Building {} → {}", site_config.content, output_dir.display());
            let document = match load_content(&site_config) {
                Ok(document) => document,
                Err(e) => {
                    let notice = generate::write_load_error(&e, &site_config, &output_dir)?;
                    report_load_error(&site_config, &e, Some(notice.as_path()));
                    std::process::exit(1);
                }
            };
            let summary =
                generate::generate(&document, &site_config, assets.as_deref(), &output_dir)?;
            output::print_generate_output(&summary);
        }
        Command::Check => {
            let (site_config, document) = load_site(&cli.config, cli.content)?;
            println!("==> Checking {}", site_config.content);
            Store::new(document.clone(), &site_config.default_locale)?;
            output::print_check_output(&document, &site_config.default_locale);
            println!("==> Content is valid");
        }
        Command::Detail { id } => {
            let (site_config, document) = load_site(&cli.config, cli.content)?;
            let mut app = boot(document, &site_config)?;
            let kind = if app.store().project(&id).is_some() {
                LinkKind::ProjectDetails
            } else {
                LinkKind::PublicationDetails
            };
            app.click(&Click::on(Element::card(kind, &id)));
            if !app.modal().is_open() {
                for line in output::format_detail_not_found(app.store().document(), app.locale(), &id) {
                    println!("{}", line);
                }
                std::process::exit(1);
            }
            println!("{}", app.modal().render().into_string());
        }
        Command::Locale { code } => {
            let (site_config, document) = load_site(&cli.config, cli.content)?;
            let mut prefs = open_prefs(&site_config);
            match code {
                Some(code) => {
                    Store::new(document, &code)?;
                    prefs.set(LOCALE_KEY, &code)?;
                    println!("Locale set to {code}");
                }
                None => {
                    let active = prefs::initial_locale(&mut prefs, &document, browser_language().as_deref())?;
                    output::print_locale_output(&document, &active);
                }
            }
        }
        Command::Contact { fields, action } => {
            let (site_config, document) = load_site(&cli.config, cli.content)?;
            let mut prefs = open_prefs(&site_config);
            let locale = prefs::initial_locale(&mut prefs, &document, browser_language().as_deref())?;
            let store = Store::new(document, &locale)?;

            let mut form = ContactForm::default();
            form.set_action(action.as_deref().or(store.bundle().profile.contact_action.as_deref()));
            for (name, value) in &fields {
                form.set_field(name, value);
            }
            let transport =
                HttpTransport::new(Duration::from_secs(site_config.contact.request_timeout_secs))?;
            let outcome = form.submit(&transport, Labels::for_locale(&locale), Duration::ZERO, Duration::ZERO);
            let status = form.status().map(|s| s.text.as_str());
            for line in output::format_contact_outcome(&outcome, status) {
                println!("{}", line);
            }
            if outcome != SubmitOutcome::Sent {
                std::process::exit(1);
            }
        }
        Command::Preview => {
            let site_config = load_config(&cli.config, cli.content)?;
            let document = match load_content(&site_config) {
                Ok(document) => document,
                Err(e) => {
                    let locale = site_config.default_locale.as_str();
                    let page = render::load_error_document(Labels::for_locale(locale), locale, &e.to_string());
                    println!("{}", page.into_string());
                    report_load_error(&site_config, &e, None);
                    std::process::exit(1);
                }
            };
            let app = boot(document, &site_config)?;
            run_preview(app)?;
        }
    }

    Ok(())
}

/// Config merged over stock defaults, then the content document it names.
fn load_site(
    config_path: &Path,
    content_override: Option<String>,
) -> Result<(SiteConfig, ContentDocument), Box<dyn std::error::Error>> {
    let site_config = load_config(config_path, content_override)?;
    let document = load_content(&site_config)?;
    Ok((site_config, document))
}

fn load_config(
    config_path: &Path,
    content_override: Option<String>,
) -> Result<SiteConfig, Box<dyn std::error::Error>> {
    let mut site_config = config::load_config(config_path)?;
    if let Some(content) = content_override {
        site_config.content = content;
    }
    Ok(site_config)
}

fn load_content(site_config: &SiteConfig) -> Result<ContentDocument, LoadError> {
    content::load(
        &site_config.content,
        &site_config.fetch,
        &site_config.default_locale,
    )
}

fn report_load_error(site_config: &SiteConfig, error: &LoadError, notice: Option<&Path>) {
    for line in output::format_load_error(&site_config.content, error, notice) {
        eprintln!("{}", line);
    }
}

fn open_prefs(config: &SiteConfig) -> FilePreferences {
    FilePreferences::open(Path::new(&config.storage.preferences_path))
}

/// Language tag from the environment (`LANG=pt_BR.UTF-8` → `pt_BR`).
fn browser_language() -> Option<String> {
    let lang = std::env::var("LANG").ok()?;
    let tag = lang.split('.').next().unwrap_or_default().trim();
    (!tag.is_empty()).then(|| tag.to_string())
}

fn boot(
    document: ContentDocument,
    config: &SiteConfig,
) -> Result<App<SystemClock, FilePreferences>, Box<dyn std::error::Error>> {
    let prefs = open_prefs(config);
    let language = browser_language();
    Ok(App::boot(document, config, SystemClock::new(), prefs, language.as_deref())?)
}

fn run_preview(mut app: App<SystemClock, FilePreferences>) -> io::Result<()> {
    println!("Commands: click <project|pub|pdf|image|link> <arg>, next, prev, close,");
    println!("          backdrop, menu, locale, wait <ms>, show, quit");
    output::print_preview_state(&app);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    print!("> ");
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        app.tick();
        if !line.trim().is_empty() {
            match line.parse::<PreviewCommand>() {
                Ok(PreviewCommand::Quit) => break,
                Ok(PreviewCommand::Show) => output::print_preview_state(&app),
                Ok(PreviewCommand::Wait(duration)) => {
                    std::thread::sleep(duration);
                    app.tick();
                    output::print_preview_state(&app);
                }
                Ok(PreviewCommand::Click(click)) => {
                    let dispatch = app.click(&click);
                    if let Some(line) = output::format_dispatch(&dispatch) {
                        println!("{}", line);
                    }
                    output::print_preview_state(&app);
                }
                Err(e) => println!("{e}"),
            }
        }
        print!("> ");
        stdout.flush()?;
    }
    println!();
    Ok(())
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected name=value, got {raw:?}")),
    }
}

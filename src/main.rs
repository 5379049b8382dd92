use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};

use codeshot::rendering::raster::load_fonts;
use codeshot::{
    Clipboard, DownloadDir, EditorSession, Highlighter, Language, NoticeKind, PanelConfig,
    PlainHighlighter, SessionParts, SvgRenderer, SyntectHighlighter, SystemClipboard,
};

#[derive(Parser)]
#[command(name = "codeshot", version, about = "Screenshot-ready code panels and share links")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export code as a PNG panel
    Render {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print a share URL for code and copy it to the clipboard
    Share {
        #[command(flatten)]
        input: InputArgs,
        /// Origin the URL is built on
        #[arg(long)]
        origin: Option<String>,
        /// Only print the URL
        #[arg(long)]
        no_copy: bool,
    },
    /// Open a share URL or `/share/<token>` path
    Open {
        route: String,
        /// Also export the decoded document as a PNG
        #[arg(long)]
        export: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List supported languages
    Languages,
}

#[derive(Args)]
struct InputArgs {
    /// Source file; reads stdin when omitted or `-`
    file: Option<PathBuf>,
    /// Language id or extension
    #[arg(short, long, default_value = "javascript")]
    language: Language,
}

#[derive(Args)]
struct OutputArgs {
    /// Directory the image is saved in
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
    /// Extra font files to load
    #[arg(long)]
    font: Vec<PathBuf>,
    /// Highlighting theme
    #[arg(long)]
    theme: Option<String>,
    /// Cap the panel height; longer code scrolls inside the panel
    #[arg(long)]
    max_height: Option<u32>,
}

/// Stand-in for environments without a usable clipboard.
struct UnavailableClipboard(String);

#[async_trait]
impl Clipboard for UnavailableClipboard {
    async fn write_text(&self, _text: &str) -> codeshot::Result<()> {
        Err(codeshot::Error::PublishClipboardDenied(self.0.clone()))
    }
}

fn read_input(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            Ok(buf)
        }
    }
}

/// Build the session capabilities. Without `output` nothing is rasterized, so
/// the system font scan and syntax loading are skipped.
fn session_parts(config: &PanelConfig, output: Option<&OutputArgs>, clipboard: Box<dyn Clipboard>) -> anyhow::Result<SessionParts> {
    let (highlighter, fonts): (Box<dyn Highlighter>, _) = match output {
        Some(o) => (
            Box::new(SyntectHighlighter::with_theme(&config.style.theme)),
            load_fonts(o.font.as_slice())?,
        ),
        None => (Box::new(PlainHighlighter::default()), Arc::new(fontdb::Database::new())),
    };
    let renderer = SvgRenderer::new(highlighter, config.layout, config.style.clone(), fonts);
    let out_dir = output.map(|o| o.out_dir.clone()).unwrap_or_else(|| PathBuf::from("."));
    Ok(SessionParts {
        renderer: Box::new(renderer),
        clipboard,
        writer: Box::new(DownloadDir::new(out_dir)),
    })
}

fn apply_output(config: &mut PanelConfig, output: &OutputArgs) {
    if let Some(theme) = &output.theme {
        config.style.theme = theme.clone();
    }
    if output.max_height.is_some() {
        config.layout.max_height_px = output.max_height;
    }
}

fn print_notices(session: &mut EditorSession) -> bool {
    let mut failed = false;
    for notice in session.take_notices() {
        match notice.kind {
            NoticeKind::Success => match notice.link {
                Some(link) => println!("{}: {}", notice.message, link),
                None => println!("{}", notice.message),
            },
            NoticeKind::Error => {
                failed = true;
                let hint = if notice.retryable { " (try again)" } else { "" };
                eprintln!("{}{}", notice.message, hint);
            }
        }
    }
    failed
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = match &cli.config {
        Some(path) => PanelConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => PanelConfig::default(),
    };

    match cli.command {
        Command::Languages => {
            for lang in Language::ALL {
                let marker = if lang == Language::DEFAULT { " (default)" } else { "" };
                println!("{:<12} {:<10} .{}{}", lang.id(), lang.display_name(), lang.extension(), marker);
            }
        }

        Command::Render { input, output } => {
            apply_output(&mut config, &output);
            let code = read_input(input.file.as_ref())?;
            let parts = session_parts(
                &config,
                Some(&output),
                Box::new(UnavailableClipboard("not used for rendering".into())),
            )?;
            let mut session = EditorSession::new(&config, parts)?;
            session.set_language(input.language);
            session.set_code(code);
            let result = session.export_image().await;
            print_notices(&mut session);
            let receipt = result?;
            log::info!("{} lines, {}x{} px", session.metrics().line_count, receipt.width, receipt.height);
        }

        Command::Share { input, origin, no_copy } => {
            if let Some(origin) = origin {
                config.share_origin = origin;
            }
            let code = read_input(input.file.as_ref())?;
            let clipboard: Box<dyn Clipboard> = if no_copy {
                Box::new(UnavailableClipboard("copying disabled".into()))
            } else {
                match SystemClipboard::new().await {
                    Ok(c) => Box::new(c),
                    Err(e) => Box::new(UnavailableClipboard(e.to_string())),
                }
            };
            let parts = session_parts(&config, None, clipboard)?;
            let mut session = EditorSession::new(&config, parts)?;
            session.set_language(input.language);
            session.set_code(code);

            if no_copy {
                println!("{}", session.share_url()?.url);
            } else {
                let result = session.share().await;
                print_notices(&mut session);
                if result.is_err() {
                    // The link is still usable even when the clipboard is not.
                    println!("{}", session.share_url()?.url);
                }
            }
        }

        Command::Open { route, export, output } => {
            apply_output(&mut config, &output);
            let parts = session_parts(
                &config,
                Some(&output),
                Box::new(UnavailableClipboard("not used when opening".into())),
            )?;
            let mut session = EditorSession::from_share_route(&route, &config, parts)?;
            if print_notices(&mut session) {
                bail!("could not open {}", route);
            }
            let doc = session.document();
            eprintln!("{} ({} lines)", doc.language.file_label(), session.metrics().line_count);
            println!("{}", doc.code);

            if export {
                let result = session.export_image().await;
                print_notices(&mut session);
                result?;
            }
        }
    }

    Ok(())
}

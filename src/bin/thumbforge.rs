use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use thumbforge::{
    BackgroundSource, Canvas, FontSet, NoSuggestions, Notice, RenderOutcome, RenderRequest,
    RenderSurface, Studio, StudioConfig, SuggestionSource, SuggestionsClient, ThumbError,
    ThumbnailPrompt, ThumbnailRenderer, Topic,
};

#[derive(Parser, Debug)]
#[command(name = "thumbforge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the five title variants for a topic.
    Titles { topic: String },
    /// Print related topics from the configured suggestions service.
    Suggest { topic: String },
    /// Print the image-generator prompt for a topic.
    Prompt { topic: String },
    /// Render a thumbnail as a PNG.
    Render(RenderArgs),
    /// Titles, suggestions, prompt and preview in one pass.
    Studio(StudioArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    topic: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Title to draw instead of the first generated variant.
    #[arg(long)]
    title: Option<String>,

    /// Background image file; procedural background when omitted.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Print diagnostics about font resolution (family name + SHA-256 of font bytes).
    #[arg(long)]
    dump_fonts: bool,
}

#[derive(Parser, Debug)]
struct StudioArgs {
    topic: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Background image file; procedural background when omitted.
    #[arg(long)]
    background: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("thumbforge=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            let notice = match err.downcast_ref::<Notice>() {
                Some(notice) => notice.clone(),
                None => err
                    .downcast_ref::<ThumbError>()
                    .map(Notice::from_error)
                    .unwrap_or(Notice::Failed),
            };
            eprintln!("{notice}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = StudioConfig::from_env()?;
    match cli.cmd {
        Command::Titles { topic } => cmd_titles(&topic),
        Command::Suggest { topic } => cmd_suggest(&config, &topic).await,
        Command::Prompt { topic } => cmd_prompt(&topic),
        Command::Render(args) => cmd_render(&config, args).await,
        Command::Studio(args) => cmd_studio(&config, args).await,
    }
}

fn cmd_titles(topic: &str) -> anyhow::Result<()> {
    let topic = Topic::parse(topic)?;
    for title in &thumbforge::generate(&topic) {
        println!("{title}");
    }
    Ok(())
}

fn cmd_prompt(topic: &str) -> anyhow::Result<()> {
    let topic = Topic::parse(topic)?;
    println!("{}", ThumbnailPrompt::for_topic(&topic));
    Ok(())
}

fn suggestion_source(config: &StudioConfig) -> anyhow::Result<Box<dyn SuggestionSource>> {
    Ok(match SuggestionsClient::from_config(config)? {
        Some(client) => Box::new(client),
        None => {
            tracing::info!("THUMBFORGE_SUGGESTIONS_URL not set; suggestions disabled");
            Box::new(NoSuggestions)
        }
    })
}

async fn cmd_suggest(config: &StudioConfig, topic: &str) -> anyhow::Result<()> {
    let topic = Topic::parse(topic)?;
    let source = suggestion_source(config)?;
    for suggestion in source.suggestions(&topic).await {
        println!("{suggestion}");
    }
    Ok(())
}

fn resolve_fonts(config: &StudioConfig) -> anyhow::Result<FontSet> {
    Ok(FontSet::resolve(
        config.title_font.as_deref(),
        config.caption_font.as_deref(),
    )?)
}

fn read_background(path: Option<&Path>) -> anyhow::Result<BackgroundSource> {
    let Some(path) = path else {
        return Ok(BackgroundSource::Procedural);
    };
    let bytes = std::fs::read(path)
        .with_context(|| format!("read background image '{}'", path.display()))?;
    Ok(BackgroundSource::from_bytes(bytes))
}

async fn cmd_render(config: &StudioConfig, args: RenderArgs) -> anyhow::Result<()> {
    let topic = Topic::parse(&args.topic)?;
    let title = match args.title {
        Some(title) => title,
        None => thumbforge::generate(&topic).first().to_string(),
    };
    let background = read_background(args.background.as_deref())?;

    let fonts = resolve_fonts(config)?;
    let mut renderer = ThumbnailRenderer::with_fonts(Canvas::THUMBNAIL, &fonts)?;
    if args.dump_fonts {
        eprintln!("text font diagnostics:");
        for (role, (family, face)) in ["title", "caption"].into_iter().zip(renderer.backend().faces()) {
            eprintln!("- {role}: family='{family}' sha256={}", face.sha256_hex());
        }
    }

    let mut surface = RenderSurface::new(Canvas::THUMBNAIL);
    let outcome = renderer
        .render(&mut surface, RenderRequest::new(title, background))
        .await?;
    if outcome != RenderOutcome::Drawn {
        return Err(ThumbError::decode("background image could not be decoded").into());
    }

    surface.save_png(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

async fn cmd_studio(config: &StudioConfig, args: StudioArgs) -> anyhow::Result<()> {
    let fonts = resolve_fonts(config)?;
    let renderer = ThumbnailRenderer::with_fonts(Canvas::THUMBNAIL, &fonts)?;
    let mut studio = Studio::new(renderer, suggestion_source(config)?);

    let titles = studio.submit_topic(&args.topic)?.clone();
    for title in &titles {
        println!("{title}");
    }
    for suggestion in studio.refresh_suggestions().await {
        println!("sugerencia: {suggestion}");
    }
    if let Some(prompt) = studio.prompt() {
        println!("prompt: {prompt}");
    }

    // Procedural first, so a photo that fails to decode leaves a usable preview.
    studio.render_preview(titles.first()).await?;
    if let Some(background) = args.background.as_deref() {
        studio.set_background(read_background(Some(background))?);
        if studio.render_preview(titles.first()).await? == RenderOutcome::DecodeFailed {
            eprintln!("background image could not be decoded; kept the procedural preview");
        }
    }

    studio.surface().save_png(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

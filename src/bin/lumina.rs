use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use lumina::{
    Canvas, ClientConfig, Compositor, GenerationClient, LoaderConfig, Profile, RasterLoader,
    RenderOptions, RenderSession,
    design::{DesignState, NormalizeContext, normalize_with},
    draft_post,
};

#[derive(Parser, Debug)]
#[command(name = "lumina", version, about = "Generate branded social-media posts")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate copy and design for a topic, then render the post as a PNG.
    Generate(GenerateArgs),
    /// Render a design JSON file offline as a PNG.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Square canvas size in pixels.
    #[arg(long, default_value_t = Canvas::REFERENCE_SIZE)]
    size: u32,

    /// Seed for grain and the background image service.
    #[arg(long)]
    seed: Option<u64>,

    /// Grain amplitude (0 disables).
    #[arg(long, default_value_t = 10)]
    grain: u8,

    /// Extra font directory (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,
}

impl OutputArgs {
    fn compositor(&self) -> Compositor {
        Compositor::new(RenderOptions {
            grain_amplitude: self.grain,
            grain_seed: self.seed,
            font_dirs: self.font_dirs.clone(),
        })
    }

    fn canvas(&self) -> anyhow::Result<Canvas> {
        Canvas::square(self.size).context("invalid --size")
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// What the post is about.
    #[arg(long)]
    topic: String,

    /// Profile JSON (business name, industry, tone, logo).
    #[arg(long)]
    profile: Option<PathBuf>,

    /// API key; overrides the profile's key.
    #[arg(long, env = "LUMINA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Client config JSON (endpoint, timeout, retries).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip background photo and logo loading.
    #[arg(long, default_value_t = false)]
    no_images: bool,

    /// Also write the draft (caption, hashtags, resolved design) as JSON.
    #[arg(long)]
    draft_json: Option<PathBuf>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Design JSON as returned by the model.
    #[arg(long)]
    design: PathBuf,

    /// Headline to draw.
    #[arg(long)]
    headline: String,

    /// Business name for the watermark.
    #[arg(long)]
    brand: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args).await,
        Command::Render(args) => cmd_render(args),
    }
}

async fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut profile = match &args.profile {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("read profile '{}'", path.display()))?;
            Profile::from_json(&raw)?
        }
        None => Profile::default(),
    };
    if let Some(key) = args.api_key {
        profile.credential = Some(key);
    }

    let config = match &args.config {
        Some(path) => ClientConfig::from_path(path)?,
        None => ClientConfig::default(),
    };
    let client = GenerationClient::new(config)?;

    let draft = draft_post(&client, &args.topic, &profile).await;
    if let Some(failure) = &draft.failure {
        eprintln!("generation failed ({failure}); rendering fallback design");
    }

    let canvas = args.output.canvas()?;
    let mut session = RenderSession::new(draft.state(), args.output.compositor(), canvas);
    if !args.no_images {
        let loader = RasterLoader::new(LoaderConfig::default())?;
        let seed = args.output.seed.unwrap_or_else(|| rand::random::<u64>() % 1000);
        let (tx, mut rx) = mpsc::channel(4);
        let handles = draft.request_rasters(&loader, canvas, seed, &tx);
        drop(tx);
        let applied = session.drain(&mut rx).await;
        tracing::info!(requested = handles.len(), applied, "rasters applied");
    }

    session
        .frame()
        .save_png(&args.output.out)
        .with_context(|| format!("save '{}'", args.output.out.display()))?;

    if let Some(path) = &args.draft_json {
        write_json(path, &draft)?;
    }

    if !draft.caption.is_empty() {
        println!("{}", draft.caption);
    }
    if !draft.hashtags.is_empty() {
        println!("{}", draft.hashtags.join(" "));
    }
    eprintln!("wrote {}", args.output.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.design)
        .with_context(|| format!("read design '{}'", args.design.display()))?;
    let design: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("parse design '{}'", args.design.display()))?;

    let ctx = NormalizeContext {
        topic: "",
        headline: Some(&args.headline),
        brand_name: args.brand.as_deref(),
    };
    let state = DesignState::new(normalize_with(Some(&design), &ctx));

    let canvas = args.output.canvas()?;
    let frame = args.output.compositor().render(&state.descriptor, canvas);
    frame
        .save_png(&args.output.out)
        .with_context(|| format!("save '{}'", args.output.out.display()))?;

    eprintln!("wrote {}", args.output.out.display());
    Ok(())
}

fn write_json(path: &Path, value: &impl serde::Serialize) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize draft")?;
    std::fs::write(path, json).with_context(|| format!("write '{}'", path.display()))
}

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use flipbook::{
    ExpressionListing, FaceRepository, FlipbookError, FrameType, FsLoader, Individual, Millis,
    PixmapSurface, TimerBook, ViewerConfig,
};

#[derive(Parser, Debug)]
#[command(name = "flipbook", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one still frame of an expression as a PNG.
    Frame(FrameArgs),
    /// Play an expression in virtual time and write every painted frame as a PNG.
    Play(PlayArgs),
    /// List characters, or the expressions of one character.
    List(ListArgs),
}

#[derive(Args, Debug)]
struct GameArgs {
    /// Root of the game file tree.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Abstract faces document, relative to the root. Skipped when missing.
    #[arg(long, default_value = "abstract_faces.json")]
    abstract_faces: String,
}

#[derive(Args, Debug)]
struct ViewArgs {
    /// Character id, `{category}.{name}`.
    #[arg(long)]
    character: String,

    /// Expression name; defaults to SHAKE, else the first listed expression.
    #[arg(long)]
    expression: Option<String>,

    /// Viewer config JSON (`debug`, `frameType`, `loopOnHover`). Flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Framing mode.
    #[arg(long, value_enum)]
    frame_type: Option<FrameTypeChoice>,

    /// Draw translucent parts with outlines and labels.
    #[arg(long)]
    debug: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    game: GameArgs,

    #[command(flatten)]
    view: ViewArgs,

    /// Virtual time (ms) to advance an animated expression to before capturing.
    #[arg(long, default_value_t = 0)]
    at: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    #[command(flatten)]
    game: GameArgs,

    #[command(flatten)]
    view: ViewArgs,

    /// Hover over the face from the start, looping if the config allows it.
    #[arg(long)]
    hover: bool,

    /// Stop after this much virtual time (ms).
    #[arg(long, default_value_t = 10_000)]
    until: u64,

    /// Output directory for `frame_NNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct ListArgs {
    #[command(flatten)]
    game: GameArgs,

    /// Character index, relative to the root.
    #[arg(long, default_value = "index.json")]
    index: String,

    /// List the expressions of this character instead of the index.
    #[arg(long)]
    character: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FrameTypeChoice {
    Default,
    FaceOnly,
    Expand,
}

impl From<FrameTypeChoice> for FrameType {
    fn from(choice: FrameTypeChoice) -> Self {
        match choice {
            FrameTypeChoice::Default => FrameType::Default,
            FrameTypeChoice::FaceOnly => FrameType::FaceOnly,
            FrameTypeChoice::Expand => FrameType::Expand,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Play(args) => cmd_play(args),
        Command::List(args) => cmd_list(args),
    }
}

fn open_repo(game: &GameArgs) -> anyhow::Result<FaceRepository<FsLoader>> {
    let mut repo = FaceRepository::new(FsLoader::new(&game.root));
    match repo.load_abstract_faces(&game.abstract_faces) {
        Ok(()) => {}
        Err(FlipbookError::Load { path, source }) => {
            tracing::warn!(path, error = %source, "no abstract faces, string faces won't resolve");
        }
        Err(e) => return Err(e).context("load abstract faces"),
    }
    Ok(repo)
}

fn viewer_config(view: &ViewArgs) -> anyhow::Result<ViewerConfig> {
    let mut config = match &view.config {
        Some(path) => ViewerConfig::from_json_file(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(frame_type) = view.frame_type {
        config.frame.frame_type = frame_type.into();
    }
    config.frame.debug |= view.debug;
    Ok(config)
}

fn pick_expression(
    repo: &mut FaceRepository<FsLoader>,
    view: &ViewArgs,
) -> anyhow::Result<String> {
    if let Some(name) = &view.expression {
        return Ok(name.clone());
    }
    let name = match repo.expression_listing(&view.character)? {
        ExpressionListing::Names(names) => flipbook::default_expression(&names)
            .unwrap_or(flipbook::DEFAULT_EXPRESSION)
            .to_owned(),
        ExpressionListing::AbstractRef(_) => flipbook::DEFAULT_EXPRESSION.to_owned(),
        ExpressionListing::NoFace => anyhow::bail!("{} has no face", view.character),
    };
    Ok(name)
}

fn bind(
    game: &GameArgs,
    view: &ViewArgs,
    timers: &TimerBook,
) -> anyhow::Result<Individual<PixmapSurface>> {
    let mut repo = open_repo(game)?;
    let config = viewer_config(view)?;
    let expression = pick_expression(&mut repo, view)?;

    let resolved = repo
        .resolve(&view.character, &expression)?
        .with_context(|| format!("{} has no face", view.character))?;
    tracing::info!(character = %resolved.id, expression, "resolved");
    Ok(resolved.bind(PixmapSurface::new(1, 1), config, timers)?)
}

fn save(individual: &Individual<PixmapSurface>, out: &Path) -> anyhow::Result<()> {
    let surface = individual
        .surface()
        .context("individual lost its surface")?;
    surface.save_png(out)?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let timers = TimerBook::new();
    let mut individual = bind(&args.game, &args.view, &timers)?;
    individual.render(Millis::ZERO)?;
    if args.at > 0 {
        individual.advance(Millis(args.at))?;
    }
    individual.clean();

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    save(&individual, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let timers = TimerBook::new();
    let mut individual = bind(&args.game, &args.view, &timers)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    let frame_path = |n: usize| args.out_dir.join(format!("frame_{n:04}.png"));

    individual.render(Millis::ZERO)?;
    if args.hover {
        individual.pointer_enter(Millis::ZERO)?;
    }
    save(&individual, &frame_path(0))?;
    let mut written = 1;

    let until = Millis(args.until);
    while let Some(at) = individual.next_deadline() {
        if at > until {
            break;
        }
        individual.advance(at)?;
        save(&individual, &frame_path(written))?;
        tracing::debug!(at = at.0, frame = written, "captured");
        written += 1;
    }
    individual.clean();

    eprintln!("wrote {written} frames to {}", args.out_dir.display());
    Ok(())
}

fn cmd_list(args: ListArgs) -> anyhow::Result<()> {
    let mut repo = open_repo(&args.game)?;
    let Some(character) = &args.character else {
        for id in repo.load_character_index(&args.index)? {
            println!("{id}");
        }
        return Ok(());
    };

    match repo.expression_listing(character)? {
        ExpressionListing::NoFace => println!("(no face)"),
        ExpressionListing::AbstractRef(name) => println!("(abstract face {name})"),
        ExpressionListing::Names(names) => {
            let preferred = flipbook::default_expression(&names).map(str::to_owned);
            for name in names {
                let marker = if Some(&name) == preferred.as_ref() { "*" } else { " " };
                println!("{marker} {name}");
            }
        }
    }
    Ok(())
}

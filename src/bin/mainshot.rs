use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mainshot", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one template for one product.
    Render(RenderArgs),
    /// Render one product for several platforms.
    Compose(ComposeArgs),
    /// List templates in a directory.
    Templates(TemplatesArgs),
    /// List platform presets.
    Platforms,
    /// List background scene presets.
    Scenes,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Template JSON.
    #[arg(long)]
    template: PathBuf,

    /// Product image (transparent background recommended).
    #[arg(long)]
    product: PathBuf,

    /// Product info JSON (`name`, `price`, `selling_points`, ...).
    #[arg(long)]
    info: PathBuf,

    /// Output image; the format follows the extension.
    #[arg(long)]
    out: PathBuf,

    /// Store logo drawn at the bottom-right corner.
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Pre-generated background for `ai` templates.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Finished scene with the product already in it; text is drawn on top.
    #[arg(long)]
    composite: Option<PathBuf>,

    /// Allow `ai` templates to call the background generation service.
    #[arg(long)]
    generate: bool,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Template directory; the built-in presets are used when omitted.
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Product image.
    #[arg(long)]
    product: PathBuf,

    /// Product info JSON.
    #[arg(long)]
    info: PathBuf,

    /// Platform key; repeat for several platforms.
    #[arg(long = "platform", required = true)]
    platforms: Vec<String>,

    /// Style key (promo, minimal, premium, fresh, social, ai_*).
    #[arg(long, default_value = "promo")]
    style: String,

    /// Output directory; one `<platform>.png` per platform.
    #[arg(long)]
    out_dir: PathBuf,

    /// Store logo.
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Pre-generated background passed to every `ai` template.
    #[arg(long)]
    background: Option<PathBuf>,

    /// The product already has a transparent background.
    #[arg(long)]
    skip_bg_removal: bool,

    /// Allow `ai` templates to call the background generation service.
    #[arg(long)]
    generate: bool,

    /// Let the service build the whole scene around the product (implies --generate).
    #[arg(long)]
    scene: bool,
}

#[derive(Parser, Debug)]
struct TemplatesArgs {
    /// Template directory; the built-in presets are listed when omitted.
    #[arg(long)]
    dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Compose(args) => cmd_compose(args),
        Command::Templates(args) => cmd_templates(args),
        Command::Platforms => cmd_platforms(),
        Command::Scenes => cmd_scenes(),
    }
}

fn read_info(path: &Path) -> anyhow::Result<mainshot::ProductInfo> {
    let f = File::open(path).with_context(|| format!("open product info '{}'", path.display()))?;
    Ok(mainshot::ProductInfo::from_reader(BufReader::new(f))?)
}

fn read_image(path: &Path) -> anyhow::Result<image::RgbaImage> {
    mainshot::load_image(path).with_context(|| format!("load image '{}'", path.display()))
}

fn read_optional(path: Option<&PathBuf>) -> anyhow::Result<Option<image::RgbaImage>> {
    path.map(|p| read_image(p)).transpose()
}

fn make_generator(
    enabled: bool,
) -> anyhow::Result<Option<Arc<dyn mainshot::BackgroundGenerator>>> {
    if !enabled {
        return Ok(None);
    }
    let generator = mainshot::HttpBackgroundGenerator::from_env()?;
    Ok(Some(Arc::new(generator)))
}

fn create_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn load_store(dir: Option<&PathBuf>) -> anyhow::Result<Arc<dyn mainshot::TemplateStore>> {
    Ok(match dir {
        Some(dir) => Arc::new(mainshot::DirTemplateStore::new(dir)),
        None => Arc::new(mainshot::MemoryTemplateStore::builtin()?),
    })
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let template = mainshot::Template::from_path(&args.template)?;
    let product = read_image(&args.product)?;
    let info = read_info(&args.info)?;
    let logo = read_optional(args.logo.as_ref())?;
    let background = read_optional(args.background.as_ref())?;
    let composite = read_optional(args.composite.as_ref())?;

    let mut renderer = mainshot::Renderer::default().with_generator(make_generator(args.generate)?);
    let inputs = mainshot::RenderInputs::new(&product, &info)
        .with_logo(logo.as_ref())
        .with_background(background.as_ref())
        .with_composite(composite.as_ref());
    let image = renderer.render(&template, &inputs)?;

    create_parent(&args.out)?;
    image
        .save(&args.out)
        .with_context(|| format!("write image '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let store = load_store(args.templates.as_ref())?;
    let product = image::open(&args.product)
        .with_context(|| format!("load image '{}'", args.product.display()))?;
    let info = read_info(&args.info)?;
    let logo = read_optional(args.logo.as_ref())?;
    let background = read_optional(args.background.as_ref())?;

    let opts = mainshot::ComposerOpts::default()
        .with_skip_bg_removal(args.skip_bg_removal)
        .with_scene_compose(args.scene)
        .with_ai_background(background);
    let composer = mainshot::Composer::new(store)
        .with_generator(make_generator(args.generate || args.scene)?)
        .with_opts(opts);

    let images =
        composer.compose_platforms(&product, &info, &args.platforms, &args.style, logo.as_ref())?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for (platform, image) in images {
        let out = args.out_dir.join(format!("{platform}.png"));
        image
            .save(&out)
            .with_context(|| format!("write image '{}'", out.display()))?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

fn cmd_templates(args: TemplatesArgs) -> anyhow::Result<()> {
    let store = load_store(args.dir.as_ref())?;
    for t in store.list()? {
        println!(
            "{:<24} {:<12} {:>5}x{:<5} {}",
            t.source.as_deref().unwrap_or("-"),
            t.platform.as_deref().unwrap_or("-"),
            t.canvas.width,
            t.canvas.height,
            t.name,
        );
    }
    Ok(())
}

fn cmd_platforms() -> anyhow::Result<()> {
    let catalog = mainshot::PresetCatalog::builtin();
    for p in &catalog.platforms {
        println!(
            "{:<12} {:>5}x{:<5} title<={:<3} {} ({})",
            p.key, p.width, p.height, p.title_max_chars, p.label, p.style_hint
        );
    }
    Ok(())
}

fn cmd_scenes() -> anyhow::Result<()> {
    let catalog = mainshot::PresetCatalog::builtin();
    for category in &catalog.scene_categories {
        println!("{}:", category.category);
        for scene in &category.scenes {
            println!("  {}: {}", scene.label, scene.prompt);
        }
    }
    Ok(())
}

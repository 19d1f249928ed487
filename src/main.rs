use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use stone_identifier::app::App;
use stone_identifier::image::{FileInput, SelectedFile};
use stone_identifier::models::Config;
use stone_identifier::view;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "stone-identifier")]
#[command(about = "Identify a stone from a photo and describe its geology")]
struct CliArgs {
    /// Stone photo to upload (PNG, JPG or JPEG, max 20MB).
    #[arg(value_name = "IMAGE")]
    image: Option<PathBuf>,

    /// Re-run identification on the current image.
    #[arg(long)]
    identify: bool,

    /// Print the page as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stone_identifier=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting stone-identifier");
    let mut app = App::from_config(&config);
    app.load_default().await;

    if let Some(path) = &args.image {
        let mut input = FileInput::new();
        match SelectedFile::from_path(path).await {
            Ok(file) => {
                input.select(file);
                app.upload(&mut input).await;
            }
            Err(e) => {
                error!("Could not open {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }

    if args.identify {
        app.reanalyze().await;
    }

    let page = if args.json {
        view::render_json(app.state())?
    } else {
        view::render_text(app.state())
    };
    println!("{}", page);

    if app.state().error.is_some() {
        std::process::exit(1);
    }
    Ok(())
}

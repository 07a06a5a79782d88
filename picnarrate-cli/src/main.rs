mod ui;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::info;
use picnarrate_appcore::AppService;
use picnarrate_appcore::service::waveform_data_url;
use picnarrate_core::config::ClientConfig;
use picnarrate_core::media::{ImageFile, UploadRequest};
use picnarrate_core::types::{DescriptionMode, Language, Speaker, ThemeMode, UploadOptions};
use picnarrate_engine::orchestrator::{StateHook, SubmitOutcome};
use picnarrate_engine::waveform::WaveformOutcome;
use picnarrate_engine::workflow::UploadWorkflowState;
use picnarrate_providers::waveform::extension_for;
use picnarrate_runtime::audio_cache::FileAudioPathCache;
use picnarrate_runtime::config_store::ConfigStore;
use picnarrate_runtime::defaults;
use ui::ViewState;

#[derive(Parser, Debug)]
#[command(name = "picnarrate", version)]
#[command(about = "Describe an image, narrate the description and show its waveform")]
struct Cli {
    /// Service base URL (overrides the config file)
    #[arg(long, global = true, env = "PICNARRATE_BASE_URL")]
    base_url: Option<String>,

    /// Config file path
    #[arg(long, global = true, env = "PICNARRATE_CONFIG")]
    config: Option<PathBuf>,

    /// light or dark
    #[arg(long, global = true)]
    theme: Option<ThemeMode>,

    /// Open the recordings panel after describing
    #[arg(long, global = true)]
    recordings: bool,

    /// -v for info, -vv for debug
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload an image and get a description with narration
    Describe {
        image: PathBuf,
        #[arg(long)]
        mode: Option<DescriptionMode>,
        #[arg(long)]
        speaker: Option<Speaker>,
        #[arg(long)]
        language: Option<Language>,
    },
    /// List previously generated recordings
    Recordings {
        /// Show the locally cached last recording instead of asking the service
        #[arg(long)]
        cached: bool,
    },
    /// Ask the service for its most recent audio output
    LastOutput,
    /// Download the latest waveform image
    Waveform {
        /// Print a data: URL instead of saving a file
        #[arg(long)]
        data_url: bool,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// List available speakers
    Speakers,
    /// List available languages
    Languages,
    /// List description modes
    Modes,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    Show,
    Path,
    SetBaseUrl { url: String },
    ToggleTheme,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = ConfigStore::at_path(
        cli.config
            .clone()
            .unwrap_or_else(defaults::default_config_path),
    );

    let mut cfg = store.load_or_default()?;
    if let Some(url) = &cli.base_url {
        cfg.base_url = url.clone();
    }

    let mut view = ViewState::new(cli.theme.unwrap_or(cfg.theme));
    if cli.recordings {
        view.toggle_recordings_panel();
    }

    match cli.command {
        Command::Speakers => println!("{}", ui::render_choices(Speaker::ALL)),
        Command::Languages => println!("{}", ui::render_choices(Language::ALL)),
        Command::Modes => println!("{}", ui::render_modes()),
        Command::Config { action } => run_config(&store, action, view)?,
        Command::Describe {
            image,
            mode,
            speaker,
            language,
        } => {
            let svc = build_service(cfg)?;
            let mut options = svc.config().defaults;
            if let Some(mode) = mode {
                options.mode = mode;
            }
            if speaker.is_some() {
                options.speaker = speaker;
            }
            if language.is_some() {
                options.language = language;
            }
            run_describe(&svc, &image, options, view).await?;
        }
        Command::Recordings { cached } => {
            let svc = build_service(cfg)?;
            if cached {
                svc.restore_cached_recordings();
            } else if let Err(e) = svc.load_recordings().await {
                info!("recordings unavailable: {e}");
            }
            let state = svc.recordings().snapshot();
            println!("{}", ui::render_recordings(&state, view.style()));
            if state.error.is_some() {
                bail!("could not list recordings");
            }
        }
        Command::LastOutput => {
            let svc = build_service(cfg)?;
            match svc.recall_last_output().await {
                Ok(url) if url.is_empty() => println!("No output available yet."),
                Ok(url) => println!("{url}"),
                Err(e) => bail!(e.user_message()),
            }
        }
        Command::Waveform { data_url, out } => {
            let svc = build_service(cfg)?;
            let image = match svc.fetch_waveform().await {
                WaveformOutcome::Ready(image) => image,
                WaveformOutcome::Failed(e) => bail!(e.user_message()),
                WaveformOutcome::Stale => bail!("waveform request was superseded"),
            };
            if data_url {
                println!("{}", waveform_data_url(&image)?);
            } else {
                let out = out.unwrap_or_else(|| {
                    PathBuf::from(format!("waveform.{}", extension_for(image.content_type())))
                });
                std::fs::copy(image.path(), &out)
                    .with_context(|| format!("save waveform to {}", out.display()))?;
                println!("{}", out.display());
            }
        }
    }

    Ok(())
}

fn build_service(cfg: ClientConfig) -> Result<AppService> {
    let cache = Arc::new(FileAudioPathCache::at_path(
        defaults::default_audio_cache_path(),
    ));
    AppService::new(cfg, cache, Some(defaults::default_waveform_dir()))
}

async fn run_describe(
    svc: &AppService,
    image: &Path,
    options: UploadOptions,
    view: ViewState,
) -> Result<()> {
    let bytes =
        std::fs::read(image).with_context(|| format!("read image: {}", image.display()))?;
    let filename = image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".into());
    let request = UploadRequest::new(ImageFile::from_bytes(filename, bytes), options);

    let style = view.style();
    let hook: StateHook = Arc::new(move |state: &UploadWorkflowState| {
        let mut err = std::io::stderr();
        if state.is_in_flight() {
            let _ = write!(err, "\r{}", ui::render_status(state, style));
        } else {
            let _ = writeln!(err, "\r{}", ui::render_status(state, style));
        }
        let _ = err.flush();
    });

    match svc.describe_with_hook(request, hook).await {
        SubmitOutcome::Succeeded(result) => {
            let audio_url = svc.artifact_url(&result.audio);
            println!("{}", ui::render_result(&result, &audio_url, style));
            println!("{}", ui::render_waveform(&svc.waveform().snapshot(), style));
        }
        SubmitOutcome::Failed(e) => bail!(e.user_message()),
        SubmitOutcome::Superseded => bail!("upload was superseded"),
    }

    if view.recordings_open {
        if let Err(e) = svc.load_recordings().await {
            info!("recordings unavailable: {e}");
        }
        println!(
            "{}",
            ui::render_recordings(&svc.recordings().snapshot(), style)
        );
    }
    Ok(())
}

fn run_config(store: &ConfigStore, action: ConfigAction, mut view: ViewState) -> Result<()> {
    match action {
        ConfigAction::Path => println!("{}", store.path().display()),
        ConfigAction::Show => {
            let cfg = store.load_or_default()?;
            println!("{}", serde_json::to_string_pretty(&cfg)?);
        }
        ConfigAction::SetBaseUrl { url } => {
            let mut cfg = store.load_or_default()?;
            cfg.base_url = url.trim().to_string();
            store.save(&cfg)?;
            println!("base_url = {}", cfg.base_url);
        }
        ConfigAction::ToggleTheme => {
            let mut cfg = store.load_or_default()?;
            view.theme = cfg.theme;
            view.toggle_theme();
            cfg.theme = view.theme;
            store.save(&cfg)?;
            println!("{}", view.style().heading(&format!("theme = {}", cfg.theme)));
        }
    }
    Ok(())
}

use picnarrate_core::types::{DescriptionMode, ThemeMode, UploadResult};
use picnarrate_engine::recordings::RecordingsState;
use picnarrate_engine::waveform::WaveformState;
use picnarrate_engine::workflow::{UploadWorkflowState, WorkflowStatus};
use std::fmt::Display;

pub const PROGRESS_WIDTH: usize = 24;
pub const NO_RECORDINGS: &str = "No recent recordings available.";

const RESET: &str = "\x1b[0m";

/// Presentation toggles. Neither is persisted except through `config toggle-theme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    pub theme: ThemeMode,
    pub recordings_open: bool,
}

impl ViewState {
    pub fn new(theme: ThemeMode) -> Self {
        Self {
            theme,
            recordings_open: false,
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub fn toggle_recordings_panel(&mut self) {
        self.recordings_open = !self.recordings_open;
    }

    pub fn style(&self) -> Style {
        Style { theme: self.theme }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Style {
    theme: ThemeMode,
}

impl Style {
    pub fn heading(&self, text: &str) -> String {
        let code = match self.theme {
            ThemeMode::Light => "\x1b[1;34m",
            ThemeMode::Dark => "\x1b[1;96m",
        };
        format!("{code}{text}{RESET}")
    }

    pub fn error(&self, text: &str) -> String {
        let code = match self.theme {
            ThemeMode::Light => "\x1b[31m",
            ThemeMode::Dark => "\x1b[91m",
        };
        format!("{code}{text}{RESET}")
    }
}

/// `[############------------]  50%`
pub fn progress_bar(percent: u8, width: usize) -> String {
    let percent = percent.min(100);
    let filled = width * percent as usize / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        percent
    )
}

/// One status line for the upload workflow.
pub fn render_status(state: &UploadWorkflowState, style: Style) -> String {
    match state.status {
        WorkflowStatus::InFlight => format!(
            "{} {}",
            state.status.label(),
            progress_bar(state.progress, PROGRESS_WIDTH)
        ),
        WorkflowStatus::Succeeded => state.status.label().to_string(),
        WorkflowStatus::Idle | WorkflowStatus::Failed => match state.error_message() {
            Some(msg) => style.error(&msg),
            None => state.status.label().to_string(),
        },
    }
}

pub fn render_result(result: &UploadResult, audio_url: &str, style: Style) -> String {
    let audio = if audio_url.is_empty() {
        "(no audio available)"
    } else {
        audio_url
    };
    format!(
        "{}\n{}\n{} {}",
        style.heading("Description"),
        result.description,
        style.heading("Audio:"),
        audio
    )
}

pub fn render_recordings(state: &RecordingsState, style: Style) -> String {
    let mut out = vec![style.heading("Recent recordings")];
    if state.loading {
        out.push("Loading...".into());
    }
    if let Some(msg) = state.error_message() {
        out.push(style.error(&msg));
    }
    if state.recordings.is_empty() {
        if !state.loading && state.error.is_none() {
            out.push(NO_RECORDINGS.into());
        }
    } else {
        for (i, r) in state.recordings.iter().enumerate() {
            out.push(format!("{:>2}. {}", i + 1, r.url));
        }
    }
    out.join("\n")
}

pub fn render_waveform(state: &WaveformState, style: Style) -> String {
    let label = style.heading("Waveform:");
    if state.loading {
        return format!("{label} loading...");
    }
    if let Some(e) = &state.error {
        return format!("{label} {}", style.error(&e.user_message()));
    }
    match &state.image {
        Some(img) => format!(
            "{label} {} ({} bytes, {})",
            img.path().display(),
            img.len(),
            img.content_type().unwrap_or("image/png")
        ),
        None => format!("{label} none"),
    }
}

pub fn render_choices<T: Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|i| format!("  {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `  summary   Short description`
pub fn render_modes() -> String {
    DescriptionMode::ALL
        .into_iter()
        .map(|m| format!("  {:<9} {}", m.as_str(), m.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Native dialogs (rfd) used by the installer window
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use std::path::{Path, PathBuf};

/// User-facing notice raised by an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error { title: String, text: String },
    Warning { title: String, text: String },
    Info { title: String, text: String },
}

impl Notice {
    pub fn error(title: &str, text: impl Into<String>) -> Self {
        Notice::Error { title: title.to_string(), text: text.into() }
    }

    pub fn warning(title: &str, text: impl Into<String>) -> Self {
        Notice::Warning { title: title.to_string(), text: text.into() }
    }

    pub fn info(title: &str, text: impl Into<String>) -> Self {
        Notice::Info { title: title.to_string(), text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            Notice::Error { text, .. } | Notice::Warning { text, .. } | Notice::Info { text, .. } => text,
        }
    }

    /// Block until the user dismisses the dialog
    pub fn show(&self) {
        let (level, title, text) = match self {
            Notice::Error { title, text } => (MessageLevel::Error, title, text),
            Notice::Warning { title, text } => (MessageLevel::Warning, title, text),
            Notice::Info { title, text } => (MessageLevel::Info, title, text),
        };

        let _ = MessageDialog::new()
            .set_level(level)
            .set_title(title.as_str())
            .set_description(text.as_str())
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}

/// Folder picker starting at `current`; None when cancelled
pub fn pick_directory(current: &Path) -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Selecionar Pasta com Arquivos do Office")
        .set_directory(current)
        .pick_folder()
}

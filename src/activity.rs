//! Activity log shown in the installer window
//!
//! Every entry is mirrored to `tracing` so runs without a window still leave
//! a trail on the console.

const PROMPT: &str = "> ";

#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Vec<String>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{}", message);
        self.entries.push(format!("{}{}", PROMPT, message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("{}", message);
        self.entries.push(format!("{}{}", PROMPT, message));
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_prefixed() {
        let mut log = ActivityLog::new();
        assert!(log.is_empty());

        log.log("Aguardando processo...");
        log.error(format!("Erro Crítico: {}", "denied"));

        assert_eq!(
            log.entries(),
            &["> Aguardando processo...".to_string(), "> Erro Crítico: denied".to_string()]
        );
    }
}

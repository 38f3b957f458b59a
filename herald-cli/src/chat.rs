//! Routing of chat commands to the registry and the refresh engine.
//!
//! A chat message is one line of text such as `/refresh status`. The router
//! answers every message with a reply string; unknown input gets the help
//! text.

use herald_core::{EventSink, NO_SOURCES};
use herald_data::{RefreshEngine, SourceRegistry};

/// Reply to anything that is not a recognised command.
pub const HELP_TEXT: &str = "Available commands:\n\
/refresh - refresh every enabled source\n\
/refresh <name> - refresh one source\n\
/bots - list registered sources\n\
/reset <name|all> - clear pushed flags\n\
\n\
Examples:\n\
/refresh\n\
/refresh status\n\
/bots\n\
/reset status";

/// Reply to `/reset` without an argument.
pub const RESET_USAGE: &str = "Usage: /reset <name|all>";

/// A parsed chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// `/refresh`
    RefreshAll,
    /// `/refresh <name>`
    Refresh(String),
    /// `/bots`
    Bots,
    /// `/reset all`
    ResetAll,
    /// `/reset <name>`
    Reset(String),
    /// `/reset` with no argument.
    ResetUsage,
    /// Anything else.
    Help,
}

impl ChatCommand {
    /// Parse one message. Extra words after the first argument are ignored.
    #[must_use]
    pub fn parse(message: &str) -> Self {
        let mut words = message.split_whitespace();
        let command = words.next().unwrap_or_default();
        let argument = words.next().map(str::to_owned);
        match (command, argument) {
            ("/refresh", None) => Self::RefreshAll,
            ("/refresh", Some(name)) => Self::Refresh(name),
            ("/bots", _) => Self::Bots,
            ("/reset", None) => Self::ResetUsage,
            ("/reset", Some(target)) if target == "all" => Self::ResetAll,
            ("/reset", Some(name)) => Self::Reset(name),
            _ => Self::Help,
        }
    }
}

/// Answers chat commands using a registry and an engine.
#[derive(Debug)]
pub struct ChatRouter<'a, S> {
    registry: &'a SourceRegistry,
    engine: &'a RefreshEngine<S>,
}

impl<'a, S: EventSink> ChatRouter<'a, S> {
    /// Create a router over `registry` and `engine`.
    pub const fn new(registry: &'a SourceRegistry, engine: &'a RefreshEngine<S>) -> Self {
        Self { registry, engine }
    }

    /// Answer one chat message.
    pub fn handle(&self, message: &str) -> String {
        let command = ChatCommand::parse(message);
        log::debug!("chat command: {command:?}");
        match command {
            ChatCommand::RefreshAll => self
                .engine
                .refresh_multiple_sources(&self.registry.get_enabled()),
            ChatCommand::Refresh(name) => match self.registry.get(&name) {
                None => self.unknown(&name),
                Some(source) if !source.enabled() => format!("Source '{name}' is disabled"),
                Some(source) => self.engine.refresh_source(source),
            },
            ChatCommand::Bots => self.bots(),
            ChatCommand::ResetAll => self.engine.reset_all(&self.registry.get_enabled()),
            ChatCommand::Reset(name) => self
                .registry
                .get(&name)
                .map_or_else(|| self.unknown(&name), |source| self.engine.reset_source(source)),
            ChatCommand::ResetUsage => RESET_USAGE.to_owned(),
            ChatCommand::Help => HELP_TEXT.to_owned(),
        }
    }

    fn unknown(&self, name: &str) -> String {
        let available: Vec<String> = self.registry.list().into_keys().collect();
        format!(
            "Source '{name}' does not exist. Available sources: {}",
            available.join(", ")
        )
    }

    fn bots(&self) -> String {
        let sources = self.registry.list();
        if sources.is_empty() {
            return NO_SOURCES.to_owned();
        }
        let mut lines = vec!["Registered sources:".to_owned()];
        lines.extend(sources.iter().map(|(name, source)| {
            let key = source
                .dot_path()
                .filter(|path| !path.is_empty())
                .map(|path| format!(" (key={path})"))
                .unwrap_or_default();
            let status = if source.enabled() { "enabled" } else { "disabled" };
            format!("- {name}: {}{key} [{status}]", source.file())
        }));
        lines.join("\n")
    }
}

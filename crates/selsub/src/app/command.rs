//! Command registration and the find-and-replace orchestration.

use tracing::{debug, info, warn};

use crate::app::resolver::resolve_selection_text;
use crate::app::settings::SettingsStore;
use crate::app::substitute::{Substitution, substitute};
use crate::domain::editor::Host;
use crate::domain::errors::DomainError;
use crate::domain::model::{SettingField, Settings};

pub const FIND_AND_REPLACE_ID: &str = "find-and-replace-in-selection";
pub const FIND_AND_REPLACE_NAME: &str = "Find and replace in selection";

/// What a single command invocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// No editor was focused; nothing happened.
    NoEditor,
    /// The resolved span was rewritten.
    Replaced(Substitution),
    /// The substitution failed before touching the editor. Carries the notice shown to the user.
    Failed(String),
}

type CommandFn = fn(&Settings, &mut dyn Host) -> CommandOutcome;

/// Stable identity of a command exposed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub id: &'static str,
    pub name: &'static str,
}

/// Commands the plugin registers with its host.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    entries: Vec<(CommandSpec, CommandFn)>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register(&mut self, spec: CommandSpec, run: CommandFn) {
        self.entries.retain(|(existing, _)| existing.id != spec.id);
        self.entries.push((spec, run));
    }

    pub fn specs(&self) -> impl Iterator<Item = CommandSpec> + '_ {
        self.entries.iter().map(|(spec, _)| *spec)
    }

    fn lookup(&self, id: &str) -> Option<CommandFn> {
        self.entries
            .iter()
            .find(|(spec, _)| spec.id == id)
            .map(|(_, run)| *run)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(
            CommandSpec {
                id: FIND_AND_REPLACE_ID,
                name: FIND_AND_REPLACE_NAME,
            },
            find_and_replace,
        );
        registry
    }
}

/// Resolve the target span, substitute, and write the result back.
///
/// An invalid pattern leaves the editor untouched and is reported through [`Host::notice`].
/// A missing editor is not an error for the user, so it is only logged.
pub fn find_and_replace(settings: &Settings, host: &mut dyn Host) -> CommandOutcome {
    match rewrite_active_selection(settings, host) {
        Ok(result) => {
            debug!(replacements = result.total(), "selection rewritten");
            CommandOutcome::Replaced(result)
        }
        Err(DomainError::NoActiveEditor) => {
            debug!("no active editor, skipping find and replace");
            CommandOutcome::NoEditor
        }
        Err(err) => {
            let notice = format!("Find and replace failed: {err}");
            host.notice(&notice);
            CommandOutcome::Failed(notice)
        }
    }
}

fn rewrite_active_selection(
    settings: &Settings,
    host: &mut dyn Host,
) -> Result<Substitution, DomainError> {
    let editor = host.active_editor().ok_or(DomainError::NoActiveEditor)?;
    let text = resolve_selection_text(editor);
    let result = substitute(&text, settings)?;
    editor.replace_selection(&result.text);
    Ok(result)
}

/// Owns the in-memory settings and the registered commands.
#[derive(Debug, Clone)]
pub struct Plugin {
    settings: Settings,
    store: Option<SettingsStore>,
    commands: CommandRegistry,
}

impl Plugin {
    /// Build a plugin backed by `store`. Unreadable settings fall back to defaults.
    pub fn load(store: SettingsStore) -> Self {
        let settings = store.load().unwrap_or_else(|err| {
            warn!(error = %format!("{err:#}"), "failed to load settings, using defaults");
            Settings::default()
        });
        Self {
            settings,
            store: Some(store),
            commands: CommandRegistry::default(),
        }
    }

    /// Build a plugin backed by `store`, failing if the stored settings cannot be read.
    pub fn try_load(store: SettingsStore) -> anyhow::Result<Self> {
        let settings = store.load()?;
        Ok(Self {
            settings,
            store: Some(store),
            commands: CommandRegistry::default(),
        })
    }

    /// Build a plugin that never persists.
    pub fn in_memory(settings: Settings) -> Self {
        Self {
            settings,
            store: None,
            commands: CommandRegistry::default(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn commands(&self) -> impl Iterator<Item = CommandSpec> + '_ {
        self.commands.specs()
    }

    /// Update one field, then persist. Persistence failures are logged and otherwise ignored.
    pub fn update_setting(&mut self, field: SettingField, value: impl Into<String>) {
        self.settings.set(field, value);
        info!(%field, "setting updated");
        self.persist();
    }

    /// Update a field addressed by its command-line name.
    pub fn update_setting_by_name(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DomainError> {
        let field =
            SettingField::parse(name).ok_or_else(|| DomainError::UnknownField(name.to_owned()))?;
        self.update_setting(field, value);
        Ok(())
    }

    /// Restore every field to its default and persist.
    pub fn reset_settings(&mut self) {
        self.settings = Settings::default();
        self.persist();
    }

    /// Run the command registered under `id` against the host's active editor.
    pub fn invoke(&self, id: &str, host: &mut dyn Host) -> Result<CommandOutcome, DomainError> {
        let run = self
            .commands
            .lookup(id)
            .ok_or_else(|| DomainError::UnknownCommand(id.to_owned()))?;
        debug!(command = id, "invoking command");
        Ok(run(&self.settings, host))
    }

    fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(err) = store.save(&self.settings) {
            warn!(error = %format!("{err:#}"), "failed to persist settings");
        }
    }
}

//! Command-line host: loads a file as the active editor and exposes the settings surface.

use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::app::command::{CommandOutcome, FIND_AND_REPLACE_ID, Plugin};
use crate::app::settings::SettingsStore;
use crate::domain::model::{Position, SettingField};
use crate::infra::config::Config;
use crate::infra::document::FileHost;

#[derive(Debug, Parser)]
#[command(name = "selsub", version, about = "Find and replace inside a selection or the cursor line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run find and replace on a file, acting on a selection or a single line.
    Run {
        file: PathBuf,
        /// 1-based line holding the cursor.
        #[arg(long, default_value = "1", conflicts_with = "select")]
        line: NonZeroUsize,
        /// 1-based cursor column.
        #[arg(long, default_value = "1", conflicts_with = "select")]
        column: NonZeroUsize,
        /// Select from one LINE:COL to another (1-based) instead of using the cursor line.
        #[arg(long, num_args = 2, value_names = ["FROM", "TO"], value_parser = parse_position)]
        select: Option<Vec<Position>>,
        /// Print the resulting document instead of writing the file.
        #[arg(long)]
        print: bool,
    },
    /// Inspect or edit the persisted find/replace settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// List registered commands.
    Commands,
    /// Generate shell completions.
    Completions { shell: Shell },
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print current settings as JSON.
    Show,
    /// Print where settings are stored.
    Path,
    /// Describe the editable fields.
    Fields,
    /// Set one field, e.g. `settings set regex-flags gi`.
    Set { field: String, value: String },
    /// Restore every field to its empty default.
    Reset,
}

impl Cli {
    pub fn execute(self, config: Config) -> Result<()> {
        let store = SettingsStore::new(config.settings_path());
        let mut out = io::stdout().lock();

        match self.command {
            CliCommand::Run {
                file,
                line,
                column,
                select,
                print,
            } => {
                let plugin = Plugin::load(store);
                let mut host = FileHost::open(&file)?;
                match select.as_deref() {
                    Some([from, to]) => host
                        .select(*from, *to)
                        .with_context(|| format!("cannot select in {}", file.display()))?,
                    _ => host
                        .place_cursor(Position::new(line.get() - 1, column.get() - 1))
                        .with_context(|| {
                            format!("line {line}, column {column} is not in {}", file.display())
                        })?,
                }

                let outcome = plugin.invoke(FIND_AND_REPLACE_ID, &mut host)?;
                for notice in host.notices() {
                    eprintln!("{notice}");
                }

                match outcome {
                    CommandOutcome::Replaced(result) => {
                        if print {
                            write!(out, "{}", host.buffer())?;
                        } else {
                            host.save()?;
                            writeln!(
                                out,
                                "{} replacement(s) in {}",
                                result.total(),
                                file.display()
                            )?;
                        }
                        Ok(())
                    }
                    CommandOutcome::Failed(_) => {
                        Err(anyhow!("{} left unchanged", file.display()))
                    }
                    CommandOutcome::NoEditor => Ok(()),
                }
            }
            CliCommand::Settings { action } => match action {
                SettingsAction::Show => {
                    let plugin = Plugin::load(store);
                    writeln!(out, "{}", serde_json::to_string_pretty(plugin.settings())?)?;
                    Ok(())
                }
                SettingsAction::Path => {
                    writeln!(out, "{}", store.path().display())?;
                    Ok(())
                }
                SettingsAction::Fields => {
                    for field in SettingField::ALL {
                        writeln!(
                            out,
                            "{:<16}{}: {}",
                            field.name(),
                            field.label(),
                            field.description()
                        )?;
                    }
                    Ok(())
                }
                SettingsAction::Set { field, value } => {
                    let path = store.path().display().to_string();
                    let mut plugin = Plugin::try_load(store).with_context(|| {
                        format!(
                            "refusing to overwrite unreadable settings at {path}; \
                             fix the file or run `selsub settings reset`"
                        )
                    })?;
                    plugin.update_setting_by_name(&field, value)?;
                    Ok(())
                }
                SettingsAction::Reset => {
                    if let Err(err) = store.load() {
                        eprintln!(
                            "warning: discarding unreadable settings at {}: {err:#}",
                            store.path().display()
                        );
                    }
                    Plugin::load(store).reset_settings();
                    Ok(())
                }
            },
            CliCommand::Commands => {
                let plugin = Plugin::load(store);
                for spec in plugin.commands() {
                    writeln!(out, "{}\t{}", spec.id, spec.name)?;
                }
                Ok(())
            }
            CliCommand::Completions { shell } => {
                clap_complete::generate(shell, &mut Cli::command(), "selsub", &mut out);
                Ok(())
            }
        }
    }
}

/// Parse a 1-based `LINE:COL` pair into a 0-based position.
fn parse_position(value: &str) -> Result<Position, String> {
    let (line, col) = value
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COL, got `{value}`"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<NonZeroUsize>()
            .map(|n| n.get() - 1)
            .map_err(|_| format!("`{part}` is not a positive number"))
    };
    Ok(Position::new(parse(line)?, parse(col)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_based_positions() {
        assert_eq!(parse_position("1:1"), Ok(Position::new(0, 0)));
        assert_eq!(parse_position("3:7"), Ok(Position::new(2, 6)));
        assert!(parse_position("0:1").is_err());
        assert!(parse_position("4").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn select_takes_two_positions() {
        let cli = Cli::try_parse_from(["selsub", "run", "a.md", "--select", "1:1", "2:3"])
            .expect("parse");
        match cli.command {
            CliCommand::Run { select, .. } => {
                assert_eq!(
                    select,
                    Some(vec![Position::new(0, 0), Position::new(1, 2)])
                );
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}

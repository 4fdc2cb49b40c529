pub mod config;
pub mod run;

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

use cg_domain::config::Config;

/// Concierge: a bilingual spa guest assistant.
#[derive(Debug, Parser)]
#[command(name = "concierge", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server (default when no subcommand is given).
    Serve,
    /// Send a single message through the pipeline and print the reply.
    Run {
        /// The guest message.
        message: String,
        /// Session id to continue (a fresh one is minted if omitted).
        #[arg(long)]
        session: Option<String>,
        /// Print the full reply as JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path in `CG_CONFIG` (or `config.toml`).
/// Returns the parsed [`Config`] and the path that was used.
pub fn load_config() -> anyhow::Result<(Config, String)> {
    let config_path = std::env::var("CG_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let config = load_config_from(Path::new(&config_path))?;
    Ok((config, config_path))
}

/// Parse `path`, or fall back to defaults when the file does not exist.
pub fn load_config_from(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.server.port, 3210);
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[venue]\nname = \"Aguas de Sevilla\"\n[sessions]\nttl_secs = 60").unwrap();

        let cfg = load_config_from(file.path()).unwrap();
        assert_eq!(cfg.venue.name, "Aguas de Sevilla");
        assert_eq!(cfg.sessions.ttl_secs, 60);
        assert_eq!(cfg.server.port, 3210);
    }

    #[test]
    fn malformed_file_names_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        let err = load_config_from(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }

    #[test]
    fn shipped_example_config_is_valid() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        let cfg = load_config_from(&root.join("config.example.toml")).unwrap();

        let errors: Vec<_> = cfg
            .validate()
            .into_iter()
            .filter(|i| i.severity == cg_domain::config::ConfigSeverity::Error)
            .collect();
        assert!(errors.is_empty(), "{errors:?}");

        for path in [&cfg.knowledge.english_path, &cfg.knowledge.spanish_path] {
            let path = root.join(path.as_ref().unwrap());
            let kb = cg_providers::StaticKnowledgeBase::load(&path).unwrap();
            assert!(!kb.is_empty());
        }
    }

    #[test]
    fn run_subcommand_parses() {
        let cli = Cli::parse_from(["concierge", "run", "hola", "--session", "s-1", "--json"]);
        match cli.command {
            Some(Command::Run { message, session, json }) => {
                assert_eq!(message, "hola");
                assert_eq!(session.as_deref(), Some("s-1"));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

//! Application configuration.
//!
//! Settings live in `config.json` inside the per-user data directory. Every
//! section is optional; a missing file or section falls back to defaults, so
//! the application runs without any setup. `.env` files and the process
//! environment can override the database path and the server address:
//!
//! | Variable        | Overrides          |
//! |-----------------|--------------------|
//! | `DEXUS_DB_PATH` | `database.path`    |
//! | `DEXUS_HOST`    | `server.host`      |
//! | `DEXUS_PORT`    | `server.port`      |
//!
//! ```rust,no_run
//! use dexus::libs::config::Config;
//!
//! let config = Config::load()?;
//! println!("{}:{}", config.server().host, config.server().port);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Directory name for rendered PDFs when none is configured.
pub const DEFAULT_PDF_DIR: &str = "pdf";

pub const ENV_DB_PATH: &str = "DEXUS_DB_PATH";
pub const ENV_HOST: &str = "DEXUS_HOST";
pub const ENV_PORT: &str = "DEXUS_PORT";

/// A section offered by the setup wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DatabaseConfig {
    /// SQLite file; the data directory default is used when empty.
    pub path: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Issuer details printed on every PDF.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CompanyConfig {
    pub name: String,
    pub document: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReportConfig {
    /// Output directory for rendered PDFs; empty means `<data dir>/pdf`.
    pub pdf_dir: String,
    /// Default page size for listings.
    pub per_page: i64,
    /// Rendered PDFs older than this are removed by the cleanup.
    pub pdf_max_age_hours: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            pdf_dir: String::new(),
            per_page: crate::libs::pagination::DEFAULT_PER_PAGE,
            pdf_max_age_hours: 24,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LookupConfig {
    /// Registry endpoint; `{document}` is replaced by the CNPJ digits.
    pub api_url: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        LookupConfig {
            api_url: "https://brasilapi.com.br/api/cnpj/v1/{document}".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup: Option<LookupConfig>,
}

impl Config {
    /// Reads the config file from the data directory, or defaults if it is missing.
    pub fn read() -> Result<Config> {
        Self::read_from(DataStorage::new().get_path(CONFIG_FILE_NAME)?)
    }

    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// The config file with `.env` and environment overrides applied.
    pub fn load() -> Result<Config> {
        dotenv::dotenv().ok();
        Ok(Self::read()?.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    pub fn with_overrides<F>(mut self, lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH).filter(|p| !p.trim().is_empty()) {
            self.database = Some(DatabaseConfig { path });
        }

        if let Some(host) = lookup(ENV_HOST).filter(|h| !h.trim().is_empty()) {
            let mut server = self.server.take().unwrap_or_default();
            server.host = host;
            self.server = Some(server);
        }

        if let Some(port) = lookup(ENV_PORT).and_then(|p| p.trim().parse::<u16>().ok()) {
            let mut server = self.server.take().unwrap_or_default();
            server.port = port;
            self.server = Some(server);
        }

        self
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(DataStorage::new().get_path(CONFIG_FILE_NAME)?)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Configured database file, if one is set.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.database
            .as_ref()
            .map(|db| db.path.trim())
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
    }

    pub fn server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }

    pub fn company(&self) -> CompanyConfig {
        self.company.clone().unwrap_or_default()
    }

    pub fn report(&self) -> ReportConfig {
        self.report.clone().unwrap_or_default()
    }

    pub fn lookup(&self) -> LookupConfig {
        self.lookup.clone().unwrap_or_default()
    }

    /// Output directory for PDFs, falling back to the data directory.
    pub fn pdf_dir(&self) -> Result<PathBuf> {
        let report = self.report();
        let dir = report.pdf_dir.trim();
        if dir.is_empty() {
            DataStorage::new().get_path(DEFAULT_PDF_DIR)
        } else {
            Ok(PathBuf::from(dir))
        }
    }

    /// Interactive setup: pick sections, then fill each in with the current
    /// values as defaults.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = [
            ("database", Message::ConfigModuleDatabase),
            ("server", Message::ConfigModuleServer),
            ("company", Message::ConfigModuleCompany),
            ("report", Message::ConfigModuleReport),
            ("lookup", Message::ConfigModuleLookup),
        ]
        .into_iter()
        .map(|(key, name)| ConfigModule {
            key: key.to_string(),
            name: name.to_string(),
        })
        .collect::<Vec<_>>();

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "database" => {
                    let default = config.database.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleDatabase);
                    config.database = Some(DatabaseConfig {
                        path: prompt(Message::PromptDatabasePath, default.path)?,
                    });
                }
                "server" => {
                    let default = config.server();
                    msg_print!(Message::ConfigModuleServer);
                    config.server = Some(ServerConfig {
                        host: prompt(Message::PromptServerHost, default.host)?,
                        port: prompt(Message::PromptServerPort, default.port)?,
                    });
                }
                "company" => {
                    let default = config.company();
                    msg_print!(Message::ConfigModuleCompany);
                    config.company = Some(CompanyConfig {
                        name: prompt(Message::PromptCompanyName, default.name)?,
                        document: prompt(Message::PromptCompanyDocument, default.document)?,
                        address: prompt(Message::PromptCompanyAddress, default.address)?,
                        phone: prompt(Message::PromptCompanyPhone, default.phone)?,
                        email: prompt(Message::PromptCompanyEmail, default.email)?,
                    });
                }
                "report" => {
                    let default = config.report();
                    msg_print!(Message::ConfigModuleReport);
                    config.report = Some(ReportConfig {
                        pdf_dir: prompt(Message::PromptPdfDir, default.pdf_dir)?,
                        per_page: prompt(Message::PromptPerPage, default.per_page)?,
                        pdf_max_age_hours: prompt(Message::PromptPdfMaxAge, default.pdf_max_age_hours)?,
                    });
                }
                "lookup" => {
                    let default = config.lookup();
                    msg_print!(Message::ConfigModuleLookup);
                    config.lookup = Some(LookupConfig {
                        api_url: prompt(Message::PromptLookupUrl, default.api_url)?,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}

fn prompt<T>(message: Message, default: T) -> Result<T>
where
    T: Clone + ToString + std::str::FromStr,
    <T as std::str::FromStr>::Err: ToString,
{
    Ok(Input::with_theme(&ColorfulTheme::default())
        .with_prompt(message.to_string())
        .default(default)
        .allow_empty(true)
        .interact_text()?)
}

use crate::context::{Context, SymbolTable, PROGRAM_NAME};
use crate::number::{Number, Scalar};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name reported in diagnostics for inline source.
    pub source_name: String,
    /// Name of the root frame in tracebacks.
    pub display_name: String,
    pub show_arrows: bool,
    /// Extra bindings seeded after `NULL`, `FALSE` and `TRUE`.
    pub globals: HashMap<String, Scalar>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_name: String::from("<stdin>"),
            display_name: String::from(PROGRAM_NAME),
            show_arrows: false,
            globals: HashMap::new(),
        }
    }
}

impl Config {
    /// Load from the default location. Missing or malformed files give the
    /// defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), error = %err, "ignoring malformed config");
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    }

    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str(contents)
    }

    pub fn save(&self) -> io::Result<()> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
    }

    pub fn get_config_path() -> PathBuf {
        if let Ok(custom) = env::var("BADLANG_CONFIG") {
            return PathBuf::from(custom);
        }

        let env_name = env::var("BADLANG_ENV").unwrap_or_else(|_| String::from("default"));
        let home_var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
        PathBuf::from(env::var(home_var).unwrap_or_else(|_| String::from(".")))
            .join(".badlang")
            .join(env_name)
            .join("config.json")
    }

    /// The fixed constants plus the configured globals.
    pub fn symbol_table(&self) -> SymbolTable {
        let mut table = SymbolTable::with_globals();
        for (name, value) in &self.globals {
            table.set(name, Number::new(*value));
        }
        table
    }

    pub fn root_context(&self) -> Rc<Context> {
        Context::new(&self.display_name, self.symbol_table())
    }
}

use crate::domain::Event;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub config_version: u32,
    pub log_file: Option<PathBuf>,
    pub line_input_max: usize,
    pub keys: KeyBindings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: CONFIG_VERSION,
            log_file: None,
            line_input_max: 128,
            keys: KeyBindings::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config at `explicit`, or the default location when `None`.
    ///
    /// A missing file at the default location yields the defaults; a missing
    /// explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = config_path()?;
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        let parsed = toml::from_str::<AppConfig>(&raw)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;

        if parsed.config_version != CONFIG_VERSION {
            bail!(
                "unsupported config_version {} in {} (expected {CONFIG_VERSION})",
                parsed.config_version,
                path.display()
            );
        }

        Ok(parsed)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("could not resolve config directory")?;
    Ok(base.join("fe-tui").join("config.toml"))
}

/// Key label for each event. An empty label leaves the event unbound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub quit: String,
    pub move_up: String,
    pub move_down: String,
    pub enter_dir: String,
    pub cmd_mode: String,
    pub touch: String,
    pub mk_dir: String,
    pub remove: String,
    #[serde(rename = "move")]
    pub move_entry: String,
    pub copy: String,
    pub rename: String,
    pub editor: String,
    pub sup_editor: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            move_up: "k".to_string(),
            move_down: "j".to_string(),
            enter_dir: "enter".to_string(),
            cmd_mode: ":".to_string(),
            touch: String::new(),
            mk_dir: String::new(),
            remove: String::new(),
            move_entry: String::new(),
            copy: String::new(),
            rename: String::new(),
            editor: String::new(),
            sup_editor: String::new(),
        }
    }
}

impl KeyBindings {
    pub fn label_for(&self, event: Event) -> &str {
        match event {
            Event::Quit => &self.quit,
            Event::EnterDir => &self.enter_dir,
            Event::MoveUp => &self.move_up,
            Event::MoveDown => &self.move_down,
            Event::CmdMode => &self.cmd_mode,
            Event::Touch => &self.touch,
            Event::MkDir => &self.mk_dir,
            Event::Remove => &self.remove,
            Event::Move => &self.move_entry,
            Event::Copy => &self.copy,
            Event::Rename => &self.rename,
            Event::Editor => &self.editor,
            Event::SupEditor => &self.sup_editor,
        }
    }

    /// First event (in [`Event::ALL`] order) bound to `key`.
    pub fn resolve(&self, key: &str) -> Option<Event> {
        if key.is_empty() {
            return None;
        }
        Event::ALL
            .into_iter()
            .find(|event| self.label_for(*event) == key)
    }

    /// Pairs of events sharing one key; the later event of each pair is
    /// shadowed by the earlier one.
    pub fn conflicts(&self) -> Vec<(Event, Event)> {
        let mut out = Vec::new();
        for (i, first) in Event::ALL.iter().enumerate() {
            let label = self.label_for(*first);
            if label.is_empty() {
                continue;
            }
            for second in &Event::ALL[i + 1..] {
                if self.label_for(*second) == label {
                    out.push((*first, *second));
                }
            }
        }
        out
    }
}

//! User configuration: backend settings, form defaults and keybindings.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/studydeck/config.toml` (default `~/.config/studydeck/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Backend used when nothing else is configured.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Difficulty levels offered by the form, in cycle order.
pub const DIFFICULTIES: &[&str] = &["Easy", "Intermediate", "Hard"];

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions while the content pane has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    Activate,
    SwitchMode,
    Generate,
    EditForm,
    CycleDifficulty,
    Submit,
    DownloadCsv,
    DownloadPdf,
    ExportSheet,
    DeleteGeneration,
    Help,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the help line and the config file).
    pub const ALL: &[Action] = &[
        Action::MoveUp,
        Action::MoveDown,
        Action::Activate,
        Action::SwitchMode,
        Action::Generate,
        Action::EditForm,
        Action::CycleDifficulty,
        Action::Submit,
        Action::DownloadCsv,
        Action::DownloadPdf,
        Action::ExportSheet,
        Action::DeleteGeneration,
        Action::Help,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::MoveUp => "Move Up",
            Action::MoveDown => "Move Down",
            Action::Activate => "Flip / Choose",
            Action::SwitchMode => "Switch Mode",
            Action::Generate => "Generate",
            Action::EditForm => "Edit Topic",
            Action::CycleDifficulty => "Difficulty",
            Action::Submit => "Submit Quiz",
            Action::DownloadCsv => "Download CSV",
            Action::DownloadPdf => "Download PDF",
            Action::ExportSheet => "Export Sheet",
            Action::DeleteGeneration => "Delete Generation",
            Action::Help => "Show Controls",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::MoveUp => "move_up",
            Action::MoveDown => "move_down",
            Action::Activate => "activate",
            Action::SwitchMode => "switch_mode",
            Action::Generate => "generate",
            Action::EditForm => "edit_form",
            Action::CycleDifficulty => "cycle_difficulty",
            Action::Submit => "submit",
            Action::DownloadCsv => "download_csv",
            Action::DownloadPdf => "download_pdf",
            Action::ExportSheet => "export_sheet",
            Action::DeleteGeneration => "delete_generation",
            Action::Help => "help",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT are compared,
    /// and SHIFT is ignored for characters since it is already in the char.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = match self.code {
            KeyCode::Char(_) => MODIFIER_MASK.difference(KeyModifiers::SHIFT),
            _ => MODIFIER_MASK,
        };
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// Short display string for the help line (e.g. `"↑"`, `"Ctrl+g"`).
    pub fn display(&self) -> String {
        let mut s = self.modifier_prefix();
        s.push_str(&match self.code {
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            _ => key_name(self.code),
        });
        s
    }

    fn to_config_string(&self) -> String {
        let mut s = self.modifier_prefix();
        s.push_str(&key_name(self.code));
        s
    }

    fn modifier_prefix(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s
    }

    /// Parse a key string like `"Ctrl+g"`, `"Alt+Up"`, `"q"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let (key_part, mods) = parts.split_last()?;

        for part in mods {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let lower = key_part.to_lowercase();
        let code = if let Some((_, code)) = NAMED_KEYS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&lower))
        {
            *code
        } else if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse().ok()) {
            KeyCode::F(n)
        } else {
            // Single characters keep their case.
            let mut chars = key_part.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        };

        Some(KeyBind { code, modifiers })
    }
}

/// Config-file names for non-character keys.  The first name listed for a
/// code is the one written back; later ones are accepted aliases.
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("Space", KeyCode::Char(' ')),
    ("Up", KeyCode::Up),
    ("Down", KeyCode::Down),
    ("Left", KeyCode::Left),
    ("Right", KeyCode::Right),
    ("Enter", KeyCode::Enter),
    ("Return", KeyCode::Enter),
    ("Esc", KeyCode::Esc),
    ("Escape", KeyCode::Esc),
    ("Home", KeyCode::Home),
    ("End", KeyCode::End),
    ("PageUp", KeyCode::PageUp),
    ("PageDown", KeyCode::PageDown),
    ("Delete", KeyCode::Delete),
];

fn key_name(code: KeyCode) -> String {
    if let Some((name, _)) = NAMED_KEYS.iter().find(|(_, c)| *c == code) {
        return (*name).to_string();
    }
    match code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Base URL of the study backend.
    pub server_url: String,
    /// Difficulty preselected in the form.
    pub difficulty: String,
    /// Count preselected in the form.
    pub default_count: u32,
    /// Where downloads and exported sheets are written.
    pub download_dir: PathBuf,
    /// Login email; the password is never stored.
    pub email: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            server_url: DEFAULT_SERVER_URL.to_string(),
            difficulty: "Intermediate".to_string(),
            default_count: 5,
            download_dir: PathBuf::from("."),
            email: None,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(MoveUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(MoveDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(Activate, vec![KeyBind::new(Char(' '), n), KeyBind::new(Enter, n)]);
        m.insert(SwitchMode, vec![KeyBind::new(Char('m'), n)]);
        m.insert(Generate, vec![KeyBind::new(Char('g'), n)]);
        m.insert(EditForm, vec![KeyBind::new(Char('/'), n), KeyBind::new(Char('i'), n)]);
        m.insert(CycleDifficulty, vec![KeyBind::new(Char('d'), n)]);
        m.insert(Submit, vec![KeyBind::new(Char('s'), n)]);
        m.insert(DownloadCsv, vec![KeyBind::new(Char('c'), n)]);
        m.insert(DownloadPdf, vec![KeyBind::new(Char('p'), n)]);
        m.insert(ExportSheet, vec![KeyBind::new(Char('e'), n)]);
        m.insert(DeleteGeneration, vec![KeyBind::new(Char('x'), n)]);
        m.insert(Help, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Format the binding list for a given action (e.g. `"↑/k"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}: generate | {}: mode | {}: flip/choose | {}: submit | {}: topic | {}: controls | {}: quit",
            self.short_binding(Action::Generate),
            self.short_binding(Action::SwitchMode),
            self.short_binding(Action::Activate),
            self.short_binding(Action::Submit),
            self.short_binding(Action::EditForm),
            self.short_binding(Action::Help),
            self.short_binding(Action::Quit),
        )
    }

    /// Next difficulty after the current one (wrapping; unknown values
    /// restart the cycle).
    pub fn next_difficulty(current: &str) -> &'static str {
        Self::step_difficulty(current, 1)
    }

    pub fn prev_difficulty(current: &str) -> &'static str {
        Self::step_difficulty(current, DIFFICULTIES.len() - 1)
    }

    fn step_difficulty(current: &str, step: usize) -> &'static str {
        let idx = DIFFICULTIES
            .iter()
            .position(|d| d.eq_ignore_ascii_case(current));
        match idx {
            Some(i) => DIFFICULTIES[(i + step) % DIFFICULTIES.len()],
            None => DIFFICULTIES[0],
        }
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents),
            Err(_) => Self::default(),
        }
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    fn parse(s: &str) -> Self {
        let mut cfg = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            match key {
                "server_url" => {
                    if !value.is_empty() {
                        cfg.server_url = value.to_string();
                    }
                    continue;
                }
                "difficulty" => {
                    if !value.is_empty() {
                        cfg.difficulty = value.to_string();
                    }
                    continue;
                }
                "default_count" => {
                    if let Ok(v) = value.parse::<u32>() {
                        cfg.default_count = v.max(1);
                    }
                    continue;
                }
                "download_dir" => {
                    if !value.is_empty() {
                        cfg.download_dir = PathBuf::from(value);
                    }
                    continue;
                }
                "email" => {
                    cfg.email = (!value.is_empty()).then(|| value.to_string());
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                cfg.bindings.insert(action, parsed);
            }
        }

        cfg
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# studydeck configuration".to_string(),
            String::new(),
            "# Backend and form defaults".to_string(),
            format!("server_url = \"{}\"", self.server_url),
            format!("difficulty = \"{}\"", self.difficulty),
            format!("default_count = {}", self.default_count),
            format!("download_dir = \"{}\"", self.download_dir.display()),
        ];
        if let Some(email) = &self.email {
            lines.push(format!("email = \"{email}\""));
        }
        lines.extend([
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            String::new(),
        ]);

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/studydeck/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("studydeck").join("config.toml")
}

/// Default log file, beside the config file.
pub fn log_path() -> PathBuf {
    config_path().with_file_name("studydeck.log")
}

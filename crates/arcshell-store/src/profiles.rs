//! User profiles, one JSON file per profile.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use arcshell_types::{Result, ShellError};

use crate::persist::{load_json, save_json};

/// Name of the profile created when none exist. It cannot be deleted.
pub const DEFAULT_PROFILE: &str = "Default";

/// A user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub pfp_path: String,
}

impl Profile {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            email: String::new(),
            pfp_path: String::new(),
        }
    }

    /// File name the profile is stored under: lowercased, spaces as `_`.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name.to_lowercase().replace(' ', "_"))
    }
}

/// Profile list with a current selection.
#[derive(Debug)]
pub struct ProfileStore {
    dir: Option<PathBuf>,
    profiles: Vec<Profile>,
    current: usize,
}

impl ProfileStore {
    /// An unpersisted store holding only the default profile.
    pub fn in_memory() -> Self {
        Self {
            dir: None,
            profiles: vec![Profile::new(DEFAULT_PROFILE)],
            current: 0,
        }
    }

    /// Load every `*.json` profile under `dir`. Unreadable files are
    /// skipped with a warning. The default profile is created (and saved)
    /// when the directory holds none.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut profiles = Vec::new();
        for path in paths {
            match load_json::<Option<Profile>>(&path) {
                Ok(Some(profile)) => profiles.push(profile),
                Ok(None) => {},
                Err(e) => log::warn!("Skipping profile {}: {e}", path.display()),
            }
        }

        let mut store = Self {
            dir: Some(dir.to_path_buf()),
            profiles,
            current: 0,
        };
        if store.profiles.is_empty() {
            store.add(Profile::new(DEFAULT_PROFILE))?;
        }
        if let Some(i) = store.position(DEFAULT_PROFILE) {
            store.current = i;
        }
        log::info!("Loaded {} profile(s)", store.profiles.len());
        Ok(store)
    }

    /// Add and persist a profile. Names must be non-empty, free of path
    /// separators, and unique by file name (so `Alice` and `alice` clash).
    pub fn add(&mut self, mut profile: Profile) -> Result<()> {
        let name = profile.name.trim().to_string();
        validate_name(&name)?;
        profile.name = name;
        let file_name = profile.file_name();
        if let Some(existing) = self.profiles.iter().find(|p| p.file_name() == file_name) {
            return Err(ShellError::Store(format!(
                "profile '{}' already exists as '{}'",
                profile.name, existing.name
            )));
        }
        if let Some(dir) = &self.dir {
            save_json(&dir.join(profile.file_name()), &profile)?;
        }
        self.profiles.push(profile);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Delete a profile and its file. The default profile is protected.
    /// Deleting the current profile falls back to the default one.
    pub fn delete(&mut self, name: &str) -> Result<bool> {
        if name == DEFAULT_PROFILE {
            return Err(ShellError::Store("cannot delete the default profile".into()));
        }
        let Some(i) = self.position(name) else {
            return Ok(false);
        };
        let removed = self.profiles.remove(i);
        if let Some(dir) = &self.dir {
            let path = dir.join(removed.file_name());
            if path.is_file() {
                fs::remove_file(path)?;
            }
        }
        if self.current == i {
            self.current = self.position(DEFAULT_PROFILE).unwrap_or(0);
        } else if self.current > i {
            self.current -= 1;
        }
        Ok(true)
    }

    /// Make `name` the current profile. Returns `false` if unknown.
    pub fn switch_to(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(i) => {
                self.current = i;
                true
            },
            None => false,
        }
    }

    pub fn current(&self) -> Option<&Profile> {
        self.profiles.get(self.current)
    }

    pub fn list(&self) -> &[Profile] {
        &self.profiles
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.profiles.iter().position(|p| p.name == name)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ShellError::Store("profile name is empty".into()));
    }
    if name.contains(['/', '\\']) || name.contains("..") || name.starts_with('.') {
        return Err(ShellError::Store(format!(
            "profile name '{name}' may not contain path characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_slugged() {
        assert_eq!(Profile::new("Work Account").file_name(), "work_account.json");
    }

    #[test]
    fn open_empty_dir_creates_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::open(dir.path()).unwrap();
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.current().unwrap().name, DEFAULT_PROFILE);
        assert!(dir.path().join("default.json").is_file());
    }

    #[test]
    fn profiles_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = ProfileStore::open(dir.path()).unwrap();
            let mut p = Profile::new("Alice");
            p.email = "alice@example.com".into();
            store.add(p).unwrap();
        }
        let store = ProfileStore::open(dir.path()).unwrap();
        assert_eq!(store.list().len(), 2);
        assert_eq!(store.get("Alice").unwrap().email, "alice@example.com");
    }

    #[test]
    fn duplicate_and_empty_names_rejected() {
        let mut store = ProfileStore::in_memory();
        assert!(store.add(Profile::new(DEFAULT_PROFILE)).is_err());
        assert!(store.add(Profile::new("  ")).is_err());
    }

    #[test]
    fn default_profile_cannot_be_deleted() {
        let mut store = ProfileStore::in_memory();
        assert!(store.delete(DEFAULT_PROFILE).is_err());
    }

    #[test]
    fn deleting_current_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProfileStore::open(dir.path()).unwrap();
        store.add(Profile::new("Bob")).unwrap();
        assert!(store.switch_to("Bob"));
        assert!(store.delete("Bob").unwrap());
        assert_eq!(store.current().unwrap().name, DEFAULT_PROFILE);
        assert!(!dir.path().join("bob.json").exists());
    }

    #[test]
    fn unreadable_profile_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{").unwrap();
        let store = ProfileStore::open(dir.path()).unwrap();
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn names_differing_only_in_case_clash() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProfileStore::open(dir.path()).unwrap();
        store.add(Profile::new("Alice")).unwrap();
        assert!(store.add(Profile::new("alice")).is_err());

        let reopened = ProfileStore::open(dir.path()).unwrap();
        assert!(reopened.get("Alice").is_some());
        assert_eq!(reopened.list().len(), 2);
    }

    #[test]
    fn path_characters_are_rejected() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("profiles");
        let mut store = ProfileStore::open(&dir).unwrap();
        for name in ["../../escape", "a/b", "a\\b", "..", ".hidden"] {
            assert!(store.add(Profile::new(name)).is_err(), "{name} accepted");
        }
        assert!(!root.path().join("escape.json").exists());
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let mut store = ProfileStore::in_memory();
        store.add(Profile::new("  Carol ")).unwrap();
        assert!(store.get("Carol").is_some());
    }
}

//! `.desktop` launcher installation for application menus.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{APP_DESCRIPTION, APP_ID, APP_NAME, APP_VERSION, ICON_NAME};

/// Launcher template with `{PLACEHOLDER}` tokens
const DESKTOP_TEMPLATE: &str = include_str!("../data/desktop_file.tpl");

/// Values substituted into the launcher template
#[derive(Debug, Clone)]
pub struct DesktopEntry {
    pub app_name: String,
    pub app_version: String,
    pub comment: String,
    pub exec: String,
    pub icon: String,
}

impl Default for DesktopEntry {
    fn default() -> Self {
        DesktopEntry {
            app_name: APP_NAME.to_string(),
            app_version: APP_VERSION.to_string(),
            comment: APP_DESCRIPTION.to_string(),
            exec: APP_ID.to_string(),
            icon: ICON_NAME.to_string(),
        }
    }
}

impl DesktopEntry {
    /// Replace every placeholder token in `template`
    pub fn render(&self, template: &str) -> String {
        template
            .replace("{APP_VERSION}", &self.app_version)
            .replace("{APP_NAME}", &self.app_name)
            .replace("{COMMENT}", &self.comment)
            .replace("{EXEC}", &self.exec)
            .replace("{ICON}", &self.icon)
    }
}

/// A launcher file at a fixed location
pub struct DesktopFile {
    path: PathBuf,
    template: String,
}

impl DesktopFile {
    pub fn new(path: PathBuf) -> Self {
        DesktopFile {
            path,
            template: DESKTOP_TEMPLATE.to_string(),
        }
    }

    /// `~/.local/share/applications/Draobpilc.desktop`
    pub fn default_location() -> Result<Self> {
        let home = crate::storage::home_dir()?;
        Ok(Self::new(default_path(&home)))
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the launcher; refuses to overwrite and returns `false` if it exists
    pub fn install(&self, entry: &DesktopEntry) -> Result<bool> {
        if self.path.exists() {
            println!("File \"{}\" already exists.", self.path.display());
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        fs::write(&self.path, entry.render(&self.template))
            .with_context(|| format!("Failed to write desktop file {:?}", self.path))?;

        log::info!("Installed desktop file {:?}", self.path);
        Ok(true)
    }

    /// Remove the launcher; returns `false` if there is nothing to remove
    pub fn uninstall(&self) -> Result<bool> {
        if !self.path.exists() {
            println!("File \"{}\" doesn't exist.", self.path.display());
            return Ok(false);
        }

        fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove desktop file {:?}", self.path))?;

        log::info!("Removed desktop file {:?}", self.path);
        Ok(true)
    }
}

pub fn default_path(home: &Path) -> PathBuf {
    home.join(".local/share/applications")
        .join(format!("{}.desktop", APP_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> DesktopEntry {
        DesktopEntry {
            app_name: "Draobpilc".into(),
            app_version: "9.9".into(),
            comment: "Clipboard manager".into(),
            exec: "draobpilc".into(),
            icon: "edit-paste".into(),
        }
    }

    #[test]
    fn test_render_replaces_every_token() {
        let rendered = entry().render(DESKTOP_TEMPLATE);
        assert!(!rendered.contains('{'), "unreplaced token in:\n{}", rendered);
        assert!(rendered.contains("Name=Draobpilc\n"));
        assert!(rendered.contains("Exec=draobpilc\n"));
        assert!(rendered.contains("Icon=edit-paste\n"));
        assert!(rendered.contains("X-Draobpilc-Version=9.9\n"));
    }

    #[test]
    fn test_render_repeated_tokens() {
        assert_eq!(
            entry().render("{APP_NAME} {APP_NAME} {COMMENT}"),
            "Draobpilc Draobpilc Clipboard manager"
        );
    }

    #[test]
    fn test_install_then_refuse_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let file = DesktopFile::new(dir.path().join("apps/Draobpilc.desktop"))
            .with_template("Name={APP_NAME}\n");

        assert!(file.install(&entry()).unwrap());
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "Name=Draobpilc\n");

        fs::write(file.path(), "edited by user").unwrap();
        assert!(!file.install(&entry()).unwrap());
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "edited by user");
    }

    #[test]
    fn test_uninstall_refuses_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let file = DesktopFile::new(dir.path().join("Draobpilc.desktop"));

        assert!(!file.uninstall().unwrap());

        assert!(file.install(&DesktopEntry::default()).unwrap());
        assert!(file.uninstall().unwrap());
        assert!(!file.path().exists());
        assert!(!file.uninstall().unwrap());
    }

    #[test]
    fn test_default_path() {
        assert_eq!(
            default_path(Path::new("/home/me")),
            PathBuf::from("/home/me/.local/share/applications/Draobpilc.desktop")
        );
    }
}

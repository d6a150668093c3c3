use std::path::{Path, PathBuf};

use crate::config::{Config, OutputFormat, PROJECT_CONFIG_FILE};
use crate::error::Result;

/// Per-invocation state shared by every command.
pub struct AppContext {
    pub project_root: PathBuf,
    pub config: Config,
    pub output_format: OutputFormat,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let project_root = Self::find_project_root()?;
        let config = Config::load(cli.config.as_deref(), &project_root)?;
        let output_format = cli.output_format().unwrap_or(config.output.format);

        Ok(Self {
            project_root,
            config,
            output_format,
        })
    }

    #[must_use]
    pub fn json(&self) -> bool {
        self.output_format == OutputFormat::Json
    }

    fn find_project_root() -> Result<PathBuf> {
        if let Ok(root) = std::env::var("GUIA_ROOT") {
            return Ok(PathBuf::from(root));
        }
        let cwd = std::env::current_dir()?;
        Ok(find_upwards(&cwd, PROJECT_CONFIG_FILE).unwrap_or(cwd))
    }
}

// Nearest ancestor directory holding `name`.
fn find_upwards(start: &Path, name: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(name).is_file())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_config_in_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PROJECT_CONFIG_FILE), "").unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_upwards(&nested, PROJECT_CONFIG_FILE).as_deref(), Some(dir.path()));
    }

    #[test]
    fn no_config_anywhere() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_upwards(dir.path(), "definitely-not-a-guia-config.toml").is_none());
    }
}

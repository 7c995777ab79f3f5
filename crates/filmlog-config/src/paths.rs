use anyhow::Result;
use std::path::{Path, PathBuf};

pub struct PathManager {
    config_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("filmlog");

        Ok(Self::with_config_dir(base_dir))
    }

    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn engine_config_file(&self) -> PathBuf {
        self.config_dir.join("engine.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_platform_config_dir() {
        match dirs::config_dir() {
            Some(base) => {
                let paths = PathManager::new().unwrap();
                assert_eq!(paths.config_dir(), base.join("filmlog"));
                assert_eq!(paths.engine_config_file(), base.join("filmlog").join("engine.toml"));
            }
            None => assert!(PathManager::new().is_err()),
        }
    }

    #[test]
    fn test_engine_config_file() {
        let paths = PathManager::with_config_dir(PathBuf::from("/etc/filmlog"));
        assert_eq!(paths.config_dir(), Path::new("/etc/filmlog"));
        assert_eq!(paths.engine_config_file(), PathBuf::from("/etc/filmlog/engine.toml"));
    }
}

use crate::cache::DEFAULT_IMAGE_DIR;
use crate::error::{Result, VisitorReportError};
use crate::record::DEFAULT_IMAGE_WIDTH_MM;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 图片缓存目录
    pub image_dir: PathBuf,
    /// 单次下载超时（秒）
    pub timeout_seconds: u64,
    /// 图片显示宽度（毫米）
    pub image_width_mm: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            timeout_seconds: 30,
            image_width_mm: DEFAULT_IMAGE_WIDTH_MM,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| VisitorReportError::Config("找不到用户主目录".into()))?;
        Ok(home
            .join(".config")
            .join("visitor-report")
            .join("config.json"))
    }

    pub fn set_image_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.image_dir = dir;
        self.save()
    }

    pub fn set_timeout(&mut self, seconds: u64) -> Result<()> {
        self.timeout_seconds = seconds;
        self.save()
    }
}

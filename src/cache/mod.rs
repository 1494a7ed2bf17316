//! 图片下载缓存模块
//!
//! URL 解析为本地图片文件：命中时跳过网络，未命中时单次下载
//! （传输故障或 5xx 退避重试一次）。缓存键是整个URL的 SHA-256，
//! 不同来源同名文件不会互相覆盖；文件存在即命中，无清单、无过期。
//!
//! 获取失败一律软处理：记日志、返回无图片、计入统计，下次运行自然重试
//! （失败不落盘）。只有本地文件系统故障才会中断批处理。

mod fetcher;

pub use fetcher::{FetchError, HttpFetcher, ImageFetcher};

use crate::error::Result;
use crate::record::{ImageEvidence, ImageHandle, VisitorRecord};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// 默认缓存目录（相对当前工作目录）
pub const DEFAULT_IMAGE_DIR: &str = "images";

/// 重试前的退避间隔
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// 一次运行的图片处理统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// 缓存命中（未发起网络请求）
    pub hits: usize,
    /// 下载成功
    pub downloads: usize,
    /// 获取失败（软处理）
    pub failures: usize,
    /// 无链接/非URL值，直接跳过
    pub skipped: usize,
}

pub struct ImageCache<F: ImageFetcher> {
    root: PathBuf,
    fetcher: F,
    stats: CacheStats,
}

impl<F: ImageFetcher> ImageCache<F> {
    pub fn new(root: impl Into<PathBuf>, fetcher: F) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            fetcher,
            stats: CacheStats::default(),
        })
    }

    /// URL 对应的缓存文件路径
    pub fn cache_path(&self, url: &str) -> PathBuf {
        self.root.join(cache_key(url))
    }

    /// 把URL解析为本地图片句柄
    ///
    /// 无值或非 http(s) 值直接返回 None，不发起任何I/O。
    /// 缓存文件存在即命中；未命中时下载并原样落盘。
    /// 获取失败返回 None 且不创建缓存文件。
    pub fn resolve(
        &mut self,
        url: Option<&str>,
        width_mm: f64,
        height_mm: Option<f64>,
    ) -> Result<Option<ImageHandle>> {
        let Some(url) = url.map(str::trim).filter(|u| is_http_url(u)) else {
            self.stats.skipped += 1;
            return Ok(None);
        };

        let path = self.cache_path(url);
        let handle = ImageHandle {
            path: path.clone(),
            width_mm,
            height_mm,
        };

        if path.exists() {
            info!("缓存命中: {} -> {}", url, path.display());
            self.stats.hits += 1;
            return Ok(Some(handle));
        }

        match self.fetch_with_retry(url) {
            Ok(bytes) => {
                std::fs::write(&path, &bytes)?;
                info!("下载成功: {} -> {} ({} bytes)", url, path.display(), bytes.len());
                self.stats.downloads += 1;
                Ok(Some(handle))
            }
            Err(e) => {
                error!("图片获取失败: {}: {}", url, e);
                self.stats.failures += 1;
                Ok(None)
            }
        }
    }

    fn fetch_with_retry(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        match self.fetcher.fetch(url) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.is_retryable() => {
                warn!("获取失败({}), 退避后重试: {}", e, url);
                std::thread::sleep(RETRY_BACKOFF);
                self.fetcher.fetch(url)
            }
            Err(e) => Err(e),
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// 对整批记录做「链接 → 缓存句柄」的第二遍解析
///
/// 每处理完一条记录调用一次 `progress`。解析后每个图片字段
/// 要么是 Missing，要么指向已缓存的本地文件。
pub fn resolve_records<F: ImageFetcher>(
    records: &mut [VisitorRecord],
    cache: &mut ImageCache<F>,
    width_mm: f64,
    mut progress: impl FnMut(),
) -> Result<()> {
    for record in records.iter_mut() {
        for (kind, slot) in record.evidence_slots_mut() {
            if let ImageEvidence::Linked(url) = slot {
                let url = url.clone();
                debug!("解析{}: {}", kind, url);
                *slot = match cache.resolve(Some(&url), width_mm, None)? {
                    Some(handle) => ImageEvidence::Cached(handle),
                    None => ImageEvidence::Missing,
                };
            }
        }
        progress();
    }
    Ok(())
}

/// 缓存键：URL整体的 SHA-256 十六进制 + 原始扩展名
///
/// 原始实现按路径末段文件名做键，不同主机的同名文件会静默碰撞；
/// 改为全URL哈希消除碰撞，同时保留「存在即命中」的行为。
pub fn cache_key(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    format!("{}{}", hex::encode(digest), url_extension(url))
}

/// URL路径末段的扩展名（含点，小写）；无法识别时为空
fn url_extension(url: &str) -> String {
    let mut path = url;
    if let Some((p, _)) = path.split_once('?') {
        path = p;
    }
    if let Some((p, _)) = path.split_once('#') {
        path = p;
    }
    let basename = path.rsplit('/').next().unwrap_or("");
    match basename.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= 5
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{}", ext.to_ascii_lowercase())
        }
        _ => String::new(),
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// 缓存目录信息：(文件数, 总字节数)
pub fn cache_info(dir: &Path) -> Result<(usize, u64)> {
    let mut count = 0;
    let mut bytes = 0;
    if dir.exists() {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if entry.path().is_file() {
                count += 1;
                bytes += entry.metadata()?.len();
            }
        }
    }
    Ok((count, bytes))
}

/// 清空缓存目录，返回删除的文件数
pub fn clear(dir: &Path) -> Result<usize> {
    let mut removed = 0;
    if dir.exists() {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if entry.path().is_file() {
                std::fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
    }
    Ok(removed)
}

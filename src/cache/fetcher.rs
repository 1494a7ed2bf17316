//! 图片字节获取
//!
//! [`ImageFetcher`] 把网络访问隔离成可注入的接口，测试用假实现统计调用次数。

use crate::error::{Result, VisitorReportError};
use std::time::Duration;

/// 单次获取的失败原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// HTTP 响应非成功状态
    Status(u16),
    /// 传输层故障（连接拒绝、DNS、超时等）
    Transport(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Status(code) => write!(f, "HTTP {}", code),
            FetchError::Transport(msg) => write!(f, "传输错误: {}", msg),
        }
    }
}

impl FetchError {
    /// 传输故障和 5xx 值得重试一次，4xx 不重试
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport(_) => true,
            FetchError::Status(code) => *code >= 500,
        }
    }
}

pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError>;
}

/// 同步 HTTP 获取器
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("visitor-report/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| VisitorReportError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(FetchError::Transport("connection refused".into()).is_retryable());
        assert!(FetchError::Status(502).is_retryable());
        assert!(!FetchError::Status(404).is_retryable());
        assert!(!FetchError::Status(403).is_retryable());
    }
}

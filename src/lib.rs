//! 访客登记表转报表工具
//!
//! 读取访客登记表（xlsx），解析证明图片超链接，下载并缓存图片，
//! 最后生成带内嵌图片的报表文档。

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod normalizer;
pub mod record;
pub mod workbook;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "visitor-report")]
#[command(about = "访客登记表转报表工具（证明图片下载缓存）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 输出详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 从登记表生成报表文档
    Generate {
        /// 登记表文件路径
        #[arg(default_value = "sample.xlsx")]
        input: PathBuf,

        /// 输出报表路径
        #[arg(short, long, default_value = "visitor_report.xlsx")]
        output: PathBuf,

        /// 行读取方式 (positional/labeled)，两种方式不可混用
        #[arg(short, long, default_value = "positional")]
        shape: RowShape,

        /// 图片缓存目录（默认取配置，初始为 images）
        #[arg(long)]
        image_dir: Option<PathBuf>,

        /// 图片显示宽度（毫米）
        #[arg(long)]
        width_mm: Option<f64>,

        /// 报表标题
        #[arg(short, long, default_value = "访客登记汇总表")]
        title: String,
    },

    /// 图片缓存管理
    Cache {
        /// 清空缓存目录
        #[arg(long)]
        clear: bool,

        /// 显示缓存信息
        #[arg(long)]
        info: bool,

        /// 缓存目录（省略时取配置值）
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// 显示/修改配置
    Config {
        /// 显示配置
        #[arg(long)]
        show: bool,

        /// 设置图片缓存目录
        #[arg(long)]
        set_image_dir: Option<PathBuf>,

        /// 设置下载超时（秒）
        #[arg(long)]
        set_timeout: Option<u64>,
    },
}

/// 登记表行读取方式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RowShape {
    /// 固定18列顺序，图片列取单元格超链接
    #[default]
    Positional,
    /// 按表头列名定位，图片列取单元格值
    Labeled,
}

impl std::str::FromStr for RowShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positional" | "pos" => Ok(RowShape::Positional),
            "labeled" | "label" => Ok(RowShape::Labeled),
            _ => Err(format!("Unknown shape: {}. Use positional or labeled", s)),
        }
    }
}

impl std::fmt::Display for RowShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowShape::Positional => write!(f, "positional"),
            RowShape::Labeled => write!(f, "labeled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_row_shape_from_str() {
        assert_eq!(RowShape::from_str("positional").unwrap(), RowShape::Positional);
        assert_eq!(RowShape::from_str("LABELED").unwrap(), RowShape::Labeled);
        assert!(RowShape::from_str("auto").is_err());
    }
}

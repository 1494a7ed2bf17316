pub mod excel;

pub use excel::generate_report;

use std::path::{Path, PathBuf};

/// 输出路径补全：给目录或无扩展名的路径补上 `<标题>.xlsx`
pub fn report_output_path(output: &Path, title: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.xlsx", title))
    } else {
        output.to_path_buf()
    }
}

//! 行归一化模块
//!
//! 登记表有两种行格式，归一化为统一的 [`VisitorRecord`]：
//! - positional: 固定18列顺序，图片列的数据在单元格超链接里
//! - labeled: 按表头列名定位，图片列的数据直接是单元格值
//!
//! 两种方式语义并不等价，由调用方显式选择，一次运行内不混用。

pub mod labeled;
pub mod positional;

use crate::cli::RowShape;
use crate::error::Result;
use crate::record::VisitorRecord;
use crate::workbook::SheetData;

pub use labeled::LabeledShape;
pub use positional::PositionalShape;

/// 把工作表行序列转成访客记录的能力
pub trait RecordSource {
    fn records(&self, sheet: &SheetData) -> Result<Vec<VisitorRecord>>;
}

pub fn source_for(shape: RowShape) -> Box<dyn RecordSource> {
    match shape {
        RowShape::Positional => Box::new(PositionalShape),
        RowShape::Labeled => Box::new(LabeledShape),
    }
}

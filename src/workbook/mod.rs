//! 登记表读取层
//!
//! [`SheetData`] 把第一个工作表读成字符串网格，同时解析单元格超链接。
//! 超链接查询是全函数：任何解析故障都降级为"无链接"，不会中断批处理。

mod hyperlinks;

use crate::error::{Result, VisitorReportError};
use calamine::{open_workbook, Data, Reader, Xlsx};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

#[derive(Debug)]
pub struct SheetData {
    /// 单元格字符串网格（含表头行）
    rows: Vec<Vec<String>>,
    /// (行, 列) → 超链接目标URL，坐标与 rows 对齐
    links: HashMap<(u32, u32), String>,
}

impl SheetData {
    /// 打开 xlsx 文件的第一个工作表
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(VisitorReportError::FileNotFound(
                path.display().to_string(),
            ));
        }

        let mut workbook: Xlsx<_> = open_workbook(path)?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| VisitorReportError::SheetNotFound(path.display().to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();

        // 超链接坐标是工作表绝对坐标，网格从 range.start() 开始，需对齐
        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        let links = match hyperlinks::read_sheet_hyperlinks(path, &sheet_name) {
            Ok(map) => map
                .into_iter()
                .filter(|((row, col), _)| *row >= start_row && *col >= start_col)
                .map(|((row, col), url)| ((row - start_row, col - start_col), url))
                .collect(),
            Err(e) => {
                warn!("超链接解析失败，按无链接处理: {}", e);
                HashMap::new()
            }
        };

        Ok(Self { rows, links })
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map(|row| row.len()).unwrap_or(0)
    }

    /// 单元格字符串值，越界返回空串
    pub fn value(&self, row: usize, col: usize) -> String {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .cloned()
            .unwrap_or_default()
    }

    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(|r| r.as_slice())
    }

    /// 单元格超链接目标。无链接、越界、解析失败一律 None，永不报错。
    pub fn hyperlink(&self, row: usize, col: usize) -> Option<&str> {
        self.links
            .get(&(row as u32, col as u32))
            .map(|s| s.as_str())
    }

    /// 前 `upto` 列全为空且无超链接的行（表单导出的尾部空行）
    pub fn row_is_blank(&self, row: usize, upto: usize) -> bool {
        (0..upto).all(|col| self.value(row, col).is_empty() && self.hyperlink(row, col).is_none())
    }

    #[cfg(test)]
    pub(crate) fn from_parts(rows: Vec<Vec<String>>, links: HashMap<(u32, u32), String>) -> Self {
        Self { rows, links }
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // 表单里的证件号/手机号常被存成数值，避免出现小数点
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

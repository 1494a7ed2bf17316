//! 固定18列的行格式
//!
//! 列顺序与表单导出一致：提交人、提交时间、姓名、性别、身份证号码、
//! 手机号码、单位名称、车牌号码、到访地点、到访日期、入校期限、到访原因、
//! 健康码、健康码检测、行程卡、行程卡检测、核酸检测、健康承诺书。
//! 检测列读取后丢弃；图片列的URL取自单元格超链接而不是显示文本。

use super::RecordSource;
use crate::error::{Result, VisitorReportError};
use crate::record::{ImageEvidence, VisitorRecord, HEALTHY_STATUS};
use crate::workbook::SheetData;
use tracing::info;

/// 有效列数
pub const COLUMN_COUNT: usize = 18;

pub struct PositionalShape;

impl RecordSource for PositionalShape {
    fn records(&self, sheet: &SheetData) -> Result<Vec<VisitorRecord>> {
        if sheet.width() < COLUMN_COUNT {
            return Err(VisitorReportError::MalformedSheet {
                expected: COLUMN_COUNT,
                actual: sheet.width(),
            });
        }

        let mut records = Vec::new();

        // 第1行是表头，数据从第2行开始
        for row in 1..sheet.height() {
            if sheet.row_is_blank(row, COLUMN_COUNT) {
                continue;
            }

            let cell = |col: usize| sheet.value(row, col);
            let link = |col: usize| match sheet.hyperlink(row, col) {
                Some(url) => ImageEvidence::Linked(url.to_string()),
                None => ImageEvidence::Missing,
            };

            // 列0提交人、列1提交时间、列13/15检测结果：读取后丢弃
            records.push(VisitorRecord {
                name: cell(2),
                gender: cell(3),
                id_num: cell(4),
                telphone: cell(5),
                company: cell(6),
                health_status: HEALTHY_STATUS.to_string(),
                car_num: cell(7),
                access_location: cell(8),
                access_date: cell(9),
                access_duration: cell(10),
                reason: cell(11),
                health_code_image: link(12),
                travel_card_image: link(14),
                nucleic_acid_testing_image: link(16),
                health_pledge_image: link(17),
            });
        }

        info!("按固定列序读取 {} 条登记记录", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sheet_with(rows: Vec<Vec<String>>, links: HashMap<(u32, u32), String>) -> SheetData {
        SheetData::from_parts(rows, links)
    }

    fn blank_row() -> Vec<String> {
        vec![String::new(); COLUMN_COUNT]
    }

    #[test]
    fn test_positional_basic_row() {
        let mut data = blank_row();
        data[2] = "张三".into();
        data[3] = "男".into();
        data[9] = "2022-04-01".into();

        let mut links = HashMap::new();
        links.insert((1, 12), "https://host/a/code.jpg".to_string());

        let records = PositionalShape
            .records(&sheet_with(vec![blank_row(), data], links))
            .unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.name, "张三");
        assert_eq!(r.gender, "男");
        assert_eq!(r.access_date, "2022-04-01");
        assert_eq!(r.health_status, HEALTHY_STATUS);
        assert_eq!(r.health_code_image.url(), Some("https://host/a/code.jpg"));
        assert!(r.travel_card_image.is_missing());
    }

    #[test]
    fn test_positional_narrow_sheet_fails() {
        let rows = vec![vec![String::new(); COLUMN_COUNT - 1]; 2];
        let err = PositionalShape
            .records(&sheet_with(rows, HashMap::new()))
            .unwrap_err();
        assert!(matches!(
            err,
            VisitorReportError::MalformedSheet {
                expected: 18,
                actual: 17
            }
        ));
    }

    #[test]
    fn test_positional_skips_trailing_blank_rows() {
        let mut data = blank_row();
        data[2] = "李四".into();
        let rows = vec![blank_row(), data, blank_row(), blank_row()];

        let records = PositionalShape
            .records(&sheet_with(rows, HashMap::new()))
            .unwrap();
        assert_eq!(records.len(), 1);
    }
}

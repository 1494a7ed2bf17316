//! 按表头列名定位的行格式
//!
//! 必需列按表头文本精确匹配，缺列立即报错。
//! 图片列直接取单元格值作为URL候选（表单导出的另一种变体），
//! 非URL的值在缓存解析阶段自然降级为"无图片"。

use super::RecordSource;
use crate::error::{Result, VisitorReportError};
use crate::record::{ImageEvidence, VisitorRecord, HEALTHY_STATUS};
use crate::workbook::SheetData;
use std::collections::HashMap;
use tracing::info;

pub const COL_NAME: &str = "姓名（必填）";
pub const COL_GENDER: &str = "性别（必填）";
pub const COL_ID_NUM: &str = "身份证号码（必填）";
pub const COL_TELPHONE: &str = "手机号码（必填）";
pub const COL_COMPANY: &str = "单位名称（必填）";
pub const COL_CAR_NUM: &str = "车牌号码";
pub const COL_ACCESS_LOCATION: &str = "到访地点（必填）";
pub const COL_ACCESS_DATE: &str = "到访日期（必填）";
pub const COL_ACCESS_DURATION: &str = "入校期限（必填）";
pub const COL_REASON: &str = "到访原因（必填）";
pub const COL_HEALTH_CODE: &str = "云南省健康码（必填）";
pub const COL_TRAVEL_CARD: &str = "行程卡截图（必填）";
pub const COL_NUCLEIC_ACID: &str = "核酸检测截图（必填）";
pub const COL_HEALTH_PLEDGE: &str = "《个人健康承诺书》（必填）";

pub struct LabeledShape;

impl RecordSource for LabeledShape {
    fn records(&self, sheet: &SheetData) -> Result<Vec<VisitorRecord>> {
        let header = sheet
            .row(0)
            .ok_or_else(|| VisitorReportError::MissingColumn(COL_NAME.to_string()))?;

        let index: HashMap<&str, usize> = header
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim(), i))
            .collect();
        let col = |name: &str| -> Result<usize> {
            index
                .get(name)
                .copied()
                .ok_or_else(|| VisitorReportError::MissingColumn(name.to_string()))
        };

        // 所有必需列先定位，任何缺列在读数据前失败
        let name_col = col(COL_NAME)?;
        let gender_col = col(COL_GENDER)?;
        let id_num_col = col(COL_ID_NUM)?;
        let telphone_col = col(COL_TELPHONE)?;
        let company_col = col(COL_COMPANY)?;
        let car_num_col = col(COL_CAR_NUM)?;
        let access_location_col = col(COL_ACCESS_LOCATION)?;
        let access_date_col = col(COL_ACCESS_DATE)?;
        let access_duration_col = col(COL_ACCESS_DURATION)?;
        let reason_col = col(COL_REASON)?;
        let health_code_col = col(COL_HEALTH_CODE)?;
        let travel_card_col = col(COL_TRAVEL_CARD)?;
        let nucleic_acid_col = col(COL_NUCLEIC_ACID)?;
        let health_pledge_col = col(COL_HEALTH_PLEDGE)?;

        let mut records = Vec::new();

        for row in 1..sheet.height() {
            if sheet.row_is_blank(row, sheet.width()) {
                continue;
            }

            let cell = |c: usize| sheet.value(row, c);
            // 该变体的图片列值本身就是URL候选
            let value_link = |c: usize| {
                let value = sheet.value(row, c);
                if value.is_empty() {
                    ImageEvidence::Missing
                } else {
                    ImageEvidence::Linked(value)
                }
            };

            records.push(VisitorRecord {
                name: cell(name_col),
                gender: cell(gender_col),
                id_num: cell(id_num_col),
                telphone: cell(telphone_col),
                company: cell(company_col),
                health_status: HEALTHY_STATUS.to_string(),
                car_num: cell(car_num_col),
                access_location: cell(access_location_col),
                access_date: cell(access_date_col),
                access_duration: cell(access_duration_col),
                reason: cell(reason_col),
                health_code_image: value_link(health_code_col),
                travel_card_image: value_link(travel_card_col),
                nucleic_acid_testing_image: value_link(nucleic_acid_col),
                health_pledge_image: value_link(health_pledge_col),
            });
        }

        info!("按表头列名读取 {} 条登记记录", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as Map;

    fn full_header() -> Vec<String> {
        vec![
            COL_NAME,
            COL_GENDER,
            COL_ID_NUM,
            COL_TELPHONE,
            COL_COMPANY,
            COL_CAR_NUM,
            COL_ACCESS_LOCATION,
            COL_ACCESS_DATE,
            COL_ACCESS_DURATION,
            COL_REASON,
            COL_HEALTH_CODE,
            COL_TRAVEL_CARD,
            COL_NUCLEIC_ACID,
            COL_HEALTH_PLEDGE,
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    #[test]
    fn test_labeled_basic_row() {
        let mut data = vec![String::new(); 14];
        data[0] = "王五".into();
        data[10] = "https://host/b/code.png".into();

        let sheet = SheetData::from_parts(vec![full_header(), data], Map::new());
        let records = LabeledShape.records(&sheet).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "王五");
        assert_eq!(records[0].health_status, HEALTHY_STATUS);
        assert_eq!(
            records[0].health_code_image.url(),
            Some("https://host/b/code.png")
        );
        assert!(records[0].travel_card_image.is_missing());
    }

    #[test]
    fn test_labeled_missing_column_fails() {
        let mut header = full_header();
        header.retain(|h| h.as_str() != COL_HEALTH_CODE);
        let data = vec![String::new(); 13];

        let sheet = SheetData::from_parts(vec![header, data], Map::new());
        let err = LabeledShape.records(&sheet).unwrap_err();
        assert!(
            matches!(err, VisitorReportError::MissingColumn(name) if name == COL_HEALTH_CODE)
        );
    }

    #[test]
    fn test_labeled_column_order_independent() {
        // 列顺序打乱也能按名字定位
        let rest = full_header();
        let header: Vec<String> = vec![COL_GENDER, COL_NAME]
            .into_iter()
            .chain(
                rest.iter()
                    .filter(|h| h.as_str() != COL_NAME && h.as_str() != COL_GENDER)
                    .map(|s| s.as_str()),
            )
            .map(String::from)
            .collect();
        let mut data = vec![String::new(); 14];
        data[0] = "女".into();
        data[1] = "赵六".into();

        let sheet = SheetData::from_parts(vec![header, data], Map::new());
        let records = LabeledShape.records(&sheet).unwrap();
        assert_eq!(records[0].name, "赵六");
        assert_eq!(records[0].gender, "女");
    }
}

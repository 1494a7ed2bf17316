//! 报表生成
//!
//! 每条访客记录占一行：标量列写文本，四个证明图片列按句柄的
//! 目标宽度缩放后内嵌。标题行在顶部，末尾带记录数和生成时间。

use crate::error::Result;
use crate::record::{EvidenceKind, ImageEvidence, ImageHandle, VisitorRecord, DEFAULT_IMAGE_WIDTH_MM};
use chrono::Local;
use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, Image, ObjectMovement, Workbook, Worksheet,
};
use std::path::Path;
use tracing::warn;

/// 毫米 → 屏幕像素（96dpi）
const MM_TO_PX: f64 = 96.0 / 25.4;

/// 无图片时的占位文本
const PLACEHOLDER: &str = "（无）";

/// 标量列：表头文本和列宽（字符单位）
const SCALAR_COLUMNS: &[(&str, f64)] = &[
    ("序号", 6.0),
    ("姓名", 10.0),
    ("性别", 6.0),
    ("身份证号码", 20.0),
    ("手机号码", 14.0),
    ("单位名称", 18.0),
    ("健康状态", 9.0),
    ("车牌号码", 10.0),
    ("到访地点", 14.0),
    ("到访日期", 18.0),
    ("入校期限", 12.0),
    ("到访原因", 16.0),
];

/// 图片列的固定顺序
const EVIDENCE_COLUMNS: [EvidenceKind; 4] = [
    EvidenceKind::HealthCode,
    EvidenceKind::TravelCard,
    EvidenceKind::NucleicAcidTesting,
    EvidenceKind::HealthPledge,
];

const TOTAL_COLUMNS: u16 = SCALAR_COLUMNS.len() as u16 + EVIDENCE_COLUMNS.len() as u16;

pub fn generate_report(records: &[VisitorRecord], output_path: &Path, title: &str) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("访客登记")?;

    let title_format = Format::new()
        .set_bold()
        .set_font_size(14.0)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);

    let header_format = Format::new()
        .set_bold()
        .set_font_size(9.0)
        .set_font_color(Color::RGB(0x555555))
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xAAAAAA));

    let value_format = Format::new()
        .set_font_size(11.0)
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let footer_format = Format::new()
        .set_font_size(9.0)
        .set_font_color(Color::RGB(0x888888))
        .set_align(FormatAlign::Right);

    // 列宽
    for (col, (_, width)) in SCALAR_COLUMNS.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }
    let image_col_px = (image_column_width_mm(records) * MM_TO_PX).round() as u32 + 8;
    for offset in 0..EVIDENCE_COLUMNS.len() {
        let col = SCALAR_COLUMNS.len() as u16 + offset as u16;
        worksheet.set_column_width_pixels(col, image_col_px as u16)?;
    }

    // 标题行 + 表头行
    worksheet.merge_range(0, 0, 0, TOTAL_COLUMNS - 1, title, &title_format)?;
    worksheet.set_row_height(0, 24.0)?;
    for (col, (header, _)) in SCALAR_COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(1, col as u16, *header, &header_format)?;
    }
    for (offset, kind) in EVIDENCE_COLUMNS.iter().enumerate() {
        let col = SCALAR_COLUMNS.len() as u16 + offset as u16;
        worksheet.write_string_with_format(1, col, kind.to_string(), &header_format)?;
    }

    // 数据行
    for (idx, record) in records.iter().enumerate() {
        let row = (idx + 2) as u32;
        let scalars = [
            (idx + 1).to_string(),
            record.name.clone(),
            record.gender.clone(),
            record.id_num.clone(),
            record.telphone.clone(),
            record.company.clone(),
            record.health_status.clone(),
            record.car_num.clone(),
            record.access_location.clone(),
            record.access_date.clone(),
            record.access_duration.clone(),
            record.reason.clone(),
        ];
        for (col, value) in scalars.iter().enumerate() {
            worksheet.write_string_with_format(row, col as u16, value, &value_format)?;
        }

        let mut row_height_px: u32 = 24;
        for (offset, kind) in EVIDENCE_COLUMNS.iter().enumerate() {
            let col = SCALAR_COLUMNS.len() as u16 + offset as u16;
            match record.evidence(*kind) {
                ImageEvidence::Cached(handle) => match embed_image(worksheet, row, col, handle) {
                    Ok(height_px) => row_height_px = row_height_px.max(height_px + 6),
                    Err(e) => {
                        // 缓存文件不是可识别的图片格式时不中断整批
                        warn!("内嵌{}失败({}), 以占位符代替: {}", kind, e, handle.path.display());
                        worksheet.write_string_with_format(row, col, PLACEHOLDER, &value_format)?;
                    }
                },
                _ => {
                    worksheet.write_string_with_format(row, col, PLACEHOLDER, &value_format)?;
                }
            }
        }
        worksheet.set_row_height_pixels(row, row_height_px as u16)?;
    }

    // 末尾统计行
    let footer_row = (records.len() + 2) as u32;
    let footer = format!(
        "共 {} 条记录    生成时间: {}",
        records.len(),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    worksheet.merge_range(footer_row, 0, footer_row, TOTAL_COLUMNS - 1, &footer, &footer_format)?;

    workbook.save(output_path)?;
    Ok(())
}

/// 内嵌一张缓存图片，返回缩放后的像素高度
fn embed_image(worksheet: &mut Worksheet, row: u32, col: u16, handle: &ImageHandle) -> Result<u32> {
    let image = Image::new(&handle.path)?;
    let natural_width = (image.width() as f64).max(1.0);
    let natural_height = (image.height() as f64).max(1.0);

    let scale_width = handle.width_mm * MM_TO_PX / natural_width;
    let scale_height = match handle.height_mm {
        Some(height_mm) => height_mm * MM_TO_PX / natural_height,
        None => scale_width,
    };

    let image = image
        .set_scale_width(scale_width)
        .set_scale_height(scale_height)
        .set_object_movement(ObjectMovement::DontMoveOrSizeWithCells);
    worksheet.insert_image_with_offset(row, col, &image, 2, 2)?;

    Ok((natural_height * scale_height).ceil() as u32)
}

/// 图片列宽取批内句柄的最大目标宽度，无图片时用默认值
fn image_column_width_mm(records: &[VisitorRecord]) -> f64 {
    records
        .iter()
        .flat_map(|r| EVIDENCE_COLUMNS.iter().map(move |kind| r.evidence(*kind)))
        .filter_map(|evidence| evidence.handle())
        .map(|handle| handle.width_mm)
        .fold(DEFAULT_IMAGE_WIDTH_MM, f64::max)
}

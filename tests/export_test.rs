//! 报表生成集成测试

mod common;

use common::TINY_PNG;
use tempfile::tempdir;
use visitor_report_rust::export::{generate_report, report_output_path};
use visitor_report_rust::record::{
    ImageEvidence, ImageHandle, VisitorRecord, DEFAULT_IMAGE_WIDTH_MM, HEALTHY_STATUS,
};

fn test_record(index: usize) -> VisitorRecord {
    VisitorRecord {
        name: format!("访客{}", index),
        gender: "男".to_string(),
        id_num: format!("53010219900101{:04}", index),
        telphone: "13808710000".to_string(),
        company: "测试单位".to_string(),
        health_status: HEALTHY_STATUS.to_string(),
        car_num: String::new(),
        access_location: "东陆校区".to_string(),
        access_date: "2022-04-05".to_string(),
        access_duration: "一天".to_string(),
        reason: "测试到访".to_string(),
        ..Default::default()
    }
}

#[test]
fn test_report_generation_without_images() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("report.xlsx");

    let records: Vec<VisitorRecord> = (1..=3).map(test_record).collect();

    let result = generate_report(&records, &output_path, "访客登记汇总表");
    assert!(result.is_ok(), "报表生成失败: {:?}", result.err());
    assert!(output_path.exists(), "报表文件未创建");

    let metadata = std::fs::metadata(&output_path).expect("获取文件元数据失败");
    assert!(metadata.len() > 0, "报表文件为空");
}

#[test]
fn test_report_generation_with_cached_image() {
    let dir = tempdir().expect("Failed to create temp dir");
    let image_path = dir.path().join("cached.png");
    std::fs::write(&image_path, TINY_PNG).unwrap();

    let mut record = test_record(1);
    record.health_code_image = ImageEvidence::Cached(ImageHandle {
        path: image_path,
        width_mm: DEFAULT_IMAGE_WIDTH_MM,
        height_mm: None,
    });

    let output_path = dir.path().join("with_image.xlsx");
    let result = generate_report(&[record], &output_path, "访客登记汇总表");
    assert!(result.is_ok(), "带图片的报表生成失败: {:?}", result.err());

    // xlsx 是 zip 包
    let bytes = std::fs::read(&output_path).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn test_report_generation_empty_records() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("empty.xlsx");

    let result = generate_report(&[], &output_path, "空报表");
    assert!(result.is_ok(), "空报表生成失败: {:?}", result.err());
    assert!(output_path.exists());
}

#[test]
fn test_report_generation_unreadable_image_soft_fails() {
    let dir = tempdir().expect("Failed to create temp dir");
    // 缓存里可能躺着服务端返回200但并非图片的响应体
    let bogus_path = dir.path().join("bogus.jpg");
    std::fs::write(&bogus_path, b"not an image at all").unwrap();

    let mut record = test_record(1);
    record.travel_card_image = ImageEvidence::Cached(ImageHandle {
        path: bogus_path,
        width_mm: DEFAULT_IMAGE_WIDTH_MM,
        height_mm: None,
    });

    let output_path = dir.path().join("bogus.xlsx");
    let result = generate_report(&[record], &output_path, "访客登记汇总表");
    assert!(result.is_ok(), "坏图片不应中断整批: {:?}", result.err());
    assert!(output_path.exists());
}

#[test]
fn test_report_output_path_completion() {
    let dir = tempdir().expect("Failed to create temp dir");
    let completed = report_output_path(dir.path(), "访客登记汇总表");
    assert_eq!(
        completed,
        dir.path().join("访客登记汇总表.xlsx")
    );

    let explicit = report_output_path(&dir.path().join("out.xlsx"), "访客登记汇总表");
    assert_eq!(explicit, dir.path().join("out.xlsx"));
}

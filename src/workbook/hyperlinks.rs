//! 工作表超链接解析
//!
//! calamine 不暴露单元格超链接，这里直接读 xlsx 包内的
//! worksheet XML 部件和 .rels 关系表，得到「单元格 → 外部URL」映射。
//! 表单导出常在图片列放"查看图片"之类的显示文本，真正的数据是超链接目标。

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

const REL_TYPE_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

/// 读取指定工作表的超链接映射：绝对坐标 (行, 列) → 外部URL（均为0起始）。
///
/// 只收集外部链接（r:id 关系），工作簿内部跳转（location）与图片无关，跳过。
/// 错误以 String 返回，调用方按「提取永不失败」的约定降级处理。
pub(crate) fn read_sheet_hyperlinks(
    path: &Path,
    sheet_name: &str,
) -> Result<HashMap<(u32, u32), String>, String> {
    let file = File::open(path).map_err(|e| format!("打开文件失败: {}", e))?;
    let mut zip = ZipArchive::new(file).map_err(|e| format!("读取xlsx包失败: {}", e))?;

    // 工作表名 → 包内部件路径（经 workbook.xml 的 r:id 和关系表解析）
    let workbook_xml = zip_read_to_string(&mut zip, "xl/workbook.xml")?;
    let rels_xml = zip_read_to_string(&mut zip, "xl/_rels/workbook.xml.rels")?;
    let sheet_rids = parse_workbook_sheet_rids(&workbook_xml);
    let rel_targets = parse_relationship_targets(&rels_xml);

    let rid = sheet_rids
        .iter()
        .find(|(name, _)| name == sheet_name)
        .map(|(_, rid)| rid.clone())
        .ok_or_else(|| format!("工作簿中找不到工作表: {}", sheet_name))?;
    let target = rel_targets
        .get(&rid)
        .map(|(_, target)| target.clone())
        .ok_or_else(|| format!("工作表关系缺失: {}", rid))?;
    let sheet_part = join_and_normalize("xl/", &target);

    let sheet_xml = zip_read_to_string(&mut zip, &sheet_part)?;
    let nodes = parse_hyperlink_nodes(&sheet_xml);
    if nodes.is_empty() {
        return Ok(HashMap::new());
    }

    // 外部链接需要工作表自己的 .rels 部件来解析 r:id
    let mut rid_targets: HashMap<String, (String, String)> = HashMap::new();
    if nodes.iter().any(|n| n.rid.is_some()) {
        let rels_part = sheet_rels_path(&sheet_part);
        if let Ok(xml) = zip_read_to_string(&mut zip, &rels_part) {
            rid_targets = parse_relationship_targets(&xml);
        }
    }

    let mut out = HashMap::new();
    for node in nodes {
        let Some(rid) = node.rid else { continue };
        let Some((ty, target)) = rid_targets.get(&rid) else {
            continue;
        };
        if ty != REL_TYPE_HYPERLINK || target.is_empty() {
            continue;
        }
        if let Some(cell) = a1_to_row_col(&node.reference) {
            out.insert(cell, target.clone());
        }
    }

    Ok(out)
}

struct HyperlinkNode {
    reference: String,
    rid: Option<String>,
}

fn zip_read_to_string<R: Read + std::io::Seek>(
    zip: &mut ZipArchive<R>,
    name: &str,
) -> Result<String, String> {
    let mut entry = zip
        .by_name(name)
        .map_err(|e| format!("包内缺少部件 {}: {}", name, e))?;
    let mut content = String::new();
    entry
        .read_to_string(&mut content)
        .map_err(|e| format!("读取部件 {} 失败: {}", name, e))?;
    Ok(content)
}

/// 解析 workbook.xml 中的 `<sheet name=… r:id=…>` 列表（按文件顺序）
fn parse_workbook_sheet_rids(xml: &str) -> Vec<(String, String)> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut out = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) | Err(_) => break,
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if e.local_name().as_ref() == b"sheet" =>
            {
                let mut name = None;
                let mut rid = None;
                for attr in e.attributes().flatten() {
                    let Ok(value) = attr.unescape_value() else {
                        continue;
                    };
                    match attr.key.as_ref() {
                        b"name" => name = Some(value.to_string()),
                        b"r:id" => rid = Some(value.to_string()),
                        _ => {}
                    }
                }
                if let (Some(name), Some(rid)) = (name, rid) {
                    out.push((name, rid));
                }
            }
            _ => {}
        }
        buf.clear();
    }

    out
}

/// 解析关系表：Id → (Type, Target)
fn parse_relationship_targets(xml: &str) -> HashMap<String, (String, String)> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut out = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) | Err(_) => break,
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let mut id = None;
                let mut ty = String::new();
                let mut target = String::new();
                for attr in e.attributes().flatten() {
                    let Ok(value) = attr.unescape_value() else {
                        continue;
                    };
                    match attr.key.as_ref() {
                        b"Id" => id = Some(value.to_string()),
                        b"Type" => ty = value.to_string(),
                        b"Target" => target = value.to_string(),
                        _ => {}
                    }
                }
                if let Some(id) = id {
                    out.insert(id, (ty, target));
                }
            }
            _ => {}
        }
        buf.clear();
    }

    out
}

/// 收集 worksheet XML 中的 `<hyperlink ref=… r:id=…>` 节点
fn parse_hyperlink_nodes(xml: &str) -> Vec<HyperlinkNode> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut out = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) | Err(_) => break,
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if e.local_name().as_ref() == b"hyperlink" =>
            {
                let mut reference = None;
                let mut rid = None;
                for attr in e.attributes().flatten() {
                    let Ok(value) = attr.unescape_value() else {
                        continue;
                    };
                    match attr.key.as_ref() {
                        b"ref" => reference = Some(value.to_string()),
                        b"r:id" => rid = Some(value.to_string()),
                        _ => {}
                    }
                }
                if let Some(reference) = reference {
                    out.push(HyperlinkNode { reference, rid });
                }
            }
            _ => {}
        }
        buf.clear();
    }

    out
}

/// 工作表部件路径 → 对应 .rels 部件路径
/// 例: xl/worksheets/sheet1.xml → xl/worksheets/_rels/sheet1.xml.rels
fn sheet_rels_path(sheet_part: &str) -> String {
    match sheet_part.rfind('/') {
        Some(idx) => format!(
            "{}_rels/{}.rels",
            &sheet_part[..idx + 1],
            &sheet_part[idx + 1..]
        ),
        None => format!("_rels/{}.rels", sheet_part),
    }
}

/// 关系 Target 拼接到包根路径（"/xl/…" 的绝对写法去掉前导斜杠）
fn join_and_normalize(base: &str, target: &str) -> String {
    if let Some(stripped) = target.strip_prefix('/') {
        stripped.to_string()
    } else {
        format!("{}{}", base, target)
    }
}

/// A1 引用 → 0 起始 (行, 列)；区间引用取左上角
pub(crate) fn a1_to_row_col(a1: &str) -> Option<(u32, u32)> {
    let a1 = a1.trim();
    let a1 = a1.split_once(':').map(|(start, _)| start).unwrap_or(a1);

    let mut col: u32 = 0;
    let mut chars = a1.chars().peekable();
    let mut has_letters = false;

    while let Some(c) = chars.peek().copied() {
        if c.is_ascii_alphabetic() {
            has_letters = true;
            col = col
                .checked_mul(26)?
                .checked_add(c.to_ascii_uppercase() as u32 - 'A' as u32 + 1)?;
            chars.next();
        } else {
            break;
        }
    }

    let digits: String = chars.collect();
    if !has_letters || digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let row: u32 = digits.parse().ok()?;
    if row == 0 || col == 0 {
        return None;
    }

    Some((row - 1, col - 1))
}

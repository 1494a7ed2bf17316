//! 访客记录数据模型
//!
//! 登记表的一行归一化为一条 [`VisitorRecord`]。标量字段原样复制，
//! 不做校验；四个证明图片字段经过「链接 → 本地缓存」两阶段解析。

use std::path::PathBuf;

/// 健康状态固定值（不从登记表读取）
pub const HEALTHY_STATUS: &str = "健康";

/// 图片默认显示宽度（毫米）
pub const DEFAULT_IMAGE_WIDTH_MM: f64 = 60.0;

/// 内嵌图片句柄
///
/// 指向已缓存的本地图片文件，附带目标显示尺寸。
/// 高度为 None 时按原始纵横比缩放。
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHandle {
    /// 本地缓存文件路径
    pub path: PathBuf,
    /// 目标显示宽度（毫米）
    pub width_mm: f64,
    /// 目标显示高度（毫米），None = 按纵横比
    pub height_mm: Option<f64>,
}

/// 证明图片字段的生命周期状态
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ImageEvidence {
    /// 无链接或链接不可用
    #[default]
    Missing,
    /// 归一化阶段捕获的图片URL（待解析）
    Linked(String),
    /// 已解析为本地缓存文件
    Cached(ImageHandle),
}

impl ImageEvidence {
    pub fn url(&self) -> Option<&str> {
        match self {
            ImageEvidence::Linked(url) => Some(url),
            _ => None,
        }
    }

    pub fn handle(&self) -> Option<&ImageHandle> {
        match self {
            ImageEvidence::Cached(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ImageEvidence::Missing)
    }
}

/// 证明图片类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceKind {
    HealthCode,
    TravelCard,
    NucleicAcidTesting,
    HealthPledge,
}

impl std::fmt::Display for EvidenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvidenceKind::HealthCode => write!(f, "云南省健康码"),
            EvidenceKind::TravelCard => write!(f, "行程卡截图"),
            EvidenceKind::NucleicAcidTesting => write!(f, "核酸检测截图"),
            EvidenceKind::HealthPledge => write!(f, "个人健康承诺书"),
        }
    }
}

/// 一条访客登记记录
#[derive(Debug, Clone, Default)]
pub struct VisitorRecord {
    /// 姓名
    pub name: String,
    /// 性别
    pub gender: String,
    /// 身份证号码
    pub id_num: String,
    /// 手机号码
    pub telphone: String,
    /// 单位名称
    pub company: String,
    /// 健康状态（固定为 [`HEALTHY_STATUS`]）
    pub health_status: String,
    /// 车牌号码（可为空）
    pub car_num: String,
    /// 到访地点
    pub access_location: String,
    /// 到访日期
    pub access_date: String,
    /// 入校期限
    pub access_duration: String,
    /// 到访原因
    pub reason: String,
    /// 健康码截图
    pub health_code_image: ImageEvidence,
    /// 行程卡截图
    pub travel_card_image: ImageEvidence,
    /// 核酸检测截图
    pub nucleic_acid_testing_image: ImageEvidence,
    /// 个人健康承诺书
    pub health_pledge_image: ImageEvidence,
}

impl VisitorRecord {
    pub fn evidence(&self, kind: EvidenceKind) -> &ImageEvidence {
        match kind {
            EvidenceKind::HealthCode => &self.health_code_image,
            EvidenceKind::TravelCard => &self.travel_card_image,
            EvidenceKind::NucleicAcidTesting => &self.nucleic_acid_testing_image,
            EvidenceKind::HealthPledge => &self.health_pledge_image,
        }
    }

    /// 四个证明图片字段的可变引用（按固定顺序）
    pub fn evidence_slots_mut(&mut self) -> [(EvidenceKind, &mut ImageEvidence); 4] {
        [
            (EvidenceKind::HealthCode, &mut self.health_code_image),
            (EvidenceKind::TravelCard, &mut self.travel_card_image),
            (
                EvidenceKind::NucleicAcidTesting,
                &mut self.nucleic_acid_testing_image,
            ),
            (EvidenceKind::HealthPledge, &mut self.health_pledge_image),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evidence_default_is_missing() {
        let record = VisitorRecord::default();
        assert!(record.health_code_image.is_missing());
        assert!(record.health_pledge_image.is_missing());
    }

    #[test]
    fn test_evidence_url_and_handle() {
        let linked = ImageEvidence::Linked("https://example.com/a.jpg".into());
        assert_eq!(linked.url(), Some("https://example.com/a.jpg"));
        assert!(linked.handle().is_none());

        let cached = ImageEvidence::Cached(ImageHandle {
            path: PathBuf::from("images/abc.jpg"),
            width_mm: DEFAULT_IMAGE_WIDTH_MM,
            height_mm: None,
        });
        assert!(cached.url().is_none());
        assert!(cached.handle().is_some());
    }

    #[test]
    fn test_evidence_slots_order() {
        let mut record = VisitorRecord::default();
        let kinds: Vec<EvidenceKind> = record
            .evidence_slots_mut()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EvidenceKind::HealthCode,
                EvidenceKind::TravelCard,
                EvidenceKind::NucleicAcidTesting,
                EvidenceKind::HealthPledge,
            ]
        );
    }
}

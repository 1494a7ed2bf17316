use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisitorReportError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("登记表读取错误: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("登记表中没有工作表: {0}")]
    SheetNotFound(String),

    #[error("登记表列数不足: 需要 {expected} 列, 实际 {actual} 列")]
    MalformedSheet { expected: usize, actual: usize },

    #[error("缺少必需的表头列: {0}")]
    MissingColumn(String),

    #[error("报表生成错误: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON解析错误: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP客户端初始化失败: {0}")]
    HttpClient(String),
}

pub type Result<T> = std::result::Result<T, VisitorReportError>;

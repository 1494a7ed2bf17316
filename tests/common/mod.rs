//! 测试共用工具
#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;
use visitor_report_rust::cache::{FetchError, ImageFetcher};

/// 1x1 透明PNG（合法文件头，足够内嵌测试用）
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG签名
    0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15,
    0xC4, 0x89, //
    0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, // IDAT
    0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, //
    0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82, // IEND
];

/// 假获取器：统计调用次数，返回预设结果
pub struct FakeFetcher {
    pub calls: Rc<Cell<usize>>,
    pub response: FakeResponse,
}

#[derive(Clone)]
pub enum FakeResponse {
    Bytes(Vec<u8>),
    Fail(FetchError),
}

impl FakeFetcher {
    pub fn ok(bytes: &[u8]) -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        (
            Self {
                calls: calls.clone(),
                response: FakeResponse::Bytes(bytes.to_vec()),
            },
            calls,
        )
    }

    pub fn failing(error: FetchError) -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        (
            Self {
                calls: calls.clone(),
                response: FakeResponse::Fail(error),
            },
            calls,
        )
    }
}

impl ImageFetcher for FakeFetcher {
    fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.set(self.calls.get() + 1);
        match &self.response {
            FakeResponse::Bytes(bytes) => Ok(bytes.clone()),
            FakeResponse::Fail(error) => Err(error.clone()),
        }
    }
}

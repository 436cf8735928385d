//! 资源定位与字节获取
//!
//! 支持本地文件、HTTP(S) 地址和内存中的字节三种来源。

use std::fmt;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::data::error::DataError;

/// 不透明的资源定位符
#[derive(Clone, PartialEq, Eq)]
pub enum Locator {
    /// 本地文件
    File(PathBuf),
    /// HTTP(S) 地址
    Http(String),
    /// 已在内存中的字节
    Memory(Arc<[u8]>),
}

impl Locator {
    /// 根据字符串推断：`http://`、`https://` 开头视为网络地址，其余视为文件路径
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            Locator::Http(s.to_string())
        } else {
            Locator::File(PathBuf::from(s))
        }
    }

    pub fn file(path: impl AsRef<Path>) -> Self {
        Locator::File(path.as_ref().to_path_buf())
    }

    pub fn memory(bytes: impl Into<Arc<[u8]>>) -> Self {
        Locator::Memory(bytes.into())
    }

    /// 读取全部字节
    ///
    /// 文件缺失返回 [`DataError::FileNotFound`]，其他读文件错误返回
    /// [`DataError::IoError`]，网络错误返回 [`DataError::DownloadError`]。
    pub fn fetch(&self) -> Result<Vec<u8>, DataError> {
        let bytes = match self {
            Locator::File(path) => std::fs::read(path).map_err(|e| match e.kind() {
                ErrorKind::NotFound => DataError::FileNotFound(path.clone()),
                _ => DataError::IoError(e),
            })?,
            Locator::Http(url) => fetch_http(url)?,
            Locator::Memory(bytes) => bytes.to_vec(),
        };
        log::debug!("从 {self} 获取 {} 字节", bytes.len());
        Ok(bytes)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::File(path) => write!(f, "{}", path.display()),
            Locator::Http(url) => write!(f, "{url}"),
            Locator::Memory(bytes) => write!(f, "<内存: {} 字节>", bytes.len()),
        }
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Locator({self})")
    }
}

fn fetch_http(url: &str) -> Result<Vec<u8>, DataError> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| DataError::DownloadError(format!("HTTP 请求失败: {e}")))?;

    if response.status() != 200 {
        return Err(DataError::DownloadError(format!(
            "HTTP 状态码: {}",
            response.status()
        )));
    }

    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| DataError::DownloadError(format!("读取响应失败: {e}")))?;
    Ok(bytes)
}

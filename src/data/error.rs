//! 数据加载错误类型定义

use std::path::PathBuf;

use thiserror::Error;

/// 数据加载与采样相关错误
#[derive(Debug, Error)]
pub enum DataError {
    /// 精灵图无法解码，或解码后的像素数不是 N·S
    #[error("图像解码失败: {0}")]
    ImageDecodeFailed(String),

    /// 标签二进制块获取失败（传输错误）
    #[error("标签获取失败: {0}")]
    LabelFetchFailed(String),

    /// 缓冲区长度与 N/S/C 不一致
    #[error("{buffer} 缓冲区长度不匹配: 长度 {len}，步长 {stride}，期望 {expected} 个元素")]
    CorpusLengthMismatch {
        buffer: &'static str,
        len: usize,
        stride: usize,
        expected: usize,
    },

    /// 子集为空，无法采样
    #[error("数据子集为空，无法产生批次")]
    EmptyDataset,

    /// 按步长提取时越界（索引计算错误）
    #[error("索引越界: ({index} + 1) * {stride} > {len}")]
    OutOfRange {
        index: usize,
        stride: usize,
        len: usize,
    },

    /// 排列长度与子集大小不一致
    #[error("排列长度 {permutation} 与子集大小 {subset} 不一致")]
    PermutationMismatch { permutation: usize, subset: usize },

    /// 批次缓冲区大小超出可分配范围
    #[error("批次过大: {batch_size} 个样本的缓冲区超出可分配范围")]
    BatchTooLarge { batch_size: usize },

    /// 比例不是有效数字
    #[error("无效的切分比例: {0}")]
    InvalidRatio(f64),

    /// 比例裁剪范围不合法
    #[error("无效的比例范围: [{min}, {max}]，须满足 0 <= min <= max <= 1")]
    InvalidBounds { min: f64, max: f64 },

    /// 文件未找到
    #[error("文件未找到: {0}")]
    FileNotFound(PathBuf),

    /// 下载错误
    #[error("下载错误: {0}")]
    DownloadError(String),

    /// 配置解析错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// IO 错误
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for DataError {
    fn from(e: serde_json::Error) -> Self {
        DataError::ConfigError(e.to_string())
    }
}

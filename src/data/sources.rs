//! 外部数据源：精灵图图像源与 one-hot 标签源
//!
//! 精灵图是一张 PNG，按行优先顺序读出的像素依次构成各样本的图像
//! （MNIST 精灵图宽 784、高 65000，每行一张 28x28 图像）。
//! 每个像素取红色通道并除以 255 归一化到 [0, 1]。

use std::sync::Arc;

use crate::data::corpus::CorpusShape;
use crate::data::error::DataError;
use crate::data::fetch::Locator;

/// 图像源：产出 `N * S` 个 [0, 1] 内的浮点数，图像优先、图像内行优先
///
/// 返回 `Arc<[f32]>`，已在内存中的缓冲区可以直接共享给语料而不复制。
pub trait ImageSource: Send + Sync {
    fn load_pixels(&self, shape: &CorpusShape) -> Result<Arc<[f32]>, DataError>;
}

/// 标签源：产出 `N * C` 个 one-hot 字节
///
/// 长度由加载器统一校验，这里只负责获取。
pub trait LabelSource: Send + Sync {
    fn load_labels(&self, shape: &CorpusShape) -> Result<Arc<[u8]>, DataError>;
}

/// PNG 精灵图图像源
#[derive(Debug, Clone)]
pub struct SpriteSheetSource {
    locator: Locator,
}

impl SpriteSheetSource {
    pub fn new(locator: Locator) -> Self {
        Self { locator }
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }
}

impl ImageSource for SpriteSheetSource {
    fn load_pixels(&self, shape: &CorpusShape) -> Result<Arc<[f32]>, DataError> {
        let bytes = self
            .locator
            .fetch()
            .map_err(|e| DataError::ImageDecodeFailed(e.to_string()))?;
        Ok(decode_sprite_sheet(&bytes, shape)?.into())
    }
}

/// 将 PNG 精灵图字节解码为归一化像素缓冲区
pub fn decode_sprite_sheet(bytes: &[u8], shape: &CorpusShape) -> Result<Vec<f32>, DataError> {
    let sheet = image::load_from_memory(bytes)
        .map_err(|e| DataError::ImageDecodeFailed(format!("精灵图解码失败: {e}")))?
        .into_rgba8();

    let (width, height) = sheet.dimensions();
    let total = width as usize * height as usize;
    let expected = shape.total_pixels()?;
    if total != expected {
        return Err(DataError::ImageDecodeFailed(format!(
            "精灵图尺寸 {width}x{height} 共 {total} 个像素，期望 {} 张 {} 像素的图像（{expected} 个像素）",
            shape.num_elements,
            shape.image_size()
        )));
    }

    Ok(sheet.pixels().map(|p| p.0[0] as f32 / 255.0).collect())
}

/// 原始字节的标签源
#[derive(Debug, Clone)]
pub struct LabelBlobSource {
    locator: Locator,
}

impl LabelBlobSource {
    pub fn new(locator: Locator) -> Self {
        Self { locator }
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }
}

impl LabelSource for LabelBlobSource {
    fn load_labels(&self, _shape: &CorpusShape) -> Result<Arc<[u8]>, DataError> {
        match &self.locator {
            Locator::Memory(bytes) => Ok(Arc::clone(bytes)),
            locator => locator
                .fetch()
                .map(Arc::from)
                .map_err(|e| DataError::LabelFetchFailed(e.to_string())),
        }
    }
}

/// 已解码好的像素缓冲区
///
/// 每次加载只增加引用计数，不复制像素。
#[derive(Debug, Clone)]
pub struct PixelBuffer(pub Arc<[f32]>);

impl PixelBuffer {
    pub fn new(pixels: impl Into<Arc<[f32]>>) -> Self {
        Self(pixels.into())
    }
}

impl ImageSource for PixelBuffer {
    fn load_pixels(&self, _shape: &CorpusShape) -> Result<Arc<[f32]>, DataError> {
        Ok(Arc::clone(&self.0))
    }
}

/// 已在内存中的标签缓冲区
#[derive(Debug, Clone)]
pub struct LabelBuffer(pub Arc<[u8]>);

impl LabelBuffer {
    pub fn new(labels: impl Into<Arc<[u8]>>) -> Self {
        Self(labels.into())
    }
}

impl LabelSource for LabelBuffer {
    fn load_labels(&self, _shape: &CorpusShape) -> Result<Arc<[u8]>, DataError> {
        Ok(Arc::clone(&self.0))
    }
}

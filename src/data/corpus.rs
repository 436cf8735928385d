//! 原始语料：扁平像素缓冲区 + 扁平 one-hot 标签缓冲区
//!
//! 第 i 个样本的图像为 `pixels[i*S .. i*S+S)`，标签为 `labels[i*C .. i*C+C)`。
//! 加载后不再修改，由训练、测试两个采样器通过 `Arc` 共享只读。

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data::error::DataError;
use crate::data::view::FlatBufferView;

/// 图像宽度
pub const IMAGE_WIDTH: usize = 28;
/// 图像高度
pub const IMAGE_HEIGHT: usize = 28;
/// 单张图像的像素数 S
pub const IMAGE_SIZE: usize = IMAGE_WIDTH * IMAGE_HEIGHT;
/// 类别数 C
pub const NUM_CLASSES: usize = 10;
/// 语料中的样本总数 N
pub const NUM_ELEMENTS: usize = 65000;

/// 语料的尺寸参数
///
/// 默认即 MNIST 精灵图的固定常量；测试中可用更小的尺寸。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusShape {
    pub width: usize,
    pub height: usize,
    pub num_classes: usize,
    pub num_elements: usize,
}

impl CorpusShape {
    pub const MNIST: CorpusShape = CorpusShape {
        width: IMAGE_WIDTH,
        height: IMAGE_HEIGHT,
        num_classes: NUM_CLASSES,
        num_elements: NUM_ELEMENTS,
    };

    pub fn new(width: usize, height: usize, num_classes: usize, num_elements: usize) -> Self {
        Self {
            width,
            height,
            num_classes,
            num_elements,
        }
    }

    /// 单张图像的像素数 S = W·H
    ///
    /// 只在 [`validate`](Self::validate) 通过后调用。
    pub fn image_size(&self) -> usize {
        self.width * self.height
    }

    /// 检查 S、N·S、N·C 都不溢出
    ///
    /// 尺寸可能来自用户的 JSON 配置，使用前必须先校验。
    pub fn validate(&self) -> Result<(), DataError> {
        let overflow = |what: &str| {
            DataError::ConfigError(format!(
                "语料尺寸溢出: {what}（宽 {}，高 {}，类别 {}，样本 {}）",
                self.width, self.height, self.num_classes, self.num_elements
            ))
        };
        let image_size = self
            .width
            .checked_mul(self.height)
            .ok_or_else(|| overflow("图像像素数"))?;
        self.num_elements
            .checked_mul(image_size)
            .ok_or_else(|| overflow("像素总数"))?;
        self.num_elements
            .checked_mul(self.num_classes)
            .ok_or_else(|| overflow("标签总数"))?;
        Ok(())
    }

    /// 像素总数 N·S
    pub fn total_pixels(&self) -> Result<usize, DataError> {
        self.validate()?;
        Ok(self.num_elements * self.image_size())
    }
}

impl Default for CorpusShape {
    fn default() -> Self {
        Self::MNIST
    }
}

/// 校验后的原始语料
///
/// 两个缓冲区以 `Arc<[_]>` 持有，与数据源之间共享而不复制。
#[derive(Debug, Clone)]
pub struct RawCorpus {
    shape: CorpusShape,
    pixels: Arc<[f32]>,
    labels: Arc<[u8]>,
}

impl RawCorpus {
    /// 校验两个缓冲区的长度后构造语料
    ///
    /// 任一缓冲区长度不能被其步长整除，或由长度推出的样本数不等于 N 时，
    /// 返回 [`DataError::CorpusLengthMismatch`]。
    /// 尺寸本身溢出时返回 [`DataError::ConfigError`]。
    pub fn new(
        shape: CorpusShape,
        pixels: impl Into<Arc<[f32]>>,
        labels: impl Into<Arc<[u8]>>,
    ) -> Result<Self, DataError> {
        let pixels = pixels.into();
        let labels = labels.into();
        shape.validate()?;
        check_length("pixels", pixels.len(), shape.image_size(), shape.num_elements)?;
        check_length("labels", labels.len(), shape.num_classes, shape.num_elements)?;
        Ok(Self {
            shape,
            pixels,
            labels,
        })
    }

    pub fn shape(&self) -> CorpusShape {
        self.shape
    }

    /// 样本总数 N
    pub fn len(&self) -> usize {
        self.shape.num_elements
    }

    pub fn is_empty(&self) -> bool {
        self.shape.num_elements == 0
    }

    /// 图像缓冲区视图，步长 S
    pub fn images(&self) -> FlatBufferView<'_, f32> {
        FlatBufferView::new(&self.pixels[..], self.shape.image_size())
    }

    /// 标签缓冲区视图，步长 C
    pub fn labels(&self) -> FlatBufferView<'_, u8> {
        FlatBufferView::new(&self.labels[..], self.shape.num_classes)
    }

    /// 底层像素缓冲区
    pub fn pixel_buffer(&self) -> &Arc<[f32]> {
        &self.pixels
    }

    /// 底层标签缓冲区
    pub fn label_buffer(&self) -> &Arc<[u8]> {
        &self.labels
    }

    /// 第 `index` 个样本的图像
    pub fn image(&self, index: usize) -> Result<&[f32], DataError> {
        self.images().get(index)
    }

    /// 第 `index` 个样本的 one-hot 标签
    pub fn label(&self, index: usize) -> Result<&[u8], DataError> {
        self.labels().get(index)
    }
}

fn check_length(
    buffer: &'static str,
    len: usize,
    stride: usize,
    expected: usize,
) -> Result<(), DataError> {
    let mismatch = DataError::CorpusLengthMismatch {
        buffer,
        len,
        stride,
        expected,
    };
    if stride == 0 {
        // 步长为 0 时只接受空缓冲区且 N 为 0
        return if len == 0 && expected == 0 {
            Ok(())
        } else {
            Err(mismatch)
        };
    }
    if len % stride != 0 || len / stride != expected {
        return Err(mismatch);
    }
    Ok(())
}

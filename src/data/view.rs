//! 扁平缓冲区的定步长只读视图
//!
//! 图像缓冲区按 S（每张图的像素数）切片，标签缓冲区按 C（类别数）切片，
//! 两者各用各的步长，不允许交叉引用。

use crate::data::error::DataError;

/// 从扁平缓冲区中取出第 `index` 条记录（长度为 `stride` 的连续切片）
///
/// 当 `(index + 1) * stride > buffer.len()` 时返回 [`DataError::OutOfRange`]。
pub fn extract<T>(buffer: &[T], index: usize, stride: usize) -> Result<&[T], DataError> {
    let out_of_range = || DataError::OutOfRange {
        index,
        stride,
        len: buffer.len(),
    };
    let start = index.checked_mul(stride).ok_or_else(out_of_range)?;
    let end = start.checked_add(stride).ok_or_else(out_of_range)?;
    if end > buffer.len() {
        return Err(out_of_range());
    }
    Ok(&buffer[start..end])
}

/// 不持有数据的定步长视图
///
/// # 示例
/// ```ignore
/// let view = FlatBufferView::new(&pixels, IMAGE_SIZE);
/// let first_image = view.get(0)?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FlatBufferView<'a, T> {
    buffer: &'a [T],
    stride: usize,
}

impl<'a, T> FlatBufferView<'a, T> {
    pub fn new(buffer: &'a [T], stride: usize) -> Self {
        Self { buffer, stride }
    }

    /// 第 `index` 条记录
    pub fn get(&self, index: usize) -> Result<&'a [T], DataError> {
        extract(self.buffer, index, self.stride)
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// 缓冲区中完整记录的条数
    pub fn len(&self) -> usize {
        if self.stride == 0 {
            0
        } else {
            self.buffer.len() / self.stride
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 底层缓冲区
    pub fn as_slice(&self) -> &'a [T] {
        self.buffer
    }
}

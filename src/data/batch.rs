//! 批次：按 batch 优先排布的连续图像与标签缓冲区

use ndarray::{ArrayView2, ShapeError};

use crate::data::error::DataError;

/// 一个批次
///
/// - `inputs`: `batch_size * image_size` 个浮点数，第 i 个样本占 `[i*S, i*S+S)`
/// - `labels`: `batch_size * num_classes` 个字节，第 i 个样本占 `[i*C, i*C+C)`
///
/// 每次采样都新分配，返回后归调用方独占。
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    inputs: Vec<f32>,
    labels: Vec<u8>,
    batch_size: usize,
    image_size: usize,
    num_classes: usize,
}

impl Batch {
    /// 预先分配 `batch_size` 个样本的缓冲区
    ///
    /// 缓冲区字节数超过 `isize::MAX` 时返回 [`DataError::BatchTooLarge`]。
    pub(crate) fn with_capacity(
        batch_size: usize,
        image_size: usize,
        num_classes: usize,
    ) -> Result<Self, DataError> {
        let too_large = || DataError::BatchTooLarge { batch_size };
        let inputs_len = checked_buffer_len::<f32>(batch_size, image_size).ok_or_else(too_large)?;
        let labels_len = checked_buffer_len::<u8>(batch_size, num_classes).ok_or_else(too_large)?;
        Ok(Self {
            inputs: Vec::with_capacity(inputs_len),
            labels: Vec::with_capacity(labels_len),
            batch_size: 0,
            image_size,
            num_classes,
        })
    }

    /// 追加一个样本（图像和标签须分别来自各自的缓冲区）
    pub(crate) fn push(&mut self, image: &[f32], label: &[u8]) {
        debug_assert_eq!(image.len(), self.image_size);
        debug_assert_eq!(label.len(), self.num_classes);
        self.inputs.extend_from_slice(image);
        self.labels.extend_from_slice(label);
        self.batch_size += 1;
    }

    /// 批次中的样本数
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn image_size(&self) -> usize {
        self.image_size
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// 输入的形状 `(batch_size, S)`
    pub fn inputs_shape(&self) -> [usize; 2] {
        [self.batch_size, self.image_size]
    }

    /// 标签的形状 `(batch_size, C)`
    pub fn labels_shape(&self) -> [usize; 2] {
        [self.batch_size, self.num_classes]
    }

    pub fn inputs(&self) -> &[f32] {
        &self.inputs
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    /// 第 i 个样本的图像
    pub fn image(&self, i: usize) -> Option<&[f32]> {
        self.inputs
            .get(i * self.image_size..(i + 1) * self.image_size)
    }

    /// 第 i 个样本的标签
    pub fn label(&self, i: usize) -> Option<&[u8]> {
        self.labels
            .get(i * self.num_classes..(i + 1) * self.num_classes)
    }

    /// 以 `(batch_size, S)` 的二维数组视图给下游数值库使用
    pub fn inputs_array(&self) -> Result<ArrayView2<'_, f32>, ShapeError> {
        ArrayView2::from_shape((self.batch_size, self.image_size), &self.inputs)
    }

    /// 以 `(batch_size, C)` 的二维数组视图给下游数值库使用
    pub fn labels_array(&self) -> Result<ArrayView2<'_, u8>, ShapeError> {
        ArrayView2::from_shape((self.batch_size, self.num_classes), &self.labels)
    }

    /// 每个 one-hot 标签中最大值所在的类别
    ///
    /// 全零行返回 `None`；若有多个最大值取第一个。
    pub fn class_indices(&self) -> Vec<Option<usize>> {
        if self.num_classes == 0 {
            return vec![None; self.batch_size];
        }
        self.labels
            .chunks(self.num_classes)
            .map(|row| {
                let (class, &value) = row
                    .iter()
                    .enumerate()
                    .fold((0, &row[0]), |best, cur| if cur.1 > best.1 { cur } else { best });
                (value > 0).then_some(class)
            })
            .collect()
    }

    /// 拆出 (inputs, labels) 两个缓冲区
    pub fn into_parts(self) -> (Vec<f32>, Vec<u8>) {
        (self.inputs, self.labels)
    }
}

/// `rows * cols` 个 `T` 的元素数，字节数须不超过 `isize::MAX`
fn checked_buffer_len<T>(rows: usize, cols: usize) -> Option<usize> {
    let len = rows.checked_mul(cols)?;
    let bytes = len.checked_mul(std::mem::size_of::<T>())?;
    (bytes <= isize::MAX as usize).then_some(len)
}

/*
 * @Description  : BatchSampler - 在打乱后的子集上循环采样固定大小的批次
 *
 * - 游标从位置 0 之前开始，第一次前进后指向 permutation[0]
 * - 每个样本前进一次，到末尾后回绕
 * - 批次大小小于 1 时按 1 处理
 */

use std::sync::Arc;

use crate::data::batch::Batch;
use crate::data::corpus::RawCorpus;
use crate::data::error::DataError;
use crate::data::split::Subset;

/// 批次数据源（训练循环只依赖这个接口）
pub trait BatchSource {
    /// 取下一个批次，返回恰好 `max(batch_size, 1)` 个样本
    fn next_batch(&mut self, batch_size: usize) -> Result<Batch, DataError>;

    /// 数据源中不同样本的个数
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 长度为 `len` 的排列上的回绕游标
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    len: usize,
    position: Option<usize>,
}

impl Cursor {
    /// 新游标位于位置 0 之前
    pub fn new(len: usize) -> Self {
        Self {
            len,
            position: None,
        }
    }

    /// 前进一步并返回新位置；`len == 0` 时返回 `None`
    pub fn advance(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let next = match self.position {
            None => 0,
            Some(p) => (p + 1) % self.len,
        };
        self.position = Some(next);
        Some(next)
    }

    /// 当前位置；尚未前进过则为 `None`
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// 子集上的批次采样器
///
/// 独占自己的排列和游标；语料通过 `Arc` 与另一个子集的采样器共享只读。
#[derive(Debug, Clone)]
pub struct BatchSampler {
    corpus: Arc<RawCorpus>,
    subset: Subset,
    permutation: Vec<usize>,
    cursor: Cursor,
}

impl BatchSampler {
    /// 创建采样器
    ///
    /// # 参数
    /// - `corpus`: 共享的原始语料
    /// - `subset`: 子集在语料中的索引
    /// - `permutation`: `[0, subset.len())` 的一个排列
    ///
    /// 排列长度与子集大小不一致时返回 [`DataError::PermutationMismatch`]。
    pub fn new(
        corpus: Arc<RawCorpus>,
        subset: Subset,
        permutation: Vec<usize>,
    ) -> Result<Self, DataError> {
        if permutation.len() != subset.len() {
            return Err(DataError::PermutationMismatch {
                permutation: permutation.len(),
                subset: subset.len(),
            });
        }
        let cursor = Cursor::new(permutation.len());
        Ok(Self {
            corpus,
            subset,
            permutation,
            cursor,
        })
    }

    /// 按子集原顺序采样（不打乱）
    pub fn sequential(corpus: Arc<RawCorpus>, subset: Subset) -> Self {
        let permutation = (0..subset.len()).collect();
        let cursor = Cursor::new(subset.len());
        Self {
            corpus,
            subset,
            permutation,
            cursor,
        }
    }

    /// 前进游标，返回下一个样本在语料中的原始索引
    fn next_index(&mut self) -> Result<usize, DataError> {
        let position = self.cursor.advance().ok_or(DataError::EmptyDataset)?;
        let mapped = self.permutation[position];
        self.subset.get(mapped).ok_or(DataError::OutOfRange {
            index: mapped,
            stride: 1,
            len: self.subset.len(),
        })
    }

    /// 取下一个批次
    ///
    /// 游标恰好前进 `batch_size` 步（小于 1 时按 1）。子集比批次小时会回绕，
    /// 同一样本可能在批次内重复出现。
    pub fn next_batch(&mut self, batch_size: usize) -> Result<Batch, DataError> {
        if self.permutation.is_empty() {
            return Err(DataError::EmptyDataset);
        }
        let batch_size = batch_size.max(1);
        let shape = self.corpus.shape();
        let mut batch = Batch::with_capacity(batch_size, shape.image_size(), shape.num_classes)?;

        for _ in 0..batch_size {
            let index = self.next_index()?;
            batch.push(self.corpus.image(index)?, self.corpus.label(index)?);
        }

        log::trace!("采样批次: {batch_size} 个样本，游标位于 {:?}", self.cursor.position());
        Ok(batch)
    }

    /// 接下来 `count` 个将被访问的原始索引（不移动游标）
    pub fn peek_indices(&self, count: usize) -> Vec<usize> {
        let mut cursor = self.cursor.clone();
        (0..count)
            .map_while(|_| cursor.advance())
            .filter_map(|position| self.subset.get(self.permutation[position]))
            .collect()
    }

    pub fn corpus(&self) -> &Arc<RawCorpus> {
        &self.corpus
    }

    pub fn subset(&self) -> &Subset {
        &self.subset
    }

    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// 子集大小
    pub fn len(&self) -> usize {
        self.permutation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permutation.is_empty()
    }
}

impl BatchSource for BatchSampler {
    fn next_batch(&mut self, batch_size: usize) -> Result<Batch, DataError> {
        BatchSampler::next_batch(self, batch_size)
    }

    fn len(&self) -> usize {
        BatchSampler::len(self)
    }
}

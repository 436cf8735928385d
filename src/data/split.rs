//! 训练/测试集切分
//!
//! 比例 r 先裁剪到 [`SplitBounds`]（默认 [0.1, 0.9]），再按
//! `train = floor(N * r)`、`test = N - train` 计算两个子集的大小。
//! 无论采用哪种 [`PartitionStrategy`]，两个子集都互不相交、并集恰为 [0, N)，
//! 且大小与计算结果严格一致。

use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::data::error::DataError;

/// 默认切分比例
pub const DEFAULT_RATIO: f64 = 0.8;

/// 比例的裁剪范围
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitBounds {
    pub min: f64,
    pub max: f64,
}

impl SplitBounds {
    /// 创建裁剪范围，须满足 `0 <= min <= max <= 1`
    pub fn new(min: f64, max: f64) -> Result<Self, DataError> {
        let bounds = Self { min, max };
        bounds.validate()?;
        Ok(bounds)
    }

    /// 不裁剪（[0, 1]），允许出现空子集
    pub fn full() -> Self {
        Self { min: 0.0, max: 1.0 }
    }

    pub fn validate(&self) -> Result<(), DataError> {
        // NaN 在任何比较下都为 false，这里一并拒绝
        if !(0.0 <= self.min && self.min <= self.max && self.max <= 1.0) {
            return Err(DataError::InvalidBounds {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// 将比例裁剪到范围内
    pub fn clamp(&self, ratio: f64) -> Result<f64, DataError> {
        if ratio.is_nan() {
            return Err(DataError::InvalidRatio(ratio));
        }
        self.validate()?;
        let clamped = ratio.clamp(self.min, self.max);
        if clamped != ratio {
            log::warn!(
                "切分比例 {ratio} 超出范围 [{}, {}]，已裁剪为 {clamped}",
                self.min,
                self.max
            );
        }
        Ok(clamped)
    }
}

impl Default for SplitBounds {
    fn default() -> Self {
        Self { min: 0.1, max: 0.9 }
    }
}

/// 切分结果的计数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    pub train_count: usize,
    pub test_count: usize,
}

impl Split {
    /// 按裁剪后的比例计算两个子集的大小（向下取整）
    pub fn compute(n: usize, ratio: f64, bounds: &SplitBounds) -> Result<Self, DataError> {
        Ok(Self::from_clamped(n, bounds.clamp(ratio)?))
    }

    fn from_clamped(n: usize, ratio: f64) -> Self {
        let train_count = ((n as f64 * ratio).floor() as usize).min(n);
        Self {
            train_count,
            test_count: n - train_count,
        }
    }

    pub fn total(&self) -> usize {
        self.train_count + self.test_count
    }
}

/// 子集：对原始语料的一组索引
///
/// 只用于寻址，从不复制语料本身。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subset {
    /// 连续区间 `[start, end)`
    Range(Range<usize>),
    /// 显式的索引列表（随机分配时使用）
    Indices(Vec<usize>),
}

impl Subset {
    pub fn len(&self) -> usize {
        match self {
            Subset::Range(range) => range.len(),
            Subset::Indices(indices) => indices.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 子集中第 `position` 个元素对应的原始索引
    pub fn get(&self, position: usize) -> Option<usize> {
        match self {
            Subset::Range(range) => (position < range.len()).then(|| range.start + position),
            Subset::Indices(indices) => indices.get(position).copied(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter_map(move |position| self.get(position))
    }
}

/// 索引分配方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionStrategy {
    /// `[0, train)` 归训练集，`[train, N)` 归测试集
    #[default]
    Contiguous,
    /// 逐个元素按比例抛硬币，一侧所需数量等于剩余元素数时，剩余元素全部归该侧
    Randomized,
}

/// 切分器
#[derive(Debug, Clone, Default)]
pub struct Partitioner {
    bounds: SplitBounds,
    strategy: PartitionStrategy,
}

impl Partitioner {
    pub fn new(bounds: SplitBounds) -> Self {
        Self {
            bounds,
            strategy: PartitionStrategy::default(),
        }
    }

    /// 设置索引分配方式
    pub fn strategy(mut self, strategy: PartitionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn bounds(&self) -> &SplitBounds {
        &self.bounds
    }

    /// 只计算两个子集的大小
    pub fn split(&self, n: usize, ratio: f64) -> Result<Split, DataError> {
        Split::compute(n, ratio, &self.bounds)
    }

    /// 将 [0, n) 切分为 (训练集, 测试集)
    ///
    /// `rng` 只在 [`PartitionStrategy::Randomized`] 下使用。
    pub fn partition<R: Rng + ?Sized>(
        &self,
        n: usize,
        ratio: f64,
        rng: &mut R,
    ) -> Result<(Subset, Subset), DataError> {
        let ratio = self.bounds.clamp(ratio)?;
        let split = Split::from_clamped(n, ratio);
        let subsets = match self.strategy {
            PartitionStrategy::Contiguous => (
                Subset::Range(0..split.train_count),
                Subset::Range(split.train_count..n),
            ),
            PartitionStrategy::Randomized => randomized_assignment(n, ratio, split, rng),
        };
        log::debug!(
            "切分 {n} 个样本: 训练集 {}，测试集 {}",
            subsets.0.len(),
            subsets.1.len()
        );
        Ok(subsets)
    }
}

/// 逐个元素随机分配，且保证最终数量与 `split` 严格一致
fn randomized_assignment<R: Rng + ?Sized>(
    n: usize,
    ratio: f64,
    split: Split,
    rng: &mut R,
) -> (Subset, Subset) {
    let mut train = Vec::with_capacity(split.train_count);
    let mut test = Vec::with_capacity(split.test_count);

    for index in 0..n {
        let remaining = n - index;
        let train_needed = split.train_count - train.len();
        let test_needed = split.test_count - test.len();

        let to_train = if remaining <= train_needed {
            // 剩余元素恰好够填满训练集
            true
        } else if remaining <= test_needed {
            false
        } else {
            rng.gen_bool(ratio)
        };

        if to_train {
            train.push(index);
        } else {
            test.push(index);
        }
    }

    (Subset::Indices(train), Subset::Indices(test))
}

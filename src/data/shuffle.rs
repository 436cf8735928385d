//! 索引打乱：生成 [0, M) 的均匀随机排列

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// 用给定随机源生成 [0, m) 的一个排列（Fisher–Yates，O(m)）
pub fn permutation_with<R: Rng + ?Sized>(m: usize, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..m).collect();
    indices.shuffle(rng);
    indices
}

/// 持有随机源的索引打乱器
///
/// # 示例
/// ```ignore
/// let mut shuffler = IndexShuffler::new().seed(42);
/// let perm = shuffler.permutation(52000);
/// ```
#[derive(Debug, Clone)]
pub struct IndexShuffler {
    rng: StdRng,
}

impl IndexShuffler {
    /// 以系统熵初始化
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// 设置随机种子（得到可复现的排列序列）
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// 生成 [0, m) 的一个排列
    pub fn permutation(&mut self, m: usize) -> Vec<usize> {
        permutation_with(m, &mut self.rng)
    }

    /// 内部随机源，供切分器等共享同一随机序列
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl Default for IndexShuffler {
    fn default() -> Self {
        Self::new()
    }
}

//! IndexShuffler 单元测试

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::data::{IndexShuffler, permutation_with};

fn assert_is_permutation(perm: &[usize], m: usize) {
    assert_eq!(perm.len(), m);
    let mut seen = vec![false; m];
    for &v in perm {
        assert!(v < m, "{v} 超出 [0, {m})");
        assert!(!seen[v], "{v} 重复出现");
        seen[v] = true;
    }
}

#[test]
fn test_permutation_is_bijection() {
    let mut shuffler = IndexShuffler::new();
    for m in [0, 1, 2, 10, 257, 5000] {
        assert_is_permutation(&shuffler.permutation(m), m);
    }
}

#[test]
fn test_permutation_with_injected_rng() {
    let mut rng = StdRng::seed_from_u64(1);
    let perm = permutation_with(100, &mut rng);
    assert_is_permutation(&perm, 100);

    // 同一种子得到同一排列
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(permutation_with(100, &mut rng), perm);
}

#[test]
fn test_seeded_shuffler_is_reproducible() {
    let mut a = IndexShuffler::new().seed(42);
    let mut b = IndexShuffler::new().seed(42);
    assert_eq!(a.permutation(64), b.permutation(64));
    assert_eq!(a.permutation(8), b.permutation(8));
}

#[test]
fn test_permutation_actually_reorders() {
    let mut shuffler = IndexShuffler::new().seed(2024);
    let identity: Vec<usize> = (0..1000).collect();
    // 1000! 种排列中恰为恒等排列的概率可以忽略
    assert_ne!(shuffler.permutation(1000), identity);
}

#[test]
fn test_every_position_reachable() {
    // 粗略检验均匀性：小规模下每个值都应出现在首位
    let mut shuffler = IndexShuffler::new().seed(9);
    let mut first_seen = [0usize; 4];
    for _ in 0..400 {
        first_seen[shuffler.permutation(4)[0]] += 1;
    }
    assert!(first_seen.iter().all(|&c| c > 50), "{first_seen:?}");
}

//! Batch 单元测试

use std::sync::Arc;

use super::tiny_corpus;
use crate::data::{BatchSampler, Subset};

#[test]
fn test_batch_ndarray_views() {
    let mut sampler = BatchSampler::sequential(Arc::new(tiny_corpus()), Subset::Range(0..10));
    let batch = sampler.next_batch(3).unwrap();

    let inputs = batch.inputs_array().unwrap();
    assert_eq!(inputs.shape(), &[3, 4]);
    assert_eq!(inputs[[1, 2]], 6.0);
    assert_eq!(inputs.row(2).to_vec(), vec![8.0, 9.0, 10.0, 11.0]);

    let labels = batch.labels_array().unwrap();
    assert_eq!(labels.shape(), &[3, 2]);
    assert_eq!(labels.row(1).to_vec(), vec![0, 1]);
}

#[test]
fn test_batch_accessors() {
    let mut sampler = BatchSampler::sequential(Arc::new(tiny_corpus()), Subset::Range(0..10));
    let batch = sampler.next_batch(2).unwrap();

    assert_eq!(batch.image_size(), 4);
    assert_eq!(batch.num_classes(), 2);
    assert_eq!(batch.image(1).unwrap(), &[4.0, 5.0, 6.0, 7.0]);
    assert!(batch.image(2).is_none());
    assert!(batch.label(2).is_none());
    assert_eq!(batch.class_indices(), vec![Some(0), Some(1)]);

    let (inputs, labels) = batch.into_parts();
    assert_eq!(inputs.len(), 8);
    assert_eq!(labels, vec![1, 0, 0, 1]);
}

#[test]
fn test_batches_are_independent_copies() {
    let corpus = Arc::new(tiny_corpus());
    let mut sampler = BatchSampler::sequential(Arc::clone(&corpus), Subset::Range(0..10));
    let first = sampler.next_batch(1).unwrap();

    let (mut inputs, _) = first.clone().into_parts();
    inputs[0] = -1.0;

    // 修改返回的缓冲区不影响共享语料
    assert_eq!(corpus.image(0).unwrap()[0], 0.0);
    assert_eq!(first.inputs()[0], 0.0);
}

#[test]
fn test_class_indices_all_zero_row() {
    use crate::data::{CorpusShape, RawCorpus};

    let shape = CorpusShape::new(1, 1, 3, 2);
    let corpus = RawCorpus::new(shape, vec![0.0f32, 1.0], vec![0u8, 0, 0, 0, 0, 1]).unwrap();
    let mut sampler = BatchSampler::sequential(Arc::new(corpus), Subset::Range(0..2));
    let batch = sampler.next_batch(2).unwrap();
    assert_eq!(batch.class_indices(), vec![None, Some(2)]);
}

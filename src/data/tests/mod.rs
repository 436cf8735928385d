mod batch;
mod shuffle;

use crate::data::{CorpusShape, RawCorpus};

/// 10 个样本，2x2 图像，2 个类别
pub(super) fn tiny_shape() -> CorpusShape {
    CorpusShape::new(2, 2, 2, 10)
}

/// 像素值为其在扁平缓冲区中的下标，即第 i 张图像为 [4i, 4i+1, 4i+2, 4i+3]；
/// 偶数样本属于类别 0，奇数样本属于类别 1
pub(super) fn tiny_buffers(shape: CorpusShape) -> (Vec<f32>, Vec<u8>) {
    let pixels = (0..shape.num_elements * shape.image_size())
        .map(|v| v as f32)
        .collect();
    let labels = (0..shape.num_elements)
        .flat_map(|i| {
            let mut row = vec![0u8; shape.num_classes];
            row[i % shape.num_classes] = 1;
            row
        })
        .collect();
    (pixels, labels)
}

pub(super) fn tiny_corpus() -> RawCorpus {
    let shape = tiny_shape();
    let (pixels, labels) = tiny_buffers(shape);
    RawCorpus::new(shape, pixels, labels).expect("构造测试语料失败")
}

/// 由 tiny 语料中的图像反推样本索引
pub(super) fn index_of_image(image: &[f32]) -> usize {
    image[0] as usize / image.len()
}

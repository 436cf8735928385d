//! 数据加载模块
//!
//! 从精灵图 + one-hot 标签两个扁平二进制块加载语料，按比例切分为训练/测试集，
//! 并在各自子集上循环产出固定大小的随机批次。
//!
//! # 主要组件
//!
//! - [`FlatBufferView`]: 定步长只读视图
//! - [`RawCorpus`]: 校验后的共享语料
//! - [`Partitioner`]: 训练/测试切分
//! - [`IndexShuffler`]: 索引打乱
//! - [`BatchSampler`]: 回绕式批次采样器
//! - [`DatasetLoader`]: 组合以上组件的加载器
//! - [`DataError`]: 数据加载错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use sprite_mnist::data::load_mnist;
//!
//! let mut data = load_mnist("assets", 0.8)?;
//! for _ in 0..steps {
//!     let batch = data.next_train_batch(64)?;
//!     let x = batch.inputs_array()?; // (64, 784)
//!     let y = batch.labels_array()?; // (64, 10)
//! }
//! ```

mod batch;
pub mod corpus;
pub mod error;
pub mod fetch;
mod loader;
mod sampler;
pub mod shuffle;
pub mod sources;
pub mod split;
pub mod view;

#[cfg(test)]
mod tests;

// Re-exports
pub use batch::Batch;
pub use corpus::{
    CorpusShape, IMAGE_HEIGHT, IMAGE_SIZE, IMAGE_WIDTH, NUM_CLASSES, NUM_ELEMENTS, RawCorpus,
};
pub use error::DataError;
pub use fetch::Locator;
pub use loader::{
    DatasetLoader, Datasets, LoaderConfig, MNIST_INPUTS_FILE, MNIST_LABELS_FILE, load_mnist,
};
pub use sampler::{BatchSampler, BatchSource, Cursor};
pub use shuffle::{IndexShuffler, permutation_with};
pub use sources::{
    ImageSource, LabelBlobSource, LabelBuffer, LabelSource, PixelBuffer, SpriteSheetSource,
    decode_sprite_sheet,
};
pub use split::{DEFAULT_RATIO, PartitionStrategy, Partitioner, Split, SplitBounds, Subset};
pub use view::{FlatBufferView, extract};

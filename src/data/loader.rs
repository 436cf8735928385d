/*
 * @Description  : DatasetLoader - 组合数据源、切分器和打乱器，产出训练/测试两个采样器
 *
 * 流程：
 * 1. 并发获取图像与标签（两个线程，全部完成后才继续）
 * 2. 按 N/S/C 校验缓冲区长度
 * 3. 切分索引空间
 * 4. 两个子集各打乱一次
 * 5. 构造两个 BatchSampler，共享同一份只读语料
 */

use std::path::Path;
use std::sync::Arc;
use std::thread;

use serde::{Deserialize, Serialize};

use crate::data::batch::Batch;
use crate::data::corpus::{CorpusShape, RawCorpus};
use crate::data::error::DataError;
use crate::data::fetch::Locator;
use crate::data::sampler::BatchSampler;
use crate::data::shuffle::IndexShuffler;
use crate::data::sources::{ImageSource, LabelBlobSource, LabelSource, SpriteSheetSource};
use crate::data::split::{DEFAULT_RATIO, PartitionStrategy, Partitioner, SplitBounds};

/// MNIST 精灵图文件名
pub const MNIST_INPUTS_FILE: &str = "mnist.inputs.png";
/// MNIST 标签文件名
pub const MNIST_LABELS_FILE: &str = "mnist.labels.bin";

/// 加载配置
///
/// 可从 JSON 读取，缺省字段取默认值：
/// ```json
/// { "ratio": 0.75, "strategy": "randomized", "seed": 42 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// 训练集所占比例（会被裁剪到 `bounds`）
    pub ratio: f64,
    /// 比例的裁剪范围
    pub bounds: SplitBounds,
    /// 索引分配方式
    pub strategy: PartitionStrategy,
    /// 随机种子；设置后切分和打乱都可复现
    pub seed: Option<u64>,
    /// 语料尺寸
    pub shape: CorpusShape,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            ratio: DEFAULT_RATIO,
            bounds: SplitBounds::default(),
            strategy: PartitionStrategy::default(),
            seed: None,
            shape: CorpusShape::MNIST,
        }
    }
}

impl LoaderConfig {
    /// 从 JSON 字符串解析
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件读取
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// 校验比例范围与语料尺寸
    pub fn validate(&self) -> Result<(), DataError> {
        self.bounds.validate()?;
        self.shape.validate()
    }

    pub fn ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    pub fn bounds(mut self, bounds: SplitBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn strategy(mut self, strategy: PartitionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn shape(mut self, shape: CorpusShape) -> Self {
        self.shape = shape;
        self
    }
}

/// 加载结果：训练集和测试集两个采样器
#[derive(Debug, Clone)]
pub struct Datasets {
    pub train: BatchSampler,
    pub test: BatchSampler,
}

impl Datasets {
    /// 在已校验的语料上切分、打乱并构造采样器
    pub fn from_corpus(
        corpus: Arc<RawCorpus>,
        ratio: f64,
        config: &LoaderConfig,
    ) -> Result<Self, DataError> {
        let mut shuffler = match config.seed {
            Some(seed) => IndexShuffler::new().seed(seed),
            None => IndexShuffler::new(),
        };

        let partitioner = Partitioner::new(config.bounds).strategy(config.strategy);
        let (train_subset, test_subset) =
            partitioner.partition(corpus.len(), ratio, shuffler.rng_mut())?;

        let train_perm = shuffler.permutation(train_subset.len());
        let test_perm = shuffler.permutation(test_subset.len());

        log::info!(
            "数据集切分完成: 训练集 {} 个样本，测试集 {} 个样本",
            train_subset.len(),
            test_subset.len()
        );

        Ok(Self {
            train: BatchSampler::new(Arc::clone(&corpus), train_subset, train_perm)?,
            test: BatchSampler::new(corpus, test_subset, test_perm)?,
        })
    }

    /// 从训练集取下一个批次
    pub fn next_train_batch(&mut self, batch_size: usize) -> Result<Batch, DataError> {
        self.train.next_batch(batch_size)
    }

    /// 从测试集取下一个批次
    pub fn next_test_batch(&mut self, batch_size: usize) -> Result<Batch, DataError> {
        self.test.next_batch(batch_size)
    }

    /// 两个采样器共享的语料
    pub fn corpus(&self) -> &Arc<RawCorpus> {
        self.train.corpus()
    }
}

/// 数据集加载器
///
/// # 示例
/// ```ignore
/// let loader = DatasetLoader::new(
///     SpriteSheetSource::new(Locator::file("mnist.inputs.png")),
///     LabelBlobSource::new(Locator::file("mnist.labels.bin")),
/// )
/// .config(LoaderConfig::default().seed(42));
///
/// let mut data = loader.load(0.8)?;
/// let batch = data.next_train_batch(64)?;
/// ```
pub struct DatasetLoader {
    config: LoaderConfig,
    images: Box<dyn ImageSource>,
    labels: Box<dyn LabelSource>,
}

impl DatasetLoader {
    pub fn new(images: impl ImageSource + 'static, labels: impl LabelSource + 'static) -> Self {
        Self {
            config: LoaderConfig::default(),
            images: Box::new(images),
            labels: Box::new(labels),
        }
    }

    /// 设置加载配置
    pub fn config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn loader_config(&self) -> &LoaderConfig {
        &self.config
    }

    /// 用配置中的比例加载
    pub fn load_default(&self) -> Result<Datasets, DataError> {
        self.load(self.config.ratio)
    }

    /// 加载语料并按 `ratio` 切分
    ///
    /// 任何一步失败都不会返回部分数据集。
    pub fn load(&self, ratio: f64) -> Result<Datasets, DataError> {
        let corpus = self.fetch_corpus()?;
        Datasets::from_corpus(Arc::new(corpus), ratio, &self.config)
    }

    /// 并发获取图像与标签，并校验长度
    pub fn fetch_corpus(&self) -> Result<RawCorpus, DataError> {
        let shape = self.config.shape;
        shape.validate()?;
        log::info!(
            "开始加载语料: {} 个样本，图像 {}x{}，{} 个类别",
            shape.num_elements,
            shape.width,
            shape.height,
            shape.num_classes
        );

        let (pixels, labels) = thread::scope(|s| {
            let pixels = s.spawn(|| self.images.load_pixels(&shape));
            let labels = s.spawn(|| self.labels.load_labels(&shape));
            (pixels.join(), labels.join())
        });

        let pixels = pixels
            .map_err(|_| DataError::ImageDecodeFailed("图像加载线程异常退出".to_string()))??;
        let labels = labels
            .map_err(|_| DataError::LabelFetchFailed("标签加载线程异常退出".to_string()))??;

        log::debug!("获取到 {} 个像素，{} 个标签字节", pixels.len(), labels.len());
        RawCorpus::new(shape, pixels, labels)
    }
}

/// 从目录加载 MNIST 精灵图与标签
///
/// 目录下须有 `mnist.inputs.png` 与 `mnist.labels.bin`。
pub fn load_mnist(dir: impl AsRef<Path>, ratio: f64) -> Result<Datasets, DataError> {
    let dir = dir.as_ref();
    DatasetLoader::new(
        SpriteSheetSource::new(Locator::file(dir.join(MNIST_INPUTS_FILE))),
        LabelBlobSource::new(Locator::file(dir.join(MNIST_LABELS_FILE))),
    )
    .load(ratio)
}

/*
 * @Description  : 精灵图 MNIST 端到端集成测试
 *
 * 用 image 生成一张小精灵图（每行一张图像）和对应的 one-hot 标签块，
 * 经公开 API 加载、切分并循环采样。
 */

use std::collections::HashSet;
use std::io::Cursor;

use image::{ImageFormat, Luma, RgbaImage};
use sprite_mnist::data::{
    BatchSource, CorpusShape, DataError, DatasetLoader, LabelBlobSource, LoaderConfig, Locator,
    MNIST_INPUTS_FILE, SpriteSheetSource, load_mnist,
};

/// 3x3 图像、4 个类别、20 个样本
fn shape() -> CorpusShape {
    CorpusShape::new(3, 3, 4, 20)
}

/// 第 i 行全部像素的红色通道为 i * 10，标签为 i % 4
fn sprite_blobs(shape: CorpusShape) -> (Vec<u8>, Vec<u8>) {
    let width = shape.image_size() as u32;
    let height = shape.num_elements as u32;
    let gray = image::ImageBuffer::from_fn(width, height, |_, y| Luma([(y * 10) as u8]));
    let sheet: RgbaImage = image::DynamicImage::ImageLuma8(gray).into_rgba8();

    let mut png = Cursor::new(Vec::new());
    sheet
        .write_to(&mut png, ImageFormat::Png)
        .expect("编码精灵图失败");

    let labels = (0..shape.num_elements)
        .flat_map(|i| {
            let mut row = vec![0u8; shape.num_classes];
            row[i % shape.num_classes] = 1;
            row
        })
        .collect();
    (png.into_inner(), labels)
}

fn sample_index(image: &[f32]) -> usize {
    (image[0] * 255.0).round() as usize / 10
}

#[test]
fn test_load_and_sample_from_memory() {
    let shape = shape();
    let (png, labels) = sprite_blobs(shape);
    let loader = DatasetLoader::new(
        SpriteSheetSource::new(Locator::memory(png)),
        LabelBlobSource::new(Locator::memory(labels)),
    )
    .config(LoaderConfig::default().shape(shape).seed(5));

    let mut data = loader.load(0.75).expect("加载失败");
    assert_eq!(data.train.len(), 15);
    assert_eq!(data.test.len(), 5);

    // 一整轮训练集恰好访问每个训练样本一次
    let batch = data.next_train_batch(15).unwrap();
    assert_eq!(batch.inputs_shape(), [15, 9]);
    assert_eq!(batch.labels_shape(), [15, 4]);
    let seen: HashSet<usize> = (0..15)
        .map(|i| sample_index(batch.image(i).unwrap()))
        .collect();
    assert_eq!(seen, (0..15).collect::<HashSet<_>>());

    // 每个样本的标签与其图像来自同一原始索引
    for (i, class) in batch.class_indices().into_iter().enumerate() {
        let original = sample_index(batch.image(i).unwrap());
        assert_eq!(class, Some(original % 4));
    }

    // 测试集回绕
    let test = data.next_test_batch(12).unwrap();
    let indices: Vec<usize> = (0..12)
        .map(|i| sample_index(test.image(i).unwrap()))
        .collect();
    assert!(indices.iter().all(|&i| (15..20).contains(&i)));
    assert_eq!(indices[..5], indices[5..10]);
}

#[test]
fn test_training_loop_through_batch_source() {
    let shape = shape();
    let (png, labels) = sprite_blobs(shape);
    let data = DatasetLoader::new(
        SpriteSheetSource::new(Locator::memory(png)),
        LabelBlobSource::new(Locator::memory(labels)),
    )
    .config(LoaderConfig::default().shape(shape))
    .load(0.5)
    .unwrap();

    let mut sources: Vec<Box<dyn BatchSource>> = vec![Box::new(data.train), Box::new(data.test)];
    for source in sources.iter_mut() {
        for step in 0..7 {
            let batch = source.next_batch(step).unwrap();
            assert_eq!(batch.batch_size(), step.max(1));
            let x = batch.inputs_array().unwrap();
            assert!(x.iter().all(|&p| (0.0..=1.0).contains(&p)));
        }
    }
}

#[test]
fn test_load_mnist_from_directory() {
    let dir = std::env::temp_dir().join(format!("sprite_mnist_it_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    // MNIST 尺寸的精灵图过大，这里只验证文件缺失时的报错
    let missing = load_mnist(&dir, 0.8);
    assert!(matches!(missing, Err(DataError::ImageDecodeFailed(_))));

    // 精灵图存在但尺寸不对，标签缺失
    let (png, _) = sprite_blobs(shape());
    std::fs::write(dir.join(MNIST_INPUTS_FILE), png).unwrap();
    let result = load_mnist(&dir, 0.8);
    std::fs::remove_dir_all(&dir).ok();
    // 图像尺寸不是 65000 x 784，先于标签报错
    assert!(matches!(result, Err(DataError::ImageDecodeFailed(_))));
}

#[test]
fn test_truncated_label_blob_rejected() {
    let shape = shape();
    let (png, mut labels) = sprite_blobs(shape);
    labels.truncate(labels.len() - 1);

    let result = DatasetLoader::new(
        SpriteSheetSource::new(Locator::memory(png)),
        LabelBlobSource::new(Locator::memory(labels)),
    )
    .config(LoaderConfig::default().shape(shape))
    .load(0.8);
    assert!(matches!(
        result,
        Err(DataError::CorpusLengthMismatch {
            buffer: "labels",
            ..
        })
    ));
}

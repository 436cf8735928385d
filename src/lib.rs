//! # Sprite MNIST
//!
//! `sprite_mnist`从一张像素精灵图和一段 one-hot 标签二进制块中加载固定大小的
//! 带标签图像语料，按比例确定性地切分出训练集与测试集，
//! 并为训练循环提供固定大小、随机顺序、可无限回绕的批次。
//!

pub mod data;

use catalog_common::compression::{from_compressed_with_max_version, to_compressed};
use catalog_common::{find_duplicate_ids, CatalogBundle, CatalogError, CatalogMetadata, CatalogResult, Product};
use chrono::Utc;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::registry::FilterDimension;

/// 数据包格式版本
pub const BUNDLE_VERSION: [u8; 2] = [1, 0];

/// 从压缩数据恢复目录数据包
pub fn load_bundle(data: &[u8]) -> CatalogResult<CatalogBundle> {
    from_compressed_with_max_version(data, BUNDLE_VERSION[0])
}

/// 目录数据包构建器
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    products: Vec<Product>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加商品到构建器
    pub fn add_product(&mut self, product: Product) {
        self.products.push(product);
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// 统计某个维度上每个取值的商品数量，包含数量为 0 的取值
    pub fn facet_counts(&self, dimension: FilterDimension) -> BTreeMap<&'static str, usize> {
        let mut counts: BTreeMap<&'static str, usize> =
            dimension.labels().into_iter().map(|label| (label, 0)).collect();
        for product in &self.products {
            *counts.entry(dimension.product_label(product)).or_insert(0) += 1;
        }
        counts
    }

    /// 构建数据包：商品不能为空，ID 必须唯一
    pub fn build_bundle(&self) -> CatalogResult<CatalogBundle> {
        if self.products.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        if let Some(id) = find_duplicate_ids(&self.products) {
            return Err(CatalogError::DuplicateId(id));
        }

        tracing::info!(products = self.products.len(), "目录数据包构建完成");

        Ok(CatalogBundle {
            metadata: CatalogMetadata {
                product_count: self.products.len(),
                created_at: Utc::now(),
                version: format!("{}.{}", BUNDLE_VERSION[0], BUNDLE_VERSION[1]),
            },
            products: self.products.clone(),
        })
    }

    /// 构建并压缩数据包，返回压缩后的字节
    pub fn to_bytes(&self) -> CatalogResult<Vec<u8>> {
        let bundle = self.build_bundle()?;
        let bytes = to_compressed(&bundle, BUNDLE_VERSION)?;
        tracing::debug!(bytes = bytes.len(), "数据压缩成功");
        Ok(bytes)
    }

    /// 保存数据包到文件，返回写入的字节数
    pub fn save_bundle<P: AsRef<Path>>(&self, path: P) -> CatalogResult<usize> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        fs::write(path, &bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "目录数据包已写入文件");
        Ok(bytes.len())
    }
}

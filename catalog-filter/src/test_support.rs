//! 测试用的商品构造函数和 proptest 策略

use catalog_common::{CatalogError, CatalogResult, Product, ProductCategory, ProductColor, ProductMaterial, ProductOptions, ProductSize, ProductType};
use proptest::prelude::*;
use proptest::sample::{select, subsequence};

use crate::models::FilterSelection;
use crate::url_state::{MemoryQueryStore, QueryStore};

/// 第 `fail_on` 次写入（从 1 开始）失败的查询参数存储，其余写入正常
#[derive(Debug, Clone)]
pub struct FailingStore {
    inner: MemoryQueryStore,
    fail_on: usize,
    writes: usize,
}

impl FailingStore {
    pub fn new(inner: MemoryQueryStore, fail_on: usize) -> Self {
        Self { inner, fail_on, writes: 0 }
    }
}

impl QueryStore for FailingStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: Option<&str>) -> CatalogResult<()> {
        self.writes += 1;
        if self.writes == self.fail_on {
            return Err(CatalogError::Store(format!("写入 {} 失败", key)));
        }
        self.inner.set(key, value)
    }
}

pub fn product(
    id: u32,
    size: ProductSize,
    category: ProductCategory,
    kind: ProductType,
    color: ProductColor,
    material: ProductMaterial,
) -> Product {
    Product {
        id,
        name: format!("Product {}", id),
        size,
        color,
        material,
        kind,
        category,
        options: ProductOptions::default(),
    }
}

pub fn sized(id: u32, size: ProductSize) -> Product {
    product(
        id,
        size,
        ProductCategory::Topwear,
        ProductType::Top,
        ProductColor::Black,
        ProductMaterial::Cotton,
    )
}

/// 随机商品列表，ID 从 1 开始连续且唯一
pub fn any_products() -> impl Strategy<Value = Vec<Product>> {
    let fields = (
        select(ProductSize::ALL),
        select(ProductCategory::ALL),
        select(ProductType::ALL),
        select(ProductColor::ALL),
        select(ProductMaterial::ALL),
    );

    prop::collection::vec(fields, 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (size, category, kind, color, material))| {
                product(i as u32 + 1, size, category, kind, color, material)
            })
            .collect()
    })
}

/// 随机筛选条件，每个维度 0-2 个取值，不含排序
pub fn any_selection() -> impl Strategy<Value = FilterSelection> {
    (
        subsequence(ProductCategory::ALL, 0..3),
        subsequence(ProductType::ALL, 0..3),
        subsequence(ProductColor::ALL, 0..3),
        subsequence(ProductMaterial::ALL, 0..3),
    )
        .prop_map(|(category, kind, color, material)| FilterSelection {
            category,
            kind,
            color,
            material,
            sort_size: None,
        })
}

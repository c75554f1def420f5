use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{CatalogError, CatalogResult};
use crate::models::Product;

/// 严格解析商品 JSON 数组
pub fn parse_products(json: &str) -> CatalogResult<Vec<Product>> {
    Ok(serde_json::from_str(json)?)
}

/// 解析商品 JSON，失败时记录日志并返回空列表
pub fn load_products_from_str(json: &str) -> Vec<Product> {
    match parse_products(json) {
        Ok(products) => {
            tracing::debug!(count = products.len(), "商品数据加载完成");
            products
        }
        Err(e) => {
            tracing::error!(error = %e, "加载商品数据失败，使用空目录");
            Vec::new()
        }
    }
}

/// 从文件加载商品，读取或解析失败时返回空列表
pub fn load_products<P: AsRef<Path>>(path: P) -> Vec<Product> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(contents) => load_products_from_str(&contents),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "读取商品文件失败，使用空目录");
            Vec::new()
        }
    }
}

/// 检查商品 ID 唯一性，返回第一个重复的 ID
pub fn find_duplicate_ids(products: &[Product]) -> Option<u32> {
    let mut seen = HashSet::with_capacity(products.len());
    products.iter().map(|p| p.id).find(|id| !seen.insert(*id))
}

/// 严格加载并校验：JSON 必须合法、非空且 ID 唯一
pub fn load_products_strict<P: AsRef<Path>>(path: P) -> CatalogResult<Vec<Product>> {
    let contents = fs::read_to_string(path)?;
    let products = parse_products(&contents)?;

    if products.is_empty() {
        return Err(CatalogError::EmptyCatalog);
    }
    if let Some(id) = find_duplicate_ids(&products) {
        return Err(CatalogError::DuplicateId(id));
    }

    Ok(products)
}

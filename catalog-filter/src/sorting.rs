use std::cmp::Ordering;

use catalog_common::Product;

use crate::models::SortDirection;

/// 按尺码比较两个商品
pub fn compare_by_size(a: &Product, b: &Product, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => a.size.rank().cmp(&b.size.rank()),
        SortDirection::Desc => b.size.rank().cmp(&a.size.rank()),
    }
}

/// 按尺码排序，返回新列表，原列表不变
///
/// `slice::sort_by` 是稳定排序，尺码相同的商品保持输入顺序。
pub fn sort_products(products: &[Product], direction: SortDirection) -> Vec<Product> {
    let mut sorted = products.to_vec();
    sorted.sort_by(|a, b| compare_by_size(a, b, direction));
    sorted
}

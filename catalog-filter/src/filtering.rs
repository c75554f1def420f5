use std::borrow::Cow;

use catalog_common::Product;

use crate::models::FilterSelection;

/// 是否存在生效的筛选条件（排序不算）
pub fn has_filters(selection: &FilterSelection) -> bool {
    !selection.is_unfiltered()
}

/// 检查商品是否满足筛选条件
/// 维度之间为 AND，同一维度内为 OR；空维度不做限制
pub fn matches_filters(product: &Product, selection: &FilterSelection) -> bool {
    (selection.category.is_empty() || selection.category.contains(&product.category))
        && (selection.kind.is_empty() || selection.kind.contains(&product.kind))
        && (selection.color.is_empty() || selection.color.contains(&product.color))
        && (selection.material.is_empty() || selection.material.contains(&product.material))
}

/// 筛选商品；没有生效条件时直接借用原列表
pub fn filter_products<'a>(selection: &FilterSelection, products: &'a [Product]) -> Cow<'a, [Product]> {
    if !has_filters(selection) {
        return Cow::Borrowed(products);
    }

    Cow::Owned(
        products
            .iter()
            .filter(|product| matches_filters(product, selection))
            .cloned()
            .collect(),
    )
}

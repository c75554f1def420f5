use std::fmt;

use catalog_common::{CatalogError, CatalogResult, Product};

use crate::filtering::filter_products;
use crate::models::{FilterDefaults, FilterSelection, SortDirection};
use crate::registry::{registry, FilterDimension, FilterValue, ProductFilter};
use crate::sorting::sort_products;
use crate::url_state::{FilterParams, ParamKeys, QueryStore};

/// 先筛选再排序；没有排序方向时只筛选
pub fn process_products(selection: &FilterSelection, products: &[Product]) -> Vec<Product> {
    let filtered = filter_products(selection, products);

    match selection.sort_size {
        Some(direction) => sort_products(&filtered, direction),
        None => filtered.into_owned(),
    }
}

/// 目录变化回调：完整筛选条件和重新计算后的可见列表
pub type ChangeListener = Box<dyn FnMut(&FilterSelection, &[Product])>;

/// 商品目录 - 持有只读商品列表、查询参数同步器和当前可见列表
///
/// 每次变更先写查询参数，再重新计算可见列表，最后把完整的筛选条件和可见列表交给回调。
pub struct Catalog<S: QueryStore> {
    products: Vec<Product>,
    params: FilterParams<S>,
    visible: Vec<Product>,
    listener: Option<ChangeListener>,
}

impl<S: QueryStore + fmt::Debug> fmt::Debug for Catalog<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("products", &self.products.len())
            .field("visible", &self.visible.len())
            .field("params", &self.params)
            .finish()
    }
}

impl<S: QueryStore> Catalog<S> {
    pub fn new(products: Vec<Product>, store: S, keys: ParamKeys) -> Self {
        Self {
            visible: products.clone(),
            products,
            params: FilterParams::new(store, keys),
            listener: None,
        }
    }

    /// 设置筛选条件变化回调
    pub fn on_change(mut self, listener: impl FnMut(&FilterSelection, &[Product]) + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// 挂载：填充默认值、计算初始可见列表并通知一次
    pub fn mount(&mut self, defaults: &FilterDefaults) -> CatalogResult<&[Product]> {
        let selection = self.params.mount(defaults)?;
        tracing::debug!(products = self.products.len(), "商品目录挂载完成");
        Ok(self.apply(selection))
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn visible(&self) -> &[Product] {
        &self.visible
    }

    pub fn selection(&self) -> FilterSelection {
        self.params.selection()
    }

    pub fn params(&self) -> &FilterParams<S> {
        &self.params
    }

    /// 更新单个维度
    pub fn set_values<V: FilterValue>(&mut self, values: &[V]) -> CatalogResult<&[Product]> {
        let selection = self.params.set_values(values)?;
        Ok(self.apply(selection))
    }

    /// 按筛选键和标签更新；排序键取第一个标签作为方向
    pub fn set_filter<T: AsRef<str>>(&mut self, key: &str, labels: &[T]) -> CatalogResult<&[Product]> {
        let key: ProductFilter = key.parse()?;
        let selection = match key.dimension() {
            Some(dimension) => self.params.set_labels(dimension, labels)?,
            None => {
                let direction = labels.first().and_then(|raw| SortDirection::parse(raw.as_ref()));
                self.params.set_sort(direction)?
            }
        };
        Ok(self.apply(selection))
    }

    /// 切换单个取值的选中状态
    pub fn toggle<V: FilterValue>(&mut self, value: V) -> CatalogResult<&[Product]> {
        let mut values = self.params.selection().get::<V>().to_vec();
        match values.iter().position(|v| *v == value) {
            Some(pos) => {
                values.remove(pos);
            }
            None => values.push(value),
        }
        self.set_values(&values)
    }

    /// 按标签切换取值；未知的键或取值返回错误
    pub fn toggle_label(&mut self, key: &str, label: &str) -> CatalogResult<&[Product]> {
        let dimension: FilterDimension = key.parse()?;
        let mut labels = self.params.selection().values(dimension);

        let label = dimension
            .labels()
            .into_iter()
            .find(|known| *known == label.trim())
            .ok_or_else(|| CatalogError::UnknownValue {
                key: key.to_string(),
                value: label.to_string(),
            })?;

        match labels.iter().position(|v| *v == label) {
            Some(pos) => {
                labels.remove(pos);
            }
            None => labels.push(label),
        }

        let selection = self.params.set_labels(dimension, &labels)?;
        Ok(self.apply(selection))
    }

    /// 清空单个维度
    pub fn clear(&mut self, dimension: FilterDimension) -> CatalogResult<&[Product]> {
        let selection = self.params.set_labels::<&str>(dimension, &[])?;
        Ok(self.apply(selection))
    }

    pub fn set_sort(&mut self, direction: Option<SortDirection>) -> CatalogResult<&[Product]> {
        let selection = self.params.set_sort(direction)?;
        Ok(self.apply(selection))
    }

    /// 重置全部条件，恢复为未筛选、未排序的完整列表
    ///
    /// 部分参数写入失败时按查询参数的实际状态重新计算可见列表，再返回错误。
    pub fn reset(&mut self) -> CatalogResult<&[Product]> {
        match self.params.reset() {
            Ok(selection) => {
                self.visible = self.products.clone();
                self.notify(&selection);
                Ok(self.visible.as_slice())
            }
            Err(e) => {
                let selection = self.params.selection();
                self.apply(selection);
                Err(e)
            }
        }
    }

    /// 下拉框标题，例如 "2 categories selected" / "Select categories"
    pub fn summary(&self, dimension: FilterDimension) -> String {
        let label = registry(dimension.key()).label;
        match self.params.selection().count(dimension) {
            0 => format!("Select {}", label),
            n => format!("{} {} selected", n, label),
        }
    }

    fn apply(&mut self, selection: FilterSelection) -> &[Product] {
        self.visible = process_products(&selection, &self.products);
        tracing::debug!(visible = self.visible.len(), total = self.products.len(), "筛选结果已更新");
        self.notify(&selection);
        &self.visible
    }

    fn notify(&mut self, selection: &FilterSelection) {
        if let Some(listener) = self.listener.as_mut() {
            listener(selection, &self.visible);
        }
    }
}

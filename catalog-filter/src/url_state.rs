use std::collections::BTreeMap;
use std::fmt;

use catalog_common::CatalogResult;
use serde::{Deserialize, Serialize};

use crate::models::{parse_labels, FilterDefaults, FilterSelection, SortDirection};
use crate::registry::{FilterDimension, FilterValue};

/// 查询参数存储 - 筛选状态的唯一来源
///
/// 浏览器中对应地址栏的查询串，测试中可以替换为内存实现。
pub trait QueryStore {
    /// 读取参数原始值；参数不存在时返回 `None`
    fn get(&self, key: &str) -> Option<String>;

    /// 写入参数；`None` 表示删除该参数
    fn set(&mut self, key: &str, value: Option<&str>) -> CatalogResult<()>;
}

/// 内存中的查询参数存储
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryQueryStore {
    params: BTreeMap<String, String>,
}

impl MemoryQueryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// 按键名排序输出 `key=value&...`
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl QueryStore for MemoryQueryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.params.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Option<&str>) -> CatalogResult<()> {
        match value {
            Some(v) => {
                self.params.insert(key.to_string(), v.to_string());
            }
            None => {
                self.params.remove(key);
            }
        }
        Ok(())
    }
}

/// 各筛选条件对应的查询参数名
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ParamKeys {
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
    pub material: String,
    pub sort_size: String,
}

impl Default for ParamKeys {
    fn default() -> Self {
        Self {
            category: "category".to_string(),
            kind: "type".to_string(),
            color: "color".to_string(),
            material: "material".to_string(),
            sort_size: "sortSize".to_string(),
        }
    }
}

impl ParamKeys {
    pub fn for_dimension(&self, dimension: FilterDimension) -> &str {
        match dimension {
            FilterDimension::Category => &self.category,
            FilterDimension::Type => &self.kind,
            FilterDimension::Color => &self.color,
            FilterDimension::Material => &self.material,
        }
    }
}

/// 列表参数编码：逗号分隔
pub fn encode_list(labels: &[&str]) -> String {
    labels.join(",")
}

/// 列表参数解码：参数缺失或没有合法取值时返回空列表
pub fn decode_list<V: FilterValue>(raw: Option<&str>) -> Vec<V> {
    match raw {
        Some(raw) => parse_labels(&raw.split(',').collect::<Vec<_>>()),
        None => Vec::new(),
    }
}

/// 参数是否为空（缺失或只有空白/逗号），不判断取值是否合法
fn is_raw_empty(raw: Option<&str>) -> bool {
    raw.map_or(true, |raw| raw.split(',').all(|token| token.trim().is_empty()))
}

/// 筛选状态变化的回调
pub type Listener = Box<dyn FnMut(&FilterSelection)>;

/// 查询参数同步器 - 在筛选条件与查询参数之间双向同步
pub struct FilterParams<S: QueryStore> {
    store: S,
    keys: ParamKeys,
    listener: Option<Listener>,
}

impl<S: QueryStore> fmt::Debug for FilterParams<S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterParams")
            .field("store", &self.store)
            .field("keys", &self.keys)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl<S: QueryStore> FilterParams<S> {
    pub fn new(store: S, keys: ParamKeys) -> Self {
        Self {
            store,
            keys,
            listener: None,
        }
    }

    /// 设置状态变化回调
    pub fn with_listener(mut self, listener: impl FnMut(&FilterSelection) + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn keys(&self) -> &ParamKeys {
        &self.keys
    }

    /// 首次挂载：用默认值填充空参数，并通知一次初始筛选条件
    pub fn mount(&mut self, defaults: &FilterDefaults) -> CatalogResult<FilterSelection> {
        self.hydrate(defaults)?;
        let selection = self.selection();
        self.notify(&selection);
        Ok(selection)
    }

    /// 只在参数为空且默认值非空时写入默认值，不覆盖已有参数
    fn hydrate(&mut self, defaults: &FilterDefaults) -> CatalogResult<()> {
        for dimension in FilterDimension::ALL {
            let key = self.keys.for_dimension(dimension).to_string();
            let values = defaults.values(dimension);
            if values.is_empty() || !is_raw_empty(self.store.get(&key).as_deref()) {
                continue;
            }
            tracing::debug!(key = %key, ?values, "使用默认值填充查询参数");
            self.store.set(&key, Some(&encode_list(&values)))?;
        }

        if let Some(direction) = defaults.sort_size {
            let raw = self.store.get(&self.keys.sort_size);
            if raw.map_or(true, |raw| raw.trim().is_empty()) {
                let key = self.keys.sort_size.clone();
                self.store.set(&key, Some(direction.as_str()))?;
            }
        }

        Ok(())
    }

    /// 当前筛选条件，完全由查询参数推导
    pub fn selection(&self) -> FilterSelection {
        FilterSelection {
            category: self.read_list(),
            kind: self.read_list(),
            color: self.read_list(),
            material: self.read_list(),
            sort_size: self.read_sort(),
        }
    }

    fn read_list<V: FilterValue>(&self) -> Vec<V> {
        decode_list(self.store.get(self.keys.for_dimension(V::DIMENSION)).as_deref())
    }

    fn read_sort(&self) -> Option<SortDirection> {
        self.store
            .get(&self.keys.sort_size)
            .and_then(|raw| SortDirection::parse(raw.trim()))
    }

    /// 更新单个维度；空列表写为空字符串，参数保留
    pub fn set_values<V: FilterValue>(&mut self, values: &[V]) -> CatalogResult<FilterSelection> {
        let mut selection = self.selection();
        selection.set(values);
        self.write_dimension(V::DIMENSION, &selection)?;
        self.notify(&selection);
        Ok(selection)
    }

    /// 按标签更新单个维度，未知标签被丢弃
    pub fn set_labels<T: AsRef<str>>(
        &mut self,
        dimension: FilterDimension,
        labels: &[T],
    ) -> CatalogResult<FilterSelection> {
        let mut selection = self.selection();
        selection.set_labels(dimension, labels);
        self.write_dimension(dimension, &selection)?;
        self.notify(&selection);
        Ok(selection)
    }

    fn write_dimension(&mut self, dimension: FilterDimension, selection: &FilterSelection) -> CatalogResult<()> {
        let key = self.keys.for_dimension(dimension).to_string();
        let encoded = encode_list(&selection.values(dimension));
        self.store.set(&key, Some(&encoded))
    }

    /// 设置或清除尺码排序
    pub fn set_sort(&mut self, direction: Option<SortDirection>) -> CatalogResult<FilterSelection> {
        let key = self.keys.sort_size.clone();
        self.store.set(&key, direction.map(|d| d.as_str()))?;

        let mut selection = self.selection();
        selection.sort_size = direction;
        self.notify(&selection);
        Ok(selection)
    }

    /// 清空全部筛选参数和排序参数，只通知一次
    ///
    /// 某个参数写入失败时仍会尝试其余参数，然后按查询参数的实际状态通知，并返回第一个错误。
    pub fn reset(&mut self) -> CatalogResult<FilterSelection> {
        let mut writes: Vec<(String, Option<&'static str>)> = FilterDimension::ALL
            .iter()
            .map(|dimension| (self.keys.for_dimension(*dimension).to_string(), Some("")))
            .collect();
        writes.push((self.keys.sort_size.clone(), None));

        let mut first_error = None;
        for (key, value) in writes {
            if let Err(e) = self.store.set(&key, value) {
                tracing::warn!(key = %key, error = %e, "重置查询参数失败");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            None => {
                let selection = FilterSelection::default();
                self.notify(&selection);
                Ok(selection)
            }
            Some(e) => {
                let selection = self.selection();
                self.notify(&selection);
                Err(e)
            }
        }
    }

    fn notify(&mut self, selection: &FilterSelection) {
        if let Some(listener) = self.listener.as_mut() {
            listener(selection);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FailingStore;
    use catalog_common::{ProductCategory, ProductColor, ProductMaterial, ProductType};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording(store: MemoryQueryStore) -> (FilterParams<MemoryQueryStore>, Rc<RefCell<Vec<FilterSelection>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let params = FilterParams::new(store, ParamKeys::default())
            .with_listener(move |selection| sink.borrow_mut().push(selection.clone()));
        (params, seen)
    }

    #[test]
    fn absent_and_malformed_params_read_as_empty() {
        let store = MemoryQueryStore::from_pairs([("color", ",, ,"), ("sortSize", "sideways")]);
        let params = FilterParams::new(store, ParamKeys::default());
        assert_eq!(params.selection(), FilterSelection::default());
    }

    #[test]
    fn unknown_values_are_dropped_on_read() {
        let store = MemoryQueryStore::from_pairs([("category", "Topwear,Hats,Outerwear,Topwear")]);
        let params = FilterParams::new(store, ParamKeys::default());
        assert_eq!(
            params.selection().category,
            vec![ProductCategory::Topwear, ProductCategory::Outerwear]
        );
    }

    #[test]
    fn mount_hydrates_only_empty_params_and_notifies_once() {
        let store = MemoryQueryStore::from_pairs([("color", "Red")]);
        let (mut params, seen) = recording(store);
        let defaults = FilterDefaults {
            category: vec![ProductCategory::Swimwear],
            color: vec![ProductColor::Blue],
            ..Default::default()
        };

        let selection = params.mount(&defaults).unwrap();

        assert_eq!(selection.category, vec![ProductCategory::Swimwear]);
        assert_eq!(selection.color, vec![ProductColor::Red]);
        assert_eq!(params.store().get("category").as_deref(), Some("Swimwear"));
        assert!(!params.store().contains_key("type"));
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0], selection);
    }

    #[test]
    fn hydration_never_overwrites_unrecognised_values() {
        let store = MemoryQueryStore::from_pairs([("material", "Kevlar")]);
        let mut params = FilterParams::new(store, ParamKeys::default());
        let defaults = FilterDefaults {
            material: vec![ProductMaterial::Silk],
            ..Default::default()
        };
        params.mount(&defaults).unwrap();
        assert_eq!(params.store().get("material").as_deref(), Some("Kevlar"));
        assert!(params.selection().material.is_empty());
    }

    #[test]
    fn default_sort_is_hydrated_when_absent() {
        let mut params = FilterParams::new(MemoryQueryStore::new(), ParamKeys::default());
        let defaults = FilterDefaults {
            sort_size: Some(SortDirection::Desc),
            ..Default::default()
        };
        assert_eq!(params.mount(&defaults).unwrap().sort_size, Some(SortDirection::Desc));
        assert_eq!(params.store().get("sortSize").as_deref(), Some("desc"));
    }

    #[test]
    fn set_values_touches_only_one_param_and_reports_full_selection() {
        let store = MemoryQueryStore::from_pairs([("color", "Black"), ("sortSize", "asc")]);
        let (mut params, seen) = recording(store);

        let selection = params.set_values(&[ProductType::Coat, ProductType::Jacket]).unwrap();

        assert_eq!(params.store().get("type").as_deref(), Some("Coat,Jacket"));
        assert_eq!(params.store().get("color").as_deref(), Some("Black"));
        assert_eq!(selection.color, vec![ProductColor::Black]);
        assert_eq!(selection.sort_size, Some(SortDirection::Asc));
        assert_eq!(seen.borrow().as_slice(), &[selection]);
    }

    #[test]
    fn emptying_a_dimension_keeps_the_param_present() {
        let store = MemoryQueryStore::from_pairs([("category", "Outerwear")]);
        let mut params = FilterParams::new(store, ParamKeys::default());
        params.set_values::<ProductCategory>(&[]).unwrap();
        assert_eq!(params.store().get("category").as_deref(), Some(""));
    }

    #[test]
    fn set_labels_validates_against_the_dimension() {
        let mut params = FilterParams::new(MemoryQueryStore::new(), ParamKeys::default());
        let selection = params
            .set_labels(FilterDimension::Material, &["Wool", "Velvet"])
            .unwrap();
        assert_eq!(selection.material, vec![ProductMaterial::Wool]);
        assert_eq!(params.store().get("material").as_deref(), Some("Wool"));
    }

    #[test]
    fn set_sort_writes_and_clears() {
        let mut params = FilterParams::new(MemoryQueryStore::new(), ParamKeys::default());
        params.set_sort(Some(SortDirection::Desc)).unwrap();
        assert_eq!(params.store().get("sortSize").as_deref(), Some("desc"));
        params.set_sort(None).unwrap();
        assert!(!params.store().contains_key("sortSize"));
    }

    #[test]
    fn reset_clears_everything_with_one_notification() {
        let store = MemoryQueryStore::from_pairs([
            ("category", "Outerwear"),
            ("type", "Coat"),
            ("color", "Red"),
            ("material", "Wool"),
            ("sortSize", "desc"),
            ("page", "2"),
        ]);
        let (mut params, seen) = recording(store);

        let selection = params.reset().unwrap();

        assert_eq!(selection, FilterSelection::default());
        assert_eq!(params.selection(), FilterSelection::default());
        assert_eq!(params.store().to_query_string(), "category=&color=&material=&page=2&type=");
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn reset_keeps_going_after_a_failed_write() {
        let store = FailingStore::new(
            MemoryQueryStore::from_pairs([("category", "Outerwear"), ("type", "Coat"), ("sortSize", "desc")]),
            2,
        );
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut params = FilterParams::new(store, ParamKeys::default())
            .with_listener(move |selection| sink.borrow_mut().push(selection.clone()));

        assert!(params.reset().is_err());

        let selection = params.selection();
        assert!(selection.category.is_empty());
        assert_eq!(selection.kind, vec![ProductType::Coat]);
        assert_eq!(selection.sort_size, None);
        assert_eq!(seen.borrow().as_slice(), &[selection]);
    }

    #[test]
    fn default_sort_never_overwrites_an_unrecognised_value() {
        let store = MemoryQueryStore::from_pairs([("sortSize", "sideways")]);
        let mut params = FilterParams::new(store, ParamKeys::default());
        let defaults = FilterDefaults {
            sort_size: Some(SortDirection::Desc),
            ..Default::default()
        };
        assert_eq!(params.mount(&defaults).unwrap().sort_size, None);
        assert_eq!(params.store().get("sortSize").as_deref(), Some("sideways"));
    }

    #[test]
    fn custom_param_keys_are_respected() {
        let keys = ParamKeys {
            sort_size: "sort".to_string(),
            ..Default::default()
        };
        let store = MemoryQueryStore::from_pairs([("sort", "desc"), ("sortSize", "asc")]);
        let params = FilterParams::new(store, keys);
        assert_eq!(params.selection().sort_size, Some(SortDirection::Desc));
    }
}

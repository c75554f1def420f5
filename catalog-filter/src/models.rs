use catalog_common::{ProductCategory, ProductColor, ProductMaterial, ProductType};
use serde::{Deserialize, Serialize};

use crate::registry::{FilterDimension, FilterValue};

/// 尺码排序方向
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const ALL: [SortDirection; 2] = [SortDirection::Asc, SortDirection::Desc];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// 只接受 `asc` / `desc`，其他取值一律视为未排序
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// 当前筛选条件 - 四个多选维度加可选的尺码排序
///
/// 空集合表示该维度不做限制。集合保持插入顺序且不含重复值。
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSelection {
    pub category: Vec<ProductCategory>,
    /// 款式（序列化键为 `type`）
    #[serde(rename = "type")]
    pub kind: Vec<ProductType>,
    pub color: Vec<ProductColor>,
    pub material: Vec<ProductMaterial>,
    pub sort_size: Option<SortDirection>,
}

/// 初始筛选默认值，结构与筛选条件相同；空集合表示该维度没有默认值
pub type FilterDefaults = FilterSelection;

impl FilterSelection {
    /// 四个多选维度是否都为空（排序不参与判断）
    pub fn is_unfiltered(&self) -> bool {
        FilterDimension::ALL.iter().all(|dim| self.count(*dim) == 0)
    }

    /// 某个维度已选取值的数量
    pub fn count(&self, dimension: FilterDimension) -> usize {
        match dimension {
            FilterDimension::Category => self.category.len(),
            FilterDimension::Type => self.kind.len(),
            FilterDimension::Color => self.color.len(),
            FilterDimension::Material => self.material.len(),
        }
    }

    /// 某个维度已选取值的标签
    pub fn values(&self, dimension: FilterDimension) -> Vec<&'static str> {
        match dimension {
            FilterDimension::Category => labels(&self.category),
            FilterDimension::Type => labels(&self.kind),
            FilterDimension::Color => labels(&self.color),
            FilterDimension::Material => labels(&self.material),
        }
    }

    pub fn get<V: FilterValue>(&self) -> &[V] {
        V::slot(self)
    }

    pub fn contains<V: FilterValue>(&self, value: V) -> bool {
        V::slot(self).contains(&value)
    }

    /// 替换某个维度的取值，去除重复并保留首次出现的顺序
    pub fn set<V: FilterValue>(&mut self, values: &[V]) {
        *V::slot_mut(self) = dedup(values.iter().copied());
    }

    /// 按标签替换某个维度的取值，未知标签被丢弃
    pub fn set_labels<S: AsRef<str>>(&mut self, dimension: FilterDimension, raw: &[S]) {
        match dimension {
            FilterDimension::Category => self.category = parse_labels(raw),
            FilterDimension::Type => self.kind = parse_labels(raw),
            FilterDimension::Color => self.color = parse_labels(raw),
            FilterDimension::Material => self.material = parse_labels(raw),
        }
    }

    /// 已选中则移除，否则追加到末尾；返回操作后是否选中
    pub fn toggle<V: FilterValue>(&mut self, value: V) -> bool {
        let slot = V::slot_mut(self);
        if let Some(pos) = slot.iter().position(|v| *v == value) {
            slot.remove(pos);
            false
        } else {
            slot.push(value);
            true
        }
    }

    pub fn clear(&mut self, dimension: FilterDimension) {
        match dimension {
            FilterDimension::Category => self.category.clear(),
            FilterDimension::Type => self.kind.clear(),
            FilterDimension::Color => self.color.clear(),
            FilterDimension::Material => self.material.clear(),
        }
    }
}

fn labels<V: FilterValue>(values: &[V]) -> Vec<&'static str> {
    values.iter().map(|v| v.label()).collect()
}

fn dedup<V: FilterValue>(values: impl IntoIterator<Item = V>) -> Vec<V> {
    let mut out: Vec<V> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// 解析标签列表：去空白、丢弃未知取值、去重
pub(crate) fn parse_labels<V: FilterValue, S: AsRef<str>>(raw: &[S]) -> Vec<V> {
    dedup(raw.iter().filter_map(|s| {
        let s = s.as_ref().trim();
        if s.is_empty() {
            return None;
        }
        match s.parse::<V>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::debug!(dimension = ?V::DIMENSION, value = s, "忽略未知的筛选取值");
                None
            }
        }
    }))
}

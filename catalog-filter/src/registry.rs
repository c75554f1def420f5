use catalog_common::{CatalogError, Product, ProductCategory, ProductColor, ProductMaterial, ProductType};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::{FilterSelection, SortDirection};

/// 可识别的筛选键
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ProductFilter {
    Category,
    Type,
    Color,
    Material,
    SortSize,
}

impl ProductFilter {
    pub const ALL: [ProductFilter; 5] = [
        ProductFilter::Category,
        ProductFilter::Type,
        ProductFilter::Color,
        ProductFilter::Material,
        ProductFilter::SortSize,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductFilter::Category => "category",
            ProductFilter::Type => "type",
            ProductFilter::Color => "color",
            ProductFilter::Material => "material",
            ProductFilter::SortSize => "sortSize",
        }
    }

    /// 多选维度；排序键返回 `None`
    pub fn dimension(&self) -> Option<FilterDimension> {
        match self {
            ProductFilter::Category => Some(FilterDimension::Category),
            ProductFilter::Type => Some(FilterDimension::Type),
            ProductFilter::Color => Some(FilterDimension::Color),
            ProductFilter::Material => Some(FilterDimension::Material),
            ProductFilter::SortSize => None,
        }
    }
}

impl FromStr for ProductFilter {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductFilter::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::UnknownFilter(s.to_string()))
    }
}

/// 四个多选筛选维度
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FilterDimension {
    Category,
    Type,
    Color,
    Material,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 4] = [
        FilterDimension::Category,
        FilterDimension::Type,
        FilterDimension::Color,
        FilterDimension::Material,
    ];

    pub fn key(&self) -> ProductFilter {
        match self {
            FilterDimension::Category => ProductFilter::Category,
            FilterDimension::Type => ProductFilter::Type,
            FilterDimension::Color => ProductFilter::Color,
            FilterDimension::Material => ProductFilter::Material,
        }
    }

    /// 该维度的全部合法取值
    pub fn labels(&self) -> Vec<&'static str> {
        match self {
            FilterDimension::Category => labels_of::<ProductCategory>(),
            FilterDimension::Type => labels_of::<ProductType>(),
            FilterDimension::Color => labels_of::<ProductColor>(),
            FilterDimension::Material => labels_of::<ProductMaterial>(),
        }
    }

    /// 商品在该维度上的取值
    pub fn product_label(&self, product: &Product) -> &'static str {
        match self {
            FilterDimension::Category => product.category.as_str(),
            FilterDimension::Type => product.kind.as_str(),
            FilterDimension::Color => product.color.as_str(),
            FilterDimension::Material => product.material.as_str(),
        }
    }
}

impl FromStr for FilterDimension {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<ProductFilter>()?
            .dimension()
            .ok_or_else(|| CatalogError::UnknownFilter(s.to_string()))
    }
}

/// 绑定到某个筛选维度的取值类型
///
/// 每个取值类型只能存入自己所属维度的选择集合，其他维度的取值在编译期即被拒绝。
pub trait FilterValue: Copy + Eq + FromStr + 'static {
    const DIMENSION: FilterDimension;

    fn all() -> &'static [Self];

    fn label(&self) -> &'static str;

    /// 商品在本维度上的取值
    fn of(product: &Product) -> Self;

    fn slot(selection: &FilterSelection) -> &Vec<Self>;

    fn slot_mut(selection: &mut FilterSelection) -> &mut Vec<Self>;
}

macro_rules! filter_value {
    ($ty:ty, $dimension:ident, $field:ident) => {
        impl FilterValue for $ty {
            const DIMENSION: FilterDimension = FilterDimension::$dimension;

            fn all() -> &'static [Self] {
                <$ty>::ALL
            }

            fn label(&self) -> &'static str {
                self.as_str()
            }

            fn of(product: &Product) -> Self {
                product.$field
            }

            fn slot(selection: &FilterSelection) -> &Vec<Self> {
                &selection.$field
            }

            fn slot_mut(selection: &mut FilterSelection) -> &mut Vec<Self> {
                &mut selection.$field
            }
        }
    };
}

filter_value!(ProductCategory, Category, category);
filter_value!(ProductType, Type, kind);
filter_value!(ProductColor, Color, color);
filter_value!(ProductMaterial, Material, material);

fn labels_of<V: FilterValue>() -> Vec<&'static str> {
    V::all().iter().map(|v| v.label()).collect()
}

/// 筛选键的注册信息：展示名称与合法取值
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FilterSpec {
    pub key: ProductFilter,
    pub label: &'static str,
    pub values: Vec<&'static str>,
}

/// 查询单个筛选键的注册信息
pub fn registry(key: ProductFilter) -> FilterSpec {
    let (label, values) = match key.dimension() {
        Some(FilterDimension::Category) => ("categories", FilterDimension::Category.labels()),
        Some(FilterDimension::Type) => ("types", FilterDimension::Type.labels()),
        Some(FilterDimension::Color) => ("colors", FilterDimension::Color.labels()),
        Some(FilterDimension::Material) => ("materials", FilterDimension::Material.labels()),
        None => ("size", SortDirection::ALL.iter().map(|d| d.as_str()).collect()),
    };

    FilterSpec { key, label, values }
}

/// 全部筛选键的注册信息
pub fn full_registry() -> Vec<FilterSpec> {
    ProductFilter::ALL.into_iter().map(registry).collect()
}

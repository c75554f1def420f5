use wasm_bindgen::prelude::*;
use serde::Deserialize;
use web_sys::console;
use catalog_common::{load_products_from_str, CatalogError, Product};

// 导出模块
pub mod browser;
pub mod builder;
pub mod filtering;
pub mod models;
pub mod pipeline;
pub mod registry;
pub mod sorting;
pub mod url_state;

#[cfg(test)]
mod test_support;

pub use browser::BrowserQueryStore;
pub use builder::{load_bundle, CatalogBuilder, BUNDLE_VERSION};
pub use filtering::{filter_products, has_filters, matches_filters};
pub use models::{FilterDefaults, FilterSelection, SortDirection};
pub use pipeline::{process_products, Catalog, ChangeListener};
pub use registry::{full_registry, registry, FilterDimension, FilterSpec, FilterValue, ProductFilter};
pub use sorting::{compare_by_size, sort_products};
pub use url_state::{FilterParams, MemoryQueryStore, ParamKeys, QueryStore};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// 初始化函数 - 设置错误处理
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// 版本信息
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// 对商品 JSON 按给定筛选条件先筛选再排序，不读写查询参数
#[wasm_bindgen(js_name = processProducts)]
pub fn process_products_js(selection: JsValue, products_json: &str) -> Result<JsValue, JsValue> {
    let selection: FilterSelection = if selection.is_null() || selection.is_undefined() {
        FilterSelection::default()
    } else {
        serde_wasm_bindgen::from_value(selection)
            .map_err(|e| JsValue::from_str(&format!("解析筛选条件失败: {}", e)))?
    };
    to_js(&process_products(&selection, &load_products_from_str(products_json)))
}

/// 页面传入的初始化选项
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogOptions {
    /// 查询参数为空时使用的默认筛选条件
    pub defaults: FilterDefaults,
    /// 自定义查询参数名
    pub keys: ParamKeys,
}

/// 商品目录JS接口 - 提供给页面使用的筛选、排序和重置API
#[wasm_bindgen]
pub struct CatalogFilterJS {
    catalog: Catalog<BrowserQueryStore>,
}

#[wasm_bindgen]
impl CatalogFilterJS {
    /// 从商品 JSON 创建目录；JSON 无法解析时使用空目录
    #[wasm_bindgen(constructor)]
    pub fn new(
        products_json: &str,
        options: JsValue,
        on_change: Option<js_sys::Function>,
    ) -> Result<CatalogFilterJS, JsValue> {
        let products = load_products_from_str(products_json);
        if products.is_empty() {
            console::warn_1(&JsValue::from_str("商品数据为空或解析失败"));
        }
        Self::mount(products, options, on_change)
    }

    /// 从压缩数据包创建目录；数据包无效时使用空目录
    #[wasm_bindgen]
    pub fn from_compressed(
        bundle: &[u8],
        options: JsValue,
        on_change: Option<js_sys::Function>,
    ) -> Result<CatalogFilterJS, JsValue> {
        let products = match load_bundle(bundle) {
            Ok(bundle) => bundle.products,
            Err(e) => {
                console::warn_1(&JsValue::from_str(&format!("加载目录数据包失败: {}", e)));
                Vec::new()
            }
        };
        Self::mount(products, options, on_change)
    }

    /// 当前可见商品（已筛选、已排序）
    #[wasm_bindgen]
    pub fn visible(&self) -> Result<JsValue, JsValue> {
        to_js(self.catalog.visible())
    }

    /// 当前筛选条件
    #[wasm_bindgen]
    pub fn selection(&self) -> Result<JsValue, JsValue> {
        to_js(&self.catalog.selection())
    }

    #[wasm_bindgen]
    pub fn product_count(&self) -> usize {
        self.catalog.products().len()
    }

    /// 更新单个筛选条件，`values` 为字符串数组
    #[wasm_bindgen]
    pub fn set_filter(&mut self, name: &str, values: JsValue) -> Result<JsValue, JsValue> {
        let values: Vec<String> = if values.is_null() || values.is_undefined() {
            Vec::new()
        } else {
            serde_wasm_bindgen::from_value(values)
                .map_err(|e| JsValue::from_str(&format!("解析筛选取值失败: {}", e)))?
        };
        let visible = self.catalog.set_filter(name, &values).map_err(report)?;
        to_js(visible)
    }

    /// 切换单个取值
    #[wasm_bindgen]
    pub fn toggle(&mut self, name: &str, value: &str) -> Result<JsValue, JsValue> {
        let visible = self.catalog.toggle_label(name, value).map_err(report)?;
        to_js(visible)
    }

    /// 清空单个筛选条件
    #[wasm_bindgen]
    pub fn clear(&mut self, name: &str) -> Result<JsValue, JsValue> {
        let dimension: FilterDimension = name.parse().map_err(report)?;
        let visible = self.catalog.clear(dimension).map_err(report)?;
        to_js(visible)
    }

    /// 设置尺码排序："asc" / "desc"，其他取值清除排序
    #[wasm_bindgen]
    pub fn set_sort(&mut self, direction: Option<String>) -> Result<JsValue, JsValue> {
        let direction = direction.as_deref().and_then(SortDirection::parse);
        let visible = self.catalog.set_sort(direction).map_err(report)?;
        to_js(visible)
    }

    /// 重置全部筛选条件
    #[wasm_bindgen]
    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        let visible = self.catalog.reset().map_err(report)?;
        to_js(visible)
    }

    /// 下拉框标题
    #[wasm_bindgen]
    pub fn summary(&self, name: &str) -> Result<String, JsValue> {
        let dimension: FilterDimension = name.parse().map_err(report)?;
        Ok(self.catalog.summary(dimension))
    }

    /// 全部筛选键的展示名称和合法取值
    #[wasm_bindgen]
    pub fn registry() -> Result<JsValue, JsValue> {
        to_js(&full_registry())
    }
}

impl CatalogFilterJS {
    fn mount(
        products: Vec<Product>,
        options: JsValue,
        on_change: Option<js_sys::Function>,
    ) -> Result<CatalogFilterJS, JsValue> {
        console_error_panic_hook::set_once();

        let options: CatalogOptions = if options.is_null() || options.is_undefined() {
            CatalogOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)
                .map_err(|e| JsValue::from_str(&format!("解析初始化选项失败: {}", e)))?
        };

        let store = BrowserQueryStore::new().map_err(report)?;
        let mut catalog = Catalog::new(products, store, options.keys);
        if let Some(callback) = on_change {
            catalog = catalog.on_change(move |selection, visible| notify_js(&callback, selection, visible));
        }
        catalog.mount(&options.defaults).map_err(report)?;

        Ok(CatalogFilterJS { catalog })
    }
}

/// 回调参数为 (selection, visible)；回调执行期间对象仍被借用，不能在回调里再调用实例方法
fn notify_js(callback: &js_sys::Function, selection: &FilterSelection, visible: &[Product]) {
    let result = to_js(selection)
        .and_then(|selection| Ok((selection, to_js(visible)?)))
        .and_then(|(selection, visible)| callback.call2(&JsValue::NULL, &selection, &visible));
    if let Err(e) = result {
        console::error_2(&JsValue::from_str("筛选回调执行失败:"), &e);
    }
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&format!("序列化结果失败: {}", e)))
}

fn report(e: CatalogError) -> JsValue {
    console::log_1(&JsValue::from_str(&format!("目录操作失败: {}", e)));
    JsValue::from_str(&e.to_string())
}

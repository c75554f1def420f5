use catalog_common::{CatalogError, CatalogResult};
use wasm_bindgen::JsValue;
use web_sys::{UrlSearchParams, Window};

use crate::url_state::QueryStore;

/// 基于浏览器地址栏的查询参数存储
///
/// 读取 `location.search`，写入时用 `history.replaceState` 更新地址，不产生新的历史记录。
/// 空值直接从地址中删除，读回时同样得到空列表。
pub struct BrowserQueryStore {
    window: Window,
}

impl std::fmt::Debug for BrowserQueryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserQueryStore").finish()
    }
}

impl BrowserQueryStore {
    pub fn new() -> CatalogResult<Self> {
        web_sys::window()
            .map(|window| Self { window })
            .ok_or_else(|| CatalogError::Store("无法获取 window 对象".to_string()))
    }

    fn search_params(&self) -> CatalogResult<UrlSearchParams> {
        let search = self.window.location().search().map_err(js_error)?;
        UrlSearchParams::new_with_str(&search).map_err(js_error)
    }
}

impl QueryStore for BrowserQueryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.search_params().ok()?.get(key)
    }

    fn set(&mut self, key: &str, value: Option<&str>) -> CatalogResult<()> {
        let params = self.search_params()?;
        match value {
            Some(v) if !v.is_empty() => params.set(key, v),
            _ => params.delete(key),
        }

        let location = self.window.location();
        let pathname = location.pathname().map_err(js_error)?;
        let hash = location.hash().map_err(js_error)?;
        let query = String::from(params.to_string());
        let url = if query.is_empty() {
            format!("{}{}", pathname, hash)
        } else {
            format!("{}?{}{}", pathname, query, hash)
        };

        self.window
            .history()
            .map_err(js_error)?
            .replace_state_with_url(&JsValue::NULL, "", Some(&url))
            .map_err(js_error)
    }
}

fn js_error(err: JsValue) -> CatalogError {
    CatalogError::Store(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

pub mod compression;
pub mod error;
pub mod loader;
pub mod models;

// 重新导出常用类型和函数，方便直接使用
pub use compression::{from_compressed_with_max_version, to_compressed, validate_compressed_data_with_max_version};
pub use error::{CatalogError, CatalogResult};
pub use loader::{find_duplicate_ids, load_products, load_products_from_str, load_products_strict, parse_products};
pub use models::{
    CatalogBundle, CatalogMetadata, Product, ProductCategory, ProductColor, ProductMaterial, ProductOptions,
    ProductSize, ProductType,
};

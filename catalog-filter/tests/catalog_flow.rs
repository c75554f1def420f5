use std::cell::RefCell;
use std::rc::Rc;

use catalog_common::{load_products_from_str, Product, ProductCategory, ProductSize};
use catalog_filter::{
    Catalog, CatalogBuilder, FilterDefaults, FilterDimension, FilterSelection, MemoryQueryStore, ParamKeys,
    QueryStore, SortDirection,
};

const PRODUCTS: &str = include_str!("../../data/products.json");

fn ids(products: &[Product]) -> Vec<u32> {
    products.iter().map(|p| p.id).collect()
}

fn catalog_with(store: MemoryQueryStore) -> (Catalog<MemoryQueryStore>, Rc<RefCell<Vec<FilterSelection>>>) {
    let products = load_products_from_str(PRODUCTS);
    assert!(!products.is_empty(), "sample catalog should parse");

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let catalog = Catalog::new(products, store, ParamKeys::default())
        .on_change(move |selection, _| sink.borrow_mut().push(selection.clone()));
    (catalog, seen)
}

#[test]
fn category_filter_then_reset_restores_everything() {
    let (mut catalog, seen) = catalog_with(MemoryQueryStore::new());
    let all = ids(catalog.mount(&FilterDefaults::default()).unwrap());
    assert_eq!(all.len(), catalog.products().len());

    let outerwear = catalog.set_values(&[ProductCategory::Outerwear]).unwrap().to_vec();
    assert!(!outerwear.is_empty());
    assert!(outerwear.len() < all.len());
    assert!(outerwear.iter().all(|p| p.category == ProductCategory::Outerwear));
    assert_eq!(catalog.params().store().get("category").as_deref(), Some("Outerwear"));

    let restored = ids(catalog.reset().unwrap());

    assert_eq!(restored, all);
    let store = catalog.params().store();
    for key in ["category", "type", "color", "material"] {
        assert_eq!(store.get(key).as_deref(), Some(""), "{} should be present but empty", key);
    }
    assert!(!store.contains_key("sortSize"));
    assert_eq!(seen.borrow().len(), 3);
    assert_eq!(seen.borrow().last(), Some(&FilterSelection::default()));
}

#[test]
fn url_state_survives_a_reload() {
    let (mut first, _) = catalog_with(MemoryQueryStore::new());
    first.mount(&FilterDefaults::default()).unwrap();
    first.set_filter("category", &["Outerwear"]).unwrap();
    first.set_filter("material", &["Leather"]).unwrap();
    first.set_sort(Some(SortDirection::Desc)).unwrap();
    let expected = ids(first.visible());

    // 用同一份查询参数重新挂载
    let store = first.params().store().clone();
    let (mut second, seen) = catalog_with(store);
    let defaults = FilterDefaults {
        category: vec![ProductCategory::Topwear],
        ..Default::default()
    };
    let visible = ids(second.mount(&defaults).unwrap());

    assert_eq!(visible, expected);
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(seen.borrow()[0].category, vec![ProductCategory::Outerwear]);
}

#[test]
fn defaults_fill_an_empty_url() {
    let (mut catalog, _) = catalog_with(MemoryQueryStore::new());
    let defaults = FilterDefaults {
        category: vec![ProductCategory::Topwear],
        sort_size: Some(SortDirection::Asc),
        ..Default::default()
    };

    let visible = catalog.mount(&defaults).unwrap().to_vec();

    assert!(visible.iter().all(|p| p.category == ProductCategory::Topwear));
    let ranks: Vec<u8> = visible.iter().map(|p| p.size.rank()).collect();
    assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(catalog.summary(FilterDimension::Category), "1 categories selected");
}

#[test]
fn sorting_by_size_descending_orders_the_grid() {
    let (mut catalog, _) = catalog_with(MemoryQueryStore::from_pairs([("sortSize", "desc")]));
    let visible = catalog.mount(&FilterDefaults::default()).unwrap().to_vec();

    assert_eq!(visible.first().map(|p| p.size), Some(ProductSize::XL));
    let ranks: Vec<u8> = visible.iter().map(|p| p.size.rank()).collect();
    assert!(ranks.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn sample_catalog_packs_into_a_bundle() {
    let mut builder = CatalogBuilder::new();
    for product in load_products_from_str(PRODUCTS) {
        builder.add_product(product);
    }
    let bundle = catalog_filter::load_bundle(&builder.to_bytes().unwrap()).unwrap();
    assert_eq!(bundle.products, load_products_from_str(PRODUCTS));
}

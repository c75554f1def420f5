use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use tracing_subscriber::EnvFilter;

use catalog_common::load_products_strict;
use catalog_filter::{CatalogBuilder, FilterDimension};

/// 打包输出文件名
const BUNDLE_FILE: &str = "catalog.bin";

fn main() {
    // 设置命令行参数
    let matches = Command::new("商品目录打包工具")
        .version(env!("CARGO_PKG_VERSION"))
        .about("校验商品 JSON 并生成供浏览器加载的压缩目录数据包")
        .arg(Arg::new("source")
            .short('s')
            .long("source")
            .value_name("PRODUCTS_JSON")
            .help("商品 JSON 文件路径")
            .required(true))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("OUTPUT_DIR")
            .help("数据包输出目录路径")
            .required(true))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("显示各筛选维度的商品数量")
            .action(ArgAction::SetTrue))
        .get_matches();

    let source = matches.get_one::<String>("source").map(PathBuf::from).unwrap_or_default();
    let output = matches.get_one::<String>("output").map(PathBuf::from).unwrap_or_default();
    let verbose = matches.get_flag("verbose");

    init_tracing(verbose);

    match pack_catalog(&source, &output, verbose) {
        Ok(summary) => println!(
            "打包完成！商品 {} 件，写入 {} ({} 字节)",
            summary.products,
            summary.path.display(),
            summary.bytes
        ),
        Err(e) => {
            eprintln!("错误: 目录打包失败: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// 日志级别默认 info（verbose 时 debug），可通过 RUST_LOG 覆盖
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 打包结果
#[derive(Debug)]
struct PackSummary {
    products: usize,
    path: PathBuf,
    bytes: usize,
}

fn pack_catalog(source: &Path, output_dir: &Path, verbose: bool) -> anyhow::Result<PackSummary> {
    let start_time = std::time::Instant::now();

    let products = load_products_strict(source)
        .with_context(|| format!("无法加载商品文件 {}", source.display()))?;
    tracing::info!(count = products.len(), source = %source.display(), "商品数据校验通过");

    let mut builder = CatalogBuilder::new();
    for product in products {
        builder.add_product(product);
    }

    if verbose {
        for dimension in FilterDimension::ALL {
            let counts = builder.facet_counts(dimension);
            let line = counts
                .iter()
                .map(|(label, count)| format!("{}={}", label, count))
                .collect::<Vec<_>>()
                .join(", ");
            println!("{}: {}", dimension.key().as_str(), line);
        }
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("无法创建输出目录 {}", output_dir.display()))?;

    let path = output_dir.join(BUNDLE_FILE);
    let bytes = builder.save_bundle(&path)?;

    tracing::info!(elapsed_ms = start_time.elapsed().as_millis() as u64, "目录打包耗时");

    Ok(PackSummary {
        products: builder.len(),
        path,
        bytes,
    })
}

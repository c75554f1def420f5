use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 声明一个封闭的标签枚举：序列化为标签文本，并提供 `ALL`、`as_str` 与 `FromStr`
macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// 按声明顺序列出的全部取值
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// 取值对应的标签文本
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(format!("未知的{}取值: {}", stringify!($name), other)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

label_enum! {
    /// 商品尺码，XS < S < M < L < XL
    pub enum ProductSize {
        XS => "XS",
        S => "S",
        M => "M",
        L => "L",
        XL => "XL",
    }
}

impl ProductSize {
    /// 尺码排序权重：XS=1 ... XL=5
    pub fn rank(&self) -> u8 {
        match self {
            ProductSize::XS => 1,
            ProductSize::S => 2,
            ProductSize::M => 3,
            ProductSize::L => 4,
            ProductSize::XL => 5,
        }
    }
}

label_enum! {
    /// 商品颜色
    pub enum ProductColor {
        Beige => "Beige",
        Black => "Black",
        Blue => "Blue",
        Brown => "Brown",
        Gray => "Gray",
        Green => "Green",
        Khaki => "Khaki",
        Navy => "Navy",
        Pink => "Pink",
        Red => "Red",
        Silver => "Silver",
        White => "White",
        Yellow => "Yellow",
    }
}

label_enum! {
    /// 商品材质
    pub enum ProductMaterial {
        Chiffon => "Chiffon",
        Cotton => "Cotton",
        Denim => "Denim",
        Fleece => "Fleece",
        Lace => "Lace",
        Leather => "Leather",
        Linen => "Linen",
        Lycra => "Lycra",
        Nylon => "Nylon",
        Polyester => "Polyester",
        Silk => "Silk",
        Spandex => "Spandex",
        Wool => "Wool",
    }
}

label_enum! {
    /// 商品款式
    pub enum ProductType {
        Coat => "Coat",
        Dress => "Dress",
        Jacket => "Jacket",
        Leggings => "Leggings",
        OnePiece => "One-piece",
        Pants => "Pants",
        Shirt => "Shirt",
        Shorts => "Shorts",
        Skirt => "Skirt",
        Suit => "Suit",
        Sweater => "Sweater",
        Swimwear => "Swimwear",
        TShirt => "T-Shirt",
        Top => "Top",
        Vest => "Vest",
    }
}

label_enum! {
    /// 商品分类
    pub enum ProductCategory {
        Bottomwear => "Bottomwear",
        Formalwear => "Formalwear",
        OnePiece => "One-piece",
        Outerwear => "Outerwear",
        Sportswear => "Sportswear",
        Swimwear => "Swimwear",
        Topwear => "Topwear",
    }
}

/// 商品附加选项
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductOptions {
    /// 缺货
    pub out_of_stock: bool,
    /// 防水
    pub waterproof: bool,
    /// 正品
    pub original: bool,
}

/// 商品记录 - 加载后只读
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Product {
    /// 商品唯一标识符
    pub id: u32,
    /// 商品名称
    pub name: String,
    pub size: ProductSize,
    pub color: ProductColor,
    pub material: ProductMaterial,
    /// 款式（JSON 字段名为 `type`）
    #[serde(rename = "type")]
    pub kind: ProductType,
    pub category: ProductCategory,
    pub options: ProductOptions,
}

/// 目录数据包元数据
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CatalogMetadata {
    /// 商品数量
    pub product_count: usize,
    /// 打包时间
    pub created_at: DateTime<Utc>,
    /// 数据包格式版本
    pub version: String,
}

/// 目录数据包 - 打包工具输出、浏览器端加载
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CatalogBundle {
    pub metadata: CatalogMetadata,
    pub products: Vec<Product>,
}

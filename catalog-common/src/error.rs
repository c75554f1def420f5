use thiserror::Error;

/// 目录模块通用结果类型
pub type CatalogResult<T> = Result<T, CatalogError>;

/// 目录处理过程中的错误
#[derive(Debug, Error)]
pub enum CatalogError {
    /// 商品 JSON 解析失败
    #[error("解析商品数据失败: {0}")]
    Json(#[from] serde_json::Error),

    /// 文件读写失败
    #[error("读写文件失败: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化失败
    #[error("序列化失败: {0}")]
    Encode(String),

    /// 压缩包格式不正确（魔数、长度、解压内容）
    #[error("无效的目录数据包: {0}")]
    InvalidBundle(String),

    /// 压缩包版本高于当前支持的最大版本
    #[error("不支持的版本: {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },

    /// 筛选键不在注册表中
    #[error("未知的筛选条件: {0}")]
    UnknownFilter(String),

    /// 取值不属于该筛选维度的枚举
    #[error("筛选条件 {key} 不支持取值: {value}")]
    UnknownValue { key: String, value: String },

    /// 查询参数存储写入失败
    #[error("更新查询参数失败: {0}")]
    Store(String),

    /// 没有任何商品可打包
    #[error("没有商品数据")]
    EmptyCatalog,

    /// 商品 ID 重复
    #[error("商品 ID 重复: {0}")]
    DuplicateId(u32),
}

use std::io::Read;
use flate2::{Compression, write::GzEncoder, read::GzDecoder};

use crate::error::{CatalogError, CatalogResult};

/// 魔数常量 - 用于标识目录数据包格式
pub const MAGIC_BYTES: &[u8] = b"PCCMP"; // Product Catalog Compressed

/// 头部长度：魔数 + 版本号(2) + 原始长度(4)
const HEADER_LEN: usize = MAGIC_BYTES.len() + 2 + 4;

/// 将对象序列化为二进制格式
pub fn to_binary<T: serde::Serialize>(obj: &T) -> CatalogResult<Vec<u8>> {
    bincode::serde::encode_to_vec(obj, bincode::config::standard())
        .map_err(|e| CatalogError::Encode(e.to_string()))
}

/// 从二进制格式反序列化对象
pub fn from_binary<T: for<'a> serde::de::Deserialize<'a>>(data: &[u8]) -> CatalogResult<T> {
    bincode::serde::decode_from_slice(data, bincode::config::standard())
        .map_err(|e| CatalogError::InvalidBundle(format!("反序列化失败: {}", e)))
        .map(|(value, _)| value)
}

/// 将对象序列化为压缩的二进制格式
pub fn to_compressed<T: serde::Serialize>(obj: &T, version: [u8; 2]) -> CatalogResult<Vec<u8>> {
    let binary = to_binary(obj)?;

    let mut output = Vec::with_capacity(HEADER_LEN + binary.len() / 2);
    output.extend_from_slice(MAGIC_BYTES);
    output.extend_from_slice(&version);
    output.extend_from_slice(&(binary.len() as u32).to_le_bytes());

    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    std::io::Write::write_all(&mut encoder, &binary)?;
    output.extend_from_slice(&encoder.finish()?);

    Ok(output)
}

/// 从压缩的二进制格式反序列化对象，允许指定支持的最大版本
pub fn from_compressed_with_max_version<T: for<'a> serde::de::Deserialize<'a>>(
    data: &[u8],
    max_version: u8,
) -> CatalogResult<T> {
    validate_compressed_data_with_max_version(data, max_version)?;

    let size_offset = MAGIC_BYTES.len() + 2;
    let mut size_bytes = [0u8; 4];
    size_bytes.copy_from_slice(&data[size_offset..HEADER_LEN]);
    let original_size = u32::from_le_bytes(size_bytes) as usize;

    // 头部长度不可信：预分配按压缩数据大小封顶，解压量最多比声明多读 1 字节
    let payload = &data[HEADER_LEN..];
    let mut decompressed = Vec::with_capacity(original_size.min(payload.len().saturating_mul(4)));
    GzDecoder::new(payload)
        .take(original_size as u64 + 1)
        .read_to_end(&mut decompressed)
        .map_err(|e| CatalogError::InvalidBundle(format!("解压失败: {}", e)))?;

    if decompressed.len() != original_size {
        return Err(CatalogError::InvalidBundle(format!(
            "解压后数据大小不匹配: 期望 {} 字节, 实际 {} 字节",
            original_size,
            decompressed.len()
        )));
    }

    from_binary(&decompressed)
}

/// 验证压缩数据头部，返回版本号
pub fn validate_compressed_data_with_max_version(data: &[u8], max_version: u8) -> CatalogResult<[u8; 2]> {
    if data.len() < HEADER_LEN {
        return Err(CatalogError::InvalidBundle(format!(
            "数据太短，无法解析: {} 字节",
            data.len()
        )));
    }

    if &data[0..MAGIC_BYTES.len()] != MAGIC_BYTES {
        return Err(CatalogError::InvalidBundle("魔数不匹配".to_string()));
    }

    let version_offset = MAGIC_BYTES.len();
    let version = [data[version_offset], data[version_offset + 1]];
    if version[0] > max_version {
        return Err(CatalogError::UnsupportedVersion {
            major: version[0],
            minor: version[1],
        });
    }

    Ok(version)
}

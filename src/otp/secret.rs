//! OTP 共享密钥模块
//!
//! 密钥是一段不可变的字节序列，附带一个 Base32 文本形式，
//! 仅在系统边界（配置 URI、手工录入）使用文本形式传输。
//!
//! 本库不负责生成或轮换密钥，密钥字节由调用方提供。
//! 算法设计者建议密钥至少 10 字节（80 位），但这里不做结构性强制，
//! 空密钥会在生成验证码时被拒绝。

use base32::{decode as base32_decode, encode as base32_encode, Alphabet};

use crate::error::{ParameterError, Result};

/// Base32 字母表：RFC 4648，无填充（认证器应用的通用约定）
const SECRET_ALPHABET: Alphabet = Alphabet::Rfc4648 { padding: false };

/// OTP 共享密钥
///
/// 构造后不可变。`raw` 参与 HMAC 计算，`base32` 只用于展示和 URI。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secret {
    /// 原始密钥字节
    pub raw: Vec<u8>,

    /// Base32 编码的密钥（用于显示和 URI）
    pub base32: String,
}

impl Secret {
    /// 从原始字节创建
    ///
    /// # Example
    ///
    /// ```rust
    /// use otprs::Secret;
    ///
    /// let secret = Secret::from_bytes(b"12345678901234567890".to_vec());
    /// assert_eq!(secret.base32, "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ");
    /// ```
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let base32 = base32_encode(SECRET_ALPHABET, &bytes);
        Self { raw: bytes, base32 }
    }

    /// 从 Base32 字符串创建
    ///
    /// 容忍用户录入时常见的空格和连字符，并忽略大小写。
    ///
    /// # Errors
    ///
    /// 输入无法按 RFC 4648 Base32 解码时返回
    /// [`ParameterError::InvalidBase32`]。
    pub fn from_base32(base32: &str) -> Result<Self> {
        let clean = base32.replace([' ', '-'], "").to_uppercase();
        let raw = base32_decode(SECRET_ALPHABET, &clean).ok_or(ParameterError::InvalidBase32)?;
        Ok(Self { raw, base32: clean })
    }
}

//! 统一错误类型模块
//!
//! 提供 otprs 库中所有操作的错误类型定义。
//!
//! 错误分为三类，调用方可以据此给出精确的诊断：
//!
//! - [`ParameterError`]：参数非法（位数越界、时间步长为零、空密钥等），
//!   在边界处立即拒绝，绝不静默修正。
//! - [`CodeError`]：待验证的验证码本身格式错误（包含非数字字符），
//!   与"验证码不匹配"（返回 `false`）严格区分。
//! - [`UriError`]：otpauth URI 格式错误或缺少必需字段。

use std::fmt;

/// otprs 库的统一结果类型
pub type Result<T> = std::result::Result<T, Error>;

/// otprs 库的错误类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// 参数错误
    Parameter(ParameterError),

    /// 验证码格式错误
    Code(CodeError),

    /// 配置 URI 错误
    Uri(UriError),
}

/// 参数相关错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    /// 验证码位数越界（必须在 1..=9 之间）
    ///
    /// 动态截断产生的是 31 位数值，10 位及以上的验证码不再增加熵，
    /// 因此按硬错误处理而不是静默截断。
    DigitsOutOfRange(u32),
    /// 时间步长为零
    ZeroTimeStep,
    /// 密钥为空
    EmptySecret,
    /// 密钥不是合法的 Base32 编码
    InvalidBase32,
    /// 签发者名称包含冒号（冒号是 URI 标签的分隔符）
    IssuerWithColon(String),
}

/// 验证码输入相关错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    /// 验证码包含非数字字符
    NonNumeric(String),
}

/// 配置 URI 相关错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    /// URI 整体不可解析，或 scheme/host 不是 otpauth://totp
    MalformedUri(String),
    /// 缺少必需字段（secret 或 account）
    MissingField(&'static str),
    /// algorithm 参数指定了 SHA1 以外的算法
    ///
    /// 本库的摘要算法固定为 SHA-1，静默替换会破坏与认证器应用的互操作。
    UnsupportedAlgorithm(String),
}

// ============================================================================
// Display 实现
// ============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parameter(e) => write!(f, "Parameter error: {}", e),
            Error::Code(e) => write!(f, "Code error: {}", e),
            Error::Uri(e) => write!(f, "URI error: {}", e),
        }
    }
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterError::DigitsOutOfRange(digits) => {
                write!(f, "digits must be between 1 and 9, got {}", digits)
            }
            ParameterError::ZeroTimeStep => write!(f, "time step must be positive"),
            ParameterError::EmptySecret => write!(f, "secret must not be empty"),
            ParameterError::InvalidBase32 => write!(f, "invalid base32 secret"),
            ParameterError::IssuerWithColon(issuer) => {
                write!(f, "issuer must not contain ':': {}", issuer)
            }
        }
    }
}

impl fmt::Display for CodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeError::NonNumeric(code) => {
                write!(f, "code must contain only decimal digits: {}", code)
            }
        }
    }
}

impl fmt::Display for UriError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UriError::MalformedUri(msg) => write!(f, "malformed otpauth URI: {}", msg),
            UriError::MissingField(field) => write!(f, "missing required field: {}", field),
            UriError::UnsupportedAlgorithm(alg) => {
                write!(f, "unsupported algorithm: {}", alg)
            }
        }
    }
}

// ============================================================================
// std::error::Error 实现
// ============================================================================

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl std::error::Error for ParameterError {}
impl std::error::Error for CodeError {}
impl std::error::Error for UriError {}

// ============================================================================
// From 实现 - 方便错误转换
// ============================================================================

impl From<ParameterError> for Error {
    fn from(err: ParameterError) -> Self {
        Error::Parameter(err)
    }
}

impl From<CodeError> for Error {
    fn from(err: CodeError) -> Self {
        Error::Code(err)
    }
}

impl From<UriError> for Error {
    fn from(err: UriError) -> Self {
        Error::Uri(err)
    }
}

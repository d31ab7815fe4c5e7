//! # otprs
//!
//! RFC 4226 / RFC 6238 一次性密码库。
//!
//! ## 功能特性
//!
//! - **HOTP 核心**: 符合 RFC 4226 的密钥散列截断算法
//! - **TOTP 生成与验证**: 符合 RFC 6238，毫秒级时钟漂移容忍窗口
//! - **配置 URI**: otpauth://totp URI 的构建与解析，兼容
//!   Google Authenticator、Authy 等应用
//! - **常量时间比较**: 验证码比对不泄露时序信息
//!
//! 摘要算法固定为 HMAC-SHA-1——这是认证器生态的互操作基线，
//! 本库刻意不提供更换摘要的开关。
//!
//! 所有操作都是无状态纯函数：时钟作为参数注入（`*_at` 方法），
//! 密钥的生成、存储以及验证尝试的限流都是调用方的职责。
//!
//! ## TOTP 示例
//!
//! ```rust
//! use otprs::{OtpParameters, Secret, TotpManager};
//!
//! // 从认证器应用通用的 Base32 形式恢复密钥
//! let secret = Secret::from_base32("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ").unwrap();
//!
//! let manager = TotpManager::new(OtpParameters::default());
//!
//! // 在固定时刻生成（Unix 时间 59 秒，RFC 6238 附录 B 的第一行）
//! let code = manager.generate_code_at(&secret, 59).unwrap();
//! assert_eq!(code, "287082");
//!
//! // 验证，容忍前后一个时间步
//! assert!(manager.verify_at(&secret, &code, 59_000, 30_000).unwrap());
//! ```
//!
//! ## 配置 URI 示例
//!
//! ```rust
//! use otprs::{OtpParameters, ProvisioningUri, Secret};
//!
//! let uri = ProvisioningUri::new(
//!     Secret::from_base32("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ").unwrap(),
//!     OtpParameters::default(),
//!     "alice@example.com",
//!     Some("Example App"),
//! )
//! .unwrap();
//!
//! // 交给二维码渲染器的字符串
//! let text = uri.to_uri();
//! assert!(text.starts_with("otpauth://totp/"));
//!
//! // 导入方向：从 URI 恢复密钥和参数
//! let imported = ProvisioningUri::parse(&text).unwrap();
//! assert_eq!(imported.account, "alice@example.com");
//! ```

pub mod error;
pub mod otp;

pub use error::{CodeError, Error, ParameterError, Result, UriError};

// ============================================================================
// OTP 相关导出
// ============================================================================

pub use otp::hotp;
pub use otp::secret::Secret;
pub use otp::totp::{counter_at, OtpParameters, TotpManager, TotpVerifyResult};
pub use otp::uri::ProvisioningUri;

//! 一次性密码 (OTP) 模块
//!
//! RFC 4226 / RFC 6238 算法族的实现。
//!
//! ## 组成
//!
//! - **secret**: 共享密钥及其 Base32 边界编码
//! - **hotp**: 基于计数器的核心算法（RFC 4226）
//! - **totp**: 基于时间的生成与验证（RFC 6238）
//! - **uri**: otpauth:// 配置 URI 编解码
//!
//! ## TOTP 示例
//!
//! ```rust
//! use otprs::{OtpParameters, Secret, TotpManager};
//!
//! let secret = Secret::from_base32("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ").unwrap();
//! let manager = TotpManager::new(OtpParameters::default());
//!
//! // 生成当前验证码，容忍前后 30 秒的时钟漂移验证
//! let code = manager.generate_code(&secret).unwrap();
//! let is_valid = manager.verify(&secret, &code, 30_000).unwrap();
//! assert!(is_valid);
//! ```

pub mod hotp;
pub mod secret;
pub mod totp;
pub mod uri;

pub use secret::Secret;
pub use totp::{OtpParameters, TotpManager, TotpVerifyResult};
pub use uri::ProvisioningUri;

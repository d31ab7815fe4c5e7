//! HOTP（基于计数器的一次性密码）核心模块
//!
//! 实现 RFC 4226 的密钥散列截断算法：计数器 + 密钥 → 固定宽度的十进制验证码。
//!
//! 摘要算法固定为 HMAC-SHA-1（160 位摘要）。这是与主流认证器应用互操作的
//! 前提，本模块刻意不提供更换摘要的开关。
//!
//! ## 示例
//!
//! ```rust
//! use otprs::{hotp, Secret};
//!
//! let secret = Secret::from_bytes(b"12345678901234567890".to_vec());
//!
//! // RFC 4226 附录 D 的第一个测试向量
//! let code = hotp::generate(&secret, 0, 6).unwrap();
//! assert_eq!(code, "755224");
//!
//! // 验证用户输入的码
//! assert!(hotp::verify(&secret, "755224", 0, 6).unwrap());
//! ```

use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;

use crate::error::{CodeError, ParameterError, Result};
use crate::otp::secret::Secret;

type HmacSha1 = Hmac<Sha1>;

/// 最小验证码位数
pub const MIN_DIGITS: u32 = 1;

/// 最大验证码位数
///
/// 动态截断产生的是 31 位数值（最大 2147483647），10 位及以上的验证码
/// 无法被完整覆盖，因此按参数错误拒绝。
pub const MAX_DIGITS: u32 = 9;

/// 校验验证码位数是否在 1..=9 之间
pub(crate) fn validate_digits(digits: u32) -> Result<()> {
    if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits) {
        return Err(ParameterError::DigitsOutOfRange(digits).into());
    }
    Ok(())
}

/// 生成 HOTP 验证码
///
/// # 参数
///
/// * `secret` - 共享密钥
/// * `counter` - 计数器值
/// * `digits` - 验证码位数（1..=9）
///
/// # 返回
///
/// 长度恰为 `digits` 的十进制字符串，不足位左侧补 `'0'`。
/// 前导零是语义的一部分，验证码不是一个数字。
///
/// # Errors
///
/// 空密钥返回 [`ParameterError::EmptySecret`]，
/// 位数越界返回 [`ParameterError::DigitsOutOfRange`]。
pub fn generate(secret: &Secret, counter: u64, digits: u32) -> Result<String> {
    validate_digits(digits)?;
    if secret.raw.is_empty() {
        return Err(ParameterError::EmptySecret.into());
    }

    // 计数器序列化为 8 字节大端无符号整数
    let mut mac = HmacSha1::new_from_slice(&secret.raw).expect("HMAC can take key of any size");
    mac.update(&counter.to_be_bytes());
    let hash = mac.finalize().into_bytes();

    // 动态截断：末字节低 4 位作为偏移量（0..=15），
    // 4 字节窗口 hash[offset..offset+4] 恒在 20 字节摘要之内
    let offset = (hash[19] & 0x0f) as usize;
    let binary = ((hash[offset] & 0x7f) as u32) << 24
        | (hash[offset + 1] as u32) << 16
        | (hash[offset + 2] as u32) << 8
        | (hash[offset + 3] as u32);

    // 取模得到指定位数的码
    let modulo = 10u32.pow(digits);
    let code = binary % modulo;

    // 左填充零
    Ok(format!("{:0width$}", code, width = digits as usize))
}

/// 验证 HOTP 验证码
///
/// 对给定计数器生成期望码并与 `candidate` 做常量时间比较。
/// 验证失败（码不匹配）返回 `Ok(false)` 而不是错误，
/// 只有输入本身非法才返回错误。
///
/// # Errors
///
/// `candidate` 包含非数字字符返回 [`CodeError::NonNumeric`]；
/// 密钥、位数的参数错误同 [`generate`]。
pub fn verify(secret: &Secret, candidate: &str, counter: u64, digits: u32) -> Result<bool> {
    if !candidate.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodeError::NonNumeric(candidate.to_string()).into());
    }

    let expected = generate(secret, counter, digits)?;
    if candidate.len() != expected.len() {
        return Ok(false);
    }

    Ok(constant_time_match(&expected, candidate))
}

/// 常量时间比较两个等长验证码
///
/// 期望码由密钥派生，普通字符串比较会泄露时序信息。
pub(crate) fn constant_time_match(expected: &str, candidate: &str) -> bool {
    expected.as_bytes().ct_eq(candidate.as_bytes()).into()
}

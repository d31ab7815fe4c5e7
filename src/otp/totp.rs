//! TOTP（基于时间的一次性密码）模块
//!
//! 实现 RFC 6238：把墙上时钟映射到计数器，再交给 HOTP 核心，
//! 验证时围绕"现在"扫描一个计数器窗口以容忍时钟漂移。
//! 与 Google Authenticator、Authy 等应用兼容。
//!
//! 时钟是注入的只读输入：每个操作都有 `*_at` 形式接受显式时刻，
//! 便于测试提供固定时间；不带 `_at` 的形式读取系统时钟。
//!
//! ## 示例
//!
//! ```rust
//! use otprs::{OtpParameters, Secret, TotpManager};
//!
//! let secret = Secret::from_base32("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ").unwrap();
//! let manager = TotpManager::new(OtpParameters::default());
//!
//! // 在固定时刻生成（Unix 时间 59 秒，计数器 1）
//! let code = manager.generate_code_at(&secret, 59).unwrap();
//! assert_eq!(code, "287082");
//!
//! // 零容忍验证同一时刻的码
//! assert!(manager.verify_at(&secret, &code, 59_000, 0).unwrap());
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{CodeError, ParameterError, Result};
use crate::otp::hotp;
use crate::otp::secret::Secret;

/// 默认验证码位数
pub const DEFAULT_DIGITS: u32 = 6;

/// 默认时间步长（秒）
pub const DEFAULT_TIME_STEP: u64 = 30;

/// TOTP 参数
///
/// 在构造时完成全部校验的不可变值对象：位数必须在 1..=9 之间，
/// 时间步长必须为正。构造之后没有任何修改入口。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpParameters {
    digits: u32,
    time_step: u64,
}

impl Default for OtpParameters {
    fn default() -> Self {
        Self {
            digits: DEFAULT_DIGITS,
            time_step: DEFAULT_TIME_STEP,
        }
    }
}

impl OtpParameters {
    /// 创建参数集
    ///
    /// # Errors
    ///
    /// 位数越界返回 [`ParameterError::DigitsOutOfRange`]，
    /// 时间步长为零返回 [`ParameterError::ZeroTimeStep`]。
    pub fn new(digits: u32, time_step: u64) -> Result<Self> {
        hotp::validate_digits(digits)?;
        if time_step == 0 {
            return Err(ParameterError::ZeroTimeStep.into());
        }
        Ok(Self { digits, time_step })
    }

    /// 验证码位数
    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// 时间步长（秒）
    pub fn time_step(&self) -> u64 {
        self.time_step
    }
}

/// 由时刻推导计数器
///
/// `counter = floor(unix_seconds / time_step)`。
/// 对固定的 `time_step`，计数器随时间单调不减。
///
/// # Errors
///
/// `time_step == 0` 返回 [`ParameterError::ZeroTimeStep`]。
pub fn counter_at(unix_seconds: u64, time_step: u64) -> Result<u64> {
    if time_step == 0 {
        return Err(ParameterError::ZeroTimeStep.into());
    }
    Ok(unix_seconds / time_step)
}

/// TOTP 验证结果
#[derive(Debug, Clone)]
pub struct TotpVerifyResult {
    /// 是否验证成功
    pub valid: bool,

    /// 匹配计数器相对当前计数器的偏移量
    /// （0 表示当前步，负数表示过去，正数表示未来；未匹配时为 0）
    pub counter_offset: i64,

    /// 本次验证使用的时刻（Unix 毫秒）
    pub checked_at: u64,
}

/// TOTP 管理器
///
/// 持有一份不可变参数，所有方法都是无状态的纯函数。
#[derive(Debug, Clone)]
pub struct TotpManager {
    params: OtpParameters,
}

impl TotpManager {
    /// 创建新的 TOTP 管理器
    pub fn new(params: OtpParameters) -> Self {
        Self { params }
    }

    /// 获取参数
    pub fn params(&self) -> &OtpParameters {
        &self.params
    }

    /// 生成当前时刻的验证码
    pub fn generate_code(&self, secret: &Secret) -> Result<String> {
        self.generate_code_at(secret, current_unix_millis() / 1000)
    }

    /// 生成指定时刻的验证码
    ///
    /// `unix_seconds` 是自 Unix 纪元起的整秒数。
    pub fn generate_code_at(&self, secret: &Secret, unix_seconds: u64) -> Result<String> {
        let counter = counter_at(unix_seconds, self.params.time_step)?;
        hotp::generate(secret, counter, self.params.digits)
    }

    /// 以当前时刻验证验证码
    ///
    /// `tolerance_millis` 为接受的前后时钟偏差（毫秒）。
    pub fn verify(&self, secret: &Secret, candidate: &str, tolerance_millis: u64) -> Result<bool> {
        self.verify_at(secret, candidate, current_unix_millis(), tolerance_millis)
    }

    /// 以指定时刻验证验证码
    ///
    /// `unix_millis` 是自 Unix 纪元起的毫秒数。
    /// 码不匹配返回 `Ok(false)`；只有输入非法才返回错误。
    pub fn verify_at(
        &self,
        secret: &Secret,
        candidate: &str,
        unix_millis: u64,
        tolerance_millis: u64,
    ) -> Result<bool> {
        let result = self.verify_with_result_at(secret, candidate, unix_millis, tolerance_millis)?;
        Ok(result.valid)
    }

    /// 以指定时刻验证验证码并返回详细结果
    ///
    /// `tolerance_millis == 0` 时只比较当前计数器的码；
    /// 否则扫描 `[now - tolerance, now + tolerance]` 覆盖到的每一个计数器，
    /// 首个匹配即成功。窗口放宽的同时重放接受窗口也随之变宽，
    /// 需要重放防护的调用方须另行跟踪"最近接受的计数器"。
    ///
    /// # Errors
    ///
    /// `candidate` 包含非数字字符返回 [`CodeError::NonNumeric`]，
    /// 这是调用方输入错误，与"码过期/不匹配"（`valid == false`）不同。
    pub fn verify_with_result_at(
        &self,
        secret: &Secret,
        candidate: &str,
        unix_millis: u64,
        tolerance_millis: u64,
    ) -> Result<TotpVerifyResult> {
        if !candidate.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CodeError::NonNumeric(candidate.to_string()).into());
        }

        let no_match = TotpVerifyResult {
            valid: false,
            counter_offset: 0,
            checked_at: unix_millis,
        };

        // 长度不符的码不可能匹配
        if candidate.len() != self.params.digits as usize {
            return Ok(no_match);
        }

        let current = counter_at(unix_millis / 1000, self.params.time_step)?;
        let (start, end) = if tolerance_millis == 0 {
            (current, current)
        } else {
            let earliest = unix_millis.saturating_sub(tolerance_millis) / 1000;
            let latest = unix_millis.saturating_add(tolerance_millis) / 1000;
            (
                counter_at(earliest, self.params.time_step)?,
                counter_at(latest, self.params.time_step)?,
            )
        };

        for counter in start..=end {
            let expected = hotp::generate(secret, counter, self.params.digits)?;
            if hotp::constant_time_match(&expected, candidate) {
                return Ok(TotpVerifyResult {
                    valid: true,
                    counter_offset: counter as i64 - current as i64,
                    checked_at: unix_millis,
                });
            }
        }

        Ok(no_match)
    }

    /// 获取当前验证码的剩余有效时间（秒）
    pub fn time_remaining(&self) -> u64 {
        self.time_remaining_at(current_unix_millis() / 1000)
    }

    /// 获取指定时刻验证码的剩余有效时间（秒）
    pub fn time_remaining_at(&self, unix_seconds: u64) -> u64 {
        self.params.time_step - (unix_seconds % self.params.time_step)
    }
}

/// 获取当前 Unix 时间戳（毫秒）
fn current_unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn rfc_secret() -> Secret {
        Secret::from_bytes(b"12345678901234567890".to_vec())
    }

    #[test]
    fn test_parameters_default() {
        let params = OtpParameters::default();
        assert_eq!(params.digits(), 6);
        assert_eq!(params.time_step(), 30);
    }

    #[test]
    fn test_parameters_validation() {
        assert!(OtpParameters::new(8, 60).is_ok());

        let err = OtpParameters::new(0, 30).unwrap_err();
        assert_eq!(err, Error::Parameter(ParameterError::DigitsOutOfRange(0)));

        let err = OtpParameters::new(10, 30).unwrap_err();
        assert_eq!(err, Error::Parameter(ParameterError::DigitsOutOfRange(10)));

        let err = OtpParameters::new(6, 0).unwrap_err();
        assert_eq!(err, Error::Parameter(ParameterError::ZeroTimeStep));
    }

    #[test]
    fn test_counter_at() {
        assert_eq!(counter_at(0, 30).unwrap(), 0);
        assert_eq!(counter_at(29, 30).unwrap(), 0);
        assert_eq!(counter_at(30, 30).unwrap(), 1);
        assert_eq!(counter_at(59, 30).unwrap(), 1);
        assert_eq!(counter_at(1_111_111_109, 30).unwrap(), 37_037_036);
    }

    #[test]
    fn test_counter_at_rejects_zero_step() {
        let err = counter_at(59, 0).unwrap_err();
        assert_eq!(err, Error::Parameter(ParameterError::ZeroTimeStep));
    }

    #[test]
    fn test_counter_monotonicity() {
        let mut last = 0;
        for t in (0..10_000).step_by(7) {
            let counter = counter_at(t, 30).unwrap();
            assert!(counter >= last, "Counter regressed at t={}", t);
            last = counter;
        }
    }

    // RFC 6238 附录 B 测试向量（SHA-1，8 位，30 秒步长）
    #[test]
    fn test_rfc6238_test_vectors() {
        let secret = rfc_secret();
        let manager = TotpManager::new(OtpParameters::new(8, 30).unwrap());

        let vectors: [(u64, &str); 6] = [
            (59, "94287082"),
            (1_111_111_109, "07081804"),
            (1_111_111_111, "14050471"),
            (1_234_567_890, "89005924"),
            (2_000_000_000, "69279037"),
            (20_000_000_000, "65353130"),
        ];

        for (timestamp, expected) in vectors {
            let code = manager.generate_code_at(&secret, timestamp).unwrap();
            assert_eq!(&code, expected, "Failed at timestamp {}", timestamp);
        }
    }

    #[test]
    fn test_self_verification_zero_tolerance() {
        let secret = rfc_secret();
        let manager = TotpManager::new(OtpParameters::default());

        for unix_seconds in [0u64, 59, 1_111_111_109, 2_000_000_000] {
            let code = manager.generate_code_at(&secret, unix_seconds).unwrap();
            assert!(
                manager
                    .verify_at(&secret, &code, unix_seconds * 1000, 0)
                    .unwrap(),
                "Self-verification failed at t={}",
                unix_seconds
            );
        }
    }

    #[test]
    fn test_window_boundary() {
        let secret = rfc_secret();
        let manager = TotpManager::new(OtpParameters::default());

        // 上一个时间步生成的码：t=60..=89 属于计数器 2，t=90 属于计数器 3
        let stale_code = manager.generate_code_at(&secret, 89).unwrap();

        // 零容忍拒绝
        assert!(!manager.verify_at(&secret, &stale_code, 90_000, 0).unwrap());

        // 容忍一个完整时间步后接受
        assert!(manager
            .verify_at(&secret, &stale_code, 90_000, 30_000)
            .unwrap());
    }

    #[test]
    fn test_future_code_within_tolerance() {
        let secret = rfc_secret();
        let manager = TotpManager::new(OtpParameters::default());

        // 客户端时钟快一个时间步
        let future_code = manager.generate_code_at(&secret, 120).unwrap();

        assert!(!manager.verify_at(&secret, &future_code, 90_000, 0).unwrap());
        assert!(manager
            .verify_at(&secret, &future_code, 90_000, 30_000)
            .unwrap());
    }

    #[test]
    fn test_verify_with_result_reports_offset() {
        let secret = rfc_secret();
        let manager = TotpManager::new(OtpParameters::default());

        let stale_code = manager.generate_code_at(&secret, 60).unwrap();
        let result = manager
            .verify_with_result_at(&secret, &stale_code, 95_000, 30_000)
            .unwrap();

        assert!(result.valid);
        assert_eq!(result.counter_offset, -1);
        assert_eq!(result.checked_at, 95_000);
    }

    #[test]
    fn test_verify_rejects_non_numeric_candidate() {
        let secret = rfc_secret();
        let manager = TotpManager::new(OtpParameters::default());

        let err = manager.verify_at(&secret, "12 456", 59_000, 0).unwrap_err();
        assert!(matches!(err, Error::Code(CodeError::NonNumeric(_))));
    }

    #[test]
    fn test_verify_wrong_length_is_no_match() {
        let secret = rfc_secret();
        let manager = TotpManager::new(OtpParameters::default());

        assert!(!manager.verify_at(&secret, "28708", 59_000, 0).unwrap());
        assert!(!manager.verify_at(&secret, "0287082", 59_000, 0).unwrap());
    }

    #[test]
    fn test_verify_wrong_code_is_plain_false() {
        // 错误但格式合法的码是 false，不是错误
        let secret = rfc_secret();
        let manager = TotpManager::new(OtpParameters::default());

        let code = manager.generate_code_at(&secret, 59).unwrap();
        let wrong = if code == "000000" { "000001" } else { "000000" };
        assert!(!manager.verify_at(&secret, wrong, 59_000, 0).unwrap());
    }

    #[test]
    fn test_tolerance_near_epoch_saturates() {
        // now - tolerance 下溢时饱和到 0 而不是回绕
        let secret = rfc_secret();
        let manager = TotpManager::new(OtpParameters::default());

        let code = manager.generate_code_at(&secret, 0).unwrap();
        assert!(manager.verify_at(&secret, &code, 10_000, 60_000).unwrap());
    }

    #[test]
    fn test_time_remaining_at() {
        let manager = TotpManager::new(OtpParameters::default());
        assert_eq!(manager.time_remaining_at(0), 30);
        assert_eq!(manager.time_remaining_at(29), 1);
        assert_eq!(manager.time_remaining_at(30), 30);
        assert_eq!(manager.time_remaining_at(59), 1);
    }

    #[test]
    fn test_generate_with_current_clock() {
        let secret = rfc_secret();
        let manager = TotpManager::new(OtpParameters::default());

        let code = manager.generate_code(&secret).unwrap();
        assert_eq!(code.len(), 6);
        assert!(manager.verify(&secret, &code, 0).unwrap());
    }
}

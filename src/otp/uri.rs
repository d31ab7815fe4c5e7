//! otpauth:// 配置 URI 编解码模块
//!
//! 构建和解析 `otpauth://totp/...` URI，用于把密钥和参数交给认证器应用
//! （通常再渲染成二维码，渲染本身不在本库范围内）。
//!
//! 格式：
//!
//! ```text
//! otpauth://totp/{issuer}:{account}?secret={base32}&digits={d}&period={s}&issuer={issuer}
//! ```
//!
//! 签发者存在时会同时出现在标签和查询参数里——两处只读其一的
//! 认证器应用都能拿到它。
//!
//! ## 示例
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
//! let text = uri.to_uri();
//! assert!(text.starts_with("otpauth://totp/Example%20App:alice%40example.com?"));
//!
//! // 解析回等价的值
//! let parsed = ProvisioningUri::parse(&text).unwrap();
//! assert_eq!(parsed, uri);
//! ```

use url::Url;

use crate::error::{ParameterError, Result, UriError};
use crate::otp::secret::Secret;
use crate::otp::totp::{OtpParameters, DEFAULT_DIGITS, DEFAULT_TIME_STEP};

/// URI scheme，固定为 otpauth
pub const SCHEME: &str = "otpauth";

/// URI host，固定为 totp（生态中另有 hotp 变体，不在本库范围内）
pub const HOST: &str = "totp";

/// otpauth://totp 配置 URI
///
/// 不可变值对象，只能通过 [`ProvisioningUri::new`] 或
/// [`ProvisioningUri::parse`] 构造，构造时完成全部校验。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningUri {
    /// 共享密钥
    pub secret: Secret,

    /// OTP 参数
    pub params: OtpParameters,

    /// 账户名（必需）
    pub account: String,

    /// 签发者名称（显示在认证器应用中）
    pub issuer: Option<String>,
}

impl ProvisioningUri {
    /// 创建配置 URI
    ///
    /// # Errors
    ///
    /// `account` 为空返回 [`UriError::MissingField`]；
    /// `issuer` 包含冒号返回 [`ParameterError::IssuerWithColon`]
    /// （冒号是标签里签发者和账户的分隔符）。
    pub fn new(
        secret: Secret,
        params: OtpParameters,
        account: impl Into<String>,
        issuer: Option<&str>,
    ) -> Result<Self> {
        let account = account.into();
        if account.is_empty() {
            return Err(UriError::MissingField("account").into());
        }
        if let Some(issuer) = issuer {
            if issuer.contains(':') {
                return Err(ParameterError::IssuerWithColon(issuer.to_string()).into());
            }
        }

        Ok(Self {
            secret,
            params,
            account,
            issuer: issuer.map(str::to_string),
        })
    }

    /// 生成 otpauth:// URI 字符串
    ///
    /// `digits` 和 `period` 总是显式输出，即使取默认值——
    /// 依赖消费方默认值会让同一份参数产生不同的 URI。
    pub fn to_uri(&self) -> String {
        let label = match &self.issuer {
            Some(issuer) => format!(
                "{}:{}",
                urlencoding::encode(issuer),
                urlencoding::encode(&self.account)
            ),
            None => urlencoding::encode(&self.account).into_owned(),
        };

        let mut uri = format!(
            "otpauth://totp/{}?secret={}&digits={}&period={}",
            label,
            self.secret.base32,
            self.params.digits(),
            self.params.time_step()
        );

        if let Some(ref issuer) = self.issuer {
            uri.push_str(&format!("&issuer={}", urlencoding::encode(issuer)));
        }

        uri
    }

    /// 解析 otpauth:// URI
    ///
    /// scheme 和 host 按 ASCII 大小写不敏感匹配；未知查询参数被忽略。
    /// 标签在百分号解码之前按第一个字面冒号拆成签发者和账户，
    /// 因此编码在账户内部的 `%3A` 不会被误认为分隔符。
    /// 查询参数 `issuer` 与标签派生的签发者不一致时，查询参数优先。
    ///
    /// # Errors
    ///
    /// - [`UriError::MalformedUri`]：整体不可解析、scheme 不是 `otpauth`、
    ///   host 不是 `totp`、`digits`/`period` 的值不是数字；
    /// - [`UriError::MissingField`]：缺少 `secret` 或账户为空;
    /// - [`UriError::UnsupportedAlgorithm`]：`algorithm` 参数不是 SHA1；
    /// - [`ParameterError`]：密钥不是合法 Base32、`digits`/`period` 越界。
    pub fn parse(uri: &str) -> Result<Self> {
        let url = Url::parse(uri).map_err(|e| UriError::MalformedUri(e.to_string()))?;

        if !url.scheme().eq_ignore_ascii_case(SCHEME) {
            return Err(UriError::MalformedUri(format!("scheme is not otpauth: {}", url.scheme())).into());
        }
        match url.host_str() {
            Some(host) if host.eq_ignore_ascii_case(HOST) => {}
            Some(host) => {
                return Err(UriError::MalformedUri(format!("host is not totp: {}", host)).into());
            }
            None => {
                return Err(UriError::MalformedUri("missing totp host".to_string()).into());
            }
        }

        let label = url.path().strip_prefix('/').unwrap_or(url.path());
        let (label_issuer, account) = match label.split_once(':') {
            Some((issuer, account)) => (Some(percent_decode(issuer)?), percent_decode(account)?),
            None => (None, percent_decode(label)?),
        };
        if account.is_empty() {
            return Err(UriError::MissingField("account").into());
        }

        let mut secret = None;
        let mut digits = DEFAULT_DIGITS;
        let mut period = DEFAULT_TIME_STEP;
        let mut query_issuer = None;

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "secret" => {
                    secret = Some(Secret::from_base32(&value)?);
                }
                "digits" => {
                    digits = value.parse().map_err(|_| {
                        UriError::MalformedUri(format!("invalid digits value: {}", value))
                    })?;
                }
                "period" => {
                    period = value.parse().map_err(|_| {
                        UriError::MalformedUri(format!("invalid period value: {}", value))
                    })?;
                }
                "algorithm" => {
                    // 摘要固定为 SHA-1，其它算法不能静默接受
                    if !value.eq_ignore_ascii_case("SHA1") {
                        return Err(UriError::UnsupportedAlgorithm(value.into_owned()).into());
                    }
                }
                "issuer" => {
                    query_issuer = Some(value.into_owned());
                }
                // 未知参数忽略，保持对第三方生成的 URI 宽容
                _ => {}
            }
        }

        let secret = secret.ok_or(UriError::MissingField("secret"))?;
        let params = OtpParameters::new(digits, period)?;

        // 查询参数里的签发者优先于标签派生的签发者
        let issuer = query_issuer.or(label_issuer).filter(|s| !s.is_empty());

        Self::new(secret, params, account, issuer.as_deref())
    }
}

/// 解码标签里的百分号编码段
fn percent_decode(segment: &str) -> Result<String> {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .map_err(|_| UriError::MalformedUri(format!("invalid percent-encoding: {}", segment)).into())
}

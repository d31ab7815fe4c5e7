//! TOTP 注册流程示例
//!
//! 展示服务端把密钥交给认证器应用、再验证用户输入的完整过程。
//!
//! 运行: cargo run --example enroll

use otprs::{OtpParameters, ProvisioningUri, Result, Secret, TotpManager};

fn main() -> Result<()> {
    println!("=== TOTP 注册流程 ===\n");

    // 1. 调用方提供密钥字节（生成与存储不在本库范围内，
    //    这里用固定字节演示）
    let secret = Secret::from_bytes(b"12345678901234567890".to_vec());
    println!("密钥 (Base32): {}", secret.base32);

    // 2. 构建配置 URI，交给二维码渲染器显示给用户
    let uri = ProvisioningUri::new(
        secret.clone(),
        OtpParameters::default(),
        "alice@example.com",
        Some("Example App"),
    )?;
    println!("配置 URI: {}\n", uri.to_uri());

    // 3. 认证器应用扫码导入，双方从此共享密钥和参数
    let imported = ProvisioningUri::parse(&uri.to_uri())?;
    println!("导入账户: {}", imported.account);
    if let Some(ref issuer) = imported.issuer {
        println!("导入签发者: {}", issuer);
    }

    // 4. 用户侧生成当前验证码
    let client = TotpManager::new(imported.params);
    let code = client.generate_code(&imported.secret)?;
    println!("\n当前验证码: {}", code);
    println!("剩余有效时间: {} 秒", client.time_remaining());

    // 5. 服务端验证，容忍前后一个时间步的时钟漂移
    let server = TotpManager::new(uri.params);
    let is_valid = server.verify(&secret, &code, 30_000)?;
    println!("验证结果: {}", if is_valid { "通过" } else { "拒绝" });

    Ok(())
}

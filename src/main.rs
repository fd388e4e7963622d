use clap::Parser;
use dldv_proofer::utils::{logger, validation::Validate};
use dldv_proofer::{ApplicantRecord, CliArgs, Proofer, ProoferConfig, StateIdProofer};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting dldv-proofer");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入配置
    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration error: {}", e);
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            std::process::exit(1);
        }
    };
    tracing::debug!("Config: {:?}", config);
    tracing::info!(
        "🔧 Endpoint: {}, cert mode: {}, timeout: {:?}, signing keys: {}",
        config.verification_endpoint(),
        config.cert_enabled,
        config.verification_timeout(),
        config.has_signing_keys()
    );

    // 載入申請人資料
    let applicant = match load_applicant(&args.applicant) {
        Ok(applicant) => applicant,
        Err(e) => {
            tracing::error!("❌ Applicant error: {}", e);
            eprintln!("❌ Failed to load applicant '{}': {}", args.applicant, e);
            std::process::exit(1);
        }
    };

    let proofer = StateIdProofer::new(Arc::new(config), args.auth_token.clone())?;

    // 執行驗證，結果以 JSON 輸出到 stdout
    match proofer.verify(&applicant).await {
        Ok(outcome) => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            if outcome.success {
                tracing::info!("✅ All attributes verified ({})", outcome.transaction_id);
            } else {
                tracing::warn!("⚠️ Verification incomplete: {}", outcome.reasons.join("; "));
                std::process::exit(2);
            }
        }
        Err(e) => {
            tracing::error!("❌ Verification failed: {}", e);
            eprintln!("❌ {}", e);
            // 配置或輸入錯誤回傳 1，驗證服務錯誤回傳 3
            let exit_code = if e.is_config_error() { 1 } else { 3 };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn load_config(path: &str) -> dldv_proofer::Result<ProoferConfig> {
    let config = ProoferConfig::from_file(path)?;
    config.validate()?;
    Ok(config)
}

fn load_applicant(path: &str) -> dldv_proofer::Result<ApplicantRecord> {
    let content = std::fs::read_to_string(path)?;
    let applicant: ApplicantRecord = serde_json::from_str(&content)?;
    applicant.validate()?;
    Ok(applicant)
}

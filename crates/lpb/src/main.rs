use std::sync::Arc;

use tracing::info;

use lpb_core::config::Config;
use lpb_gemini::GeminiClient;
use lpb_linkedin::LinkedInClient;

#[tokio::main]
async fn main() -> Result<(), lpb_core::Error> {
    lpb_core::logging::init("lpb")?;

    let cfg = Arc::new(Config::load()?);
    info!(
        owner_id = cfg.owner_id.0,
        downloads_dir = %cfg.downloads_dir.display(),
        "configuration loaded"
    );

    let ai = Arc::new(GeminiClient::new(cfg.gemini_api_key.clone())?);
    let publisher = Arc::new(LinkedInClient::new(
        cfg.linkedin_token.clone(),
        cfg.author_urn(),
    )?);

    lpb_telegram::router::run_polling(cfg, ai, publisher)
        .await
        .map_err(|e| lpb_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}

//! Application service: administrative cache purge.

use tracing::{info, warn};

use crate::application::ports::ProvisioningApi;
use crate::domain::Banner;

/// Ask the backend to purge its instance cache and describe the result.
pub async fn clear_cache(api: &impl ProvisioningApi) -> Banner {
    match api.clear_cache().await {
        Ok(resp) if resp.success => {
            info!("instance cache cleared");
            Banner::success(
                resp.message
                    .unwrap_or_else(|| "instance cache cleared".to_string()),
                None,
            )
        }
        Ok(resp) => Banner::failure(
            resp.message
                .unwrap_or_else(|| "the server refused to clear the cache".to_string()),
            None,
        ),
        Err(e) => {
            warn!(error = format!("{e:#}"), "clear-cache request failed");
            Banner::failure("could not reach the server to clear the cache", None)
        }
    }
}

use crate::agent::Agent;
use crate::error::{CrewError, Result};
use futures::future::join_all;
use std::collections::HashMap;
use std::time::Duration;
use tiny_skia::Pixmap;

/// HTTP client used for avatar downloads.
pub fn avatar_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("crew/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
}

async fn fetch_png(client: &reqwest::Client, url: &str) -> Result<Pixmap> {
    let bytes = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    Pixmap::decode_png(&bytes).map_err(|e| CrewError::Render(format!("avatar is not a PNG: {e}")))
}

/// Download every enriched agent's avatar concurrently, keyed by agent
/// identifier. Failures are logged and leave the entry out.
pub async fn load_avatars(agents: &[Agent], client: &reqwest::Client) -> HashMap<String, Pixmap> {
    let fetches = agents.iter().filter_map(|agent| {
        let persona = agent.persona.as_ref()?;
        Some(async move {
            let result = fetch_png(client, &persona.avatar_url).await;
            (agent.name.clone(), result)
        })
    });

    let mut avatars = HashMap::new();
    for (name, result) in join_all(fetches).await {
        match result {
            Ok(pixmap) => {
                avatars.insert(name, pixmap);
            }
            Err(e) => tracing::warn!(agent = %name, error = %e, "avatar download failed; using placeholder"),
        }
    }
    avatars
}

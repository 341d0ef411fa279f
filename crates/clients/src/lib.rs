//! Wrappers around the external services used by the plugins
//!
//! Each client takes its HTTP client (or binary path) at construction time so
//! the bot can share one proxy-aware `reqwest::Client` and tests can point the
//! clients at a mock server.

pub mod error;
pub mod translate;
pub mod weather;
pub mod youtube;

pub use error::{ClientError, ClientResult};
pub use translate::{Translation, Translator};
pub use weather::{WeatherApi, WeatherReport};
pub use youtube::{extract_video_id, video_url, Format, Quality, VideoInfo, YtDlp};

/// Build the shared HTTP client, optionally routed through `proxy`
pub fn http_client(proxy: Option<&str>) -> ClientResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("assistbot/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(std::time::Duration::from_secs(30));

    if let Some(proxy) = proxy {
        tracing::info!("Routing HTTP requests through proxy {}", proxy);
        builder = builder.proxy(reqwest::Proxy::all(proxy)?);
    }

    Ok(builder.build()?)
}

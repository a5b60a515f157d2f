//! Platform glue: future spawning, blocking alerts, and configuration
//! discovery (endpoint, API key, device catalog).
//!
//! The web build reads its configuration from the page's own URL, the way
//! the server-rendered dashboard did; the desktop build reads environment
//! variables instead:
//!
//! - `SENSORSCOPE_ENDPOINT` — graph backend URL
//! - `SENSORSCOPE_API_KEY` — forwarded as `X-API-Key`
//! - `SENSORSCOPE_DEVICES` — comma-separated `id:display name` pairs

/// A selectable device as advertised by the deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceEntry {
    pub id: String,
    pub display_name: String,
}

/// Run a future on the UI runtime.
pub fn spawn_future(fut: impl std::future::Future<Output = ()> + 'static) {
    #[cfg(target_arch = "wasm32")]
    wasm_bindgen_futures::spawn_local(fut);

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = dioxus::prelude::spawn(fut);
    }
}

/// Blocking user notification for input-validation failures.
pub fn alert(message: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("[sensorscope] {message}");
}

/// URL the graph POST goes to.
pub fn endpoint_url() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        // The dashboard posts back to its own URL; the backend multiplexes
        // GET (page) and POST (data) on one route.
        web_sys::window()
            .and_then(|window| window.location().href().ok())
            .unwrap_or_default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        std::env::var("SENSORSCOPE_ENDPOINT")
            .unwrap_or_else(|_| "http://127.0.0.1:9000/graphs".to_string())
    }
}

/// API key forwarded with every request; empty string when not configured.
pub fn api_key() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        query_param("api_key").unwrap_or_default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        std::env::var("SENSORSCOPE_API_KEY").unwrap_or_default()
    }
}

/// Devices offered as checkboxes.
pub fn device_catalog() -> Vec<DeviceEntry> {
    let configured = {
        #[cfg(target_arch = "wasm32")]
        {
            query_param("devices")
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            std::env::var("SENSORSCOPE_DEVICES").ok()
        }
    };

    let catalog = configured
        .as_deref()
        .map(parse_catalog)
        .unwrap_or_default();
    if catalog.is_empty() {
        default_catalog()
    } else {
        catalog
    }
}

fn default_catalog() -> Vec<DeviceEntry> {
    vec![DeviceEntry {
        id: "displaydev".to_string(),
        display_name: "Display Device".to_string(),
    }]
}

/// Parse `id:display,id2:display2`; a bare `id` doubles as its own label.
fn parse_catalog(raw: &str) -> Vec<DeviceEntry> {
    raw.split(',')
        .filter_map(|chunk| {
            let chunk = chunk.trim();
            if chunk.is_empty() {
                return None;
            }
            let (id, display) = match chunk.split_once(':') {
                Some((id, display)) => (id.trim(), display.trim()),
                None => (chunk, chunk),
            };
            if id.is_empty() {
                return None;
            }
            Some(DeviceEntry {
                id: id.to_string(),
                display_name: if display.is_empty() { id } else { display }.to_string(),
            })
        })
        .collect()
}

#[cfg(target_arch = "wasm32")]
fn query_param(name: &str) -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
    params.get(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_parses_pairs_and_bare_ids() {
        let parsed = parse_catalog("kitchen:Kitchen Node, esp32-1 ,:, ,attic: ");
        assert_eq!(
            parsed,
            vec![
                DeviceEntry {
                    id: "kitchen".to_string(),
                    display_name: "Kitchen Node".to_string(),
                },
                DeviceEntry {
                    id: "esp32-1".to_string(),
                    display_name: "esp32-1".to_string(),
                },
                DeviceEntry {
                    id: "attic".to_string(),
                    display_name: "attic".to_string(),
                },
            ]
        );
    }

    #[test]
    fn empty_configuration_falls_back_to_the_default_device() {
        assert!(parse_catalog("").is_empty());
        let fallback = default_catalog();
        assert_eq!(fallback.len(), 1);
        assert_eq!(fallback[0].id, "displaydev");
    }
}

//! Filter form, fetch orchestration, and chart-area state.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use dioxus::prelude::*;
use futures_channel::mpsc::UnboundedSender;
use futures_util::StreamExt;

use crate::core::format;
use crate::core::http::{GraphClient, GraphQuery};
use crate::core::metric;
use crate::core::platform::{self, DeviceEntry};
use crate::core::series::{GraphResponse, SeriesSet};
use crate::graph::plot::Plot;

/// What the chart area currently shows.
#[derive(Debug, Clone, PartialEq)]
enum GraphStatus {
    Idle,
    Loading,
    /// Fully formatted user-facing message, transport and business errors
    /// alike.
    Failed(String),
    Empty,
    Ready(SeriesSet),
}

#[derive(Debug, Clone)]
enum GraphEvent {
    Generate,
    Outcome {
        generation: u64,
        result: Result<GraphResponse, String>,
    },
}

/// The whole dashboard minus the page chrome: date range, metric and device
/// pickers, the generate trigger, and the chart area.
///
/// Requests carry a generation counter. Only the outcome matching the most
/// recently issued generation is applied; anything older is dropped, so two
/// overlapping clicks cannot leave a stale chart behind the newer one.
#[component]
pub fn GraphPanel(devices: Vec<DeviceEntry>) -> Element {
    let defaults = use_hook(format::default_range);
    let (default_start, default_end) = defaults;
    let mut start = use_signal(|| default_start.clone());
    let mut end = use_signal(|| default_end.clone());
    let mut metric = use_signal(|| metric::DEFAULT_METRIC.to_string());
    let initial_selection: HashSet<String> =
        devices.first().map(|entry| entry.id.clone()).into_iter().collect();
    let selected = use_signal(move || initial_selection);
    let busy = use_signal(|| false);
    let status = use_signal(|| GraphStatus::Idle);

    let client = use_hook(GraphClient::from_environment);
    let catalog_ids: Vec<String> = devices.iter().map(|entry| entry.id.clone()).collect();

    let sender_slot: Rc<RefCell<Option<UnboundedSender<GraphEvent>>>> =
        Rc::new(RefCell::new(None));
    let sender_slot_for_loop = sender_slot.clone();

    let coroutine = {
        let client = client.clone();
        let catalog_ids = catalog_ids.clone();
        let start_ref = start.clone();
        let end_ref = end.clone();
        let metric_ref = metric.clone();
        let selected_ref = selected.clone();
        let busy_ref = busy.clone();
        let status_ref = status.clone();

        use_coroutine(move |mut rx: UnboundedReceiver<GraphEvent>| {
            let sender_slot = sender_slot_for_loop.clone();
            let client = client.clone();
            let catalog_ids = catalog_ids.clone();
            let start_signal = start_ref.clone();
            let end_signal = end_ref.clone();
            let metric_signal = metric_ref.clone();
            let selected_signal = selected_ref.clone();
            let mut busy_signal = busy_ref.clone();
            let mut status_signal = status_ref.clone();

            async move {
                let mut latest_generation: u64 = 0;

                while let Some(event) = rx.next().await {
                    match event {
                        GraphEvent::Generate => {
                            let start_value = start_signal();
                            let end_value = end_signal();
                            let metric_value = metric_signal();
                            let chosen = selected_signal();
                            let picked: Vec<String> = catalog_ids
                                .iter()
                                .filter(|id| chosen.contains(*id))
                                .cloned()
                                .collect();

                            if let Err(message) =
                                validate_inputs(&start_value, &end_value, picked.len())
                            {
                                platform::alert(&message);
                                continue;
                            }

                            latest_generation += 1;
                            let generation = latest_generation;
                            busy_signal.set(true);
                            status_signal.set(GraphStatus::Loading);

                            let query = match GraphQuery::from_form(
                                &start_value,
                                &end_value,
                                &metric_value,
                                picked,
                            ) {
                                Ok(query) => query,
                                Err(message) => {
                                    status_signal.set(GraphStatus::Failed(format!(
                                        "Error fetching data: {message}"
                                    )));
                                    busy_signal.set(false);
                                    continue;
                                }
                            };

                            if let Some(sender) = sender_slot.borrow().as_ref().cloned() {
                                let client = client.clone();
                                platform::spawn_future(async move {
                                    let result = client.fetch_readings(&query).await;
                                    let _ = sender
                                        .unbounded_send(GraphEvent::Outcome { generation, result });
                                });
                            }
                        }
                        GraphEvent::Outcome { generation, result } => {
                            if generation != latest_generation {
                                // A newer request owns the chart area.
                                #[cfg(debug_assertions)]
                                println!(
                                    "[graph] dropping stale response {generation} (latest {latest_generation})"
                                );
                                continue;
                            }
                            busy_signal.set(false);
                            status_signal.set(apply_outcome(result));
                        }
                    }
                }
            }
        })
    };

    sender_slot.borrow_mut().replace(coroutine.tx());

    let current_status = status();

    rsx! {
        div { class: "graph-panel",
            div { class: "controls",
                div { class: "control-group",
                    label { r#for: "start-date", "Start Date" }
                    input {
                        r#type: "datetime-local",
                        id: "start-date",
                        value: "{start()}",
                        oninput: move |evt| start.set(evt.value()),
                    }
                }
                div { class: "control-group",
                    label { r#for: "end-date", "End Date" }
                    input {
                        r#type: "datetime-local",
                        id: "end-date",
                        value: "{end()}",
                        oninput: move |evt| end.set(evt.value()),
                    }
                }
                div { class: "control-group",
                    label { r#for: "metric", "Metric" }
                    select {
                        id: "metric",
                        onchange: move |evt| metric.set(evt.value()),
                        for (key, name) in metric::METRIC_OPTIONS.iter() {
                            option { value: "{key}", selected: metric() == *key, "{name}" }
                        }
                    }
                }
                div { class: "control-group control-group--devices",
                    span { class: "control-group__title", "Devices" }
                    div { class: "device-checkboxes",
                        for entry in devices.iter() {
                            {device_checkbox(entry, selected)}
                        }
                    }
                }
                button {
                    r#type: "button",
                    id: "generate-graph",
                    class: "button button--primary",
                    disabled: busy(),
                    onclick: move |_| coroutine.send(GraphEvent::Generate),
                    "Generate Graph"
                }
            }

            {render_chart_area(&current_status)}
        }
    }
}

fn device_checkbox(entry: &DeviceEntry, mut selected: Signal<HashSet<String>>) -> Element {
    let id = entry.id.clone();
    let checked = selected().contains(&entry.id);
    rsx! {
        div { class: "device-checkbox",
            input {
                r#type: "checkbox",
                name: "device",
                id: "{entry.id}",
                value: "{entry.id}",
                checked: checked,
                onchange: move |evt: Event<FormData>| {
                    let enabled = evt.checked();
                    selected.with_mut(|set| {
                        if enabled {
                            set.insert(id.clone());
                        } else {
                            set.remove(&id);
                        }
                    });
                },
            }
            label { r#for: "{entry.id}", "{entry.display_name}" }
        }
    }
}

fn render_chart_area(status: &GraphStatus) -> Element {
    match status {
        GraphStatus::Idle => rsx! {
            div { id: "chart", class: "chart",
                p { class: "chart__hint", "Pick a range and press Generate Graph." }
            }
        },
        GraphStatus::Loading => rsx! {
            div { id: "chart", class: "chart",
                div { class: "loading", "Loading data..." }
            }
        },
        GraphStatus::Failed(message) => rsx! {
            div { id: "chart", class: "chart",
                div { class: "error", "{message}" }
            }
        },
        GraphStatus::Empty => rsx! {
            div { id: "chart", class: "chart",
                div { class: "loading", "No data found for the selected criteria" }
            }
        },
        GraphStatus::Ready(set) => rsx! {
            Plot { set: set.clone() }
        },
    }
}

/// Presence checks only; range sanity is the backend's call.
fn validate_inputs(start: &str, end: &str, selected_count: usize) -> Result<(), String> {
    if start.trim().is_empty() || end.trim().is_empty() {
        return Err("Please select both start and end dates".to_string());
    }
    if selected_count == 0 {
        return Err("Please select at least one device".to_string());
    }
    Ok(())
}

/// Map a finished request onto the chart-area state.
fn apply_outcome(result: Result<GraphResponse, String>) -> GraphStatus {
    match result {
        Err(message) => GraphStatus::Failed(format!("Error fetching data: {message}")),
        Ok(envelope) if !envelope.success => {
            let reason = envelope.error.as_deref().unwrap_or("Unknown error");
            GraphStatus::Failed(format!("Error: {reason}"))
        }
        Ok(envelope) => {
            let set = SeriesSet::from_response(&envelope);
            if set.is_empty() {
                GraphStatus::Empty
            } else {
                GraphStatus::Ready(set)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::series::Reading;

    #[test]
    fn missing_dates_abort_before_any_request() {
        let message = validate_inputs("", "2024-01-02T00:00", 1).unwrap_err();
        assert_eq!(message, "Please select both start and end dates");
        let message = validate_inputs("2024-01-01T00:00", "  ", 1).unwrap_err();
        assert_eq!(message, "Please select both start and end dates");
    }

    #[test]
    fn zero_selected_devices_abort_before_any_request() {
        let message = validate_inputs("2024-01-01T00:00", "2024-01-02T00:00", 0).unwrap_err();
        assert_eq!(message, "Please select at least one device");
    }

    #[test]
    fn complete_inputs_validate() {
        assert!(validate_inputs("2024-01-01T00:00", "2024-01-02T00:00", 2).is_ok());
    }

    #[test]
    fn transport_errors_use_the_fetch_prefix() {
        let status = apply_outcome(Err("connection refused".to_string()));
        assert_eq!(
            status,
            GraphStatus::Failed("Error fetching data: connection refused".to_string())
        );
    }

    #[test]
    fn business_errors_use_the_server_reason() {
        let envelope = GraphResponse {
            success: false,
            error: Some("bad range".to_string()),
            metric: String::new(),
            data: Vec::new(),
        };
        assert_eq!(
            apply_outcome(Ok(envelope)),
            GraphStatus::Failed("Error: bad range".to_string())
        );
    }

    #[test]
    fn business_errors_without_reason_fall_back() {
        let envelope = GraphResponse {
            success: false,
            error: None,
            metric: String::new(),
            data: Vec::new(),
        };
        assert_eq!(
            apply_outcome(Ok(envelope)),
            GraphStatus::Failed("Error: Unknown error".to_string())
        );
    }

    #[test]
    fn successful_empty_payload_shows_the_empty_state() {
        let envelope = GraphResponse {
            success: true,
            error: None,
            metric: "temperature".to_string(),
            data: Vec::new(),
        };
        assert_eq!(apply_outcome(Ok(envelope)), GraphStatus::Empty);

        let all_empty = GraphResponse {
            success: true,
            error: None,
            metric: "temperature".to_string(),
            data: vec![("esp32-1".to_string(), Vec::new())],
        };
        assert_eq!(apply_outcome(Ok(all_empty)), GraphStatus::Empty);
    }

    #[test]
    fn successful_payload_becomes_ready() {
        let envelope = GraphResponse {
            success: true,
            error: None,
            metric: "temperature".to_string(),
            data: vec![(
                "esp32-1".to_string(),
                vec![Reading {
                    timestamp: "2024-01-01T12:00:00Z".to_string(),
                    value: 21.5,
                    device_name: "bme280".to_string(),
                }],
            )],
        };
        match apply_outcome(Ok(envelope)) {
            GraphStatus::Ready(set) => assert_eq!(set.point_count(), 1),
            other => panic!("expected Ready, got {other:?}"),
        }
    }
}

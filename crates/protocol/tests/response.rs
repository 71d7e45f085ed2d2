use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use pipower_protocol::*;

fn sample_response() -> PowerUsageResponse {
    PowerUsageResponse {
        power_usage: 3.75,
        throttled_state: Some("0x50000".to_string()),
        core_voltage: Some(0.85),
        sdram_c_voltage: Some(1.1),
        sdram_i_voltage: Some(1.1),
        sdram_p_voltage: Some(1.1),
        cpu_frequency_mhz: Some(1500.0),
        cpu_temperature: Some(42.8),
    }
}

#[test]
fn keys_are_serialized_in_contract_order() {
    let json = sample_response().to_json().unwrap();

    let expected_order = [
        "power_usage",
        "throttled_state",
        "core_voltage",
        "sdram_c_voltage",
        "sdram_i_voltage",
        "sdram_p_voltage",
        "cpu_frequency_mhz",
        "cpu_temperature",
    ];

    let positions: Vec<usize> = expected_order
        .iter()
        .map(|key| {
            json.find(&format!("\"{}\"", key))
                .unwrap_or_else(|| panic!("missing key {key} in {json}"))
        })
        .collect();

    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
}

#[test]
fn unavailable_readings_serialize_as_null() {
    let response = PowerUsageResponse {
        core_voltage: None,
        cpu_temperature: None,
        throttled_state: None,
        ..sample_response()
    };

    let value: Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();

    assert_eq!(
        value,
        json!({
            "power_usage": 3.75,
            "throttled_state": null,
            "core_voltage": null,
            "sdram_c_voltage": 1.1,
            "sdram_i_voltage": 1.1,
            "sdram_p_voltage": 1.1,
            "cpu_frequency_mhz": 1500.0,
            "cpu_temperature": null,
        })
    );
}

#[test]
fn response_parses_back_from_json() {
    let json = r#"{
        "power_usage": 4.2,
        "throttled_state": "0x0",
        "core_voltage": 0.8625,
        "sdram_c_voltage": null,
        "sdram_i_voltage": null,
        "sdram_p_voltage": null,
        "cpu_frequency_mhz": 600.0,
        "cpu_temperature": 51.1
    }"#;

    let response = PowerUsageResponse::from_json(json).unwrap();

    assert_eq!(response.power_usage, 4.2);
    assert_eq!(response.throttled_state.as_deref(), Some("0x0"));
    assert_eq!(response.sdram_c_voltage, None);
    assert_eq!(response.cpu_temperature, Some(51.1));
}

#[test]
fn error_response_has_single_error_key() {
    let value = serde_json::to_value(ErrorResponse::new("cpu usage unavailable")).unwrap();
    assert_eq!(value, json!({ "error": "cpu usage unavailable" }));
}

#[test]
fn power_usage_path_is_rooted() {
    assert_eq!(POWER_USAGE_PATH, "/power_usage");
}

// crates/eol-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example station configuration.
// Purpose: Deterministic starting point for new station installs.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The example mirrors a production EOL station: traceability enabled over
//! plain http on the plant network, the power-on prompt, the subnet scan,
//! an ADB connection, and four application checks. It is validated by the
//! crate tests so it never drifts from the model.

/// Returns a canonical example `eol-station.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[station]
name = "EOL-01"
process = "EOL"
part_number = "PN-4410-200"
serial_length = 30
operator_timeout_minutes = 30

[traceability]
enabled = true
base_url = "http://trace.plant.local/TraceService.asmx"
allow_http = true
timeout_ms = 10000
max_response_bytes = 65536

[traceability.alternate_types]
imei = 1
iccid = 2

[sequence]
steps = ["system_start", "network_scan", "adb_connect", "wifi", "lte_modem_configuration", "download_v4app", "vdu_config"]
limits_file = "settings/limits.csv"

[prompts]
power_on_image = "images/power_on.png"

[network]
first = "192.168.17.101"
last = "192.168.17.249"
workers = 20
ping_timeout_ms = 1000

[adb]
program = "adb"
port = 5555
timeout_ms = 10000

[checks.wifi]
args = ["shell", "dumpsys", "wifi"]
expect = "Wi-Fi is enabled"
capture = 'rssi[:=]\s*(-?\d+)'

[checks.lte_modem_configuration]
args = ["shell", "service", "call", "iphonesubinfo", "1"]
capture = '(\d{15})'
alternate = "imei"

[checks.download_v4app]
args = ["install", "-r", "apps/v4app.apk"]
expect = "Success"

[checks.vdu_config]
args = ["shell", "getprop", "persist.vdu.config"]
capture = '^(\S+)'

[history]
dir = "history"

[logging]
level = "info"
dir = "app_log"
max_file_bytes = 26214400
backups = 10
"#,
    )
}

//! Default config file template, written on first run.

/// Documented default `config.toml`. Every value shown matches the
/// built-in default, so uncommenting a line changes nothing until the
/// value is edited.
pub fn default_config_toml() -> &'static str {
    r##"# skipper configuration
#
# Fill in the two application paths; everything else is optional.

[apps.primary]
# Executable launched first (e.g. the operator control application).
path = ""
# args = []
# Monitor index (0-based, enumeration order) to place its window on.
# monitor = 1

[apps.secondary]
# Executable that exposes the TCP service the viewer connects to.
path = ""
# args = []

[service]
# host = "127.0.0.1"
# port = 5000
# URL the viewer opens; empty derives http://{host}:{port}/
# url = ""
# wait_timeout_secs = 30
# poll_interval_ms = 500
# post_ready_delay_ms = 1000

[viewer]
# Preferred browsers in order: "edge", "chrome", "chromium", "firefox".
# Empty tries the built-in order, then the system default handler.
# browsers = []
# monitor = 2
# app_mode = true
# profile_dir = ""

[placement]
# max_attempts = 20
# retry_delay_ms = 500
# search_timeout_secs = 20
# search_poll_ms = 250
# ancestry_max_depth = 8

[shutdown]
# grace_timeout_secs = 5

[logging]
# level = "INFO"
"##
}

use super::*;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = load_settings_from(None, no_env);
    assert_eq!(settings, ClientSettings::default());
    assert_eq!(settings.notification_delay(), Duration::from_secs(3));
}

#[test]
fn file_values_override_defaults() {
    let raw = r#"
server_url = "https://roster.example.com"
notification_delay_ms = "1500"
request_timeout_secs = "not-a-number"
"#;
    let settings = load_settings_from(Some(raw), no_env);
    assert_eq!(settings.server_url, "https://roster.example.com");
    assert_eq!(settings.notification_delay_ms, 1500);
    assert_eq!(settings.request_timeout_secs, 10);
}

#[test]
fn env_wins_over_file_and_app_prefix_wins_last() {
    let raw = r#"server_url = "https://file.example.com""#;
    let settings = load_settings_from(Some(raw), |key| match key {
        "ROSTER_SERVER_URL" => Some("https://env.example.com".into()),
        "APP__SERVER_URL" => Some("https://app.example.com".into()),
        "APP__REQUEST_TIMEOUT_SECS" => Some("2".into()),
        _ => None,
    });
    assert_eq!(settings.server_url, "https://app.example.com");
    assert_eq!(settings.request_timeout(), Duration::from_secs(2));
}

#[test]
fn server_url_is_trimmed_and_scheme_checked() {
    let url = parse_server_url(" http://localhost:3000/api/ ").expect("valid url");
    assert_eq!(url.as_str(), "http://localhost:3000/api");

    let err = parse_server_url("ftp://localhost").expect_err("must reject ftp");
    assert!(err.to_string().contains("http://"));
    assert!(parse_server_url("not a url").is_err());
}

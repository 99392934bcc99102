use std::{collections::HashMap, time::Duration};

use lyricist::config::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

const REQUIRED: [(&str, &str); 3] = [
    (SPOTIFY_API_AUTH_CLIENT_ID, "client-id"),
    (SPOTIFY_API_AUTH_CLIENT_SECRET, "client-secret"),
    (LYRICIST_KEY, "encryption secret"),
];

fn with_required(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
    let mut pairs = REQUIRED.to_vec();
    pairs.extend_from_slice(extra);
    pairs
}

#[test]
fn test_defaults() {
    let settings = Settings::from_lookup(lookup_from(&REQUIRED)).unwrap();

    assert_eq!(settings.server_addr.to_string(), "127.0.0.1:8080");
    assert_eq!(settings.session_ttl, Duration::from_secs(900));
    assert_eq!(settings.cache_capacity.get(), 100);
    assert_eq!(settings.store_url, None);
    assert_eq!(settings.store_timeout, Duration::from_millis(2000));
    assert_eq!(settings.upstream_timeout, Duration::from_millis(10_000));
    assert!(!settings.secure_cookies);
    assert_eq!(settings.spotify.client_id, "client-id");
    assert_eq!(settings.spotify.redirect_uri, "http://localhost:8080/callback");
    assert_eq!(
        settings.spotify.auth_url.as_str(),
        "https://accounts.spotify.com/authorize"
    );
    assert_eq!(settings.lyrics_api_url.as_str(), "https://lrclib.net/");
}

#[test]
fn test_missing_required_values() {
    for (missing, _) in REQUIRED {
        let pairs: Vec<_> = REQUIRED
            .iter()
            .copied()
            .filter(|(name, _)| *name != missing)
            .collect();
        let result = Settings::from_lookup(lookup_from(&pairs));
        assert_eq!(result.err(), Some(ConfigError::Missing(missing)));
    }
}

#[test]
fn test_empty_value_counts_as_missing() {
    let pairs = [
        (SPOTIFY_API_AUTH_CLIENT_ID, "client-id"),
        (SPOTIFY_API_AUTH_CLIENT_SECRET, "client-secret"),
        (LYRICIST_KEY, "  "),
    ];
    let result = Settings::from_lookup(lookup_from(&pairs));
    assert_eq!(result.err(), Some(ConfigError::Missing(LYRICIST_KEY)));
}

#[test]
fn test_overrides() {
    let pairs = with_required(&[
        (SERVER_ADDRESS, "0.0.0.0:9000"),
        (LYRICIST_SESSION_TTL, "60"),
        (LYRICIST_CACHE_CAPACITY, "2"),
        (LYRICIST_STORE_URL, "redis://127.0.0.1:6379/0"),
        (LYRICIST_SECURE_COOKIES, "true"),
        (SPOTIFY_API_URL, "http://localhost:1234/v1"),
    ]);
    let settings = Settings::from_lookup(lookup_from(&pairs)).unwrap();

    assert_eq!(settings.server_addr.port(), 9000);
    assert_eq!(settings.session_ttl, Duration::from_secs(60));
    assert_eq!(settings.cache_capacity.get(), 2);
    assert_eq!(
        settings.store_url.as_deref(),
        Some("redis://127.0.0.1:6379/0")
    );
    assert!(settings.secure_cookies);
    assert_eq!(settings.spotify.api_url.as_str(), "http://localhost:1234/v1");
}

#[test]
fn test_invalid_values() {
    let cases = [
        (SERVER_ADDRESS, "not an address"),
        (LYRICIST_SESSION_TTL, "0"),
        (LYRICIST_SESSION_TTL, "soon"),
        (LYRICIST_CACHE_CAPACITY, "0"),
        (LYRICIST_CACHE_CAPACITY, "-3"),
        (LYRICIST_STORE_TIMEOUT_MS, "0"),
        (LYRICIST_SECURE_COOKIES, "maybe"),
        (SPOTIFY_API_TOKEN_URL, "not a url"),
    ];

    for (name, value) in cases {
        let pairs = with_required(&[(name, value)]);
        match Settings::from_lookup(lookup_from(&pairs)) {
            Err(ConfigError::Invalid { name: reported, .. }) => assert_eq!(reported, name),
            other => panic!("{name}={value:?} should be invalid, got {:?}", other.map(|_| ())),
        }
    }
}

#[test]
fn test_debug_redacts_secrets() {
    let pairs = with_required(&[(LYRICIST_STORE_URL, "redis://:hunter2@localhost/")]);
    let settings = Settings::from_lookup(lookup_from(&pairs)).unwrap();
    let debug = format!("{:?}", settings);

    assert!(!debug.contains("client-secret"));
    assert!(!debug.contains("encryption secret"));
    assert!(!debug.contains("hunter2"));
    assert!(debug.contains("client-id"));
}

use subconscious_chat::client::{ configured_base_url, ChatClient, BASE_URL_ENV, DEFAULT_BASE_URL };

// Kept as the only test in this binary: the base URL is read once per process.
#[test]
fn from_env_without_base_url_targets_local_default() {
    std::env::remove_var(BASE_URL_ENV);

    let client = ChatClient::from_env();

    assert_eq!(configured_base_url(), DEFAULT_BASE_URL);
    assert_eq!(client.chat_url(), "http://localhost:5001/api/chat");
    assert_eq!(client.health_url(), "http://localhost:5001/health");
}

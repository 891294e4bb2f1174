#![allow(dead_code)]

pub mod mock_gemini;

use gemwire_llm::GeminiClient;

use self::mock_gemini::MockGemini;

/// API key the harness client sends
pub const TEST_API_KEY: &str = "test-key-123";

/// Client pointed at a running mock
pub fn client_for(mock: &MockGemini) -> GeminiClient {
    let base_url = url::Url::parse(&mock.base_url()).expect("mock base URL is valid");
    GeminiClient::new(TEST_API_KEY.to_owned()).with_base_url(base_url)
}

//! DTOs for decoding Visual Crossing error bodies.
//!
//! Success bodies decode straight into the domain's `RawWeatherPayload`, which
//! keeps unknown fields so the cached record matches the provider's.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct ProviderErrorDto {
    #[serde(default)]
    pub(super) message: Option<String>,
}

impl ProviderErrorDto {
    /// Provider-supplied message when the body is JSON with a usable
    /// `message` field.
    pub(super) fn message_from(body: &[u8]) -> Option<String> {
        let dto: Self = serde_json::from_slice(body).ok()?;
        dto.message
            .map(|message| message.trim().to_owned())
            .filter(|message| !message.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::ProviderErrorDto;
    use rstest::rstest;

    #[rstest]
    #[case(br#"{"message":"No account found with API key"}"#.as_slice(), Some("No account found with API key"))]
    #[case(br#"{"message":"   "}"#.as_slice(), None)]
    #[case(br#"{"errorCode":999}"#.as_slice(), None)]
    #[case(b"Bad API Request:Invalid location".as_slice(), None)]
    fn extracts_json_messages_only(#[case] body: &[u8], #[case] expected: Option<&str>) {
        assert_eq!(
            ProviderErrorDto::message_from(body).as_deref(),
            expected
        );
    }
}

use {
    crate::model::RsvpPayload,
    async_trait::async_trait,
    awc::{error::SendRequestError, Client},
    derive_more::Display,
    log::{debug, info},
};

/// Google Apps Script web app that appends RSVPs to the spreadsheet
pub static DEFAULT_ENDPOINT: &str = "https://script.google.com/macros/s/AKfycbxbqdBw3LdrYLbYHYubVN7O-gU4NQEsIWeNKGEKfGq81DVw0WbRkk7uyyKI6QwCU9Ie/exec";

/// Acknowledgement that the request left without a transport failure.
///
/// The endpoint answers cross-origin with an opaque response, so nothing
/// about the reply is known beyond the fact that one arrived.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ack;

#[derive(Clone, Debug, Display, PartialEq, Eq)]
#[display(fmt = "Could not reach the RSVP endpoint: {}", reason)]
pub struct TransportError {
    pub reason: String,
}

impl TransportError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<SendRequestError> for TransportError {
    fn from(error: SendRequestError) -> Self {
        Self::new(error.to_string())
    }
}

/// Somewhere an RSVP can be delivered to
#[async_trait(?Send)]
pub trait Submit {
    async fn submit(&self, payload: &RsvpPayload) -> Result<Ack, TransportError>;
}

/// Posts RSVPs as JSON to the configured endpoint
pub struct Endpoint {
    pub url: String,
    client: Client,
}

impl Endpoint {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            client: Client::default(),
        }
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

#[async_trait(?Send)]
impl Submit for Endpoint {
    async fn submit(&self, payload: &RsvpPayload) -> Result<Ack, TransportError> {
        let response = self.client.post(&self.url).send_json(payload).await?;
        // the status and body are deliberately not inspected
        debug!("RSVP endpoint answered with {}", response.status());
        Ok(Ack)
    }
}

/// Logs the payload and reports success without touching the network
#[derive(Default)]
pub struct StubEndpoint;

#[async_trait(?Send)]
impl Submit for StubEndpoint {
    async fn submit(&self, payload: &RsvpPayload) -> Result<Ack, TransportError> {
        info!(
            "Not sending RSVP in test mode: {}",
            serde_json::to_string(payload).unwrap_or_default()
        );
        Ok(Ack)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::model::{Attendance, RsvpParams},
        chrono::Utc,
    };

    fn test_payload() -> RsvpPayload {
        RsvpPayload::new(
            &RsvpParams {
                name: "John".to_string(),
                email: "john@example.com".to_string(),
                attendance: Attendance::Decline,
                ..RsvpParams::default()
            },
            Utc::now(),
        )
    }

    #[actix_rt::test]
    async fn stub_acknowledges() {
        assert_eq!(StubEndpoint.submit(&test_payload()).await, Ok(Ack));
    }

    #[actix_rt::test]
    async fn unreachable_endpoint_is_transport_error() {
        // nothing listens on port 9 of the loopback interface
        let endpoint = Endpoint::new("http://127.0.0.1:9/exec");
        let error = endpoint.submit(&test_payload()).await.unwrap_err();
        assert!(!error.reason.is_empty());
        assert!(error.to_string().starts_with("Could not reach the RSVP endpoint"));
    }

    #[actix_rt::test]
    async fn malformed_url_is_transport_error() {
        let endpoint = Endpoint::new("not a url");
        assert!(endpoint.submit(&test_payload()).await.is_err());
    }
}

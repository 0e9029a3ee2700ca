//! Visit event model for asynchronous audit logging.

/// An in-memory record of a served redirect, for async processing.
///
/// Created in the redirect handler and sent over a bounded channel to the
/// background worker, decoupling the HTTP response from audit writes. If the
/// queue is full the event is dropped; redirects never block on it.
#[derive(Debug, Clone)]
pub struct VisitEvent {
    pub slug: String,
    pub destination_url: String,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub ip: Option<String>,
}

impl VisitEvent {
    /// Creates a new visit event.
    pub fn new(
        slug: String,
        destination_url: String,
        ip: Option<String>,
        user_agent: Option<&str>,
        referer: Option<&str>,
    ) -> Self {
        Self {
            slug,
            destination_url,
            ip,
            user_agent: user_agent.map(|s| s.to_string()),
            referer: referer.map(|s| s.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_event_creation_full() {
        let event = VisitEvent::new(
            "aB3dE6gH9jK2".to_string(),
            "https://example.com/target".to_string(),
            Some("192.168.1.1".to_string()),
            Some("Mozilla/5.0"),
            Some("https://news.example.org"),
        );

        assert_eq!(event.slug, "aB3dE6gH9jK2");
        assert_eq!(event.destination_url, "https://example.com/target");
        assert_eq!(event.ip, Some("192.168.1.1".to_string()));
        assert_eq!(event.user_agent, Some("Mozilla/5.0".to_string()));
        assert_eq!(event.referer, Some("https://news.example.org".to_string()));
    }

    #[test]
    fn test_visit_event_creation_minimal() {
        let event = VisitEvent::new(
            "xY7zQ1wV5uT3".to_string(),
            "https://example.com".to_string(),
            None,
            None,
            None,
        );

        assert!(event.ip.is_none());
        assert!(event.user_agent.is_none());
        assert!(event.referer.is_none());
    }
}

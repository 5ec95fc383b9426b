//! Hidden client bindings driven through HTTP request contexts.

#[cfg(test)]
mod tests {
    use std::net::IpAddr;

    use securl_core::SecurlConfig;
    use securl_dispatch::{DispatchOutcome, PartsContext};
    use securl_sign::StaticContext;

    use crate::{fixture_request, fixture_service};

    fn parts(forwarded: Option<&str>, agent: Option<&str>) -> http::request::Parts {
        let mut builder = http::Request::builder().uri("/download");
        if let Some(value) = forwarded {
            builder = builder.header("x-forwarded-for", value);
        }
        if let Some(value) = agent {
            builder = builder.header("user-agent", value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_should_bind_urls_to_the_forwarded_client_address() {
        let config = SecurlConfig::builder().bind_client_ip(true).build();
        let service = fixture_service(config);

        let buyer = parts(Some("203.0.113.9"), None);
        let url = service
            .build_url(&fixture_request(), &PartsContext::new(&buyer))
            .unwrap();
        assert!(url.contains("o=ip"));
        assert!(!url.contains("203.0.113.9"));

        assert!(matches!(
            service.process(&url, &PartsContext::new(&buyer)),
            DispatchOutcome::Verified(_)
        ));

        let thief = parts(Some("198.51.100.7"), None);
        assert_eq!(
            service.process(&url, &PartsContext::new(&thief)),
            DispatchOutcome::Invalid
        );
    }

    #[test]
    fn test_should_treat_forwarded_and_peer_addresses_alike() {
        let config = SecurlConfig::builder().bind_client_ip(true).build();
        let service = fixture_service(config);

        let proxied = parts(Some("203.0.113.9"), None);
        let url = service
            .build_url(&fixture_request(), &PartsContext::new(&proxied))
            .unwrap();

        let direct = parts(None, None);
        let peer: IpAddr = "203.0.113.9".parse().unwrap();
        assert!(matches!(
            service.process(&url, &PartsContext::with_peer(&direct, peer)),
            DispatchOutcome::Verified(_)
        ));
    }

    #[test]
    fn test_should_bind_urls_to_the_user_agent() {
        let config = SecurlConfig::builder().bind_user_agent(true).build();
        let service = fixture_service(config);

        let browser = parts(None, Some("Mozilla/5.0"));
        let url = service
            .build_url(&fixture_request(), &PartsContext::new(&browser))
            .unwrap();
        assert!(url.contains("o=ua"));
        assert!(!url.contains("Mozilla"));

        assert!(matches!(
            service.process(&url, &PartsContext::new(&browser)),
            DispatchOutcome::Verified(_)
        ));

        let downloader = parts(None, Some("curl/8.5.0"));
        assert_eq!(
            service.process(&url, &PartsContext::new(&downloader)),
            DispatchOutcome::Invalid
        );
    }

    #[test]
    fn test_should_bind_both_attributes_when_configured() {
        let config = SecurlConfig::builder()
            .bind_client_ip(true)
            .bind_user_agent(true)
            .build();
        let service = fixture_service(config);

        let buyer = parts(Some("203.0.113.9"), Some("Mozilla/5.0"));
        let url = service
            .build_url(&fixture_request(), &PartsContext::new(&buyer))
            .unwrap();
        assert!(url.contains("o=ip%3Aua"));

        assert!(matches!(
            service.process(&url, &PartsContext::new(&buyer)),
            DispatchOutcome::Verified(_)
        ));

        let moved = parts(Some("198.51.100.7"), Some("Mozilla/5.0"));
        assert_eq!(
            service.process(&url, &PartsContext::new(&moved)),
            DispatchOutcome::Invalid
        );
        let respun = parts(Some("203.0.113.9"), Some("curl/8.5.0"));
        assert_eq!(
            service.process(&url, &PartsContext::new(&respun)),
            DispatchOutcome::Invalid
        );
    }

    #[test]
    fn test_should_interoperate_with_static_contexts() {
        let config = SecurlConfig::builder().bind_client_ip(true).build();
        let service = fixture_service(config);

        let issued = StaticContext::new("203.0.113.9", "");
        let url = service.build_url(&fixture_request(), &issued).unwrap();

        let redeemed = parts(Some("203.0.113.9"), None);
        assert!(matches!(
            service.process(&url, &PartsContext::new(&redeemed)),
            DispatchOutcome::Verified(_)
        ));
    }

    #[test]
    fn test_should_leave_unbound_urls_portable() {
        let service = fixture_service(SecurlConfig::default());

        let buyer = parts(Some("203.0.113.9"), Some("Mozilla/5.0"));
        let url = service
            .build_url(&fixture_request(), &PartsContext::new(&buyer))
            .unwrap();
        assert!(!url.contains("o="));

        let elsewhere = parts(Some("198.51.100.7"), Some("curl/8.5.0"));
        assert!(matches!(
            service.process(&url, &PartsContext::new(&elsewhere)),
            DispatchOutcome::Verified(_)
        ));
    }
}

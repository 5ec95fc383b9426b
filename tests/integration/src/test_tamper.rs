//! Tamper evidence across every signed component of a URL.

#[cfg(test)]
mod tests {
    use securl_core::{DownloadId, Expiry, FileKey, SecurlConfig};
    use securl_dispatch::{DispatchOutcome, LinkRequest};
    use securl_sign::StaticContext;

    use crate::{fixture_request, fixture_service, rebuild, with_param, without_param};

    #[test]
    fn test_should_reject_every_parameter_rewrite() {
        let service = fixture_service(SecurlConfig::default());
        let context = StaticContext::default();
        let url = service.build_url(&fixture_request(), &context).unwrap();

        let rewrites = [
            ("download_key", "stolen"),
            ("eddfile", "43:7:3"),
            ("eddfile", "42:8:3"),
            ("eddfile", "42:7:4"),
            ("ttl", "1800000000"),
            ("token", &"0".repeat(64)),
        ];
        for (name, value) in rewrites {
            let tampered = with_param(&url, name, value);
            assert_eq!(
                service.process(&tampered, &context),
                DispatchOutcome::Invalid,
                "rewriting {name} must invalidate the url"
            );
        }
    }

    #[test]
    fn test_should_reject_stripped_parameters() {
        let service = fixture_service(SecurlConfig::default());
        let context = StaticContext::default();
        let url = service.build_url(&fixture_request(), &context).unwrap();

        for name in ["token", "ttl", "download_key"] {
            let stripped = without_param(&url, name);
            assert_eq!(
                service.process(&stripped, &context),
                DispatchOutcome::Invalid,
                "stripping {name} must invalidate the url"
            );
        }
    }

    #[test]
    fn test_should_reject_rewritten_binding_flags() {
        let config = SecurlConfig::builder().bind_client_ip(true).build();
        let service = fixture_service(config);
        let buyer = StaticContext::new("203.0.113.9", "");
        let url = service.build_url(&fixture_request(), &buyer).unwrap();
        assert!(url.contains("o=ip"));

        let rewritten = with_param(&url, "o", "ua");
        assert_eq!(service.process(&rewritten, &buyer), DispatchOutcome::Invalid);
    }

    #[test]
    fn test_should_reject_appended_parameters() {
        let service = fixture_service(SecurlConfig::default());
        let context = StaticContext::default();
        let url = service.build_url(&fixture_request(), &context).unwrap();

        let padded = rebuild(&url, |params| {
            params.insert(0, ("preview".to_owned(), "1".to_owned()));
        });
        assert_eq!(service.process(&padded, &context), DispatchOutcome::Invalid);
    }

    #[test]
    fn test_should_reject_forged_urls() {
        let service = fixture_service(SecurlConfig::default());
        let context = StaticContext::default();

        let forged = format!(
            "/download?eddfile=1%3A1%3A1&ttl=9999999999&token={}",
            "a".repeat(64)
        );
        assert_eq!(service.process(&forged, &context), DispatchOutcome::Invalid);
    }

    #[test]
    fn test_should_reject_token_transplanted_from_another_url() {
        let service = fixture_service(SecurlConfig::default());
        let context = StaticContext::default();

        let first = service.build_url(&fixture_request(), &context).unwrap();
        let other = LinkRequest::builder()
            .base_url("/download?download_key=abc123")
            .purchase_key("abc123")
            .download_id(DownloadId::new(7))
            .file_key(FileKey::from_index(4))
            .expiry(Some(Expiry::from_unix(1_700_000_000)))
            .build();
        let second = service.build_url(&other, &context).unwrap();

        let token_of = |url: &str| url.rsplit("token=").next().unwrap().to_owned();
        let crossed = with_param(&first, "token", &token_of(&second));
        assert_eq!(service.process(&crossed, &context), DispatchOutcome::Invalid);
    }

    #[test]
    fn test_should_reject_query_transplanted_to_another_path() {
        let service = fixture_service(SecurlConfig::default());
        let context = StaticContext::default();
        let url = service.build_url(&fixture_request(), &context).unwrap();

        let (_, query) = url.split_once('?').unwrap();
        let moved = format!("/export?{query}");
        assert_eq!(service.process(&moved, &context), DispatchOutcome::Invalid);
    }

    #[test]
    fn test_should_reject_urls_signed_under_another_secret() {
        let issuer = fixture_service(SecurlConfig::default());
        let context = StaticContext::default();
        let url = issuer.build_url(&fixture_request(), &context).unwrap();

        let verifier = crate::fixture_service_with_secret(SecurlConfig::default(), "T");
        assert_eq!(verifier.process(&url, &context), DispatchOutcome::Invalid);
    }

    #[test]
    fn test_should_not_reveal_which_component_failed() {
        let service = fixture_service(SecurlConfig::default());
        let context = StaticContext::default();
        let url = service.build_url(&fixture_request(), &context).unwrap();

        let wrong_file = service.process(&with_param(&url, "eddfile", "42:7:9"), &context);
        let wrong_token = service.process(&with_param(&url, "token", &"f".repeat(64)), &context);
        let wrong_shape = service.process(&with_param(&url, "token", "short"), &context);
        assert_eq!(wrong_file, DispatchOutcome::Invalid);
        assert_eq!(wrong_file, wrong_token);
        assert_eq!(wrong_token, wrong_shape);
    }
}

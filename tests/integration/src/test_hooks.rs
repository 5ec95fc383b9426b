//! Hook behavior around the happy path: passthrough, degraded signing,
//! and decisions the service leaves to the host.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{SystemTime, UNIX_EPOCH};

    use securl_core::{DEFAULT_LINK_TTL_SECS, DownloadId, Expiry, FileKey, SecurlConfig};
    use securl_dispatch::{DispatchOutcome, LinkRequest, SecureLinks};
    use securl_sign::{AttributeBinder, EnvSecretProvider, OptionFlag, RequestContext, StaticContext};

    use crate::{fixture_request, fixture_service, fixture_store};

    fn now_unix() -> i64 {
        i64::try_from(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_secs(),
        )
        .unwrap()
    }

    #[test]
    fn test_should_pass_verbose_urls_through_untouched() {
        let service = fixture_service(SecurlConfig::default());
        let context = StaticContext::default();

        assert_eq!(
            service.process("/download?download_key=abc123&did=7", &context),
            DispatchOutcome::Passthrough
        );
        assert_eq!(
            service.process("/download", &context),
            DispatchOutcome::Passthrough
        );
    }

    #[test]
    fn test_should_keep_verbose_url_for_unknown_purchase_key() {
        let service = fixture_service(SecurlConfig::default());
        let request = LinkRequest::builder()
            .base_url("/download?download_key=unknown")
            .purchase_key("unknown")
            .download_id(DownloadId::new(7))
            .file_key(FileKey::from_index(3))
            .build();
        assert_eq!(
            service.build_url(&request, &StaticContext::default()),
            None
        );
    }

    #[test]
    fn test_should_degrade_to_unsigned_urls_without_a_secret() {
        let service = SecureLinks::new(
            SecurlConfig::default(),
            Arc::new(EnvSecretProvider::with_var("SECURL_INTEGRATION_MISSING_SECRET")),
            fixture_store(),
        );
        let context = StaticContext::default();
        assert_eq!(service.build_url(&fixture_request(), &context), None);

        // Verification with no secret fails closed even for a url that
        // was signed correctly elsewhere.
        let issued = fixture_service(SecurlConfig::default())
            .build_url(&fixture_request(), &context)
            .unwrap();
        assert_eq!(service.process(&issued, &context), DispatchOutcome::Invalid);
    }

    #[test]
    fn test_should_apply_the_configured_ttl_by_default() {
        let service = fixture_service(SecurlConfig::default());
        let context = StaticContext::default();
        let request = LinkRequest::builder()
            .base_url("/download?download_key=abc123")
            .purchase_key("abc123")
            .download_id(DownloadId::new(7))
            .file_key(FileKey::from_index(3))
            .build();

        let before = now_unix();
        let url = service.build_url(&request, &context).unwrap();
        let DispatchOutcome::Verified(args) = service.process(&url, &context) else {
            panic!("expected verified outcome");
        };

        let ttl = i64::try_from(DEFAULT_LINK_TTL_SECS).unwrap();
        assert!(args.expiry.as_unix() >= before + ttl);
        assert!(args.expiry.as_unix() <= now_unix() + ttl + 5);
        assert!(!args.expiry.is_expired());
    }

    #[test]
    fn test_should_leave_expiry_enforcement_to_the_host() {
        let service = fixture_service(SecurlConfig::default());
        let context = StaticContext::default();
        let request = LinkRequest::builder()
            .base_url("/download?download_key=abc123")
            .purchase_key("abc123")
            .download_id(DownloadId::new(7))
            .file_key(FileKey::from_index(3))
            .expiry(Some(Expiry::from_unix(1)))
            .build();
        let url = service.build_url(&request, &context).unwrap();

        let DispatchOutcome::Verified(args) = service.process(&url, &context) else {
            panic!("expected verified outcome");
        };
        assert!(args.expiry.is_expired());
    }

    #[test]
    fn test_should_verify_custom_binder_across_service_instances() {
        struct TenantBinder;

        impl AttributeBinder for TenantBinder {
            fn flag(&self) -> OptionFlag {
                OptionFlag::Custom("tenant".to_owned())
            }

            fn bind(
                &self,
                _context: &dyn RequestContext,
            ) -> anyhow::Result<Vec<(String, String)>> {
                Ok(vec![("tenant".to_owned(), "shop-7".to_owned())])
            }
        }

        let mut issuer = fixture_service(SecurlConfig::default());
        issuer.register_binder(TenantBinder);
        let mut verifier = fixture_service(SecurlConfig::default());
        verifier.register_binder(TenantBinder);

        let context = StaticContext::default();
        let url = issuer.build_url(&fixture_request(), &context).unwrap();
        assert!(url.contains("o=tenant"));
        assert!(!url.contains("shop-7"));

        assert!(matches!(
            verifier.process(&url, &context),
            DispatchOutcome::Verified(_)
        ));

        // A verifier missing the binder cannot reproduce the digest.
        let plain = fixture_service(SecurlConfig::default());
        assert_eq!(plain.process(&url, &context), DispatchOutcome::Invalid);
    }
}

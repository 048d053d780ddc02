#[cfg(test)]
mod tests {
    use apicheck::{apicheck_playback_test, apicheck_record_test, expect_status, Error, Session};
    use apicheck::{expect_field, validate, HttpClient, RequestData, ResponseData, SessionBuilder};
    use serde_json::json;
    use std::{collections::HashMap, sync::Arc, time::Duration};

    fn configure_session(builder: &mut SessionBuilder) {
        builder.set_timeout(Duration::from_secs(5));
        builder.set_default_header("user-agent", "apicheck-tests");
    }

    /// Answers every request locally with the same body.
    #[derive(Debug)]
    struct StubHttpClient;

    impl HttpClient for StubHttpClient {
        fn make_request(
            &self,
            _base_url: &str,
            _request_data: &RequestData,
        ) -> Result<ResponseData, Error> {
            let mut headers = HashMap::new();
            headers.insert("content-type".into(), "application/json".into());

            Ok(ResponseData {
                status_code: 200,
                headers,
                body: r#"{"stub":true}"#.into(),
            })
        }
    }

    fn configure_stub_client(builder: &mut SessionBuilder) {
        configure_session(builder);
        builder.set_http_client(Arc::new(StubHttpClient));
    }

    #[apicheck_playback_test("playback_data/two_interactions.md", configure_session)]
    fn playback_serves_every_interaction(session: &Session) -> Result<(), Error> {
        let user = session.get::<&str, &str>("/api/users/2", &[])?;
        expect_status(&user, 200)?;
        expect_field(&user.json()?, "/data/email", "janet.weaver@reqres.in")?;

        let updated = session.patch("/api/users/2", &json!({"job": "zion resident"}))?;
        validate(
            &updated.json()?,
            &json!({"type": "object", "required": ["job", "updatedAt"]}),
        )?;

        Ok(())
    }

    #[apicheck_playback_test("playback_data/two_interactions.md", configure_session)]
    #[should_panic(expected = "Expected status code 201. Actual status code 200")]
    fn failed_assertion_fails_the_test(session: &Session) -> Result<(), Error> {
        let user = session.get::<&str, &str>("/api/users/2", &[])?;
        expect_status(&user, 201)
    }

    #[apicheck_playback_test("playback_data/two_interactions.md", configure_session)]
    #[should_panic(expected = "apicheck playback error")]
    fn unexpected_request_fails_the_test(session: &Session) -> Result<(), Error> {
        session.get::<&str, &str>("/api/unknown/2", &[])?;
        Ok(())
    }

    #[apicheck_record_test("playback_data/two_interactions.md", configure_session)]
    fn record_refreshes_the_recording(session: &Session) -> Result<(), Error> {
        let user = session.get::<&str, &str>("/api/users/2", &[])?;
        expect_status(&user, 200)?;

        let updated = session.patch("/api/users/2", &json!({"job": "zion resident"}))?;
        expect_status(&updated, 200)
    }

    #[apicheck_record_test("playback_data/stub_client.md", configure_stub_client)]
    fn record_goes_through_the_configured_client(session: &Session) -> Result<(), Error> {
        let user = session.get::<&str, &str>("/api/users/2", &[])?;
        expect_field(&user.json()?, "/stub", true)
    }
}

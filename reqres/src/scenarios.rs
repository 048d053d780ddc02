use crate::{
    data::{Credentials, UserPayload},
    schemas::{schema_store, ReqresSchema},
};
use apicheck::{expect_field, expect_status, Error, Session};

pub const REGISTERED_TOKEN: &str = "QpwL5tke4Pnpja7X4";

pub fn list_users(session: &Session) -> Result<(), Error> {
    let response = session.get("/api/users", &[("page", "2")])?;
    let body = schema_store().validate_response(&response, ReqresSchema::ListUsers)?;

    expect_status(&response, 200)?;
    expect_field(&body, "/per_page", 6)?;
    expect_field(&body, "/total", 12)?;

    Ok(())
}

pub fn single_user(session: &Session) -> Result<(), Error> {
    let response = session.get::<&str, &str>("/api/users/2", &[])?;
    let body = schema_store().validate_response(&response, ReqresSchema::SingleUser)?;

    expect_status(&response, 200)?;
    expect_field(&body, "/data/id", 2)?;
    expect_field(&body, "/data/email", "janet.weaver@reqres.in")?;

    Ok(())
}

pub fn single_user_not_found(session: &Session) -> Result<(), Error> {
    let response = session.get::<&str, &str>("/api/users/23", &[])?;
    schema_store().validate_response(&response, ReqresSchema::SingleUserNotFound)?;

    expect_status(&response, 404)
}

pub fn list_resource(session: &Session) -> Result<(), Error> {
    let response = session.get::<&str, &str>("/api/unknown", &[])?;
    let body = schema_store().validate_response(&response, ReqresSchema::ListResource)?;

    expect_status(&response, 200)?;
    expect_field(&body, "/per_page", 6)?;
    expect_field(&body, "/total", 12)?;

    Ok(())
}

pub fn single_resource(session: &Session) -> Result<(), Error> {
    let response = session.get::<&str, &str>("/api/unknown/2", &[])?;
    let body = schema_store().validate_response(&response, ReqresSchema::SingleResource)?;

    expect_status(&response, 200)?;
    expect_field(&body, "/data/id", 2)?;
    expect_field(&body, "/data/name", "fuchsia rose")?;
    expect_field(&body, "/data/year", 2001)?;

    Ok(())
}

pub fn single_resource_not_found(session: &Session) -> Result<(), Error> {
    let response = session.get::<&str, &str>("/api/unknown/23", &[])?;
    schema_store().validate_response(&response, ReqresSchema::SingleResourceNotFound)?;

    expect_status(&response, 404)
}

pub fn create(session: &Session) -> Result<(), Error> {
    let response = session.post("/api/users", &UserPayload::new("Kristina", "QA"))?;
    let body = schema_store().validate_response(&response, ReqresSchema::CreateUser)?;

    expect_status(&response, 201)?;
    expect_field(&body, "/name", "Kristina")?;
    expect_field(&body, "/job", "QA")?;

    Ok(())
}

pub fn update_put(session: &Session) -> Result<(), Error> {
    let response = session.put(
        "/api/users/2",
        &UserPayload::new("morpheus", "zion resident"),
    )?;
    let body = schema_store().validate_response(&response, ReqresSchema::UpdatePut)?;

    expect_status(&response, 200)?;
    expect_field(&body, "/name", "morpheus")?;
    expect_field(&body, "/job", "zion resident")?;

    Ok(())
}

pub fn update_patch(session: &Session) -> Result<(), Error> {
    let response = session.patch(
        "/api/users/2",
        &UserPayload::new("morpheus", "zion resident"),
    )?;
    let body = schema_store().validate_response(&response, ReqresSchema::UpdatePatch)?;

    expect_status(&response, 200)?;
    expect_field(&body, "/name", "morpheus")?;
    expect_field(&body, "/job", "zion resident")?;

    Ok(())
}

pub fn register_successful(session: &Session) -> Result<(), Error> {
    let response = session.post(
        "/api/register",
        &Credentials::new("eve.holt@reqres.in", "pistol"),
    )?;
    let body = schema_store().validate_response(&response, ReqresSchema::RegisterSuccessful)?;

    expect_status(&response, 200)?;
    expect_field(&body, "/id", 4)?;
    expect_field(&body, "/token", REGISTERED_TOKEN)?;

    Ok(())
}

pub fn register_unsuccessful(session: &Session) -> Result<(), Error> {
    let response = session.post(
        "/api/register",
        &Credentials::without_password("sydney@fife"),
    )?;
    let body = schema_store().validate_response(&response, ReqresSchema::RegisterUnsuccessful)?;

    expect_status(&response, 400)?;
    expect_field(&body, "/error", "Missing password")?;

    Ok(())
}

pub fn login_successful(session: &Session) -> Result<(), Error> {
    let response = session.post(
        "/api/login",
        &Credentials::new("eve.holt@reqres.in", "cityslicka"),
    )?;
    let body = schema_store().validate_response(&response, ReqresSchema::LoginSuccessful)?;

    expect_status(&response, 200)?;
    expect_field(&body, "/token", REGISTERED_TOKEN)?;

    Ok(())
}

pub fn login_unsuccessful(session: &Session) -> Result<(), Error> {
    let response = session.post("/api/login", &Credentials::without_password("peter@klaven"))?;
    let body = schema_store().validate_response(&response, ReqresSchema::LoginUnsuccessful)?;

    expect_status(&response, 400)?;
    expect_field(&body, "/error", "Missing password")?;

    Ok(())
}

pub fn delayed_response(session: &Session) -> Result<(), Error> {
    let response = session.get("/api/users", &[("delay", "3")])?;
    let body = schema_store().validate_response(&response, ReqresSchema::DelayedResponse)?;

    expect_status(&response, 200)?;
    expect_field(&body, "/per_page", 6)?;
    expect_field(&body, "/total", 12)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use apicheck::{
        apicheck_playback_test, apicheck_record_test, markdown, PlaybackServer, SessionBuilder,
    };

    fn configure_session(_builder: &mut SessionBuilder) {}

    #[apicheck_playback_test("playback_data/list_users.md", configure_session)]
    fn list_users_playback(session: &Session) -> Result<(), Error> {
        list_users(session)
    }

    #[apicheck_record_test("playback_data/list_users.md", configure_session)]
    fn list_users_record(session: &Session) -> Result<(), Error> {
        list_users(session)
    }

    #[apicheck_playback_test("playback_data/single_user.md", configure_session)]
    fn single_user_playback(session: &Session) -> Result<(), Error> {
        single_user(session)
    }

    #[apicheck_record_test("playback_data/single_user.md", configure_session)]
    fn single_user_record(session: &Session) -> Result<(), Error> {
        single_user(session)
    }

    #[apicheck_playback_test("playback_data/single_user_not_found.md", configure_session)]
    fn single_user_not_found_playback(session: &Session) -> Result<(), Error> {
        single_user_not_found(session)
    }

    #[apicheck_record_test("playback_data/single_user_not_found.md", configure_session)]
    fn single_user_not_found_record(session: &Session) -> Result<(), Error> {
        single_user_not_found(session)
    }

    #[apicheck_playback_test("playback_data/list_resource.md", configure_session)]
    fn list_resource_playback(session: &Session) -> Result<(), Error> {
        list_resource(session)
    }

    #[apicheck_record_test("playback_data/list_resource.md", configure_session)]
    fn list_resource_record(session: &Session) -> Result<(), Error> {
        list_resource(session)
    }

    #[apicheck_playback_test("playback_data/single_resource.md", configure_session)]
    fn single_resource_playback(session: &Session) -> Result<(), Error> {
        single_resource(session)
    }

    #[apicheck_record_test("playback_data/single_resource.md", configure_session)]
    fn single_resource_record(session: &Session) -> Result<(), Error> {
        single_resource(session)
    }

    #[apicheck_playback_test("playback_data/single_resource_not_found.md", configure_session)]
    fn single_resource_not_found_playback(session: &Session) -> Result<(), Error> {
        single_resource_not_found(session)
    }

    #[apicheck_record_test("playback_data/single_resource_not_found.md", configure_session)]
    fn single_resource_not_found_record(session: &Session) -> Result<(), Error> {
        single_resource_not_found(session)
    }

    #[apicheck_playback_test("playback_data/create.md", configure_session)]
    fn create_playback(session: &Session) -> Result<(), Error> {
        create(session)
    }

    #[apicheck_record_test("playback_data/create.md", configure_session)]
    fn create_record(session: &Session) -> Result<(), Error> {
        create(session)
    }

    #[apicheck_playback_test("playback_data/update_put.md", configure_session)]
    fn update_put_playback(session: &Session) -> Result<(), Error> {
        update_put(session)
    }

    #[apicheck_record_test("playback_data/update_put.md", configure_session)]
    fn update_put_record(session: &Session) -> Result<(), Error> {
        update_put(session)
    }

    #[apicheck_playback_test("playback_data/update_patch.md", configure_session)]
    fn update_patch_playback(session: &Session) -> Result<(), Error> {
        update_patch(session)
    }

    #[apicheck_record_test("playback_data/update_patch.md", configure_session)]
    fn update_patch_record(session: &Session) -> Result<(), Error> {
        update_patch(session)
    }

    #[apicheck_playback_test("playback_data/register_successful.md", configure_session)]
    fn register_successful_playback(session: &Session) -> Result<(), Error> {
        register_successful(session)
    }

    #[apicheck_record_test("playback_data/register_successful.md", configure_session)]
    fn register_successful_record(session: &Session) -> Result<(), Error> {
        register_successful(session)
    }

    #[apicheck_playback_test("playback_data/register_unsuccessful.md", configure_session)]
    fn register_unsuccessful_playback(session: &Session) -> Result<(), Error> {
        register_unsuccessful(session)
    }

    #[apicheck_record_test("playback_data/register_unsuccessful.md", configure_session)]
    fn register_unsuccessful_record(session: &Session) -> Result<(), Error> {
        register_unsuccessful(session)
    }

    #[apicheck_playback_test("playback_data/login_successful.md", configure_session)]
    fn login_successful_playback(session: &Session) -> Result<(), Error> {
        login_successful(session)
    }

    #[apicheck_record_test("playback_data/login_successful.md", configure_session)]
    fn login_successful_record(session: &Session) -> Result<(), Error> {
        login_successful(session)
    }

    #[apicheck_playback_test("playback_data/login_unsuccessful.md", configure_session)]
    fn login_unsuccessful_playback(session: &Session) -> Result<(), Error> {
        login_unsuccessful(session)
    }

    #[apicheck_record_test("playback_data/login_unsuccessful.md", configure_session)]
    fn login_unsuccessful_record(session: &Session) -> Result<(), Error> {
        login_unsuccessful(session)
    }

    #[apicheck_playback_test("playback_data/delayed_response.md", configure_session)]
    fn delayed_response_playback(session: &Session) -> Result<(), Error> {
        delayed_response(session)
    }

    #[apicheck_record_test("playback_data/delayed_response.md", configure_session)]
    fn delayed_response_record(session: &Session) -> Result<(), Error> {
        delayed_response(session)
    }

    fn run_against(
        recording: &str,
        body: &str,
        scenario: fn(&Session) -> Result<(), Error>,
    ) -> Result<(), Error> {
        let path = format!("{}/playback_data/{}", env!("CARGO_MANIFEST_DIR"), recording);
        let mut interactions = markdown::load_markdown(path).unwrap();
        interactions[0].response_data.body = body.into();

        let server = PlaybackServer::start(interactions).unwrap();
        let session = SessionBuilder::new()
            .with_base_url(server.base_url())
            .build()
            .unwrap();

        let result = scenario(&session);
        server.finish().unwrap();
        result
    }

    #[test]
    fn wrong_field_value_is_reported() {
        let body = r#"{"data": {"id": 2, "email": "emma.wong@reqres.in", "first_name": "Janet",
            "last_name": "Weaver", "avatar": "https://reqres.in/img/faces/2-image.jpg"}}"#;

        match run_against("single_user.md", body, single_user) {
            Err(Error::UnexpectedValue {
                pointer,
                expected,
                actual,
            }) => {
                assert_eq!(pointer, "/data/email");
                assert_eq!(expected, "\"janet.weaver@reqres.in\"");
                assert_eq!(actual, "\"emma.wong@reqres.in\"");
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn schema_deviation_is_reported_with_its_path() {
        match run_against("register_successful.md", r#"{"id": "4"}"#, register_successful) {
            Err(Error::Validation(violations)) => {
                assert!(violations.iter().any(|v| v.path == "/id"));
                assert!(violations.iter().any(|v| v.reason.contains("token")));
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn non_json_body_is_reported() {
        match run_against("login_unsuccessful.md", "Bad Gateway", login_unsuccessful) {
            Err(Error::InvalidJsonBody(_, body)) => assert_eq!(body, "Bad Gateway"),
            other => panic!("Unexpected result: {:?}", other),
        }
    }
}

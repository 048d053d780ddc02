use apicheck::{SchemaName, SchemaStore};

/// The JSON Schema fixture paired with each scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReqresSchema {
    ListUsers,
    SingleUser,
    SingleUserNotFound,
    ListResource,
    SingleResource,
    SingleResourceNotFound,
    CreateUser,
    UpdatePut,
    UpdatePatch,
    RegisterSuccessful,
    RegisterUnsuccessful,
    LoginSuccessful,
    LoginUnsuccessful,
    DelayedResponse,
}

impl SchemaName for ReqresSchema {
    fn file_name(&self) -> &'static str {
        match self {
            ReqresSchema::ListUsers => "list_users.json",
            ReqresSchema::SingleUser => "single_user.json",
            ReqresSchema::SingleUserNotFound => "single_user_not_found.json",
            ReqresSchema::ListResource => "list_resource.json",
            ReqresSchema::SingleResource => "single_resource.json",
            ReqresSchema::SingleResourceNotFound => "single_resource_not_found.json",
            ReqresSchema::CreateUser => "create_user.json",
            ReqresSchema::UpdatePut => "update_put.json",
            ReqresSchema::UpdatePatch => "update_patch.json",
            ReqresSchema::RegisterSuccessful => "register_successfull.json",
            ReqresSchema::RegisterUnsuccessful => "register_unsuccessfull.json",
            ReqresSchema::LoginSuccessful => "login_successfull.json",
            ReqresSchema::LoginUnsuccessful => "login_unsuccessfull.json",
            ReqresSchema::DelayedResponse => "delayed_response.json",
        }
    }

    fn all() -> &'static [Self] {
        &[
            ReqresSchema::ListUsers,
            ReqresSchema::SingleUser,
            ReqresSchema::SingleUserNotFound,
            ReqresSchema::ListResource,
            ReqresSchema::SingleResource,
            ReqresSchema::SingleResourceNotFound,
            ReqresSchema::CreateUser,
            ReqresSchema::UpdatePut,
            ReqresSchema::UpdatePatch,
            ReqresSchema::RegisterSuccessful,
            ReqresSchema::RegisterUnsuccessful,
            ReqresSchema::LoginSuccessful,
            ReqresSchema::LoginUnsuccessful,
            ReqresSchema::DelayedResponse,
        ]
    }
}

/// Store rooted at this crate's `schemas/` directory.
pub fn schema_store() -> SchemaStore {
    SchemaStore::new(concat!(env!("CARGO_MANIFEST_DIR"), "/schemas"))
}

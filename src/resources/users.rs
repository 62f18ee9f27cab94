use serde_json::Value;

use super::ResultPage;
use crate::client::FinAutClient;
use crate::error::FinAutError;
use crate::http_client::HttpClient;
use crate::request::CallDescriptor;

const ENDPOINT: &str = "user";

/// Filters accepted by the user list endpoint.
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    /// Norwegian social security number (fødselsnummer).
    pub persnr: Option<String>,
    /// Encrypted user ID from an external system.
    pub encoded_userid: Option<String>,
    pub employee_alias: Option<String>,
    pub page: Option<u32>,
}

pub struct UserResource<'a, C>
where
    C: HttpClient,
{
    client: &'a FinAutClient<C>,
}

impl<'a, C> UserResource<'a, C>
where
    C: HttpClient,
{
    pub(crate) fn new(client: &'a FinAutClient<C>) -> Self {
        Self { client }
    }

    pub fn list(&self, query: &UserQuery) -> Result<Value, FinAutError> {
        let descriptor = CallDescriptor::get(format!("{ENDPOINT}/"))
            .with_query_opt("persnr", query.persnr.as_ref())
            .with_query_opt("encoded_userid", query.encoded_userid.as_ref())
            .with_query_opt("employee_alias", query.employee_alias.as_ref())
            .with_query_opt("page", query.page);
        self.client.request(descriptor)
    }

    pub fn get(&self, user_id: u64) -> Result<Value, FinAutError> {
        self.client.get(format!("{ENDPOINT}/{user_id}/"))
    }

    /// Creates a user. `user_data` carries the API payload: `persnr`,
    /// `first_name` and `last_name` are required; `email`, `mobile`,
    /// `employee_alias`, `work_for` and `userroles` are optional.
    pub fn create(&self, user_data: Value) -> Result<Value, FinAutError> {
        self.client.post(format!("{ENDPOINT}/"), user_data)
    }

    /// Full update; the payload must be a complete user representation.
    pub fn update(&self, user_id: u64, user_data: Value) -> Result<Value, FinAutError> {
        self.client.put(format!("{ENDPOINT}/{user_id}/"), user_data)
    }

    pub fn partial_update(&self, user_id: u64, user_data: Value) -> Result<Value, FinAutError> {
        self.client.patch(format!("{ENDPOINT}/{user_id}/"), user_data)
    }

    /// Returns the first user matching the given persnr, if any.
    pub fn search_by_persnr(&self, persnr: &str) -> Result<Option<Value>, FinAutError> {
        let query = UserQuery {
            persnr: Some(persnr.to_string()),
            ..Default::default()
        };
        self.first_match(&query)
    }

    /// Returns the first user matching the given employee alias, if any.
    pub fn search_by_employee_alias(&self, alias: &str) -> Result<Option<Value>, FinAutError> {
        let query = UserQuery {
            employee_alias: Some(alias.to_string()),
            ..Default::default()
        };
        self.first_match(&query)
    }

    fn first_match(&self, query: &UserQuery) -> Result<Option<Value>, FinAutError> {
        let page = ResultPage::try_from(self.list(query)?)?;
        Ok(page.results.into_iter().next())
    }
}

use serde_json::Value;

use crate::client::FinAutClient;
use crate::error::FinAutError;
use crate::http_client::HttpClient;

const ENDPOINT: &str = "employment";

/// Employment records are read-only through the API.
pub struct EmploymentResource<'a, C>
where
    C: HttpClient,
{
    client: &'a FinAutClient<C>,
}

impl<'a, C> EmploymentResource<'a, C>
where
    C: HttpClient,
{
    pub(crate) fn new(client: &'a FinAutClient<C>) -> Self {
        Self { client }
    }

    pub fn get(&self, employment_id: u64) -> Result<Value, FinAutError> {
        self.client.get(format!("{ENDPOINT}/{employment_id}/"))
    }
}

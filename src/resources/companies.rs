use serde_json::Value;

use crate::client::FinAutClient;
use crate::error::FinAutError;
use crate::http_client::HttpClient;
use crate::request::CallDescriptor;

const ENDPOINT: &str = "companies";

pub struct CompanyResource<'a, C>
where
    C: HttpClient,
{
    client: &'a FinAutClient<C>,
}

impl<'a, C> CompanyResource<'a, C>
where
    C: HttpClient,
{
    pub(crate) fn new(client: &'a FinAutClient<C>) -> Self {
        Self { client }
    }

    pub fn list(&self, page: Option<u32>) -> Result<Value, FinAutError> {
        let descriptor = CallDescriptor::get(format!("{ENDPOINT}/")).with_query_opt("page", page);
        self.client.request(descriptor)
    }

    pub fn get(&self, company_id: u64) -> Result<Value, FinAutError> {
        self.client.get(format!("{ENDPOINT}/{company_id}/"))
    }

    /// Department URLs attached to a company.
    pub fn get_departments(&self, company_id: u64) -> Result<Vec<String>, FinAutError> {
        let company = self.get(company_id)?;
        Ok(url_list(&company, "departments"))
    }
}

pub(super) fn url_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|urls| {
            urls.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

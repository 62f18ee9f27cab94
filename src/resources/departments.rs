use serde_json::Value;

use super::companies::url_list;
use crate::client::FinAutClient;
use crate::error::FinAutError;
use crate::http_client::HttpClient;
use crate::request::CallDescriptor;

const ENDPOINT: &str = "departments";

pub struct DepartmentResource<'a, C>
where
    C: HttpClient,
{
    client: &'a FinAutClient<C>,
}

impl<'a, C> DepartmentResource<'a, C>
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

    pub fn get(&self, department_id: u64) -> Result<Value, FinAutError> {
        self.client.get(format!("{ENDPOINT}/{department_id}/"))
    }

    /// Franchise URLs attached to a department.
    pub fn get_franchises(&self, department_id: u64) -> Result<Vec<String>, FinAutError> {
        let department = self.get(department_id)?;
        Ok(url_list(&department, "franchises"))
    }
}

use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::client::FinAutClient;
use crate::error::FinAutError;
use crate::http_client::HttpClient;
use crate::request::CallDescriptor;

const ENDPOINT: &str = "competency_result";

/// Competency results reported by external systems (LMS courses and the
/// like), keyed by encrypted user IDs rather than persnr.
pub struct CompetencyResultResource<'a, C>
where
    C: HttpClient,
{
    client: &'a FinAutClient<C>,
}

impl<'a, C> CompetencyResultResource<'a, C>
where
    C: HttpClient,
{
    pub(crate) fn new(client: &'a FinAutClient<C>) -> Self {
        Self { client }
    }

    pub fn list(
        &self,
        encrypted_userid: Option<&str>,
        page: Option<u32>,
    ) -> Result<Value, FinAutError> {
        let descriptor = CallDescriptor::get(format!("{ENDPOINT}/"))
            .with_query_opt("encrypted_userid", encrypted_userid)
            .with_query_opt("page", page);
        self.client.request(descriptor)
    }

    pub fn get(&self, result_id: u64) -> Result<Value, FinAutError> {
        self.client.get(format!("{ENDPOINT}/{result_id}/"))
    }

    /// Creates a competency result. The payload requires `user` (encrypted
    /// user ID) and `goal`; `passed_date`, `external_system` and
    /// `external_id` are optional.
    pub fn create(&self, result_data: Value) -> Result<Value, FinAutError> {
        self.client.post(format!("{ENDPOINT}/"), result_data)
    }

    /// Records a competency completion for a user.
    pub fn record_completion(
        &self,
        encrypted_userid: &str,
        goal_id: u64,
        passed_date: NaiveDate,
        external_system: Option<&str>,
        external_id: Option<&str>,
    ) -> Result<Value, FinAutError> {
        let mut result_data = json!({
            "user": encrypted_userid,
            "goal": goal_id,
            "passed_date": passed_date.format("%Y-%m-%d").to_string(),
        });
        if let Some(external_system) = external_system {
            result_data["external_system"] = Value::String(external_system.to_string());
        }
        if let Some(external_id) = external_id {
            result_data["external_id"] = Value::String(external_id.to_string());
        }
        self.create(result_data)
    }
}

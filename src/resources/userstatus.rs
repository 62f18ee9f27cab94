use chrono::{NaiveDate, Utc};
use serde_json::{Value, json};

use crate::client::FinAutClient;
use crate::error::FinAutError;
use crate::http_client::HttpClient;
use crate::request::CallDescriptor;

const ENDPOINT: &str = "userstatus";
const LATEST_ENDPOINT: &str = "latestuserstatus";

/// The API only accepts creating these two statuses; `aktiv` cannot be set
/// through this endpoint.
const STATUS_INACTIVE: &str = "hvilende";
const STATUS_WITHDRAWN: &str = "utmeldt";

#[derive(Debug, Clone, Default)]
pub struct StatusQuery {
    pub persnr: Option<String>,
    pub employee_alias: Option<String>,
    pub page: Option<u32>,
}

/// Optional fields of a status change; the date defaults to today and the
/// setting user to the affected user.
#[derive(Debug, Clone, Default)]
pub struct StatusChange {
    pub status_date: Option<NaiveDate>,
    pub comment: Option<String>,
    pub status_set_by_id: Option<u64>,
}

pub struct UserStatusResource<'a, C>
where
    C: HttpClient,
{
    client: &'a FinAutClient<C>,
}

impl<'a, C> UserStatusResource<'a, C>
where
    C: HttpClient,
{
    pub(crate) fn new(client: &'a FinAutClient<C>) -> Self {
        Self { client }
    }

    pub fn list(&self, query: &StatusQuery) -> Result<Value, FinAutError> {
        let descriptor = CallDescriptor::get(format!("{ENDPOINT}/"))
            .with_query_opt("persnr", query.persnr.as_ref())
            .with_query_opt("employee_alias", query.employee_alias.as_ref())
            .with_query_opt("page", query.page);
        self.client.request(descriptor)
    }

    pub fn get(&self, status_id: u64) -> Result<Value, FinAutError> {
        self.client.get(format!("{ENDPOINT}/{status_id}/"))
    }

    /// Creates a status. `status_data` carries the API payload: `appname`
    /// (scheme code such as "afr" or "krd", not a URL), `user`, `status`,
    /// `reason`, `status_set_by`, `status_date` and optionally `comment`.
    pub fn create(&self, status_data: Value) -> Result<Value, FinAutError> {
        self.client.post(format!("{ENDPOINT}/"), status_data)
    }

    /// Sets a user inactive (`hvilende`) in an authorization scheme.
    pub fn set_inactive(
        &self,
        user_id: u64,
        appname: &str,
        change: &StatusChange,
    ) -> Result<Value, FinAutError> {
        self.create(self.status_payload(user_id, appname, STATUS_INACTIVE, change))
    }

    /// Withdraws a user (`utmeldt`) from an authorization scheme.
    pub fn set_withdrawn(
        &self,
        user_id: u64,
        appname: &str,
        change: &StatusChange,
    ) -> Result<Value, FinAutError> {
        self.create(self.status_payload(user_id, appname, STATUS_WITHDRAWN, change))
    }

    pub fn get_latest(&self, persnr: Option<&str>) -> Result<Value, FinAutError> {
        let descriptor =
            CallDescriptor::get(format!("{LATEST_ENDPOINT}/")).with_query_opt("persnr", persnr);
        self.client.request(descriptor)
    }

    fn status_payload(
        &self,
        user_id: u64,
        appname: &str,
        status: &str,
        change: &StatusChange,
    ) -> Value {
        let base_url = self.client.base_url();
        let set_by_id = change.status_set_by_id.unwrap_or(user_id);
        let status_date = change
            .status_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let mut payload = json!({
            "appname": appname,
            "user": format!("{base_url}user/{user_id}/"),
            "status": status,
            // The API requires `reason` and it mirrors the status here.
            "reason": status,
            "status_set_by": format!("{base_url}user/{set_by_id}/"),
            "status_date": status_date.format("%Y-%m-%d").to_string(),
        });
        if let Some(comment) = &change.comment {
            payload["comment"] = Value::String(comment.clone());
        }
        payload
    }
}

use chrono::{Duration, NaiveDate, Utc};
use serde_json::Value;

use super::ResultPage;
use crate::client::FinAutClient;
use crate::error::{ErrorDetails, FinAutError};
use crate::http_client::HttpClient;
use crate::request::CallDescriptor;

const ENDPOINT: &str = "results";

#[derive(Debug, Clone, Default)]
pub struct ResultQuery {
    /// Only results achieved on or after this date.
    pub from_date: Option<NaiveDate>,
    pub persnr: Option<String>,
    pub employee_alias: Option<String>,
    pub page: Option<u32>,
}

/// Exam/assessment results.
pub struct ResultResource<'a, C>
where
    C: HttpClient,
{
    client: &'a FinAutClient<C>,
}

impl<'a, C> ResultResource<'a, C>
where
    C: HttpClient,
{
    pub(crate) fn new(client: &'a FinAutClient<C>) -> Self {
        Self { client }
    }

    pub fn list(&self, query: &ResultQuery) -> Result<Value, FinAutError> {
        let descriptor = CallDescriptor::get(format!("{ENDPOINT}/"))
            .with_query_opt(
                "from_date",
                query.from_date.map(|d| d.format("%Y-%m-%d").to_string()),
            )
            .with_query_opt("persnr", query.persnr.as_ref())
            .with_query_opt("employee_alias", query.employee_alias.as_ref())
            .with_query_opt("page", query.page);
        self.client.request(descriptor)
    }

    pub fn get(&self, result_id: u64) -> Result<Value, FinAutError> {
        self.client.get(format!("{ENDPOINT}/{result_id}/"))
    }

    /// All results for one user, following pagination. At least one of the
    /// identifiers must be provided; `user_id` filters client-side on the
    /// result's user URL.
    pub fn get_user_results(
        &self,
        user_id: Option<u64>,
        persnr: Option<&str>,
        employee_alias: Option<&str>,
    ) -> Result<Vec<Value>, FinAutError> {
        if user_id.is_none() && persnr.is_none() && employee_alias.is_none() {
            return Err(FinAutError::Validation(ErrorDetails::new(
                "must provide at least one user identifier",
            )));
        }

        let query = ResultQuery {
            persnr: persnr.map(str::to_string),
            employee_alias: employee_alias.map(str::to_string),
            ..Default::default()
        };
        let mut results = self.collect_pages(query)?;

        if let Some(user_id) = user_id {
            let user_url = format!("{}user/{user_id}/", self.client.base_url());
            results.retain(|r| r.get("user").and_then(Value::as_str) == Some(user_url.as_str()));
        }

        Ok(results)
    }

    /// Results from the last `days` days, following pagination.
    pub fn get_recent_results(&self, days: u32) -> Result<Vec<Value>, FinAutError> {
        let from_date = (Utc::now() - Duration::days(days.into())).date_naive();
        self.collect_pages(ResultQuery {
            from_date: Some(from_date),
            ..Default::default()
        })
    }

    fn collect_pages(&self, mut query: ResultQuery) -> Result<Vec<Value>, FinAutError> {
        let mut all_results = Vec::new();
        let mut page = 1;
        loop {
            query.page = Some(page);
            let response = ResultPage::try_from(self.list(&query)?)?;
            all_results.extend(response.results);
            if response.next.is_none() {
                break;
            }
            page += 1;
        }
        Ok(all_results)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use httpmock::{Method::GET, MockServer};
    use serde_json::json;

    use super::*;
    use crate::resources::testing::client_for;

    #[test]
    fn list_formats_the_from_date() {
        let server = MockServer::start();
        let client = client_for(&server);
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/finautapi/v1/results/")
                .query_param("from_date", "2024-02-01");
            then.status(200).json_body(json!({"results": []}));
        });

        let query = ResultQuery {
            from_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            ..Default::default()
        };
        client.results().list(&query).unwrap();
        api_mock.assert();
    }

    #[test]
    fn get_user_results_requires_an_identifier() {
        let server = MockServer::start();
        let client = client_for(&server);

        let error = client.results().get_user_results(None, None, None).unwrap_err();
        assert_matches!(error, FinAutError::Validation(_));
    }

    #[test]
    fn get_user_results_follows_pagination() {
        let server = MockServer::start();
        let client = client_for(&server);
        let page_one = server.mock(|when, then| {
            when.method(GET)
                .path("/finautapi/v1/results/")
                .query_param("page", "1");
            then.status(200).json_body(json!({
                "next": "https://api.norsktest.no/finautapi/v1/results/?page=2",
                "results": [{"id": 1}]
            }));
        });
        let page_two = server.mock(|when, then| {
            when.method(GET)
                .path("/finautapi/v1/results/")
                .query_param("page", "2");
            then.status(200).json_body(json!({
                "next": null,
                "results": [{"id": 2}]
            }));
        });

        let results = client
            .results()
            .get_user_results(None, Some("01234567890"), None)
            .unwrap();

        assert_eq!(results.len(), 2);
        page_one.assert();
        page_two.assert();
    }

    #[test]
    fn get_user_results_filters_by_user_url() {
        let server = MockServer::start();
        let client = client_for(&server);
        let base = format!("{}/finautapi/v1", server.base_url());
        server.mock(move |when, then| {
            when.method(GET).path("/finautapi/v1/results/");
            then.status(200).json_body(json!({
                "next": null,
                "results": [
                    {"id": 1, "user": format!("{base}/user/5/")},
                    {"id": 2, "user": format!("{base}/user/6/")}
                ]
            }));
        });

        let results = client
            .results()
            .get_user_results(Some(5), Some("01234567890"), None)
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["id"], 1);
    }
}

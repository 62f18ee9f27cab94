//! Resource method groups mapping domain operations onto API endpoints.
//! Each wrapper builds [`crate::request::CallDescriptor`]s and consumes the
//! pipeline's payload/error contract verbatim.

pub mod companies;
pub mod competency_result;
pub mod departments;
pub mod employment;
pub mod results;
pub mod users;
pub mod userstatus;

pub use companies::CompanyResource;
pub use competency_result::CompetencyResultResource;
pub use departments::DepartmentResource;
pub use employment::EmploymentResource;
pub use results::ResultResource;
pub use users::UserResource;
pub use userstatus::UserStatusResource;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ErrorDetails, FinAutError};

/// One page of a paginated list response.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultPage {
    pub count: Option<u64>,
    pub next: Option<String>,
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<Value>,
}

impl TryFrom<Value> for ResultPage {
    type Error = FinAutError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value).map_err(|e| {
            FinAutError::Unexpected(ErrorDetails::new(format!(
                "unable to parse paginated response: {e}"
            )))
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn result_page_parses_pagination_fields() {
        let page = ResultPage::try_from(json!({
            "count": 2,
            "next": "https://api.norsktest.no/finautapi/v1/user/?page=2",
            "previous": null,
            "results": [{"id": 1}, {"id": 2}]
        }))
        .unwrap();

        assert_eq!(page.count, Some(2));
        assert!(page.next.is_some());
        assert_eq!(page.results.len(), 2);
    }

    #[test]
    fn result_page_rejects_non_object_payloads() {
        let result = ResultPage::try_from(json!("not a page"));
        assert_matches!(result, Err(FinAutError::Unexpected(_)));
    }
}

//! `PostgREST` implementation of [`TableStore`].

use async_trait::async_trait;
use reqwest::{Method, Response};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::{ErrorBody, SupabaseClient, retry_after};
use crate::backend::{Caller, TableStore};
use crate::error::StoreError;
use crate::query::{Filter, Select, Table, filter_pairs};

const RETURN_REPRESENTATION: &str = "return=representation";

impl SupabaseClient {
    fn table_url(&self, table: Table, pairs: &[(String, String)]) -> Result<Url, StoreError> {
        let mut url = self
            .inner
            .rest_url
            .join(table.name())
            .map_err(|e| StoreError::InvalidResponse(format!("invalid table URL: {e}")))?;
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }
}

/// Turn a `PostgREST` response into rows, mapping failures to [`StoreError`].
async fn read_rows(table: Table, response: Response) -> Result<Vec<Value>, StoreError> {
    if let Some(secs) = retry_after(&response) {
        return Err(StoreError::RateLimited(secs));
    }

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let error = ErrorBody::parse(&body);
        tracing::warn!(
            table = %table,
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "table API returned non-success status"
        );
        return Err(StoreError::Api {
            status: status.as_u16(),
            code: error.code(),
            message: error.message(status, &body),
        });
    }

    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!(
            table = %table,
            error = %e,
            body = %body.chars().take(500).collect::<String>(),
            "failed to parse table API response"
        );
        StoreError::Decode(e)
    })
}

/// Total from a `Content-Range` header such as `0-24/25` or `*/0`.
fn content_range_total(header: &str) -> Option<u64> {
    header.rsplit_once('/')?.1.parse().ok()
}

fn require_filters(filters: &[Filter], operation: &'static str) -> Result<(), StoreError> {
    if filters.is_empty() {
        return Err(StoreError::MissingFilter(operation));
    }
    Ok(())
}

#[async_trait]
impl TableStore for SupabaseClient {
    #[instrument(skip(self, query), fields(table = %table))]
    async fn select(
        &self,
        caller: Caller<'_>,
        table: Table,
        query: &Select,
    ) -> Result<Vec<Value>, StoreError> {
        let url = self.table_url(table, &query.query_pairs())?;
        let response = self.request(Method::GET, url, caller).send().await?;
        let rows = read_rows(table, response).await?;
        debug!(rows = rows.len(), "select");
        Ok(rows)
    }

    #[instrument(skip(self, filters), fields(table = %table))]
    async fn count(
        &self,
        caller: Caller<'_>,
        table: Table,
        filters: &[Filter],
    ) -> Result<u64, StoreError> {
        let mut pairs = vec![("select".to_string(), "*".to_string())];
        pairs.extend(filter_pairs(filters));
        let url = self.table_url(table, &pairs)?;

        let response = self
            .request(Method::HEAD, url, caller)
            .header("Prefer", "count=exact")
            .send()
            .await?;

        let header = response
            .headers()
            .get("Content-Range")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        read_rows(table, response).await?;

        header
            .as_deref()
            .and_then(content_range_total)
            .ok_or_else(|| StoreError::InvalidResponse("missing Content-Range total".to_string()))
    }

    #[instrument(skip(self, rows), fields(table = %table, rows = rows.len()))]
    async fn insert(
        &self,
        caller: Caller<'_>,
        table: Table,
        rows: Vec<Value>,
    ) -> Result<Vec<Value>, StoreError> {
        let url = self.table_url(table, &[])?;
        let response = self
            .request(Method::POST, url, caller)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&rows)
            .send()
            .await?;
        read_rows(table, response).await
    }

    #[instrument(skip(self, filters, patch), fields(table = %table))]
    async fn update(
        &self,
        caller: Caller<'_>,
        table: Table,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, StoreError> {
        require_filters(filters, "update")?;
        let url = self.table_url(table, &filter_pairs(filters))?;
        let response = self
            .request(Method::PATCH, url, caller)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&patch)
            .send()
            .await?;
        read_rows(table, response).await
    }

    #[instrument(skip(self, rows), fields(table = %table, rows = rows.len()))]
    async fn upsert(
        &self,
        caller: Caller<'_>,
        table: Table,
        on_conflict: &'static str,
        rows: Vec<Value>,
    ) -> Result<Vec<Value>, StoreError> {
        let url = self.table_url(
            table,
            &[("on_conflict".to_string(), on_conflict.to_string())],
        )?;
        // A bulk POST is a single INSERT ... ON CONFLICT statement.
        let response = self
            .request(Method::POST, url, caller)
            .header(
                "Prefer",
                format!("resolution=merge-duplicates,{RETURN_REPRESENTATION}"),
            )
            .json(&rows)
            .send()
            .await?;
        read_rows(table, response).await
    }

    #[instrument(skip(self, filters), fields(table = %table))]
    async fn delete(
        &self,
        caller: Caller<'_>,
        table: Table,
        filters: &[Filter],
    ) -> Result<Vec<Value>, StoreError> {
        require_filters(filters, "delete")?;
        let url = self.table_url(table, &filter_pairs(filters))?;
        let response = self
            .request(Method::DELETE, url, caller)
            .header("Prefer", RETURN_REPRESENTATION)
            .send()
            .await?;
        read_rows(table, response).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;
    use crate::query::Direction;
    use crate::supabase::SupabaseConfig;

    fn client() -> SupabaseClient {
        SupabaseClient::new(&SupabaseConfig {
            url: Url::parse("https://abcd.supabase.co").unwrap(),
            anon_key: SecretString::from("anon".to_string()),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_content_range_total() {
        assert_eq!(content_range_total("0-24/25"), Some(25));
        assert_eq!(content_range_total("*/0"), Some(0));
        assert_eq!(content_range_total("0-24/*"), None);
        assert_eq!(content_range_total("garbage"), None);
    }

    #[test]
    fn test_table_url_encodes_query() {
        let query = Select::all()
            .eq("model", "romeo")
            .order_by("created_at", Direction::Desc)
            .limit(1);
        let url = client()
            .table_url(Table::Products, &query.query_pairs())
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://abcd.supabase.co/rest/v1/products?select=*&model=eq.romeo&order=created_at.desc&limit=1"
        );
    }

    #[test]
    fn test_require_filters() {
        assert!(matches!(
            require_filters(&[], "delete"),
            Err(StoreError::MissingFilter("delete"))
        ));
        assert!(require_filters(&[Filter::eq("id", "x")], "delete").is_ok());
    }
}

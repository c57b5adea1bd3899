// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde_json::Value;

use super::{Clause, DataService, Filter, Record, Table};
use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use crate::utils::http_client;

/// Client for a hosted PostgREST-style data service.
///
/// Change subscriptions travel over the service's websocket channel, which
/// this client does not speak; `subscribe` reports them as unsupported.
pub struct RestService {
    client: Client,
    base_url: String,
    api_key: String,
    access_token: Option<String>,
}

impl RestService {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        Ok(RestService {
            client: http_client()?,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            access_token: config.access_token.clone(),
        })
    }

    pub fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, table: Table, filter: &Filter) -> Result<RequestBuilder> {
        filter.validate()?;
        let bearer = self.access_token.as_deref().unwrap_or(&self.api_key);
        Ok(self
            .client
            .request(method, self.table_url(table))
            .query(&query_pairs(filter))
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
            .header("Prefer", "return=representation"))
    }

    fn send(builder: RequestBuilder) -> Result<Response> {
        let resp = builder.send()?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            let body = resp.text().unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %body, "data service rejected request");
            Err(Error::Remote {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// PostgREST query parameters for a filter.
pub fn query_pairs(filter: &Filter) -> Vec<(String, String)> {
    let mut pairs = vec![("select".to_string(), "*".to_string())];
    for clause in filter.clauses() {
        match clause {
            Clause::Eq(col, v) => pairs.push((col.clone(), format!("eq.{}", v))),
            Clause::Contains(col, v) => pairs.push((
                col.clone(),
                format!("cs.{{\"{}\"}}", v.replace('\\', "\\\\").replace('"', "\\\"")),
            )),
        }
    }
    pairs
}

/// Body for an insert; an empty id is left for the service to generate.
fn insert_body<T: Record>(record: &T) -> Result<Value> {
    let mut body = serde_json::to_value(record)?;
    if record.id().is_empty() {
        if let Some(obj) = body.as_object_mut() {
            obj.remove("id");
        }
    }
    Ok(body)
}

impl DataService for RestService {
    fn select<T: Record>(&self, filter: &Filter) -> Result<Vec<T>> {
        tracing::debug!(table = %T::TABLE, ?filter, "select");
        let resp = Self::send(self.request(Method::GET, T::TABLE, filter)?)?;
        Ok(resp.json()?)
    }

    fn insert<T: Record>(&self, record: &T) -> Result<T> {
        let body = insert_body(record)?;
        let resp = Self::send(
            self.request(Method::POST, T::TABLE, &Filter::new())?
                .json(&body),
        )?;
        let rows: Vec<T> = resp.json()?;
        let stored = rows.into_iter().next().ok_or_else(|| Error::Remote {
            status: 201,
            body: format!("insert into {} returned no row", T::TABLE),
        })?;
        tracing::debug!(table = %T::TABLE, id = stored.id(), "insert");
        Ok(stored)
    }

    fn update<T: Record>(&self, record: &T) -> Result<T> {
        let resp = Self::send(
            self.request(Method::PATCH, T::TABLE, &Filter::by_id(record.id()))?
                .json(record),
        )?;
        let rows: Vec<T> = resp.json()?;
        rows.into_iter()
            .next()
            .ok_or_else(|| Error::not_found(T::TABLE, record.id()))
    }

    fn delete(&self, table: Table, filter: &Filter) -> Result<usize> {
        if filter.is_empty() {
            return Err(Error::validation("filter", "refusing to delete every row"));
        }
        let resp = Self::send(self.request(Method::DELETE, table, filter)?)?;
        let rows: Vec<Value> = resp.json()?;
        tracing::debug!(%table, count = rows.len(), "delete");
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountKind, Account};
    use rust_decimal::Decimal;

    #[test]
    fn filters_become_postgrest_operators() {
        let filter = Filter::new()
            .eq("user_id", "u-1")
            .contains("tags", "transfer_id:abc");
        assert_eq!(
            query_pairs(&filter),
            vec![
                ("select".to_string(), "*".to_string()),
                ("user_id".to_string(), "eq.u-1".to_string()),
                ("tags".to_string(), "cs.{\"transfer_id:abc\"}".to_string()),
            ]
        );
    }

    #[test]
    fn table_urls_drop_trailing_slash() {
        let svc = RestService::new(&RemoteConfig {
            url: "https://example.test/".into(),
            api_key: "key".into(),
            access_token: None,
        })
        .unwrap();
        assert_eq!(
            svc.table_url(Table::DpsTransfers),
            "https://example.test/rest/v1/dps_transfers"
        );
    }

    #[test]
    fn insert_body_omits_empty_id() {
        let acct = Account {
            id: String::new(),
            user_id: "u".into(),
            name: "Main".into(),
            kind: AccountKind::Checking,
            currency: "USD".into(),
            initial_balance: Decimal::ZERO,
            calculated_balance: Decimal::ZERO,
            is_active: true,
            dps: None,
            donation_preference: None,
        };
        let body = insert_body(&acct).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["name"], "Main");
    }
}

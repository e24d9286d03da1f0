//! GitHub Projects (v2) GraphQL client
//!
//! Fetches the current item-level state of a project: item IDs, content
//! titles and timestamps, and every custom field value. The two configured
//! date field names are parsed into each item's date span; everything else
//! lands in the attribute bag.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::domain::{
    DateSpan, Item, ProjectState, CREATED_AT_KEY, DATE_FORMAT, TITLE_KEY, UPDATED_AT_KEY,
};

const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Items fetched per request; GitHub caps project item pages at 100
const PAGE_SIZE: u32 = 100;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GraphQL query failed: {0}")]
    Query(String),

    #[error("project {number} not found{}", .organization.as_ref().map(|o| format!(" in organization {}", o)).unwrap_or_default())]
    ProjectNotFound {
        number: u32,
        organization: Option<String>,
    },
}

/// GitHub API client
pub struct Client {
    http: HttpClient,
    base_url: String,
    token: String,
    verbose: bool,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Value,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

impl Client {
    /// Creates a client for the public GitHub API
    pub fn new(token: impl Into<String>, verbose: bool) -> Result<Self> {
        Self::with_base_url(token, GITHUB_GRAPHQL_URL, verbose)
    }

    /// Creates a client against a custom endpoint (used by tests and
    /// GitHub Enterprise installs)
    pub fn with_base_url(
        token: impl Into<String>,
        base_url: impl Into<String>,
        verbose: bool,
    ) -> Result<Self> {
        let http = HttpClient::builder()
            .user_agent(concat!("drift/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            token: token.into(),
            verbose,
        })
    }

    fn query(&self, query: &str, variables: Value) -> Result<Value> {
        let body = json!({ "query": query, "variables": variables });

        if self.verbose {
            eprintln!("[verbose:github] request: {}", body);
        }

        let response: GraphQlResponse = self
            .http
            .post(&self.base_url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;

        if let Some(error) = response.errors.first() {
            return Err(GithubError::Query(error.message.clone()).into());
        }

        if self.verbose {
            eprintln!("[verbose:github] response: {}", response.data);
        }

        Ok(response.data)
    }

    /// Looks up the node ID for a project by number
    ///
    /// Organization projects are looked up under the organization; without
    /// one the authenticated viewer's projects are searched.
    pub fn lookup_project_id(&self, number: u32, organization: Option<&str>) -> Result<String> {
        let (query, variables, root) = match organization {
            Some(login) => (
                "query($login: String!, $number: Int!) {
                    organization(login: $login) {
                        projectV2(number: $number) { id }
                    }
                }",
                json!({ "login": login, "number": number }),
                "organization",
            ),
            None => (
                "query($number: Int!) {
                    viewer {
                        projectV2(number: $number) { id }
                    }
                }",
                json!({ "number": number }),
                "viewer",
            ),
        };

        let data = self.query(query, variables)?;
        let id = data[root]["projectV2"]["id"].as_str().unwrap_or_default();

        if id.is_empty() {
            return Err(GithubError::ProjectNotFound {
                number,
                organization: organization.map(str::to_string),
            }
            .into());
        }

        Ok(id.to_string())
    }

    /// Fetches the current state of a project
    ///
    /// `start_field` and `end_field` name the two date fields that make up
    /// an item's timeline; all other fields become plain attributes.
    pub fn fetch_project_state(
        &self,
        number: u32,
        organization: Option<&str>,
        start_field: &str,
        end_field: &str,
    ) -> Result<ProjectState> {
        let project_id = self.lookup_project_id(number, organization)?;

        let query = "query($id: ID!, $first: Int!) {
            node(id: $id) {
                ... on ProjectV2 {
                    items(first: $first) {
                        nodes {
                            id
                            fieldValues(first: 100) {
                                nodes {
                                    __typename
                                    ... on ProjectV2ItemFieldTextValue {
                                        text
                                        field { ... on ProjectV2FieldCommon { name } }
                                    }
                                    ... on ProjectV2ItemFieldNumberValue {
                                        number
                                        field { ... on ProjectV2FieldCommon { name } }
                                    }
                                    ... on ProjectV2ItemFieldDateValue {
                                        date
                                        field { ... on ProjectV2FieldCommon { name } }
                                    }
                                    ... on ProjectV2ItemFieldSingleSelectValue {
                                        name
                                        field { ... on ProjectV2FieldCommon { name } }
                                    }
                                    ... on ProjectV2ItemFieldRepositoryValue {
                                        repository { name owner { login } }
                                        field { ... on ProjectV2FieldCommon { name } }
                                    }
                                }
                            }
                            content {
                                __typename
                                ... on Issue { title createdAt updatedAt }
                                ... on PullRequest { title createdAt updatedAt }
                                ... on DraftIssue { title createdAt updatedAt }
                            }
                        }
                    }
                }
            }
        }";

        let data = self.query(query, json!({ "id": project_id, "first": PAGE_SIZE }))?;

        let mut state = ProjectState::new(number);
        state.timestamp = Utc::now();
        state.project_id = project_id;
        state.organization = organization.unwrap_or_default().to_string();

        let nodes = data["node"]["items"]["nodes"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        for node in nodes {
            state.items.push(parse_item(&node, start_field, end_field));
        }

        Ok(state)
    }
}

/// Builds an [`Item`] from one project item node
fn parse_item(node: &Value, start_field: &str, end_field: &str) -> Item {
    let mut item = Item::new(node["id"].as_str().unwrap_or_default());

    let content = &node["content"];
    let title = content["title"].as_str().unwrap_or_default();
    if title.is_empty() {
        let type_name = content["__typename"].as_str().unwrap_or_default();
        item = item.with_attribute(TITLE_KEY, format!("Unknown type: {}", type_name));
    } else {
        item = item.with_attribute(TITLE_KEY, title);
    }
    for (key, attr) in [("createdAt", CREATED_AT_KEY), ("updatedAt", UPDATED_AT_KEY)] {
        if let Some(value) = content[key].as_str() {
            item = item.with_attribute(attr, value);
        }
    }

    let mut span_start: Option<NaiveDate> = None;
    let mut span_end: Option<NaiveDate> = None;

    let field_values = node["fieldValues"]["nodes"].as_array().cloned().unwrap_or_default();
    for field_value in &field_values {
        let name = field_value["field"]["name"].as_str().unwrap_or_default();
        if name.is_empty() {
            continue;
        }

        match field_value["__typename"].as_str().unwrap_or_default() {
            "ProjectV2ItemFieldTextValue" => {
                // the content title is already captured
                if name != TITLE_KEY {
                    let text = field_value["text"].as_str().unwrap_or_default();
                    item = item.with_attribute(name, text);
                }
            }
            "ProjectV2ItemFieldNumberValue" => {
                if let Some(number) = field_value["number"].as_f64() {
                    item = item.with_attribute(name, number);
                }
            }
            "ProjectV2ItemFieldDateValue" => {
                let date_str = field_value["date"].as_str().unwrap_or_default();
                if name == start_field || name == end_field {
                    if let Ok(date) = NaiveDate::parse_from_str(date_str, DATE_FORMAT) {
                        if name == start_field {
                            span_start = Some(date);
                        } else {
                            span_end = Some(date);
                        }
                    }
                } else {
                    item = item.with_attribute(name, date_str);
                }
            }
            "ProjectV2ItemFieldSingleSelectValue" => {
                let selected = field_value["name"].as_str().unwrap_or_default();
                item = item.with_attribute(name, selected);
            }
            "ProjectV2ItemFieldRepositoryValue" => {
                let owner = field_value["repository"]["owner"]["login"]
                    .as_str()
                    .unwrap_or_default();
                let repo = field_value["repository"]["name"].as_str().unwrap_or_default();
                item = item.with_attribute(name, format!("{}/{}", owner, repo));
            }
            _ => {}
        }
    }

    // A span only exists when both fields parsed and are ordered
    if let (Some(start), Some(end)) = (span_start, span_end) {
        if let Ok(span) = DateSpan::new(start, end) {
            item = item.with_span(span);
        }
    }

    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item_node(field_values: Value) -> Value {
        json!({
            "id": "PVTI_abc",
            "content": {
                "__typename": "Issue",
                "title": "Fix the flaky test",
                "createdAt": "2024-01-01T08:00:00Z",
                "updatedAt": "2024-02-01T09:30:00Z",
            },
            "fieldValues": { "nodes": field_values },
        })
    }

    #[test]
    fn parses_content_title_and_timestamps() {
        let item = parse_item(&item_node(json!([])), "Start", "End");

        assert_eq!(item.id, "PVTI_abc");
        assert_eq!(item.title(), "Fix the flaky test");
        assert!(item.created_at().is_some());
        assert!(item.updated_at().is_some());
    }

    #[test]
    fn missing_title_falls_back_to_type_name() {
        let node = json!({
            "id": "PVTI_x",
            "content": { "__typename": "Mystery" },
            "fieldValues": { "nodes": [] },
        });

        let item = parse_item(&node, "Start", "End");
        assert_eq!(item.title(), "Unknown type: Mystery");
    }

    #[test]
    fn date_fields_become_the_span() {
        let node = item_node(json!([
            {
                "__typename": "ProjectV2ItemFieldDateValue",
                "date": "2024-03-01",
                "field": { "name": "Start" },
            },
            {
                "__typename": "ProjectV2ItemFieldDateValue",
                "date": "2024-03-15",
                "field": { "name": "End" },
            },
        ]));

        let item = parse_item(&node, "Start", "End");
        let span = item.span.unwrap();
        assert_eq!(span.duration_days(), 15);
        // span fields do not leak into the attribute bag
        assert!(!item.attributes.contains_key("Start"));
        assert!(!item.attributes.contains_key("End"));
    }

    #[test]
    fn lone_date_field_stays_unset() {
        let node = item_node(json!([
            {
                "__typename": "ProjectV2ItemFieldDateValue",
                "date": "2024-03-01",
                "field": { "name": "Start" },
            },
        ]));

        let item = parse_item(&node, "Start", "End");
        assert!(item.span.is_none());
    }

    #[test]
    fn reversed_date_fields_stay_unset() {
        let node = item_node(json!([
            {
                "__typename": "ProjectV2ItemFieldDateValue",
                "date": "2024-03-15",
                "field": { "name": "Start" },
            },
            {
                "__typename": "ProjectV2ItemFieldDateValue",
                "date": "2024-03-01",
                "field": { "name": "End" },
            },
        ]));

        let item = parse_item(&node, "Start", "End");
        assert!(item.span.is_none());
    }

    #[test]
    fn other_date_fields_become_string_attributes() {
        let node = item_node(json!([
            {
                "__typename": "ProjectV2ItemFieldDateValue",
                "date": "2024-06-30",
                "field": { "name": "Review by" },
            },
        ]));

        let item = parse_item(&node, "Start", "End");
        assert_eq!(item.attributes["Review by"], json!("2024-06-30"));
    }

    #[test]
    fn field_value_types_map_to_attributes() {
        let node = item_node(json!([
            {
                "__typename": "ProjectV2ItemFieldTextValue",
                "text": "needs design",
                "field": { "name": "Notes" },
            },
            {
                "__typename": "ProjectV2ItemFieldNumberValue",
                "number": 8.0,
                "field": { "name": "Estimate" },
            },
            {
                "__typename": "ProjectV2ItemFieldSingleSelectValue",
                "name": "In Progress",
                "field": { "name": "status" },
            },
            {
                "__typename": "ProjectV2ItemFieldRepositoryValue",
                "repository": { "name": "drift", "owner": { "login": "acme" } },
                "field": { "name": "Repository" },
            },
        ]));

        let item = parse_item(&node, "Start", "End");
        assert_eq!(item.attributes["Notes"], json!("needs design"));
        assert_eq!(item.attributes["Estimate"], json!(8.0));
        assert_eq!(item.status(), "In Progress");
        assert_eq!(item.attributes["Repository"], json!("acme/drift"));
    }

    #[test]
    fn duplicate_title_field_value_is_skipped() {
        let node = item_node(json!([
            {
                "__typename": "ProjectV2ItemFieldTextValue",
                "text": "Different title text",
                "field": { "name": "Title" },
            },
        ]));

        let item = parse_item(&node, "Start", "End");
        assert_eq!(item.title(), "Fix the flaky test");
    }
}

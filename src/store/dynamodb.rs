//! DynamoDB-backed [`ItemStore`].

use super::{ItemStore, LookupRequest};
use crate::error::BackendError;
use crate::value::{StoreRecord, TypedValue};
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::types::AttributeValue;

/// Item store backed by an `aws_sdk_dynamodb::Client`.
///
/// Cloning is cheap; clones share the SDK client's connection pool.
#[derive(Clone)]
pub struct DynamoDbItemStore {
    client: Client,
    region: String,
}

impl std::fmt::Debug for DynamoDbItemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoDbItemStore")
            .field("region", &self.region)
            .finish()
    }
}

impl DynamoDbItemStore {
    /// Wrap a pre-built client.
    pub fn from_client(client: Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    /// The underlying SDK client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Region the client was built for.
    pub fn region(&self) -> &str {
        &self.region
    }
}

#[async_trait]
impl ItemStore for DynamoDbItemStore {
    async fn get_item(&self, request: &LookupRequest) -> Result<Option<StoreRecord>, BackendError> {
        let response = self
            .client
            .get_item()
            .table_name(&request.table)
            .key(&request.key_attribute, AttributeValue::S(request.key.clone()))
            .send()
            .await
            .map_err(|e| map_get_item_error(e, &request.table))?;

        Ok(response
            .item
            .filter(|item| !item.is_empty())
            .map(|item| {
                item.into_iter()
                    .map(|(name, value)| (name, from_attribute_value(value)))
                    .collect()
            }))
    }

    fn name(&self) -> String {
        format!("dynamodb:{}", self.region)
    }
}

/// Translate an SDK attribute value into a [`TypedValue`].
///
/// Binary values, sets and explicit nulls have no counterpart and become
/// [`TypedValue::Unknown`].
pub fn from_attribute_value(value: AttributeValue) -> TypedValue {
    match value {
        AttributeValue::S(s) => TypedValue::String(s),
        AttributeValue::N(n) => TypedValue::Number(n),
        AttributeValue::Bool(b) => TypedValue::Bool(b),
        AttributeValue::M(map) => TypedValue::Map(
            map.into_iter()
                .map(|(key, value)| (key, from_attribute_value(value)))
                .collect(),
        ),
        AttributeValue::L(list) => {
            TypedValue::List(list.into_iter().map(from_attribute_value).collect())
        }
        _ => TypedValue::Unknown,
    }
}

fn map_get_item_error(err: SdkError<GetItemError>, table: &str) -> BackendError {
    let message = DisplayErrorContext(&err).to_string();

    match &err {
        SdkError::ServiceError(service_err) => match service_err.err() {
            GetItemError::ResourceNotFoundException(_) => {
                BackendError::TableNotFound(table.to_string())
            }
            GetItemError::ProvisionedThroughputExceededException(_)
            | GetItemError::RequestLimitExceeded(_) => BackendError::Throttled(message),
            _ => BackendError::Service(message),
        },
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => {
            BackendError::Transport(message)
        }
        _ => BackendError::Service(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::primitives::Blob;
    use std::collections::HashMap;

    #[test]
    fn test_scalars() {
        assert_eq!(
            from_attribute_value(AttributeValue::S("db1".into())),
            TypedValue::string("db1")
        );
        assert_eq!(
            from_attribute_value(AttributeValue::N("123456789012345".into())),
            TypedValue::number("123456789012345")
        );
        assert_eq!(
            from_attribute_value(AttributeValue::Bool(true)),
            TypedValue::Bool(true)
        );
    }

    #[test]
    fn test_nested_map_and_list() {
        let mut inner = HashMap::new();
        inner.insert("port".to_string(), AttributeValue::N("5432".into()));
        let value = AttributeValue::M(
            [
                ("database".to_string(), AttributeValue::M(inner)),
                (
                    "hosts".to_string(),
                    AttributeValue::L(vec![AttributeValue::S("a".into())]),
                ),
            ]
            .into_iter()
            .collect(),
        );

        let converted = from_attribute_value(value);
        let map = converted.as_map().unwrap();
        assert_eq!(
            map["database"],
            TypedValue::map([("port", TypedValue::number("5432"))])
        );
        assert_eq!(map["hosts"], TypedValue::List(vec![TypedValue::string("a")]));
    }

    #[test]
    fn test_unsupported_variants_are_unknown() {
        assert_eq!(
            from_attribute_value(AttributeValue::Null(true)),
            TypedValue::Unknown
        );
        assert_eq!(
            from_attribute_value(AttributeValue::Ss(vec!["a".into()])),
            TypedValue::Unknown
        );
        assert_eq!(
            from_attribute_value(AttributeValue::B(Blob::new(vec![1, 2, 3]))),
            TypedValue::Unknown
        );
    }
}

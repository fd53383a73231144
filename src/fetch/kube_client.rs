//! [`ResourceClient`] backed by the kube-rs dynamic API

use async_trait::async_trait;
use kube::api::ListParams;
use kube::core::DynamicObject;
use kube::{Api, Client};

use super::{ListPage, ResourceClient};
use crate::discovery::ResourceDescriptor;
use crate::error::ListError;
use crate::tree::Object;

pub struct KubeResourceClient {
    client: Client,
}

impl KubeResourceClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, resource: &ResourceDescriptor, namespace: Option<&str>) -> Api<DynamicObject> {
        let api_resource = resource.api_resource();
        match namespace {
            Some(ns) if resource.namespaced => {
                Api::namespaced_with(self.client.clone(), ns, &api_resource)
            }
            _ => Api::all_with(self.client.clone(), &api_resource),
        }
    }
}

fn to_object(obj: DynamicObject, kind: &str) -> Result<Object, ListError> {
    let value = serde_json::to_value(&obj)
        .map_err(|e| ListError::Other(format!("failed to serialize object: {}", e)))?;
    Ok(Object::from_value(value).with_kind(kind))
}

fn list_error(err: kube::Error) -> ListError {
    match &err {
        kube::Error::Api(status) if status.code == 403 => ListError::Forbidden(err.to_string()),
        kube::Error::Api(status) if status.code == 404 => ListError::NotFound(err.to_string()),
        _ => ListError::Other(err.to_string()),
    }
}

#[async_trait]
impl ResourceClient for KubeResourceClient {
    async fn list_page(
        &self,
        resource: &ResourceDescriptor,
        namespace: Option<&str>,
        limit: u32,
        continue_token: &str,
    ) -> Result<ListPage, ListError> {
        let mut params = ListParams::default().limit(limit);
        if !continue_token.is_empty() {
            params = params.continue_token(continue_token);
        }

        let list = self
            .api(resource, namespace)
            .list(&params)
            .await
            .map_err(list_error)?;

        let items = list
            .items
            .into_iter()
            .map(|obj| to_object(obj, &resource.kind))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ListPage {
            items,
            continue_token: list.metadata.continue_.unwrap_or_default(),
        })
    }

    async fn get(
        &self,
        resource: &ResourceDescriptor,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<Object, ListError> {
        let obj = self
            .api(resource, namespace)
            .get(name)
            .await
            .map_err(list_error)?;
        to_object(obj, &resource.kind)
    }
}

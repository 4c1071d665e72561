//! Repositories: CRUD for one mapped class.

use reqwest::{Method, Url};
use serde_json::Value;
use tracing::debug;

use rcs_mapping::ClassMetadata;
use rcs_types::{into_model, EntityId, Model};

use crate::error::{SdkError, SdkResult};
use crate::sdk::RestClientSdk;
use crate::serializer::Serializer;
use crate::url::{build_url, collection_path, entity_path, QueryParams};

/// CRUD operations for one class, obtained from
/// [`RestClientSdk::get_repository`].
///
/// Every entity read from the API is registered clean in the client's unit of
/// work, so a later [`update`](Self::update) only sends the fields that
/// changed since.
pub struct Repository<'a, S> {
    sdk: &'a RestClientSdk<S>,
    meta: &'a ClassMetadata,
}

impl<'a, S: Serializer> Repository<'a, S> {
    pub(crate) fn new(sdk: &'a RestClientSdk<S>, meta: &'a ClassMetadata) -> Self {
        Self { sdk, meta }
    }

    pub fn metadata(&self) -> &ClassMetadata {
        self.meta
    }

    /// URL of the entity identified by `id`.
    pub fn entity_url(&self, id: &EntityId, query: &QueryParams) -> SdkResult<Url> {
        let path = entity_path(self.sdk.mapping(), self.meta, id);
        build_url(self.sdk.config(), &path, query)
    }

    /// URL of the collection.
    pub fn collection_url(&self, query: &QueryParams) -> SdkResult<Url> {
        build_url(self.sdk.config(), &collection_path(self.meta), query)
    }

    /// Fetch one entity.
    pub async fn find(&self, id: impl Into<EntityId>, query: &QueryParams) -> SdkResult<S::Entity> {
        let url = self.entity_url(&id.into(), query)?;
        let body = self.sdk.authorized_fetch(Method::GET, url, None).await?;
        let model = self.decode_model(&body)?;
        self.register(model)
    }

    /// Fetch a collection.
    ///
    /// Items are read from the configured collection key, or from the body
    /// itself when it is a JSON array.
    pub async fn find_by(&self, query: &QueryParams) -> SdkResult<Vec<S::Entity>> {
        let url = self.collection_url(query)?;
        let body = self.sdk.authorized_fetch(Method::GET, url, None).await?;
        let items = self.collection_items(self.sdk.serializer().decode(&body)?)?;
        debug!(class = self.meta.key(), count = items.len(), "fetched collection");
        items
            .into_iter()
            .map(|item| self.register(into_model(item)?))
            .collect()
    }

    pub async fn find_all(&self) -> SdkResult<Vec<S::Entity>> {
        self.find_by(&QueryParams::new()).await
    }

    /// POST a new entity. The body holds every field that differs from the
    /// class's default shape.
    pub async fn create(&self, entity: &S::Entity, query: &QueryParams) -> SdkResult<S::Entity> {
        let model = self.sdk.serializer().normalize(entity, self.meta)?;
        let default = self.meta.default_serialized_model();
        let diff = self.sdk.unit_of_work().dirty_data(&model, &default, self.meta)?;

        let url = self.collection_url(query)?;
        let body = self.sdk.serializer().encode(&diff)?;
        let response = self.sdk.authorized_fetch(Method::POST, url, Some(body)).await?;
        self.register(self.response_model(&response, model)?)
    }

    /// PUT an existing entity.
    ///
    /// With the unit of work enabled the body only holds the fields changed
    /// since the entity was last registered clean (or since the default shape
    /// when it never was). Otherwise the full model is sent.
    pub async fn update(&self, entity: &S::Entity, query: &QueryParams) -> SdkResult<S::Entity> {
        let model = self.sdk.serializer().normalize(entity, self.meta)?;
        let id = self.required_id(&model)?;

        let unit_of_work = self.sdk.unit_of_work();
        let payload = if unit_of_work.is_enabled() {
            unit_of_work.dirty_data_for(Some(&id), &model, self.meta)?
        } else {
            model.clone()
        };

        let url = self.entity_url(&id, query)?;
        let body = self.sdk.serializer().encode(&payload)?;
        let response = self.sdk.authorized_fetch(Method::PUT, url, Some(body)).await?;
        self.register(self.response_model(&response, model)?)
    }

    /// DELETE an entity and forget its snapshot.
    pub async fn delete(&self, entity: &S::Entity) -> SdkResult<()> {
        let model = self.sdk.serializer().normalize(entity, self.meta)?;
        let id = self.required_id(&model)?;

        let url = self.entity_url(&id, &QueryParams::new())?;
        self.sdk.authorized_fetch(Method::DELETE, url, None).await?;
        self.sdk.unit_of_work().clear(id);
        Ok(())
    }

    fn entity_id(&self, model: &Model) -> SdkResult<Option<EntityId>> {
        let key = self.meta.identifier_key()?;
        match model.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(EntityId::from_value(value)?)),
        }
    }

    fn required_id(&self, model: &Model) -> SdkResult<EntityId> {
        self.entity_id(model)?
            .ok_or_else(|| SdkError::MissingEntityId(self.meta.key().to_string()))
    }

    /// Record `model` as the clean state of its entity and hand it back as an
    /// entity.
    fn register(&self, model: Model) -> SdkResult<S::Entity> {
        if let Some(id) = self.entity_id(&model)? {
            self.sdk.unit_of_work().register_clean(id, model.clone());
        }
        self.sdk.serializer().denormalize(model, self.meta)
    }

    fn decode_model(&self, body: &str) -> SdkResult<Model> {
        Ok(into_model(self.sdk.serializer().decode(body)?)?)
    }

    /// The entity echoed by a write, or the sent model when the response has
    /// no body.
    fn response_model(&self, body: &str, sent: Model) -> SdkResult<Model> {
        if body.trim().is_empty() {
            Ok(sent)
        } else {
            self.decode_model(body)
        }
    }

    fn collection_items(&self, body: Value) -> SdkResult<Vec<Value>> {
        let collection_key = &self.sdk.mapping().config().collection_key;
        match body {
            Value::Array(items) => Ok(items),
            Value::Object(mut object) => match object.remove(collection_key) {
                Some(Value::Array(items)) => Ok(items),
                _ => Err(SdkError::InvalidResponse(format!(
                    "collection has no {collection_key:?} array"
                ))),
            },
            other => Err(SdkError::InvalidResponse(format!(
                "expected a collection, got {other}"
            ))),
        }
    }
}

impl<S> std::fmt::Debug for Repository<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("class", &self.meta.key())
            .field("path_root", &self.meta.path_root())
            .finish()
    }
}

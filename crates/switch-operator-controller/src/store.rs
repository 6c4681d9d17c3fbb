//! Access to the cluster's resources.
//!
//! Reconcilers only need four verbs on a cluster-scoped resource: read it,
//! rewrite its finalizers, merge-patch its status, and server-side apply it.
//! [`ResourceStore`] captures those so reconcilers can run against
//! [`memory::MemoryResourceStore`] in tests.

use std::fmt::Debug;

use async_trait::async_trait;
use kube::api::{Api, Patch, PatchParams};
use kube::{Client, Resource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::{ControllerError, Result};

/// Field manager used for server-side apply.
pub const FIELD_MANAGER: &str = "switch-controller";

/// The resource operations a reconciler performs.
#[async_trait]
pub trait ResourceStore<K>: Send + Sync
where
    K: Send + Sync + 'static,
{
    /// Read an object, `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the object cannot be read.
    async fn get(&self, name: &str) -> Result<Option<K>>;

    /// Replace the object's finalizer list.
    ///
    /// # Errors
    ///
    /// Returns an error if the patch is rejected.
    async fn patch_finalizers(&self, name: &str, finalizers: Vec<String>) -> Result<()>;

    /// Merge-patch the object's status subresource.
    ///
    /// # Errors
    ///
    /// Returns an error if the patch is rejected.
    async fn patch_status(&self, name: &str, patch: Value) -> Result<()>;

    /// Server-side apply `object`, forcing ownership of conflicting fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the object has no name or the apply is rejected.
    async fn apply(&self, object: &K) -> Result<()>;
}

/// [`ResourceStore`] backed by the Kubernetes API server.
pub struct KubeStore<K> {
    api: Api<K>,
}

impl<K> KubeStore<K>
where
    K: Resource<DynamicType = ()>,
{
    /// Create a store for all objects of kind `K`.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            api: Api::all(client),
        }
    }
}

#[async_trait]
impl<K> ResourceStore<K> for KubeStore<K>
where
    K: Resource<DynamicType = ()> + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn get(&self, name: &str) -> Result<Option<K>> {
        Ok(self.api.get_opt(name).await?)
    }

    async fn patch_finalizers(&self, name: &str, finalizers: Vec<String>) -> Result<()> {
        let patch = json!({ "metadata": { "finalizers": finalizers } });
        self.api
            .patch(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await?;
        Ok(())
    }

    async fn patch_status(&self, name: &str, patch: Value) -> Result<()> {
        debug!(name, %patch, "Patching status");
        let patch = json!({ "status": patch });
        self.api
            .patch_status(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await?;
        Ok(())
    }

    async fn apply(&self, object: &K) -> Result<()> {
        let name = object
            .meta()
            .name
            .clone()
            .ok_or(ControllerError::MissingField("metadata.name"))?;
        self.api
            .patch(
                &name,
                &PatchParams::apply(FIELD_MANAGER).force(),
                &Patch::Apply(object),
            )
            .await?;
        Ok(())
    }
}

/// Attach `finalizer` unless present. Returns whether the object was modified.
///
/// # Errors
///
/// Returns an error if the finalizer patch is rejected.
pub async fn ensure_finalizer<K, S>(
    store: &S,
    object: &K,
    finalizer: &str,
) -> Result<bool>
where
    K: Resource + Send + Sync + 'static,
    S: ResourceStore<K> + ?Sized,
{
    let mut finalizers = object.meta().finalizers.clone().unwrap_or_default();
    if finalizers.iter().any(|f| f == finalizer) {
        return Ok(false);
    }

    finalizers.push(finalizer.to_string());
    store.patch_finalizers(&object_name(object)?, finalizers).await?;
    Ok(true)
}

/// Detach `finalizer` if present. Returns whether the object was modified.
///
/// # Errors
///
/// Returns an error if the finalizer patch is rejected.
pub async fn ensure_no_finalizer<K, S>(
    store: &S,
    object: &K,
    finalizer: &str,
) -> Result<bool>
where
    K: Resource + Send + Sync + 'static,
    S: ResourceStore<K> + ?Sized,
{
    let finalizers = object.meta().finalizers.clone().unwrap_or_default();
    if !finalizers.iter().any(|f| f == finalizer) {
        return Ok(false);
    }

    let remaining = finalizers.into_iter().filter(|f| f != finalizer).collect();
    store.patch_finalizers(&object_name(object)?, remaining).await?;
    Ok(true)
}

pub(crate) fn object_name<K: Resource>(object: &K) -> Result<String> {
    object
        .meta()
        .name
        .clone()
        .ok_or(ControllerError::MissingField("metadata.name"))
}

/// An in-memory resource store for tests.
#[cfg(any(test, feature = "test-utils"))]
pub mod memory {
    use std::collections::BTreeMap;

    use parking_lot::Mutex;

    use super::*;
    use crate::patch::apply_merge_patch;

    /// Objects kept in a map, patched the way the API server would.
    ///
    /// Removing the last finalizer from an object marked for deletion
    /// deletes it.
    pub struct MemoryResourceStore<K> {
        objects: Mutex<BTreeMap<String, K>>,
        status_patches: Mutex<Vec<(String, Value)>>,
        applied: Mutex<Vec<String>>,
        fail_apply: Mutex<bool>,
    }

    impl<K> Default for MemoryResourceStore<K> {
        fn default() -> Self {
            Self {
                objects: Mutex::new(BTreeMap::new()),
                status_patches: Mutex::new(Vec::new()),
                applied: Mutex::new(Vec::new()),
                fail_apply: Mutex::new(false),
            }
        }
    }

    impl<K> MemoryResourceStore<K>
    where
        K: Resource + Clone + Serialize + DeserializeOwned,
    {
        /// Create an empty store.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Insert or replace an object.
        ///
        /// # Panics
        ///
        /// Panics if the object has no name.
        pub fn insert(&self, object: K) {
            let name = object.meta().name.clone().expect("object must be named");
            self.objects.lock().insert(name, object);
        }

        /// Current copy of an object.
        #[must_use]
        pub fn object(&self, name: &str) -> Option<K> {
            self.objects.lock().get(name).cloned()
        }

        /// Names of all stored objects.
        #[must_use]
        pub fn names(&self) -> Vec<String> {
            self.objects.lock().keys().cloned().collect()
        }

        /// Status patches received so far.
        #[must_use]
        pub fn status_patches(&self) -> Vec<(String, Value)> {
            self.status_patches.lock().clone()
        }

        /// Names passed to [`ResourceStore::apply`], in order.
        #[must_use]
        pub fn applied(&self) -> Vec<String> {
            self.applied.lock().clone()
        }

        /// Make every apply fail.
        pub fn fail_apply(&self, fail: bool) {
            *self.fail_apply.lock() = fail;
        }

        fn not_found(name: &str) -> ControllerError {
            ControllerError::Kube(kube::Error::Api(kube::core::ErrorResponse {
                status: "Failure".to_string(),
                message: format!("{name} not found"),
                reason: "NotFound".to_string(),
                code: 404,
            }))
        }
    }

    #[async_trait]
    impl<K> ResourceStore<K> for MemoryResourceStore<K>
    where
        K: Resource + Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        async fn get(&self, name: &str) -> Result<Option<K>> {
            Ok(self.object(name))
        }

        async fn patch_finalizers(&self, name: &str, finalizers: Vec<String>) -> Result<()> {
            let mut objects = self.objects.lock();
            let deleting = objects
                .get(name)
                .ok_or_else(|| Self::not_found(name))?
                .meta()
                .deletion_timestamp
                .is_some();

            if finalizers.is_empty() && deleting {
                objects.remove(name);
            } else if let Some(object) = objects.get_mut(name) {
                object.meta_mut().finalizers = if finalizers.is_empty() {
                    None
                } else {
                    Some(finalizers)
                };
            }
            Ok(())
        }

        async fn patch_status(&self, name: &str, patch: Value) -> Result<()> {
            let mut objects = self.objects.lock();
            let object = objects.get_mut(name).ok_or_else(|| Self::not_found(name))?;

            let mut value = serde_json::to_value(&*object)?;
            let status = value
                .as_object_mut()
                .ok_or(ControllerError::MissingField("status"))?
                .entry("status")
                .or_insert_with(|| json!({}));
            apply_merge_patch(status, &patch);
            *object = serde_json::from_value(value)?;

            self.status_patches.lock().push((name.to_string(), patch));
            Ok(())
        }

        async fn apply(&self, object: &K) -> Result<()> {
            if *self.fail_apply.lock() {
                return Err(ControllerError::Config("apply rejected".to_string()));
            }
            let name = object_name(object)?;

            let mut applied = serde_json::to_value(object)?;
            let mut objects = self.objects.lock();
            if let Some(existing) = objects.get(&name) {
                let existing = serde_json::to_value(existing)?;
                if let (Some(fields), Some(status)) = (applied.as_object_mut(), existing.get("status")) {
                    fields.insert("status".to_string(), status.clone());
                }
                for key in ["uid", "finalizers"] {
                    if let Some(value) = existing["metadata"].get(key) {
                        applied["metadata"][key] = value.clone();
                    }
                }
            }
            objects.insert(name.clone(), serde_json::from_value(applied)?);
            self.applied.lock().push(name);
            Ok(())
        }
    }
}

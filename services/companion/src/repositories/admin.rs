//! services/companion/src/repositories/admin.rs
//!
//! Resources and services added through the admin panel. They are kept apart
//! from the built-in catalogs and are only listed on the admin panel.

use chrono::Utc;
use mindcare_core::domain::{AdminResource, AdminService, NewAdminResource, NewAdminService};
use mindcare_core::ids::EntryId;
use tracing::info;

use super::{RepoResult, Repository};
use crate::records::{AdminResourceRecord, AdminServiceRecord};
use crate::store::{keys, RecordStore};

#[derive(Clone)]
pub struct AdminResourceRepository {
    inner: Repository<AdminResourceRecord>,
}

impl AdminResourceRepository {
    pub fn new(store: RecordStore, write_retries: u32) -> Self {
        Self {
            inner: Repository::new(store, keys::ADMIN_RESOURCES, "resource", write_retries),
        }
    }

    pub fn list(&self) -> Vec<AdminResource> {
        self.inner.load_all()
    }

    pub fn add(&self, form: NewAdminResource) -> RepoResult<Vec<AdminResource>> {
        let resources = self.inner.append(AdminResource {
            id: EntryId::UNASSIGNED,
            title: form.title,
            description: form.description,
            category: form.category,
            url: form.url,
            created_at: Utc::now(),
        })?;
        info!(total = resources.len(), "Admin resource added");
        Ok(resources)
    }

    pub fn delete(&self, id: EntryId) -> RepoResult<Vec<AdminResource>> {
        let resources = self.inner.remove(id)?;
        info!(%id, "Admin resource deleted");
        Ok(resources)
    }
}

#[derive(Clone)]
pub struct AdminServiceRepository {
    inner: Repository<AdminServiceRecord>,
}

impl AdminServiceRepository {
    pub fn new(store: RecordStore, write_retries: u32) -> Self {
        Self {
            inner: Repository::new(store, keys::ADMIN_SERVICES, "service", write_retries),
        }
    }

    pub fn list(&self) -> Vec<AdminService> {
        self.inner.load_all()
    }

    pub fn add(&self, form: NewAdminService) -> RepoResult<Vec<AdminService>> {
        let services = self.inner.append(AdminService {
            id: EntryId::UNASSIGNED,
            title: form.title,
            description: form.description,
            duration: form.duration,
            price: form.price,
            created_at: Utc::now(),
        })?;
        info!(total = services.len(), "Admin service added");
        Ok(services)
    }

    pub fn delete(&self, id: EntryId) -> RepoResult<Vec<AdminService>> {
        let services = self.inner.remove(id)?;
        info!(%id, "Admin service deleted");
        Ok(services)
    }
}

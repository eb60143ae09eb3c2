use std::collections::BTreeMap;

use uuid::Uuid;

use crate::api::{CrudTransport, FilterValue, ListParams, SortDirection};
use crate::entity::Entity;
use crate::error::DashboardError;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorePagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl Default for StorePagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            total: 0,
        }
    }
}

/// Paged view of one collection. Parameter changes refetch; mutations
/// apply to the current page in place.
pub struct CrudStore<T, S> {
    transport: S,
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub selected: Option<T>,
    pub pagination: StorePagination,
    pub filters: BTreeMap<String, FilterValue>,
    pub search: String,
    sort: Option<String>,
    order: Option<SortDirection>,
}

impl<T, S> CrudStore<T, S>
where
    T: Entity,
    S: CrudTransport<T>,
{
    /// Builds the store from `initial` and performs the first fetch.
    /// A failed first fetch is left in `error`.
    pub async fn mount(transport: S, initial: ListParams) -> Self {
        let mut store = Self {
            transport,
            items: Vec::new(),
            loading: false,
            error: None,
            selected: None,
            pagination: StorePagination {
                page: initial.page.unwrap_or(1),
                limit: initial.limit.unwrap_or(DEFAULT_PAGE_SIZE),
                total: 0,
            },
            filters: initial.filters,
            search: initial.search.unwrap_or_default(),
            sort: initial.sort,
            order: initial.order,
        };

        // Already recorded in `store.error`
        let _ = store.fetch_items().await;
        store
    }

    pub fn params(&self) -> ListParams {
        ListParams {
            page: Some(self.pagination.page),
            limit: Some(self.pagination.limit),
            search: Some(self.search.clone()).filter(|search| !search.is_empty()),
            sort: self.sort.clone(),
            order: self.order,
            filters: self.filters.clone(),
        }
    }

    pub async fn fetch_items(&mut self) -> Result<(), DashboardError> {
        self.begin();

        match self.transport.fetch_all(&self.params()).await {
            Ok(response) => {
                self.pagination.total = response.total();
                self.items = response.data;
                self.loading = false;
                Ok(())
            }
            Err(err) => Err(self.fail("fetch", err.into())),
        }
    }

    pub async fn create_item(&mut self, data: &T::Create) -> Result<T, DashboardError> {
        self.begin();

        match self.transport.create(data).await {
            Ok(created) => {
                self.items.insert(0, created.clone());
                self.pagination.total += 1;
                self.loading = false;
                Ok(created)
            }
            Err(err) => Err(self.fail("create", err.into())),
        }
    }

    pub async fn update_item(&mut self, id: Uuid, data: &T::Update) -> Result<T, DashboardError> {
        self.begin();

        match self.transport.update(id, data).await {
            Ok(updated) => {
                if let Some(slot) = self.items.iter_mut().find(|item| item.id() == id) {
                    *slot = updated.clone();
                }
                if self.selected.as_ref().is_some_and(|item| item.id() == id) {
                    self.selected = Some(updated.clone());
                }
                self.loading = false;
                Ok(updated)
            }
            Err(err) => Err(self.fail("update", err.into())),
        }
    }

    pub async fn delete_item(&mut self, id: Uuid) -> Result<(), DashboardError> {
        self.begin();

        match self.transport.delete(id).await {
            Ok(()) => {
                let before = self.items.len();
                self.items.retain(|item| item.id() != id);
                if self.items.len() < before {
                    self.pagination.total = self.pagination.total.saturating_sub(1);
                }
                if self.selected.as_ref().is_some_and(|item| item.id() == id) {
                    self.selected = None;
                }
                self.loading = false;
                Ok(())
            }
            Err(err) => Err(self.fail("delete", err.into())),
        }
    }

    pub fn set_selected_item(&mut self, item: Option<T>) {
        self.selected = item;
    }

    pub async fn set_filters(
        &mut self,
        filters: BTreeMap<String, FilterValue>,
    ) -> Result<(), DashboardError> {
        self.filters = filters;
        self.pagination.page = 1;
        self.fetch_items().await
    }

    pub async fn set_search_query(&mut self, search: impl Into<String>) -> Result<(), DashboardError> {
        self.search = search.into();
        self.pagination.page = 1;
        self.fetch_items().await
    }

    pub async fn set_page(&mut self, page: u32) -> Result<(), DashboardError> {
        self.pagination.page = page.max(1);
        self.fetch_items().await
    }

    pub async fn refresh(&mut self) -> Result<(), DashboardError> {
        self.fetch_items().await
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn fail(&mut self, action: &str, err: DashboardError) -> DashboardError {
        tracing::error!("Failed to {} {}: {}", action, T::ENDPOINT, err);
        self.error = Some(err.to_string());
        self.loading = false;
        err
    }
}

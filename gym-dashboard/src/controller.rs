use std::fmt;

use uuid::Uuid;

use crate::api::{CrudTransport, ListParams};
use crate::entity::Entity;
use crate::error::DashboardError;
use crate::validation::{join_messages, FieldError, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerState<T> {
    pub items: Vec<T>,
    pub selected: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for ControllerState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            loading: false,
            error: None,
        }
    }
}

type ValidateFn<P> = Box<dyn Fn(&P) -> Vec<FieldError> + Send + Sync>;
type MapFn<P> = Box<dyn Fn(P) -> P + Send + Sync>;
type SuccessFn<T> = Box<dyn Fn(Operation, Option<&T>) + Send + Sync>;

/// Optional callbacks plugged into each controller operation.
/// Absent hooks mean: always valid, identity transforms, no-op success.
pub struct Hooks<T: Entity> {
    pub validate_create: Option<ValidateFn<T::Create>>,
    pub validate_update: Option<ValidateFn<T::Update>>,
    pub validate_params: Option<ValidateFn<ListParams>>,
    pub validate_delete: Option<ValidateFn<Uuid>>,
    pub preprocess_create: Option<MapFn<T::Create>>,
    pub preprocess_update: Option<MapFn<T::Update>>,
    pub preprocess_params: Option<MapFn<ListParams>>,
    pub postprocess: Option<MapFn<T>>,
    pub on_success: Option<SuccessFn<T>>,
}

impl<T: Entity> Default for Hooks<T> {
    fn default() -> Self {
        Self {
            validate_create: None,
            validate_update: None,
            validate_params: None,
            validate_delete: None,
            preprocess_create: None,
            preprocess_update: None,
            preprocess_params: None,
            postprocess: None,
            on_success: None,
        }
    }
}

impl<T: Entity> Hooks<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates both payloads with their `Validate` impls
    pub fn validated() -> Self
    where
        T::Create: Validate,
        T::Update: Validate,
    {
        Self::new()
            .validate_create(|data: &T::Create| data.validate())
            .validate_update(|data: &T::Update| data.validate())
    }

    pub fn validate_create(
        mut self,
        hook: impl Fn(&T::Create) -> Vec<FieldError> + Send + Sync + 'static,
    ) -> Self {
        self.validate_create = Some(Box::new(hook));
        self
    }

    pub fn validate_update(
        mut self,
        hook: impl Fn(&T::Update) -> Vec<FieldError> + Send + Sync + 'static,
    ) -> Self {
        self.validate_update = Some(Box::new(hook));
        self
    }

    pub fn validate_params(
        mut self,
        hook: impl Fn(&ListParams) -> Vec<FieldError> + Send + Sync + 'static,
    ) -> Self {
        self.validate_params = Some(Box::new(hook));
        self
    }

    pub fn validate_delete(mut self, hook: impl Fn(&Uuid) -> Vec<FieldError> + Send + Sync + 'static) -> Self {
        self.validate_delete = Some(Box::new(hook));
        self
    }

    pub fn preprocess_create(
        mut self,
        hook: impl Fn(T::Create) -> T::Create + Send + Sync + 'static,
    ) -> Self {
        self.preprocess_create = Some(Box::new(hook));
        self
    }

    pub fn preprocess_update(
        mut self,
        hook: impl Fn(T::Update) -> T::Update + Send + Sync + 'static,
    ) -> Self {
        self.preprocess_update = Some(Box::new(hook));
        self
    }

    pub fn preprocess_params(
        mut self,
        hook: impl Fn(ListParams) -> ListParams + Send + Sync + 'static,
    ) -> Self {
        self.preprocess_params = Some(Box::new(hook));
        self
    }

    pub fn postprocess(mut self, hook: impl Fn(T) -> T + Send + Sync + 'static) -> Self {
        self.postprocess = Some(Box::new(hook));
        self
    }

    pub fn on_success(mut self, hook: impl Fn(Operation, Option<&T>) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(hook));
        self
    }

    fn apply<P>(hook: &Option<MapFn<P>>, value: P) -> P {
        match hook {
            Some(hook) => hook(value),
            None => value,
        }
    }

    fn check<P>(hook: &Option<ValidateFn<P>>, value: &P) -> Vec<FieldError> {
        hook.as_ref().map(|hook| hook(value)).unwrap_or_default()
    }

    fn succeeded(&self, operation: Operation, item: Option<&T>) {
        if let Some(hook) = &self.on_success {
            hook(operation, item);
        }
    }
}

/// Runs list/create/update/delete through validation, transformation,
/// the transport and the local state update, in that order.
pub struct CrudController<T: Entity, S> {
    transport: S,
    hooks: Hooks<T>,
    state: ControllerState<T>,
}

impl<T, S> CrudController<T, S>
where
    T: Entity,
    S: CrudTransport<T>,
{
    pub fn new(transport: S, hooks: Hooks<T>) -> Self {
        Self {
            transport,
            hooks,
            state: ControllerState::default(),
        }
    }

    pub fn state(&self) -> &ControllerState<T> {
        &self.state
    }

    pub fn transport(&self) -> &S {
        &self.transport
    }

    pub fn select(&mut self, item: Option<T>) {
        self.state.selected = item;
    }

    pub async fn list(&mut self, params: ListParams) -> Result<&[T], DashboardError> {
        self.begin();

        let errors = Hooks::<T>::check(&self.hooks.validate_params, &params);
        if !errors.is_empty() {
            return Err(self.invalid(&errors));
        }

        let params = Hooks::<T>::apply(&self.hooks.preprocess_params, params);
        let response = match self.transport.fetch_all(&params).await {
            Ok(response) => response,
            Err(err) => return Err(self.fail(Operation::List, err.into())),
        };

        self.state.items = response
            .data
            .into_iter()
            .map(|item| Hooks::<T>::apply(&self.hooks.postprocess, item))
            .collect();
        self.hooks.succeeded(Operation::List, None);
        self.state.loading = false;

        Ok(&self.state.items)
    }

    pub async fn create(&mut self, data: T::Create) -> Result<T, DashboardError> {
        self.begin();

        let errors = Hooks::<T>::check(&self.hooks.validate_create, &data);
        if !errors.is_empty() {
            return Err(self.invalid(&errors));
        }

        let data = Hooks::<T>::apply(&self.hooks.preprocess_create, data);
        let created = match self.transport.create(&data).await {
            Ok(created) => Hooks::<T>::apply(&self.hooks.postprocess, created),
            Err(err) => return Err(self.fail(Operation::Create, err.into())),
        };

        self.state.items.insert(0, created.clone());
        self.hooks.succeeded(Operation::Create, Some(&created));
        self.state.loading = false;

        Ok(created)
    }

    pub async fn update(&mut self, id: Uuid, data: T::Update) -> Result<T, DashboardError> {
        self.begin();

        let errors = Hooks::<T>::check(&self.hooks.validate_update, &data);
        if !errors.is_empty() {
            return Err(self.invalid(&errors));
        }

        let data = Hooks::<T>::apply(&self.hooks.preprocess_update, data);
        let updated = match self.transport.update(id, &data).await {
            Ok(updated) => Hooks::<T>::apply(&self.hooks.postprocess, updated),
            Err(err) => return Err(self.fail(Operation::Update, err.into())),
        };

        if let Some(slot) = self.state.items.iter_mut().find(|item| item.id() == id) {
            *slot = updated.clone();
        }
        if self.state.selected.as_ref().is_some_and(|item| item.id() == id) {
            self.state.selected = Some(updated.clone());
        }
        self.hooks.succeeded(Operation::Update, Some(&updated));
        self.state.loading = false;

        Ok(updated)
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<(), DashboardError> {
        self.begin();

        let errors = Hooks::<T>::check(&self.hooks.validate_delete, &id);
        if !errors.is_empty() {
            return Err(self.invalid(&errors));
        }

        if let Err(err) = self.transport.delete(id).await {
            return Err(self.fail(Operation::Delete, err.into()));
        }

        let removed = self
            .state
            .items
            .iter()
            .position(|item| item.id() == id)
            .map(|index| self.state.items.remove(index));
        if self.state.selected.as_ref().is_some_and(|item| item.id() == id) {
            self.state.selected = None;
        }
        self.hooks.succeeded(Operation::Delete, removed.as_ref());
        self.state.loading = false;

        Ok(())
    }

    fn begin(&mut self) {
        self.state.loading = true;
        self.state.error = None;
    }

    fn invalid(&mut self, errors: &[FieldError]) -> DashboardError {
        let message = join_messages(errors);
        tracing::warn!("Validation failed: {}", message);
        self.state.error = Some(message.clone());
        self.state.loading = false;
        DashboardError::Validation(message)
    }

    fn fail(&mut self, operation: Operation, err: DashboardError) -> DashboardError {
        tracing::error!("Failed to {} {}: {}", operation, T::ENDPOINT, err);
        self.state.error = Some(err.to_string());
        self.state.loading = false;
        err
    }
}

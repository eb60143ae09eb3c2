mod common;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use uuid::Uuid;

use common::{client, not_found, MemoryTransport};
use gym_dashboard::api::{ListParams, NotifyingService, Notifier};
use gym_dashboard::models::{ClientWithRelations, CreateClient, UpdateClient};
use gym_dashboard::validation::FieldError;
use gym_dashboard::{CrudController, CrudStore, DashboardError, Hooks, Operation};

fn seeded() -> (MemoryTransport<ClientWithRelations>, Vec<ClientWithRelations>) {
    let clients = vec![
        client("John", "Doe", Some(Uuid::new_v4()), 0),
        client("Jane", "Smith", None, 1),
        client("Mike", "Brown", None, 2),
    ];
    (MemoryTransport::new(clients.clone()), clients)
}

#[tokio::test]
async fn test_list_replaces_items() {
    let (transport, clients) = seeded();
    let mut controller = CrudController::new(transport, Hooks::new());

    let items = controller.list(ListParams::default()).await.unwrap();
    assert_eq!(items.len(), 3);

    let state = controller.state();
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert_eq!(state.items, clients);
}

#[tokio::test]
async fn test_create_then_fetch_round_trip() {
    let (transport, _) = seeded();
    let mut controller = CrudController::new(transport.clone(), Hooks::<ClientWithRelations>::validated());
    controller.list(ListParams::default()).await.unwrap();

    let user_id = Uuid::new_v4();
    let created = controller
        .create(CreateClient {
            user_id,
            goals: Some("Build strength".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(controller.state().items[0].id, created.id);
    assert_eq!(controller.state().items.len(), 4);

    use gym_dashboard::CrudTransport;
    let fetched = transport.fetch_by_id(created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.user_id, user_id);
}

#[tokio::test]
async fn test_update_replaces_item_and_selection() {
    let (transport, clients) = seeded();
    let mut controller = CrudController::new(transport, Hooks::new());
    controller.list(ListParams::default()).await.unwrap();
    controller.select(Some(clients[1].clone()));

    let trainer_id = Uuid::new_v4();
    controller
        .update(clients[1].id, UpdateClient::assign(trainer_id))
        .await
        .unwrap();

    let state = controller.state();
    assert_eq!(state.items[1].trainer_id, Some(trainer_id));
    assert_eq!(state.selected.as_ref().unwrap().trainer_id, Some(trainer_id));
}

#[tokio::test]
async fn test_rejected_update_keeps_items() {
    let (transport, clients) = seeded();
    let mut controller = CrudController::new(transport.clone(), Hooks::new());
    controller.list(ListParams::default()).await.unwrap();

    transport.fail_with(not_found());
    let err = controller
        .update(clients[0].id, UpdateClient::unassign())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    let state = controller.state();
    assert_eq!(state.error.as_deref(), Some("HTTP 404: Not Found"));
    assert!(!state.loading);
    assert_eq!(state.items, clients);
}

#[tokio::test]
async fn test_delete_then_delete_again_is_not_found() {
    let (transport, clients) = seeded();
    let mut controller = CrudController::new(transport, Hooks::new());
    controller.list(ListParams::default()).await.unwrap();
    controller.select(Some(clients[2].clone()));

    controller.delete(clients[2].id).await.unwrap();
    assert_eq!(controller.state().items.len(), 2);
    assert_eq!(controller.state().selected, None);

    let err = controller.delete(clients[2].id).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(controller.state().items.len(), 2);
}

#[tokio::test]
async fn test_validation_failure_skips_transport() {
    let transport = MemoryTransport::<ClientWithRelations>::empty();
    let hooks = Hooks::<ClientWithRelations>::new().validate_create(|_: &CreateClient| {
        vec![
            FieldError::new("userId", "User is required"),
            FieldError::new("goals", "Goals are too long"),
        ]
    });
    let mut controller = CrudController::new(transport.clone(), hooks);

    let err = controller.create(CreateClient::default()).await.unwrap_err();

    match err {
        DashboardError::Validation(message) => {
            assert_eq!(message, "User is required, Goals are too long")
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(
        controller.state().error.as_deref(),
        Some("User is required, Goals are too long")
    );
    assert!(!controller.state().loading);
    assert!(transport.snapshot().is_empty());
}

#[tokio::test]
async fn test_list_and_delete_validation_hooks() {
    let (transport, clients) = seeded();
    let protected = clients[0].id;
    let hooks = Hooks::<ClientWithRelations>::new()
        .validate_params(|params: &ListParams| match params.limit {
            Some(limit) if limit > 100 => vec![FieldError::new("limit", "limit must be at most 100")],
            _ => Vec::new(),
        })
        .validate_delete(move |id: &Uuid| {
            if *id == protected {
                vec![FieldError::new("id", "Client has an active plan")]
            } else {
                Vec::new()
            }
        });
    let mut controller = CrudController::new(transport.clone(), hooks);

    let err = controller
        .list(ListParams {
            limit: Some(500),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DashboardError::Validation(_)));
    assert_eq!(controller.state().error.as_deref(), Some("limit must be at most 100"));
    assert!(controller.state().items.is_empty());

    controller.list(ListParams::default()).await.unwrap();
    let err = controller.delete(protected).await.unwrap_err();
    assert_eq!(err.to_string(), "Client has an active plan");
    assert_eq!(transport.snapshot().len(), 3);

    controller.delete(clients[1].id).await.unwrap();
    assert_eq!(transport.snapshot().len(), 2);
}

#[tokio::test]
async fn test_hooks_run_in_order() {
    let (transport, _) = seeded();
    let events = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&events);

    let hooks = Hooks::<ClientWithRelations>::new()
        .preprocess_create(|mut data: CreateClient| {
            data.goals = data.goals.map(|goals| goals.trim().to_string());
            data
        })
        .preprocess_params(|params: ListParams| params.filter("status", "active"))
        .postprocess(|mut item: ClientWithRelations| {
            item.goals = item.goals.map(|goals| goals.to_uppercase());
            item
        })
        .on_success(move |operation, item: Option<&ClientWithRelations>| {
            recorded.lock().unwrap().push((operation, item.map(|item| item.id)));
        });
    let mut controller = CrudController::new(transport, hooks);

    controller.list(ListParams::default()).await.unwrap();
    let created = controller
        .create(CreateClient {
            user_id: Uuid::new_v4(),
            goals: Some("  run a marathon ".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(created.goals.as_deref(), Some("RUN A MARATHON"));
    assert_eq!(
        *events.lock().unwrap(),
        vec![(Operation::List, None), (Operation::Create, Some(created.id))]
    );
}

#[derive(Clone, Default)]
struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.messages.lock().unwrap().push(format!("ok: {}", message));
    }

    fn error(&self, message: &str) {
        self.messages.lock().unwrap().push(format!("err: {}", message));
    }
}

#[tokio::test]
async fn test_notifying_service_reports_mutations_only() {
    let (transport, clients) = seeded();
    let notifier = RecordingNotifier::default();
    let service = NotifyingService::new(transport, notifier.clone(), "Client");
    let mut controller = CrudController::new(service, Hooks::<ClientWithRelations>::new());

    controller.list(ListParams::default()).await.unwrap();
    controller.delete(clients[0].id).await.unwrap();
    let _ = controller.delete(clients[0].id).await;

    assert_eq!(
        *notifier.messages.lock().unwrap(),
        vec![
            "ok: Client deleted successfully".to_string(),
            "err: Failed to delete client: HTTP 404: Not Found".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_store_mount_fetches_first_page() {
    let clients: Vec<_> = (0..25)
        .map(|index| client("Client", &format!("{:02}", index), None, index))
        .collect();
    let transport = MemoryTransport::new(clients);

    let store = CrudStore::mount(transport, ListParams::default()).await;

    assert_eq!(store.items.len(), 10);
    assert_eq!(store.pagination.page, 1);
    assert_eq!(store.pagination.limit, 10);
    assert_eq!(store.pagination.total, 25);
    assert!(!store.loading);
}

#[tokio::test]
async fn test_store_filter_and_search_reset_page() {
    let clients: Vec<_> = (0..25)
        .map(|index| client("Client", &format!("{:02}", index), None, index))
        .collect();
    let transport = MemoryTransport::new(clients.clone());
    let mut store = CrudStore::mount(transport, ListParams::default()).await;

    store.set_page(3).await.unwrap();
    assert_eq!(store.pagination.page, 3);
    assert_eq!(store.items.len(), 5);
    assert_eq!(store.items[0].id, clients[20].id);

    store.set_search_query("john").await.unwrap();
    assert_eq!(store.pagination.page, 1);
    assert_eq!(store.params().search.as_deref(), Some("john"));

    store.set_page(2).await.unwrap();
    let mut filters = BTreeMap::new();
    filters.insert("status".to_string(), "unassigned".into());
    store.set_filters(filters).await.unwrap();
    assert_eq!(store.pagination.page, 1);
    assert_eq!(store.items.len(), 10);
}

#[tokio::test]
async fn test_store_mutations_and_failures() {
    let (transport, clients) = seeded();
    let mut store = CrudStore::mount(transport.clone(), ListParams::default()).await;
    assert_eq!(store.pagination.total, 3);

    store.delete_item(clients[0].id).await.unwrap();
    assert_eq!(store.items.len(), 2);
    assert_eq!(store.pagination.total, 2);

    store.set_selected_item(Some(clients[1].clone()));
    let trainer_id = Uuid::new_v4();
    store
        .update_item(clients[1].id, &UpdateClient::assign(trainer_id))
        .await
        .unwrap();
    assert_eq!(store.selected.as_ref().unwrap().trainer_id, Some(trainer_id));

    transport.fail_with(not_found());
    assert!(store.refresh().await.is_err());
    assert_eq!(store.error.as_deref(), Some("HTTP 404: Not Found"));
    assert!(!store.loading);
    assert_eq!(store.items.len(), 2);

    transport.recover();
    store.refresh().await.unwrap();
    assert_eq!(store.error, None);
}

#[tokio::test]
async fn test_store_mount_failure_is_recorded() {
    let transport = MemoryTransport::<ClientWithRelations>::empty();
    transport.fail_with(not_found());

    let store = CrudStore::mount(transport, ListParams::default()).await;

    assert!(store.items.is_empty());
    assert_eq!(store.error.as_deref(), Some("HTTP 404: Not Found"));
}

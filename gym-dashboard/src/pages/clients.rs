use std::str::FromStr;

use uuid::Uuid;

use super::{compare_names, matches_search, ConfirmStep, PageState, RowConfirm};
use crate::api::CrudTransport;
use crate::error::DashboardError;
use crate::models::{ActivityLevel, ClientWithRelations, UpdateClient};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientStats {
    pub total: usize,
    pub active: usize,
    pub unassigned: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Unassigned,
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "unassigned" => Ok(StatusFilter::Unassigned),
            other => Err(format!("Unknown status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClientSort {
    #[default]
    Name,
    Recent,
    Progress,
}

impl FromStr for ClientSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(ClientSort::Name),
            "recent" => Ok(ClientSort::Recent),
            "progress" => Ok(ClientSort::Progress),
            other => Err(format!("Unknown sort: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientFilters {
    pub search: String,
    pub status: StatusFilter,
    pub activity: Option<ActivityLevel>,
    pub sort: ClientSort,
}

pub fn client_stats(clients: &[ClientWithRelations]) -> ClientStats {
    let active = clients.iter().filter(|client| client.is_assigned()).count();
    ClientStats {
        total: clients.len(),
        active,
        unassigned: clients.len() - active,
    }
}

pub fn client_view<'a>(
    clients: &'a [ClientWithRelations],
    filters: &ClientFilters,
) -> Vec<&'a ClientWithRelations> {
    let mut view: Vec<_> = clients
        .iter()
        .filter(|client| {
            let name = client.full_name();
            matches_search(
                &filters.search,
                [
                    name.as_str(),
                    client.user.email.as_str(),
                    client.goals.as_deref().unwrap_or_default(),
                ],
            )
        })
        .filter(|client| match filters.status {
            StatusFilter::All => true,
            StatusFilter::Active => client.is_assigned(),
            StatusFilter::Unassigned => !client.is_assigned(),
        })
        .filter(|client| {
            filters
                .activity
                .map_or(true, |level| client.activity_level == Some(level))
        })
        .collect();

    match filters.sort {
        ClientSort::Name => view.sort_by(|a, b| compare_names(&a.full_name(), &b.full_name())),
        ClientSort::Recent => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        ClientSort::Progress => view.sort_by(|a, b| b.progress_count.cmp(&a.progress_count)),
    }

    view
}

pub struct ClientsPage<S> {
    transport: S,
    pub state: PageState<ClientWithRelations>,
    pub confirm: RowConfirm,
}

impl<S: CrudTransport<ClientWithRelations>> ClientsPage<S> {
    pub fn new(transport: S) -> Self {
        Self {
            transport,
            state: PageState::default(),
            confirm: RowConfirm::default(),
        }
    }

    pub async fn load(&mut self) -> Result<(), DashboardError> {
        self.state.load(&self.transport).await
    }

    pub async fn refresh(&mut self) -> Result<(), DashboardError> {
        self.load().await
    }

    pub fn clients(&self) -> &[ClientWithRelations] {
        &self.state.items
    }

    pub fn stats(&self) -> ClientStats {
        client_stats(&self.state.items)
    }

    pub fn view(&self, filters: &ClientFilters) -> Vec<&ClientWithRelations> {
        client_view(&self.state.items, filters)
    }

    pub async fn assign_trainer(
        &mut self,
        client_id: Uuid,
        trainer_id: Uuid,
    ) -> Result<ClientWithRelations, DashboardError> {
        tracing::info!("Assigning trainer {} to client {}", trainer_id, client_id);
        let data = UpdateClient::assign(trainer_id);
        self.state
            .run(&self.transport, "assign", self.transport.update(client_id, &data))
            .await
    }

    pub async fn unassign_trainer(&mut self, client_id: Uuid) -> Result<ClientWithRelations, DashboardError> {
        tracing::info!("Unassigning trainer from client {}", client_id);
        let data = UpdateClient::unassign();
        self.state
            .run(&self.transport, "unassign", self.transport.update(client_id, &data))
            .await
    }

    pub async fn update_profile(
        &mut self,
        client_id: Uuid,
        data: UpdateClient,
    ) -> Result<ClientWithRelations, DashboardError> {
        self.state.check(&data)?;
        self.state
            .run(&self.transport, "update", self.transport.update(client_id, &data))
            .await
    }

    /// Deletes on the second request for the same row
    pub async fn request_delete(&mut self, client_id: Uuid) -> Result<ConfirmStep, DashboardError> {
        match self.confirm.request(client_id) {
            ConfirmStep::Armed => Ok(ConfirmStep::Armed),
            ConfirmStep::Confirmed => {
                self.state
                    .run(&self.transport, "delete", self.transport.delete(client_id))
                    .await?;
                Ok(ConfirmStep::Confirmed)
            }
        }
    }
}

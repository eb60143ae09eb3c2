// In-memory views over fully loaded collections, one per dashboard page

pub mod clients;
pub mod confirm;
pub mod feedback;
pub mod trainers;

pub use clients::{ClientFilters, ClientSort, ClientStats, ClientsPage, StatusFilter};
pub use confirm::{ConfirmStep, RowConfirm};
pub use feedback::{FeedbackFilters, FeedbackPage, FeedbackSort, FeedbackStats};
pub use trainers::{TrainerFilters, TrainerSort, TrainerStats, TrainersPage};

use std::cmp::Ordering;
use std::future::Future;

use crate::api::{ApiError, CrudTransport, ListParams};
use crate::entity::Entity;
use crate::error::DashboardError;
use crate::validation::{join_messages, Validate};

/// Loaded collection plus the loading/error flags of one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<T: Entity> PageState<T> {
    /// Fetches the whole collection, unpaged
    pub async fn load<S>(&mut self, transport: &S) -> Result<(), DashboardError>
    where
        S: CrudTransport<T>,
    {
        self.loading = true;
        self.error = None;

        match transport.fetch_all(&ListParams::default()).await {
            Ok(response) => {
                self.items = response.data;
                self.loading = false;
                Ok(())
            }
            Err(err) => Err(self.fail("load", err.into())),
        }
    }

    /// Awaits one transport call, then refetches on success.
    ///
    /// Once the call succeeds its value is returned even if the refetch
    /// fails; the refetch error is left in `error` and `items` stay stale.
    pub async fn run<S, R, F>(&mut self, transport: &S, action: &str, call: F) -> Result<R, DashboardError>
    where
        S: CrudTransport<T>,
        F: Future<Output = Result<R, ApiError>>,
    {
        self.loading = true;
        self.error = None;

        let value = match call.await {
            Ok(value) => value,
            Err(err) => return Err(self.fail(action, err.into())),
        };

        if self.load(transport).await.is_err() {
            tracing::warn!("{} on {} applied, list not refreshed", action, T::ENDPOINT);
        }
        Ok(value)
    }

    /// Rejects an invalid payload before anything is sent
    pub fn check(&mut self, payload: &impl Validate) -> Result<(), DashboardError> {
        let errors = payload.validate();
        if errors.is_empty() {
            return Ok(());
        }

        let message = join_messages(&errors);
        self.error = Some(message.clone());
        Err(DashboardError::Validation(message))
    }

    fn fail(&mut self, action: &str, err: DashboardError) -> DashboardError {
        tracing::error!("Failed to {} {}: {}", action, T::ENDPOINT, err);
        self.error = Some(err.to_string());
        self.loading = false;
        err
    }
}

/// Case-insensitive substring match; an empty needle matches everything
pub(crate) fn matches_search<'a>(needle: &str, haystacks: impl IntoIterator<Item = &'a str>) -> bool {
    let needle = needle.trim().to_lowercase();
    needle.is_empty()
        || haystacks
            .into_iter()
            .any(|haystack| haystack.to_lowercase().contains(&needle))
}

pub(crate) fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Descending, with missing values last
pub(crate) fn compare_desc_nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_search() {
        assert!(matches_search("", ["anything"]));
        assert!(matches_search("JOHN", ["John Doe", "john@example.com"]));
        assert!(matches_search("  doe ", ["John Doe"]));
        assert!(!matches_search("jane", ["John Doe"]));
    }

    #[test]
    fn test_compare_desc_nulls_last() {
        let mut ratings = vec![None, Some(3.5), Some(4.8), None, Some(4.0)];
        ratings.sort_by(|a, b| compare_desc_nulls_last(*a, *b));
        assert_eq!(ratings, vec![Some(4.8), Some(4.0), Some(3.5), None, None]);
    }
}
